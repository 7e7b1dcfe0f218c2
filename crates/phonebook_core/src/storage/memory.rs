use super::{ContactStorage, StorageResult};

/// In-process slot. Nothing survives the value being dropped.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Option<String>,
    writes: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with raw slot contents, valid or not.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Some(raw.into()),
            writes: 0,
        }
    }

    pub fn raw(&self) -> Option<&str> {
        self.slot.as_deref()
    }

    /// Number of `write_slot` calls observed.
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl ContactStorage for MemoryStorage {
    fn read_slot(&self) -> StorageResult<Option<String>> {
        Ok(self.slot.clone())
    }

    fn write_slot(&mut self, value: &str) -> StorageResult<()> {
        self.slot = Some(value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
