use anyhow::Result;

/// A local key-value facility holding named string slots.
pub trait SnapshotStore {
    fn read_slot(&self, key: &str) -> Result<Option<String>>;
    fn write_slot(&mut self, key: &str, value: &str) -> Result<()>;
}

#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub(crate) struct MemoryStore {
    slots: std::collections::HashMap<String, String>,
    fail_writes: bool,
}

#[cfg(test)]
impl MemoryStore {
    pub(crate) fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
impl SnapshotStore for MemoryStore {
    fn read_slot(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn write_slot(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            anyhow::bail!("slot store is read-only");
        }
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
