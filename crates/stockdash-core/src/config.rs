use std::sync::RwLock;

pub const DEFAULT_BASE_URL: &str = "https://stockdash-backend.onrender.com";

/// The backend base address, read by every network call.
#[derive(Debug)]
pub struct ConfigStore {
    base: RwLock<String>,
}

impl ConfigStore {
    pub fn new(base: &str) -> Self {
        let store = Self::default();
        store.set(base);
        store
    }

    pub fn get(&self) -> String {
        match self.base.read() {
            Ok(base) => base.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the base address with `value`, trimmed. Blank input is ignored and the previous
    /// address kept; returns whether the value was taken.
    pub fn set(&self, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() {
            log::debug!("ignoring blank backend address");
            return false;
        }

        let mut base = match self.base.write() {
            Ok(base) => base,
            Err(poisoned) => poisoned.into_inner(),
        };
        *base = value.to_string();
        log::info!("backend address set to {value}");
        true
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self {
            base: RwLock::new(DEFAULT_BASE_URL.to_string()),
        }
    }
}
