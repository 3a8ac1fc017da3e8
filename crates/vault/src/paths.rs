//! Standard paths used by the vault

use std::path::PathBuf;

/// Standard vault paths
pub struct Paths {
    /// Data directory (~/.local/share/vault)
    pub data: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self::new()
    }
}

impl Paths {
    pub fn new() -> Self {
        let data = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("~/.local/share"))
            .join("vault");

        Self { data }
    }
}
