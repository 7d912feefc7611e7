//! Directory server configuration.

/// Default listen port.
const DEFAULT_PORT: u16 = 5000;

/// Configuration for the directory server.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Port to listen on.
    pub port: u16,

    /// Directory for persisting user documents. When set, the store saves to
    /// `{data_dir}/users.json`. None = in-memory only.
    pub data_dir: Option<String>,

    /// Hex-encoded 32-byte seed for the credential signing key.
    /// None = random ephemeral key per process.
    pub token_seed: Option<String>,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_dir: None,
            token_seed: None,
        }
    }
}
