//! Configuration management for RAX auth server
//!
//! Separates startup configuration (requires restart) from runtime configuration
//! (shared with connection handlers and updatable while the server runs).

use config::{Config, Environment, File};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::auth::{HashParams, InputLimits};

/// Smallest memory cost Argon2 accepts per lane, in KiB
const ARGON2_MIN_MEMORY_PER_LANE_KIB: u32 = 8;

/// Complete server configuration with startup/runtime separation
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ServerConfig {
    #[serde(flatten)]
    pub startup: StartupConfig,

    #[serde(flatten)]
    pub runtime: RuntimeConfig,
}

/// Configuration that requires server restart to take effect
#[derive(Debug, Deserialize, Clone)]
pub struct StartupConfig {
    // ═══ NETWORK ═══
    /// IP address to bind the control connection
    pub bind_address: String,

    /// Port for the control connection (0 picks an ephemeral port)
    pub control_port: u16,

    // ═══ INPUT LIMITS ═══
    pub max_command_length: usize,
    pub max_identifier_length: usize,
    pub max_password_length: usize,

    // ═══ PASSWORD HASHING ═══
    /// Argon2id memory cost in KiB
    pub hash_memory_kib: u32,
    /// Argon2id time cost (passes over memory)
    pub hash_iterations: u32,
    /// Argon2id lanes
    pub hash_parallelism: u32,
}

/// Configuration shared with live connections
#[derive(Debug, Deserialize, Clone)]
pub struct RuntimeConfig {
    /// Maximum concurrent connections
    /// Environment: RAX_AUTH_MAX_CLIENTS
    pub max_clients: usize,

    /// Lifetime of an authenticated session in seconds
    /// Environment: RAX_AUTH_SESSION_MAX_AGE_SECS
    pub session_max_age_secs: u64,
}

/// Thread-safe runtime configuration wrapper
pub type SharedRuntimeConfig = Arc<RwLock<RuntimeConfig>>;

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            control_port: 4000,
            max_command_length: 1024,
            max_identifier_length: 254,
            max_password_length: 512,
            hash_memory_kib: 19456,
            hash_iterations: 2,
            hash_parallelism: 1,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_clients: 64,
            session_max_age_secs: 24 * 60 * 60,
        }
    }
}

impl ServerConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        // Container layout first, then the working directory
        let config_paths = ["rax-auth-server/config", "config"];

        let mut last_error = None;

        for config_path in &config_paths {
            match Config::builder()
                .add_source(File::with_name(config_path))
                .add_source(Environment::with_prefix("RAX_AUTH").try_parsing(true))
                .build()
            {
                Ok(settings) => return Self::from_settings(settings),
                Err(e) => {
                    last_error = Some(e);
                    continue;
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            config::ConfigError::Message(format!(
                "no configuration found, tried {config_paths:?}"
            ))
        }))
    }

    fn from_settings(settings: Config) -> Result<Self, config::ConfigError> {
        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Split into startup (immutable) and runtime (shared) parts
    pub fn split(self) -> (StartupConfig, SharedRuntimeConfig) {
        let runtime = Arc::new(RwLock::new(self.runtime));
        (self.startup, runtime)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        let startup = &self.startup;

        if startup.bind_address.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "bind_address cannot be empty".into(),
            ));
        }

        if startup.max_command_length == 0
            || startup.max_identifier_length == 0
            || startup.max_password_length == 0
        {
            return Err(config::ConfigError::Message(
                "input length limits must be greater than 0".into(),
            ));
        }

        if startup.max_identifier_length + startup.max_password_length
            >= startup.max_command_length
        {
            return Err(config::ConfigError::Message(
                "max_command_length must exceed identifier and password limits combined".into(),
            ));
        }

        if startup.hash_iterations == 0 || startup.hash_parallelism == 0 {
            return Err(config::ConfigError::Message(
                "hash_iterations and hash_parallelism must be greater than 0".into(),
            ));
        }

        if startup.hash_memory_kib < ARGON2_MIN_MEMORY_PER_LANE_KIB * startup.hash_parallelism {
            return Err(config::ConfigError::Message(format!(
                "hash_memory_kib must be at least {} per lane",
                ARGON2_MIN_MEMORY_PER_LANE_KIB
            )));
        }

        if self.runtime.max_clients == 0 {
            return Err(config::ConfigError::Message(
                "max_clients must be greater than 0".into(),
            ));
        }

        if self.runtime.session_max_age_secs == 0 {
            return Err(config::ConfigError::Message(
                "session_max_age_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

impl StartupConfig {
    /// Get bind address and control port as socket address
    pub fn control_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.control_port)
    }

    /// Argon2 cost parameters for the password hasher
    pub fn hash_params(&self) -> HashParams {
        HashParams {
            memory_kib: self.hash_memory_kib,
            iterations: self.hash_iterations,
            parallelism: self.hash_parallelism,
        }
    }

    /// Identifier/password limits for input validation
    pub fn input_limits(&self) -> InputLimits {
        InputLimits {
            max_identifier_length: self.max_identifier_length,
            max_password_length: self.max_password_length,
        }
    }
}

impl RuntimeConfig {
    /// Get session lifetime as Duration
    pub fn session_max_age(&self) -> Duration {
        Duration::from_secs(self.session_max_age_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::Path;

    const SAMPLE: &str = r#"
bind_address = "0.0.0.0"
control_port = 4100
max_command_length = 2048
max_identifier_length = 100
max_password_length = 200
hash_memory_kib = 8
hash_iterations = 1
hash_parallelism = 1
max_clients = 5
session_max_age_secs = 60
"#;

    fn write_config(contents: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("config.toml")).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        dir
    }

    fn load_file(path: &Path) -> Result<ServerConfig, config::ConfigError> {
        let settings = Config::builder().add_source(File::from(path)).build()?;
        ServerConfig::from_settings(settings)
    }

    #[test]
    fn test_load_file() {
        let dir = write_config(SAMPLE);
        let config = load_file(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config.startup.control_socket(), "0.0.0.0:4100");
        assert_eq!(config.startup.max_identifier_length, 100);
        assert_eq!(config.startup.hash_params().memory_kib, 8);
        assert_eq!(config.runtime.max_clients, 5);
        assert_eq!(config.runtime.session_max_age(), Duration::from_secs(60));
    }

    #[test]
    fn test_load_file_rejects_invalid_values() {
        let dir = write_config(&SAMPLE.replace("max_clients = 5", "max_clients = 0"));
        assert!(load_file(&dir.path().join("config.toml")).is_err());
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(ServerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_low_hash_memory() {
        let mut config = ServerConfig::default();
        config.startup.hash_parallelism = 4;
        config.startup.hash_memory_kib = 16;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_small_command_length() {
        let mut config = ServerConfig::default();
        config.startup.max_command_length = 64;
        assert!(config.validate().is_err());
    }

    #[tokio::test]
    async fn test_split_shares_runtime() {
        let (startup, runtime) = ServerConfig::default().split();
        assert_eq!(startup.control_port, 4000);

        runtime.write().await.max_clients = 1;
        assert_eq!(runtime.read().await.max_clients, 1);
    }
}
