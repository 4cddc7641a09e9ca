//! Application configuration loaded from environment variables.
//!
//! Sensitive fields are marked; they should come from a secret manager
//! in production and must never be logged.

use envconfig::Envconfig;
use std::sync::LazyLock;

#[derive(Envconfig, Clone)]
pub struct AppConfig {
    /// Environment name: "local", "dev", "staging", "prod"
    #[envconfig(default = "local")]
    pub env: String,

    /// Database connection string, e.g. "sqlite:data/vet-agenda.db"
    pub db_host: String,

    /// 🔒 SENSITIVE: password to encrypt the SQLite file (sqlcipher).
    /// Only used when running against an encrypted database.
    #[envconfig(default = "")]
    pub db_pass_encrypt: String,

    /// Host address for web server binding
    /// Example: "0.0.0.0", "localhost"
    pub web_server_host: String,

    /// Port for web server binding
    #[envconfig(default = "8080")]
    pub web_server_port: u16,

    /// Path to SSL private key file (prod only)
    #[envconfig(default = "server.key")]
    pub private_key_path: String,

    /// Path to SSL certificate file (prod only)
    #[envconfig(default = "server.crt")]
    pub certificate_path: String,

    /// 🔒 SENSITIVE: identity-cookie key password (UUID format)
    pub identity_pass: String,

    /// 🔒 SENSITIVE: identity-cookie key salt (UUID format)
    pub identity_salt: String,
}

impl AppConfig {
    pub fn is_prod(&self) -> bool {
        self.env.to_lowercase() == "prod"
    }

    pub fn db_is_encrypted(&self) -> bool {
        !self.db_pass_encrypt.is_empty()
    }
}

/// Global application configuration, validated on first access.
pub static APP_CONFIG: LazyLock<AppConfig> = LazyLock::new(|| {
    AppConfig::init_from_env()
        .expect("Failed to load application configuration. Check environment variables.")
});
