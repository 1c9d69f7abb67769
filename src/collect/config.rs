//! Collector connection configuration.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

/// Authentication method for the device session.
#[derive(Debug, Clone)]
pub enum AuthMethod {
    /// No authentication (lab devices only).
    None,

    /// Password authentication.
    Password(SecretString),

    /// Private key authentication.
    PrivateKey {
        /// Path to the private key file.
        path: PathBuf,
        /// Optional passphrase for encrypted keys.
        passphrase: Option<String>,
    },
}

/// Connection and capture settings for one OLT.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Target host (hostname or IP address).
    pub host: String,

    /// SSH port (default: 22).
    pub port: u16,

    /// Username for authentication.
    pub username: String,

    /// Authentication method.
    pub auth: AuthMethod,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Hard ceiling on a single slot capture.
    pub command_timeout: Duration,

    /// A capture is considered complete once the channel has been
    /// silent for this long (matches how operators decide a paged
    /// dump has finished scrolling).
    pub quiet_period: Duration,

    /// Terminal width for the PTY.
    pub terminal_width: u32,

    /// Terminal height for the PTY.
    pub terminal_height: u32,
}

impl CollectorConfig {
    /// Create a config for `host` with defaults matching common OLT
    /// console behavior.
    pub fn new(host: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 22,
            username: username.into(),
            auth: AuthMethod::None,
            connect_timeout: Duration::from_secs(10),
            command_timeout: Duration::from_secs(30),
            quiet_period: Duration::from_secs(5),
            terminal_width: 511,
            terminal_height: 24,
        }
    }

    /// Set the SSH port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Use password authentication.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.auth = AuthMethod::Password(SecretString::from(password.into()));
        self
    }

    /// Use private key authentication.
    pub fn private_key(mut self, path: impl Into<PathBuf>) -> Self {
        self.auth = AuthMethod::PrivateKey {
            path: path.into(),
            passphrase: None,
        };
        self
    }

    /// Use private key authentication with a passphrase.
    pub fn private_key_with_passphrase(
        mut self,
        path: impl Into<PathBuf>,
        passphrase: impl Into<String>,
    ) -> Self {
        self.auth = AuthMethod::PrivateKey {
            path: path.into(),
            passphrase: Some(passphrase.into()),
        };
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the per-slot capture ceiling.
    pub fn command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Set the quiet period that ends a capture.
    pub fn quiet_period(mut self, period: Duration) -> Self {
        self.quiet_period = period;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = CollectorConfig::new("172.10.1.26", "admin");
        assert_eq!(config.port, 22);
        assert!(matches!(config.auth, AuthMethod::None));
        assert_eq!(config.quiet_period, Duration::from_secs(5));
    }

    #[test]
    fn test_builder_chaining() {
        let config = CollectorConfig::new("olt-7606", "ops")
            .port(2222)
            .password("secret")
            .command_timeout(Duration::from_secs(60));
        assert_eq!(config.port, 2222);
        assert!(matches!(config.auth, AuthMethod::Password(_)));
        assert_eq!(config.command_timeout, Duration::from_secs(60));
    }
}
