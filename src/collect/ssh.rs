//! SSH transport implementation using russh.

use std::sync::Arc;

use log::debug;
use russh::client::{self, Handle, Msg};
use russh::keys::{load_secret_key, PrivateKeyWithHashAlg};
use russh::Channel;
use secrecy::ExposeSecret;

use super::config::{AuthMethod, CollectorConfig};
use crate::error::{Result, TransportError};

/// SSH transport wrapping a russh client session.
pub struct SshTransport {
    /// The russh session handle.
    session: Handle<SshHandler>,

    /// Configuration used for this connection.
    config: CollectorConfig,
}

impl SshTransport {
    /// Connect to the device and authenticate.
    pub async fn connect(config: CollectorConfig) -> Result<Self> {
        let ssh_config = Arc::new(client::Config {
            inactivity_timeout: Some(config.connect_timeout),
            ..Default::default()
        });

        let mut session = tokio::time::timeout(
            config.connect_timeout,
            client::connect(
                ssh_config,
                (config.host.as_str(), config.port),
                SshHandler,
            ),
        )
        .await
        .map_err(|_| TransportError::Timeout(config.connect_timeout))?
        .map_err(TransportError::Ssh)?;

        Self::authenticate(&mut session, &config).await?;
        debug!("connected to {}:{}", config.host, config.port);

        Ok(Self { session, config })
    }

    /// Open a PTY shell channel on this connection.
    pub async fn open_channel(&self) -> Result<Channel<Msg>> {
        let channel = self
            .session
            .channel_open_session()
            .await
            .map_err(TransportError::Ssh)?;

        channel
            .request_pty(
                true,
                "xterm",
                self.config.terminal_width,
                self.config.terminal_height,
                0,
                0,
                &[],
            )
            .await
            .map_err(TransportError::Ssh)?;

        channel
            .request_shell(true)
            .await
            .map_err(TransportError::Ssh)?;

        Ok(channel)
    }

    /// Authenticate with the device.
    async fn authenticate(
        session: &mut Handle<SshHandler>,
        config: &CollectorConfig,
    ) -> Result<()> {
        let success = match &config.auth {
            AuthMethod::None => session
                .authenticate_none(&config.username)
                .await
                .map_err(TransportError::Ssh)?
                .success(),
            AuthMethod::Password(password) => session
                .authenticate_password(&config.username, password.expose_secret())
                .await
                .map_err(TransportError::Ssh)?
                .success(),
            AuthMethod::PrivateKey { path, passphrase } => {
                let key = load_secret_key(path, passphrase.as_deref())
                    .map_err(|e| TransportError::Key(e.to_string()))?;

                let hash_alg = session
                    .best_supported_rsa_hash()
                    .await
                    .map_err(TransportError::Ssh)?
                    .flatten();

                session
                    .authenticate_publickey(
                        &config.username,
                        PrivateKeyWithHashAlg::new(Arc::new(key), hash_alg),
                    )
                    .await
                    .map_err(TransportError::Ssh)?
                    .success()
            }
        };

        if !success {
            return Err(TransportError::AuthenticationFailed {
                user: config.username.clone(),
            }
            .into());
        }

        Ok(())
    }

    /// The configuration this transport was opened with.
    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Close the connection.
    pub async fn close(self) -> Result<()> {
        self.session
            .disconnect(russh::Disconnect::ByApplication, "", "en")
            .await
            .map_err(TransportError::Ssh)?;
        Ok(())
    }
}

/// SSH client handler for russh.
///
/// Host keys are accepted unconditionally: captures run inside the
/// operator's management network and host-key management sits outside
/// this tool.
struct SshHandler;

impl client::Handler for SshHandler {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &russh::keys::PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        Ok(true)
    }
}
