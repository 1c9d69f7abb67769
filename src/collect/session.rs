//! Interactive capture session against one OLT.
//!
//! The console paginates long ONU listings and marks the end of a
//! `dis onu slot` dump with an `ONUs found:` summary line. A capture
//! therefore ends on that marker, or after the channel has stayed
//! quiet for the configured period, or at the hard per-command
//! ceiling - whichever comes first. Partial output is kept, never
//! discarded: the parser downstream is failure-tolerant anyway.

use std::time::Instant;

use log::{debug, info, warn};
use russh::client::Msg;
use russh::{Channel, ChannelMsg};

use super::config::CollectorConfig;
use super::ssh::SshTransport;
use crate::error::{Result, SessionError};
use crate::occupancy::slots;

/// Output completion marker in the device's command output.
const COMPLETION_MARKER: &str = "ONUs found:";

/// Device response for a slot with no card installed.
const NO_CARD_MARKER: &str = "Wrong parameter";

/// Pagination prompt fragment; answered with a space to continue.
const PAGING_MARKER: &str = "More";

/// Command that stops the console from paginating at all.
const PAGING_OFF_COMMAND: &str = "screen-length disable";

/// Raw capture of one slot-display command.
#[derive(Debug, Clone)]
pub struct SlotCapture {
    /// Slot the command was issued for.
    pub slot: u8,
    /// Raw console output, command echo included.
    pub output: String,
}

impl SlotCapture {
    /// Iterate the capture line by line, ready for the scanner.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.output.lines()
    }
}

/// Concatenate per-slot captures into one parse document.
pub fn into_document(captures: &[SlotCapture]) -> String {
    let mut doc = String::new();
    for capture in captures {
        doc.push_str(&capture.output);
        if !capture.output.ends_with('\n') {
            doc.push('\n');
        }
    }
    doc
}

/// An open interactive shell on one device.
pub struct DeviceSession {
    transport: SshTransport,
    channel: Channel<Msg>,
}

impl DeviceSession {
    /// Connect, open the shell, drain the banner, and disable
    /// pagination.
    pub async fn open(config: CollectorConfig) -> Result<Self> {
        let transport = SshTransport::connect(config).await?;
        let channel = transport.open_channel().await?;

        let mut session = Self { transport, channel };

        // Login banner and initial prompt are noise; let them settle.
        let banner = session.read_until_quiet(None).await?;
        debug!("banner: {} bytes", banner.len());

        session.send_line(PAGING_OFF_COMMAND).await?;
        session.read_until_quiet(None).await?;

        Ok(session)
    }

    /// Capture the ONU listing for one slot.
    pub async fn capture_slot(&mut self, slot: u8) -> Result<SlotCapture> {
        let command = format!("dis onu slot {slot}");
        info!("{}: {}", self.transport.config().host, command);

        self.send_line(&command).await?;
        let output = self.read_until_quiet(Some(COMPLETION_MARKER)).await?;

        Ok(SlotCapture { slot, output })
    }

    /// Capture every populated slot on the device.
    ///
    /// Slots answering with a no-card error are skipped, matching the
    /// operator workflow of probing all bays.
    pub async fn capture_device(&mut self) -> Result<Vec<SlotCapture>> {
        let mut captures = Vec::new();
        for slot in slots() {
            let capture = self.capture_slot(slot).await?;
            if capture.output.contains(NO_CARD_MARKER) {
                info!("slot {slot}: no card, skipped");
                continue;
            }
            captures.push(capture);
        }
        Ok(captures)
    }

    /// Close the shell and the connection.
    pub async fn close(self) -> Result<()> {
        self.channel.eof().await.map_err(SessionError::Ssh)?;
        self.transport.close().await
    }

    async fn send_line(&mut self, line: &str) -> Result<()> {
        let payload = format!("{line}\n");
        self.channel
            .data(payload.as_bytes())
            .await
            .map_err(SessionError::Ssh)?;
        Ok(())
    }

    /// Accumulate channel output until the completion marker shows
    /// up, the channel stays quiet for the configured period, or the
    /// hard ceiling passes. Pagination prompts are answered along the
    /// way. Whatever was collected is returned.
    async fn read_until_quiet(&mut self, marker: Option<&str>) -> Result<String> {
        let quiet_period = self.transport.config().quiet_period;
        let deadline = Instant::now() + self.transport.config().command_timeout;
        let mut output = String::new();

        loop {
            if Instant::now() >= deadline {
                warn!("capture hit the {:?} ceiling", self.transport.config().command_timeout);
                break;
            }

            let msg = match tokio::time::timeout(quiet_period, self.channel.wait()).await {
                // Quiet period elapsed with no new data; done.
                Err(_) => break,
                Ok(None) => {
                    if output.is_empty() {
                        return Err(SessionError::Closed.into());
                    }
                    break;
                }
                Ok(Some(msg)) => msg,
            };

            if let ChannelMsg::Data { ref data } = msg {
                let chunk = String::from_utf8_lossy(data);
                output.push_str(&chunk);

                if marker.is_some_and(|m| output.contains(m)) {
                    break;
                }
                if chunk.contains(PAGING_MARKER) {
                    self.channel
                        .data(&b" "[..])
                        .await
                        .map_err(SessionError::Ssh)?;
                }
            }
        }

        Ok(output)
    }
}
