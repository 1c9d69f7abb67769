//! Remote capture layer.
//!
//! Interactive SSH session bring-up, pagination suppression, and
//! per-slot capture segmentation. Everything here is plumbing around
//! the parser: it produces raw text documents and nothing else.

pub mod config;
mod session;
mod ssh;

pub use config::{AuthMethod, CollectorConfig};
pub use session::{into_document, DeviceSession, SlotCapture};
pub use ssh::SshTransport;
