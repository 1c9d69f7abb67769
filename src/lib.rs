//! # oltstat
//!
//! EPON OLT ONU occupancy scraper and report generator.
//!
//! The core is a failure-tolerant line scanner for `dis onu slot`
//! console captures and a dense per-(slot, PON port) occupancy table
//! with an idle-port availability view. Around it sit an
//! encoding-aware document reader, a batch driver, a plain-text
//! renderer, and an SSH collector that captures the raw documents
//! from devices.
//!
//! ## Quick Start
//!
//! ```rust
//! use oltstat::parse::parse_text;
//!
//! let table = parse_text(
//!     "dis onu slot 3\n\
//!      -- Olt3/0/5 --\n\
//!      aaaa-bbbb-cccc Onu3/5/1 Up 101\n",
//! );
//!
//! assert_eq!(table.get(3, 5).unwrap().online, 1);
//! assert!(!table.is_idle(3, 5));
//! assert_eq!(table.total_idle_count(), 143);
//! ```
//!
//! Remote capture:
//!
//! ```rust,no_run
//! use oltstat::collect::{CollectorConfig, DeviceSession, into_document};
//! use oltstat::parse::parse_text;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), oltstat::Error> {
//!     let config = CollectorConfig::new("172.10.1.26", "admin").password("secret");
//!     let mut session = DeviceSession::open(config).await?;
//!     let captures = session.capture_device().await?;
//!     session.close().await?;
//!
//!     let table = parse_text(&into_document(&captures));
//!     println!("idle PON ports: {}", table.total_idle_count());
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod collect;
pub mod error;
pub mod occupancy;
pub mod parse;
pub mod render;
pub mod source;

// Re-export main types for convenience
pub use batch::{run_batch, BatchSummary};
pub use collect::{AuthMethod, CollectorConfig, DeviceSession, SlotCapture};
pub use error::{Error, Result};
pub use occupancy::{OccupancyTable, OnuState, StateCounts};
pub use parse::{parse_lines, parse_text, LineScanner};
