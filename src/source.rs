//! Reading capture documents from disk.
//!
//! Field captures arrive in whatever encoding the operator's terminal
//! emitted. Decoding tries a fixed preference order - strict UTF-8,
//! then GBK, then GB18030 - and gives up with
//! [`SourceError::UnreadableInput`] only when every attempt reports
//! decode errors. (GB2312 labels resolve to GBK; GB18030 takes the
//! third slot as its strict superset.)

use std::fs;
use std::path::Path;

use encoding_rs::{Encoding, GB18030, GBK};
use log::debug;

use crate::error::SourceError;

/// Encodings tried after strict UTF-8, in preference order.
static FALLBACK_ENCODINGS: [&Encoding; 2] = [GBK, GB18030];

/// Read and decode one capture document.
pub fn read_text(path: &Path) -> Result<String, SourceError> {
    let bytes = fs::read(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    decode(&bytes).ok_or_else(|| SourceError::UnreadableInput {
        path: path.to_path_buf(),
    })
}

/// Decode bytes under the fixed encoding preference order.
///
/// Returns `None` when no attempt decodes cleanly.
fn decode(bytes: &[u8]) -> Option<String> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Some(text.to_owned());
    }

    for encoding in FALLBACK_ENCODINGS {
        let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
        if !had_errors {
            debug!("decoded capture as {}", encoding.name());
            return Some(text.into_owned());
        }
    }

    None
}
