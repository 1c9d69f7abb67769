//! Batch processing of capture documents.
//!
//! One document in, one report out. A directory fans out to every
//! `.txt` file it contains; each document is processed independently
//! and a failing one never blocks its siblings.

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::{Error, Result};
use crate::parse::parse_text;
use crate::render::report_to_string;
use crate::source::read_text;

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Reports written, one per successfully processed document.
    pub reports: Vec<PathBuf>,
    /// Documents that failed, with the error that stopped each one.
    pub failures: Vec<(PathBuf, Error)>,
}

impl BatchSummary {
    /// True when every document produced a report.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Process one capture document into `<stem>-report.txt` under
/// `out_dir`. Returns the report path.
pub fn process_document(path: &Path, out_dir: &Path) -> Result<PathBuf> {
    let text = read_text(path)?;
    let table = parse_text(&text);

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "capture".to_owned());
    let report_path = out_dir.join(format!("{stem}-report.txt"));

    fs::write(&report_path, report_to_string(&table))?;
    info!("report written: {}", report_path.display());
    Ok(report_path)
}

/// Process a single file or every `.txt` document in a directory.
///
/// Fails fast only when there is nothing to do; individual document
/// failures are logged, recorded in the summary, and skipped.
pub fn run_batch(input: &Path, out_dir: &Path) -> Result<BatchSummary> {
    let documents = find_documents(input)?;
    if documents.is_empty() {
        return Err(Error::NoDocuments {
            path: input.to_path_buf(),
        });
    }

    let mut summary = BatchSummary::default();
    for doc in documents {
        match process_document(&doc, out_dir) {
            Ok(report) => summary.reports.push(report),
            Err(err) => {
                warn!("skipping {}: {err}", doc.display());
                summary.failures.push((doc, err));
            }
        }
    }
    Ok(summary)
}

/// Expand the input path to the list of documents to process, sorted
/// for deterministic batch order.
fn find_documents(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut documents = Vec::new();
    for entry in fs::read_dir(input)? {
        let path = entry?.path();
        let is_txt = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
        if path.is_file() && is_txt {
            documents.push(path);
        }
    }
    documents.sort();
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;

    const CAPTURE: &str = "\
dis onu slot 3
-- Olt3/0/5 --
aaaa-bbbb-cccc Onu3/5/1 Up 101
";

    #[test]
    fn test_single_file_produces_report() {
        let dir = tempfile::tempdir().unwrap();
        let doc = dir.path().join("olt-a.txt");
        fs::write(&doc, CAPTURE).unwrap();

        let summary = run_batch(&doc, dir.path()).unwrap();
        assert!(summary.is_clean());
        assert_eq!(summary.reports, vec![dir.path().join("olt-a-report.txt")]);

        let report = fs::read_to_string(&summary.reports[0]).unwrap();
        assert!(report.contains("slot 3"));
        assert!(report.ends_with("idle PON ports: 143\n"));
    }

    #[test]
    fn test_unreadable_document_does_not_block_siblings() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.txt"), [0xff, 0xff, 0xff]).unwrap();
        fs::write(dir.path().join("good.txt"), CAPTURE).unwrap();

        let summary = run_batch(dir.path(), dir.path()).unwrap();
        assert_eq!(summary.reports, vec![dir.path().join("good-report.txt")]);
        assert_eq!(summary.failures.len(), 1);
        assert!(matches!(
            &summary.failures[0].1,
            Error::Source(SourceError::UnreadableInput { .. })
        ));
    }

    #[test]
    fn test_empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            run_batch(dir.path(), dir.path()),
            Err(Error::NoDocuments { .. })
        ));
    }

    #[test]
    fn test_non_txt_files_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.md"), "not a capture").unwrap();
        fs::write(dir.path().join("olt-b.TXT"), CAPTURE).unwrap();

        let summary = run_batch(dir.path(), dir.path()).unwrap();
        assert_eq!(summary.reports.len(), 1);
        assert!(summary.is_clean());
    }
}
