//! Saving fetched records as JSON for offline inspection and test fixtures.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use crate::entrez::{RecordSource, validate_transcript_id};
use crate::error::Error;
use crate::reporter::Reporter;

/// Where [`save_record_json`] writes a record.
#[derive(Debug, Clone)]
pub enum SaveTarget {
    /// Write exactly to this file.
    File(PathBuf),
    /// Write `{transcript_id}.json` inside this directory, creating it if needed.
    DataDir(PathBuf),
}

impl SaveTarget {
    #[must_use]
    pub fn resolve(&self, transcript_id: &str) -> PathBuf {
        match self {
            Self::File(path) => path.clone(),
            Self::DataDir(dir) => record_path(dir, transcript_id),
        }
    }
}

/// Path of the saved record for `transcript_id` inside `dir`.
#[must_use]
pub fn record_path(dir: &Path, transcript_id: &str) -> PathBuf {
    dir.join(format!("{transcript_id}.json"))
}

/// Fetch the raw record for `transcript_id` and write it as indented JSON.
///
/// Returns the path written. With `pretty_print`, the record is also printed to stdout.
pub fn save_record_json(
    source: &dyn RecordSource,
    transcript_id: &str,
    target: &SaveTarget,
    pretty_print: bool,
    reporter: &dyn Reporter,
) -> Result<PathBuf, Error> {
    let path = target.resolve(transcript_id);
    let result = fetch_and_write(source, transcript_id, &path, pretty_print, reporter);
    if let Err(e) = &result {
        reporter.error(&format!("failed to save record for {transcript_id}: {e}"));
    }
    result.map(|()| path)
}

fn fetch_and_write(
    source: &dyn RecordSource,
    transcript_id: &str,
    path: &Path,
    pretty_print: bool,
    reporter: &dyn Reporter,
) -> Result<(), Error> {
    validate_transcript_id(transcript_id)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    reporter.debug(&format!(
        "fetching transcript record {transcript_id} to {}",
        path.display()
    ));
    let record = source.fetch_record(transcript_id)?;

    let json = serde_json::to_string_pretty(&record)?;
    if pretty_print {
        println!("{json}");
    }
    fs::write(path, json)?;

    reporter.debug(&format!(
        "record for {transcript_id} saved to {}",
        path.display()
    ));
    Ok(())
}

/// Read a record previously written by [`save_record_json`].
pub fn load_record_json(path: &Path) -> Result<Value, Error> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Serves saved records from a directory of `{transcript_id}.json` files.
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    dir: PathBuf,
    reporter: Arc<dyn Reporter>,
}

impl JsonDirSource {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            dir: dir.into(),
            reporter,
        }
    }

    fn load(&self, transcript_id: &str) -> Result<Value, Error> {
        validate_transcript_id(transcript_id)?;
        let path = record_path(&self.dir, transcript_id);
        if !path.is_file() {
            return Err(Error::MissingRecord {
                transcript_id: transcript_id.to_string(),
                path,
            });
        }
        self.reporter
            .debug(&format!("loading {transcript_id} from {}", path.display()));
        load_record_json(&path)
    }
}

impl RecordSource for JsonDirSource {
    fn fetch_record(&self, transcript_id: &str) -> Result<Value, Error> {
        let record = self.load(transcript_id);
        if let Err(e) = &record {
            self.reporter
                .error(&format!("error loading transcript {transcript_id}: {e}"));
        }
        record
    }
}
