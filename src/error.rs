//! Error types for the GenBank SeqKit library.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching, populating or exporting transcripts.
#[derive(Debug, Error)]
pub enum Error {
    /// The transcript identifier lacks a recognized RefSeq prefix or a version suffix.
    #[error("invalid transcript ID: {0}")]
    InvalidTranscriptId(String),

    /// The remote call failed at the HTTP or network layer.
    #[error("failed to fetch transcript {transcript_id}: {source}")]
    Transport {
        transcript_id: String,
        #[source]
        source: ureq::Error,
    },

    /// A record lacks a field that a usable transcript requires.
    #[error("record is missing required field '{0}'")]
    MissingField(String),

    /// An exporter was asked for a sequence kind it does not know.
    #[error("unknown sequence type '{0}': expected DNA, RNA or protein")]
    InvalidSequenceType(String),

    /// The remote payload could not be parsed or had an unexpected shape.
    #[error("{0}")]
    Parse(String),

    /// No saved record exists for the transcript in the data directory.
    #[error("no saved record for {transcript_id} at {}", path.display())]
    MissingRecord {
        transcript_id: String,
        path: PathBuf,
    },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A JSON record could not be read or written.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
