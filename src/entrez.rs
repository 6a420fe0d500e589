//! NCBI Entrez EFetch access for RefSeq transcript records.
//!
//! [`RecordSource`] is the seam the transcript model fetches through;
//! [`EntrezClient`] is the blocking HTTP implementation of it.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::config::EntrezConfig;
use crate::error::Error;
use crate::reporter::Reporter;
use crate::xml;

pub const DEFAULT_ENDPOINT: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi";
pub const DEFAULT_DATABASE: &str = "nucleotide";

const MAX_RESPONSE_BYTES: u64 = 64 * 1024 * 1024;

/// RefSeq transcript type, taken from the two-letter accession prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranscriptKind {
    /// `NM_`
    CuratedMrna,
    /// `NR_`
    CuratedNonCoding,
    /// `XM_`
    PredictedMrna,
    /// `XR_`
    PredictedNonCoding,
}

impl TranscriptKind {
    pub const ALL: [TranscriptKind; 4] = [
        Self::CuratedMrna,
        Self::CuratedNonCoding,
        Self::PredictedMrna,
        Self::PredictedNonCoding,
    ];

    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::CuratedMrna => "NM_",
            Self::CuratedNonCoding => "NR_",
            Self::PredictedMrna => "XM_",
            Self::PredictedNonCoding => "XR_",
        }
    }

    /// Model-predicted (XM/XR) rather than curated (NM/NR).
    #[must_use]
    pub fn is_predicted(self) -> bool {
        matches!(self, Self::PredictedMrna | Self::PredictedNonCoding)
    }

    #[must_use]
    pub fn is_coding(self) -> bool {
        matches!(self, Self::CuratedMrna | Self::PredictedMrna)
    }
}

impl fmt::Display for TranscriptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix().trim_end_matches('_'))
    }
}

/// Check that an identifier carries a RefSeq transcript prefix and a version suffix.
pub fn validate_transcript_id(transcript_id: &str) -> Result<TranscriptKind, Error> {
    let kind = TranscriptKind::ALL
        .into_iter()
        .find(|kind| transcript_id.starts_with(kind.prefix()))
        .ok_or_else(|| {
            Error::InvalidTranscriptId(format!(
                "{transcript_id} must start with NM_, NR_, XM_, or XR_"
            ))
        })?;

    if !transcript_id.contains('.') {
        return Err(Error::InvalidTranscriptId(format!(
            "{transcript_id} must include a version number (e.g. NM_000093.4)"
        )));
    }

    // Accessions also name files under the data directory
    if !transcript_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        || transcript_id.contains("..")
    {
        return Err(Error::InvalidTranscriptId(format!(
            "{transcript_id} contains characters not allowed in an accession"
        )));
    }

    Ok(kind)
}

/// Something that can produce the raw nested record for a transcript identifier.
pub trait RecordSource {
    /// Fetch the `GBSeq` record for `transcript_id`.
    ///
    /// Fails with [`Error::InvalidTranscriptId`] before doing any I/O when the
    /// identifier does not validate.
    fn fetch_record(&self, transcript_id: &str) -> Result<Value, Error>;
}

/// Blocking EFetch client.
#[derive(Debug, Clone)]
pub struct EntrezClient {
    endpoint: String,
    database: String,
    api_key: Option<String>,
    reporter: Arc<dyn Reporter>,
}

impl EntrezClient {
    #[must_use]
    pub fn new(config: &EntrezConfig, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            database: config.database.clone(),
            api_key: config.api_key.clone(),
            reporter,
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Query parameters sent for `transcript_id`.
    #[must_use]
    pub fn query_params(&self, transcript_id: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("db", self.database.clone()),
            ("id", transcript_id.to_string()),
            ("retmode", "xml".to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("api_key", key.clone()));
        }
        params
    }

    /// GET the raw XML payload for a validated identifier.
    fn get_xml(&self, transcript_id: &str) -> Result<String, Error> {
        let mut request = ureq::get(&self.endpoint);
        for (key, value) in self.query_params(transcript_id) {
            request = request.query(key, value);
        }

        let transport = |source| Error::Transport {
            transcript_id: transcript_id.to_string(),
            source,
        };

        let mut response = request.call().map_err(transport)?;
        response
            .body_mut()
            .with_config()
            .limit(MAX_RESPONSE_BYTES)
            .read_to_string()
            .map_err(transport)
    }
}

impl RecordSource for EntrezClient {
    fn fetch_record(&self, transcript_id: &str) -> Result<Value, Error> {
        if let Err(e) = validate_transcript_id(transcript_id) {
            self.reporter.error(&e.to_string());
            return Err(e);
        }

        self.reporter
            .debug(&format!("fetching {transcript_id} from {}", self.endpoint));

        let record = self
            .get_xml(transcript_id)
            .and_then(|payload| xml::parse_xml(&payload))
            .and_then(extract_gbseq);

        if let Err(e) = &record {
            self.reporter
                .error(&format!("error fetching transcript {transcript_id}: {e}"));
        }
        record
    }
}

/// Strip the `GBSet` wrapper and return the (first) `GBSeq` record.
pub fn extract_gbseq(mut document: Value) -> Result<Value, Error> {
    if let Some(set) = document.get_mut("GBSet") {
        return match set.get_mut("GBSeq").map(Value::take) {
            Some(Value::Array(records)) => records
                .into_iter()
                .next()
                .ok_or_else(|| Error::Parse("GBSet contains no GBSeq record".to_string())),
            Some(Value::Null) | None => {
                Err(Error::Parse("GBSet contains no GBSeq record".to_string()))
            }
            Some(record) => Ok(record),
        };
    }

    if let Some(message) = document
        .get("eFetchResult")
        .and_then(|result| result.get("ERROR"))
        .and_then(Value::as_str)
    {
        return Err(Error::Parse(format!("NCBI returned an error: {message}")));
    }

    Err(Error::Parse("response is not a GBSet document".to_string()))
}
