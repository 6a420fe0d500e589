//! Transcript model types.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;

use crate::error::Error;
use crate::reporter::Reporter;

const HGNC_PREFIX: &str = "HGNC:";

/// How the `HGNC:` prefix is removed from a gene `db_xref` value.
///
/// Some records carry the prefix twice (`HGNC:HGNC:2187`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HgncPrefix {
    /// Strip exactly one leading `HGNC:`; `HGNC:HGNC:2187` becomes `HGNC:2187`.
    #[default]
    StripSingle,
    /// Strip every leading `HGNC:`; `HGNC:HGNC:2187` becomes `2187`.
    CollapseRepeated,
}

impl HgncPrefix {
    /// The HGNC ID carried by a `db_xref` value, or `None` for other databases.
    #[must_use]
    pub fn strip(self, db_xref: &str) -> Option<&str> {
        let mut rest = db_xref.strip_prefix(HGNC_PREFIX)?;
        if self == Self::CollapseRepeated {
            while let Some(inner) = rest.strip_prefix(HGNC_PREFIX) {
                rest = inner;
            }
        }
        Some(rest)
    }
}

/// Options applied while walking a record's feature table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopulateOptions {
    pub hgnc_prefix: HgncPrefix,
    /// Report every one-or-many normalization at debug level.
    pub trace_normalization: bool,
}

/// Which of a transcript's sequences an exporter renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceType {
    Dna,
    Rna,
    Protein,
}

impl SequenceType {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Dna => "DNA",
            Self::Rna => "RNA",
            Self::Protein => "Protein",
        }
    }
}

impl FromStr for SequenceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dna" => Ok(Self::Dna),
            "rna" => Ok(Self::Rna),
            "protein" => Ok(Self::Protein),
            _ => Err(Error::InvalidSequenceType(s.to_string())),
        }
    }
}

impl fmt::Display for SequenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A RefSeq transcript record reduced to typed fields.
///
/// Built by [`Transcript::fetch`] or [`Transcript::from_record`]; the raw record
/// is not retained.
#[derive(Debug, Clone)]
pub struct Transcript {
    pub(crate) transcript_id: String,
    pub(crate) gene_symbol: Option<String>,
    pub(crate) hgnc_id: Option<String>,
    pub(crate) ncbi_gene_id: Option<String>,
    pub(crate) dna_sequence: Option<String>,
    pub(crate) rna_sequence: Option<String>,
    pub(crate) protein_sequence: Option<String>,
    pub(crate) protein_id: Option<String>,
    pub(crate) cds_range: Option<(u32, u32)>,
    pub(crate) length: Option<String>,
    pub(crate) mol_type: Option<String>,
    pub(crate) gene_name: Option<String>,
    pub(crate) reporter: Arc<dyn Reporter>,
}

impl Transcript {
    /// A transcript with only its identifier set, skipping the fetch.
    ///
    /// Construction starts from this shape; tests use it directly for the
    /// exporters' missing-data paths.
    #[must_use]
    pub(crate) fn unpopulated(transcript_id: &str, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            transcript_id: transcript_id.to_string(),
            gene_symbol: None,
            hgnc_id: None,
            ncbi_gene_id: None,
            dna_sequence: None,
            rna_sequence: None,
            protein_sequence: None,
            protein_id: None,
            cds_range: None,
            length: None,
            mol_type: None,
            gene_name: None,
            reporter,
        }
    }

    /// Accession with version, as confirmed by the server when available.
    #[must_use]
    pub fn transcript_id(&self) -> &str {
        &self.transcript_id
    }

    #[must_use]
    pub fn gene_symbol(&self) -> Option<&str> {
        self.gene_symbol.as_deref()
    }

    /// HGNC ID without the `HGNC:` prefix.
    #[must_use]
    pub fn hgnc_id(&self) -> Option<&str> {
        self.hgnc_id.as_deref()
    }

    /// NCBI Gene ID from the gene feature's `GeneID:` cross-reference.
    #[must_use]
    pub fn ncbi_gene_id(&self) -> Option<&str> {
        self.ncbi_gene_id.as_deref()
    }

    #[must_use]
    pub fn dna_sequence(&self) -> Option<&str> {
        self.dna_sequence.as_deref()
    }

    #[must_use]
    pub fn rna_sequence(&self) -> Option<&str> {
        self.rna_sequence.as_deref()
    }

    #[must_use]
    pub fn protein_sequence(&self) -> Option<&str> {
        self.protein_sequence.as_deref()
    }

    #[must_use]
    pub fn protein_id(&self) -> Option<&str> {
        self.protein_id.as_deref()
    }

    /// 1-based inclusive CDS coordinates on the transcript.
    #[must_use]
    pub fn cds_range(&self) -> Option<(u32, u32)> {
        self.cds_range
    }

    #[must_use]
    pub fn length(&self) -> Option<&str> {
        self.length.as_deref()
    }

    #[must_use]
    pub fn mol_type(&self) -> Option<&str> {
        self.mol_type.as_deref()
    }

    /// Free-text definition line of the record.
    #[must_use]
    pub fn gene_name(&self) -> Option<&str> {
        self.gene_name.as_deref()
    }

    #[must_use]
    pub fn sequence(&self, seq_type: SequenceType) -> Option<&str> {
        match seq_type {
            SequenceType::Dna => self.dna_sequence(),
            SequenceType::Rna => self.rna_sequence(),
            SequenceType::Protein => self.protein_sequence(),
        }
    }

    /// The DNA slice covered by [`Self::cds_range`], if both are present and consistent.
    #[must_use]
    pub fn coding_sequence(&self) -> Option<&str> {
        let (start, end) = self.cds_range?;
        let dna = self.dna_sequence.as_deref()?;
        if start == 0 || start > end {
            return None;
        }
        dna.get(start as usize - 1..end as usize)
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Transcript {}", self.transcript_id)
    }
}
