//! FASTA and pseudo-GenBank export of a populated transcript.
//!
//! Both exporters select the sequence the same way: an explicit sequence wins,
//! otherwise the transcript's DNA, RNA or protein sequence by type. A missing or
//! empty sequence is exported as an empty line with a warning; only an unknown
//! sequence type is an error.

use crate::error::Error;
use crate::{fasta, genbank};

use super::types::{SequenceType, Transcript};

impl Transcript {
    /// Render `>{id} | {type}` and the selected sequence.
    ///
    /// `seq_type` is one of `DNA`, `RNA` or `protein`, case-insensitive.
    pub fn as_fasta(&self, sequence: Option<&str>, seq_type: &str) -> Result<String, Error> {
        let (seq_type, sequence) = self.select_sequence(sequence, seq_type)?;
        let text = fasta::render_record(&self.transcript_id, seq_type.label(), sequence);
        self.reporter.debug(&format!(
            "generated FASTA for {} ({seq_type})",
            self.transcript_id
        ));
        Ok(text)
    }

    /// Render a LOCUS/DEFINITION/ORIGIN record holding the selected sequence.
    ///
    /// Sequence selection and errors match [`Self::as_fasta`].
    pub fn as_genbank(&self, sequence: Option<&str>, seq_type: &str) -> Result<String, Error> {
        let (seq_type, sequence) = self.select_sequence(sequence, seq_type)?;
        let text = genbank::render_record(&self.transcript_id, seq_type.label(), sequence);
        self.reporter.debug(&format!(
            "generated GenBank record for {} ({seq_type})",
            self.transcript_id
        ));
        Ok(text)
    }

    fn select_sequence<'a>(
        &'a self,
        sequence: Option<&'a str>,
        seq_type: &str,
    ) -> Result<(SequenceType, &'a str), Error> {
        let seq_type: SequenceType = seq_type.parse()?;
        let selected = sequence.or_else(|| self.sequence(seq_type)).unwrap_or("");
        if selected.is_empty() {
            self.reporter.warn(&format!(
                "no {seq_type} sequence available for {}; exporting an empty sequence",
                self.transcript_id
            ));
        }
        Ok((seq_type, selected))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::{Level, MemoryReporter};
    use crate::transcript::PopulateOptions;
    use crate::transcript::fixtures::col5a1_record;
    use std::sync::Arc;

    fn dna_only(reporter: Arc<MemoryReporter>) -> Transcript {
        let mut t = Transcript::unpopulated("NM_000093.5", reporter);
        t.dna_sequence = Some("ATGC".to_string());
        t
    }

    #[test]
    fn fasta_dna_exact_output() {
        let t = dna_only(Arc::new(MemoryReporter::new()));
        assert_eq!(
            t.as_fasta(None, "DNA").unwrap(),
            ">NM_000093.5 | DNA\nATGC"
        );
    }

    #[test]
    fn fasta_type_is_case_insensitive() {
        let t = dna_only(Arc::new(MemoryReporter::new()));
        assert_eq!(t.as_fasta(None, "dna").unwrap(), t.as_fasta(None, "DNA").unwrap());
    }

    #[test]
    fn fasta_explicit_sequence_wins() {
        let t = dna_only(Arc::new(MemoryReporter::new()));
        assert_eq!(
            t.as_fasta(Some("GGCC"), "DNA").unwrap(),
            ">NM_000093.5 | DNA\nGGCC"
        );
    }

    #[test]
    fn fasta_selects_by_type_after_population() {
        let t = Transcript::from_record(
            "NM_000093.5",
            &col5a1_record(),
            &PopulateOptions::default(),
            Arc::new(MemoryReporter::new()),
        )
        .unwrap();
        assert_eq!(
            t.as_fasta(None, "RNA").unwrap(),
            ">NM_000093.5 | RNA\nGGAUGGCAUAAG"
        );
        assert_eq!(
            t.as_fasta(None, "protein").unwrap(),
            ">NM_000093.5 | Protein\nMA"
        );
    }

    #[test]
    fn fasta_unknown_type_fails() {
        let reporter = Arc::new(MemoryReporter::new());
        let t = dna_only(reporter.clone());
        let err = t.as_fasta(None, "invalid").unwrap_err();
        assert!(matches!(err, Error::InvalidSequenceType(ref s) if s == "invalid"));
        // Explicit sequences do not bypass type validation
        assert!(t.as_fasta(Some("ATGC"), "cdna").is_err());
        assert!(reporter.entries().is_empty());
    }

    #[test]
    fn fasta_missing_sequence_warns_and_exports_empty() {
        let reporter = Arc::new(MemoryReporter::new());
        let t = dna_only(reporter.clone());
        let text = t.as_fasta(None, "protein").unwrap();
        assert_eq!(text, ">NM_000093.5 | Protein\n");

        let warnings = reporter.messages(Level::Warn);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Protein"));
        assert!(warnings[0].contains("NM_000093.5"));
    }

    #[test]
    fn empty_sequence_is_treated_as_missing() {
        let reporter = Arc::new(MemoryReporter::new());
        let mut t = dna_only(reporter.clone());
        t.rna_sequence = Some(String::new());
        assert_eq!(t.as_fasta(None, "RNA").unwrap(), ">NM_000093.5 | RNA\n");
        assert_eq!(reporter.messages(Level::Warn).len(), 1);
    }

    #[test]
    fn successful_export_is_traced() {
        let reporter = Arc::new(MemoryReporter::new());
        let t = dna_only(reporter.clone());
        t.as_fasta(None, "DNA").unwrap();
        t.as_genbank(None, "DNA").unwrap();
        let debug = reporter.messages(Level::Debug);
        assert_eq!(debug.len(), 2);
        assert!(debug[0].contains("FASTA") && debug[0].contains("NM_000093.5"));
        assert!(debug[1].contains("GenBank") && debug[1].contains("DNA"));
        assert!(reporter.messages(Level::Warn).is_empty());
    }

    #[test]
    fn genbank_sections_in_order() {
        let t = dna_only(Arc::new(MemoryReporter::new()));
        let gb = t.as_genbank(None, "DNA").unwrap();

        let locus = gb.find("LOCUS").unwrap();
        let origin = gb.find("ORIGIN").unwrap();
        let end = gb.rfind("//").unwrap();
        assert!(locus < origin);
        let body = &gb[origin + "ORIGIN".len()..end];
        assert_eq!(body.trim(), "ATGC");
        assert!(gb.contains("NM_000093.5"));
        assert!(gb.contains("DEFINITION  DNA"));
    }

    #[test]
    fn genbank_unknown_type_fails() {
        let t = dna_only(Arc::new(MemoryReporter::new()));
        assert!(matches!(
            t.as_genbank(None, "invalid"),
            Err(Error::InvalidSequenceType(_))
        ));
    }

    #[test]
    fn genbank_missing_sequence_warns() {
        let reporter = Arc::new(MemoryReporter::new());
        let t = Transcript::unpopulated("NM_000093.5", reporter.clone());
        let gb = t.as_genbank(None, "RNA").unwrap();
        assert!(gb.contains("ORIGIN\n\n//"));
        assert_eq!(reporter.messages(Level::Warn).len(), 1);
    }
}
