//! Transcript construction: fetch, top-level field copy and the gene/CDS feature walk.

use std::sync::Arc;

use serde_json::Value;

use crate::entrez::RecordSource;
use crate::error::Error;
use crate::nested::{force_list, force_list_traced};
use crate::reporter::Reporter;

use super::types::{PopulateOptions, Transcript};

const ACCESSION: &str = "GBSeq_accession-version";
const SEQUENCE: &str = "GBSeq_sequence";
const LENGTH: &str = "GBSeq_length";
const MOL_TYPE: &str = "GBSeq_moltype";
const DEFINITION: &str = "GBSeq_definition";
const FEATURE_TABLE: &str = "GBSeq_feature-table";
const FEATURE: &str = "GBFeature";
const FEATURE_KEY: &str = "GBFeature_key";
const FEATURE_QUALS: &str = "GBFeature_quals";
const FEATURE_INTERVALS: &str = "GBFeature_intervals";
const INTERVAL: &str = "GBInterval";
const INTERVAL_FROM: &str = "GBInterval_from";
const INTERVAL_TO: &str = "GBInterval_to";
const QUALIFIER: &str = "GBQualifier";
const QUALIFIER_NAME: &str = "GBQualifier_name";
const QUALIFIER_VALUE: &str = "GBQualifier_value";

const GENE_ID_PREFIX: &str = "GeneID:";

/// Transcribe DNA to RNA by replacing every `T` with `U`.
#[must_use]
pub fn transcribe(dna: &str) -> String {
    dna.replace('T', "U")
}

impl Transcript {
    /// Fetch the record for `transcript_id` from `source` and populate a transcript from it.
    ///
    /// Source errors (invalid identifier, transport) propagate unchanged.
    pub fn fetch(
        transcript_id: &str,
        source: &dyn RecordSource,
        options: &PopulateOptions,
        reporter: Arc<dyn Reporter>,
    ) -> Result<Self, Error> {
        let record = source.fetch_record(transcript_id)?;
        Self::from_record(transcript_id, &record, options, reporter)
    }

    /// Populate a transcript from an already fetched `GBSeq` record.
    ///
    /// Fails with [`Error::MissingField`] when the record has no sequence.
    pub fn from_record(
        transcript_id: &str,
        record: &Value,
        options: &PopulateOptions,
        reporter: Arc<dyn Reporter>,
    ) -> Result<Self, Error> {
        let mut transcript = Self::unpopulated(transcript_id, reporter);
        if let Err(e) = transcript.populate(record, options) {
            transcript.reporter.error(&format!(
                "failed to populate transcript {}: {e}",
                transcript.transcript_id
            ));
            return Err(e);
        }
        Ok(transcript)
    }

    fn populate(&mut self, record: &Value, options: &PopulateOptions) -> Result<(), Error> {
        // The server-confirmed version wins over the requested one
        if let Some(accession) = record.get(ACCESSION).and_then(scalar_text) {
            self.transcript_id = accession;
        }

        let dna = record
            .get(SEQUENCE)
            .and_then(Value::as_str)
            .ok_or_else(|| Error::MissingField(SEQUENCE.to_string()))?
            .to_ascii_uppercase();
        self.rna_sequence = Some(transcribe(&dna));
        self.dna_sequence = Some(dna);

        self.length = record.get(LENGTH).and_then(scalar_text);
        self.mol_type = record.get(MOL_TYPE).and_then(scalar_text);
        self.gene_name = record.get(DEFINITION).and_then(scalar_text);

        let reporter = Arc::clone(&self.reporter);
        let reporter = reporter.as_ref();

        let table = record.get(FEATURE_TABLE).and_then(|t| t.get(FEATURE));
        let features = normalize(table, options, reporter);
        for &feature in &features {
            let quals = feature.get(FEATURE_QUALS).and_then(|q| q.get(QUALIFIER));
            match feature.get(FEATURE_KEY).and_then(Value::as_str) {
                Some("gene") => {
                    for qualifier in normalize(quals, options, reporter) {
                        self.apply_gene_qualifier(qualifier, options);
                    }
                }
                Some("CDS") => {
                    for qualifier in normalize(quals, options, reporter) {
                        self.apply_cds_qualifier(qualifier);
                    }
                    let intervals = feature
                        .get(FEATURE_INTERVALS)
                        .and_then(|i| i.get(INTERVAL));
                    let intervals = normalize(intervals, options, reporter);
                    if let Some(range) = cds_range(&intervals) {
                        self.cds_range = Some(range);
                    }
                }
                _ => {}
            }
        }

        self.reporter.debug(&format!(
            "populated {} ({} features, gene {})",
            self.transcript_id,
            features.len(),
            self.gene_symbol.as_deref().unwrap_or("unknown")
        ));
        Ok(())
    }

    /// Later qualifiers overwrite earlier ones, across all gene features.
    fn apply_gene_qualifier(&mut self, qualifier: &Value, options: &PopulateOptions) {
        let Some((name, value)) = qualifier_pair(qualifier) else {
            return;
        };
        match name {
            "gene" => self.gene_symbol = Some(value),
            "db_xref" => {
                if let Some(hgnc_id) = options.hgnc_prefix.strip(&value) {
                    self.hgnc_id = Some(hgnc_id.to_string());
                } else if let Some(gene_id) = value.strip_prefix(GENE_ID_PREFIX) {
                    self.ncbi_gene_id = Some(gene_id.to_string());
                }
            }
            _ => {}
        }
    }

    /// Later qualifiers overwrite earlier ones, across all CDS features.
    fn apply_cds_qualifier(&mut self, qualifier: &Value) {
        let Some((name, value)) = qualifier_pair(qualifier) else {
            return;
        };
        match name {
            "translation" => self.protein_sequence = Some(value),
            "protein_id" => self.protein_id = Some(value),
            _ => {}
        }
    }
}

fn normalize<'a>(
    value: Option<&'a Value>,
    options: &PopulateOptions,
    reporter: &dyn Reporter,
) -> Vec<&'a Value> {
    if options.trace_normalization {
        force_list_traced(value, reporter)
    } else {
        force_list(value)
    }
}

/// Name and value of a qualifier; valueless qualifiers (e.g. `/pseudo`) yield `None`.
fn qualifier_pair(qualifier: &Value) -> Option<(&str, String)> {
    let name = qualifier.get(QUALIFIER_NAME).and_then(Value::as_str)?;
    let value = qualifier.get(QUALIFIER_VALUE).and_then(scalar_text)?;
    Some((name, value))
}

/// First interval's start to last interval's end, as for a `join(..)` location.
fn cds_range(intervals: &[&Value]) -> Option<(u32, u32)> {
    let start = intervals
        .first()?
        .get(INTERVAL_FROM)
        .and_then(scalar_text)?
        .parse()
        .ok()?;
    let end = intervals
        .last()?
        .get(INTERVAL_TO)
        .and_then(scalar_text)?
        .parse()
        .ok()?;
    Some((start, end))
}

/// Text of a scalar record value; numbers are rendered in decimal.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::{Level, MemoryReporter};
    use crate::transcript::HgncPrefix;
    use crate::transcript::fixtures::{
        FixtureSource, cds_feature, col5a1_record, gene_feature, qual,
    };
    use serde_json::json;

    fn populate(record: Value) -> Transcript {
        Transcript::from_record(
            "NM_000093.5",
            &record,
            &PopulateOptions::default(),
            Arc::new(MemoryReporter::new()),
        )
        .unwrap()
    }

    #[test]
    fn fetch_populates_all_fields() {
        let source = FixtureSource {
            record: col5a1_record(),
        };
        let t = Transcript::fetch(
            "NM_000093.4",
            &source,
            &PopulateOptions::default(),
            Arc::new(MemoryReporter::new()),
        )
        .unwrap();

        assert_eq!(t.transcript_id(), "NM_000093.5");
        assert_eq!(t.dna_sequence(), Some("GGATGGCATAAG"));
        assert_eq!(t.rna_sequence(), Some("GGAUGGCAUAAG"));
        assert_eq!(t.gene_symbol(), Some("COL5A1"));
        assert_eq!(t.hgnc_id(), Some("2187"));
        assert_eq!(t.ncbi_gene_id(), Some("1289"));
        assert_eq!(t.protein_sequence(), Some("MA"));
        assert_eq!(t.protein_id(), Some("NP_000084.3"));
        assert_eq!(t.cds_range(), Some((3, 11)));
        assert_eq!(t.coding_sequence(), Some("ATGGCATAA"));
        assert_eq!(t.length(), Some("12"));
        assert_eq!(t.mol_type(), Some("mRNA"));
        assert_eq!(
            t.gene_name(),
            Some("Homo sapiens collagen type V alpha 1 chain (COL5A1), mRNA")
        );
    }

    #[test]
    fn fetch_propagates_identifier_error() {
        let source = FixtureSource {
            record: col5a1_record(),
        };
        for id in ["ENST00000371817.8", "NM_000093"] {
            let err = Transcript::fetch(
                id,
                &source,
                &PopulateOptions::default(),
                Arc::new(MemoryReporter::new()),
            )
            .unwrap_err();
            assert!(matches!(err, Error::InvalidTranscriptId(_)));
        }
    }

    #[test]
    fn gene_symbol_and_hgnc_from_gene_feature() {
        let t = populate(json!({
            "GBSeq_accession-version": "NM_000093.5",
            "GBSeq_sequence": "atgc",
            "GBSeq_length": "4",
            "GBSeq_moltype": "mRNA",
            "GBSeq_definition": "Fake gene record",
            "GBSeq_feature-table": {
                "GBFeature": [gene_feature(json!([
                    qual("gene", "COL5A1"),
                    qual("db_xref", "HGNC:2187")
                ]))]
            }
        }));
        assert_eq!(t.gene_symbol(), Some("COL5A1"));
        assert_eq!(t.hgnc_id(), Some("2187"));
        assert_eq!(t.length(), Some("4"));
        assert_eq!(t.gene_name(), Some("Fake gene record"));
    }

    #[test]
    fn bare_and_wrapped_features_are_equivalent() {
        let quals = json!([qual("gene", "COL5A1"), qual("db_xref", "HGNC:2187")]);
        let wrapped = populate(json!({
            "GBSeq_sequence": "atgc",
            "GBSeq_feature-table": { "GBFeature": [gene_feature(quals.clone())] }
        }));
        let bare = populate(json!({
            "GBSeq_sequence": "atgc",
            "GBSeq_feature-table": { "GBFeature": gene_feature(quals) }
        }));

        assert_eq!(bare.gene_symbol(), wrapped.gene_symbol());
        assert_eq!(bare.hgnc_id(), wrapped.hgnc_id());
        assert_eq!(bare.gene_symbol(), Some("COL5A1"));
    }

    #[test]
    fn bare_single_qualifier_is_processed() {
        let t = populate(json!({
            "GBSeq_sequence": "atgc",
            "GBSeq_feature-table": { "GBFeature": [
                gene_feature(qual("gene", "TP53")),
                cds_feature(qual("translation", "MEEP"))
            ] }
        }));
        assert_eq!(t.gene_symbol(), Some("TP53"));
        assert_eq!(t.protein_sequence(), Some("MEEP"));
        assert!(t.protein_id().is_none());
    }

    #[test]
    fn last_gene_and_cds_features_win() {
        let t = populate(json!({
            "GBSeq_sequence": "atgc",
            "GBSeq_feature-table": { "GBFeature": [
                gene_feature(json!([qual("gene", "FIRST"), qual("db_xref", "HGNC:1")])),
                cds_feature(json!([qual("protein_id", "NP_1.1"), qual("translation", "MA")])),
                gene_feature(qual("gene", "SECOND")),
                cds_feature(qual("protein_id", "NP_2.1"))
            ] }
        }));
        assert_eq!(t.gene_symbol(), Some("SECOND"));
        // Not overwritten by the second gene feature, which has no db_xref
        assert_eq!(t.hgnc_id(), Some("1"));
        assert_eq!(t.protein_id(), Some("NP_2.1"));
        assert_eq!(t.protein_sequence(), Some("MA"));
    }

    #[test]
    fn later_qualifiers_overwrite_within_a_feature() {
        let t = populate(json!({
            "GBSeq_sequence": "atgc",
            "GBSeq_feature-table": { "GBFeature": gene_feature(json!([
                qual("db_xref", "HGNC:1"),
                qual("db_xref", "HGNC:2")
            ])) }
        }));
        assert_eq!(t.hgnc_id(), Some("2"));
    }

    #[test]
    fn double_prefixed_hgnc_follows_policy() {
        let record = json!({
            "GBSeq_sequence": "atgc",
            "GBSeq_feature-table": { "GBFeature": gene_feature(qual("db_xref", "HGNC:HGNC:2197")) }
        });
        assert_eq!(populate(record.clone()).hgnc_id(), Some("HGNC:2197"));

        let options = PopulateOptions {
            hgnc_prefix: HgncPrefix::CollapseRepeated,
            ..PopulateOptions::default()
        };
        let t = Transcript::from_record(
            "NM_000093.5",
            &record,
            &options,
            Arc::new(MemoryReporter::new()),
        )
        .unwrap();
        assert_eq!(t.hgnc_id(), Some("2197"));
    }

    #[test]
    fn other_feature_kinds_are_ignored() {
        let t = populate(json!({
            "GBSeq_sequence": "atgc",
            "GBSeq_feature-table": { "GBFeature": [
                { "GBFeature_key": "exon", "GBFeature_quals": { "GBQualifier": qual("gene", "EXON") } },
                { "GBFeature_key": "misc_feature", "GBFeature_quals": { "GBQualifier": qual("translation", "XX") } }
            ] }
        }));
        assert!(t.gene_symbol().is_none());
        assert!(t.protein_sequence().is_none());
    }

    #[test]
    fn valueless_qualifiers_are_skipped() {
        let t = populate(json!({
            "GBSeq_sequence": "atgc",
            "GBSeq_feature-table": { "GBFeature": gene_feature(json!([
                qual("gene", "COL5A1"),
                { "GBQualifier_name": "gene" },
                { "GBQualifier_name": "pseudo", "GBQualifier_value": null }
            ])) }
        }));
        assert_eq!(t.gene_symbol(), Some("COL5A1"));
    }

    #[test]
    fn record_without_features_leaves_annotations_unset() {
        for table in [json!(null), json!({}), json!({ "GBFeature": [] })] {
            let t = populate(json!({ "GBSeq_sequence": "atgc", "GBSeq_feature-table": table }));
            assert_eq!(t.dna_sequence(), Some("ATGC"));
            assert!(t.gene_symbol().is_none());
            assert!(t.hgnc_id().is_none());
            assert!(t.protein_sequence().is_none());
            assert!(t.protein_id().is_none());
            assert!(t.cds_range().is_none());
        }
    }

    #[test]
    fn optional_scalars_absent_are_unset() {
        let t = populate(json!({ "GBSeq_sequence": "atgc" }));
        assert_eq!(t.transcript_id(), "NM_000093.5");
        assert!(t.length().is_none());
        assert!(t.mol_type().is_none());
        assert!(t.gene_name().is_none());
    }

    #[test]
    fn numeric_length_is_rendered_as_text() {
        let t = populate(json!({ "GBSeq_sequence": "atgc", "GBSeq_length": 4 }));
        assert_eq!(t.length(), Some("4"));
    }

    #[test]
    fn missing_sequence_fails_and_is_logged() {
        for record in [
            json!({ "GBSeq_accession-version": "NM_000093.5" }),
            json!({ "GBSeq_sequence": null }),
            json!(null),
        ] {
            let reporter = Arc::new(MemoryReporter::new());
            let err = Transcript::from_record(
                "NM_000093.5",
                &record,
                &PopulateOptions::default(),
                reporter.clone(),
            )
            .unwrap_err();
            assert!(matches!(err, Error::MissingField(ref f) if f == "GBSeq_sequence"));
            assert_eq!(reporter.messages(Level::Error).len(), 1);
        }
    }

    #[test]
    fn transcription_preserves_length_and_case() {
        let t = populate(json!({ "GBSeq_sequence": "acgtTTgcaNnt" }));
        let dna = t.dna_sequence().unwrap();
        let rna = t.rna_sequence().unwrap();
        assert_eq!(dna, "ACGTTTGCANNT");
        assert_eq!(rna, "ACGUUUGCANNU");
        assert_eq!(dna.len(), rna.len());
        assert_eq!(rna, transcribe(dna));
        assert!(!rna.contains('T'));
    }

    #[test]
    fn split_cds_takes_outer_bounds() {
        let t = populate(json!({
            "GBSeq_sequence": "atgc",
            "GBSeq_feature-table": { "GBFeature": {
                "GBFeature_key": "CDS",
                "GBFeature_intervals": { "GBInterval": [
                    { "GBInterval_from": "142", "GBInterval_to": "516" },
                    { "GBInterval_from": "609", "GBInterval_to": "1621" }
                ] }
            } }
        }));
        assert_eq!(t.cds_range(), Some((142, 1621)));
    }

    #[test]
    fn trace_normalization_reports_each_descent() {
        let reporter = Arc::new(MemoryReporter::new());
        let options = PopulateOptions {
            trace_normalization: true,
            ..PopulateOptions::default()
        };
        Transcript::from_record("NM_000093.5", &col5a1_record(), &options, reporter.clone())
            .unwrap();

        let traces: Vec<_> = reporter
            .messages(Level::Debug)
            .into_iter()
            .filter(|m| m.starts_with("force_list"))
            .collect();
        // feature table, gene quals, CDS quals, CDS intervals
        assert_eq!(traces.len(), 4);
        assert!(traces[0].contains("length 3"));
        assert!(traces[3].contains("single object"));
    }
}
