//! Record fixtures shared by the transcript tests.

use serde_json::{Value, json};

use crate::entrez::{RecordSource, validate_transcript_id};
use crate::error::Error;

/// Serves one canned record for any valid identifier.
pub(crate) struct FixtureSource {
    pub record: Value,
}

impl RecordSource for FixtureSource {
    fn fetch_record(&self, transcript_id: &str) -> Result<Value, Error> {
        validate_transcript_id(transcript_id)?;
        Ok(self.record.clone())
    }
}

pub(crate) fn gene_feature(quals: Value) -> Value {
    json!({ "GBFeature_key": "gene", "GBFeature_quals": { "GBQualifier": quals } })
}

pub(crate) fn cds_feature(quals: Value) -> Value {
    json!({ "GBFeature_key": "CDS", "GBFeature_quals": { "GBQualifier": quals } })
}

pub(crate) fn qual(name: &str, value: &str) -> Value {
    json!({ "GBQualifier_name": name, "GBQualifier_value": value })
}

/// A trimmed COL5A1 mRNA record in the shape the XML conversion produces.
pub(crate) fn col5a1_record() -> Value {
    json!({
        "GBSeq_locus": "NM_000093",
        "GBSeq_length": "12",
        "GBSeq_moltype": "mRNA",
        "GBSeq_definition": "Homo sapiens collagen type V alpha 1 chain (COL5A1), mRNA",
        "GBSeq_accession-version": "NM_000093.5",
        "GBSeq_feature-table": {
            "GBFeature": [
                {
                    "GBFeature_key": "source",
                    "GBFeature_quals": { "GBQualifier": [
                        qual("organism", "Homo sapiens"),
                        qual("mol_type", "mRNA")
                    ] }
                },
                gene_feature(json!([
                    qual("gene", "COL5A1"),
                    qual("db_xref", "GeneID:1289"),
                    qual("db_xref", "HGNC:2187"),
                    qual("db_xref", "MIM:120215")
                ])),
                {
                    "GBFeature_key": "CDS",
                    "GBFeature_intervals": { "GBInterval": {
                        "GBInterval_from": "3",
                        "GBInterval_to": "11",
                        "GBInterval_accession": "NM_000093.5"
                    } },
                    "GBFeature_quals": { "GBQualifier": [
                        qual("gene", "COL5A1"),
                        qual("codon_start", "1"),
                        qual("protein_id", "NP_000084.3"),
                        qual("translation", "MA")
                    ] }
                }
            ]
        },
        "GBSeq_sequence": "ggatggcataag"
    })
}
