//! GenBank SeqKit: fetch RefSeq transcript records from NCBI, reduce them to
//! typed fields and export FASTA or pseudo-GenBank text.

pub mod error;

pub mod cli;
pub mod config;
pub mod entrez;
pub mod fasta;
pub mod genbank;
pub mod logging;
pub mod nested;
pub mod persist;
pub mod reporter;
pub mod transcript;
pub mod xml;
