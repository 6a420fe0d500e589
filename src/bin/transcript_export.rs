use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use genbank_seqkit::cli;
use genbank_seqkit::config::SeqkitConfig;
use genbank_seqkit::entrez::{EntrezClient, RecordSource};
use genbank_seqkit::logging;
use genbank_seqkit::persist::JsonDirSource;
use genbank_seqkit::reporter::TracingReporter;
use genbank_seqkit::transcript::Transcript;

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Fasta,
    Genbank,
}

#[derive(Parser)]
#[command(
    name = "transcript_export",
    about = "Fetch a RefSeq transcript and export it as FASTA or GenBank text"
)]
struct Cli {
    /// Transcript accession with version (e.g. NM_000093.5)
    transcript_id: String,

    /// Path to the JSON configuration file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value = "fasta")]
    format: Format,

    /// Sequence to export: DNA, RNA or protein
    #[arg(short = 't', long = "type", default_value = "DNA")]
    seq_type: String,

    /// Read saved JSON records from this directory instead of NCBI
    #[arg(long = "offline")]
    offline: Option<PathBuf>,

    /// Output file (stdout when omitted)
    #[arg(short = 'o', long = "out")]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    let start = Instant::now();
    let cli_args = Cli::parse();

    let config = SeqkitConfig::load(cli_args.config.as_deref())?;
    logging::init(&config.logging)?;
    let reporter = TracingReporter::shared();

    cli::banner("Transcript Export");

    // ── Configuration ────────────────────────────────────
    cli::section("Configuration");

    let source: Box<dyn RecordSource> = match &cli_args.offline {
        Some(dir) => {
            cli::kv("Source", &dir.display().to_string());
            Box::new(JsonDirSource::new(dir, reporter.clone()))
        }
        None => {
            let client = EntrezClient::new(&config.entrez, reporter.clone());
            cli::kv("Source", client.endpoint());
            Box::new(client)
        }
    };
    cli::kv("Transcript", &cli_args.transcript_id);
    cli::kv("Sequence", &cli_args.seq_type);

    eprintln!();

    // ── Transcript ───────────────────────────────────────
    cli::section("Transcript");

    let transcript = Transcript::fetch(
        &cli_args.transcript_id,
        source.as_ref(),
        &config.populate_options(),
        reporter,
    )?;

    cli::kv("Accession", transcript.transcript_id());
    cli::kv_opt("Definition", transcript.gene_name());
    cli::kv_opt("Molecule", transcript.mol_type());
    cli::kv_opt("Length", transcript.length());
    cli::kv_opt("Gene", transcript.gene_symbol());
    cli::kv_opt("HGNC", transcript.hgnc_id());
    cli::kv_opt("Gene ID", transcript.ncbi_gene_id());
    cli::kv_opt("Protein", transcript.protein_id());
    if let Some((cds_start, cds_end)) = transcript.cds_range() {
        cli::kv("CDS", &format!("{cds_start}..{cds_end}"));
    }

    eprintln!();

    // ── Export ───────────────────────────────────────────
    cli::section("Export");

    let text = match cli_args.format {
        Format::Fasta => transcript.as_fasta(None, &cli_args.seq_type)?,
        Format::Genbank => transcript.as_genbank(None, &cli_args.seq_type)?,
    };

    if transcript
        .sequence(cli_args.seq_type.parse()?)
        .is_none_or(str::is_empty)
    {
        cli::warning(&format!("no {} sequence in record", cli_args.seq_type));
    }

    match &cli_args.out {
        Some(path) => {
            fs::write(path, format!("{text}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?;
            cli::success(&format!("written to {}", path.display()));
        }
        None => println!("{text}"),
    }

    cli::print_summary(start);
    Ok(())
}
