use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;

use genbank_seqkit::cli;
use genbank_seqkit::config::SeqkitConfig;
use genbank_seqkit::entrez::EntrezClient;
use genbank_seqkit::logging;
use genbank_seqkit::persist::{self, SaveTarget};
use genbank_seqkit::reporter::TracingReporter;

#[derive(Parser)]
#[command(
    name = "save_record",
    about = "Fetch a RefSeq transcript record from NCBI and save it as JSON"
)]
struct Cli {
    /// Transcript accession with version (e.g. NM_000093.5)
    transcript_id: String,

    /// Path to the JSON configuration file
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Output file (overrides the data directory)
    #[arg(short = 'o', long = "out")]
    out: Option<PathBuf>,

    /// Directory for {transcript_id}.json (defaults to the configured dataDir)
    #[arg(short = 'd', long = "data-dir")]
    data_dir: Option<PathBuf>,

    /// Also print the record to stdout
    #[arg(long = "pretty")]
    pretty: bool,
}

fn main() -> Result<()> {
    let start = Instant::now();
    let cli_args = Cli::parse();

    let config = SeqkitConfig::load(cli_args.config.as_deref())?;
    logging::init(&config.logging)?;
    let reporter = TracingReporter::shared();

    let target = match (cli_args.out, cli_args.data_dir) {
        (Some(file), _) => SaveTarget::File(file),
        (None, Some(dir)) => SaveTarget::DataDir(dir),
        (None, None) => SaveTarget::DataDir(config.data_dir.clone()),
    };

    cli::banner("Save Record");

    // ── Configuration ────────────────────────────────────
    cli::section("Configuration");

    let client = EntrezClient::new(&config.entrez, reporter.clone());
    cli::kv("Endpoint", client.endpoint());
    cli::kv("Transcript", &cli_args.transcript_id);
    cli::kv(
        "Output",
        &target.resolve(&cli_args.transcript_id).display().to_string(),
    );

    eprintln!();

    // ── Save ─────────────────────────────────────────────
    cli::section("Save");

    let path = persist::save_record_json(
        &client,
        &cli_args.transcript_id,
        &target,
        cli_args.pretty,
        reporter.as_ref(),
    )?;
    cli::success(&format!("record saved to {}", path.display()));

    cli::print_summary(start);
    Ok(())
}
