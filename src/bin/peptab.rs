use std::io;
use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use miette::IntoDiagnostic;
use tracing::error;

use peptab::engine::{EngineOptions, NormalizationEngine, TablePaths, TableSet};
use peptab::error::PeptabError;
use peptab::output::{JsonOutput, diagnostic_filter};
use peptab::parser::TabRecordParser;
use peptab::taxonomy::{TaxonValidator, Taxonomy};

#[derive(Parser)]
#[command(name = "peptab")]
#[command(about = "Convert UniProt TSV records into six bulk-load-ready tables")]
#[command(version, author)]
struct Cli {
    /// Minimum peptide length
    #[arg(long)]
    peptide_min: usize,

    /// Maximum peptide length
    #[arg(long)]
    peptide_max: usize,

    /// Taxons TSV input file
    #[arg(long)]
    taxons: Utf8PathBuf,

    /// Uniprot entries TSV output file
    #[arg(long)]
    uniprot_entries: Utf8PathBuf,

    /// Peptides TSV output file
    #[arg(long)]
    peptides: Utf8PathBuf,

    /// GO references TSV output file
    #[arg(long)]
    go: Utf8PathBuf,

    /// EC references TSV output file
    #[arg(long)]
    ec: Utf8PathBuf,

    /// InterPro references TSV output file
    #[arg(long)]
    interpro: Utf8PathBuf,

    /// KEGG references TSV output file
    #[arg(long)]
    kegg: Utf8PathBuf,

    /// Echo every derived row to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(diagnostic_filter(cli.verbose))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(report) = run(cli) {
        error!("{report:?}");
        if let Some(cause) = report.downcast_ref::<PeptabError>() {
            return ExitCode::from(map_exit_code(cause));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &PeptabError) -> u8 {
    match error {
        PeptabError::TaxonomyRead(_)
        | PeptabError::TaxonomyParse(_)
        | PeptabError::TableOpen { .. } => 2,
        _ => 1,
    }
}

fn run(cli: Cli) -> miette::Result<()> {
    let taxonomy = Taxonomy::from_file(&cli.taxons)?;
    let tables = TableSet::create(&TablePaths {
        uniprot_entries: cli.uniprot_entries,
        peptides: cli.peptides,
        go_references: cli.go,
        ec_references: cli.ec,
        interpro_references: cli.interpro,
        kegg_references: cli.kegg,
    })?;

    let mut engine = NormalizationEngine::new(
        TaxonValidator::new(taxonomy),
        tables,
        EngineOptions {
            peptide_min: cli.peptide_min,
            peptide_max: cli.peptide_max,
            verbose: cli.verbose,
        },
    );

    let parser = TabRecordParser::new(io::stdin().lock())?;
    for record in parser {
        let record = record?;
        engine.store(&record);
    }

    let stats = engine.finish();
    JsonOutput::print_summary(&stats).into_diagnostic()?;
    Ok(())
}
