//! lexigraph CLI
//!
//! Command-line front end for the vocabulary engine:
//! - weighted search over concepts and concept schemes
//! - URI resolution into contextual records
//! - strict/lenient classification of metadata properties
//! - snapshot cache maintenance
//!
//! Every command prints the same JSON envelope the service hands to its
//! routing layer.

use anyhow::Result;
use clap::{Parser, Subcommand};
use lexigraph_api::{Outcome, SearchOutcome, ServiceConfig, VocabService};
use lexigraph_store::EntityKind;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lexigraph")]
#[command(author, version, about = "SKOS vocabulary search and resolution")]
struct Cli {
    /// Vocabulary source file (overrides LEXIGRAPH_VOCAB_SOURCE).
    #[arg(long, global = true)]
    source: Option<PathBuf>,

    /// Snapshot file (overrides LEXIGRAPH_SNAPSHOT).
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search concepts by weighted label/namespace match.
    ///
    /// An input of the form `ns:term` narrows by namespace; without a colon
    /// only the label clauses apply.
    Search {
        input: String,
        /// Search concept schemes instead of concepts.
        #[arg(long)]
        schemes: bool,
    },

    /// Resolve a concept URI into its record (labels, definition, owning
    /// scheme).
    Concept { uri: String },

    /// Resolve a concept scheme URI into its record (labels, one-hop
    /// broader/narrower schemes).
    Scheme {
        uri: String,
        /// Also list the scheme's member concepts.
        #[arg(long)]
        members: bool,
    },

    /// Classify metadata properties against the vocabulary.
    Index {
        /// Vocabulary namespace, e.g. `https://vocab.example/inst`.
        namespace: String,
        /// Recognized term names (comma separated).
        #[arg(long, value_delimiter = ',')]
        terms: Vec<String>,
        /// Property pairs as `term=value`, repeatable; validated in the
        /// order given.
        #[arg(long = "prop", value_parser = parse_property)]
        properties: Vec<(String, String)>,
        /// Match terms against concept schemes instead of values against
        /// concepts.
        #[arg(long)]
        lenient: bool,
    },

    /// Snapshot cache maintenance.
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Subcommand)]
enum CacheCommands {
    /// Rebuild the snapshot from the vocabulary source.
    Rebuild,
    /// Drop the persisted snapshot.
    Invalidate,
    /// Show snapshot location and age.
    Status,
}

fn parse_property(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(term, value)| (term.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected term=value, got `{raw}`"))
}

fn print_outcome<T: Serialize>(outcome: &Outcome<T>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(outcome)?);
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ServiceConfig::from_env();
    if let Some(source) = cli.source {
        config.vocab_source = source;
    }
    if let Some(snapshot) = cli.snapshot {
        config.snapshot_path = snapshot;
    }
    let service = VocabService::new(config);

    match cli.command {
        Commands::Search { input, schemes } => {
            let kind = if schemes {
                EntityKind::ConceptScheme
            } else {
                EntityKind::Concept
            };
            let outcome = match service.search(&input, kind) {
                Ok(SearchOutcome::Ranked(hits)) => Outcome::success(hits),
                Ok(SearchOutcome::NoMatch) => Outcome::empty(),
                Err(err) => Outcome::failure(err),
            };
            print_outcome(&outcome)?;
        }
        Commands::Concept { uri } => {
            print_outcome(&Outcome::from_result(service.concept(&uri)))?;
        }
        Commands::Scheme { uri, members } => {
            let result = if members {
                service.scheme_concepts(&uri)
            } else {
                service.scheme(&uri)
            };
            print_outcome(&Outcome::from_result(result))?;
        }
        Commands::Index {
            namespace,
            terms,
            properties,
            lenient,
        } => {
            let result = if lenient {
                service.index_lenient(&namespace, &terms, &properties)
            } else {
                service.index_strict(&namespace, &terms, &properties)
            };
            let outcome = match result {
                Ok(buckets) => Outcome::success(buckets),
                Err(err) => Outcome::failure(err),
            };
            print_outcome(&outcome)?;
        }
        Commands::Cache { command } => match command {
            CacheCommands::Rebuild => {
                let store = service.cache().load(true)?;
                println!(
                    "{}",
                    serde_json::json!({ "rebuilt": true, "triples": store.len() })
                );
            }
            CacheCommands::Invalidate => {
                service.cache().invalidate()?;
                println!("{}", serde_json::json!({ "invalidated": true }));
            }
            CacheCommands::Status => {
                let config = service.cache().config();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "source": config.source,
                        "snapshot": config.snapshot_path,
                        "snapshot_age_secs": service.cache().snapshot_age().map(|age| age.as_secs()),
                        "max_age_hours": config.max_age_hours,
                    }))?
                );
            }
        },
    }

    Ok(())
}
