//! ontoform CLI: ontology-driven entity entry over a triple store.

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use ontoform::config::{KbConfig, OntoPaths};
use ontoform::export::ExportFormat;
use ontoform::kb::{KnowledgeBase, OntologyStatus};
use ontoform::mutation::EntitySubmission;
use ontoform::schema::Listing;

#[derive(Parser)]
#[command(name = "ontoform", version, about = "Ontology-driven entity entry")]
struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/ontoform/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory for persistent storage. Without it the store is in memory.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Fetch the ontology from this URL.
    #[arg(long, global = true, conflicts_with = "ontology_file")]
    ontology_url: Option<String>,

    /// Read the ontology from this file.
    #[arg(long, global = true)]
    ontology_file: Option<PathBuf>,

    /// Namespace new instances are minted under.
    #[arg(long, global = true)]
    base_namespace: Option<String>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a persistent store and load the ontology.
    Init {
        /// Also write the effective configuration to the config file.
        #[arg(long)]
        save_config: bool,
    },

    /// List the classes declared by the ontology.
    Classes,

    /// List the properties applicable to a class.
    Properties {
        /// Class IRI.
        #[arg(long)]
        class: String,
    },

    /// List existing instances, optionally of a class and its subclasses.
    Instances {
        /// Class IRI.
        #[arg(long)]
        class: Option<String>,
    },

    /// Add a new entity with one property value.
    Add {
        /// Display name of the new entity.
        #[arg(long)]
        name: String,
        /// Class IRI of the new entity.
        #[arg(long)]
        class: String,
        /// Property IRI.
        #[arg(long)]
        property: String,
        /// `literal` or `instance`.
        #[arg(long, default_value = "literal")]
        kind: String,
        /// Literal value (for `--kind literal`).
        #[arg(long)]
        value: Option<String>,
        /// IRI of an existing instance (for `--kind instance`).
        #[arg(long)]
        instance: Option<String>,
    },

    /// Resolve the display label of an IRI.
    Label {
        iri: String,
    },

    /// Mint a fresh instance IRI without writing anything.
    Mint {
        /// Cosmetic name hint.
        #[arg(long)]
        hint: Option<String>,
    },

    /// Dump the whole graph.
    Export {
        /// ntriples, turtle, rdfxml or json.
        #[arg(long, default_value = "ntriples")]
        format: ExportFormat,
        /// Output file (default: stdout).
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Show store statistics.
    Info,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let (mut config, config_path) = resolve_config(&cli)?;

    match cli.command {
        Commands::Init { save_config } => {
            if config.data_dir.is_none() {
                let paths = OntoPaths::resolve()?;
                config.data_dir = Some(paths.store_dir());
            }
            let kb = KnowledgeBase::open(config.clone())?;
            match kb.ensure_ontology() {
                OntologyStatus::Loaded(_) => {}
                OntologyStatus::Failed { source, message } => {
                    return Err(miette::miette!(
                        code = "ontoform::init",
                        help = "Check the ontology source and format, then run init again.",
                        "failed to load ontology from {source}: {message}"
                    ));
                }
            }
            if save_config {
                let path = match config_path {
                    Some(path) => path,
                    None => OntoPaths::resolve()?.config_file(),
                };
                config.save(&path)?;
                println!("Saved config to {}", path.display());
            }
            if let Some(dir) = &config.data_dir {
                println!("Initialized ontoform at {}", dir.display());
            }
            print_info(&kb, cli.json)?;
        }

        Commands::Classes => {
            let kb = KnowledgeBase::open(config)?;
            let listing = kb.list_classes();
            print_listing(&listing, cli.json, |c| format!("{:<28} <{}>", c.label, c.iri))?;
        }

        Commands::Properties { class } => {
            let kb = KnowledgeBase::open(config)?;
            let listing = kb.list_properties(&class);
            print_listing(&listing, cli.json, |p| {
                let range = p.range.as_deref().unwrap_or("-");
                format!("{:<24} {:<9} <{}> range {range}", p.label, p.value_kind, p.iri)
            })?;
        }

        Commands::Instances { class } => {
            let kb = KnowledgeBase::open(config)?;
            let listing = kb.list_instances(class.as_deref());
            print_listing(&listing, cli.json, |i| format!("{:<28} <{}>", i.label, i.iri))?;
        }

        Commands::Add {
            name,
            class,
            property,
            kind,
            value,
            instance,
        } => {
            let kb = KnowledgeBase::open(config)?;
            let submission = EntitySubmission {
                subject_name: name,
                subject_class_iri: class,
                property_iri: property,
                value_kind: kind,
                literal_value: value,
                instance_iri: instance,
            };
            let confirmation = kb.submit(&submission)?;
            if cli.json {
                print_json(&confirmation)?;
            } else {
                println!("{}", confirmation.message);
                println!("  subject: <{}>", confirmation.subject_iri);
            }
        }

        Commands::Label { iri } => {
            let kb = KnowledgeBase::open(config)?;
            kb.ensure_ontology();
            println!("{}", kb.resolve_label(&iri));
        }

        Commands::Mint { hint } => {
            let kb = KnowledgeBase::open(config)?;
            println!("{}", kb.mint_iri(hint.as_deref())?.as_str());
        }

        Commands::Export { format, output } => {
            let kb = KnowledgeBase::open(config)?;
            kb.ensure_ontology();
            let bytes = kb.export(format)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &bytes).into_diagnostic()?;
                    eprintln!("Exported {} bytes ({format}) to {}", bytes.len(), path.display());
                }
                None => std::io::stdout().write_all(&bytes).into_diagnostic()?,
            }
        }

        Commands::Info => {
            let kb = KnowledgeBase::open(config)?;
            print_info(&kb, cli.json)?;
        }
    }

    Ok(())
}

/// Defaults, then the config file, then environment, then flags.
fn resolve_config(cli: &Cli) -> Result<(KbConfig, Option<PathBuf>)> {
    let path = match &cli.config {
        Some(path) => Some(path.clone()),
        None => OntoPaths::resolve().ok().map(|p| p.config_file()),
    };
    let mut config = match &path {
        Some(path) if cli.config.is_some() => KbConfig::load(path)?,
        Some(path) => KbConfig::load_or_default(path)?,
        None => KbConfig::default(),
    };
    config.apply_env();

    if let Some(dir) = &cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    if let Some(url) = &cli.ontology_url {
        config.ontology.url = Some(url.clone());
        config.ontology.path = None;
    }
    if let Some(file) = &cli.ontology_file {
        config.ontology.path = Some(file.clone());
        config.ontology.url = None;
    }
    if let Some(ns) = &cli.base_namespace {
        config.base_namespace = ns.clone();
    }
    Ok((config, path))
}

fn print_listing<T: Serialize>(
    listing: &Listing<T>,
    json: bool,
    line: impl Fn(&T) -> String,
) -> Result<()> {
    if json {
        return print_json(listing);
    }
    match listing {
        Listing::Complete { items } if items.is_empty() => println!("(none)"),
        Listing::Complete { items } => {
            for item in items {
                println!("{}", line(item));
            }
        }
        Listing::Degraded { reason } => eprintln!("warning: {reason}"),
    }
    Ok(())
}

fn print_info(kb: &KnowledgeBase, json: bool) -> Result<()> {
    let info = kb.info()?;
    if json {
        print_json(&info)
    } else {
        print!("{info}");
        Ok(())
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{text}");
    Ok(())
}
