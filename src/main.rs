use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fleetgraph::graph::{GraphBuild, CATALOG};
use fleetgraph::{Config, GraphPayload, Inventory, RelationType, RenderOptions};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "fleetgraph")]
#[command(about = "Build a typed entity graph from a fleet inventory snapshot")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the graph payload for a snapshot file
    Build {
        /// Snapshot JSON file
        input: PathBuf,

        /// Write the payload here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Disable a relation type (repeatable)
        #[arg(long)]
        disable: Vec<RelationType>,

        /// Enable only these relation types (repeatable)
        #[arg(long, conflicts_with = "disable")]
        only: Vec<RelationType>,

        /// Emit nodes without links
        #[arg(long)]
        no_links: bool,

        /// Pretty-print the JSON payload
        #[arg(long)]
        pretty: bool,

        /// Print the payload fingerprint to stderr
        #[arg(long)]
        fingerprint: bool,
    },
    /// List the relation catalog and the configured flags
    Relations,
}

/// What the renderer receives: the graph plus its display options.
#[derive(Serialize)]
struct RenderDocument<'a> {
    options: &'a RenderOptions,
    #[serde(flatten)]
    graph: &'a GraphPayload,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.log_level.as_str()),
    )
    .init();

    match args.command {
        Command::Build {
            input,
            output,
            disable,
            only,
            no_links,
            pretty,
            fingerprint,
        } => run_build(&config, input, output, disable, only, no_links, pretty, fingerprint),
        Command::Relations => {
            list_relations(&config);
            Ok(())
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn run_build(
    config: &Config,
    input: PathBuf,
    output: Option<PathBuf>,
    disable: Vec<RelationType>,
    only: Vec<RelationType>,
    no_links: bool,
    pretty: bool,
    fingerprint: bool,
) -> Result<()> {
    let mut relations = config.relations.clone();
    if !only.is_empty() {
        relations = fleetgraph::RelationConfig::all_disabled();
        for relation in only {
            relations.set(relation, true);
        }
    }
    for relation in disable {
        relations.set(relation, false);
    }

    log::info!("Reading snapshot {}", input.display());
    let inventory = Inventory::from_path(&input)
        .with_context(|| format!("Failed to load snapshot: {}", input.display()))?;

    let build = GraphBuild::run(&inventory, &relations, &config.workloads);
    let mut payload = build.payload();
    if no_links {
        payload = payload.without_links();
    }

    if fingerprint {
        eprintln!("{}", payload.fingerprint()?);
    }

    let document = RenderDocument {
        options: &config.render,
        graph: &payload,
    };
    let json = if pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };

    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write payload: {}", path.display()))?;
            log::info!(
                "Wrote {} nodes and {} links to {}",
                payload.nodes.len(),
                payload.links.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn list_relations(config: &Config) {
    println!(
        "{:<34} {:<18} {:<18} {:<8} {:<8} {:>7}",
        "Relation", "Source", "Target", "Shape", "Iterate", "Enabled"
    );
    println!("{:-<98}", "");
    for spec in CATALOG.iter() {
        println!(
            "{:<34} {:<18} {:<18} {:<8} {:<8} {:>7}",
            spec.relation.as_str(),
            spec.source_kind().as_str(),
            spec.target_kind().as_str(),
            format!("{:?}", spec.expansion),
            spec.iterate.as_str(),
            if config.relations.is_enabled(spec.relation) { "yes" } else { "no" }
        );
    }
}
