use clap::Parser;
use fleetgraph::graph::GraphBuild;
use fleetgraph::{Config, Inventory, NodeKind, RelationType};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "stats")]
#[command(about = "Print node, link and unresolved-reference counts for a snapshot")]
struct Args {
    /// Snapshot JSON file
    input: PathBuf,

    /// Print the statistics as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load()?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.log_level.as_str()),
    )
    .init();

    let inventory = Inventory::from_path(&args.input)?;
    let build = GraphBuild::run(&inventory, &config.relations, &config.workloads);
    let stats = build.stats();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("\n=== Graph Statistics: {} ===\n", args.input.display());

    println!("{:<20} {:>8}", "Node kind", "Count");
    println!("{:-<30}", "");
    for kind in NodeKind::ALL {
        println!("{:<20} {:>8}", kind.as_str(), stats.nodes.get(&kind).unwrap_or(&0));
    }
    println!("{:-<30}", "");
    println!("{:<20} {:>8}", "total", stats.total_nodes());

    println!();
    println!("{:<34} {:>8} {:>8} {:>11}", "Relation", "Enabled", "Links", "Unresolved");
    println!("{:-<64}", "");
    for relation in RelationType::ALL {
        println!(
            "{:<34} {:>8} {:>8} {:>11}",
            relation.as_str(),
            if config.relations.is_enabled(relation) { "yes" } else { "no" },
            stats.links.get(&relation).unwrap_or(&0),
            stats.unresolved.get(&relation).unwrap_or(&0)
        );
    }
    println!("{:-<64}", "");
    println!(
        "{:<34} {:>8} {:>8} {:>11}",
        "total",
        "",
        stats.total_links(),
        stats.total_unresolved()
    );
    println!();

    Ok(())
}
