use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use tracing::debug;

use callflow_core::{Config, GraphSource, JsonFileSource, RouteGraph};

#[derive(Parser)]
#[command(name = "callflow")]
#[command(about = "Simulate and filter PBX call-routing graphs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a graph file: counts and entry points
    Inspect {
        /// Path to a JSON file of graph elements
        graph: PathBuf,
    },
    /// Resolve the live route at a simulated instant
    Simulate {
        /// Path to a JSON file of graph elements
        graph: PathBuf,
        /// Simulated date and time, e.g. 2024-01-06T10:00
        #[arg(long)]
        at: String,
    },
    /// Show the subgraph reachable from selected entry points
    Filter {
        /// Path to a JSON file of graph elements
        graph: PathBuf,
        /// Entry-point node ids, comma separated
        #[arg(long, value_delimiter = ',', conflicts_with = "all")]
        roots: Vec<String>,
        /// Select every entry point in the graph
        #[arg(long)]
        all: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load().context("loading configuration")?;
    debug!(
        endpoint = ?config.api.base_url,
        domain = ?config.api.domain,
        "effective configuration"
    );

    match cli.command {
        Commands::Inspect { graph } => {
            let graph = load_graph(&graph).await?;
            inspect(&graph);
        }
        Commands::Simulate { graph, at } => {
            let mut graph = load_graph(&graph).await?;
            let instant = parse_instant(&at)?;
            let classification = graph.resolve(instant);
            report_simulation(&graph, instant, &classification);
        }
        Commands::Filter { graph, roots, all } => {
            let mut graph = load_graph(&graph).await?;
            let roots = filter_roots(&graph, roots, all);
            let visible = graph.compute_visible(roots);
            report_filter(&graph, &visible);
        }
    }
    Ok(())
}

/// The root selection a filter run traverses from: every entry point
/// in the graph under `--all`, otherwise the ids as given.
fn filter_roots(graph: &RouteGraph, roots: Vec<String>, all: bool) -> Vec<String> {
    if all {
        graph.ingress_ids().into_iter().map(String::from).collect()
    } else {
        roots
    }
}

async fn load_graph(path: &Path) -> Result<RouteGraph> {
    let elements = JsonFileSource::new(path)
        .fetch()
        .await
        .with_context(|| format!("loading graph from {}", path.display()))?;
    Ok(RouteGraph::from_elements(elements)?)
}

fn parse_instant(raw: &str) -> Result<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
    ];
    for format in FORMATS {
        if let Ok(instant) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(instant);
        }
    }
    bail!("could not parse instant {raw:?}; expected YYYY-MM-DDTHH:MM");
}

fn inspect(graph: &RouteGraph) {
    println!(
        "{} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );

    let ingress = graph.ingress_ids();
    if ingress.is_empty() {
        println!("no entry points");
        return;
    }
    println!("entry points:");
    for id in ingress {
        if let Some(node) = graph.node(id) {
            println!("  {} ({})", node.label, node.id);
        }
    }
}

fn report_simulation(
    graph: &RouteGraph,
    instant: NaiveDateTime,
    classification: &HashMap<String, bool>,
) {
    println!("simulated instant: {}", instant.format("%Y-%m-%d %H:%M"));

    for node in graph.nodes() {
        let mut outgoing: Vec<_> = graph.outgoing(&node.id).collect();
        if outgoing.is_empty() {
            continue;
        }
        outgoing.sort_by_key(|edge| (edge.priority.is_none(), edge.priority));

        println!("{} ({})", node.label, node.id);
        let mut live = false;
        for edge in outgoing {
            let active = classification.get(&edge.id).copied().unwrap_or(false);
            live |= active;
            let marker = if active { "=>" } else { "  " };
            let rank = edge
                .priority
                .map_or_else(|| "-".to_string(), |p| p.to_string());
            println!("  {marker} [{rank}] -> {}  ({})", edge.target, edge.id);
        }
        if !live {
            println!("     no live route at this instant");
        }
    }
}

fn report_filter(graph: &RouteGraph, visible: &callflow_core::VisibleSet) {
    println!(
        "{} roots selected; {} of {} nodes and {} of {} edges visible",
        visible.root_count,
        visible.nodes.len(),
        graph.node_count(),
        visible.edges.len(),
        graph.edge_count()
    );

    let mut hidden: Vec<&str> = graph
        .nodes()
        .iter()
        .filter(|node| !node.visible)
        .map(|node| node.id.as_str())
        .collect();
    hidden.sort_unstable();
    if !hidden.is_empty() {
        println!("hidden nodes: {}", hidden.join(", "));
    }
}
