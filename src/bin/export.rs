use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use relvis::graph::{build_entity_graph, FilterState, RelationGraphBuilder};
use relvis::load::load_document;
use relvis::map::RouteMap;
use relvis::model::{GraphEntry, RelationRecord, RouteEntry};
use relvis::Config;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Kind {
    /// Relation graph: label-keyed nodes, edges, detail payloads
    Graph,
    /// Entity graph: identifier-keyed nodes and edges, filterable
    Entities,
    /// Route map: markers, polyline segments, bounds
    Routes,
}

#[derive(Parser, Debug)]
#[command(name = "export")]
#[command(about = "Transform one input document into widget-ready JSON")]
struct Args {
    /// Which pipeline to run
    #[arg(value_enum)]
    kind: Kind,

    /// Relation-label filter (entities only; empty passes everything)
    #[arg(long, default_value = "")]
    relation: String,

    /// Node-type filter (entities only; empty passes everything)
    #[arg(long = "type", default_value = "")]
    node_type: String,

    /// Person filter (routes only; empty passes everything)
    #[arg(long, default_value = "")]
    person: String,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    let args = Args::parse();
    let config = Config::load()?;

    let value = match args.kind {
        Kind::Graph => {
            let source = config.graph_source();
            let entries: Vec<GraphEntry> = load_document(&source)
                .await
                .with_context(|| format!("Failed to load {}", source))?;
            let graph = RelationGraphBuilder::build(&entries);
            log::info!(
                "Built relation graph: {} nodes, {} edges",
                graph.nodes.len(),
                graph.edges.len()
            );
            serde_json::to_value(&graph)?
        }
        Kind::Entities => {
            let source = config.entities_source();
            let records: Vec<RelationRecord> = load_document(&source)
                .await
                .with_context(|| format!("Failed to load {}", source))?;
            let graph = build_entity_graph(records);
            let filter = FilterState {
                relation: args.relation.clone(),
                node_type: args.node_type.clone(),
            };
            let view = graph.filtered(&filter);
            log::info!(
                "Built entity view: {} nodes, {} edges",
                view.nodes.len(),
                view.edges.len()
            );
            serde_json::to_value(&view)?
        }
        Kind::Routes => {
            let source = config.routes_source();
            let entries: Vec<RouteEntry> = load_document(&source)
                .await
                .with_context(|| format!("Failed to load {}", source))?;
            let render = RouteMap::new(entries).render(&args.person);
            log::info!(
                "Built route map: {} markers, {} segments",
                render.markers.len(),
                render.segments.len()
            );
            serde_json::to_value(&render)?
        }
    };

    let json = if args.pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };

    match args.output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
