use anyhow::Result;

use relvis::graph::{build_entity_graph, RelationGraphBuilder};
use relvis::load::load_document;
use relvis::map::RouteMap;
use relvis::model::{GraphEntry, RelationRecord, RouteEntry};
use relvis::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("RUST_LOG", "info")
    ).init();

    let config = Config::load()?;

    println!("Relvis data statistics");
    println!("======================");

    match load_document::<Vec<GraphEntry>>(&config.graph_source()).await {
        Ok(entries) => {
            let graph = RelationGraphBuilder::build(&entries);
            let tuples: usize = entries.iter().map(|e| e.graph.len()).sum();
            println!("\nRelation graph ({})", config.graph_source());
            println!("  entries:        {}", entries.len());
            println!("  tuples:         {}", tuples);
            println!("  nodes:          {}", graph.nodes.len());
            println!("  edges:          {}", graph.edges.len());
            println!("  detail records: {}", graph.details.len());
        }
        Err(e) => println!("\nRelation graph: unavailable ({})", e),
    }

    match load_document::<Vec<RelationRecord>>(&config.entities_source()).await {
        Ok(records) => {
            let graph = build_entity_graph(records);
            let mut relations: Vec<&str> = Vec::new();
            for edge in &graph.edges {
                if !relations.contains(&edge.relation.as_str()) {
                    relations.push(&edge.relation);
                }
            }
            let date_nodes = graph.nodes.iter().filter(|n| n.node_type == "date").count();
            println!("\nEntity graph ({})", config.entities_source());
            println!("  records:          {}", graph.records().len());
            println!("  nodes:            {}", graph.nodes.len());
            println!("  date nodes:       {}", date_nodes);
            println!("  edges:            {}", graph.edges.len());
            println!("  relation labels:  {}", relations.len());
        }
        Err(e) => println!("\nEntity graph: unavailable ({})", e),
    }

    match load_document::<Vec<RouteEntry>>(&config.routes_source()).await {
        Ok(entries) => {
            let map = RouteMap::new(entries);
            let render = map.render("");
            println!("\nRoute map ({})", config.routes_source());
            println!("  entries:   {}", map.entries().len());
            println!("  persons:   {}", map.person_options().len());
            println!("  locations: {}", render.markers.len());
            println!("  segments:  {}", render.segments.len());
        }
        Err(e) => println!("\nRoute map: unavailable ({})", e),
    }

    Ok(())
}
