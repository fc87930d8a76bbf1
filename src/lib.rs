pub mod config;
pub mod error;
pub mod model;
pub mod load;
pub mod graph;
pub mod map;
pub mod server;
pub mod watch;

pub use config::Config;
pub use error::{RelvisError, Result};
pub use graph::{build_entity_graph, EntityGraph, RelationGraph, RelationGraphBuilder};
pub use map::RouteMap;
