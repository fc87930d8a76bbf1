//! Graph model builders: flat relation records in, widget-ready node/edge
//! collections out, plus client-side filter and selection logic.

pub mod detail;
pub mod entity;
pub mod relation;
pub mod view;

pub use detail::{escape_html, related_records, render_detail_blocks};
pub use entity::{build_entity_graph, EntityEdge, EntityGraph, EntityNode};
pub use relation::{RelationGraph, RelationGraphBuilder};
pub use view::{FilterState, FilteredView, GraphView, SelectionDetails, ViewEvent};
