//! Presentation-layer state for the entity graph: filter predicates, the
//! filtered node/edge view, and selection handling.
//!
//! Filters never touch the underlying records; they only decide which nodes
//! and edges make it into the recomputed view. UI events arrive as explicit
//! [`ViewEvent`] values dispatched against a snapshot of the filter state.

use serde::Serialize;

use crate::graph::detail::{related_records, render_detail_blocks};
use crate::graph::entity::{EntityEdge, EntityGraph, EntityNode};

/// Immutable snapshot of both filters. Empty string means "pass everything".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    /// Matches an edge's `relation` tag exactly.
    pub relation: String,
    /// Matches a node's type tag exactly.
    pub node_type: String,
}

impl FilterState {
    pub fn edge_passes(&self, edge: &EntityEdge) -> bool {
        self.relation.is_empty() || edge.relation == self.relation
    }

    pub fn node_passes(&self, node: &EntityNode) -> bool {
        self.node_type.is_empty() || node.node_type == self.node_type
    }
}

/// The filtered model handed to the network widget.
#[derive(Debug, Clone, Serialize)]
pub struct FilteredView {
    pub nodes: Vec<EntityNode>,
    pub edges: Vec<EntityEdge>,
}

impl EntityGraph {
    /// Recompute the filtered view for the given filter snapshot.
    pub fn filtered(&self, filter: &FilterState) -> FilteredView {
        FilteredView {
            nodes: self
                .nodes
                .iter()
                .filter(|n| filter.node_passes(n))
                .cloned()
                .collect(),
            edges: self
                .edges
                .iter()
                .filter(|e| filter.edge_passes(e))
                .cloned()
                .collect(),
        }
    }
}

/// UI events the graph view reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    RelationFilterChanged(String),
    NodeTypeFilterChanged(String),
    NodeSelected(String),
    SelectionCleared,
}

/// Content of the detail panel for a selected node.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SelectionDetails {
    pub name: String,
    pub html: String,
}

/// View state: current filters plus the selected node, if any.
#[derive(Debug, Clone, Default)]
pub struct GraphView {
    filter: FilterState,
    selection: Option<String>,
}

impl GraphView {
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    /// Dispatch one event. Filter changes leave the selection alone; the
    /// caller recomputes whichever view the event touched.
    pub fn apply(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::RelationFilterChanged(value) => self.filter.relation = value,
            ViewEvent::NodeTypeFilterChanged(value) => self.filter.node_type = value,
            ViewEvent::NodeSelected(id) => self.selection = Some(id),
            ViewEvent::SelectionCleared => self.selection = None,
        }
    }

    /// Detail-panel content for the current selection. `None` hides the
    /// panel: nothing selected, unknown node, or no records touch it.
    pub fn details(&self, graph: &EntityGraph) -> Option<SelectionDetails> {
        let node_id = self.selection.as_deref()?;
        let node = graph.node(node_id)?;
        let related = related_records(graph, node_id);
        if related.is_empty() {
            return None;
        }
        Some(SelectionDetails {
            name: node.label.clone(),
            html: render_detail_blocks(&related),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::entity::build_entity_graph;
    use crate::model::RelationRecord;

    fn record(subject: &str, object: &str, predicate: &str) -> RelationRecord {
        RelationRecord {
            subject: subject.to_string(),
            object: Some(object.to_string()),
            predicate: Some(predicate.to_string()),
            subject_type: Some("person".to_string()),
            object_type: Some("location".to_string()),
            subject_qid: None,
            object_qid: None,
            subject_ref: None,
            object_ref: None,
            source_ref: None,
            nbg: None,
            text: Some("text".to_string()),
            time: None,
        }
    }

    fn sample_graph() -> EntityGraph {
        build_entity_graph(vec![
            record("A", "Weimar", "besuchte"),
            record("A", "B", "kannte"),
        ])
    }

    #[test]
    fn test_empty_relation_filter_passes_every_edge() {
        let graph = sample_graph();
        let view = graph.filtered(&FilterState::default());
        assert_eq!(view.edges.len(), graph.edges.len());
        assert_eq!(view.nodes.len(), graph.nodes.len());
    }

    #[test]
    fn test_relation_filter_exact_match_only() {
        let graph = sample_graph();
        let filter = FilterState {
            relation: "besuchte".to_string(),
            ..Default::default()
        };
        let view = graph.filtered(&filter);
        assert_eq!(view.edges.len(), 1);
        assert_eq!(view.edges[0].relation, "besuchte");

        let filter = FilterState {
            relation: "besuch".to_string(),
            ..Default::default()
        };
        assert!(graph.filtered(&filter).edges.is_empty());
    }

    #[test]
    fn test_node_type_filter_independent_of_relation_filter() {
        let graph = sample_graph();
        let filter = FilterState {
            node_type: "location".to_string(),
            ..Default::default()
        };
        let view = graph.filtered(&filter);
        assert!(view.nodes.iter().all(|n| n.node_type == "location"));
        // edges are untouched by the node-type filter
        assert_eq!(view.edges.len(), graph.edges.len());
    }

    #[test]
    fn test_event_dispatch_updates_state() {
        let mut view = GraphView::default();
        view.apply(ViewEvent::RelationFilterChanged("kannte".to_string()));
        view.apply(ViewEvent::NodeTypeFilterChanged("person".to_string()));
        view.apply(ViewEvent::NodeSelected("subj:A".to_string()));
        assert_eq!(view.filter().relation, "kannte");
        assert_eq!(view.filter().node_type, "person");
        assert_eq!(view.selection(), Some("subj:A"));

        view.apply(ViewEvent::SelectionCleared);
        assert_eq!(view.selection(), None);
    }

    #[test]
    fn test_selection_details_for_known_node() {
        let graph = sample_graph();
        let mut view = GraphView::default();
        view.apply(ViewEvent::NodeSelected("subj:A".to_string()));

        let details = view.details(&graph).unwrap();
        assert_eq!(details.name, "A");
        // both records touch subj:A
        assert_eq!(details.html.matches("detail-block").count(), 2);
    }

    #[test]
    fn test_selection_details_hidden_when_nothing_matches() {
        let graph = sample_graph();
        let mut view = GraphView::default();
        assert!(view.details(&graph).is_none());

        view.apply(ViewEvent::NodeSelected("obj:Paris".to_string()));
        assert!(view.details(&graph).is_none());
    }
}
