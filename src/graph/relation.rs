//! Relation graph builder: entries with nested triple lists become a
//! label-deduplicated node/edge model for the network widget.

use std::collections::HashMap;

use serde::Serialize;

use crate::model::GraphEntry;

/// Tuples whose subject or object carries this value are dropped entirely.
pub const UNSPECIFIED: &str = "nicht spezifiziert";

/// Node color lookup by entity type tag.
fn type_color(entity_type: Option<&str>) -> &'static str {
    match entity_type {
        Some("person") => "#652d2b",
        Some("location") => "#231f20",
        Some("organisation") => "#cabea8",
        Some("date") => "#a69f8d",
        Some("tätigkeit") => "orange",
        _ => "gray",
    }
}

/// A graph node, keyed by a running numeric id.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Node {
    pub id: u64,
    pub label: String,
    pub color: String,
}

/// A directed edge labeled with the predicate. Edges are never deduplicated.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Edge {
    pub from: u64,
    pub to: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Display payload shown when a node is selected.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DetailRecord {
    pub name: String,
    pub description: String,
    pub image: String,
}

/// The complete widget-ready model for one relation document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RelationGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub details: HashMap<u64, DetailRecord>,
}

/// Incremental builder holding the label → id lookup alongside the output.
#[derive(Debug, Default)]
pub struct RelationGraphBuilder {
    graph: RelationGraph,
    ids_by_label: HashMap<String, u64>,
}

impl RelationGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the full model from an ordered entry list.
    pub fn build(entries: &[GraphEntry]) -> RelationGraph {
        let mut builder = Self::new();
        for entry in entries {
            builder.add_entry(entry);
        }
        builder.finish()
    }

    pub fn finish(self) -> RelationGraph {
        self.graph
    }

    /// Process one entry: every tuple yields one edge (never deduplicated)
    /// and overwrites the detail record of both endpoints with this entry's
    /// text. Tuples touching the unspecified sentinel are skipped outright.
    pub fn add_entry(&mut self, entry: &GraphEntry) {
        for relation in &entry.graph {
            if relation.subject == UNSPECIFIED || relation.object == UNSPECIFIED {
                continue;
            }

            let from = self.resolve_node(&relation.subject, relation.subject_type.as_deref());
            let to = self.resolve_node(&relation.object, relation.object_type.as_deref());

            self.graph.edges.push(Edge {
                from,
                to,
                label: relation.predicate.clone(),
            });

            self.graph
                .details
                .insert(from, detail_for(&relation.subject, &entry.text));
            self.graph
                .details
                .insert(to, detail_for(&relation.object, &entry.text));
        }
    }

    /// Reuse the node for `label` or create it. New ids are taken as
    /// `nodes.len() + 1`, which only stays collision-free while nodes are
    /// never removed; kept as-is to match the deployed renderer.
    fn resolve_node(&mut self, label: &str, entity_type: Option<&str>) -> u64 {
        if let Some(&id) = self.ids_by_label.get(label) {
            return id;
        }
        let id = (self.graph.nodes.len() + 1) as u64;
        self.graph.nodes.push(Node {
            id,
            label: label.to_string(),
            color: type_color(entity_type).to_string(),
        });
        self.ids_by_label.insert(label.to_string(), id);
        id
    }
}

fn detail_for(label: &str, text: &str) -> DetailRecord {
    let encoded: String = url::form_urlencoded::byte_serialize(label.as_bytes()).collect();
    DetailRecord {
        name: label.to_string(),
        description: text.to_string(),
        image: format!("https://via.placeholder.com/300x200?text={}", encoded),
    }
}
