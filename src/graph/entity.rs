//! Entity graph builder: flat relation records become an identifier-keyed
//! node/edge model with support for date-only relations and detail lookups.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::model::RelationRecord;

/// Predicates that attach a bare date fact to the subject.
pub const DATE_PREDICATES: [&str; 2] = ["Geburtsdatum", "Sterbedatum"];

const DATE_NODE_COLOR: &str = "#fdd835";
const DATE_EDGE_COLOR: &str = "#607d8b";
const RELATION_EDGE_COLOR: &str = "#2c3e50";

/// Node color lookup by entity type tag. Unknown and missing types share the
/// same fallback tone.
fn type_color(entity_type: Option<&str>) -> &'static str {
    match entity_type {
        Some("person") => "#652d2b",
        Some("organisation") => "#eee8d2",
        Some("location") => "#497f7f",
        _ => "#b85c38",
    }
}

/// Accept an object identifier only when it is a string carrying a
/// Wikidata-style `Q<digits>` code; anything else cannot merge nodes.
fn accepted_qid(value: Option<&JsonValue>) -> Option<&str> {
    static QID: OnceLock<Regex> = OnceLock::new();
    let re = QID.get_or_init(|| Regex::new(r"^Q\d+").expect("Invalid regex pattern"));
    value
        .and_then(|v| v.as_str())
        .filter(|s| re.is_match(s))
}

/// A graph node keyed by a stable string identifier.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EntityNode {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
}

/// Wrapper matching the widget's nested edge color shape.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EdgeColor {
    pub color: String,
}

/// A directed, predicate-labeled edge. The `relation` tag duplicates the
/// label so the relation filter can match on it.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EntityEdge {
    pub from: String,
    pub to: String,
    pub label: String,
    pub arrows: &'static str,
    pub relation: String,
    pub color: EdgeColor,
}

/// The built model plus the raw records retained for detail lookups.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EntityGraph {
    pub nodes: Vec<EntityNode>,
    pub edges: Vec<EntityEdge>,
    #[serde(skip)]
    records: Vec<RelationRecord>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl EntityGraph {
    /// Raw input records, in original order.
    pub fn records(&self) -> &[RelationRecord] {
        &self.records
    }

    /// Look up a node by its identifier.
    pub fn node(&self, id: &str) -> Option<&EntityNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    fn ensure_node(&mut self, node: EntityNode) {
        // First writer wins; a recurring id never mutates the stored node.
        if !self.index.contains_key(&node.id) {
            self.index.insert(node.id.clone(), self.nodes.len());
            self.nodes.push(node);
        }
    }
}

/// The record's object identifier, when it carries a recognized stable code.
pub fn accepted_object_qid(record: &RelationRecord) -> Option<&str> {
    accepted_qid(record.object_qid.as_ref())
}

/// Resolved subject identifier: knowledge-base code when present, else a
/// label-derived key.
pub fn subject_id(record: &RelationRecord) -> String {
    match record.subject_qid.as_deref().filter(|s| !s.is_empty()) {
        Some(qid) => qid.to_string(),
        None => format!("subj:{}", record.subject),
    }
}

/// Resolved object identifier, if the record names an object at all.
pub fn object_id(record: &RelationRecord) -> Option<String> {
    if let Some(qid) = accepted_qid(record.object_qid.as_ref()) {
        return Some(qid.to_string());
    }
    record
        .object
        .as_deref()
        .filter(|o| !o.is_empty())
        .map(|o| format!("obj:{}", o))
}

/// A record carries only a date fact when a timestamp is present, no object
/// label exists, and the predicate is one of the recognized date predicates.
pub fn is_date_only(record: &RelationRecord) -> bool {
    let has_time = record.time.as_deref().is_some_and(|t| !t.is_empty());
    let has_object = record.object.as_deref().is_some_and(|o| !o.is_empty());
    let date_predicate = record
        .predicate
        .as_deref()
        .is_some_and(|p| DATE_PREDICATES.contains(&p));
    has_time && !has_object && date_predicate
}

/// Build the entity graph from an ordered record list, retaining the records
/// for later detail lookups.
pub fn build_entity_graph(records: Vec<RelationRecord>) -> EntityGraph {
    let mut graph = EntityGraph::default();

    for record in &records {
        let subj_id = subject_id(record);

        graph.ensure_node(EntityNode {
            id: subj_id.clone(),
            label: record.subject.clone(),
            title: Some(record.subject.clone()),
            node_type: record.subject_type.clone().unwrap_or_default(),
            link: record.subject_ref.clone(),
            color: type_color(record.subject_type.as_deref()).to_string(),
            shape: None,
        });

        if is_date_only(record) {
            let time = record.time.as_deref().unwrap_or_default();
            let predicate = record.predicate.as_deref().unwrap_or_default();
            let date_id = format!("datum:{}:{}:{}", subj_id, predicate, time);

            graph.ensure_node(EntityNode {
                id: date_id.clone(),
                label: time.to_string(),
                title: None,
                node_type: "date".to_string(),
                link: None,
                color: DATE_NODE_COLOR.to_string(),
                shape: Some("box".to_string()),
            });

            graph.edges.push(EntityEdge {
                from: subj_id,
                to: date_id,
                label: predicate.to_string(),
                arrows: "to",
                relation: predicate.to_string(),
                color: EdgeColor {
                    color: DATE_EDGE_COLOR.to_string(),
                },
            });
            continue;
        }

        let obj_id = object_id(record);

        if let Some(obj_id) = &obj_id {
            graph.ensure_node(EntityNode {
                id: obj_id.clone(),
                label: record.object.clone().unwrap_or_default(),
                title: record.object.clone(),
                node_type: record.object_type.clone().unwrap_or_default(),
                link: record.object_ref.clone(),
                color: type_color(record.object_type.as_deref()).to_string(),
                shape: None,
            });
        }

        if let (Some(obj_id), Some(predicate)) = (obj_id, record.predicate.as_deref()) {
            graph.edges.push(EntityEdge {
                from: subj_id,
                to: obj_id,
                label: predicate.to_string(),
                arrows: "to",
                relation: predicate.to_string(),
                color: EdgeColor {
                    color: RELATION_EDGE_COLOR.to_string(),
                },
            });
        }
    }

    graph.records = records;
    graph
}
