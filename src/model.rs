//! Wire-format record types for the three input documents.
//!
//! The extraction pipeline emits German field names (`subjekt`, `objekt`,
//! `prädikat`, ...); the structs here keep English names and map via serde.
//! No schema validation happens on load: absent fields default to empty
//! strings, `None`, or NaN coordinates so malformed records degrade into
//! blank output instead of failing the whole document.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One entry of the relation-graph document: free text plus extracted triples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEntry {
    /// Source excerpt the triples were extracted from.
    #[serde(default)]
    pub text: String,
    /// Relation tuples extracted from `text`.
    #[serde(default)]
    pub graph: Vec<GraphRelation>,
}

/// A single (subject, predicate, object) tuple with optional type tags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphRelation {
    #[serde(rename = "subjekt", default)]
    pub subject: String,
    #[serde(rename = "objekt", default)]
    pub object: String,
    #[serde(rename = "prädikat", default)]
    pub predicate: Option<String>,
    #[serde(rename = "subjekt_type", default)]
    pub subject_type: Option<String>,
    #[serde(rename = "objekt_type", default)]
    pub object_type: Option<String>,
}

/// A flat relation record from the entity document.
///
/// `q_subjekt` / `q_objekt` carry knowledge-base identifiers (Wikidata-style
/// `Q...` codes) when the extractor could resolve the entity. `q_objekt` is
/// kept as a raw JSON value: scraped data occasionally carries numbers or
/// nulls there, and only recognized string identifiers may merge nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationRecord {
    #[serde(rename = "subjekt", default)]
    pub subject: String,
    #[serde(rename = "objekt", default)]
    pub object: Option<String>,
    #[serde(rename = "prädikat", default)]
    pub predicate: Option<String>,
    #[serde(rename = "subjekt_type", default)]
    pub subject_type: Option<String>,
    #[serde(rename = "objekt_type", default)]
    pub object_type: Option<String>,
    #[serde(rename = "q_subjekt", default)]
    pub subject_qid: Option<String>,
    #[serde(rename = "q_objekt", default)]
    pub object_qid: Option<JsonValue>,
    /// External reference URL for the subject entity.
    #[serde(rename = "subjekt_ref", default)]
    pub subject_ref: Option<String>,
    /// External reference URL for the object entity.
    #[serde(rename = "objekt_ref", default)]
    pub object_ref: Option<String>,
    /// Source reference URL for the record itself.
    #[serde(rename = "ref", default)]
    pub source_ref: Option<String>,
    /// Human-readable source label shown in place of the raw reference.
    #[serde(default)]
    pub nbg: Option<String>,
    /// Free-text excerpt the relation was extracted from.
    #[serde(default)]
    pub text: Option<String>,
    /// Timestamp label for date-only relations (free text, not parsed).
    #[serde(rename = "zeit", default)]
    pub time: Option<String>,
}

/// One person's travel route from the routes document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteEntry {
    #[serde(default)]
    pub person: String,
    #[serde(default)]
    pub person_id: Option<String>,
    #[serde(default)]
    pub route: Vec<RoutePoint>,
}

/// A single stop on a route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutePoint {
    #[serde(default)]
    pub location_id: String,
    #[serde(default = "nan")]
    pub lat: f64,
    #[serde(default = "nan")]
    pub lng: f64,
    #[serde(default)]
    pub location: String,
}

fn nan() -> f64 {
    f64::NAN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_entry_german_field_names() {
        let json = r#"{
            "text": "t",
            "graph": [{
                "subjekt": "A",
                "objekt": "B",
                "prädikat": "besuchte",
                "subjekt_type": "person",
                "objekt_type": "location"
            }]
        }"#;
        let entry: GraphEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.text, "t");
        assert_eq!(entry.graph.len(), 1);
        assert_eq!(entry.graph[0].subject, "A");
        assert_eq!(entry.graph[0].predicate.as_deref(), Some("besuchte"));
    }

    #[test]
    fn test_graph_relation_missing_fields_default() {
        let rel: GraphRelation = serde_json::from_str(r#"{"subjekt": "A"}"#).unwrap();
        assert_eq!(rel.subject, "A");
        assert_eq!(rel.object, "");
        assert!(rel.predicate.is_none());
        assert!(rel.object_type.is_none());
    }

    #[test]
    fn test_relation_record_non_string_qid_tolerated() {
        let json = r#"{"subjekt": "A", "q_objekt": 42}"#;
        let rec: RelationRecord = serde_json::from_str(json).unwrap();
        assert!(rec.object_qid.as_ref().unwrap().is_number());
        assert!(rec.object.is_none());
    }

    #[test]
    fn test_relation_record_ref_keyword_field() {
        let json = r#"{"subjekt": "A", "ref": "https://example.org/q1", "nbg": "NBG 3"}"#;
        let rec: RelationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.source_ref.as_deref(), Some("https://example.org/q1"));
        assert_eq!(rec.nbg.as_deref(), Some("NBG 3"));
    }

    #[test]
    fn test_route_point_missing_coords_are_nan() {
        let point: RoutePoint =
            serde_json::from_str(r#"{"location_id": "L1", "location": "Rom"}"#).unwrap();
        assert!(point.lat.is_nan());
        assert!(point.lng.is_nan());
        assert_eq!(point.location, "Rom");
    }
}
