//! Detail-panel rendering for selected entity nodes: source lookup plus
//! HTML escaping for the text fragments that end up in the panel.

use crate::graph::entity::{accepted_object_qid, subject_id, EntityGraph};
use crate::model::RelationRecord;

/// Escape the five HTML-unsafe characters. Absent input escapes to the
/// empty string, mirroring the panel's treatment of missing fields.
pub fn escape_html(value: Option<&str>) -> String {
    let Some(value) = value else {
        return String::new();
    };
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// All records whose resolved subject id, recognized object code, or
/// synthesized object key equals `node_id`.
pub fn related_records<'a>(graph: &'a EntityGraph, node_id: &str) -> Vec<&'a RelationRecord> {
    graph
        .records()
        .iter()
        .filter(|record| {
            if subject_id(record) == node_id {
                return true;
            }
            if accepted_object_qid(record) == Some(node_id) {
                return true;
            }
            record
                .object
                .as_deref()
                .is_some_and(|object| format!("obj:{}", object) == node_id)
        })
        .collect()
}

/// Render one `detail-block` per record: source reference, excerpt, and the
/// subject/object names (linked when a reference URL is present).
pub fn render_detail_blocks(records: &[&RelationRecord]) -> String {
    let mut html = String::new();
    for record in records {
        let source_label = escape_html(Some(
            record.nbg.as_deref().filter(|n| !n.is_empty()).unwrap_or("Quelle"),
        ));
        let source = match record.source_ref.as_deref() {
            Some(url) => format!(r#"<a href="{}" target="_blank">{}</a>"#, url, source_label),
            None => source_label,
        };

        let subject = match record.subject_ref.as_deref() {
            Some(url) => format!(
                r#"<a href="{}" target="_blank">{}</a><br>"#,
                url,
                escape_html(Some(&record.subject))
            ),
            None => format!("{}<br>", escape_html(Some(&record.subject))),
        };

        let object = match record.object.as_deref().filter(|o| !o.is_empty()) {
            Some(object) => match record.object_ref.as_deref() {
                Some(url) => format!(
                    r#"<a href="{}" target="_blank">{}</a><br>"#,
                    url,
                    escape_html(Some(object))
                ),
                None => format!("{}<br>", escape_html(Some(object))),
            },
            None => String::new(),
        };

        html.push_str(&format!(
            "<div class=\"detail-block\">\
             <strong>Quelle:</strong> {}<br><br>\
             {}<br><br>\
             <strong>Personen- und Ortsnamen:</strong><br>\
             {}{}</div><hr>",
            source,
            escape_html(record.text.as_deref()),
            subject,
            object,
        ));
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::entity::build_entity_graph;
    use serde_json::Value as JsonValue;

    fn record(subject: &str, object: Option<&str>, predicate: Option<&str>) -> RelationRecord {
        RelationRecord {
            subject: subject.to_string(),
            object: object.map(str::to_string),
            predicate: predicate.map(str::to_string),
            subject_type: None,
            object_type: None,
            subject_qid: None,
            object_qid: None,
            subject_ref: None,
            object_ref: None,
            source_ref: None,
            nbg: None,
            text: None,
            time: None,
        }
    }

    #[test]
    fn test_escape_html_known_vector() {
        assert_eq!(escape_html(Some("<b>&'\"")), "&lt;b&gt;&amp;&#039;&quot;");
    }

    #[test]
    fn test_escape_html_absent_input() {
        assert_eq!(escape_html(None), "");
        assert_eq!(escape_html(Some("")), "");
    }

    #[test]
    fn test_escape_html_passthrough() {
        assert_eq!(escape_html(Some("Weimar 1749")), "Weimar 1749");
    }

    #[test]
    fn test_related_records_matches_all_three_key_forms() {
        let mut by_subj_qid = record("Goethe", None, None);
        by_subj_qid.subject_qid = Some("Q5879".to_string());

        let mut by_obj_qid = record("Schiller", Some("Goethe"), Some("kannte"));
        by_obj_qid.object_qid = Some(JsonValue::String("Q5879".to_string()));

        let by_obj_label = record("Schiller", Some("Weimar"), Some("besuchte"));
        let unrelated = record("Herder", Some("Jena"), Some("besuchte"));

        let graph = build_entity_graph(vec![by_subj_qid, by_obj_qid, by_obj_label, unrelated]);

        assert_eq!(related_records(&graph, "Q5879").len(), 2);
        assert_eq!(related_records(&graph, "obj:Weimar").len(), 1);
        assert_eq!(related_records(&graph, "subj:Schiller").len(), 2);
        assert!(related_records(&graph, "obj:Paris").is_empty());
    }

    #[test]
    fn test_render_blocks_escapes_and_links() {
        let mut rec = record("A & B", Some("C<d>"), Some("p"));
        rec.source_ref = Some("https://example.org/src".to_string());
        rec.nbg = Some("NBG 3".to_string());
        rec.subject_ref = Some("https://example.org/a".to_string());
        rec.text = Some("seltsamer \"Text\"".to_string());

        let html = render_detail_blocks(&[&rec]);
        assert!(html.contains(r#"<a href="https://example.org/src" target="_blank">NBG 3</a>"#));
        assert!(html.contains("seltsamer &quot;Text&quot;"));
        assert!(html.contains("A &amp; B"));
        assert!(html.contains("C&lt;d&gt;<br>"));
        assert!(html.contains("<strong>Personen- und Ortsnamen:</strong>"));
        assert!(html.ends_with("</div><hr>"));
    }

    #[test]
    fn test_render_blocks_falls_back_to_quelle_label() {
        let rec = record("A", None, None);
        let html = render_detail_blocks(&[&rec]);
        assert!(html.contains("<strong>Quelle:</strong> Quelle"));
        // no object line when the record names no object
        assert!(!html.contains("obj"));
    }
}
