//! Graph extraction from model output.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::gateway::strip_code_fence;
use crate::models::Graph;

/// Generated text could not be turned into a valid [`Graph`].
///
/// `raw` is the untouched model output, kept so an operator can see what the
/// model actually returned.
#[derive(Debug, Clone, Error)]
#[error("failed to parse generated graph: {reason}")]
pub struct GraphParseError {
    pub reason: String,
    pub raw: String,
}

impl GraphParseError {
    fn new(reason: impl Into<String>, raw: &str) -> Self {
        Self {
            reason: reason.into(),
            raw: raw.to_string(),
        }
    }
}

/// Parse and validate a graph.
///
/// The text must hold a JSON object with both `nodes` and `edges` arrays.
/// Fenced output is unwrapped, and if the text is not JSON as a whole the
/// outermost `{ ... }` span is tried instead. Every node and edge must
/// validate; there is no partial result.
pub fn parse_graph(raw: &str) -> Result<Graph, GraphParseError> {
    let text = strip_code_fence(raw).trim();

    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => match embedded_object(text).and_then(|s| serde_json::from_str(s).ok()) {
            Some(value) => value,
            None => return Err(GraphParseError::new(format!("invalid JSON: {}", e), raw)),
        },
    };

    if !value.is_object() {
        return Err(GraphParseError::new(
            "expected a JSON object with \"nodes\" and \"edges\"",
            raw,
        ));
    }

    Graph::deserialize(value).map_err(|e| GraphParseError::new(format!("invalid graph: {}", e), raw))
}

/// The span from the first `{` to the last `}`, if any.
fn embedded_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NodeKind;

    const VALID: &str = r#"{
        "nodes": [
            {"id": "root", "label": "Todo app", "type": "idea", "priority": 5, "notes": "Main idea"},
            {"id": "sync", "label": "Cloud sync", "type": "integration", "priority": 2}
        ],
        "edges": [
            {"from": "root", "to": "sync", "relation": "has feature"},
            {"from": "root", "to": "sync"}
        ]
    }"#;

    #[test]
    fn test_accepts_well_formed_graph_with_unknown_types() {
        let graph = parse_graph(VALID).unwrap();
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.nodes[1].kind, NodeKind::Other("integration".into()));
        assert_eq!(graph.edges[1].relation, "depends_on");
    }

    #[test]
    fn test_accepts_fenced_and_chatty_output() {
        let fenced = format!("```json\n{}\n```", VALID);
        assert_eq!(parse_graph(&fenced).unwrap().nodes.len(), 2);

        let chatty = format!("Sure! Here is the graph:\n{}\nHope this helps.", VALID);
        assert_eq!(parse_graph(&chatty).unwrap().edges.len(), 2);
    }

    #[test]
    fn test_rejects_out_of_range_priority() {
        for priority in ["6", "-1", "42"] {
            let raw = format!(
                r#"{{"nodes": [{{"id": "a", "label": "A", "priority": {}}}], "edges": []}}"#,
                priority
            );
            let err = parse_graph(&raw).unwrap_err();
            assert!(err.reason.contains("priority"), "{}", err.reason);
            assert_eq!(err.raw, raw);
        }
    }

    #[test]
    fn test_rejects_missing_required_fields() {
        let cases = [
            r#"{"nodes": [{"label": "no id"}], "edges": []}"#,
            r#"{"nodes": [{"id": "a"}], "edges": []}"#,
            r#"{"nodes": [], "edges": [{"from": "a"}]}"#,
            r#"{"nodes": [], "edges": [{"to": "b", "relation": "x"}]}"#,
            r#"{"nodes": []}"#,
            r#"{"edges": []}"#,
        ];
        for raw in cases {
            let err = parse_graph(raw).unwrap_err();
            assert_eq!(err.raw, raw);
        }
    }

    #[test]
    fn test_rejects_non_json_and_non_objects() {
        for raw in ["not json at all", "[[], []]", "{\"nodes\": [", ""] {
            let err = parse_graph(raw).unwrap_err();
            assert_eq!(err.raw, raw, "input: {:?}", raw);
        }
    }

    #[test]
    fn test_one_bad_node_rejects_whole_graph() {
        let raw = r#"{"nodes": [
            {"id": "a", "label": "ok"},
            {"id": "b", "label": "bad", "priority": 9}
        ], "edges": []}"#;
        assert!(parse_graph(raw).is_err());
    }
}
