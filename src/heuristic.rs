//! Deterministic graph construction from an idea's answers.
//!
//! No model is involved: the idea becomes the root node and every answer
//! becomes a feature node hanging off it. Output depends only on the idea
//! text, its id and the ordered answers, so the same record always produces
//! the same graph.

use sha2::{Digest, Sha256};

use crate::models::{Edge, Graph, Idea, Node, NodeKind, Priority};

/// Relations assigned to root edges, cycled by answer position.
pub const RELATIONS: [&str; 5] = [
    "is defined by",
    "depends on",
    "leads to",
    "is a part of",
    "has feature",
];

/// Node id for an answer-derived node: the first 16 bytes of the SHA-256
/// digest of the UTF-8 label, as 32 lowercase hex characters.
pub fn content_node_id(label: &str) -> String {
    let digest = Sha256::digest(label.as_bytes());
    hex::encode(&digest[..16])
}

pub fn relation_for(position: usize) -> &'static str {
    RELATIONS[position % RELATIONS.len()]
}

/// Build the heuristic graph for `idea`.
pub fn build_heuristic_graph(idea: &Idea) -> Graph {
    let root_id = idea.id.to_string();

    let mut nodes = Vec::with_capacity(idea.answers.len() + 1);
    let mut edges = Vec::with_capacity(idea.answers.len());

    nodes.push(Node {
        id: root_id.clone(),
        label: idea.text.clone(),
        kind: NodeKind::Idea,
        priority: Priority::highest(),
        notes: "Main idea".to_string(),
    });

    for (position, (question, answer)) in idea.answers.iter().enumerate() {
        let id = content_node_id(answer);
        nodes.push(Node {
            id: id.clone(),
            label: answer.clone(),
            kind: NodeKind::Feature,
            priority: Priority::default(),
            notes: question.clone(),
        });
        edges.push(Edge {
            from: root_id.clone(),
            to: id,
            relation: relation_for(position).to_string(),
        });
    }

    Graph { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answered_idea(pairs: &[(&str, &str)]) -> Idea {
        let mut idea = Idea::new("Build a todo app");
        for (q, a) in pairs {
            idea.questions.push(q.to_string());
            idea.answers.insert(q.to_string(), a.to_string());
        }
        idea
    }

    #[test]
    fn test_content_id_is_stable_sha256_prefix() {
        // SHA-256("abc") = ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad
        assert_eq!(content_node_id("abc"), "ba7816bf8f01cfea414140de5dae2223");
        assert_eq!(content_node_id("Mobile app"), content_node_id("Mobile app"));
        assert_ne!(content_node_id("Mobile app"), content_node_id("mobile app"));
    }

    #[test]
    fn test_root_node_shape() {
        let idea = answered_idea(&[]);
        let graph = build_heuristic_graph(&idea);

        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.edges.is_empty());
        let root = &graph.nodes[0];
        assert_eq!(root.id, idea.id.to_string());
        assert_eq!(root.label, "Build a todo app");
        assert_eq!(root.kind, NodeKind::Idea);
        assert_eq!(root.priority.value(), 5);
        assert_eq!(root.notes, "Main idea");
    }

    #[test]
    fn test_counts_and_relation_cycle() {
        let pairs: Vec<(String, String)> = (0..7)
            .map(|i| (format!("Question {}?", i), format!("Answer {}", i)))
            .collect();
        let refs: Vec<(&str, &str)> = pairs.iter().map(|(q, a)| (q.as_str(), a.as_str())).collect();
        let idea = answered_idea(&refs);

        let graph = build_heuristic_graph(&idea);
        assert_eq!(graph.nodes.len(), 1 + 7);
        assert_eq!(graph.edges.len(), 7);

        let relations: Vec<&str> = graph.edges.iter().map(|e| e.relation.as_str()).collect();
        assert_eq!(
            relations,
            vec![
                "is defined by",
                "depends on",
                "leads to",
                "is a part of",
                "has feature",
                "is defined by",
                "depends on",
            ]
        );

        for (edge, node) in graph.edges.iter().zip(&graph.nodes[1..]) {
            assert_eq!(edge.from, idea.id.to_string());
            assert_eq!(edge.to, node.id);
            assert_eq!(node.kind, NodeKind::Feature);
        }
        assert_eq!(graph.nodes[3].notes, "Question 2?");
        assert_eq!(graph.nodes[3].label, "Answer 2");
    }

    #[test]
    fn test_same_input_yields_identical_output() {
        let idea = answered_idea(&[("Who?", "Students"), ("Where?", "Web and mobile")]);
        let first = build_heuristic_graph(&idea);
        let second = build_heuristic_graph(&idea.clone());
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }
}
