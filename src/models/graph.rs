use serde::{Deserialize, Serialize};

/// Relation used when a generated edge omits one.
pub const DEFAULT_RELATION: &str = "depends_on";

/// A dependency graph for one idea.
///
/// Both arrays are required when deserializing; a payload missing either key
/// is rejected rather than treated as empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// A node in an idea's dependency graph.
///
/// The root node uses the idea's own identifier; nodes derived from answers
/// use a content hash of their label so rebuilding yields the same ids.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub label: String,
    #[serde(rename = "type", default)]
    pub kind: NodeKind,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub notes: String,
}

/// A directed edge between two nodes. Duplicate edges are permitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Edge {
    #[serde(alias = "from_node")]
    pub from: String,
    #[serde(alias = "to_node")]
    pub to: String,
    #[serde(default = "default_relation")]
    pub relation: String,
}

fn default_relation() -> String {
    DEFAULT_RELATION.to_string()
}

/// The kind of a node.
///
/// `idea` and `feature` are produced by this crate; any other string coming
/// back from the model is kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Idea,
    #[default]
    Feature,
    Other(String),
}

impl NodeKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Idea => "idea",
            Self::Feature => "feature",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for NodeKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "idea" => Self::Idea,
            "feature" => Self::Feature,
            _ => Self::Other(s),
        }
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

/// Node priority, an integer in `0..=5`.
///
/// Out-of-range values fail deserialization, which is how generated graphs
/// with bad priorities are rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Priority(u8);

impl Priority {
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Option<Self> {
        (value <= Self::MAX).then_some(Self(value))
    }

    pub fn highest() -> Self {
        Self(Self::MAX)
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Priority {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| format!("priority {} is outside 0..={}", value, Self::MAX))
    }
}

impl From<Priority> for u8 {
    fn from(p: Priority) -> Self {
        p.0
    }
}
