use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Answers keyed by question text.
///
/// The map preserves insertion order and serializes as a JSON object in that
/// order, so anything derived from the answers (see
/// [`build_heuristic_graph`](crate::heuristic::build_heuristic_graph)) is
/// reproducible for a given record.
pub type Answers = IndexMap<String, String>;

/// The root unit of work: raw idea text plus the questions generated for it
/// and the answers recorded so far.
///
/// # Lifecycle
/// Created on ingestion with no questions and no answers. Question generation
/// replaces `questions`; answer submission merges into `answers`. Ideas are
/// never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Idea {
    pub id: Uuid,
    pub text: String,
    #[serde(default)]
    pub questions: Vec<String>,
    /// Every key is one of `questions`. Regenerating questions drops answers
    /// whose question is no longer listed.
    #[serde(default)]
    pub answers: Answers,
}

impl Idea {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            questions: Vec::new(),
            answers: Answers::new(),
        }
    }

    pub fn has_question(&self, question: &str) -> bool {
        self.questions.iter().any(|q| q == question)
    }

    /// `question: answer` lines in answer order, as embedded in graph prompts.
    pub fn qa_pairs(&self) -> String {
        self.answers
            .iter()
            .map(|(q, a)| format!("{}: {}", q, a))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// How far an idea has progressed through the pipeline.
///
/// Stages are ordered: `Ingested < Questioned < Answered < Graphed < Planned`.
/// The stage is derived from the stored artifacts rather than persisted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Ingested,
    Questioned,
    Answered,
    Graphed,
    Planned,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ingested => "ingested",
            Self::Questioned => "questioned",
            Self::Answered => "answered",
            Self::Graphed => "graphed",
            Self::Planned => "planned",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ingested" => Some(Self::Ingested),
            "questioned" => Some(Self::Questioned),
            "answered" => Some(Self::Answered),
            "graphed" => Some(Self::Graphed),
            "planned" => Some(Self::Planned),
            _ => None,
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An idea together with the furthest stage it has reached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdeaStatus {
    pub idea: Idea,
    pub stage: PipelineStage,
}

/// Input for creating a new idea.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateIdeaInput {
    pub text: String,
}

/// Response returned when an idea is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdeaCreated {
    pub idea_id: Uuid,
}

/// Response carrying the generated clarifying questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionsResponse {
    pub questions: Vec<String>,
}
