//! Pipeline orchestration.
//!
//! [`Pipeline`] sequences the stages for one idea:
//!
//! ```text
//! ingest → generate_questions → submit_answers → build_graph → get_plan
//! ```
//!
//! Every stage reads its inputs from the [`ArtifactStore`] and writes its
//! output back before returning, so nothing survives between calls except
//! what is stored. Only two operations consult existing output instead of
//! regenerating it: [`Pipeline::load_or_build_graph`] and
//! [`Pipeline::get_plan`]. A stored plan is returned forever, even after the
//! graph changes.
//!
//! Operations on the same idea are not serialized against each other.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::gateway::{self, Gateway};
use crate::heuristic;
use crate::models::{Answers, Graph, Idea, IdeaStatus, PipelineStage, Plan};
use crate::parser;
use crate::prompts::Prompts;
use crate::store::{self, ArtifactKind, ArtifactStore};

#[derive(Clone)]
pub struct Pipeline {
    store: Arc<dyn ArtifactStore>,
    gateway: Gateway,
    prompts: Arc<Prompts>,
}

impl Pipeline {
    pub fn new(store: Arc<dyn ArtifactStore>, gateway: Gateway, prompts: Prompts) -> Self {
        Self {
            store,
            gateway,
            prompts: Arc::new(prompts),
        }
    }

    /// Wire up the store, Gemini backend and prompts described by `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let store = store::open_store(&config.storage)?;
        let gateway = Gateway::new(gateway::backend_from_config(&config.gemini));
        let prompts = Prompts::load(config.prompts_dir.as_deref())?;
        Ok(Self::new(store, gateway, prompts))
    }

    // ============================================================
    // Ideas
    // ============================================================

    /// Create and persist a new idea, returning its id.
    pub fn ingest(&self, text: &str) -> Result<Uuid> {
        if text.trim().is_empty() {
            return Err(PipelineError::InvalidInput("idea text cannot be empty".into()));
        }

        let idea = Idea::new(text);
        self.save_idea(&idea)?;
        info!(idea_id = %idea.id, "ingest: idea stored");
        Ok(idea.id)
    }

    pub fn get_idea(&self, idea_id: Uuid) -> Result<Idea> {
        store::load_json::<Idea>(self.store.as_ref(), idea_id, ArtifactKind::Idea)?
            .ok_or_else(|| PipelineError::idea_not_found(idea_id))
    }

    /// The idea and the furthest stage its stored artifacts show.
    pub fn status(&self, idea_id: Uuid) -> Result<IdeaStatus> {
        let idea = self.get_idea(idea_id)?;

        let stage = if self.store.get(idea_id, ArtifactKind::Plan)?.is_some() {
            PipelineStage::Planned
        } else if self.store.get(idea_id, ArtifactKind::Graph)?.is_some() {
            PipelineStage::Graphed
        } else if !idea.answers.is_empty() {
            PipelineStage::Answered
        } else if !idea.questions.is_empty() {
            PipelineStage::Questioned
        } else {
            PipelineStage::Ingested
        };

        Ok(IdeaStatus { idea, stage })
    }

    // ============================================================
    // Questions & answers
    // ============================================================

    /// Generate clarifying questions, replacing any earlier list.
    ///
    /// Answers survive only for questions that appear in the new list.
    pub async fn generate_questions(&self, idea_id: Uuid) -> Result<Vec<String>> {
        debug!(%idea_id, "generate_questions: called");
        let mut idea = self.get_idea(idea_id)?;

        let prompt = self.prompts.questions(&idea.text);
        let response = self.gateway.generate(&prompt).await?;
        let questions = parser::parse_questions(&response);
        if questions.is_empty() {
            warn!(%idea_id, "generate_questions: no questions recognised in model output");
        }

        let before = idea.answers.len();
        idea.answers.retain(|question, _| questions.contains(question));
        if idea.answers.len() < before {
            debug!(%idea_id, dropped = before - idea.answers.len(), "generate_questions: dropped stale answers");
        }
        idea.questions = questions.clone();
        self.save_idea(&idea)?;
        info!(%idea_id, count = questions.len(), "generate_questions: questions stored");
        Ok(questions)
    }

    /// Merge `answers` into the idea. Later values replace earlier ones for
    /// the same question; new questions are appended in the order given.
    ///
    /// Nothing is written unless every key is one of the idea's questions.
    pub fn submit_answers(&self, idea_id: Uuid, answers: Answers) -> Result<Idea> {
        debug!(%idea_id, count = answers.len(), "submit_answers: called");
        let mut idea = self.get_idea(idea_id)?;

        if idea.questions.is_empty() {
            return Err(PipelineError::Precondition(
                "no questions generated for this idea yet; generate questions first".into(),
            ));
        }

        if let Some(unknown) = answers.keys().find(|q| !idea.has_question(q)) {
            return Err(PipelineError::InvalidInput(format!(
                "answer provided for unknown question: {}",
                unknown
            )));
        }

        idea.answers.extend(answers);
        self.save_idea(&idea)?;
        info!(%idea_id, answered = idea.answers.len(), "submit_answers: answers stored");
        Ok(idea)
    }

    // ============================================================
    // Graph
    // ============================================================

    pub fn load_graph(&self, idea_id: Uuid) -> Result<Option<Graph>> {
        Ok(store::load_json::<Graph>(self.store.as_ref(), idea_id, ArtifactKind::Graph)?)
    }

    /// Generate a graph with the model and store it, replacing any earlier one.
    pub async fn build_graph(&self, idea_id: Uuid) -> Result<Graph> {
        debug!(%idea_id, "build_graph: called");
        let idea = self.get_idea(idea_id)?;

        let prompt = self.prompts.graph(&idea.text, &idea.qa_pairs());
        let response = self.gateway.generate(&prompt).await?;
        let graph = parser::parse_graph(&response).inspect_err(|e| {
            warn!(%idea_id, reason = %e.reason, "build_graph: model returned an invalid graph");
        })?;

        self.save_graph(idea_id, &graph)?;
        info!(%idea_id, nodes = graph.nodes.len(), edges = graph.edges.len(), "build_graph: graph stored");
        Ok(graph)
    }

    /// Build a graph from the stored answers without calling the model, and
    /// store it.
    pub fn build_heuristic_graph(&self, idea_id: Uuid) -> Result<Graph> {
        debug!(%idea_id, "build_heuristic_graph: called");
        let idea = self.get_idea(idea_id)?;
        let graph = heuristic::build_heuristic_graph(&idea);
        self.save_graph(idea_id, &graph)?;
        info!(%idea_id, nodes = graph.nodes.len(), "build_heuristic_graph: graph stored");
        Ok(graph)
    }

    /// The stored graph, or a freshly generated one if there is none.
    pub async fn load_or_build_graph(&self, idea_id: Uuid) -> Result<Graph> {
        match self.load_graph(idea_id)? {
            Some(graph) => {
                debug!(%idea_id, "load_or_build_graph: using stored graph");
                Ok(graph)
            }
            None => self.build_graph(idea_id).await,
        }
    }

    /// Ask the model to rewrite the stored graph according to `instruction`.
    /// The response replaces the graph wholesale.
    pub async fn edit_graph(&self, idea_id: Uuid, instruction: &str) -> Result<Graph> {
        debug!(%idea_id, "edit_graph: called");
        if instruction.trim().is_empty() {
            return Err(PipelineError::InvalidInput("edit instruction cannot be empty".into()));
        }

        let existing = self
            .load_graph(idea_id)?
            .ok_or_else(|| PipelineError::graph_not_found(idea_id))?;

        let existing_json = to_pretty_json(&existing)?;
        let prompt = self.prompts.edit_graph(&existing_json, instruction);
        let response = self.gateway.generate(&prompt).await?;
        let graph = parser::parse_graph(&response).inspect_err(|e| {
            warn!(%idea_id, reason = %e.reason, "edit_graph: model returned an invalid graph");
        })?;

        self.save_graph(idea_id, &graph)?;
        info!(%idea_id, nodes = graph.nodes.len(), edges = graph.edges.len(), "edit_graph: graph stored");
        Ok(graph)
    }

    // ============================================================
    // Plan
    // ============================================================

    /// The stored plan, or a newly generated one.
    ///
    /// Generation uses the stored graph when present and builds one with the
    /// model otherwise. The model's text is stored verbatim.
    pub async fn get_plan(&self, idea_id: Uuid) -> Result<Plan> {
        debug!(%idea_id, "get_plan: called");
        if let Some(markdown) = store::load_text(self.store.as_ref(), idea_id, ArtifactKind::Plan)? {
            debug!(%idea_id, "get_plan: using stored plan");
            return Ok(Plan { idea_id, markdown });
        }

        let graph = self.load_or_build_graph(idea_id).await?;
        let prompt = self.prompts.plan(&to_pretty_json(&graph)?);
        let markdown = self.gateway.generate(&prompt).await?;

        store::save_text(self.store.as_ref(), idea_id, ArtifactKind::Plan, &markdown)?;
        info!(%idea_id, bytes = markdown.len(), "get_plan: plan stored");
        Ok(Plan { idea_id, markdown })
    }

    // ============================================================
    // Helpers
    // ============================================================

    fn save_idea(&self, idea: &Idea) -> Result<()> {
        Ok(store::save_json(self.store.as_ref(), idea.id, ArtifactKind::Idea, idea)?)
    }

    fn save_graph(&self, idea_id: Uuid, graph: &Graph) -> Result<()> {
        Ok(store::save_json(self.store.as_ref(), idea_id, ArtifactKind::Graph, graph)?)
    }
}

fn to_pretty_json(graph: &Graph) -> Result<String> {
    serde_json::to_string_pretty(graph)
        .map_err(|e| PipelineError::Storage(anyhow::Error::new(e).context("Failed to serialize graph")))
}
