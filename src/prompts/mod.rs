//! Prompt templates.
//!
//! Four named templates drive the pipeline. Each one is compiled in (see
//! [`embedded`]) and may be replaced by a `{name}.txt` file in a prompts
//! directory. Placeholders are literal `{{name}}` tokens substituted in a
//! single pass, so substituted text is never re-scanned.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

pub mod embedded;

/// The templates the pipeline renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptName {
    Questions,
    Graph,
    EditGraph,
    Plan,
}

impl PromptName {
    pub const ALL: [PromptName; 4] = [Self::Questions, Self::Graph, Self::EditGraph, Self::Plan];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Questions => "questions",
            Self::Graph => "graph",
            Self::EditGraph => "edit_graph",
            Self::Plan => "plan",
        }
    }

    fn embedded(&self) -> &'static str {
        match self {
            Self::Questions => embedded::QUESTIONS,
            Self::Graph => embedded::GRAPH,
            Self::EditGraph => embedded::EDIT_GRAPH,
            Self::Plan => embedded::PLAN,
        }
    }
}

/// The loaded set of templates.
#[derive(Debug, Clone)]
pub struct Prompts {
    questions: String,
    graph: String,
    edit_graph: String,
    plan: String,
}

impl Default for Prompts {
    fn default() -> Self {
        Self::embedded()
    }
}

impl Prompts {
    pub fn embedded() -> Self {
        Self {
            questions: embedded::QUESTIONS.to_string(),
            graph: embedded::GRAPH.to_string(),
            edit_graph: embedded::EDIT_GRAPH.to_string(),
            plan: embedded::PLAN.to_string(),
        }
    }

    /// Load templates, preferring `{dir}/{name}.txt` over the embedded copy.
    pub fn load(dir: Option<&Path>) -> Result<Self> {
        let mut prompts = Self::embedded();
        let Some(dir) = dir else {
            return Ok(prompts);
        };

        for name in PromptName::ALL {
            let path = dir.join(format!("{}.txt", name.as_str()));
            if !path.exists() {
                debug!(template = name.as_str(), "load: using embedded template");
                continue;
            }
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read prompt template {}", path.display()))?;
            info!(template = name.as_str(), path = %path.display(), "load: using template override");
            *prompts.slot(name) = text;
        }
        Ok(prompts)
    }

    fn slot(&mut self, name: PromptName) -> &mut String {
        match name {
            PromptName::Questions => &mut self.questions,
            PromptName::Graph => &mut self.graph,
            PromptName::EditGraph => &mut self.edit_graph,
            PromptName::Plan => &mut self.plan,
        }
    }

    pub fn template(&self, name: PromptName) -> &str {
        match name {
            PromptName::Questions => &self.questions,
            PromptName::Graph => &self.graph,
            PromptName::EditGraph => &self.edit_graph,
            PromptName::Plan => &self.plan,
        }
    }

    pub fn questions(&self, idea_text: &str) -> String {
        render(&self.questions, &[("idea_text", idea_text)])
    }

    pub fn graph(&self, idea_text: &str, qa_pairs: &str) -> String {
        render(&self.graph, &[("idea_text", idea_text), ("qa_pairs", qa_pairs)])
    }

    pub fn edit_graph(&self, existing_graph: &str, instruction: &str) -> String {
        render(
            &self.edit_graph,
            &[("existing_graph", existing_graph), ("user_text_input", instruction)],
        )
    }

    pub fn plan(&self, graph_json: &str) -> String {
        render(&self.plan, &[("graph_json", graph_json)])
    }
}

/// Replace each `{{key}}` in `template` with its value. Unknown placeholders
/// are left as they are.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let key = &after_open[..end];
        match vars.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after_open[end + 2..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_known_placeholders() {
        let out = render("Idea: {{idea_text}}\n{{qa_pairs}}", &[("idea_text", "Todo app"), ("qa_pairs", "Who?: Me")]);
        assert_eq!(out, "Idea: Todo app\nWho?: Me");
    }

    #[test]
    fn test_render_leaves_unknown_and_unterminated_tokens() {
        assert_eq!(render("{{nope}} and {{idea_text", &[("idea_text", "x")]), "{{nope}} and {{idea_text");
    }

    #[test]
    fn test_substituted_values_are_not_rescanned() {
        let out = render("{{user_text_input}}|{{existing_graph}}", &[
            ("existing_graph", "{}"),
            ("user_text_input", "mention {{existing_graph}} literally"),
        ]);
        assert_eq!(out, "mention {{existing_graph}} literally|{}");
    }

    #[test]
    fn test_embedded_templates_carry_their_placeholders() {
        let prompts = Prompts::embedded();
        assert!(prompts.template(PromptName::Questions).contains("{{idea_text}}"));
        assert!(prompts.template(PromptName::Graph).contains("{{qa_pairs}}"));
        assert!(prompts.template(PromptName::EditGraph).contains("{{user_text_input}}"));
        assert!(prompts.template(PromptName::Plan).contains("{{graph_json}}"));
        assert!(!prompts.plan("{}").contains("{{graph_json}}"));
    }

    #[test]
    fn test_override_directory_replaces_single_template() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("plan.txt"), "PLAN FOR {{graph_json}}").unwrap();

        let prompts = Prompts::load(Some(dir.path())).unwrap();
        assert_eq!(prompts.plan("G"), "PLAN FOR G");
        assert_eq!(prompts.template(PromptName::Questions), embedded::QUESTIONS);
    }
}
