//! Built-in prompt templates
//!
//! Used for any template without an override file in the prompts directory.

/// Clarifying questions for a raw idea. Placeholder: `{{idea_text}}`.
pub const QUESTIONS: &str = r#"You are a product strategist helping someone turn a rough idea into a buildable project.

Idea:
{{idea_text}}

Ask exactly 5 clarifying questions that would most change how this idea gets built.
Focus on the target users, the core features, constraints (budget, time, platform), integrations, and what success looks like.

Format each question on its own line like this:
1. **Question:** <the question> *Clarifies: <what the answer pins down>*

Do not add an introduction or a summary.
"#;

/// Dependency graph from the idea and its answers.
/// Placeholders: `{{idea_text}}`, `{{qa_pairs}}`.
pub const GRAPH: &str = r#"You are a software architect. Break the idea below into a dependency graph of features.

Idea:
{{idea_text}}

Clarifying answers (question: answer):
{{qa_pairs}}

Return ONLY a JSON object with this exact shape, no commentary:
{
  "nodes": [
    {"id": "string", "label": "string", "type": "idea | feature | <other>", "priority": 0, "notes": "string"}
  ],
  "edges": [
    {"from": "node id", "to": "node id", "relation": "depends_on"}
  ]
}

Rules:
- Include exactly one node of type "idea" for the idea itself, with priority 5.
- "priority" is an integer from 0 (lowest) to 5 (highest).
- Every edge must reference node ids that appear in "nodes".
- Use short, specific relation labels such as "depends_on", "enables" or "part_of".
"#;

/// Full replacement of an existing graph following a user instruction.
/// Placeholders: `{{existing_graph}}`, `{{user_text_input}}`.
pub const EDIT_GRAPH: &str = r#"You maintain a dependency graph of features for a software project.

Current graph:
{{existing_graph}}

Requested change:
{{user_text_input}}

Apply the change and return the COMPLETE updated graph as a single JSON object with "nodes" and "edges" arrays, using the same field names as the current graph.
Keep ids of unchanged nodes stable. "priority" must stay an integer from 0 to 5.
Return ONLY the JSON object, no commentary.
"#;

/// Markdown execution plan from a graph. Placeholder: `{{graph_json}}`.
pub const PLAN: &str = r#"You are a technical project lead. Write an execution plan for the project described by this dependency graph.

Graph:
{{graph_json}}

Write the plan in Markdown with these sections:
# Overview
# Milestones
# Tasks (ordered so that dependencies come first; reference node labels)
# Risks
# Next Steps

Prioritise higher-priority nodes. Be concrete and concise.
"#;
