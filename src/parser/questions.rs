//! Question extraction from free-form model output.
//!
//! Models rarely follow the requested format exactly, so each line goes
//! through a small classifier instead of a grammar:
//!
//! | Line shape | Rule |
//! |---|---|
//! | list item with a `Question:` label | text after the label, `Clarifies:` tail and `*` removed |
//! | list item without a label, ending in `?` | marker and `*` removed |
//! | plain line ending in `?` | `*` removed |
//! | anything else | dropped |
//!
//! List items start with an ordinal `1.` to `5.` (or `1)` to `5)`) or a `*`,
//! `-`, `+`, `•` bullet, followed by whitespace. Lines that end up empty are dropped.

use std::sync::LazyLock;

use regex::Regex;

static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[1-5][.)]|[*\-+•])\s+").expect("list marker regex is valid"));

static QUESTION_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)question\s*:").expect("question label regex is valid"));

static CLARIFIES_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)clarifies\s*:").expect("clarifies label regex is valid"));

/// Extract the ordered list of questions from generated text.
pub fn parse_questions(text: &str) -> Vec<String> {
    text.lines().filter_map(classify_line).collect()
}

/// Apply the extraction rules to a single line.
pub fn classify_line(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (is_list_item, body) = match LIST_MARKER.find(line) {
        Some(m) => (true, &line[m.end()..]),
        None => (false, line),
    };

    let question = match QUESTION_LABEL.find(body) {
        Some(label) => {
            let labeled = clean(&body[label.end()..]);
            if is_list_item || labeled.ends_with('?') {
                labeled
            } else {
                String::new()
            }
        }
        None => {
            let plain = strip_emphasis(body);
            if plain.ends_with('?') {
                plain
            } else {
                String::new()
            }
        }
    };

    (!question.is_empty()).then_some(question)
}

/// Drop a trailing `Clarifies:` annotation and emphasis markers.
fn clean(segment: &str) -> String {
    let segment = match CLARIFIES_LABEL.find(segment) {
        Some(m) => &segment[..m.start()],
        None => segment,
    };
    strip_emphasis(segment)
        .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, '(' | '[' | '-' | '–' | '—' | '|'))
        .to_string()
}

fn strip_emphasis(s: &str) -> String {
    s.replace('*', "").trim().to_string()
}
