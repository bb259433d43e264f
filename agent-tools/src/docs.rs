//! Line-oriented parser for tool documentation comments.
//!
//! The grammar has exactly two markers:
//!
//! ```text
//! :param <name>: <free text>
//! :return: <free text>
//! ```
//!
//! Everything before the first line starting with `:param` or `:return` is the
//! tool description, even when that line is not a well-formed marker.

use std::sync::LazyLock;

use regex::Regex;

static PARAM_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*:param\s+(\w+):\s*(.*)$").expect("PARAM_LINE should be valid")
});

static RETURN_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*:return:\s*(.*)$").expect("RETURN_LINE should be valid"));

static FIELD_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*:(param|return)").expect("FIELD_START should be valid"));

/// Structured view of a tool documentation comment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedDoc {
    description: String,
    params: Vec<(String, String)>,
    returns: Option<String>,
}

impl ParsedDoc {
    /// Leading prose, trimmed.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Documented parameters in first-seen order.
    #[must_use]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Returns the documentation attached to `name`, if any.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(param, _)| param == name)
            .map(|(_, doc)| doc.as_str())
    }

    /// Return value documentation, if present.
    #[must_use]
    pub fn returns(&self) -> Option<&str> {
        self.returns.as_deref()
    }
}

/// Parses a documentation comment. Never fails: unrecognised lines after the
/// first marker are ignored.
#[must_use]
pub fn parse_doc(doc: &str) -> ParsedDoc {
    let lines: Vec<&str> = doc.lines().collect();
    let split = lines
        .iter()
        .position(|line| FIELD_START.is_match(line))
        .unwrap_or(lines.len());

    let description = lines[..split].join("\n").trim().to_owned();

    let mut params: Vec<(String, String)> = Vec::new();
    let mut returns = None;

    for line in &lines[split..] {
        if let Some(caps) = PARAM_LINE.captures(line) {
            let name = caps[1].to_owned();
            let text = caps[2].trim().to_owned();
            match params.iter_mut().find(|(param, _)| *param == name) {
                Some(entry) => entry.1 = text,
                None => params.push((name, text)),
            }
        } else if returns.is_none() {
            if let Some(caps) = RETURN_LINE.captures(line) {
                returns = Some(caps[1].trim().to_owned());
            }
        }
    }

    ParsedDoc {
        description,
        params,
        returns,
    }
}
