//! Inline mention markup of the form `@[display](id)`.
//!
//! Prompts reference canned marking templates with this markup. The grammar is
//! deliberately small: the first `]` closes the display text and the first `)` closes the
//! id, so a display text containing `]` or an id containing `)` cannot be represented.
//! [`encode`] rejects such values instead of producing markup that decodes differently.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{Error, Result};

pub mod templates;

static MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@\[([^\]]+)\]\(([^)]+)\)").expect("mention pattern is a valid regex")
});

/// One span of decoded text, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Segment {
    Literal { text: String },
    Reference { display: String, id: String },
}

/// A segment after looking its id up in the template table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Resolved {
    Literal { text: String },
    Template { id: String, text: &'static str },
    /// Unknown id; rendered with the original display text.
    Unresolved { display: String, id: String },
}

/// A template offered in the mention picker, with the markup it inserts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub id: &'static str,
    pub markup: String,
}

impl Segment {
    pub fn resolve(self) -> Resolved {
        match self {
            Self::Literal { text } => Resolved::Literal { text },
            Self::Reference { display, id } => match templates::lookup(&id) {
                Some(text) => Resolved::Template { id, text },
                None => Resolved::Unresolved { display, id },
            },
        }
    }
}

impl Resolved {
    /// Text shown for this span.
    pub fn text(&self) -> &str {
        match self {
            Self::Literal { text } => text,
            Self::Template { text, .. } => text,
            Self::Unresolved { display, .. } => display,
        }
    }
}

pub fn encode(display: &str, id: &str) -> Result<String> {
    if display.is_empty() || id.is_empty() {
        return Err(Error::invalid_input("mention display text and id must not be empty"));
    }
    if display.contains(']') {
        return Err(Error::invalid_input(format!(
            "mention display text may not contain ']': {display}"
        )));
    }
    if id.contains(')') {
        return Err(Error::invalid_input(format!(
            "mention id may not contain ')': {id}"
        )));
    }

    Ok(format!("@[{display}]({id})"))
}

/// Markup a subject template is inserted as; the display text is the id itself.
/// `None` for an id the markup cannot carry.
pub fn canonical_markup(id: &str) -> Option<String> {
    encode(id, id).ok()
}

/// Every known template in display order, as the picker inserts it.
pub fn suggestions() -> Result<Vec<Suggestion>> {
    templates::ids()
        .map(|id| -> Result<Suggestion> {
            Ok(Suggestion {
                id,
                markup: encode(id, id)?,
            })
        })
        .collect()
}

pub fn decode(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in MENTION.captures_iter(text) {
        let (Some(whole), Some(display), Some(id)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };

        if whole.start() > last {
            segments.push(Segment::Literal {
                text: text[last..whole.start()].to_string(),
            });
        }

        segments.push(Segment::Reference {
            display: display.as_str().to_string(),
            id: id.as_str().to_string(),
        });
        last = whole.end();
    }

    if last < text.len() {
        segments.push(Segment::Literal {
            text: text[last..].to_string(),
        });
    }

    segments
}

pub fn resolve(text: &str) -> Vec<Resolved> {
    decode(text).into_iter().map(Segment::resolve).collect()
}

/// Known references replaced by their template text, unknown ones by their display text.
pub fn preview(text: &str) -> String {
    resolve(text).iter().map(Resolved::text).collect()
}

pub fn contains_mentions(text: &str) -> bool {
    MENTION.is_match(text)
}

/// Replace known references with their template text. Unknown markup is kept verbatim.
pub fn expand(text: &str) -> String {
    MENTION
        .replace_all(text, |caps: &regex::Captures| match templates::lookup(&caps[2]) {
            Some(template) => template.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Replace every reference with its display text.
pub fn render_display(text: &str) -> String {
    MENTION.replace_all(text, "$1").into_owned()
}
