//! Subject selection for the assignment form.
//!
//! Picking Biology or History fills the additional prompt with that subject's template
//! markup; Custom (or no subject) empties it. Discarding a prompt the user wrote needs an
//! explicit yes from a [`Confirm`] gate.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::mention::{
    self, canonical_markup,
    templates::{BIOLOGY_PROMPT_ID, HISTORY_PROMPT_ID},
};

pub const DISCARD_PROMPT_QUESTION: &str =
    "Changing the subject will reset your additional prompt. Do you want to proceed?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subject {
    Biology,
    History,
    Custom,
}

impl Subject {
    pub const ALL: [Subject; 3] = [Subject::Biology, Subject::History, Subject::Custom];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Biology => "Biology",
            Self::History => "History",
            Self::Custom => "Custom",
        }
    }

    /// Template id this subject is bound to, if any.
    pub fn template_id(&self) -> Option<&'static str> {
        match self {
            Self::Biology => Some(BIOLOGY_PROMPT_ID),
            Self::History => Some(HISTORY_PROMPT_ID),
            Self::Custom => None,
        }
    }

    /// The prompt a fresh selection of this subject starts with.
    pub fn initial_prompt(&self) -> String {
        self.template_id().and_then(canonical_markup).unwrap_or_default()
    }
}

impl Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subject {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Subject::ALL
            .into_iter()
            .find(|subject| subject.as_str() == s)
            .ok_or_else(|| Error::invalid_input(format!("unknown subject: {s}")))
    }
}

/// A yes/no decision point before unsaved input is thrown away.
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, question: &str) -> bool {
        self(question)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Selection {
    /// Subject and prompt were updated.
    Applied,
    /// The user declined; nothing changed.
    Declined,
}

/// Subject and additional prompt of the assignment being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptEditor {
    subject: Option<Subject>,
    prompt: String,
}

impl PromptEditor {
    pub fn new(subject: Option<Subject>, prompt: impl Into<String>) -> Self {
        Self {
            subject,
            prompt: prompt.into(),
        }
    }

    pub fn subject(&self) -> Option<Subject> {
        self.subject
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Whether the current prompt is something the user wrote, rather than empty or one
    /// of the template markups a subject inserts.
    pub fn has_authored_prompt(&self) -> bool {
        let trimmed = self.prompt.trim();
        !trimmed.is_empty()
            && !Subject::ALL
                .iter()
                .filter_map(Subject::template_id)
                .any(|id| canonical_markup(id).as_deref() == Some(trimmed))
    }

    pub fn select(&mut self, next: Option<Subject>, gate: &mut impl Confirm) -> Selection {
        let next_prompt = next.map(|s| s.initial_prompt()).unwrap_or_default();

        if next_prompt != self.prompt
            && self.has_authored_prompt()
            && !gate.confirm(DISCARD_PROMPT_QUESTION)
        {
            return Selection::Declined;
        }

        self.subject = next;
        self.prompt = next_prompt;
        Selection::Applied
    }

    /// Prompt with template references replaced by their text.
    pub fn expanded_prompt(&self) -> String {
        mention::expand(&self.prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        answer: bool,
        asked: Vec<String>,
    }

    impl Confirm for Recorder {
        fn confirm(&mut self, question: &str) -> bool {
            self.asked.push(question.to_string());
            self.answer
        }
    }

    fn recorder(answer: bool) -> Recorder {
        Recorder {
            answer,
            asked: Vec::new(),
        }
    }

    #[test]
    fn test_subject_round_trips_through_str() {
        for subject in Subject::ALL {
            assert_eq!(subject.as_str().parse::<Subject>().unwrap(), subject);
        }
        assert!("Chemistry".parse::<Subject>().is_err());
    }

    #[test]
    fn test_selecting_template_subject_inserts_markup() {
        let mut editor = PromptEditor::default();
        let mut gate = recorder(true);

        assert_eq!(editor.select(Some(Subject::Biology), &mut gate), Selection::Applied);
        assert_eq!(editor.prompt(), "@[biology-prompt](biology-prompt)");

        assert_eq!(editor.select(Some(Subject::History), &mut gate), Selection::Applied);
        assert_eq!(editor.prompt(), "@[history-prompt](history-prompt)");
        assert_eq!(editor.subject(), Some(Subject::History));

        // Swapping one template for another never asks.
        assert!(gate.asked.is_empty());
    }

    #[test]
    fn test_leaving_custom_with_content_declined() {
        let mut editor = PromptEditor::new(Some(Subject::Custom), "abc");
        let mut gate = recorder(false);

        assert_eq!(editor.select(Some(Subject::History), &mut gate), Selection::Declined);
        assert_eq!(editor.prompt(), "abc");
        assert_eq!(editor.subject(), Some(Subject::Custom));
        assert_eq!(gate.asked, vec![DISCARD_PROMPT_QUESTION.to_string()]);
    }

    #[test]
    fn test_leaving_custom_with_content_confirmed() {
        let mut editor = PromptEditor::new(Some(Subject::Custom), "abc");
        let mut gate = recorder(true);

        assert_eq!(editor.select(Some(Subject::History), &mut gate), Selection::Applied);
        assert_eq!(editor.prompt(), "@[history-prompt](history-prompt)");
        assert_eq!(editor.subject(), Some(Subject::History));
    }

    #[test]
    fn test_leaving_empty_custom_does_not_ask() {
        let mut editor = PromptEditor::new(Some(Subject::Custom), "");
        let mut gate = recorder(false);

        assert_eq!(editor.select(Some(Subject::Biology), &mut gate), Selection::Applied);
        assert!(gate.asked.is_empty());
    }

    #[test]
    fn test_selecting_custom_over_template_clears_without_asking() {
        let mut editor = PromptEditor::default();
        let mut gate = recorder(false);
        editor.select(Some(Subject::Biology), &mut gate);

        assert_eq!(editor.select(Some(Subject::Custom), &mut gate), Selection::Applied);
        assert_eq!(editor.prompt(), "");
        assert!(gate.asked.is_empty());
    }

    #[test]
    fn test_reselecting_custom_over_edits_asks() {
        let mut editor = PromptEditor::new(Some(Subject::Custom), "my own rubric");
        let mut gate = recorder(false);

        assert_eq!(editor.select(Some(Subject::Custom), &mut gate), Selection::Declined);
        assert_eq!(editor.prompt(), "my own rubric");
        assert_eq!(gate.asked.len(), 1);
    }

    #[test]
    fn test_edited_template_prompt_counts_as_authored() {
        let mut editor = PromptEditor::new(
            Some(Subject::Biology),
            "@[biology-prompt](biology-prompt) and label diagrams",
        );
        assert!(editor.has_authored_prompt());

        let mut asked = 0;
        let mut gate = |_: &str| {
            asked += 1;
            false
        };
        assert_eq!(editor.select(None, &mut gate), Selection::Declined);
        assert_eq!(asked, 1);
    }

    #[test]
    fn test_clearing_selection_empties_prompt() {
        let mut editor = PromptEditor::default();
        editor.select(Some(Subject::History), &mut recorder(true));
        assert_eq!(editor.select(None, &mut recorder(false)), Selection::Applied);
        assert_eq!(editor.subject(), None);
        assert_eq!(editor.prompt(), "");
    }

    #[test]
    fn test_expanded_prompt_uses_template_text() {
        let mut editor = PromptEditor::default();
        editor.select(Some(Subject::Biology), &mut recorder(true));
        assert_eq!(
            editor.expanded_prompt(),
            crate::mention::templates::BIOLOGY_PROMPT
        );
    }
}
