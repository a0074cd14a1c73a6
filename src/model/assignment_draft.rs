use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::mention::{self, canonical_markup};
use crate::subject::Subject;

pub const MISSING_FIELDS: &str = "Please fill in all fields";

/// Body of the assignment create and update requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssignmentDraft {
    pub title: String,
    pub subject: String,
    pub learning_outcomes: String,
    pub marking_criteria: String,
    pub additional_prompt: String,
}

/// A problem with the prompt that does not block saving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptWarning {
    CustomPromptWithTags,
}

impl PromptWarning {
    pub fn message(&self) -> &'static str {
        match self {
            Self::CustomPromptWithTags => "Using custom prompt with tags might create issues.",
        }
    }
}

impl AssignmentDraft {
    /// Checks required fields and the subject's prompt rules.
    ///
    /// Biology and History must carry exactly their template markup. A Custom prompt that
    /// contains mention tags is allowed but reported as a warning. Subjects outside
    /// [`Subject`] are stored as given.
    pub fn validate(&self) -> Result<Vec<PromptWarning>> {
        let required = [
            &self.title,
            &self.subject,
            &self.learning_outcomes,
            &self.marking_criteria,
        ];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(Error::invalid_input(MISSING_FIELDS));
        }

        let mut warnings = Vec::new();
        match self.subject.parse::<Subject>() {
            Ok(Subject::Custom) => {
                if mention::contains_mentions(&self.additional_prompt) {
                    warnings.push(PromptWarning::CustomPromptWithTags);
                }
            }
            Ok(subject) => {
                if let Some(id) = subject.template_id() {
                    if canonical_markup(id).as_deref() != Some(self.additional_prompt.trim()) {
                        return Err(Error::invalid_input(format!(
                            "For {subject} subject, the Additional Prompt should contain only the {id} tag."
                        )));
                    }
                }
            }
            Err(_) => {}
        }

        Ok(warnings)
    }
}
