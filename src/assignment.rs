use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(test)]
use crate::model::assignment_draft::AssignmentDraft;

pub mod store;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: i32,
    pub title: String,
    pub subject: String,
    pub learning_outcomes: String,
    pub marking_criteria: String,
    pub additional_prompt: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Postgres builds records from rows; only the memory store assembles them by hand.
#[cfg(test)]
impl Assignment {
    pub fn from_draft(id: i32, draft: &AssignmentDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title.clone(),
            subject: draft.subject.clone(),
            learning_outcomes: draft.learning_outcomes.clone(),
            marking_criteria: draft.marking_criteria.clone(),
            additional_prompt: draft.additional_prompt.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the editable fields, keeping id and creation time.
    pub fn apply(&mut self, draft: &AssignmentDraft, now: DateTime<Utc>) {
        self.title = draft.title.clone();
        self.subject = draft.subject.clone();
        self.learning_outcomes = draft.learning_outcomes.clone();
        self.marking_criteria = draft.marking_criteria.clone();
        self.additional_prompt = draft.additional_prompt.clone();
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectGroup {
    pub subject: String,
    pub assignments: Vec<Assignment>,
}

/// Groups by subject name (sorted), each group ordered by id.
pub fn group_by_subject(assignments: Vec<Assignment>) -> Vec<SubjectGroup> {
    let mut groups: BTreeMap<String, Vec<Assignment>> = BTreeMap::new();
    for assignment in assignments {
        groups
            .entry(assignment.subject.clone())
            .or_default()
            .push(assignment);
    }

    groups
        .into_iter()
        .map(|(subject, mut assignments)| {
            assignments.sort_by_key(|a| a.id);
            SubjectGroup {
                subject,
                assignments,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(id: i32, subject: &str) -> Assignment {
        let draft = AssignmentDraft {
            title: format!("Assignment {id}"),
            subject: subject.to_string(),
            learning_outcomes: "outcomes".to_string(),
            marking_criteria: "criteria".to_string(),
            additional_prompt: String::new(),
        };
        Assignment::from_draft(id, &draft, Utc::now())
    }

    #[test]
    fn test_group_by_subject() {
        let groups = group_by_subject(vec![
            assignment(3, "History"),
            assignment(1, "Biology"),
            assignment(2, "History"),
            assignment(4, "Custom"),
        ]);

        let subjects: Vec<_> = groups.iter().map(|g| g.subject.as_str()).collect();
        assert_eq!(subjects, vec!["Biology", "Custom", "History"]);

        let history_ids: Vec<_> = groups[2].assignments.iter().map(|a| a.id).collect();
        assert_eq!(history_ids, vec![2, 3]);
    }

    #[test]
    fn test_group_by_subject_empty() {
        assert!(group_by_subject(Vec::new()).is_empty());
    }

    #[test]
    fn test_apply_keeps_identity() {
        let mut original = assignment(9, "Biology");
        let created = original.created_at;
        let later = created + chrono::TimeDelta::minutes(5);

        let draft = AssignmentDraft {
            title: "Renamed".to_string(),
            subject: "History".to_string(),
            ..AssignmentDraft::default()
        };
        original.apply(&draft, later);

        assert_eq!(original.id, 9);
        assert_eq!(original.title, "Renamed");
        assert_eq!(original.subject, "History");
        assert_eq!(original.created_at, created);
        assert_eq!(original.updated_at, later);
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(assignment(1, "Biology")).unwrap();
        assert!(json.get("learningOutcomes").is_some());
        assert!(json.get("markingCriteria").is_some());
        assert!(json.get("additionalPrompt").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
    }
}
