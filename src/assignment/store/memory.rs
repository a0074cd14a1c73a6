use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::assignment::Assignment;
use crate::assignment::store::AssignmentStore;
use crate::error::Result;
use crate::model::assignment_draft::AssignmentDraft;

#[derive(Debug, Default)]
struct Records {
    last_id: i32,
    by_id: BTreeMap<i32, Assignment>,
}

/// Keeps records in process memory, for route and store tests.
#[derive(Debug, Default)]
pub struct MemoryAssignmentStore {
    records: RwLock<Records>,
}

impl MemoryAssignmentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AssignmentStore for MemoryAssignmentStore {
    async fn list(&self) -> Result<Vec<Assignment>> {
        let records = self.records.read().await;
        Ok(records.by_id.values().cloned().collect())
    }

    async fn get(&self, id: i32) -> Result<Option<Assignment>> {
        let records = self.records.read().await;
        Ok(records.by_id.get(&id).cloned())
    }

    async fn create(&self, draft: &AssignmentDraft) -> Result<Assignment> {
        let mut records = self.records.write().await;
        records.last_id += 1;
        let assignment = Assignment::from_draft(records.last_id, draft, Utc::now());
        records.by_id.insert(assignment.id, assignment.clone());
        Ok(assignment)
    }

    async fn update(&self, id: i32, draft: &AssignmentDraft) -> Result<Option<Assignment>> {
        let mut records = self.records.write().await;
        let Some(assignment) = records.by_id.get_mut(&id) else {
            return Ok(None);
        };
        assignment.apply(draft, Utc::now());
        Ok(Some(assignment.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        let mut records = self.records.write().await;
        Ok(records.by_id.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> AssignmentDraft {
        AssignmentDraft {
            title: title.to_string(),
            subject: "Biology".to_string(),
            learning_outcomes: "Explain osmosis".to_string(),
            marking_criteria: "Accuracy".to_string(),
            additional_prompt: "@[biology-prompt](biology-prompt)".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let store = MemoryAssignmentStore::new();
        let first = store.create(&draft("Cells")).await.unwrap();
        let second = store.create(&draft("Tissues")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.created_at, first.updated_at);
        assert_eq!(store.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_existing_and_missing() {
        let store = MemoryAssignmentStore::new();
        let created = store.create(&draft("Cells")).await.unwrap();

        let updated = store
            .update(created.id, &draft("Cell membranes"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Cell membranes");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);

        assert!(store.update(99, &draft("nope")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryAssignmentStore::new();
        let created = store.create(&draft("Cells")).await.unwrap();

        assert!(store.delete(created.id).await.unwrap());
        assert!(!store.delete(created.id).await.unwrap());
        assert!(store.get(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let store = MemoryAssignmentStore::new();
        let first = store.create(&draft("Cells")).await.unwrap();
        store.delete(first.id).await.unwrap();
        let second = store.create(&draft("Tissues")).await.unwrap();
        assert_eq!(second.id, 2);
    }
}
