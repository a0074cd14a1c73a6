use async_trait::async_trait;

use crate::assignment::Assignment;
use crate::error::Result;
use crate::model::assignment_draft::AssignmentDraft;

#[cfg(test)]
pub mod memory;

/// Persistence port for assignment records.
#[async_trait]
pub trait AssignmentStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Assignment>>;

    async fn get(&self, id: i32) -> Result<Option<Assignment>>;

    async fn create(&self, draft: &AssignmentDraft) -> Result<Assignment>;

    /// `None` when no record has this id.
    async fn update(&self, id: i32, draft: &AssignmentDraft) -> Result<Option<Assignment>>;

    /// `false` when no record has this id.
    async fn delete(&self, id: i32) -> Result<bool>;
}
