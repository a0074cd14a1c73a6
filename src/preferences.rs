//! User preferences, starting with how assignment lists are laid out.
//!
//! Values are plain strings behind the [`PreferenceStore`] port; the list view receives the
//! resolved [`ViewMode`] when it is built instead of reading any global.

use std::fmt::Display;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::assignment::{Assignment, SubjectGroup, group_by_subject};
use crate::error::{Error, Result};

#[cfg(test)]
pub mod memory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    List,
    Grid,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Grid => "grid",
        }
    }
}

impl Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "list" => Ok(Self::List),
            "grid" => Ok(Self::Grid),
            other => Err(Error::invalid_input(format!("unknown view mode: {other}"))),
        }
    }
}

/// Which page a view preference belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewScope {
    /// The instructor's assignment management page; starts as a grid.
    Admin,
    /// The student's assignment list; starts as a list.
    Student,
}

impl ViewScope {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Admin => "admin_view",
            Self::Student => "student_view",
        }
    }

    pub fn default_mode(&self) -> ViewMode {
        match self {
            Self::Admin => ViewMode::Grid,
            Self::Student => ViewMode::List,
        }
    }
}

impl FromStr for ViewScope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "admin_view" => Ok(Self::Admin),
            "student_view" => Ok(Self::Student),
            other => Err(Error::not_found(format!("preference {other}"))),
        }
    }
}

/// Persistence port for preference values.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// The stored mode for `scope`, or the scope's default when nothing usable is stored.
pub async fn load_view_mode(store: &dyn PreferenceStore, scope: ViewScope) -> Result<ViewMode> {
    let Some(raw) = store.get(scope.key()).await? else {
        return Ok(scope.default_mode());
    };

    Ok(raw.parse().unwrap_or_else(|_| {
        warn!("Ignoring stored {} value {raw:?}", scope.key());
        scope.default_mode()
    }))
}

pub async fn save_view_mode(
    store: &dyn PreferenceStore,
    scope: ViewScope,
    mode: ViewMode,
) -> Result<()> {
    store.set(scope.key(), mode.as_str()).await
}

/// Assignments grouped by subject, laid out according to `mode`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentListView {
    pub view_mode: ViewMode,
    pub total: usize,
    pub groups: Vec<SubjectGroup>,
}

impl AssignmentListView {
    pub fn new(assignments: Vec<Assignment>, view_mode: ViewMode) -> Self {
        Self {
            view_mode,
            total: assignments.len(),
            groups: group_by_subject(assignments),
        }
    }
}
