use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};

use crate::assignment::Assignment;
use crate::assignment::store::AssignmentStore;
use crate::error::Result;
use crate::model::assignment_draft::AssignmentDraft;

const COLUMNS: &str = "id, title, subject, learning_outcomes, marking_criteria, additional_prompt, \
                       created_at, updated_at";

pub struct PgAssignmentStore {
    pool: Pool<Postgres>,
}

impl PgAssignmentStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn from_row(row: &PgRow) -> Assignment {
    Assignment {
        id: row.get("id"),
        title: row.get("title"),
        subject: row.get("subject"),
        learning_outcomes: row.get("learning_outcomes"),
        marking_criteria: row.get("marking_criteria"),
        additional_prompt: row.get("additional_prompt"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl AssignmentStore for PgAssignmentStore {
    async fn list(&self) -> Result<Vec<Assignment>> {
        let rows = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM cognic.assignments ORDER BY id;"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(from_row).collect())
    }

    async fn get(&self, id: i32) -> Result<Option<Assignment>> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM cognic.assignments WHERE id = $1;"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(from_row))
    }

    async fn create(&self, draft: &AssignmentDraft) -> Result<Assignment> {
        let row = sqlx::query(&format!(
            "INSERT INTO cognic.assignments
                (title, subject, learning_outcomes, marking_criteria, additional_prompt)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS};"
        ))
        .bind(&draft.title)
        .bind(&draft.subject)
        .bind(&draft.learning_outcomes)
        .bind(&draft.marking_criteria)
        .bind(&draft.additional_prompt)
        .fetch_one(&self.pool)
        .await?;

        Ok(from_row(&row))
    }

    async fn update(&self, id: i32, draft: &AssignmentDraft) -> Result<Option<Assignment>> {
        let row = sqlx::query(&format!(
            "UPDATE cognic.assignments SET
                title = $2,
                subject = $3,
                learning_outcomes = $4,
                marking_criteria = $5,
                additional_prompt = $6,
                updated_at = now()
            WHERE id = $1
            RETURNING {COLUMNS};"
        ))
        .bind(id)
        .bind(&draft.title)
        .bind(&draft.subject)
        .bind(&draft.learning_outcomes)
        .bind(&draft.marking_criteria)
        .bind(&draft.additional_prompt)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(from_row))
    }

    async fn delete(&self, id: i32) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cognic.assignments WHERE id = $1;")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
