//! Contact message database operations

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::Result;

/// Contact message record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: String,
}

/// Contact form submission
#[derive(Debug, Clone, Deserialize)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Contact repository
pub struct ContactRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ContactRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Store a contact message
    pub async fn create(&self, contact: &NewContact) -> Result<Contact> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO contacts (id, name, email, message, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.message)
        .bind(&now)
        .execute(self.pool)
        .await?;

        tracing::info!(contact_id = %id, email = %contact.email, "Stored contact message");

        Ok(Contact {
            id,
            name: contact.name.clone(),
            email: contact.email.clone(),
            message: contact.message.clone(),
            created_at: now,
        })
    }

    /// List messages, newest first
    pub async fn list(&self, limit: i64) -> Result<Vec<Contact>> {
        let contacts = sqlx::query_as::<_, Contact>(
            r#"
            SELECT id, name, email, message, created_at
            FROM contacts
            ORDER BY created_at DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(contacts)
    }

    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM contacts")
            .fetch_one(self.pool)
            .await?;

        Ok(count.0)
    }
}
