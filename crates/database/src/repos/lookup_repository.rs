//! Cuisine and allergy name lists attached to users.

use crate::entities::LookupKind;
use crate::types::DatabaseResult;
use sqlx::{Row, SqlitePool};

#[derive(Clone)]
pub struct LookupRepository {
    pool: SqlitePool,
}

impl LookupRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Names linked to the user, in insertion order.
    pub async fn names_for_user(&self, kind: LookupKind, user_id: &str) -> DatabaseResult<Vec<String>> {
        let sql = format!(
            "SELECT l.name FROM {join} j JOIN {lookup} l ON l.id = j.{column} \
             WHERE j.user_id = ? ORDER BY j.rowid ASC",
            join = kind.join_table(),
            lookup = kind.lookup_table(),
            column = kind.id_column(),
        );
        let rows = sqlx::query(&sql).bind(user_id).fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| row.try_get::<String, _>("name").map_err(Into::into))
            .collect()
    }

    /// Replace the user's list, creating lookup rows for unseen names.
    ///
    /// Duplicate names are collapsed, first occurrence wins.
    pub async fn replace_for_user(
        &self,
        kind: LookupKind,
        user_id: &str,
        names: &[String],
    ) -> DatabaseResult<()> {
        let mut unique: Vec<&str> = Vec::with_capacity(names.len());
        for name in names {
            if !unique.contains(&name.as_str()) {
                unique.push(name.as_str());
            }
        }

        let mut tx = self.pool.begin().await?;

        sqlx::query(&format!("DELETE FROM {} WHERE user_id = ?", kind.join_table()))
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        for name in unique {
            sqlx::query(&format!(
                "INSERT INTO {} (name) VALUES (?) ON CONFLICT(name) DO NOTHING",
                kind.lookup_table()
            ))
            .bind(name)
            .execute(&mut *tx)
            .await?;
            let lookup_id: i64 =
                sqlx::query_scalar(&format!("SELECT id FROM {} WHERE name = ?", kind.lookup_table()))
                    .bind(name)
                    .fetch_one(&mut *tx)
                    .await?;

            sqlx::query(&format!(
                "INSERT INTO {} (user_id, {}) VALUES (?, ?)",
                kind.join_table(),
                kind.id_column()
            ))
            .bind(user_id)
            .bind(lookup_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
