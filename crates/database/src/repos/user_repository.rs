//! User repository for database operations.

use crate::entities::{BudgetLevel, CreateUserRequest, UpdateUserPreferencesRequest, User};
use crate::types::{format_timestamp, DatabaseError, DatabaseResult};
use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, email, full_name, password_hash, phone, city, region, budget_level, \
     transition_from_diet, transition_to_diet, avatar_url, created_at, updated_at";

#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| map_user(&row)).transpose()
    }

    /// Lookup by email. Callers pass the already normalized (lower-cased) address.
    pub async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| map_user(&row)).transpose()
    }

    /// Insert a new account. A taken email surfaces as [`DatabaseError::Duplicate`].
    pub async fn create(&self, request: &CreateUserRequest) -> DatabaseResult<User> {
        let now = format_timestamp(Utc::now());
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            "INSERT INTO users (id, email, full_name, password_hash, phone, city, region, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&request.email)
        .bind(&request.full_name)
        .bind(&request.password_hash)
        .bind(&request.phone)
        .bind(&request.city)
        .bind(&request.region)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| match DatabaseError::from(e) {
            DatabaseError::Duplicate(_) => DatabaseError::Duplicate(format!("email {}", request.email)),
            other => other,
        })?;

        self.find_by_id(&id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("user {id}")))
    }

    pub async fn update_profile(
        &self,
        id: &str,
        full_name: Option<&str>,
        avatar_url: Option<&str>,
    ) -> DatabaseResult<()> {
        let now = format_timestamp(Utc::now());
        let result = sqlx::query(
            "UPDATE users SET full_name = ?, avatar_url = ?, updated_at = ? WHERE id = ?",
        )
        .bind(full_name)
        .bind(avatar_url)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("user {id}")));
        }
        Ok(())
    }

    /// Apply the fields present in `request`, leaving the others untouched.
    pub async fn update_preferences(
        &self,
        id: &str,
        request: &UpdateUserPreferencesRequest,
    ) -> DatabaseResult<()> {
        if request.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;

        if let Some(region) = &request.region {
            sqlx::query("UPDATE users SET region = ? WHERE id = ?")
                .bind(region)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        if let Some(level) = request.budget_level {
            sqlx::query("UPDATE users SET budget_level = ? WHERE id = ?")
                .bind(level.as_str())
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        if let Some(from_diet) = &request.transition_from_diet {
            sqlx::query("UPDATE users SET transition_from_diet = ? WHERE id = ?")
                .bind(from_diet)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        if let Some(to_diet) = &request.transition_to_diet {
            sqlx::query("UPDATE users SET transition_to_diet = ? WHERE id = ?")
                .bind(to_diet)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("UPDATE users SET updated_at = ? WHERE id = ?")
            .bind(format_timestamp(Utc::now()))
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

fn map_user(row: &SqliteRow) -> DatabaseResult<User> {
    let budget_level: Option<String> = row.try_get("budget_level")?;
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        full_name: row.try_get("full_name")?,
        password_hash: row.try_get("password_hash")?,
        phone: row.try_get("phone")?,
        city: row.try_get("city")?,
        region: row.try_get("region")?,
        budget_level: budget_level.as_deref().and_then(BudgetLevel::from_db),
        transition_from_diet: row.try_get("transition_from_diet")?,
        transition_to_diet: row.try_get("transition_to_diet")?,
        avatar_url: row.try_get("avatar_url")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_user_request, test_pool};

    #[tokio::test]
    async fn create_and_find_user() {
        let (pool, _dir) = test_pool().await;
        let repo = UserRepository::new(pool);

        let created = repo.create(&sample_user_request("asha@example.com")).await.unwrap();
        assert_eq!(created.email, "asha@example.com");
        assert_eq!(created.city.as_deref(), Some("Bangalore"));
        assert!(created.budget_level.is_none());

        let by_id = repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(by_id, created);

        let by_email = repo.find_by_email("asha@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);

        assert!(repo.find_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_reported() {
        let (pool, _dir) = test_pool().await;
        let repo = UserRepository::new(pool);

        repo.create(&sample_user_request("dup@example.com")).await.unwrap();
        let err = repo.create(&sample_user_request("dup@example.com")).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Duplicate(_)));
    }

    #[tokio::test]
    async fn partial_preference_update_keeps_other_columns() {
        let (pool, _dir) = test_pool().await;
        let repo = UserRepository::new(pool);
        let user = repo.create(&sample_user_request("pref@example.com")).await.unwrap();

        repo.update_preferences(
            &user.id,
            &UpdateUserPreferencesRequest {
                region: Some(Some("South".to_string())),
                budget_level: Some(BudgetLevel::High),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        repo.update_preferences(
            &user.id,
            &UpdateUserPreferencesRequest {
                transition_to_diet: Some(Some("vegan".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let stored = repo.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(stored.region.as_deref(), Some("South"));
        assert_eq!(stored.budget_level, Some(BudgetLevel::High));
        assert_eq!(stored.transition_to_diet.as_deref(), Some("vegan"));
        assert!(stored.transition_from_diet.is_none());
    }

    #[tokio::test]
    async fn update_profile_for_missing_user_fails() {
        let (pool, _dir) = test_pool().await;
        let repo = UserRepository::new(pool);

        let err = repo
            .update_profile("missing", Some("Name"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(_)));
    }
}
