use crate::database::connection::DbPool;
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum UserError {
    #[error("Email already exists")]
    EmailTaken,
    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    School,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::School => "school",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: Option<String>,
    pub school_id: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub school_id: Option<String>,
    pub role: UserRole,
}

/// Entry in the school directory.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SchoolSummary {
    pub id: String,
    pub name: String,
}

impl User {
    pub async fn create(pool: &DbPool, user: CreateUser) -> Result<Self, UserError> {
        let now = Utc::now();
        let hashed_password = hash(user.password.as_bytes(), DEFAULT_COST)?;

        let result = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, email, password_hash, name, school_id, role, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user.email)
        .bind(hashed_password)
        .bind(user.name)
        .bind(user.school_id)
        .bind(user.role.as_str())
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(UserError::EmailTaken),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_by_id(pool: &DbPool, id: Uuid) -> Result<Option<Self>, UserError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_email(pool: &DbPool, email: &str) -> Result<Option<Self>, UserError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    pub async fn find_by_role(pool: &DbPool, role: UserRole) -> Result<Vec<Self>, UserError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE role = $1 ORDER BY created_at ASC",
        )
        .bind(role.as_str())
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    pub fn verify_password(&self, password: &str) -> Result<bool, bcrypt::BcryptError> {
        verify(password, &self.password_hash)
    }

    pub async fn authenticate(
        pool: &DbPool,
        email: &str,
        password: &str,
    ) -> Result<Option<Self>, UserError> {
        if let Some(user) = Self::find_by_email(pool, email).await? {
            if user.verify_password(password).unwrap_or(false) {
                return Ok(Some(user));
            }
        }
        Ok(None)
    }

    pub fn school_summary(&self) -> SchoolSummary {
        let id = self
            .school_id
            .clone()
            .unwrap_or_else(|| self.id.to_string());
        let name = self
            .name
            .clone()
            .unwrap_or_else(|| format!("School {}", self.id));
        SchoolSummary { id, name }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: Option<&str>, school_id: Option<&str>) -> User {
        User {
            id: Uuid::nil(),
            email: "bursar@school.test".to_string(),
            password_hash: hash("hunter22", 4).unwrap(),
            name: name.map(str::to_string),
            school_id: school_id.map(str::to_string),
            role: UserRole::School.as_str().to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn verifies_password_against_hash() {
        let user = user(None, None);
        assert!(user.verify_password("hunter22").unwrap());
        assert!(!user.verify_password("hunter23").unwrap());
    }

    #[test]
    fn school_summary_prefers_school_fields() {
        let summary = user(Some("Hill Academy"), Some("school-9")).school_summary();
        assert_eq!(
            summary,
            SchoolSummary {
                id: "school-9".into(),
                name: "Hill Academy".into()
            }
        );
    }

    #[test]
    fn school_summary_falls_back_to_user_id() {
        let summary = user(None, None).school_summary();
        assert_eq!(summary.id, Uuid::nil().to_string());
        assert_eq!(summary.name, format!("School {}", Uuid::nil()));
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let json = serde_json::to_value(user(None, None)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "school");
    }
}
