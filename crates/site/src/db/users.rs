//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use tiffin_core::{Email, UserId};

use super::RepositoryError;
use crate::models::user::User;

/// Raw `users` row. Emails are validated on the way out.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: UserId,
    name: String,
    email: String,
    is_admin: bool,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(User {
            id: self.id,
            name: self.name,
            email,
            is_admin: self.is_admin,
            created_at: self.created_at,
        })
    }
}

/// Row for credential checks: the user plus their password hash.
#[derive(Debug, sqlx::FromRow)]
struct UserWithHashRow {
    id: UserId,
    name: String,
    email: String,
    is_admin: bool,
    created_at: DateTime<Utc>,
    password_hash: String,
}

impl UserWithHashRow {
    fn into_parts(self) -> Result<(User, String), RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok((
            User {
                id: self.id,
                name: self.name,
                email,
                is_admin: self.is_admin,
                created_at: self.created_at,
            },
            self.password_hash,
        ))
    }
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the email in the database is invalid.
    pub async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, name, email, is_admin, created_at
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(UserRow::into_user).transpose()
    }

    /// Create a new user with a name, email, and password hash.
    ///
    /// The ID is generated here, not by the database.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_with_password(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let id = UserId::generate();

        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (id, name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, is_admin, created_at
            ",
        )
        .bind(&id)
        .bind(name)
        .bind(email.as_str())
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.into_user()
    }

    /// Get a user and their password hash by email.
    ///
    /// Returns `None` if no user exists with that email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserWithHashRow>(
            r"
            SELECT id, name, email, is_admin, created_at, password_hash
            FROM users
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(UserWithHashRow::into_parts).transpose()
    }

    /// Grant admin rights to the user with the given email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no user has that email.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn grant_admin(&self, email: &Email) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET is_admin = TRUE
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_row_rejects_corrupt_email() {
        let row = UserRow {
            id: UserId::new("u1"),
            name: "Asha".to_string(),
            email: "not-an-email".to_string(),
            is_admin: false,
            created_at: Utc::now(),
        };

        assert!(matches!(
            row.into_user(),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_user_row_converts_valid_email() {
        let row = UserRow {
            id: UserId::new("u1"),
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            is_admin: true,
            created_at: Utc::now(),
        };

        let user = row.into_user().unwrap();
        assert_eq!(user.email.as_str(), "asha@example.com");
        assert!(user.is_admin);
    }
}
