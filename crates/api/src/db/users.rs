//! User repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use shopsphere_core::{Email, Role, UserId};

use super::conflict_on_unique;
use crate::models::{NewUser, Page, User, UserChanges, UserListQuery};
use crate::stores::StoreError;

const USER_COLUMNS: &str =
    "id, first_name, last_name, email, phone, role, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
    role: Role,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct UserWithHashRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email)
            .map_err(|e| StoreError::DataCorruption(format!("invalid email in database: {e}")))?;

        Ok(Self {
            id: row.id,
            first_name: row.first_name,
            last_name: row.last_name,
            email,
            phone: row.phone,
            role: row.role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
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

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Relational` if the query fails.
    /// Returns `StoreError::DataCorruption` if the stored email is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Get a user and their password hash by email.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Relational` if the query fails.
    pub async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, StoreError> {
        let row = sqlx::query_as::<_, UserWithHashRow>(&format!(
            "SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let user = User::try_from(row.user)?;
        Ok(Some((user, row.password_hash)))
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the email already exists.
    /// Returns `StoreError::Relational` for other database errors.
    pub async fn create(&self, user: &NewUser) -> Result<User, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r"
            INSERT INTO users (first_name, last_name, email, phone, password_hash, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.password_hash)
        .bind(user.role)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "email"))?;

        User::try_from(row)
    }

    /// List users, newest first, optionally filtered by role.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Relational` if a query fails.
    pub async fn list(&self, query: &UserListQuery) -> Result<Page<User>, StoreError> {
        let limit = i64::from(query.page.limit);
        let offset = i64::try_from(query.page.offset).unwrap_or(i64::MAX);

        let page_sql = format!(
            r"
            SELECT {USER_COLUMNS} FROM users
            WHERE ($1::user_role IS NULL OR role = $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "
        );

        let (total, rows) = tokio::try_join!(
            sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM users WHERE ($1::user_role IS NULL OR role = $1)",
            )
            .bind(query.role)
            .fetch_one(self.pool),
            sqlx::query_as::<_, UserRow>(&page_sql)
                .bind(query.role)
                .bind(limit)
                .bind(offset)
                .fetch_all(self.pool),
        )?;

        let items = rows
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page {
            items,
            total: u64::try_from(total).unwrap_or(0),
        })
    }

    /// Apply profile changes. Columns without a change keep their value.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the new email is already in use.
    /// Returns `StoreError::Relational` for other database errors.
    pub async fn update(
        &self,
        id: UserId,
        changes: &UserChanges,
    ) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r"
            UPDATE users SET
                first_name    = COALESCE($2, first_name),
                last_name     = COALESCE($3, last_name),
                email         = COALESCE($4, email),
                phone         = CASE WHEN $5 THEN $6 ELSE phone END,
                password_hash = COALESCE($7, password_hash),
                role          = COALESCE($8, role),
                updated_at    = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(id)
        .bind(&changes.first_name)
        .bind(&changes.last_name)
        .bind(&changes.email)
        .bind(changes.phone.is_some())
        .bind(changes.phone.clone().flatten())
        .bind(&changes.password_hash)
        .bind(changes.role)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "email"))?;

        row.map(User::try_from).transpose()
    }

    /// Delete a user. Orders cascade.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Relational` if the query fails.
    pub async fn delete(&self, id: UserId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
