//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use shopsphere_core::{Email, Role, UserId};

use super::Pagination;

/// A ShopSphere account. The password hash never leaves the store layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated account to insert, with an already-hashed password.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: Role,
}

/// Validated profile changes. `None` leaves a column untouched; for `phone`,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<Email>,
    pub phone: Option<Option<String>>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
}

impl UserChanges {
    /// Whether nothing would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.password_hash.is_none()
            && self.role.is_none()
    }

    /// Names of the fields being changed, for the activity log.
    #[must_use]
    pub fn field_names(&self) -> Vec<&'static str> {
        [
            ("first_name", self.first_name.is_some()),
            ("last_name", self.last_name.is_some()),
            ("email", self.email.is_some()),
            ("phone", self.phone.is_some()),
            ("password", self.password_hash.is_some()),
            ("role", self.role.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }

    /// Apply the profile columns to `user`. The password hash is not part of
    /// [`User`] and is handled by the store.
    pub fn apply_to(&self, user: &mut User) {
        if let Some(first_name) = &self.first_name {
            user.first_name.clone_from(first_name);
        }
        if let Some(last_name) = &self.last_name {
            user.last_name.clone_from(last_name);
        }
        if let Some(email) = &self.email {
            user.email = email.clone();
        }
        if let Some(phone) = &self.phone {
            user.phone.clone_from(phone);
        }
        if let Some(role) = self.role {
            user.role = role;
        }
    }
}

/// Admin user listing: optional role filter, newest accounts first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserListQuery {
    pub role: Option<Role>,
    pub page: Pagination,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_follow_changes() {
        let changes = UserChanges {
            last_name: Some("Verdi".to_owned()),
            phone: Some(None),
            ..UserChanges::default()
        };
        assert!(!changes.is_empty());
        assert_eq!(changes.field_names(), ["last_name", "phone"]);
        assert!(UserChanges::default().is_empty());
    }
}
