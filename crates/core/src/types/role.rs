//! User roles.

use serde::{Deserialize, Serialize};

/// Role of a ShopSphere account.
///
/// Only [`Role::Admin`] carries extra privileges in the review subsystem: an
/// admin passes every self-or-admin ownership check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "user_role", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A shopper.
    #[default]
    Customer,
    /// Store staff with full access.
    Admin,
    /// A merchant listing products.
    Seller,
}

impl Role {
    /// Whether this role bypasses ownership checks.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Admin => write!(f, "admin"),
            Self::Seller => write!(f, "seller"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Self::Customer),
            "admin" => Ok(Self::Admin),
            "seller" => Ok(Self::Seller),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_from_str() {
        for role in [Role::Customer, Role::Admin, Role::Seller] {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_unknown_role() {
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_only_admin_is_admin() {
        assert!(Role::Admin.is_admin());
        assert!(!Role::Customer.is_admin());
        assert!(!Role::Seller.is_admin());
    }
}
