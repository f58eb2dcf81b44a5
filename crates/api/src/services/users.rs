//! User profiles, account management and order history.
//!
//! Every operation except the admin listing follows the self-or-admin rule.
//! Only admins may change a role.

use serde::Deserialize;
use tracing::instrument;

use shopsphere_core::{ActivityAction, Email, EntityType, Patch, Role, UserId};

use super::auth::{AuthError, hash_password, validate_password};
use super::authz::Identity;
use super::{ServiceError, activity, required_text};
use crate::models::{
    ClientInfo, NewActivity, Order, Page, Pagination, User, UserChanges, UserListQuery,
};
use crate::stores::{StoreError, Stores};

const MAX_NAME_LEN: usize = 100;
const MAX_PHONE_LEN: usize = 32;

/// Body of a profile update. Only fields that are sent are changed; `phone`
/// may be sent as `null` to clear it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    #[serde(default)]
    pub first_name: Patch<String>,
    #[serde(default)]
    pub last_name: Patch<String>,
    #[serde(default)]
    pub email: Patch<String>,
    #[serde(default)]
    pub phone: Patch<Option<String>>,
    #[serde(default)]
    pub password: Patch<String>,
    #[serde(default)]
    pub role: Patch<String>,
}

fn parse_role(value: &str, message: &str) -> Result<Role, ServiceError> {
    value
        .parse::<Role>()
        .map_err(|_| ServiceError::Validation(message.to_owned()))
}

fn validate_phone(phone: Option<String>) -> Result<Option<String>, ServiceError> {
    let Some(phone) = phone.map(|p| p.trim().to_owned()).filter(|p| !p.is_empty()) else {
        return Ok(None);
    };
    if phone.chars().count() > MAX_PHONE_LEN {
        return Err(ServiceError::Validation(format!(
            "Phone must be at most {MAX_PHONE_LEN} characters"
        )));
    }
    Ok(Some(phone))
}

fn new_password_hash(password: &str) -> Result<String, ServiceError> {
    validate_password(password)
        .and_then(|()| hash_password(password))
        .map_err(|e| match e {
            AuthError::WeakPassword(msg) => ServiceError::Validation(msg),
            _ => ServiceError::PasswordHash,
        })
}

impl UpdateUser {
    fn validate(self) -> Result<UserChanges, ServiceError> {
        Ok(UserChanges {
            first_name: self
                .first_name
                .try_map(|n| required_text("First name", &n, MAX_NAME_LEN))?
                .into_option(),
            last_name: self
                .last_name
                .try_map(|n| required_text("Last name", &n, MAX_NAME_LEN))?
                .into_option(),
            email: self
                .email
                .try_map(|e| {
                    Email::parse(&e)
                        .map_err(|_| ServiceError::Validation("Invalid email format".to_owned()))
                })?
                .into_option(),
            phone: self.phone.try_map(validate_phone)?.into_option(),
            password_hash: self
                .password
                .try_map(|p| new_password_hash(&p))?
                .into_option(),
            role: self
                .role
                .try_map(|r| {
                    parse_role(&r, "Invalid role. Must be: customer, admin, or seller")
                })?
                .into_option(),
        })
    }
}

/// User service.
pub struct UserService<'a> {
    stores: &'a Stores,
}

impl<'a> UserService<'a> {
    #[must_use]
    pub const fn new(stores: &'a Stores) -> Self {
        Self { stores }
    }

    // =========================================================================
    // Profiles
    // =========================================================================

    /// A user's profile. Self or admin only.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Forbidden` for anyone else and
    /// `ServiceError::NotFound` if the user does not exist.
    pub async fn get(&self, requester: &Identity, id: UserId) -> Result<User, ServiceError> {
        if !requester.may_act_for(id) {
            return Err(ServiceError::Forbidden(
                "You can only view your own profile".to_owned(),
            ));
        }
        self.stores
            .relational
            .user_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_owned()))
    }

    /// Every account, newest first. Admin only.
    ///
    /// `role` is the raw query-string filter; an empty value means no filter.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Forbidden` for non-admins and
    /// `ServiceError::Validation` for an unknown role.
    pub async fn list(
        &self,
        requester: &Identity,
        role: Option<&str>,
        page: Pagination,
    ) -> Result<Page<User>, ServiceError> {
        if !requester.role.is_admin() {
            return Err(ServiceError::Forbidden(
                "Access denied. Required role: admin".to_owned(),
            ));
        }
        let role = role
            .filter(|r| !r.is_empty())
            .map(|r| parse_role(r, "Invalid role filter"))
            .transpose()?;

        Ok(self
            .stores
            .relational
            .list_users(&UserListQuery { role, page })
            .await?)
    }

    /// Update a profile. Self or admin; only an admin may change the role.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Forbidden` for anyone else or for a non-admin
    /// sending `role`, `ServiceError::Validation` for a bad or empty change
    /// set, `ServiceError::NotFound` if the user does not exist and
    /// `ServiceError::Conflict` if the new email belongs to another account.
    #[instrument(skip_all, fields(user_id = %id, requester_id = %requester.id))]
    pub async fn update(
        &self,
        requester: &Identity,
        id: UserId,
        input: UpdateUser,
        client: &ClientInfo,
    ) -> Result<User, ServiceError> {
        if !requester.may_act_for(id) {
            return Err(ServiceError::Forbidden(
                "You can only update your own profile".to_owned(),
            ));
        }
        if !input.role.is_absent() && !requester.role.is_admin() {
            return Err(ServiceError::Forbidden(
                "Only admins can change user roles".to_owned(),
            ));
        }

        let changes = input.validate()?;
        if changes.is_empty() {
            return Err(ServiceError::Validation("No fields to update".to_owned()));
        }

        let user = self
            .stores
            .relational
            .update_user(id, &changes)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => {
                    ServiceError::Conflict("Email already in use".to_owned())
                }
                other => ServiceError::Infrastructure(other),
            })?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_owned()))?;

        tracing::info!(fields = ?changes.field_names(), "Profile updated");
        activity::record(
            self.stores.activity.as_ref(),
            NewActivity::new(Some(requester.id), ActivityAction::UpdateProfile)
                .entity(EntityType::User, id)
                .meta("fields", changes.field_names())
                .client(client),
        )
        .await;
        Ok(user)
    }

    /// Delete an account. Self or admin; refused while the user has open
    /// orders.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Forbidden` for anyone else,
    /// `ServiceError::NotFound` if the user does not exist and
    /// `ServiceError::Conflict` if orders are still pending or processing.
    #[instrument(skip_all, fields(user_id = %id, requester_id = %requester.id))]
    pub async fn delete(&self, requester: &Identity, id: UserId) -> Result<(), ServiceError> {
        if !requester.may_act_for(id) {
            return Err(ServiceError::Forbidden(
                "You can only delete your own account".to_owned(),
            ));
        }

        let relational = &self.stores.relational;
        if relational.user_by_id(id).await?.is_none() {
            return Err(ServiceError::NotFound("User not found".to_owned()));
        }

        let open = relational.open_order_count(id).await?;
        if open > 0 {
            return Err(ServiceError::Conflict(format!(
                "Cannot delete user. User has {open} pending orders. \
                 Please complete or cancel them first."
            )));
        }

        if !relational.delete_user(id).await? {
            return Err(ServiceError::NotFound("User not found".to_owned()));
        }
        tracing::info!("User deleted");
        Ok(())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// A user's orders with their items, newest first. Self or admin only.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Forbidden` for anyone else.
    pub async fn orders(
        &self,
        requester: &Identity,
        id: UserId,
    ) -> Result<Vec<Order>, ServiceError> {
        if !requester.may_act_for(id) {
            return Err(ServiceError::Forbidden(
                "You can only view your own orders".to_owned(),
            ));
        }
        Ok(self.stores.relational.orders_for_user(id).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopsphere_core::{OrderId, OrderStatus};

    use super::*;
    use crate::testing::{admin, customer, seeded};

    fn update(json: &str) -> UpdateUser {
        serde_json::from_str(json).unwrap()
    }

    #[tokio::test]
    async fn test_self_or_admin() {
        let memory = seeded().await;
        let stores = memory.stores();
        let service = UserService::new(&stores);

        assert_eq!(
            service.get(&customer(3), UserId::new(3)).await.unwrap().id,
            UserId::new(3)
        );
        assert!(matches!(
            service.get(&customer(3), UserId::new(4)).await,
            Err(ServiceError::Forbidden(_))
        ));
        assert!(service.get(&admin(), UserId::new(4)).await.is_ok());
        assert!(matches!(
            service.get(&admin(), UserId::new(77)).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_is_admin_only_and_filters_role() {
        let memory = seeded().await;
        let stores = memory.stores();
        let service = UserService::new(&stores);

        assert!(matches!(
            service.list(&customer(3), None, Pagination::default()).await,
            Err(ServiceError::Forbidden(m)) if m == "Access denied. Required role: admin"
        ));

        let all = service.list(&admin(), None, Pagination::default()).await.unwrap();
        assert_eq!(all.total, 4);

        let customers = service
            .list(&admin(), Some("customer"), Pagination { limit: 2, offset: 0 })
            .await
            .unwrap();
        assert_eq!(customers.total, 3);
        assert_eq!(customers.items.len(), 2);
        assert!(customers.items.iter().all(|u| u.role == Role::Customer));

        assert!(matches!(
            service.list(&admin(), Some("superuser"), Pagination::default()).await,
            Err(ServiceError::Validation(m)) if m == "Invalid role filter"
        ));
    }

    #[tokio::test]
    async fn test_update_own_profile() {
        let memory = seeded().await;
        let stores = memory.stores();
        let service = UserService::new(&stores);

        let user = service
            .update(
                &customer(3),
                UserId::new(3),
                update(r#"{"first_name": "  Mario ", "phone": "+39 333 1234567"}"#),
                &ClientInfo::default(),
            )
            .await
            .unwrap();
        assert_eq!(user.first_name, "Mario");
        assert_eq!(user.phone.as_deref(), Some("+39 333 1234567"));
        assert_eq!(user.role, Role::Customer);

        let cleared = service
            .update(
                &customer(3),
                UserId::new(3),
                update(r#"{"phone": null}"#),
                &ClientInfo::default(),
            )
            .await
            .unwrap();
        assert_eq!(cleared.phone, None);
        assert_eq!(cleared.first_name, "Mario");

        let entries = memory.activity.entries().await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, ActivityAction::UpdateProfile);
        assert_eq!(entries[0].entity_id.as_deref(), Some("3"));
        assert_eq!(
            entries[0].metadata["fields"],
            serde_json::json!(["first_name", "phone"])
        );
    }

    #[tokio::test]
    async fn test_update_rules() {
        let memory = seeded().await;
        let stores = memory.stores();
        let service = UserService::new(&stores);
        let client = ClientInfo::default();

        assert!(matches!(
            service
                .update(&customer(3), UserId::new(4), update(r#"{"first_name": "X"}"#), &client)
                .await,
            Err(ServiceError::Forbidden(m)) if m == "You can only update your own profile"
        ));
        assert!(matches!(
            service
                .update(&customer(3), UserId::new(3), update(r#"{"role": "admin"}"#), &client)
                .await,
            Err(ServiceError::Forbidden(m)) if m == "Only admins can change user roles"
        ));
        assert!(matches!(
            service
                .update(&customer(3), UserId::new(3), update("{}"), &client)
                .await,
            Err(ServiceError::Validation(m)) if m == "No fields to update"
        ));
        assert!(matches!(
            service
                .update(&customer(3), UserId::new(3), update(r#"{"last_name": "  "}"#), &client)
                .await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            service
                .update(&customer(3), UserId::new(3), update(r#"{"password": "abc"}"#), &client)
                .await,
            Err(ServiceError::Validation(m)) if m == "Password must be at least 6 characters"
        ));
        assert!(matches!(
            service
                .update(
                    &customer(3),
                    UserId::new(3),
                    update(r#"{"email": "user4@shopsphere.test"}"#),
                    &client
                )
                .await,
            Err(ServiceError::Conflict(m)) if m == "Email already in use"
        ));
        assert!(matches!(
            service
                .update(&admin(), UserId::new(77), update(r#"{"first_name": "X"}"#), &client)
                .await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(memory.activity.entries().await.is_empty());
    }

    #[tokio::test]
    async fn test_admin_changes_role() {
        let memory = seeded().await;
        let stores = memory.stores();
        let service = UserService::new(&stores);

        assert!(matches!(
            service
                .update(
                    &admin(),
                    UserId::new(5),
                    update(r#"{"role": "root"}"#),
                    &ClientInfo::default()
                )
                .await,
            Err(ServiceError::Validation(_))
        ));
        let user = service
            .update(
                &admin(),
                UserId::new(5),
                update(r#"{"role": "seller"}"#),
                &ClientInfo::default(),
            )
            .await
            .unwrap();
        assert_eq!(user.role, Role::Seller);
    }

    #[tokio::test]
    async fn test_password_change_takes_effect_at_login() {
        let memory = seeded().await;
        let stores = memory.stores();
        UserService::new(&stores)
            .update(
                &customer(4),
                UserId::new(4),
                update(r#"{"password": "nuova-password"}"#),
                &ClientInfo::default(),
            )
            .await
            .unwrap();

        let email = Email::parse("user4@shopsphere.test").unwrap();
        let (_, hash) = stores
            .relational
            .credentials_by_email(&email)
            .await
            .unwrap()
            .unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(crate::services::auth::verify_password("nuova-password", &hash).is_ok());
    }

    #[tokio::test]
    async fn test_delete_refuses_open_orders() {
        let memory = seeded().await;
        let stores = memory.stores();
        let service = UserService::new(&stores);

        assert!(matches!(
            service.delete(&customer(3), UserId::new(4)).await,
            Err(ServiceError::Forbidden(_))
        ));

        memory
            .relational
            .set_order_status(OrderId::new(1), OrderStatus::Processing)
            .await;
        assert!(matches!(
            service.delete(&customer(3), UserId::new(3)).await,
            Err(ServiceError::Conflict(m)) if m.contains("User has 1 pending orders")
        ));

        memory
            .relational
            .set_order_status(OrderId::new(1), OrderStatus::Delivered)
            .await;
        service.delete(&customer(3), UserId::new(3)).await.unwrap();
        assert!(matches!(
            service.get(&admin(), UserId::new(3)).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(&admin(), UserId::new(3)).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_orders_with_items() {
        let memory = seeded().await;
        let stores = memory.stores();
        let service = UserService::new(&stores);

        let orders = service.orders(&customer(3), UserId::new(3)).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, OrderId::new(1));
        assert_eq!(orders[0].items_count, 2);
        let names: Vec<&str> = orders[0].items.iter().map(|i| i.product_name.as_str()).collect();
        assert_eq!(names, ["iPhone 15 Pro", "Sony WH-1000XM5"]);
        assert_eq!(
            orders[0].total_amount,
            orders[0].items.iter().map(|i| i.unit_price).sum::<rust_decimal::Decimal>()
        );

        assert!(matches!(
            service.orders(&customer(3), UserId::new(4)).await,
            Err(ServiceError::Forbidden(m)) if m == "You can only view your own orders"
        ));
        assert_eq!(service.orders(&admin(), UserId::new(4)).await.unwrap().len(), 1);
        assert!(service.orders(&admin(), UserId::new(5)).await.unwrap().is_empty());
    }
}
