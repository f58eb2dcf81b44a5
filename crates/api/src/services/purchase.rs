//! Verified-purchase checks.

use shopsphere_core::{OrderId, ProductId, UserId};

use super::ServiceError;
use crate::stores::RelationalStore;

/// Checks whether a user bought a product through a given order.
pub struct PurchaseVerifier<'a> {
    relational: &'a dyn RelationalStore,
}

impl<'a> PurchaseVerifier<'a> {
    /// Create a verifier over the relational store.
    #[must_use]
    pub const fn new(relational: &'a dyn RelationalStore) -> Self {
        Self { relational }
    }

    /// True only if `order` belongs to `user` and contains `product`.
    ///
    /// Without an order there is nothing to check, so the answer is `false`
    /// and the store is not queried.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Infrastructure` if the store is unavailable,
    /// which is distinct from an `Ok(false)` answer.
    pub async fn verify(
        &self,
        user: UserId,
        product: ProductId,
        order: Option<OrderId>,
    ) -> Result<bool, ServiceError> {
        let Some(order) = order else {
            return Ok(false);
        };
        Ok(self
            .relational
            .order_contains_product(user, order, product)
            .await?)
    }
}
