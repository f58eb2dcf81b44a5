//! Shared fixtures for unit and router tests.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use chrono::Utc;
use rust_decimal::Decimal;
use secrecy::SecretString;

use shopsphere_core::{CategoryId, Email, OrderId, ProductId, Role, UserId};

use crate::models::{Product, User};
use crate::services::authz::{Identity, TokenKeys};
use crate::stores::memory::MemoryStores;

pub const TEST_JWT_KEY: &str = "kP9#vL2$wQ7!nR4@xT6%zY8^bM3&cF5*";

pub fn token_keys() -> TokenKeys {
    TokenKeys::new(
        &SecretString::from(TEST_JWT_KEY.to_owned()),
        Duration::from_secs(3600),
    )
}

pub fn user(id: i32, email: &str, role: Role) -> User {
    let now = Utc::now();
    User {
        id: UserId::new(id),
        first_name: "Test".to_owned(),
        last_name: format!("User{id}"),
        email: Email::parse(email).unwrap(),
        phone: None,
        role,
        created_at: now,
        updated_at: now,
    }
}

pub fn identity(id: i32, role: Role) -> Identity {
    Identity {
        id: UserId::new(id),
        email: Email::parse(&format!("user{id}@shopsphere.test")).unwrap(),
        role,
    }
}

pub fn customer(id: i32) -> Identity {
    identity(id, Role::Customer)
}

pub fn admin() -> Identity {
    identity(1, Role::Admin)
}

fn product(id: i32, category: i32, name: &str, cents: i64) -> Product {
    let now = Utc::now();
    Product {
        id: ProductId::new(id),
        category_id: CategoryId::new(category),
        category_name: "Elettronica".to_owned(),
        name: name.to_owned(),
        description: None,
        price: Decimal::new(cents, 2),
        stock_quantity: 10,
        image_url: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

/// In-memory stores with a small catalog, five users and two orders.
///
/// - users 1 (admin), 3, 4, 5 (customers)
/// - products 1 "iPhone 15 Pro", 2 "Samsung Galaxy S24", 4 "Sony WH-1000XM5"
/// - order 1 by user 3 with products 1 and 4; order 2 by user 4 with product 2
pub async fn seeded() -> MemoryStores {
    let stores = MemoryStores::new();
    let relational = &stores.relational;

    relational
        .insert_category(CategoryId::new(1), "Elettronica", Some("Dispositivi"))
        .await;
    relational
        .insert_category(CategoryId::new(2), "Abbigliamento", None)
        .await;
    relational
        .insert_product(product(1, 1, "iPhone 15 Pro", 123_900))
        .await;
    relational
        .insert_product(product(2, 1, "Samsung Galaxy S24", 89_900))
        .await;
    relational
        .insert_product(product(4, 1, "Sony WH-1000XM5", 37_900))
        .await;

    let hash = crate::services::auth::hash_password("password123").unwrap();
    relational
        .insert_user(user(1, "admin@shopsphere.test", Role::Admin), hash.clone())
        .await;
    for id in [3, 4, 5] {
        relational
            .insert_user(
                user(id, &format!("user{id}@shopsphere.test"), Role::Customer),
                hash.clone(),
            )
            .await;
    }

    relational
        .insert_order(
            OrderId::new(1),
            UserId::new(3),
            &[ProductId::new(1), ProductId::new(4)],
        )
        .await;
    relational
        .insert_order(OrderId::new(2), UserId::new(4), &[ProductId::new(2)])
        .await;

    stores
}
