//! User account route handlers.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
};
use serde::{Deserialize, Serialize};

use shopsphere_core::UserId;

use super::Envelope;
use super::auth::UserData;
use crate::error::Result;
use crate::middleware::{Client, RequireAuth};
use crate::models::{Order, Pagination, User};
use crate::services::users::{UpdateUser, UserService};
use crate::state::AppState;

/// Query string of the admin user listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub role: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UsersData {
    users: Vec<User>,
}

/// Response of `GET /users`.
#[derive(Debug, Serialize)]
pub struct UsersResponse {
    success: bool,
    count: usize,
    total: u64,
    data: UsersData,
}

#[derive(Debug, Serialize)]
pub struct OrdersData {
    orders: Vec<Order>,
}

/// Response of `GET /users/{id}/orders`.
#[derive(Debug, Serialize)]
pub struct OrdersResponse {
    success: bool,
    count: usize,
    data: OrdersData,
}

/// Every account, newest first. Admin only.
///
/// GET /api/users
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(requester): RequireAuth,
    params: std::result::Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<UsersResponse>> {
    let Query(params) = params?;
    let page = Pagination::from_params(params.limit.as_deref(), params.offset.as_deref());

    let users = UserService::new(state.stores())
        .list(&requester, params.role.as_deref(), page)
        .await?;

    Ok(Json(UsersResponse {
        success: true,
        count: users.items.len(),
        total: users.total,
        data: UsersData { users: users.items },
    }))
}

/// A user's profile. Self or admin only.
///
/// GET /api/users/{id}
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(requester): RequireAuth,
    path: std::result::Result<Path<UserId>, PathRejection>,
) -> Result<Json<Envelope<UserData>>> {
    let Path(id) = path?;
    let user = UserService::new(state.stores()).get(&requester, id).await?;
    Ok(Json(Envelope::data(UserData { user })))
}

/// Update a profile. Self or admin; only admins may send `role`.
///
/// PUT /api/users/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(requester): RequireAuth,
    Client(client): Client,
    path: std::result::Result<Path<UserId>, PathRejection>,
    body: std::result::Result<Json<UpdateUser>, JsonRejection>,
) -> Result<Json<Envelope<UserData>>> {
    let Path(id) = path?;
    let Json(changes) = body?;

    let user = UserService::new(state.stores())
        .update(&requester, id, changes, &client)
        .await?;

    Ok(Json(Envelope::with_message(
        "User updated successfully",
        UserData { user },
    )))
}

/// Delete an account. Self or admin.
///
/// DELETE /api/users/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(requester): RequireAuth,
    path: std::result::Result<Path<UserId>, PathRejection>,
) -> Result<Json<Envelope<()>>> {
    let Path(id) = path?;
    UserService::new(state.stores())
        .delete(&requester, id)
        .await?;
    Ok(Json(Envelope::message("User deleted successfully")))
}

/// A user's order history. Self or admin.
///
/// GET /api/users/{id}/orders
pub async fn orders(
    State(state): State<AppState>,
    RequireAuth(requester): RequireAuth,
    path: std::result::Result<Path<UserId>, PathRejection>,
) -> Result<Json<OrdersResponse>> {
    let Path(id) = path?;
    let orders = UserService::new(state.stores())
        .orders(&requester, id)
        .await?;

    Ok(Json(OrdersResponse {
        success: true,
        count: orders.len(),
        data: OrdersData { orders },
    }))
}
