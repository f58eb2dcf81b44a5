//! Demo data seeding and document-store index creation.
//!
//! Seeding is idempotent: relational rows use `ON CONFLICT DO NOTHING`, and a
//! review that already exists for its (product, user) pair is skipped along
//! with its comments.

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use shopsphere_api::models::ClientInfo;
use shopsphere_api::services::ServiceError;
use shopsphere_api::services::auth::hash_password;
use shopsphere_api::services::authz::Identity;
use shopsphere_api::services::comments::{CommentBody, CommentService};
use shopsphere_api::services::reviews::{CreateReview, ReviewService};
use shopsphere_api::stores::Stores;
use shopsphere_api::stores::postgres::PgRelationalStore;
use shopsphere_core::{Email, OrderId, ProductId, Role, UserId};

use super::{CliError, STORE_TIMEOUT, connect_mongo, connect_postgres};

/// Password of every demo account.
const DEMO_PASSWORD: &str = "password123";

struct DemoUser {
    id: i32,
    first_name: &'static str,
    last_name: &'static str,
    email: &'static str,
    role: Role,
}

const DEMO_USERS: &[DemoUser] = &[
    DemoUser { id: 1, first_name: "Marco", last_name: "Rossi", email: "admin@shopsphere.it", role: Role::Admin },
    DemoUser { id: 2, first_name: "Sara", last_name: "Neri", email: "sara.neri@shopsphere.it", role: Role::Seller },
    DemoUser { id: 3, first_name: "Mario", last_name: "Bianchi", email: "mario.bianchi@email.it", role: Role::Customer },
    DemoUser { id: 4, first_name: "Giulia", last_name: "Verdi", email: "giulia.verdi@email.it", role: Role::Customer },
    DemoUser { id: 5, first_name: "Luca", last_name: "Russo", email: "luca.russo@email.it", role: Role::Customer },
    DemoUser { id: 10, first_name: "Anna", last_name: "Ferrari", email: "anna.ferrari@email.it", role: Role::Customer },
    DemoUser { id: 17, first_name: "Paolo", last_name: "Esposito", email: "paolo.esposito@email.it", role: Role::Customer },
];

struct DemoReview {
    user: i32,
    product: i32,
    order: Option<i32>,
    rating: i64,
    title: &'static str,
    comment: &'static str,
    pros: &'static [&'static str],
    cons: &'static [&'static str],
    replies: &'static [(i32, &'static str)],
}

const DEMO_REVIEWS: &[DemoReview] = &[
    DemoReview {
        user: 3,
        product: 1,
        order: Some(1),
        rating: 5,
        title: "Fotocamera eccezionale",
        comment: "La fotocamera scatta foto incredibili anche di notte. Batteria ottima.",
        pros: &["Fotocamera", "Autonomia"],
        cons: &["Prezzo elevato"],
        replies: &[(4, "Concordo, la fotocamera è la migliore che abbia provato.")],
    },
    DemoReview {
        user: 17,
        product: 1,
        order: Some(15),
        rating: 4,
        title: "Ottimo ma costoso",
        comment: "Telefono veloce e fotocamera molto buona, ma si scalda un po'.",
        pros: &["Prestazioni"],
        cons: &["Si scalda", "Prezzo"],
        replies: &[],
    },
    DemoReview {
        user: 4,
        product: 2,
        order: Some(2),
        rating: 4,
        title: "Display splendido",
        comment: "Il display AMOLED è luminosissimo. Fotocamera buona ma non al top.",
        pros: &["Display"],
        cons: &[],
        replies: &[(3, "Come va la batteria dopo qualche mese?"), (4, "Ancora ottima!")],
    },
    DemoReview {
        user: 5,
        product: 4,
        order: Some(3),
        rating: 5,
        title: "Silenzio assoluto",
        comment: "La cancellazione del rumore funziona benissimo in treno e in aereo.",
        pros: &["Cancellazione del rumore", "Comfort"],
        cons: &[],
        replies: &[],
    },
    DemoReview {
        user: 5,
        product: 3,
        order: Some(3),
        rating: 3,
        title: "Buono per lavoro",
        comment: "Leggero e silenzioso, ma la memoria base è poca.",
        pros: &["Leggerezza"],
        cons: &["Poca memoria"],
        replies: &[],
    },
    DemoReview {
        user: 10,
        product: 6,
        order: Some(8),
        rating: 2,
        title: "Taglia piccola",
        comment: "Bella pelle ma la taglia è molto più piccola del previsto.",
        pros: &[],
        cons: &["Vestibilità"],
        replies: &[],
    },
    DemoReview {
        user: 4,
        product: 5,
        order: None,
        rating: 4,
        title: "Regalo riuscito",
        comment: "Suono pieno per le dimensioni, l'ho regalato a mio fratello.",
        pros: &["Suono"],
        cons: &[],
        replies: &[],
    },
];

/// Create the document-store indexes.
///
/// # Errors
///
/// Returns an error if the connection or index creation fails.
pub async fn indexes() -> Result<(), CliError> {
    let mongo = connect_mongo().await?;
    mongo.ensure_indexes().await?;
    info!("Indexes created");
    Ok(())
}

/// Seed demo users, catalog, orders, and optionally reviews and comments.
///
/// # Errors
///
/// Returns an error if a connection fails or a write fails for any reason
/// other than the row already existing.
pub async fn run(skip_documents: bool) -> Result<(), CliError> {
    let pool = connect_postgres().await?;

    seed_users(&pool).await?;
    info!("Loading catalog and order history...");
    sqlx::raw_sql(include_str!("../../../api/seeds/catalog.sql"))
        .execute(&pool)
        .await?;

    if skip_documents {
        info!("Seeding complete (relational only)");
        return Ok(());
    }

    let mongo = connect_mongo().await?;
    mongo.ensure_indexes().await?;

    let stores = Stores {
        relational: Arc::new(PgRelationalStore::new(pool, STORE_TIMEOUT)),
        reviews: Arc::new(mongo.review_store()),
        comments: Arc::new(mongo.comment_store()),
        activity: Arc::new(mongo.activity_store()),
    };
    let (reviews, comments) = seed_reviews(&stores).await?;

    info!("Seeding complete!");
    info!("  Users: {}", DEMO_USERS.len());
    info!("  Reviews inserted: {reviews}");
    info!("  Comments inserted: {comments}");
    Ok(())
}

async fn seed_users(pool: &PgPool) -> Result<(), CliError> {
    info!("Seeding demo users...");
    for user in DEMO_USERS {
        sqlx::query(
            r"
            INSERT INTO users (id, first_name, last_name, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO NOTHING
            ",
        )
        .bind(user.id)
        .bind(user.first_name)
        .bind(user.last_name)
        .bind(user.email)
        .bind(hash_password(DEMO_PASSWORD)?)
        .bind(user.role)
        .execute(pool)
        .await?;
    }

    sqlx::query("SELECT setval('users_id_seq', (SELECT MAX(id) FROM users))")
        .execute(pool)
        .await?;
    Ok(())
}

fn identity(id: i32) -> Result<Identity, CliError> {
    let user = DEMO_USERS
        .iter()
        .find(|u| u.id == id)
        .ok_or_else(|| CliError::Seed(format!("unknown demo user {id}")))?;
    let email = Email::parse(user.email).map_err(|e| CliError::Seed(e.to_string()))?;

    Ok(Identity {
        id: UserId::new(user.id),
        email,
        role: user.role,
    })
}

async fn seed_reviews(stores: &Stores) -> Result<(usize, usize), CliError> {
    let reviews = ReviewService::new(stores);
    let comments = CommentService::new(stores);
    let client = ClientInfo {
        ip_address: None,
        user_agent: Some("shopsphere-cli".to_owned()),
    };
    let (mut review_count, mut comment_count) = (0, 0);

    for demo in DEMO_REVIEWS {
        let author = identity(demo.user)?;
        let input = CreateReview {
            rating: Some(demo.rating),
            title: Some(demo.title.to_owned()),
            comment: Some(demo.comment.to_owned()),
            pros: demo.pros.iter().map(|p| (*p).to_owned()).collect(),
            cons: demo.cons.iter().map(|c| (*c).to_owned()).collect(),
            order_id: demo.order.map(OrderId::new),
        };

        let review = match reviews
            .create(&author, ProductId::new(demo.product), input, &client)
            .await
        {
            Ok(review) => review,
            Err(ServiceError::Conflict(_)) => {
                info!(user = demo.user, product = demo.product, "Review exists, skipping");
                continue;
            }
            Err(e) => return Err(CliError::Seed(e.to_string())),
        };
        review_count += 1;

        for (user, text) in demo.replies {
            let body = CommentBody {
                comment: Some((*text).to_owned()),
            };
            comments
                .create(&identity(*user)?, &review.id, &body)
                .await
                .map_err(|e| CliError::Seed(e.to_string()))?;
            comment_count += 1;
        }
    }

    Ok((review_count, comment_count))
}
