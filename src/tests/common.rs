use axum::Router;
use bson::oid::ObjectId;
use mongodb::Database;
use serde_json::Value;
use std::sync::Arc;

use crate::{
    config::Config,
    db::init_db,
    models::user::{Role, User},
    routes,
    services::{leaderboard_service::LeaderboardService, mentorship_service::MentorshipService},
    utils::generate_jwt,
};

pub struct TestServices {
    pub leaderboard_service: Arc<LeaderboardService>,
    pub mentorship_service: Arc<MentorshipService>,
}

pub struct TestContext {
    pub app: Router,
    pub db: Arc<Database>,
    pub jwt_secret: String,
    pub services: TestServices,
}

pub struct TestUser {
    pub id: ObjectId,
    pub token: String,
    pub role: Role,
}

pub async fn setup() -> TestContext {
    dotenv::dotenv().ok();

    let config = Config {
        mongodb_uri: std::env::var("MONGODB_TEST_URI")
            .expect("MONGODB_TEST_URI must be set for tests"),
        jwt_secret: std::env::var("JWT_SECRET").unwrap_or("test_secret".to_string()),
        port: 8001,
    };
    let jwt_secret = config.jwt_secret.clone();

    let db = Arc::new(init_db(&config.mongodb_uri).await);

    // Clean slate per test run.
    for collection in ["users", "leaderboards", "mentorship_requests"] {
        db.collection::<bson::Document>(collection)
            .drop()
            .await
            .unwrap_or_else(|e| panic!("Failed to drop collection {}: {}", collection, e));
    }

    let leaderboard_service = Arc::new(LeaderboardService::new(db.clone()));
    let mentorship_service = Arc::new(MentorshipService::new(
        db.clone(),
        leaderboard_service.clone(),
    ));

    let app = routes::init_routes(
        leaderboard_service.clone(),
        mentorship_service.clone(),
        Arc::new(config),
    );

    TestContext {
        app,
        db,
        jwt_secret,
        services: TestServices {
            leaderboard_service,
            mentorship_service,
        },
    }
}

/// Inserts a user and returns its ID plus a valid JWT for it.
pub async fn create_test_user(
    ctx: &TestContext,
    role: Role,
    name: &str,
    email: &str,
) -> TestUser {
    let user = User {
        id: Some(ObjectId::new()),
        name: name.to_string(),
        email: email.to_string(),
        role: role.clone(),
        company: None,
        graduation_year: None,
        verified: true,
    };

    ctx.db
        .collection("users")
        .insert_one(user.clone())
        .await
        .expect("Failed to insert test user");

    let user_id = user.id.expect("Test user should have an ID after insertion");
    let token = generate_jwt(&user_id.to_hex(), &role.to_string(), &ctx.jwt_secret);

    TestUser { id: user_id, token, role }
}

/// Helper to create a JSON body for requests.
pub fn json_body(json: &Value) -> axum::body::Body {
    axum::body::Body::from(json.to_string())
}
