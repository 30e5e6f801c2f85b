#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{self, Request, StatusCode},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::models::leaderboard::{Activity, Level};
    use crate::models::user::Role;

    use super::super::common::{create_test_user, json_body, setup};

    #[tokio::test]
    #[ignore = "requires MongoDB; set MONGODB_TEST_URI"]
    async fn test_first_contributions_end_to_end() {
        let ctx = setup().await;
        let alumni = create_test_user(&ctx, Role::Alumni, "Asha Rao", "asha@example.com").await;

        let leaderboard = &ctx.services.leaderboard_service;
        leaderboard
            .track_activity(alumni.id, Activity::AcceptMentorship)
            .await
            .unwrap();
        leaderboard
            .track_activity(alumni.id, Activity::CompleteMentorship)
            .await
            .unwrap();
        leaderboard.add_rating(alumni.id, 5).await.unwrap();

        let entry = leaderboard.entry_for(alumni.id).await.unwrap();
        assert_eq!(entry.points, 42);
        assert_eq!(entry.level, Level::Bronze);
        assert_eq!(entry.rating.average, 5.0);
        assert_eq!(entry.rank_score, 59.4);
        assert_eq!(entry.streak.current, 1);
        assert_eq!(entry.rank, 1, "sole entry should hold rank 1 after re-rank");
    }

    #[tokio::test]
    #[ignore = "requires MongoDB; set MONGODB_TEST_URI"]
    async fn test_rerank_is_idempotent() {
        let ctx = setup().await;
        let leaderboard = &ctx.services.leaderboard_service;

        let a = create_test_user(&ctx, Role::Alumni, "A", "a@example.com").await;
        let b = create_test_user(&ctx, Role::Alumni, "B", "b@example.com").await;
        let c = create_test_user(&ctx, Role::Alumni, "C", "c@example.com").await;

        leaderboard.track_activity(a.id, Activity::ConductWorkshop).await.unwrap();
        leaderboard.track_activity(b.id, Activity::AnswerQuestion).await.unwrap();
        leaderboard.track_activity(c.id, Activity::UploadInterview).await.unwrap();

        let ids = [a.id, b.id, c.id];

        leaderboard.rerank_all().await.unwrap();
        let mut first_ranks = Vec::new();
        for id in ids {
            first_ranks.push(leaderboard.entry_for(id).await.unwrap().rank);
        }

        leaderboard.rerank_all().await.unwrap();
        let mut second_ranks = Vec::new();
        for id in ids {
            second_ranks.push(leaderboard.entry_for(id).await.unwrap().rank);
        }

        assert_eq!(first_ranks, second_ranks);
        // workshop (25) > interview (15) > answer (5)
        assert_eq!(first_ranks, vec![1, 3, 2]);
    }

    #[tokio::test]
    #[ignore = "requires MongoDB; set MONGODB_TEST_URI"]
    async fn test_leaderboard_endpoint_returns_ranked_entries() {
        let ctx = setup().await;
        let alumni = create_test_user(&ctx, Role::Alumni, "Asha Rao", "asha@example.com").await;

        ctx.services
            .leaderboard_service
            .track_activity(alumni.id, Activity::ShareResource)
            .await
            .unwrap();

        let request = Request::builder()
            .uri("/leaderboard?limit=5")
            .body(Body::empty())
            .unwrap();
        let response = ctx.app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let entries: Value = serde_json::from_slice(&bytes).unwrap();
        let list = entries.as_array().expect("array response");
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["entry"]["rank"], 1);
        assert_eq!(list[0]["user"]["name"], "Asha Rao");
    }

    #[tokio::test]
    #[ignore = "requires MongoDB; set MONGODB_TEST_URI"]
    async fn test_user_entry_created_on_first_view() {
        let ctx = setup().await;
        let alumni = create_test_user(&ctx, Role::Alumni, "Asha Rao", "asha@example.com").await;

        let uri = format!("/leaderboard/users/{}", alumni.id.to_hex());
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = ctx.app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let entry: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(entry["points"], 0);
        assert_eq!(entry["level"], "Bronze");
        assert_eq!(entry["rank"], 0, "unranked until the next pass");
    }

    #[tokio::test]
    #[ignore = "requires MongoDB; set MONGODB_TEST_URI"]
    async fn test_rating_endpoint_validation_and_auth() {
        let ctx = setup().await;
        let student = create_test_user(&ctx, Role::Student, "Ben", "ben@example.com").await;
        let alumni = create_test_user(&ctx, Role::Alumni, "Asha Rao", "asha@example.com").await;

        let uri = format!("/alumni/{}/ratings", alumni.id.to_hex());

        // No token.
        let request = Request::builder()
            .uri(&uri)
            .method("POST")
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(json_body(&json!({ "value": 4 })))
            .unwrap();
        let response = ctx.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // Out-of-range value.
        let request = Request::builder()
            .uri(&uri)
            .method("POST")
            .header(http::header::AUTHORIZATION, format!("Bearer {}", student.token))
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(json_body(&json!({ "value": 6 })))
            .unwrap();
        let response = ctx.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Nothing was recorded by the failed calls.
        let entry = ctx.services.leaderboard_service.entry_for(alumni.id).await.unwrap();
        assert_eq!(entry.rating.total, 0);

        // Valid rating.
        let request = Request::builder()
            .uri(&uri)
            .method("POST")
            .header(http::header::AUTHORIZATION, format!("Bearer {}", student.token))
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(json_body(&json!({ "value": 5 })))
            .unwrap();
        let response = ctx.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let entry = ctx.services.leaderboard_service.entry_for(alumni.id).await.unwrap();
        assert_eq!(entry.rating.total, 1);
        assert_eq!(entry.contributions.five_star_ratings, 1);
        assert_eq!(entry.contributions.helpful_ratings, 1);
        assert_eq!(entry.points, 12);
    }

    #[tokio::test]
    #[ignore = "requires MongoDB; set MONGODB_TEST_URI"]
    async fn test_awarded_badges_are_appended() {
        let ctx = setup().await;
        let alumni = create_test_user(&ctx, Role::Alumni, "Asha Rao", "asha@example.com").await;
        let leaderboard = &ctx.services.leaderboard_service;

        leaderboard.track_activity(alumni.id, Activity::ShareInsight).await.unwrap();
        leaderboard
            .award_badge(
                alumni.id,
                crate::models::leaderboard::Badge {
                    name: "First Insight".to_string(),
                    icon: "lightbulb".to_string(),
                    description: "Shared a first company insight".to_string(),
                    earned_at: bson::DateTime::now(),
                },
            )
            .await
            .unwrap();

        let entry = leaderboard.entry_for(alumni.id).await.unwrap();
        assert_eq!(entry.contributions.company_insights, 1);
        assert_eq!(entry.badges.len(), 1);
        assert_eq!(entry.badges[0].name, "First Insight");
    }

    #[tokio::test]
    #[ignore = "requires MongoDB; set MONGODB_TEST_URI"]
    async fn test_top_by_contribution_rejects_unknown_kind() {
        let ctx = setup().await;

        let request = Request::builder()
            .uri("/leaderboard/top/karma")
            .body(Body::empty())
            .unwrap();
        let response = ctx.app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let request = Request::builder()
            .uri("/leaderboard/top/questions_answered")
            .body(Body::empty())
            .unwrap();
        let response = ctx.app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
