//! REST client behavior against a mock backend: envelopes, errors, auth.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use skillpath_client::{Backend, ClientError, HttpBackend, HttpSettings, NETWORK_ERROR_MESSAGE};
use skillpath_types::{RoadmapId, SignInForm, SkillId, StepId};

use crate::common::{
    courses_data, envelope, failure, http_backend, mount_dashboard, mount_json,
    notifications_data, overview_data, skills_data,
};

#[tokio::test]
async fn load_dashboard_decodes_every_endpoint() {
    let server = MockServer::start().await;
    mount_dashboard(&server, 650).await;

    let snapshot = http_backend(&server, None).load_dashboard().await.unwrap();

    assert_eq!(snapshot.progress.total_xp, 650);
    assert_eq!(snapshot.progress.level(), 3);
    assert_eq!(snapshot.current_streak, 4);
    assert_eq!(snapshot.achievements.len(), 1);
    assert_eq!(snapshot.skills[0].max_xp, 1000);
    assert_eq!(snapshot.courses[0].completed_lessons, 5);
    assert_eq!(snapshot.notifications.len(), 2);

    // Steps arrive out of order and are sorted by `order`.
    let steps: Vec<&str> = snapshot.roadmaps[0]
        .steps
        .iter()
        .map(|s| s.id.as_str())
        .collect();
    assert_eq!(steps, vec!["step-1", "step-2"]);
}

#[tokio::test]
async fn one_failing_endpoint_fails_the_whole_load() {
    let server = MockServer::start().await;
    mount_json(&server, "GET", "/api/stats/overview", 200, envelope(overview_data(0))).await;
    mount_json(&server, "GET", "/api/skills", 200, envelope(skills_data())).await;
    mount_json(&server, "GET", "/api/courses/user", 200, envelope(courses_data())).await;
    mount_json(&server, "GET", "/api/roadmaps", 500, failure("Database unavailable")).await;
    mount_json(&server, "GET", "/api/notifications", 200, envelope(notifications_data())).await;

    let err = http_backend(&server, None).load_dashboard().await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert_eq!(err.to_string(), "Database unavailable");
}

#[tokio::test]
async fn rejection_without_message_names_the_status() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "GET",
        "/api/skills",
        503,
        json!({ "success": false, "message": "" }),
    )
    .await;

    let err = http_backend(&server, None).skills().await.unwrap_err();
    assert_eq!(err.to_string(), "Request failed with status 503");
}

#[tokio::test]
async fn not_found_envelope_maps_to_not_found() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "POST",
        "/api/skills/skill-gone/practice",
        404,
        failure("Skill not found"),
    )
    .await;

    let err = http_backend(&server, None)
        .practice_skill(&SkillId::new("skill-gone"), 50)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::NotFound { .. }));
    assert_eq!(err.to_string(), "Skill not found");
}

#[tokio::test]
async fn missing_data_is_malformed() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "GET",
        "/api/skills",
        200,
        json!({ "success": true, "message": "OK" }),
    )
    .await;

    let err = http_backend(&server, None).skills().await.unwrap_err();
    assert!(matches!(err, ClientError::Malformed { .. }), "{err:?}");
    assert!(err.to_string().contains("/api/skills"));
}

#[tokio::test]
async fn wrong_payload_shape_is_malformed() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "GET",
        "/api/notifications",
        200,
        envelope(json!({ "notifications": "none" })),
    )
    .await;

    let err = http_backend(&server, None).notifications().await.unwrap_err();
    assert!(matches!(err, ClientError::Malformed { .. }), "{err:?}");
}

#[tokio::test]
async fn practice_sends_xp_and_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/skills/skill-rust/practice"))
        .and(header("authorization", "Bearer tok-123"))
        .and(body_json(json!({ "xp": 50 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "skill": {
                "id": "skill-rust",
                "name": "Rust",
                "level": 4,
                "xp": 30,
                "maxXp": 1000,
                "category": "Systems",
                "color": "#dea584",
            },
            "user": { "total_xp": 700, "level": 3 },
            "leveled_up": true,
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = http_backend(&server, Some("tok-123"))
        .practice_skill(&SkillId::new("skill-rust"), 50)
        .await
        .unwrap();

    assert!(outcome.leveled_up);
    assert!(!outcome.user_leveled_up);
    assert_eq!(outcome.skill.level, 4);
    assert_eq!(outcome.progress.total_xp, 700);
}

#[tokio::test]
async fn server_level_is_recomputed_from_total_xp() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "PUT",
        "/api/roadmaps/roadmap-backend/steps/step-2/complete",
        200,
        envelope(json!({
            "user": { "total_xp": 900, "level": 1 },
            "xp_gained": 200,
        })),
    )
    .await;

    let outcome = http_backend(&server, None)
        .complete_step(&RoadmapId::new("roadmap-backend"), &StepId::new("step-2"))
        .await
        .unwrap();

    assert_eq!(outcome.xp_gained, 200);
    assert_eq!(outcome.progress.level(), 4);
}

#[tokio::test]
async fn step_without_xp_gained_reports_zero() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "PUT",
        "/api/roadmaps/r/steps/s/complete",
        200,
        envelope(json!({ "user": { "total_xp": 10 } })),
    )
    .await;

    let outcome = http_backend(&server, None)
        .complete_step(&RoadmapId::new("r"), &StepId::new("s"))
        .await
        .unwrap();
    assert_eq!(outcome.xp_gained, 0);
}

#[tokio::test]
async fn xp_history_requests_the_window() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/stats/xp-history"))
        .and(query_param("days", "30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "history": [{
                "id": "h-1",
                "amount": 50,
                "source_type": "skill",
                "source_id": "skill-rust",
                "description": "Practiced Rust",
                "created_at": "2026-10-18T08:00:00",
            }],
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let history = http_backend(&server, None).xp_history(30).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].amount, 50);
}

#[tokio::test]
async fn skills_by_category_decodes_the_map() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "GET",
        "/api/stats/skills-by-category",
        200,
        envelope(json!({
            "categories": {
                "Systems": { "total_level": 7, "count": 2 },
                "Data": { "total_level": 2, "count": 1 },
            },
        })),
    )
    .await;

    let categories = http_backend(&server, None).skills_by_category().await.unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories["Systems"].total_level, 7);
    assert_eq!(categories["Data"].count, 1);
}

#[tokio::test]
async fn sign_in_returns_access_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/signin"))
        .and(body_json(json!({ "email": "ada@example.com", "password": "hunter22" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-abc",
            "token_type": "bearer",
        })))
        .mount(&server)
        .await;

    let form = SignInForm {
        email: " Ada@Example.com ".to_string(),
        password: "hunter22".to_string(),
    }
    .validate()
    .unwrap();
    let token = http_backend(&server, None).sign_in(&form).await.unwrap();
    assert_eq!(token, "tok-abc");
}

#[tokio::test]
async fn auth_errors_surface_detail() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "POST",
        "/auth/signin",
        401,
        json!({ "detail": "Invalid credentials" }),
    )
    .await;

    let form = SignInForm {
        email: "ada@example.com".to_string(),
        password: "wrong-password".to_string(),
    }
    .validate()
    .unwrap();
    let err = http_backend(&server, None).sign_in(&form).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.to_string(), "Invalid credentials");
}

#[tokio::test]
async fn validation_detail_lists_are_joined() {
    let server = MockServer::start().await;
    mount_json(
        &server,
        "POST",
        "/auth/signin",
        422,
        json!({ "detail": [{ "msg": "field required" }, { "msg": "value is not a valid email" }] }),
    )
    .await;

    let form = SignInForm {
        email: "ada@example.com".to_string(),
        password: "hunter22".to_string(),
    }
    .validate()
    .unwrap();
    let err = http_backend(&server, None).sign_in(&form).await.unwrap_err();
    assert_eq!(err.to_string(), "field required; value is not a valid email");
}

#[tokio::test]
async fn unreachable_backend_is_a_network_error() {
    let backend = Backend::Http(
        HttpBackend::new(HttpSettings {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: std::time::Duration::from_secs(2),
            access_token: None,
        })
        .unwrap(),
    );

    let err = backend.load_dashboard().await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(err.to_string(), NETWORK_ERROR_MESSAGE);
}
