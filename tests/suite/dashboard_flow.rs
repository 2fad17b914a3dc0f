//! Dashboard state machine driven end to end over the REST client.

use serde_json::json;
use wiremock::MockServer;

use skillpath_engine::{CelebrationKind, Page, Phase};

use crate::common::{
    app, courses_data, envelope, failure, http_backend, loaded, mount_dashboard, mount_json,
    notifications_data, roadmaps_data, settle, skills_data,
};

fn rust_after_practice() -> serde_json::Value {
    json!({
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
        "user_leveled_up": false,
    })
}

#[tokio::test]
async fn initial_load_reaches_ready() {
    let server = MockServer::start().await;
    mount_dashboard(&server, 650).await;

    let app = loaded(app(http_backend(&server, None))).await;

    assert_eq!(app.state().phase(), &Phase::Ready);
    assert_eq!(app.state().snapshot().skills.len(), 2);
    assert_eq!(app.state().unread_count(), 1);
    assert_eq!(
        app.state().primary_roadmap().map(|r| r.completion_percent()),
        Some(50)
    );
}

#[tokio::test]
async fn failed_load_shows_the_error_screen() {
    let server = MockServer::start().await;
    mount_json(&server, "GET", "/api/stats/overview", 500, failure("Database unavailable")).await;
    mount_json(&server, "GET", "/api/skills", 200, envelope(skills_data())).await;
    mount_json(&server, "GET", "/api/courses/user", 200, envelope(courses_data())).await;
    mount_json(&server, "GET", "/api/roadmaps", 200, envelope(roadmaps_data())).await;
    mount_json(&server, "GET", "/api/notifications", 200, envelope(notifications_data())).await;

    let app = loaded(app(http_backend(&server, None))).await;

    assert_eq!(
        app.state().phase(),
        &Phase::Failed {
            message: "Database unavailable".to_string()
        }
    );
    assert!(!app.state().is_ready());
}

#[tokio::test]
async fn empty_account_is_a_first_run() {
    let server = MockServer::start().await;
    mount_json(&server, "GET", "/api/stats/overview", 200, envelope(json!({ "totalXP": 0 }))).await;
    mount_json(&server, "GET", "/api/skills", 200, envelope(json!({ "skills": [] }))).await;
    mount_json(&server, "GET", "/api/courses/user", 200, envelope(json!({ "courses": [] }))).await;
    mount_json(&server, "GET", "/api/roadmaps", 200, envelope(json!({ "roadmaps": [] }))).await;
    mount_json(
        &server,
        "GET",
        "/api/notifications",
        200,
        envelope(json!({ "notifications": [] })),
    )
    .await;

    let app = loaded(app(http_backend(&server, None))).await;
    assert_eq!(app.state().phase(), &Phase::Empty);
}

#[tokio::test]
async fn practice_level_up_celebrates() {
    let server = MockServer::start().await;
    mount_dashboard(&server, 650).await;
    mount_json(
        &server,
        "POST",
        "/api/skills/skill-rust/practice",
        200,
        envelope(rust_after_practice()),
    )
    .await;

    let mut app = loaded(app(http_backend(&server, None))).await;
    app.show_page(Page::Skills);
    app.practice_selected_skill();
    settle(&mut app).await;

    let snapshot = app.state().snapshot();
    assert_eq!(snapshot.progress.total_xp, 700);
    assert_eq!((snapshot.skills[0].level, snapshot.skills[0].xp), (4, 30));
    assert_eq!(
        app.celebration().map(|c| c.kind().clone()),
        Some(CelebrationKind::SkillLevelUp {
            skill: "Rust".to_string(),
            level: 4
        })
    );
}

#[tokio::test]
async fn failed_practice_keeps_state_and_alerts() {
    let server = MockServer::start().await;
    mount_dashboard(&server, 650).await;
    mount_json(
        &server,
        "POST",
        "/api/skills/skill-rust/practice",
        500,
        failure("Database locked"),
    )
    .await;

    let mut app = loaded(app(http_backend(&server, None))).await;
    let before = app.state().snapshot().clone();
    app.show_page(Page::Skills);
    app.practice_selected_skill();
    settle(&mut app).await;

    assert_eq!(app.state().snapshot(), &before);
    assert_eq!(
        app.alert().map(|a| a.message.clone()),
        Some("Failed to update skill: Database locked".to_string())
    );
    assert!(app.celebration().is_none());
}

#[tokio::test]
async fn completing_a_step_marks_it_and_awards_xp() {
    let server = MockServer::start().await;
    mount_dashboard(&server, 650).await;
    mount_json(
        &server,
        "PUT",
        "/api/roadmaps/roadmap-backend/steps/step-2/complete",
        200,
        envelope(json!({ "user": { "total_xp": 850, "level": 3 }, "xp_gained": 200 })),
    )
    .await;

    let mut app = loaded(app(http_backend(&server, None))).await;
    app.show_page(Page::Roadmap);
    app.move_selection(1);
    app.complete_selected_step();
    settle(&mut app).await;

    let roadmap = app.state().primary_roadmap().unwrap();
    assert!(roadmap.steps.iter().all(|s| s.completed));
    assert_eq!(roadmap.completion_percent(), 100);
    assert_eq!(app.state().snapshot().progress.total_xp, 850);
    assert_eq!(
        app.celebration().map(|c| c.kind().clone()),
        Some(CelebrationKind::StepCompleted {
            step: "Databases".to_string(),
            xp: 200
        })
    );
}

#[tokio::test]
async fn sample_data_then_reload() {
    let server = MockServer::start().await;
    mount_dashboard(&server, 650).await;
    mount_json(
        &server,
        "POST",
        "/init-sample-data",
        200,
        json!({ "success": true, "message": "Sample data initialized successfully" }),
    )
    .await;

    let mut app = app(http_backend(&server, None));
    app.init_sample_data();
    settle(&mut app).await;

    assert!(app.state().is_ready());
    assert!(app.alert().is_some());
}
