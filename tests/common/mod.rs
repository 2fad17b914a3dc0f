//! Shared test utilities and fixtures
//!
//! A wiremock server that speaks the dashboard's REST envelope, plus helpers
//! for building backends and apps against it.

#![allow(dead_code)]

use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use skillpath_client::{Backend, HttpBackend, HttpSettings, LocalBackend};
use skillpath_engine::{App, AppOptions, UiOptions};

/// `{success: true, message, timestamp, data}`.
pub fn envelope(data: Value) -> Value {
    json!({
        "success": true,
        "message": "OK",
        "timestamp": "2026-10-18T12:00:00Z",
        "data": data,
    })
}

pub fn failure(message: &str) -> Value {
    json!({
        "success": false,
        "message": message,
        "timestamp": "2026-10-18T12:00:00Z",
    })
}

pub async fn mount_json(server: &MockServer, verb: &str, route: &str, status: u16, body: Value) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

pub fn overview_data(total_xp: u64) -> Value {
    json!({
        "totalXP": total_xp,
        "level": total_xp / 300 + 1,
        "current_streak": 4,
        "skills_count": 2,
        "courses_count": 1,
        "achievements": [{
            "id": "first-steps",
            "title": "First Steps",
            "description": "Practice a skill for the first time",
            "icon": "star",
            "rarity": "common",
        }],
    })
}

pub fn skills_data() -> Value {
    json!({
        "skills": [
            {
                "id": "skill-rust",
                "name": "Rust",
                "level": 3,
                "xp": 980,
                "maxXp": 1000,
                "category": "Systems",
                "color": "#dea584",
            },
            {
                "id": "skill-sql",
                "name": "SQL",
                "level": 2,
                "xp": 100,
                "maxXp": 1000,
                "category": "Data",
                "color": "#336791",
            },
        ],
    })
}

pub fn courses_data() -> Value {
    json!({
        "courses": [{
            "id": "course-async",
            "title": "Async Rust",
            "progress": 50,
            "xpReward": 400,
            "lessons": 10,
            "completedLessons": 5,
            "thumbnail": "rust",
            "category": "Systems",
        }],
    })
}

pub fn roadmaps_data() -> Value {
    json!({
        "roadmaps": [{
            "id": "roadmap-backend",
            "title": "Backend Engineer",
            "steps": [
                {"id": "step-2", "title": "Databases", "description": "SQL and indexes", "completed": false, "xp": 200, "order": 2},
                {"id": "step-1", "title": "HTTP", "description": "Requests and status codes", "completed": true, "xp": 150, "order": 1},
            ],
        }],
    })
}

pub fn notifications_data() -> Value {
    json!({
        "notifications": [
            {"id": "n-2", "message": "🏆 Achievement unlocked: First Steps!", "type": "achievement", "read": false, "created_at": "2026-10-17T09:00:00Z"},
            {"id": "n-1", "message": "Welcome aboard", "type": "info", "read": true, "created_at": "2026-10-16T09:00:00Z"},
        ],
    })
}

/// Mount every GET the initial dashboard load issues.
pub async fn mount_dashboard(server: &MockServer, total_xp: u64) {
    mount_json(server, "GET", "/api/stats/overview", 200, envelope(overview_data(total_xp))).await;
    mount_json(server, "GET", "/api/skills", 200, envelope(skills_data())).await;
    mount_json(server, "GET", "/api/courses/user", 200, envelope(courses_data())).await;
    mount_json(server, "GET", "/api/roadmaps", 200, envelope(roadmaps_data())).await;
    mount_json(server, "GET", "/api/notifications", 200, envelope(notifications_data())).await;
    mount_json(
        server,
        "GET",
        "/api/stats/xp-history",
        200,
        envelope(json!({ "history": [] })),
    )
    .await;
}

pub fn http_backend(server: &MockServer, access_token: Option<&str>) -> Backend {
    Backend::Http(
        HttpBackend::new(HttpSettings {
            base_url: server.uri(),
            timeout: Duration::from_secs(5),
            access_token: access_token.map(str::to_string),
        })
        .expect("mock server URL is valid"),
    )
}

pub fn app(backend: Backend) -> App {
    App::new(backend, AppOptions::default())
}

pub fn local_app() -> App {
    app(Backend::Local(LocalBackend::with_sample_data()))
}

pub fn reduced_motion_app(backend: Backend) -> App {
    App::new(
        backend,
        AppOptions {
            ui_options: UiOptions {
                reduced_motion: true,
                ..UiOptions::default()
            },
            ..AppOptions::default()
        },
    )
}

/// Run every in-flight backend request to completion.
pub async fn settle(app: &mut App) {
    while app.wait_for_backend().await {}
}

pub async fn loaded(mut app: App) -> App {
    app.reload();
    settle(&mut app).await;
    app
}
