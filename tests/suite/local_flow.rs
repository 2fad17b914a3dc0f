//! The in-memory backend through the same `Backend` surface the app uses.

use skillpath_client::{Backend, ClientError, LocalBackend};
use skillpath_engine::{Page, Phase};
use skillpath_types::{CourseId, NewSkill, SignInForm, SignUpForm};

use crate::common::{app, loaded, local_app, settle};

fn local() -> Backend {
    Backend::Local(LocalBackend::new())
}

#[tokio::test]
async fn sign_up_then_sign_in() {
    let backend = local();
    let signup = SignUpForm {
        name: "Ada Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        password: "hunter22".to_string(),
        confirm_password: "hunter22".to_string(),
    }
    .validate()
    .unwrap();
    backend.sign_up(&signup).await.unwrap();

    let err = backend.sign_up(&signup).await.unwrap_err();
    assert_eq!(err.to_string(), "Email already registered");

    let good = SignInForm {
        email: "ADA@example.com".to_string(),
        password: "hunter22".to_string(),
    }
    .validate()
    .unwrap();
    let token = backend.sign_in(&good).await.unwrap();
    assert!(token.starts_with("local-"));

    let bad = SignInForm {
        email: "ada@example.com".to_string(),
        password: "not-the-password".to_string(),
    }
    .validate()
    .unwrap();
    let err = backend.sign_in(&bad).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn created_skill_appears_on_the_dashboard() {
    let backend = Backend::Local(LocalBackend::with_sample_data());
    let skill = backend
        .create_skill(&NewSkill {
            name: "Rust".to_string(),
            category: "Systems".to_string(),
            color: None,
        })
        .await
        .unwrap();
    assert_eq!(skill.level, 1);

    let mut app = loaded(app(backend.clone())).await;
    assert!(app.state().snapshot().skills.iter().any(|s| s.id == skill.id));

    backend.delete_skill(&skill.id).await.unwrap();
    app.refresh();
    settle(&mut app).await;
    assert!(!app.state().snapshot().skills.iter().any(|s| s.id == skill.id));

    let err = backend.delete_skill(&skill.id).await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound { .. }));
}

#[tokio::test]
async fn enrolling_adds_a_course_at_zero() {
    let backend = Backend::Local(LocalBackend::with_sample_data());
    let before = backend.user_courses().await.unwrap().len();

    backend
        .enroll_course(&CourseId::new("course-ml"))
        .await
        .unwrap();
    let courses = backend.user_courses().await.unwrap();
    assert_eq!(courses.len(), before + 1);
    let ml = courses.iter().find(|c| c.id.as_str() == "course-ml").unwrap();
    assert_eq!((ml.progress, ml.completed_lessons), (0, 0));

    let err = backend
        .enroll_course(&CourseId::new("course-ml"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Already enrolled in this course");
}

#[tokio::test]
async fn first_run_to_first_level_up() {
    let mut app = loaded(app(local())).await;
    assert_eq!(app.state().phase(), &Phase::Empty);

    app.init_sample_data();
    settle(&mut app).await;
    assert!(app.state().is_ready());
    app.dismiss();

    app.show_page(Page::Skills);
    let node = app
        .state()
        .snapshot()
        .skills
        .iter()
        .position(|s| s.name == "Node.js")
        .unwrap();
    app.move_selection(node as isize);
    app.practice_selected_skill();
    settle(&mut app).await;

    assert!(app.celebration().is_some());
    assert!(
        app.state()
            .snapshot()
            .notifications
            .iter()
            .any(|n| n.message.contains("Node.js leveled up to Level 6"))
    );
}

#[tokio::test]
async fn repeated_practice_is_monotonic() {
    let mut app = loaded(local_app()).await;
    app.show_page(Page::Skills);

    let mut last = app.state().snapshot().progress.total_xp;
    for _ in 0..5 {
        app.practice_selected_skill();
        settle(&mut app).await;
        let total = app.state().snapshot().progress.total_xp;
        assert_eq!(total, last + 50);
        last = total;
    }
}
