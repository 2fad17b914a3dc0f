//! Full-frame rendering into a virtual terminal.

use ratatui::Terminal;
use wiremock::MockServer;

use skillpath_client::{Backend, HttpBackend, HttpSettings, LocalBackend};
use skillpath_engine::{App, AppOptions, Page, UiOptions};
use skillpath_tui::draw;

use crate::common::{
    app, http_backend, loaded, local_app, mount_dashboard, reduced_motion_app, settle,
};
use crate::vt100_backend::VT100Backend;

fn render_to(app: &App) -> Terminal<VT100Backend> {
    let mut terminal = Terminal::new(VT100Backend::new(120, 36)).unwrap();
    terminal.draw(|frame| draw(frame, app)).unwrap();
    terminal
}

fn render(app: &App) -> String {
    render_to(app).backend().contents()
}

#[tokio::test]
async fn loading_screen() {
    let mut app = local_app();
    // Current-thread runtime: the spawned load has not run yet.
    app.reload();

    assert!(render(&app).contains("Loading Dashboard..."));
}

#[tokio::test]
async fn first_run_shows_welcome() {
    let app = loaded(app(Backend::Local(LocalBackend::new()))).await;
    let screen = render(&app);
    assert!(screen.contains("Welcome to SkillProgress!"), "{screen}");
    assert!(screen.contains("to initialize sample data and get started"));
}

#[tokio::test]
async fn failed_load_names_the_backend() {
    let backend = Backend::Http(
        HttpBackend::new(HttpSettings {
            base_url: "http://127.0.0.1:9/".to_string(),
            timeout: std::time::Duration::from_secs(2),
            access_token: None,
        })
        .unwrap(),
    );
    let app = loaded(app(backend)).await;
    let screen = render(&app);

    assert!(screen.contains("Error: Network error."), "{screen}");
    assert!(screen.contains("Make sure backend is running at http://127.0.0.1:9"));
    assert!(screen.contains("Retry"));
    assert!(screen.contains("Initialize Sample Data"));
}

#[tokio::test]
async fn dashboard_page_shows_level_and_streak() {
    let app = loaded(local_app()).await;
    let screen = render(&app);

    let level = app.state().snapshot().progress.level();
    assert!(screen.contains(&format!("Level {level}")), "{screen}");
    assert!(screen.contains("3 days"));
    assert!(screen.contains("Achievements"));
    assert!(screen.contains("1 Dashboard"));
    assert!(screen.contains("6 Notifications"));
}

#[tokio::test]
async fn remote_achievements_show_as_earned() {
    let server = MockServer::start().await;
    // The overview lists earned achievements with no unlock time.
    mount_dashboard(&server, 650).await;

    let app = loaded(app(http_backend(&server, None))).await;
    let screen = render(&app);
    assert!(screen.contains("Achievements (1)"), "{screen}");
    assert!(screen.contains("First Steps"));
    assert!(!screen.contains("No achievements yet"));
}

#[tokio::test]
async fn active_tab_is_bold() {
    let mut app = loaded(local_app()).await;
    app.show_page(Page::Courses);
    let terminal = render_to(&app);
    let tabs = terminal.backend().row(1);

    let dashboard = u16::try_from(tabs.find("1 Dashboard").unwrap()).unwrap();
    let courses = u16::try_from(tabs.find("3 Courses").unwrap()).unwrap();
    assert!(!terminal.backend().is_bold_at(dashboard, 1));
    assert!(terminal.backend().is_bold_at(courses, 1));
}

#[tokio::test]
async fn every_page_renders() {
    let mut app = loaded(local_app()).await;
    let expectations = [
        (Page::Skills, "TypeScript"),
        (Page::Courses, "TypeScript Deep Dive"),
        (Page::Roadmap, "HTML & CSS Fundamentals"),
        (Page::Analysis, "Skill Categories"),
        (Page::Notifications, "unread"),
    ];
    for (page, needle) in expectations {
        app.show_page(page);
        let screen = render(&app);
        assert!(screen.contains(needle), "{page:?} missing {needle:?}:\n{screen}");
    }
}

#[tokio::test]
async fn level_up_popup_is_drawn() {
    let mut app = loaded(reduced_motion_app(Backend::Local(
        LocalBackend::with_sample_data(),
    )))
    .await;
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

    let screen = render(&app);
    assert!(screen.contains("Level Up!"), "{screen}");
    assert!(screen.contains("Node.js reached Level 6!"));
}

#[tokio::test]
async fn ascii_mode_renders_without_box_glyphs_in_content() {
    let mut app = loaded(App::new(
        Backend::Local(LocalBackend::with_sample_data()),
        AppOptions {
            ui_options: UiOptions {
                ascii_only: true,
                ..UiOptions::default()
            },
            ..AppOptions::default()
        },
    ))
    .await;
    app.show_page(Page::Skills);
    let screen = render(&app);
    assert!(screen.contains("Lv"), "{screen}");
    assert!(!screen.contains('█'));
}
