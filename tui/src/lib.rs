//! TUI rendering for Skillpath using ratatui.

mod effects;
mod format;
mod input;
mod pages;
mod theme;

pub use effects::apply_modal_effect;
pub use input::{InputPump, apply_event, handle_events};
pub use theme::{Glyphs, Palette, glyphs, palette, spinner_frame, styles};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap},
};

use skillpath_engine::{AlertKind, App, CelebrationKind, Page, Phase};

use self::format::{clean, format_xp};

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let options = app.ui_options();
    let palette = palette(options);
    let glyphs = glyphs(options);
    // Clear with background color
    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Tabs
            Constraint::Min(1),    // Page
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    match app.state().phase() {
        Phase::Loading => draw_loading(frame, app, chunks[1], &palette),
        Phase::Failed { message } => draw_load_error(frame, app, message, chunks[1], &palette),
        Phase::Empty => {
            frame.render_widget(create_welcome_screen(&palette, &glyphs), chunks[1]);
        }
        Phase::Ready => {
            draw_tabs(frame, app, chunks[0], &palette, &glyphs);
            pages::draw_page(frame, app, chunks[1], &palette, &glyphs);
        }
    }
    draw_status_bar(frame, app, chunks[2], &palette, &glyphs);

    if let Some(celebration) = app.celebration() {
        draw_celebration(frame, app, celebration.kind(), &palette, &glyphs);
    } else if app.alert().is_some() {
        draw_alert(frame, app, &palette);
    }
}

fn draw_tabs(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let unread = app.state().unread_count();
    let mut spans = Vec::with_capacity(Page::ALL.len() * 2);
    for (i, page) in Page::ALL.iter().enumerate() {
        let label = if *page == Page::Notifications && unread > 0 {
            format!(" {} {} ({unread}) ", i + 1, page.title())
        } else {
            format!(" {} {} ", i + 1, page.title())
        };
        let style = if *page == app.page() {
            styles::tab_active(palette)
        } else {
            styles::tab_inactive(palette)
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::styled(
            glyphs.separator,
            Style::default().fg(palette.bg_border),
        ));
    }
    spans.pop();
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let mut spans = vec![Span::raw(" ")];

    if app.pending() > 0 {
        let spinner = spinner_frame(app.tick_count(), app.ui_options());
        spans.push(Span::styled(
            format!("{spinner} Syncing"),
            Style::default().fg(palette.primary),
        ));
    } else {
        let backend = if app.is_local() {
            "local store".to_string()
        } else {
            clean(&app.backend_label()).into_owned()
        };
        spans.push(Span::styled(backend, Style::default().fg(palette.success)));
    }

    if app.state().is_ready() {
        let progress = app.state().snapshot().progress;
        spans.push(Span::styled(
            format!(" {} ", glyphs.separator),
            Style::default().fg(palette.bg_border),
        ));
        spans.push(Span::styled(
            format!("{} Level {}", glyphs.level, progress.level()),
            Style::default().fg(palette.primary),
        ));
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("{} {} XP", glyphs.xp, format_xp(progress.total_xp)),
            styles::xp(palette),
        ));
    }

    spans.push(Span::styled(
        format!(" {} ", glyphs.separator),
        Style::default().fg(palette.bg_border),
    ));
    spans.extend(key_hints(app, palette));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn key_hints(app: &App, palette: &Palette) -> Vec<Span<'static>> {
    let mut hints: Vec<(&str, &str)> = Vec::new();
    if app.has_popup() {
        hints.push(("Esc", "close"));
    } else if app.state().is_ready() {
        hints.push(("Tab", "page"));
        match app.page() {
            Page::Skills => hints.push(("p", "practice")),
            Page::Courses => hints.push(("+/-", "lessons")),
            Page::Roadmap => hints.push(("Enter", "complete")),
            Page::Notifications => {
                hints.push(("r", "read"));
                hints.push(("R", "read all"));
            }
            Page::Dashboard | Page::Analysis => {}
        }
        hints.push(("g", "reload"));
    } else {
        hints.push(("g", "retry"));
        hints.push(("i", "sample data"));
    }
    hints.push(("q", "quit"));

    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, label) in hints {
        spans.push(Span::styled(key.to_string(), styles::key_highlight(palette)));
        spans.push(Span::styled(
            format!(" {label}  "),
            styles::key_hint(palette),
        ));
    }
    spans
}

fn draw_loading(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let spinner = spinner_frame(app.tick_count(), app.ui_options());
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{spinner} Loading Dashboard..."),
            Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        vertical_center(area, 2),
    );
}

fn draw_load_error(frame: &mut Frame, app: &App, message: &str, area: Rect, palette: &Palette) {
    let hint = |key: &'static str, label: &'static str| {
        Line::from(vec![
            Span::styled(key, styles::key_highlight(palette)),
            Span::styled(label, Style::default().fg(palette.text_secondary)),
        ])
    };
    let lines = vec![
        Line::from(Span::styled(
            format!("Error: {}", clean(message)),
            Style::default()
                .fg(palette.error)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "Make sure backend is running at {}",
                clean(&app.backend_label())
            ),
            Style::default().fg(palette.text_secondary),
        )),
        Line::from(""),
        hint("g", "  Retry"),
        hint("i", "  Initialize Sample Data"),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        vertical_center(area, 6),
    );
}

fn create_welcome_screen(palette: &Palette, glyphs: &Glyphs) -> Paragraph<'static> {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{} Welcome to SkillProgress! {}", glyphs.level, glyphs.level),
            Style::default()
                .fg(palette.primary)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Track skills, courses and roadmaps. Earn XP, level up and unlock achievements.",
            Style::default().fg(palette.text_secondary),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", Style::default().fg(palette.text_secondary)),
            Span::styled(
                "i",
                Style::default()
                    .fg(palette.green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                " to initialize sample data and get started",
                Style::default().fg(palette.text_secondary),
            ),
        ]),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
}

fn draw_celebration(
    frame: &mut Frame,
    app: &App,
    kind: &CelebrationKind,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let (title, headline, detail, color) = match kind {
        CelebrationKind::SkillLevelUp { skill, level } => (
            " Level Up! ",
            format!("{} {} reached Level {level}!", glyphs.level, clean(skill)),
            "Keep practicing to master it.".to_string(),
            palette.primary,
        ),
        CelebrationKind::AccountLevelUp { level } => (
            " Level Up! ",
            format!("{} You are now Level {level}!", glyphs.trophy),
            "Your total XP crossed a new threshold.".to_string(),
            palette.peach,
        ),
        CelebrationKind::StepCompleted { step, xp } => (
            " Step Complete ",
            format!("{} {}", glyphs.step_done, clean(step)),
            format!("+{} XP", format_xp(*xp)),
            palette.success,
        ),
        CelebrationKind::CourseCompleted { title, xp } => (
            " Course Complete ",
            format!("{} {}", glyphs.trophy, clean(title)),
            format!("+{} XP", format_xp(u64::from(*xp))),
            palette.success,
        ),
    };

    let lines = vec![
        Line::from(Span::styled(
            headline,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(detail, styles::xp(palette))),
    ];
    let effect = app.celebration().and_then(|c| c.effect());
    draw_popup(frame, title, lines, color, effect, palette);
}

fn draw_alert(frame: &mut Frame, app: &App, palette: &Palette) {
    let Some(alert) = app.alert() else {
        return;
    };
    let (title, color) = match alert.kind {
        AlertKind::Info => (" Info ", palette.accent),
        AlertKind::Error => (" Error ", palette.error),
    };
    let lines = vec![
        Line::from(Span::styled(
            clean(&alert.message).into_owned(),
            Style::default().fg(palette.text_primary),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Esc", styles::key_highlight(palette)),
            Span::styled(" dismiss", styles::key_hint(palette)),
        ]),
    ];
    draw_popup(frame, title, lines, color, app.alert_effect(), palette);
}

fn draw_popup(
    frame: &mut Frame,
    title: &'static str,
    lines: Vec<Line<'static>>,
    border: ratatui::style::Color,
    effect: Option<&skillpath_engine::ModalEffect>,
    palette: &Palette,
) {
    let viewport = frame.area();
    let width = 56.min(viewport.width.saturating_sub(4)).max(20);
    let height = (lines.len() as u16 + 4).min(viewport.height);
    let base = Rect {
        x: viewport.x + viewport.width.saturating_sub(width) / 2,
        y: viewport.y + viewport.height.saturating_sub(height) / 2,
        width: width.min(viewport.width),
        height,
    };
    let area = match effect {
        Some(effect) => apply_modal_effect(effect, base, viewport),
        None => base,
    };

    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(palette.bg_popup))
        .padding(Padding::horizontal(1))
        .title(Span::styled(title, styles::title(palette)));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        vertical_center(inner, 3),
    );
}

fn vertical_center(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    Rect {
        y: area.y + (area.height - height) / 2,
        height,
        ..area
    }
}
