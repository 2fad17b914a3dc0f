//! The six dashboard pages.

use chrono::Utc;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, BorderType, Borders, Gauge, Padding, Paragraph, Wrap},
};

use skillpath_engine::{App, Page, daily_xp};
use skillpath_types::{Course, NotificationKind, Skill, truncate_with_ellipsis};

use crate::format::{clean, format_xp, pad_to_width, progress_bar, relative_time};
use crate::theme::{Glyphs, Palette, parse_hex_color, styles};

/// Days shown in the Analysis bar chart.
const CHART_DAYS: u32 = 7;
const RECENT_ACHIEVEMENTS: usize = 4;
const BAR_WIDTH: usize = 20;

pub(crate) fn draw_page(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    match app.page() {
        Page::Dashboard => draw_dashboard(frame, app, area, palette, glyphs),
        Page::Skills => draw_skills(frame, app, area, palette, glyphs),
        Page::Courses => draw_courses(frame, app, area, palette, glyphs),
        Page::Roadmap => draw_roadmap(frame, app, area, palette, glyphs),
        Page::Analysis => draw_analysis(frame, app, area, palette, glyphs),
        Page::Notifications => draw_notifications(frame, app, area, palette, glyphs),
    }
}

fn panel(title: &str, palette: &Palette) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.bg_border))
        .padding(Padding::horizontal(1))
        .title(Span::styled(format!(" {title} "), styles::title(palette)))
}

fn row_style(selected: bool, palette: &Palette) -> Style {
    if selected {
        styles::selected_row(palette)
    } else {
        Style::default().fg(palette.text_primary)
    }
}

fn marker(selected: bool, glyphs: &Glyphs) -> &'static str {
    if selected { glyphs.selected } else { " " }
}

/// Rows `[start, end)` that keep `selected` on screen.
fn visible_window(selected: usize, len: usize, rows: usize) -> (usize, usize) {
    let rows = rows.max(1);
    if len <= rows {
        return (0, len);
    }
    let start = selected.saturating_sub(rows - 1).min(len - rows);
    (start, start + rows)
}

fn empty_hint(text: &'static str, palette: &Palette) -> Paragraph<'static> {
    Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(palette.text_muted),
    )))
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

fn draw_dashboard(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let snapshot = app.state().snapshot();
    let progress = snapshot.progress;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(4)])
        .split(area);
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(50),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(rows[0]);

    let level_xp = progress.current_level_xp();
    let span = level_xp + progress.xp_to_next_level();
    let ratio = if span == 0 {
        0.0
    } else {
        level_xp as f64 / span as f64
    };
    let gauge = Gauge::default()
        .block(panel(&format!("Level {}", progress.level()), palette))
        .gauge_style(Style::default().fg(palette.xp).bg(palette.bg_panel))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(Span::styled(
            format!(
                "{} XP total {} {} to next level",
                format_xp(progress.total_xp),
                glyphs.separator,
                format_xp(progress.xp_to_next_level())
            ),
            Style::default()
                .fg(palette.text_primary)
                .add_modifier(Modifier::BOLD),
        ));
    frame.render_widget(gauge, cards[0]);

    let streak = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("{} {} days", glyphs.streak, snapshot.current_streak),
            Style::default()
                .fg(palette.peach)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Keep it going!",
            Style::default().fg(palette.text_muted),
        )),
    ])
    .block(panel("Streak", palette));
    frame.render_widget(streak, cards[1]);

    let roadmap_lines = match app.state().primary_roadmap() {
        Some(roadmap) => vec![
            Line::from(Span::styled(
                format!("{}%", roadmap.completion_percent()),
                Style::default()
                    .fg(palette.success)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!(
                    "{}/{} steps",
                    roadmap.completed_steps(),
                    roadmap.steps.len()
                ),
                Style::default().fg(palette.text_muted),
            )),
        ],
        None => vec![Line::from(Span::styled(
            "No roadmap",
            Style::default().fg(palette.text_muted),
        ))],
    };
    frame.render_widget(
        Paragraph::new(roadmap_lines).block(panel("Roadmap", palette)),
        cards[2],
    );

    // The overview only lists achievements the user has earned.
    let earned = &snapshot.achievements;
    let mut lines = Vec::new();
    if earned.is_empty() {
        lines.push(Line::from(Span::styled(
            "No achievements yet. Practice a skill to earn your first!",
            Style::default().fg(palette.text_muted),
        )));
    }
    for achievement in earned.iter().rev().take(RECENT_ACHIEVEMENTS) {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", glyphs.trophy),
                Style::default().fg(palette.rarity(achievement.rarity)),
            ),
            Span::styled(
                clean(&achievement.title).into_owned(),
                Style::default()
                    .fg(palette.text_primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" [{}]", achievement.rarity.label()),
                Style::default().fg(palette.rarity(achievement.rarity)),
            ),
        ]));
        lines.push(Line::from(Span::styled(
            format!("   {}", clean(&achievement.description)),
            Style::default().fg(palette.text_secondary),
        )));
    }
    let title = format!("Achievements ({})", earned.len());
    frame.render_widget(
        Paragraph::new(lines)
            .block(panel(&title, palette))
            .wrap(Wrap { trim: false }),
        rows[1],
    );
}

// ---------------------------------------------------------------------------
// Skills
// ---------------------------------------------------------------------------

fn skill_line(
    skill: &Skill,
    selected: bool,
    name_width: usize,
    palette: &Palette,
    glyphs: &Glyphs,
) -> Line<'static> {
    let color = parse_hex_color(&skill.color, palette.accent);
    let name = truncate_with_ellipsis(&clean(&skill.name), name_width);
    Line::from(vec![
        Span::styled(
            format!("{} ", marker(selected, glyphs)),
            Style::default().fg(palette.peach),
        ),
        Span::styled(pad_to_width(&name, name_width), row_style(selected, palette)),
        Span::styled(
            format!(" {} {:>2} ", glyphs.level, skill.level),
            Style::default().fg(palette.primary),
        ),
        Span::styled(
            progress_bar(skill.level_ratio(), BAR_WIDTH, glyphs.bar_full, glyphs.bar_empty),
            Style::default().fg(color),
        ),
        Span::styled(
            format!(" {}/{} XP", skill.xp, skill.max_xp),
            Style::default().fg(palette.text_muted),
        ),
        Span::styled(
            format!("  {}", clean(&skill.category)),
            Style::default().fg(palette.text_secondary),
        ),
    ])
}

fn draw_skills(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let skills = &app.state().snapshot().skills;
    let block = panel("Skills", palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if skills.is_empty() {
        frame.render_widget(empty_hint("No skills tracked yet.", palette), inner);
        return;
    }

    let (start, end) = visible_window(app.selected(), skills.len(), usize::from(inner.height).saturating_sub(1));
    let mut lines: Vec<Line> = skills[start..end]
        .iter()
        .enumerate()
        .map(|(i, skill)| skill_line(skill, start + i == app.selected(), 18, palette, glyphs))
        .collect();
    lines.push(Line::from(Span::styled(
        format!("  p to practice (+{} XP)", app.xp_per_practice()),
        styles::key_hint(palette),
    )));
    frame.render_widget(Paragraph::new(lines), inner);
}

// ---------------------------------------------------------------------------
// Courses
// ---------------------------------------------------------------------------

fn course_lines(
    course: &Course,
    selected: bool,
    palette: &Palette,
    glyphs: &Glyphs,
) -> [Line<'static>; 2] {
    let status = if course.is_complete() {
        Span::styled(
            format!(" {} Completed", glyphs.step_done),
            Style::default().fg(palette.success),
        )
    } else {
        Span::styled(
            format!(" {}%", course.progress),
            Style::default().fg(palette.text_primary),
        )
    };
    [
        Line::from(vec![
            Span::styled(
                format!("{} ", marker(selected, glyphs)),
                Style::default().fg(palette.peach),
            ),
            Span::styled(clean(&course.title).into_owned(), row_style(selected, palette)),
            Span::styled(
                format!("  {}", clean(&course.category)),
                Style::default().fg(palette.text_secondary),
            ),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(
                progress_bar(
                    f64::from(course.progress.min(100)) / 100.0,
                    BAR_WIDTH,
                    glyphs.bar_full,
                    glyphs.bar_empty,
                ),
                Style::default().fg(palette.blue),
            ),
            status,
            Span::styled(
                format!(
                    "  {}/{} lessons  {} {} XP",
                    course.completed_lessons, course.lessons, glyphs.xp, course.xp_reward
                ),
                Style::default().fg(palette.text_muted),
            ),
        ]),
    ]
}

fn draw_courses(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let courses = &app.state().snapshot().courses;
    let block = panel("Courses", palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if courses.is_empty() {
        frame.render_widget(empty_hint("Not enrolled in any courses.", palette), inner);
        return;
    }

    let (start, end) = visible_window(app.selected(), courses.len(), usize::from(inner.height) / 3);
    let mut lines = Vec::new();
    for (i, course) in courses[start..end].iter().enumerate() {
        lines.extend(course_lines(course, start + i == app.selected(), palette, glyphs));
        lines.push(Line::from(""));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

// ---------------------------------------------------------------------------
// Roadmap
// ---------------------------------------------------------------------------

fn draw_roadmap(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let Some(roadmap) = app.state().primary_roadmap() else {
        let block = panel("Roadmap", palette);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(empty_hint("No roadmap yet.", palette), inner);
        return;
    };

    let title = format!(
        "{} ({}%)",
        clean(&roadmap.title),
        roadmap.completion_percent()
    );
    let block = panel(&title, palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (start, end) = visible_window(app.selected(), roadmap.steps.len(), usize::from(inner.height) / 2);
    let mut lines = Vec::new();
    for (i, step) in roadmap.steps[start..end].iter().enumerate() {
        let selected = start + i == app.selected();
        let (check, check_style) = if step.completed {
            (glyphs.step_done, Style::default().fg(palette.success))
        } else {
            (glyphs.step_open, Style::default().fg(palette.text_muted))
        };
        let title_style = if step.completed && !selected {
            Style::default()
                .fg(palette.text_muted)
                .add_modifier(Modifier::CROSSED_OUT)
        } else {
            row_style(selected, palette)
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", marker(selected, glyphs)),
                Style::default().fg(palette.peach),
            ),
            Span::styled(format!("{check} "), check_style),
            Span::styled(format!("{}. ", step.order), Style::default().fg(palette.text_muted)),
            Span::styled(clean(&step.title).into_owned(), title_style),
            Span::styled(
                format!("  +{} XP", step.xp),
                Style::default().fg(palette.xp),
            ),
        ]));
        lines.push(Line::from(Span::styled(
            format!("      {}", clean(&step.description)),
            Style::default().fg(palette.text_secondary),
        )));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

fn draw_analysis(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let snapshot = app.state().snapshot();

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(12), Constraint::Min(3)])
        .split(columns[1]);

    let mut category_lines = Vec::new();
    for (category, stats) in snapshot.skills_by_category() {
        let average = if stats.count == 0 {
            0.0
        } else {
            stats.total_level as f64 / stats.count as f64
        };
        category_lines.push(Line::from(vec![
            Span::styled(
                pad_to_width(&truncate_with_ellipsis(&clean(&category), 16), 16),
                Style::default().fg(palette.text_primary),
            ),
            Span::styled(
                format!(" {} skills", stats.count),
                Style::default().fg(palette.text_muted),
            ),
            Span::styled(
                format!("  avg {} {average:.1}", glyphs.level),
                Style::default().fg(palette.primary),
            ),
        ]));
    }
    if category_lines.is_empty() {
        category_lines.push(Line::from(Span::styled(
            "No skills tracked yet.",
            Style::default().fg(palette.text_muted),
        )));
    }
    frame.render_widget(
        Paragraph::new(category_lines).block(panel("Skill Categories", palette)),
        columns[0],
    );

    let days = daily_xp(app.state().xp_history(), Utc::now().date_naive(), CHART_DAYS);
    let bars: Vec<Bar> = days
        .iter()
        .map(|day| {
            Bar::default()
                .value(day.xp)
                .label(Line::from(day.date.format("%a").to_string()))
                .text_value(format_xp(day.xp))
        })
        .collect();
    let chart = BarChart::default()
        .block(panel("XP, last 7 days", palette))
        .bar_width(5)
        .bar_gap(1)
        .bar_style(Style::default().fg(palette.xp))
        .value_style(Style::default().fg(palette.bg_dark).bg(palette.xp))
        .label_style(Style::default().fg(palette.text_secondary))
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, right[0]);

    let mut ranked: Vec<&Skill> = snapshot.skills.iter().collect();
    ranked.sort_by(|a, b| b.level.cmp(&a.level).then_with(|| a.name.cmp(&b.name)));
    let lines: Vec<Line> = ranked
        .iter()
        .map(|skill| {
            Line::from(vec![
                Span::styled(
                    pad_to_width(&truncate_with_ellipsis(&clean(&skill.name), 16), 16),
                    Style::default().fg(palette.text_primary),
                ),
                Span::styled(
                    format!(" {} {:>2}", glyphs.level, skill.level),
                    Style::default().fg(parse_hex_color(&skill.color, palette.primary)),
                ),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(lines).block(panel("Skills by Level", palette)),
        right[1],
    );
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

fn draw_notifications(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) {
    let notifications = &app.state().snapshot().notifications;
    let title = format!("Notifications ({} unread)", app.state().unread_count());
    let block = panel(&title, palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if notifications.is_empty() {
        frame.render_widget(empty_hint("You're all caught up.", palette), inner);
        return;
    }

    let (start, end) = visible_window(app.selected(), notifications.len(), usize::from(inner.height));
    let lines: Vec<Line> = notifications[start..end]
        .iter()
        .enumerate()
        .map(|(i, notification)| {
            let selected = start + i == app.selected();
            let kind_color = match notification.kind {
                NotificationKind::Achievement => palette.peach,
                NotificationKind::LevelUp => palette.primary,
                NotificationKind::Course => palette.blue,
                NotificationKind::Info => palette.accent,
            };
            let (dot, message_style) = if notification.read {
                (glyphs.read, Style::default().fg(palette.text_muted))
            } else {
                (glyphs.unread, row_style(selected, palette))
            };
            let message_style = if selected {
                row_style(true, palette)
            } else {
                message_style
            };
            Line::from(vec![
                Span::styled(
                    format!("{} ", marker(selected, glyphs)),
                    Style::default().fg(palette.peach),
                ),
                Span::styled(format!("{dot} "), Style::default().fg(kind_color)),
                Span::styled(clean(&notification.message).into_owned(), message_style),
                Span::styled(
                    format!("  {}", relative_time(notification.created_at.as_deref())),
                    Style::default().fg(palette.text_muted),
                ),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}
