//! One-shot subcommands that talk to the backend and exit.

use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, Result, bail};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use skillpath_client::Backend;
use skillpath_config::SkillpathConfig;
use skillpath_types::{
    CourseId, DashboardSnapshot, NewSkill, SignInForm, SignUpForm, SkillId, sanitize_terminal_text,
};

use crate::cli::{Command, CourseCommand, NotificationCommand, SkillCommand};

/// Shown when a subcommand targets the in-memory store, which dies with the process.
pub(crate) const LOCAL_SUBCOMMAND_ERROR: &str = "subcommands need the remote backend; the local \
     store lives only as long as the dashboard (drop --local or set [backend] mode = \"remote\")";

pub async fn run(backend: &Backend, command: Command) -> Result<()> {
    if backend.is_local() {
        bail!(LOCAL_SUBCOMMAND_ERROR);
    }
    let stdin = io::stdin();
    let mut input = stdin.lock();
    match command {
        Command::Signin { email } => {
            let password = read_password(&mut input, "Password: ")?;
            let form = SignInForm { email, password }.validate()?;
            let token = backend.sign_in(&form).await?;
            store_token(&token)?;
            println!("Signed in as {}", form.email());
        }
        Command::Signup { name, email } => {
            let password = read_password(&mut input, "Password: ")?;
            let confirm_password = read_password(&mut input, "Confirm password: ")?;
            let form = SignUpForm {
                name,
                email: email.clone(),
                password: password.clone(),
                confirm_password,
            }
            .validate()?;
            let message = backend.sign_up(&form).await?;
            println!("{}", sanitize_terminal_text(&message));

            // Sign-up does not issue a token.
            let credentials = SignInForm { email, password }.validate()?;
            let token = backend.sign_in(&credentials).await?;
            store_token(&token)?;
            println!("Welcome, {}!", form.name());
        }
        Command::Init => {
            let message = backend.init_sample_data().await?;
            println!("{}", sanitize_terminal_text(&message));
        }
        Command::Status => {
            let snapshot = backend.load_dashboard().await?;
            print!("{}", render_status(&snapshot));
        }
        Command::Skill(SkillCommand::Add {
            name,
            category,
            color,
        }) => {
            let skill = backend
                .create_skill(&NewSkill {
                    name,
                    category,
                    color,
                })
                .await?;
            println!(
                "Tracking {} ({})",
                sanitize_terminal_text(&skill.name),
                skill.id
            );
        }
        Command::Skill(SkillCommand::Rm { id }) => {
            backend.delete_skill(&SkillId::new(id)).await?;
            println!("Skill deleted");
        }
        Command::Course(CourseCommand::Enroll { id }) => {
            let message = backend.enroll_course(&CourseId::new(id)).await?;
            println!("{}", sanitize_terminal_text(&message));
        }
        Command::Course(CourseCommand::Progress {
            id,
            completed_lessons,
        }) => {
            let progress = backend
                .update_course_progress(&CourseId::new(id), completed_lessons)
                .await?;
            println!("Course progress: {progress}%");
        }
        Command::Notifications(NotificationCommand::ReadAll) => {
            let message = backend.mark_all_notifications_read().await?;
            println!("{}", sanitize_terminal_text(&message));
        }
    }
    Ok(())
}

fn store_token(token: &str) -> Result<()> {
    SkillpathConfig::persist_access_token(token).context("failed to store session token")?;
    if let Some(path) = SkillpathConfig::path() {
        tracing::info!(path = %path.display(), "Stored session token");
    }
    Ok(())
}

/// Read one line, prompting on stderr so stdout stays clean for piping.
pub(crate) fn read_line(input: &mut impl BufRead, prompt: &str) -> Result<String> {
    let mut err = io::stderr();
    let _ = write!(err, "{prompt}");
    let _ = err.flush();

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("unexpected end of input");
    }
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Read a password without echo when stdin is a terminal; piped input is read as a line.
fn read_password(input: &mut impl BufRead, prompt: &str) -> Result<String> {
    if !io::stdin().is_terminal() {
        return read_line(input, prompt);
    }
    let mut err = io::stderr();
    let _ = write!(err, "{prompt}");
    let _ = err.flush();

    enable_raw_mode()?;
    let keys = std::iter::from_fn(|| match event::read() {
        Ok(Event::Key(key)) => Some(Ok(key)),
        Ok(_) => Some(Ok(KeyEvent::new(KeyCode::Null, KeyModifiers::NONE))),
        Err(err) => Some(Err(err)),
    });
    let result = collect_password(keys);
    let _ = disable_raw_mode();
    let _ = writeln!(err);
    result
}

/// Accumulate typed characters until Enter. Ctrl+C or Esc aborts.
pub(crate) fn collect_password(
    keys: impl IntoIterator<Item = io::Result<KeyEvent>>,
) -> Result<String> {
    let mut password = String::new();
    for key in keys {
        let key = key?;
        if key.kind == KeyEventKind::Release {
            continue;
        }
        match key.code {
            KeyCode::Enter => return Ok(password),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                bail!("password entry cancelled");
            }
            KeyCode::Esc => bail!("password entry cancelled"),
            KeyCode::Backspace => {
                password.pop();
            }
            KeyCode::Char(c) => password.push(c),
            _ => {}
        }
    }
    bail!("unexpected end of input")
}

pub(crate) fn render_status(snapshot: &DashboardSnapshot) -> String {
    if snapshot.is_first_run() {
        return "No data yet. Run `skillpath init` to load sample data.\n".to_string();
    }
    let progress = snapshot.progress;
    let unread = snapshot.notifications.iter().filter(|n| !n.read).count();

    let mut out = String::new();
    out.push_str(&format!(
        "Level {} ({} XP, {} to next level)\n",
        progress.level(),
        progress.total_xp,
        progress.xp_to_next_level()
    ));
    out.push_str(&format!("Streak: {} days\n", snapshot.current_streak));
    out.push_str(&format!(
        "Skills: {}  Courses: {}  Achievements: {}\n",
        snapshot.skills.len(),
        snapshot.courses.len(),
        snapshot.achievements.len()
    ));
    if let Some(roadmap) = snapshot.roadmaps.first() {
        out.push_str(&format!(
            "Roadmap: {} {}%\n",
            sanitize_terminal_text(&roadmap.title),
            roadmap.completion_percent()
        ));
    }
    out.push_str(&format!("Unread notifications: {unread}\n"));
    out
}
