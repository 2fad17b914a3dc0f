//! Input handling for Skillpath TUI.

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::sync::mpsc;
use tracing::debug;

use skillpath_engine::{App, Page};

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 256;
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering

enum InputMsg {
    Event(Event),
    Error(String),
}

/// Reads terminal events on a blocking thread and hands them to the frame loop.
pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl InputPump {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = tokio::task::spawn_blocking(move || input_loop(stop2, tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    pub async fn shutdown(&mut self) {
        // Unblock the input thread if it is waiting on channel capacity.
        self.rx.close();

        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = tokio::time::timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Best-effort stop if caller exits early; do not block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: Arc<AtomicBool>, tx: mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// Drain queued terminal events into the app. Returns `true` when the user quit.
pub fn handle_events(app: &mut App, input: &mut InputPump) -> Result<bool> {
    let mut processed = 0;
    while processed < MAX_EVENTS_PER_FRAME {
        let ev = match input.rx.try_recv() {
            Ok(InputMsg::Event(ev)) => ev,
            Ok(InputMsg::Error(msg)) => return Err(anyhow!("input error: {msg}")),
            Err(mpsc::error::TryRecvError::Empty) => break,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                return Err(anyhow!("input pump disconnected"));
            }
        };

        if apply_event(app, &ev) {
            return Ok(true);
        }
        processed += 1;
    }

    if processed == MAX_EVENTS_PER_FRAME {
        debug!(
            backlog = input.rx.len(),
            "Input budget exhausted; deferring events to next frame"
        );
    }

    Ok(app.should_quit())
}

/// Apply one terminal event. Returns `true` when the app should exit.
pub fn apply_event(app: &mut App, ev: &Event) -> bool {
    let Event::Key(key) = ev else {
        return false;
    };
    if key.kind == KeyEventKind::Release {
        return false;
    }
    handle_key(app, *key);
    app.should_quit()
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.request_quit();
        return;
    }

    // Popups swallow everything except quit.
    if app.has_popup() {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ') => app.dismiss(),
            KeyCode::Char('q') => app.request_quit(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.request_quit(),
        KeyCode::Tab => app.next_page(),
        KeyCode::BackTab => app.prev_page(),
        KeyCode::Right | KeyCode::Char('l') => app.next_page(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_page(),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection(1),
        KeyCode::Up | KeyCode::Char('k') => app.move_selection(-1),
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(page) = c.to_digit(10).and_then(Page::from_number) {
                app.show_page(page);
            }
        }
        KeyCode::Char('g') => app.reload(),
        KeyCode::Char('i') if !app.state().is_ready() => app.init_sample_data(),
        KeyCode::Char('p') => app.practice_selected_skill(),
        KeyCode::Enter => match app.page() {
            Page::Skills => app.practice_selected_skill(),
            Page::Roadmap => app.complete_selected_step(),
            Page::Notifications => app.mark_selected_notification_read(),
            _ => {}
        },
        KeyCode::Char('+' | '=') => app.adjust_selected_course(1),
        KeyCode::Char('-') => app.adjust_selected_course(-1),
        KeyCode::Char('r') => app.mark_selected_notification_read(),
        KeyCode::Char('R') => app.mark_all_notifications_read(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
    use skillpath_client::LocalBackend;
    use skillpath_engine::{App, AppOptions, Backend, Page};

    use super::apply_event;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn app() -> App {
        App::new(
            Backend::Local(LocalBackend::with_sample_data()),
            AppOptions::default(),
        )
    }

    #[test]
    fn number_keys_switch_pages() {
        let mut app = app();
        apply_event(&mut app, &key(KeyCode::Char('4')));
        assert_eq!(app.page(), Page::Roadmap);
        apply_event(&mut app, &key(KeyCode::Char('9')));
        assert_eq!(app.page(), Page::Roadmap);
        apply_event(&mut app, &key(KeyCode::BackTab));
        assert_eq!(app.page(), Page::Courses);
    }

    #[test]
    fn quit_keys() {
        let mut app = app();
        assert!(apply_event(&mut app, &key(KeyCode::Char('q'))));

        let mut app = self::app();
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(apply_event(&mut app, &ctrl_c));
    }

    #[test]
    fn key_release_is_ignored() {
        let mut app = app();
        let mut release = KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        apply_event(&mut app, &Event::Key(release));
        assert_eq!(app.page(), Page::Dashboard);
    }
}
