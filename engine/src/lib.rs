//! Core engine for Skillpath - dashboard state and backend orchestration.
//!
//! This crate contains the App state owner without TUI dependencies.
//! Backend calls run as tokio tasks and report back over a channel; the
//! frame loop drains it with [`App::process_backend_events`], and every
//! result goes through [`transition`].

mod analysis;
mod state;

use std::collections::VecDeque;
use std::future::Future;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

pub use analysis::{DailyXp, daily_xp, parse_timestamp};
pub use skillpath_client::{Backend, ClientError};
pub use skillpath_types::ui::{AnimPhase, ModalEffect, ModalEffectKind, Page, UiOptions, ViewState};
pub use state::{
    Action, Alert, AlertKind, DashboardState, Effect, Mutation, Phase, SAMPLE_DATA_READY_MESSAGE,
    transition,
};

use skillpath_types::{
    CourseId, DashboardSnapshot, Notification, NotificationId, PracticeOutcome, StepOutcome,
    XpHistoryEntry,
};

/// Days of XP history fetched for the Analysis page.
pub const HISTORY_DAYS: u32 = 30;

const CELEBRATION_VISIBLE: Duration = Duration::from_secs(3);
const POP_SCALE_DURATION: Duration = Duration::from_millis(250);
const SLIDE_UP_DURATION: Duration = Duration::from_millis(300);
const SHAKE_DURATION: Duration = Duration::from_millis(240);

/// A finished backend task.
#[derive(Debug)]
enum BackendEvent {
    Loaded {
        refresh: bool,
        result: Result<DashboardSnapshot, ClientError>,
    },
    Practiced(Result<PracticeOutcome, ClientError>),
    StepCompleted(Result<StepOutcome, ClientError>),
    Notifications(Result<Vec<Notification>, ClientError>),
    History(Result<Vec<XpHistoryEntry>, ClientError>),
    SampleData(Result<String, ClientError>),
    NotificationRead {
        id: NotificationId,
        result: Result<(), ClientError>,
    },
    AllNotificationsRead(Result<String, ClientError>),
    CourseProgress {
        course_id: CourseId,
        completed_lessons: u32,
        result: Result<u32, ClientError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CelebrationKind {
    SkillLevelUp { skill: String, level: u32 },
    AccountLevelUp { level: u32 },
    StepCompleted { step: String, xp: u64 },
    CourseCompleted { title: String, xp: u32 },
}

/// A celebration popup. Hidden after a few seconds or on dismiss.
#[derive(Debug, Clone)]
pub struct Celebration {
    kind: CelebrationKind,
    effect: Option<ModalEffect>,
    remaining: Duration,
}

impl Celebration {
    #[must_use]
    pub fn kind(&self) -> &CelebrationKind {
        &self.kind
    }

    /// `None` when motion is reduced or the entrance animation has finished.
    #[must_use]
    pub fn effect(&self) -> Option<&ModalEffect> {
        self.effect.as_ref()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AppOptions {
    pub ui_options: UiOptions,
    pub xp_per_practice: u32,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            ui_options: UiOptions::default(),
            xp_per_practice: skillpath_types::DEFAULT_PRACTICE_XP,
        }
    }
}

pub struct App {
    state: DashboardState,
    backend: Backend,
    view: ViewState,
    xp_per_practice: u32,
    celebrations: VecDeque<Celebration>,
    events_tx: mpsc::UnboundedSender<BackendEvent>,
    events_rx: mpsc::UnboundedReceiver<BackendEvent>,
    pending: usize,
    should_quit: bool,
    tick_count: usize,
}

impl App {
    #[must_use]
    pub fn new(backend: Backend, options: AppOptions) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            state: DashboardState::new(),
            backend,
            view: ViewState::new(options.ui_options),
            xp_per_practice: options.xp_per_practice,
            celebrations: VecDeque::new(),
            events_tx,
            events_rx,
            pending: 0,
            should_quit: false,
            tick_count: 0,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn ui_options(&self) -> UiOptions {
        self.view.ui_options
    }

    pub fn page(&self) -> Page {
        self.view.page
    }

    pub fn selected(&self) -> usize {
        self.view.selected
    }

    pub fn xp_per_practice(&self) -> u32 {
        self.xp_per_practice
    }

    pub fn backend_label(&self) -> String {
        self.backend.describe()
    }

    pub fn is_local(&self) -> bool {
        self.backend.is_local()
    }

    /// Backend requests still in flight.
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn tick_count(&self) -> usize {
        self.tick_count
    }

    pub fn celebration(&self) -> Option<&Celebration> {
        self.celebrations.front()
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.state.alert()
    }

    /// Running shake effect on the current alert, if any.
    pub fn alert_effect(&self) -> Option<&ModalEffect> {
        self.view.modal_effect.as_ref()
    }

    /// A popup is showing and swallows navigation keys.
    pub fn has_popup(&self) -> bool {
        self.celebration().is_some() || self.alert().is_some()
    }

    // ---------------------------------------------------------------------
    // Navigation
    // ---------------------------------------------------------------------

    pub fn show_page(&mut self, page: Page) {
        self.view.show(page);
    }

    pub fn next_page(&mut self) {
        self.view.show(self.view.page.next());
    }

    pub fn prev_page(&mut self) {
        self.view.show(self.view.page.prev());
    }

    /// Rows on the current page that can be selected.
    pub fn selectable_len(&self) -> usize {
        let snapshot = self.state.snapshot();
        match self.view.page {
            Page::Skills => snapshot.skills.len(),
            Page::Courses => snapshot.courses.len(),
            Page::Roadmap => self
                .state
                .primary_roadmap()
                .map_or(0, |roadmap| roadmap.steps.len()),
            Page::Notifications => snapshot.notifications.len(),
            Page::Dashboard | Page::Analysis => 0,
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.selectable_len();
        self.view.move_selection(delta, len);
    }

    /// Close the front celebration, or else the front alert.
    pub fn dismiss(&mut self) {
        if self.celebrations.pop_front().is_some() {
            return;
        }
        if self.state.alert().is_some() {
            self.view.modal_effect = None;
            self.apply(Action::DismissAlert);
        }
    }

    // ---------------------------------------------------------------------
    // Frame loop
    // ---------------------------------------------------------------------

    /// Advance animations by the wall-clock time since the last frame.
    pub fn tick(&mut self) {
        let now = Instant::now();
        let delta = now.saturating_duration_since(self.view.last_frame);
        self.view.last_frame = now;
        self.advance(delta);
    }

    /// Advance animations and popup timers by `delta`.
    pub fn advance(&mut self, delta: Duration) {
        self.tick_count = self.tick_count.wrapping_add(1);

        if let Some(effect) = self.view.modal_effect.as_mut() {
            effect.advance(delta);
            if effect.phase() == AnimPhase::Completed {
                self.view.modal_effect = None;
            }
        }

        let expired = match self.celebrations.front_mut() {
            Some(celebration) => {
                if let Some(effect) = celebration.effect.as_mut() {
                    effect.advance(delta);
                    if effect.phase() == AnimPhase::Completed {
                        celebration.effect = None;
                    }
                }
                celebration.remaining = celebration.remaining.saturating_sub(delta);
                celebration.remaining.is_zero()
            }
            None => false,
        };
        if expired {
            self.celebrations.pop_front();
        }
    }

    /// Feed every finished backend task to the state machine.
    pub fn process_backend_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.pending = self.pending.saturating_sub(1);
            self.handle_backend_event(event);
        }
    }

    /// Wait for the next finished backend task and process it.
    ///
    /// Returns `false` when nothing is in flight.
    pub async fn wait_for_backend(&mut self) -> bool {
        if self.pending == 0 {
            return false;
        }
        match self.events_rx.recv().await {
            Some(event) => {
                self.pending = self.pending.saturating_sub(1);
                self.handle_backend_event(event);
                true
            }
            None => false,
        }
    }

    // ---------------------------------------------------------------------
    // Requests
    // ---------------------------------------------------------------------

    fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = BackendEvent> + Send + 'static,
    {
        self.pending += 1;
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            // The receiver only goes away with the App.
            let _ = tx.send(task.await);
        });
    }

    /// Load everything, showing the loading screen until it lands.
    pub fn reload(&mut self) {
        tracing::debug!(backend = %self.backend.describe(), "Loading dashboard");
        self.apply(Action::LoadStarted);
        self.spawn_load(false);
    }

    /// Reload in the background, keeping the current screen.
    pub fn refresh(&mut self) {
        self.spawn_load(true);
    }

    fn spawn_load(&mut self, refresh: bool) {
        let backend = self.backend.clone();
        self.spawn(async move {
            BackendEvent::Loaded {
                refresh,
                result: backend.load_dashboard().await,
            }
        });
    }

    fn spawn_notifications(&mut self) {
        let backend = self.backend.clone();
        self.spawn(async move { BackendEvent::Notifications(backend.notifications().await) });
    }

    fn spawn_history(&mut self) {
        let backend = self.backend.clone();
        self.spawn(async move { BackendEvent::History(backend.xp_history(HISTORY_DAYS).await) });
    }

    pub fn init_sample_data(&mut self) {
        let backend = self.backend.clone();
        self.spawn(async move { BackendEvent::SampleData(backend.init_sample_data().await) });
    }

    /// Practice the selected skill for the configured XP.
    pub fn practice_selected_skill(&mut self) {
        if !self.state.is_ready() || self.view.page != Page::Skills {
            return;
        }
        let Some(skill) = self.state.snapshot().skills.get(self.view.selected) else {
            return;
        };
        let skill_id = skill.id.clone();
        let xp = self.xp_per_practice;
        tracing::debug!(skill = %skill_id, xp, "Practicing skill");

        let backend = self.backend.clone();
        self.spawn(async move {
            BackendEvent::Practiced(backend.practice_skill(&skill_id, xp).await)
        });
    }

    /// Complete the selected roadmap step unless it is already complete.
    pub fn complete_selected_step(&mut self) {
        if !self.state.is_ready() || self.view.page != Page::Roadmap {
            return;
        }
        let Some(roadmap) = self.state.primary_roadmap() else {
            return;
        };
        let Some(step) = roadmap.steps.get(self.view.selected) else {
            return;
        };
        if step.completed {
            tracing::debug!(step = %step.id, "Step already completed; not sending");
            return;
        }
        let roadmap_id = roadmap.id.clone();
        let step_id = step.id.clone();

        let backend = self.backend.clone();
        self.spawn(async move {
            BackendEvent::StepCompleted(backend.complete_step(&roadmap_id, &step_id).await)
        });
    }

    /// Record `delta` lessons on the selected course.
    pub fn adjust_selected_course(&mut self, delta: i32) {
        if !self.state.is_ready() || self.view.page != Page::Courses {
            return;
        }
        let Some(course) = self.state.snapshot().courses.get(self.view.selected) else {
            return;
        };
        let completed_lessons = course
            .completed_lessons
            .saturating_add_signed(delta)
            .min(course.lessons.max(1));
        if completed_lessons == course.completed_lessons {
            return;
        }
        let course_id = course.id.clone();

        let backend = self.backend.clone();
        self.spawn(async move {
            let result = backend
                .update_course_progress(&course_id, completed_lessons)
                .await;
            BackendEvent::CourseProgress {
                course_id,
                completed_lessons,
                result,
            }
        });
    }

    pub fn mark_selected_notification_read(&mut self) {
        if self.view.page != Page::Notifications {
            return;
        }
        let Some(notification) = self.state.snapshot().notifications.get(self.view.selected)
        else {
            return;
        };
        if notification.read {
            return;
        }
        let id = notification.id.clone();

        let backend = self.backend.clone();
        self.spawn(async move {
            let result = backend.mark_notification_read(&id).await;
            BackendEvent::NotificationRead { id, result }
        });
    }

    pub fn mark_all_notifications_read(&mut self) {
        if self.state.unread_count() == 0 {
            return;
        }
        let backend = self.backend.clone();
        self.spawn(async move {
            BackendEvent::AllNotificationsRead(backend.mark_all_notifications_read().await)
        });
    }

    // ---------------------------------------------------------------------
    // Results
    // ---------------------------------------------------------------------

    fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::Loaded { refresh, result } => match result {
                Ok(snapshot) => {
                    let first_run = snapshot.is_first_run();
                    self.apply(if refresh {
                        Action::Refreshed(snapshot)
                    } else {
                        Action::LoadData(snapshot)
                    });
                    self.clamp_selection();
                    if !first_run {
                        self.spawn_history();
                    }
                }
                Err(err) if refresh => self.fail(Mutation::Refresh, &err),
                Err(err) => {
                    tracing::warn!("Dashboard load failed: {err}");
                    self.apply(Action::LoadFailed(err.to_string()));
                }
            },
            BackendEvent::Practiced(result) => match result {
                Ok(outcome) => {
                    self.apply(Action::PracticeSkill(outcome));
                    self.after_award();
                }
                Err(err) => self.fail(Mutation::PracticeSkill, &err),
            },
            BackendEvent::StepCompleted(result) => match result {
                Ok(outcome) => {
                    self.apply(Action::CompleteStep(outcome));
                    self.after_award();
                }
                Err(err) => self.fail(Mutation::CompleteStep, &err),
            },
            BackendEvent::Notifications(result) => match result {
                Ok(notifications) => {
                    self.apply(Action::NotificationsLoaded(notifications));
                    self.clamp_selection();
                }
                // Stale notifications are not worth a blocking popup.
                Err(err) => tracing::warn!("Notification reload failed: {err}"),
            },
            BackendEvent::History(result) => match result {
                Ok(history) => self.apply(Action::HistoryLoaded(history)),
                Err(err) => tracing::warn!("XP history load failed: {err}"),
            },
            BackendEvent::SampleData(result) => match result {
                Ok(message) => {
                    tracing::info!("{message}");
                    self.apply(Action::SampleDataInitialized(message));
                    self.reload();
                }
                Err(err) => self.fail(Mutation::InitSampleData, &err),
            },
            BackendEvent::NotificationRead { id, result } => match result {
                Ok(()) => self.apply(Action::NotificationRead(id)),
                Err(err) => self.fail(Mutation::MarkNotification, &err),
            },
            BackendEvent::AllNotificationsRead(result) => match result {
                Ok(message) => {
                    tracing::debug!("{message}");
                    self.apply(Action::AllNotificationsRead);
                }
                Err(err) => self.fail(Mutation::MarkNotification, &err),
            },
            BackendEvent::CourseProgress {
                course_id,
                completed_lessons,
                result,
            } => match result {
                Ok(progress) => {
                    let completed = progress >= 100;
                    self.apply(Action::CourseProgressUpdated {
                        course_id,
                        progress,
                        completed_lessons,
                    });
                    if completed {
                        // The reward XP only shows up in the overview.
                        self.refresh();
                    }
                }
                Err(err) => self.fail(Mutation::UpdateCourse, &err),
            },
        }
    }

    /// XP changed on the backend: notifications and history are stale.
    fn after_award(&mut self) {
        self.spawn_notifications();
        self.spawn_history();
    }

    fn fail(&mut self, mutation: Mutation, err: &ClientError) {
        tracing::warn!(?mutation, "Request failed: {err}");
        self.apply(Action::MutationFailed {
            mutation,
            message: err.to_string(),
        });
    }

    fn clamp_selection(&mut self) {
        self.move_selection(0);
    }

    fn apply(&mut self, action: Action) {
        for effect in transition(&mut self.state, action) {
            self.handle_effect(effect);
        }
    }

    fn handle_effect(&mut self, effect: Effect) {
        match effect {
            Effect::LevelUp { skill, level } => {
                tracing::info!(%skill, level, "Skill leveled up");
                self.celebrate(
                    CelebrationKind::SkillLevelUp { skill, level },
                    ModalEffectKind::PopScale,
                );
            }
            Effect::AccountLevelUp { level } => {
                tracing::info!(level, "Account leveled up");
                self.celebrate(
                    CelebrationKind::AccountLevelUp { level },
                    ModalEffectKind::PopScale,
                );
            }
            Effect::Confetti { step, xp } => {
                self.celebrate(
                    CelebrationKind::StepCompleted { step, xp },
                    ModalEffectKind::SlideUp,
                );
            }
            Effect::CourseCompleted { title, xp } => {
                self.celebrate(
                    CelebrationKind::CourseCompleted { title, xp },
                    ModalEffectKind::SlideUp,
                );
            }
            Effect::Alert(alert) => {
                if alert.kind == AlertKind::Error && !self.view.ui_options.reduced_motion {
                    self.view.modal_effect = Some(ModalEffect::shake(SHAKE_DURATION));
                }
            }
        }
    }

    fn celebrate(&mut self, kind: CelebrationKind, effect: ModalEffectKind) {
        let effect = (!self.view.ui_options.reduced_motion).then(|| match effect {
            ModalEffectKind::PopScale => ModalEffect::pop_scale(POP_SCALE_DURATION),
            ModalEffectKind::SlideUp => ModalEffect::slide_up(SLIDE_UP_DURATION),
            ModalEffectKind::Shake => ModalEffect::shake(SHAKE_DURATION),
        });
        self.celebrations.push_back(Celebration {
            kind,
            effect,
            remaining: CELEBRATION_VISIBLE,
        });
    }
}
