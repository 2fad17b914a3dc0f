//! Dashboard state and its transition function.
//!
//! Every change to what the dashboard shows goes through [`transition`]. It is
//! pure: no IO, no clocks, no channels. The [`App`](crate::App) feeds it
//! confirmed backend results and turns the returned [`Effect`]s into
//! animations.

use std::collections::VecDeque;

use skillpath_types::{
    CourseId, DashboardSnapshot, Notification, NotificationId, PracticeOutcome, Roadmap,
    StepOutcome, XpHistoryEntry,
};

pub const SAMPLE_DATA_READY_MESSAGE: &str = "✅ Sample data initialized! Dashboard refreshed.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Loading,
    /// The initial load failed. Nothing from the earlier snapshot is kept.
    Failed {
        message: String,
    },
    /// First run: no skills and no courses yet.
    Empty,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Info,
    Error,
}

/// A blocking popup, dismissed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Error,
            message: message.into(),
        }
    }
}

/// Which user action a failed mutation belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    PracticeSkill,
    CompleteStep,
    InitSampleData,
    UpdateCourse,
    MarkNotification,
    Refresh,
}

impl Mutation {
    #[must_use]
    pub const fn context(self) -> &'static str {
        match self {
            Self::PracticeSkill => "Failed to update skill",
            Self::CompleteStep => "Failed to complete step",
            Self::InitSampleData => "❌ Failed to initialize",
            Self::UpdateCourse => "Failed to update course",
            Self::MarkNotification => "Failed to update notifications",
            Self::Refresh => "Failed to refresh",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    LoadStarted,
    LoadData(DashboardSnapshot),
    LoadFailed(String),
    /// A background refresh finished; replaces data without a loading screen.
    Refreshed(DashboardSnapshot),
    PracticeSkill(PracticeOutcome),
    CompleteStep(StepOutcome),
    NotificationsLoaded(Vec<Notification>),
    HistoryLoaded(Vec<XpHistoryEntry>),
    MutationFailed { mutation: Mutation, message: String },
    SampleDataInitialized(String),
    NotificationRead(NotificationId),
    AllNotificationsRead,
    CourseProgressUpdated {
        course_id: CourseId,
        progress: u32,
        completed_lessons: u32,
    },
    DismissAlert,
}

/// UI-only consequences of a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// A skill rolled over to `level`.
    LevelUp { skill: String, level: u32 },
    /// The account level went up.
    AccountLevelUp { level: u32 },
    /// A roadmap step was completed for `xp`.
    Confetti { step: String, xp: u64 },
    CourseCompleted { title: String, xp: u32 },
    Alert(Alert),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardState {
    phase: Phase,
    snapshot: DashboardSnapshot,
    xp_history: Vec<XpHistoryEntry>,
    alerts: VecDeque<Alert>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: Phase::Loading,
            snapshot: DashboardSnapshot::default(),
            xp_history: Vec::new(),
            alerts: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    #[must_use]
    pub fn snapshot(&self) -> &DashboardSnapshot {
        &self.snapshot
    }

    #[must_use]
    pub fn xp_history(&self) -> &[XpHistoryEntry] {
        &self.xp_history
    }

    #[must_use]
    pub fn alert(&self) -> Option<&Alert> {
        self.alerts.front()
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.phase == Phase::Ready
    }

    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.snapshot
            .notifications
            .iter()
            .filter(|n| !n.read)
            .count()
    }

    /// The roadmap shown on the dashboard and roadmap pages.
    #[must_use]
    pub fn primary_roadmap(&self) -> Option<&Roadmap> {
        self.snapshot.roadmaps.first()
    }

    fn push_alert(&mut self, alert: Alert, effects: &mut Vec<Effect>) {
        self.alerts.push_back(alert.clone());
        effects.push(Effect::Alert(alert));
    }

    fn install(&mut self, snapshot: DashboardSnapshot) {
        self.phase = if snapshot.is_first_run() {
            Phase::Empty
        } else {
            Phase::Ready
        };
        self.snapshot = snapshot;
    }
}

/// Apply `action` to `state` and report what the UI should celebrate or show.
pub fn transition(state: &mut DashboardState, action: Action) -> Vec<Effect> {
    let mut effects = Vec::new();
    match action {
        Action::LoadStarted => state.phase = Phase::Loading,
        Action::LoadData(snapshot) => state.install(snapshot),
        Action::LoadFailed(message) => {
            state.snapshot = DashboardSnapshot::default();
            state.xp_history.clear();
            state.phase = Phase::Failed { message };
        }
        Action::Refreshed(snapshot) => {
            // A refresh racing a reload or a failed load must not resurrect data.
            if matches!(state.phase, Phase::Ready | Phase::Empty) {
                state.install(snapshot);
            }
        }
        Action::PracticeSkill(outcome) => {
            let previous_level = state.snapshot.progress.level();
            if let Some(skill) = state
                .snapshot
                .skills
                .iter_mut()
                .find(|s| s.id == outcome.skill.id)
            {
                *skill = outcome.skill.clone();
            }
            state.snapshot.progress = outcome.progress;

            if outcome.leveled_up {
                effects.push(Effect::LevelUp {
                    skill: outcome.skill.name.clone(),
                    level: outcome.skill.level,
                });
            }
            if outcome.user_leveled_up || outcome.progress.level() > previous_level {
                effects.push(Effect::AccountLevelUp {
                    level: outcome.progress.level(),
                });
            }
        }
        Action::CompleteStep(outcome) => {
            let previous_level = state.snapshot.progress.level();
            let step = state
                .snapshot
                .roadmaps
                .iter_mut()
                .filter(|r| r.id == outcome.roadmap_id)
                .flat_map(|r| r.steps.iter_mut())
                .find(|s| s.id == outcome.step_id);

            let newly_completed = match step {
                Some(step) if !step.completed => {
                    step.completed = true;
                    Some(step.title.clone())
                }
                _ => None,
            };
            state.snapshot.progress = outcome.progress;

            if let Some(title) = newly_completed {
                effects.push(Effect::Confetti {
                    step: title,
                    xp: outcome.xp_gained,
                });
            }
            if outcome.progress.level() > previous_level {
                effects.push(Effect::AccountLevelUp {
                    level: outcome.progress.level(),
                });
            }
        }
        Action::NotificationsLoaded(notifications) => {
            state.snapshot.notifications = notifications;
        }
        Action::HistoryLoaded(history) => state.xp_history = history,
        Action::MutationFailed { mutation, message } => {
            let alert = Alert::error(format!("{}: {message}", mutation.context()));
            state.push_alert(alert, &mut effects);
        }
        Action::SampleDataInitialized(_) => {
            state.push_alert(Alert::info(SAMPLE_DATA_READY_MESSAGE), &mut effects);
        }
        Action::NotificationRead(id) => {
            if let Some(notification) = state
                .snapshot
                .notifications
                .iter_mut()
                .find(|n| n.id == id)
            {
                notification.read = true;
            }
        }
        Action::AllNotificationsRead => {
            for notification in &mut state.snapshot.notifications {
                notification.read = true;
            }
        }
        Action::CourseProgressUpdated {
            course_id,
            progress,
            completed_lessons,
        } => {
            if let Some(course) = state
                .snapshot
                .courses
                .iter_mut()
                .find(|c| c.id == course_id)
            {
                let was_complete = course.is_complete();
                course.progress = progress.min(100);
                course.completed_lessons = completed_lessons;
                if course.is_complete() && !was_complete {
                    effects.push(Effect::CourseCompleted {
                        title: course.title.clone(),
                        xp: course.xp_reward,
                    });
                }
            }
        }
        Action::DismissAlert => {
            state.alerts.pop_front();
        }
    }
    effects
}
