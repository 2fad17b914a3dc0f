//! Core domain types for Skillpath.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.
//!
//! - [`model`] - skills, courses, roadmaps, achievements, notifications
//! - [`progression`] - XP, leveling, and roadmap completion rules
//! - [`achievements`] - the unlock rule catalog
//! - [`auth`] - sign-in / sign-up form validation
//! - [`ui`] - view options and celebration animations

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

pub mod achievements;
pub mod auth;
mod ids;
pub mod model;
pub mod progression;
mod sanitize;
pub mod ui;

pub use achievements::{AchievementRule, ProgressFacts, UnlockCondition, evaluate_unlocks};
pub use auth::{SignInForm, SignUpForm, ValidSignIn, ValidSignUp, ValidationError};
pub use ids::{AchievementId, CourseId, NotificationId, RoadmapId, SkillId, StepId};
pub use model::{
    Achievement, CategoryStats, Course, DashboardSnapshot, NewSkill, Notification,
    NotificationKind, PracticeOutcome, Rarity, Roadmap, RoadmapStep, Skill, StepOutcome,
    UserProgress, XpHistoryEntry, XpSource,
};
pub use progression::{
    DEFAULT_MAX_XP, DEFAULT_PRACTICE_XP, LevelChange, ProgressionError, SkillPractice,
    StepCompletion, XP_PER_LEVEL, apply_xp_delta, complete_roadmap_step, course_progress_percent,
    current_level_xp, level_for_total_xp, practice_skill, roadmap_completion_percent,
    skills_by_category, xp_for_next_level, xp_to_next_level,
};
pub use sanitize::sanitize_terminal_text;

/// Truncate `text` to at most `max_chars` characters, appending `...` when cut.
#[must_use]
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars <= 3 {
        return text.chars().take(max_chars).collect();
    }
    let mut out: String = text.chars().take(max_chars - 3).collect();
    out.push_str("...");
    out
}
