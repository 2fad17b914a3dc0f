//! Domain entities shared by the client, engine, and TUI.
//!
//! Field names follow the backend's JSON: skills and courses use camelCase
//! (`maxXp`, `xpReward`), everything else is snake_case.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::{AchievementId, CourseId, NotificationId, RoadmapId, SkillId, StepId};
use crate::progression::{self, DEFAULT_MAX_XP};

const DEFAULT_SKILL_COLOR: &str = "#667eea";
const DEFAULT_STEP_XP: u32 = 100;

fn default_level() -> u32 {
    1
}

fn default_max_xp() -> u32 {
    DEFAULT_MAX_XP
}

fn default_skill_color() -> String {
    DEFAULT_SKILL_COLOR.to_string()
}

fn default_thumbnail() -> String {
    "📚".to_string()
}

fn default_course_category() -> String {
    "General".to_string()
}

fn default_step_xp() -> u32 {
    DEFAULT_STEP_XP
}

/// Account-wide experience. The level is always derived from `total_xp`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProgress {
    pub total_xp: u64,
}

impl UserProgress {
    #[must_use]
    pub const fn new(total_xp: u64) -> Self {
        Self { total_xp }
    }

    #[must_use]
    pub fn level(self) -> u32 {
        progression::level_for_total_xp(self.total_xp)
    }

    /// XP earned inside the current level (`total_xp % 300`).
    #[must_use]
    pub fn current_level_xp(self) -> u64 {
        progression::current_level_xp(self.total_xp)
    }

    #[must_use]
    pub fn xp_to_next_level(self) -> u64 {
        progression::xp_to_next_level(self.total_xp)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub xp: u32,
    #[serde(rename = "maxXp", default = "default_max_xp")]
    pub max_xp: u32,
    #[serde(default)]
    pub category: String,
    #[serde(default = "default_skill_color")]
    pub color: String,
}

impl Skill {
    /// Fraction of the way to the next skill level, in `[0, 1]`.
    #[must_use]
    pub fn level_ratio(&self) -> f64 {
        if self.max_xp == 0 {
            return 0.0;
        }
        (f64::from(self.xp) / f64::from(self.max_xp)).clamp(0.0, 1.0)
    }
}

/// Request payload for creating a skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewSkill {
    pub name: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    #[serde(default)]
    pub progress: u32,
    #[serde(rename = "xpReward", default)]
    pub xp_reward: u32,
    #[serde(default)]
    pub lessons: u32,
    #[serde(rename = "completedLessons", default)]
    pub completed_lessons: u32,
    #[serde(default = "default_thumbnail")]
    pub thumbnail: String,
    #[serde(default = "default_course_category")]
    pub category: String,
}

impl Course {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.progress >= 100
    }
}

/// Display-only tier attached to achievements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Common => "COMMON",
            Self::Rare => "RARE",
            Self::Epic => "EPIC",
            Self::Legendary => "LEGENDARY",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: AchievementId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub rarity: Rarity,
    #[serde(rename = "unlockedAt", default)]
    pub unlocked_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapStep {
    pub id: StepId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default = "default_step_xp")]
    pub xp: u32,
    #[serde(default)]
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roadmap {
    pub id: RoadmapId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub steps: Vec<RoadmapStep>,
}

impl Roadmap {
    #[must_use]
    pub fn completion_percent(&self) -> u8 {
        progression::roadmap_completion_percent(&self.steps)
    }

    #[must_use]
    pub fn completed_steps(&self) -> usize {
        self.steps.iter().filter(|step| step.completed).count()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Achievement,
    #[serde(rename = "levelup")]
    LevelUp,
    Course,
    #[default]
    #[serde(other)]
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: NotificationKind,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// What an XP award was earned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XpSource {
    Skill,
    Roadmap,
    Course,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpHistoryEntry {
    pub id: String,
    pub amount: u64,
    pub source_type: XpSource,
    pub source_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Aggregate of one skill category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub total_level: u64,
    pub count: u64,
}

/// Everything the dashboard needs after the initial load fan-out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardSnapshot {
    pub progress: UserProgress,
    pub current_streak: u32,
    pub achievements: Vec<Achievement>,
    pub skills: Vec<Skill>,
    pub courses: Vec<Course>,
    pub roadmaps: Vec<Roadmap>,
    pub notifications: Vec<Notification>,
}

impl DashboardSnapshot {
    /// First run: nothing to show until sample data is initialized.
    #[must_use]
    pub fn is_first_run(&self) -> bool {
        self.skills.is_empty() && self.courses.is_empty()
    }

    #[must_use]
    pub fn skills_by_category(&self) -> BTreeMap<String, CategoryStats> {
        progression::skills_by_category(&self.skills)
    }
}

/// Result of a confirmed skill practice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeOutcome {
    pub skill: Skill,
    pub progress: UserProgress,
    /// The skill itself rolled over to a new level.
    pub leveled_up: bool,
    /// The account level increased.
    pub user_leveled_up: bool,
}

/// Result of a confirmed roadmap step completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub roadmap_id: RoadmapId,
    pub step_id: StepId,
    pub progress: UserProgress,
    pub xp_gained: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skill_decodes_backend_shape_with_defaults() {
        let skill: Skill = serde_json::from_value(serde_json::json!({
            "id": "s1",
            "user_id": "u1",
            "name": "React",
            "xp": 750,
            "maxXp": 1000,
            "level": 8,
            "category": "Frontend",
            "created_at": "Sat, 18 Oct 2026 11:49:00 GMT"
        }))
        .unwrap();
        assert_eq!(skill.max_xp, 1000);
        assert_eq!(skill.level, 8);
        assert_eq!(skill.color, "#667eea");
    }

    #[test]
    fn course_defaults_match_backend() {
        let course: Course = serde_json::from_value(serde_json::json!({
            "id": "c1",
            "title": "Rust Basics"
        }))
        .unwrap();
        assert_eq!(course.thumbnail, "📚");
        assert_eq!(course.category, "General");
        assert_eq!(course.progress, 0);
    }

    #[test]
    fn unknown_notification_kind_falls_back_to_info() {
        let notification: Notification = serde_json::from_value(serde_json::json!({
            "id": "n1",
            "message": "hello",
            "type": "broadcast"
        }))
        .unwrap();
        assert_eq!(notification.kind, NotificationKind::Info);
        assert!(!notification.read);
    }

    #[test]
    fn levelup_notification_kind_decodes() {
        let kind: NotificationKind = serde_json::from_str("\"levelup\"").unwrap();
        assert_eq!(kind, NotificationKind::LevelUp);
    }

    #[test]
    fn rarity_labels() {
        let rarity: Rarity = serde_json::from_str("\"legendary\"").unwrap();
        assert_eq!(rarity, Rarity::Legendary);
        assert_eq!(rarity.label(), "LEGENDARY");
    }

    #[test]
    fn first_run_requires_no_skills_and_no_courses() {
        let mut snapshot = DashboardSnapshot::default();
        assert!(snapshot.is_first_run());

        snapshot.courses.push(Course {
            id: CourseId::new("c1"),
            title: "Rust".to_string(),
            progress: 0,
            xp_reward: 500,
            lessons: 10,
            completed_lessons: 0,
            thumbnail: default_thumbnail(),
            category: default_course_category(),
        });
        assert!(!snapshot.is_first_run());
    }

    #[test]
    fn user_progress_derives_level() {
        let progress = UserProgress::new(650);
        assert_eq!(progress.level(), 3);
        assert_eq!(progress.current_level_xp(), 50);
        assert_eq!(progress.xp_to_next_level(), 250);
    }
}
