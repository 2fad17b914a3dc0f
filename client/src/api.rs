//! Wire schemas for the `data` payloads of each endpoint.

use std::collections::BTreeMap;

use serde::Deserialize;
use skillpath_types::{
    Achievement, CategoryStats, Course, Notification, Roadmap, Skill, UserProgress, XpHistoryEntry,
};

/// `{total_xp, level}` as returned by mutation endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct UserSnapshot {
    pub total_xp: u64,
    #[serde(default)]
    pub level: Option<u32>,
}

impl UserSnapshot {
    /// The level is re-derived from `total_xp`; a disagreeing server level is logged.
    pub fn into_progress(self, endpoint: &str) -> UserProgress {
        let progress = UserProgress::new(self.total_xp);
        warn_on_level_mismatch(endpoint, progress, self.level);
        progress
    }
}

fn warn_on_level_mismatch(endpoint: &str, progress: UserProgress, reported: Option<u32>) {
    if let Some(reported) = reported
        && reported != progress.level()
    {
        tracing::warn!(
            endpoint,
            total_xp = progress.total_xp,
            reported,
            derived = progress.level(),
            "Backend level disagrees with total XP; using derived level"
        );
    }
}

/// `GET /api/stats/overview`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Overview {
    #[serde(rename = "totalXP", default)]
    pub total_xp: u64,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub skills_count: u64,
    #[serde(default)]
    pub courses_count: u64,
    #[serde(default)]
    pub achievements: Vec<Achievement>,
}

impl Overview {
    #[must_use]
    pub fn progress(&self) -> UserProgress {
        let progress = UserProgress::new(self.total_xp);
        warn_on_level_mismatch("/api/stats/overview", progress, self.level);
        progress
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SkillsData {
    pub skills: Vec<Skill>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SkillData {
    pub skill: Skill,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CoursesData {
    pub courses: Vec<Course>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RoadmapsData {
    pub roadmaps: Vec<Roadmap>,
}

impl RoadmapsData {
    pub fn into_sorted(self) -> Vec<Roadmap> {
        let mut roadmaps = self.roadmaps;
        for roadmap in &mut roadmaps {
            roadmap.steps.sort_by_key(|step| step.order);
        }
        roadmaps
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct NotificationsData {
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PracticeData {
    pub skill: Skill,
    pub user: UserSnapshot,
    pub leveled_up: bool,
    #[serde(default)]
    pub user_leveled_up: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompleteStepData {
    pub user: UserSnapshot,
    #[serde(default)]
    pub xp_gained: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProgressData {
    pub progress: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoriesData {
    pub categories: BTreeMap<String, CategoryStats>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HistoryData {
    pub history: Vec<XpHistoryEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthMessage {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Overview, PracticeData, RoadmapsData};

    #[test]
    fn overview_uses_camel_case_total() {
        let overview: Overview = serde_json::from_value(json!({
            "totalXP": 650,
            "level": 3,
            "current_streak": 4,
            "skills_count": 6,
            "courses_count": 3,
            "achievements": []
        }))
        .unwrap();
        assert_eq!(overview.progress().level(), 3);
        assert_eq!(overview.current_streak, 4);
    }

    #[test]
    fn mismatched_level_is_rederived() {
        let overview: Overview =
            serde_json::from_value(json!({"totalXP": 900, "level": 1})).unwrap();
        assert_eq!(overview.progress().level(), 4);
    }

    #[test]
    fn practice_payload_decodes() {
        let data: PracticeData = serde_json::from_value(json!({
            "skill": {"id": "s1", "name": "Node.js", "level": 6, "xp": 30, "maxXp": 1000, "category": "Backend"},
            "user": {"total_xp": 350, "level": 2},
            "leveled_up": true
        }))
        .unwrap();
        assert!(data.leveled_up);
        assert_eq!(data.user_leveled_up, None);
        assert_eq!(data.user.into_progress("/x").total_xp, 350);
    }

    #[test]
    fn roadmap_steps_are_sorted_by_order() {
        let data: RoadmapsData = serde_json::from_value(json!({
            "roadmaps": [{"id": "r1", "steps": [
                {"id": "b", "title": "B", "order": 2},
                {"id": "a", "title": "A", "order": 1}
            ]}]
        }))
        .unwrap();
        let roadmaps = data.into_sorted();
        assert_eq!(roadmaps[0].steps[0].id.as_str(), "a");
    }
}
