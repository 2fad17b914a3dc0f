//! XP, leveling, and completion rules.
//!
//! Every function here is pure: it takes the current value and an event and
//! returns the new value plus what changed. Persistence and notifications are
//! the caller's job.
//!
//! # Leveling
//!
//! Account level is derived from total XP with a fixed width per level:
//! `level = total_xp / 300 + 1`. There is no separately stored level.
//!
//! Skills level independently. Practicing adds XP to the skill; reaching
//! `max_xp` rolls over once (`level += 1`, `xp -= max_xp`).

use std::collections::BTreeMap;

use thiserror::Error;

use crate::model::{CategoryStats, RoadmapStep, Skill, UserProgress};

/// Width of one account level, in XP.
pub const XP_PER_LEVEL: u64 = 300;
/// XP required per level for newly created skills.
pub const DEFAULT_MAX_XP: u32 = 1000;
/// XP granted by one practice action unless configured otherwise.
pub const DEFAULT_PRACTICE_XP: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressionError {
    #[error("Step already completed")]
    StepAlreadyCompleted,
}

/// Result of [`practice_skill`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillPractice {
    pub skill: Skill,
    /// XP to add to the account total.
    pub delta_total_xp: u64,
    pub leveled_up: bool,
}

/// Result of [`complete_roadmap_step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepCompletion {
    pub step: RoadmapStep,
    pub delta_total_xp: u64,
}

/// Result of [`apply_xp_delta`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelChange {
    pub progress: UserProgress,
    pub previous_level: u32,
}

impl LevelChange {
    #[must_use]
    pub fn leveled_up(&self) -> bool {
        self.progress.level() > self.previous_level
    }
}

#[must_use]
pub fn level_for_total_xp(total_xp: u64) -> u32 {
    let level = total_xp / XP_PER_LEVEL + 1;
    u32::try_from(level).unwrap_or(u32::MAX)
}

#[must_use]
pub fn current_level_xp(total_xp: u64) -> u64 {
    total_xp % XP_PER_LEVEL
}

#[must_use]
pub fn xp_to_next_level(total_xp: u64) -> u64 {
    XP_PER_LEVEL - current_level_xp(total_xp)
}

/// Cumulative XP at which `level` ends.
#[must_use]
pub fn xp_for_next_level(level: u32) -> u64 {
    u64::from(level) * XP_PER_LEVEL
}

/// Add `xp_gain` to a skill, rolling over at most one level.
///
/// A gain larger than a full level leaves `xp >= max_xp`; the next practice
/// rolls over again.
#[must_use]
pub fn practice_skill(skill: &Skill, xp_gain: u32) -> SkillPractice {
    let mut skill = skill.clone();
    let total = skill.xp.saturating_add(xp_gain);
    let leveled_up = skill.max_xp > 0 && total >= skill.max_xp;
    if leveled_up {
        skill.level = skill.level.saturating_add(1);
        skill.xp = total - skill.max_xp;
    } else {
        skill.xp = total;
    }

    SkillPractice {
        skill,
        delta_total_xp: u64::from(xp_gain),
        leveled_up,
    }
}

/// Mark a step complete. Completing twice is an error and grants nothing.
pub fn complete_roadmap_step(step: &RoadmapStep) -> Result<StepCompletion, ProgressionError> {
    if step.completed {
        return Err(ProgressionError::StepAlreadyCompleted);
    }
    let mut step = step.clone();
    step.completed = true;
    let delta_total_xp = u64::from(step.xp);
    Ok(StepCompletion {
        step,
        delta_total_xp,
    })
}

#[must_use]
pub fn apply_xp_delta(progress: UserProgress, delta: u64) -> LevelChange {
    LevelChange {
        progress: UserProgress::new(progress.total_xp.saturating_add(delta)),
        previous_level: progress.level(),
    }
}

/// `round(100 * completed / total)`, or 0 for an empty roadmap.
#[must_use]
pub fn roadmap_completion_percent(steps: &[RoadmapStep]) -> u8 {
    if steps.is_empty() {
        return 0;
    }
    let completed = steps.iter().filter(|step| step.completed).count();
    let percent = (completed as f64 / steps.len() as f64 * 100.0).round();
    percent as u8
}

/// Course progress as the backend computes it: truncating, with zero lessons
/// treated as one. Capped at 100.
#[must_use]
pub fn course_progress_percent(completed_lessons: u32, total_lessons: u32) -> u32 {
    let total = u64::from(total_lessons.max(1));
    let percent = u64::from(completed_lessons) * 100 / total;
    percent.min(100) as u32
}

#[must_use]
pub fn skills_by_category(skills: &[Skill]) -> BTreeMap<String, CategoryStats> {
    let mut categories: BTreeMap<String, CategoryStats> = BTreeMap::new();
    for skill in skills {
        let entry = categories.entry(skill.category.clone()).or_default();
        entry.total_level += u64::from(skill.level);
        entry.count += 1;
    }
    categories
}
