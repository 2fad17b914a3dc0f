//! Achievement unlock rules.
//!
//! The remote backend decides unlocks on its own; the local store evaluates
//! this catalog after every XP award. Unlocks are monotonic.

use crate::ids::AchievementId;
use crate::model::{Achievement, Rarity};

/// Facts an unlock condition can look at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressFacts {
    pub total_xp: u64,
    pub user_level: u32,
    pub max_skill_level: u32,
    pub completed_steps: usize,
    pub any_roadmap_complete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockCondition {
    CompletedSteps(usize),
    UserLevel(u32),
    SkillLevel(u32),
    RoadmapComplete,
    TotalXp(u64),
}

impl UnlockCondition {
    #[must_use]
    pub fn is_met(self, facts: &ProgressFacts) -> bool {
        match self {
            Self::CompletedSteps(n) => facts.completed_steps >= n,
            Self::UserLevel(level) => facts.user_level >= level,
            Self::SkillLevel(level) => facts.max_skill_level >= level,
            Self::RoadmapComplete => facts.any_roadmap_complete,
            Self::TotalXp(xp) => facts.total_xp >= xp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementRule {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub rarity: Rarity,
    pub condition: UnlockCondition,
}

impl AchievementRule {
    #[must_use]
    pub fn to_achievement(&self, unlocked_at: Option<String>) -> Achievement {
        Achievement {
            id: AchievementId::new(self.id),
            title: self.title.to_string(),
            description: self.description.to_string(),
            icon: self.icon.to_string(),
            rarity: self.rarity,
            unlocked_at,
        }
    }
}

pub const CATALOG: &[AchievementRule] = &[
    AchievementRule {
        id: "first-steps",
        title: "First Steps",
        description: "Complete your first roadmap milestone",
        icon: "👣",
        rarity: Rarity::Common,
        condition: UnlockCondition::CompletedSteps(1),
    },
    AchievementRule {
        id: "dedicated-learner",
        title: "Dedicated Learner",
        description: "Reach level 2",
        icon: "📖",
        rarity: Rarity::Common,
        condition: UnlockCondition::UserLevel(2),
    },
    AchievementRule {
        id: "skill-adept",
        title: "Skill Adept",
        description: "Raise any skill to level 5",
        icon: "⚡",
        rarity: Rarity::Rare,
        condition: UnlockCondition::SkillLevel(5),
    },
    AchievementRule {
        id: "roadmap-finisher",
        title: "Roadmap Finisher",
        description: "Complete every step of a roadmap",
        icon: "🏁",
        rarity: Rarity::Epic,
        condition: UnlockCondition::RoadmapComplete,
    },
    AchievementRule {
        id: "xp-legend",
        title: "XP Legend",
        description: "Earn 3,000 total XP",
        icon: "👑",
        rarity: Rarity::Legendary,
        condition: UnlockCondition::TotalXp(3000),
    },
];

/// Rules newly satisfied by `facts` that are not yet in `unlocked`.
#[must_use]
pub fn evaluate_unlocks(
    facts: &ProgressFacts,
    unlocked: &[AchievementId],
) -> Vec<&'static AchievementRule> {
    CATALOG
        .iter()
        .filter(|rule| !unlocked.iter().any(|id| id.as_str() == rule.id))
        .filter(|rule| rule.condition.is_met(facts))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_unlocks_for_fresh_user() {
        let facts = ProgressFacts {
            user_level: 1,
            max_skill_level: 1,
            ..ProgressFacts::default()
        };
        assert!(evaluate_unlocks(&facts, &[]).is_empty());
    }

    #[test]
    fn first_step_unlocks_first_steps() {
        let facts = ProgressFacts {
            user_level: 1,
            completed_steps: 1,
            ..ProgressFacts::default()
        };
        let unlocked = evaluate_unlocks(&facts, &[]);
        assert_eq!(unlocked.len(), 1);
        assert_eq!(unlocked[0].id, "first-steps");
    }

    #[test]
    fn already_unlocked_rules_are_skipped() {
        let facts = ProgressFacts {
            total_xp: 3200,
            user_level: 11,
            max_skill_level: 9,
            completed_steps: 5,
            any_roadmap_complete: true,
        };
        let all = evaluate_unlocks(&facts, &[]);
        assert_eq!(all.len(), CATALOG.len());

        let held = vec![AchievementId::new("xp-legend"), AchievementId::new("first-steps")];
        let rest = evaluate_unlocks(&facts, &held);
        assert_eq!(rest.len(), CATALOG.len() - 2);
        assert!(rest.iter().all(|rule| rule.id != "xp-legend"));
    }

    #[test]
    fn rule_converts_to_achievement() {
        let achievement = CATALOG[4].to_achievement(Some("2026-10-18T00:00:00Z".to_string()));
        assert_eq!(achievement.rarity, Rarity::Legendary);
        assert_eq!(achievement.id.as_str(), "xp-legend");
    }
}
