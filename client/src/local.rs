//! In-memory backend.
//!
//! Same operations and response shapes as the REST backend, with state held
//! for the life of the process. XP awards go through the progression rules in
//! `skillpath_types::progression`, then append history, post notifications,
//! and unlock achievements the way the server does.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, Utc};
use sha2::{Digest, Sha256};
use skillpath_types::achievements::{ProgressFacts, evaluate_unlocks};
use skillpath_types::progression::{self, ProgressionError};
use skillpath_types::{
    Achievement, AchievementId, CategoryStats, Course, CourseId, NewSkill, Notification,
    NotificationId, NotificationKind, PracticeOutcome, Roadmap, RoadmapId, Skill, SkillId, StepId,
    StepOutcome, UserProgress, ValidSignIn, ValidSignUp, XpHistoryEntry, XpSource,
};

use crate::api::Overview;
use crate::error::ClientError;
use crate::sample::{self, CatalogCourse};

const NOTIFICATION_LIMIT: usize = 50;
/// XP history older than this is dropped; the streak cannot exceed it.
const HISTORY_RETENTION_DAYS: i64 = 365;
const DEFAULT_SKILL_COLOR: &str = "#667eea";

#[derive(Debug, Clone)]
struct Enrollment {
    course_id: CourseId,
    completed_lessons: u32,
    progress: u32,
    rewarded: bool,
}

#[derive(Debug, Clone)]
struct HistoryRecord {
    at: DateTime<Utc>,
    entry: XpHistoryEntry,
}

#[derive(Debug, Clone)]
struct LocalUser {
    email: String,
    password_hash: String,
}

#[derive(Debug)]
struct Store {
    progress: UserProgress,
    skills: Vec<Skill>,
    catalog: Vec<CatalogCourse>,
    enrollments: Vec<Enrollment>,
    roadmaps: Vec<Roadmap>,
    achievements: Vec<Achievement>,
    /// Oldest first.
    notifications: Vec<Notification>,
    /// Oldest first.
    history: Vec<HistoryRecord>,
    users: Vec<LocalUser>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            progress: UserProgress::default(),
            skills: Vec::new(),
            catalog: sample::catalog(),
            enrollments: Vec::new(),
            roadmaps: Vec::new(),
            achievements: Vec::new(),
            notifications: Vec::new(),
            history: Vec::new(),
            users: Vec::new(),
        }
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn password_hash(email: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Consecutive days with at least one XP award, ending today or yesterday.
fn current_streak(history: &[HistoryRecord], today: NaiveDate) -> u32 {
    let mut days: Vec<NaiveDate> = history.iter().map(|r| r.at.date_naive()).collect();
    days.sort_unstable();
    days.dedup();

    let Some(&last) = days.last() else {
        return 0;
    };
    if today.signed_duration_since(last).num_days() > 1 {
        return 0;
    }

    let mut streak = 1;
    for pair in days.windows(2).rev() {
        if pair[1].signed_duration_since(pair[0]).num_days() == 1 {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

impl Store {
    fn notify(&mut self, kind: NotificationKind, message: String, at: DateTime<Utc>) {
        self.notifications.push(Notification {
            id: NotificationId::new(new_id()),
            message,
            kind,
            read: false,
            created_at: Some(at.to_rfc3339()),
        });
        let excess = self.notifications.len().saturating_sub(NOTIFICATION_LIMIT);
        self.notifications.drain(..excess);
    }

    fn record_xp(
        &mut self,
        amount: u64,
        source_type: XpSource,
        source_id: &str,
        description: String,
        at: DateTime<Utc>,
    ) {
        self.history.push(HistoryRecord {
            at,
            entry: XpHistoryEntry {
                id: new_id(),
                amount,
                source_type,
                source_id: source_id.to_string(),
                description,
                created_at: Some(at.to_rfc3339()),
            },
        });
        let cutoff = at - ChronoDuration::days(HISTORY_RETENTION_DAYS);
        self.history.retain(|r| r.at >= cutoff);
    }

    /// Add `delta` to the account, then unlock anything newly earned.
    fn award(&mut self, delta: u64, at: DateTime<Utc>) -> progression::LevelChange {
        let change = progression::apply_xp_delta(self.progress, delta);
        self.progress = change.progress;
        if change.leveled_up() {
            tracing::info!(level = change.progress.level(), "Account leveled up");
        }
        self.unlock_achievements(at);
        change
    }

    fn facts(&self) -> ProgressFacts {
        ProgressFacts {
            total_xp: self.progress.total_xp,
            user_level: self.progress.level(),
            max_skill_level: self.skills.iter().map(|s| s.level).max().unwrap_or(0),
            completed_steps: self.roadmaps.iter().map(Roadmap::completed_steps).sum(),
            any_roadmap_complete: self
                .roadmaps
                .iter()
                .any(|r| !r.steps.is_empty() && r.completion_percent() == 100),
        }
    }

    fn unlock_achievements(&mut self, at: DateTime<Utc>) {
        let held: Vec<AchievementId> = self.achievements.iter().map(|a| a.id.clone()).collect();
        for rule in evaluate_unlocks(&self.facts(), &held) {
            tracing::info!(achievement = rule.id, "Achievement unlocked");
            self.achievements
                .push(rule.to_achievement(Some(at.to_rfc3339())));
            self.notify(
                NotificationKind::Achievement,
                format!("🏆 Achievement unlocked: {}!", rule.title),
                at,
            );
        }
    }

    fn user_courses(&self) -> Vec<Course> {
        self.enrollments
            .iter()
            .filter_map(|enrollment| {
                let course = self.catalog.iter().find(|c| c.id == enrollment.course_id)?;
                Some(Course {
                    id: course.id.clone(),
                    title: course.title.clone(),
                    progress: enrollment.progress,
                    xp_reward: course.xp_reward,
                    lessons: course.total_lessons,
                    completed_lessons: enrollment.completed_lessons,
                    thumbnail: course.thumbnail.clone(),
                    category: course.category.clone(),
                })
            })
            .collect()
    }

    fn seed(&mut self, now: DateTime<Utc>) {
        self.skills = sample::skills();
        self.roadmaps = vec![sample::roadmap()];
        self.enrollments = sample::enrollments()
            .into_iter()
            .filter_map(|(course_id, completed_lessons)| {
                let course = self.catalog.iter().find(|c| c.id == course_id)?;
                Some(Enrollment {
                    progress: progression::course_progress_percent(
                        completed_lessons,
                        course.total_lessons,
                    ),
                    course_id,
                    completed_lessons,
                    rewarded: false,
                })
            })
            .collect();
        self.progress = UserProgress::new(sample::SAMPLE_TOTAL_XP);

        // Three days of earlier activity so the streak has something to show.
        for days_ago in (1..=3).rev() {
            let at = now - ChronoDuration::days(days_ago);
            self.record_xp(
                50,
                XpSource::Skill,
                "skill-react",
                "Practiced React".to_string(),
                at,
            );
        }

        self.notify(
            NotificationKind::Info,
            "👋 Welcome to SkillProgress! Practice a skill to earn XP.".to_string(),
            now,
        );
        self.unlock_achievements(now);
    }
}

/// Process-local backend. Cloning shares the same store.
#[derive(Debug, Clone, Default)]
pub struct LocalBackend {
    store: Arc<Mutex<Store>>,
}

impl LocalBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend already holding the sample data.
    #[must_use]
    pub fn with_sample_data() -> Self {
        let backend = Self::new();
        backend.lock().seed(Utc::now());
        backend
    }

    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn overview(&self) -> Result<Overview, ClientError> {
        let store = self.lock();
        Ok(Overview {
            total_xp: store.progress.total_xp,
            level: Some(store.progress.level()),
            current_streak: current_streak(&store.history, Utc::now().date_naive()),
            skills_count: store.skills.len() as u64,
            courses_count: store.enrollments.len() as u64,
            achievements: store.achievements.clone(),
        })
    }

    pub fn skills(&self) -> Result<Vec<Skill>, ClientError> {
        Ok(self.lock().skills.clone())
    }

    pub fn user_courses(&self) -> Result<Vec<Course>, ClientError> {
        Ok(self.lock().user_courses())
    }

    pub fn roadmaps(&self) -> Result<Vec<Roadmap>, ClientError> {
        Ok(self.lock().roadmaps.clone())
    }

    /// Newest first, at most 50.
    pub fn notifications(&self) -> Result<Vec<Notification>, ClientError> {
        Ok(self
            .lock()
            .notifications
            .iter()
            .rev()
            .take(NOTIFICATION_LIMIT)
            .cloned()
            .collect())
    }

    pub fn practice_skill(&self, skill_id: &SkillId, xp: u32) -> Result<PracticeOutcome, ClientError> {
        let now = Utc::now();
        let mut store = self.lock();
        let index = store
            .skills
            .iter()
            .position(|s| &s.id == skill_id)
            .ok_or_else(|| ClientError::not_found("Skill not found"))?;

        let practice = progression::practice_skill(&store.skills[index], xp);
        let skill = practice.skill.clone();
        store.skills[index] = practice.skill;

        if practice.leveled_up {
            store.notify(
                NotificationKind::LevelUp,
                format!("🎉 {} leveled up to Level {}!", skill.name, skill.level),
                now,
            );
        }
        store.record_xp(
            practice.delta_total_xp,
            XpSource::Skill,
            skill_id.as_str(),
            format!("Practiced {}", skill.name),
            now,
        );
        let change = store.award(practice.delta_total_xp, now);

        tracing::debug!(skill = %skill.name, xp, level = skill.level, "Practiced skill");
        Ok(PracticeOutcome {
            skill,
            progress: change.progress,
            leveled_up: practice.leveled_up,
            user_leveled_up: change.leveled_up(),
        })
    }

    pub fn complete_step(
        &self,
        roadmap_id: &RoadmapId,
        step_id: &StepId,
    ) -> Result<StepOutcome, ClientError> {
        let now = Utc::now();
        let mut store = self.lock();
        let step = store
            .roadmaps
            .iter_mut()
            .filter(|r| &r.id == roadmap_id)
            .flat_map(|r| r.steps.iter_mut())
            .find(|s| &s.id == step_id)
            .ok_or_else(|| ClientError::not_found("Step not found"))?;

        let completion = progression::complete_roadmap_step(step)
            .map_err(|err: ProgressionError| ClientError::rejected(400, err.to_string()))?;
        *step = completion.step;
        let title = step.title.clone();

        let xp = completion.delta_total_xp;
        store.notify(
            NotificationKind::Achievement,
            format!("✅ Completed: {title} (+{xp} XP)"),
            now,
        );
        store.record_xp(
            xp,
            XpSource::Roadmap,
            step_id.as_str(),
            format!("Completed roadmap step: {title}"),
            now,
        );
        let change = store.award(xp, now);

        Ok(StepOutcome {
            roadmap_id: roadmap_id.clone(),
            step_id: step_id.clone(),
            progress: change.progress,
            xp_gained: xp,
        })
    }

    pub fn init_sample_data(&self) -> Result<String, ClientError> {
        let mut store = self.lock();
        if !store.skills.is_empty() || !store.enrollments.is_empty() {
            return Ok("Sample data already initialized".to_string());
        }
        store.seed(Utc::now());
        tracing::info!("Seeded local sample data");
        Ok("Sample data initialized successfully".to_string())
    }

    pub fn sign_up(&self, form: &ValidSignUp) -> Result<String, ClientError> {
        let mut store = self.lock();
        if store.users.iter().any(|u| u.email == form.email()) {
            return Err(ClientError::rejected(400, "Email already registered"));
        }
        store.users.push(LocalUser {
            email: form.email().to_string(),
            password_hash: password_hash(form.email(), form.password()),
        });
        Ok("User created successfully".to_string())
    }

    pub fn sign_in(&self, form: &ValidSignIn) -> Result<String, ClientError> {
        let store = self.lock();
        let expected = password_hash(form.email(), form.password());
        if store
            .users
            .iter()
            .any(|u| u.email == form.email() && u.password_hash == expected)
        {
            Ok(format!("local-{}", new_id()))
        } else {
            Err(ClientError::rejected(401, "Invalid credentials"))
        }
    }

    pub fn create_skill(&self, new_skill: &NewSkill) -> Result<Skill, ClientError> {
        let name = new_skill.name.trim();
        let category = new_skill.category.trim();
        if name.is_empty() || category.is_empty() {
            return Err(ClientError::rejected(400, "Name and category are required"));
        }
        let skill = Skill {
            id: SkillId::new(new_id()),
            name: name.to_string(),
            level: 1,
            xp: 0,
            max_xp: skillpath_types::DEFAULT_MAX_XP,
            category: category.to_string(),
            color: new_skill
                .color
                .clone()
                .unwrap_or_else(|| DEFAULT_SKILL_COLOR.to_string()),
        };
        self.lock().skills.push(skill.clone());
        Ok(skill)
    }

    pub fn delete_skill(&self, skill_id: &SkillId) -> Result<(), ClientError> {
        let mut store = self.lock();
        let before = store.skills.len();
        store.skills.retain(|s| &s.id != skill_id);
        if store.skills.len() == before {
            return Err(ClientError::not_found("Skill not found"));
        }
        Ok(())
    }

    pub fn enroll_course(&self, course_id: &CourseId) -> Result<String, ClientError> {
        let mut store = self.lock();
        if !store.catalog.iter().any(|c| &c.id == course_id) {
            return Err(ClientError::not_found("Course not found"));
        }
        if store.enrollments.iter().any(|e| &e.course_id == course_id) {
            return Err(ClientError::rejected(400, "Already enrolled in this course"));
        }
        store.enrollments.push(Enrollment {
            course_id: course_id.clone(),
            completed_lessons: 0,
            progress: 0,
            rewarded: false,
        });
        Ok("Enrolled successfully".to_string())
    }

    pub fn update_course_progress(
        &self,
        course_id: &CourseId,
        completed_lessons: u32,
    ) -> Result<u32, ClientError> {
        let now = Utc::now();
        let mut store = self.lock();
        let course = store
            .catalog
            .iter()
            .find(|c| &c.id == course_id)
            .cloned()
            .ok_or_else(|| ClientError::not_found("Course not found"))?;
        let enrollment = store
            .enrollments
            .iter_mut()
            .find(|e| &e.course_id == course_id)
            .ok_or_else(|| ClientError::rejected(400, "Not enrolled in this course"))?;

        let progress = progression::course_progress_percent(completed_lessons, course.total_lessons);
        enrollment.completed_lessons = completed_lessons.min(course.total_lessons);
        enrollment.progress = progress;

        let reward_due = progress >= 100 && !enrollment.rewarded;
        if reward_due {
            enrollment.rewarded = true;
            let xp = u64::from(course.xp_reward);
            store.notify(
                NotificationKind::Course,
                format!(
                    "🎓 Congratulations! You completed {}! (+{xp} XP)",
                    course.title
                ),
                now,
            );
            store.record_xp(
                xp,
                XpSource::Course,
                course_id.as_str(),
                format!("Completed course: {}", course.title),
                now,
            );
            store.award(xp, now);
        }
        Ok(progress)
    }

    pub fn mark_notification_read(&self, id: &NotificationId) -> Result<(), ClientError> {
        let mut store = self.lock();
        let notification = store
            .notifications
            .iter_mut()
            .find(|n| &n.id == id)
            .ok_or_else(|| ClientError::not_found("Notification not found"))?;
        notification.read = true;
        Ok(())
    }

    pub fn mark_all_notifications_read(&self) -> Result<String, ClientError> {
        let mut store = self.lock();
        let mut count = 0;
        for notification in store.notifications.iter_mut().filter(|n| !n.read) {
            notification.read = true;
            count += 1;
        }
        Ok(format!("Marked {count} notifications as read"))
    }

    pub fn skills_by_category(&self) -> Result<BTreeMap<String, CategoryStats>, ClientError> {
        Ok(progression::skills_by_category(&self.lock().skills))
    }

    /// Entries from the last `days` days, oldest first.
    pub fn xp_history(&self, days: u32) -> Result<Vec<XpHistoryEntry>, ClientError> {
        let since = Utc::now() - ChronoDuration::days(i64::from(days));
        Ok(self
            .lock()
            .history
            .iter()
            .filter(|r| r.at >= since)
            .map(|r| r.entry.clone())
            .collect())
    }
}
