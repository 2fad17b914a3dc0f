//! Backend access for Skillpath.
//!
//! [`Backend`] is either the REST client ([`HttpBackend`]) or the in-memory
//! store ([`LocalBackend`]). Both return the same domain types and the same
//! [`ClientError`] variants, so callers never branch on which one is active.

mod api;
mod envelope;
mod error;
mod http;
mod local;
mod sample;

use std::collections::BTreeMap;

use skillpath_config::{BackendMode, SkillpathConfig};
use skillpath_types::{
    CategoryStats, Course, CourseId, DashboardSnapshot, NewSkill, Notification, NotificationId,
    PracticeOutcome, Roadmap, RoadmapId, Skill, SkillId, StepId, StepOutcome, ValidSignIn,
    ValidSignUp, XpHistoryEntry,
};

pub use api::Overview;
pub use error::{ClientError, NETWORK_ERROR_MESSAGE};
pub use http::{HttpBackend, HttpSettings};
pub use local::LocalBackend;

#[derive(Debug, Clone)]
pub enum Backend {
    Http(HttpBackend),
    Local(LocalBackend),
}

/// Forward a call to whichever backend is active. Local calls are synchronous.
macro_rules! dispatch {
    ($self:ident . $method:ident ( $($arg:expr),* )) => {
        match $self {
            Backend::Http(backend) => backend.$method($($arg),*).await,
            Backend::Local(backend) => backend.$method($($arg),*),
        }
    };
}

impl Backend {
    pub fn from_config(config: &SkillpathConfig, mode: BackendMode) -> Result<Self, ClientError> {
        match mode {
            BackendMode::Remote => Ok(Self::Http(HttpBackend::new(HttpSettings {
                base_url: config.base_url(),
                timeout: config.timeout(),
                access_token: config.access_token(),
            })?)),
            BackendMode::Local => {
                tracing::debug!("Using in-memory backend");
                Ok(Self::Local(LocalBackend::new()))
            }
        }
    }

    /// Where data comes from, for the status line and error screen.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Http(backend) => backend.base_url().as_str().trim_end_matches('/').to_string(),
            Self::Local(_) => "local store".to_string(),
        }
    }

    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }

    /// Fetch everything the dashboard shows. Any failure fails the whole load.
    pub async fn load_dashboard(&self) -> Result<DashboardSnapshot, ClientError> {
        let (overview, skills, courses, roadmaps, notifications) = futures_util::try_join!(
            self.overview(),
            self.skills(),
            self.user_courses(),
            self.roadmaps(),
            self.notifications(),
        )?;
        Ok(DashboardSnapshot {
            progress: overview.progress(),
            current_streak: overview.current_streak,
            achievements: overview.achievements,
            skills,
            courses,
            roadmaps,
            notifications,
        })
    }

    pub async fn overview(&self) -> Result<Overview, ClientError> {
        dispatch!(self.overview())
    }

    pub async fn skills(&self) -> Result<Vec<Skill>, ClientError> {
        dispatch!(self.skills())
    }

    pub async fn user_courses(&self) -> Result<Vec<Course>, ClientError> {
        dispatch!(self.user_courses())
    }

    pub async fn roadmaps(&self) -> Result<Vec<Roadmap>, ClientError> {
        dispatch!(self.roadmaps())
    }

    pub async fn notifications(&self) -> Result<Vec<Notification>, ClientError> {
        dispatch!(self.notifications())
    }

    pub async fn practice_skill(
        &self,
        skill_id: &SkillId,
        xp: u32,
    ) -> Result<PracticeOutcome, ClientError> {
        dispatch!(self.practice_skill(skill_id, xp))
    }

    pub async fn complete_step(
        &self,
        roadmap_id: &RoadmapId,
        step_id: &StepId,
    ) -> Result<StepOutcome, ClientError> {
        dispatch!(self.complete_step(roadmap_id, step_id))
    }

    pub async fn init_sample_data(&self) -> Result<String, ClientError> {
        dispatch!(self.init_sample_data())
    }

    pub async fn sign_in(&self, form: &ValidSignIn) -> Result<String, ClientError> {
        dispatch!(self.sign_in(form))
    }

    pub async fn sign_up(&self, form: &ValidSignUp) -> Result<String, ClientError> {
        dispatch!(self.sign_up(form))
    }

    pub async fn create_skill(&self, skill: &NewSkill) -> Result<Skill, ClientError> {
        dispatch!(self.create_skill(skill))
    }

    pub async fn delete_skill(&self, skill_id: &SkillId) -> Result<(), ClientError> {
        dispatch!(self.delete_skill(skill_id))
    }

    pub async fn enroll_course(&self, course_id: &CourseId) -> Result<String, ClientError> {
        dispatch!(self.enroll_course(course_id))
    }

    pub async fn update_course_progress(
        &self,
        course_id: &CourseId,
        completed_lessons: u32,
    ) -> Result<u32, ClientError> {
        dispatch!(self.update_course_progress(course_id, completed_lessons))
    }

    pub async fn mark_notification_read(&self, id: &NotificationId) -> Result<(), ClientError> {
        dispatch!(self.mark_notification_read(id))
    }

    pub async fn mark_all_notifications_read(&self) -> Result<String, ClientError> {
        dispatch!(self.mark_all_notifications_read())
    }

    pub async fn skills_by_category(&self) -> Result<BTreeMap<String, CategoryStats>, ClientError> {
        dispatch!(self.skills_by_category())
    }

    pub async fn xp_history(&self, days: u32) -> Result<Vec<XpHistoryEntry>, ClientError> {
        dispatch!(self.xp_history(days))
    }
}
