//! REST client for the remote backend.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::Method;
use serde::Serialize;
use serde_json::json;
use skillpath_types::{
    CategoryStats, Course, CourseId, NewSkill, Notification, NotificationId, PracticeOutcome,
    Roadmap, RoadmapId, Skill, SkillId, StepId, StepOutcome, ValidSignIn, ValidSignUp,
    XpHistoryEntry,
};
use url::Url;

use crate::api::{
    AuthMessage, CategoriesData, CompleteStepData, CoursesData, HistoryData, NotificationsData,
    Overview, PracticeData, ProgressData, RoadmapsData, SkillData, SkillsData, TokenResponse,
};
use crate::envelope::{decode_auth, decode_data, decode_message};
use crate::error::ClientError;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const TCP_KEEPALIVE_SECS: u64 = 60;
const POOL_MAX_IDLE_PER_HOST: usize = 8;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

#[derive(Clone)]
pub struct HttpSettings {
    pub base_url: String,
    pub timeout: Duration,
    pub access_token: Option<String>,
}

// Manual Debug impl to keep the session token out of logs.
impl std::fmt::Debug for HttpSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSettings")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

fn base_client_builder() -> reqwest::ClientBuilder {
    use reqwest::header::{HeaderMap, HeaderValue};

    let mut default_headers = HeaderMap::new();
    default_headers.insert(
        reqwest::header::ACCEPT,
        HeaderValue::from_static("application/json"),
    );

    reqwest::Client::builder()
        .user_agent(concat!("skillpath/", env!("CARGO_PKG_VERSION")))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
        // Session cookies from the Flask backend ride along like `credentials: include`.
        .cookie_store(true)
        .default_headers(default_headers)
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
    access_token: Option<String>,
}

impl HttpBackend {
    pub fn new(settings: HttpSettings) -> Result<Self, ClientError> {
        let base_url = Url::parse(&settings.base_url).map_err(|e| {
            ClientError::Config(format!("invalid base URL {:?}: {e}", settings.base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!(
                "base URL {:?} cannot have a path",
                settings.base_url
            )));
        }
        let client = base_client_builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;

        tracing::debug!(base_url = %base_url, "Using remote backend");
        Ok(Self {
            client,
            base_url,
            access_token: settings.access_token,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `base/seg1/seg2...`, percent-encoding each segment.
    fn url(&self, segments: &[&str]) -> Result<(String, Url), ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::Config(format!("base URL {} cannot have a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        let endpoint = format!("/{}", segments.join("/"));
        Ok((endpoint, url))
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<serde_json::Value>,
    ) -> Result<(u16, Vec<u8>), ClientError> {
        let mut request = self.client.request(method, url);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        Ok((status, bytes.to_vec()))
    }

    async fn data<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<serde_json::Value>,
    ) -> Result<T, ClientError> {
        let (endpoint, url) = self.url(segments)?;
        let (status, bytes) = self.send(method, url, body).await?;
        decode_data(&endpoint, status, &bytes)
    }

    async fn message(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<serde_json::Value>,
    ) -> Result<String, ClientError> {
        let (endpoint, url) = self.url(segments)?;
        let (status, bytes) = self.send(method, url, body).await?;
        decode_message(&endpoint, status, &bytes)
    }

    async fn auth<T: serde::de::DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &impl Serialize,
    ) -> Result<T, ClientError> {
        let (endpoint, url) = self.url(segments)?;
        let body = serde_json::to_value(body)
            .map_err(|e| ClientError::Config(format!("failed to encode request: {e}")))?;
        let (status, bytes) = self.send(Method::POST, url, Some(body)).await?;
        decode_auth(&endpoint, status, &bytes)
    }

    pub async fn overview(&self) -> Result<Overview, ClientError> {
        self.data(Method::GET, &["api", "stats", "overview"], None).await
    }

    pub async fn skills(&self) -> Result<Vec<Skill>, ClientError> {
        let data: SkillsData = self.data(Method::GET, &["api", "skills"], None).await?;
        Ok(data.skills)
    }

    pub async fn user_courses(&self) -> Result<Vec<Course>, ClientError> {
        let data: CoursesData = self.data(Method::GET, &["api", "courses", "user"], None).await?;
        Ok(data.courses)
    }

    pub async fn roadmaps(&self) -> Result<Vec<Roadmap>, ClientError> {
        let data: RoadmapsData = self.data(Method::GET, &["api", "roadmaps"], None).await?;
        Ok(data.into_sorted())
    }

    pub async fn notifications(&self) -> Result<Vec<Notification>, ClientError> {
        let data: NotificationsData =
            self.data(Method::GET, &["api", "notifications"], None).await?;
        Ok(data.notifications)
    }

    pub async fn practice_skill(
        &self,
        skill_id: &SkillId,
        xp: u32,
    ) -> Result<PracticeOutcome, ClientError> {
        let segments = ["api", "skills", skill_id.as_str(), "practice"];
        let data: PracticeData = self
            .data(Method::POST, &segments, Some(json!({ "xp": xp })))
            .await?;
        let progress = data.user.into_progress("/api/skills/{id}/practice");
        // Older backends omit `user_leveled_up`; without the previous total it
        // cannot be recomputed here.
        let user_leveled_up = data.user_leveled_up.unwrap_or(false);
        Ok(PracticeOutcome {
            skill: data.skill,
            progress,
            leveled_up: data.leveled_up,
            user_leveled_up,
        })
    }

    pub async fn complete_step(
        &self,
        roadmap_id: &RoadmapId,
        step_id: &StepId,
    ) -> Result<StepOutcome, ClientError> {
        let segments = [
            "api",
            "roadmaps",
            roadmap_id.as_str(),
            "steps",
            step_id.as_str(),
            "complete",
        ];
        let data: CompleteStepData = self.data(Method::PUT, &segments, None).await?;
        Ok(StepOutcome {
            roadmap_id: roadmap_id.clone(),
            step_id: step_id.clone(),
            progress: data
                .user
                .into_progress("/api/roadmaps/{rid}/steps/{sid}/complete"),
            xp_gained: data.xp_gained.unwrap_or_default(),
        })
    }

    pub async fn init_sample_data(&self) -> Result<String, ClientError> {
        self.message(Method::POST, &["init-sample-data"], None).await
    }

    pub async fn sign_in(&self, form: &ValidSignIn) -> Result<String, ClientError> {
        let token: TokenResponse = self.auth(&["auth", "signin"], form).await?;
        Ok(token.access_token)
    }

    pub async fn sign_up(&self, form: &ValidSignUp) -> Result<String, ClientError> {
        let reply: AuthMessage = self.auth(&["auth", "signup"], form).await?;
        Ok(reply.message)
    }

    pub async fn create_skill(&self, skill: &NewSkill) -> Result<Skill, ClientError> {
        let body = serde_json::to_value(skill)
            .map_err(|e| ClientError::Config(format!("failed to encode request: {e}")))?;
        let data: SkillData = self.data(Method::POST, &["api", "skills"], Some(body)).await?;
        Ok(data.skill)
    }

    pub async fn delete_skill(&self, skill_id: &SkillId) -> Result<(), ClientError> {
        self.message(Method::DELETE, &["api", "skills", skill_id.as_str()], None)
            .await
            .map(drop)
    }

    pub async fn enroll_course(&self, course_id: &CourseId) -> Result<String, ClientError> {
        let segments = ["api", "courses", course_id.as_str(), "enroll"];
        self.message(Method::POST, &segments, None).await
    }

    pub async fn update_course_progress(
        &self,
        course_id: &CourseId,
        completed_lessons: u32,
    ) -> Result<u32, ClientError> {
        let segments = ["api", "courses", course_id.as_str(), "progress"];
        let body = json!({ "completed_lessons": completed_lessons });
        let data: ProgressData = self.data(Method::PUT, &segments, Some(body)).await?;
        Ok(data.progress.min(100))
    }

    pub async fn mark_notification_read(&self, id: &NotificationId) -> Result<(), ClientError> {
        let segments = ["api", "notifications", id.as_str(), "read"];
        self.message(Method::PUT, &segments, None).await.map(drop)
    }

    pub async fn mark_all_notifications_read(&self) -> Result<String, ClientError> {
        self.message(Method::PUT, &["api", "notifications", "read-all"], None)
            .await
    }

    pub async fn skills_by_category(&self) -> Result<BTreeMap<String, CategoryStats>, ClientError> {
        let data: CategoriesData = self
            .data(Method::GET, &["api", "stats", "skills-by-category"], None)
            .await?;
        Ok(data.categories)
    }

    pub async fn xp_history(&self, days: u32) -> Result<Vec<XpHistoryEntry>, ClientError> {
        let (endpoint, mut url) = self.url(&["api", "stats", "xp-history"])?;
        url.query_pairs_mut()
            .append_pair("days", &days.to_string());
        let (status, bytes) = self.send(Method::GET, url, None).await?;
        let data: HistoryData = decode_data(&endpoint, status, &bytes)?;
        Ok(data.history)
    }
}
