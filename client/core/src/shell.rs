//! Top-level controller
//!
//! The [`Shell`] owns the session store, the API client and the
//! [`AppState`]. It is the only writer of application state: pages read
//! through [`Shell::state`] and [`Shell::page`], and every mutation goes
//! through one of the action methods below.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::auth::{AuthOutcome, LoginForm, RegisterForm};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::models::{Campaign, Event, EventType, Segment};
use crate::pages::{CampaignForm, EventForm, Page, SegmentForm};
use crate::routes::{self, Route};
use crate::session::SessionStore;
use crate::state::{AppState, Notice};

pub struct Shell {
    api: ApiClient,
    session: Arc<dyn SessionStore>,
    state: AppState,
    route: Route,
}

impl Shell {
    pub fn new(config: &ClientConfig, session: Arc<dyn SessionStore>) -> Result<Self> {
        config.validate()?;
        let api = ApiClient::new(config.api_url.clone(), session)?;
        Ok(Self::with_api(api))
    }

    pub fn with_api(api: ApiClient) -> Self {
        let session = api.session().clone();
        let route = routes::resolve(Route::Root, session.is_authenticated());
        Self {
            api,
            session,
            state: AppState::new(),
            route,
        }
    }

    /// Loads the collections when a stored session exists
    pub async fn start(&mut self) {
        if self.is_authenticated() {
            let _ = self.load_all().await;
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn notice(&self) -> &Notice {
        &self.state.notice
    }

    pub fn current_route(&self) -> Route {
        self.route
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// The current page, re-checked against the session
    pub fn page(&self) -> Page {
        let route = routes::resolve(self.route, self.is_authenticated());
        Page::build(route, &self.state)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Clears the notification, applies the guard and renders the target
    pub fn navigate(&mut self, path: &str) -> Result<Page> {
        let route: Route = path.parse()?;
        Ok(self.go(route))
    }

    pub fn go(&mut self, route: Route) -> Page {
        self.state.dismiss();
        let target = routes::resolve(route, self.is_authenticated());
        if target != route {
            tracing::debug!(from = %route, to = %target, "Redirected");
        }
        self.route = target;
        Page::build(target, &self.state)
    }

    pub fn dismiss_notice(&mut self) {
        self.state.dismiss();
    }

    // =========================================================================
    // Data
    // =========================================================================

    /// Fetches all three collections concurrently and swaps them in together.
    /// On any failure the previous collections stay in place and the error is
    /// only logged.
    pub async fn load_all(&mut self) -> Result<()> {
        let api = &self.api;
        let loaded = tokio::try_join!(api.list_segments(), api.list_campaigns(), api.list_events());

        match loaded {
            Ok((segments, campaigns, events)) => {
                tracing::debug!(
                    segments = segments.len(),
                    campaigns = campaigns.len(),
                    events = events.len(),
                    "Collections reloaded"
                );
                self.state.replace_collections(segments, campaigns, events);
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to load data: {}", e);
                Err(e)
            }
        }
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Submits the login form. `Err` only when the token cannot be stored.
    pub async fn login(&mut self, form: &mut LoginForm) -> Result<AuthOutcome> {
        self.state.dismiss();
        let outcome = form.submit(&self.api).await;
        self.settle_auth(&outcome, "Logged in").await?;
        Ok(outcome)
    }

    /// Submits the register form, which logs in on success
    pub async fn register(&mut self, form: &mut RegisterForm) -> Result<AuthOutcome> {
        self.state.dismiss();
        let outcome = form.submit(&self.api).await;
        self.settle_auth(&outcome, "Registered").await?;
        Ok(outcome)
    }

    async fn settle_auth(&mut self, outcome: &AuthOutcome, success: &str) -> Result<()> {
        match outcome {
            AuthOutcome::Authenticated(token) => {
                self.session.set_token(Some(token.clone()))?;
                tracing::info!("{}", success);
                let _ = self.load_all().await;
                self.go(Route::Campaigns);
                self.state.show(Notice::success(success));
            }
            AuthOutcome::Rejected(message) => {
                self.state.show(Notice::error(message.clone()));
            }
        }
        Ok(())
    }

    /// Forgets the token and every collection, then shows the login page
    pub fn logout(&mut self) -> Result<()> {
        self.session.clear()?;
        self.state.reset_collections();
        self.go(Route::Login);
        tracing::info!("Logged out");
        Ok(())
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub async fn create_segment(&mut self, form: &mut SegmentForm) -> Result<Segment> {
        let params = self.checked(|| form.take())?;
        let result = self.api.create_segment(&params).await;
        self.settle(result, "Segment created").await
    }

    pub async fn create_campaign(&mut self, form: &mut CampaignForm) -> Result<Campaign> {
        let params = self.checked(|| form.take())?;
        let result = self.api.create_campaign(&params).await;
        self.settle(result, "Campaign created").await
    }

    /// Launch is only offered for drafts; ids missing from the local snapshot
    /// are left for the server to judge.
    pub async fn launch_campaign(&mut self, campaign_id: i64) -> Result<Campaign> {
        self.checked(|| Ok(()))?;
        if let Some(campaign) = self.state.campaign(campaign_id) {
            if !campaign.can_launch() {
                let err = ClientError::Validation(format!(
                    "campaign {} is {}, only drafts can be launched",
                    campaign_id, campaign.status
                ));
                return Err(self.fail(err));
            }
        }
        let result = self.api.launch_campaign(campaign_id).await;
        self.settle(result, "Campaign launched").await
    }

    pub async fn record_event(&mut self, form: &EventForm, event_type: EventType) -> Result<Event> {
        let (campaign_id, params) = self.checked(|| form.event(event_type))?;
        let result = self.api.record_event(campaign_id, &params).await;
        self.settle(result, "Event recorded").await
    }

    /// Requires a session, then runs local validation; failures become an
    /// error notification
    fn checked<T>(&mut self, validate: impl FnOnce() -> Result<T>) -> Result<T> {
        if !self.is_authenticated() {
            return Err(self.fail(ClientError::Unauthenticated));
        }
        validate().map_err(|e| self.fail(e))
    }

    /// Reloads and announces only when the mutation succeeded
    async fn settle<T>(&mut self, result: Result<T>, success: &str) -> Result<T> {
        match result {
            Ok(value) => {
                tracing::info!("{}", success);
                let _ = self.load_all().await;
                self.state.show(Notice::success(success));
                Ok(value)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn fail(&mut self, err: ClientError) -> ClientError {
        tracing::warn!("Action failed: {}", err);
        let message = match &err {
            ClientError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        };
        self.state.show(Notice::error(message));
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;
    use crate::state::Severity;
    use serde_json::{json, Value};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn shell(server: &MockServer, token: Option<&str>) -> (Shell, Arc<dyn SessionStore>) {
        let session: Arc<dyn SessionStore> = match token {
            Some(t) => Arc::new(MemorySessionStore::with_token(t)),
            None => Arc::new(MemorySessionStore::new()),
        };
        let api = ApiClient::new(server.uri(), session.clone()).unwrap();
        (Shell::with_api(api), session)
    }

    fn segment(id: i64, name: &str) -> Value {
        json!({"id": id, "name": name, "criteria": "age > 25", "created_at": "2024-01-01T00:00:00"})
    }

    fn campaign(id: i64, status: &str) -> Value {
        json!({
            "id": id, "name": format!("Campaign {id}"), "channel": "email", "segment_id": 1,
            "status": status, "schedule": null, "created_at": "2024-01-01T00:00:00"
        })
    }

    fn event(id: i64, campaign_id: i64, event_type: &str) -> Value {
        json!({
            "id": id, "campaign_id": campaign_id, "event_type": event_type,
            "occurred_at": "2024-01-02T00:00:00", "event_metadata": null
        })
    }

    async fn mount_list(server: &MockServer, route: &str, body: Value, times: u64) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(times)
            .mount(server)
            .await;
    }

    async fn mount_lists(server: &MockServer, times: u64) {
        mount_list(server, "/marketing/segments", json!([segment(1, "US adults")]), times).await;
        mount_list(server, "/marketing/campaigns", json!([campaign(1, "draft"), campaign(2, "launched")]), times).await;
        mount_list(
            server,
            "/marketing/events",
            json!([event(1, 1, "view"), event(2, 1, "view"), event(3, 1, "click")]),
            times,
        )
        .await;
    }

    #[tokio::test]
    async fn test_protected_pages_redirect_without_token() {
        let server = MockServer::start().await;
        let (mut shell, _) = shell(&server, None);
        assert_eq!(shell.current_route(), Route::Login);

        for path in ["/segments", "/campaigns", "/analytics", "/"] {
            let page = shell.navigate(path).unwrap();
            assert_eq!(page, Page::Login);
            assert_eq!(shell.current_route(), Route::Login);
        }
        assert_eq!(shell.navigate("/register").unwrap(), Page::Register);
    }

    #[tokio::test]
    async fn test_navigation_clears_notice() {
        let server = MockServer::start().await;
        let (mut shell, _) = shell(&server, Some("tok"));

        shell.state.show(Notice::success("Segment created"));
        shell.navigate("/analytics").unwrap();
        assert!(!shell.notice().is_visible());

        shell.state.show(Notice::error("boom"));
        shell.dismiss_notice();
        assert!(!shell.notice().is_visible());
    }

    #[tokio::test]
    async fn test_start_loads_collections() {
        let server = MockServer::start().await;
        mount_lists(&server, 1).await;
        let (mut shell, _) = shell(&server, Some("tok"));

        shell.start().await;
        assert_eq!(shell.state().segments.len(), 1);
        assert_eq!(shell.state().campaigns.len(), 2);

        match shell.navigate("/analytics").unwrap() {
            Page::Analytics(page) => {
                assert_eq!(page.stats[0].views, 2);
                assert_eq!(page.stats[0].clicks, 1);
                assert_eq!(page.stats[0].ctr, 50.0);
                assert_eq!(page.totals.revenue, 10);
            }
            other => panic!("unexpected page {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_start_without_token_fetches_nothing() {
        let server = MockServer::start().await;
        mount_lists(&server, 0).await;
        let (mut shell, _) = shell(&server, None);
        shell.start().await;
        assert!(shell.state().campaigns.is_empty());
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_stale_collections() {
        let server = MockServer::start().await;
        mount_lists(&server, 1).await;
        let (mut shell, _) = shell(&server, Some("tok"));
        shell.load_all().await.unwrap();
        let before = shell.state().clone();

        server.reset().await;
        for route in ["/marketing/segments", "/marketing/campaigns"] {
            Mock::given(method("GET"))
                .and(path(route))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
                .mount(&server)
                .await;
        }
        Mock::given(method("GET"))
            .and(path("/marketing/events"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        assert!(shell.load_all().await.is_err());
        assert_eq!(shell.state(), &before);
        assert!(!shell.notice().is_visible());
    }

    #[tokio::test]
    async fn test_login_stores_token_and_loads() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok-new"})))
            .expect(1)
            .mount(&server)
            .await;
        mount_lists(&server, 1).await;
        let (mut shell, session) = shell(&server, None);

        let mut form = LoginForm::new("ann@example.com", "s3cret");
        let outcome = shell.login(&mut form).await.unwrap();

        assert_eq!(outcome.token(), Some("tok-new"));
        assert_eq!(session.token().as_deref(), Some("tok-new"));
        assert_eq!(shell.current_route(), Route::Campaigns);
        assert_eq!(shell.state().campaigns.len(), 2);
        assert_eq!(shell.notice(), &Notice::success("Logged in"));
    }

    #[tokio::test]
    async fn test_register_logs_in_and_lands_on_campaigns() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"id": 1, "email": "ann@example.com"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok-reg"})))
            .expect(1)
            .mount(&server)
            .await;
        mount_lists(&server, 1).await;
        let (mut shell, session) = shell(&server, None);

        let mut form = RegisterForm::new("ann@example.com", "s3cret");
        let outcome = shell.register(&mut form).await.unwrap();

        assert_eq!(outcome.token(), Some("tok-reg"));
        assert_eq!(session.token().as_deref(), Some("tok-reg"));
        assert_eq!(shell.current_route(), Route::Campaigns);
        assert_eq!(shell.state().segments.len(), 1);
        assert_eq!(shell.notice(), &Notice::success("Registered"));
        server.verify().await;
    }

    #[tokio::test]
    async fn test_rejected_register_stays_logged_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"detail": "Email already registered"})),
            )
            .mount(&server)
            .await;
        mount_lists(&server, 0).await;
        let (mut shell, session) = shell(&server, None);

        let outcome = shell
            .register(&mut RegisterForm::new("ann@example.com", "s3cret"))
            .await
            .unwrap();
        assert_eq!(outcome, AuthOutcome::Rejected("Email already registered".into()));
        assert_eq!(session.token(), None);
        assert_eq!(shell.notice(), &Notice::error("Email already registered"));
        assert_eq!(shell.current_route(), Route::Login);
    }

    #[tokio::test]
    async fn test_rejected_login_shows_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;
        mount_lists(&server, 0).await;
        let (mut shell, session) = shell(&server, None);

        let outcome = shell.login(&mut LoginForm::new("ann@example.com", "nope")).await.unwrap();
        assert!(matches!(outcome, AuthOutcome::Rejected(ref m) if !m.is_empty()));
        assert_eq!(session.token(), None);
        assert_eq!(shell.notice().severity, Severity::Error);
        assert!(shell.notice().is_visible());
        assert_eq!(shell.current_route(), Route::Login);
    }

    #[tokio::test]
    async fn test_create_segment_reloads_and_announces() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/marketing/segments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(segment(1, "US adults")))
            .expect(1)
            .mount(&server)
            .await;
        mount_lists(&server, 1).await;
        let (mut shell, _) = shell(&server, Some("tok"));

        let mut form = SegmentForm::new("US adults", "age > 25");
        let created = shell.create_segment(&mut form).await.unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(form, SegmentForm::default());
        assert_eq!(shell.state().segments.len(), 1);
        assert_eq!(shell.notice(), &Notice::success("Segment created"));
    }

    #[tokio::test]
    async fn test_failed_mutation_skips_reload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/marketing/campaigns"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"detail": "segment_id is required"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        mount_lists(&server, 0).await;
        let (mut shell, _) = shell(&server, Some("tok"));

        let mut form = CampaignForm {
            name: "Spring".into(),
            channel: "email".into(),
            segment_id: Some(99),
            schedule: String::new(),
        };
        let err = shell.create_campaign(&mut form).await.unwrap_err();

        assert_eq!(err.status(), Some(400));
        assert_eq!(shell.notice(), &Notice::error("segment_id is required"));
    }

    #[tokio::test]
    async fn test_mutation_requires_session() {
        let server = MockServer::start().await;
        let (mut shell, _) = shell(&server, None);
        let err = shell
            .record_event(&EventForm::for_campaign(1), EventType::View)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Unauthenticated));
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn test_launch_only_drafts() {
        let server = MockServer::start().await;
        mount_lists(&server, 2).await;
        Mock::given(method("POST"))
            .and(path("/marketing/campaigns/1/launch"))
            .respond_with(ResponseTemplate::new(200).set_body_json(campaign(1, "launched")))
            .expect(1)
            .mount(&server)
            .await;
        let (mut shell, _) = shell(&server, Some("tok"));
        shell.load_all().await.unwrap();

        let err = shell.launch_campaign(2).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));

        let launched = shell.launch_campaign(1).await.unwrap();
        assert!(!launched.can_launch());
        assert_eq!(shell.notice(), &Notice::success("Campaign launched"));
    }

    #[tokio::test]
    async fn test_record_event() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/marketing/campaigns/1/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(event(4, 1, "click")))
            .expect(1)
            .mount(&server)
            .await;
        mount_lists(&server, 1).await;
        let (mut shell, _) = shell(&server, Some("tok"));

        let recorded = shell
            .record_event(&EventForm::for_campaign(1), EventType::Click)
            .await
            .unwrap();
        assert_eq!(recorded.event_type, EventType::Click);
        assert_eq!(shell.notice(), &Notice::success("Event recorded"));
    }

    #[tokio::test]
    async fn test_logout_resets_everything() {
        let server = MockServer::start().await;
        mount_lists(&server, 1).await;
        let (mut shell, session) = shell(&server, Some("tok"));
        shell.start().await;
        assert!(!shell.state().events.is_empty());

        shell.logout().unwrap();
        assert_eq!(session.token(), None);
        assert!(shell.state().segments.is_empty());
        assert!(shell.state().campaigns.is_empty());
        assert!(shell.state().events.is_empty());
        assert_eq!(shell.page(), Page::Login);
    }
}
