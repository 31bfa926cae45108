//! HTTP routes for the VCS update endpoint.

use axum::{routing::any, Router};

use super::handlers::{trigger_update, TriggerAppState};

/// Creates the router serving the trigger endpoint at `path`.
pub fn trigger_routes(path: &str, state: TriggerAppState) -> Router {
    Router::new()
        .route(path, any(trigger_update))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ci::InMemoryCiServer;
    use crate::adapters::http::trigger::TriggerViews;
    use crate::application::{TriggerSettings, TriggerUpdateHandler};
    use crate::domain::foundation::{BuildTypeId, VcsRootId};
    use crate::domain::vcs::{BuildConfiguration, CheckInterval, VcsRoot};
    use crate::ports::{BuildTypeStore, CiError, VcsRootStore};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn seeded_server() -> InMemoryCiServer {
        let r1 = VcsRootId::new("R1").unwrap();
        InMemoryCiServer::new()
            .with_root(VcsRoot::new(r1.clone(), "Main repo"), CheckInterval::Explicit(60))
            .await
            .with_build_type(
                BuildConfiguration::new(BuildTypeId::new("P_A").unwrap(), "P", "A"),
                vec![r1.clone()],
            )
            .await
            .with_build_type(
                BuildConfiguration::new(BuildTypeId::new("P_B").unwrap(), "P", "B").paused(),
                vec![r1],
            )
            .await
    }

    fn app(
        roots: Arc<dyn VcsRootStore>,
        builds: Arc<dyn BuildTypeStore>,
        settings: TriggerSettings,
    ) -> Router {
        let handler = Arc::new(TriggerUpdateHandler::new(roots, builds, settings));
        let views = TriggerViews {
            view_name: "failure.jsp".to_string(),
            done_view_name: "done.jsp".to_string(),
        };
        trigger_routes("/vcsupdate", TriggerAppState::new(handler, views))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn triggers_builds_and_renders_done_view() {
        let server = Arc::new(seeded_server().await);
        let app = app(server.clone(), server.clone(), TriggerSettings::default());

        let response = app.oneshot(get("/vcsupdate?id=R1")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["view"], "done.jsp");
        assert_eq!(json["updatedVCSBuilds"], "[P :: A]");
        assert_eq!(
            server.forced_checks().await,
            vec![BuildTypeId::new("P_A").unwrap()]
        );
    }

    #[tokio::test]
    async fn accepts_post() {
        let server = Arc::new(seeded_server().await);
        let app = app(server.clone(), server, TriggerSettings::default());

        let request = Request::builder()
            .method(Method::POST)
            .uri("/vcsupdate?id=R1&build=P_A")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn wrong_password_renders_failure_view() {
        let server = Arc::new(seeded_server().await);
        let app = app(
            server.clone(),
            server.clone(),
            TriggerSettings::with_password("s3cret"),
        );

        let response = app
            .oneshot(get("/vcsupdate?id=R1&pass=nope"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["view"], "failure.jsp");
        assert!(server.forced_checks().await.is_empty());
    }

    #[tokio::test]
    async fn unknown_roots_render_failure_view() {
        let server = Arc::new(seeded_server().await);
        let app = app(server.clone(), server, TriggerSettings::default());

        let response = app.oneshot(get("/vcsupdate?id=nope")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["view"], "failure.jsp");
    }

    #[tokio::test]
    async fn missing_query_renders_failure_view() {
        let server = Arc::new(seeded_server().await);
        let app = app(server.clone(), server, TriggerSettings::default());

        let response = app.oneshot(get("/vcsupdate")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    struct UnavailableCiServer;

    #[async_trait]
    impl VcsRootStore for UnavailableCiServer {
        async fn find_by_external_id(&self, _id: &VcsRootId) -> Result<Option<VcsRoot>, CiError> {
            Err(CiError::unavailable("maintenance"))
        }

        async fn check_interval(&self, _root: &VcsRoot) -> Result<CheckInterval, CiError> {
            Err(CiError::unavailable("maintenance"))
        }

        async fn set_check_interval(
            &self,
            _root: &VcsRoot,
            _interval: CheckInterval,
        ) -> Result<(), CiError> {
            Err(CiError::unavailable("maintenance"))
        }
    }

    #[tokio::test]
    async fn ci_failure_is_opaque_500() {
        let builds = Arc::new(InMemoryCiServer::new());
        let app = app(
            Arc::new(UnavailableCiServer),
            builds,
            TriggerSettings::default(),
        );

        let response = app.oneshot(get("/vcsupdate?id=R1")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["code"], "INTERNAL_ERROR");
        assert!(!json.to_string().contains("maintenance"));
    }
}
