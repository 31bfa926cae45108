//! Integration tests for the trigger flow.
//!
//! These tests drive `TriggerUpdateHandler` against the in-memory CI server:
//! 1. Check intervals are restored on every processed root
//! 2. Concurrent requests on one root never interleave interval changes
//! 3. Command parsing keeps first-seen order for arbitrary inputs

use async_trait::async_trait;
use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;

use vcs_update::adapters::ci::{InMemoryCiServer, IntervalChange};
use vcs_update::adapters::http::trigger::TriggerParams;
use vcs_update::application::{TriggerSettings, TriggerUpdateCommand, TriggerUpdateHandler};
use vcs_update::domain::foundation::{BuildTypeId, VcsRootId};
use vcs_update::domain::vcs::{BuildConfiguration, CheckInterval, VcsRoot};
use vcs_update::ports::{BuildTypeStore, CiError};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn root_id(id: &str) -> VcsRootId {
    VcsRootId::new(id).unwrap()
}

fn build(id: &str, project: &str) -> BuildConfiguration {
    BuildConfiguration::new(BuildTypeId::new(id).unwrap(), project, id)
}

/// Two roots sharing one configuration, plus a root nobody uses.
async fn seeded_server() -> InMemoryCiServer {
    InMemoryCiServer::new()
        .with_root(
            VcsRoot::new(root_id("App"), "app.git"),
            CheckInterval::Explicit(600),
        )
        .await
        .with_root(VcsRoot::new(root_id("Lib"), "lib.git"), CheckInterval::Default)
        .await
        .with_root(
            VcsRoot::new(root_id("Docs"), "docs.git"),
            CheckInterval::Explicit(60),
        )
        .await
        .with_build_type(build("App_Build", "App"), vec![root_id("App")])
        .await
        .with_build_type(build("App_Deploy", "App").paused(), vec![root_id("App")])
        .await
        .with_build_type(
            build("Integration", "Shared"),
            vec![root_id("App"), root_id("Lib")],
        )
        .await
}

/// Delegates to the in-memory server, sleeping before every forced check
/// so concurrent requests get a chance to interleave.
struct SlowBuildTypes {
    inner: InMemoryCiServer,
}

#[async_trait]
impl BuildTypeStore for SlowBuildTypes {
    async fn find_using_root(&self, root: &VcsRoot) -> Result<Vec<BuildConfiguration>, CiError> {
        self.inner.find_using_root(root).await
    }

    async fn force_check(&self, build: &BuildConfiguration) -> Result<(), CiError> {
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.inner.force_check(build).await
    }
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn processes_roots_and_restores_every_interval() {
    let server = Arc::new(seeded_server().await);
    let handler =
        TriggerUpdateHandler::new(server.clone(), server.clone(), TriggerSettings::default());

    let cmd = TriggerUpdateCommand::new([root_id("App"), root_id("Lib"), root_id("Docs")]);
    let result = handler.handle(cmd).await.unwrap();

    assert_eq!(
        result.triggered_builds,
        vec![
            "App :: App_Build".to_string(),
            "Shared :: Integration".to_string(),
            "Shared :: Integration".to_string(),
        ]
    );
    assert_eq!(
        server.interval_of(&root_id("App")).await,
        Some(CheckInterval::Explicit(600))
    );
    assert_eq!(
        server.interval_of(&root_id("Lib")).await,
        Some(CheckInterval::Default)
    );

    let changes = server.interval_changes().await;
    assert_eq!(
        changes,
        vec![
            IntervalChange {
                root_id: root_id("App"),
                interval: CheckInterval::Explicit(5),
            },
            IntervalChange {
                root_id: root_id("App"),
                interval: CheckInterval::Explicit(600),
            },
            IntervalChange {
                root_id: root_id("Lib"),
                interval: CheckInterval::Explicit(5),
            },
            IntervalChange {
                root_id: root_id("Lib"),
                interval: CheckInterval::Default,
            },
        ]
    );
}

#[tokio::test]
async fn request_parameters_flow_through_to_filter() {
    let server = Arc::new(seeded_server().await);
    let handler =
        TriggerUpdateHandler::new(server.clone(), server.clone(), TriggerSettings::default());

    let cmd = TriggerParams::from_pairs(vec![
        ("id".to_string(), "Lib".to_string()),
        ("id".to_string(), "Unknown".to_string()),
        ("id".to_string(), "App".to_string()),
        ("build".to_string(), "App_Deploy".to_string()),
        ("build".to_string(), "App_Build".to_string()),
    ])
    .into_command();
    let result = handler.handle(cmd).await.unwrap();

    // Paused configurations stay untouched even when named in the filter
    assert_eq!(result.triggered_builds, vec!["App :: App_Build".to_string()]);
    assert_eq!(
        server.forced_checks().await,
        vec![BuildTypeId::new("App_Build").unwrap()]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_on_one_root_do_not_interleave() {
    let server = seeded_server().await;
    let roots = Arc::new(server.clone());
    let builds = Arc::new(SlowBuildTypes {
        inner: server.clone(),
    });
    let handler = Arc::new(TriggerUpdateHandler::new(
        roots,
        builds,
        TriggerSettings::default(),
    ));

    let requests = (0..8).map(|_| {
        let handler = handler.clone();
        tokio::spawn(async move {
            handler
                .handle(TriggerUpdateCommand::new([root_id("App")]))
                .await
        })
    });
    for outcome in futures::future::join_all(requests).await {
        assert!(outcome.unwrap().is_ok());
    }

    assert_eq!(
        server.interval_of(&root_id("App")).await,
        Some(CheckInterval::Explicit(600))
    );

    let changes = server.interval_changes().await;
    assert_eq!(changes.len(), 16);
    for pair in changes.chunks(2) {
        assert_eq!(pair[0].interval, CheckInterval::Explicit(5));
        assert_eq!(pair[1].interval, CheckInterval::Explicit(600));
    }
    assert_eq!(server.forced_checks().await.len(), 16);
}

#[tokio::test]
async fn password_protected_handler_leaves_server_untouched() {
    let server = Arc::new(seeded_server().await);
    let handler = TriggerUpdateHandler::new(
        server.clone(),
        server.clone(),
        TriggerSettings::with_password("hunter2"),
    );

    let result = handler
        .handle(TriggerUpdateCommand::new([root_id("App")]).with_password("hunter3"))
        .await;

    assert!(result.is_err());
    assert!(server.interval_changes().await.is_empty());
    assert!(server.forced_checks().await.is_empty());
}

proptest! {
    #[test]
    fn command_keeps_first_seen_order(ids in proptest::collection::vec("[a-c]{1,2}", 0..12)) {
        let pairs: Vec<(String, String)> =
            ids.iter().map(|id| ("id".to_string(), id.clone())).collect();
        let cmd = TriggerParams::from_pairs(pairs).into_command();

        let mut expected: Vec<String> = Vec::new();
        for id in &ids {
            if !expected.contains(id) {
                expected.push(id.clone());
            }
        }
        let actual: Vec<String> = cmd.root_ids.iter().map(|id| id.to_string()).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn intervals_are_restored_for_any_request(
        picks in proptest::collection::vec(prop_oneof![
            Just("App"), Just("Lib"), Just("Docs"), Just("Missing")
        ], 0..6),
        filter in proptest::option::of(proptest::collection::vec(prop_oneof![
            Just("App_Build"), Just("Integration"), Just("Other")
        ], 0..3)),
    ) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let server = Arc::new(seeded_server().await);
            let handler = TriggerUpdateHandler::new(
                server.clone(),
                server.clone(),
                TriggerSettings::default(),
            );

            let mut cmd = TriggerUpdateCommand::new(picks.iter().map(|id| root_id(id)));
            if let Some(filter) = &filter {
                cmd = cmd
                    .with_build_filter(filter.iter().map(|id| BuildTypeId::new(*id).unwrap()));
            }
            let _ = handler.handle(cmd).await;

            let interval = |id: &'static str| {
                let server = server.clone();
                async move { server.interval_of(&root_id(id)).await }
            };
            assert_eq!(interval("App").await, Some(CheckInterval::Explicit(600)));
            assert_eq!(interval("Lib").await, Some(CheckInterval::Default));
            assert_eq!(interval("Docs").await, Some(CheckInterval::Explicit(60)));
            // Docs has no configurations, so it is never written
            assert!(server
                .interval_changes()
                .await
                .iter()
                .all(|change| change.root_id != root_id("Docs")));
        });
    }
}
