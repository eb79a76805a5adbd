//! Unit tests for daemon bootstrap.

use rstest::rstest;

use crate::bootstrap::{BootstrapError, Collaborators, StaticConfigLoader, bootstrap_with};

use super::support::{
    FailingConfigLoader, HealthEvent, RecordingHealthReporter, TestConfigLoader,
};

#[rstest]
fn bootstrap_reports_success_and_applies_timeout() {
    let loader = TestConfigLoader::tcp().with_timeout_ms(750);
    let reporter = RecordingHealthReporter::default();

    let daemon =
        bootstrap_with(&loader, &reporter, Collaborators::in_memory).expect("bootstrap succeeds");

    assert_eq!(daemon.service().timeout().as_millis(), 750);
    assert_eq!(
        reporter.events(),
        vec![HealthEvent::BootstrapStarting, HealthEvent::BootstrapSucceeded]
    );
}

#[rstest]
fn bootstrap_creates_the_socket_directory() {
    let loader = TestConfigLoader::new();
    let reporter = RecordingHealthReporter::default();

    let daemon =
        bootstrap_with(&loader, &reporter, Collaborators::in_memory).expect("bootstrap succeeds");

    let path = daemon
        .config()
        .daemon_socket()
        .unix_path()
        .expect("unix endpoint");
    assert!(path.parent().is_some_and(|parent| parent.is_dir()));
}

#[rstest]
fn bootstrap_rejects_zero_timeout() {
    let loader = TestConfigLoader::tcp().with_timeout_ms(0);
    let reporter = RecordingHealthReporter::default();

    let error = bootstrap_with(&loader, &reporter, Collaborators::in_memory)
        .expect_err("zero timeout rejected");

    assert!(matches!(error, BootstrapError::InvalidTimeout));
    assert!(matches!(
        reporter.events().last(),
        Some(HealthEvent::BootstrapFailed(_))
    ));
}

#[rstest]
fn bootstrap_surfaces_configuration_errors() {
    let reporter = RecordingHealthReporter::default();

    let error = bootstrap_with(&FailingConfigLoader, &reporter, Collaborators::in_memory)
        .expect_err("configuration rejected");

    assert!(matches!(error, BootstrapError::Configuration { .. }));
    assert_eq!(reporter.events().len(), 2);
}

#[rstest]
fn collaborators_are_built_from_the_loaded_configuration() {
    let loader = TestConfigLoader::tcp().with_execute_users(&["alice"]);
    let reporter = RecordingHealthReporter::default();
    let daemon =
        bootstrap_with(&loader, &reporter, Collaborators::in_memory).expect("bootstrap succeeds");
    let service = daemon.service();

    let created = service
        .create(docgate_types::CreateDocumentRequest {
            name: String::from("plan.yaml"),
            doc: String::from("steps: [1, 2]"),
        })
        .expect("create succeeds");

    let denied = service.execute(docgate_types::ExecuteRequest {
        doc_id: created.id,
        username: String::from("mallory"),
    });
    assert!(denied.is_err());
    let allowed = service
        .execute(docgate_types::ExecuteRequest {
            doc_id: created.id,
            username: String::from("alice"),
        })
        .expect("allow-listed user executes");
    assert_eq!(allowed.executed, serde_json::Value::Bool(true));
}

#[rstest]
fn static_loader_skips_layered_loading() {
    let config = docgate_config::Config {
        daemon_socket: docgate_config::SocketEndpoint::tcp("127.0.0.1", 0),
        request_timeout_ms: 1_250,
        ..docgate_config::Config::default()
    };
    let loader = StaticConfigLoader::new(config.clone());
    let reporter = RecordingHealthReporter::default();

    let daemon =
        bootstrap_with(&loader, &reporter, Collaborators::in_memory).expect("bootstrap succeeds");

    assert_eq!(daemon.config(), &config);
    assert_eq!(daemon.service().timeout().as_millis(), 1_250);
}
