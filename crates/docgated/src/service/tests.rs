//! Unit tests for the document service against a mocked manager.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use mockall::{mock, predicate::eq};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use docgate_types::{
    CreateDocumentRequest, DocumentId, DocumentKind, DocumentSummary, ErrorCode, ExecuteRequest,
    ListDocumentsRequest,
};

use super::*;
use crate::document::DocumentProjection;
use crate::manager::ManagerError;
use crate::parser::{FormatParser, ParseError};
use crate::token::DigestTokenIssuer;

mock! {
    pub Manager {}

    impl DocumentManager for Manager {
        fn create(
            &self,
            context: &RequestContext,
            document: DocumentProjection,
        ) -> Result<DocumentId, ManagerError>;

        fn list(
            &self,
            context: &RequestContext,
            window: PagingWindow,
        ) -> Result<Vec<DocumentSummary>, ManagerError>;

        fn execute_for_user(
            &self,
            context: &RequestContext,
            doc_id: DocumentId,
            username: &str,
        ) -> Result<Value, ManagerError>;
    }
}

const KEY: [u8; 16] = [7; 16];

#[fixture]
fn manager() -> MockManager {
    MockManager::new()
}

fn service_with(manager: MockManager, timeout: Duration) -> DocumentService {
    DocumentService::new(
        Arc::new(manager),
        Arc::new(FormatParser::new()),
        Arc::new(DigestTokenIssuer::keyed(KEY)),
        timeout,
    )
}

fn service(manager: MockManager) -> DocumentService {
    service_with(manager, Duration::from_secs(5))
}

fn summary(id: i64, name: &str) -> DocumentSummary {
    DocumentSummary {
        id: DocumentId::new(id),
        name: name.to_owned(),
        kind: DocumentKind::Text,
    }
}

#[rstest]
fn create_returns_manager_id_and_minted_token(mut manager: MockManager) {
    let stored: Arc<Mutex<Option<DocumentProjection>>> = Arc::default();
    let captured = Arc::clone(&stored);
    manager
        .expect_create()
        .times(1)
        .withf(|_, document| document.name == "report.docx")
        .returning(move |_, document| {
            *captured.lock().expect("capture lock") = Some(document);
            Ok(DocumentId::new(1))
        });

    let response = service(manager)
        .create(CreateDocumentRequest {
            name: String::from("report.docx"),
            doc: String::from("quarterly figures"),
        })
        .expect("create succeeds");

    assert_eq!(response.id, DocumentId::new(1));
    assert!(!response.token.is_empty());
    let stored = stored
        .lock()
        .expect("capture lock")
        .clone()
        .expect("manager saw the projection");
    assert_eq!(stored.token.as_deref(), Some(response.token.as_str()));
    assert_eq!(stored.content, "quarterly figures");
}

#[rstest]
fn create_stops_at_parse_failure(mut manager: MockManager) {
    manager.expect_create().never();

    let error = service(manager)
        .create(CreateDocumentRequest {
            name: String::from("config.json"),
            doc: String::from("{not json"),
        })
        .expect_err("parse failure");

    assert!(matches!(error, ServiceError::Parse(ParseError::Json { .. })));
    assert_eq!(error.code(), ErrorCode::Parse);
}

#[rstest]
fn create_surfaces_storage_failure(mut manager: MockManager) {
    manager
        .expect_create()
        .times(1)
        .returning(|_, _| Err(ManagerError::storage("disk full")));

    let error = service(manager)
        .create(CreateDocumentRequest {
            name: String::from("notes.txt"),
            doc: String::from("hello"),
        })
        .expect_err("storage failure");

    assert!(matches!(
        error,
        ServiceError::Manager(ManagerError::Storage { ref message }) if message == "disk full"
    ));
}

#[rstest]
#[case(0, 0)]
#[case(101, 0)]
#[case(10, -1)]
#[case(-5, 3)]
fn list_rejects_window_without_contacting_manager(
    mut manager: MockManager,
    #[case] limit: i64,
    #[case] offset: i64,
) {
    manager.expect_list().never();

    let error = service(manager)
        .list(ListDocumentsRequest { limit, offset })
        .expect_err("validation failure");

    assert!(matches!(error, ServiceError::Validation(_)));
    assert_eq!(error.code(), ErrorCode::Validation);
}

#[rstest]
fn list_forwards_window_and_returns_summaries_unmodified(mut manager: MockManager) {
    let summaries = vec![
        summary(6, "f.txt"),
        summary(7, "g.json"),
        summary(8, "h.yaml"),
    ];
    let returned = summaries.clone();
    let window = PagingWindow::new(10, 5).expect("valid window");
    manager
        .expect_list()
        .with(mockall::predicate::always(), eq(window))
        .times(1)
        .returning(move |_, _| Ok(returned.clone()));

    let response = service(manager)
        .list(ListDocumentsRequest {
            limit: 10,
            offset: 5,
        })
        .expect("list succeeds");

    assert_eq!(response.docs, summaries);
}

#[rstest]
#[case(1)]
#[case(100)]
fn list_accepts_inclusive_limit_bounds(mut manager: MockManager, #[case] limit: i64) {
    manager.expect_list().times(1).returning(|_, _| Ok(Vec::new()));

    let response = service(manager)
        .list(ListDocumentsRequest { limit, offset: 0 })
        .expect("boundary limit accepted");

    assert!(response.docs.is_empty());
}

#[rstest]
fn execute_forwards_identifier_and_user(mut manager: MockManager) {
    manager
        .expect_execute_for_user()
        .withf(|_, doc_id, username| *doc_id == DocumentId::new(1) && username == "alice")
        .times(1)
        .returning(|_, _, _| Ok(Value::Bool(true)));

    let response = service(manager)
        .execute(ExecuteRequest {
            doc_id: DocumentId::new(1),
            username: String::from("alice"),
        })
        .expect("execute succeeds");

    assert_eq!(response.executed, json!(true));
}

#[rstest]
#[case(
    ManagerError::NotFound { doc_id: DocumentId::new(999) },
    ErrorCode::NotFound
)]
#[case(
    ManagerError::Unauthorized { doc_id: DocumentId::new(999), username: String::from("alice") },
    ErrorCode::Unauthorized
)]
#[case(
    ManagerError::Execution { doc_id: DocumentId::new(999), message: String::from("boom") },
    ErrorCode::Execution
)]
fn execute_surfaces_manager_failures_unchanged(
    mut manager: MockManager,
    #[case] failure: ManagerError,
    #[case] code: ErrorCode,
) {
    let returned = failure.clone();
    manager
        .expect_execute_for_user()
        .times(1)
        .returning(move |_, _, _| Err(returned.clone()));

    let error = service(manager)
        .execute(ExecuteRequest {
            doc_id: DocumentId::new(999),
            username: String::from("alice"),
        })
        .expect_err("manager failure");

    assert!(matches!(error, ServiceError::Manager(ref inner) if *inner == failure));
    assert_eq!(error.code(), code);
}

const SLOW_REPLY: Duration = Duration::from_millis(500);
const TIGHT_BUDGET: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy)]
enum Operation {
    Create,
    List,
    Execute,
}

fn expect_slow(manager: &mut MockManager, operation: Operation) {
    match operation {
        Operation::Create => {
            manager.expect_create().times(1).returning(|_, _| {
                thread::sleep(SLOW_REPLY);
                Ok(DocumentId::new(1))
            });
        }
        Operation::List => {
            manager.expect_list().times(1).returning(|_, _| {
                thread::sleep(SLOW_REPLY);
                Ok(Vec::new())
            });
        }
        Operation::Execute => {
            manager.expect_execute_for_user().times(1).returning(|_, _, _| {
                thread::sleep(SLOW_REPLY);
                Ok(Value::Bool(true))
            });
        }
    }
}

fn invoke(service: &DocumentService, operation: Operation) -> Result<(), ServiceError> {
    match operation {
        Operation::Create => service
            .create(CreateDocumentRequest {
                name: String::from("report.docx"),
                doc: String::from("quarterly figures"),
            })
            .map(drop),
        Operation::List => service
            .list(ListDocumentsRequest {
                limit: 10,
                offset: 0,
            })
            .map(drop),
        Operation::Execute => service
            .execute(ExecuteRequest {
                doc_id: DocumentId::new(1),
                username: String::from("alice"),
            })
            .map(drop),
    }
}

#[rstest]
#[case::create(Operation::Create)]
#[case::list(Operation::List)]
#[case::execute(Operation::Execute)]
fn slow_manager_times_out(mut manager: MockManager, #[case] operation: Operation) {
    expect_slow(&mut manager, operation);
    let service = service_with(manager, TIGHT_BUDGET);

    let started = Instant::now();
    let outcome = invoke(&service, operation);

    assert!(
        matches!(outcome, Err(ServiceError::Timeout { timeout }) if timeout == TIGHT_BUDGET),
        "{operation:?} returned {outcome:?}"
    );
    assert!(started.elapsed() < SLOW_REPLY - Duration::from_millis(50));
}

#[rstest]
fn timed_out_create_returns_no_identifier_or_token(mut manager: MockManager) {
    expect_slow(&mut manager, Operation::Create);

    let outcome = service_with(manager, TIGHT_BUDGET).create(CreateDocumentRequest {
        name: String::from("report.docx"),
        doc: String::from("quarterly figures"),
    });

    let error = match outcome {
        Ok(response) => panic!("create succeeded after the deadline: {response:?}"),
        Err(error) => error,
    };
    assert!(matches!(error, ServiceError::Timeout { .. }));
    assert_eq!(error.code(), ErrorCode::Timeout);
}

#[rstest]
fn manager_sees_the_configured_budget(mut manager: MockManager) {
    manager
        .expect_execute_for_user()
        .withf(|context, _, _| {
            context.timeout() == Duration::from_secs(2) && !context.is_cancelled()
        })
        .times(1)
        .returning(|_, _, _| Ok(Value::Null));

    service_with(manager, Duration::from_secs(2))
        .execute(ExecuteRequest {
            doc_id: DocumentId::new(3),
            username: String::from("bob"),
        })
        .expect("execute succeeds");
}
