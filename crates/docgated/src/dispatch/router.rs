//! Static route table binding wire names to service operations.
//!
//! Each entry decodes the route body into its typed request, invokes the
//! matching [`DocumentService`] operation and encodes the typed response.
//! Routes are matched case-insensitively; anything outside the table is
//! rejected.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use docgate_types::{CREATE_ROUTE, EXECUTE_ROUTE, LIST_ROUTE};

use crate::service::{DocumentService, ServiceError};

use super::errors::DispatchError;

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

type RouteHandler = fn(&DocumentService, &'static str, Value) -> Result<Value, DispatchError>;

/// A registered route and the function serving it.
pub struct RouteEntry {
    /// Canonical route name.
    pub route: &'static str,
    handler: RouteHandler,
}

/// Every route the daemon serves.
pub static ROUTES: &[RouteEntry] = &[
    RouteEntry {
        route: CREATE_ROUTE,
        handler: create,
    },
    RouteEntry {
        route: LIST_ROUTE,
        handler: list,
    },
    RouteEntry {
        route: EXECUTE_ROUTE,
        handler: execute,
    },
];

fn create(
    service: &DocumentService,
    route: &'static str,
    body: Value,
) -> Result<Value, DispatchError> {
    bind(route, body, |request| service.create(request))
}

fn list(
    service: &DocumentService,
    route: &'static str,
    body: Value,
) -> Result<Value, DispatchError> {
    bind(route, body, |request| service.list(request))
}

fn execute(
    service: &DocumentService,
    route: &'static str,
    body: Value,
) -> Result<Value, DispatchError> {
    bind(route, body, |request| service.execute(request))
}

fn bind<Req, Resp>(
    route: &'static str,
    body: Value,
    operation: impl FnOnce(Req) -> Result<Resp, ServiceError>,
) -> Result<Value, DispatchError>
where
    Req: DeserializeOwned,
    Resp: Serialize,
{
    let request =
        serde_json::from_value(body).map_err(|error| DispatchError::invalid_request(route, error))?;
    let response = operation(request)?;
    serde_json::to_value(response).map_err(DispatchError::SerializeResponse)
}

/// Routes request bodies to service operations.
#[derive(Debug, Clone)]
pub struct RouteTable {
    service: DocumentService,
}

impl RouteTable {
    /// Creates a table serving routes with `service`.
    pub const fn new(service: DocumentService) -> Self {
        Self { service }
    }

    /// Resolves `route` to its table entry.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::UnknownRoute` when no entry matches.
    pub fn resolve(route: &str) -> Result<&'static RouteEntry, DispatchError> {
        ROUTES
            .iter()
            .find(|entry| entry.route.eq_ignore_ascii_case(route))
            .ok_or_else(|| DispatchError::unknown_route(route))
    }

    /// Dispatches `body` to the operation registered under `route`.
    ///
    /// # Errors
    ///
    /// Returns protocol errors for unknown routes or undecodable bodies and
    /// forwards operation failures as `DispatchError::Service`.
    pub fn route(&self, route: &str, body: Value) -> Result<Value, DispatchError> {
        let entry = Self::resolve(route)?;
        (entry.handler)(&self.service, entry.route, body)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use rstest::{fixture, rstest};
    use serde_json::json;

    use crate::manager::{ExecutePolicy, InMemoryManager};
    use crate::parser::FormatParser;
    use crate::token::DigestTokenIssuer;

    use super::*;

    #[fixture]
    fn table() -> RouteTable {
        RouteTable::new(DocumentService::new(
            Arc::new(InMemoryManager::new(ExecutePolicy::AnyNamedUser)),
            Arc::new(FormatParser::new()),
            Arc::new(DigestTokenIssuer::keyed([1; 16])),
            Duration::from_secs(5),
        ))
    }

    #[rstest]
    #[case("/docs/create")]
    #[case("/DOCS/List")]
    #[case("/docs/EXECUTE")]
    fn resolves_routes_case_insensitively(#[case] route: &str) {
        let entry = RouteTable::resolve(route).expect("route resolves");
        assert!(entry.route.eq_ignore_ascii_case(route));
    }

    #[rstest]
    #[case("/docs/delete")]
    #[case("docs/create")]
    #[case("/docs")]
    fn rejects_unknown_routes(#[case] route: &str) {
        assert!(matches!(
            RouteTable::resolve(route),
            Err(DispatchError::UnknownRoute { .. })
        ));
    }

    #[rstest]
    fn create_then_list_round_trips_through_the_table(table: RouteTable) {
        let created = table
            .route(
                "/docs/create",
                json!({"name": "notes.txt", "doc": "remember the milk"}),
            )
            .expect("create succeeds");
        assert_eq!(created.get("id"), Some(&json!(1)));

        let listed = table
            .route("/docs/list", json!({"limit": 10, "offset": 0}))
            .expect("list succeeds");
        assert_eq!(
            listed,
            json!({"docs": [{"id": 1, "name": "notes.txt", "kind": "text"}]})
        );
    }

    #[rstest]
    fn undecodable_body_is_an_invalid_request(table: RouteTable) {
        let error = table
            .route("/docs/list", json!({"limit": "ten"}))
            .expect_err("body rejected");
        assert!(matches!(
            error,
            DispatchError::InvalidRequest { route: "/docs/list", .. }
        ));
    }

    #[rstest]
    fn execute_uses_camel_case_identifier(table: RouteTable) {
        table
            .route("/docs/create", json!({"name": "a.txt", "doc": "x"}))
            .expect("create succeeds");
        let executed = table
            .route("/docs/execute", json!({"docId": 1, "username": "alice"}))
            .expect("execute succeeds");
        assert_eq!(executed, json!({"executed": true}));
    }
}
