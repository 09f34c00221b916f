//! The single GraphQL route: executes documents and serves GraphiQL.
//!
//! Every error in a response is rewritten into `{message, locations, stack,
//! path}`. Errors that originate from an `anyhow::Error` carry its full
//! report (cause chain and captured backtrace) as the stack.

use std::sync::Arc;

use async_graphql::{
    PathSegment, Pos, ServerError, Value,
    http::{GraphiQLSource, parse_query_string},
    parser::{
        parse_query,
        types::{DocumentOperations, OperationType},
    },
};
use async_graphql_axum::GraphQLRequest;
use axum::{
    Json, Router,
    extract::{RawQuery, State},
    http::StatusCode,
    response::{self, IntoResponse, Response},
    routing::get,
};
use serde::Serialize;

use crate::resolver::VideoSchema;

#[derive(Clone)]
struct AppState {
    schema: VideoSchema,
    endpoint: Arc<str>,
    graphiql: bool,
}

#[derive(Debug, Serialize)]
pub struct FormattedError {
    pub message: String,
    pub locations: Vec<Pos>,
    pub stack: Vec<String>,
    pub path: Vec<PathSegment>,
}

impl FormattedError {
    fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            stack: vec![format!("Error: {message}")],
            message,
            locations: vec![],
            path: vec![],
        }
    }
}

impl From<ServerError> for FormattedError {
    fn from(error: ServerError) -> Self {
        let stack = match error.source::<anyhow::Error>() {
            Some(source) => format!("{source:?}").lines().map(str::to_owned).collect(),
            None => vec![format!("Error: {}", error.message)],
        };
        Self {
            message: error.message,
            locations: error.locations,
            stack,
            path: error.path,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FormattedResponse {
    pub data: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FormattedError>,
}

impl From<async_graphql::Response> for FormattedResponse {
    fn from(response: async_graphql::Response) -> Self {
        Self {
            data: response.data,
            errors: response.errors.into_iter().map(Into::into).collect(),
        }
    }
}

pub fn router(schema: VideoSchema, endpoint: &str, graphiql: bool) -> Router {
    tracing::debug!("Mounting GraphQL endpoint at {}", endpoint);
    let state = AppState {
        schema,
        endpoint: endpoint.into(),
        graphiql,
    };
    Router::new()
        .route(endpoint, get(graphql_get).post(graphql_post))
        .with_state(state)
}

async fn graphql_post(State(state): State<AppState>, request: GraphQLRequest) -> Response {
    execute(&state.schema, request.into_inner()).await
}

async fn graphql_get(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    let Some(query) = query.filter(|q| !q.is_empty()) else {
        if state.graphiql {
            return response::Html(GraphiQLSource::build().endpoint(&state.endpoint).finish())
                .into_response();
        }
        return error_response(StatusCode::BAD_REQUEST, "Must provide query string.");
    };

    let request = match parse_query_string(&query) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!("Rejecting malformed GET request: {}", e);
            return error_response(StatusCode::BAD_REQUEST, e.to_string());
        }
    };
    if is_mutation(&request) {
        return error_response(
            StatusCode::METHOD_NOT_ALLOWED,
            "Can only perform a mutation operation from a POST request.",
        );
    }
    execute(&state.schema, request).await
}

async fn execute(schema: &VideoSchema, request: async_graphql::Request) -> Response {
    let response = schema.execute(request).await;
    // No data at all means the document was rejected before execution.
    let status = if response.is_err() && response.data == Value::Null {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    };
    for error in &response.errors {
        tracing::debug!("GraphQL error: {}", error.message);
    }
    (status, Json(FormattedResponse::from(response))).into_response()
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = FormattedResponse {
        data: Value::Null,
        errors: vec![FormattedError::from_message(message)],
    };
    (status, Json(body)).into_response()
}

// Documents that fail to parse are left to the executor so they get the
// regular syntax error.
fn is_mutation(request: &async_graphql::Request) -> bool {
    let Ok(document) = parse_query(&request.query) else {
        return false;
    };
    let operation = match (&document.operations, request.operation_name.as_deref()) {
        (DocumentOperations::Single(operation), _) => Some(operation),
        (DocumentOperations::Multiple(operations), Some(name)) => operations.get(name),
        (DocumentOperations::Multiple(_), None) => None,
    };
    operation.is_some_and(|operation| operation.node.ty == OperationType::Mutation)
}
