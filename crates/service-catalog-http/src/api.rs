// crates/service-catalog-http/src/api.rs
// ============================================================================
// Module: Service Catalog REST API
// Description: axum routes and handlers for catalog operations.
// Purpose: Translate HTTP requests into controller calls and back.
// Dependencies: axum, serde, serde_json, service-catalog-core, tokio, tracing
// ============================================================================

//! ## Overview
//! Routes follow the catalog's REST surface:
//! - `GET /` lists, `POST /` adds with a generated id.
//! - `GET|PUT|DELETE /{id}` and `/{prefix}/{id}` address a single entry.
//! - `GET /{path}/{op}/{value...}` filters; `path` may carry `%2F`-encoded
//!   separators and `value` may span several segments.
//!
//! Every response, including errors, carries
//! `Content-Type: application/json;version=<API_VERSION>`. Controller calls are
//! blocking and run on the Tokio blocking pool.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::DefaultBodyLimit;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::extract::rejection::QueryRejection;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::http::header::LOCATION;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use serde::Deserialize;
use serde::Serialize;
use service_catalog_core::CatalogController;
use service_catalog_core::CatalogError;
use service_catalog_core::Entry;
use service_catalog_core::EntryId;
use service_catalog_core::EntryPage;
use service_catalog_core::ErrorKind;
use service_catalog_core::Registration;
use service_catalog_core::UpdateOutcome;
use service_catalog_core::parse_paging_params;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Version of the REST representation, advertised in `Content-Type`.
pub const API_VERSION: &str = "1.0.0";
/// Content type attached to every response.
const JSON_CONTENT_TYPE: &str = "application/json;version=1.0.0";
/// Hex digits for `Location` percent-encoding.
const HEX_DIGITS: [char; 16] =
    ['0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F'];

// ============================================================================
// SECTION: State and Wire Types
// ============================================================================

/// Shared handler state.
#[derive(Clone)]
pub struct ApiState {
    /// Catalog controller.
    controller: Arc<CatalogController>,
    /// Catalog description echoed in collections.
    description: Arc<str>,
}

impl ApiState {
    /// Creates handler state for a controller.
    #[must_use]
    pub fn new(controller: Arc<CatalogController>, description: &str) -> Self {
        Self {
            controller,
            description: Arc::from(description),
        }
    }

    /// Returns the controller.
    #[must_use]
    pub const fn controller(&self) -> &Arc<CatalogController> {
        &self.controller
    }
}

/// Paginated list of entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    /// Catalog description.
    pub description: String,
    /// Entries on this page, in id order.
    pub services: Vec<Entry>,
    /// 1-based page number.
    pub page: usize,
    /// Page size.
    pub per_page: usize,
    /// Total matching entries across all pages.
    pub total: usize,
}

/// Error response body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    /// HTTP status code.
    code: u16,
    /// Human-readable message.
    message: String,
}

/// Raw paging query parameters.
#[derive(Debug, Default, Deserialize)]
struct PagingQuery {
    /// Requested page.
    page: Option<String>,
    /// Requested page size.
    per_page: Option<String>,
}

/// Entry address captured from `/{first}` or `/{first}/{second}`.
#[derive(Debug, Deserialize)]
struct EntryPath {
    /// First path segment.
    first: String,
    /// Optional second path segment.
    second: Option<String>,
}

impl EntryPath {
    /// Joins the captured segments into an entry id.
    fn into_id(self) -> EntryId {
        match self.second {
            Some(second) => EntryId::new(format!("{}/{second}", self.first)),
            None => EntryId::new(self.first),
        }
    }
}

/// Filter captured from `/{path}/{op}/{value...}`.
#[derive(Debug, Deserialize)]
struct FilterPath {
    /// Attribute path.
    #[serde(rename = "first")]
    path: String,
    /// Operator name.
    #[serde(rename = "second")]
    operator: String,
    /// Literal value.
    #[serde(rename = "rest")]
    value: String,
}

// ============================================================================
// SECTION: Router
// ============================================================================

/// Builds the catalog router.
///
/// Request bodies larger than `max_body_bytes` are rejected with 413.
pub fn router(state: ApiState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(list_entries).post(add_entry))
        .route("/{first}", get(get_entry).put(put_entry).delete(delete_entry))
        .route("/{first}/{second}", get(get_entry).put(put_entry).delete(delete_entry))
        .route("/{first}/{second}/{*rest}", get(filter_entries))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// `GET /`: one page of all entries.
async fn list_entries(
    State(state): State<ApiState>,
    query: Result<Query<PagingQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let (page, per_page) = paging(&state, query)?;
    let result = run_blocking(&state, move |controller| controller.list(page, per_page)).await?;
    Ok(collection_response(&state, result))
}

/// `GET /{path}/{op}/{value...}`: one page of matching entries.
async fn filter_entries(
    State(state): State<ApiState>,
    Path(filter): Path<FilterPath>,
    query: Result<Query<PagingQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let (page, per_page) = paging(&state, query)?;
    let result = run_blocking(&state, move |controller| {
        controller.filter(&filter.path, &filter.operator, &filter.value, page, per_page)
    })
    .await?;
    Ok(collection_response(&state, result))
}

/// `GET /{id}`: a single entry.
async fn get_entry(
    State(state): State<ApiState>,
    Path(path): Path<EntryPath>,
) -> Result<Response, ApiError> {
    let id = path.into_id();
    let entry = run_blocking(&state, move |controller| controller.get(&id)).await?;
    Ok(json_response(StatusCode::OK, &entry))
}

/// `POST /`: adds an entry under a generated id.
async fn add_entry(
    State(state): State<ApiState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let registration = parse_registration(body)?;
    let id = run_blocking(&state, move |controller| controller.add(registration)).await?;
    Ok(created_response(&id))
}

/// `PUT /{id}`: replaces an entry or creates it under the addressed id.
async fn put_entry(
    State(state): State<ApiState>,
    Path(path): Path<EntryPath>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    let id = path.into_id();
    let registration = parse_registration(body)?;
    let outcome =
        run_blocking(&state, move |controller| controller.update(&id, registration)).await?;
    Ok(match outcome {
        UpdateOutcome::Created(id) => created_response(&id),
        UpdateOutcome::Updated => empty_response(StatusCode::OK),
    })
}

/// `DELETE /{id}`: removes an entry.
async fn delete_entry(
    State(state): State<ApiState>,
    Path(path): Path<EntryPath>,
) -> Result<Response, ApiError> {
    let id = path.into_id();
    run_blocking(&state, move |controller| controller.delete(&id)).await?;
    Ok(empty_response(StatusCode::OK))
}

// ============================================================================
// SECTION: Request Helpers
// ============================================================================

/// Runs a controller call on the blocking pool.
async fn run_blocking<T, F>(state: &ApiState, operation: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&CatalogController) -> Result<T, CatalogError> + Send + 'static,
{
    let controller = Arc::clone(&state.controller);
    tokio::task::spawn_blocking(move || operation(&controller))
        .await
        .map_err(|err| CatalogError::Internal(format!("controller task failed: {err}")))?
        .map_err(ApiError::from)
}

/// Resolves `page`/`per_page` against the controller's page-size bound.
fn paging(
    state: &ApiState,
    query: Result<Query<PagingQuery>, QueryRejection>,
) -> Result<(usize, usize), ApiError> {
    let Query(query) = query.map_err(|err| ApiError::bad_request(err.body_text()))?;
    let max_per_page = state.controller.config().max_per_page;
    let request =
        parse_paging_params(query.page.as_deref(), query.per_page.as_deref(), max_per_page)
            .map_err(CatalogError::from)?;
    Ok((request.page, request.per_page))
}

/// Decodes a registration body.
fn parse_registration(body: Result<Bytes, BytesRejection>) -> Result<Registration, ApiError> {
    let bytes = body.map_err(|rejection| ApiError {
        status: rejection.status(),
        message: rejection.body_text(),
    })?;
    serde_json::from_slice(&bytes)
        .map_err(|err| ApiError::bad_request(format!("error processing the request: {err}")))
}

// ============================================================================
// SECTION: Response Helpers
// ============================================================================

/// Renders a JSON body with the versioned content type.
fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(bytes) => {
            (status, [(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))], bytes)
                .into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "response serialization failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Renders a bodiless response with the versioned content type.
fn empty_response(status: StatusCode) -> Response {
    (status, [(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))]).into_response()
}

/// Renders `201 Created` with a `Location` pointing at the new entry.
fn created_response(id: &EntryId) -> Response {
    (
        StatusCode::CREATED,
        [
            (CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE)),
            (LOCATION, location_header(id)),
        ],
    )
        .into_response()
}

/// Renders a page as a collection.
fn collection_response(state: &ApiState, page: EntryPage) -> Response {
    let collection = Collection {
        description: state.description.to_string(),
        services: page.entries,
        page: page.page,
        per_page: page.per_page,
        total: page.total,
    };
    json_response(StatusCode::OK, &collection)
}

/// Builds `/{id}`, percent-encoding bytes outside visible ASCII.
fn location_header(id: &EntryId) -> HeaderValue {
    let mut location = String::with_capacity(id.as_str().len() + 1);
    location.push('/');
    for byte in id.as_str().bytes() {
        if byte.is_ascii_graphic() && byte != b'%' {
            location.push(char::from(byte));
        } else {
            location.push('%');
            for nibble in [byte >> 4, byte & 0x0f] {
                location.push(HEX_DIGITS.get(usize::from(nibble)).copied().unwrap_or('0'));
            }
        }
    }
    HeaderValue::from_str(&location).unwrap_or_else(|_| HeaderValue::from_static("/"))
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// HTTP-facing error.
#[derive(Debug)]
struct ApiError {
    /// Response status.
    status: StatusCode,
    /// Response message.
    message: String,
}

impl ApiError {
    /// Builds a `400 Bad Request` error.
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        let status = match err.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::BadRequest | ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::warn!(status = self.status.as_u16(), error = %self.message, "request failed");
        }
        let body = ErrorBody {
            code: self.status.as_u16(),
            message: self.message,
        };
        json_response(self.status, &body)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
