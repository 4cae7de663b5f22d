// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod live;
mod session;

use axum::{
    Json, Router,
    extract::{
        FromRef, Path, Query, State as AxumState,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use clap::Parser;
use perfdesk_api::{
    AccountInfo, AccountStatusResponse, AcknowledgeReviewRequest, ApiError, ApiResult,
    AuditEventInfo, AuthConfig, BootstrapRequest, CancelReviewRequest, CreateAccountRequest,
    CreateEmployeeRequest, CreateReviewRequest, DeleteReviewResponse, EmployeeInfo,
    ListReviewsQuery, LoginRequest, ManagerReviewResponse, RefreshRequest, ReviewInfo,
    SelfReviewResponse, SetAccountStatusRequest, SubmitReviewRequest, TokenResponse,
    acknowledge_review, bootstrap, cancel_review, complete_review, create_account, create_employee,
    create_review, delete_review, get_employee, get_review, get_review_history, list_employees,
    list_reviews, login, logout, refresh, remind_review, set_account_status, submit_manager_review,
    submit_self_review, whoami,
};
use perfdesk_audit::Cause;
use perfdesk_domain::{AdhocReview, Submission};
use perfdesk_persistence::SqlitePersistence;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::live::{LiveEventBroadcaster, ReviewEvent, live_events_handler};
use crate::session::SessionPrincipal;

/// Perfdesk Server - HTTP server for ad-hoc performance reviews
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "PERFDESK_DATABASE")]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, env = "PERFDESK_PORT", default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(long, env = "PERFDESK_BIND", default_value = "127.0.0.1")]
    bind: IpAddr,

    /// Secret used to sign access tokens
    #[arg(long, env = "PERFDESK_JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    /// Access token lifetime in minutes
    #[arg(long, env = "PERFDESK_ACCESS_TOKEN_TTL_MINUTES", default_value_t = 15)]
    access_token_ttl_minutes: u32,

    /// Refresh token lifetime in days
    #[arg(long, env = "PERFDESK_REFRESH_TOKEN_TTL_DAYS", default_value_t = 14)]
    refresh_token_ttl_days: u32,
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The single database connection.
    persistence: Arc<Mutex<SqlitePersistence>>,
    /// Live event fan-out.
    broadcaster: Arc<LiveEventBroadcaster>,
    /// Token signing settings.
    auth: Arc<AuthConfig>,
}

impl AppState {
    fn new(persistence: SqlitePersistence, auth: AuthConfig) -> Self {
        Self {
            persistence: Arc::new(Mutex::new(persistence)),
            broadcaster: Arc::new(LiveEventBroadcaster::new()),
            auth: Arc::new(auth),
        }
    }
}

impl FromRef<AppState> for Arc<LiveEventBroadcaster> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.broadcaster)
    }
}

// ============================================================================
// Response envelope and errors
// ============================================================================

/// Success envelope: `{ "success": true, "data": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: T,
}

fn ok<T>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        data,
    })
}

fn created<T>(data: T) -> (StatusCode, Json<Envelope<T>>) {
    (StatusCode::CREATED, ok(data))
}

/// Error envelope: `{ "success": false, "error": { code, message, details? } }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorEnvelope {
    success: bool,
    error: ErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    code: &'static str,
    message: String,
    details: Option<serde_json::Value>,
}

impl HttpError {
    fn authentication(message: &str) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code: "AUTHENTICATION_ERROR",
            message: message.to_string(),
            details: None,
        }
    }

    fn validation(message: String) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            code: "VALIDATION_ERROR",
            message,
            details: None,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorEnvelope> = Json(ErrorEnvelope {
            success: false,
            error: ErrorBody {
                code: self.code.to_string(),
                message: self.message,
                details: self.details,
            },
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            ApiError::DomainRuleViolation { .. } | ApiError::Conflict { .. } => {
                StatusCode::CONFLICT
            }
            ApiError::InvalidInput { .. } | ApiError::PasswordPolicyViolation { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message: String = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %err, "Internal error while handling request");
            String::from("An internal error occurred")
        } else {
            err.to_string()
        };

        Self {
            status,
            code: err.code(),
            message,
            details: err
                .field()
                .map(|field| serde_json::json!({ "field": field })),
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for HttpError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation(format!("Invalid query string: {}", rejection.body_text()))
    }
}

impl From<PathRejection> for HttpError {
    fn from(rejection: PathRejection) -> Self {
        Self::validation(format!("Invalid path parameter: {}", rejection.body_text()))
    }
}

/// Accepts a missing JSON body as the request's default value.
fn optional_body<T: Default>(payload: Result<Json<T>, JsonRejection>) -> Result<T, HttpError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        Err(rejection) => Err(rejection.into()),
    }
}

fn http_cause(description: &str) -> Cause {
    Cause::new(String::from("http"), description.to_string())
}

fn review_id_of(review: &AdhocReview) -> i64 {
    review.review_id.unwrap_or_default()
}

// ============================================================================
// Health and authentication
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct HealthResponse {
    status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogoutResponse {
    logged_out: bool,
}

/// Handler for GET `/health`.
async fn handle_health() -> Json<Envelope<HealthResponse>> {
    ok(HealthResponse {
        status: String::from("ok"),
    })
}

/// Handler for POST `/auth/bootstrap`.
///
/// Creates the first administrator. Fails once any account exists.
async fn handle_bootstrap(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<BootstrapRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<AccountInfo>>), HttpError> {
    let Json(request) = payload?;
    info!("Handling bootstrap request");

    let mut persistence = app_state.persistence.lock().await;
    let account: AccountInfo = bootstrap(&mut persistence, &request, OffsetDateTime::now_utc())?;
    drop(persistence);

    Ok(created(account))
}

/// Handler for PUT `/accounts/{id}/status`.
async fn handle_set_account_status(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(principal): SessionPrincipal,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<SetAccountStatusRequest>, JsonRejection>,
) -> Result<Json<Envelope<AccountStatusResponse>>, HttpError> {
    let Path(account_id) = path?;
    let Json(request) = payload?;

    let mut persistence = app_state.persistence.lock().await;
    let status: AccountStatusResponse =
        set_account_status(&mut persistence, account_id, &request, &principal)?;
    drop(persistence);

    Ok(ok(status))
}

/// Handler for POST `/auth/login`.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<Envelope<TokenResponse>>, HttpError> {
    let Json(request) = payload?;

    let mut persistence = app_state.persistence.lock().await;
    let tokens: TokenResponse = login(
        &mut persistence,
        &app_state.auth,
        &request,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(ok(tokens))
}

/// Handler for POST `/auth/refresh`.
async fn handle_refresh(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<Envelope<TokenResponse>>, HttpError> {
    let Json(request) = payload?;

    let mut persistence = app_state.persistence.lock().await;
    let tokens: TokenResponse = refresh(
        &mut persistence,
        &app_state.auth,
        &request,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(ok(tokens))
}

/// Handler for POST `/auth/logout`.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(principal): SessionPrincipal,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<Envelope<LogoutResponse>>, HttpError> {
    let Json(request) = payload?;
    info!(account_id = principal.account_id, "Handling logout request");

    let mut persistence = app_state.persistence.lock().await;
    logout(&mut persistence, &request, OffsetDateTime::now_utc())?;
    drop(persistence);

    Ok(ok(LogoutResponse { logged_out: true }))
}

/// Handler for GET `/auth/me`.
async fn handle_me(SessionPrincipal(principal): SessionPrincipal) -> Json<Envelope<AccountInfo>> {
    ok(whoami(&principal))
}

/// Handler for POST `/accounts`.
async fn handle_create_account(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(principal): SessionPrincipal,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<AccountInfo>>), HttpError> {
    let Json(request) = payload?;
    info!(
        account_id = principal.account_id,
        role = %request.role,
        "Handling create_account request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let account: AccountInfo = create_account(
        &mut persistence,
        &request,
        &principal,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(created(account))
}

// ============================================================================
// Employees
// ============================================================================

/// Handler for POST `/employees`.
async fn handle_create_employee(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(principal): SessionPrincipal,
    payload: Result<Json<CreateEmployeeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<EmployeeInfo>>), HttpError> {
    let Json(request) = payload?;

    let mut persistence = app_state.persistence.lock().await;
    let employee: EmployeeInfo = create_employee(
        &mut persistence,
        request,
        &principal,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(created(employee))
}

/// Handler for GET `/employees`.
async fn handle_list_employees(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(_principal): SessionPrincipal,
) -> Result<Json<Envelope<Vec<EmployeeInfo>>>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let employees: Vec<EmployeeInfo> = list_employees(&mut persistence)?;
    drop(persistence);

    Ok(ok(employees))
}

/// Handler for GET `/employees/{id}`.
async fn handle_get_employee(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(_principal): SessionPrincipal,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Envelope<EmployeeInfo>>, HttpError> {
    let Path(employee_id) = path?;

    let mut persistence = app_state.persistence.lock().await;
    let employee: EmployeeInfo = get_employee(&mut persistence, employee_id)?;
    drop(persistence);

    Ok(ok(employee))
}

// ============================================================================
// Reviews
// ============================================================================

/// Handler for POST `/adhoc-reviews`.
async fn handle_create_review(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(principal): SessionPrincipal,
    payload: Result<Json<CreateReviewRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<ReviewInfo>>), HttpError> {
    let Json(request) = payload?;
    info!(
        account_id = principal.account_id,
        employee_id = request.employee_id,
        "Handling create_review request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let result: ApiResult<ReviewInfo> = create_review(
        &mut persistence,
        request,
        &principal,
        http_cause("Trigger ad-hoc review"),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    app_state.broadcaster.broadcast(&ReviewEvent::ReviewCreated {
        review_id: result.response.id,
        employee_id: result.review.employee_id,
        manager_id: result.review.manager_id,
        triggered_by: result.review.triggered_by,
    });

    Ok(created(result.response))
}

/// Handler for GET `/adhoc-reviews`.
async fn handle_list_reviews(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(principal): SessionPrincipal,
    query: Result<Query<ListReviewsQuery>, QueryRejection>,
) -> Result<Json<Envelope<Vec<ReviewInfo>>>, HttpError> {
    let Query(query) = query?;

    let mut persistence = app_state.persistence.lock().await;
    let reviews: Vec<ReviewInfo> = list_reviews(&mut persistence, &query, &principal)?;
    drop(persistence);

    Ok(ok(reviews))
}

/// Handler for GET `/adhoc-reviews/{id}`.
async fn handle_get_review(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(principal): SessionPrincipal,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Envelope<ReviewInfo>>, HttpError> {
    let Path(review_id) = path?;

    let mut persistence = app_state.persistence.lock().await;
    let review: ReviewInfo = get_review(&mut persistence, review_id, &principal)?;
    drop(persistence);

    Ok(ok(review))
}

/// Handler for PUT `/adhoc-reviews/{id}/self-review`.
async fn handle_submit_self_review(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(principal): SessionPrincipal,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<SubmitReviewRequest>, JsonRejection>,
) -> Result<Json<Envelope<SelfReviewResponse>>, HttpError> {
    let Path(review_id) = path?;
    let Json(request) = payload?;
    info!(
        account_id = principal.account_id,
        review_id,
        status = request.status.as_str(),
        "Handling submit_self_review request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let result: ApiResult<SelfReviewResponse> = submit_self_review(
        &mut persistence,
        review_id,
        request,
        &principal,
        http_cause("Save self review"),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    if result
        .review
        .self_review
        .as_ref()
        .is_some_and(Submission::is_submitted)
    {
        app_state
            .broadcaster
            .broadcast(&ReviewEvent::SelfReviewSubmitted {
                review_id,
                status: result.response.status.clone(),
            });
    }

    Ok(ok(result.response))
}

/// Handler for PUT `/adhoc-reviews/{id}/manager-review`.
async fn handle_submit_manager_review(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(principal): SessionPrincipal,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<SubmitReviewRequest>, JsonRejection>,
) -> Result<Json<Envelope<ManagerReviewResponse>>, HttpError> {
    let Path(review_id) = path?;
    let Json(request) = payload?;
    info!(
        account_id = principal.account_id,
        review_id,
        status = request.status.as_str(),
        "Handling submit_manager_review request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let result: ApiResult<ManagerReviewResponse> = submit_manager_review(
        &mut persistence,
        review_id,
        request,
        &principal,
        http_cause("Save manager review"),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    if result
        .review
        .manager_review
        .as_ref()
        .is_some_and(Submission::is_submitted)
    {
        app_state
            .broadcaster
            .broadcast(&ReviewEvent::ManagerReviewSubmitted {
                review_id,
                status: result.response.status.clone(),
            });
    }

    Ok(ok(result.response))
}

/// Handler for POST `/adhoc-reviews/{id}/acknowledge`.
async fn handle_acknowledge_review(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(principal): SessionPrincipal,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<AcknowledgeReviewRequest>, JsonRejection>,
) -> Result<Json<Envelope<ReviewInfo>>, HttpError> {
    let Path(review_id) = path?;
    let request: AcknowledgeReviewRequest = optional_body(payload)?;

    let mut persistence = app_state.persistence.lock().await;
    let result: ApiResult<ReviewInfo> = acknowledge_review(
        &mut persistence,
        review_id,
        request,
        &principal,
        http_cause("Acknowledge review"),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    app_state
        .broadcaster
        .broadcast(&ReviewEvent::ReviewAcknowledged { review_id });

    Ok(ok(result.response))
}

/// Handler for POST `/adhoc-reviews/{id}/complete`.
async fn handle_complete_review(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(principal): SessionPrincipal,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Envelope<ReviewInfo>>, HttpError> {
    let Path(review_id) = path?;

    let mut persistence = app_state.persistence.lock().await;
    let result: ApiResult<ReviewInfo> = complete_review(
        &mut persistence,
        review_id,
        &principal,
        http_cause("Complete review"),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    app_state
        .broadcaster
        .broadcast(&ReviewEvent::ReviewCompleted { review_id });

    Ok(ok(result.response))
}

/// Handler for POST `/adhoc-reviews/{id}/cancel`.
async fn handle_cancel_review(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(principal): SessionPrincipal,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CancelReviewRequest>, JsonRejection>,
) -> Result<Json<Envelope<ReviewInfo>>, HttpError> {
    let Path(review_id) = path?;
    let request: CancelReviewRequest = optional_body(payload)?;

    let mut persistence = app_state.persistence.lock().await;
    let result: ApiResult<ReviewInfo> = cancel_review(
        &mut persistence,
        review_id,
        request,
        &principal,
        http_cause("Cancel review"),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    app_state
        .broadcaster
        .broadcast(&ReviewEvent::ReviewCancelled { review_id });

    Ok(ok(result.response))
}

/// Handler for POST `/adhoc-reviews/{id}/remind`.
///
/// Records the reminder and publishes it on the live stream for delivery.
async fn handle_remind_review(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(principal): SessionPrincipal,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Envelope<ReviewInfo>>, HttpError> {
    let Path(review_id) = path?;

    let mut persistence = app_state.persistence.lock().await;
    let result: ApiResult<ReviewInfo> = remind_review(
        &mut persistence,
        review_id,
        &principal,
        http_cause("Send review reminder"),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    app_state
        .broadcaster
        .broadcast(&ReviewEvent::reminder(&result.review));

    Ok(ok(result.response))
}

/// Handler for DELETE `/adhoc-reviews/{id}`.
async fn handle_delete_review(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(principal): SessionPrincipal,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Envelope<DeleteReviewResponse>>, HttpError> {
    let Path(review_id) = path?;
    info!(
        account_id = principal.account_id,
        review_id, "Handling delete_review request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let result: ApiResult<DeleteReviewResponse> = delete_review(
        &mut persistence,
        review_id,
        &principal,
        http_cause("Delete review"),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    app_state.broadcaster.broadcast(&ReviewEvent::ReviewDeleted {
        review_id: review_id_of(&result.review),
    });

    Ok(ok(result.response))
}

/// Handler for GET `/adhoc-reviews/{id}/history`.
async fn handle_get_review_history(
    AxumState(app_state): AxumState<AppState>,
    SessionPrincipal(principal): SessionPrincipal,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Envelope<Vec<AuditEventInfo>>>, HttpError> {
    let Path(review_id) = path?;

    let mut persistence = app_state.persistence.lock().await;
    let history: Vec<AuditEventInfo> = get_review_history(&mut persistence, review_id, &principal)?;
    drop(persistence);

    Ok(ok(history))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/auth/bootstrap", post(handle_bootstrap))
        .route("/auth/login", post(handle_login))
        .route("/auth/refresh", post(handle_refresh))
        .route("/auth/logout", post(handle_logout))
        .route("/auth/me", get(handle_me))
        .route("/accounts", post(handle_create_account))
        .route("/accounts/{id}/status", put(handle_set_account_status))
        .route(
            "/employees",
            post(handle_create_employee).get(handle_list_employees),
        )
        .route("/employees/{id}", get(handle_get_employee))
        .route(
            "/adhoc-reviews",
            post(handle_create_review).get(handle_list_reviews),
        )
        .route(
            "/adhoc-reviews/{id}",
            get(handle_get_review).delete(handle_delete_review),
        )
        .route(
            "/adhoc-reviews/{id}/self-review",
            put(handle_submit_self_review),
        )
        .route(
            "/adhoc-reviews/{id}/manager-review",
            put(handle_submit_manager_review),
        )
        .route(
            "/adhoc-reviews/{id}/acknowledge",
            post(handle_acknowledge_review),
        )
        .route("/adhoc-reviews/{id}/complete", post(handle_complete_review))
        .route("/adhoc-reviews/{id}/cancel", post(handle_cancel_review))
        .route("/adhoc-reviews/{id}/remind", post(handle_remind_review))
        .route(
            "/adhoc-reviews/{id}/history",
            get(handle_get_review_history),
        )
        .route("/live", get(live_events_handler))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Perfdesk Server");

    let persistence: SqlitePersistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        SqlitePersistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        SqlitePersistence::new_in_memory()?
    };

    let auth: AuthConfig = AuthConfig::new(&args.jwt_secret).with_ttls(
        Duration::minutes(i64::from(args.access_token_ttl_minutes)),
        Duration::days(i64::from(args.refresh_token_ttl_days)),
    );
    info!(?auth, "Token settings");

    let app: Router = build_router(AppState::new(persistence, auth));

    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
