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
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod session;

#[cfg(test)]
mod tests;

use axum::{
    Json, Router,
    extract::{Path, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use clap::Parser;
use roster::ErrorKind;
use roster_api::{
    ApiError, AssignStudentsRequest, AssignStudentsResponse, AssignTeacherRequest,
    AssignTeacherResponse, BootstrapStatusResponse, ClassroomDetailsResponse,
    CreateClassroomRequest, CreateClassroomResponse, CreateFirstPrincipalRequest,
    CreateTimetableRequest, CurrentUserResponse, ListClassroomStudentsResponse,
    ListClassroomsResponse, ListUsersResponse, LoginRequest, LoginResponse,
    ReconcileAssignmentResponse, RegisterUserRequest, RegisterUserResponse, RetryPolicy,
    TimetableResponse, UserInfo,
};
use roster_persistence::Persistence;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::session::{BearerToken, SessionUser};

/// Roster Server - HTTP server for the Roster school scheduling system
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "ROSTER_DATABASE")]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, env = "ROSTER_PORT", default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, env = "ROSTER_BIND", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    bind: IpAddr,

    /// Lifetime of a login session, in hours
    #[arg(long, env = "ROSTER_SESSION_TTL_HOURS", default_value_t = 720)]
    session_ttl_hours: u32,

    /// Times a write is re-attempted after a concurrent modification
    #[arg(long, env = "ROSTER_CONFLICT_RETRIES", default_value_t = 3)]
    conflict_retries: u32,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The persistence layer.
    persistence: Arc<Mutex<Persistence>>,
    /// Lifetime given to new sessions.
    session_ttl: time::Duration,
    /// Retry policy for writes that hit a version conflict.
    retry: RetryPolicy,
}

impl AppState {
    fn new(persistence: Persistence, session_ttl: time::Duration, retry: RetryPolicy) -> Self {
        Self {
            persistence: Arc::new(Mutex::new(persistence)),
            session_ttl,
            retry,
        }
    }
}

/// Error body returned for every failed request.
#[derive(Debug, Serialize, Deserialize)]
struct ErrorResponse {
    /// Always false.
    success: bool,
    /// Machine-readable error category.
    kind: String,
    /// Error message.
    message: String,
}

/// Response for operations that produce no other body.
#[derive(Debug, Serialize, Deserialize)]
struct MessageResponse {
    /// Always true.
    success: bool,
    /// Human-readable outcome.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// Machine-readable error category.
    kind: &'static str,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            success: false,
            kind: self.kind.to_string(),
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

/// Maps a rule violation to its status code.
///
/// Malformed schedules are the caller's fault; clashes with existing state
/// are conflicts.
const fn rule_status(rule: ErrorKind) -> StatusCode {
    match rule {
        ErrorKind::OutOfHours
        | ErrorKind::InvalidDay
        | ErrorKind::InvalidRange
        | ErrorKind::InvalidRole
        | ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::AlreadyAssigned
        | ErrorKind::TimeConflict
        | ErrorKind::Conflict
        | ErrorKind::AlreadyExists => StatusCode::CONFLICT,
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InvalidInput { .. }
            | ApiError::InvalidRole { .. }
            | ApiError::PasswordPolicyViolation { .. } => StatusCode::BAD_REQUEST,
            ApiError::DomainRuleViolation { rule, .. } => rule_status(*rule),
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        Self {
            status,
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

// ============================================================================
// Bootstrap and authentication
// ============================================================================

/// Handler for GET `/bootstrap/status`.
async fn handle_bootstrap_status(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<BootstrapStatusResponse>, HttpError> {
    info!("Handling bootstrap_status request");

    let mut persistence = app_state.persistence.lock().await;
    let response: BootstrapStatusResponse = roster_api::bootstrap_status(&mut persistence)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/bootstrap/principal`.
async fn handle_create_first_principal(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CreateFirstPrincipalRequest>,
) -> Result<(StatusCode, Json<RegisterUserResponse>), HttpError> {
    info!(email = %req.email, "Handling create_first_principal request");

    let mut persistence = app_state.persistence.lock().await;
    let response: RegisterUserResponse =
        roster_api::create_first_principal(&mut persistence, &req)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for POST `/auth/login`.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    info!(email = %req.email, "Handling login request");

    let mut persistence = app_state.persistence.lock().await;
    let response: LoginResponse =
        roster_api::login(&mut persistence, &req, app_state.session_ttl)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/auth/logout`.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<MessageResponse>, HttpError> {
    info!("Handling logout request");

    let mut persistence = app_state.persistence.lock().await;
    roster_api::logout(&mut persistence, &token)?;
    drop(persistence);

    Ok(Json(MessageResponse {
        success: true,
        message: String::from("Logged out"),
    }))
}

/// Handler for GET `/auth/me`.
async fn handle_current_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
) -> Result<Json<CurrentUserResponse>, HttpError> {
    info!(user_id = %actor.user_id, "Handling current_user request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CurrentUserResponse = roster_api::current_user(&mut persistence, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Users
// ============================================================================

/// Handler for POST `/users`.
async fn handle_register_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Json(req): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<RegisterUserResponse>), HttpError> {
    info!(
        actor_id = %actor.user_id,
        role = %actor.role,
        email = %req.email,
        "Handling register_user request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: RegisterUserResponse =
        roster_api::register_user(&mut persistence, &req, &actor)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/users`.
async fn handle_list_users(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
) -> Result<Json<ListUsersResponse>, HttpError> {
    info!(actor_id = %actor.user_id, "Handling list_users request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ListUsersResponse = roster_api::list_users(&mut persistence, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/users/{user_id}`.
async fn handle_get_user(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(user_id): Path<i64>,
) -> Result<Json<UserInfo>, HttpError> {
    info!(actor_id = %actor.user_id, user_id, "Handling get_user request");

    let mut persistence = app_state.persistence.lock().await;
    let response: UserInfo = roster_api::get_user(&mut persistence, &actor, user_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/users/{user_id}/reconcile`.
async fn handle_reconcile_teacher_assignment(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(teacher_id): Path<i64>,
) -> Result<Json<ReconcileAssignmentResponse>, HttpError> {
    info!(
        actor_id = %actor.user_id,
        teacher_id,
        "Handling reconcile_teacher_assignment request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: ReconcileAssignmentResponse = roster_api::reconcile_teacher_assignment(
        &mut persistence,
        &actor,
        teacher_id,
        app_state.retry,
    )?;
    drop(persistence);

    Ok(Json(response))
}

// ============================================================================
// Classrooms
// ============================================================================

/// Handler for POST `/classrooms`.
async fn handle_create_classroom(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Json(req): Json<CreateClassroomRequest>,
) -> Result<(StatusCode, Json<CreateClassroomResponse>), HttpError> {
    info!(
        actor_id = %actor.user_id,
        name = %req.name,
        "Handling create_classroom request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: CreateClassroomResponse =
        roster_api::create_classroom(&mut persistence, &req, &actor)?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/classrooms`.
async fn handle_list_classrooms(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
) -> Result<Json<ListClassroomsResponse>, HttpError> {
    info!(actor_id = %actor.user_id, "Handling list_classrooms request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ListClassroomsResponse = roster_api::list_classrooms(&mut persistence, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/classrooms/mine`.
async fn handle_own_classroom(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
) -> Result<Json<ClassroomDetailsResponse>, HttpError> {
    info!(actor_id = %actor.user_id, "Handling own_classroom request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ClassroomDetailsResponse = roster_api::own_classroom(&mut persistence, &actor)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for PUT `/classrooms/{classroom_id}/teacher`.
async fn handle_assign_teacher(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(classroom_id): Path<i64>,
    Json(req): Json<AssignTeacherRequest>,
) -> Result<Json<AssignTeacherResponse>, HttpError> {
    info!(
        actor_id = %actor.user_id,
        classroom_id,
        teacher_id = req.teacher_id,
        "Handling assign_teacher request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: AssignTeacherResponse = roster_api::assign_teacher(
        &mut persistence,
        &actor,
        classroom_id,
        &req,
        app_state.retry,
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/classrooms/{classroom_id}/students`.
async fn handle_assign_students(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(classroom_id): Path<i64>,
    Json(req): Json<AssignStudentsRequest>,
) -> Result<Json<AssignStudentsResponse>, HttpError> {
    info!(
        actor_id = %actor.user_id,
        classroom_id,
        count = req.student_ids.len(),
        "Handling assign_students request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: AssignStudentsResponse = roster_api::assign_students(
        &mut persistence,
        &actor,
        classroom_id,
        &req,
        app_state.retry,
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/classrooms/{classroom_id}/students`.
async fn handle_list_classroom_students(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(classroom_id): Path<i64>,
) -> Result<Json<ListClassroomStudentsResponse>, HttpError> {
    info!(
        actor_id = %actor.user_id,
        classroom_id,
        "Handling list_classroom_students request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: ListClassroomStudentsResponse =
        roster_api::list_classroom_students(&mut persistence, &actor, classroom_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/classrooms/{classroom_id}/timetable`.
async fn handle_create_timetable(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(classroom_id): Path<i64>,
    Json(req): Json<CreateTimetableRequest>,
) -> Result<(StatusCode, Json<TimetableResponse>), HttpError> {
    info!(
        actor_id = %actor.user_id,
        classroom_id,
        count = req.periods.len(),
        "Handling create_timetable request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: TimetableResponse = roster_api::create_timetable(
        &mut persistence,
        &actor,
        classroom_id,
        &req,
        app_state.retry,
    )?;
    drop(persistence);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET `/classrooms/{classroom_id}/timetable`.
async fn handle_view_timetable(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(actor, _user): SessionUser,
    Path(classroom_id): Path<i64>,
) -> Result<Json<TimetableResponse>, HttpError> {
    info!(
        actor_id = %actor.user_id,
        classroom_id,
        "Handling view_timetable request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: TimetableResponse =
        roster_api::view_timetable(&mut persistence, &actor, classroom_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Builds the application router.
fn build_router(app_state: AppState) -> Router {
    let api: Router<AppState> = Router::new()
        .route("/bootstrap/status", get(handle_bootstrap_status))
        .route("/bootstrap/principal", post(handle_create_first_principal))
        .route("/auth/login", post(handle_login))
        .route("/auth/logout", post(handle_logout))
        .route("/auth/me", get(handle_current_user))
        .route("/users", post(handle_register_user).get(handle_list_users))
        .route("/users/{user_id}", get(handle_get_user))
        .route(
            "/users/{user_id}/reconcile",
            post(handle_reconcile_teacher_assignment),
        )
        .route(
            "/classrooms",
            post(handle_create_classroom).get(handle_list_classrooms),
        )
        .route("/classrooms/mine", get(handle_own_classroom))
        .route(
            "/classrooms/{classroom_id}/teacher",
            put(handle_assign_teacher),
        )
        .route(
            "/classrooms/{classroom_id}/students",
            post(handle_assign_students).get(handle_list_classroom_students),
        )
        .route(
            "/classrooms/{classroom_id}/timetable",
            post(handle_create_timetable).get(handle_view_timetable),
        );

    Router::new().nest("/api/v1", api).with_state(app_state)
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

    info!("Initializing Roster Server");

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let session_ttl: time::Duration = time::Duration::hours(i64::from(args.session_ttl_hours));
    let app_state: AppState = AppState::new(
        persistence,
        session_ttl,
        RetryPolicy::new(args.conflict_retries),
    );

    let app: Router = build_router(app_state);

    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
