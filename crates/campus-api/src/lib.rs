//! CAMPUS API — the HTTP layer.
//!
//! Request flow: authorization gate (token verify → identity reload →
//! license/active check → optional role check) → request identity
//! context → resource handler → tenant-scoped query → response.
//!
//! No mutable state is shared across requests; [`AppState`] holds only
//! the immutable auth configuration and cloneable database handles,
//! and everything the gate consults is re-read from storage on every
//! request.

pub mod context;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod scope;

use std::sync::Arc;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::post;
use campus_auth::{AuthConfig, AuthService};
use campus_db::repository::{
    SurrealAccountRepository, SurrealAttendanceRepository, SurrealCareerRepository,
    SurrealGradeRepository, SurrealLicenseRepository, SurrealStudentRepository,
    SurrealSubjectRepository, SurrealTeacherRepository, SurrealTenantRepository,
    SurrealTopicRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state: immutable configuration plus cloneable
/// repository handles over one database connection.
#[derive(Clone)]
pub struct AppState {
    pub auth_config: Arc<AuthConfig>,
    pub accounts: SurrealAccountRepository<Any>,
    pub tenants: SurrealTenantRepository<Any>,
    pub licenses: SurrealLicenseRepository<Any>,
    pub students: SurrealStudentRepository<Any>,
    pub teachers: SurrealTeacherRepository<Any>,
    pub careers: SurrealCareerRepository<Any>,
    pub subjects: SurrealSubjectRepository<Any>,
    pub topics: SurrealTopicRepository<Any>,
    pub grades: SurrealGradeRepository<Any>,
    pub attendance: SurrealAttendanceRepository<Any>,
}

impl AppState {
    pub fn new(db: Surreal<Any>, auth_config: AuthConfig) -> Self {
        Self {
            auth_config: Arc::new(auth_config),
            accounts: SurrealAccountRepository::new(db.clone()),
            tenants: SurrealTenantRepository::new(db.clone()),
            licenses: SurrealLicenseRepository::new(db.clone()),
            students: SurrealStudentRepository::new(db.clone()),
            teachers: SurrealTeacherRepository::new(db.clone()),
            careers: SurrealCareerRepository::new(db.clone()),
            subjects: SurrealSubjectRepository::new(db.clone()),
            topics: SurrealTopicRepository::new(db.clone()),
            grades: SurrealGradeRepository::new(db.clone()),
            attendance: SurrealAttendanceRepository::new(db),
        }
    }

    /// Build an [`AuthService`] over this state's repositories.
    pub fn auth_service(
        &self,
    ) -> AuthService<
        SurrealAccountRepository<Any>,
        SurrealTenantRepository<Any>,
        SurrealLicenseRepository<Any>,
    > {
        AuthService::new(
            self.accounts.clone(),
            self.tenants.clone(),
            self.licenses.clone(),
            (*self.auth_config).clone(),
        )
    }
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/license", post(routes::auth::license));

    let protected = Router::new()
        .nest("/accounts", routes::accounts::router())
        .nest("/students", routes::students::router())
        .nest("/teachers", routes::teachers::router())
        .nest("/careers", routes::careers::router())
        .nest("/subjects", routes::subjects::router())
        .nest("/subjects/:subject_id/topics", routes::topics::router())
        .nest("/grades", routes::grades::router())
        .nest("/attendance", routes::attendance::router())
        .layer(from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    public
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
