pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    Router,
    routing::{get, post, put, patch, delete},
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};
use std::sync::Arc;

use crate::{
    auth::Capability,
    config::Settings,
    service::ServiceContext,
};
use state::AppState;

pub fn create_app(service_context: Arc<ServiceContext>, settings: Arc<Settings>) -> Router {
    let app_state = AppState::new(service_context, settings);

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))

        .nest("/admin", admin_routes(&app_state))
        .nest("/student/auth", student_auth_routes(&app_state))
        .nest("/api", api_routes(&app_state))

        .with_state(app_state)

        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Operator token plus a capability check. Layers run bottom-up, so the
/// operator is resolved before the capability is evaluated.
fn guarded(router: Router<AppState>, state: &AppState, capability: Capability) -> Router<AppState> {
    router
        .route_layer(axum::middleware::from_fn_with_state(
            capability,
            middleware::auth::require_capability,
        ))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_operator,
        ))
}

fn student_only(router: Router<AppState>, state: &AppState) -> Router<AppState> {
    router.route_layer(axum::middleware::from_fn_with_state(
        state.clone(),
        middleware::auth::require_student,
    ))
}

fn admin_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/auth/register", post(handlers::operator_auth::register))
        .route("/auth/login", post(handlers::operator_auth::login));

    let me = Router::new()
        .route("/auth/me", get(handlers::operator_auth::me))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_operator,
        ));

    let dashboard = guarded(
        Router::new().route("/dashboard", get(handlers::admin::dashboard)),
        state,
        Capability::ViewDashboard,
    );

    public.merge(me).merge(dashboard)
}

fn student_auth_routes(state: &AppState) -> Router<AppState> {
    let limited = Router::new()
        .route("/register", post(handlers::student_auth::register))
        .route("/resend-verification", post(handlers::student_auth::resend_verification))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit::limit_registrations,
        ));

    let public = Router::new()
        .route("/login", post(handlers::student_auth::login))
        .route("/verify", get(handlers::student_auth::verify));

    let me = student_only(
        Router::new().route("/me", get(handlers::student_auth::me)),
        state,
    );

    limited.merge(public).merge(me)
}

fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/courses", course_routes(state))
        .nest("/payments", payment_routes(state))
        .nest("/enrollments", enrollment_routes(state))
        .nest("/consultations", consultation_routes(state))
        .nest("/franchise", franchise_routes(state))
        .nest("/blogs", blog_routes(state))
        .nest("/applications", application_routes(state))
}

fn course_routes(state: &AppState) -> Router<AppState> {
    // Public catalog
    let public = Router::new()
        .route("/", get(handlers::courses::list))
        .route("/slug/:slug", get(handlers::courses::get_by_slug))
        .route("/:id", get(handlers::courses::get))
        .route("/:id/related", get(handlers::courses::related));

    let manage = guarded(
        Router::new()
            .route("/", post(handlers::courses::create))
            .route("/:id", put(handlers::courses::update)),
        state,
        Capability::ManageCourses,
    );

    let remove = guarded(
        Router::new().route("/:id", delete(handlers::courses::delete)),
        state,
        Capability::DeleteCourses,
    );

    public.merge(manage).merge(remove)
}

fn payment_routes(state: &AppState) -> Router<AppState> {
    let student = student_only(
        Router::new()
            .route("/create", post(handlers::payments::create))
            .route("/confirm", post(handlers::payments::confirm))
            .route("/mine", get(handlers::payments::mine)),
        state,
    );

    let admin = guarded(
        Router::new().route("/all", get(handlers::payments::list_all)),
        state,
        Capability::ViewPayments,
    );

    student.merge(admin)
}

fn enrollment_routes(state: &AppState) -> Router<AppState> {
    let student = student_only(
        Router::new().route("/student", get(handlers::enrollments::student_courses)),
        state,
    );

    let view = guarded(
        Router::new().route("/all", get(handlers::enrollments::list_all)),
        state,
        Capability::ViewEnrollments,
    );

    let manage = guarded(
        Router::new().route("/:id/status", patch(handlers::enrollments::update_status)),
        state,
        Capability::ManageEnrollments,
    );

    student.merge(view).merge(manage)
}

fn consultation_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new().route("/", post(handlers::consultations::create));

    let view = guarded(
        Router::new().route("/", get(handlers::consultations::list)),
        state,
        Capability::ViewConsultations,
    );

    let manage = guarded(
        Router::new().route("/:id", patch(handlers::consultations::update_status)),
        state,
        Capability::ManageConsultations,
    );

    public.merge(view).merge(manage)
}

fn franchise_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new().route("/submit", post(handlers::franchise::submit));

    let view = guarded(
        Router::new()
            .route("/all", get(handlers::franchise::list))
            .route("/stats", get(handlers::franchise::stats))
            .route("/:id", get(handlers::franchise::get)),
        state,
        Capability::ViewLeads,
    );

    let manage = guarded(
        Router::new()
            .route("/:id/status", put(handlers::franchise::update_status))
            .route("/:id", delete(handlers::franchise::delete)),
        state,
        Capability::ManageLeads,
    );

    public.merge(view).merge(manage)
}

fn blog_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/", get(handlers::blog::list))
        .route("/slug/:slug", get(handlers::blog::get_by_slug));

    let manage = guarded(
        Router::new()
            .route("/", post(handlers::blog::create))
            .route("/:id", put(handlers::blog::update).delete(handlers::blog::delete)),
        state,
        Capability::ManageBlog,
    );

    public.merge(manage)
}

fn application_routes(state: &AppState) -> Router<AppState> {
    let public = Router::new().route("/", post(handlers::applications::submit));

    let view = guarded(
        Router::new()
            .route("/", get(handlers::applications::list))
            .route("/:id", get(handlers::applications::get)),
        state,
        Capability::ViewApplications,
    );

    let manage = guarded(
        Router::new()
            .route("/bulk-delete", delete(handlers::applications::bulk_delete))
            .route("/:id", delete(handlers::applications::delete)),
        state,
        Capability::ManageApplications,
    );

    public.merge(view).merge(manage)
}
