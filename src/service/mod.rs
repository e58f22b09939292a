pub mod application_service;
pub mod blog_service;
pub mod consultation_service;
pub mod course_service;
pub mod dashboard_service;
pub mod enrollment_service;
pub mod franchise_service;
pub mod operator_service;
pub mod student_service;

use std::sync::Arc;
use sqlx::SqlitePool;
use crate::repository::*;
use crate::auth::{RateLimiter, TokenService};
use crate::config::Settings;
use crate::notifications::Notifier;
use application_service::ApplicationService;
use blog_service::BlogService;
use consultation_service::ConsultationService;
use course_service::CourseService;
use dashboard_service::DashboardService;
use enrollment_service::EnrollmentService;
use franchise_service::FranchiseService;
use operator_service::OperatorService;
use student_service::StudentService;

pub use dashboard_service::DashboardStats;
pub use enrollment_service::{ConfirmedPayment, PaymentIntent, PaymentSummary};

pub struct ServiceContext {
    pub operator_repo: Arc<dyn OperatorRepository>,
    pub token_service: Arc<TokenService>,
    pub registration_limiter: Arc<RateLimiter>,
    pub course_service: Arc<CourseService>,
    pub enrollment_service: Arc<EnrollmentService>,
    pub student_service: Arc<StudentService>,
    pub operator_service: Arc<OperatorService>,
    pub consultation_service: Arc<ConsultationService>,
    pub franchise_service: Arc<FranchiseService>,
    pub blog_service: Arc<BlogService>,
    pub application_service: Arc<ApplicationService>,
    pub dashboard_service: Arc<DashboardService>,
    pub db_pool: SqlitePool,
}

impl ServiceContext {
    pub fn new(db_pool: SqlitePool, settings: &Settings, notifier: Arc<dyn Notifier>) -> Self {
        let course_repo: Arc<dyn CourseRepository> = Arc::new(SqliteCourseRepository::new(db_pool.clone()));
        let payment_repo: Arc<dyn PaymentRepository> = Arc::new(SqlitePaymentRepository::new(db_pool.clone()));
        let enrollment_repo: Arc<dyn EnrollmentRepository> = Arc::new(SqliteEnrollmentRepository::new(db_pool.clone()));
        let student_repo: Arc<dyn StudentRepository> = Arc::new(SqliteStudentRepository::new(db_pool.clone()));
        let operator_repo: Arc<dyn OperatorRepository> = Arc::new(SqliteOperatorRepository::new(db_pool.clone()));
        let consultation_repo: Arc<dyn ConsultationRepository> =
            Arc::new(SqliteConsultationRepository::new(db_pool.clone()));
        let franchise_repo: Arc<dyn FranchiseRepository> = Arc::new(SqliteFranchiseRepository::new(db_pool.clone()));
        let blog_repo: Arc<dyn BlogRepository> = Arc::new(SqliteBlogRepository::new(db_pool.clone()));
        let application_repo: Arc<dyn ApplicationRepository> =
            Arc::new(SqliteApplicationRepository::new(db_pool.clone()));

        let token_service = Arc::new(TokenService::new(&settings.auth));
        let registration_limiter = Arc::new(RateLimiter::from_config(&settings.rate_limit));

        let course_service = Arc::new(CourseService::new(course_repo.clone()));
        let enrollment_service = Arc::new(EnrollmentService::new(
            payment_repo.clone(),
            enrollment_repo.clone(),
            course_repo.clone(),
            student_repo.clone(),
            notifier.clone(),
        ));
        let student_service = Arc::new(StudentService::new(
            student_repo.clone(),
            token_service.clone(),
            notifier.clone(),
            settings.server.base_url.clone(),
            settings.auth.verification_ttl_minutes,
        ));
        let operator_service = Arc::new(OperatorService::new(
            operator_repo.clone(),
            token_service.clone(),
            settings.auth.admin_create_key.clone(),
        ));
        let consultation_service = Arc::new(ConsultationService::new(consultation_repo.clone(), notifier.clone()));
        let franchise_service = Arc::new(FranchiseService::new(franchise_repo.clone(), notifier.clone()));
        let blog_service = Arc::new(BlogService::new(blog_repo.clone()));
        let application_service = Arc::new(ApplicationService::new(
            application_repo.clone(),
            notifier,
            &settings.mail.hr_addresses,
        ));
        let dashboard_service = Arc::new(DashboardService::new(
            course_repo,
            student_repo,
            enrollment_repo,
            payment_repo,
            consultation_repo,
            franchise_repo,
            application_repo,
            blog_repo,
        ));

        Self {
            operator_repo,
            token_service,
            registration_limiter,
            course_service,
            enrollment_service,
            student_service,
            operator_service,
            consultation_service,
            franchise_service,
            blog_service,
            application_service,
            dashboard_service,
            db_pool,
        }
    }
}
