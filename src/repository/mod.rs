use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crate::domain::*;
use crate::error::Result;

pub mod application_repository;
pub mod blog_repository;
pub mod consultation_repository;
pub mod course_repository;
pub mod enrollment_repository;
pub mod franchise_repository;
pub mod operator_repository;
pub mod payment_repository;
pub mod student_repository;

pub use application_repository::SqliteApplicationRepository;
pub use blog_repository::SqliteBlogRepository;
pub use consultation_repository::SqliteConsultationRepository;
pub use course_repository::SqliteCourseRepository;
pub use enrollment_repository::SqliteEnrollmentRepository;
pub use franchise_repository::SqliteFranchiseRepository;
pub use operator_repository::SqliteOperatorRepository;
pub use payment_repository::SqlitePaymentRepository;
pub use student_repository::SqliteStudentRepository;

#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn create(&self, record: CourseRecord) -> Result<Course>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Course>>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Course>>;
    /// True when `slug` is taken by a course other than `excluding`.
    async fn slug_exists(&self, slug: &str, excluding: Option<i64>) -> Result<bool>;
    async fn list(&self) -> Result<Vec<Course>>;
    async fn list_by_ids(&self, ids: &[i64]) -> Result<Vec<Course>>;
    async fn list_related(&self, id: i64, category: Option<&str>, limit: i64) -> Result<Vec<Course>>;
    async fn update(&self, id: i64, record: CourseRecord) -> Result<Course>;
    /// Returns false when nothing was deleted.
    async fn delete(&self, id: i64) -> Result<bool>;
    async fn count(&self) -> Result<i64>;
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn create(&self, payment: NewPayment) -> Result<Payment>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Payment>>;
    async fn find_by_student(&self, student_id: i64) -> Result<Vec<Payment>>;
    async fn list_recent(&self, limit: i64) -> Result<Vec<Payment>>;
    async fn mark_completed(
        &self,
        id: i64,
        provider_payment_id: &str,
        transaction_time: DateTime<Utc>,
    ) -> Result<Payment>;
    async fn mark_failed(&self, id: i64) -> Result<Payment>;
    async fn count_by_status(&self, status: PaymentStatus) -> Result<i64>;
}

#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Insert or overwrite the enrollment for (student, course); last writer wins.
    async fn upsert(
        &self,
        student_id: i64,
        course_id: i64,
        status: EnrollmentStatus,
        payment_id: i64,
    ) -> Result<Enrollment>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Enrollment>>;
    async fn find_by_student_and_course(&self, student_id: i64, course_id: i64) -> Result<Option<Enrollment>>;
    async fn find_by_student(&self, student_id: i64, status: Option<EnrollmentStatus>) -> Result<Vec<Enrollment>>;
    async fn list(&self) -> Result<Vec<Enrollment>>;
    async fn update_status(&self, id: i64, status: EnrollmentStatus) -> Result<Enrollment>;
    async fn count_by_status(&self, status: EnrollmentStatus) -> Result<i64>;
}

#[async_trait]
pub trait StudentRepository: Send + Sync {
    async fn create(&self, student: NewStudent) -> Result<Student>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Student>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Student>>;
    async fn find_by_verification_hash(&self, token_hash: &str) -> Result<Option<Student>>;
    async fn get_password_hash(&self, email: &str) -> Result<Option<String>>;
    async fn set_verification(&self, id: i64, token_hash: &str, expires: DateTime<Utc>) -> Result<()>;
    async fn mark_verified(&self, id: i64) -> Result<()>;
    async fn count(&self) -> Result<i64>;
}

#[async_trait]
pub trait OperatorRepository: Send + Sync {
    async fn create(&self, operator: NewOperator) -> Result<Operator>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Operator>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<Operator>>;
    async fn get_password_hash(&self, username: &str) -> Result<Option<String>>;
}

#[async_trait]
pub trait ConsultationRepository: Send + Sync {
    async fn create(&self, request: CreateConsultationRequest) -> Result<Consultation>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Consultation>>;
    async fn list(&self) -> Result<Vec<Consultation>>;
    async fn update_status(&self, id: i64, status: ConsultationStatus) -> Result<Consultation>;
    async fn count_by_status(&self, status: ConsultationStatus) -> Result<i64>;
}

#[async_trait]
pub trait FranchiseRepository: Send + Sync {
    async fn create(&self, lead: NewFranchiseLead) -> Result<FranchiseLead>;
    async fn find_by_id(&self, id: i64) -> Result<Option<FranchiseLead>>;
    async fn list(&self) -> Result<Vec<FranchiseLead>>;
    async fn update_status(&self, id: i64, status: FranchiseStatus, notes: &str) -> Result<FranchiseLead>;
    async fn delete(&self, id: i64) -> Result<bool>;
    async fn count(&self) -> Result<i64>;
    async fn count_by_status(&self, status: FranchiseStatus) -> Result<i64>;
}

#[async_trait]
pub trait BlogRepository: Send + Sync {
    async fn create(&self, record: BlogRecord) -> Result<BlogPost>;
    async fn find_by_id(&self, id: i64) -> Result<Option<BlogPost>>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<BlogPost>>;
    async fn slug_exists(&self, slug: &str) -> Result<bool>;
    async fn list(&self) -> Result<Vec<BlogPost>>;
    async fn update(&self, id: i64, record: BlogRecord) -> Result<BlogPost>;
    async fn delete(&self, id: i64) -> Result<bool>;
    async fn count(&self) -> Result<i64>;
}

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn create(&self, request: CreateApplicationRequest) -> Result<JobApplication>;
    async fn find_by_id(&self, id: i64) -> Result<Option<JobApplication>>;
    async fn list(&self) -> Result<Vec<JobApplication>>;
    async fn delete(&self, id: i64) -> Result<bool>;
    /// Returns the number of rows removed.
    async fn delete_many(&self, ids: &[i64]) -> Result<u64>;
    async fn count(&self) -> Result<i64>;
}
