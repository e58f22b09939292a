use std::sync::Arc;
use serde::Serialize;
use crate::{
    domain::*,
    error::Result,
    repository::*,
};

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_courses: i64,
    pub total_students: i64,
    pub active_enrollments: i64,
    pub pending_enrollments: i64,
    pub completed_payments: i64,
    pub pending_payments: i64,
    pub failed_payments: i64,
    pub pending_consultations: i64,
    pub pending_franchise_leads: i64,
    pub job_applications: i64,
    pub blog_posts: i64,
}

pub struct DashboardService {
    course_repo: Arc<dyn CourseRepository>,
    student_repo: Arc<dyn StudentRepository>,
    enrollment_repo: Arc<dyn EnrollmentRepository>,
    payment_repo: Arc<dyn PaymentRepository>,
    consultation_repo: Arc<dyn ConsultationRepository>,
    franchise_repo: Arc<dyn FranchiseRepository>,
    application_repo: Arc<dyn ApplicationRepository>,
    blog_repo: Arc<dyn BlogRepository>,
}

impl DashboardService {
    pub fn new(
        course_repo: Arc<dyn CourseRepository>,
        student_repo: Arc<dyn StudentRepository>,
        enrollment_repo: Arc<dyn EnrollmentRepository>,
        payment_repo: Arc<dyn PaymentRepository>,
        consultation_repo: Arc<dyn ConsultationRepository>,
        franchise_repo: Arc<dyn FranchiseRepository>,
        application_repo: Arc<dyn ApplicationRepository>,
        blog_repo: Arc<dyn BlogRepository>,
    ) -> Self {
        Self {
            course_repo,
            student_repo,
            enrollment_repo,
            payment_repo,
            consultation_repo,
            franchise_repo,
            application_repo,
            blog_repo,
        }
    }

    pub async fn stats(&self) -> Result<DashboardStats> {
        Ok(DashboardStats {
            total_courses: self.course_repo.count().await?,
            total_students: self.student_repo.count().await?,
            active_enrollments: self.enrollment_repo.count_by_status(EnrollmentStatus::Active).await?,
            pending_enrollments: self.enrollment_repo.count_by_status(EnrollmentStatus::Pending).await?,
            completed_payments: self.payment_repo.count_by_status(PaymentStatus::Completed).await?,
            pending_payments: self.payment_repo.count_by_status(PaymentStatus::Pending).await?,
            failed_payments: self.payment_repo.count_by_status(PaymentStatus::Failed).await?,
            pending_consultations: self
                .consultation_repo
                .count_by_status(ConsultationStatus::Pending)
                .await?,
            pending_franchise_leads: self
                .franchise_repo
                .count_by_status(FranchiseStatus::Pending)
                .await?,
            job_applications: self.application_repo.count().await?,
            blog_posts: self.blog_repo.count().await?,
        })
    }
}
