use std::collections::HashMap;
use std::sync::Arc;
use chrono::Utc;
use serde::Serialize;
use crate::{
    domain::*,
    error::{AppError, Result},
    notifications::{Notification, Notifier},
    repository::{CourseRepository, EnrollmentRepository, PaymentRepository, StudentRepository},
};

pub const ADMIN_PAYMENT_LIMIT: i64 = 200;
const DEFAULT_CURRENCY: &str = "INR";

#[derive(Debug, Clone, Serialize)]
pub struct PaymentIntent {
    pub payment_id: i64,
    pub client_secret: String,
    pub payment: Payment,
    pub enrollment: Enrollment,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfirmedPayment {
    pub payment: Payment,
    pub enrollment: Enrollment,
    pub course: Course,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentSummary {
    #[serde(flatten)]
    pub payment: Payment,
    pub student_username: Option<String>,
    pub course_title: Option<String>,
}

/// Drives the payment and enrollment state machines together.
///
/// A payment moves pending → completed | failed exactly once. The enrollment
/// for the same (student, course) pair is written pending on every create and
/// only becomes active when its payment completes.
pub struct EnrollmentService {
    payment_repo: Arc<dyn PaymentRepository>,
    enrollment_repo: Arc<dyn EnrollmentRepository>,
    course_repo: Arc<dyn CourseRepository>,
    student_repo: Arc<dyn StudentRepository>,
    notifier: Arc<dyn Notifier>,
}

impl EnrollmentService {
    pub fn new(
        payment_repo: Arc<dyn PaymentRepository>,
        enrollment_repo: Arc<dyn EnrollmentRepository>,
        course_repo: Arc<dyn CourseRepository>,
        student_repo: Arc<dyn StudentRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            payment_repo,
            enrollment_repo,
            course_repo,
            student_repo,
            notifier,
        }
    }

    pub async fn create_payment(&self, student_id: i64, request: CreatePaymentRequest) -> Result<PaymentIntent> {
        let course_id = request
            .course_id
            .ok_or_else(|| AppError::Validation("course_id is required".to_string()))?;
        let amount = request
            .amount
            .ok_or_else(|| AppError::Validation("amount is required".to_string()))?;
        let method_name = request
            .payment_method
            .ok_or_else(|| AppError::Validation("payment_method is required".to_string()))?;

        if !amount.is_finite() || amount <= 0.0 {
            return Err(AppError::Validation("amount must be a positive number".to_string()));
        }

        let payment_method = PaymentMethod::from_str(&method_name)
            .ok_or_else(|| AppError::Validation(format!("Unsupported payment method: {}", method_name)))?;

        let currency = match request.currency.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_CURRENCY.to_string(),
            Some(c) if c.len() == 3 && c.chars().all(|ch| ch.is_ascii_alphabetic()) => c.to_ascii_uppercase(),
            Some(c) => return Err(AppError::Validation(format!("Invalid currency: {}", c))),
        };

        let upi_id = match payment_method {
            PaymentMethod::Upi => {
                let upi_id = request
                    .payment_details
                    .upi_id
                    .as_deref()
                    .map(str::trim)
                    .filter(|u| !u.is_empty())
                    .ok_or_else(|| AppError::Validation("UPI ID is required".to_string()))?;
                if !is_valid_upi_id(upi_id) {
                    return Err(AppError::Validation("Invalid UPI ID format".to_string()));
                }
                Some(upi_id.to_string())
            }
            PaymentMethod::NetBanking | PaymentMethod::Cash => None,
        };

        if self.course_repo.find_by_id(course_id).await?.is_none() {
            return Err(AppError::NotFound("Course not found".to_string()));
        }

        if let Some(existing) = self
            .enrollment_repo
            .find_by_student_and_course(student_id, course_id)
            .await?
        {
            if existing.status == EnrollmentStatus::Active {
                return Err(AppError::Validation("Already enrolled in this course".to_string()));
            }
        }

        let payment = self
            .payment_repo
            .create(NewPayment {
                student_id,
                course_id,
                amount,
                currency,
                payment_method,
                upi_id,
            })
            .await?;

        let enrollment = self
            .enrollment_repo
            .upsert(student_id, course_id, EnrollmentStatus::Pending, payment.id)
            .await?;

        tracing::info!(
            "Payment {} created for student {} course {} via {}",
            payment.id,
            student_id,
            course_id,
            payment_method.as_str()
        );

        Ok(PaymentIntent {
            payment_id: payment.id,
            client_secret: format!("{}_mock_client_{}", payment.provider.replace(' ', "_"), payment.id),
            payment,
            enrollment,
        })
    }

    pub async fn confirm_payment(&self, student_id: i64, request: ConfirmPaymentRequest) -> Result<ConfirmedPayment> {
        let payment_id = request
            .payment_id
            .ok_or_else(|| AppError::Validation("payment_id is required".to_string()))?;
        let provider_payment_id = request
            .provider_payment_id
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::Validation("provider_payment_id is required".to_string()))?
            .to_string();

        let payment = self
            .payment_repo
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

        if payment.student_id != student_id {
            return Err(AppError::Forbidden("Not your payment".to_string()));
        }

        if !payment.status.can_transition_to(PaymentStatus::Completed) {
            return Err(AppError::Validation("Payment is no longer pending".to_string()));
        }

        let enrollment = self
            .enrollment_repo
            .find_by_student_and_course(student_id, payment.course_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Enrollment not found".to_string()))?;

        // Only the payment the enrollment currently points at can activate it
        if enrollment.payment_id != Some(payment.id) {
            return Err(AppError::Validation(
                "Payment has been superseded by a newer payment".to_string(),
            ));
        }
        if !enrollment.status.can_transition_to(EnrollmentStatus::Active) {
            return Err(AppError::Validation(format!(
                "Enrollment is {} and cannot be activated",
                enrollment.status.as_str()
            )));
        }

        if payment.payment_method == PaymentMethod::Upi {
            if let Some(supplied) = request.payment_details.upi_id.as_deref().map(str::trim) {
                if payment.upi_id.as_deref() != Some(supplied) {
                    return Err(AppError::Validation(
                        "UPI ID does not match the payment".to_string(),
                    ));
                }
            }
        }

        if !payment.payment_method.accepts_transaction_id(&provider_payment_id) {
            self.payment_repo.mark_failed(payment.id).await?;
            tracing::warn!(
                "Payment {} failed: transaction id does not match {}",
                payment.id,
                payment.payment_method.as_str()
            );
            let message = match payment.payment_method {
                PaymentMethod::Upi => "Invalid UPI transaction ID",
                PaymentMethod::NetBanking => "Invalid Net Banking transaction ID",
                PaymentMethod::Cash => "Invalid transaction ID",
            };
            return Err(AppError::Validation(message.to_string()));
        }

        let completed = self
            .payment_repo
            .mark_completed(payment.id, &provider_payment_id, Utc::now())
            .await?;

        let enrollment = self
            .enrollment_repo
            .update_status(enrollment.id, EnrollmentStatus::Active)
            .await?;

        let course = self
            .course_repo
            .find_by_id(completed.course_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

        tracing::info!(
            "Payment {} completed, enrollment {} active",
            completed.id,
            enrollment.id
        );

        if let Some(student) = self.student_repo.find_by_id(student_id).await? {
            self.notifier.notify(Notification::EnrollmentActivated {
                email: student.email,
                username: student.username,
                course_title: course.title.clone(),
                amount: completed.amount,
                currency: completed.currency.clone(),
            });
        }

        Ok(ConfirmedPayment {
            payment: completed,
            enrollment,
            course,
        })
    }

    pub async fn payments_for_student(&self, student_id: i64) -> Result<Vec<Payment>> {
        self.payment_repo.find_by_student(student_id).await
    }

    pub async fn recent_payments(&self) -> Result<Vec<PaymentSummary>> {
        let payments = self.payment_repo.list_recent(ADMIN_PAYMENT_LIMIT).await?;

        let mut course_ids: Vec<i64> = payments.iter().map(|p| p.course_id).collect();
        course_ids.sort_unstable();
        course_ids.dedup();
        let titles: HashMap<i64, String> = self
            .course_repo
            .list_by_ids(&course_ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c.title))
            .collect();

        let mut usernames: HashMap<i64, Option<String>> = HashMap::new();
        let mut summaries = Vec::with_capacity(payments.len());
        for payment in payments {
            if !usernames.contains_key(&payment.student_id) {
                let username = self
                    .student_repo
                    .find_by_id(payment.student_id)
                    .await?
                    .map(|s| s.username);
                usernames.insert(payment.student_id, username);
            }

            summaries.push(PaymentSummary {
                student_username: usernames.get(&payment.student_id).cloned().flatten(),
                course_title: titles.get(&payment.course_id).cloned(),
                payment,
            });
        }

        Ok(summaries)
    }

    /// Courses the student holds an active enrollment for.
    pub async fn active_courses(&self, student_id: i64) -> Result<Vec<Course>> {
        let enrollments = self
            .enrollment_repo
            .find_by_student(student_id, Some(EnrollmentStatus::Active))
            .await?;
        let ids: Vec<i64> = enrollments.iter().map(|e| e.course_id).collect();
        self.course_repo.list_by_ids(&ids).await
    }

    pub async fn list_enrollments(&self) -> Result<Vec<Enrollment>> {
        self.enrollment_repo.list().await
    }

    pub async fn update_enrollment_status(&self, id: i64, status: &str) -> Result<Enrollment> {
        let next = EnrollmentStatus::from_str(status)
            .ok_or_else(|| AppError::Validation(format!("Invalid enrollment status: {}", status)))?;

        let enrollment = self
            .enrollment_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Enrollment not found".to_string()))?;

        if !enrollment.status.can_transition_to(next) {
            return Err(AppError::Validation(format!(
                "Cannot move enrollment from {} to {}",
                enrollment.status.as_str(),
                next.as_str()
            )));
        }

        self.enrollment_repo.update_status(id, next).await
    }
}
