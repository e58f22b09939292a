use std::sync::Arc;
use validator::Validate;
use crate::{
    domain::*,
    error::{AppError, Result},
    notifications::{Notification, Notifier},
    repository::ConsultationRepository,
};

pub struct ConsultationService {
    repo: Arc<dyn ConsultationRepository>,
    notifier: Arc<dyn Notifier>,
}

impl ConsultationService {
    pub fn new(repo: Arc<dyn ConsultationRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self { repo, notifier }
    }

    pub async fn create(&self, request: CreateConsultationRequest) -> Result<Consultation> {
        let request = CreateConsultationRequest {
            full_name: sanitize(&request.full_name),
            email: request.email.trim().to_lowercase(),
            phone: request.phone.trim().to_string(),
            service_interest: sanitize(&request.service_interest),
            requirement_description: sanitize(&request.requirement_description),
            city_country: sanitize(&request.city_country),
            company_name: request.company_name.as_deref().map(sanitize).filter(|c| !c.is_empty()),
            preferred_mode: request.preferred_mode.as_deref().map(sanitize).filter(|m| !m.is_empty()),
            ..request
        };
        request.validate()?;

        let consultation = self.repo.create(request).await?;
        tracing::info!("Consultation {} received", consultation.id);

        self.notifier.notify(Notification::ConsultationReceived {
            email: consultation.email.clone(),
            full_name: consultation.full_name.clone(),
        });
        self.notifier.notify(Notification::ConsultationAlert(consultation.clone()));

        Ok(consultation)
    }

    pub async fn list(&self) -> Result<Vec<Consultation>> {
        self.repo.list().await
    }

    pub async fn update_status(&self, id: i64, status: &str) -> Result<Consultation> {
        let status = ConsultationStatus::from_str(status)
            .ok_or_else(|| AppError::Validation(format!("Invalid consultation status: {}", status)))?;
        self.repo.update_status(id, status).await
    }
}
