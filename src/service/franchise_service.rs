use std::sync::Arc;
use validator::Validate;
use crate::{
    domain::*,
    error::{AppError, Result},
    notifications::{Notification, Notifier},
    repository::FranchiseRepository,
};

pub struct FranchiseService {
    repo: Arc<dyn FranchiseRepository>,
    notifier: Arc<dyn Notifier>,
}

impl FranchiseService {
    pub fn new(repo: Arc<dyn FranchiseRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self { repo, notifier }
    }

    /// `ip` is the submitting client as seen by the server, stored for abuse review.
    pub async fn submit(&self, request: CreateFranchiseRequest, ip: Option<String>) -> Result<FranchiseLead> {
        let request = CreateFranchiseRequest {
            name: sanitize(&request.name),
            mobile: request.mobile.trim().to_string(),
            email: request.email.trim().to_lowercase(),
            city: sanitize(&request.city),
            interested: sanitize(&request.interested),
        };

        if [&request.name, &request.mobile, &request.email, &request.city, &request.interested]
            .iter()
            .any(|field| field.is_empty())
        {
            return Err(AppError::Validation("All fields are required".to_string()));
        }
        request.validate()?;
        if !is_valid_mobile(&request.mobile) {
            return Err(AppError::Validation("Mobile number must be 10 digits".to_string()));
        }

        let lead = self
            .repo
            .create(NewFranchiseLead {
                name: request.name,
                mobile: request.mobile,
                email: request.email,
                city: request.city,
                interested: request.interested,
                ip,
            })
            .await?;
        tracing::info!("Franchise enquiry {} from {}", lead.id, lead.city);

        self.notifier.notify(Notification::FranchiseReceived {
            email: lead.email.clone(),
            name: lead.name.clone(),
        });
        self.notifier.notify(Notification::FranchiseAlert(lead.clone()));

        Ok(lead)
    }

    pub async fn list(&self) -> Result<Vec<FranchiseLead>> {
        self.repo.list().await
    }

    pub async fn get(&self, id: i64) -> Result<FranchiseLead> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Franchise lead not found".to_string()))
    }

    pub async fn stats(&self) -> Result<FranchiseStats> {
        Ok(FranchiseStats {
            total: self.repo.count().await?,
            pending: self.repo.count_by_status(FranchiseStatus::Pending).await?,
            contacted: self.repo.count_by_status(FranchiseStatus::Contacted).await?,
            approved: self.repo.count_by_status(FranchiseStatus::Approved).await?,
            rejected: self.repo.count_by_status(FranchiseStatus::Rejected).await?,
        })
    }

    /// Missing notes clear any previous notes.
    pub async fn update_status(&self, id: i64, update: FranchiseStatusUpdate) -> Result<FranchiseLead> {
        let status = FranchiseStatus::from_str(&update.status)
            .ok_or_else(|| AppError::Validation("Invalid status".to_string()))?;
        let notes = update.notes.as_deref().map(sanitize).unwrap_or_default();
        self.repo.update_status(id, status, &notes).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound("Franchise lead not found".to_string()));
        }
        tracing::info!("Deleted franchise lead {}", id);
        Ok(())
    }
}
