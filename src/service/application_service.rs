use std::collections::HashMap;
use std::sync::Arc;
use validator::Validate;
use crate::{
    domain::*,
    error::{AppError, Result},
    notifications::{Notification, Notifier},
    repository::ApplicationRepository,
};

pub struct ApplicationService {
    repo: Arc<dyn ApplicationRepository>,
    notifier: Arc<dyn Notifier>,
    hr_addresses: HashMap<String, String>,
}

impl ApplicationService {
    pub fn new(
        repo: Arc<dyn ApplicationRepository>,
        notifier: Arc<dyn Notifier>,
        hr_addresses: &HashMap<String, String>,
    ) -> Self {
        let hr_addresses = hr_addresses
            .iter()
            .map(|(location, address)| (location.trim().to_lowercase(), address.clone()))
            .collect();
        Self { repo, notifier, hr_addresses }
    }

    pub fn hr_address_for(&self, location: Option<&str>) -> Option<&str> {
        let key = location?.trim().to_lowercase();
        self.hr_addresses.get(&key).map(String::as_str)
    }

    pub async fn submit(&self, request: CreateApplicationRequest) -> Result<JobApplication> {
        let clean = |value: Option<String>| value.as_deref().map(sanitize).filter(|v| !v.is_empty());
        let request = CreateApplicationRequest {
            name: sanitize(&request.name),
            email: request.email.trim().to_lowercase(),
            phone: clean(request.phone),
            position: sanitize(&request.position),
            cover_letter: clean(request.cover_letter),
            current_ctc_currency: clean(request.current_ctc_currency),
            current_ctc_period: clean(request.current_ctc_period),
            expected_ctc_currency: clean(request.expected_ctc_currency),
            expected_ctc_period: clean(request.expected_ctc_period),
            location: clean(request.location),
            ..request
        };
        request.validate()?;

        let application = self.repo.create(request).await?;
        let hr_address = self.hr_address_for(application.location.as_deref()).map(str::to_string);
        if hr_address.is_none() {
            tracing::warn!(
                "No HR inbox for location {:?}; application {} goes to the admin address",
                application.location,
                application.id
            );
        }
        tracing::info!("Application {} received for {}", application.id, application.position);

        self.notifier.notify(Notification::ApplicationReceived {
            hr_address,
            application: application.clone(),
        });

        Ok(application)
    }

    pub async fn list(&self) -> Result<Vec<JobApplication>> {
        self.repo.list().await
    }

    pub async fn get(&self, id: i64) -> Result<JobApplication> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Application not found".to_string()))
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.repo.delete(id).await? {
            return Err(AppError::NotFound("Application not found".to_string()));
        }
        Ok(())
    }

    pub async fn delete_many(&self, ids: &[i64]) -> Result<u64> {
        if ids.is_empty() {
            return Err(AppError::Validation("ids required".to_string()));
        }
        let deleted = self.repo.delete_many(ids).await?;
        tracing::info!("Bulk deleted {} of {} applications", deleted, ids.len());
        Ok(deleted)
    }
}
