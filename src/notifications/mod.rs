use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::{Consultation, FranchiseLead, JobApplication};
use crate::error::Result;

pub mod smtp;

pub use smtp::SmtpMailer;

#[derive(Debug, Clone)]
pub enum Notification {
    StudentVerification {
        email: String,
        username: String,
        verify_url: String,
    },
    EnrollmentActivated {
        email: String,
        username: String,
        course_title: String,
        amount: f64,
        currency: String,
    },
    ConsultationReceived {
        email: String,
        full_name: String,
    },
    ConsultationAlert(Consultation),
    FranchiseReceived {
        email: String,
        name: String,
    },
    FranchiseAlert(FranchiseLead),
    /// Routed to the HR inbox for the applicant's location, else the admin.
    ApplicationReceived {
        hr_address: Option<String>,
        application: JobApplication,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Turn a notification into a plain-text mail. Admin alerts are dropped when
/// no admin address is configured.
pub fn render(notification: &Notification, admin_address: Option<&str>) -> Option<OutgoingMail> {
    match notification {
        Notification::StudentVerification { email, username, verify_url } => Some(OutgoingMail {
            to: email.clone(),
            subject: "Verify your email address".to_string(),
            body: format!(
                "Hi {},\n\nPlease confirm your email address by opening the link below:\n\n{}\n\nThe link expires soon. If you did not sign up, ignore this message.\n",
                username, verify_url
            ),
        }),
        Notification::EnrollmentActivated { email, username, course_title, amount, currency } => {
            Some(OutgoingMail {
                to: email.clone(),
                subject: format!("You're enrolled in {}", course_title),
                body: format!(
                    "Hi {},\n\nWe received your payment of {:.2} {}. Your enrollment in {} is now active.\n",
                    username, amount, currency, course_title
                ),
            })
        }
        Notification::ConsultationReceived { email, full_name } => Some(OutgoingMail {
            to: email.clone(),
            subject: "We received your consultation request".to_string(),
            body: format!(
                "Hi {},\n\nThanks for reaching out. Our team will contact you shortly.\n",
                full_name
            ),
        }),
        Notification::ConsultationAlert(consultation) => {
            let to = admin_address?;
            Some(OutgoingMail {
                to: to.to_string(),
                subject: format!("New consultation request from {}", consultation.full_name),
                body: format!(
                    "Name: {}\nEmail: {}\nPhone: {} {}\nService: {}\nLocation: {}\nCompany: {}\nPreferred mode: {}\n\n{}\n",
                    consultation.full_name,
                    consultation.email,
                    consultation.country_code,
                    consultation.phone,
                    consultation.service_interest,
                    consultation.city_country,
                    consultation.company_name.as_deref().unwrap_or("-"),
                    consultation.preferred_mode.as_deref().unwrap_or("-"),
                    consultation.requirement_description,
                ),
            })
        }
        Notification::FranchiseReceived { email, name } => Some(OutgoingMail {
            to: email.clone(),
            subject: "Your franchise enquiry".to_string(),
            body: format!(
                "Hi {},\n\nThank you for your interest in an Academy franchise. Our partnerships team will call you within two working days.\n",
                name
            ),
        }),
        Notification::FranchiseAlert(lead) => {
            let to = admin_address?;
            Some(OutgoingMail {
                to: to.to_string(),
                subject: format!("New franchise enquiry from {} ({})", lead.name, lead.city),
                body: format!(
                    "Name: {}\nMobile: {}\nEmail: {}\nCity: {}\nInterested in: {}\nIP: {}\n",
                    lead.name,
                    lead.mobile,
                    lead.email,
                    lead.city,
                    lead.interested,
                    lead.ip.as_deref().unwrap_or("-"),
                ),
            })
        }
        Notification::ApplicationReceived { hr_address, application } => {
            let to = hr_address.as_deref().or(admin_address)?;
            let ctc = |amount: Option<f64>, currency: &Option<String>, period: &Option<String>| match amount {
                Some(amount) => format!(
                    "{} {} ({})",
                    amount,
                    currency.as_deref().unwrap_or(""),
                    period.as_deref().unwrap_or("-")
                ),
                None => "-".to_string(),
            };
            let location = application.location.as_deref().unwrap_or("-");
            Some(OutgoingMail {
                to: to.to_string(),
                subject: format!("New Job Application for {} ({})", application.position, location),
                body: format!(
                    "Name: {}\nEmail: {}\nPhone: {}\nPosition: {}\nExperience: {} years\nLocation: {}\nCurrent CTC: {}\nExpected CTC: {}\n\n{}\n",
                    application.name,
                    application.email,
                    application.phone.as_deref().unwrap_or("-"),
                    application.position,
                    application.experience.map(|e| e.to_string()).unwrap_or_else(|| "-".to_string()),
                    location,
                    ctc(
                        application.current_ctc_amount,
                        &application.current_ctc_currency,
                        &application.current_ctc_period
                    ),
                    ctc(
                        application.expected_ctc_amount,
                        &application.expected_ctc_currency,
                        &application.expected_ctc_period
                    ),
                    application.cover_letter.as_deref().unwrap_or(""),
                ),
            })
        }
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    fn name(&self) -> &str;
    async fn send(&self, mail: &OutgoingMail) -> Result<()>;
}

/// Fire-and-forget sink used by the services. Implementations must not block
/// the caller or surface delivery failures.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes mail to the log instead of sending it. Used when SMTP is not configured.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, mail: &OutgoingMail) -> Result<()> {
        tracing::info!("Mail to {}: {}\n{}", mail.to, mail.subject, mail.body);
        Ok(())
    }
}

/// Bounded in-process queue drained by a single background worker.
pub struct NotificationQueue {
    sender: mpsc::Sender<Notification>,
}

impl NotificationQueue {
    pub fn start(
        mailer: Arc<dyn Mailer>,
        admin_address: Option<String>,
        capacity: usize,
    ) -> (Self, JoinHandle<()>) {
        let (sender, mut receiver) = mpsc::channel::<Notification>(capacity.max(1));

        let worker = tokio::spawn(async move {
            while let Some(notification) = receiver.recv().await {
                let Some(mail) = render(&notification, admin_address.as_deref()) else {
                    tracing::debug!("No recipient for {:?}, skipping", notification);
                    continue;
                };

                match mailer.send(&mail).await {
                    Ok(_) => tracing::debug!("Mailer {} delivered '{}'", mailer.name(), mail.subject),
                    Err(e) => tracing::error!(
                        "Mailer {} failed to deliver '{}' to {}: {:?}",
                        mailer.name(),
                        mail.subject,
                        mail.to,
                        e
                    ),
                }
            }
            tracing::info!("Notification queue closed");
        });

        (Self { sender }, worker)
    }
}

impl Notifier for NotificationQueue {
    fn notify(&self, notification: Notification) {
        if let Err(e) = self.sender.try_send(notification) {
            match e {
                mpsc::error::TrySendError::Full(n) => {
                    tracing::warn!("Notification queue full, dropping {:?}", n)
                }
                mpsc::error::TrySendError::Closed(n) => {
                    tracing::warn!("Notification queue closed, dropping {:?}", n)
                }
            }
        }
    }
}
