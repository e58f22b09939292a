use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub amount: f64,
    pub currency: String,
    pub status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub provider: String,
    pub provider_payment_id: Option<String>,
    pub upi_id: Option<String>,
    pub initiated_at: DateTime<Utc>,
    pub transaction_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PaymentStatus::Pending),
            "completed" => Some(PaymentStatus::Completed),
            "failed" => Some(PaymentStatus::Failed),
            _ => None,
        }
    }

    /// Completed and failed are terminal.
    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        matches!(
            (self, next),
            (PaymentStatus::Pending, PaymentStatus::Completed)
                | (PaymentStatus::Pending, PaymentStatus::Failed)
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentMethod {
    #[serde(rename = "UPI")]
    Upi,
    #[serde(rename = "Net Banking")]
    NetBanking,
    #[serde(rename = "Cash")]
    Cash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Upi => "UPI",
            PaymentMethod::NetBanking => "Net Banking",
            PaymentMethod::Cash => "Cash",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upi" => Some(PaymentMethod::Upi),
            "net banking" | "netbanking" | "net_banking" => Some(PaymentMethod::NetBanking),
            "cash" => Some(PaymentMethod::Cash),
            _ => None,
        }
    }

    /// Lowercase provider tag stored alongside the payment.
    pub fn provider(&self) -> &'static str {
        match self {
            PaymentMethod::Upi => "upi",
            PaymentMethod::NetBanking => "net banking",
            PaymentMethod::Cash => "cash",
        }
    }

    /// Prefix a provider transaction id must carry for this method, if any.
    pub fn transaction_prefix(&self) -> Option<&'static str> {
        match self {
            PaymentMethod::Upi => Some("upi_"),
            PaymentMethod::NetBanking => Some("nb_"),
            PaymentMethod::Cash => None,
        }
    }

    pub fn accepts_transaction_id(&self, provider_payment_id: &str) -> bool {
        match self.transaction_prefix() {
            Some(prefix) => provider_payment_id.starts_with(prefix),
            None => !provider_payment_id.trim().is_empty(),
        }
    }
}

/// Method-specific fields supplied by the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub upi_id: Option<String>,
}

/// `handle@provider`, both parts non-empty, no whitespace.
pub fn is_valid_upi_id(upi_id: &str) -> bool {
    let Some((handle, provider)) = upi_id.split_once('@') else {
        return false;
    };
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_');
    !handle.is_empty()
        && !provider.is_empty()
        && handle.chars().all(allowed)
        && provider.chars().all(allowed)
}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub student_id: i64,
    pub course_id: i64,
    pub amount: f64,
    pub currency: String,
    pub payment_method: PaymentMethod,
    pub upi_id: Option<String>,
}

/// Body of a payment creation call. Required fields are optional here so the
/// workflow can report exactly which one is missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePaymentRequest {
    pub course_id: Option<i64>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub payment_method: Option<String>,
    #[serde(default)]
    pub payment_details: PaymentDetails,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmPaymentRequest {
    pub payment_id: Option<i64>,
    pub provider_payment_id: Option<String>,
    #[serde(default)]
    pub payment_details: PaymentDetails,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parsing() {
        assert_eq!(PaymentMethod::from_str("UPI"), Some(PaymentMethod::Upi));
        assert_eq!(PaymentMethod::from_str("Net Banking"), Some(PaymentMethod::NetBanking));
        assert_eq!(PaymentMethod::from_str("cash"), Some(PaymentMethod::Cash));
        assert_eq!(PaymentMethod::from_str("Card"), None);
    }

    #[test]
    fn test_transaction_prefixes() {
        assert!(PaymentMethod::Upi.accepts_transaction_id("upi_12345"));
        assert!(!PaymentMethod::Upi.accepts_transaction_id("nb_12345"));
        assert!(PaymentMethod::NetBanking.accepts_transaction_id("nb_998"));
        assert!(!PaymentMethod::NetBanking.accepts_transaction_id("upi_998"));
        assert!(PaymentMethod::Cash.accepts_transaction_id("receipt-42"));
        assert!(!PaymentMethod::Cash.accepts_transaction_id("   "));
    }

    #[test]
    fn test_upi_id_format() {
        assert!(is_valid_upi_id("student.one@okbank"));
        assert!(is_valid_upi_id("9876543210@upi"));
        assert!(!is_valid_upi_id("no-at-sign"));
        assert!(!is_valid_upi_id("@bank"));
        assert!(!is_valid_upi_id("name@"));
        assert!(!is_valid_upi_id("name @bank"));
    }

    #[test]
    fn test_status_transitions() {
        assert!(PaymentStatus::Pending.can_transition_to(PaymentStatus::Completed));
        assert!(PaymentStatus::Pending.can_transition_to(PaymentStatus::Failed));
        assert!(!PaymentStatus::Failed.can_transition_to(PaymentStatus::Completed));
        assert!(!PaymentStatus::Completed.can_transition_to(PaymentStatus::Pending));
    }
}
