//! Notification preferences attached to a ticket at creation.
//!
//! Delivery is handled elsewhere; this module only defines and checks the
//! shape. Unknown keys are rejected during deserialization.

use serde::{Deserialize, Serialize};

use crate::validation::{is_valid_email, is_valid_phone_number, normalize_email};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<EmailNotification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<PhoneNotification>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmailNotification {
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhoneNotification {
    pub number: String,
    pub carrier: String,
}

impl NotificationSettings {
    /// Check field formats, returning a message for the first violation.
    pub fn check(&self) -> Result<(), String> {
        if let Some(email) = &self.email {
            if !is_valid_email(&email.address) {
                return Err(format!(
                    "notifications.email.address '{}' is not a valid email address",
                    email.address
                ));
            }
        }
        if let Some(phone) = &self.phone {
            if !is_valid_phone_number(&phone.number) {
                return Err(format!(
                    "notifications.phone.number '{}' is not a valid phone number",
                    phone.number
                ));
            }
            if phone.carrier.trim().is_empty() {
                return Err("notifications.phone.carrier must not be empty".into());
            }
        }
        Ok(())
    }

    /// Canonical form stored on the ticket.
    pub fn normalized(mut self) -> Self {
        if let Some(email) = self.email.as_mut() {
            email.address = normalize_email(&email.address);
        }
        if let Some(phone) = self.phone.as_mut() {
            phone.carrier = phone.carrier.trim().to_string();
        }
        self
    }
}
