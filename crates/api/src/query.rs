//! Query parameter types for the user lookup endpoints.

use ohq_core::error::CoreError;
use ohq_core::types::{CourseId, UserId};
use serde::Deserialize;

/// `?ids=a,b&course_id=c`.
#[derive(Debug, Deserialize)]
pub struct UserIdsParams {
    pub ids: String,
    pub course_id: CourseId,
}

impl UserIdsParams {
    /// Parse the comma-separated id list. Blank entries are skipped.
    pub fn user_ids(&self) -> Result<Vec<UserId>, CoreError> {
        split_list(&self.ids)
            .map(|raw| {
                raw.parse::<UserId>()
                    .map_err(|_| CoreError::Validation(format!("'{raw}' is not a valid user id")))
            })
            .collect()
    }
}

/// `?emails=a,b`.
#[derive(Debug, Deserialize)]
pub struct UserEmailsParams {
    pub emails: String,
}

impl UserEmailsParams {
    pub fn emails(&self) -> Vec<String> {
        split_list(&self.emails).map(str::to_string).collect()
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}
