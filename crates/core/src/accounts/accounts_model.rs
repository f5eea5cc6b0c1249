//! Stellar account domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::AccountError;
use crate::errors::Result;
use crate::ledger::is_valid_public_key;

/// Longest label accepted for an account.
pub const MAX_LABEL_LENGTH: usize = 100;

/// A ledger account linked to a user.
///
/// Accounts are never hard-deleted; removal flips `is_active` so snapshot
/// provenance stays intact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StellarAccount {
    pub id: String,
    pub user_id: String,
    pub public_key: String,
    pub label: Option<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for linking an account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStellarAccount {
    pub user_id: String,
    pub public_key: String,
    pub label: Option<String>,
}

impl NewStellarAccount {
    pub fn new(user_id: &str, public_key: &str, label: Option<String>) -> Self {
        Self {
            user_id: user_id.to_string(),
            public_key: public_key.trim().to_string(),
            label: normalize_label(label),
        }
    }

    /// Validates the link request.
    pub fn validate(&self) -> Result<()> {
        if !is_valid_public_key(&self.public_key) {
            return Err(AccountError::InvalidPublicKey(self.public_key.clone()).into());
        }
        validate_label(self.label.as_deref())
    }
}

/// Trims a label; blank labels become `None`.
pub fn normalize_label(label: Option<String>) -> Option<String> {
    label
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
}

pub(crate) fn validate_label(label: Option<&str>) -> Result<()> {
    match label {
        Some(l) if l.chars().count() > MAX_LABEL_LENGTH => Err(AccountError::InvalidLabel(
            format!("label exceeds {} characters", MAX_LABEL_LENGTH),
        )
        .into()),
        _ => Ok(()),
    }
}
