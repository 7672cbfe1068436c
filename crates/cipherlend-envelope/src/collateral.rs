//! Collateral descriptors and the record they are encrypted as.

use cipherlend_core::Timestamp;
use serde::{Deserialize, Serialize};

use crate::error::EnvelopeError;

/// What a borrower pledges as collateral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollateralDescriptor {
    /// Asset class, e.g. `"real_estate"`.
    pub asset_type: String,
    /// Appraised value.
    pub value: f64,
    /// Where the asset is held.
    pub location: String,
}

impl CollateralDescriptor {
    /// Require a non-empty asset type and a positive finite value.
    pub fn validate(&self) -> Result<(), EnvelopeError> {
        if self.asset_type.trim().is_empty() {
            return Err(EnvelopeError::InvalidInput(
                "collateral asset type must not be empty".into(),
            ));
        }
        if !self.value.is_finite() || self.value <= 0.0 {
            return Err(EnvelopeError::InvalidInput(format!(
                "collateral value must be positive, got {}",
                self.value
            )));
        }
        Ok(())
    }

    pub(crate) fn into_record(self, timestamp: Timestamp) -> CollateralRecord {
        CollateralRecord {
            asset_type: self.asset_type,
            value: self.value,
            location: self.location,
            verified: true,
            timestamp,
        }
    }
}

/// Encrypted form of a [`CollateralDescriptor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollateralRecord {
    /// Asset class.
    pub asset_type: String,
    /// Appraised value.
    pub value: f64,
    /// Where the asset is held.
    pub location: String,
    /// Set when the descriptor passed validation.
    pub verified: bool,
    /// When the record was built.
    pub timestamp: Timestamp,
}
