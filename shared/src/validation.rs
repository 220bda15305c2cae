//! Validation utilities for dashboard records

use rust_decimal::Decimal;
use validator::Validate;

use crate::models::Region;
use crate::types::normalize_id;

// ============================================================================
// Reference Validations
// ============================================================================

/// Validate that an identifier is present
pub fn validate_identifier(id: &str) -> Result<(), &'static str> {
    if normalize_id(id).is_none() {
        return Err("Identifier must not be blank");
    }
    Ok(())
}

/// Validate that a region can be used to scope regional statistics
pub fn validate_region_scope(region: &Region) -> Result<(), &'static str> {
    if region.validate().is_err() {
        return Err("Region scope requires an identifier and a name");
    }
    validate_identifier(&region.id)
}

// ============================================================================
// Amount Validations
// ============================================================================

/// Validate a monetary amount or quantity
pub fn validate_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount < Decimal::ZERO {
        return Err("Amount cannot be negative");
    }
    Ok(())
}
