//! Response DTOs for the quoting API endpoints.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::Filament;

use super::calculators::{Dimensions, Multipliers, ScaleCheck};

/// Money value for JSON responses
#[derive(Debug, Clone, Serialize)]
pub struct MoneyResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
}

/// Catalog entry as served to clients
#[derive(Debug, Clone, Serialize)]
pub struct FilamentResponse {
    pub id: Uuid,
    pub name: String,
    pub color: Option<String>,
    /// Cost per cubic centimeter of material.
    #[serde(with = "rust_decimal::serde::str")]
    pub cost_per_cm3: Decimal,
}

impl From<&Filament> for FilamentResponse {
    fn from(filament: &Filament) -> Self {
        Self {
            id: filament.id,
            name: filament.name.clone(),
            color: filament.color.clone(),
            cost_per_cm3: filament.cost_per_cm3,
        }
    }
}

/// Multipliers that went into a quote
#[derive(Debug, Clone, Serialize)]
pub struct MultipliersResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub layer: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub infill: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub file_size: Decimal,
}

impl From<&Multipliers> for MultipliersResponse {
    fn from(multipliers: &Multipliers) -> Self {
        Self {
            layer: multipliers.layer,
            infill: multipliers.infill,
            file_size: multipliers.file_size,
        }
    }
}

/// Response for a successful quote
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub quote: MoneyResponse,
    pub filament: FilamentResponse,
    /// Volume of the (scaled) bounding box, cubic millimeters.
    pub volume_mm3: f64,
    /// Dimensions after scaling, millimeters.
    pub dimensions: Dimensions,
    pub multipliers: MultipliersResponse,
}

/// Response for a scale check
#[derive(Debug, Serialize)]
pub struct ScaleCheckResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Largest uniform scale that still fits the build volume.
    pub max_scale: f64,
}

impl ScaleCheckResponse {
    pub fn new(check: ScaleCheck, max_scale: f64) -> Self {
        Self {
            valid: check.valid,
            reason: check.reason,
            max_scale,
        }
    }
}

/// Machine limits and pricing constants, for client-side slider clamping
#[derive(Debug, Serialize)]
pub struct LimitsResponse {
    pub build_volume: Dimensions,
    pub currency: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub profit_margin: Decimal,
}

/// Quote rejection body (oversize scale, unknown filament)
#[derive(Debug, Serialize)]
pub struct QuoteErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
