//! Filament catalog models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Printable material from the filaments table.
///
/// Read-only from the quoting engine's perspective; rows are managed out of
/// band (seed migration, admin tooling).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Filament {
    pub id: Uuid,
    pub name: String,
    pub color: Option<String>,
    /// Cost per cubic centimeter - the canonical catalog unit.
    #[serde(with = "rust_decimal::serde::str")]
    pub cost_per_cm3: Decimal,
    pub active: bool,
    #[serde(skip)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Filament {
    /// Cost per cubic millimeter, the unit the calculators compute in.
    ///
    /// The catalog stores cost per cm3; this method is the single place the
    /// unit conversion happens.
    pub fn cost_per_mm3(&self) -> Decimal {
        self.cost_per_cm3 / dec!(1000)
    }
}
