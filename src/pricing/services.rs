//! Quote orchestration with database access.
//!
//! Resolves the filament from cache or database, validates the requested
//! scale against the build volume, and runs the calculators.

use rust_decimal::Decimal;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::cache::AppCache;
use crate::config::Config;
use crate::db::queries;
use crate::models::Filament;

use super::calculators::{
    self, compute_volume, estimate_cost, max_allowed_scale, round_money, validate_scale,
    Dimensions, Multipliers,
};
use super::requests::QuoteRequest;
use super::responses::MoneyResponse;

/// Result of a quote calculation
#[derive(Debug, Clone)]
pub struct QuoteBreakdown {
    pub quote: MoneyResponse,
    pub filament: Arc<Filament>,
    pub volume_mm3: f64,
    pub scaled_dimensions: Dimensions,
    pub multipliers: Multipliers,
}

/// Quoting error types
#[derive(Debug, Clone, thiserror::Error)]
pub enum PricingError {
    #[error("No filament found with id {filament_id}")]
    UnknownFilament { filament_id: Uuid },

    /// The scaled model does not fit the machine. Carries the largest scale
    /// that would, so the caller can offer it as a fallback.
    #[error("{reason}")]
    OversizeScale { reason: String, max_scale: f64 },

    #[error("Database error: {0}")]
    Database(String),
}

/// Quote a print request end to end.
///
/// The filament lookup goes through the cache first; everything after it is
/// pure calculator work.
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `cache` - Application cache (filament lookups)
/// * `config` - Build volume, profit margin, currency
/// * `request` - Validated quote request
pub async fn quote_print(
    pool: &PgPool,
    cache: &AppCache,
    config: &Config,
    request: &QuoteRequest,
) -> Result<QuoteBreakdown, PricingError> {
    let filament = lookup_filament(pool, cache, request.filament_id).await?;
    build_quote(filament, request, config)
}

/// Resolve a filament from cache, falling back to the database
async fn lookup_filament(
    pool: &PgPool,
    cache: &AppCache,
    filament_id: Uuid,
) -> Result<Arc<Filament>, PricingError> {
    if let Some(cached) = cache.filaments.get(&filament_id).await {
        return Ok(cached);
    }

    let filament = queries::get_filament(pool, filament_id)
        .await
        .map_err(|e| PricingError::Database(e.to_string()))?
        .ok_or(PricingError::UnknownFilament { filament_id })?;

    let filament = Arc::new(filament);
    cache.filaments.insert(filament_id, filament.clone()).await;
    Ok(filament)
}

/// Everything after the catalog lookup: scale validation, volume, cost.
fn build_quote(
    filament: Arc<Filament>,
    request: &QuoteRequest,
    config: &Config,
) -> Result<QuoteBreakdown, PricingError> {
    let scale = request.scale.unwrap_or_default();

    let check = validate_scale(&request.dimensions, &scale, &config.build_volume);
    if !check.valid {
        return Err(PricingError::OversizeScale {
            reason: check
                .reason
                .unwrap_or_else(|| "Model exceeds the build volume".to_string()),
            max_scale: max_allowed_scale(&request.dimensions, &config.build_volume),
        });
    }

    let scaled = request.dimensions.scaled(&scale);
    let volume_mm3 = compute_volume(&scaled);

    let multipliers = Multipliers {
        layer: calculators::layer_multiplier(request.layer_height),
        infill: calculators::infill_multiplier(request.infill),
        file_size: request
            .file_size_bytes
            .map(calculators::file_size_multiplier)
            .unwrap_or(Decimal::ONE),
    };

    let total = estimate_cost(
        volume_mm3,
        filament.cost_per_mm3(),
        &multipliers,
        config.profit_margin,
    );

    Ok(QuoteBreakdown {
        quote: MoneyResponse {
            amount: round_money(total, 2),
            currency: config.currency.clone(),
        },
        filament,
        volume_mm3,
        scaled_dimensions: scaled,
        multipliers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::calculators::{ScaleFactor, DEFAULT_BUILD_VOLUME, DEFAULT_PROFIT_MARGIN};
    use rust_decimal_macros::dec;

    fn test_config() -> Config {
        Config {
            database_url: String::new(),
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            currency: "MXN".to_string(),
            profit_margin: DEFAULT_PROFIT_MARGIN,
            build_volume: DEFAULT_BUILD_VOLUME,
        }
    }

    fn test_filament(cost_per_cm3: Decimal) -> Arc<Filament> {
        Arc::new(Filament {
            id: Uuid::new_v4(),
            name: "PLA".to_string(),
            color: Some("white".to_string()),
            cost_per_cm3,
            active: true,
            deleted_at: None,
        })
    }

    fn test_request(filament_id: Uuid) -> QuoteRequest {
        QuoteRequest {
            dimensions: Dimensions {
                width: 10.0,
                height: 20.0,
                depth: 30.0,
            },
            filament_id,
            infill: 0.2,
            layer_height: 0.2,
            scale: None,
            file_size_bytes: None,
        }
    }

    #[test]
    fn test_build_quote_standard_settings() {
        // 6000 mm3 at 10/cm3 = 0.01/mm3; standard settings keep every
        // multiplier at 1, so the quote is 6000 * 0.01 * 1.2 = 72.00
        let filament = test_filament(dec!(10));
        let request = test_request(filament.id);

        let breakdown = build_quote(filament, &request, &test_config()).unwrap();

        assert_eq!(breakdown.quote.amount, dec!(72.00));
        assert_eq!(breakdown.quote.currency, "MXN");
        assert_eq!(breakdown.volume_mm3, 6000.0);
        assert_eq!(breakdown.multipliers, Multipliers::default());
    }

    #[test]
    fn test_build_quote_applies_scale_before_volume() {
        let filament = test_filament(dec!(10));
        let mut request = test_request(filament.id);
        request.scale = Some(ScaleFactor::Uniform(2.0));

        let breakdown = build_quote(filament, &request, &test_config()).unwrap();

        // Every axis doubles, so volume grows 8x: 48000 * 0.01 * 1.2 = 576
        assert_eq!(breakdown.volume_mm3, 48_000.0);
        assert_eq!(breakdown.scaled_dimensions.width, 20.0);
        assert_eq!(breakdown.quote.amount, dec!(576.00));
    }

    #[test]
    fn test_build_quote_derives_multipliers_from_settings() {
        let filament = test_filament(dec!(10));
        let mut request = test_request(filament.id);
        request.layer_height = 0.1; // fine -> 1.2
        request.infill = 0.5; // dense -> 1.3
        request.file_size_bytes = Some(0); // ln(1) + 1 = 1

        let breakdown = build_quote(filament, &request, &test_config()).unwrap();

        assert_eq!(breakdown.multipliers.layer, dec!(1.2));
        assert_eq!(breakdown.multipliers.infill, dec!(1.3));
        assert_eq!(breakdown.multipliers.file_size, Decimal::ONE);
        // 6000 * 0.01 * 1.2 * 1.3 * 1.2 = 112.32
        assert_eq!(breakdown.quote.amount, dec!(112.32));
    }

    #[test]
    fn test_build_quote_rejects_oversize_scale() {
        let filament = test_filament(dec!(10));
        let mut request = test_request(filament.id);
        request.dimensions = Dimensions {
            width: 100.0,
            height: 100.0,
            depth: 100.0,
        };
        request.scale = Some(ScaleFactor::Uniform(3.1));

        match build_quote(filament, &request, &test_config()) {
            Err(PricingError::OversizeScale { reason, max_scale }) => {
                assert!(reason.contains("width"));
                assert_eq!(max_scale, 3.0);
            }
            other => panic!("expected oversize rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_pricing_error_display() {
        let err = PricingError::UnknownFilament {
            filament_id: Uuid::nil(),
        };
        assert!(err.to_string().contains("No filament found"));

        let err = PricingError::OversizeScale {
            reason: "width 310.00 mm exceeds the 300.00 mm build limit".to_string(),
            max_scale: 3.0,
        };
        assert!(err.to_string().contains("310.00"));

        let err = PricingError::Database("connection reset".to_string());
        assert!(err.to_string().contains("connection reset"));
    }
}
