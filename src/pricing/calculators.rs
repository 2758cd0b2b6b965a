//! Core quoting calculation functions.
//!
//! Pure functions for volume, cost, and scale math - no database access,
//! no shared state. Everything here is recomputed on each request and is
//! safe to call concurrently.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Default profit margin applied on top of material cost (20%).
pub const DEFAULT_PROFIT_MARGIN: Decimal = dec!(0.20);

/// Default printable bounding box of the target machine, in millimeters.
pub const DEFAULT_BUILD_VOLUME: Dimensions = Dimensions {
    width: 300.0,
    height: 300.0,
    depth: 330.0,
};

/// Axis-aligned bounding box of a model, in millimeters.
///
/// Clients report either `width`/`height`/`depth` or `x`/`y`/`z`; both
/// spellings are accepted on deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    #[serde(alias = "x")]
    pub width: f64,
    #[serde(alias = "y")]
    pub height: f64,
    #[serde(alias = "z")]
    pub depth: f64,
}

impl Dimensions {
    /// Apply a scale factor, producing the scaled bounding box.
    pub fn scaled(&self, scale: &ScaleFactor) -> Dimensions {
        let (sw, sh, sd) = scale.components();
        Dimensions {
            width: self.width * sw,
            height: self.height * sh,
            depth: self.depth * sd,
        }
    }
}

/// Scale applied to original dimensions before volume and cost computation.
///
/// Either one uniform multiplier or three independent per-axis multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScaleFactor {
    Uniform(f64),
    PerAxis {
        #[serde(alias = "x")]
        width: f64,
        #[serde(alias = "y")]
        height: f64,
        #[serde(alias = "z")]
        depth: f64,
    },
}

impl ScaleFactor {
    /// Per-axis multipliers (a uniform factor repeats on all three axes).
    pub fn components(&self) -> (f64, f64, f64) {
        match *self {
            ScaleFactor::Uniform(s) => (s, s, s),
            ScaleFactor::PerAxis {
                width,
                height,
                depth,
            } => (width, height, depth),
        }
    }
}

impl Default for ScaleFactor {
    fn default() -> Self {
        ScaleFactor::Uniform(1.0)
    }
}

/// Multiplicative adjustments applied to the base material cost.
///
/// Each factor defaults to 1 when the corresponding setting is absent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Multipliers {
    pub layer: Decimal,
    pub infill: Decimal,
    pub file_size: Decimal,
}

impl Multipliers {
    pub fn product(&self) -> Decimal {
        self.layer * self.infill * self.file_size
    }
}

impl Default for Multipliers {
    fn default() -> Self {
        Self {
            layer: Decimal::ONE,
            infill: Decimal::ONE,
            file_size: Decimal::ONE,
        }
    }
}

/// Outcome of checking a proposed scale against the build volume.
///
/// Scale rejection fires on every slider change and is shown to the user,
/// so it is a value rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleCheck {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ScaleCheck {
    fn fits() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    fn oversize(reason: String) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
        }
    }
}

/// Volume of a bounding box in cubic millimeters.
///
/// Positivity of the dimensions is the caller's contract (enforced by the
/// request validation layer); this function just multiplies.
///
/// # Examples
/// ```
/// use cotizador_web::pricing::{compute_volume, Dimensions};
///
/// let dims = Dimensions { width: 10.0, height: 20.0, depth: 30.0 };
/// assert_eq!(compute_volume(&dims), 6000.0);
/// ```
pub fn compute_volume(dimensions: &Dimensions) -> f64 {
    dimensions.width * dimensions.height * dimensions.depth
}

/// Estimate the print cost for a volume of material.
///
/// ```text
/// base  = volume * cost_per_mm3 * layer * infill * file_size
/// total = base * (1 + profit_margin)
/// ```
///
/// Never fails: a zero volume or a zero multiplier legally produces a zero
/// cost. Input validation happens upstream, before this function is called.
///
/// # Arguments
/// * `volume_mm3` - Model volume in cubic millimeters
/// * `cost_per_mm3` - Filament cost per cubic millimeter
/// * `multipliers` - Print-setting adjustments (default to 1)
/// * `profit_margin` - Fraction added on top, e.g. 0.20 for 20%
pub fn estimate_cost(
    volume_mm3: f64,
    cost_per_mm3: Decimal,
    multipliers: &Multipliers,
    profit_margin: Decimal,
) -> Decimal {
    let volume = Decimal::from_f64(volume_mm3).unwrap_or(Decimal::ZERO);
    let base = volume * cost_per_mm3 * multipliers.product();
    base * (Decimal::ONE + profit_margin)
}

/// Check whether scaled dimensions fit the build volume on all three axes.
///
/// The reason names every offending axis with its scaled size, ready for
/// display next to the scale slider.
pub fn validate_scale(
    original: &Dimensions,
    scale: &ScaleFactor,
    limit: &Dimensions,
) -> ScaleCheck {
    let scaled = original.scaled(scale);

    let mut oversize = Vec::new();
    for (axis, size, max) in [
        ("width", scaled.width, limit.width),
        ("height", scaled.height, limit.height),
        ("depth", scaled.depth, limit.depth),
    ] {
        if size > max {
            oversize.push(format!(
                "{} {:.2} mm exceeds the {:.2} mm build limit",
                axis, size, max
            ));
        }
    }

    if oversize.is_empty() {
        ScaleCheck::fits()
    } else {
        ScaleCheck::oversize(oversize.join("; "))
    }
}

/// Largest uniform scale that keeps all three axes inside the build volume.
///
/// The tightest axis is the binding constraint. Used to clamp the scale
/// slider upper bound and as the fallback offered when a requested scale is
/// rejected.
pub fn max_allowed_scale(original: &Dimensions, limit: &Dimensions) -> f64 {
    let ratio_w = limit.width / original.width;
    let ratio_h = limit.height / original.height;
    let ratio_d = limit.depth / original.depth;
    ratio_w.min(ratio_h).min(ratio_d)
}

/// Cost multiplier for a layer height, in millimeters.
///
/// Bands follow the print profiles offered to customers: 0.1 mm fine,
/// 0.2 mm standard, anything coarser is draft.
pub fn layer_multiplier(layer_height_mm: f64) -> Decimal {
    if layer_height_mm <= 0.1 {
        dec!(1.2)
    } else if layer_height_mm <= 0.2 {
        Decimal::ONE
    } else {
        dec!(0.8)
    }
}

/// Cost multiplier for an infill fraction (0 = hollow, 1 = solid).
pub fn infill_multiplier(infill: f64) -> Decimal {
    if infill <= 0.10 {
        dec!(0.8)
    } else if infill <= 0.25 {
        Decimal::ONE
    } else {
        dec!(1.3)
    }
}

/// Complexity surcharge derived from the uploaded file size.
///
/// `ln(bytes / 100 kB + 1) + 1`, rounded to 4 decimal places. An empty file
/// maps to exactly 1 and the surcharge grows slowly for large meshes.
pub fn file_size_multiplier(bytes: u64) -> Decimal {
    let factor = (bytes as f64 / 100_000.0 + 1.0).ln() + 1.0;
    Decimal::from_f64(factor)
        .map(|d| d.round_dp(4))
        .unwrap_or(Decimal::ONE)
}

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use cotizador_web::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}
