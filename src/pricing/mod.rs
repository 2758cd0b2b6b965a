//! Quoting engine for the Cotizador 3D service.
//!
//! `calculators` holds the pure pricing math; `services` adds the filament
//! lookup on top; `routes` exposes the JSON API the upload page talks to.

pub mod calculators;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{
    compute_volume, estimate_cost, max_allowed_scale, round_money, validate_scale, Dimensions,
    Multipliers, ScaleCheck, ScaleFactor, DEFAULT_BUILD_VOLUME, DEFAULT_PROFIT_MARGIN,
};
pub use routes::router;
pub use services::{PricingError, QuoteBreakdown};
