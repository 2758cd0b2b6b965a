//! Environment-driven configuration
//!
//! Settings come from environment variables (loaded from a `.env` file in
//! development via dotenvy), with defaults for everything except
//! `DATABASE_URL`.

use anyhow::Context;
use rust_decimal::Decimal;
use std::net::SocketAddr;

use crate::pricing::{Dimensions, DEFAULT_BUILD_VOLUME, DEFAULT_PROFIT_MARGIN};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Currency code attached to every quote.
    pub currency: String,
    /// Fraction added on top of material cost.
    pub profit_margin: Decimal,
    /// Printable bounding box of the machine, in millimeters.
    pub build_volume: Dimensions,
}

impl Config {
    /// Read configuration from the environment
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let host = env_or("HOST", "0.0.0.0");
        let port: u16 = parse_env("PORT", 3000)?;
        let bind_addr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", host, port))?;

        let currency = env_or("CURRENCY", "MXN");
        let profit_margin = parse_env("PROFIT_MARGIN", DEFAULT_PROFIT_MARGIN)?;

        let build_volume = Dimensions {
            width: parse_env("BUILD_VOLUME_WIDTH_MM", DEFAULT_BUILD_VOLUME.width)?,
            height: parse_env("BUILD_VOLUME_HEIGHT_MM", DEFAULT_BUILD_VOLUME.height)?,
            depth: parse_env("BUILD_VOLUME_DEPTH_MM", DEFAULT_BUILD_VOLUME.depth)?,
        };

        Ok(Self {
            database_url,
            bind_addr,
            currency,
            profit_margin,
            build_volume,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("invalid value for {}: {}", key, raw)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_env_falls_back_to_default() {
        let margin: Decimal = parse_env("COTIZADOR_TEST_UNSET_MARGIN", dec!(0.20)).unwrap();
        assert_eq!(margin, dec!(0.20));

        let port: u16 = parse_env("COTIZADOR_TEST_UNSET_PORT", 3000).unwrap();
        assert_eq!(port, 3000);
    }
}
