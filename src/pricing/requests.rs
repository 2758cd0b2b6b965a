//! Request DTOs for the quoting API endpoints.
//!
//! Validation lives here, at the boundary: the calculators themselves never
//! check their inputs (spurious dimensions are a programmer error upstream,
//! not a user-facing condition).

use serde::Deserialize;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::error::AppError;

use super::calculators::{Dimensions, ScaleFactor};

/// Request to quote a print from resolved dimensions and settings
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub dimensions: Dimensions,
    pub filament_id: Uuid,
    /// Infill fraction, 0 = hollow, 1 = solid.
    #[serde(default = "default_infill")]
    pub infill: f64,
    /// Layer height in millimeters.
    #[serde(default = "default_layer_height")]
    pub layer_height: f64,
    #[serde(default)]
    pub scale: Option<ScaleFactor>,
    /// Size of the uploaded mesh file, in bytes.
    #[serde(default)]
    pub file_size_bytes: Option<u64>,
}

fn default_infill() -> f64 {
    0.2
}

fn default_layer_height() -> f64 {
    0.2
}

impl QuoteRequest {
    /// Reject malformed numeric input before any calculator runs.
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = BTreeMap::new();

        validate_dimensions(&self.dimensions, &mut errors);

        if !self.infill.is_finite() || self.infill < 0.0 || self.infill > 1.0 {
            errors.insert(
                "infill".to_string(),
                "Infill must be a number between 0 and 1.".to_string(),
            );
        }
        if !self.layer_height.is_finite() || self.layer_height <= 0.0 {
            errors.insert(
                "layer_height".to_string(),
                "Layer height must be a positive number.".to_string(),
            );
        }
        if let Some(scale) = &self.scale {
            validate_scale_factor(scale, &mut errors);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

/// Request to check a proposed scale against the build volume
#[derive(Debug, Deserialize)]
pub struct ScaleCheckRequest {
    pub dimensions: Dimensions,
    pub scale: ScaleFactor,
}

impl ScaleCheckRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut errors = BTreeMap::new();
        validate_dimensions(&self.dimensions, &mut errors);
        validate_scale_factor(&self.scale, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

fn validate_dimensions(dimensions: &Dimensions, errors: &mut BTreeMap<String, String>) {
    for (field, value) in [
        ("dimensions.width", dimensions.width),
        ("dimensions.height", dimensions.height),
        ("dimensions.depth", dimensions.depth),
    ] {
        if !value.is_finite() || value <= 0.0 {
            errors.insert(
                field.to_string(),
                "Must be a positive number of millimeters.".to_string(),
            );
        }
    }
}

fn validate_scale_factor(scale: &ScaleFactor, errors: &mut BTreeMap<String, String>) {
    match *scale {
        ScaleFactor::Uniform(s) => {
            if !s.is_finite() || s <= 0.0 {
                errors.insert(
                    "scale".to_string(),
                    "Scale must be a positive number.".to_string(),
                );
            }
        }
        ScaleFactor::PerAxis {
            width,
            height,
            depth,
        } => {
            for (field, value) in [
                ("scale.width", width),
                ("scale.height", height),
                ("scale.depth", depth),
            ] {
                if !value.is_finite() || value <= 0.0 {
                    errors.insert(
                        field.to_string(),
                        "Scale must be a positive number.".to_string(),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> QuoteRequest {
        QuoteRequest {
            dimensions: Dimensions {
                width: 10.0,
                height: 20.0,
                depth: 30.0,
            },
            filament_id: Uuid::new_v4(),
            infill: 0.2,
            layer_height: 0.2,
            scale: None,
            file_size_bytes: None,
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_defaults_applied_on_deserialize() {
        let request: QuoteRequest = serde_json::from_str(
            r#"{
                "dimensions": { "width": 10, "height": 20, "depth": 30 },
                "filament_id": "4b4d9c28-08a8-4a9f-9d2a-2b9c7d2f0a11"
            }"#,
        )
        .unwrap();

        assert_eq!(request.infill, 0.2);
        assert_eq!(request.layer_height, 0.2);
        assert!(request.scale.is_none());
        assert!(request.file_size_bytes.is_none());
    }

    #[test]
    fn test_xyz_aliases_accepted() {
        let request: QuoteRequest = serde_json::from_str(
            r#"{
                "dimensions": { "x": 10, "y": 20, "z": 30 },
                "filament_id": "4b4d9c28-08a8-4a9f-9d2a-2b9c7d2f0a11",
                "scale": 1.5
            }"#,
        )
        .unwrap();

        assert_eq!(request.dimensions.width, 10.0);
        assert_eq!(request.dimensions.height, 20.0);
        assert_eq!(request.dimensions.depth, 30.0);
        assert_eq!(request.scale, Some(ScaleFactor::Uniform(1.5)));
    }

    #[test]
    fn test_per_axis_scale_deserializes() {
        let request: QuoteRequest = serde_json::from_str(
            r#"{
                "dimensions": { "width": 10, "height": 20, "depth": 30 },
                "filament_id": "4b4d9c28-08a8-4a9f-9d2a-2b9c7d2f0a11",
                "scale": { "width": 1.0, "height": 2.0, "depth": 0.5 }
            }"#,
        )
        .unwrap();

        assert_eq!(
            request.scale,
            Some(ScaleFactor::PerAxis {
                width: 1.0,
                height: 2.0,
                depth: 0.5
            })
        );
    }

    #[test]
    fn test_non_positive_dimensions_rejected() {
        let mut request = valid_request();
        request.dimensions.height = 0.0;

        match request.validate() {
            Err(AppError::Validation(errors)) => {
                assert!(errors.contains_key("dimensions.height"));
                assert_eq!(errors.len(), 1);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_infill_out_of_range_rejected() {
        let mut request = valid_request();
        request.infill = 1.5;

        match request.validate() {
            Err(AppError::Validation(errors)) => assert!(errors.contains_key("infill")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_infill_bounds_are_inclusive() {
        let mut request = valid_request();
        request.infill = 0.0;
        assert!(request.validate().is_ok());

        request.infill = 1.0;
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_zero_layer_height_rejected() {
        let mut request = valid_request();
        request.layer_height = 0.0;

        assert!(matches!(request.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_non_positive_scale_rejected() {
        let mut request = valid_request();
        request.scale = Some(ScaleFactor::Uniform(0.0));

        match request.validate() {
            Err(AppError::Validation(errors)) => assert!(errors.contains_key("scale")),
            other => panic!("expected validation error, got {:?}", other),
        }

        request.scale = Some(ScaleFactor::PerAxis {
            width: 1.0,
            height: -2.0,
            depth: 1.0,
        });

        match request.validate() {
            Err(AppError::Validation(errors)) => assert!(errors.contains_key("scale.height")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_multiple_errors_accumulate() {
        let mut request = valid_request();
        request.dimensions.width = -1.0;
        request.infill = 2.0;
        request.layer_height = -0.1;

        match request.validate() {
            Err(AppError::Validation(errors)) => {
                assert!(errors.contains_key("dimensions.width"));
                assert!(errors.contains_key("infill"));
                assert!(errors.contains_key("layer_height"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
