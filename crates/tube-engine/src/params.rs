//! Curve parameters and their configuration format.

use serde::{Deserialize, Serialize};
use tube_core::traits::Validate;
use tube_core::{Result, Tolerance, TubeError};
use tube_geometry::{InterpolationMode, RingMode};
use tube_mesh::TubeConfig;

/// Parameters controlling path generation and tube meshing.
///
/// Loaded from JSON with every field optional; missing fields take the
/// defaults below.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveParameters {
    pub interpolation_mode: InterpolationMode,
    pub ring_mode: RingMode,
    pub tube_radius: f64,
    pub sides: usize,
    /// Kept for compatibility. Spline sampling density no longer depends on it.
    pub number_of_intermediate_points: usize,
    pub tolerance: Tolerance,
}

impl CurveParameters {
    pub const DEFAULT_RADIUS: f64 = 5.0;
    pub const DEFAULT_SIDES: usize = 20;
    pub const DEFAULT_INTERMEDIATE_POINTS: usize = 20;

    /// Parse and validate a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json)
            .map_err(|e| TubeError::configuration(format!("invalid curve parameters: {}", e)))?;
        params.validate()?;
        Ok(params)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| TubeError::configuration(format!("cannot serialize curve parameters: {}", e)))
    }

    /// Mesher settings for these parameters. Tubes are always capped; closed
    /// paths drop their caps inside the mesher.
    pub fn tube_config(&self) -> TubeConfig {
        TubeConfig {
            radius: self.tube_radius,
            sides: self.sides,
            capped: true,
            tolerance: self.tolerance,
        }
    }
}

impl Default for CurveParameters {
    fn default() -> Self {
        Self {
            interpolation_mode: InterpolationMode::CardinalSpline,
            ring_mode: RingMode::Open,
            tube_radius: Self::DEFAULT_RADIUS,
            sides: Self::DEFAULT_SIDES,
            number_of_intermediate_points: Self::DEFAULT_INTERMEDIATE_POINTS,
            tolerance: Tolerance::default(),
        }
    }
}

impl Validate for CurveParameters {
    fn validate(&self) -> Result<()> {
        self.tube_config().validate()?;
        if self.number_of_intermediate_points == 0 {
            return Err(TubeError::configuration(
                "number of intermediate points must be at least 1",
            ));
        }
        Ok(())
    }
}
