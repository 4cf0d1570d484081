/// Tolerances used when deciding whether geometry is degenerate.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Tolerance {
    /// Lengths below this are treated as zero (in model units)
    pub linear: f64,
    /// Rotation angles below this are treated as zero (in radians)
    pub angular: f64,
}

impl Tolerance {
    pub const DEFAULT_LINEAR: f64 = 1e-9;
    pub const DEFAULT_ANGULAR: f64 = 1e-12;

    pub fn new(linear: f64, angular: f64) -> Self {
        Self { linear, angular }
    }

    pub fn default_precision() -> Self {
        Self {
            linear: Self::DEFAULT_LINEAR,
            angular: Self::DEFAULT_ANGULAR,
        }
    }

    pub fn loose() -> Self {
        Self {
            linear: 1e-5,
            angular: 1e-8,
        }
    }

    /// Check if two values are equal within linear tolerance
    pub fn linear_eq(self, a: f64, b: f64) -> bool {
        (a - b).abs() < self.linear
    }

    /// Check if a length is zero within linear tolerance
    pub fn is_zero(self, v: f64) -> bool {
        v.abs() < self.linear
    }

    /// Check if an angle is zero within angular tolerance
    pub fn is_zero_angle(self, a: f64) -> bool {
        a.abs() < self.angular
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::default_precision()
    }
}
