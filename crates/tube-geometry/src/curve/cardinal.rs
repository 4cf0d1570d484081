//! Cardinal (Catmull-Rom family) interpolating splines.
//!
//! A 3D spline is three independent 1-D splines, one per coordinate axis,
//! each parameterized by control point index.

use tube_math::{Point3, Vector3};

use super::Curve;

/// Piecewise cubic Hermite spline through `values` at parameters `0, 1, .., n-1`.
///
/// Tangents follow the cardinal formulation `m_i = (1 - c) (p_{i+1} - p_{i-1}) / 2`.
/// Open splines use one-sided differences at the ends; closed splines wrap
/// around and gain one more segment from the last value back to the first,
/// so they are defined on `[0, n]` and repeat with period `n`.
#[derive(Debug, Clone, PartialEq)]
pub struct CardinalSpline1D {
    values: Vec<f64>,
    tangents: Vec<f64>,
    closed: bool,
    tension: f64,
}

impl CardinalSpline1D {
    /// Catmull-Rom spline (tension 0).
    pub fn new(values: Vec<f64>, closed: bool) -> Self {
        Self::with_tension(values, closed, 0.0)
    }

    /// Spline with tension `c`; `c = 0` is Catmull-Rom, `c -> 1` flattens
    /// the tangents towards a polyline.
    pub fn with_tension(values: Vec<f64>, closed: bool, tension: f64) -> Self {
        let tangents = Self::fit_tangents(&values, closed, 1.0 - tension);
        Self {
            values,
            tangents,
            closed,
            tension,
        }
    }

    fn fit_tangents(values: &[f64], closed: bool, scale: f64) -> Vec<f64> {
        let n = values.len();
        if n < 2 {
            return vec![0.0; n];
        }
        (0..n)
            .map(|i| {
                let diff = if closed {
                    (values[(i + 1) % n] - values[(i + n - 1) % n]) * 0.5
                } else if i == 0 {
                    values[1] - values[0]
                } else if i == n - 1 {
                    values[n - 1] - values[n - 2]
                } else {
                    (values[i + 1] - values[i - 1]) * 0.5
                };
                scale * diff
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn tension(&self) -> f64 {
        self.tension
    }

    /// Parameter range covered by the control values, `(0, n - 1)`.
    ///
    /// A closed spline continues past the maximum up to `n`, where it meets
    /// the first value again.
    pub fn parametric_range(&self) -> (f64, f64) {
        (0.0, self.values.len().saturating_sub(1) as f64)
    }

    /// Locate the segment containing `t`: `(start index, end index, local s in [0, 1])`.
    fn segment(&self, t: f64) -> (usize, usize, f64) {
        let n = self.values.len();
        if self.closed {
            let period = n as f64;
            let t = t.rem_euclid(period);
            let i = (t.floor() as usize).min(n - 1);
            (i, (i + 1) % n, t - i as f64)
        } else {
            let t = t.clamp(0.0, (n - 1) as f64);
            let i = (t.floor() as usize).min(n - 2);
            (i, i + 1, t - i as f64)
        }
    }

    /// Value at parameter `t`. Open splines clamp `t` to the range.
    pub fn evaluate(&self, t: f64) -> f64 {
        match self.values.len() {
            0 => 0.0,
            1 => self.values[0],
            _ => {
                let (i, j, s) = self.segment(t);
                let s2 = s * s;
                let s3 = s2 * s;
                let h00 = 2.0 * s3 - 3.0 * s2 + 1.0;
                let h10 = s3 - 2.0 * s2 + s;
                let h01 = -2.0 * s3 + 3.0 * s2;
                let h11 = s3 - s2;
                h00 * self.values[i]
                    + h10 * self.tangents[i]
                    + h01 * self.values[j]
                    + h11 * self.tangents[j]
            }
        }
    }

    /// First derivative with respect to `t`.
    pub fn derivative(&self, t: f64) -> f64 {
        if self.values.len() < 2 {
            return 0.0;
        }
        let (i, j, s) = self.segment(t);
        let s2 = s * s;
        (6.0 * s2 - 6.0 * s) * self.values[i]
            + (3.0 * s2 - 4.0 * s + 1.0) * self.tangents[i]
            + (-6.0 * s2 + 6.0 * s) * self.values[j]
            + (3.0 * s2 - 2.0 * s) * self.tangents[j]
    }
}

/// A 3D cardinal spline made of one [`CardinalSpline1D`] per axis.
#[derive(Debug, Clone, PartialEq)]
pub struct CardinalSpline {
    pub x: CardinalSpline1D,
    pub y: CardinalSpline1D,
    pub z: CardinalSpline1D,
}

impl CardinalSpline {
    pub fn from_points(points: &[Point3], closed: bool) -> Self {
        Self::with_tension(points, closed, 0.0)
    }

    pub fn with_tension(points: &[Point3], closed: bool, tension: f64) -> Self {
        let axis = |f: fn(&Point3) -> f64| {
            CardinalSpline1D::with_tension(points.iter().map(f).collect(), closed, tension)
        };
        Self {
            x: axis(|p| p.x),
            y: axis(|p| p.y),
            z: axis(|p| p.z),
        }
    }

    pub fn parametric_range(&self) -> (f64, f64) {
        self.x.parametric_range()
    }
}

impl Curve for CardinalSpline {
    fn point_at(&self, t: f64) -> Point3 {
        Point3::new(self.x.evaluate(t), self.y.evaluate(t), self.z.evaluate(t))
    }

    fn tangent_at(&self, t: f64) -> Vector3 {
        Vector3::new(
            self.x.derivative(t),
            self.y.derivative(t),
            self.z.derivative(t),
        )
    }

    fn domain(&self) -> (f64, f64) {
        let (t_min, t_max) = self.parametric_range();
        if self.is_closed() {
            (t_min, t_max + 1.0)
        } else {
            (t_min, t_max)
        }
    }

    fn is_closed(&self) -> bool {
        self.x.is_closed()
    }
}
