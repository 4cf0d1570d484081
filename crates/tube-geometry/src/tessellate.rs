//! Utilities for converting curves to discrete point sequences.

use tube_math::Point3;

use crate::curve::Curve;

/// Sample `count` points at evenly spaced parameters spanning the curve's domain.
///
/// Both domain ends are included exactly.
pub fn sample_uniform(curve: &dyn Curve, count: usize) -> Vec<Point3> {
    let (t_min, t_max) = curve.domain();
    match count {
        0 => Vec::new(),
        1 => vec![curve.point_at(t_min)],
        _ => {
            let last = (count - 1) as f64;
            (0..count)
                .map(|i| {
                    let t = if i == count - 1 {
                        t_max
                    } else {
                        t_min + (t_max - t_min) * i as f64 / last
                    };
                    curve.point_at(t)
                })
                .collect()
        }
    }
}

/// Sample by advancing the parameter from `start` in increments of `step`
/// while it stays below `end`, then add one final sample exactly at `end`.
///
/// The parameter is accumulated (`t += step`), so the sample count depends on
/// floating-point rounding near `end` exactly the way an incremental loop does.
/// A non-positive or non-finite step yields just the two end samples.
pub fn sample_stepped(curve: &dyn Curve, start: f64, end: f64, step: f64) -> Vec<Point3> {
    let mut points = Vec::new();
    if step > 0.0 && step.is_finite() {
        points.reserve(((end - start) / step).max(0.0) as usize + 2);
        let mut t = start;
        while t < end {
            points.push(curve.point_at(t));
            t += step;
        }
    } else {
        points.push(curve.point_at(start));
    }
    points.push(curve.point_at(end));
    points
}

/// Redistribute points evenly by arc length along a polyline.
///
/// The first and last input points are kept exactly. Spacing is the total
/// length divided by `ceil(length / max_spacing)`, so no gap exceeds
/// `max_spacing`. A polyline with zero length collapses to its first point.
pub fn resample_by_distance(polyline: &[Point3], max_spacing: f64) -> Vec<Point3> {
    let (Some(&first), Some(&last)) = (polyline.first(), polyline.last()) else {
        return Vec::new();
    };
    if polyline.len() < 2 {
        return polyline.to_vec();
    }

    let total: f64 = polyline.windows(2).map(|w| w[0].distance(w[1])).sum();
    if total <= f64::EPSILON || !(max_spacing > 0.0) {
        return vec![first];
    }

    let segment_count = (total / max_spacing).ceil().max(1.0) as usize;
    let spacing = total / segment_count as f64;

    let mut result = Vec::with_capacity(segment_count + 1);
    result.push(first);

    let mut idx = 0;
    // Distance already consumed within segment `idx`.
    let mut consumed = 0.0;

    for _ in 1..segment_count {
        let mut needed = spacing;
        while idx + 1 < polyline.len() {
            let seg_len = polyline[idx].distance(polyline[idx + 1]);
            let available = seg_len - consumed;
            if available >= needed {
                consumed += needed;
                result.push(polyline[idx].lerp(polyline[idx + 1], consumed / seg_len));
                break;
            }
            needed -= available;
            consumed = 0.0;
            idx += 1;
        }
    }

    result.push(last);
    result
}
