use std::sync::RwLock;

use lazy_static::lazy_static;
use log::trace;

use crate::geom::point::Point;

// Subdivision depth at which a piece is emitted even if it is not flat yet.
const RECURSION_LIMIT: u32 = 32;

/// Flatness criteria for [`BezierCurve::piecewise_linear_approximation`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatteningTolerance {
    /// Control points closer to the chord than this are treated as collinear.
    pub collinearity_epsilon: f64,
    /// Bound on the squared control point distance, relative to the chord length.
    pub distance_tolerance_square: f64,
    /// Bound on the Manhattan spacing of control points of a collinear or
    /// closed curve.
    pub distance_tolerance_manhattan: f64,
}

impl Default for FlatteningTolerance {
    fn default() -> Self {
        FlatteningTolerance {
            collinearity_epsilon: 1.0e-30,
            distance_tolerance_square: 0.025,
            distance_tolerance_manhattan: 0.4,
        }
    }
}

lazy_static! {
    static ref DEFAULT_TOLERANCE: RwLock<FlatteningTolerance> =
        RwLock::new(FlatteningTolerance::default());
}

/// Tolerance used by the flattening calls that do not take one explicitly.
pub fn default_tolerance() -> FlatteningTolerance {
    *DEFAULT_TOLERANCE
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Replaces the process-wide flattening tolerance. Meant to be called once at
/// startup, before any path is flattened.
pub fn set_default_tolerance(tolerance: FlatteningTolerance) {
    *DEFAULT_TOLERANCE
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner()) = tolerance;
}

/// A cubic Bézier curve given by its four control points.
#[derive(Debug, Clone, PartialEq)]
pub struct BezierCurve {
    control_points: [Point; 4],
}

#[derive(Clone, Copy)]
struct Cubic {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    x3: f64,
    y3: f64,
    x4: f64,
    y4: f64,
}

impl Cubic {
    fn from_points(p: &[Point; 4]) -> Self {
        Cubic {
            x1: p[0].x(),
            y1: p[0].y(),
            x2: p[1].x(),
            y2: p[1].y(),
            x3: p[2].x(),
            y3: p[2].y(),
            x4: p[3].x(),
            y4: p[3].y(),
        }
    }

    // de Casteljau at t = 0.5
    fn split(&self) -> (Cubic, Cubic) {
        let x12 = (self.x1 + self.x2) / 2.0;
        let y12 = (self.y1 + self.y2) / 2.0;
        let x23 = (self.x2 + self.x3) / 2.0;
        let y23 = (self.y2 + self.y3) / 2.0;
        let x34 = (self.x3 + self.x4) / 2.0;
        let y34 = (self.y3 + self.y4) / 2.0;
        let x123 = (x12 + x23) / 2.0;
        let y123 = (y12 + y23) / 2.0;
        let x234 = (x23 + x34) / 2.0;
        let y234 = (y23 + y34) / 2.0;
        let x1234 = (x123 + x234) / 2.0;
        let y1234 = (y123 + y234) / 2.0;
        (
            Cubic {
                x1: self.x1,
                y1: self.y1,
                x2: x12,
                y2: y12,
                x3: x123,
                y3: y123,
                x4: x1234,
                y4: y1234,
            },
            Cubic {
                x1: x1234,
                y1: y1234,
                x2: x234,
                y2: y234,
                x3: x34,
                y3: y34,
                x4: self.x4,
                y4: self.y4,
            },
        )
    }

    fn is_finite(&self) -> bool {
        [
            self.x1, self.y1, self.x2, self.y2, self.x3, self.y3, self.x4, self.y4,
        ]
        .iter()
        .all(|v| v.is_finite())
    }

    fn midpoint(&self) -> Point {
        let x = (self.x1 + 3.0 * (self.x2 + self.x3) + self.x4) / 8.0;
        let y = (self.y1 + 3.0 * (self.y2 + self.y3) + self.y4) / 8.0;
        Point::new(x, y)
    }

    fn is_flat(&self, tolerance: &FlatteningTolerance) -> bool {
        let dx = self.x4 - self.x1;
        let dy = self.y4 - self.y1;

        // cross products of the inner control points against the chord,
        // proportional to their distance from it
        let d2 = ((self.x2 - self.x4) * dy - (self.y2 - self.y4) * dx).abs();
        let d3 = ((self.x3 - self.x4) * dy - (self.y3 - self.y4) * dx).abs();

        if d2 > tolerance.collinearity_epsilon || d3 > tolerance.collinearity_epsilon {
            (d2 + d3) * (d2 + d3) <= tolerance.distance_tolerance_square * (dx * dx + dy * dy)
        } else {
            (self.x1 + self.x3 - self.x2 - self.x2).abs()
                + (self.y1 + self.y3 - self.y2 - self.y2).abs()
                + (self.x2 + self.x4 - self.x3 - self.x3).abs()
                + (self.y2 + self.y4 - self.y3 - self.y3).abs()
                <= tolerance.distance_tolerance_manhattan
        }
    }

    // Pushes one point per flat piece, left half before right half.
    fn subdivide(&self, tolerance: &FlatteningTolerance, depth: u32, points: &mut Vec<Point>) {
        let (left, right) = self.split();
        for half in [left, right] {
            // NaN never compares as flat, so non-finite pieces are not split further
            if depth >= RECURSION_LIMIT || !half.is_finite() || half.is_flat(tolerance) {
                points.push(half.midpoint());
            } else {
                half.subdivide(tolerance, depth + 1, points);
            }
        }
    }
}

impl BezierCurve {
    pub fn new(control_points: [Point; 4]) -> Self {
        BezierCurve { control_points }
    }

    pub fn control_points(&self) -> &[Point; 4] {
        &self.control_points
    }

    pub fn base_points(&self) -> Vec<Point> {
        self.control_points.to_vec()
    }

    pub fn piecewise_linear_approximation(&self) -> Vec<Point> {
        self.piecewise_linear_approximation_with(&default_tolerance())
    }

    /// Flattens the curve by adaptive subdivision.
    ///
    /// The result starts with the first and ends with the last control point.
    /// A curve that is already flat yields just those two points; otherwise
    /// every flat piece found by subdivision contributes its midpoint, in
    /// curve order.
    pub fn piecewise_linear_approximation_with(
        &self,
        tolerance: &FlatteningTolerance,
    ) -> Vec<Point> {
        let [first, .., last] = self.control_points;
        let cubic = Cubic::from_points(&self.control_points);
        let mut points = vec![first];
        if !cubic.is_flat(tolerance) {
            cubic.subdivide(tolerance, 0, &mut points);
        }
        points.push(last);
        trace!("flattened bezier curve into {} points", points.len());
        points
    }
}

#[cfg(test)]
mod tests {
    use super::{default_tolerance, set_default_tolerance, BezierCurve, FlatteningTolerance};
    use crate::geom::point::Point;

    fn curve(coords: [f64; 8]) -> BezierCurve {
        BezierCurve::new([
            Point::new(coords[0], coords[1]),
            Point::new(coords[2], coords[3]),
            Point::new(coords[4], coords[5]),
            Point::new(coords[6], coords[7]),
        ])
    }

    #[test]
    fn test_straight_curve_is_not_subdivided() {
        let c = curve([0.0, 0.0, 1.0, 1.0, 2.0, 2.0, 3.0, 3.0]);
        let points = c.piecewise_linear_approximation();
        assert_eq!(points, vec![Point::new(0.0, 0.0), Point::new(3.0, 3.0)]);
    }

    #[test]
    fn test_curved_input_is_subdivided() {
        let _ = env_logger::builder().is_test(true).try_init();
        let c = curve([0.0, 0.0, 0.0, 100.0, 100.0, 100.0, 100.0, 0.0]);
        let points = c.piecewise_linear_approximation();
        assert!(points.len() > 2);
        assert_eq!(points.first(), Some(&Point::new(0.0, 0.0)));
        assert_eq!(points.last(), Some(&Point::new(100.0, 0.0)));
    }

    #[test]
    fn test_output_follows_curve_parameter() {
        let c = curve([0.0, 0.0, 0.0, 50.0, 50.0, 100.0, 100.0, 100.0]);
        let points = c.piecewise_linear_approximation();
        assert!(points.len() > 2);
        for pair in points.windows(2) {
            assert!(pair[0].x() <= pair[1].x());
            assert!(pair[0].y() <= pair[1].y());
        }
    }

    #[test]
    fn test_points_stay_close_to_curve() {
        let c = curve([0.0, 0.0, 0.0, 100.0, 100.0, 100.0, 100.0, 0.0]);
        let points = c.piecewise_linear_approximation();
        for p in &points {
            // the curve lives in the hull of its control points
            assert!(p.x() >= 0.0 && p.x() <= 100.0);
            assert!(p.y() >= 0.0 && p.y() <= 75.0);
        }
        for pair in points.windows(2) {
            assert!(pair[0].distance(&pair[1]) < 25.0);
        }
    }

    #[test]
    fn test_tolerance_controls_point_count() {
        let c = curve([0.0, 0.0, 0.0, 100.0, 100.0, 100.0, 100.0, 0.0]);
        let fine = c.piecewise_linear_approximation_with(&FlatteningTolerance::default());
        let coarse = c.piecewise_linear_approximation_with(&FlatteningTolerance {
            distance_tolerance_square: 0.5,
            ..FlatteningTolerance::default()
        });
        assert!(coarse.len() < fine.len());
    }

    #[test]
    fn test_closed_chord_uses_manhattan_test() {
        let c = curve([0.0, 0.0, 10.0, 10.0, -10.0, 10.0, 0.0, 0.0]);
        let points = c.piecewise_linear_approximation();
        assert!(points.len() > 2);
        assert_eq!(points.first(), points.last());
    }

    #[test]
    fn test_degenerate_point_curve() {
        let c = curve([1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
        assert_eq!(c.piecewise_linear_approximation().len(), 2);
    }

    #[test]
    fn test_non_finite_input_terminates() {
        let c = curve([0.0, 0.0, f64::NAN, 1.0, 2.0, 2.0, 3.0, 0.0]);
        let points = c.piecewise_linear_approximation();
        assert_eq!(points.len(), 4);
    }

    #[test]
    fn test_default_tolerance() {
        assert_eq!(default_tolerance(), FlatteningTolerance::default());
        set_default_tolerance(FlatteningTolerance::default());
        assert_eq!(default_tolerance().distance_tolerance_manhattan, 0.4);
    }
}
