use crate::geom::bezier::{BezierCurve, FlatteningTolerance};
use crate::geom::line::Line;
use crate::geom::point::Point;

/// A segment of a subpath.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Line(Line),
    Curve(BezierCurve),
}

impl Shape {
    /// The defining points: both ends of a line, all four control points of a curve.
    pub fn base_points(&self) -> Vec<Point> {
        match self {
            Shape::Line(line) => line.base_points(),
            Shape::Curve(curve) => curve.base_points(),
        }
    }

    pub fn first_point(&self) -> Point {
        match self {
            Shape::Line(line) => *line.start(),
            Shape::Curve(curve) => curve.control_points()[0],
        }
    }

    pub fn last_point(&self) -> Point {
        match self {
            Shape::Line(line) => *line.end(),
            Shape::Curve(curve) => curve.control_points()[3],
        }
    }

    /// Polyline through the shape. Lines are already flat.
    pub fn piecewise_linear_approximation_with(
        &self,
        tolerance: &FlatteningTolerance,
    ) -> Vec<Point> {
        match self {
            Shape::Line(line) => line.base_points(),
            Shape::Curve(curve) => curve.piecewise_linear_approximation_with(tolerance),
        }
    }

    /// Same kind of shape with every defining point passed through `f`.
    pub fn map_points(&self, f: impl Fn(&Point) -> Point) -> Shape {
        match self {
            Shape::Line(line) => Shape::Line(Line::new(f(line.start()), f(line.end()))),
            Shape::Curve(curve) => {
                Shape::Curve(BezierCurve::new(curve.control_points().map(|p| f(&p))))
            }
        }
    }
}

impl From<Line> for Shape {
    fn from(line: Line) -> Self {
        Shape::Line(line)
    }
}

impl From<BezierCurve> for Shape {
    fn from(curve: BezierCurve) -> Self {
        Shape::Curve(curve)
    }
}

#[cfg(test)]
mod tests {
    use super::Shape;
    use crate::geom::bezier::{BezierCurve, FlatteningTolerance};
    use crate::geom::line::Line;
    use crate::geom::point::Point;

    #[test]
    fn test_end_points() {
        let line: Shape = Line::from_coords(0.0, 0.0, 1.0, 2.0).into();
        assert_eq!(line.first_point(), Point::new(0.0, 0.0));
        assert_eq!(line.last_point(), Point::new(1.0, 2.0));

        let curve: Shape = BezierCurve::new([
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 1.0),
            Point::new(3.0, 0.0),
        ])
        .into();
        assert_eq!(curve.base_points().len(), 4);
        assert_eq!(curve.last_point(), Point::new(3.0, 0.0));
    }

    #[test]
    fn test_line_approximation_is_its_end_points() {
        let line: Shape = Line::from_coords(0.0, 0.0, 5.0, 5.0).into();
        assert_eq!(
            line.piecewise_linear_approximation_with(&FlatteningTolerance::default()),
            line.base_points()
        );
    }

    #[test]
    fn test_map_points_keeps_kind() {
        let line: Shape = Line::from_coords(1.0, 1.0, 2.0, 2.0).into();
        let moved = line.map_points(|p| Point::new(p.x() + 1.0, p.y()));
        assert_eq!(moved, Shape::Line(Line::from_coords(2.0, 1.0, 3.0, 2.0)));
    }
}
