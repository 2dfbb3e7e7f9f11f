use crate::geom::matrix::Matrix;
use crate::geom::rectangle::Rectangle;
use crate::geom::vector::Vector;

/// A segment between two homogeneous positions, as produced by text and
/// glyph geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    start: Vector,
    end: Vector,
}

impl LineSegment {
    pub fn new(start: Vector, end: Vector) -> Self {
        LineSegment { start, end }
    }

    pub fn start_point(&self) -> &Vector {
        &self.start
    }

    pub fn end_point(&self) -> &Vector {
        &self.end
    }

    pub fn length(&self) -> f32 {
        self.end.subtract(&self.start).length()
    }

    pub fn bounding_rectangle(&self) -> Rectangle {
        let (x1, y1) = (self.start.x(), self.start.y());
        let (x2, y2) = (self.end.x(), self.end.y());
        Rectangle::new(x1.min(x2), y1.min(y2), (x2 - x1).abs(), (y2 - y1).abs())
    }

    pub fn transform_by(&self, m: &Matrix) -> LineSegment {
        LineSegment::new(self.start.cross_matrix(m), self.end.cross_matrix(m))
    }

    /// True if `point` is componentwise between the start and the end point.
    ///
    /// This is a per-axis box test, not a collinearity test: it only answers
    /// "lies on the segment" for segments that grow monotonically in x, y and z.
    pub fn contains_point(&self, point: &Vector) -> bool {
        let from_start = point.subtract(&self.start);
        if from_start.x() < 0.0 || from_start.y() < 0.0 || from_start.z() < 0.0 {
            return false;
        }
        let to_end = self.end.subtract(point);
        !(to_end.x() < 0.0 || to_end.y() < 0.0 || to_end.z() < 0.0)
    }

    pub fn contains_segment(&self, other: &LineSegment) -> bool {
        self.contains_point(&other.start) && self.contains_point(&other.end)
    }
}
