use std::collections::HashSet;

use crate::geom::bezier::{default_tolerance, FlatteningTolerance};
use crate::geom::point::Point;
use crate::geom::shape::Shape;

/// A run of connected segments, as started by an `m` or `re` operator.
///
/// Cloning copies the segment list, so a cloned subpath can be changed
/// independently of the original.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Subpath {
    start_point: Option<Point>,
    segments: Vec<Shape>,
    closed: bool,
}

impl Subpath {
    pub fn new(start_point: Point) -> Self {
        Subpath {
            start_point: Some(start_point),
            segments: Vec::new(),
            closed: false,
        }
    }

    pub fn start_point(&self) -> Option<Point> {
        self.start_point
    }

    pub fn set_start_point(&mut self, point: Point) {
        self.start_point = Some(point);
    }

    /// End point of the last segment; the start point for a closed or
    /// segment-less subpath.
    pub fn last_point(&self) -> Option<Point> {
        match self.segments.last() {
            Some(segment) if !self.closed => Some(segment.last_point()),
            _ => self.start_point,
        }
    }

    /// Appends a segment. Closed subpaths ignore new segments; a single-point
    /// subpath is re-anchored at the segment's first point.
    pub fn add_segment(&mut self, segment: impl Into<Shape>) {
        if self.closed {
            return;
        }
        let segment = segment.into();
        if self.is_single_point_open() {
            self.start_point = Some(segment.first_point());
        }
        self.segments.push(segment);
    }

    pub fn segments(&self) -> &[Shape] {
        self.segments.as_slice()
    }

    /// No start point has been set.
    pub fn is_empty(&self) -> bool {
        self.start_point.is_none()
    }

    pub fn is_single_point_open(&self) -> bool {
        self.segments.is_empty() && !self.closed
    }

    pub fn is_single_point_closed(&self) -> bool {
        self.segments.is_empty() && self.closed
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn set_closed(&mut self, closed: bool) {
        self.closed = closed;
    }

    /// True for a closed single point, and for a subpath whose every segment
    /// collapses onto a single coordinate.
    pub fn is_degenerate(&self) -> bool {
        for segment in &self.segments {
            let distinct: HashSet<(u64, u64)> =
                segment.base_points().iter().map(Point::bits).collect();
            if distinct.len() != 1 {
                return false;
            }
        }
        !self.segments.is_empty() || self.closed
    }

    pub fn piecewise_linear_approximation(&self) -> Vec<Point> {
        self.piecewise_linear_approximation_with(&default_tolerance())
    }

    /// Concatenated polylines of all segments. Each segment after the first
    /// drops its first point, which repeats the previous segment's last one.
    pub fn piecewise_linear_approximation_with(
        &self,
        tolerance: &FlatteningTolerance,
    ) -> Vec<Point> {
        let mut result = Vec::new();
        for (i, segment) in self.segments.iter().enumerate() {
            let approx = segment.piecewise_linear_approximation_with(tolerance);
            let skip = if i == 0 { 0 } else { 1 };
            result.extend(approx.into_iter().skip(skip));
        }
        result
    }
}
