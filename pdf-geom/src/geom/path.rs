use log::debug;

use crate::error::{GeomError, Result};
use crate::geom::bezier::{default_tolerance, BezierCurve, FlatteningTolerance};
use crate::geom::line::Line;
use crate::geom::point::Point;
use crate::geom::rectangle::Rectangle;
use crate::geom::shape::Shape;
use crate::geom::subpath::Subpath;

const START_PATH_ERR: &str = "Path shall start with \"re\" or \"m\" operator";

/// A path under construction, following the path construction operators of a
/// content stream.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Path {
    sub_paths: Vec<Subpath>,
    current: Option<Point>,
}

impl Path {
    pub fn new() -> Self {
        Path::default()
    }

    pub fn from_subpaths(sub_paths: Vec<Subpath>) -> Self {
        let mut path = Path::default();
        path.add_subpaths(sub_paths);
        path
    }

    pub fn sub_paths(&self) -> &[Subpath] {
        self.sub_paths.as_slice()
    }

    pub fn last_subpath(&self) -> Option<&Subpath> {
        self.sub_paths.last()
    }

    /// Appends `subpath` and continues from its last point.
    pub fn add_subpath(&mut self, subpath: Subpath) {
        self.current = subpath.last_point();
        self.sub_paths.push(subpath);
    }

    pub fn add_subpaths(&mut self, sub_paths: impl IntoIterator<Item = Subpath>) {
        for subpath in sub_paths {
            self.add_subpath(subpath);
        }
    }

    pub fn current_point(&self) -> Option<&Point> {
        self.current.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.sub_paths.is_empty()
    }

    // m
    pub fn move_to(&mut self, point: Point) {
        self.current = Some(point);
        match self.sub_paths.last_mut() {
            Some(sub) if sub.is_single_point_open() => sub.set_start_point(point),
            _ => self.sub_paths.push(Subpath::new(point)),
        }
    }

    // l
    pub fn line_to(&mut self, point: Point) -> Result<()> {
        let current = self.require_current()?;
        self.append_segment(Line::new(current, point).into());
        Ok(())
    }

    // c
    pub fn curve_to(&mut self, p1: Point, p2: Point, p3: Point) -> Result<()> {
        let current = self.require_current()?;
        self.append_segment(BezierCurve::new([current, p1, p2, p3]).into());
        Ok(())
    }

    // v: the first control point coincides with the current point
    pub fn curve_to_v(&mut self, p2: Point, p3: Point) -> Result<()> {
        let current = self.require_current()?;
        self.curve_to(current, p2, p3)
    }

    // y: the second control point coincides with the end point
    pub fn curve_to_y(&mut self, p1: Point, p3: Point) -> Result<()> {
        self.curve_to(p1, p3, p3)
    }

    // re: x y m, (x + width) y l, (x + width) (y + height) l, x (y + height) l, h
    pub fn rectangle(&mut self, rect: &Rectangle) {
        let [ll, lr, ur, ul] = rect.to_points();
        self.move_to(ll);
        for (from, to) in [(ll, lr), (lr, ur), (ur, ul)] {
            self.append_segment(Line::new(from, to).into());
        }
        self.close_subpath();
    }

    // h: the current point returns to the start of the closed subpath, and the
    // next segment opens a new subpath there
    pub fn close_subpath(&mut self) {
        if let Some(last) = self.sub_paths.last_mut() {
            last.set_closed(true);
            if let Some(start) = last.start_point() {
                self.current = Some(start);
            }
        }
    }

    pub fn close_all_subpaths(&mut self) {
        for subpath in self.sub_paths.iter_mut() {
            subpath.set_closed(true);
        }
    }

    /// Opens every closed subpath and appends an explicit line from its last
    /// point back to its start. Returns the indices of the changed subpaths.
    pub fn replace_close_with_line(&mut self) -> Vec<usize> {
        let mut modified = Vec::new();
        for (i, subpath) in self.sub_paths.iter_mut().enumerate() {
            if !subpath.is_closed() {
                continue;
            }
            subpath.set_closed(false);
            if let (Some(last), Some(start)) = (subpath.last_point(), subpath.start_point()) {
                subpath.add_segment(Line::new(last, start));
            }
            modified.push(i);
        }
        if !modified.is_empty() {
            debug!("replaced close with line in subpaths {:?}", modified);
        }
        modified
    }

    pub fn piecewise_linear_approximation(&self) -> Vec<Vec<Point>> {
        self.piecewise_linear_approximation_with(&default_tolerance())
    }

    /// One polyline per subpath.
    pub fn piecewise_linear_approximation_with(
        &self,
        tolerance: &FlatteningTolerance,
    ) -> Vec<Vec<Point>> {
        self.sub_paths
            .iter()
            .map(|sub| sub.piecewise_linear_approximation_with(tolerance))
            .collect()
    }

    fn require_current(&self) -> Result<Point> {
        self.current
            .ok_or_else(|| GeomError::Path(START_PATH_ERR.to_string()))
    }

    fn append_segment(&mut self, segment: Shape) {
        let end = segment.last_point();
        self.open_subpath(segment.first_point()).add_segment(segment);
        self.current = Some(end);
    }

    // The subpath segments go to, starting a new one after a close.
    fn open_subpath(&mut self, start: Point) -> &mut Subpath {
        if self.sub_paths.last().map_or(true, Subpath::is_closed) {
            debug!("starting implicit subpath at {}", start);
            self.sub_paths.push(Subpath::new(start));
        }
        let last = self.sub_paths.len() - 1;
        &mut self.sub_paths[last]
    }
}

#[cfg(test)]
mod tests {
    use super::Path;
    use crate::error::GeomError;
    use crate::geom::line::Line;
    use crate::geom::point::Point;
    use crate::geom::rectangle::Rectangle;
    use crate::geom::shape::Shape;

    fn triangle() -> Path {
        let mut path = Path::new();
        path.move_to(Point::new(0.0, 0.0));
        path.line_to(Point::new(10.0, 0.0)).unwrap();
        path.line_to(Point::new(10.0, 10.0)).unwrap();
        path.close_subpath();
        path
    }

    #[test]
    fn test_close_subpath() {
        let path = triangle();
        assert_eq!(path.sub_paths().len(), 1);
        let sub = &path.sub_paths()[0];
        assert!(sub.is_closed());
        assert_eq!(sub.segments().len(), 2);
        assert!(sub
            .segments()
            .iter()
            .all(|s| matches!(s, Shape::Line(_))));
        assert!(!sub.is_degenerate());
        assert_eq!(path.current_point(), Some(&Point::new(0.0, 0.0)));
    }

    #[test]
    fn test_replace_close_with_line() {
        let mut path = triangle();
        assert_eq!(path.replace_close_with_line(), vec![0]);
        let sub = &path.sub_paths()[0];
        assert!(!sub.is_closed());
        assert_eq!(sub.segments().len(), 3);
        assert_eq!(
            sub.segments()[2],
            Shape::Line(Line::from_coords(10.0, 10.0, 0.0, 0.0))
        );
        assert!(path.replace_close_with_line().is_empty());
    }

    #[test]
    fn test_line_to_without_move_to() {
        let mut path = Path::new();
        assert!(matches!(
            path.line_to(Point::new(1.0, 1.0)),
            Err(GeomError::Path(_))
        ));
        assert!(path
            .curve_to(Point::new(1.0, 1.0), Point::new(2.0, 2.0), Point::new(3.0, 3.0))
            .is_err());
        assert!(path.curve_to_v(Point::new(2.0, 2.0), Point::new(3.0, 3.0)).is_err());
        assert!(path.curve_to_y(Point::new(1.0, 1.0), Point::new(3.0, 3.0)).is_err());
        assert!(path.is_empty());
    }

    #[test]
    fn test_move_to_relocates_single_point() {
        let mut path = Path::new();
        path.move_to(Point::new(0.0, 0.0));
        path.move_to(Point::new(5.0, 5.0));
        assert_eq!(path.sub_paths().len(), 1);
        assert_eq!(path.sub_paths()[0].start_point(), Some(Point::new(5.0, 5.0)));

        path.line_to(Point::new(6.0, 6.0)).unwrap();
        path.move_to(Point::new(7.0, 7.0));
        assert_eq!(path.sub_paths().len(), 2);
    }

    #[test]
    fn test_segment_after_close_starts_new_subpath() {
        let mut path = triangle();
        path.line_to(Point::new(-5.0, 0.0)).unwrap();
        assert_eq!(path.sub_paths().len(), 2);
        let second = &path.sub_paths()[1];
        assert_eq!(second.start_point(), Some(Point::new(0.0, 0.0)));
        assert_eq!(second.segments().len(), 1);
        assert_eq!(path.sub_paths()[0].segments().len(), 2);
    }

    #[test]
    fn test_curves() {
        let mut path = Path::new();
        path.move_to(Point::new(0.0, 0.0));
        path.curve_to(Point::new(0.0, 1.0), Point::new(1.0, 1.0), Point::new(1.0, 0.0))
            .unwrap();
        path.curve_to_v(Point::new(2.0, -1.0), Point::new(2.0, 0.0)).unwrap();
        path.curve_to_y(Point::new(3.0, 1.0), Point::new(3.0, 0.0)).unwrap();
        let segments = path.sub_paths()[0].segments();
        assert_eq!(segments.len(), 3);
        assert_eq!(
            segments[1].base_points(),
            vec![
                Point::new(1.0, 0.0),
                Point::new(1.0, 0.0),
                Point::new(2.0, -1.0),
                Point::new(2.0, 0.0)
            ]
        );
        assert_eq!(
            segments[2].base_points(),
            vec![
                Point::new(2.0, 0.0),
                Point::new(3.0, 1.0),
                Point::new(3.0, 0.0),
                Point::new(3.0, 0.0)
            ]
        );
        assert_eq!(path.current_point(), Some(&Point::new(3.0, 0.0)));
    }

    #[test]
    fn test_rectangle() {
        let mut path = Path::new();
        path.rectangle(&Rectangle::new(1.0, 2.0, 3.0, 4.0));
        let sub = &path.sub_paths()[0];
        assert!(sub.is_closed());
        assert_eq!(sub.segments().len(), 3);
        assert_eq!(sub.start_point(), Some(Point::new(1.0, 2.0)));
        assert_eq!(sub.segments()[2].last_point(), Point::new(1.0, 6.0));
        assert_eq!(path.current_point(), Some(&Point::new(1.0, 2.0)));

        path.rectangle(&Rectangle::new(10.0, 10.0, 1.0, 1.0));
        assert_eq!(path.sub_paths().len(), 2);
    }

    #[test]
    fn test_close_all_subpaths() {
        let mut path = Path::new();
        path.move_to(Point::new(0.0, 0.0));
        path.line_to(Point::new(1.0, 0.0)).unwrap();
        path.move_to(Point::new(5.0, 5.0));
        path.line_to(Point::new(6.0, 5.0)).unwrap();
        path.close_all_subpaths();
        assert!(path.sub_paths().iter().all(|s| s.is_closed()));
        assert_eq!(path.sub_paths()[1].segments().len(), 1);
        assert_eq!(path.replace_close_with_line(), vec![0, 1]);
    }

    #[test]
    fn test_clone_is_independent() {
        let path = triangle();
        let mut copy = path.clone();
        copy.replace_close_with_line();
        assert!(path.sub_paths()[0].is_closed());
        assert_eq!(path.sub_paths()[0].segments().len(), 2);
        assert_eq!(copy.sub_paths()[0].segments().len(), 3);
    }

    #[test]
    fn test_piecewise_linear_approximation() {
        let mut path = triangle();
        path.move_to(Point::new(20.0, 0.0));
        path.curve_to(Point::new(20.0, 10.0), Point::new(30.0, 10.0), Point::new(30.0, 0.0))
            .unwrap();
        let polylines = path.piecewise_linear_approximation();
        assert_eq!(polylines.len(), 2);
        assert_eq!(
            polylines[0],
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 10.0)
            ]
        );
        assert!(polylines[1].len() > 2);
    }

    #[test]
    fn test_from_subpaths_tracks_current_point() {
        let path = triangle();
        let rebuilt = Path::from_subpaths(path.sub_paths().to_vec());
        assert_eq!(rebuilt.sub_paths(), path.sub_paths());
        assert_eq!(rebuilt.current_point(), Some(&Point::new(0.0, 0.0)));
    }
}
