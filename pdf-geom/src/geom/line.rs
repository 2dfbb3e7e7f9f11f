use crate::geom::point::Point;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Line {
    start: Point,
    end: Point,
}

impl Line {
    pub fn new(start: Point, end: Point) -> Self {
        Line { start, end }
    }

    pub fn from_coords(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Line::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    pub fn start(&self) -> &Point {
        &self.start
    }

    pub fn end(&self) -> &Point {
        &self.end
    }

    pub fn base_points(&self) -> Vec<Point> {
        vec![self.start, self.end]
    }
}

#[cfg(test)]
mod tests {
    use super::Line;
    use crate::geom::point::Point;

    #[test]
    fn test_base_points() {
        let line = Line::from_coords(0.0, 1.0, 2.0, 3.0);
        assert_eq!(
            line.base_points(),
            vec![Point::new(0.0, 1.0), Point::new(2.0, 3.0)]
        );
        assert_eq!(line.start(), &Point::new(0.0, 1.0));
        assert_eq!(line.end(), &Point::new(2.0, 3.0));
    }
}
