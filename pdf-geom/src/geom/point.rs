use std::fmt;

#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn set_location(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
    }

    pub fn distance_sq(&self, other: &Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    pub fn distance(&self, other: &Point) -> f64 {
        self.distance_sq(other).sqrt()
    }

    // bit pattern, so that 0.0 and -0.0 stay distinct like the coordinates they came from
    pub(crate) fn bits(&self) -> (u64, u64) {
        (self.x.to_bits(), self.y.to_bits())
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point: [x={},y={}]", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::Point;

    #[test]
    fn test_translate() {
        let mut p = Point::new(1.0, 2.0);
        p.translate(3.0, -2.0);
        assert_eq!(p, Point::new(4.0, 0.0));
        p.set_location(-1.0, -1.0);
        assert_eq!(p.x(), -1.0);
        assert_eq!(p.y(), -1.0);
    }

    #[test]
    fn test_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance_sq(&b), 25.0);
        assert_eq!(a.distance(&b), 5.0);
    }

    #[test]
    fn test_display() {
        let p = Point::new(1.5, 2.0);
        assert_eq!(p.to_string(), "Point: [x=1.5,y=2]");
    }
}
