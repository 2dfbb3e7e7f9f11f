use std::fmt;

use crate::error::{GeomError, Result};
use crate::geom::point::Point;

/// An axis-aligned rectangle given by its lower-left corner and size.
#[derive(Debug, Default, Clone, Copy)]
pub struct Rectangle {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl Rectangle {
    pub const EPS: f32 = 1e-4;

    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rectangle {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanning two opposite corners in any order.
    pub fn from_corners(llx: f32, lly: f32, urx: f32, ury: f32) -> Self {
        let mut rect = Rectangle::default();
        rect.set_bbox(llx, lly, urx, ury);
        rect
    }

    // x y w h, the same layout as the `re` operator
    pub fn set_bbox(&mut self, mut llx: f32, mut lly: f32, mut urx: f32, mut ury: f32) {
        if llx > urx {
            std::mem::swap(&mut llx, &mut urx);
        }
        if lly > ury {
            std::mem::swap(&mut lly, &mut ury);
        }
        self.x = llx;
        self.y = lly;
        self.width = urx - llx;
        self.height = ury - lly;
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn set_x(&mut self, x: f32) {
        self.x = x;
    }

    pub fn set_y(&mut self, y: f32) {
        self.y = y;
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = width;
    }

    pub fn set_height(&mut self, height: f32) {
        self.height = height;
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn lower_left(&self) -> Point {
        Point::new(self.x as f64, self.y as f64)
    }

    pub fn move_left(&mut self, delta: f32) {
        self.x -= delta;
    }

    pub fn move_right(&mut self, delta: f32) {
        self.x += delta;
    }

    pub fn move_up(&mut self, delta: f32) {
        self.y += delta;
    }

    pub fn move_down(&mut self, delta: f32) {
        self.y -= delta;
    }

    pub fn increase_width(&mut self, extra: f32) {
        self.width += extra;
    }

    pub fn decrease_width(&mut self, extra: f32) {
        self.width -= extra;
    }

    /// Grows the rectangle downwards, keeping the top edge in place.
    pub fn increase_height(&mut self, extra: f32) {
        self.height += extra;
        self.y -= extra;
    }

    /// Shrinks the rectangle upwards, keeping the top edge in place.
    pub fn decrease_height(&mut self, extra: f32) {
        self.height -= extra;
        self.y += extra;
    }

    /// Shrinks the rectangle by the given margins, or grows it when `reverse` is set.
    pub fn apply_margins(&mut self, top: f32, right: f32, bottom: f32, left: f32, reverse: bool) {
        let sign = if reverse { -1.0 } else { 1.0 };
        self.x += left * sign;
        self.width -= (left + right) * sign;
        self.y += bottom * sign;
        self.height -= (top + bottom) * sign;
    }

    /// Corners counter-clockwise from the lower-left one.
    pub fn to_points(&self) -> [Point; 4] {
        let (l, b, r, t) = (
            self.left() as f64,
            self.bottom() as f64,
            self.right() as f64,
            self.top() as f64,
        );
        [
            Point::new(l, b),
            Point::new(r, b),
            Point::new(r, t),
            Point::new(l, t),
        ]
    }

    /// Smallest rectangle enclosing all of `rects`.
    pub fn common_rectangle(rects: &[Rectangle]) -> Option<Rectangle> {
        let first = rects.first()?;
        let (mut llx, mut lly, mut urx, mut ury) =
            (first.left(), first.bottom(), first.right(), first.top());
        for rect in &rects[1..] {
            llx = llx.min(rect.left());
            lly = lly.min(rect.bottom());
            urx = urx.max(rect.right());
            ury = ury.max(rect.top());
        }
        Some(Rectangle::new(llx, lly, urx - llx, ury - lly))
    }

    /// Bounding box of a point cloud.
    pub fn calculate_bbox(points: &[Point]) -> Option<Rectangle> {
        let first = points.first()?;
        let (mut llx, mut lly, mut urx, mut ury) = (first.x(), first.y(), first.x(), first.y());
        for p in &points[1..] {
            llx = llx.min(p.x());
            lly = lly.min(p.y());
            urx = urx.max(p.x());
            ury = ury.max(p.y());
        }
        Some(Rectangle::from_corners(
            llx as f32, lly as f32, urx as f32, ury as f32,
        ))
    }

    /// The shared area of two rectangles. Rectangles that only touch yield a
    /// zero-width or zero-height result; disjoint ones yield `None`.
    pub fn get_intersection(&self, rect: &Rectangle) -> Option<Rectangle> {
        let llx = self.left().max(rect.left());
        let lly = self.bottom().max(rect.bottom());
        let urx = self.right().min(rect.right());
        let ury = self.top().min(rect.top());
        let width = snap_to_zero(urx - llx);
        let height = snap_to_zero(ury - lly);
        if width >= 0.0 && height >= 0.0 {
            Some(Rectangle::new(llx, lly, width, height))
        } else {
            None
        }
    }

    /// True if `rect` lies inside this rectangle, edges included, within [`Self::EPS`].
    pub fn contains(&self, rect: &Rectangle) -> bool {
        self.left() - Self::EPS <= rect.left()
            && self.bottom() - Self::EPS <= rect.bottom()
            && rect.right() <= self.right() + Self::EPS
            && rect.top() <= self.top() + Self::EPS
    }

    /// Touching edges count as overlapping.
    pub fn overlaps(&self, rect: &Rectangle) -> bool {
        self.overlaps_with_epsilon(rect, -Self::EPS)
    }

    /// A positive `epsilon` requires the rectangles to share more than a
    /// band of that width; a negative one also accepts rectangles that are
    /// up to `|epsilon|` apart.
    pub fn overlaps_with_epsilon(&self, rect: &Rectangle, epsilon: f32) -> bool {
        !(self.right() < rect.left() + epsilon
            || self.top() < rect.bottom() + epsilon
            || self.left() > rect.right() - epsilon
            || self.bottom() > rect.top() - epsilon)
    }

    /// True if the segment `(x1, y1)-(x2, y2)` touches the rectangle.
    pub fn intersects_line(&self, x1: f32, y1: f32, x2: f32, y2: f32) -> bool {
        let (rx1, ry1) = (self.left() as f64, self.bottom() as f64);
        let (rx2, ry2) = (self.right() as f64, self.top() as f64);
        let (x1, y1, x2, y2) = (x1 as f64, y1 as f64, x2 as f64, y2 as f64);
        (rx1 <= x1 && x1 <= rx2 && ry1 <= y1 && y1 <= ry2)
            || (rx1 <= x2 && x2 <= rx2 && ry1 <= y2 && y2 <= ry2)
            || lines_intersect(rx1, ry1, rx2, ry2, x1, y1, x2, y2)
            || lines_intersect(rx2, ry1, rx1, ry2, x1, y1, x2, y2)
    }

    pub fn equals_with_epsilon(&self, that: &Rectangle, eps: f32) -> bool {
        (self.x - that.x).abs() < eps
            && (self.y - that.y).abs() < eps
            && (self.width - that.width).abs() < eps
            && (self.height - that.height).abs() < eps
    }

    /// Expresses `rect` in unrotated page space for a page with the given
    /// `/Rotate` value and page size. Rotations other than multiples of 90
    /// degrees leave the rectangle unchanged.
    pub fn rectangle_on_rotated_page(
        rect: &Rectangle,
        rotation: i32,
        page_size: &Rectangle,
    ) -> Rectangle {
        if rotation % 90 != 0 {
            return *rect;
        }
        match (rotation / 90).rem_euclid(4) {
            1 => Rectangle::new(
                page_size.width() - rect.top(),
                rect.left(),
                rect.height(),
                rect.width(),
            ),
            2 => Rectangle::new(
                page_size.width() - rect.right(),
                page_size.height() - rect.top(),
                rect.width(),
                rect.height(),
            ),
            3 => Rectangle::new(
                rect.bottom(),
                page_size.height() - rect.right(),
                rect.height(),
                rect.width(),
            ),
            _ => *rect,
        }
    }

    /// Bounding box of the first quadrilateral of a `/QuadPoints` array.
    pub fn bounding_rectangle_from_quad_points(quad_points: &[f32]) -> Result<Rectangle> {
        check_quad_points(quad_points)?;
        if quad_points.is_empty() {
            return Err(GeomError::QuadPoints(
                "Quad point array is empty".to_string(),
            ));
        }
        Ok(quad_bbox(&quad_points[..8]))
    }

    /// One bounding box per quadrilateral of a `/QuadPoints` array.
    pub fn bounding_rectangles_from_quad_points(quad_points: &[f32]) -> Result<Vec<Rectangle>> {
        check_quad_points(quad_points)?;
        Ok(quad_points.chunks_exact(8).map(quad_bbox).collect())
    }
}

// edges that meet after f32 rounding still count as touching
fn snap_to_zero(extent: f32) -> f32 {
    if extent.abs() < Rectangle::EPS {
        0.0
    } else {
        extent
    }
}

fn check_quad_points(quad_points: &[f32]) -> Result<()> {
    if quad_points.len() % 8 != 0 {
        return Err(GeomError::QuadPoints(format!(
            "Quad point array length {} is not a multiple of 8",
            quad_points.len()
        )));
    }
    Ok(())
}

fn quad_bbox(quad: &[f32]) -> Rectangle {
    let mut llx = f32::MAX;
    let mut lly = f32::MAX;
    let mut urx = -f32::MAX;
    let mut ury = -f32::MAX;
    for xy in quad.chunks_exact(2) {
        llx = llx.min(xy[0]);
        urx = urx.max(xy[0]);
        lly = lly.min(xy[1]);
        ury = ury.max(xy[1]);
    }
    Rectangle::new(llx, lly, urx - llx, ury - lly)
}

// Orientation test of segment (x3,y3)-(x4,y4) against (x1,y1)-(x2,y2);
// collinear segments fall back to a projection overlap check.
#[allow(clippy::too_many_arguments)]
fn lines_intersect(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    x3: f64,
    y3: f64,
    x4: f64,
    y4: f64,
) -> bool {
    let (x2, y2) = (x2 - x1, y2 - y1);
    let (x3, y3) = (x3 - x1, y3 - y1);
    let (x4, y4) = (x4 - x1, y4 - y1);

    let av_b = x2 * y3 - x3 * y2;
    let av_c = x2 * y4 - x4 * y2;

    if av_b == 0.0 && av_c == 0.0 {
        if x2 != 0.0 {
            return (x4 * x3 <= 0.0)
                || ((x3 * x2 >= 0.0)
                    && if x2 > 0.0 {
                        x3 <= x2 || x4 <= x2
                    } else {
                        x3 >= x2 || x4 >= x2
                    });
        }
        if y2 != 0.0 {
            return (y4 * y3 <= 0.0)
                || ((y3 * y2 >= 0.0)
                    && if y2 > 0.0 {
                        y3 <= y2 || y4 <= y2
                    } else {
                        y3 >= y2 || y4 >= y2
                    });
        }
        return false;
    }

    let bv_c = x3 * y4 - x4 * y3;
    (av_b * av_c <= 0.0) && (bv_c * (av_b + bv_c - av_c) <= 0.0)
}

impl PartialEq for Rectangle {
    fn eq(&self, other: &Self) -> bool {
        self.equals_with_epsilon(other, Self::EPS)
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rectangle: [x={},y={},width={},height={}]",
            self.x, self.y, self.width, self.height
        )
    }
}
