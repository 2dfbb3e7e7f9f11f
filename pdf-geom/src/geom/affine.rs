use std::cell::Cell;
use std::fmt;

use log::warn;

use crate::error::{GeomError, Result};
use crate::geom::matrix::Matrix;
use crate::geom::point::Point;

/// Classification cache for [`AffineTransform::get_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeCache {
    Dirty,
    Cached(u32),
}

/// A 2x3 affine transform in double precision.
///
/// ```text
/// | m00  m01  m02 |
/// | m10  m11  m12 |
/// ```
///
/// A point is mapped as `x' = m00*x + m01*y + m02`, `y' = m10*x + m11*y + m12`.
/// The six coefficients line up with the PDF matrix operands `a b c d e f`
/// as `m00 m10 m01 m11 m02 m12`.
#[derive(Debug, Clone)]
pub struct AffineTransform {
    m00: f64,
    m10: f64,
    m01: f64,
    m11: f64,
    m02: f64,
    m12: f64,
    kind: Cell<TypeCache>,
}

// A coordinate buffer element, so the batch transforms can be written once
// for f32 and f64 storage.
trait Coord: Copy {
    fn to_f64(self) -> f64;
    fn from_f64(v: f64) -> Self;
}

impl Coord for f64 {
    fn to_f64(self) -> f64 {
        self
    }
    fn from_f64(v: f64) -> Self {
        v
    }
}

impl Coord for f32 {
    fn to_f64(self) -> f64 {
        self as f64
    }
    fn from_f64(v: f64) -> Self {
        v as f32
    }
}

fn check_pairs<S, D>(src: &[S], dst: &[D]) -> Result<()> {
    if src.len() % 2 != 0 {
        return Err(GeomError::BufferRange(format!(
            "coordinate count {} is odd",
            src.len()
        )));
    }
    if dst.len() < src.len() {
        return Err(GeomError::BufferRange(format!(
            "destination holds {} values, need {}",
            dst.len(),
            src.len()
        )));
    }
    Ok(())
}

fn check_range(len: usize, offset: usize, num_pts: usize) -> Result<()> {
    match num_pts
        .checked_mul(2)
        .and_then(|n| n.checked_add(offset))
    {
        Some(end) if end <= len => Ok(()),
        _ => Err(GeomError::BufferRange(format!(
            "{} points at offset {} exceed buffer of {} values",
            num_pts, offset, len
        ))),
    }
}

impl AffineTransform {
    pub const TYPE_IDENTITY: u32 = 0;
    pub const TYPE_TRANSLATION: u32 = 1;
    pub const TYPE_UNIFORM_SCALE: u32 = 2;
    pub const TYPE_GENERAL_SCALE: u32 = 4;
    pub const TYPE_QUADRANT_ROTATION: u32 = 8;
    pub const TYPE_GENERAL_ROTATION: u32 = 16;
    pub const TYPE_GENERAL_TRANSFORM: u32 = 32;
    pub const TYPE_FLIP: u32 = 64;
    pub const TYPE_MASK_SCALE: u32 = Self::TYPE_UNIFORM_SCALE | Self::TYPE_GENERAL_SCALE;
    pub const TYPE_MASK_ROTATION: u32 =
        Self::TYPE_QUADRANT_ROTATION | Self::TYPE_GENERAL_ROTATION;

    /// Determinants below this magnitude make a transform non-invertible.
    pub const ZERO: f64 = 1e-10;

    pub fn identity() -> Self {
        AffineTransform {
            m00: 1.0,
            m10: 0.0,
            m01: 0.0,
            m11: 1.0,
            m02: 0.0,
            m12: 0.0,
            kind: Cell::new(TypeCache::Cached(Self::TYPE_IDENTITY)),
        }
    }

    /// Coefficients in PDF operand order `a b c d e f`.
    pub fn new(m00: f64, m10: f64, m01: f64, m11: f64, m02: f64, m12: f64) -> Self {
        AffineTransform {
            m00,
            m10,
            m01,
            m11,
            m02,
            m12,
            kind: Cell::new(TypeCache::Dirty),
        }
    }

    /// Reads `[m00 m10 m01 m11]` and, when present, `[m02 m12]`.
    pub fn from_slice(matrix: &[f64]) -> Result<Self> {
        if matrix.len() != 4 && matrix.len() != 6 {
            return Err(GeomError::BufferRange(format!(
                "affine transform needs 4 or 6 values, got {}",
                matrix.len()
            )));
        }
        let mut t = AffineTransform::new(matrix[0], matrix[1], matrix[2], matrix[3], 0.0, 0.0);
        if matrix.len() == 6 {
            t.m02 = matrix[4];
            t.m12 = matrix[5];
        }
        Ok(t)
    }

    pub fn translate_instance(mx: f64, my: f64) -> Self {
        let mut t = AffineTransform::identity();
        t.set_to_translation(mx, my);
        t
    }

    pub fn scale_instance(sx: f64, sy: f64) -> Self {
        let mut t = AffineTransform::identity();
        t.set_to_scale(sx, sy);
        t
    }

    pub fn shear_instance(shx: f64, shy: f64) -> Self {
        let mut t = AffineTransform::identity();
        t.set_to_shear(shx, shy);
        t
    }

    pub fn rotate_instance(angle: f64) -> Self {
        let mut t = AffineTransform::identity();
        t.set_to_rotation(angle);
        t
    }

    pub fn rotate_instance_about(angle: f64, px: f64, py: f64) -> Self {
        let mut t = AffineTransform::identity();
        t.set_to_rotation_about(angle, px, py);
        t
    }

    pub fn scale_x(&self) -> f64 {
        self.m00
    }

    pub fn scale_y(&self) -> f64 {
        self.m11
    }

    pub fn shear_x(&self) -> f64 {
        self.m01
    }

    pub fn shear_y(&self) -> f64 {
        self.m10
    }

    pub fn translate_x(&self) -> f64 {
        self.m02
    }

    pub fn translate_y(&self) -> f64 {
        self.m12
    }

    /// `[m00, m10, m01, m11, m02, m12]`, ready to be written as a `cm` operand list.
    pub fn matrix(&self) -> [f64; 6] {
        [self.m00, self.m10, self.m01, self.m11, self.m02, self.m12]
    }

    pub fn is_identity(&self) -> bool {
        self.get_type() == Self::TYPE_IDENTITY
    }

    pub fn determinant(&self) -> f64 {
        self.m00 * self.m11 - self.m01 * self.m10
    }

    /// Bitwise combination of the `TYPE_*` flags, computed once per mutation.
    pub fn get_type(&self) -> u32 {
        if let TypeCache::Cached(t) = self.kind.get() {
            return t;
        }
        let t = self.classify();
        self.kind.set(TypeCache::Cached(t));
        t
    }

    fn classify(&self) -> u32 {
        let mut t = Self::TYPE_IDENTITY;

        if self.m00 * self.m01 + self.m10 * self.m11 != 0.0 {
            return Self::TYPE_GENERAL_TRANSFORM;
        }

        if self.m02 != 0.0 || self.m12 != 0.0 {
            t |= Self::TYPE_TRANSLATION;
        } else if self.m00 == 1.0 && self.m11 == 1.0 && self.m01 == 0.0 && self.m10 == 0.0 {
            return Self::TYPE_IDENTITY;
        }

        if self.determinant() < 0.0 {
            t |= Self::TYPE_FLIP;
        }

        let dx = self.m00 * self.m00 + self.m10 * self.m10;
        let dy = self.m01 * self.m01 + self.m11 * self.m11;
        if dx != dy {
            t |= Self::TYPE_GENERAL_SCALE;
        } else if dx != 1.0 {
            t |= Self::TYPE_UNIFORM_SCALE;
        }

        if (self.m00 == 0.0 && self.m11 == 0.0)
            || (self.m10 == 0.0 && self.m01 == 0.0 && (self.m00 < 0.0 || self.m11 < 0.0))
        {
            t |= Self::TYPE_QUADRANT_ROTATION;
        } else if self.m01 != 0.0 || self.m10 != 0.0 {
            t |= Self::TYPE_GENERAL_ROTATION;
        }
        t
    }

    pub fn set_transform(&mut self, m00: f64, m10: f64, m01: f64, m11: f64, m02: f64, m12: f64) {
        self.m00 = m00;
        self.m10 = m10;
        self.m01 = m01;
        self.m11 = m11;
        self.m02 = m02;
        self.m12 = m12;
        self.kind.set(TypeCache::Dirty);
    }

    pub fn set_transform_from(&mut self, t: &AffineTransform) {
        self.m00 = t.m00;
        self.m10 = t.m10;
        self.m01 = t.m01;
        self.m11 = t.m11;
        self.m02 = t.m02;
        self.m12 = t.m12;
        self.kind.set(t.kind.get());
    }

    pub fn set_to_identity(&mut self) {
        *self = AffineTransform::identity();
    }

    pub fn set_to_translation(&mut self, mx: f64, my: f64) {
        self.m00 = 1.0;
        self.m11 = 1.0;
        self.m01 = 0.0;
        self.m10 = 0.0;
        self.m02 = mx;
        self.m12 = my;
        self.kind.set(if mx == 0.0 && my == 0.0 {
            TypeCache::Cached(Self::TYPE_IDENTITY)
        } else {
            TypeCache::Cached(Self::TYPE_TRANSLATION)
        });
    }

    pub fn set_to_scale(&mut self, sx: f64, sy: f64) {
        self.m00 = sx;
        self.m11 = sy;
        self.m10 = 0.0;
        self.m01 = 0.0;
        self.m02 = 0.0;
        self.m12 = 0.0;
        self.kind.set(if sx != 1.0 || sy != 1.0 {
            TypeCache::Dirty
        } else {
            TypeCache::Cached(Self::TYPE_IDENTITY)
        });
    }

    pub fn set_to_shear(&mut self, shx: f64, shy: f64) {
        self.m00 = 1.0;
        self.m11 = 1.0;
        self.m02 = 0.0;
        self.m12 = 0.0;
        self.m01 = shx;
        self.m10 = shy;
        self.kind.set(if shx != 0.0 || shy != 0.0 {
            TypeCache::Dirty
        } else {
            TypeCache::Cached(Self::TYPE_IDENTITY)
        });
    }

    /// Rotation by `angle` radians. Angles within [`Self::ZERO`] of a quadrant
    /// snap to exact 0/1/-1 coefficients.
    pub fn set_to_rotation(&mut self, angle: f64) {
        let mut sin = angle.sin();
        let mut cos = angle.cos();
        if cos.abs() < Self::ZERO {
            cos = 0.0;
            sin = if sin > 0.0 { 1.0 } else { -1.0 };
        } else if sin.abs() < Self::ZERO {
            sin = 0.0;
            cos = if cos > 0.0 { 1.0 } else { -1.0 };
        }
        self.m00 = cos;
        self.m11 = cos;
        self.m01 = -sin;
        self.m10 = sin;
        self.m02 = 0.0;
        self.m12 = 0.0;
        self.kind.set(TypeCache::Dirty);
    }

    /// Rotation by `angle` radians around the pivot `(px, py)`.
    pub fn set_to_rotation_about(&mut self, angle: f64, px: f64, py: f64) {
        self.set_to_rotation(angle);
        self.m02 = px * (1.0 - self.m00) + py * self.m10;
        self.m12 = py * (1.0 - self.m00) - px * self.m10;
        self.kind.set(TypeCache::Dirty);
    }

    pub fn translate(&mut self, mx: f64, my: f64) {
        self.concatenate(&AffineTransform::translate_instance(mx, my));
    }

    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.concatenate(&AffineTransform::scale_instance(sx, sy));
    }

    pub fn shear(&mut self, shx: f64, shy: f64) {
        self.concatenate(&AffineTransform::shear_instance(shx, shy));
    }

    pub fn rotate(&mut self, angle: f64) {
        self.concatenate(&AffineTransform::rotate_instance(angle));
    }

    pub fn rotate_about(&mut self, angle: f64, px: f64, py: f64) {
        self.concatenate(&AffineTransform::rotate_instance_about(angle, px, py));
    }

    // The returned transform applies t1 first, then t2.
    fn compose(t1: &AffineTransform, t2: &AffineTransform) -> AffineTransform {
        AffineTransform::new(
            t1.m00 * t2.m00 + t1.m10 * t2.m01,
            t1.m00 * t2.m10 + t1.m10 * t2.m11,
            t1.m01 * t2.m00 + t1.m11 * t2.m01,
            t1.m01 * t2.m10 + t1.m11 * t2.m11,
            t1.m02 * t2.m00 + t1.m12 * t2.m01 + t2.m02,
            t1.m02 * t2.m10 + t1.m12 * t2.m11 + t2.m12,
        )
    }

    /// `self = t * self`: points go through `t` before the previous transform.
    pub fn concatenate(&mut self, t: &AffineTransform) {
        let r = Self::compose(t, self);
        self.set_transform_from(&r);
    }

    /// `self = self * t`: points go through `t` after the previous transform.
    pub fn pre_concatenate(&mut self, t: &AffineTransform) {
        let r = Self::compose(self, t);
        self.set_transform_from(&r);
    }

    pub fn create_inverse(&self) -> Result<AffineTransform> {
        let det = self.invertible_determinant()?;
        Ok(AffineTransform::new(
            self.m11 / det,
            -self.m10 / det,
            -self.m01 / det,
            self.m00 / det,
            (self.m01 * self.m12 - self.m11 * self.m02) / det,
            (self.m10 * self.m02 - self.m00 * self.m12) / det,
        ))
    }

    fn invertible_determinant(&self) -> Result<f64> {
        let det = self.determinant();
        if det.abs() < Self::ZERO {
            warn!("determinant {} of {} is zero", det, self);
            return Err(GeomError::NoninvertibleTransform(
                "Determinant is zero".to_string(),
            ));
        }
        Ok(det)
    }

    fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x * self.m00 + y * self.m01 + self.m02,
            x * self.m10 + y * self.m11 + self.m12,
        )
    }

    fn apply_delta(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.m00 + y * self.m01, x * self.m10 + y * self.m11)
    }

    fn apply_inverse(&self, det: f64, x: f64, y: f64) -> (f64, f64) {
        let x = x - self.m02;
        let y = y - self.m12;
        (
            (x * self.m11 - y * self.m01) / det,
            (y * self.m00 - x * self.m10) / det,
        )
    }

    pub fn transform(&self, src: &Point) -> Point {
        let (x, y) = self.apply(src.x(), src.y());
        Point::new(x, y)
    }

    /// Transforms `src` into the front of `dst`.
    pub fn transform_points(&self, src: &[Point], dst: &mut [Point]) -> Result<()> {
        if dst.len() < src.len() {
            return Err(GeomError::BufferRange(format!(
                "destination holds {} points, need {}",
                dst.len(),
                src.len()
            )));
        }
        for (s, d) in src.iter().zip(dst.iter_mut()) {
            *d = self.transform(s);
        }
        Ok(())
    }

    fn map_coords<S: Coord, D: Coord>(
        &self,
        src: &[S],
        dst: &mut [D],
        f: impl Fn(f64, f64) -> (f64, f64),
    ) -> Result<()> {
        check_pairs(src, dst)?;
        for (s, d) in src.chunks_exact(2).zip(dst.chunks_exact_mut(2)) {
            let (x, y) = f(s[0].to_f64(), s[1].to_f64());
            d[0] = D::from_f64(x);
            d[1] = D::from_f64(y);
        }
        Ok(())
    }

    /// Transforms interleaved `x, y` pairs of `src` into the front of `dst`.
    pub fn transform_coords(&self, src: &[f64], dst: &mut [f64]) -> Result<()> {
        self.map_coords(src, dst, |x, y| self.apply(x, y))
    }

    pub fn transform_coords_f32(&self, src: &[f32], dst: &mut [f32]) -> Result<()> {
        self.map_coords(src, dst, |x, y| self.apply(x, y))
    }

    pub fn transform_coords_f32_to_f64(&self, src: &[f32], dst: &mut [f64]) -> Result<()> {
        self.map_coords(src, dst, |x, y| self.apply(x, y))
    }

    pub fn transform_coords_f64_to_f32(&self, src: &[f64], dst: &mut [f32]) -> Result<()> {
        self.map_coords(src, dst, |x, y| self.apply(x, y))
    }

    fn transform_in_place<C: Coord>(
        &self,
        buf: &mut [C],
        src_off: usize,
        dst_off: usize,
        num_pts: usize,
    ) -> Result<()> {
        check_range(buf.len(), src_off, num_pts)?;
        check_range(buf.len(), dst_off, num_pts)?;
        // a destination starting inside the unread source must be filled from the back
        let backwards = src_off < dst_off && dst_off < src_off + num_pts * 2;
        for k in 0..num_pts {
            let i = if backwards { num_pts - 1 - k } else { k };
            let s = src_off + i * 2;
            let (x, y) = self.apply(buf[s].to_f64(), buf[s + 1].to_f64());
            let d = dst_off + i * 2;
            buf[d] = C::from_f64(x);
            buf[d + 1] = C::from_f64(y);
        }
        Ok(())
    }

    /// Transforms `num_pts` pairs starting at index `src_off` of `buf` and
    /// writes them starting at index `dst_off` of the same buffer. The two
    /// ranges may overlap.
    pub fn transform_coords_in_place(
        &self,
        buf: &mut [f64],
        src_off: usize,
        dst_off: usize,
        num_pts: usize,
    ) -> Result<()> {
        self.transform_in_place(buf, src_off, dst_off, num_pts)
    }

    pub fn transform_coords_f32_in_place(
        &self,
        buf: &mut [f32],
        src_off: usize,
        dst_off: usize,
        num_pts: usize,
    ) -> Result<()> {
        self.transform_in_place(buf, src_off, dst_off, num_pts)
    }

    /// Applies only the linear part, ignoring translation.
    pub fn delta_transform(&self, src: &Point) -> Point {
        let (x, y) = self.apply_delta(src.x(), src.y());
        Point::new(x, y)
    }

    pub fn delta_transform_coords(&self, src: &[f64], dst: &mut [f64]) -> Result<()> {
        self.map_coords(src, dst, |x, y| self.apply_delta(x, y))
    }

    pub fn inverse_transform(&self, src: &Point) -> Result<Point> {
        let det = self.invertible_determinant()?;
        let (x, y) = self.apply_inverse(det, src.x(), src.y());
        Ok(Point::new(x, y))
    }

    pub fn inverse_transform_coords(&self, src: &[f64], dst: &mut [f64]) -> Result<()> {
        let det = self.invertible_determinant()?;
        self.map_coords(src, dst, |x, y| self.apply_inverse(det, x, y))
    }

    pub fn inverse_transform_coords_f32(&self, src: &[f32], dst: &mut [f32]) -> Result<()> {
        let det = self.invertible_determinant()?;
        self.map_coords(src, dst, |x, y| self.apply_inverse(det, x, y))
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        AffineTransform::identity()
    }
}

impl PartialEq for AffineTransform {
    fn eq(&self, other: &Self) -> bool {
        self.matrix() == other.matrix()
    }
}

impl From<&Matrix> for AffineTransform {
    fn from(m: &Matrix) -> Self {
        AffineTransform::new(
            m.v11 as f64,
            m.v12 as f64,
            m.v21 as f64,
            m.v22 as f64,
            m.v31 as f64,
            m.v32 as f64,
        )
    }
}

impl From<&AffineTransform> for Matrix {
    fn from(t: &AffineTransform) -> Self {
        Matrix::new(
            t.m00 as f32,
            t.m10 as f32,
            t.m01 as f32,
            t.m11 as f32,
            t.m02 as f32,
            t.m12 as f32,
        )
    }
}

impl fmt::Display for AffineTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AffineTransform[[{}, {}, {}], [{}, {}, {}]]",
            self.m00, self.m01, self.m02, self.m10, self.m11, self.m12
        )
    }
}
