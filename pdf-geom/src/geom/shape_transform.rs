//! Maps device space geometry back into the space a [`Matrix`] was expressed in.
//!
//! Every function applies the *inverse* of the given matrix to the defining
//! points and builds a new shape from the result; the input is left untouched.

use log::warn;

use crate::error::{GeomError, Result};
use crate::geom::affine::AffineTransform;
use crate::geom::bezier::BezierCurve;
use crate::geom::line::Line;
use crate::geom::matrix::Matrix;
use crate::geom::path::Path;
use crate::geom::point::Point;
use crate::geom::shape::Shape;
use crate::geom::subpath::Subpath;

fn inverse_of(ctm: &Matrix) -> Result<AffineTransform> {
    AffineTransform::from(ctm).create_inverse().map_err(|e| {
        warn!("matrix is not invertible:\n{}", ctm);
        GeomError::NoninvertibleMatrix {
            source: Box::new(e),
        }
    })
}

fn map_shape(t: &AffineTransform, shape: &Shape) -> Shape {
    shape.map_points(|p| t.transform(p))
}

fn map_subpath(t: &AffineTransform, subpath: &Subpath) -> Subpath {
    let mut mapped = Subpath::default();
    if let Some(start) = subpath.start_point() {
        mapped.set_start_point(t.transform(&start));
    }
    for segment in subpath.segments() {
        mapped.add_segment(map_shape(t, segment));
    }
    mapped.set_closed(subpath.is_closed());
    mapped
}

pub fn transform_points(points: &[Point], ctm: &Matrix) -> Result<Vec<Point>> {
    let t = inverse_of(ctm)?;
    let mut mapped = vec![Point::default(); points.len()];
    t.transform_points(points, &mut mapped)?;
    Ok(mapped)
}

pub fn transform_shape(shape: &Shape, ctm: &Matrix) -> Result<Shape> {
    let t = inverse_of(ctm)?;
    Ok(map_shape(&t, shape))
}

pub fn transform_line(line: &Line, ctm: &Matrix) -> Result<Line> {
    let t = inverse_of(ctm)?;
    Ok(Line::new(t.transform(line.start()), t.transform(line.end())))
}

pub fn transform_bezier_curve(curve: &BezierCurve, ctm: &Matrix) -> Result<BezierCurve> {
    let points = transform_points(curve.control_points(), ctm)?;
    let mut control_points = *curve.control_points();
    control_points.copy_from_slice(&points);
    Ok(BezierCurve::new(control_points))
}

pub fn transform_path(path: &Path, ctm: &Matrix) -> Result<Path> {
    let t = inverse_of(ctm)?;
    Ok(Path::from_subpaths(
        path.sub_paths().iter().map(|sub| map_subpath(&t, sub)).collect(),
    ))
}
