pub mod affine;
pub mod bezier;
pub mod line;
pub mod line_segment;
pub mod matrix;
pub mod path;
pub mod point;
pub mod rectangle;
pub mod shape;
pub mod shape_transform;
pub mod subpath;
pub mod vector;

pub use affine::AffineTransform;
pub use bezier::{BezierCurve, FlatteningTolerance};
pub use line::Line;
pub use line_segment::LineSegment;
pub use matrix::Matrix;
pub use path::Path;
pub use point::Point;
pub use rectangle::Rectangle;
pub use shape::Shape;
pub use subpath::Subpath;
pub use vector::Vector;
