use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeomError {
    #[error("Noninvertible transform:{0}")]
    NoninvertibleTransform(String),

    #[error("Noninvertible matrix cannot be processed")]
    NoninvertibleMatrix {
        #[source]
        source: Box<GeomError>,
    },

    #[error("Path error:{0}")]
    Path(String),

    #[error("Quad points error:{0}")]
    QuadPoints(String),

    #[error("Index out of range:{0}")]
    IndexOutOfRange(usize),

    #[error("Buffer range error:{0}")]
    BufferRange(String),
}

pub type Result<T> = std::result::Result<T, GeomError>;
