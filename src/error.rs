use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("cell size must be a finite value greater than zero, got {cell_size}")]
    InvalidCellSize { cell_size: f64 },

    #[error("padding must be within [0, {half}) for cell size {cell_size}, got {padding}")]
    InvalidPadding {
        cell_size: f64,
        padding: f64,
        half: f64,
    },

    #[error("duplicate node id '{id}' in grid document")]
    DuplicateNode { id: String },

    #[error("invalid grid document: {message}")]
    Document { message: String },
}

impl From<json5::Error> for GraphError {
    fn from(err: json5::Error) -> Self {
        GraphError::Document {
            message: err.to_string(),
        }
    }
}
