use thiserror::Error;

/// Top-level error type for the slicing system.
#[derive(Debug, Error)]
pub enum SlicingError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Tool(#[from] ToolError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("zero-length vector")]
    ZeroVector,

    #[error("cap triangulation failed: {0}")]
    Triangulation(String),
}

/// Errors raised when the scene no longer holds what an id refers to.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("entity not found: {0}")]
    EntityNotFound(&'static str),

    #[error("component has the wrong body kind: expected {expected}")]
    WrongBody { expected: &'static str },
}

/// Errors related to converting between standalone and sliceable solids.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("standalone solid has no static mesh resource")]
    MissingMeshResource,
}

/// Errors raised while assembling a slicing tool.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("at most one tip sensor may be attached to a tool, found {0}")]
    MultipleTips(usize),

    #[error("tool object is not tagged \"{0}\"")]
    MissingTag(&'static str),

    #[error("tool object has no \"{0}\" socket")]
    MissingSocket(&'static str),
}

/// Convenience type alias for results using [`SlicingError`].
pub type Result<T> = std::result::Result<T, SlicingError>;
