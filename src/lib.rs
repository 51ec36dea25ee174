pub mod constraint;
pub mod error;
pub mod math;
pub mod mesh;
pub mod operations;
pub mod scene;
pub mod tool;

pub use error::{Result, SlicingError};
