pub mod convert;
pub mod slice;

pub use convert::{ConvertToSliceable, ConvertToStandalone};
pub use slice::{slice_mesh, CapOption, PlaneSlice};
