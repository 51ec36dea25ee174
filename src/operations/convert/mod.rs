mod to_sliceable;
mod to_standalone;

pub use to_sliceable::ConvertToSliceable;
pub use to_standalone::ConvertToStandalone;
