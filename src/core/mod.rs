pub mod gpu_context;
pub mod input_adapter;

pub use gpu_context::GpuContext;
pub use input_adapter::{wheel_to_pixels, WinitScrollAdapter, DEFAULT_LINE_HEIGHT};
