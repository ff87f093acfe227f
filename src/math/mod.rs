mod aabb;
mod color;

pub use aabb::AABB;
pub use color::{hex_to_rgb, lerp, rgb_to_linear, srgb_to_linear};
