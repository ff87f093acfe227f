pub mod app;
pub mod camera;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod core;
pub mod interaction;
pub mod loaders;
pub mod math;
pub mod renderer;
pub mod scene;
pub mod scroll;
pub mod types;
pub mod ui;

pub use app::Showcase;
pub use interaction::{InteractionController, UiAction};
pub use scroll::{scroll_progress, ScrollAnimator, ScrollFrame, ScrollState};
