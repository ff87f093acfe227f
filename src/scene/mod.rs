mod model;
mod particles;
mod state;

pub use model::{normalize, Model, Normalization, TARGET_SIZE};
pub use particles::{
    sample_shell_point, ParticleSystem, DEFAULT_PARTICLE_COUNT, POINT_SIZE, SHELL_INNER_RADIUS,
    SHELL_OUTER_RADIUS,
};
pub use state::SceneState;
