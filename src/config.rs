//! Viewer settings: built-in defaults, optionally overridden by a JSON file,
//! then by command-line flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::core::DEFAULT_LINE_HEIGHT;
use crate::scene::DEFAULT_PARTICLE_COUNT;

pub const DEFAULT_MODEL_PATH: &str = "static/models/logo.stl";
pub const DEFAULT_ENV_MAP_DIR: &str = "static/textures/cube/Bridge2";
pub const DEFAULT_PAGES: f32 = 3.0;
pub const INITIAL_WINDOW_WIDTH: u32 = 800;
pub const INITIAL_WINDOW_HEIGHT: u32 = 600;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub model: PathBuf,
    pub env_map: PathBuf,
    /// Virtual document height in viewport heights
    pub pages: f32,
    pub particles: usize,
    /// None draws a fresh layout every run
    pub seed: Option<u64>,
    pub window_width: u32,
    pub window_height: u32,
    /// Pixels per wheel line
    pub line_height: f32,
    pub show_ui: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            model: PathBuf::from(DEFAULT_MODEL_PATH),
            env_map: PathBuf::from(DEFAULT_ENV_MAP_DIR),
            pages: DEFAULT_PAGES,
            particles: DEFAULT_PARTICLE_COUNT,
            seed: None,
            window_width: INITIAL_WINDOW_WIDTH,
            window_height: INITIAL_WINDOW_HEIGHT,
            line_height: DEFAULT_LINE_HEIGHT,
            show_ui: true,
        }
    }
}

impl ViewerConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse viewer config")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("In config {}", path.display()))
    }

    /// Defaults, then the `--config` file if given, then explicit flags
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let base = match &cli.config {
            Some(path) => {
                log::info!("Loading config from {}", path.display());
                Self::load(path)?
            }
            None => Self::default(),
        };
        Ok(base.with_overrides(cli))
    }

    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(model) = &cli.model {
            self.model = model.clone();
        }
        if let Some(env_map) = &cli.env_map {
            self.env_map = env_map.clone();
        }
        if let Some(pages) = cli.pages {
            self.pages = pages;
        }
        if let Some(particles) = cli.particles {
            self.particles = particles;
        }
        if cli.seed.is_some() {
            self.seed = cli.seed;
        }
        if cli.no_ui {
            self.show_ui = false;
        }
        self
    }
}
