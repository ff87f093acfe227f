// cli.rs - Command-line interface configuration
use clap::Parser;
use std::path::PathBuf;

/// Every value flag is optional so that a config file can supply it; unset
/// flags fall through to the file and then to built-in defaults.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "scroll-showcase")]
#[command(about = "Scroll-driven 3D model showcase", long_about = None)]
pub struct Cli {
    /// Mesh to display (.stl, .gltf or .glb)
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Directory holding the posx..negz environment faces
    #[arg(long = "env-map")]
    pub env_map: Option<PathBuf>,

    /// JSON config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Virtual page height in window heights
    #[arg(long)]
    pub pages: Option<f32>,

    /// Number of halo particles
    #[arg(long)]
    pub particles: Option<usize>,

    /// Fixed seed for the particle layout
    #[arg(long)]
    pub seed: Option<u64>,

    /// Disable the menu overlay
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags() {
        let cli = Cli::try_parse_from(["scroll-showcase"]).unwrap();
        assert!(cli.model.is_none());
        assert!(!cli.no_ui);
    }

    #[test]
    fn test_all_flags() {
        let cli = Cli::try_parse_from([
            "scroll-showcase",
            "--model",
            "bunny.glb",
            "--env-map",
            "sky",
            "--pages",
            "5",
            "--particles",
            "50",
            "--seed",
            "9",
            "--no-ui",
        ])
        .unwrap();
        assert_eq!(cli.model, Some(PathBuf::from("bunny.glb")));
        assert_eq!(cli.env_map, Some(PathBuf::from("sky")));
        assert_eq!(cli.pages, Some(5.0));
        assert_eq!(cli.particles, Some(50));
        assert_eq!(cli.seed, Some(9));
        assert!(cli.no_ui);
    }

    #[test]
    fn test_rejects_bad_number() {
        assert!(Cli::try_parse_from(["scroll-showcase", "--particles", "many"]).is_err());
    }
}
