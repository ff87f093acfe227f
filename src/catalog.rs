//! Fixed lookup tables for the surface presets and particle colours offered in
//! the menu. Both are built once at startup and never mutated; the
//! interaction layer only selects entries by key.

use crate::math::hex_to_rgb;

/// Surface appearance parameters for the model
///
/// All presets share the single environment map uploaded at startup, so the
/// preset only carries how strongly it is reflected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialPreset {
    /// sRGB base colour
    pub color: [f32; 3],
    pub metalness: f32,
    pub roughness: f32,
    /// Fraction of light passed through the surface (glass-like)
    pub transmission: f32,
    pub opacity: f32,
    pub transparent: bool,
    pub reflectivity: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    pub env_map_intensity: f32,
}

impl MaterialPreset {
    fn base(hex: u32, metalness: f32, roughness: f32, env_map_intensity: f32) -> PresetBuilder {
        PresetBuilder(MaterialPreset {
            color: hex_to_rgb(hex),
            metalness,
            roughness,
            transmission: 0.0,
            opacity: 1.0,
            transparent: false,
            reflectivity: 0.5,
            clearcoat: 0.0,
            clearcoat_roughness: 0.0,
            env_map_intensity,
        })
    }

    /// Effective alpha used when blending the surface
    pub fn alpha(&self) -> f32 {
        if self.transparent {
            self.opacity
        } else {
            1.0
        }
    }
}

struct PresetBuilder(MaterialPreset);

impl PresetBuilder {
    fn transmissive(mut self, transmission: f32, opacity: f32) -> Self {
        self.0.transmission = transmission;
        self.0.opacity = opacity;
        self.0.transparent = true;
        self
    }

    fn reflectivity(mut self, reflectivity: f32) -> Self {
        self.0.reflectivity = reflectivity;
        self
    }

    fn clearcoat(mut self, clearcoat: f32, roughness: f32) -> Self {
        self.0.clearcoat = clearcoat;
        self.0.clearcoat_roughness = roughness;
        self
    }

    fn build(self) -> MaterialPreset {
        self.0
    }
}

/// Ordered key → value table; iteration follows declaration order
#[derive(Debug, Clone)]
pub struct Catalog<T> {
    entries: Vec<(&'static str, T)>,
}

impl<T> Catalog<T> {
    pub fn new(entries: Vec<(&'static str, T)>) -> Self {
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(name, _)| *name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &T)> + '_ {
        self.entries.iter().map(|(name, value)| (*name, value))
    }

    /// First key whose value equals `value`
    pub fn key_of(&self, value: &T) -> Option<&'static str>
    where
        T: PartialEq,
    {
        self.entries
            .iter()
            .find(|(_, v)| v == value)
            .map(|(name, _)| *name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub type MaterialCatalog = Catalog<MaterialPreset>;
pub type ParticleColorCatalog = Catalog<[f32; 3]>;

pub const DEFAULT_MATERIAL: &str = "glass";
pub const DEFAULT_PARTICLE_COLOR: &str = "cyan";

impl MaterialCatalog {
    /// The five presets offered in the material menu
    pub fn standard() -> Self {
        Catalog::new(vec![
            (
                "glass",
                MaterialPreset::base(0xffffff, 0.0, 0.1, 1.0)
                    .transmissive(0.9, 0.8)
                    .reflectivity(0.9)
                    .clearcoat(1.0, 0.1)
                    .build(),
            ),
            ("plastic", MaterialPreset::base(0xff0000, 0.0, 0.3, 0.6).build()),
            (
                "gold",
                MaterialPreset::base(0xffd700, 0.9, 0.2, 1.0)
                    .reflectivity(0.9)
                    .clearcoat(1.0, 0.1)
                    .build(),
            ),
            ("wood", MaterialPreset::base(0x8b4513, 0.0, 0.7, 0.3).build()),
            (
                "silver",
                MaterialPreset::base(0xcccccc, 0.9, 0.1, 1.0)
                    .reflectivity(0.9)
                    .clearcoat(1.0, 0.1)
                    .build(),
            ),
        ])
    }
}

impl ParticleColorCatalog {
    pub fn standard() -> Self {
        Catalog::new(vec![
            ("cyan", hex_to_rgb(0x00ffff)),
            ("red", hex_to_rgb(0xff0000)),
            ("yellow", hex_to_rgb(0xffff00)),
            ("green", hex_to_rgb(0x00ff00)),
            ("white", hex_to_rgb(0xffffff)),
        ])
    }
}
