use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::charset::CharacterRamp;
use crate::schedule::AFTER_DEFAULT_PASS;

/// Configuration figée d'un compositeur : rampe et inversion.
///
/// Consommée uniquement à la construction. Changer l'une ou l'autre
/// impose de recréer le compositeur.
///
/// # Example
/// ```
/// use gs_core::config::CompositorConfig;
/// let config = CompositorConfig::parse(" .:-+-%", true).unwrap();
/// assert_eq!(config.ramp().len(), 7);
/// assert!(config.invert());
/// assert!(CompositorConfig::parse("", false).is_err());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompositorConfig {
    ramp: CharacterRamp,
    invert: bool,
}

impl CompositorConfig {
    /// Build from an already validated ramp.
    #[must_use]
    pub fn new(ramp: CharacterRamp, invert: bool) -> Self {
        Self { ramp, invert }
    }

    /// Build from a ramp string.
    ///
    /// # Errors
    /// Returns [`crate::CoreError::EmptyRamp`] for an empty string.
    pub fn parse(ramp: &str, invert: bool) -> Result<Self, crate::CoreError> {
        Ok(Self::new(CharacterRamp::new(ramp)?, invert))
    }

    /// Character ramp.
    #[must_use]
    pub fn ramp(&self) -> &CharacterRamp {
        &self.ramp
    }

    /// Whether the luminance → glyph mapping is reversed.
    #[must_use]
    pub fn invert(&self) -> bool {
        self.invert
    }
}

/// Color mapping mode for colorized glyphs.
///
/// # Example
/// ```
/// use gs_core::config::ColorMode;
/// assert!(matches!(ColorMode::default(), ColorMode::Direct));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum ColorMode {
    /// RGB direct du pixel échantillonné.
    #[default]
    Direct,
    /// HSV avec V forcé à 1.0 (le glyphe encode la luminance).
    HsvBright,
    /// Quantifié sur palette réduite.
    Quantized,
}

/// How a glyph cell spanning several raster pixels is sampled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum SamplingStrategy {
    /// Pixel central du bloc.
    #[default]
    Center,
    /// Moyenne RGBA du bloc.
    Average,
}

/// Background rendering style.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum BgStyle {
    /// Fond de l'overlay (noir).
    #[default]
    Black,
    /// Couleur source atténuée derrière chaque glyphe.
    SourceDim,
}

/// Options ajustables sans recréer le compositeur.
///
/// # Example
/// ```
/// use gs_core::config::CompositorOptions;
/// let mut options = CompositorOptions { resolution: 12.0, ..Default::default() };
/// options.clamp_all();
/// assert_eq!(options.resolution, 4.0);
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CompositorOptions {
    /// Échantillons raster par cellule, par axe [0.25, 4.0].
    pub resolution: f32,
    /// Rapport hauteur/largeur d'une cellule de glyphe [1.0, 4.0].
    pub cell_aspect: f32,
    /// Colorer chaque glyphe avec la couleur échantillonnée.
    pub color_enabled: bool,
    /// Méthode de mapping couleur.
    pub color_mode: ColorMode,
    /// Saturation boost [0.0, 3.0], pour `HsvBright`.
    pub saturation: f32,
    /// Échantillonnage des cellules multi-pixels.
    pub sampling: SamplingStrategy,
    /// Background rendering style.
    pub bg_style: BgStyle,
    /// Contraste [0.1, 3.0]. 1.0 = neutre.
    pub contrast: f32,
    /// Brightness offset [-1.0, 1.0]. 0.0 = neutre.
    pub brightness: f32,
}

impl Default for CompositorOptions {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            cell_aspect: 2.0,
            color_enabled: false,
            color_mode: ColorMode::Direct,
            saturation: 1.0,
            sampling: SamplingStrategy::Center,
            bg_style: BgStyle::Black,
            contrast: 1.0,
            brightness: 0.0,
        }
    }
}

impl CompositorOptions {
    /// Clamp all numeric fields to their valid ranges.
    pub fn clamp_all(&mut self) {
        self.resolution = clamp_or(self.resolution, 0.25, 4.0, 1.0);
        self.cell_aspect = clamp_or(self.cell_aspect, 1.0, 4.0, 2.0);
        self.saturation = clamp_or(self.saturation, 0.0, 3.0, 1.0);
        self.contrast = clamp_or(self.contrast, 0.1, 3.0, 1.0);
        self.brightness = clamp_or(self.brightness, -1.0, 1.0, 0.0);
    }
}

/// `f32::clamp` that also maps NaN to a default.
fn clamp_or(v: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if v.is_nan() { fallback } else { v.clamp(min, max) }
}

/// Modèle procédural affiché par la démo.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum ModelKind {
    /// Noeud torique (p=2, q=3).
    #[default]
    TorusKnot,
    /// Sphère UV.
    Sphere,
    /// Cube.
    Cube,
}

/// Animation appliquée au modèle chaque frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum AnimationKind {
    /// Rotation continue, delta/2 rad par seconde sur X et Y.
    #[default]
    Spin,
    /// Balancement lent et flottement vertical.
    Float,
    /// Immobile.
    None,
}

/// Configuration complète de la démo, hot-rechargeable.
///
/// # Example
/// ```
/// use gs_core::config::DemoConfig;
/// let config = DemoConfig::default();
/// assert_eq!(config.priority, 1);
/// assert!(config.ascii_enabled);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DemoConfig {
    // === Compositeur (recréation si modifié) ===
    /// Rampe de glyphes.
    pub ramp: CharacterRamp,
    /// Inverser la luminance.
    pub invert: bool,
    /// Priorité de la passe ASCII dans la boucle de frame.
    pub priority: i32,

    // === Options (modifiables en place) ===
    /// Compositor options.
    pub options: CompositorOptions,

    // === Scène ===
    /// Modèle affiché.
    pub model: ModelKind,
    /// Animation.
    pub animation: AnimationKind,

    // === App ===
    /// Activer la passe ASCII.
    pub ascii_enabled: bool,
    /// Garder le rendu pixel sous l'overlay.
    pub underlay: bool,
    /// FPS cible.
    pub target_fps: u32,
    /// Afficher la ligne d'état FPS.
    pub show_fps: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            ramp: CharacterRamp::default(),
            invert: false,
            priority: AFTER_DEFAULT_PASS,
            options: CompositorOptions::default(),
            model: ModelKind::TorusKnot,
            animation: AnimationKind::Spin,
            ascii_enabled: true,
            underlay: false,
            target_fps: 30,
            show_fps: false,
        }
    }
}

impl DemoConfig {
    /// The part of the config baked into a compositor.
    #[must_use]
    pub fn compositor_config(&self) -> CompositorConfig {
        CompositorConfig::new(self.ramp.clone(), self.invert)
    }

    /// Clamp all numeric fields to their valid ranges.
    pub fn clamp_all(&mut self) {
        self.options.clamp_all();
        self.target_fps = self.target_fps.clamp(5, 120);
    }
}

/// Structure TOML intermédiaire, toutes sections optionnelles.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    compositor: Option<CompositorSection>,
    options: Option<CompositorOptions>,
    scene: Option<SceneSection>,
    app: Option<AppSection>,
}

#[derive(Deserialize)]
struct CompositorSection {
    ramp: Option<CharacterRamp>,
    invert: Option<bool>,
    priority: Option<i32>,
}

#[derive(Deserialize)]
struct SceneSection {
    model: Option<ModelKind>,
    animation: Option<AnimationKind>,
}

#[derive(Deserialize)]
struct AppSection {
    ascii_enabled: Option<bool>,
    underlay: Option<bool>,
    target_fps: Option<u32>,
    show_fps: Option<bool>,
}

/// Parse un document TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error on malformed TOML, unknown sections or an empty ramp.
///
/// # Example
/// ```
/// use gs_core::config::parse_config;
/// let config = parse_config("[compositor]\ninvert = true\n").unwrap();
/// assert!(config.invert);
/// assert!(parse_config("[compositor]\nramp = \"\"\n").is_err());
/// ```
pub fn parse_config(content: &str) -> Result<DemoConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;
    let mut config = DemoConfig::default();

    if let Some(c) = file.compositor {
        if let Some(v) = c.ramp {
            config.ramp = v;
        }
        if let Some(v) = c.invert {
            config.invert = v;
        }
        if let Some(v) = c.priority {
            config.priority = v;
        }
    }
    if let Some(v) = file.options {
        config.options = v;
    }
    if let Some(s) = file.scene {
        if let Some(v) = s.model {
            config.model = v;
        }
        if let Some(v) = s.animation {
            config.animation = v;
        }
    }
    if let Some(a) = file.app {
        if let Some(v) = a.ascii_enabled {
            config.ascii_enabled = v;
        }
        if let Some(v) = a.underlay {
            config.underlay = v;
        }
        if let Some(v) = a.target_fps {
            config.target_fps = v;
        }
        if let Some(v) = a.show_fps {
            config.show_fps = v;
        }
    }

    config.clamp_all();
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<DemoConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Config invalide : {}", path.display()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        assert_eq!(parse_config("").unwrap(), DemoConfig::default());
    }

    #[test]
    fn partial_sections_merge_over_defaults() {
        let config = parse_config(
            r#"
            [compositor]
            ramp = " .,:;i1tfLCG08@"

            [options]
            color_enabled = true
            sampling = "Average"

            [scene]
            animation = "Float"
            "#,
        )
        .unwrap();
        assert_eq!(config.ramp.len(), 15);
        assert!(!config.invert);
        assert!(config.options.color_enabled);
        assert_eq!(config.options.sampling, SamplingStrategy::Average);
        assert_eq!(config.options.resolution, 1.0);
        assert_eq!(config.animation, AnimationKind::Float);
        assert_eq!(config.model, ModelKind::TorusKnot);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config = parse_config(
            "[options]\nresolution = 0.01\ncontrast = 9.0\n[app]\ntarget_fps = 1000\n",
        )
        .unwrap();
        assert_eq!(config.options.resolution, 0.25);
        assert_eq!(config.options.contrast, 3.0);
        assert_eq!(config.target_fps, 120);
    }

    #[test]
    fn unknown_section_is_rejected() {
        assert!(parse_config("[audio]\nsmoothing = 0.5\n").is_err());
    }

    #[test]
    fn load_config_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[compositor]\ninvert = true\npriority = 3").unwrap();
        let config = load_config(file.path()).unwrap();
        assert!(config.invert);
        assert_eq!(config.priority, 3);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(&dir.path().join("absent.toml")).is_err());
    }
}
