use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use gs_core::charset::CharacterRamp;
use gs_core::config::{AnimationKind, DemoConfig, ModelKind};

/// glyphstage : scène 3D animée rendue en ASCII dans le terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Rampe de glyphes, du plus clair au plus dense (ex: " .:-+-%").
    #[arg(long)]
    pub ramp: Option<String>,

    /// Inverser la luminance.
    #[arg(long, default_value_t = false)]
    pub invert: bool,

    /// Colorer les glyphes avec la couleur de la scène.
    #[arg(long, default_value_t = false)]
    pub color: bool,

    /// Échantillons raster par cellule et par axe [0.25, 4.0].
    #[arg(long)]
    pub resolution: Option<f32>,

    /// Priorité de la passe ASCII dans la boucle de frame.
    #[arg(long, allow_negative_numbers = true)]
    pub priority: Option<i32>,

    /// Modèle : torus-knot, sphere, cube.
    #[arg(long)]
    pub model: Option<String>,

    /// Animation : spin, float, none.
    #[arg(long)]
    pub animation: Option<String>,

    /// Désactiver la passe ASCII (rendu pixel seul).
    #[arg(long, default_value_t = false)]
    pub no_ascii: bool,

    /// Garder le rendu pixel sous l'overlay ASCII.
    #[arg(long, default_value_t = false)]
    pub underlay: bool,

    /// FPS cible.
    #[arg(long)]
    pub fps: Option<u32>,

    /// Afficher la ligne d'état FPS.
    #[arg(long, default_value_t = false)]
    pub show_fps: bool,

    /// Mode sans terminal : exécuter N frames puis imprimer la dernière.
    #[arg(long)]
    pub frames: Option<u64>,

    /// Largeur en colonnes du mode sans terminal.
    #[arg(long, default_value_t = 80)]
    pub cols: u16,

    /// Hauteur en lignes du mode sans terminal.
    #[arg(long, default_value_t = 24)]
    pub rows: u16,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

/// Surcharges CLI, réappliquées à chaque rechargement de la config.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Overrides {
    ramp: Option<CharacterRamp>,
    invert: bool,
    color: bool,
    resolution: Option<f32>,
    priority: Option<i32>,
    model: Option<ModelKind>,
    animation: Option<AnimationKind>,
    no_ascii: bool,
    underlay: bool,
    fps: Option<u32>,
    show_fps: bool,
}

impl Overrides {
    /// Apply on top of a loaded config, then clamp.
    pub fn apply(&self, config: &mut DemoConfig) {
        if let Some(ref ramp) = self.ramp {
            config.ramp = ramp.clone();
        }
        if self.invert {
            config.invert = true;
        }
        if self.color {
            config.options.color_enabled = true;
        }
        if let Some(v) = self.resolution {
            config.options.resolution = v;
        }
        if let Some(v) = self.priority {
            config.priority = v;
        }
        if let Some(v) = self.model {
            config.model = v;
        }
        if let Some(v) = self.animation {
            config.animation = v;
        }
        if self.no_ascii {
            config.ascii_enabled = false;
        }
        if self.underlay {
            config.underlay = true;
        }
        if let Some(v) = self.fps {
            config.target_fps = v;
        }
        if self.show_fps {
            config.show_fps = true;
        }
        config.clamp_all();
    }
}

impl Cli {
    /// Validate and collect the config overrides.
    ///
    /// # Errors
    /// Returns an error if `--ramp` is empty.
    pub fn overrides(&self) -> Result<Overrides> {
        let ramp = self
            .ramp
            .as_deref()
            .map(CharacterRamp::new)
            .transpose()
            .context("Rampe --ramp invalide")?;
        Ok(Overrides {
            ramp,
            invert: self.invert,
            color: self.color,
            resolution: self.resolution,
            priority: self.priority,
            model: self.model.as_deref().and_then(parse_model),
            animation: self.animation.as_deref().and_then(parse_animation),
            no_ascii: self.no_ascii,
            underlay: self.underlay,
            fps: self.fps,
            show_fps: self.show_fps,
        })
    }
}

fn parse_model(name: &str) -> Option<ModelKind> {
    match name {
        "torus-knot" | "knot" => Some(ModelKind::TorusKnot),
        "sphere" => Some(ModelKind::Sphere),
        "cube" => Some(ModelKind::Cube),
        _ => {
            log::warn!("Modèle inconnu '{name}', utilisation de la config.");
            None
        }
    }
}

fn parse_animation(name: &str) -> Option<AnimationKind> {
    match name {
        "spin" => Some(AnimationKind::Spin),
        "float" => Some(AnimationKind::Float),
        "none" => Some(AnimationKind::None),
        _ => {
            log::warn!("Animation inconnue '{name}', utilisation de la config.");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("glyphstage").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_leave_config_untouched() {
        let mut config = DemoConfig::default();
        parse(&[]).overrides().unwrap().apply(&mut config);
        assert_eq!(config, DemoConfig::default());
    }

    #[test]
    fn flags_override_config() {
        let cli = parse(&[
            "--ramp", " #", "--invert", "--color", "--priority", "-2", "--model", "cube",
            "--animation", "float", "--no-ascii", "--fps", "500",
        ]);
        let mut config = DemoConfig::default();
        cli.overrides().unwrap().apply(&mut config);
        assert_eq!(config.ramp.len(), 2);
        assert!(config.invert);
        assert!(config.options.color_enabled);
        assert_eq!(config.priority, -2);
        assert_eq!(config.model, ModelKind::Cube);
        assert_eq!(config.animation, AnimationKind::Float);
        assert!(!config.ascii_enabled);
        assert_eq!(config.target_fps, 120);
    }

    #[test]
    fn empty_ramp_is_rejected() {
        assert!(parse(&["--ramp", ""]).overrides().is_err());
    }

    #[test]
    fn unknown_model_is_ignored() {
        let overrides = parse(&["--model", "teapot"]).overrides().unwrap();
        let mut config = DemoConfig::default();
        overrides.apply(&mut config);
        assert_eq!(config.model, ModelKind::TorusKnot);
    }

    #[test]
    fn headless_size_defaults() {
        let cli = parse(&["--frames", "3"]);
        assert_eq!((cli.frames, cli.cols, cli.rows), (Some(3), 80, 24));
    }
}
