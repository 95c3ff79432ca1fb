use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use arc_swap::ArcSwap;
use gs_core::config::{DemoConfig, load_config};
use notify::{Event, EventKind, RecursiveMode, Watcher};

use crate::cli::Overrides;

/// Recharge la config depuis `path`, réapplique les surcharges CLI et publie.
///
/// En cas d'erreur, l'ancienne config reste en place.
pub fn reload(path: &Path, config: &ArcSwap<DemoConfig>, overrides: &Overrides) -> bool {
    match load_config(path) {
        Ok(mut next) => {
            overrides.apply(&mut next);
            config.store(Arc::new(next));
            log::info!("Config rechargée depuis {}", path.display());
            true
        }
        Err(e) => {
            log::warn!("Erreur de rechargement config : {e:#}");
            false
        }
    }
}

/// Lance un thread qui surveille le fichier config et met à jour l'ArcSwap.
///
/// Retourne le Watcher (doit rester vivant tant que l'app tourne).
///
/// # Errors
/// Returns an error if the watcher cannot be created or the path cannot be watched.
pub fn spawn_config_watcher(
    config_path: &Path,
    config: &Arc<ArcSwap<DemoConfig>>,
    overrides: Overrides,
) -> Result<impl Watcher + use<>> {
    let config = Arc::clone(config);
    let path = config_path.to_path_buf();

    let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        if let Ok(event) = res
            && matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
        {
            reload(&path, &config, &overrides);
        }
    })?;

    watcher.watch(config_path, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    #[test]
    fn reload_publishes_new_config_with_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[compositor]\npriority = 4\n[app]\ntarget_fps = 60").unwrap();
        let config = ArcSwap::from_pointee(DemoConfig::default());
        let overrides = Cli::try_parse_from(["glyphstage", "--fps", "24"])
            .unwrap()
            .overrides()
            .unwrap();

        assert!(reload(file.path(), &config, &overrides));
        assert_eq!(config.load().priority, 4);
        assert_eq!(config.load().target_fps, 24);
    }

    #[test]
    fn broken_file_keeps_previous_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[compositor]\nramp = \"\"").unwrap();
        let previous = DemoConfig {
            priority: 7,
            ..DemoConfig::default()
        };
        let config = ArcSwap::from_pointee(previous);
        assert!(!reload(file.path(), &config, &Overrides::default()));
        assert_eq!(config.load().priority, 7);
    }
}
