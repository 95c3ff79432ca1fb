use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use arc_swap::ArcSwap;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use gs_ascii::{AsciiCompositor, AsciiFrame, AsciiHost, pass};
use gs_core::config::{AnimationKind, DemoConfig};
use gs_core::frame::FrameBuffer;
use gs_core::schedule::{ANIMATION, CallbackId, DEFAULT_PASS, FrameLoop, Tick};
use gs_core::surface::Stage;
use gs_render::fps::FpsCounter;
use gs_render::{canvas, hud, pixel_pass};
use gs_scene::{Camera, RasterError, Rasterizer, Scene, SoftwareRasterizer};
use ratatui::DefaultTerminal;

use crate::demo;

/// Contexte partagé par les callbacks de la boucle de frame.
pub struct Demo {
    /// Scene graph.
    pub scene: Scene,
    /// Point of view.
    pub camera: Camera,
    /// Visual root: pixel base layer and overlays.
    pub stage: Stage,
    /// Active ASCII compositor, if any.
    pub ascii: Option<AsciiCompositor<SoftwareRasterizer>>,
    pixel_raster: SoftwareRasterizer,
    pixel_frame: FrameBuffer,
    animation: AnimationKind,
    cell_aspect: f32,
}

impl Demo {
    fn new(config: &DemoConfig, width: u16, height: u16) -> Self {
        Self {
            scene: demo::build_scene(config.model),
            camera: Camera::default(),
            stage: Stage::new(width, height),
            ascii: None,
            pixel_raster: SoftwareRasterizer::new(),
            pixel_frame: FrameBuffer::default(),
            animation: config.animation,
            cell_aspect: config.options.cell_aspect,
        }
    }

    /// Passe pixel par défaut : demi-blocs dans la couche de base.
    fn render_pixels(&mut self) -> Result<(), RasterError> {
        let viewport = self.stage.viewport();
        let (w, h) = pixel_pass::raster_size(viewport.width, viewport.height);
        self.pixel_frame.resize(w, h);
        // Two pixels per cell vertically.
        let pixel_aspect = self.cell_aspect / 2.0;
        self.pixel_raster
            .rasterize(&self.scene, &self.camera, pixel_aspect, &mut self.pixel_frame)?;
        pixel_pass::render_halfblock(&self.pixel_frame, self.stage.base_mut());
        Ok(())
    }

    fn animate(&mut self, tick: &Tick) {
        let Some(node) = self.scene.find_mut(demo::MODEL_NODE) else {
            return;
        };
        match self.animation {
            AnimationKind::Spin => demo::spin(&mut node.transform, tick.delta.as_secs_f32()),
            AnimationKind::Float => demo::float(&mut node.transform, tick.elapsed.as_secs_f32()),
            AnimationKind::None => {}
        }
    }

    /// Last visible output as text: the ASCII overlay, or the base layer.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        match &self.ascii {
            Some(ascii) => ascii.lines(&self.stage),
            None => self.stage.base().to_lines(),
        }
    }
}

impl AsciiHost for Demo {
    type Raster = SoftwareRasterizer;

    fn ascii_frame(&mut self) -> Option<AsciiFrame<'_, SoftwareRasterizer>> {
        Some(AsciiFrame {
            compositor: self.ascii.as_mut()?,
            scene: &self.scene,
            camera: &self.camera,
            stage: &mut self.stage,
        })
    }
}

/// Callbacks enregistrés dans la boucle.
#[derive(Default)]
struct Passes {
    pixels: Option<CallbackId>,
    ascii: Option<CallbackId>,
}

/// Application : boucle de frame, config hot-reloadable et terminal.
pub struct App {
    /// Host context handed to every frame callback.
    pub demo: Demo,
    frame_loop: FrameLoop<Demo>,
    passes: Passes,
    config: Arc<ArcSwap<DemoConfig>>,
    applied: Arc<DemoConfig>,
    fps_counter: FpsCounter,
    quitting: bool,
}

impl App {
    /// Build the demo for a `width × height` cell viewport and register its passes.
    #[must_use]
    pub fn new(config: Arc<ArcSwap<DemoConfig>>, width: u16, height: u16) -> Self {
        let applied = config.load_full();
        let mut app = Self {
            demo: Demo::new(&applied, width, height),
            frame_loop: FrameLoop::new(),
            passes: Passes::default(),
            config,
            applied: Arc::clone(&applied),
            fps_counter: FpsCounter::new(60),
            quitting: false,
        };
        app.frame_loop
            .register(ANIMATION, "animation", |demo: &mut Demo, tick| {
                demo.animate(tick);
                Ok(())
            });
        app.sync_pixel_pass(&applied);
        if applied.ascii_enabled {
            app.enable_ascii(&applied);
        }
        app
    }

    /// Frame loop, for inspection.
    #[must_use]
    pub fn frame_loop(&self) -> &FrameLoop<Demo> {
        &self.frame_loop
    }

    fn enable_ascii(&mut self, config: &DemoConfig) {
        if self.demo.ascii.is_none() {
            self.demo.ascii = Some(AsciiCompositor::new(
                &mut self.demo.stage,
                SoftwareRasterizer::new(),
                config.compositor_config(),
                config.options.clone(),
            ));
        }
        if self.passes.ascii.is_none() {
            self.passes.ascii = Some(pass::attach(&mut self.frame_loop, config.priority));
        }
    }

    fn disable_ascii(&mut self) {
        match (self.passes.ascii.take(), self.demo.ascii.take()) {
            (Some(id), Some(ascii)) => {
                pass::detach(&mut self.frame_loop, id, ascii, &mut self.demo.stage);
            }
            (Some(id), None) => {
                self.frame_loop.deregister(id);
            }
            (None, Some(ascii)) => ascii.dispose(&mut self.demo.stage),
            (None, None) => {}
        }
    }

    fn sync_pixel_pass(&mut self, config: &DemoConfig) {
        let wanted = !config.ascii_enabled || config.underlay;
        match (wanted, self.passes.pixels) {
            (true, None) => {
                self.passes.pixels = Some(self.frame_loop.register(
                    DEFAULT_PASS,
                    "pixels",
                    |demo: &mut Demo, _| {
                        demo.render_pixels()?;
                        Ok(())
                    },
                ));
            }
            (false, Some(id)) => {
                self.frame_loop.deregister(id);
                self.passes.pixels = None;
                self.demo.stage.base_mut().clear();
            }
            _ => {}
        }
    }

    /// Apply a new config between ticks.
    ///
    /// Ramp or invert changes recreate the compositor, a priority change
    /// re-registers its pass, everything else goes through setters.
    pub fn apply_config(&mut self, next: &DemoConfig) {
        let prev = Arc::clone(&self.applied);
        if prev.model != next.model {
            demo::replace_model(&mut self.demo.scene, next.model);
        }
        self.demo.animation = next.animation;
        self.demo.cell_aspect = next.options.cell_aspect;

        if next.ascii_enabled {
            if prev.ramp != next.ramp || prev.invert != next.invert {
                if let Some(old) = self.demo.ascii.take() {
                    log::info!("Rampe ou inversion modifiée : recréation du compositeur");
                    old.dispose(&mut self.demo.stage);
                }
            } else if let Some(ascii) = self.demo.ascii.as_mut() {
                ascii.set_options(next.options.clone());
            }
            if prev.priority != next.priority
                && let Some(id) = self.passes.ascii.take()
            {
                self.frame_loop.deregister(id);
            }
            self.enable_ascii(next);
        } else {
            self.disable_ascii();
        }
        self.sync_pixel_pass(next);
        self.applied = Arc::new(next.clone());
    }

    /// Pick up a config published by the watcher, then run one tick.
    ///
    /// # Errors
    /// Returns the first failing frame callback's error.
    pub fn step(&mut self, delta: Duration) -> Result<()> {
        let latest = self.config.load_full();
        if *latest != *self.applied {
            self.apply_config(&latest);
        }
        self.frame_loop.tick(&mut self.demo, delta)
    }

    /// Run `frames` ticks at the target frame rate without a terminal and
    /// return the final output as text.
    ///
    /// # Errors
    /// Returns the first failing frame callback's error.
    pub fn run_headless(&mut self, frames: u64) -> Result<Vec<String>> {
        let delta = Duration::from_secs_f64(1.0 / f64::from(self.applied.target_fps));
        for _ in 0..frames {
            self.step(delta)?;
        }
        Ok(self.demo.lines())
    }

    /// Main event loop.
    ///
    /// # Errors
    /// Returns an error if terminal operations or a frame callback fail.
    pub fn run(&mut self, mut terminal: DefaultTerminal) -> Result<()> {
        let mut last_frame = Instant::now();

        loop {
            if self.quitting {
                break;
            }

            // === Calcul du frame timing ===
            let frame_duration = Duration::from_secs_f64(1.0 / f64::from(self.applied.target_fps));
            let now = Instant::now();
            let elapsed = now - last_frame;

            if elapsed < frame_duration {
                // Dormir le temps restant, mais rester réactif aux événements
                let remaining = frame_duration.saturating_sub(elapsed);
                if event::poll(remaining)? {
                    self.handle_event(&event::read()?);
                }
                continue;
            }
            last_frame = now;

            // === Polling événements non-bloquant ===
            while event::poll(Duration::ZERO)? {
                self.handle_event(&event::read()?);
            }
            if self.quitting {
                break;
            }

            self.check_resize()?;
            self.step(elapsed)?;

            let show_fps = self.applied.show_fps;
            let label = if self.demo.ascii.is_some() { "ascii" } else { "pixels" };
            let demo = &self.demo;
            let fps = &self.fps_counter;
            terminal.draw(|frame| {
                let area = frame.area();
                canvas::present(frame.buffer_mut(), area, &demo.stage);
                if show_fps {
                    hud::draw_status(frame.buffer_mut(), area, fps, label);
                }
            })?;
            self.fps_counter.tick();
        }
        Ok(())
    }

    fn check_resize(&mut self) -> Result<()> {
        let (w, h) = crossterm::terminal::size()?;
        if self.demo.stage.set_viewport(w, h) {
            log::debug!("Terminal redimensionné : {w}×{h}");
        }
        Ok(())
    }

    fn handle_event(&mut self, event: &Event) {
        match *event {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => {
                let ctrl_c = modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c');
                if ctrl_c || matches!(code, KeyCode::Char('q') | KeyCode::Esc) {
                    self.quitting = true;
                }
            }
            Event::Resize(w, h) => {
                self.demo.stage.set_viewport(w, h);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use gs_core::charset::CharacterRamp;
    use gs_core::schedule::AFTER_DEFAULT_PASS;

    use super::*;

    const TICK: Duration = Duration::from_millis(33);

    fn app_with(config: DemoConfig, width: u16, height: u16) -> (App, Arc<ArcSwap<DemoConfig>>) {
        let shared = Arc::new(ArcSwap::from_pointee(config));
        (App::new(Arc::clone(&shared), width, height), shared)
    }

    fn pass_names(app: &App) -> Vec<(String, i32)> {
        app.frame_loop()
            .schedule()
            .map(|(n, p)| (n.to_string(), p))
            .collect()
    }

    #[test]
    fn default_schedule_is_animation_then_ascii() {
        let (app, _) = app_with(DemoConfig::default(), 40, 12);
        assert_eq!(
            pass_names(&app),
            vec![
                ("animation".to_string(), ANIMATION),
                ("ascii".to_string(), AFTER_DEFAULT_PASS)
            ]
        );
        assert_eq!(app.demo.stage.overlay_count(), 1);
    }

    #[test]
    fn headless_run_draws_the_model() {
        let (mut app, _) = app_with(DemoConfig::default(), 48, 16);
        let lines = app.run_headless(3).unwrap();
        assert_eq!(lines.len(), 16);
        assert!(lines.iter().all(|l| l.chars().count() == 48));
        assert!(lines.iter().any(|l| l.chars().any(|c| c != ' ')));
        assert!(lines.iter().flat_map(|l| l.chars()).all(|c| " .:-+-%".contains(c)));
    }

    #[test]
    fn underlay_keeps_pixel_pass_below_ascii() {
        let config = DemoConfig {
            underlay: true,
            ..DemoConfig::default()
        };
        let (mut app, _) = app_with(config, 20, 8);
        app.step(TICK).unwrap();
        let names: Vec<_> = pass_names(&app).into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["animation", "pixels", "ascii"]);
        assert_eq!(app.demo.stage.base().get(0, 0).ch, '▄');
    }

    #[test]
    fn ramp_change_recreates_the_compositor() {
        let (mut app, shared) = app_with(DemoConfig::default(), 20, 8);
        let before = app.demo.ascii.as_ref().unwrap().overlay_id();

        let next = DemoConfig {
            ramp: CharacterRamp::new(" #").unwrap(),
            ..DemoConfig::default()
        };
        shared.store(Arc::new(next));
        app.step(TICK).unwrap();

        let ascii = app.demo.ascii.as_ref().unwrap();
        assert_ne!(ascii.overlay_id(), before);
        assert_eq!(ascii.config().ramp().len(), 2);
        assert_eq!(app.demo.stage.overlay_count(), 1);
        assert_eq!(app.frame_loop().len(), 2);
    }

    #[test]
    fn option_change_keeps_the_compositor() {
        let (mut app, shared) = app_with(DemoConfig::default(), 20, 8);
        let before = app.demo.ascii.as_ref().unwrap().overlay_id();

        let mut next = DemoConfig::default();
        next.options.color_enabled = true;
        next.options.resolution = 2.0;
        shared.store(Arc::new(next));
        app.step(TICK).unwrap();

        let ascii = app.demo.ascii.as_ref().unwrap();
        assert_eq!(ascii.overlay_id(), before);
        assert!(ascii.options().color_enabled);
        assert_eq!((ascii.raster().width, ascii.raster().height), (40, 16));
    }

    #[test]
    fn priority_change_re_registers_the_pass() {
        let (mut app, shared) = app_with(DemoConfig::default(), 20, 8);
        shared.store(Arc::new(DemoConfig {
            priority: -5,
            ..DemoConfig::default()
        }));
        app.step(TICK).unwrap();
        assert_eq!(
            pass_names(&app)[0],
            ("ascii".to_string(), -5),
        );
        assert_eq!(app.frame_loop().len(), 2);
    }

    #[test]
    fn disabling_ascii_falls_back_to_pixels() {
        let (mut app, shared) = app_with(DemoConfig::default(), 20, 8);
        shared.store(Arc::new(DemoConfig {
            ascii_enabled: false,
            ..DemoConfig::default()
        }));
        app.step(TICK).unwrap();
        assert_eq!(app.demo.stage.overlay_count(), 0);
        assert!(app.demo.ascii.is_none());
        let names: Vec<_> = pass_names(&app).into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["animation", "pixels"]);
        assert!(app.demo.lines()[0].starts_with('▄'));
    }

    #[test]
    fn spin_animation_advances_with_delta() {
        let (mut app, _) = app_with(DemoConfig::default(), 10, 4);
        app.step(Duration::from_secs(1)).unwrap();
        app.step(Duration::from_secs(1)).unwrap();
        let node = app.demo.scene.find_mut(demo::MODEL_NODE).unwrap();
        assert!((node.transform.rotation.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn viewport_change_reaches_the_overlay() {
        let (mut app, _) = app_with(DemoConfig::default(), 20, 8);
        app.handle_event(&Event::Resize(30, 10));
        app.step(TICK).unwrap();
        assert_eq!(app.demo.ascii.as_ref().unwrap().size(), (30, 10));
        app.handle_event(&Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(app.quitting);
    }
}
