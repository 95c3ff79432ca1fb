//! Registration of the ASCII pass with a [`FrameLoop`].

use gs_core::schedule::{CallbackId, FrameLoop};
use gs_core::surface::Stage;
use gs_scene::{Camera, Rasterizer, Scene};

use crate::compositor::AsciiCompositor;

/// Emprunts disjoints du contexte hôte nécessaires à une passe ASCII.
pub struct AsciiFrame<'a, R> {
    /// The compositor to run.
    pub compositor: &'a mut AsciiCompositor<R>,
    /// Scene to draw.
    pub scene: &'a Scene,
    /// Point of view.
    pub camera: &'a Camera,
    /// Surface receiving the overlay.
    pub stage: &'a mut Stage,
}

/// Host context able to lend its compositor, scene, camera and stage at once.
pub trait AsciiHost {
    /// Rasterizer owned by the host's compositor.
    type Raster: Rasterizer;

    /// Split borrows for this tick, `None` when no compositor is active.
    fn ascii_frame(&mut self) -> Option<AsciiFrame<'_, Self::Raster>>;
}

/// Register the ASCII pass at `priority`: each tick it polls the viewport,
/// resizes if needed, then renders into the overlay.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use gs_ascii::{AsciiCompositor, AsciiFrame, AsciiHost, pass};
/// use gs_core::config::{CompositorConfig, CompositorOptions};
/// use gs_core::schedule::{AFTER_DEFAULT_PASS, FrameLoop};
/// use gs_core::surface::Stage;
/// use gs_scene::{Camera, Scene, SoftwareRasterizer};
///
/// struct Host {
///     ascii: Option<AsciiCompositor<SoftwareRasterizer>>,
///     scene: Scene,
///     camera: Camera,
///     stage: Stage,
/// }
///
/// impl AsciiHost for Host {
///     type Raster = SoftwareRasterizer;
///     fn ascii_frame(&mut self) -> Option<AsciiFrame<'_, SoftwareRasterizer>> {
///         Some(AsciiFrame {
///             compositor: self.ascii.as_mut()?,
///             scene: &self.scene,
///             camera: &self.camera,
///             stage: &mut self.stage,
///         })
///     }
/// }
///
/// let mut stage = Stage::new(16, 8);
/// let config = CompositorConfig::parse("@", false).unwrap();
/// let ascii = AsciiCompositor::new(&mut stage, SoftwareRasterizer::new(), config, CompositorOptions::default());
/// let mut host = Host { ascii: Some(ascii), scene: Scene::default(), camera: Camera::default(), stage };
///
/// let mut frame_loop = FrameLoop::new();
/// pass::attach(&mut frame_loop, AFTER_DEFAULT_PASS);
/// frame_loop.tick(&mut host, Duration::from_millis(16)).unwrap();
/// let id = host.ascii.as_ref().unwrap().overlay_id();
/// assert_eq!(host.stage.overlay(id).unwrap().grid.to_lines()[0], "@".repeat(16));
/// ```
pub fn attach<C>(frame_loop: &mut FrameLoop<C>, priority: i32) -> CallbackId
where
    C: AsciiHost + 'static,
{
    frame_loop.register(priority, "ascii", |host: &mut C, _tick| {
        let Some(frame) = host.ascii_frame() else {
            return Ok(());
        };
        frame.compositor.sync_viewport(frame.stage);
        frame
            .compositor
            .render(frame.scene, frame.camera, frame.stage)?;
        Ok(())
    })
}

/// Deregister the pass and dispose of its compositor.
///
/// Once this returns, later ticks never touch the overlay again.
pub fn detach<C, R: Rasterizer>(
    frame_loop: &mut FrameLoop<C>,
    id: CallbackId,
    compositor: AsciiCompositor<R>,
    stage: &mut Stage,
) {
    if !frame_loop.deregister(id) {
        log::warn!("Passe ASCII {id:?} absente de la boucle");
    }
    compositor.dispose(stage);
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use gs_core::config::{CompositorConfig, CompositorOptions};
    use gs_core::frame::FrameBuffer;
    use gs_core::schedule::{ANIMATION, DEFAULT_PASS};
    use gs_scene::RasterError;

    use super::*;

    #[derive(Default)]
    struct Counting {
        calls: usize,
    }

    impl Rasterizer for Counting {
        fn rasterize(
            &mut self,
            _scene: &Scene,
            _camera: &Camera,
            _pixel_aspect: f32,
            target: &mut FrameBuffer,
        ) -> Result<(), RasterError> {
            self.calls += 1;
            target.fill([255, 255, 255, 255]);
            Ok(())
        }
    }

    struct Host {
        ascii: Option<AsciiCompositor<Counting>>,
        scene: Scene,
        camera: Camera,
        stage: Stage,
        log: Vec<&'static str>,
    }

    impl Host {
        fn new(width: u16, height: u16) -> Self {
            let mut stage = Stage::new(width, height);
            let config = CompositorConfig::parse(" #", false).unwrap();
            let ascii = AsciiCompositor::new(
                &mut stage,
                Counting::default(),
                config,
                CompositorOptions::default(),
            );
            Self {
                ascii: Some(ascii),
                scene: Scene::default(),
                camera: Camera::default(),
                stage,
                log: Vec::new(),
            }
        }

        fn raster_calls(&mut self) -> usize {
            self.ascii.as_mut().map_or(0, |a| a.rasterizer_mut().calls)
        }
    }

    impl AsciiHost for Host {
        type Raster = Counting;

        fn ascii_frame(&mut self) -> Option<AsciiFrame<'_, Counting>> {
            self.log.push("ascii");
            Some(AsciiFrame {
                compositor: self.ascii.as_mut()?,
                scene: &self.scene,
                camera: &self.camera,
                stage: &mut self.stage,
            })
        }
    }

    const TICK: Duration = Duration::from_millis(16);

    #[test]
    fn pass_runs_after_default_and_animation() {
        let mut fl: FrameLoop<Host> = FrameLoop::new();
        attach(&mut fl, 1);
        fl.register(DEFAULT_PASS, "pixels", |h, _| {
            h.log.push("pixels");
            Ok(())
        });
        fl.register(ANIMATION, "spin", |h, _| {
            h.log.push("spin");
            Ok(())
        });
        let mut host = Host::new(4, 2);
        fl.tick(&mut host, TICK).unwrap();
        assert_eq!(host.log, vec!["spin", "pixels", "ascii"]);
    }

    #[test]
    fn pass_follows_viewport_changes_between_ticks() {
        let mut fl: FrameLoop<Host> = FrameLoop::new();
        attach(&mut fl, 1);
        let mut host = Host::new(4, 2);
        fl.tick(&mut host, TICK).unwrap();

        host.stage.set_viewport(9, 3);
        host.stage.set_viewport(6, 5);
        fl.tick(&mut host, TICK).unwrap();
        let ascii = host.ascii.as_ref().unwrap();
        assert_eq!(ascii.size(), (6, 5));
        assert_eq!(ascii.lines(&host.stage), vec!["######"; 5]);
    }

    #[test]
    fn detached_pass_is_never_invoked_again() {
        let mut fl: FrameLoop<Host> = FrameLoop::new();
        let id = attach(&mut fl, 1);
        let mut host = Host::new(4, 2);
        fl.tick(&mut host, TICK).unwrap();
        assert_eq!(host.raster_calls(), 1);

        let compositor = host.ascii.take().unwrap();
        detach(&mut fl, id, compositor, &mut host.stage);
        assert_eq!(host.stage.overlay_count(), 0);
        assert!(fl.is_empty());

        host.log.clear();
        for _ in 0..3 {
            fl.tick(&mut host, TICK).unwrap();
        }
        assert!(host.log.is_empty());
        assert_eq!(host.stage.overlay_count(), 0);
    }

    #[test]
    fn raster_failure_aborts_the_tick_with_context() {
        let mut fl: FrameLoop<Host> = FrameLoop::new();
        attach(&mut fl, 1);
        let mut host = Host::new(4, 2);
        let id = host.ascii.as_ref().unwrap().overlay_id();
        host.stage.detach_overlay(id);
        let err = fl.tick(&mut host, TICK).unwrap_err();
        assert!(format!("{err:#}").contains("ascii"));
    }
}
