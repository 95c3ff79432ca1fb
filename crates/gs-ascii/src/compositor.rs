use gs_core::charset::LuminanceLut;
use gs_core::color::dim;
use gs_core::config::{BgStyle, ColorMode, CompositorConfig, CompositorOptions, SamplingStrategy};
use gs_core::frame::{FrameBuffer, GlyphCell};
use gs_core::surface::{OverlayId, OverlayStyle, Stage};
use gs_scene::{Camera, Rasterizer, Scene};
use rayon::prelude::*;

use crate::color_map::map_color;
use crate::error::RenderError;
use crate::luminance::{adjust, sample_cell, sample_luminance};

/// Post-process qui remplace la sortie pixel par une grille de glyphes.
///
/// Le compositeur possède son rasteriseur et un buffer raster hors-écran ;
/// chaque [`render`](Self::render) rasterise la scène, convertit chaque bloc
/// de pixels en glyphe et remplace le contenu de son overlay sur le [`Stage`].
///
/// # Example
/// ```
/// use gs_ascii::AsciiCompositor;
/// use gs_core::config::{CompositorConfig, CompositorOptions};
/// use gs_core::surface::Stage;
/// use gs_scene::{Camera, Scene, SoftwareRasterizer};
///
/// let mut stage = Stage::new(20, 10);
/// let config = CompositorConfig::parse(" .:-+-%", false).unwrap();
/// let mut ascii = AsciiCompositor::new(
///     &mut stage,
///     SoftwareRasterizer::new(),
///     config,
///     CompositorOptions::default(),
/// );
/// assert_eq!(stage.overlay_count(), 1);
///
/// ascii.render(&Scene::new(Some((0, 0, 0))), &Camera::default(), &mut stage).unwrap();
/// let lines = ascii.lines(&stage);
/// assert_eq!(lines.len(), 10);
/// assert!(lines.iter().all(|l| l.trim().is_empty()));
///
/// ascii.dispose(&mut stage);
/// assert_eq!(stage.overlay_count(), 0);
/// ```
pub struct AsciiCompositor<R> {
    config: CompositorConfig,
    lut: LuminanceLut,
    options: CompositorOptions,
    rasterizer: R,
    raster: FrameBuffer,
    raster_allocations: u32,
    overlay: OverlayId,
    size: (u16, u16),
}

impl<R: Rasterizer> AsciiCompositor<R> {
    /// Bake the LUT, attach an overlay and size it to the current viewport.
    pub fn new(
        stage: &mut Stage,
        rasterizer: R,
        config: CompositorConfig,
        mut options: CompositorOptions,
    ) -> Self {
        options.clamp_all();
        let lut = LuminanceLut::new(config.ramp(), config.invert());
        let overlay = stage.attach_overlay(OverlayStyle::default());
        log::debug!(
            "Compositeur ASCII créé : rampe {:?} ({} glyphes), invert={}",
            config.ramp().to_string(),
            config.ramp().len(),
            config.invert()
        );
        let mut compositor = Self {
            config,
            lut,
            options,
            rasterizer,
            raster: FrameBuffer::default(),
            raster_allocations: 0,
            overlay,
            size: (0, 0),
        };
        compositor.sync_viewport(stage);
        compositor
    }

    /// Immutable configuration baked at construction.
    #[must_use]
    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &CompositorOptions {
        &self.options
    }

    /// Handle of the overlay this compositor writes to.
    #[must_use]
    pub fn overlay_id(&self) -> OverlayId {
        self.overlay
    }

    /// Overlay size in cells.
    #[must_use]
    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    /// Offscreen raster target.
    #[must_use]
    pub fn raster(&self) -> &FrameBuffer {
        &self.raster
    }

    /// Rasterizer driving this compositor.
    #[must_use]
    pub fn rasterizer(&self) -> &R {
        &self.rasterizer
    }

    /// Mutable access to the rasterizer (backend settings).
    pub fn rasterizer_mut(&mut self) -> &mut R {
        &mut self.rasterizer
    }

    /// Number of times the raster target was (re)allocated.
    #[must_use]
    pub fn raster_allocations(&self) -> u32 {
        self.raster_allocations
    }

    /// Resize overlay and raster target to `width × height` cells.
    ///
    /// Zero dimensions and unchanged sizes are no-ops. Returns whether
    /// anything was resized.
    pub fn resize(&mut self, stage: &mut Stage, width: u16, height: u16) -> bool {
        if width == 0 || height == 0 {
            log::debug!("Resize ASCII {width}×{height} ignoré");
            return false;
        }
        if self.size == (width, height) {
            return false;
        }
        self.size = (width, height);
        if let Some(surface) = stage.overlay_mut(self.overlay) {
            surface.resize(width, height);
        }
        self.fit_raster();
        log::debug!("Overlay ASCII redimensionné : {width}×{height}");
        true
    }

    /// Poll the stage viewport and resize to it.
    pub fn sync_viewport(&mut self, stage: &mut Stage) -> bool {
        let viewport = stage.viewport();
        self.resize(stage, viewport.width, viewport.height)
    }

    /// Raster size for the current overlay size and resolution.
    fn raster_dims(&self) -> (u32, u32) {
        let (w, h) = self.size;
        let res = self.options.resolution;
        let scale = |cells: u16| (f32::from(cells) * res).ceil().max(1.0) as u32;
        if w == 0 || h == 0 {
            return (0, 0);
        }
        (scale(w), scale(h))
    }

    fn fit_raster(&mut self) {
        let (rw, rh) = self.raster_dims();
        if self.raster.resize(rw, rh) {
            self.raster_allocations += 1;
            log::trace!("Raster ASCII réalloué : {rw}×{rh}");
        }
    }

    /// Replace every option at once (values are clamped).
    pub fn set_options(&mut self, mut options: CompositorOptions) {
        options.clamp_all();
        self.options = options;
        self.fit_raster();
    }

    /// Samples per cell and per axis, clamped to [0.25, 4.0].
    pub fn set_resolution(&mut self, resolution: f32) {
        self.set_options(CompositorOptions {
            resolution,
            ..self.options.clone()
        });
    }

    /// Toggle per-glyph color.
    pub fn set_color_enabled(&mut self, enabled: bool) {
        self.options.color_enabled = enabled;
    }

    /// Color mapping applied when color is enabled.
    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.options.color_mode = mode;
    }

    /// How multi-pixel cells are sampled.
    pub fn set_sampling(&mut self, sampling: SamplingStrategy) {
        self.options.sampling = sampling;
    }

    /// Background behind each glyph.
    pub fn set_bg_style(&mut self, bg_style: BgStyle) {
        self.options.bg_style = bg_style;
    }

    /// Contrast and brightness, clamped.
    pub fn set_levels(&mut self, contrast: f32, brightness: f32) {
        self.set_options(CompositorOptions {
            contrast,
            brightness,
            ..self.options.clone()
        });
    }

    /// Rasterize `scene` and replace the overlay contents with glyphs.
    ///
    /// A zero-sized overlay (no resize yet) renders nothing.
    ///
    /// # Errors
    /// [`RenderError::Raster`] when the rasterizer fails,
    /// [`RenderError::Detached`] when the overlay was removed from the stage.
    pub fn render(
        &mut self,
        scene: &Scene,
        camera: &Camera,
        stage: &mut Stage,
    ) -> Result<(), RenderError> {
        let surface = stage
            .overlay_mut(self.overlay)
            .ok_or(RenderError::Detached)?;
        let (cols, rows) = self.size;
        if cols == 0 || rows == 0 {
            return Ok(());
        }

        self.rasterizer
            .rasterize(scene, camera, self.options.cell_aspect, &mut self.raster)?;

        let raster = &self.raster;
        let lut = &self.lut;
        let opts = &self.options;
        surface
            .grid
            .cells
            .par_chunks_mut(usize::from(cols))
            .enumerate()
            .for_each(|(cy, row)| {
                for (cx, cell) in row.iter_mut().enumerate() {
                    let sample = sample_cell(raster, cx as u16, cy as u16, cols, rows, opts.sampling);
                    let lum = adjust(sample_luminance(sample), opts.contrast, opts.brightness);
                    let (r, g, b, _) = sample;
                    *cell = GlyphCell {
                        ch: lut.map(lum),
                        fg: opts
                            .color_enabled
                            .then(|| map_color((r, g, b), opts.color_mode, opts.saturation)),
                        bg: match opts.bg_style {
                            BgStyle::Black => None,
                            BgStyle::SourceDim => Some(dim((r, g, b))),
                        },
                    };
                }
            });
        Ok(())
    }

    /// Overlay rows as plain text.
    #[must_use]
    pub fn lines(&self, stage: &Stage) -> Vec<String> {
        stage
            .overlay(self.overlay)
            .map(|s| s.grid.to_lines())
            .unwrap_or_default()
    }

    /// Detach the overlay and drop the raster target.
    pub fn dispose(self, stage: &mut Stage) {
        if stage.detach_overlay(self.overlay).is_none() {
            log::warn!("Overlay ASCII {:?} déjà détaché", self.overlay);
        }
        log::debug!(
            "Compositeur ASCII libéré ({} allocations raster)",
            self.raster_allocations
        );
    }
}
