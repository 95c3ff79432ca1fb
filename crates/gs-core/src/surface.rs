//! Visual surfaces of the host: a base layer for the default pixel output
//! and overlays stacked on top of it.

use crate::frame::{GlyphGrid, Rgb};

/// Handle to an overlay attached to a [`Stage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(u32);

/// Whether a surface receives pointer input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointerEvents {
    /// Purely visual: input passes through to what lies beneath.
    #[default]
    None,
    /// The surface captures input over its area.
    Auto,
}

/// Stacking position among the stage's overlays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ZOrder {
    /// Above every overlay attached so far.
    #[default]
    Topmost,
    /// Directly above the base layer, under existing overlays.
    Bottom,
}

/// Propriétés visuelles fixes d'un overlay, appliquées une seule fois à l'attache.
///
/// # Example
/// ```
/// use gs_core::surface::{OverlayStyle, PointerEvents, ZOrder};
/// let style = OverlayStyle::default();
/// assert_eq!((style.top, style.left), (0, 0));
/// assert_eq!(style.foreground, (255, 255, 255));
/// assert_eq!(style.background, (0, 0, 0));
/// assert_eq!(style.pointer_events, PointerEvents::None);
/// assert_eq!(style.z_order, ZOrder::Topmost);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlayStyle {
    /// Offset from the viewport origin, in rows.
    pub top: u16,
    /// Offset from the viewport origin, in columns.
    pub left: u16,
    /// Glyph color when a cell carries none.
    pub foreground: Rgb,
    /// Fill color when a cell carries none.
    pub background: Rgb,
    /// Input behaviour.
    pub pointer_events: PointerEvents,
    /// Stacking position.
    pub z_order: ZOrder,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            top: 0,
            left: 0,
            foreground: (255, 255, 255),
            background: (0, 0, 0),
            pointer_events: PointerEvents::None,
            z_order: ZOrder::Topmost,
        }
    }
}

/// A glyph grid composited above the base layer.
#[derive(Clone, Debug)]
pub struct OverlaySurface {
    /// Fixed style.
    pub style: OverlayStyle,
    /// Contents, replaced wholesale by the owner each frame.
    pub grid: GlyphGrid,
    allocations: u32,
}

impl OverlaySurface {
    fn new(style: OverlayStyle) -> Self {
        Self {
            style,
            grid: GlyphGrid::default(),
            allocations: 0,
        }
    }

    /// Width in cells.
    #[must_use]
    pub fn width(&self) -> u16 {
        self.grid.width
    }

    /// Height in cells.
    #[must_use]
    pub fn height(&self) -> u16 {
        self.grid.height
    }

    /// Number of times the grid storage was (re)allocated.
    #[must_use]
    pub fn allocations(&self) -> u32 {
        self.allocations
    }

    /// Resize the grid. Same size is a no-op; returns whether storage changed.
    pub fn resize(&mut self, width: u16, height: u16) -> bool {
        let changed = self.grid.resize(width, height);
        if changed {
            self.allocations += 1;
        }
        changed
    }

    /// `true` if the stage cell (x, y) falls inside this overlay.
    #[must_use]
    pub fn covers(&self, x: u16, y: u16) -> bool {
        let (left, top) = (u32::from(self.style.left), u32::from(self.style.top));
        let (x, y) = (u32::from(x), u32::from(y));
        x >= left
            && y >= top
            && x < left + u32::from(self.grid.width)
            && y < top + u32::from(self.grid.height)
    }
}

/// Taille du viewport hôte, en cellules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Viewport {
    /// Columns.
    pub width: u16,
    /// Rows.
    pub height: u16,
}

impl Viewport {
    /// Create a viewport.
    #[must_use]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// `true` if either dimension is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Result of a pointer hit test.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitTarget {
    /// An interactive overlay.
    Overlay(OverlayId),
    /// The base layer (default pixel output).
    Base,
    /// Outside the viewport.
    Outside,
}

/// Racine visuelle de l'hôte : une couche de base et des overlays empilés.
///
/// Seul le propriétaire d'un `OverlayId` écrit dans l'overlay correspondant ;
/// le reste de l'hôte se contente de lire (présentation, layout).
///
/// # Example
/// ```
/// use gs_core::surface::{HitTarget, OverlayStyle, Stage};
/// let mut stage = Stage::new(80, 24);
/// let id = stage.attach_overlay(OverlayStyle::default());
/// assert_eq!(stage.overlay_count(), 1);
/// // Pointer-transparent overlays let input reach the base layer.
/// assert_eq!(stage.hit_test(3, 3), HitTarget::Base);
/// assert!(stage.detach_overlay(id).is_some());
/// assert_eq!(stage.overlay_count(), 0);
/// ```
#[derive(Debug, Default)]
pub struct Stage {
    viewport: Viewport,
    base: GlyphGrid,
    overlays: Vec<(OverlayId, OverlaySurface)>,
    next_id: u32,
}

impl Stage {
    /// Create a stage with the given viewport size.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            base: GlyphGrid::new(width, height),
            overlays: Vec::new(),
            next_id: 0,
        }
    }

    /// Current viewport size.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Update the viewport. Zero dimensions are ignored; returns whether it changed.
    ///
    /// Overlays are not resized here: their owners poll [`Stage::viewport`].
    pub fn set_viewport(&mut self, width: u16, height: u16) -> bool {
        let next = Viewport::new(width, height);
        if next.is_empty() {
            log::debug!("Viewport {width}×{height} ignoré");
            return false;
        }
        if next == self.viewport {
            return false;
        }
        self.viewport = next;
        self.base.resize(width, height);
        true
    }

    /// Base layer (default pixel output).
    #[must_use]
    pub fn base(&self) -> &GlyphGrid {
        &self.base
    }

    /// Mutable base layer.
    pub fn base_mut(&mut self) -> &mut GlyphGrid {
        &mut self.base
    }

    /// Attach a new, empty overlay and return its handle.
    pub fn attach_overlay(&mut self, style: OverlayStyle) -> OverlayId {
        let id = OverlayId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        let surface = OverlaySurface::new(style);
        match style.z_order {
            ZOrder::Topmost => self.overlays.push((id, surface)),
            ZOrder::Bottom => self.overlays.insert(0, (id, surface)),
        }
        log::trace!("Overlay {id:?} attaché");
        id
    }

    /// Detach an overlay, handing its surface back.
    pub fn detach_overlay(&mut self, id: OverlayId) -> Option<OverlaySurface> {
        let pos = self.overlays.iter().position(|(oid, _)| *oid == id)?;
        log::trace!("Overlay {id:?} détaché");
        Some(self.overlays.remove(pos).1)
    }

    /// Read an overlay.
    #[must_use]
    pub fn overlay(&self, id: OverlayId) -> Option<&OverlaySurface> {
        self.overlays
            .iter()
            .find(|(oid, _)| *oid == id)
            .map(|(_, s)| s)
    }

    /// Mutate an overlay.
    pub fn overlay_mut(&mut self, id: OverlayId) -> Option<&mut OverlaySurface> {
        self.overlays
            .iter_mut()
            .find(|(oid, _)| *oid == id)
            .map(|(_, s)| s)
    }

    /// Overlays from bottom to top.
    pub fn overlays(&self) -> impl Iterator<Item = (OverlayId, &OverlaySurface)> {
        self.overlays.iter().map(|(id, s)| (*id, s))
    }

    /// Number of attached overlays.
    #[must_use]
    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    /// Topmost interactive layer under the cell (x, y).
    #[must_use]
    pub fn hit_test(&self, x: u16, y: u16) -> HitTarget {
        if x >= self.viewport.width || y >= self.viewport.height {
            return HitTarget::Outside;
        }
        self.overlays
            .iter()
            .rev()
            .find(|(_, s)| s.style.pointer_events == PointerEvents::Auto && s.covers(x, y))
            .map_or(HitTarget::Base, |(id, _)| HitTarget::Overlay(*id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlays_stack_in_attach_order() {
        let mut stage = Stage::new(10, 10);
        let a = stage.attach_overlay(OverlayStyle::default());
        let b = stage.attach_overlay(OverlayStyle::default());
        let c = stage.attach_overlay(OverlayStyle {
            z_order: ZOrder::Bottom,
            ..OverlayStyle::default()
        });
        let order: Vec<_> = stage.overlays().map(|(id, _)| id).collect();
        assert_eq!(order, vec![c, a, b]);
    }

    #[test]
    fn interactive_overlay_captures_hits() {
        let mut stage = Stage::new(10, 10);
        let passive = stage.attach_overlay(OverlayStyle::default());
        let active = stage.attach_overlay(OverlayStyle {
            pointer_events: PointerEvents::Auto,
            ..OverlayStyle::default()
        });
        for id in [passive, active] {
            stage.overlay_mut(id).unwrap().resize(10, 10);
        }
        assert_eq!(stage.hit_test(2, 2), HitTarget::Overlay(active));
        stage.detach_overlay(active);
        assert_eq!(stage.hit_test(2, 2), HitTarget::Base);
        assert_eq!(stage.hit_test(20, 2), HitTarget::Outside);
    }

    #[test]
    fn zero_viewport_is_ignored() {
        let mut stage = Stage::new(40, 20);
        assert!(!stage.set_viewport(0, 0));
        assert!(!stage.set_viewport(40, 0));
        assert_eq!(stage.viewport(), Viewport::new(40, 20));
        assert!(stage.set_viewport(50, 25));
        assert_eq!(stage.base().width, 50);
    }

    #[test]
    fn detached_ids_are_not_reused() {
        let mut stage = Stage::new(4, 4);
        let a = stage.attach_overlay(OverlayStyle::default());
        stage.detach_overlay(a);
        let b = stage.attach_overlay(OverlayStyle::default());
        assert_ne!(a, b);
        assert!(stage.overlay(a).is_none());
        assert!(stage.detach_overlay(a).is_none());
    }

    #[test]
    fn overlay_resize_counts_allocations() {
        let mut stage = Stage::new(4, 4);
        let id = stage.attach_overlay(OverlayStyle::default());
        let overlay = stage.overlay_mut(id).unwrap();
        assert!(overlay.resize(4, 4));
        assert!(!overlay.resize(4, 4));
        assert_eq!(overlay.allocations(), 1);
        assert_eq!((overlay.width(), overlay.height()), (4, 4));
    }
}
