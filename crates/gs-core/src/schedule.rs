use std::time::Duration;

use anyhow::{Context, Result};

/// Priorité du rendu pixel par défaut.
pub const DEFAULT_PASS: i32 = 0;

/// Priorité par défaut d'une passe qui remplace la sortie du rendu par défaut.
pub const AFTER_DEFAULT_PASS: i32 = 1;

/// Priorité des callbacks d'animation : avant tout rendu.
pub const ANIMATION: i32 = -1;

/// Informations temporelles d'une frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Tick {
    /// Temps écoulé depuis la première frame.
    pub elapsed: Duration,
    /// Durée de la frame précédente.
    pub delta: Duration,
    /// Numéro de frame, à partir de 0.
    pub frame: u64,
}

/// Handle returned by [`FrameLoop::register`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

/// Per-frame callback over a host context `C`.
pub type FrameCallback<C> = Box<dyn FnMut(&mut C, &Tick) -> Result<()>>;

struct Entry<C> {
    id: CallbackId,
    priority: i32,
    name: String,
    callback: FrameCallback<C>,
}

/// Explicit ordered list of frame callbacks.
///
/// Callbacks run in ascending priority; equal priorities keep registration
/// order. Deregistration takes effect at the next [`FrameLoop::tick`].
///
/// # Example
/// ```
/// use std::time::Duration;
/// use gs_core::schedule::FrameLoop;
///
/// let mut frame_loop: FrameLoop<Vec<&str>> = FrameLoop::new();
/// frame_loop.register(1, "late", |log, _| { log.push("late"); Ok(()) });
/// let early = frame_loop.register(0, "early", |log, _| { log.push("early"); Ok(()) });
///
/// let mut log = Vec::new();
/// frame_loop.tick(&mut log, Duration::from_millis(16)).unwrap();
/// assert_eq!(log, ["early", "late"]);
///
/// frame_loop.deregister(early);
/// frame_loop.tick(&mut log, Duration::from_millis(16)).unwrap();
/// assert_eq!(log, ["early", "late", "late"]);
/// ```
pub struct FrameLoop<C> {
    entries: Vec<Entry<C>>,
    next_id: u64,
    elapsed: Duration,
    frame: u64,
}

impl<C> Default for FrameLoop<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> FrameLoop<C> {
    /// Create an empty loop.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
            elapsed: Duration::ZERO,
            frame: 0,
        }
    }

    /// Register a callback at `priority`.
    pub fn register<F>(&mut self, priority: i32, name: &str, callback: F) -> CallbackId
    where
        F: FnMut(&mut C, &Tick) -> Result<()> + 'static,
    {
        let id = CallbackId(self.next_id);
        self.next_id += 1;
        // Insert after every entry with priority <= ours: stable for ties.
        let pos = self
            .entries
            .iter()
            .position(|e| e.priority > priority)
            .unwrap_or(self.entries.len());
        self.entries.insert(
            pos,
            Entry {
                id,
                priority,
                name: name.to_string(),
                callback: Box::new(callback),
            },
        );
        log::debug!("Callback '{name}' enregistré (priorité {priority})");
        id
    }

    /// Remove a callback. Returns `false` if it was not registered.
    pub fn deregister(&mut self, id: CallbackId) -> bool {
        let Some(pos) = self.entries.iter().position(|e| e.id == id) else {
            return false;
        };
        let entry = self.entries.remove(pos);
        log::debug!("Callback '{}' retiré", entry.name);
        true
    }

    /// `true` if `id` is still registered.
    #[must_use]
    pub fn contains(&self, id: CallbackId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Number of registered callbacks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Callback names with their priority, in run order.
    pub fn schedule(&self) -> impl Iterator<Item = (&str, i32)> {
        self.entries.iter().map(|e| (e.name.as_str(), e.priority))
    }

    /// Temps total écoulé.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Advance the clock by `delta` and run every callback once.
    ///
    /// # Errors
    /// The first failing callback aborts the tick; its error is returned with
    /// the callback name as context.
    pub fn tick(&mut self, ctx: &mut C, delta: Duration) -> Result<()> {
        let tick = Tick {
            elapsed: self.elapsed,
            delta,
            frame: self.frame,
        };
        self.elapsed += delta;
        self.frame += 1;
        for entry in &mut self.entries {
            (entry.callback)(ctx, &tick)
                .with_context(|| format!("Échec du callback '{}'", entry.name))?;
        }
        Ok(())
    }
}
