use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use impulse_core::settings::PresetLibrary;
use impulse_core::{Displacement, NoiseSource, ShakeError, ShakeGenerator};

use crate::config::DirectorConfig;
use crate::target::ShakeTarget;

/// Handle to a shake started on a director.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShakeId(u64);

impl fmt::Display for ShakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shake#{}", self.0)
    }
}

/// Runs when a shake expires on its own. Not called for `terminate_all`.
pub type ShakeCallback = Box<dyn FnOnce()>;

struct ActiveShake {
    id: ShakeId,
    generator: ShakeGenerator,
    on_finish: Option<ShakeCallback>,
}

/// Composes every running shake onto one target, once per frame.
///
/// The director remembers what it added last frame so it can recover the
/// target's unshaken pose even when other code moves the target between
/// frames. Call [`tick`](Self::tick) exactly once per frame from the same
/// thread that starts shakes.
pub struct ShakeDirector<T: ShakeTarget> {
    target: Option<Weak<RefCell<T>>>,
    amplitude_override: f32,
    active: Vec<ActiveShake>,
    last_frame: Displacement,
    next_id: u64,
    presets: PresetLibrary,
}

impl<T: ShakeTarget> Default for ShakeDirector<T> {
    fn default() -> Self {
        Self {
            target: None,
            amplitude_override: 1.0,
            active: Vec::new(),
            last_frame: Displacement::ZERO,
            next_id: 0,
            presets: PresetLibrary::default(),
        }
    }
}

impl<T: ShakeTarget> fmt::Debug for ShakeDirector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShakeDirector")
            .field("has_target", &self.has_target())
            .field("amplitude_override", &self.amplitude_override)
            .field("active", &self.active.len())
            .field("last_frame", &self.last_frame)
            .finish_non_exhaustive()
    }
}

impl<T: ShakeTarget> ShakeDirector<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target(target: &Rc<RefCell<T>>) -> Self {
        Self {
            target: Some(Rc::downgrade(target)),
            ..Self::default()
        }
    }

    pub fn from_config(config: &DirectorConfig) -> Self {
        let mut director = Self::default();
        director.set_amplitude_override(config.amplitude_override);
        director.presets = config.presets.clone();
        director
    }

    /// The target, if one is set and still alive.
    pub fn target(&self) -> Option<Rc<RefCell<T>>> {
        self.target.as_ref().and_then(Weak::upgrade)
    }

    pub fn has_target(&self) -> bool {
        self.target.as_ref().is_some_and(|t| t.strong_count() > 0)
    }

    /// Point the director at a new target. Refused while shakes are running;
    /// the current target is kept and a warning is logged.
    pub fn set_target(&mut self, target: &Rc<RefCell<T>>) -> Result<(), ShakeError> {
        self.ensure_idle()?;
        let new = Rc::downgrade(target);
        let same = self.target.as_ref().is_some_and(|old| Weak::ptr_eq(old, &new));
        if !same {
            self.last_frame = Displacement::ZERO;
        }
        self.target = Some(new);
        Ok(())
    }

    /// Detach from the current target. Refused while shakes are running.
    pub fn clear_target(&mut self) -> Result<(), ShakeError> {
        self.ensure_idle()?;
        self.target = None;
        self.last_frame = Displacement::ZERO;
        Ok(())
    }

    fn ensure_idle(&self) -> Result<(), ShakeError> {
        if self.active.is_empty() {
            return Ok(());
        }
        let active = self.active.len();
        tracing::warn!(active, "Cannot change target while there are active shakes running");
        Err(ShakeError::TargetLocked { active })
    }

    pub fn amplitude_override(&self) -> f32 {
        self.amplitude_override
    }

    /// Scale every shake; 2.0 doubles them, 0.0 silences them. Negative
    /// values become zero.
    pub fn set_amplitude_override(&mut self, amplitude: f32) {
        self.amplitude_override = amplitude.max(0.0);
    }

    pub fn presets(&self) -> &PresetLibrary {
        &self.presets
    }

    pub fn set_presets(&mut self, presets: PresetLibrary) {
        self.presets = presets;
    }

    /// Start a shake. It contributes from the next `tick` on. Ignored, with
    /// `None` returned, when there is no live target.
    pub fn shake(&mut self, generator: ShakeGenerator) -> Option<ShakeId> {
        self.push(generator, None)
    }

    /// Like [`shake`](Self::shake), running `on_finish` once the shake has
    /// played out.
    pub fn shake_with_callback(
        &mut self,
        generator: ShakeGenerator,
        on_finish: impl FnOnce() + 'static,
    ) -> Option<ShakeId> {
        self.push(generator, Some(Box::new(on_finish)))
    }

    /// Build the named preset and start it. `source` is only used by noise
    /// presets.
    pub fn shake_preset(
        &mut self,
        name: &str,
        source: Option<Arc<dyn NoiseSource>>,
    ) -> Result<Option<ShakeId>, ShakeError> {
        let generator = self.presets.build(name, source)?;
        Ok(self.shake(generator))
    }

    fn push(
        &mut self,
        generator: ShakeGenerator,
        on_finish: Option<ShakeCallback>,
    ) -> Option<ShakeId> {
        if !self.has_target() {
            tracing::debug!("Ignoring shake: director has no target");
            return None;
        }
        let id = ShakeId(self.next_id);
        self.next_id += 1;
        tracing::debug!(%id, duration = generator.total(), "Shake started");
        self.active.push(ActiveShake {
            id,
            generator,
            on_finish,
        });
        Some(id)
    }

    /// Stop every shake at once. The next `tick` puts the target back on its
    /// baseline pose.
    pub fn terminate_all(&mut self) {
        if !self.active.is_empty() {
            tracing::debug!(count = self.active.len(), "Terminating all shakes");
        }
        self.active.clear();
    }

    pub fn is_active(&self, id: ShakeId) -> bool {
        self.active.iter().any(|s| s.id == id)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Active shakes in the order they were started.
    pub fn active_shakes(&self) -> impl Iterator<Item = (ShakeId, &ShakeGenerator)> {
        self.active.iter().map(|s| (s.id, &s.generator))
    }

    /// What the director added to the target on the last `tick`.
    pub fn last_frame_displacement(&self) -> Displacement {
        self.last_frame
    }

    /// Advance every shake by `delta` seconds and write the combined pose to
    /// the target. Returns the pose written, or `None` when there is no live
    /// target (or it is borrowed elsewhere) and nothing happened.
    pub fn tick(&mut self, delta: f32) -> Option<Displacement> {
        let handle = self.target()?;
        let Ok(mut target) = handle.try_borrow_mut() else {
            tracing::debug!("Shake target is borrowed, skipping frame");
            return None;
        };

        // The target was last written as baseline + last_frame.
        let baseline = target.pose() - self.last_frame;
        let observer = target.global_position();
        let amplitude = self.amplitude_override;

        let mut accumulated = Displacement::ZERO;
        let mut finished = Vec::new();
        self.active.retain_mut(|shake| {
            if !shake.generator.advance(delta) {
                tracing::debug!(id = %shake.id, "Shake finished");
                if let Some(on_finish) = shake.on_finish.take() {
                    finished.push(on_finish);
                }
                return false;
            }
            let weight = shake.generator.weight(observer) * amplitude;
            accumulated += shake.generator.produce_displacement(delta) * weight;
            true
        });

        let mut accumulated = target.constrain(accumulated);
        accumulated.offset = target.orient(&baseline, accumulated.offset);
        let pose = baseline + accumulated;
        target.set_pose(pose);
        drop(target);

        self.last_frame = accumulated;
        for on_finish in finished {
            on_finish();
        }
        Some(pose)
    }
}
