//! Animated view transitions
//!
//! An animation walks the view matrix from its current value to a target in
//! a number of steps proportional to how far the visible content moves. Each
//! animation holds a token from an [`AnimationSequence`]; issuing a newer
//! token makes every older animation stop at its next step, so only the most
//! recent request ever reaches its target.

use nalgebra::Point3;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use super::matrix::{ViewComponents, ViewMatrix};
use super::surface::{matrix_placing_on_screen, RenderSurface, Sleeper};
use super::transform::Centering;
use crate::config::AnimationConfig;
use crate::coordinates::DisplayPoint;
use crate::{GeoNavError, Result};

/// Identifies one animation request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnimationToken(u64);

impl AnimationToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Shared source of animation tokens
///
/// Clones share the same counter. The token issued last is the only current
/// one.
#[derive(Debug, Clone, Default)]
pub struct AnimationSequence {
    latest: Arc<AtomicU64>,
}

impl AnimationSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new token, superseding all earlier ones
    pub fn issue(&self) -> AnimationToken {
        AnimationToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// The most recently issued token
    pub fn current(&self) -> AnimationToken {
        AnimationToken(self.latest.load(Ordering::SeqCst))
    }

    pub fn is_current(&self, token: AnimationToken) -> bool {
        self.current() == token
    }
}

/// Lifecycle of one animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    /// Not started yet
    Idle,
    /// Stepping toward the target
    Running,
    /// Target matrix applied
    Completed,
    /// Stopped because a newer animation was requested
    Superseded,
}

impl AnimationState {
    fn to_u8(self) -> u8 {
        match self {
            AnimationState::Idle => 0,
            AnimationState::Running => 1,
            AnimationState::Completed => 2,
            AnimationState::Superseded => 3,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => AnimationState::Running,
            2 => AnimationState::Completed,
            3 => AnimationState::Superseded,
            _ => AnimationState::Idle,
        }
    }
}

/// Number of steps for a given maximum on-screen displacement
///
/// Displacements up to one display unit use the base step count; larger
/// ones scale it linearly until `max_displacement`, and the result is
/// clamped to `[base_steps, max_steps]`. Non-finite displacements use the
/// base count. There is always at least one step, and pacing values out of
/// order are tightened rather than rejected.
///
/// # Examples
///
/// ```rust
/// use geonav::config::AnimationConfig;
/// use geonav::navigation::step_count;
///
/// let config = AnimationConfig::default();
/// assert_eq!(step_count(0.2, &config), 20);
/// assert_eq!(step_count(2.5, &config), 50);
/// assert_eq!(step_count(40.0, &config), 100);
/// ```
pub fn step_count(max_displacement: f64, config: &AnimationConfig) -> usize {
    let base = config.base_steps.max(1);
    let ceiling = config.max_steps.max(base);
    if !max_displacement.is_finite() {
        return base;
    }
    // f64::max drops a NaN bound
    let limit = config.max_displacement.max(1.0);
    let displacement = max_displacement.clamp(1.0, limit);
    let steps = (base as f64 * displacement).round() as usize;
    steps.clamp(base, ceiling)
}

/// Largest distance any sample point moves between two view matrices
///
/// Samples that map to non-finite positions are ignored.
pub fn max_displacement(samples: &[Point3<f64>], from: &ViewMatrix, to: &ViewMatrix) -> f64 {
    samples
        .iter()
        .map(|p| (to.transform_point(p) - from.transform_point(p)).norm())
        .filter(|d| d.is_finite())
        .fold(0.0, f64::max)
}

/// A pixel to re-anchor a display point on once the target is reached
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ScreenAnchor {
    pub point: DisplayPoint,
    pub screen_x: f64,
    pub screen_y: f64,
    pub centering: Centering,
}

/// Publishes a token as the running animation
///
/// The mark is withdrawn on drop unless [`RunningMark::keep`] was called,
/// and only if no newer token has been published since.
pub(crate) struct RunningMark<'a> {
    running: &'a AtomicU64,
    token: AnimationToken,
    kept: bool,
}

impl<'a> RunningMark<'a> {
    pub(crate) fn set(running: &'a AtomicU64, token: AnimationToken) -> Self {
        running.store(token.value(), Ordering::SeqCst);
        RunningMark {
            running,
            token,
            kept: false,
        }
    }

    /// Leaves the token published; the animation thread clears it
    pub(crate) fn keep(mut self) {
        self.kept = true;
    }
}

impl Drop for RunningMark<'_> {
    fn drop(&mut self) {
        if !self.kept {
            let _ = self.running.compare_exchange(
                self.token.value(),
                0,
                Ordering::SeqCst,
                Ordering::SeqCst,
            );
        }
    }
}

/// Everything the animation thread needs, resolved on the caller's thread
#[derive(Debug, Clone)]
pub(crate) struct AnimationPlan {
    pub token: AnimationToken,
    pub from: ViewComponents,
    pub target: ViewMatrix,
    pub steps: usize,
    pub delay: Duration,
    pub anchor: Option<ScreenAnchor>,
}

/// Shared handles the animation thread reports through
pub(crate) struct AnimationContext {
    pub surface: Arc<dyn RenderSurface>,
    pub sequence: AnimationSequence,
    pub sleeper: Arc<dyn Sleeper>,
    pub running: Arc<AtomicU64>,
    pub state: Arc<AtomicU8>,
}

impl AnimationPlan {
    /// Steps the surface toward the target until done or superseded
    pub(crate) fn run(self, ctx: AnimationContext) -> AnimationState {
        ctx.state
            .store(AnimationState::Running.to_u8(), Ordering::SeqCst);

        let outcome = self.step_all(&ctx);

        let _ = ctx.running.compare_exchange(
            self.token.value(),
            0,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
        ctx.state.store(outcome.to_u8(), Ordering::SeqCst);
        outcome
    }

    fn step_all(&self, ctx: &AnimationContext) -> AnimationState {
        let target = self.target.decompose();
        let surface = ctx.surface.as_ref();

        for step in 1..=self.steps {
            if !ctx.sequence.is_current(self.token) {
                log::debug!(
                    "Animation {} superseded at step {}/{}",
                    self.token.value(),
                    step,
                    self.steps
                );
                return AnimationState::Superseded;
            }

            if step == self.steps {
                surface.apply_view_matrix(&self.target);
                if let Some(anchor) = &self.anchor {
                    if let Some(centered) = matrix_placing_on_screen(
                        surface,
                        &anchor.point,
                        anchor.screen_x,
                        anchor.screen_y,
                        anchor.centering,
                    ) {
                        surface.apply_view_matrix(&centered);
                    }
                }
                log::debug!("Animation {} completed", self.token.value());
                return AnimationState::Completed;
            }

            let t = step as f64 / self.steps as f64;
            let matrix = self.from.interpolate(&target, t).compose();
            if matrix.is_invertible() {
                log::trace!("Animation {} step {}/{}", self.token.value(), step, self.steps);
                surface.apply_view_matrix(&matrix);
            } else {
                log::warn!(
                    "Animation {} step {}/{} produced a non-invertible matrix, skipping",
                    self.token.value(),
                    step,
                    self.steps
                );
            }
            ctx.sleeper.sleep(self.delay);
        }
        AnimationState::Completed
    }
}

/// Handle to a running animation
#[derive(Debug)]
pub struct AnimationHandle {
    token: AnimationToken,
    steps: usize,
    state: Arc<AtomicU8>,
    thread: JoinHandle<AnimationState>,
}

impl AnimationHandle {
    pub(crate) fn new(
        token: AnimationToken,
        steps: usize,
        state: Arc<AtomicU8>,
        thread: JoinHandle<AnimationState>,
    ) -> Self {
        AnimationHandle {
            token,
            steps,
            state,
            thread,
        }
    }

    pub fn token(&self) -> AnimationToken {
        self.token
    }

    /// Number of steps planned for the animation
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Current lifecycle state, without blocking
    pub fn state(&self) -> AnimationState {
        AnimationState::from_u8(self.state.load(Ordering::SeqCst))
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Blocks until the animation ends and returns how it ended
    pub fn wait(self) -> Result<AnimationState> {
        self.thread
            .join()
            .map_err(|_| GeoNavError::AnimationPanicked)
    }
}
