//! Cooperative, clock-driven transitions.
//!
//! There is no parallelism: the host advances a millisecond clock through
//! `Chart::tick` and every active transition is sampled against it.
//! Completion is joined explicitly: a `Barrier` is armed with the ids of the
//! transitions started in one redraw pass and resolves once all of them have
//! ended (completed or interrupted), with a bounded timeout fallback.

/// Monotonic transition identity, unique per chart instance.
pub type TransitionId = u64;

/// Easing curves applied to transition progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    CubicIn,
    CubicOut,
    CubicInOut,
}

impl Easing {
    /// Applies the curve to a progress value in `[0, 1]`.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::CubicIn => t * t * t,
            Self::CubicOut => 1.0 - (1.0 - t).powi(3),
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// One time-bounded attribute transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub id: TransitionId,
    pub start_ms: u64,
    pub duration_ms: u32,
    pub easing: Easing,
}

impl Transition {
    #[must_use]
    pub fn new(id: TransitionId, start_ms: u64, duration_ms: u32, easing: Easing) -> Self {
        Self {
            id,
            start_ms,
            duration_ms,
            easing,
        }
    }

    /// Eased progress at `now_ms`.
    #[must_use]
    pub fn progress(self, now_ms: u64) -> f64 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        let elapsed = now_ms.saturating_sub(self.start_ms) as f64;
        self.easing.apply(elapsed / f64::from(self.duration_ms))
    }

    #[must_use]
    pub fn finished(self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.start_ms) >= u64::from(self.duration_ms)
    }
}

/// Slack added to the barrier timeout to absorb scheduling jitter.
const BARRIER_TIMEOUT_SLACK_MS: u64 = 100;

/// Join point for all transitions started within one redraw pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Barrier {
    pending: Vec<TransitionId>,
    timeout_at_ms: u64,
    fired: bool,
}

impl Barrier {
    /// Arms the barrier with the transitions of one redraw scope.
    ///
    /// The timeout covers the pathological case of a transition handle that
    /// never reports an end: twice the nominal duration plus slack.
    #[must_use]
    pub fn arm(pending: Vec<TransitionId>, now_ms: u64, duration_ms: u32) -> Self {
        Self {
            pending,
            timeout_at_ms: now_ms + u64::from(duration_ms) * 2 + BARRIER_TIMEOUT_SLACK_MS,
            fired: false,
        }
    }

    /// Records transitions that ended (completed or interrupted).
    pub fn note_ended(&mut self, ended: &[TransitionId]) {
        self.pending.retain(|id| !ended.contains(id));
    }

    /// Returns `true` exactly once, when every member has ended or the
    /// timeout elapsed.
    pub fn poll(&mut self, now_ms: u64) -> bool {
        if self.fired {
            return false;
        }
        if self.pending.is_empty() || now_ms >= self.timeout_at_ms {
            self.fired = true;
            return true;
        }
        false
    }

    #[must_use]
    pub fn is_fired(&self) -> bool {
        self.fired
    }

    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
