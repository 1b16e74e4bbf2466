// Refresh mode policy
//
// The caller's hint is honoured as-is except that a Partial hint is
// preceded by a black/white wipe once `threshold` partial updates have
// accumulated. Full and Fast updates reset the counter.

use log::debug;

use super::display::RenderMode;

pub const DEFAULT_GHOST_CLEAR_EVERY: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RefreshState {
    pub dirty: bool,
    pub partial_count: u32,
    pub last_full_refresh_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshDecision {
    pub mode: RenderMode,
    /// Wipe the panel before drawing this frame.
    pub wipe: bool,
}

pub fn decide(
    hint: RenderMode,
    state: RefreshState,
    threshold: u32,
    now_ms: u64,
) -> (RefreshDecision, RefreshState) {
    let mut next = RefreshState {
        dirty: false,
        ..state
    };

    let wipe = match hint {
        RenderMode::Full | RenderMode::Fast => {
            next.partial_count = 0;
            next.last_full_refresh_ms = now_ms;
            false
        }
        RenderMode::Partial if state.partial_count >= threshold => {
            // the wipe itself is two full refreshes; the frame after it
            // starts a fresh count
            next.partial_count = 0;
            next.last_full_refresh_ms = now_ms;
            true
        }
        RenderMode::Partial => {
            next.partial_count = state.partial_count.saturating_add(1);
            false
        }
    };

    (RefreshDecision { mode: hint, wipe }, next)
}

pub struct RefreshPolicy {
    state: RefreshState,
    threshold: u32,
    force_full: bool,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_GHOST_CLEAR_EVERY)
    }
}

impl RefreshPolicy {
    pub const fn new(threshold: u32) -> Self {
        Self {
            state: RefreshState {
                dirty: false,
                partial_count: 0,
                last_full_refresh_ms: 0,
            },
            threshold: if threshold == 0 { 1 } else { threshold },
            force_full: false,
        }
    }

    pub fn state(&self) -> RefreshState {
        self.state
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn set_threshold(&mut self, threshold: u32) {
        self.threshold = threshold.max(1);
    }

    pub fn mark_dirty(&mut self) {
        self.state.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.state.dirty
    }

    pub fn on_input(&mut self) {
        self.state.partial_count = 0;
    }

    /// Leaving hibernation: the panel contents are unknown.
    pub fn on_wake(&mut self) {
        self.force_full = true;
        self.state.dirty = true;
    }

    /// Decide the next frame, or None when nothing is dirty.
    pub fn next_frame(&mut self, hint: RenderMode, now_ms: u64) -> Option<RefreshDecision> {
        if !self.state.dirty {
            return None;
        }
        let hint = if self.force_full {
            RenderMode::Full
        } else {
            hint
        };
        self.force_full = false;

        let (decision, next) = decide(hint, self.state, self.threshold, now_ms);
        debug!(
            "refresh: {:?}{} (partials {})",
            decision.mode,
            if decision.wipe { " after wipe" } else { "" },
            next.partial_count
        );
        self.state = next;
        Some(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hint_is_honoured_below_threshold() {
        let (d, s) = decide(RenderMode::Partial, RefreshState::default(), 10, 5);
        assert_eq!(d, RefreshDecision { mode: RenderMode::Partial, wipe: false });
        assert_eq!(s.partial_count, 1);
        assert!(!s.dirty);
    }

    #[test]
    fn ten_partials_then_wipe() {
        let mut policy = RefreshPolicy::new(10);
        for i in 1..=10 {
            policy.mark_dirty();
            let d = policy.next_frame(RenderMode::Partial, i).unwrap();
            assert!(!d.wipe);
        }
        assert_eq!(policy.state().partial_count, 10);

        policy.mark_dirty();
        let d = policy.next_frame(RenderMode::Partial, 99).unwrap();
        assert!(d.wipe);
        assert_eq!(d.mode, RenderMode::Partial);
        assert_eq!(policy.state().partial_count, 0);
        assert_eq!(policy.state().last_full_refresh_ms, 99);
    }

    #[test]
    fn full_and_fast_reset_counter() {
        let state = RefreshState {
            dirty: true,
            partial_count: 7,
            last_full_refresh_ms: 0,
        };
        for mode in [RenderMode::Full, RenderMode::Fast] {
            let (d, s) = decide(mode, state, 10, 42);
            assert!(!d.wipe);
            assert_eq!(s.partial_count, 0);
            assert_eq!(s.last_full_refresh_ms, 42);
        }
    }

    #[test]
    fn clean_state_produces_no_frame() {
        let mut policy = RefreshPolicy::default();
        assert_eq!(policy.next_frame(RenderMode::Partial, 0), None);
    }

    #[test]
    fn wake_forces_full() {
        let mut policy = RefreshPolicy::default();
        policy.on_wake();
        let d = policy.next_frame(RenderMode::Partial, 0).unwrap();
        assert_eq!(d.mode, RenderMode::Full);

        policy.mark_dirty();
        let d = policy.next_frame(RenderMode::Partial, 1).unwrap();
        assert_eq!(d.mode, RenderMode::Partial);
    }

    #[test]
    fn input_resets_counter() {
        let mut policy = RefreshPolicy::new(3);
        for t in 0..3 {
            policy.mark_dirty();
            policy.next_frame(RenderMode::Partial, t);
        }
        policy.on_input();
        policy.mark_dirty();
        assert!(!policy.next_frame(RenderMode::Partial, 5).unwrap().wipe);
    }
}
