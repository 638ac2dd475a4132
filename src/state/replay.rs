// Step navigation over one loaded comparison.

use crate::model::{ReplaySet, StepRecord, Strategy};

/// One agent's view of the current step: the record to paint and whether
/// that agent's episode has already run out of recorded steps.
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    pub record: &'a StepRecord,
    pub game_over: bool,
}

/// Owns the installed replay set and the shared step cursor. Created once
/// per viewer and replaced wholesale on every load.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReplaySession {
    set: ReplaySet,
    current_step: usize,
    total_steps: usize,
}

impl ReplaySession {
    /// Swaps in a freshly loaded set and rewinds to the first step.
    pub fn install(&mut self, set: ReplaySet) {
        self.total_steps = set.total_steps();
        self.set = set;
        self.current_step = 0;
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn has_data(&self) -> bool {
        self.total_steps > 0
    }

    pub fn at_start(&self) -> bool {
        self.current_step == 0
    }

    pub fn at_end(&self) -> bool {
        self.total_steps == 0 || self.current_step == self.total_steps - 1
    }

    /// Saturating advance; reports whether the cursor moved so callers only
    /// redraw on an effective transition.
    pub fn next(&mut self) -> bool {
        if self.current_step + 1 < self.total_steps {
            self.current_step += 1;
            true
        } else {
            false
        }
    }

    pub fn previous(&mut self) -> bool {
        if self.current_step > 0 {
            self.current_step -= 1;
            true
        } else {
            false
        }
    }

    /// The record this agent shows at the current step. A run shorter than
    /// the cursor freezes on its last record with `game_over` set; the other
    /// agents keep advancing independently.
    pub fn frame(&self, strategy: Strategy) -> Option<FrameView<'_>> {
        let run = self.set.run(strategy);
        if run.is_empty() {
            return None;
        }
        let game_over = self.current_step >= run.len();
        let index = if game_over { run.len() - 1 } else { self.current_step };
        Some(FrameView {
            record: &run[index],
            game_over,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReplaySet;

    fn record(step: u32) -> StepRecord {
        StepRecord {
            step,
            score: step as f64,
            thinking: String::new(),
            state: None,
        }
    }

    fn session(lengths: [usize; 3]) -> ReplaySession {
        let mut set = ReplaySet::default();
        for (slot, len) in set.runs.iter_mut().zip(lengths) {
            *slot = (0..len as u32).map(record).collect();
        }
        let mut session = ReplaySession::default();
        session.install(set);
        session
    }

    #[test]
    fn navigation_saturates_at_both_ends() {
        let mut s = session([3, 3, 3]);
        assert!(!s.previous());
        assert_eq!(s.current_step(), 0);
        assert!(s.next());
        assert!(s.next());
        assert_eq!(s.current_step(), 2);
        assert!(!s.next());
        assert_eq!(s.current_step(), 2);
        assert!(s.previous());
        assert_eq!(s.current_step(), 1);
    }

    #[test]
    fn total_steps_is_the_longest_run() {
        let s = session([2, 5, 3]);
        assert_eq!(s.total_steps(), 5);
        assert!(s.has_data());
    }

    #[test]
    fn short_run_freezes_on_last_frame_while_others_advance() {
        let mut s = session([2, 5, 5]);
        for _ in 0..3 {
            assert!(s.next());
        }
        let reactive = s.frame(Strategy::Reactive).unwrap();
        assert!(reactive.game_over);
        assert_eq!(reactive.record.step, 1);
        let planning = s.frame(Strategy::Planning).unwrap();
        assert!(!planning.game_over);
        assert_eq!(planning.record.step, 3);
    }

    #[test]
    fn empty_run_has_no_frame() {
        let s = session([0, 1, 1]);
        assert!(s.frame(Strategy::Reactive).is_none());
        assert!(s.frame(Strategy::Planning).is_some());
    }

    #[test]
    fn install_resets_the_cursor() {
        let mut s = session([4, 4, 4]);
        s.next();
        s.next();
        let mut set = ReplaySet::default();
        set.runs[0] = vec![record(0)];
        s.install(set);
        assert_eq!(s.current_step(), 0);
        assert_eq!(s.total_steps(), 1);
    }
}
