//! Transition serialization and interpolation state.
//!
//! Structural operations run one at a time. A request arriving while one
//! is in flight queues behind it; a queued navigate is superseded by a
//! later navigate (its completion folds into the superseder, so every
//! completion still fires). Index mutations retarget queued navigates so
//! they keep pointing at the same logical page.
//!
//! The scheduler owns timing and interpolation only. The controller
//! applies sampled values, raises notifications and runs the settle
//! sequence; nothing here touches the registry or viewport directly.

use crate::easing::Easing;
use crate::geometry::{Point, Rect};
use crate::layout::Layouter;
use crate::registry::Evicted;
use crate::types::PageIndex;
use std::collections::{BTreeSet, VecDeque};
use std::rc::Rc;
use std::time::Duration;

/// Callback invoked exactly once when a structural operation has fully
/// settled, after all registry and visibility side effects.
pub type Completion = Box<dyn FnOnce()>;

/// What a structural request asks for.
pub(crate) enum TransitionKind {
    /// Scroll so `target` becomes the current page.
    Navigate { target: PageIndex },
    /// Add pages at the given positions of the post-insertion sequence.
    Insert { indexes: BTreeSet<PageIndex> },
    /// Remove the pages at the given pre-deletion positions.
    Delete { indexes: BTreeSet<PageIndex> },
    /// Move one page to a new position.
    Move { from: PageIndex, to: PageIndex },
    /// Re-sync page count and geometry against the source.
    Reload,
    /// Re-fetch the units for specific indices.
    ReloadPages { indexes: BTreeSet<PageIndex> },
    /// Swap the layout strategy, optionally landing on `focus`.
    SetLayouter {
        layouter: Rc<dyn Layouter>,
        focus: Option<PageIndex>,
    },
}

impl TransitionKind {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Navigate { .. } => "navigate",
            Self::Insert { .. } => "insert",
            Self::Delete { .. } => "delete",
            Self::Move { .. } => "move",
            Self::Reload => "reload",
            Self::ReloadPages { .. } => "reload-pages",
            Self::SetLayouter { .. } => "set-layouter",
        }
    }
}

/// A queued structural request.
pub(crate) struct TransitionRequest {
    pub(crate) kind: TransitionKind,
    pub(crate) animated: bool,
    /// Completions to fire at settle. Grows past one entry when queued
    /// navigates are superseded and fold their callbacks in.
    pub(crate) completions: Vec<Completion>,
}

impl TransitionRequest {
    pub(crate) fn new(
        kind: TransitionKind,
        animated: bool,
        completion: Option<Completion>,
    ) -> Self {
        Self {
            kind,
            animated,
            completions: completion.into_iter().collect(),
        }
    }
}

/// Componentwise interpolation used by transition tweens.
pub(crate) trait Lerp: Copy {
    fn lerp_to(self, target: Self, t: f32) -> Self;
}

impl Lerp for Point {
    fn lerp_to(self, target: Self, t: f32) -> Self {
        self.lerp(target, t)
    }
}

impl Lerp for Rect {
    fn lerp_to(self, target: Self, t: f32) -> Self {
        self.lerp(target, t)
    }
}

/// Start and target of one interpolated value.
pub(crate) struct Tween<T> {
    start: T,
    target: T,
}

impl<T: Lerp> Tween<T> {
    pub(crate) fn new(start: T, target: T) -> Self {
        Self { start, target }
    }

    /// Value at eased progress `p` in [0, 1].
    pub(crate) fn at(&self, p: f32) -> T {
        self.start.lerp_to(self.target, p)
    }

    pub(crate) fn target(&self) -> T {
        self.target
    }
}

/// Values sampled from the active transition for one tick.
pub(crate) struct TransitionSample {
    pub(crate) offset: Point,
    pub(crate) frames: Vec<(PageIndex, Rect)>,
    pub(crate) finished: bool,
}

/// The one transition currently in flight.
///
/// Holds everything the settle sequence needs that is not derivable from
/// the registry: interpolation state, the easing snapshot taken when the
/// transition began, departing units awaiting their hide notification, and
/// the page that becomes current at settle.
pub(crate) struct ActiveTransition<U> {
    pub(crate) kind_name: &'static str,
    pub(crate) offset: Tween<Point>,
    pub(crate) frames: Vec<(PageIndex, Tween<Rect>)>,
    pub(crate) duration: Duration,
    pub(crate) elapsed: Duration,
    pub(crate) easing: Rc<dyn Easing>,
    pub(crate) completions: Vec<Completion>,
    /// Units evicted by the mutation phase, released (hide, then pool)
    /// only once the visual change has settled.
    pub(crate) departing: Vec<Evicted<U>>,
    /// Page that becomes current when this transition settles, when the
    /// request names one (navigate, focused layouter swap).
    pub(crate) settle_focus: Option<PageIndex>,
}

impl<U> ActiveTransition<U> {
    /// Advance time by `dt` and sample interpolated values.
    ///
    /// Progress is clamped: once `elapsed` reaches `duration` the sample
    /// reports the exact targets and `finished`.
    pub(crate) fn advance(&mut self, dt: Duration) -> TransitionSample {
        self.elapsed = self.elapsed.saturating_add(dt);
        let finished = self.elapsed >= self.duration || self.duration.is_zero();
        let progress = if finished {
            1.0
        } else {
            self.easing
                .progress(self.elapsed.as_secs_f32() / self.duration.as_secs_f32())
        };
        TransitionSample {
            offset: self.offset.at(progress),
            frames: self
                .frames
                .iter()
                .map(|(index, tween)| (*index, tween.at(progress)))
                .collect(),
            finished,
        }
    }

    /// The offset this transition is heading for.
    #[allow(dead_code)]
    pub(crate) fn target_offset(&self) -> Point {
        self.offset.target()
    }
}

/// Serializes structural requests: one active, the rest pending.
pub(crate) struct TransitionScheduler<U> {
    pending: VecDeque<TransitionRequest>,
    active: Option<ActiveTransition<U>>,
}

impl<U> TransitionScheduler<U> {
    pub(crate) fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            active: None,
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub(crate) fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Queue a request behind the active transition.
    ///
    /// A navigate replaces any navigate already queued, inheriting its
    /// completions ahead of its own so superseded callbacks fire first.
    pub(crate) fn enqueue(&mut self, mut request: TransitionRequest) {
        if matches!(request.kind, TransitionKind::Navigate { .. }) {
            if let Some(position) = self
                .pending
                .iter()
                .position(|queued| matches!(queued.kind, TransitionKind::Navigate { .. }))
            {
                let superseded = self
                    .pending
                    .remove(position)
                    .map(|queued| queued.completions)
                    .unwrap_or_default();
                let own = std::mem::replace(&mut request.completions, superseded);
                request.completions.extend(own);
            }
        }
        self.pending.push_back(request);
    }

    pub(crate) fn pop_pending(&mut self) -> Option<TransitionRequest> {
        self.pending.pop_front()
    }

    /// Shift the target of every queued navigate through `remap` so it
    /// keeps naming the same logical page across an index mutation.
    pub(crate) fn retarget_navigates(&mut self, remap: impl Fn(PageIndex) -> PageIndex) {
        for request in self.pending.iter_mut() {
            if let TransitionKind::Navigate { target } = &mut request.kind {
                *target = remap(*target);
            }
        }
    }

    pub(crate) fn activate(&mut self, transition: ActiveTransition<U>) {
        self.active = Some(transition);
    }

    pub(crate) fn active_mut(&mut self) -> Option<&mut ActiveTransition<U>> {
        self.active.as_mut()
    }

    pub(crate) fn take_active(&mut self) -> Option<ActiveTransition<U>> {
        self.active.take()
    }
}

impl<U> Default for TransitionScheduler<U> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Curve;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn navigate(target: usize, log: &Rc<RefCell<Vec<usize>>>, tag: usize) -> TransitionRequest {
        let sink = Rc::clone(log);
        TransitionRequest::new(
            TransitionKind::Navigate {
                target: PageIndex::new(target),
            },
            false,
            Some(Box::new(move || sink.borrow_mut().push(tag))),
        )
    }

    mod queue {
        use super::*;

        #[test]
        fn requests_pop_in_fifo_order() {
            let mut scheduler: TransitionScheduler<()> = TransitionScheduler::new();
            scheduler.enqueue(TransitionRequest::new(TransitionKind::Reload, false, None));
            scheduler.enqueue(TransitionRequest::new(
                TransitionKind::Delete {
                    indexes: [PageIndex::new(0)].into_iter().collect(),
                },
                false,
                None,
            ));

            assert_eq!(scheduler.pop_pending().unwrap().kind.name(), "reload");
            assert_eq!(scheduler.pop_pending().unwrap().kind.name(), "delete");
            assert!(scheduler.pop_pending().is_none());
        }

        #[test]
        fn later_navigate_supersedes_queued_navigate() {
            let log = Rc::new(RefCell::new(Vec::new()));
            let mut scheduler: TransitionScheduler<()> = TransitionScheduler::new();
            scheduler.enqueue(navigate(1, &log, 1));
            scheduler.enqueue(navigate(4, &log, 4));

            let survivor = scheduler.pop_pending().unwrap();
            assert!(scheduler.pop_pending().is_none());
            match survivor.kind {
                TransitionKind::Navigate { target } => assert_eq!(target.get(), 4),
                _ => panic!("expected navigate"),
            }

            // Both completions survive, superseded one first.
            for completion in survivor.completions {
                completion();
            }
            assert_eq!(log.borrow().as_slice(), &[1, 4]);
        }

        #[test]
        fn supersession_skips_non_navigate_requests() {
            let log = Rc::new(RefCell::new(Vec::new()));
            let mut scheduler: TransitionScheduler<()> = TransitionScheduler::new();
            scheduler.enqueue(navigate(1, &log, 1));
            scheduler.enqueue(TransitionRequest::new(TransitionKind::Reload, false, None));
            scheduler.enqueue(navigate(4, &log, 4));

            // Reload keeps its place; the surviving navigate sits behind it.
            assert_eq!(scheduler.pop_pending().unwrap().kind.name(), "reload");
            let survivor = scheduler.pop_pending().unwrap();
            assert_eq!(survivor.completions.len(), 2);
        }

        #[test]
        fn retarget_shifts_queued_navigate_targets() {
            let log = Rc::new(RefCell::new(Vec::new()));
            let mut scheduler: TransitionScheduler<()> = TransitionScheduler::new();
            scheduler.enqueue(navigate(2, &log, 2));

            scheduler.retarget_navigates(|target| PageIndex::new(target.get() + 1));

            match scheduler.pop_pending().unwrap().kind {
                TransitionKind::Navigate { target } => assert_eq!(target.get(), 3),
                _ => panic!("expected navigate"),
            }
        }
    }

    mod sampling {
        use super::*;

        fn active(duration_ms: u64) -> ActiveTransition<()> {
            ActiveTransition {
                kind_name: "navigate",
                offset: Tween::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0)),
                frames: vec![(
                    PageIndex::new(0),
                    Tween::new(Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(50.0, 0.0, 10.0, 10.0)),
                )],
                duration: Duration::from_millis(duration_ms),
                elapsed: Duration::ZERO,
                easing: Rc::new(Curve::Linear),
                completions: Vec::new(),
                departing: Vec::new(),
                settle_focus: None,
            }
        }

        #[test]
        fn linear_sampling_tracks_elapsed_share() {
            let mut transition = active(100);
            let sample = transition.advance(Duration::from_millis(25));
            assert!(!sample.finished);
            assert!((sample.offset.x - 25.0).abs() < 1e-4);
            assert!((sample.frames[0].1.x - 12.5).abs() < 1e-4);
        }

        #[test]
        fn reaching_duration_reports_exact_targets() {
            let mut transition = active(100);
            transition.advance(Duration::from_millis(60));
            let sample = transition.advance(Duration::from_millis(40));
            assert!(sample.finished);
            assert_eq!(sample.offset, Point::new(100.0, 0.0));
            assert_eq!(sample.frames[0].1, Rect::new(50.0, 0.0, 10.0, 10.0));
        }

        #[test]
        fn overshooting_duration_stays_clamped() {
            let mut transition = active(100);
            let sample = transition.advance(Duration::from_millis(250));
            assert!(sample.finished);
            assert_eq!(sample.offset, Point::new(100.0, 0.0));
        }

        #[test]
        fn zero_duration_finishes_immediately() {
            let mut transition = active(0);
            let sample = transition.advance(Duration::ZERO);
            assert!(sample.finished);
            assert_eq!(sample.offset, Point::new(100.0, 0.0));
        }

        #[test]
        fn eased_sampling_uses_the_snapshot_curve() {
            let mut transition = active(100);
            transition.easing = Rc::new(Curve::QuadIn);
            let sample = transition.advance(Duration::from_millis(50));
            // Quadratic ease-in at t = 0.5 gives 0.25 of the distance.
            assert!((sample.offset.x - 25.0).abs() < 1e-4);
        }
    }
}
