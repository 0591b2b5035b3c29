//! Property-based tests for page bookkeeping consistency.
//!
//! The controller is driven with arbitrary operation sequences while the
//! backing label vector plays the role of the host collection. The host
//! mutates its vector first, then notifies the controller, exactly as a
//! real embedding would.
//!
//! Properties under test:
//! - Every loaded page holds the content its index names in the source,
//!   after any settled sequence of inserts, deletes, moves and reloads.
//! - The viewport offset never leaves the scrollable range.
//! - Show and hide notifications alternate per unit and replay to the
//!   set the controller reports visible.
//! - A paging snap always lands the viewport on a page origin.
//! - Queued animated transitions drain under ticking and land on the
//!   last requested target.

use crate::controller::PageController;
use crate::geometry::Point;
use crate::test_harness::{record_events, LabelSource, Recorded};
use crate::types::PageIndex;
use proptest::prelude::*;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;
use std::time::Duration;

// ===== Arbitrary Strategies =====

/// One host-driven operation. Index seeds are raw; they are reduced
/// modulo the live page count when the operation is applied, so every
/// generated sequence is valid against whatever count it finds.
#[derive(Debug, Clone, Copy)]
enum DeckOp {
    Navigate(usize),
    Scroll(f32),
    Rest,
    Insert(usize),
    Delete(usize),
    Move(usize, usize),
    RefreshPage(usize),
}

fn arb_op() -> impl Strategy<Value = DeckOp> {
    prop_oneof![
        (0usize..16).prop_map(DeckOp::Navigate),
        (0.0f32..1.0).prop_map(DeckOp::Scroll),
        Just(DeckOp::Rest),
        (0usize..16).prop_map(DeckOp::Insert),
        (0usize..16).prop_map(DeckOp::Delete),
        ((0usize..16), (0usize..16)).prop_map(|(from, to)| DeckOp::Move(from, to)),
        (0usize..16).prop_map(DeckOp::RefreshPage),
    ]
}

fn arb_op_sequence(max_ops: usize) -> impl Strategy<Value = Vec<DeckOp>> {
    prop::collection::vec(arb_op(), 1..=max_ops)
}

// ===== Harness =====

/// Controller over `count` distinct labels on the standard 100x100
/// linear fixture.
fn deck_controller(count: usize) -> (PageController<String>, Rc<RefCell<LabelSource>>) {
    let labels: Vec<String> = (0..count).map(|i| format!("pg-{i}")).collect();
    let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
    crate::test_harness::linear_controller(&refs)
}

fn single(index: usize) -> BTreeSet<PageIndex> {
    [PageIndex::new(index)].into_iter().collect()
}

/// Apply one operation, mutating the host labels before notifying the
/// controller. Operations that need a page skip silently on an empty
/// collection, mirroring a host that has nothing to act on.
fn apply_op(
    op: DeckOp,
    controller: &mut PageController<String>,
    source: &Rc<RefCell<LabelSource>>,
    fresh_serial: &mut usize,
) {
    let count = controller.page_count();
    match op {
        DeckOp::Navigate(seed) => {
            if count == 0 {
                return;
            }
            controller
                .navigate_to(PageIndex::new(seed % count), false, None)
                .expect("reduced target is in range");
        }
        DeckOp::Scroll(fraction) => {
            let content = controller.content_size();
            controller.scroll_to(Point::new(content.width * fraction, 0.0));
        }
        DeckOp::Rest => controller.scroll_rested(),
        DeckOp::Insert(seed) => {
            let at = seed % (count + 1);
            let label = format!("ins-{}", *fresh_serial);
            *fresh_serial += 1;
            source.borrow_mut().labels.insert(at, label);
            controller
                .insert_pages(single(at), false, None)
                .expect("position is in the grown range");
        }
        DeckOp::Delete(seed) => {
            if count == 0 {
                return;
            }
            let at = seed % count;
            source.borrow_mut().labels.remove(at);
            controller
                .delete_pages(single(at), false, None)
                .expect("position is in range");
        }
        DeckOp::Move(from_seed, to_seed) => {
            if count == 0 {
                return;
            }
            let from = from_seed % count;
            let to = to_seed % count;
            let label = source.borrow_mut().labels.remove(from);
            source.borrow_mut().labels.insert(to, label);
            controller
                .move_page(PageIndex::new(from), PageIndex::new(to), false, None)
                .expect("both positions are in range");
        }
        DeckOp::RefreshPage(seed) => {
            if count == 0 {
                return;
            }
            controller
                .reload_pages(single(seed % count), false, None)
                .expect("position is in range");
        }
    }
}

// ===== Invariant checks =====

/// Every loaded page holds the content its index names in the source,
/// the current page is in range, and fractions stay inside the unit
/// interval.
fn check_correspondence(
    controller: &PageController<String>,
    source: &Rc<RefCell<LabelSource>>,
) -> Result<(), TestCaseError> {
    let labels = source.borrow().labels.clone();
    prop_assert_eq!(controller.page_count(), labels.len());

    for (index, unit) in controller.loaded_pages() {
        prop_assert_eq!(
            Some(unit),
            labels.get(index.get()),
            "page {} holds stale content",
            index.get()
        );
        let fraction = controller.visible_percentage_at(index);
        prop_assert!(
            (0.0..=1.0).contains(&fraction),
            "page {} fraction {} outside the unit interval",
            index.get(),
            fraction
        );
    }

    if !labels.is_empty() {
        prop_assert!(controller.current_page().get() < labels.len());
    }
    Ok(())
}

/// The offset never leaves the scrollable range of the content.
fn check_offset_clamped(controller: &PageController<String>) -> Result<(), TestCaseError> {
    let offset = controller.offset();
    let content = controller.content_size();
    let max_x = (content.width - 100.0).max(0.0);
    let max_y = (content.height - 100.0).max(0.0);
    prop_assert!(offset.x >= 0.0 && offset.x <= max_x + 0.001, "x {} escaped", offset.x);
    prop_assert!(offset.y >= 0.0 && offset.y <= max_y + 0.001, "y {} escaped", offset.y);
    Ok(())
}

// ===== Property Tests =====

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Loaded content tracks the host vector through arbitrary settled
    /// sequences. Shifted pages keep their units; remapped indices line
    /// up with the vector after every remove and reinsert.
    #[test]
    fn content_correspondence_survives_arbitrary_sequences(
        count in 0usize..=10,
        ops in arb_op_sequence(16),
    ) {
        let (mut controller, source) = deck_controller(count);
        let mut serial = 0usize;

        for op in ops {
            apply_op(op, &mut controller, &source, &mut serial);
            check_correspondence(&controller, &source)?;
            check_offset_clamped(&controller)?;
        }
    }

    /// Show and hide notifications alternate per unit, and replaying the
    /// log reconstructs exactly the set the controller reports visible.
    #[test]
    fn show_hide_notifications_pair_up(
        count in 1usize..=10,
        ops in arb_op_sequence(12),
    ) {
        let (mut controller, source) = deck_controller(count);
        let log = record_events(&mut controller);
        let mut serial = 0usize;

        for op in ops {
            apply_op(op, &mut controller, &source, &mut serial);
        }

        let mut replayed: BTreeSet<String> = BTreeSet::new();
        for event in log.borrow().iter() {
            match event {
                Recorded::Shown(label, _) => {
                    prop_assert!(
                        replayed.insert(label.clone()),
                        "{} shown while already visible",
                        label
                    );
                }
                Recorded::Hidden(label, _) => {
                    prop_assert!(
                        replayed.remove(label),
                        "{} hidden while not visible",
                        label
                    );
                }
                _ => {}
            }
        }

        let now_visible: BTreeSet<String> =
            controller.visible_units().into_iter().cloned().collect();
        prop_assert_eq!(replayed, now_visible);
    }

    /// With paging enabled, coming to rest parks the viewport on the
    /// current page's origin, clamped to the content edge.
    #[test]
    fn rest_with_paging_lands_on_a_page_origin(
        count in 1usize..=10,
        fraction in 0.0f32..1.0,
        continuous in any::<bool>(),
    ) {
        let (mut controller, _source) = deck_controller(count);
        controller.set_continuous_navigation_enabled(continuous);

        let content = controller.content_size();
        controller.scroll_to(Point::new(content.width * fraction, 0.0));
        controller.scroll_rested();

        let current = controller.current_page();
        let frame = controller
            .frame_for_page(current)
            .expect("the current page is loaded after rest");
        let max_x = (content.width - 100.0).max(0.0);
        let expected = frame.x.clamp(0.0, max_x);
        prop_assert!(
            (controller.offset().x - expected).abs() < 0.5,
            "offset {} did not park on page {} at {}",
            controller.offset().x,
            current.get(),
            expected
        );
    }

    /// The current page keeps its content across inserts anywhere in the
    /// collection; positions shift underneath it without disturbing what
    /// the reader is looking at.
    #[test]
    fn inserts_never_disturb_the_current_unit(
        count in 2usize..=8,
        navigate_seed in 0usize..8,
        inserts in prop::collection::vec(0usize..8, 1..=5),
    ) {
        let (mut controller, source) = deck_controller(count);
        controller
            .navigate_to(PageIndex::new(navigate_seed % count), false, None)
            .expect("reduced target is in range");
        let before = controller
            .unit_for_page(controller.current_page())
            .cloned()
            .expect("current page is loaded");

        for (serial, seed) in inserts.into_iter().enumerate() {
            let at = seed % (controller.page_count() + 1);
            source.borrow_mut().labels.insert(at, format!("ins-{serial}"));
            controller
                .insert_pages(single(at), false, None)
                .expect("position is in the grown range");
        }

        let after = controller
            .unit_for_page(controller.current_page())
            .cloned()
            .expect("current page is loaded");
        prop_assert_eq!(before, after);
    }

    /// Deleting the current page lands on its successor, or on the new
    /// last page when the deleted page was the last.
    #[test]
    fn deleting_the_current_page_falls_to_its_successor(
        count in 2usize..=8,
        navigate_seed in 0usize..8,
    ) {
        let (mut controller, source) = deck_controller(count);
        let start = navigate_seed % count;
        controller
            .navigate_to(PageIndex::new(start), false, None)
            .expect("reduced target is in range");

        let successor = source.borrow().labels.get(start + 1).cloned();
        source.borrow_mut().labels.remove(start);
        controller
            .delete_pages(single(start), false, None)
            .expect("position is in range");

        let landed = controller.unit_for_page(controller.current_page()).cloned();
        match successor {
            Some(label) => {
                prop_assert_eq!(controller.current_page().get(), start);
                prop_assert_eq!(landed, Some(label));
            }
            None => {
                prop_assert_eq!(controller.current_page().get(), count - 2);
                prop_assert_eq!(landed, source.borrow().labels.last().cloned());
            }
        }
    }

    /// A burst of animated navigates drains under ticking. Queued
    /// requests supersede each other, so the controller lands on the
    /// last target and never on an intermediate one.
    #[test]
    fn animated_navigate_bursts_settle_on_the_last_target(
        count in 1usize..=8,
        targets in prop::collection::vec(0usize..8, 1..=4),
    ) {
        let (mut controller, source) = deck_controller(count);
        for seed in &targets {
            controller
                .navigate_to(PageIndex::new(seed % count), true, None)
                .expect("reduced target is in range");
        }

        for _ in 0..40 {
            if !controller.is_transitioning() {
                break;
            }
            controller.tick(Duration::from_millis(25));
        }

        prop_assert!(!controller.is_transitioning(), "transition queue never drained");
        let expected = targets.last().map_or(0, |seed| seed % count);
        prop_assert_eq!(controller.current_page().get(), expected);
        check_correspondence(&controller, &source)?;
    }
}
