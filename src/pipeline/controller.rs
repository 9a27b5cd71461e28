//! Layout controller — epochs and the settle protocol.
//!
//! [`Masonry`] orchestrates the two placement strategies behind a pair of
//! output signals:
//!
//! ```text
//! Unmeasured → RoundRobinShown → Settling → Balanced
//!                    └──────── (sequential mode: terminal) ────────┘
//! ```
//!
//! On every change to the item sequence or resolved configuration the
//! controller synchronously publishes a round-robin layout — something
//! always renders without waiting on measurement — then attempts the
//! measurement-gated balanced layout. If any item is not yet measurable,
//! a retry is scheduled 100ms out and re-attempted on each [`Masonry::tick`]
//! until the gate opens. There is no retry ceiling; a permanently
//! unmeasurable item set keeps the controller Settling (callers needing a
//! ceiling can watch [`Masonry::pending_retry_at`]).
//!
//! # Epochs
//!
//! One epoch spans a fixed (item sequence, resolved config) pair. Any
//! change to either starts a new epoch: the pending retry is cancelled,
//! measurement handles are rebuilt, and the protocol restarts at
//! RoundRobinShown. A retry deadline is stamped with its epoch and checked
//! again when it fires, so a stale retry can never publish a layout for
//! data that is no longer current.
//!
//! # Scheduling
//!
//! Single-threaded and cooperative: every entry point runs to completion,
//! and retry timing is driven by the host loop calling [`Masonry::tick`]
//! (or [`Masonry::tick_at`] with an explicit clock). No locks, no threads.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::{Duration, Instant};

use spark_signals::{signal, Signal};

use crate::columns::{assign_balanced, assign_round_robin};
use crate::measure::{collect_heights, HandleRegistry, MeasureFn};
use crate::types::{ChangeFlags, Layout, MasonryOptions, ResolvedConfig};

/// Fixed delay between balanced-placement attempts while Settling.
pub const RETRY_INTERVAL: Duration = Duration::from_millis(100);

// =============================================================================
// Controller state
// =============================================================================

/// A retry scheduled while Settling, stamped with the epoch that scheduled
/// it.
#[derive(Debug, Clone, Copy)]
struct PendingRetry {
    epoch: u64,
    due: Instant,
}

struct MasonryState<T> {
    options: MasonryOptions,
    measure: MeasureFn,
    items: RefCell<Rc<Vec<Option<T>>>>,
    registry: RefCell<HandleRegistry>,
    epoch: Cell<u64>,
    config: Cell<ResolvedConfig>,
    pending: Cell<Option<PendingRetry>>,
    layout: Signal<Layout>,
    distributed: Signal<bool>,
}

/// The layout controller.
///
/// Cheap to clone (shared state); all methods take `&self`. Outputs are
/// the [`Masonry::layout`] and [`Masonry::distributed`] signals — hosts
/// read them inside effects and re-render when they change.
pub struct Masonry<T> {
    state: Rc<MasonryState<T>>,
}

impl<T> Clone for Masonry<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T> Masonry<T> {
    /// Create a controller with the given options and measurement
    /// capability.
    ///
    /// The initial config is the options' defaults; no layout is published
    /// until the first item or config change.
    pub fn new(options: MasonryOptions, measure: MeasureFn) -> Self {
        let config =
            ResolvedConfig::new(options.default_columns, options.default_gutter).normalized();
        Self {
            state: Rc::new(MasonryState {
                options,
                measure,
                items: RefCell::new(Rc::new(Vec::new())),
                registry: RefCell::new(HandleRegistry::new()),
                epoch: Cell::new(0),
                config: Cell::new(config),
                pending: Cell::new(None),
                layout: signal(Layout::default()),
                distributed: signal(false),
            }),
        }
    }

    /// The options this controller was created with.
    pub fn options(&self) -> &MasonryOptions {
        &self.state.options
    }

    /// The published layout signal.
    pub fn layout(&self) -> Signal<Layout> {
        self.state.layout.clone()
    }

    /// The distributed flag signal: true once the current epoch's layout
    /// is height-balanced (or immediately, in sequential mode).
    pub fn distributed(&self) -> Signal<bool> {
        self.state.distributed.clone()
    }

    /// The current epoch's resolved configuration.
    pub fn config(&self) -> ResolvedConfig {
        self.state.config.get()
    }

    /// The current item sequence (shared snapshot; vacant slots are
    /// `None`).
    pub fn items(&self) -> Rc<Vec<Option<T>>> {
        self.state.items.borrow().clone()
    }

    /// The current epoch number. Starts at 0; every item or config change
    /// increments it.
    pub fn epoch(&self) -> u64 {
        self.state.epoch.get()
    }

    /// When the next balanced-placement retry is due, if one is pending.
    pub fn pending_retry_at(&self) -> Option<Instant> {
        self.state.pending.get().map(|pending| pending.due)
    }

    // =========================================================================
    // Entry points
    // =========================================================================

    /// Replace the item sequence and start a new epoch.
    ///
    /// Synchronously publishes a round-robin layout for the new items, then
    /// attempts the balanced layout (or schedules a retry).
    pub fn set_items(&self, items: Vec<Option<T>>) -> ChangeFlags {
        self.set_items_at(items, Instant::now())
    }

    /// [`Masonry::set_items`] with an explicit clock, for deterministic
    /// scheduling in tests and custom hosts.
    pub fn set_items_at(&self, items: Vec<Option<T>>, now: Instant) -> ChangeFlags {
        *self.state.items.borrow_mut() = Rc::new(items);
        ChangeFlags::ITEMS | self.restart_epoch(now)
    }

    /// Apply a resolved configuration.
    ///
    /// A no-op when neither field differs from the current config.
    /// Otherwise starts a new epoch exactly like an item change — a gutter
    /// change invalidates the epoch just as a column-count change does.
    pub fn apply_config(&self, config: ResolvedConfig) -> ChangeFlags {
        self.apply_config_at(config, Instant::now())
    }

    /// [`Masonry::apply_config`] with an explicit clock.
    pub fn apply_config_at(&self, config: ResolvedConfig, now: Instant) -> ChangeFlags {
        let config = config.normalized();
        let previous = self.state.config.get();

        let mut flags = ChangeFlags::NONE;
        if config.columns != previous.columns {
            flags |= ChangeFlags::COLUMNS;
        }
        if config.gutter != previous.gutter {
            flags |= ChangeFlags::GUTTER;
        }
        if flags.is_empty() {
            return flags;
        }

        self.state.config.set(config);
        flags | self.restart_epoch(now)
    }

    /// Process a due retry, if any.
    ///
    /// Call from the host loop. Returns what was published (empty when the
    /// retry is not due yet, stale, or the gate is still closed — in the
    /// latter case the retry is rescheduled another 100ms out).
    pub fn tick(&self) -> ChangeFlags {
        self.tick_at(Instant::now())
    }

    /// [`Masonry::tick`] with an explicit clock.
    pub fn tick_at(&self, now: Instant) -> ChangeFlags {
        let Some(pending) = self.state.pending.get() else {
            return ChangeFlags::NONE;
        };
        if pending.epoch != self.state.epoch.get() {
            // Stale timer from a previous epoch; it must never publish.
            self.state.pending.set(None);
            return ChangeFlags::NONE;
        }
        if now < pending.due {
            return ChangeFlags::NONE;
        }
        self.attempt_balanced(now)
    }

    // =========================================================================
    // Protocol internals
    // =========================================================================

    /// Start a new epoch for the current (items, config) pair.
    ///
    /// Cancels any pending retry, rebuilds measurement handles, publishes
    /// the round-robin layout, and — unless sequential mode is on —
    /// immediately attempts the balanced layout.
    fn restart_epoch(&self, now: Instant) -> ChangeFlags {
        let state = &self.state;

        let epoch = state.epoch.get().wrapping_add(1);
        state.epoch.set(epoch);
        state.pending.set(None);

        let items = state.items.borrow().clone();
        state.registry.borrow_mut().rebuild(&items, epoch);

        let config = state.config.get();
        state.layout.set(assign_round_robin(&items, config.columns));

        if state.options.sequential {
            state.distributed.set(true);
            return ChangeFlags::LAYOUT;
        }

        state.distributed.set(false);
        ChangeFlags::LAYOUT | self.attempt_balanced(now)
    }

    /// One measurement-gated balanced-placement attempt.
    ///
    /// Ready: publish the balanced layout, set the distributed flag, clear
    /// the pending retry (terminal for this epoch). Not ready: schedule the
    /// next retry and leave the round-robin layout in place.
    fn attempt_balanced(&self, now: Instant) -> ChangeFlags {
        let state = &self.state;
        let items = state.items.borrow().clone();

        let heights = {
            let registry = state.registry.borrow();
            collect_heights(registry.handles(), &state.measure, items.len())
        };

        match heights {
            Some(heights) => {
                let config = state.config.get();
                state
                    .layout
                    .set(assign_balanced(&items, &heights, config.columns));
                state.distributed.set(true);
                state.pending.set(None);
                ChangeFlags::LAYOUT | ChangeFlags::DISTRIBUTED
            }
            None => {
                state.pending.set(Some(PendingRetry {
                    epoch: state.epoch.get(),
                    due: now + RETRY_INTERVAL,
                }));
                ChangeFlags::NONE
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Strategy;
    use std::cell::RefCell;
    use std::collections::HashMap;

    type Store = Rc<RefCell<HashMap<usize, f64>>>;

    fn controller_with_store(options: MasonryOptions) -> (Masonry<&'static str>, Store) {
        let store: Store = Rc::new(RefCell::new(HashMap::new()));
        let reader = store.clone();
        let measure: MeasureFn = Rc::new(move |handle| reader.borrow().get(&handle.seq()).copied());
        (Masonry::new(options, measure), store)
    }

    fn cards(count: usize) -> Vec<Option<&'static str>> {
        (0..count).map(|_| Some("card")).collect()
    }

    fn fill(store: &Store, heights: &[f64]) {
        let mut store = store.borrow_mut();
        for (seq, height) in heights.iter().enumerate() {
            store.insert(seq, *height);
        }
    }

    #[test]
    fn test_round_robin_published_synchronously() {
        let (masonry, _store) = controller_with_store(MasonryOptions::default());
        let flags = masonry.set_items(cards(4));

        assert!(flags.contains(ChangeFlags::ITEMS | ChangeFlags::LAYOUT));
        let layout = masonry.layout().get();
        assert_eq!(layout.strategy, Strategy::RoundRobin);
        assert_eq!(layout.item_count(), 4);
        assert!(!masonry.distributed().get());
        assert!(masonry.pending_retry_at().is_some());
    }

    #[test]
    fn test_balances_immediately_when_ready() {
        let (masonry, store) = controller_with_store(MasonryOptions::default());
        fill(&store, &[50.0, 10.0, 10.0, 10.0]);

        let flags = masonry.set_items(cards(4));
        assert!(flags.contains(ChangeFlags::DISTRIBUTED));

        let layout = masonry.layout().get();
        assert_eq!(layout.strategy, Strategy::Balanced);
        assert!(masonry.distributed().get());
        assert!(masonry.pending_retry_at().is_none());
    }

    #[test]
    fn test_retry_loop_until_ready() {
        let (masonry, store) = controller_with_store(MasonryOptions::default());
        let t0 = Instant::now();
        masonry.set_items_at(cards(3), t0);

        // Not due yet.
        assert_eq!(masonry.tick_at(t0 + Duration::from_millis(50)), ChangeFlags::NONE);

        // Due but still unmeasurable: reschedule, stay round-robin.
        assert_eq!(masonry.tick_at(t0 + RETRY_INTERVAL), ChangeFlags::NONE);
        assert_eq!(masonry.layout().get().strategy, Strategy::RoundRobin);
        let due = masonry.pending_retry_at().unwrap();
        assert_eq!(due, t0 + RETRY_INTERVAL + RETRY_INTERVAL);

        // Several more dry intervals: the loop keeps going.
        assert_eq!(masonry.tick_at(due), ChangeFlags::NONE);
        assert!(masonry.pending_retry_at().is_some());

        // Heights appear; the next due tick settles.
        fill(&store, &[10.0, 20.0, 30.0]);
        let due = masonry.pending_retry_at().unwrap();
        let flags = masonry.tick_at(due);
        assert!(flags.contains(ChangeFlags::LAYOUT | ChangeFlags::DISTRIBUTED));
        assert_eq!(masonry.layout().get().strategy, Strategy::Balanced);
        assert!(masonry.distributed().get());
        assert!(masonry.pending_retry_at().is_none());
    }

    #[test]
    fn test_item_change_cancels_stale_retry() {
        let (masonry, store) = controller_with_store(MasonryOptions::default());
        let t0 = Instant::now();
        masonry.set_items_at(cards(5), t0);
        assert!(masonry.pending_retry_at().is_some());

        // New epoch while Settling: the old retry must be gone and the new
        // round-robin layout must cover the new sequence.
        masonry.set_items_at(cards(2), t0 + Duration::from_millis(10));
        fill(&store, &[10.0, 20.0, 30.0, 40.0, 50.0]);

        let due = masonry.pending_retry_at().unwrap();
        masonry.tick_at(due);

        let layout = masonry.layout().get();
        assert_eq!(layout.item_count(), 2);
        assert_eq!(layout.strategy, Strategy::Balanced);
    }

    #[test]
    fn test_config_change_restarts_epoch() {
        let (masonry, store) = controller_with_store(MasonryOptions::default());
        fill(&store, &[10.0, 10.0, 10.0]);
        masonry.set_items(cards(3));
        assert!(masonry.distributed().get());
        let epoch = masonry.epoch();

        let flags = masonry.apply_config(ResolvedConfig::new(2, 10.0));
        assert!(flags.contains(ChangeFlags::COLUMNS));
        assert_eq!(masonry.epoch(), epoch + 1);
        let layout = masonry.layout().get();
        assert_eq!(layout.column_count(), 2);
        // Ready store: the new epoch settles immediately.
        assert_eq!(layout.strategy, Strategy::Balanced);
        assert_eq!(layout.columns, vec![vec![0, 2], vec![1]]);
    }

    #[test]
    fn test_gutter_only_change_restarts_epoch() {
        let (masonry, store) = controller_with_store(MasonryOptions::default());
        fill(&store, &[10.0, 10.0]);
        masonry.set_items(cards(2));
        let epoch = masonry.epoch();

        let flags = masonry.apply_config(ResolvedConfig::new(3, 25.0));
        assert!(flags.contains(ChangeFlags::GUTTER));
        assert!(!flags.contains(ChangeFlags::COLUMNS));
        assert_eq!(masonry.epoch(), epoch + 1);
    }

    #[test]
    fn test_identical_config_is_a_no_op() {
        let (masonry, _store) = controller_with_store(MasonryOptions::default());
        masonry.set_items(cards(2));
        let epoch = masonry.epoch();

        let flags = masonry.apply_config(masonry.config());
        assert_eq!(flags, ChangeFlags::NONE);
        assert_eq!(masonry.epoch(), epoch);
    }

    #[test]
    fn test_sequential_mode_never_settles() {
        let options = MasonryOptions {
            sequential: true,
            ..Default::default()
        };
        let (masonry, store) = controller_with_store(options);
        fill(&store, &[10.0, 20.0, 30.0]);

        masonry.set_items(cards(3));
        assert_eq!(masonry.layout().get().strategy, Strategy::RoundRobin);
        assert!(masonry.distributed().get());
        assert!(masonry.pending_retry_at().is_none());

        // Ticks and config changes keep publishing round-robin only.
        assert_eq!(masonry.tick(), ChangeFlags::NONE);
        masonry.apply_config(ResolvedConfig::new(2, 10.0));
        assert_eq!(masonry.layout().get().strategy, Strategy::RoundRobin);
        assert!(masonry.distributed().get());
    }

    #[test]
    fn test_empty_items_vacuously_ready() {
        let (masonry, _store) = controller_with_store(MasonryOptions::default());
        let flags = masonry.set_items(Vec::new());
        assert!(flags.contains(ChangeFlags::DISTRIBUTED));
        assert!(masonry.layout().get().is_empty());
        assert!(masonry.pending_retry_at().is_none());
    }

    #[test]
    fn test_vacant_slots_skipped() {
        let (masonry, store) = controller_with_store(MasonryOptions::default());
        fill(&store, &[10.0, 0.0, 10.0]);
        store.borrow_mut().remove(&1);

        masonry.set_items(vec![Some("a"), None, Some("b")]);
        let layout = masonry.layout().get();
        assert_eq!(layout.strategy, Strategy::Balanced);
        assert_eq!(layout.item_count(), 2);
        let mut placed: Vec<usize> = layout.columns.iter().flatten().copied().collect();
        placed.sort_unstable();
        assert_eq!(placed, vec![0, 2]);
    }

    #[test]
    fn test_zero_height_keeps_settling() {
        let (masonry, store) = controller_with_store(MasonryOptions::default());
        fill(&store, &[10.0, 0.0]);

        masonry.set_items(cards(2));
        assert_eq!(masonry.layout().get().strategy, Strategy::RoundRobin);
        assert!(masonry.pending_retry_at().is_some());
    }
}
