use std::time::Instant;

use chrono::NaiveDate;
use tracing::{debug, trace};

use crate::calc::gesture::{Cell, Effect, Gesture, GestureConfig, GestureEvent, GestureState};
use crate::calc::range_synth::synthesize;
use crate::calc::timers::Timers;
use crate::calc::week::{DAYS_PER_WEEK, WeekWindow, shift_week};
use crate::data::selection::Selection;
use crate::data::slot_key::{SLOTS_PER_DAY, SlotKey};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlannerError {
    #[error("the schedule text is read-only on this device")]
    NotEditable,
    #[error("no full week around {0} fits in the supported date range")]
    OutOfRange(NaiveDate),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlannerOptions {
    /// Whether the host allows the summary text to be edited by hand.
    pub editable: bool,
    pub gesture: GestureConfig,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        PlannerOptions {
            editable: true,
            gesture: GestureConfig::default(),
        }
    }
}

/// Owns everything the week grid needs: the visible window, the selection, the
/// in-flight gesture and its timers, and the derived summary text.
///
/// Every call that mutates the selection or moves the window regenerates the
/// summary and drops any hand-edited override.
#[derive(Debug)]
pub struct Planner {
    reference: NaiveDate,
    window: WeekWindow,
    selection: Selection,
    gesture: Gesture,
    timers: Timers,
    generated: String,
    text_override: Option<String>,
    editable: bool,
}

impl Planner {
    pub fn new(reference: NaiveDate, options: PlannerOptions) -> Result<Self, PlannerError> {
        let window =
            WeekWindow::containing(reference).ok_or(PlannerError::OutOfRange(reference))?;
        Ok(Planner {
            reference,
            window,
            selection: Selection::new(),
            gesture: Gesture::new(options.gesture),
            timers: Timers::default(),
            generated: String::new(),
            text_override: None,
            editable: options.editable,
        })
    }

    // ── Rendering boundary ───────────────────────────────────────────────────

    pub fn window(&self) -> &WeekWindow {
        &self.window
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn gesture_state(&self) -> GestureState {
        self.gesture.state()
    }

    pub fn editable(&self) -> bool {
        self.editable
    }

    /// The summary to display: the manual override if one is active, else the
    /// generated text.
    pub fn text(&self) -> &str {
        self.text_override.as_deref().unwrap_or(&self.generated)
    }

    pub fn has_override(&self) -> bool {
        self.text_override.is_some()
    }

    /// Whether the cell at `(day, slot)` of the visible week is selected.
    /// Out-of-range coordinates are never selected.
    pub fn is_selected(&self, day: usize, slot: usize) -> bool {
        Cell::new(day, slot).is_some_and(|c| self.cell_selected(c))
    }

    /// Selection state of the visible week, indexed `[day][slot]`.
    pub fn grid(&self) -> [[bool; SLOTS_PER_DAY]; DAYS_PER_WEEK] {
        let mut grid = [[false; SLOTS_PER_DAY]; DAYS_PER_WEEK];
        for key in self.selection.iter() {
            if let Some(day) = self.window.position(key.date()) {
                grid[day][key.slot_index()] = true;
            }
        }
        grid
    }

    pub fn has_pending_timers(&self) -> bool {
        !self.timers.is_empty()
    }

    // ── Pointer input ────────────────────────────────────────────────────────

    /// Each input method returns true when the selection changed.
    pub fn press(&mut self, day: usize, slot: usize, now: Instant) -> bool {
        self.cell_event(day, slot, now, GestureEvent::Press)
    }

    pub fn enter(&mut self, day: usize, slot: usize, now: Instant) -> bool {
        self.cell_event(day, slot, now, GestureEvent::Enter)
    }

    pub fn tap(&mut self, day: usize, slot: usize, now: Instant) -> bool {
        self.cell_event(day, slot, now, GestureEvent::Tap)
    }

    pub fn release(&mut self, now: Instant) -> bool {
        self.dispatch(GestureEvent::Release, now)
    }

    /// Fires every timer whose deadline has passed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for kind in self.timers.take_due(now) {
            trace!(?kind, "timer fired");
            changed |= self.dispatch(GestureEvent::TimerFired(kind), now);
        }
        changed
    }

    /// Abandons any gesture in progress and cancels its timers.
    pub fn teardown(&mut self, now: Instant) {
        self.dispatch(GestureEvent::Teardown, now);
        self.timers.cancel_all();
    }

    // ── Commands ─────────────────────────────────────────────────────────────

    pub fn previous_week(&mut self) -> bool {
        self.shift(-1)
    }

    pub fn next_week(&mut self) -> bool {
        self.shift(1)
    }

    pub fn go_to_today(&mut self, today: NaiveDate) -> bool {
        self.jump_to(today)
    }

    /// Shows the week containing `date`. Selections elsewhere are kept.
    /// Returns false, leaving everything untouched, if that week is out of range.
    pub fn jump_to(&mut self, date: NaiveDate) -> bool {
        let Some(window) = WeekWindow::containing(date) else {
            debug!(%date, "week out of range, window unchanged");
            return false;
        };
        self.reference = date;
        self.window = window;
        debug!(monday = %self.window.monday(), "week window changed");
        self.regenerate();
        true
    }

    /// Clears every selection, in every week.
    pub fn reset(&mut self) {
        self.selection.clear();
        debug!("selection reset");
        self.regenerate();
    }

    /// Replaces the displayed summary until the next selection change.
    pub fn override_text(&mut self, text: impl Into<String>) -> Result<(), PlannerError> {
        if !self.editable {
            return Err(PlannerError::NotEditable);
        }
        self.text_override = Some(text.into());
        Ok(())
    }

    // ── Internals ────────────────────────────────────────────────────────────

    fn shift(&mut self, weeks: i64) -> bool {
        match shift_week(self.reference, weeks) {
            Some(date) => self.jump_to(date),
            None => false,
        }
    }

    fn key_for(&self, cell: Cell) -> Option<SlotKey> {
        let date = self.window.get(cell.day())?;
        SlotKey::new(date, cell.slot()).ok()
    }

    fn cell_selected(&self, cell: Cell) -> bool {
        self.key_for(cell)
            .is_some_and(|key| self.selection.is_selected(&key))
    }

    fn cell_event(
        &mut self,
        day: usize,
        slot: usize,
        now: Instant,
        event: fn(Cell) -> GestureEvent,
    ) -> bool {
        match Cell::new(day, slot) {
            Some(cell) => self.dispatch(event(cell), now),
            None => {
                debug!(day, slot, "ignoring input outside the grid");
                false
            }
        }
    }

    fn dispatch(&mut self, event: GestureEvent, now: Instant) -> bool {
        let before = self.gesture.state();
        let (next, effects) = self.gesture.reduce(event, |c| self.cell_selected(c));
        self.gesture = next;
        if before != next.state() {
            debug!(
                ?event,
                from = ?before,
                to = ?next.state(),
                latched = next.long_press_latched(),
                "gesture transition"
            );
        }

        let mut touched = false;
        for effect in &effects {
            match *effect {
                Effect::Toggle(cell) => {
                    if let Some(key) = self.key_for(cell) {
                        self.selection.toggle(key);
                        touched = true;
                    }
                }
                Effect::SetPresence(cell, present) => {
                    if let Some(key) = self.key_for(cell) {
                        self.selection.set_presence(key, present);
                        touched = true;
                    }
                }
                Effect::StartTimer(..) | Effect::CancelTimer(_) => {
                    self.timers.apply(effect, now);
                }
            }
        }
        if touched {
            self.regenerate();
        }
        touched
    }

    fn regenerate(&mut self) {
        self.generated = synthesize(self.selection.iter());
        self.text_override = None;
    }
}
