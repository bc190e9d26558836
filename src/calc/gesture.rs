//! Pointer gesture classification for the slot grid.
//!
//! A press arms a long-press timer. Releasing before it fires is a tap (one toggle);
//! letting it fire starts a drag that paints every entered cell with the inverse of
//! the origin cell's state. Timers are requested as [`Effect`]s so the reducer never
//! touches a clock.

use std::time::Duration;

use crate::calc::week::DAYS_PER_WEEK;
use crate::data::slot_key::SLOTS_PER_DAY;

pub const LONG_PRESS: Duration = Duration::from_millis(500);
pub const RELEASE_GRACE: Duration = Duration::from_millis(50);

/// A grid coordinate already validated against the 7×14 grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    day: usize,
    slot: usize,
}

impl Cell {
    pub fn new(day: usize, slot: usize) -> Option<Cell> {
        if day < DAYS_PER_WEEK && slot < SLOTS_PER_DAY {
            Some(Cell { day, slot })
        } else {
            None
        }
    }

    pub fn day(&self) -> usize {
        self.day
    }

    pub fn slot(&self) -> usize {
        self.slot
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerKind {
    LongPress,
    ReleaseGrace,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureEvent {
    Press(Cell),
    Enter(Cell),
    Release,
    /// A click already resolved by the host. Hosts that report press/release
    /// pairs do not need to send this.
    Tap(Cell),
    TimerFired(TimerKind),
    Teardown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    Toggle(Cell),
    SetPresence(Cell, bool),
    StartTimer(TimerKind, Duration),
    CancelTimer(TimerKind),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    /// Waiting for the long-press timer. `moved` records whether the pointer left
    /// the origin cell, which turns the eventual release into a no-op.
    Armed { origin: Cell, moved: bool },
    Dragging { paint: bool },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GestureConfig {
    pub long_press: Duration,
    pub release_grace: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        GestureConfig {
            long_press: LONG_PRESS,
            release_grace: RELEASE_GRACE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Gesture {
    state: GestureState,
    /// Set when a long press activates and held until the grace timer after release
    /// fires. Taps arriving meanwhile belong to the drag's own release.
    long_press_latched: bool,
    config: GestureConfig,
}

impl Gesture {
    pub fn new(config: GestureConfig) -> Self {
        Gesture {
            config,
            ..Gesture::default()
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    pub fn long_press_latched(&self) -> bool {
        self.long_press_latched
    }

    /// Advances the machine by one event. `is_selected` is consulted only when a
    /// long press activates, to derive the paint value from the origin cell.
    pub fn reduce(
        self,
        event: GestureEvent,
        is_selected: impl Fn(Cell) -> bool,
    ) -> (Gesture, Vec<Effect>) {
        let mut next = self;
        let mut effects = Vec::new();

        match (self.state, event) {
            (_, GestureEvent::Teardown) => {
                next.state = GestureState::Idle;
                next.long_press_latched = false;
                effects.push(Effect::CancelTimer(TimerKind::LongPress));
                effects.push(Effect::CancelTimer(TimerKind::ReleaseGrace));
            }

            (_, GestureEvent::TimerFired(TimerKind::ReleaseGrace)) => {
                if !self.is_dragging() {
                    next.long_press_latched = false;
                }
            }

            (GestureState::Idle, GestureEvent::Press(cell)) => {
                next.state = GestureState::Armed {
                    origin: cell,
                    moved: false,
                };
                effects.push(Effect::StartTimer(
                    TimerKind::LongPress,
                    self.config.long_press,
                ));
            }
            (GestureState::Idle, GestureEvent::Tap(cell)) => {
                if !self.long_press_latched {
                    effects.push(Effect::Toggle(cell));
                }
            }

            (GestureState::Armed { .. }, GestureEvent::Press(cell)) => {
                effects.push(Effect::CancelTimer(TimerKind::LongPress));
                next.state = GestureState::Armed {
                    origin: cell,
                    moved: false,
                };
                effects.push(Effect::StartTimer(
                    TimerKind::LongPress,
                    self.config.long_press,
                ));
            }
            (GestureState::Armed { origin, moved }, GestureEvent::Enter(cell)) => {
                next.state = GestureState::Armed {
                    origin,
                    moved: moved || cell != origin,
                };
            }
            (GestureState::Armed { origin, moved }, GestureEvent::Release) => {
                next.state = GestureState::Idle;
                effects.push(Effect::CancelTimer(TimerKind::LongPress));
                if !moved && !self.long_press_latched {
                    effects.push(Effect::Toggle(origin));
                }
            }
            (GestureState::Armed { origin, .. }, GestureEvent::TimerFired(TimerKind::LongPress)) => {
                let paint = !is_selected(origin);
                next.state = GestureState::Dragging { paint };
                next.long_press_latched = true;
                effects.push(Effect::CancelTimer(TimerKind::ReleaseGrace));
                effects.push(Effect::SetPresence(origin, paint));
            }

            (GestureState::Dragging { paint }, GestureEvent::Enter(cell)) => {
                effects.push(Effect::SetPresence(cell, paint));
            }
            (GestureState::Dragging { .. }, GestureEvent::Release) => {
                next.state = GestureState::Idle;
                effects.push(Effect::CancelTimer(TimerKind::LongPress));
                effects.push(Effect::StartTimer(
                    TimerKind::ReleaseGrace,
                    self.config.release_grace,
                ));
            }

            // Everything else has no transition from the current state.
            _ => {}
        }

        (next, effects)
    }
}
