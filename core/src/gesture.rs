use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::*;

bitflags! {
    /// Pointer-button state as reported by the host, same bit layout as the
    /// DOM `buttons` field.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Buttons: u16 {
        const LEFT    = 1;
        const RIGHT   = 1 << 1;
        const MIDDLE  = 1 << 2;
        const BACK    = 1 << 3;
        const FORWARD = 1 << 4;
    }
}

/// High-level signal produced by the adapter, addressed to the cell the
/// chord started on. `Start` maps to [`Game::chord_start`](crate::Game::chord_start),
/// `End` to [`Game::chord_end`](crate::Game::chord_end).
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GestureEvent {
    Start(Coord2),
    End(Coord2),
}

/// Translates raw per-cell pointer updates into chord start/end signals.
///
/// `Start` fires the instant every button in the mask is down over a cell and
/// is idempotent while the chord is held; `End` fires when the condition
/// lapses, the pointer leaves, or the host cancels. While a chord is active
/// the host must route clicks through [`is_active`](Self::is_active) and
/// suppress ordinary activation.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChordGesture {
    mask: Buttons,
    active: Option<Coord2>,
}

impl Default for ChordGesture {
    fn default() -> Self {
        Self::new(Buttons::LEFT | Buttons::RIGHT)
    }
}

impl ChordGesture {
    pub fn new(mask: Buttons) -> Self {
        Self { mask, active: None }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn pointer_update(&mut self, coords: Coord2, buttons: Buttons) -> Option<GestureEvent> {
        let held = buttons & self.mask == self.mask;
        match (self.active, held) {
            (None, true) => {
                self.active = Some(coords);
                log::trace!("chord start at {coords:?}");
                Some(GestureEvent::Start(coords))
            }
            // chord stays anchored to the cell it started on
            (Some(_), true) => None,
            (Some(start), false) => {
                self.active = None;
                log::trace!("chord end at {start:?}");
                Some(GestureEvent::End(start))
            }
            (None, false) => None,
        }
    }

    /// Mandatory end on pointer leave.
    pub fn pointer_leave(&mut self) -> Option<GestureEvent> {
        self.active.take().map(GestureEvent::End)
    }

    /// Mandatory end on pointer cancellation.
    pub fn pointer_cancel(&mut self) -> Option<GestureEvent> {
        self.pointer_leave()
    }
}
