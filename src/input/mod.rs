// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Spiralbook Contributors

//! Raw input classification.
//!
//! Turns wheel and pinch events into discrete page-turn commands, with a
//! swipe threshold and a cooldown so a single physical flick never fires
//! twice. Also owns the one-shot auto-flip fallback: if nobody touches
//! the book shortly after first display, one forward turn is issued to
//! show it moves. All timing is injected as millisecond timestamps; the
//! mapper keeps no clock of its own.

/// Magnitude a horizontal wheel delta must exceed to count as a swipe.
const SWIPE_THRESHOLD: f64 = 20.0;
/// Minimum gap between two accepted swipes.
const SWIPE_COOLDOWN_MS: f64 = 800.0;
/// Idle delay after first display before the fallback turn fires.
const AUTO_FLIP_DELAY_MS: f64 = 3000.0;

/// Discrete command produced by classified input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    AdvanceForward,
    AdvanceBackward,
}

/// One wheel event as delivered by the host.
#[derive(Debug, Clone, Copy)]
pub struct WheelInput {
    pub delta_x: f64,
    pub delta_y: f64,
    /// Platform pinch modifier (ctrl on most browsers' pinch-wheel).
    pub pinch_modifier: bool,
}

/// Classifies wheel and pinch input into [`Command`]s.
#[derive(Debug)]
pub struct GestureInputMapper {
    last_accepted_ms: Option<f64>,
    zoom_enabled: bool,
    auto_flip_at_ms: Option<f64>,
}

impl GestureInputMapper {
    /// `now_ms` is the moment the book is first displayed; the auto-flip
    /// fallback arms relative to it.
    pub fn new(now_ms: f64) -> Self {
        Self {
            last_accepted_ms: None,
            zoom_enabled: true,
            auto_flip_at_ms: Some(now_ms + AUTO_FLIP_DELAY_MS),
        }
    }

    /// Classify one wheel event. Vertical-dominant scrolling without a
    /// pinch modifier steals the wheel from zoom for this stream; a
    /// horizontal delta past the threshold becomes a turn command,
    /// subject to the cooldown.
    pub fn on_wheel(&mut self, input: WheelInput, now_ms: f64) -> Option<Command> {
        self.cancel_auto_flip();
        self.zoom_enabled =
            input.pinch_modifier || input.delta_y.abs() <= input.delta_x.abs();

        if let Some(last) = self.last_accepted_ms {
            if now_ms - last < SWIPE_COOLDOWN_MS {
                return None;
            }
        }
        if input.delta_x.abs() <= SWIPE_THRESHOLD {
            return None;
        }
        self.last_accepted_ms = Some(now_ms);
        Some(if input.delta_x > 0.0 {
            Command::AdvanceForward
        } else {
            Command::AdvanceBackward
        })
    }

    /// A native pinch gesture always re-enables zoom.
    pub fn on_pinch_start(&mut self) {
        self.cancel_auto_flip();
        self.zoom_enabled = true;
    }

    pub fn on_pinch_end(&mut self) {
        self.zoom_enabled = true;
    }

    /// Any pointer interaction disarms the auto-flip fallback.
    pub fn on_pointer(&mut self) {
        self.cancel_auto_flip();
    }

    /// Whether the host should let wheel input drive camera zoom.
    pub fn zoom_enabled(&self) -> bool {
        self.zoom_enabled
    }

    /// Fire the one-shot fallback turn once its delay elapses untouched.
    pub fn poll_auto_flip(&mut self, now_ms: f64) -> Option<Command> {
        match self.auto_flip_at_ms {
            Some(at) if now_ms >= at => {
                self.auto_flip_at_ms = None;
                Some(Command::AdvanceForward)
            }
            _ => None,
        }
    }

    fn cancel_auto_flip(&mut self) {
        self.auto_flip_at_ms = None;
    }
}
