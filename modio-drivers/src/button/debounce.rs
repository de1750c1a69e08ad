//! Polled software debounce
//!
//! Each registered pin is sampled on every [`Debouncer::poll`]. A new level
//! only becomes the debounced state once it has been read unchanged for the
//! debounce window; the resulting transition is reported to a
//! [`ButtonEventSink`] together with the context bound at registration.
//!
//! Timestamps are plain millisecond counters supplied by the caller and may
//! wrap.

use heapless::Vec;
use modio_hal::{
    ButtonError, ButtonEvent, ButtonEventSink, ButtonManager, ButtonState, GpioDriver, GpioError,
    IdlePolicy, PinId, PressType, Pull,
};

/// Default debounce window
pub const DEFAULT_DEBOUNCE_MS: u32 = 30;

#[derive(Debug, Clone, Copy)]
struct Entry<C> {
    pin: PinId,
    context: C,
    stable: ButtonState,
    candidate: ButtonState,
    candidate_since: u32,
    pressed_at: u32,
    last_press: PressType,
}

/// Software debounce button manager for up to `N` buttons
pub struct Debouncer<C, const N: usize = 8> {
    entries: Vec<Entry<C>, N>,
    debounce_ms: u32,
    active_low: bool,
}

impl<C: Copy, const N: usize> Default for Debouncer<C, N> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE_MS, true)
    }
}

impl<C: Copy, const N: usize> Debouncer<C, N> {
    /// Create a manager
    ///
    /// With `active_low` a low line reads as pressed and pins are pulled up.
    pub fn new(debounce_ms: u32, active_low: bool) -> Self {
        Self {
            entries: Vec::new(),
            debounce_ms,
            active_low,
        }
    }

    /// Number of registered buttons
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no button is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configure every registered pin as an input
    ///
    /// Call once after registration, before the first poll.
    pub fn configure_pins<G: GpioDriver>(&self, gpio: &mut G) -> Result<(), GpioError> {
        let pull = if self.active_low { Pull::Up } else { Pull::Down };
        for entry in &self.entries {
            gpio.define_input("button", entry.pin, pull, IdlePolicy::DOZE_HIGH_Z)?;
        }
        Ok(())
    }

    /// Debounced state of `pin`, if registered
    pub fn state(&self, pin: PinId) -> Option<ButtonState> {
        self.entry(pin).map(|e| e.stable)
    }

    /// Classification of the last completed press on `pin`
    pub fn last_press(&self, pin: PinId) -> Option<PressType> {
        self.entry(pin).map(|e| e.last_press)
    }

    /// Sample all registered pins and report debounced transitions
    ///
    /// Returns the number of events delivered to `sink`. A pin whose read
    /// fails keeps its state until the next poll.
    pub fn poll<G, S>(&mut self, gpio: &mut G, now_ms: u32, sink: &S) -> usize
    where
        G: GpioDriver,
        S: ButtonEventSink<C> + ?Sized,
    {
        let mut delivered = 0;
        for entry in self.entries.iter_mut() {
            let level = match gpio.read(entry.pin) {
                Ok(level) => level,
                Err(e) => {
                    warn!("button gpio {} read failed: {}", entry.pin, e);
                    continue;
                }
            };
            let raw = if (level != 0) != self.active_low {
                ButtonState::Pressed
            } else {
                ButtonState::Released
            };

            if raw != entry.candidate {
                entry.candidate = raw;
                entry.candidate_since = now_ms;
            }
            if entry.candidate == entry.stable
                || now_ms.wrapping_sub(entry.candidate_since) < self.debounce_ms
            {
                continue;
            }

            entry.stable = entry.candidate;
            let event = match entry.stable {
                ButtonState::Pressed => {
                    entry.pressed_at = entry.candidate_since;
                    ButtonEvent {
                        state: ButtonState::Pressed,
                        press_type: entry.last_press,
                        duration_ms: 0,
                    }
                }
                ButtonState::Released => {
                    let duration_ms = entry.candidate_since.wrapping_sub(entry.pressed_at);
                    entry.last_press = PressType::classify(duration_ms);
                    ButtonEvent {
                        state: ButtonState::Released,
                        press_type: entry.last_press,
                        duration_ms,
                    }
                }
            };
            debug!("button gpio {} -> {}", entry.pin, event.state);
            sink.on_button_event(entry.context, event);
            delivered += 1;
        }
        delivered
    }

    fn entry(&self, pin: PinId) -> Option<&Entry<C>> {
        self.entries.iter().find(|e| e.pin == pin)
    }
}

impl<C: Copy, const N: usize> ButtonManager<C> for Debouncer<C, N> {
    fn define_button(&mut self, pin: PinId, context: C) -> Result<(), ButtonError> {
        if self.entry(pin).is_some() {
            return Err(ButtonError::AlreadyDefined);
        }
        self.entries
            .push(Entry {
                pin,
                context,
                stable: ButtonState::Released,
                candidate: ButtonState::Released,
                candidate_since: 0,
                pressed_at: 0,
                last_press: PressType::Short,
            })
            .map_err(|_| ButtonError::TooManyButtons)
    }
}
