//! Button abstractions
//!
//! A button manager debounces registered pins and reports transitions to an
//! event sink together with a caller-supplied context value. The context is
//! whatever the registering code needs to find its own bookkeeping again,
//! typically a slot identifier.

use crate::gpio::PinId;

/// Debounced level of a button line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ButtonState {
    /// Button not pressed / input inactive
    Released = 0,
    /// Button held / input active
    Pressed = 1,
}

impl ButtonState {
    /// Wire code of this state
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Classification of a completed press by how long it was held
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PressType {
    /// Held up to [`PressType::SHORT_MAX_MS`]
    Short = 1,
    /// Held up to [`PressType::MEDIUM_MAX_MS`]
    Medium = 2,
    /// Held up to [`PressType::LONG_MAX_MS`]
    Long = 3,
    /// Held longer than [`PressType::LONG_MAX_MS`]
    VeryLong = 4,
}

impl PressType {
    /// Upper bound of a short press
    pub const SHORT_MAX_MS: u32 = 500;
    /// Upper bound of a medium press
    pub const MEDIUM_MAX_MS: u32 = 2_000;
    /// Upper bound of a long press
    pub const LONG_MAX_MS: u32 = 5_000;

    /// Classify a press from its hold time
    pub fn classify(duration_ms: u32) -> Self {
        match duration_ms {
            d if d <= Self::SHORT_MAX_MS => PressType::Short,
            d if d <= Self::MEDIUM_MAX_MS => PressType::Medium,
            d if d <= Self::LONG_MAX_MS => PressType::Long,
            _ => PressType::VeryLong,
        }
    }

    /// Wire code of this press type (never 0, which means "no event")
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Parse a press type from its wire code
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(PressType::Short),
            2 => Some(PressType::Medium),
            3 => Some(PressType::Long),
            4 => Some(PressType::VeryLong),
            _ => None,
        }
    }
}

/// A debounced button transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonEvent {
    /// New debounced state
    pub state: ButtonState,
    /// Classification of the press that just ended
    ///
    /// Meaningful on release; on press it carries the type of the previous
    /// press, as the manager has nothing newer.
    pub press_type: PressType,
    /// Hold time of the press that just ended (0 on press)
    pub duration_ms: u32,
}

/// Errors from button registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonError {
    /// Manager has no room for another button
    TooManyButtons,
    /// Pin is already registered
    AlreadyDefined,
}

/// Debounce/button service
///
/// `C` is the opaque context handed back with every event for this pin.
pub trait ButtonManager<C: Copy> {
    /// Register a pin as a button and bind `context` to its events
    fn define_button(&mut self, pin: PinId, context: C) -> Result<(), ButtonError>;
}

/// Receiver of debounced button events
///
/// Called from the button manager's own context (timer or interrupt), so
/// implementations take `&self` and must not block.
pub trait ButtonEventSink<C: Copy> {
    /// Handle one transition on the button registered with `context`
    fn on_button_event(&self, context: C, event: ButtonEvent);
}

impl<C: Copy, T: ButtonManager<C> + ?Sized> ButtonManager<C> for &mut T {
    fn define_button(&mut self, pin: PinId, context: C) -> Result<(), ButtonError> {
        (**self).define_button(pin, context)
    }
}
