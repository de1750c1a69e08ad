//! Button managers

mod debounce;

pub use debounce::{Debouncer, DEFAULT_DEBOUNCE_MS};
