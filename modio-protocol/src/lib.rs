//! Application message framing
//!
//! Uplink and downlink payloads are sequences of tag-length-value records.
//! Each application module appends its own records to the uplink and
//! receives the downlink records it registered a tag for.
//!
//! # Record format
//!
//! ```text
//! ┌─────┬────────┬─────────────┐
//! │ TAG │ LENGTH │ VALUE       │
//! │ 1B  │ 1B     │ 0–255B      │
//! └─────┴────────┴─────────────┘
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod tags;
pub mod tlv;

pub use tags::{DL_APP_IO_SET, DL_APP_SPECIFIC_START, UL_APP_IO_STATE, UL_APP_SPECIFIC_START};
pub use tlv::{DownlinkReader, TlvError, UplinkMessage, UplinkWriter, MAX_UPLINK_SIZE};
