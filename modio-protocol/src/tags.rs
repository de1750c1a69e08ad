//! Reserved record tags
//!
//! Tags below the application-specific ranges belong to the host's own
//! modules; the ranges above are free for application modules to claim.

/// First uplink tag available to application-specific modules
pub const UL_APP_SPECIFIC_START: u8 = 0x80;

/// First downlink tag available to application-specific modules
pub const DL_APP_SPECIFIC_START: u8 = 0x80;

/// Uplink record carrying the IO module's state block
pub const UL_APP_IO_STATE: u8 = UL_APP_SPECIFIC_START;

/// Downlink record setting the IO module's outputs
pub const DL_APP_IO_SET: u8 = DL_APP_SPECIFIC_START;
