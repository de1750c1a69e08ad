//! Tag-length-value record encoding and decoding
//!
//! The uplink is built by appending records into a bounded buffer; the
//! downlink is walked record by record without copying.

use heapless::Vec;

/// Maximum uplink payload size in bytes
pub const MAX_UPLINK_SIZE: usize = 222;

/// Record header size (TAG + LENGTH)
pub const TLV_HEADER_SIZE: usize = 2;

/// Errors that can occur during record encoding or decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TlvError {
    /// Not enough room left in the uplink buffer
    BufferFull,
    /// Value is longer than the declared record length
    ValueTooLong,
    /// Record header or value runs past the end of the payload
    Truncated,
}

/// Sink for uplink records
///
/// Modules append their contribution to the outgoing message through this
/// trait; the host decides what buffer sits behind it.
pub trait UplinkWriter {
    /// Append a record of `declared_len` bytes
    ///
    /// `value` may be shorter than `declared_len`; the remainder is filled
    /// with zeros so the record always has its declared size on the wire.
    fn add_tlv(&mut self, tag: u8, declared_len: u8, value: &[u8]) -> Result<(), TlvError>;
}

/// Bounded uplink message buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UplinkMessage<const CAP: usize = MAX_UPLINK_SIZE> {
    buffer: Vec<u8, CAP>,
}

impl<const CAP: usize> Default for UplinkMessage<CAP> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const CAP: usize> UplinkMessage<CAP> {
    /// Create an empty message
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Encoded bytes so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Encoded length in bytes
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True if no record has been added
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Bytes still available for records (headers included)
    pub fn remaining(&self) -> usize {
        CAP - self.buffer.len()
    }

    /// Drop all records
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Walk the records added so far
    pub fn records(&self) -> DownlinkReader<'_> {
        DownlinkReader::new(&self.buffer)
    }
}

impl<const CAP: usize> UplinkWriter for UplinkMessage<CAP> {
    fn add_tlv(&mut self, tag: u8, declared_len: u8, value: &[u8]) -> Result<(), TlvError> {
        if value.len() > declared_len as usize {
            return Err(TlvError::ValueTooLong);
        }
        if self.remaining() < TLV_HEADER_SIZE + declared_len as usize {
            return Err(TlvError::BufferFull);
        }

        // Capacity was checked above, so none of these pushes can fail
        self.buffer
            .extend_from_slice(&[tag, declared_len])
            .map_err(|_| TlvError::BufferFull)?;
        self.buffer
            .extend_from_slice(value)
            .map_err(|_| TlvError::BufferFull)?;
        for _ in value.len()..declared_len as usize {
            self.buffer.push(0).map_err(|_| TlvError::BufferFull)?;
        }

        Ok(())
    }
}

/// Iterator over the records of a received payload
///
/// Yields `(tag, value)` pairs. A malformed tail yields a single
/// [`TlvError::Truncated`] and ends the iteration.
#[derive(Debug, Clone)]
pub struct DownlinkReader<'a> {
    remaining: &'a [u8],
}

impl<'a> DownlinkReader<'a> {
    /// Start reading records from `payload`
    pub fn new(payload: &'a [u8]) -> Self {
        Self { remaining: payload }
    }

    /// Find the value of the first record with `tag`
    pub fn find(payload: &'a [u8], tag: u8) -> Option<&'a [u8]> {
        Self::new(payload)
            .filter_map(Result::ok)
            .find(|(t, _)| *t == tag)
            .map(|(_, value)| value)
    }
}

impl<'a> Iterator for DownlinkReader<'a> {
    type Item = Result<(u8, &'a [u8]), TlvError>;

    fn next(&mut self) -> Option<Self::Item> {
        let remaining = self.remaining;
        match remaining {
            [] => None,
            [tag, len, rest @ ..] if rest.len() >= *len as usize => {
                let (value, tail) = rest.split_at(*len as usize);
                self.remaining = tail;
                Some(Ok((*tag, value)))
            }
            _ => {
                self.remaining = &[];
                Some(Err(TlvError::Truncated))
            }
        }
    }
}
