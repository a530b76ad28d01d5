// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! KeyId encoding rules.
//!
//! A KeyId is encoded in one of three forms:
//! - the single byte `0x80`, meaning "no KeyId" (`None`);
//! - a single byte with the high bit clear, a 1-byte KeyId;
//! - a byte with the high bit set (other than `0x80`) followed by
//!   `1 + (first & 0x7F) - 1` more bytes, for a total length in `2..=128`.

use crate::error::CrispError;

/// Marks "KeyId not used" on the wire.
pub const KEY_ID_UNUSED_MARKER: u8 = 0x80;
/// Maximum encoded KeyId length in bytes.
pub const MAX_KEY_ID_SIZE: usize = 128;

/// Validates a caller-supplied KeyId for use when building a packet.
///
/// `0x80` is reserved for "KeyId not used" and is never a valid KeyId
/// value here; callers that want no KeyId pass `key_id_present = false`
/// instead.
pub fn validate_key_id(key_id: &[u8]) -> Result<(), CrispError> {
    if key_id.is_empty() || key_id.len() > MAX_KEY_ID_SIZE {
        return Err(CrispError::InvalidSize);
    }

    let first = key_id[0];
    if first == KEY_ID_UNUSED_MARKER {
        return Err(CrispError::InvalidFormat);
    }

    if first & 0x80 == 0 {
        if key_id.len() != 1 {
            return Err(CrispError::InvalidFormat);
        }
        return Ok(());
    }

    let total_len = 1usize + (first & 0x7F) as usize;
    if total_len != key_id.len() {
        return Err(CrispError::InvalidFormat);
    }

    Ok(())
}

/// Decodes the KeyId field starting at `offset` within `packet`.
///
/// Returns the KeyId slice (`None` when the unused marker was read)
/// together with the number of bytes the field occupied on the wire.
pub fn decode_key_id(
    packet: &[u8],
    offset: usize,
) -> Result<(Option<&[u8]>, usize), CrispError> {
    if offset >= packet.len() {
        return Err(CrispError::InvalidSize);
    }

    let first = packet[offset];
    if first == KEY_ID_UNUSED_MARKER {
        return Ok((None, 1));
    }

    if first & 0x80 == 0 {
        return Ok((Some(&packet[offset..offset + 1]), 1));
    }

    let total_len = 1usize + (first & 0x7F) as usize;
    if !(2..=MAX_KEY_ID_SIZE).contains(&total_len) {
        return Err(CrispError::InvalidFormat);
    }

    let end = offset
        .checked_add(total_len)
        .ok_or(CrispError::OutOfRange)?;
    if end > packet.len() {
        return Err(CrispError::InvalidSize);
    }

    Ok((Some(&packet[offset..end]), total_len))
}
