// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CRISP error taxonomy.

/// Error codes returned by CRISP operations.
///
/// There is deliberately no `Ok` variant here; success is expressed as
/// `Result::Ok(T)` at each call site rather than as a status payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrispError {
    /// Null/inconsistent span, missing crypto hook, or other malformed
    /// caller argument.
    InvalidArgument,
    /// Output buffer (plaintext or packet) is shorter than required.
    BufferTooSmall,
    /// Packet exceeds the maximum size, a field is truncated, or layout
    /// arithmetic would underflow.
    InvalidSize,
    /// Version mismatch, malformed KeyId, inconsistent ICV size, or
    /// policy rejection of an unused KeyId.
    InvalidFormat,
    /// The `cs` field does not select a known suite.
    UnsupportedSuite,
    /// The anti-replay window rejected this sequence number.
    Replay,
    /// SeqNum or version exceeds its valid range, or an ICV size exceeds
    /// the internal stack buffer the core is willing to use.
    OutOfRange,
    /// ICV mismatch, or an error forwarded verbatim from the crypto
    /// backend.
    Crypto,
}
