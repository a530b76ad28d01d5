// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Crypto backend capability surface.
//!
//! The wire codec and protect/unprotect state machine never perform
//! cryptography themselves; every Magma operation is routed through an
//! implementation of [`CryptoBackend`] supplied by the caller. This
//! keeps the block cipher, key establishment and key storage entirely
//! outside this crate.

use crate::error::CrispError;

/// Capability interface for the MAGMA block cipher operations CRISP
/// needs.
///
/// Implementations are expected to be constant-time with respect to
/// key material; this crate does not audit that property.
pub trait CryptoBackend {
    /// Computes the MAGMA-CMAC ICV for `data` under `key`, writing
    /// `out_icv.len()` bytes (4 or 8, per suite) into `out_icv`.
    fn magma_cmac(&self, key: &[u8], data: &[u8], out_icv: &mut [u8]) -> Result<(), CrispError>;

    /// Encrypts or decrypts `input` into `out` (same length) using
    /// MAGMA-CTR keystream seeded from `iv32`, the low 32 bits of the
    /// packet SeqNum.
    fn magma_ctr_xcrypt(
        &self,
        key: &[u8],
        iv32: u32,
        input: &[u8],
        out: &mut [u8],
    ) -> Result<(), CrispError>;

    /// Derives a `(Kenc, Kmac)` pair from master key material and a
    /// salt. Key establishment is out of scope for this crate; backends
    /// that don't support derivation may leave the default
    /// implementation in place, which always fails.
    fn derive_kenc_kmac(
        &self,
        _master_key: &[u8],
        _salt: &[u8],
        _out_kenc: &mut [u8],
        _out_kmac: &mut [u8],
    ) -> Result<(), CrispError> {
        Err(CrispError::InvalidArgument)
    }
}

/// A deterministic, explicitly non-cryptographic [`CryptoBackend`] for
/// tests and integration harnesses. Never enable the `dummy-crypto`
/// feature in a production build.
#[cfg(any(test, feature = "dummy-crypto"))]
pub mod dummy {
    use super::CryptoBackend;
    use crate::error::CrispError;

    const DEFAULT_SEED: u64 = 0xC0DE_C0DE_1234_5678;

    /// State for [`DummyCryptoBackend`]. A zero seed falls back to
    /// [`DEFAULT_SEED`].
    #[derive(Debug, Clone, Copy, Default)]
    pub struct DummyCryptoBackend {
        pub seed: u64,
    }

    impl DummyCryptoBackend {
        pub fn new(seed: u64) -> Self {
            DummyCryptoBackend { seed }
        }

        fn effective_seed(&self) -> u64 {
            if self.seed == 0 {
                DEFAULT_SEED
            } else {
                self.seed
            }
        }
    }

    fn mix64(state: u64, value: u8) -> u64 {
        let mut state = state ^ (value as u64);
        state = state.wrapping_mul(0x0000_0001_0000_01B3);
        state ^= state >> 29;
        state
    }

    impl CryptoBackend for DummyCryptoBackend {
        fn magma_cmac(
            &self,
            key: &[u8],
            data: &[u8],
            out_icv: &mut [u8],
        ) -> Result<(), CrispError> {
            let mut state = self.effective_seed() ^ 0x9E37_79B9_7F4A_7C15;
            for &b in key {
                state = mix64(state, b);
            }
            for &b in data {
                state = mix64(state, b);
            }
            for (i, out) in out_icv.iter_mut().enumerate() {
                state = mix64(state, i as u8);
                *out = (state >> ((i % 8) * 8)) as u8;
            }
            Ok(())
        }

        fn magma_ctr_xcrypt(
            &self,
            key: &[u8],
            iv32: u32,
            input: &[u8],
            out: &mut [u8],
        ) -> Result<(), CrispError> {
            if input.len() != out.len() {
                return Err(CrispError::InvalidSize);
            }
            if key.is_empty() {
                return Err(CrispError::InvalidArgument);
            }

            let offset = (iv32 & 0xFF) as usize;
            for (i, (&input_byte, out_byte)) in input.iter().zip(out.iter_mut()).enumerate() {
                let iv_byte = ((iv32 >> ((i % 4) * 8)) & 0xFF) as u8;
                let key_byte = key[(i + offset) % key.len()];
                let stream = key_byte ^ iv_byte ^ (0xA5u8.wrapping_add(i as u8));
                *out_byte = input_byte ^ stream;
            }
            Ok(())
        }

        fn derive_kenc_kmac(
            &self,
            master_key: &[u8],
            salt: &[u8],
            out_kenc: &mut [u8],
            out_kmac: &mut [u8],
        ) -> Result<(), CrispError> {
            let mut state = self.effective_seed() ^ 0xA24B_AED4_963E_E407;
            for &b in master_key {
                state = mix64(state, b);
            }
            for &b in salt {
                state = mix64(state, b);
            }

            for (i, out) in out_kenc.iter_mut().enumerate() {
                state = mix64(state, (i as u8) ^ 0x3C);
                *out = (state >> (8 * (i % 8))) as u8;
            }
            for (i, out) in out_kmac.iter_mut().enumerate() {
                state = mix64(state, (i as u8) ^ 0xC3);
                *out = (state >> (8 * (i % 8))) as u8;
            }
            Ok(())
        }
    }

}
