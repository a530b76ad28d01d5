// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Protect/unprotect state machine: plaintext <-> CRISP wire packet.

use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::codec::{self, BuildParams, MessageView, VERSION_2024};
use crate::crypto::CryptoBackend;
use crate::error::CrispError;
use crate::replay::ReplayWindow;
use crate::suites::Suite;

const INTERNAL_MAX_ICV_SIZE: usize = 8;

/// Input parameters for [`protect`].
pub struct ProtectParams<'a> {
    pub external_key_id_flag: bool,
    pub cs: u8,
    pub key_id: Option<&'a [u8]>,
    pub seqnum: u64,
    pub payload: &'a [u8],
    pub kenc: &'a [u8],
    pub kmac: &'a [u8],
}

/// Input parameters for [`unprotect`].
pub struct UnprotectParams<'a> {
    pub packet: &'a [u8],
    pub kenc: &'a [u8],
    pub kmac: &'a [u8],
}

/// Metadata and plaintext returned by a successful [`unprotect`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnprotectResult<'pkt, 'out> {
    pub external_key_id_flag: bool,
    pub version: u16,
    pub cs: u8,
    pub key_id: Option<&'pkt [u8]>,
    pub seqnum: u64,
    pub plaintext: &'out [u8],
}

/// Protects `params.payload` into a CRISP wire packet, pinning
/// `Version` to the value mandated by GOST R 71252-2024.
pub fn protect(
    params: &ProtectParams<'_>,
    crypto: &dyn CryptoBackend,
    out_packet: &mut [u8],
) -> Result<usize, CrispError> {
    let build_params = BuildParams {
        external_key_id_flag: params.external_key_id_flag,
        version: VERSION_2024,
        cs: params.cs,
        key_id: params.key_id,
        seqnum: params.seqnum,
        payload: params.payload,
        kenc: params.kenc,
        kmac: params.kmac,
    };
    codec::build(&build_params, crypto, out_packet)
}

/// Verifies, authenticates and decrypts a CRISP wire packet.
///
/// The ICV is checked in constant time before the replay window is
/// consulted. On any rejection path (`InvalidFormat`/`InvalidSize` from
/// parsing, `Crypto`, `Replay`, `BufferTooSmall`, ...) `out_plaintext`
/// is left byte-for-byte as the caller passed it in.
pub fn unprotect<'pkt, 'out>(
    params: &UnprotectParams<'pkt>,
    crypto: &dyn CryptoBackend,
    replay_window: Option<&mut ReplayWindow>,
    out_plaintext: &'out mut [u8],
) -> Result<UnprotectResult<'pkt, 'out>, CrispError> {
    let view = codec::parse(params.packet)?;
    unprotect_view(view, params.packet, params.kenc, params.kmac, crypto, replay_window, out_plaintext)
}

pub(crate) fn unprotect_view<'pkt, 'out>(
    view: MessageView<'pkt>,
    packet: &'pkt [u8],
    kenc: &[u8],
    kmac: &[u8],
    crypto: &dyn CryptoBackend,
    replay_window: Option<&mut ReplayWindow>,
    out_plaintext: &'out mut [u8],
) -> Result<UnprotectResult<'pkt, 'out>, CrispError> {
    let suite_params = Suite::from_wire(view.cs)?.params();
    if view.icv.len() != suite_params.icv_size {
        return Err(CrispError::InvalidFormat);
    }
    if suite_params.icv_size > INTERNAL_MAX_ICV_SIZE {
        return Err(CrispError::OutOfRange);
    }

    let cmac_input = &packet[..packet.len() - view.icv.len()];
    let mut expected_icv = Zeroizing::new([0u8; INTERNAL_MAX_ICV_SIZE]);

    crypto.magma_cmac(kmac, cmac_input, &mut expected_icv[..suite_params.icv_size])?;
    let matches: bool = expected_icv[..suite_params.icv_size]
        .ct_eq(view.icv)
        .into();
    if !matches {
        return Err(CrispError::Crypto);
    }

    if out_plaintext.len() < view.payload.len() {
        return Err(CrispError::BufferTooSmall);
    }

    if let Some(window) = replay_window {
        let accepted = window.check_and_update(view.seqnum)?;
        if !accepted {
            return Err(CrispError::Replay);
        }
    }

    let plaintext_out = &mut out_plaintext[..view.payload.len()];
    if !view.payload.is_empty() {
        if suite_params.encryption_enabled {
            let iv32 = (view.seqnum & 0xFFFF_FFFF) as u32;
            crypto.magma_ctr_xcrypt(kenc, iv32, view.payload, plaintext_out)?;
        } else {
            plaintext_out.copy_from_slice(view.payload);
        }
    }

    Ok(UnprotectResult {
        external_key_id_flag: view.external_key_id_flag,
        version: view.version,
        cs: view.cs,
        key_id: view.key_id,
        seqnum: view.seqnum,
        plaintext: plaintext_out,
    })
}
