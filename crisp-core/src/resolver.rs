// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Resolve-then-unprotect wrapper.
//!
//! Key establishment and storage are out of scope for this crate; a
//! [`KeyResolver`] is the seam through which a caller plugs in whatever
//! session/key-store lookup its transport needs.

use crate::codec;
use crate::crypto::CryptoBackend;
use crate::error::CrispError;
use crate::protect::{self, UnprotectResult};
use crate::replay::ReplayWindow;

/// Metadata passed to a [`KeyResolver`] for an incoming packet's key
/// lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyResolveRequest<'a> {
    pub external_key_id_flag: bool,
    pub cs: u8,
    pub key_id: Option<&'a [u8]>,
    pub seqnum: u64,
}

/// Session keys resolved for one incoming packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedKeys<'a> {
    pub kenc: &'a [u8],
    pub kmac: &'a [u8],
}

/// Resolves session keys for packet metadata, for use by
/// [`unprotect_resolve`].
pub trait KeyResolver {
    /// Looks up `(Kenc, Kmac)` for `request`. Returning an error here
    /// aborts `unprotect_resolve` with that error; resolvers that can't
    /// find keys for the request should return
    /// [`CrispError::InvalidFormat`].
    fn resolve_keys(&self, request: &KeyResolveRequest<'_>) -> Result<ResolvedKeys<'_>, CrispError>;

    /// Whether packets carrying the "KeyId not used" marker (`0x80`)
    /// are acceptable. Checked before `resolve_keys` is invoked.
    fn allow_key_id_unused(&self) -> bool;
}

/// Parses `packet`, resolves its keys via `resolver`, and forwards to
/// [`protect::unprotect`].
pub fn unprotect_resolve<'pkt, 'out>(
    packet: &'pkt [u8],
    resolver: &dyn KeyResolver,
    crypto: &dyn CryptoBackend,
    replay_window: Option<&mut ReplayWindow>,
    out_plaintext: &'out mut [u8],
) -> Result<UnprotectResult<'pkt, 'out>, CrispError> {
    let view = codec::parse(packet)?;
    if !view.key_id_present() && !resolver.allow_key_id_unused() {
        return Err(CrispError::InvalidFormat);
    }

    let request = KeyResolveRequest {
        external_key_id_flag: view.external_key_id_flag,
        cs: view.cs,
        key_id: view.key_id,
        seqnum: view.seqnum,
    };
    let resolved = resolver.resolve_keys(&request)?;

    protect::unprotect_view(
        view,
        packet,
        resolved.kenc,
        resolved.kmac,
        crypto,
        replay_window,
        out_plaintext,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::dummy::DummyCryptoBackend;
    use crate::protect::{protect, ProtectParams};
    use core::cell::RefCell;

    struct RecordingResolver<'a> {
        kenc: &'a [u8],
        kmac: &'a [u8],
        allow_unused: bool,
        last_request: RefCell<Option<(bool, u8, bool, u64)>>,
    }

    impl<'a> KeyResolver for RecordingResolver<'a> {
        fn resolve_keys(&self, request: &KeyResolveRequest<'_>) -> Result<ResolvedKeys<'_>, CrispError> {
            *self.last_request.borrow_mut() = Some((
                request.external_key_id_flag,
                request.cs,
                request.key_id.is_some(),
                request.seqnum,
            ));
            Ok(ResolvedKeys {
                kenc: self.kenc,
                kmac: self.kmac,
            })
        }

        fn allow_key_id_unused(&self) -> bool {
            self.allow_unused
        }
    }

    struct RejectingResolver;

    impl KeyResolver for RejectingResolver {
        fn resolve_keys(&self, _request: &KeyResolveRequest<'_>) -> Result<ResolvedKeys<'_>, CrispError> {
            Err(CrispError::InvalidFormat)
        }

        fn allow_key_id_unused(&self) -> bool {
            true
        }
    }

    #[test]
    fn resolver_is_called_with_correct_metadata() {
        let crypto = DummyCryptoBackend::new(11);
        let kenc = b"kenc-material";
        let kmac = b"kmac-material";
        let params = ProtectParams {
            external_key_id_flag: true,
            cs: 1,
            key_id: Some(&[0x02]),
            seqnum: 77,
            payload: b"payload",
            kenc,
            kmac,
        };
        let mut packet = [0u8; 64];
        let size = protect(&params, &crypto, &mut packet).unwrap();

        let resolver = RecordingResolver {
            kenc,
            kmac,
            allow_unused: false,
            last_request: RefCell::new(None),
        };
        let mut plaintext = [0u8; 64];
        let result = unprotect_resolve(&packet[..size], &resolver, &crypto, None, &mut plaintext).unwrap();
        assert_eq!(result.plaintext, &b"payload"[..]);
        assert_eq!(
            resolver.last_request.into_inner(),
            Some((true, 1, true, 77))
        );
    }

    #[test]
    fn resolver_no_key_error_is_forwarded() {
        let crypto = DummyCryptoBackend::new(11);
        let kenc = b"kenc-material";
        let kmac = b"kmac-material";
        let params = ProtectParams {
            external_key_id_flag: false,
            cs: 1,
            key_id: Some(&[0x02]),
            seqnum: 1,
            payload: b"x",
            kenc,
            kmac,
        };
        let mut packet = [0u8; 64];
        let size = protect(&params, &crypto, &mut packet).unwrap();

        let mut plaintext = [0u8; 64];
        assert_eq!(
            unprotect_resolve(&packet[..size], &RejectingResolver, &crypto, None, &mut plaintext),
            Err(CrispError::InvalidFormat)
        );
    }

    #[test]
    fn unused_key_id_rejected_by_policy() {
        let crypto = DummyCryptoBackend::new(11);
        let kenc = b"kenc-material";
        let kmac = b"kmac-material";
        let params = ProtectParams {
            external_key_id_flag: false,
            cs: 1,
            key_id: None,
            seqnum: 1,
            payload: b"x",
            kenc,
            kmac,
        };
        let mut packet = [0u8; 64];
        let size = protect(&params, &crypto, &mut packet).unwrap();

        let resolver = RecordingResolver {
            kenc,
            kmac,
            allow_unused: false,
            last_request: RefCell::new(None),
        };
        let mut plaintext = [0u8; 64];
        assert_eq!(
            unprotect_resolve(&packet[..size], &resolver, &crypto, None, &mut plaintext),
            Err(CrispError::InvalidFormat)
        );
        // The resolver must never be invoked once policy rejects first.
        assert_eq!(resolver.last_request.into_inner(), None);
    }
}
