// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wire codec, anti-replay window, and protect/unprotect state machine
//! for the CRISP secure-datagram protocol (GOST R 71252-2024).
//!
//! This crate implements the protocol's message layout and orchestration
//! only. The MAGMA block cipher, key establishment, transport framing,
//! logging and configuration are all external collaborators: this crate
//! only defines the seams (the [`crypto::CryptoBackend`] and
//! [`resolver::KeyResolver`] traits) through which callers plug those in.

#![cfg_attr(not(test), no_std)]

pub mod codec;
pub mod crypto;
pub mod error;
pub mod keyid;
pub mod protect;
pub mod replay;
pub mod resolver;
pub mod suites;

pub use codec::{BuildParams, MessageView};
pub use crypto::CryptoBackend;
pub use error::CrispError;
pub use protect::{protect, unprotect, ProtectParams, UnprotectParams, UnprotectResult};
pub use replay::ReplayWindow;
pub use resolver::{unprotect_resolve, KeyResolveRequest, KeyResolver, ResolvedKeys};
pub use suites::{Suite, SuiteParams};
