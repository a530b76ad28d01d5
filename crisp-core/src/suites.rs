// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cryptographic suite registry (the `CS` wire field).

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::error::CrispError;

/// CRISP cryptographic suites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
#[repr(u8)]
pub enum Suite {
    /// MAGMA-CTR-CMAC, icv=4, encryption enabled.
    Cs1 = 1,
    /// MAGMA-NULL-CMAC, icv=4, encryption disabled.
    Cs2 = 2,
    /// MAGMA-CTR-CMAC8, icv=8, encryption enabled.
    Cs3 = 3,
    /// MAGMA-NULL-CMAC8, icv=8, encryption disabled.
    Cs4 = 4,
}

/// Parameters derived from a [`Suite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuiteParams {
    pub icv_size: usize,
    pub encryption_enabled: bool,
}

impl Suite {
    /// Decodes the wire `CS` byte into a known suite.
    pub fn from_wire(cs: u8) -> Result<Self, CrispError> {
        Suite::from_u8(cs).ok_or(CrispError::UnsupportedSuite)
    }

    /// Resolves the parameters for this suite.
    pub fn params(self) -> SuiteParams {
        match self {
            Suite::Cs1 => SuiteParams {
                icv_size: 4,
                encryption_enabled: true,
            },
            Suite::Cs2 => SuiteParams {
                icv_size: 4,
                encryption_enabled: false,
            },
            Suite::Cs3 => SuiteParams {
                icv_size: 8,
                encryption_enabled: true,
            },
            Suite::Cs4 => SuiteParams {
                icv_size: 8,
                encryption_enabled: false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cs1_params() {
        let p = Suite::from_wire(1).unwrap().params();
        assert_eq!(p.icv_size, 4);
        assert!(p.encryption_enabled);
    }

    #[test]
    fn cs2_params() {
        let p = Suite::from_wire(2).unwrap().params();
        assert_eq!(p.icv_size, 4);
        assert!(!p.encryption_enabled);
    }

    #[test]
    fn cs3_params() {
        let p = Suite::from_wire(3).unwrap().params();
        assert_eq!(p.icv_size, 8);
        assert!(p.encryption_enabled);
    }

    #[test]
    fn cs4_params() {
        let p = Suite::from_wire(4).unwrap().params();
        assert_eq!(p.icv_size, 8);
        assert!(!p.encryption_enabled);
    }

    #[test]
    fn unsupported_suite_zero() {
        assert_eq!(Suite::from_wire(0), Err(CrispError::UnsupportedSuite));
    }

    #[test]
    fn unsupported_suite_five() {
        assert_eq!(Suite::from_wire(5), Err(CrispError::UnsupportedSuite));
    }
}
