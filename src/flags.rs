//! Script verification flags
//!
//! Flags widen the base consensus rules with additional encoding and
//! policy checks. They are a plain bit set over `u32` so callers can
//! persist and combine them without translation.

use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Bit set of script verification flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerifyFlags(u32);

impl VerifyFlags {
    /// Base consensus rules only.
    pub const NONE: VerifyFlags = VerifyFlags(0);

    /// Evaluate pay-to-script-hash outputs by running the redeem script.
    pub const P2SH: VerifyFlags = VerifyFlags(1 << 0);

    /// Passed pubkeys must be compressed or uncompressed SEC form and
    /// signature hash types must be defined.
    pub const STRICTENC: VerifyFlags = VerifyFlags(1 << 1);

    /// Passed signatures must be strict DER (BIP66).
    pub const DERSIG: VerifyFlags = VerifyFlags(1 << 2);

    /// Passed signatures must use the low-S form.
    pub const LOW_S: VerifyFlags = VerifyFlags(1 << 3);

    /// The extra CHECKMULTISIG stack element must be empty.
    pub const NULLDUMMY: VerifyFlags = VerifyFlags(1 << 4);

    /// The unlock script may contain only data pushes.
    pub const SIGPUSHONLY: VerifyFlags = VerifyFlags(1 << 5);

    /// Data pushes must use the shortest possible encoding and numeric
    /// operands must be minimally encoded.
    pub const MINIMALDATA: VerifyFlags = VerifyFlags(1 << 6);

    /// Executing an upgradable no-op (OP_NOP1, OP_NOP4..OP_NOP10) fails.
    pub const DISCOURAGE_UPGRADABLE_NOPS: VerifyFlags = VerifyFlags(1 << 7);

    /// Exactly one element may remain after verification.
    pub const CLEANSTACK: VerifyFlags = VerifyFlags(1 << 8);

    /// Enable OP_CHECKLOCKTIMEVERIFY (BIP65).
    pub const CHECKLOCKTIMEVERIFY: VerifyFlags = VerifyFlags(1 << 9);

    /// Enable OP_CHECKSEQUENCEVERIFY (BIP112).
    pub const CHECKSEQUENCEVERIFY: VerifyFlags = VerifyFlags(1 << 10);

    /// Flags every validating node must apply.
    pub const MANDATORY: VerifyFlags = VerifyFlags(Self::P2SH.0);

    /// Mandatory flags plus relay policy checks.
    pub const STANDARD: VerifyFlags = VerifyFlags(
        Self::MANDATORY.0
            | Self::DERSIG.0
            | Self::STRICTENC.0
            | Self::MINIMALDATA.0
            | Self::NULLDUMMY.0
            | Self::DISCOURAGE_UPGRADABLE_NOPS.0
            | Self::CLEANSTACK.0
            | Self::CHECKLOCKTIMEVERIFY.0
            | Self::CHECKSEQUENCEVERIFY.0
            | Self::LOW_S.0,
    );

    pub const fn from_bits(bits: u32) -> Self {
        VerifyFlags(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// True if every bit of `other` is set in `self`.
    pub const fn contains(self, other: VerifyFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if minimal push and numeric encodings are required.
    pub const fn require_minimal(self) -> bool {
        self.contains(Self::MINIMALDATA)
    }
}

impl BitOr for VerifyFlags {
    type Output = VerifyFlags;
    fn bitor(self, rhs: VerifyFlags) -> VerifyFlags {
        VerifyFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for VerifyFlags {
    fn bitor_assign(&mut self, rhs: VerifyFlags) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for VerifyFlags {
    type Output = VerifyFlags;
    fn bitand(self, rhs: VerifyFlags) -> VerifyFlags {
        VerifyFlags(self.0 & rhs.0)
    }
}

/// Which transaction digest algorithm signature checks use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigVersion {
    /// Legacy digest over the serialized transaction.
    Base,
    /// BIP143 digest with amount commitment.
    WitnessV0,
}
