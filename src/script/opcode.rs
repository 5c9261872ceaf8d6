//! Opcode table
//!
//! A closed set of straight-line opcodes. Bytes `0x01..=0x4b` and the
//! `OP_PUSHDATA` forms are data pushes handled by the parser; every byte not
//! listed here is rejected when executed.

use crate::error::Error;
use std::fmt;

/// Largest opcode value that pushes that many bytes directly
pub const MAX_DIRECT_PUSH: u8 = 0x4b;

/// Highest push-instruction byte (`OP_PUSHDATA4`); never written as a bare opcode
pub const MAX_PUSH_OPCODE: u8 = 0x4e;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    Op0 = 0x00,
    PushData1 = 0x4c,
    PushData2 = 0x4d,
    Op1Negate = 0x4f,
    Op1 = 0x51,
    Op2 = 0x52,
    Op3 = 0x53,
    Op4 = 0x54,
    Op5 = 0x55,
    Op6 = 0x56,
    Op7 = 0x57,
    Op8 = 0x58,
    Op9 = 0x59,
    Op10 = 0x5a,
    Op11 = 0x5b,
    Op12 = 0x5c,
    Op13 = 0x5d,
    Op14 = 0x5e,
    Op15 = 0x5f,
    Op16 = 0x60,
    Nop = 0x61,
    Verify = 0x69,
    Return = 0x6a,
    ToAltStack = 0x6b,
    FromAltStack = 0x6c,
    TwoDrop = 0x6d,
    TwoDup = 0x6e,
    Depth = 0x74,
    Drop = 0x75,
    Dup = 0x76,
    Nip = 0x77,
    Over = 0x78,
    Swap = 0x7c,
    Size = 0x82,
    Equal = 0x87,
    EqualVerify = 0x88,
    OneAdd = 0x8b,
    OneSub = 0x8c,
    Negate = 0x8f,
    Abs = 0x90,
    Not = 0x91,
    ZeroNotEqual = 0x92,
    Add = 0x93,
    Sub = 0x94,
    NumEqual = 0x9c,
    NumEqualVerify = 0x9d,
    Ripemd160 = 0xa6,
    Sha256 = 0xa8,
    Hash160 = 0xa9,
    Hash256 = 0xaa,
    CheckSig = 0xac,
    CheckSigVerify = 0xad,
}

impl Opcode {
    /// Every opcode in ascending byte order
    #[rustfmt::skip]
    pub const ALL: [Opcode; 52] = [
        Opcode::Op0, Opcode::PushData1, Opcode::PushData2, Opcode::Op1Negate,
        Opcode::Op1, Opcode::Op2, Opcode::Op3, Opcode::Op4,
        Opcode::Op5, Opcode::Op6, Opcode::Op7, Opcode::Op8,
        Opcode::Op9, Opcode::Op10, Opcode::Op11, Opcode::Op12,
        Opcode::Op13, Opcode::Op14, Opcode::Op15, Opcode::Op16,
        Opcode::Nop, Opcode::Verify, Opcode::Return, Opcode::ToAltStack,
        Opcode::FromAltStack, Opcode::TwoDrop, Opcode::TwoDup, Opcode::Depth,
        Opcode::Drop, Opcode::Dup, Opcode::Nip, Opcode::Over,
        Opcode::Swap, Opcode::Size, Opcode::Equal, Opcode::EqualVerify,
        Opcode::OneAdd, Opcode::OneSub, Opcode::Negate, Opcode::Abs,
        Opcode::Not, Opcode::ZeroNotEqual, Opcode::Add, Opcode::Sub,
        Opcode::NumEqual, Opcode::NumEqualVerify, Opcode::Ripemd160, Opcode::Sha256,
        Opcode::Hash160, Opcode::Hash256, Opcode::CheckSig, Opcode::CheckSigVerify,
    ];

    pub fn byte(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Opcode::Op0 => "OP_0",
            Opcode::PushData1 => "OP_PUSHDATA1",
            Opcode::PushData2 => "OP_PUSHDATA2",
            Opcode::Op1Negate => "OP_1NEGATE",
            Opcode::Op1 => "OP_1",
            Opcode::Op2 => "OP_2",
            Opcode::Op3 => "OP_3",
            Opcode::Op4 => "OP_4",
            Opcode::Op5 => "OP_5",
            Opcode::Op6 => "OP_6",
            Opcode::Op7 => "OP_7",
            Opcode::Op8 => "OP_8",
            Opcode::Op9 => "OP_9",
            Opcode::Op10 => "OP_10",
            Opcode::Op11 => "OP_11",
            Opcode::Op12 => "OP_12",
            Opcode::Op13 => "OP_13",
            Opcode::Op14 => "OP_14",
            Opcode::Op15 => "OP_15",
            Opcode::Op16 => "OP_16",
            Opcode::Nop => "OP_NOP",
            Opcode::Verify => "OP_VERIFY",
            Opcode::Return => "OP_RETURN",
            Opcode::ToAltStack => "OP_TOALTSTACK",
            Opcode::FromAltStack => "OP_FROMALTSTACK",
            Opcode::TwoDrop => "OP_2DROP",
            Opcode::TwoDup => "OP_2DUP",
            Opcode::Depth => "OP_DEPTH",
            Opcode::Drop => "OP_DROP",
            Opcode::Dup => "OP_DUP",
            Opcode::Nip => "OP_NIP",
            Opcode::Over => "OP_OVER",
            Opcode::Swap => "OP_SWAP",
            Opcode::Size => "OP_SIZE",
            Opcode::Equal => "OP_EQUAL",
            Opcode::EqualVerify => "OP_EQUALVERIFY",
            Opcode::OneAdd => "OP_1ADD",
            Opcode::OneSub => "OP_1SUB",
            Opcode::Negate => "OP_NEGATE",
            Opcode::Abs => "OP_ABS",
            Opcode::Not => "OP_NOT",
            Opcode::ZeroNotEqual => "OP_0NOTEQUAL",
            Opcode::Add => "OP_ADD",
            Opcode::Sub => "OP_SUB",
            Opcode::NumEqual => "OP_NUMEQUAL",
            Opcode::NumEqualVerify => "OP_NUMEQUALVERIFY",
            Opcode::Ripemd160 => "OP_RIPEMD160",
            Opcode::Sha256 => "OP_SHA256",
            Opcode::Hash160 => "OP_HASH160",
            Opcode::Hash256 => "OP_HASH256",
            Opcode::CheckSig => "OP_CHECKSIG",
            Opcode::CheckSigVerify => "OP_CHECKSIGVERIFY",
        }
    }

    /// Value pushed by `OP_1NEGATE` and `OP_1`..`OP_16`
    pub fn small_int(self) -> Option<i64> {
        match self {
            Opcode::Op1Negate => Some(-1),
            op if (Opcode::Op1.byte()..=Opcode::Op16.byte()).contains(&op.byte()) => {
                Some((op.byte() - Opcode::Op1.byte() + 1) as i64)
            }
            _ => None,
        }
    }
}

impl TryFrom<u8> for Opcode {
    type Error = Error;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        let op = match byte {
            0x00 => Opcode::Op0,
            0x4c => Opcode::PushData1,
            0x4d => Opcode::PushData2,
            0x4f => Opcode::Op1Negate,
            0x51 => Opcode::Op1,
            0x52 => Opcode::Op2,
            0x53 => Opcode::Op3,
            0x54 => Opcode::Op4,
            0x55 => Opcode::Op5,
            0x56 => Opcode::Op6,
            0x57 => Opcode::Op7,
            0x58 => Opcode::Op8,
            0x59 => Opcode::Op9,
            0x5a => Opcode::Op10,
            0x5b => Opcode::Op11,
            0x5c => Opcode::Op12,
            0x5d => Opcode::Op13,
            0x5e => Opcode::Op14,
            0x5f => Opcode::Op15,
            0x60 => Opcode::Op16,
            0x61 => Opcode::Nop,
            0x69 => Opcode::Verify,
            0x6a => Opcode::Return,
            0x6b => Opcode::ToAltStack,
            0x6c => Opcode::FromAltStack,
            0x6d => Opcode::TwoDrop,
            0x6e => Opcode::TwoDup,
            0x74 => Opcode::Depth,
            0x75 => Opcode::Drop,
            0x76 => Opcode::Dup,
            0x77 => Opcode::Nip,
            0x78 => Opcode::Over,
            0x7c => Opcode::Swap,
            0x82 => Opcode::Size,
            0x87 => Opcode::Equal,
            0x88 => Opcode::EqualVerify,
            0x8b => Opcode::OneAdd,
            0x8c => Opcode::OneSub,
            0x8f => Opcode::Negate,
            0x90 => Opcode::Abs,
            0x91 => Opcode::Not,
            0x92 => Opcode::ZeroNotEqual,
            0x93 => Opcode::Add,
            0x94 => Opcode::Sub,
            0x9c => Opcode::NumEqual,
            0x9d => Opcode::NumEqualVerify,
            0xa6 => Opcode::Ripemd160,
            0xa8 => Opcode::Sha256,
            0xa9 => Opcode::Hash160,
            0xaa => Opcode::Hash256,
            0xac => Opcode::CheckSig,
            0xad => Opcode::CheckSigVerify,
            other => return Err(Error::UnsupportedOpcode(other)),
        };
        Ok(op)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
