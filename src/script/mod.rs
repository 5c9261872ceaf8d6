//! Script: the bytecode that locks and unlocks outputs
//!
//! A [`Script`] is an ordered list of [`Command`]s. Spending concatenates the
//! unlocking script with the locking script and runs the result through the
//! [`Interpreter`]; the spend is authorized iff evaluation ends in
//! [`Outcome::Success`].
//!
//! ## Bytecode
//!
//! | byte            | meaning                                        |
//! |-----------------|------------------------------------------------|
//! | `0x01..=0x4b`   | push the next N bytes                          |
//! | `0x4c`          | `OP_PUSHDATA1`: 1-byte length, then data       |
//! | `0x4d`          | `OP_PUSHDATA2`: 2-byte little-endian length    |
//! | anything else   | opcode                                         |

pub mod interpreter;
pub mod num;
pub mod opcode;

pub use interpreter::{Interpreter, Outcome, Stack, State};
pub use num::{cast_to_bool, decode_num, encode_num};
pub use opcode::Opcode;

use crate::encoding::varint::{encode_varint, read_varint};
use crate::error::{Error, Result};
use log::debug;
use num_bigint::BigUint;
use self::opcode::{MAX_DIRECT_PUSH, MAX_PUSH_OPCODE};
use std::fmt;
use std::ops::Add;

/// Longest element a push can carry (`OP_PUSHDATA2` limit)
pub const MAX_PUSH_LEN: usize = 0xffff;

/// One step of a script: an opcode byte or a data element
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    Op(u8),
    Data(Vec<u8>),
}

impl From<Opcode> for Command {
    fn from(op: Opcode) -> Self {
        Command::Op(op.byte())
    }
}

impl From<Vec<u8>> for Command {
    fn from(data: Vec<u8>) -> Self {
        Command::Data(data)
    }
}

impl From<&[u8]> for Command {
    fn from(data: &[u8]) -> Self {
        Command::Data(data.to_vec())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Script {
    commands: Vec<Command>,
}

fn truncated(what: &str, needed: usize, available: usize) -> Error {
    debug!(
        "script {} needs {} bytes, {} available",
        what, needed, available
    );
    Error::MalformedScript(format!(
        "{} needs {} bytes, {} available",
        what, needed, available
    ))
}

/// Split `len` bytes off the front of `input`
fn take<'a>(input: &mut &'a [u8], len: usize, what: &str) -> Result<&'a [u8]> {
    if input.len() < len {
        return Err(truncated(what, len, input.len()));
    }
    let (head, tail) = input.split_at(len);
    *input = tail;
    Ok(head)
}

impl Script {
    pub fn new(commands: Vec<Command>) -> Self {
        Script { commands }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<Command> {
        self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Pay-to-public-key-hash locking script:
    /// `OP_DUP OP_HASH160 <hash160> OP_EQUALVERIFY OP_CHECKSIG`
    pub fn p2pkh(hash160: &[u8; 20]) -> Self {
        Script::new(vec![
            Opcode::Dup.into(),
            Opcode::Hash160.into(),
            Command::Data(hash160.to_vec()),
            Opcode::EqualVerify.into(),
            Opcode::CheckSig.into(),
        ])
    }

    /// Pay-to-public-key locking script: `<sec> OP_CHECKSIG`
    pub fn p2pk(sec: &[u8]) -> Self {
        Script::new(vec![Command::Data(sec.to_vec()), Opcode::CheckSig.into()])
    }

    /// Parse bytecode without a length prefix
    ///
    /// # Errors
    /// [`Error::MalformedScript`] when a push runs past the end of `raw`.
    pub fn parse_raw(raw: &[u8]) -> Result<Self> {
        let mut input = raw;
        let mut commands = Vec::new();

        while let Some((&byte, rest)) = input.split_first() {
            input = rest;
            let command = match byte {
                1..=MAX_DIRECT_PUSH => {
                    Command::Data(take(&mut input, byte as usize, "direct push")?.to_vec())
                }
                b if b == Opcode::PushData1.byte() => {
                    let len = take(&mut input, 1, "OP_PUSHDATA1 length")?[0] as usize;
                    Command::Data(take(&mut input, len, "OP_PUSHDATA1")?.to_vec())
                }
                b if b == Opcode::PushData2.byte() => {
                    let len_bytes = take(&mut input, 2, "OP_PUSHDATA2 length")?;
                    let len = u16::from_le_bytes([len_bytes[0], len_bytes[1]]) as usize;
                    Command::Data(take(&mut input, len, "OP_PUSHDATA2")?.to_vec())
                }
                op => Command::Op(op),
            };
            commands.push(command);
        }

        Ok(Script { commands })
    }

    /// Bytecode without a length prefix, using the shortest push for each element
    ///
    /// # Errors
    /// [`Error::MalformedScript`] for an element longer than [`MAX_PUSH_LEN`],
    /// or a [`Command::Op`] holding a push-instruction byte (`0x01..=0x4e`).
    pub fn raw_serialize(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        for command in &self.commands {
            match command {
                Command::Op(op @ 1..=MAX_PUSH_OPCODE) => {
                    return Err(Error::MalformedScript(format!(
                        "opcode 0x{:02x} is a push instruction",
                        op
                    )));
                }
                Command::Op(op) => out.push(*op),
                Command::Data(data) => {
                    let len = data.len();
                    if len == 0 {
                        out.push(Opcode::Op0.byte());
                    } else if len <= MAX_DIRECT_PUSH as usize {
                        out.push(len as u8);
                    } else if len <= 0xff {
                        out.push(Opcode::PushData1.byte());
                        out.push(len as u8);
                    } else if len <= MAX_PUSH_LEN {
                        out.push(Opcode::PushData2.byte());
                        out.extend_from_slice(&(len as u16).to_le_bytes());
                    } else {
                        return Err(Error::MalformedScript(format!(
                            "element of {} bytes exceeds the {} byte push limit",
                            len, MAX_PUSH_LEN
                        )));
                    }
                    out.extend_from_slice(data);
                }
            }
        }
        Ok(out)
    }

    /// Parse a varint-prefixed script from the front of `input`, advancing it
    pub fn parse(input: &mut &[u8]) -> Result<Self> {
        let len = read_varint(input)?;
        let len = usize::try_from(len)
            .map_err(|_| Error::MalformedScript(format!("length {} does not fit", len)))?;
        let raw = take(input, len, "script body")?;
        Script::parse_raw(raw)
    }

    /// Varint length prefix followed by the bytecode
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let raw = self.raw_serialize()?;
        let mut out = encode_varint(raw.len() as u64);
        out.extend_from_slice(&raw);
        Ok(out)
    }

    /// Run the script against digest `z`; true iff it ends in [`Outcome::Success`]
    pub fn evaluate(&self, z: &BigUint) -> bool {
        Interpreter::new(self).run(z) == Outcome::Success
    }
}

/// `unlocking + locking`: the unlocking commands run first
impl Add for Script {
    type Output = Script;

    fn add(mut self, other: Script) -> Script {
        self.commands.extend(other.commands);
        self
    }
}

impl Add for &Script {
    type Output = Script;

    fn add(self, other: &Script) -> Script {
        let mut commands = self.commands.clone();
        commands.extend_from_slice(&other.commands);
        Script { commands }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Op(byte) => match Opcode::try_from(*byte) {
                Ok(op) => write!(f, "{}", op),
                Err(_) => write!(f, "OP_UNKNOWN_0x{:02x}", byte),
            },
            Command::Data(data) => write!(f, "{}", hex::encode(data)),
        }
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", command)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_p2pkh_bytecode() {
        let raw = hex::decode("76a914751e76e8199196d454941c45d1b3a323f1433bd688ac").unwrap();
        let script = Script::parse_raw(&raw).unwrap();
        let hash: [u8; 20] = hex::decode("751e76e8199196d454941c45d1b3a323f1433bd6")
            .unwrap()
            .try_into()
            .unwrap();
        assert_eq!(script, Script::p2pkh(&hash));
        assert_eq!(script.raw_serialize().unwrap(), raw);
    }

    #[test]
    fn test_pushdata_forms() {
        let small = vec![0xaa; 0x4b];
        let medium = vec![0xbb; 0x4c];
        let large = vec![0xcc; 0x100];
        let script = Script::new(vec![
            Command::Data(small.clone()),
            Command::Data(medium.clone()),
            Command::Data(large.clone()),
        ]);

        let raw = script.raw_serialize().unwrap();
        assert_eq!(raw[0], 0x4b);
        assert_eq!(&raw[1 + 0x4b..1 + 0x4b + 2], &[0x4c, 0x4c]);
        let large_at = 1 + 0x4b + 2 + 0x4c;
        assert_eq!(&raw[large_at..large_at + 3], &[0x4d, 0x00, 0x01]);

        assert_eq!(Script::parse_raw(&raw).unwrap(), script);
    }

    #[test]
    fn test_oversized_push_rejected() {
        let script = Script::new(vec![Command::Data(vec![0; MAX_PUSH_LEN + 1])]);
        assert!(matches!(
            script.raw_serialize(),
            Err(Error::MalformedScript(_))
        ));
    }

    #[test]
    fn test_push_bytes_as_opcodes_rejected() {
        for op in [0x01, 0x4b, 0x4c, 0x4d, 0x4e] {
            let script = Script::new(vec![Command::Op(op), Opcode::Op1.into()]);
            assert!(
                matches!(script.raw_serialize(), Err(Error::MalformedScript(_))),
                "serialized Op(0x{:02x})",
                op
            );
            assert!(script.serialize().is_err());
        }

        let script = Script::new(vec![Command::Op(0x4f), Command::Op(0x50)]);
        assert_eq!(script.raw_serialize().unwrap(), vec![0x4f, 0x50]);
    }

    #[test]
    fn test_truncated_pushes() {
        for raw in [
            &[0x05, 0x01, 0x02][..],
            &[0x4c][..],
            &[0x4c, 0x03, 0x01][..],
            &[0x4d, 0x01][..],
            &[0x4d, 0x02, 0x00, 0xff][..],
        ] {
            assert!(
                matches!(Script::parse_raw(raw), Err(Error::MalformedScript(_))),
                "accepted {:02x?}",
                raw
            );
        }
    }

    #[test]
    fn test_empty_data_serializes_as_op_0() {
        let script = Script::new(vec![Command::Data(Vec::new())]);
        assert_eq!(script.raw_serialize().unwrap(), vec![0x00]);
        assert_eq!(
            Script::parse_raw(&[0x00]).unwrap().commands(),
            &[Command::Op(0x00)]
        );
    }

    #[test]
    fn test_length_prefixed_round_trip() {
        let script = Script::p2pk(&[0x02; 33]) + Script::new(vec![Opcode::Verify.into()]);
        let bytes = script.serialize().unwrap();
        assert_eq!(bytes[0] as usize, bytes.len() - 1);

        let mut trailing = bytes.clone();
        trailing.push(0xff);
        let mut input = &trailing[..];
        assert_eq!(Script::parse(&mut input).unwrap(), script);
        assert_eq!(input, &[0xff]);
    }

    #[test]
    fn test_length_prefix_past_end() {
        let mut input: &[u8] = &[0x05, 0x76, 0x76];
        assert!(matches!(
            Script::parse(&mut input),
            Err(Error::MalformedScript(_))
        ));
    }

    #[test]
    fn test_concatenation_order() {
        let unlocking = Script::new(vec![Command::Data(vec![1])]);
        let locking = Script::new(vec![Opcode::Dup.into()]);
        let combined = &unlocking + &locking;
        assert_eq!(
            combined.commands(),
            &[Command::Data(vec![1]), Command::Op(0x76)]
        );
        assert_eq!(unlocking + locking, combined);
    }

    #[test]
    fn test_display() {
        let hash = [0x11u8; 20];
        let script = Script::p2pkh(&hash);
        assert_eq!(
            script.to_string(),
            format!(
                "OP_DUP OP_HASH160 {} OP_EQUALVERIFY OP_CHECKSIG",
                hex::encode(hash)
            )
        );
        assert_eq!(
            Script::new(vec![Command::Op(0xfe)]).to_string(),
            "OP_UNKNOWN_0xfe"
        );
    }
}
