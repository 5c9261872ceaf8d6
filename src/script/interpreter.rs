//! Stack machine that evaluates a [`Script`]
//!
//! Commands are consumed front to back. Data is pushed verbatim; opcodes are
//! dispatched to handlers that manipulate the main and alt stacks. The first
//! handler error halts evaluation with [`Outcome::Failure`]. Once the commands
//! run out, the result is [`Outcome::Success`] iff the stack is non-empty and its
//! top element is true under [`cast_to_bool`].

use super::num::{cast_to_bool, decode_num, encode_num, MAX_NUM_LEN};
use super::opcode::Opcode;
use super::{Command, Script};
use crate::ecdsa::Signature;
use crate::elliptic_curve::Point;
use crate::encoding::hash::{hash160, hash256, ripemd160, sha256};
use crate::error::{Error, Result};
use log::{debug, trace};
use num_bigint::BigUint;
use std::collections::VecDeque;

/// Final verdict of an evaluation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Ready,
    Running,
    Halted(Outcome),
}

/// Evaluation stack of byte strings
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stack(Vec<Vec<u8>>);

impl Stack {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, data: Vec<u8>) {
        self.0.push(data);
    }

    pub fn pop(&mut self) -> Result<Vec<u8>> {
        self.0.pop().ok_or(Error::StackUnderflow)
    }

    /// Top element without removing it
    pub fn peek(&self) -> Result<&Vec<u8>> {
        self.0.last().ok_or(Error::StackUnderflow)
    }

    /// Element at `depth` from the top (0 is the top)
    pub fn get(&self, depth: usize) -> Result<&Vec<u8>> {
        if depth >= self.0.len() {
            return Err(Error::StackUnderflow);
        }
        Ok(&self.0[self.0.len() - 1 - depth])
    }

    /// Remove the element at `depth` from the top
    pub fn remove(&mut self, depth: usize) -> Result<Vec<u8>> {
        if depth >= self.0.len() {
            return Err(Error::StackUnderflow);
        }
        let index = self.0.len() - 1 - depth;
        Ok(self.0.remove(index))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Elements bottom to top
    pub fn as_slice(&self) -> &[Vec<u8>] {
        &self.0
    }

    pub fn push_num(&mut self, num: i64) {
        self.push(encode_num(num));
    }

    pub fn pop_num(&mut self) -> Result<i64> {
        decode_num(&self.pop()?)
    }

    pub fn push_bool(&mut self, value: bool) {
        self.push_num(value as i64);
    }
}

pub struct Interpreter {
    stack: Stack,
    alt_stack: Stack,
    commands: VecDeque<Command>,
    state: State,
}

fn checked(result: Option<i64>) -> Result<i64> {
    result.ok_or(Error::NumberOverflow(MAX_NUM_LEN))
}

impl Interpreter {
    pub fn new(script: &Script) -> Self {
        Interpreter {
            stack: Stack::new(),
            alt_stack: Stack::new(),
            commands: script.commands().iter().cloned().collect(),
            state: State::Ready,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn alt_stack(&self) -> &Stack {
        &self.alt_stack
    }

    /// Run every remaining command against digest `z`
    ///
    /// Running an already halted interpreter returns its recorded outcome.
    pub fn run(&mut self, z: &BigUint) -> Outcome {
        if let State::Halted(outcome) = self.state {
            return outcome;
        }
        self.state = State::Running;

        while let Some(command) = self.commands.pop_front() {
            match command {
                Command::Data(data) => self.stack.push(data),
                Command::Op(byte) => {
                    if let Err(e) = self.execute(byte, z) {
                        debug!("script failed at opcode 0x{:02x}: {}", byte, e);
                        return self.halt(Outcome::Failure);
                    }
                }
            }
        }

        let outcome = match self.stack.peek() {
            Ok(top) if cast_to_bool(top) => Outcome::Success,
            Ok(_) => {
                debug!("script left a false value on top of the stack");
                Outcome::Failure
            }
            Err(_) => {
                debug!("script left an empty stack");
                Outcome::Failure
            }
        };
        self.halt(outcome)
    }

    fn halt(&mut self, outcome: Outcome) -> Outcome {
        self.state = State::Halted(outcome);
        outcome
    }

    fn execute(&mut self, byte: u8, z: &BigUint) -> Result<()> {
        let op = Opcode::try_from(byte)?;
        trace!("{} (stack depth {})", op, self.stack.len());

        if let Some(n) = op.small_int() {
            self.stack.push_num(n);
            return Ok(());
        }

        let stack = &mut self.stack;
        match op {
            Opcode::Op0 => stack.push(Vec::new()),
            // Consumed by the parser; never dispatched
            Opcode::PushData1 | Opcode::PushData2 => return Err(Error::UnsupportedOpcode(byte)),
            Opcode::Nop => {}
            Opcode::Verify => verify_top(stack)?,
            Opcode::Return => return Err(Error::VerifyFailed),

            Opcode::ToAltStack => {
                let top = stack.pop()?;
                self.alt_stack.push(top);
            }
            Opcode::FromAltStack => {
                let top = self.alt_stack.pop()?;
                stack.push(top);
            }
            Opcode::TwoDrop => {
                stack.get(1)?;
                stack.pop()?;
                stack.pop()?;
            }
            Opcode::TwoDup => {
                let second = stack.get(1)?.clone();
                let top = stack.get(0)?.clone();
                stack.push(second);
                stack.push(top);
            }
            Opcode::Depth => {
                let depth = stack.len() as i64;
                stack.push_num(depth);
            }
            Opcode::Drop => {
                stack.pop()?;
            }
            Opcode::Dup => {
                let top = stack.peek()?.clone();
                stack.push(top);
            }
            Opcode::Nip => {
                stack.remove(1)?;
            }
            Opcode::Over => {
                let second = stack.get(1)?.clone();
                stack.push(second);
            }
            Opcode::Swap => {
                let second = stack.remove(1)?;
                stack.push(second);
            }
            Opcode::Size => {
                let size = stack.peek()?.len() as i64;
                stack.push_num(size);
            }

            Opcode::Equal => {
                let a = stack.pop()?;
                let b = stack.pop()?;
                stack.push_bool(a == b);
            }
            Opcode::EqualVerify => {
                let a = stack.pop()?;
                let b = stack.pop()?;
                if a != b {
                    return Err(Error::VerifyFailed);
                }
            }

            Opcode::OneAdd => {
                let n = stack.pop_num()?;
                stack.push_num(checked(n.checked_add(1))?);
            }
            Opcode::OneSub => {
                let n = stack.pop_num()?;
                stack.push_num(checked(n.checked_sub(1))?);
            }
            Opcode::Negate => {
                let n = stack.pop_num()?;
                stack.push_num(-n);
            }
            Opcode::Abs => {
                let n = stack.pop_num()?;
                stack.push_num(n.abs());
            }
            Opcode::Not => {
                let n = stack.pop_num()?;
                stack.push_bool(n == 0);
            }
            Opcode::ZeroNotEqual => {
                let n = stack.pop_num()?;
                stack.push_bool(n != 0);
            }
            Opcode::Add => {
                let a = stack.pop_num()?;
                let b = stack.pop_num()?;
                stack.push_num(checked(b.checked_add(a))?);
            }
            Opcode::Sub => {
                let a = stack.pop_num()?;
                let b = stack.pop_num()?;
                stack.push_num(checked(b.checked_sub(a))?);
            }
            Opcode::NumEqual => {
                let a = stack.pop_num()?;
                let b = stack.pop_num()?;
                stack.push_bool(a == b);
            }
            Opcode::NumEqualVerify => {
                let a = stack.pop_num()?;
                let b = stack.pop_num()?;
                if a != b {
                    return Err(Error::VerifyFailed);
                }
            }

            Opcode::Ripemd160 => {
                let data = stack.pop()?;
                stack.push(ripemd160(&data).to_vec());
            }
            Opcode::Sha256 => {
                let data = stack.pop()?;
                stack.push(sha256(&data).to_vec());
            }
            Opcode::Hash160 => {
                let data = stack.pop()?;
                stack.push(hash160(&data).to_vec());
            }
            Opcode::Hash256 => {
                let data = stack.pop()?;
                stack.push(hash256(&data).to_vec());
            }

            Opcode::CheckSig => {
                let valid = check_sig(stack, z)?;
                stack.push_bool(valid);
            }
            Opcode::CheckSigVerify => {
                if !check_sig(stack, z)? {
                    return Err(Error::VerifyFailed);
                }
            }

            Opcode::Op1Negate
            | Opcode::Op1
            | Opcode::Op2
            | Opcode::Op3
            | Opcode::Op4
            | Opcode::Op5
            | Opcode::Op6
            | Opcode::Op7
            | Opcode::Op8
            | Opcode::Op9
            | Opcode::Op10
            | Opcode::Op11
            | Opcode::Op12
            | Opcode::Op13
            | Opcode::Op14
            | Opcode::Op15
            | Opcode::Op16 => unreachable!("small integers are pushed above"),
        }
        Ok(())
    }
}

fn verify_top(stack: &mut Stack) -> Result<()> {
    if cast_to_bool(&stack.pop()?) {
        Ok(())
    } else {
        Err(Error::VerifyFailed)
    }
}

/// Pop a SEC public key, then a DER signature with its trailing hash-type byte,
/// and verify the signature against `z`
fn check_sig(stack: &mut Stack, z: &BigUint) -> Result<bool> {
    let sec = stack.pop()?;
    let signature = stack.pop()?;

    let (_hash_type, der) = signature
        .split_last()
        .ok_or_else(|| Error::MalformedSignature("empty signature element".to_string()))?;
    let point = Point::parse_sec(&sec)?;
    let signature = Signature::parse_der(der)?;
    Ok(point.verify(z, &signature))
}
