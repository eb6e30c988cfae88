//! Virtual Machine Core
//!
//! Fetch-decode-execute loop over a decoded `Program`. The VM owns its
//! operand stack, heap, call stack and label table; I/O goes through the
//! injected input source and output sink.

use std::io::{self, BufRead, Stdout, StdinLock, Write};

use tracing::{debug, trace};

use crate::bytecode::{Instruction, Label, Program};
use crate::config::{ArithmeticMode, VmConfig};
use crate::error::{FaultKind, LabelError, RuntimeFault, WsvmResult};

use super::input;
use super::memory::{CallStack, Heap, LabelTable};
use super::stack::Stack;

/// Where execution continues after an instruction
enum Flow {
    Next,
    Jump(usize),
    Halt,
}

#[derive(Clone, Copy)]
enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    /// `lhs ∘ rhs`; division truncates toward zero, remainder takes the sign of `lhs`
    fn apply(self, lhs: i64, rhs: i64, mode: ArithmeticMode) -> Result<i64, FaultKind> {
        if matches!(self, BinaryOp::Div | BinaryOp::Mod) && rhs == 0 {
            return Err(FaultKind::DivisionByZero);
        }
        match mode {
            ArithmeticMode::Checked => match self {
                BinaryOp::Add => lhs.checked_add(rhs),
                BinaryOp::Sub => lhs.checked_sub(rhs),
                BinaryOp::Mul => lhs.checked_mul(rhs),
                BinaryOp::Div => lhs.checked_div(rhs),
                // i64::MIN % -1 is 0, not an overflow
                BinaryOp::Mod => Some(lhs.wrapping_rem(rhs)),
            }
            .ok_or(FaultKind::Overflow),
            ArithmeticMode::Wrapping => Ok(match self {
                BinaryOp::Add => lhs.wrapping_add(rhs),
                BinaryOp::Sub => lhs.wrapping_sub(rhs),
                BinaryOp::Mul => lhs.wrapping_mul(rhs),
                BinaryOp::Div => lhs.wrapping_div(rhs),
                BinaryOp::Mod => lhs.wrapping_rem(rhs),
            }),
        }
    }
}

/// Stack machine executing one program
pub struct VirtualMachine<R = StdinLock<'static>, W = Stdout> {
    config: VmConfig,
    program: Program,
    labels: LabelTable,

    stack: Stack,
    heap: Heap,
    call_stack: CallStack,

    pc: usize,
    halted: bool,

    input: R,
    output: W,
}

impl VirtualMachine {
    /// Create a VM bound to the process's standard input and output
    pub fn new(program: Program, config: VmConfig) -> Result<Self, LabelError> {
        Self::with_io(program, config, io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> VirtualMachine<R, W> {
    /// Create a VM with explicit I/O; resolves every label up front
    pub fn with_io(program: Program, config: VmConfig, input: R, output: W) -> Result<Self, LabelError> {
        let labels = LabelTable::build(&program, config.duplicate_labels)?;
        debug!(
            instructions = program.len(),
            labels = labels.len(),
            "label table built"
        );

        Ok(VirtualMachine {
            halted: program.is_empty(),
            config,
            program,
            labels,
            stack: Stack::new(),
            heap: Heap::new(),
            call_stack: CallStack::new(),
            pc: 0,
            input,
            output,
        })
    }

    /// Run until the program counter leaves the program, END, or a fault.
    ///
    /// The output sink is flushed when execution stops without a fault.
    pub fn execute(&mut self) -> WsvmResult<()> {
        while self.step()? {}
        self.output.flush()?;
        Ok(())
    }

    /// Execute one instruction; returns whether execution can continue
    pub fn step(&mut self) -> Result<bool, RuntimeFault> {
        if self.halted {
            return Ok(false);
        }
        let pc = self.pc;
        let Some(&instruction) = self.program.get(pc) else {
            self.halted = true;
            return Ok(false);
        };
        trace!(pc, %instruction, depth = self.stack.size(), "step");

        match self.dispatch(instruction) {
            Ok(Flow::Next) => self.pc = pc + 1,
            Ok(Flow::Jump(target)) => self.pc = target,
            Ok(Flow::Halt) => self.pc = self.program.len(),
            Err(kind) => {
                self.halted = true;
                let fault = RuntimeFault {
                    opcode: instruction.opcode(),
                    pc,
                    kind,
                };
                debug!(%fault, "execution faulted");
                return Err(fault);
            }
        }

        if self.pc >= self.program.len() {
            self.halted = true;
        }
        Ok(!self.halted)
    }

    fn dispatch(&mut self, instruction: Instruction) -> Result<Flow, FaultKind> {
        match instruction {
            // Stack
            Instruction::Push(value) => self.stack.push(value),
            Instruction::Dup => self.stack.dup()?,
            Instruction::Copy(n) => self.stack.copy(n)?,
            Instruction::Swap => self.stack.swap()?,
            Instruction::Drop => self.stack.drop_top()?,
            Instruction::Slide(n) => self.stack.slide(n)?,

            // Arithmetic
            Instruction::Add => self.arithmetic(BinaryOp::Add)?,
            Instruction::Sub => self.arithmetic(BinaryOp::Sub)?,
            Instruction::Mul => self.arithmetic(BinaryOp::Mul)?,
            Instruction::Div => self.arithmetic(BinaryOp::Div)?,
            Instruction::Mod => self.arithmetic(BinaryOp::Mod)?,

            // Heap
            Instruction::Store => {
                let (address, value) = self.stack.pop_pair()?;
                self.heap.store(address, value);
            }
            Instruction::Retrieve => {
                let address = self.stack.pop()?;
                self.stack.push(self.heap.load(address));
            }

            // Flow control
            Instruction::Label(_) => {}
            Instruction::Call(label) => {
                let target = self.labels.resolve(label)?;
                self.call_stack.push(self.pc + 1);
                return Ok(Flow::Jump(target));
            }
            Instruction::Jump(label) => return self.jump(label),
            Instruction::JumpZero(label) => {
                if self.stack.pop()? == 0 {
                    return self.jump(label);
                }
            }
            Instruction::JumpNegative(label) => {
                if self.stack.pop()? < 0 {
                    return self.jump(label);
                }
            }
            Instruction::Return => return Ok(Flow::Jump(self.call_stack.pop()?)),
            Instruction::End => return Ok(Flow::Halt),

            // I/O
            Instruction::PrintChar => {
                let value = self.stack.pop()?;
                // low-order byte only
                self.output.write_all(&[value as u8]).map_err(io_fault)?;
            }
            Instruction::PrintInt => {
                let value = self.stack.pop()?;
                write!(self.output, "{}", value).map_err(io_fault)?;
            }
            Instruction::ReadChar => {
                self.output.flush().map_err(io_fault)?;
                let value = input::read_char(&mut self.input)?;
                self.stack.push(value);
            }
            Instruction::ReadInt => {
                self.output.flush().map_err(io_fault)?;
                let value = input::read_integer(&mut self.input)?;
                self.stack.push(value);
            }
        }
        Ok(Flow::Next)
    }

    fn arithmetic(&mut self, op: BinaryOp) -> Result<(), FaultKind> {
        let (lhs, rhs) = self.stack.pop_pair()?;
        let result = op.apply(lhs, rhs, self.config.arithmetic)?;
        self.stack.push(result);
        Ok(())
    }

    fn jump(&self, label: Label) -> Result<Flow, FaultKind> {
        self.labels.resolve(label).map(Flow::Jump)
    }

    /// Operand stack, bottom to top
    pub fn stack(&self) -> &[i64] {
        self.stack.as_slice()
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn call_depth(&self) -> usize {
        self.call_stack.depth()
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

fn io_fault(err: io::Error) -> FaultKind {
    FaultKind::Io(err.to_string())
}
