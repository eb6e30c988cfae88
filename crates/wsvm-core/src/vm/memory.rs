//! VM Memory Model
//!
//! Heap, call stack and the label table. The label table is built once
//! from the program and never changes afterwards.

use std::collections::btree_map::{self, BTreeMap};
use std::collections::HashMap;

use tracing::warn;

use crate::bytecode::{Instruction, Label, Program};
use crate::config::DuplicateLabels;
use crate::error::{FaultKind, LabelError};

/// Sparse word-addressed store; unwritten addresses read as 0
#[derive(Debug, Default)]
pub struct Heap {
    cells: BTreeMap<i64, i64>,
}

impl Heap {
    pub fn new() -> Self {
        Heap {
            cells: BTreeMap::new(),
        }
    }

    pub fn load(&self, address: i64) -> i64 {
        self.cells.get(&address).copied().unwrap_or(0)
    }

    pub fn store(&mut self, address: i64, value: i64) {
        self.cells.insert(address, value);
    }

    /// Number of addresses ever written
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Written cells in address order
    pub fn iter(&self) -> btree_map::Iter<'_, i64, i64> {
        self.cells.iter()
    }
}

/// Saved return indices
#[derive(Debug, Default)]
pub struct CallStack {
    frames: Vec<usize>,
}

impl CallStack {
    pub fn new() -> Self {
        CallStack { frames: Vec::new() }
    }

    pub fn push(&mut self, return_pc: usize) {
        self.frames.push(return_pc);
    }

    pub fn pop(&mut self) -> Result<usize, FaultKind> {
        self.frames.pop().ok_or(FaultKind::EmptyCallStack)
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

/// Label identifier to instruction index
#[derive(Debug, Default)]
pub struct LabelTable {
    targets: HashMap<Label, usize>,
}

impl LabelTable {
    /// Single forward scan over every LABEL instruction
    pub fn build(program: &Program, policy: DuplicateLabels) -> Result<Self, LabelError> {
        let mut targets = HashMap::new();
        for (index, instruction) in program.iter().enumerate() {
            let Instruction::Label(label) = *instruction else {
                continue;
            };
            if let Some(first) = targets.insert(label, index) {
                match policy {
                    DuplicateLabels::Reject => {
                        return Err(LabelError::Duplicate {
                            label,
                            first,
                            second: index,
                        });
                    }
                    DuplicateLabels::LastWins => {
                        warn!(%label, first, second = index, "duplicate label, last definition wins");
                    }
                }
            }
        }
        Ok(LabelTable { targets })
    }

    pub fn resolve(&self, label: Label) -> Result<usize, FaultKind> {
        self.targets
            .get(&label)
            .copied()
            .ok_or(FaultKind::UndefinedLabel(label))
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heap_reads_zero_for_unwritten_addresses() {
        let mut heap = Heap::new();
        assert_eq!(heap.load(-5), 0);
        heap.store(-5, 9);
        heap.store(3, 1);
        heap.store(-5, 10);
        assert_eq!(heap.load(-5), 10);
        assert_eq!(heap.iter().collect::<Vec<_>>(), vec![(&-5, &10), (&3, &1)]);
    }

    #[test]
    fn call_stack_underflow() {
        let mut calls = CallStack::new();
        assert_eq!(calls.pop(), Err(FaultKind::EmptyCallStack));
        calls.push(4);
        assert_eq!(calls.depth(), 1);
        assert_eq!(calls.pop(), Ok(4));
    }

    fn program_with_duplicate() -> Program {
        Program::new(vec![
            Instruction::Label(Label(1)),
            Instruction::Dup,
            Instruction::Label(Label(1)),
            Instruction::Label(Label(2)),
        ])
    }

    #[test]
    fn last_duplicate_wins_by_default() {
        let table = LabelTable::build(&program_with_duplicate(), DuplicateLabels::LastWins).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve(Label(1)), Ok(2));
        assert_eq!(table.resolve(Label(2)), Ok(3));
        assert_eq!(table.resolve(Label(3)), Err(FaultKind::UndefinedLabel(Label(3))));
    }

    #[test]
    fn strict_policy_rejects_duplicates() {
        let err = LabelTable::build(&program_with_duplicate(), DuplicateLabels::Reject).unwrap_err();
        assert_eq!(
            err,
            LabelError::Duplicate {
                label: Label(1),
                first: 0,
                second: 2
            }
        );
    }
}
