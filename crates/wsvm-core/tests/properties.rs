//! Property-based tests using proptest
//!
//! Stack identities, heap storage and conditional jumps must hold for all
//! word values, not just the hand-picked ones in the unit tests.

use proptest::prelude::*;
use wsvm_core::{ArithmeticMode, Instruction, Label, Program, VirtualMachine, VmConfig};

fn final_stack(instructions: Vec<Instruction>, config: VmConfig) -> Vec<i64> {
    let mut vm = VirtualMachine::with_io(Program::new(instructions), config, &b""[..], Vec::new())
        .expect("label resolution failed");
    vm.execute().expect("execution failed");
    vm.stack().to_vec()
}

fn pushes(values: &[i64]) -> Vec<Instruction> {
    values.iter().map(|&v| Instruction::Push(v)).collect()
}

/// Program that pushes 1 if `jump` branches on `value`, else 0
fn branch_taken(jump: fn(Label) -> Instruction, value: i64) -> bool {
    let program = vec![
        Instruction::Push(value),
        jump(Label(1)),
        Instruction::Push(0),
        Instruction::End,
        Instruction::Label(Label(1)),
        Instruction::Push(1),
    ];
    final_stack(program, VmConfig::new()) == vec![1]
}

proptest! {
    #[test]
    fn push_push_add_leaves_the_sum(v in any::<i64>(), w in any::<i64>()) {
        let program = vec![Instruction::Push(v), Instruction::Push(w), Instruction::Add];
        let config = VmConfig::new().with_arithmetic(ArithmeticMode::Wrapping);
        prop_assert_eq!(final_stack(program, config), vec![v.wrapping_add(w)]);
    }

    #[test]
    fn checked_add_agrees_when_in_range(v in -1_000_000_000i64..1_000_000_000, w in -1_000_000_000i64..1_000_000_000) {
        let program = vec![Instruction::Push(v), Instruction::Push(w), Instruction::Add];
        prop_assert_eq!(final_stack(program, VmConfig::new()), vec![v + w]);
    }

    #[test]
    fn swap_twice_is_identity(values in prop::collection::vec(any::<i64>(), 2..16)) {
        let mut program = pushes(&values);
        program.extend([Instruction::Swap, Instruction::Swap]);
        prop_assert_eq!(final_stack(program, VmConfig::new()), values);
    }

    #[test]
    fn dup_drop_is_identity(values in prop::collection::vec(any::<i64>(), 1..16)) {
        let mut program = pushes(&values);
        program.extend([Instruction::Dup, Instruction::Drop]);
        prop_assert_eq!(final_stack(program, VmConfig::new()), values);
    }

    #[test]
    fn retrieve_returns_last_store(
        address in any::<i64>(),
        value in any::<i64>(),
        others in prop::collection::vec((any::<i64>(), any::<i64>()), 0..8),
    ) {
        let mut program = vec![Instruction::Push(address), Instruction::Push(value), Instruction::Store];
        for (other, v) in others.into_iter().filter(|(a, _)| *a != address) {
            program.extend([Instruction::Push(other), Instruction::Push(v), Instruction::Store]);
        }
        program.extend([Instruction::Push(address), Instruction::Retrieve]);
        prop_assert_eq!(final_stack(program, VmConfig::new()), vec![value]);
    }

    #[test]
    fn jz_jumps_only_on_zero(value in any::<i64>()) {
        prop_assert_eq!(branch_taken(Instruction::JumpZero, value), value == 0);
    }

    #[test]
    fn jn_jumps_only_on_negative(value in any::<i64>()) {
        prop_assert_eq!(branch_taken(Instruction::JumpNegative, value), value < 0);
    }
}

#[test]
fn conditional_jumps_at_the_edges() {
    for value in [-1, 0, 1, i64::MIN, i64::MAX] {
        assert_eq!(branch_taken(Instruction::JumpZero, value), value == 0, "jz {}", value);
        assert_eq!(branch_taken(Instruction::JumpNegative, value), value < 0, "jn {}", value);
    }
}

#[test]
fn call_resumes_after_the_call_site_at_any_depth() {
    for depth in [1usize, 2, 50] {
        // chain of subroutines: label i calls label i + 1, the last one returns
        let mut program = vec![Instruction::Call(Label(0)), Instruction::Push(-1), Instruction::End];
        for level in 0..depth as u64 {
            program.push(Instruction::Label(Label(level)));
            program.push(Instruction::Push(level as i64));
            if level + 1 < depth as u64 {
                program.push(Instruction::Call(Label(level + 1)));
            }
            program.push(Instruction::Return);
        }
        let mut expected: Vec<i64> = (0..depth as i64).collect();
        expected.push(-1);
        assert_eq!(final_stack(program, VmConfig::new()), expected);
    }
}
