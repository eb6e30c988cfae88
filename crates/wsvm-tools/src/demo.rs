//! Built-in sample programs

use wsvm_core::{Instruction, Label, Program};

/// Prints every integer from `min` to `max` followed by a space, then a newline
///
/// `min` is printed even when `max < min`. Under checked arithmetic the
/// program faults if `min - max` does not fit in an `i64`.
pub fn counting_program(min: i64, max: i64) -> Program {
    Program::new(vec![
        Instruction::Push(min),
        Instruction::Label(Label(0)),
        Instruction::Dup,
        Instruction::PrintInt,
        Instruction::Push(i64::from(b' ')),
        Instruction::PrintChar,
        Instruction::Dup,
        Instruction::Push(max),
        Instruction::Sub,
        Instruction::JumpNegative(Label(1)),
        Instruction::Drop,
        Instruction::Push(i64::from(b'\n')),
        Instruction::PrintChar,
        Instruction::End,
        // increment and loop
        Instruction::Label(Label(1)),
        Instruction::Push(1),
        Instruction::Add,
        Instruction::Jump(Label(0)),
    ])
}

/// Reads integers until a zero and prints their sum
pub fn sum_program() -> Program {
    Program::new(vec![
        Instruction::Push(0),
        Instruction::Label(Label(1)),
        Instruction::ReadInt,
        Instruction::Dup,
        Instruction::JumpZero(Label(2)),
        Instruction::Add,
        Instruction::Jump(Label(1)),
        Instruction::Label(Label(2)),
        Instruction::Drop,
        Instruction::PrintInt,
        Instruction::Push(i64::from(b'\n')),
        Instruction::PrintChar,
        Instruction::End,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use wsvm_core::{VirtualMachine, VmConfig};

    fn run(program: Program, input: &[u8]) -> String {
        let mut vm = VirtualMachine::with_io(program, VmConfig::new(), input, Vec::new()).unwrap();
        vm.execute().unwrap();
        String::from_utf8(vm.into_output()).unwrap()
    }

    #[test]
    fn counts_inclusive_range() {
        assert_eq!(run(counting_program(1, 10), b""), "1 2 3 4 5 6 7 8 9 10 \n");
        assert_eq!(run(counting_program(5, 5), b""), "5 \n");
        assert_eq!(run(counting_program(5, 3), b""), "5 \n");
    }

    #[test]
    fn counts_at_the_ends_of_the_word_range() {
        let min = i64::MIN;
        assert_eq!(run(counting_program(min, min + 1), b""), format!("{} {} \n", min, min + 1));
        let max = i64::MAX;
        assert_eq!(run(counting_program(max - 1, max), b""), format!("{} {} \n", max - 1, max));
    }

    #[test]
    fn sums_until_zero() {
        assert_eq!(run(sum_program(), b"3 -4\n10 0"), "9\n");
    }
}
