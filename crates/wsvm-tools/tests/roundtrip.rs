//! Emit, pack and disassemble against the core decoder and VM

use proptest::prelude::*;
use wsvm_core::{Instruction, Label, Program, VirtualMachine, VmConfig};
use wsvm_tools::codec::{pack, unpack, PackedProgram};
use wsvm_tools::demo::counting_program;
use wsvm_tools::disasm::{disassemble, ErrorMode};
use wsvm_tools::emit::to_source;

fn run(program: Program) -> String {
    let mut vm = VirtualMachine::with_io(program, VmConfig::new(), &b""[..], Vec::new()).unwrap();
    vm.execute().expect("execution failed");
    String::from_utf8(vm.into_output()).unwrap()
}

fn instruction() -> impl Strategy<Value = Instruction> {
    let label = any::<u64>().prop_map(Label);
    prop_oneof![
        any::<i64>().prop_map(Instruction::Push),
        any::<i64>().prop_map(Instruction::Copy),
        any::<i64>().prop_map(Instruction::Slide),
        Just(Instruction::Dup),
        Just(Instruction::Swap),
        Just(Instruction::Drop),
        Just(Instruction::Add),
        Just(Instruction::Mod),
        Just(Instruction::Store),
        Just(Instruction::Retrieve),
        label.clone().prop_map(Instruction::Label),
        label.clone().prop_map(Instruction::Call),
        label.prop_map(Instruction::JumpNegative),
        Just(Instruction::Return),
        Just(Instruction::End),
        Just(Instruction::ReadInt),
    ]
}

proptest! {
    #[test]
    fn unpack_restores_significant_symbols(source in prop::collection::vec(prop::sample::select(vec![b' ', b'\t', b'\n', b'x']), 0..256)) {
        let packed = PackedProgram::from_bytes(&pack(&source).to_bytes()).unwrap();
        let expected: Vec<u8> = source.iter().copied().filter(|&b| b != b'x').collect();
        prop_assert_eq!(unpack(&packed), expected);
    }

    #[test]
    fn emitted_programs_decode_unchanged(instructions in prop::collection::vec(instruction(), 0..32)) {
        let program = Program::new(instructions);
        let source = to_source(&program);
        prop_assert_eq!(Program::decode(&source[..]).unwrap(), program.clone());

        let restored = unpack(&pack(&source));
        prop_assert_eq!(Program::decode(&restored[..]).unwrap(), program);
    }
}

#[test]
fn packed_counting_program_still_counts() {
    let source = to_source(&counting_program(1, 10));
    let bytes = pack(&source).to_bytes();

    let restored = unpack(&PackedProgram::from_bytes(&bytes).unwrap());
    let program = Program::decode(&restored[..]).unwrap();
    assert_eq!(run(program), "1 2 3 4 5 6 7 8 9 10 \n");
}

#[test]
fn disassembly_lists_counting_program() {
    let source = to_source(&counting_program(1, 2));
    let mut out = Vec::new();
    let errors = disassemble(&source[..], &mut out, ErrorMode::Strict).unwrap();
    assert_eq!(errors, 0);

    let listing = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(lines.len(), counting_program(1, 2).len());
    assert_eq!(lines[0], "\tpush 1");
    assert_eq!(lines[1], "label_0:");
    assert_eq!(lines[9], "\tjn label_1");
    assert_eq!(lines[13], "\tend");
    assert_eq!(lines[14], "label_1:");
}
