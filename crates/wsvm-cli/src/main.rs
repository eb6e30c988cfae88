//! Whitespace VM - CLI
//!
//! Run, disassemble, pack and unpack Whitespace programs.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use wsvm_core::{ArithmeticMode, DuplicateLabels, Program, VirtualMachine, VmConfig};
use wsvm_tools::codec::{pack, unpack, PackedProgram};
use wsvm_tools::demo::counting_program;
use wsvm_tools::disasm::{disassemble, ErrorMode};

#[derive(Parser, Debug)]
#[command(name = "wsvm")]
#[command(about = "Whitespace decoder and virtual machine")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode and execute a program against stdin/stdout
    Run {
        file: PathBuf,

        /// Input is a packed container rather than source text
        #[arg(long)]
        packed: bool,

        /// Wrap on arithmetic overflow instead of faulting
        #[arg(long)]
        wrapping: bool,

        /// Reject programs that define a label twice
        #[arg(long = "strict-labels")]
        strict_labels: bool,
    },

    /// Print one instruction per line
    Disasm {
        file: PathBuf,

        #[arg(long)]
        packed: bool,

        /// Stop at the first decode error instead of reporting and continuing
        #[arg(long)]
        strict: bool,
    },

    /// Pack source text into the binary container
    Pack { input: PathBuf, output: PathBuf },

    /// Expand a packed container back into source text
    Unpack { input: PathBuf, output: PathBuf },

    /// Run the built-in counting program
    Count {
        #[arg(long, default_value_t = 1)]
        min: i64,

        #[arg(long, default_value_t = 10)]
        max: i64,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    init_logging();

    let args = Args::parse();

    match args.command {
        Command::Run {
            file,
            packed,
            wrapping,
            strict_labels,
        } => {
            let mut config = VmConfig::new();
            if wrapping {
                config = config.with_arithmetic(ArithmeticMode::Wrapping);
            }
            if strict_labels {
                config = config.with_duplicate_labels(DuplicateLabels::Reject);
            }
            let source = load_source(&file, packed);
            let program = match Program::decode(&source[..]) {
                Ok(p) => p,
                Err(e) => fail(format_args!("{}: {}", file.display(), e)),
            };
            execute(program, config);
        }

        Command::Disasm { file, packed, strict } => {
            let source = load_source(&file, packed);
            let mode = if strict { ErrorMode::Strict } else { ErrorMode::Tolerant };
            let stdout = io::stdout();
            let mut out = stdout.lock();
            match disassemble(&source[..], &mut out, mode) {
                Ok(0) => {}
                Ok(errors) => {
                    let _ = out.flush();
                    fail(format_args!("{} decode error(s) in {}", errors, file.display()));
                }
                Err(e) => {
                    let _ = out.flush();
                    fail(format_args!("{}: {}", file.display(), e));
                }
            }
        }

        Command::Pack { input, output } => {
            let source = read_file(&input);
            let packed = pack(&source);
            info!(bits = packed.bit_len(), "packed {}", input.display());
            write_file(&output, &packed.to_bytes());
        }

        Command::Unpack { input, output } => {
            let source = load_source(&input, true);
            write_file(&output, &source);
        }

        Command::Count { min, max } => execute(counting_program(min, max), VmConfig::new()),
    }
}

fn execute(program: Program, config: VmConfig) {
    let mut vm = match VirtualMachine::new(program, config) {
        Ok(vm) => vm,
        Err(e) => fail(format_args!("invalid program: {}", e)),
    };

    if let Err(e) = vm.execute() {
        let _ = io::stdout().flush();
        fail(format_args!("Runtime error: {}", e));
    }
}

/// Source text, unpacking it first when `packed` is set
fn load_source(path: &Path, packed: bool) -> Vec<u8> {
    let bytes = read_file(path);
    if !packed {
        return bytes;
    }
    match PackedProgram::from_bytes(&bytes) {
        Ok(p) => unpack(&p),
        Err(e) => fail(format_args!("{}: invalid packed file: {}", path.display(), e)),
    }
}

fn read_file(path: &Path) -> Vec<u8> {
    match fs::read(path) {
        Ok(b) => b,
        Err(e) => fail(format_args!("failed to read {}: {}", path.display(), e)),
    }
}

fn write_file(path: &Path, bytes: &[u8]) {
    if let Err(e) = fs::write(path, bytes) {
        fail(format_args!("failed to write {}: {}", path.display(), e));
    }
}

/// Report a fatal error on stderr regardless of the log filter, then exit 1
fn fail(message: fmt::Arguments<'_>) -> ! {
    let _ = write_failure(&mut io::stderr(), message);
    process::exit(1);
}

fn write_failure<W: Write>(out: &mut W, message: fmt::Arguments<'_>) -> io::Result<()> {
    writeln!(out, "Error: {}", message)
}
