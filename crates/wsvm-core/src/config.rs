//! VM Configuration
//!
//! Policy switches for behaviour the instruction set leaves open.
//! Configuration specifies policy only; enforcement is handled by the VM.

/// Integer overflow behaviour for ADD/SUB/MUL/DIV/MOD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArithmeticMode {
    /// Overflow is a runtime fault
    #[default]
    Checked,
    /// Two's-complement wraparound
    Wrapping,
}

/// Treatment of a label identifier defined more than once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicateLabels {
    /// The last definition in program order is the jump target
    #[default]
    LastWins,
    /// VM construction fails
    Reject,
}

/// VM Configuration
#[derive(Debug, Clone, Default)]
pub struct VmConfig {
    pub arithmetic: ArithmeticMode,
    pub duplicate_labels: DuplicateLabels,
}

impl VmConfig {
    /// Create a new configuration with default policy
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_arithmetic(mut self, mode: ArithmeticMode) -> Self {
        self.arithmetic = mode;
        self
    }

    pub fn with_duplicate_labels(mut self, policy: DuplicateLabels) -> Self {
        self.duplicate_labels = policy;
        self
    }
}
