//! Recompiler configuration.
//!
//! Parsed from the project document by the front-end; the recompiler only
//! sees the resulting record.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::graph::JumpTable;

/// A user-declared splice point: a call to a native hook injected at one
/// guest instruction address, optionally steering control flow afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MidAsmHook {
    /// Host function to call.
    pub name: String,
    /// Register tokens passed by reference: `r3`, `f1`, `v64`, `cr6`, `ctr`,
    /// `xer`, `reserved`, `fpscr`.
    pub registers: Vec<String>,
    /// Splice after the instruction instead of before it.
    #[serde(default)]
    pub after_instruction: bool,
    /// Unconditional control flow after the hook returns.
    #[serde(default)]
    pub ret: bool,
    #[serde(default)]
    pub jump_address: u32,
    /// Boolean-gated control flow keyed on the hook's return value.
    #[serde(default)]
    pub return_on_true: bool,
    #[serde(default)]
    pub return_on_false: bool,
    #[serde(default)]
    pub jump_address_on_true: u32,
    #[serde(default)]
    pub jump_address_on_false: u32,
}

impl MidAsmHook {
    /// Hooks with any gated edge are declared `bool` and called inside an
    /// `if`.
    pub fn returns_bool(&self) -> bool {
        self.return_on_true
            || self.return_on_false
            || self.jump_address_on_true != 0
            || self.jump_address_on_false != 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecompilerConfig {
    pub project_name: String,
    pub out_directory_path: PathBuf,

    /// Functions per emitted translation unit.
    pub functions_per_file: usize,

    /// Skip link-register bookkeeping on calls.
    pub skip_lr: bool,
    /// Skip machine-state-register moves.
    pub skip_msr: bool,
    /// Wrap SEH-carrying functions in the exception-handler construct.
    pub generate_exception_handlers: bool,

    // Register promotion: which context slots builders may materialize as
    // function-local variables.
    pub ctr_as_local: bool,
    pub xer_as_local: bool,
    pub reserved_as_local: bool,
    pub cr_as_local: bool,
    pub non_argument_as_local: bool,
    pub non_volatile_as_local: bool,

    /// Guest addresses of `setjmp`/`longjmp`; calls there lower to the host
    /// pair against the guest buffer instead of a recursive call.
    pub setjmp_address: u32,
    pub longjmp_address: u32,

    /// User-supplied switch tables keyed by the indirect branch address.
    pub switch_tables: BTreeMap<u32, JumpTable>,
    /// Mid-asm hooks keyed by instruction address.
    pub mid_asm_hooks: BTreeMap<u32, MidAsmHook>,
}

impl Default for RecompilerConfig {
    fn default() -> Self {
        RecompilerConfig {
            project_name: "ppc".into(),
            out_directory_path: PathBuf::from("."),
            functions_per_file: 500,
            skip_lr: false,
            skip_msr: false,
            generate_exception_handlers: false,
            ctr_as_local: false,
            xer_as_local: false,
            reserved_as_local: false,
            cr_as_local: false,
            non_argument_as_local: false,
            non_volatile_as_local: false,
            setjmp_address: 0,
            longjmp_address: 0,
            switch_tables: BTreeMap::new(),
            mid_asm_hooks: BTreeMap::new(),
        }
    }
}
