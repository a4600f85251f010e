//! Per-instruction build context.
//!
//! One `BuildContext` is threaded through every builder while a function
//! body is being emitted. It exposes the decoded instruction, local
//! lookahead into the raw word stream, the owning function, and register
//! accessors that return either a promoted local name or a context field
//! reference — flipping the promotion bit as a side effect so the framer
//! can declare exactly the locals the body used.

use std::fmt;
use std::fmt::Write as _;

use tracing::{error, warn};
use xenon_ppc::DecodedInstruction;

use crate::config::RecompilerConfig;
use crate::graph::{FunctionGraph, FunctionNode, JumpTable};

/// `eieio` encoding, used by the MMIO store lookahead.
pub(crate) const EIEIO_WORD: u32 = 0x7C00_06AC;

/// Tracked host floating-point control word mode. Reset to `Unknown` at
/// every label, after every call and after every switch dispatch — any
/// predecessor may have left a different mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CsrState {
    #[default]
    Unknown,
    Fpu,
    Vmx,
}

/// Per-function record of which context slots were promoted to locals, plus
/// the MMIO base-register tags the store heuristic consumes.
#[derive(Debug, Clone)]
pub struct LocalSet {
    pub r: [bool; 32],
    pub f: [bool; 32],
    pub v: [bool; 128],
    pub cr: [bool; 8],
    pub ctr: bool,
    pub xer: bool,
    pub reserved: bool,
    pub temp: bool,
    pub v_temp: bool,
    pub env: bool,
    pub ea: bool,
    mmio_base: u32,
}

impl Default for LocalSet {
    fn default() -> Self {
        LocalSet {
            r: [false; 32],
            f: [false; 32],
            v: [false; 128],
            cr: [false; 8],
            ctr: false,
            xer: false,
            reserved: false,
            temp: false,
            v_temp: false,
            env: false,
            ea: false,
            mmio_base: 0,
        }
    }
}

impl LocalSet {
    pub fn set_mmio_base(&mut self, index: u32) {
        self.mmio_base |= 1 << (index & 31);
    }

    pub fn clear_mmio_base(&mut self, index: u32) {
        self.mmio_base &= !(1 << (index & 31));
    }

    pub fn is_mmio_base(&self, index: u32) -> bool {
        self.mmio_base & (1 << (index & 31)) != 0
    }
}

/// 64-bit rotate/mask helper, identical to the architecture's
/// `MASK(mstart, mstop)` definition including the wrap case
/// `mstart > mstop`.
pub fn compute_mask(mstart: u32, mstop: u32) -> u64 {
    let mstart = mstart & 0x3F;
    let mstop = mstop & 0x3F;
    let value =
        (u64::MAX >> mstart) ^ (if mstop >= 63 { 0 } else { u64::MAX >> (mstop + 1) });
    if mstart <= mstop {
        value
    } else {
        !value
    }
}

/// CR bit index (0-3 within a field) to flag name.
pub(crate) fn cr_bit_name(bi: u32) -> &'static str {
    ["lt", "gt", "eq", "so"][(bi & 3) as usize]
}

/// Upper-16-bit immediates that land a register in a hardware-register
/// range: GPU block 0x7FC8xxxx..0x7FCFxxxx, audio block 0x7FEAxxxx.
pub(crate) fn is_mmio_upper_bits(imm: u32) -> bool {
    (0x7FC8..=0x7FCF).contains(&imm) || imm == 0x7FEA
}

pub struct BuildContext<'a> {
    pub insn: &'a DecodedInstruction,
    /// Guest address of the instruction being built.
    pub base: u32,
    /// Raw big-endian words, `words[0]` being the current instruction; used
    /// for local lookahead only.
    pub words: &'a [u32],
    pub func: &'a FunctionNode,
    pub graph: &'a FunctionGraph,
    pub config: &'a RecompilerConfig,
    pub out: &'a mut String,
    pub locals: &'a mut LocalSet,
    pub csr: &'a mut CsrState,
    /// Pending switch table for the next `bctr`, if any.
    pub switch_table: Option<&'a JumpTable>,
    /// Set by the `bctr` builder once it lowers the pending table.
    pub switch_table_consumed: bool,
}

impl BuildContext<'_> {
    pub fn push_fmt(&mut self, args: fmt::Arguments<'_>) {
        // Writing into a String cannot fail.
        let _ = self.out.write_fmt(args);
    }

    pub fn line_fmt(&mut self, args: fmt::Arguments<'_>) {
        let _ = self.out.write_fmt(args);
        self.out.push('\n');
    }

    pub fn push_str(&mut self, s: &str) {
        self.out.push_str(s);
    }

    pub fn line_str(&mut self, s: &str) {
        self.out.push_str(s);
        self.out.push('\n');
    }

    pub fn op(&self, index: usize) -> u32 {
        self.insn.operands[index]
    }

    pub fn simm(&self, index: usize) -> i32 {
        self.insn.operands[index] as i32
    }

    // Register accessors. Promotion policy: with non-argument promotion the
    // scratch registers (r0/r2/r11/r12, f0, the caller-volatile VR range)
    // become locals; with non-volatile promotion the callee-saved ranges do.

    pub fn r(&mut self, index: u32) -> String {
        let promote = (self.config.non_argument_as_local
            && matches!(index, 0 | 2 | 11 | 12))
            || (self.config.non_volatile_as_local && index >= 14);
        if promote {
            self.locals.r[index as usize] = true;
            format!("r{index}")
        } else {
            format!("ctx.r{index}")
        }
    }

    pub fn f(&mut self, index: u32) -> String {
        let promote = (self.config.non_argument_as_local && index == 0)
            || (self.config.non_volatile_as_local && index >= 14);
        if promote {
            self.locals.f[index as usize] = true;
            format!("f{index}")
        } else {
            format!("ctx.f{index}")
        }
    }

    pub fn v(&mut self, index: u32) -> String {
        let promote = (self.config.non_argument_as_local && (32..=63).contains(&index))
            || (self.config.non_volatile_as_local
                && ((14..=31).contains(&index) || (64..=127).contains(&index)));
        if promote {
            self.locals.v[index as usize] = true;
            format!("v{index}")
        } else {
            format!("ctx.v{index}")
        }
    }

    pub fn cr(&mut self, index: u32) -> String {
        if self.config.cr_as_local {
            self.locals.cr[index as usize] = true;
            format!("cr{index}")
        } else {
            format!("ctx.cr{index}")
        }
    }

    pub fn ctr(&mut self) -> String {
        if self.config.ctr_as_local {
            self.locals.ctr = true;
            "ctr".into()
        } else {
            "ctx.ctr".into()
        }
    }

    pub fn xer(&mut self) -> String {
        if self.config.xer_as_local {
            self.locals.xer = true;
            "xer".into()
        } else {
            "ctx.xer".into()
        }
    }

    pub fn reserved(&mut self) -> String {
        if self.config.reserved_as_local {
            self.locals.reserved = true;
            "reserved".into()
        } else {
            "ctx.reserved".into()
        }
    }

    pub fn temp(&mut self) -> String {
        self.locals.temp = true;
        "temp".into()
    }

    pub fn v_temp(&mut self) -> String {
        self.locals.v_temp = true;
        "vTemp".into()
    }

    pub fn env(&mut self) -> String {
        self.locals.env = true;
        "env".into()
    }

    pub fn ea(&mut self) -> String {
        self.locals.ea = true;
        "ea".into()
    }

    /// Resolved emission name for a function node.
    pub fn function_name(&self, node: &FunctionNode) -> String {
        resolved_name(self.graph, node)
    }

    /// True when the next instruction is an explicit memory-ordering
    /// barrier, marking the preceding store as MMIO.
    fn next_is_eieio(&self) -> bool {
        self.base + 4 < self.func.end && self.words.get(1) == Some(&EIEIO_WORD)
    }

    /// MMIO heuristic for D-form stores: base register tagged by a prior
    /// `lis`/`oris`, or the store is barrier-marked.
    pub fn mmio_check_d_form(&self) -> bool {
        self.locals.is_mmio_base(self.op(2)) || self.next_is_eieio()
    }

    /// MMIO heuristic for X-form stores: either address operand tagged, or
    /// the store is barrier-marked.
    pub fn mmio_check_x_form(&self) -> bool {
        self.locals.is_mmio_base(self.op(1))
            || self.locals.is_mmio_base(self.op(2))
            || self.next_is_eieio()
    }

    /// Pick the plain or MMIO spelling of a store macro.
    pub fn store_macro(&self, normal: &'static str, mmio: bool) -> String {
        if mmio {
            normal.replacen("PPC_STORE", "PPC_MM_STORE", 1)
        } else {
            normal.to_string()
        }
    }

    /// D-form load: `rD.<field> = MACRO(rA.u32 + d);` with the base register
    /// omitted when rA is 0.
    pub fn emit_load_d_form(&mut self, load_macro: &str, field: &str) {
        let rd = self.r(self.op(0));
        self.push_fmt(format_args!("\t{rd}.{field} = {load_macro}("));
        if self.op(2) != 0 {
            let ra = self.r(self.op(2));
            self.push_fmt(format_args!("{ra}.u32 + "));
        }
        let d = self.simm(1);
        self.line_fmt(format_args!("{d});"));
    }

    /// X-form load: `rD.<field> = MACRO(rA.u32 + rB.u32);`.
    pub fn emit_load_x_form(&mut self, load_macro: &str, field: &str) {
        let rd = self.r(self.op(0));
        self.push_fmt(format_args!("\t{rd}.{field} = {load_macro}("));
        if self.op(1) != 0 {
            let ra = self.r(self.op(1));
            self.push_fmt(format_args!("{ra}.u32 + "));
        }
        let rb = self.r(self.op(2));
        self.line_fmt(format_args!("{rb}.u32);"));
    }

    /// D-form store, with the MMIO heuristic applied when `mmio_capable`.
    pub fn emit_store_d_form(&mut self, store_macro: &'static str, field: &str, mmio_capable: bool) {
        let mac = self.store_macro(store_macro, mmio_capable && self.mmio_check_d_form());
        self.push_fmt(format_args!("\t{mac}("));
        if self.op(2) != 0 {
            let ra = self.r(self.op(2));
            self.push_fmt(format_args!("{ra}.u32 + "));
        }
        let d = self.simm(1);
        let rs = self.r(self.op(0));
        self.line_fmt(format_args!("{d}, {rs}.{field});"));
    }

    /// X-form store, with the MMIO heuristic applied when `mmio_capable`.
    pub fn emit_store_x_form(&mut self, store_macro: &'static str, field: &str, mmio_capable: bool) {
        let mac = self.store_macro(store_macro, mmio_capable && self.mmio_check_x_form());
        self.push_fmt(format_args!("\t{mac}("));
        if self.op(1) != 0 {
            let ra = self.r(self.op(1));
            self.push_fmt(format_args!("{ra}.u32 + "));
        }
        let rb = self.r(self.op(2));
        let rs = self.r(self.op(0));
        self.line_fmt(format_args!("{rb}.u32, {rs}.{field});"));
    }

    /// Drive the flush-mode state machine; emits a mode switch only when the
    /// tracked state disagrees with what the next op needs.
    pub fn emit_set_flush_mode(&mut self, enable: bool) {
        let new_state = if enable { CsrState::Vmx } else { CsrState::Fpu };
        if *self.csr != new_state {
            let prefix = if enable { "enable" } else { "disable" };
            let suffix = if *self.csr != CsrState::Unknown {
                "Unconditional"
            } else {
                ""
            };
            self.line_fmt(format_args!("\tctx.fpscr.{prefix}FlushMode{suffix}();"));
            *self.csr = new_state;
        }
    }

    /// Emit a call to a guest address: the `setjmp`/`longjmp` specials, a
    /// named function from the graph, or a diagnosed unresolved target.
    pub fn emit_function_call(&mut self, address: u32) {
        if address == self.config.longjmp_address && address != 0 {
            let r3 = self.r(3);
            let r4 = self.r(4);
            self.line_fmt(format_args!(
                "\tlongjmp(*reinterpret_cast<jmp_buf*>(base + {r3}.u32), {r4}.s32);"
            ));
            return;
        }
        if address == self.config.setjmp_address && address != 0 {
            // Save the context so a longjmp back restores register state.
            let env = self.env();
            self.line_fmt(format_args!("\t{env} = ctx;"));
            let temp = self.temp();
            let r3 = self.r(3);
            self.line_fmt(format_args!(
                "\t{temp}.s64 = setjmp(*reinterpret_cast<jmp_buf*>(base + {r3}.u32));"
            ));
            let env = self.env();
            self.line_fmt(format_args!("\tif ({temp}.s64 != 0) ctx = {env};"));
            let r3 = self.r(3);
            self.line_fmt(format_args!("\t{r3} = {temp};"));
            return;
        }

        if let Some(target) = self.graph.function_at(address) {
            let name = resolved_name(self.graph, target);
            if self.config.non_volatile_as_local
                && (name.starts_with("__rest") || name.starts_with("__save"))
            {
                // Register save/restore millicode collapses into the local
                // variable tracking; nothing to call.
            } else {
                self.line_fmt(format_args!("\t{name}(ctx, base);"));
            }
        } else {
            error!(
                "unresolved function 0x{:08X} from 0x{:08X}",
                address, self.base
            );
            self.line_fmt(format_args!(
                "\t// ERROR: unresolved function 0x{address:08X}"
            ));
        }
    }

    /// Conditional branch on one CR flag: a local jump inside the function,
    /// a gated tail call outside it.
    pub fn emit_conditional_branch(&mut self, negate: bool, cond: &str) {
        let target = self.op(1);
        let cr = self.cr(self.op(0));
        let bang = if negate { "!" } else { "" };
        if target < self.func.base || target >= self.func.end {
            self.line_fmt(format_args!("\tif ({bang}{cr}.{cond}) {{"));
            self.push_fmt(format_args!("\t"));
            self.emit_function_call(target);
            self.line_fmt(format_args!("\t\treturn;"));
            self.line_fmt(format_args!("\t}}"));
        } else {
            self.line_fmt(format_args!("\tif ({bang}{cr}.{cond}) goto loc_{target:X};"));
        }
    }

    /// Branch with a condition string, bounds-checked against the function.
    pub fn emit_branch_with_bounds_check(&mut self, target: u32, condition: &str, mnemonic: &str) {
        if target < self.func.base || target >= self.func.end {
            warn!(
                "{} at {:X} branches outside function to {:X}",
                mnemonic, self.base, target
            );
            self.line_fmt(format_args!(
                "\tif ({condition}) {{ /* branch to 0x{target:X} outside function */ return; }}"
            ));
        } else {
            self.line_fmt(format_args!("\tif ({condition}) goto loc_{target:X};"));
        }
    }
}

/// Emission name for a node: the entry point has a fixed name, otherwise the
/// discovered name, otherwise a synthesized one.
pub(crate) fn resolved_name(graph: &FunctionGraph, node: &FunctionNode) -> String {
    if node.base == graph.entry_point() {
        "xstart".into()
    } else if !node.name.is_empty() {
        node.name.clone()
    } else {
        format!("sub_{:08X}", node.base)
    }
}

/// Emit without a trailing newline.
macro_rules! cg {
    ($ctx:expr, $($arg:tt)*) => {{
        let __cgl_str = format!($($arg)*);
        $ctx.push_str(&__cgl_str)
    }};
}

/// Emit one line.
macro_rules! cgl {
    ($ctx:expr, $($arg:tt)*) => {{
        let __cgl_str = format!($($arg)*);
        $ctx.line_str(&__cgl_str)
    }};
}

pub(crate) use {cg, cgl};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_matches_architecture_definition() {
        assert_eq!(compute_mask(0, 63), u64::MAX);
        assert_eq!(compute_mask(32, 63), 0xFFFF_FFFF);
        assert_eq!(compute_mask(0, 0), 1 << 63);
        assert_eq!(compute_mask(63, 63), 1);
        // Wrap case: mstart > mstop inverts the straight mask.
        assert_eq!(compute_mask(63, 0), !compute_mask(1, 62));
        assert_eq!(compute_mask(61, 2), !compute_mask(3, 60));
    }

    #[test]
    fn mmio_ranges() {
        assert!(is_mmio_upper_bits(0x7FC8));
        assert!(is_mmio_upper_bits(0x7FCF));
        assert!(is_mmio_upper_bits(0x7FEA));
        assert!(!is_mmio_upper_bits(0x7FC7));
        assert!(!is_mmio_upper_bits(0x7000));
    }

    #[test]
    fn cr_bits() {
        assert_eq!(cr_bit_name(0), "lt");
        assert_eq!(cr_bit_name(3), "so");
        assert_eq!(cr_bit_name(6), "eq");
    }
}
