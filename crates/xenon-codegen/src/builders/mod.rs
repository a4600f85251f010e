//! Per-instruction code builders.
//!
//! Each builder is a pure function `(BuildContext) -> bool` appending C++
//! fragments that evaluate one instruction against the guest context. The
//! return value reports whether the instruction was handled; builders never
//! fail partway through a fragment.

pub(crate) mod arith;
pub(crate) mod compare;
pub(crate) mod control_flow;
pub(crate) mod fp;
pub(crate) mod logical;
pub(crate) mod memory;
pub(crate) mod system;
pub(crate) mod vector;

use crate::context::{cg, cgl, cr_bit_name, BuildContext};

/// Append the CR0 update for record-form variants: the signed 32-bit view of
/// the result compared against zero, with XER's summary-overflow copied in.
pub(crate) fn emit_record_form_compare(ctx: &mut BuildContext) {
    if ctx.insn.is_record_form() {
        let cr0 = ctx.cr(0);
        let rd = ctx.r(ctx.op(0));
        let xer = ctx.xer();
        cgl!(ctx, "\t{cr0}.compare<int32_t>({rd}.s32, 0, {xer});");
    }
}

/// CR-bit operation `crD = crA <op> crB` over individual condition bits,
/// with optional inversion of either input or the result.
pub(crate) fn emit_cr_bit_operation(
    ctx: &mut BuildContext,
    op: &str,
    invert_a: bool,
    invert_b: bool,
    invert_result: bool,
) {
    let crd = ctx.op(0);
    let cra = ctx.op(1);
    let crb = ctx.op(2);

    let field_d = ctx.cr(crd / 4);
    let field_a = ctx.cr(cra / 4);
    let field_b = ctx.cr(crb / 4);

    let mut a_expr = format!("{field_a}.{}", cr_bit_name(cra % 4));
    let mut b_expr = format!("{field_b}.{}", cr_bit_name(crb % 4));
    if invert_a {
        a_expr = format!("!({a_expr})");
    }
    if invert_b {
        b_expr = format!("!({b_expr})");
    }

    let mut expr = format!("{a_expr} {op} {b_expr}");
    if invert_result {
        expr = format!("!({expr})");
    }

    cgl!(ctx, "\t{field_d}.{} = {expr};", cr_bit_name(crd % 4));
}

/// D-form load with update: `ea = d + rA; rD = MEM[ea]; rA = ea`.
pub(crate) fn emit_load_with_update(ctx: &mut BuildContext, load_macro: &str) {
    let ea = ctx.ea();
    let d = ctx.simm(1);
    let ra = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{ea} = {d} + {ra}.u32;");
    let rd = ctx.r(ctx.op(0));
    cgl!(ctx, "\t{rd}.u64 = {load_macro}({ea});");
    cgl!(ctx, "\t{ra}.u32 = {ea};");
}

/// X-form load with update: `ea = rA + rB; rD = MEM[ea]; rA = ea`.
pub(crate) fn emit_load_with_update_indexed(ctx: &mut BuildContext, load_macro: &str) {
    let ea = ctx.ea();
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{ea} = {ra}.u32 + {rb}.u32;");
    let rd = ctx.r(ctx.op(0));
    cgl!(ctx, "\t{rd}.u64 = {load_macro}({ea});");
    cgl!(ctx, "\t{ra}.u32 = {ea};");
}

/// D-form store with update: `ea = d + rA; MEM[ea] = rS; rA = ea`.
pub(crate) fn emit_store_with_update(ctx: &mut BuildContext, store_macro: &str, field: &str) {
    let ea = ctx.ea();
    let d = ctx.simm(1);
    let ra = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{ea} = {d} + {ra}.u32;");
    let rs = ctx.r(ctx.op(0));
    cgl!(ctx, "\t{store_macro}({ea}, {rs}.{field});");
    cgl!(ctx, "\t{ra}.u32 = {ea};");
}

/// X-form store with update: `ea = rA + rB; MEM[ea] = rS; rA = ea`.
pub(crate) fn emit_store_with_update_indexed(
    ctx: &mut BuildContext,
    store_macro: &str,
    field: &str,
) {
    let ea = ctx.ea();
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{ea} = {ra}.u32 + {rb}.u32;");
    let rs = ctx.r(ctx.op(0));
    cgl!(ctx, "\t{store_macro}({ea}, {rs}.{field});");
    cgl!(ctx, "\t{ra}.u32 = {ea};");
}

/// D-form algebraic load: cast through the narrow signed type, then widen.
pub(crate) fn emit_sign_extend_load_d_form(
    ctx: &mut BuildContext,
    cast_type: &str,
    load_macro: &str,
) {
    let rd = ctx.r(ctx.op(0));
    cg!(ctx, "\t{rd}.s64 = {cast_type}({load_macro}(");
    if ctx.op(2) != 0 {
        let ra = ctx.r(ctx.op(2));
        cg!(ctx, "{ra}.u32 + ");
    }
    cgl!(ctx, "{}));", ctx.simm(1));
}

/// X-form algebraic load.
pub(crate) fn emit_sign_extend_load_x_form(
    ctx: &mut BuildContext,
    cast_type: &str,
    load_macro: &str,
) {
    let rd = ctx.r(ctx.op(0));
    cg!(ctx, "\t{rd}.s64 = {cast_type}({load_macro}(");
    if ctx.op(1) != 0 {
        let ra = ctx.r(ctx.op(1));
        cg!(ctx, "{ra}.u32 + ");
    }
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "{rb}.u32));");
}

/// Vector effective address into `ea`, optionally masked to an alignment.
pub(crate) fn emit_vector_ea(ctx: &mut BuildContext, align_mask: Option<&str>) {
    let ea = ctx.ea();
    if align_mask.is_some() {
        cg!(ctx, "\t{ea} = (");
    } else {
        cg!(ctx, "\t{ea} = ");
    }
    if ctx.op(1) != 0 {
        let ra = ctx.r(ctx.op(1));
        cg!(ctx, "{ra}.u32 + ");
    }
    let rb = ctx.r(ctx.op(2));
    match align_mask {
        Some(mask) => cgl!(ctx, "{rb}.u32) & ~{mask};"),
        None => cgl!(ctx, "{rb}.u32;"),
    }
}

/// Vector effective address into the temp register (unaligned forms).
pub(crate) fn emit_vector_temp_ea(ctx: &mut BuildContext) {
    let temp = ctx.temp();
    cg!(ctx, "\t{temp}.u32 = ");
    if ctx.op(1) != 0 {
        let ra = ctx.r(ctx.op(1));
        cg!(ctx, "{ra}.u32 + ");
    }
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "{rb}.u32;");
}

/// Trap lowering: OR together the enabled comparison predicates under both
/// signed and unsigned interpretation of the five TO bits.
pub(crate) fn emit_trap(
    ctx: &mut BuildContext,
    to: u32,
    a_signed: &str,
    a_unsigned: &str,
    b_signed: &str,
    b_unsigned: &str,
) {
    if to == 0 {
        return;
    }
    if to == 0x1F {
        cgl!(ctx, "\tppc_trap(ctx, 0x{:X}, 0);", ctx.base);
        return;
    }

    let mut cond = String::new();
    let mut add = |clause: String| {
        if !cond.is_empty() {
            cond.push_str(" || ");
        }
        cond.push_str(&clause);
    };
    if to & xenon_ppc::TO_LT != 0 {
        add(format!("{a_signed} < {b_signed}"));
    }
    if to & xenon_ppc::TO_GT != 0 {
        add(format!("{a_signed} > {b_signed}"));
    }
    if to & xenon_ppc::TO_EQ != 0 {
        add(format!("{a_signed} == {b_signed}"));
    }
    if to & xenon_ppc::TO_LLT != 0 {
        add(format!("{a_unsigned} < {b_unsigned}"));
    }
    if to & xenon_ppc::TO_LGT != 0 {
        add(format!("{a_unsigned} > {b_unsigned}"));
    }

    cgl!(ctx, "\tif ({cond}) ppc_trap(ctx, 0x{:X}, 0);", ctx.base);
}
