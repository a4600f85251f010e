//! Scalar floating-point builders.
//!
//! Every FP op first drives the flush-mode state machine into scalar mode;
//! single-precision variants narrow through a float so double rounding
//! matches the guest.

use crate::context::{cgl, BuildContext};

pub(crate) fn build_fabs(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(false);
    let fd = ctx.f(ctx.op(0));
    let fb = ctx.f(ctx.op(1));
    cgl!(ctx, "\t{fd}.u64 = {fb}.u64 & ~(1ull << 63);");
    true
}

pub(crate) fn build_fnabs(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(false);
    let fd = ctx.f(ctx.op(0));
    let fb = ctx.f(ctx.op(1));
    cgl!(ctx, "\t{fd}.u64 = {fb}.u64 | (1ull << 63);");
    true
}

pub(crate) fn build_fneg(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(false);
    let fd = ctx.f(ctx.op(0));
    let fb = ctx.f(ctx.op(1));
    cgl!(ctx, "\t{fd}.u64 = {fb}.u64 ^ (1ull << 63);");
    true
}

pub(crate) fn build_fmr(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(false);
    let fd = ctx.f(ctx.op(0));
    let fb = ctx.f(ctx.op(1));
    cgl!(ctx, "\t{fd}.f64 = {fb}.f64;");
    true
}

pub(crate) fn build_fcfid(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(false);
    let fd = ctx.f(ctx.op(0));
    let fb = ctx.f(ctx.op(1));
    cgl!(
        ctx,
        "\t{fd}.f64 = double({fb}.s64);"
    );
    true
}

pub(crate) fn build_fctid(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(false);
    let fd = ctx.f(ctx.op(0));
    let fb = ctx.f(ctx.op(1));
    cgl!(
        ctx,
        "\t{fd}.s64 = ({fb}.f64 > double(LLONG_MAX)) ? LLONG_MAX : simde_mm_cvtsd_si64(simde_mm_load_sd(&{fb}.f64));"
    );
    true
}

pub(crate) fn build_fctidz(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(false);
    let fd = ctx.f(ctx.op(0));
    let fb = ctx.f(ctx.op(1));
    cgl!(
        ctx,
        "\t{fd}.s64 = ({fb}.f64 > double(LLONG_MAX)) ? LLONG_MAX : simde_mm_cvttsd_si64(simde_mm_load_sd(&{fb}.f64));"
    );
    true
}

pub(crate) fn build_fctiwz(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(false);
    let fd = ctx.f(ctx.op(0));
    let fb = ctx.f(ctx.op(1));
    cgl!(
        ctx,
        "\t{fd}.s64 = ({fb}.f64 > double(INT_MAX)) ? INT_MAX : simde_mm_cvttsd_si32(simde_mm_load_sd(&{fb}.f64));"
    );
    true
}

pub(crate) fn build_frsp(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(false);
    let fd = ctx.f(ctx.op(0));
    let fb = ctx.f(ctx.op(1));
    cgl!(ctx, "\t{fd}.f64 = double(float({fb}.f64));");
    true
}

fn fp_compare(ctx: &mut BuildContext) {
    let crf = ctx.cr(ctx.op(0));
    let fa = ctx.f(ctx.op(1));
    let fb = ctx.f(ctx.op(2));
    let xer = ctx.xer();
    cgl!(ctx, "\t{crf}.compare({fa}.f64, {fb}.f64, {xer});");
}

pub(crate) fn build_fcmpu(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(false);
    fp_compare(ctx);
    true
}

pub(crate) fn build_fcmpo(ctx: &mut BuildContext) -> bool {
    // Ordered compare: exception semantics are not modelled, the flag
    // results match the unordered form.
    ctx.emit_set_flush_mode(false);
    fp_compare(ctx);
    true
}

fn fp_binary(ctx: &mut BuildContext, op: &str, single: bool) {
    ctx.emit_set_flush_mode(false);
    let fd = ctx.f(ctx.op(0));
    let fa = ctx.f(ctx.op(1));
    let fb = ctx.f(ctx.op(2));
    if single {
        cgl!(ctx, "\t{fd}.f64 = double(float({fa}.f64 {op} {fb}.f64));");
    } else {
        cgl!(ctx, "\t{fd}.f64 = {fa}.f64 {op} {fb}.f64;");
    }
}

pub(crate) fn build_fadd(ctx: &mut BuildContext) -> bool {
    fp_binary(ctx, "+", false);
    true
}

pub(crate) fn build_fadds(ctx: &mut BuildContext) -> bool {
    fp_binary(ctx, "+", true);
    true
}

pub(crate) fn build_fsub(ctx: &mut BuildContext) -> bool {
    fp_binary(ctx, "-", false);
    true
}

pub(crate) fn build_fsubs(ctx: &mut BuildContext) -> bool {
    fp_binary(ctx, "-", true);
    true
}

pub(crate) fn build_fmul(ctx: &mut BuildContext) -> bool {
    fp_binary(ctx, "*", false);
    true
}

pub(crate) fn build_fmuls(ctx: &mut BuildContext) -> bool {
    fp_binary(ctx, "*", true);
    true
}

pub(crate) fn build_fdiv(ctx: &mut BuildContext) -> bool {
    fp_binary(ctx, "/", false);
    true
}

pub(crate) fn build_fdivs(ctx: &mut BuildContext) -> bool {
    fp_binary(ctx, "/", true);
    true
}

// Fused multiply-add family: fD = ±(fA * fC ± fB).

fn fp_madd(ctx: &mut BuildContext, negate: bool, subtract: bool, single: bool) {
    ctx.emit_set_flush_mode(false);
    let fd = ctx.f(ctx.op(0));
    let fa = ctx.f(ctx.op(1));
    let fc = ctx.f(ctx.op(2));
    let fb = ctx.f(ctx.op(3));
    let sign = if subtract { "-" } else { "+" };
    let expr = format!("{fa}.f64 * {fc}.f64 {sign} {fb}.f64");
    let expr = if negate { format!("-({expr})") } else { expr };
    if single {
        cgl!(ctx, "\t{fd}.f64 = double(float({expr}));");
    } else {
        cgl!(ctx, "\t{fd}.f64 = {expr};");
    }
}

pub(crate) fn build_fmadd(ctx: &mut BuildContext) -> bool {
    fp_madd(ctx, false, false, false);
    true
}

pub(crate) fn build_fmadds(ctx: &mut BuildContext) -> bool {
    fp_madd(ctx, false, false, true);
    true
}

pub(crate) fn build_fmsub(ctx: &mut BuildContext) -> bool {
    fp_madd(ctx, false, true, false);
    true
}

pub(crate) fn build_fmsubs(ctx: &mut BuildContext) -> bool {
    fp_madd(ctx, false, true, true);
    true
}

pub(crate) fn build_fnmadd(ctx: &mut BuildContext) -> bool {
    fp_madd(ctx, true, false, false);
    true
}

pub(crate) fn build_fnmadds(ctx: &mut BuildContext) -> bool {
    fp_madd(ctx, true, false, true);
    true
}

pub(crate) fn build_fnmsub(ctx: &mut BuildContext) -> bool {
    fp_madd(ctx, true, true, false);
    true
}

pub(crate) fn build_fnmsubs(ctx: &mut BuildContext) -> bool {
    fp_madd(ctx, true, true, true);
    true
}

pub(crate) fn build_fres(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(false);
    let fd = ctx.f(ctx.op(0));
    let fb = ctx.f(ctx.op(1));
    cgl!(ctx, "\t{fd}.f64 = double(float(1.0 / {fb}.f64));");
    true
}

pub(crate) fn build_frsqrte(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(false);
    let fd = ctx.f(ctx.op(0));
    let fb = ctx.f(ctx.op(1));
    cgl!(ctx, "\t{fd}.f64 = 1.0 / sqrt({fb}.f64);");
    true
}

pub(crate) fn build_fsqrt(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(false);
    let fd = ctx.f(ctx.op(0));
    let fb = ctx.f(ctx.op(1));
    cgl!(ctx, "\t{fd}.f64 = sqrt({fb}.f64);");
    true
}

pub(crate) fn build_fsqrts(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(false);
    let fd = ctx.f(ctx.op(0));
    let fb = ctx.f(ctx.op(1));
    cgl!(ctx, "\t{fd}.f64 = double(float(sqrt({fb}.f64)));");
    true
}

pub(crate) fn build_fsel(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(false);
    let fd = ctx.f(ctx.op(0));
    let fa = ctx.f(ctx.op(1));
    let fc = ctx.f(ctx.op(2));
    let fb = ctx.f(ctx.op(3));
    cgl!(ctx, "\t{fd}.f64 = {fa}.f64 >= 0.0 ? {fc}.f64 : {fb}.f64;");
    true
}
