//! Comparison builders: `crF.compare<T>(a, b, xer)` at the requested width
//! and signedness.

use crate::context::{cgl, BuildContext};

fn compare_regs(ctx: &mut BuildContext, ty: &str, field: &str) {
    let crf = ctx.cr(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    let xer = ctx.xer();
    cgl!(
        ctx,
        "\t{crf}.compare<{ty}>({ra}.{field}, {rb}.{field}, {xer});"
    );
}

fn compare_imm(ctx: &mut BuildContext, ty: &str, field: &str, imm: String) {
    let crf = ctx.cr(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let xer = ctx.xer();
    cgl!(ctx, "\t{crf}.compare<{ty}>({ra}.{field}, {imm}, {xer});");
}

pub(crate) fn build_cmpd(ctx: &mut BuildContext) -> bool {
    compare_regs(ctx, "int64_t", "s64");
    true
}

pub(crate) fn build_cmpdi(ctx: &mut BuildContext) -> bool {
    let imm = ctx.simm(2).to_string();
    compare_imm(ctx, "int64_t", "s64", imm);
    true
}

pub(crate) fn build_cmpld(ctx: &mut BuildContext) -> bool {
    compare_regs(ctx, "uint64_t", "u64");
    true
}

pub(crate) fn build_cmpldi(ctx: &mut BuildContext) -> bool {
    let imm = ctx.op(2).to_string();
    compare_imm(ctx, "uint64_t", "u64", imm);
    true
}

pub(crate) fn build_cmplw(ctx: &mut BuildContext) -> bool {
    compare_regs(ctx, "uint32_t", "u32");
    true
}

pub(crate) fn build_cmplwi(ctx: &mut BuildContext) -> bool {
    let imm = ctx.op(2).to_string();
    compare_imm(ctx, "uint32_t", "u32", imm);
    true
}

pub(crate) fn build_cmpw(ctx: &mut BuildContext) -> bool {
    compare_regs(ctx, "int32_t", "s32");
    true
}

pub(crate) fn build_cmpwi(ctx: &mut BuildContext) -> bool {
    let imm = ctx.simm(2).to_string();
    compare_imm(ctx, "int32_t", "s32", imm);
    true
}
