//! Integer arithmetic builders.
//!
//! Everything operates on the widest view of the inputs; carry semantics
//! follow the 32-bit guest ABI the images are compiled against.

use super::emit_record_form_compare;
use crate::context::{cg, cgl, BuildContext};

pub(crate) fn build_add(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{rd}.u64 = {ra}.u64 + {rb}.u64;");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_addc(ctx: &mut BuildContext) -> bool {
    let xer = ctx.xer();
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{xer}.ca = {ra}.u32 + {rb}.u32 < {ra}.u32;");
    let rd = ctx.r(ctx.op(0));
    cgl!(ctx, "\t{rd}.u64 = {ra}.u64 + {rb}.u64;");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_adde(ctx: &mut BuildContext) -> bool {
    let temp = ctx.temp();
    let xer = ctx.xer();
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(
        ctx,
        "\t{temp}.u8 = ({ra}.u32 + {rb}.u32 < {ra}.u32) | ({ra}.u32 + {rb}.u32 + {xer}.ca < {xer}.ca);"
    );
    let rd = ctx.r(ctx.op(0));
    cgl!(ctx, "\t{rd}.u64 = {ra}.u64 + {rb}.u64 + {xer}.ca;");
    cgl!(ctx, "\t{xer}.ca = {temp}.u8;");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_addi(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    cg!(ctx, "\t{rd}.s64 = ");
    if ctx.op(1) != 0 {
        let ra = ctx.r(ctx.op(1));
        cg!(ctx, "{ra}.s64 + ");
    }
    cgl!(ctx, "{};", ctx.simm(2));
    true
}

pub(crate) fn build_addic(ctx: &mut BuildContext) -> bool {
    let xer = ctx.xer();
    let ra = ctx.r(ctx.op(1));
    cgl!(ctx, "\t{xer}.ca = {ra}.u32 > {};", !ctx.op(2));
    let rd = ctx.r(ctx.op(0));
    cgl!(ctx, "\t{rd}.s64 = {ra}.s64 + {};", ctx.simm(2));
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_addis(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    cg!(ctx, "\t{rd}.s64 = ");
    if ctx.op(1) != 0 {
        let ra = ctx.r(ctx.op(1));
        cg!(ctx, "{ra}.s64 + ");
    }
    cgl!(ctx, "{};", (ctx.op(2) << 16) as i32);
    true
}

pub(crate) fn build_addme(ctx: &mut BuildContext) -> bool {
    // Carry out of rA + 0xFFFFFFFF + ca: set unless rA is 0 with no carry in.
    let temp = ctx.temp();
    let xer = ctx.xer();
    let ra = ctx.r(ctx.op(1));
    cgl!(ctx, "\t{temp}.u8 = ({ra}.u32 != 0) | {xer}.ca;");
    let rd = ctx.r(ctx.op(0));
    cgl!(ctx, "\t{rd}.u64 = {ra}.u64 + {xer}.ca - 1;");
    cgl!(ctx, "\t{xer}.ca = {temp}.u8;");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_addze(ctx: &mut BuildContext) -> bool {
    let temp = ctx.temp();
    let xer = ctx.xer();
    let ra = ctx.r(ctx.op(1));
    cgl!(ctx, "\t{temp}.u8 = {ra}.u32 + {xer}.ca < {xer}.ca;");
    let rd = ctx.r(ctx.op(0));
    cgl!(ctx, "\t{rd}.u64 = {ra}.u64 + {xer}.ca;");
    cgl!(ctx, "\t{xer}.ca = {temp}.u8;");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_divd(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{rd}.s64 = {ra}.s64 / {rb}.s64;");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_divdu(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{rd}.u64 = {ra}.u64 / {rb}.u64;");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_divw(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{rd}.s32 = {ra}.s32 / {rb}.s32;");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_divwu(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{rd}.u32 = {ra}.u32 / {rb}.u32;");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_mulhd(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{rd}.s64 = __mulh({ra}.s64, {rb}.s64);");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_mulhdu(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{rd}.u64 = __umulh({ra}.u64, {rb}.u64);");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_mulhw(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{rd}.s64 = (int64_t({ra}.s32) * int64_t({rb}.s32)) >> 32;");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_mulhwu(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{rd}.u64 = (uint64_t({ra}.u32) * uint64_t({rb}.u32)) >> 32;");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_mulld(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{rd}.s64 = {ra}.s64 * {rb}.s64;");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_mulli(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    cgl!(ctx, "\t{rd}.s64 = {ra}.s64 * {};", ctx.simm(2));
    true
}

pub(crate) fn build_mullw(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{rd}.s64 = int64_t({ra}.s32) * int64_t({rb}.s32);");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_neg(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    cgl!(ctx, "\t{rd}.s64 = -{ra}.s64;");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_subf(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{rd}.s64 = {rb}.s64 - {ra}.s64;");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_subfc(ctx: &mut BuildContext) -> bool {
    let xer = ctx.xer();
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{xer}.ca = {ra}.u32 <= {rb}.u32;");
    let rd = ctx.r(ctx.op(0));
    cgl!(ctx, "\t{rd}.s64 = {rb}.s64 - {ra}.s64;");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_subfe(ctx: &mut BuildContext) -> bool {
    let temp = ctx.temp();
    let xer = ctx.xer();
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(
        ctx,
        "\t{temp}.u8 = (~{ra}.u32 + {rb}.u32 < ~{ra}.u32) | (~{ra}.u32 + {rb}.u32 + {xer}.ca < {xer}.ca);"
    );
    let rd = ctx.r(ctx.op(0));
    cgl!(ctx, "\t{rd}.u64 = ~{ra}.u64 + {rb}.u64 + {xer}.ca;");
    cgl!(ctx, "\t{xer}.ca = {temp}.u8;");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_subfic(ctx: &mut BuildContext) -> bool {
    let xer = ctx.xer();
    let ra = ctx.r(ctx.op(1));
    cgl!(ctx, "\t{xer}.ca = {ra}.u32 <= {};", ctx.op(2));
    let rd = ctx.r(ctx.op(0));
    cgl!(ctx, "\t{rd}.s64 = {} - {ra}.s64;", ctx.simm(2));
    true
}

pub(crate) fn build_subfme(ctx: &mut BuildContext) -> bool {
    // Carry out of ~rA + 0xFFFFFFFF + ca: set unless rA is all ones with no
    // carry in.
    let temp = ctx.temp();
    let xer = ctx.xer();
    let ra = ctx.r(ctx.op(1));
    cgl!(ctx, "\t{temp}.u8 = ({ra}.u32 != 0xFFFFFFFF) | {xer}.ca;");
    let rd = ctx.r(ctx.op(0));
    cgl!(ctx, "\t{rd}.u64 = ~{ra}.u64 + {xer}.ca - 1;");
    cgl!(ctx, "\t{xer}.ca = {temp}.u8;");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_subfze(ctx: &mut BuildContext) -> bool {
    let temp = ctx.temp();
    let xer = ctx.xer();
    let ra = ctx.r(ctx.op(1));
    cgl!(ctx, "\t{temp}.u8 = ~{ra}.u32 + {xer}.ca < {xer}.ca;");
    let rd = ctx.r(ctx.op(0));
    cgl!(ctx, "\t{rd}.u64 = ~{ra}.u64 + {xer}.ca;");
    cgl!(ctx, "\t{xer}.ca = {temp}.u8;");
    emit_record_form_compare(ctx);
    true
}
