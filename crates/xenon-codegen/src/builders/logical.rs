//! Logical, rotate/mask and shift builders.

use super::{emit_cr_bit_operation, emit_record_form_compare};
use crate::context::{cgl, compute_mask, BuildContext};

pub(crate) fn build_and(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{rd}.u64 = {ra}.u64 & {rb}.u64;");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_andc(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{rd}.u64 = {ra}.u64 & ~{rb}.u64;");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_andi(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    cgl!(ctx, "\t{rd}.u64 = {ra}.u64 & {};", ctx.op(2));
    // andi. always updates CR0, record-form marker or not.
    let cr0 = ctx.cr(0);
    let xer = ctx.xer();
    cgl!(ctx, "\t{cr0}.compare<int32_t>({rd}.s32, 0, {xer});");
    true
}

pub(crate) fn build_andis(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    cgl!(ctx, "\t{rd}.u64 = {ra}.u64 & {};", ctx.op(2) << 16);
    // andis. always updates CR0.
    let cr0 = ctx.cr(0);
    let xer = ctx.xer();
    cgl!(ctx, "\t{cr0}.compare<int32_t>({rd}.s32, 0, {xer});");
    true
}

pub(crate) fn build_nand(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{rd}.u64 = ~({ra}.u64 & {rb}.u64);");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_nor(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{rd}.u64 = ~({ra}.u64 | {rb}.u64);");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_not(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    cgl!(ctx, "\t{rd}.u64 = ~{ra}.u64;");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_or(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{rd}.u64 = {ra}.u64 | {rb}.u64;");
    emit_record_form_compare(ctx);

    // Covers `mr rD, rS`, which assembles as `or rD, rS, rS`: the MMIO base
    // tag has to follow register copies.
    if ctx.locals.is_mmio_base(ctx.op(1)) || ctx.locals.is_mmio_base(ctx.op(2)) {
        ctx.locals.set_mmio_base(ctx.op(0));
    } else {
        ctx.locals.clear_mmio_base(ctx.op(0));
    }
    true
}

pub(crate) fn build_orc(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{rd}.u64 = {ra}.u64 | ~{rb}.u64;");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_ori(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    cgl!(ctx, "\t{rd}.u64 = {ra}.u64 | {};", ctx.op(2));

    // ori only touches low bits; the tag propagates from the source.
    if ctx.locals.is_mmio_base(ctx.op(1)) {
        ctx.locals.set_mmio_base(ctx.op(0));
    } else {
        ctx.locals.clear_mmio_base(ctx.op(0));
    }
    true
}

pub(crate) fn build_oris(ctx: &mut BuildContext) -> bool {
    let imm = ctx.op(2);
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    cgl!(ctx, "\t{rd}.u64 = {ra}.u64 | {};", imm << 16);

    if crate::context::is_mmio_upper_bits(imm) {
        ctx.locals.set_mmio_base(ctx.op(0));
    }
    // The tag is not cleared here: oris may be widening an existing base.
    true
}

pub(crate) fn build_xor(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{rd}.u64 = {ra}.u64 ^ {rb}.u64;");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_xori(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    cgl!(ctx, "\t{rd}.u64 = {ra}.u64 ^ {};", ctx.op(2));
    true
}

pub(crate) fn build_xoris(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    cgl!(ctx, "\t{rd}.u64 = {ra}.u64 ^ {};", ctx.op(2) << 16);
    true
}

pub(crate) fn build_eqv(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{rd}.u64 = ~({ra}.u64 ^ {rb}.u64);");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_cntlzd(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    cgl!(
        ctx,
        "\t{rd}.u64 = {ra}.u64 == 0 ? 64 : __builtin_clzll({ra}.u64);"
    );
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_cntlzw(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    cgl!(
        ctx,
        "\t{rd}.u64 = {ra}.u32 == 0 ? 32 : __builtin_clz({ra}.u32);"
    );
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_extsb(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    cgl!(ctx, "\t{rd}.s64 = {ra}.s8;");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_extsh(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    cgl!(ctx, "\t{rd}.s64 = {ra}.s16;");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_extsw(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    cgl!(ctx, "\t{rd}.s64 = {ra}.s32;");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_clrldi(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let mask = if ctx.op(2) >= 64 {
        0
    } else {
        u64::MAX >> ctx.op(2)
    };
    cgl!(ctx, "\t{rd}.u64 = {ra}.u64 & 0x{mask:X};");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_clrlwi(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let mask = (1u64 << (32 - ctx.op(2))) - 1;
    cgl!(ctx, "\t{rd}.u64 = {ra}.u32 & 0x{mask:X};");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_rldicl(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let mask = compute_mask(ctx.op(3), 63);
    cgl!(
        ctx,
        "\t{rd}.u64 = __builtin_rotateleft64({ra}.u64, {}) & 0x{mask:X};",
        ctx.op(2)
    );
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_rldicr(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let mask = compute_mask(0, ctx.op(3));
    cgl!(
        ctx,
        "\t{rd}.u64 = __builtin_rotateleft64({ra}.u64, {}) & 0x{mask:X};",
        ctx.op(2)
    );
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_rldimi(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let mask = compute_mask(ctx.op(3), !ctx.op(2));
    cgl!(
        ctx,
        "\t{rd}.u64 = (__builtin_rotateleft64({ra}.u64, {}) & 0x{mask:X}) | ({rd}.u64 & 0x{:X});",
        ctx.op(2),
        !mask
    );
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_rotldi(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    cgl!(
        ctx,
        "\t{rd}.u64 = __builtin_rotateleft64({ra}.u64, {});",
        ctx.op(2)
    );
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_rlwimi(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let mask = compute_mask(ctx.op(3) + 32, ctx.op(4) + 32);
    cgl!(
        ctx,
        "\t{rd}.u64 = (__builtin_rotateleft32({ra}.u32, {}) & 0x{mask:X}) | ({rd}.u64 & 0x{:X});",
        ctx.op(2),
        !mask
    );
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_rlwinm(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let mask = compute_mask(ctx.op(3) + 32, ctx.op(4) + 32);
    cgl!(
        ctx,
        "\t{rd}.u64 = __builtin_rotateleft64({ra}.u32 | ({ra}.u64 << 32), {}) & 0x{mask:X};",
        ctx.op(2)
    );
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_rlwnm(ctx: &mut BuildContext) -> bool {
    // Like rlwinm with the rotate amount taken from a register.
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    let mask = compute_mask(ctx.op(3) + 32, ctx.op(4) + 32);
    cgl!(
        ctx,
        "\t{rd}.u64 = __builtin_rotateleft64({ra}.u32 | ({ra}.u64 << 32), {rb}.u8 & 0x1F) & 0x{mask:X};"
    );
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_rotlw(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(
        ctx,
        "\t{rd}.u64 = __builtin_rotateleft32({ra}.u32, {rb}.u8 & 0x1F);"
    );
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_rotlwi(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    cgl!(
        ctx,
        "\t{rd}.u64 = __builtin_rotateleft32({ra}.u32, {});",
        ctx.op(2)
    );
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_sld(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(
        ctx,
        "\t{rd}.u64 = {rb}.u8 & 0x40 ? 0 : ({ra}.u64 << ({rb}.u8 & 0x7F));"
    );
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_slw(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(
        ctx,
        "\t{rd}.u64 = {rb}.u8 & 0x20 ? 0 : ({ra}.u32 << ({rb}.u8 & 0x3F));"
    );
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_srad(ctx: &mut BuildContext) -> bool {
    let temp = ctx.temp();
    let xer = ctx.xer();
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{temp}.u64 = {rb}.u64 & 0x7F;");
    cgl!(ctx, "\tif ({temp}.u64 > 0x3F) {temp}.u64 = 0x3F;");
    cgl!(
        ctx,
        "\t{xer}.ca = ({ra}.s64 < 0) & ((({ra}.s64 >> {temp}.u64) << {temp}.u64) != {ra}.s64);"
    );
    let rd = ctx.r(ctx.op(0));
    cgl!(ctx, "\t{rd}.s64 = {ra}.s64 >> {temp}.u64;");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_sradi(ctx: &mut BuildContext) -> bool {
    let xer = ctx.xer();
    let ra = ctx.r(ctx.op(1));
    let rd = ctx.r(ctx.op(0));
    if ctx.op(2) != 0 {
        let mask = compute_mask(64 - ctx.op(2), 63);
        cgl!(
            ctx,
            "\t{xer}.ca = ({ra}.s64 < 0) & (({ra}.u64 & 0x{mask:X}) != 0);"
        );
        cgl!(ctx, "\t{rd}.s64 = {ra}.s64 >> {};", ctx.op(2));
    } else {
        cgl!(ctx, "\t{xer}.ca = 0;");
        cgl!(ctx, "\t{rd}.s64 = {ra}.s64;");
    }
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_sraw(ctx: &mut BuildContext) -> bool {
    let temp = ctx.temp();
    let xer = ctx.xer();
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{temp}.u32 = {rb}.u32 & 0x3F;");
    cgl!(ctx, "\tif ({temp}.u32 > 0x1F) {temp}.u32 = 0x1F;");
    cgl!(
        ctx,
        "\t{xer}.ca = ({ra}.s32 < 0) & ((({ra}.s32 >> {temp}.u32) << {temp}.u32) != {ra}.s32);"
    );
    let rd = ctx.r(ctx.op(0));
    cgl!(ctx, "\t{rd}.s64 = {ra}.s32 >> {temp}.u32;");
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_srawi(ctx: &mut BuildContext) -> bool {
    let xer = ctx.xer();
    let ra = ctx.r(ctx.op(1));
    let rd = ctx.r(ctx.op(0));
    if ctx.op(2) != 0 {
        let mask = (1u64 << ctx.op(2)) - 1;
        cgl!(
            ctx,
            "\t{xer}.ca = ({ra}.s32 < 0) & (({ra}.u32 & 0x{mask:X}) != 0);"
        );
        cgl!(ctx, "\t{rd}.s64 = {ra}.s32 >> {};", ctx.op(2));
    } else {
        cgl!(ctx, "\t{xer}.ca = 0;");
        cgl!(ctx, "\t{rd}.s64 = {ra}.s32;");
    }
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_srd(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(
        ctx,
        "\t{rd}.u64 = {rb}.u8 & 0x40 ? 0 : ({ra}.u64 >> ({rb}.u8 & 0x7F));"
    );
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_srw(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(
        ctx,
        "\t{rd}.u64 = {rb}.u8 & 0x20 ? 0 : ({ra}.u32 >> ({rb}.u8 & 0x3F));"
    );
    emit_record_form_compare(ctx);
    true
}

pub(crate) fn build_crand(ctx: &mut BuildContext) -> bool {
    emit_cr_bit_operation(ctx, "&", false, false, false);
    true
}

pub(crate) fn build_crandc(ctx: &mut BuildContext) -> bool {
    emit_cr_bit_operation(ctx, "&", false, true, false);
    true
}

pub(crate) fn build_creqv(ctx: &mut BuildContext) -> bool {
    // XNOR over the two bits.
    emit_cr_bit_operation(ctx, "^", false, false, true);
    true
}

pub(crate) fn build_crnand(ctx: &mut BuildContext) -> bool {
    emit_cr_bit_operation(ctx, "&", false, false, true);
    true
}

pub(crate) fn build_crnor(ctx: &mut BuildContext) -> bool {
    emit_cr_bit_operation(ctx, "|", false, false, true);
    true
}

pub(crate) fn build_cror(ctx: &mut BuildContext) -> bool {
    emit_cr_bit_operation(ctx, "|", false, false, false);
    true
}

pub(crate) fn build_crorc(ctx: &mut BuildContext) -> bool {
    emit_cr_bit_operation(ctx, "|", false, true, false);
    true
}
