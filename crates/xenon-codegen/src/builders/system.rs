//! System builders: barriers, cache ops, special-register moves and traps.
//!
//! Memory barriers lower to comments: the guest software model is barrier
//! poor and host sequential consistency on x86-class targets is
//! conservative. Weak-ordered hosts need this revisited.

use super::{emit_record_form_compare, emit_trap};
use crate::context::{cg, cgl, cr_bit_name, BuildContext};

fn comment_only(ctx: &mut BuildContext, text: &str) -> bool {
    cgl!(ctx, "\t// {text}");
    true
}

pub(crate) fn build_nop(ctx: &mut BuildContext) -> bool {
    comment_only(ctx, "nop")
}

pub(crate) fn build_attn(ctx: &mut BuildContext) -> bool {
    cgl!(ctx, "\t__builtin_debugtrap();");
    true
}

pub(crate) fn build_sync(ctx: &mut BuildContext) -> bool {
    comment_only(ctx, "sync")
}

pub(crate) fn build_lwsync(ctx: &mut BuildContext) -> bool {
    comment_only(ctx, "lwsync")
}

pub(crate) fn build_eieio(ctx: &mut BuildContext) -> bool {
    comment_only(ctx, "eieio")
}

pub(crate) fn build_db16cyc(ctx: &mut BuildContext) -> bool {
    comment_only(ctx, "db16cyc")
}

pub(crate) fn build_cctpl(ctx: &mut BuildContext) -> bool {
    comment_only(ctx, "cctpl")
}

pub(crate) fn build_cctpm(ctx: &mut BuildContext) -> bool {
    comment_only(ctx, "cctpm")
}

// Cache hints are no-ops; dcbz actually clears the line.

pub(crate) fn build_dcbf(ctx: &mut BuildContext) -> bool {
    comment_only(ctx, "dcbf")
}

pub(crate) fn build_dcbst(ctx: &mut BuildContext) -> bool {
    comment_only(ctx, "dcbst")
}

pub(crate) fn build_dcbt(ctx: &mut BuildContext) -> bool {
    comment_only(ctx, "dcbt")
}

pub(crate) fn build_dcbtst(ctx: &mut BuildContext) -> bool {
    comment_only(ctx, "dcbtst")
}

fn dcbz_impl(ctx: &mut BuildContext, line: u32) {
    cg!(ctx, "\tmemset(base + ((");
    if ctx.op(0) != 0 {
        let ra = ctx.r(ctx.op(0));
        cg!(ctx, "{ra}.u32 + ");
    }
    let rb = ctx.r(ctx.op(1));
    cgl!(ctx, "{rb}.u32) & ~{}), 0, {});", line - 1, line);
}

pub(crate) fn build_dcbz(ctx: &mut BuildContext) -> bool {
    dcbz_impl(ctx, 32);
    true
}

pub(crate) fn build_dcbzl(ctx: &mut BuildContext) -> bool {
    dcbz_impl(ctx, 128);
    true
}

pub(crate) fn build_mr(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    let rs = ctx.r(ctx.op(1));
    cgl!(ctx, "\t{rd}.u64 = {rs}.u64;");
    emit_record_form_compare(ctx);

    if ctx.locals.is_mmio_base(ctx.op(1)) {
        ctx.locals.set_mmio_base(ctx.op(0));
    } else {
        ctx.locals.clear_mmio_base(ctx.op(0));
    }
    true
}

pub(crate) fn build_mfcr(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    for i in 0..32u32 {
        let cr = ctx.cr(i / 4);
        let field = cr_bit_name(i % 4);
        let op = if i == 0 { "=" } else { "|=" };
        cgl!(ctx, "\t{rd}.u64 {op} {cr}.{field} ? 0x{:X} : 0;", 1u32 << (31 - i));
    }
    true
}

pub(crate) fn build_mfocrf(ctx: &mut BuildContext) -> bool {
    // One-hot FXM: bit 0x80 >> n selects CR field n. Only the selected
    // field's nibble lands in rD; everything else reads as zero.
    let fxm = ctx.op(1);
    let rd = ctx.r(ctx.op(0));
    let mut first = true;
    for i in 0..32u32 {
        if fxm & (0x80 >> (i / 4)) == 0 {
            continue;
        }
        let cr = ctx.cr(i / 4);
        let field = cr_bit_name(i % 4);
        let op = if first { "=" } else { "|=" };
        cgl!(ctx, "\t{rd}.u64 {op} {cr}.{field} ? 0x{:X} : 0;", 1u32 << (31 - i));
        first = false;
    }
    if first {
        cgl!(ctx, "\t{rd}.u64 = 0;");
    }
    true
}

pub(crate) fn build_mffs(ctx: &mut BuildContext) -> bool {
    let fd = ctx.f(ctx.op(0));
    cgl!(ctx, "\t{fd}.u64 = ctx.fpscr.loadFromHost();");
    true
}

pub(crate) fn build_mflr(ctx: &mut BuildContext) -> bool {
    if !ctx.config.skip_lr {
        let rd = ctx.r(ctx.op(0));
        cgl!(ctx, "\t{rd}.u64 = ctx.lr;");
    }
    true
}

pub(crate) fn build_mfmsr(ctx: &mut BuildContext) -> bool {
    if ctx.config.skip_msr {
        return comment_only(ctx, "mfmsr");
    }
    let rd = ctx.r(ctx.op(0));
    cgl!(ctx, "\t{rd}.u64 = ctx.msr;");
    true
}

pub(crate) fn build_mftb(ctx: &mut BuildContext) -> bool {
    // Every emitted clock read funnels through the guest time base.
    let rd = ctx.r(ctx.op(0));
    cgl!(ctx, "\t{rd}.u64 = PPC_QUERY_TIME_BASE();");
    true
}

pub(crate) fn build_mtcr(ctx: &mut BuildContext) -> bool {
    let rs = ctx.r(ctx.op(0));
    for i in 0..32u32 {
        let cr = ctx.cr(i / 4);
        let field = cr_bit_name(i % 4);
        cgl!(
            ctx,
            "\t{cr}.{field} = ({rs}.u32 & 0x{:X}) != 0;",
            1u32 << (31 - i)
        );
    }
    true
}

pub(crate) fn build_mtctr(ctx: &mut BuildContext) -> bool {
    let ctr = ctx.ctr();
    let rs = ctx.r(ctx.op(0));
    cgl!(ctx, "\t{ctr}.u64 = {rs}.u64;");
    true
}

pub(crate) fn build_mtfsf(ctx: &mut BuildContext) -> bool {
    let fb = ctx.f(ctx.op(1));
    cgl!(ctx, "\tctx.fpscr.storeFromGuest({fb}.u64);");
    true
}

pub(crate) fn build_mtlr(ctx: &mut BuildContext) -> bool {
    if !ctx.config.skip_lr {
        let rs = ctx.r(ctx.op(0));
        cgl!(ctx, "\tctx.lr = {rs}.u64;");
    }
    true
}

pub(crate) fn build_mtmsrd(ctx: &mut BuildContext) -> bool {
    if ctx.config.skip_msr {
        return comment_only(ctx, "mtmsrd");
    }
    let rs = ctx.r(ctx.op(0));
    cgl!(ctx, "\tctx.msr = {rs}.u32;");
    true
}

pub(crate) fn build_mtxer(ctx: &mut BuildContext) -> bool {
    let xer = ctx.xer();
    let rs = ctx.r(ctx.op(0));
    cgl!(ctx, "\t{xer}.so = ({rs}.u64 & 0x80000000) != 0;");
    cgl!(ctx, "\t{xer}.ov = ({rs}.u64 & 0x40000000) != 0;");
    cgl!(ctx, "\t{xer}.ca = ({rs}.u64 & 0x20000000) != 0;");
    true
}

// Traps. The condition bits come from the opcode name for the conditional
// aliases and from the TO operand for the generic spellings.

pub(crate) fn build_twi(ctx: &mut BuildContext) -> bool {
    let (to, ra_index, imm) = match xenon_ppc::trap_condition_bits(&ctx.insn.name) {
        Some(to) => (to, ctx.op(0), ctx.simm(1)),
        None => (ctx.op(0), ctx.op(1), ctx.simm(2)),
    };
    let ra = ctx.r(ra_index);
    emit_trap(
        ctx,
        to,
        &format!("{ra}.s32"),
        &format!("{ra}.u32"),
        &imm.to_string(),
        &format!("{}u", imm as u32),
    );
    true
}

pub(crate) fn build_tdi(ctx: &mut BuildContext) -> bool {
    let (to, ra_index, imm) = match xenon_ppc::trap_condition_bits(&ctx.insn.name) {
        Some(to) => (to, ctx.op(0), ctx.simm(1)),
        None => (ctx.op(0), ctx.op(1), ctx.simm(2)),
    };
    let ra = ctx.r(ra_index);
    emit_trap(
        ctx,
        to,
        &format!("{ra}.s64"),
        &format!("{ra}.u64"),
        &format!("{}ll", imm as i64),
        &format!("{}ull", imm as i64 as u64),
    );
    true
}

pub(crate) fn build_tw(ctx: &mut BuildContext) -> bool {
    let (to, ra_index, rb_index) = match xenon_ppc::trap_condition_bits(&ctx.insn.name) {
        Some(to) => (to, ctx.op(0), ctx.op(1)),
        None => (ctx.op(0), ctx.op(1), ctx.op(2)),
    };
    let ra = ctx.r(ra_index);
    let rb = ctx.r(rb_index);
    emit_trap(
        ctx,
        to,
        &format!("{ra}.s32"),
        &format!("{ra}.u32"),
        &format!("{rb}.s32"),
        &format!("{rb}.u32"),
    );
    true
}

pub(crate) fn build_td(ctx: &mut BuildContext) -> bool {
    let (to, ra_index, rb_index) = match xenon_ppc::trap_condition_bits(&ctx.insn.name) {
        Some(to) => (to, ctx.op(0), ctx.op(1)),
        None => (ctx.op(0), ctx.op(1), ctx.op(2)),
    };
    let ra = ctx.r(ra_index);
    let rb = ctx.r(rb_index);
    emit_trap(
        ctx,
        to,
        &format!("{ra}.s64"),
        &format!("{ra}.u64"),
        &format!("{rb}.s64"),
        &format!("{rb}.u64"),
    );
    true
}
