//! Control-flow builders: branches, calls, returns and jump-table dispatch.

use tracing::{error, warn};

use crate::context::{cgl, cr_bit_name, BuildContext, CsrState};
use crate::graph::TargetKind;

pub(crate) fn build_b(ctx: &mut BuildContext) -> bool {
    let target = ctx.op(0);

    // Classification handles thunks that branch straight into nearby
    // functions; a branch to our own entry is a loop, not a call.
    match ctx.graph.classify_target(target, ctx.base, false) {
        TargetKind::InternalLabel => {
            cgl!(ctx, "\tgoto loc_{target:X};");
        }
        TargetKind::Function | TargetKind::Import => {
            ctx.emit_function_call(target);
            cgl!(ctx, "\treturn;");
        }
        TargetKind::Unknown => {
            if target >= ctx.func.base && target < ctx.func.end {
                cgl!(ctx, "\tgoto loc_{target:X};");
            } else {
                warn!(
                    "unresolved b target 0x{:08X} from 0x{:08X}",
                    target, ctx.base
                );
                ctx.emit_function_call(target);
                cgl!(ctx, "\treturn;");
            }
        }
    }
    true
}

pub(crate) fn build_bl(ctx: &mut BuildContext) -> bool {
    let target = ctx.op(0);

    if !ctx.config.skip_lr {
        cgl!(ctx, "\tctx.lr = 0x{:X};", ctx.base + 4);
    }

    match ctx.graph.classify_target(target, ctx.base, true) {
        TargetKind::InternalLabel => {
            // Position-independent-code idiom: the bl exists only to load PC
            // into LR. LR is set above; jump locally.
            cgl!(ctx, "\tgoto loc_{target:X};");
        }
        TargetKind::Function | TargetKind::Import => {
            ctx.emit_function_call(target);
            *ctx.csr = CsrState::Unknown; // the callee may switch modes
        }
        TargetKind::Unknown => {
            error!(
                "unresolved bl target 0x{:08X} from 0x{:08X}",
                target, ctx.base
            );
            cgl!(ctx, "\t// ERROR: unresolved bl target 0x{target:08X}");
            cgl!(
                ctx,
                "\tPPC_FATAL(\"Unresolved call from 0x{:08X} to 0x{:08X}\");",
                ctx.base,
                target
            );
        }
    }
    true
}

pub(crate) fn build_blr(ctx: &mut BuildContext) -> bool {
    cgl!(ctx, "\treturn;");
    true
}

pub(crate) fn build_blrl(ctx: &mut BuildContext) -> bool {
    // Branch-to-LR-and-link never appears in well-formed images; make the
    // assumption observable.
    cgl!(ctx, "\t__builtin_debugtrap();");
    true
}

pub(crate) fn build_bctr(ctx: &mut BuildContext) -> bool {
    // Config tables are the manual override; fall back to tables the
    // analysis attached to the function.
    let jt = ctx.switch_table.or_else(|| {
        ctx.func
            .jump_tables
            .iter()
            .find(|jt| jt.bctr_address == ctx.base)
    });

    if let Some(jt) = jt {
        let index = ctx.r(jt.index_register);
        cgl!(ctx, "\tswitch ({index}.u32) {{");
        for (i, &label) in jt.targets.iter().enumerate() {
            cgl!(ctx, "\tcase {i}:");
            if label < ctx.func.base || label >= ctx.func.end {
                error!(
                    "jump target 0x{:08X} outside function bounds at bctr 0x{:08X}",
                    label, ctx.base
                );
                cgl!(
                    ctx,
                    "\t\t// ERROR: jump target 0x{label:08X} outside function bounds"
                );
                cgl!(ctx, "\t\treturn;");
            } else {
                cgl!(ctx, "\t\tgoto loc_{label:X};");
            }
        }
        cgl!(ctx, "\tdefault:");
        cgl!(ctx, "\t\t__builtin_trap(); // switch case out of range");
        cgl!(ctx, "\t}}");

        ctx.switch_table_consumed = true;
        // Any case may land on a label with a different mode.
        *ctx.csr = CsrState::Unknown;
    } else {
        // No table: a tail call through CTR. An undetected switch table here
        // is caught by the analysis validation pass instead.
        let ctr = ctx.ctr();
        cgl!(ctx, "\tPPC_CALL_INDIRECT_FUNC({ctr}.u32);");
        cgl!(ctx, "\treturn;");
    }
    true
}

pub(crate) fn build_bctrl(ctx: &mut BuildContext) -> bool {
    if !ctx.config.skip_lr {
        cgl!(ctx, "\tctx.lr = 0x{:X};", ctx.base + 4);
    }
    let ctr = ctx.ctr();
    cgl!(ctx, "\tPPC_CALL_INDIRECT_FUNC({ctr}.u32);");
    *ctx.csr = CsrState::Unknown; // the callee may switch modes
    true
}

pub(crate) fn build_bnectr(ctx: &mut BuildContext) -> bool {
    let cr = ctx.cr(ctx.op(0));
    cgl!(ctx, "\tif (!{cr}.eq) {{");
    let ctr = ctx.ctr();
    cgl!(ctx, "\t\tPPC_CALL_INDIRECT_FUNC({ctr}.u32);");
    cgl!(ctx, "\t\treturn;");
    cgl!(ctx, "\t}}");
    true
}

pub(crate) fn build_bdz(ctx: &mut BuildContext) -> bool {
    let ctr = ctx.ctr();
    cgl!(ctx, "\t--{ctr}.u64;");
    let cond = format!("{ctr}.u32 == 0");
    ctx.emit_branch_with_bounds_check(ctx.op(0), &cond, "bdz");
    true
}

pub(crate) fn build_bdzlr(ctx: &mut BuildContext) -> bool {
    let ctr = ctx.ctr();
    cgl!(ctx, "\t--{ctr}.u64;");
    cgl!(ctx, "\tif ({ctr}.u32 == 0) return;");
    true
}

pub(crate) fn build_bdnz(ctx: &mut BuildContext) -> bool {
    let ctr = ctx.ctr();
    cgl!(ctx, "\t--{ctr}.u64;");
    let cond = format!("{ctr}.u32 != 0");
    ctx.emit_branch_with_bounds_check(ctx.op(0), &cond, "bdnz");
    true
}

pub(crate) fn build_bdnzf(ctx: &mut BuildContext) -> bool {
    let bit = cr_bit_name(ctx.op(0));
    let ctr = ctx.ctr();
    let cr = ctx.cr(ctx.op(0) / 4);
    cgl!(ctx, "\t--{ctr}.u64;");
    let cond = format!("{ctr}.u32 != 0 && !{cr}.{bit}");
    ctx.emit_branch_with_bounds_check(ctx.op(1), &cond, "bdnzf");
    true
}

pub(crate) fn build_bdnzt(ctx: &mut BuildContext) -> bool {
    let bit = cr_bit_name(ctx.op(0));
    let ctr = ctx.ctr();
    let cr = ctx.cr(ctx.op(0) / 4);
    cgl!(ctx, "\t--{ctr}.u64;");
    let cond = format!("{ctr}.u32 != 0 && {cr}.{bit}");
    ctx.emit_branch_with_bounds_check(ctx.op(1), &cond, "bdnzt");
    true
}

pub(crate) fn build_bdzf(ctx: &mut BuildContext) -> bool {
    let bit = cr_bit_name(ctx.op(0));
    let ctr = ctx.ctr();
    let cr = ctx.cr(ctx.op(0) / 4);
    cgl!(ctx, "\t--{ctr}.u64;");
    let cond = format!("{ctr}.u32 == 0 && !{cr}.{bit}");
    ctx.emit_branch_with_bounds_check(ctx.op(1), &cond, "bdzf");
    true
}

pub(crate) fn build_beq(ctx: &mut BuildContext) -> bool {
    ctx.emit_conditional_branch(false, "eq");
    true
}

pub(crate) fn build_beqlr(ctx: &mut BuildContext) -> bool {
    let cr = ctx.cr(ctx.op(0));
    cgl!(ctx, "\tif ({cr}.eq) return;");
    true
}

pub(crate) fn build_bne(ctx: &mut BuildContext) -> bool {
    ctx.emit_conditional_branch(true, "eq");
    true
}

pub(crate) fn build_bnelr(ctx: &mut BuildContext) -> bool {
    let cr = ctx.cr(ctx.op(0));
    cgl!(ctx, "\tif (!{cr}.eq) return;");
    true
}

pub(crate) fn build_blt(ctx: &mut BuildContext) -> bool {
    ctx.emit_conditional_branch(false, "lt");
    true
}

pub(crate) fn build_bltlr(ctx: &mut BuildContext) -> bool {
    let cr = ctx.cr(ctx.op(0));
    cgl!(ctx, "\tif ({cr}.lt) return;");
    true
}

pub(crate) fn build_bge(ctx: &mut BuildContext) -> bool {
    ctx.emit_conditional_branch(true, "lt");
    true
}

pub(crate) fn build_bgelr(ctx: &mut BuildContext) -> bool {
    let cr = ctx.cr(ctx.op(0));
    cgl!(ctx, "\tif (!{cr}.lt) return;");
    true
}

pub(crate) fn build_bgt(ctx: &mut BuildContext) -> bool {
    ctx.emit_conditional_branch(false, "gt");
    true
}

pub(crate) fn build_bgtlr(ctx: &mut BuildContext) -> bool {
    let cr = ctx.cr(ctx.op(0));
    cgl!(ctx, "\tif ({cr}.gt) return;");
    true
}

pub(crate) fn build_ble(ctx: &mut BuildContext) -> bool {
    ctx.emit_conditional_branch(true, "gt");
    true
}

pub(crate) fn build_blelr(ctx: &mut BuildContext) -> bool {
    let cr = ctx.cr(ctx.op(0));
    cgl!(ctx, "\tif (!{cr}.gt) return;");
    true
}

pub(crate) fn build_bso(ctx: &mut BuildContext) -> bool {
    ctx.emit_conditional_branch(false, "so");
    true
}

pub(crate) fn build_bsolr(ctx: &mut BuildContext) -> bool {
    let cr = ctx.cr(ctx.op(0));
    cgl!(ctx, "\tif ({cr}.so) return;");
    true
}

pub(crate) fn build_bns(ctx: &mut BuildContext) -> bool {
    ctx.emit_conditional_branch(true, "so");
    true
}

pub(crate) fn build_bnslr(ctx: &mut BuildContext) -> bool {
    let cr = ctx.cr(ctx.op(0));
    cgl!(ctx, "\tif (!{cr}.so) return;");
    true
}
