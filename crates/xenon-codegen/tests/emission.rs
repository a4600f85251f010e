//! Per-builder emission checks: exact fragments for representative
//! instructions, determinism, record-form coverage and the MMIO heuristic.

mod common;

use common::{insn, EmitHarness};
use pretty_assertions::assert_eq;
use xenon_codegen::record_form_updates_cr;
use xenon_ppc::Mnemonic;

#[test]
fn and_emits_widest_view() {
    let mut h = EmitHarness::new();
    let fragment = h.emit(&insn(Mnemonic::And, "and", [3, 4, 5, 0, 0]));
    assert_eq!(fragment, "\tctx.r3.u64 = ctx.r4.u64 & ctx.r5.u64;\n");
}

#[test]
fn record_form_appends_cr0_compare() {
    let mut h = EmitHarness::new();
    let fragment = h.emit(&insn(Mnemonic::And, "and.", [3, 4, 5, 0, 0]));
    assert_eq!(
        fragment,
        "\tctx.r3.u64 = ctx.r4.u64 & ctx.r5.u64;\n\
         \tctx.cr0.compare<int32_t>(ctx.r3.s32, 0, ctx.xer);\n"
    );
}

#[test]
fn andi_always_sets_cr0() {
    let mut h = EmitHarness::new();
    let fragment = h.emit(&insn(Mnemonic::Andi, "andi.", [3, 4, 0xFF, 0, 0]));
    assert!(fragment.contains("ctx.cr0.compare<int32_t>"));
}

#[test]
fn rlwinm_folds_mask_at_build_time() {
    let mut h = EmitHarness::new();
    // rlwinm r3, r4, 2, 0, 29
    let fragment = h.emit(&insn(Mnemonic::Rlwinm, "rlwinm", [3, 4, 2, 0, 29]));
    assert_eq!(
        fragment,
        "\tctx.r3.u64 = __builtin_rotateleft64(ctx.r4.u32 | (ctx.r4.u64 << 32), 2) & 0xFFFFFFFC;\n"
    );
}

#[test]
fn slw_saturates_on_the_overflow_bit() {
    let mut h = EmitHarness::new();
    let fragment = h.emit(&insn(Mnemonic::Slw, "slw", [3, 4, 5, 0, 0]));
    assert_eq!(
        fragment,
        "\tctx.r3.u64 = ctx.r5.u8 & 0x20 ? 0 : (ctx.r4.u32 << (ctx.r5.u8 & 0x3F));\n"
    );
}

#[test]
fn srawi_updates_carry() {
    let mut h = EmitHarness::new();
    let fragment = h.emit(&insn(Mnemonic::Srawi, "srawi", [3, 4, 4, 0, 0]));
    assert_eq!(
        fragment,
        "\tctx.xer.ca = (ctx.r4.s32 < 0) & ((ctx.r4.u32 & 0xF) != 0);\n\
         \tctx.r3.s64 = ctx.r4.s32 >> 4;\n"
    );
}

#[test]
fn cmpw_compares_signed_32() {
    let mut h = EmitHarness::new();
    let fragment = h.emit(&insn(Mnemonic::Cmpw, "cmpw", [6, 4, 5, 0, 0]));
    assert_eq!(
        fragment,
        "\tctx.cr6.compare<int32_t>(ctx.r4.s32, ctx.r5.s32, ctx.xer);\n"
    );
}

#[test]
fn lwz_d_form() {
    let mut h = EmitHarness::new();
    let fragment = h.emit(&insn(Mnemonic::Lwz, "lwz", [3, 8, 4, 0, 0]));
    assert_eq!(fragment, "\tctx.r3.u64 = PPC_LOAD_U32(ctx.r4.u32 + 8);\n");
}

#[test]
fn lwz_with_zero_base_drops_the_base_term() {
    let mut h = EmitHarness::new();
    let fragment = h.emit(&insn(Mnemonic::Lwz, "lwz", [3, 0x100, 0, 0, 0]));
    assert_eq!(fragment, "\tctx.r3.u64 = PPC_LOAD_U32(256);\n");
}

#[test]
fn lwzu_writes_back_the_effective_address() {
    let mut h = EmitHarness::new();
    let fragment = h.emit(&insn(Mnemonic::Lwzu, "lwzu", [3, 8, 4, 0, 0]));
    assert_eq!(
        fragment,
        "\tea = 8 + ctx.r4.u32;\n\
         \tctx.r3.u64 = PPC_LOAD_U32(ea);\n\
         \tctx.r4.u32 = ea;\n"
    );
    assert!(h.locals.ea);
}

#[test]
fn lha_casts_through_the_narrow_signed_type() {
    let mut h = EmitHarness::new();
    let fragment = h.emit(&insn(Mnemonic::Lha, "lha", [3, 0xFFFF_FFFC, 4, 0, 0]));
    assert_eq!(
        fragment,
        "\tctx.r3.s64 = int16_t(PPC_LOAD_U16(ctx.r4.u32 + -4));\n"
    );
}

#[test]
fn lwarx_keeps_the_reservation_verbatim() {
    let mut h = EmitHarness::new();
    let fragment = h.emit(&insn(Mnemonic::Lwarx, "lwarx", [3, 0, 4, 0, 0]));
    assert_eq!(
        fragment,
        "\tea = ctx.r4.u32;\n\
         \tctx.reserved.u32 = *(uint32_t*)PPC_RAW_ADDR(ea);\n\
         \tctx.r3.u64 = __builtin_bswap32(ctx.reserved.u32);\n"
    );
}

#[test]
fn stwcx_is_a_cas_on_the_swapped_candidate() {
    let mut h = EmitHarness::new();
    let fragment = h.emit(&insn(Mnemonic::Stwcx, "stwcx.", [5, 0, 4, 0, 0]));
    assert!(fragment.contains(
        "__sync_bool_compare_and_swap(reinterpret_cast<uint32_t*>(PPC_RAW_ADDR(ea)), ctx.reserved.s32, __builtin_bswap32(ctx.r5.s32))"
    ));
    // Success lands in cr0.eq with so copied from XER.
    assert!(fragment.contains("\tctx.cr0.so = ctx.xer.so;\n"));
    assert!(record_form_updates_cr(&fragment));
}

#[test]
fn mmio_heuristic_follows_lis_tagging() {
    // lis r3, 0x7FC8 puts the base in the GPU register block: MMIO store.
    let mut h = EmitHarness::new();
    h.emit(&insn(Mnemonic::Lis, "lis", [3, 0x7FC8, 0, 0, 0]));
    let fragment = h.emit(&insn(Mnemonic::Stw, "stw", [4, 0, 3, 0, 0]));
    assert_eq!(fragment, "\tPPC_MM_STORE_U32(ctx.r3.u32 + 0, ctx.r4.u32);\n");

    // An ordinary upper half keeps the plain store.
    let mut h = EmitHarness::new();
    h.emit(&insn(Mnemonic::Lis, "lis", [3, 0x7000, 0, 0, 0]));
    let fragment = h.emit(&insn(Mnemonic::Stw, "stw", [4, 0, 3, 0, 0]));
    assert_eq!(fragment, "\tPPC_STORE_U32(ctx.r3.u32 + 0, ctx.r4.u32);\n");
}

#[test]
fn mmio_heuristic_follows_eieio_lookahead() {
    let mut h = EmitHarness::new();
    let stw = insn(Mnemonic::Stw, "stw", [4, 0, 3, 0, 0]);
    // Next word is eieio: barrier-marked store.
    let fragment = h.emit_at(&stw, 0x8200_0000, &[0x9064_0000, 0x7C00_06AC]);
    assert!(fragment.starts_with("\tPPC_MM_STORE_U32("));
    // No barrier: plain store.
    let fragment = h.emit_at(&stw, 0x8200_0000, &[0x9064_0000, 0x6000_0000]);
    assert!(fragment.starts_with("\tPPC_STORE_U32("));
}

#[test]
fn fp_ops_drive_the_flush_mode_machine() {
    let mut h = EmitHarness::new();
    let fadd = insn(Mnemonic::Fadd, "fadd", [1, 2, 3, 0, 0]);
    // Unknown state: checked switch.
    let first = h.emit(&fadd);
    assert!(first.starts_with("\tctx.fpscr.disableFlushMode();\n"));
    // Already scalar: no switch.
    let second = h.emit(&fadd);
    assert!(!second.contains("FlushMode"));
    // VMX op from known-scalar state: unconditional switch.
    let vadd = insn(Mnemonic::Vaddfp, "vaddfp", [0, 1, 2, 0, 0]);
    let third = h.emit(&vadd);
    assert!(third.starts_with("\tctx.fpscr.enableFlushModeUnconditional();\n"));
}

#[test]
fn lfs_widens_to_double() {
    let mut h = EmitHarness::new();
    let fragment = h.emit(&insn(Mnemonic::Lfs, "lfs", [1, 0, 4, 0, 0]));
    assert!(fragment.contains("\ttemp.u32 = PPC_LOAD_U32(ctx.r4.u32 + 0);\n"));
    assert!(fragment.contains("\tctx.f1.f64 = double(temp.f32);\n"));
}

#[test]
fn lvx_masks_and_reverses() {
    let mut h = EmitHarness::new();
    let fragment = h.emit(&insn(Mnemonic::Lvx, "lvx", [0, 3, 4, 0, 0]));
    assert!(fragment.contains("\tea = (ctx.r3.u32 + ctx.r4.u32) & ~0xF;\n"));
    assert!(fragment.contains("VectorMaskL"));
}

#[test]
fn dot3_sums_the_top_three_lanes() {
    let mut h = EmitHarness::new();
    let fragment = h.emit(&insn(Mnemonic::Vmsum3fp128, "vmsum3fp128", [0, 1, 2, 0, 0]));
    assert!(fragment.contains("simde_mm_dp_ps"));
    assert!(fragment.contains("0xEF"));
}

#[test]
fn vector_compare_record_form_sets_cr6() {
    let mut h = EmitHarness::new();
    let fragment = h.emit(&insn(Mnemonic::Vcmpequw, "vcmpequw.", [0, 1, 2, 0, 0]));
    assert!(fragment.contains("ctx.cr6.setFromMask"));
    assert!(record_form_updates_cr(&fragment));
}

#[test]
fn mfocrf_moves_only_the_selected_field() {
    // FXM 0x02 selects CR6: rD gets that field's nibble, the rest is zero.
    let mut h = EmitHarness::new();
    let fragment = h.emit(&insn(Mnemonic::Mfocrf, "mfocrf", [3, 0x02, 0, 0, 0]));
    assert_eq!(
        fragment,
        "\tctx.r3.u64 = ctx.cr6.lt ? 0x80 : 0;\n\
         \tctx.r3.u64 |= ctx.cr6.gt ? 0x40 : 0;\n\
         \tctx.r3.u64 |= ctx.cr6.eq ? 0x20 : 0;\n\
         \tctx.r3.u64 |= ctx.cr6.so ? 0x10 : 0;\n"
    );
    assert!(!fragment.contains("cr0"));

    // mfcr by contrast assembles all eight fields.
    let fragment = h.emit(&insn(Mnemonic::Mfcr, "mfcr", [3, 0, 0, 0, 0]));
    assert!(fragment.contains("ctx.cr0.lt ? 0x80000000 : 0;"));
    assert!(fragment.contains("ctx.cr7.so ? 0x1 : 0;"));
}

#[test]
fn trap_conditions_or_both_interpretations() {
    let mut h = EmitHarness::new();
    // tw with TO = lt | llt: one signed and one unsigned clause.
    let fragment = h.emit(&insn(Mnemonic::Tw, "tw", [0x12, 3, 4, 0, 0]));
    assert_eq!(
        fragment,
        "\tif (ctx.r3.s32 < ctx.r4.s32 || ctx.r3.u32 < ctx.r4.u32) ppc_trap(ctx, 0x82000000, 0);\n"
    );
    // Named variant recovers TO from the name.
    let fragment = h.emit(&insn(Mnemonic::Tweqi, "tweqi", [3, 7, 0, 0, 0]));
    assert_eq!(
        fragment,
        "\tif (ctx.r3.s32 == 7) ppc_trap(ctx, 0x82000000, 0);\n"
    );
}

#[test]
fn barriers_lower_to_comments() {
    let mut h = EmitHarness::new();
    for (id, name) in [
        (Mnemonic::Sync, "sync"),
        (Mnemonic::Lwsync, "lwsync"),
        (Mnemonic::Eieio, "eieio"),
        (Mnemonic::Dcbt, "dcbt"),
    ] {
        let fragment = h.emit(&insn(id, name, [0; 5]));
        assert_eq!(fragment, format!("\t// {name}\n"));
    }
}

#[test]
fn builders_are_deterministic() {
    let cases = [
        insn(Mnemonic::Add, "add.", [3, 4, 5, 0, 0]),
        insn(Mnemonic::Lwzu, "lwzu", [3, 8, 4, 0, 0]),
        insn(Mnemonic::Stwcx, "stwcx.", [5, 0, 4, 0, 0]),
        insn(Mnemonic::Vperm, "vperm", [0, 1, 2, 3, 0]),
        insn(Mnemonic::Bdnz, "bdnz", [0x8200_0010, 0, 0, 0, 0]),
    ];
    for case in &cases {
        let a = EmitHarness::new().emit(case);
        let b = EmitHarness::new().emit(case);
        assert_eq!(a, b, "builder output diverged for {}", case.name);
    }
}

#[test]
fn record_forms_reference_the_condition_field() {
    let cases = [
        insn(Mnemonic::Add, "add.", [3, 4, 5, 0, 0]),
        insn(Mnemonic::Subf, "subf.", [3, 4, 5, 0, 0]),
        insn(Mnemonic::And, "and.", [3, 4, 5, 0, 0]),
        insn(Mnemonic::Or, "or.", [3, 4, 5, 0, 0]),
        insn(Mnemonic::Xor, "xor.", [3, 4, 5, 0, 0]),
        insn(Mnemonic::Neg, "neg.", [3, 4, 0, 0, 0]),
        insn(Mnemonic::Extsb, "extsb.", [3, 4, 0, 0, 0]),
        insn(Mnemonic::Extsh, "extsh.", [3, 4, 0, 0, 0]),
        insn(Mnemonic::Rlwinm, "rlwinm.", [3, 4, 2, 0, 29]),
        insn(Mnemonic::Slw, "slw.", [3, 4, 5, 0, 0]),
        insn(Mnemonic::Srawi, "srawi.", [3, 4, 4, 0, 0]),
        insn(Mnemonic::Mr, "mr.", [3, 4, 0, 0, 0]),
        insn(Mnemonic::Andi, "andi.", [3, 4, 1, 0, 0]),
        insn(Mnemonic::Stwcx, "stwcx.", [5, 0, 4, 0, 0]),
        insn(Mnemonic::Vcmpequw, "vcmpequw.", [0, 1, 2, 0, 0]),
        insn(Mnemonic::Vcmpgtfp, "vcmpgtfp.", [0, 1, 2, 0, 0]),
    ];
    for case in &cases {
        let fragment = EmitHarness::new().emit(case);
        assert!(
            fragment.contains("cr0") || fragment.contains("cr6"),
            "{} emitted no condition-field update:\n{fragment}",
            case.name
        );
    }
}
