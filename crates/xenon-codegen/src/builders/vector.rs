//! VMX builders.
//!
//! All of these operate on the byte-reversed register convention the vector
//! load/store builders establish; merge operands swap and dot products mask
//! the top lanes accordingly.

use crate::context::{cgl, BuildContext};

fn store_ps(ctx: &mut BuildContext, vd: &str, expr: &str) {
    cgl!(ctx, "\tsimde_mm_store_ps({vd}.f32, {expr});");
}

fn store_si(ctx: &mut BuildContext, vd: &str, expr: &str) {
    cgl!(ctx, "\tsimde_mm_store_si128((simde__m128i*){vd}.u8, {expr});");
}

fn load_ps(v: &str) -> String {
    format!("simde_mm_load_ps({v}.f32)")
}

fn load_si(v: &str) -> String {
    format!("simde_mm_load_si128((simde__m128i*){v}.u8)")
}

/// `vD = intrinsic(vA, vB)` over float lanes.
fn v_binary_ps(ctx: &mut BuildContext, intrinsic: &str) {
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    let expr = format!("{intrinsic}({}, {})", load_ps(&va), load_ps(&vb));
    store_ps(ctx, &vd, &expr);
}

/// `vD = intrinsic(vA, vB)` over integer lanes.
fn v_binary_si(ctx: &mut BuildContext, intrinsic: &str) {
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    let expr = format!("{intrinsic}({}, {})", load_si(&va), load_si(&vb));
    store_si(ctx, &vd, &expr);
}

/// Record-form CR6 update for vector float compares.
fn v_record_ps(ctx: &mut BuildContext) {
    if ctx.insn.is_record_form() {
        let cr6 = ctx.cr(6);
        let vd = ctx.v(ctx.op(0));
        cgl!(ctx, "\t{cr6}.setFromMask({}, 0xF);", load_ps(&vd));
    }
}

/// Record-form CR6 update for vector integer compares.
fn v_record_si(ctx: &mut BuildContext) {
    if ctx.insn.is_record_form() {
        let cr6 = ctx.cr(6);
        let vd = ctx.v(ctx.op(0));
        cgl!(ctx, "\t{cr6}.setFromMask({}, 0xFFFF);", load_si(&vd));
    }
}

// Float arithmetic

pub(crate) fn build_vaddfp(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(true);
    v_binary_ps(ctx, "simde_mm_add_ps");
    true
}

pub(crate) fn build_vsubfp(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(true);
    v_binary_ps(ctx, "simde_mm_sub_ps");
    true
}

pub(crate) fn build_vmulfp128(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(true);
    v_binary_ps(ctx, "simde_mm_mul_ps");
    true
}

pub(crate) fn build_vmaddfp(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(true);
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vc = ctx.v(ctx.op(2));
    let vb = ctx.v(ctx.op(3));
    let expr = format!(
        "simde_mm_add_ps(simde_mm_mul_ps({}, {}), {})",
        load_ps(&va),
        load_ps(&vc),
        load_ps(&vb)
    );
    store_ps(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vnmsubfp(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(true);
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vc = ctx.v(ctx.op(2));
    let vb = ctx.v(ctx.op(3));
    let expr = format!(
        "simde_mm_xor_ps(simde_mm_sub_ps(simde_mm_mul_ps({}, {}), {}), simde_mm_set1_ps(-0.0f))",
        load_ps(&va),
        load_ps(&vc),
        load_ps(&vb)
    );
    store_ps(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vmaxfp(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(true);
    v_binary_ps(ctx, "simde_mm_max_ps");
    true
}

pub(crate) fn build_vminfp(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(true);
    v_binary_ps(ctx, "simde_mm_min_ps");
    true
}

pub(crate) fn build_vrefp(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(true);
    let vd = ctx.v(ctx.op(0));
    let vb = ctx.v(ctx.op(1));
    let expr = format!("simde_mm_rcp_ps({})", load_ps(&vb));
    store_ps(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vrsqrtefp(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(true);
    let vd = ctx.v(ctx.op(0));
    let vb = ctx.v(ctx.op(1));
    let expr = format!("simde_mm_rsqrt_ps({})", load_ps(&vb));
    store_ps(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vexptefp(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(true);
    let vd = ctx.v(ctx.op(0));
    let vb = ctx.v(ctx.op(1));
    for i in 0..4 {
        cgl!(ctx, "\t{vd}.f32[{i}] = exp2f({vb}.f32[{i}]);");
    }
    true
}

pub(crate) fn build_vlogefp(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(true);
    let vd = ctx.v(ctx.op(0));
    let vb = ctx.v(ctx.op(1));
    for i in 0..4 {
        cgl!(ctx, "\t{vd}.f32[{i}] = log2f({vb}.f32[{i}]);");
    }
    true
}

// Dot products: lanes y-z-w (and all four) because of the stored reversal.

pub(crate) fn build_vmsum3fp128(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(true);
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    let expr = format!("simde_mm_dp_ps({}, {}, 0xEF)", load_ps(&va), load_ps(&vb));
    store_ps(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vmsum4fp128(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(true);
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    let expr = format!("simde_mm_dp_ps({}, {}, 0xFF)", load_ps(&va), load_ps(&vb));
    store_ps(ctx, &vd, &expr);
    true
}

// Rounding

fn v_round(ctx: &mut BuildContext, mode: &str) {
    ctx.emit_set_flush_mode(true);
    let vd = ctx.v(ctx.op(0));
    let vb = ctx.v(ctx.op(1));
    let expr = format!(
        "simde_mm_round_ps({}, {mode} | SIMDE_MM_FROUND_NO_EXC)",
        load_ps(&vb)
    );
    store_ps(ctx, &vd, &expr);
}

pub(crate) fn build_vrfim(ctx: &mut BuildContext) -> bool {
    v_round(ctx, "SIMDE_MM_FROUND_TO_NEG_INF");
    true
}

pub(crate) fn build_vrfin(ctx: &mut BuildContext) -> bool {
    v_round(ctx, "SIMDE_MM_FROUND_TO_NEAREST_INT");
    true
}

pub(crate) fn build_vrfip(ctx: &mut BuildContext) -> bool {
    v_round(ctx, "SIMDE_MM_FROUND_TO_POS_INF");
    true
}

pub(crate) fn build_vrfiz(ctx: &mut BuildContext) -> bool {
    v_round(ctx, "SIMDE_MM_FROUND_TO_ZERO");
    true
}

// Integer arithmetic

pub(crate) fn build_vaddsbs(ctx: &mut BuildContext) -> bool {
    v_binary_si(ctx, "simde_mm_adds_epi8");
    true
}

pub(crate) fn build_vaddshs(ctx: &mut BuildContext) -> bool {
    v_binary_si(ctx, "simde_mm_adds_epi16");
    true
}

pub(crate) fn build_vaddsws(ctx: &mut BuildContext) -> bool {
    // Saturating word add has no SSE spelling; the runtime supplies it.
    v_binary_si(ctx, "simde_mm_adds_epi32");
    true
}

pub(crate) fn build_vaddubm(ctx: &mut BuildContext) -> bool {
    v_binary_si(ctx, "simde_mm_add_epi8");
    true
}

pub(crate) fn build_vaddubs(ctx: &mut BuildContext) -> bool {
    v_binary_si(ctx, "simde_mm_adds_epu8");
    true
}

pub(crate) fn build_vadduhm(ctx: &mut BuildContext) -> bool {
    v_binary_si(ctx, "simde_mm_add_epi16");
    true
}

pub(crate) fn build_vadduwm(ctx: &mut BuildContext) -> bool {
    v_binary_si(ctx, "simde_mm_add_epi32");
    true
}

pub(crate) fn build_vadduws(ctx: &mut BuildContext) -> bool {
    v_binary_si(ctx, "simde_mm_adds_epu32");
    true
}

pub(crate) fn build_vsubsbs(ctx: &mut BuildContext) -> bool {
    v_binary_si(ctx, "simde_mm_subs_epi8");
    true
}

pub(crate) fn build_vsubshs(ctx: &mut BuildContext) -> bool {
    v_binary_si(ctx, "simde_mm_subs_epi16");
    true
}

pub(crate) fn build_vsubsws(ctx: &mut BuildContext) -> bool {
    v_binary_si(ctx, "simde_mm_subs_epi32");
    true
}

pub(crate) fn build_vsububm(ctx: &mut BuildContext) -> bool {
    v_binary_si(ctx, "simde_mm_sub_epi8");
    true
}

pub(crate) fn build_vsububs(ctx: &mut BuildContext) -> bool {
    v_binary_si(ctx, "simde_mm_subs_epu8");
    true
}

pub(crate) fn build_vsubuhm(ctx: &mut BuildContext) -> bool {
    v_binary_si(ctx, "simde_mm_sub_epi16");
    true
}

pub(crate) fn build_vsubuhs(ctx: &mut BuildContext) -> bool {
    v_binary_si(ctx, "simde_mm_subs_epu16");
    true
}

pub(crate) fn build_vsubuwm(ctx: &mut BuildContext) -> bool {
    v_binary_si(ctx, "simde_mm_sub_epi32");
    true
}

pub(crate) fn build_vsubuws(ctx: &mut BuildContext) -> bool {
    v_binary_si(ctx, "simde_mm_subs_epu32");
    true
}

pub(crate) fn build_vmaxsh(ctx: &mut BuildContext) -> bool {
    v_binary_si(ctx, "simde_mm_max_epi16");
    true
}

pub(crate) fn build_vmaxsw(ctx: &mut BuildContext) -> bool {
    v_binary_si(ctx, "simde_mm_max_epi32");
    true
}

pub(crate) fn build_vmaxuh(ctx: &mut BuildContext) -> bool {
    v_binary_si(ctx, "simde_mm_max_epu16");
    true
}

pub(crate) fn build_vminsh(ctx: &mut BuildContext) -> bool {
    v_binary_si(ctx, "simde_mm_min_epi16");
    true
}

pub(crate) fn build_vminsw(ctx: &mut BuildContext) -> bool {
    v_binary_si(ctx, "simde_mm_min_epi32");
    true
}

pub(crate) fn build_vminuh(ctx: &mut BuildContext) -> bool {
    v_binary_si(ctx, "simde_mm_min_epu16");
    true
}

// Averages

pub(crate) fn build_vavgsb(ctx: &mut BuildContext) -> bool {
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    let v_temp = ctx.v_temp();
    cgl!(ctx, "\tfor (size_t i = 0; i < 16; i++)");
    cgl!(
        ctx,
        "\t\t{v_temp}.s8[i] = (int16_t({va}.s8[i]) + int16_t({vb}.s8[i]) + 1) >> 1;"
    );
    let expr = load_si(&v_temp);
    store_si(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vavgsh(ctx: &mut BuildContext) -> bool {
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    let v_temp = ctx.v_temp();
    cgl!(ctx, "\tfor (size_t i = 0; i < 8; i++)");
    cgl!(
        ctx,
        "\t\t{v_temp}.s16[i] = (int32_t({va}.s16[i]) + int32_t({vb}.s16[i]) + 1) >> 1;"
    );
    let expr = load_si(&v_temp);
    store_si(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vavgub(ctx: &mut BuildContext) -> bool {
    v_binary_si(ctx, "simde_mm_avg_epu8");
    true
}

pub(crate) fn build_vavguh(ctx: &mut BuildContext) -> bool {
    v_binary_si(ctx, "simde_mm_avg_epu16");
    true
}

// Logical / select

pub(crate) fn build_vand(ctx: &mut BuildContext) -> bool {
    v_binary_si(ctx, "simde_mm_and_si128");
    true
}

pub(crate) fn build_vandc(ctx: &mut BuildContext) -> bool {
    // vA & ~vB: andnot complements its first operand.
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    let expr = format!("simde_mm_andnot_si128({}, {})", load_si(&vb), load_si(&va));
    store_si(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vandc128(ctx: &mut BuildContext) -> bool {
    // The VMX128 encoding splits the vA/vB register numbers across extra
    // fields; the decoder normalizes them back into the usual vD/vA/vB
    // slots, so the lowering matches vandc. Kept as its own builder: this is
    // the one logical op where that slot normalization must be re-checked
    // against the decoder before assuming the scalar emission.
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    let expr = format!("simde_mm_andnot_si128({}, {})", load_si(&vb), load_si(&va));
    store_si(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vnor(ctx: &mut BuildContext) -> bool {
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    let expr = format!(
        "simde_mm_xor_si128(simde_mm_or_si128({}, {}), simde_mm_set1_epi32(-1))",
        load_si(&va),
        load_si(&vb)
    );
    store_si(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vor(ctx: &mut BuildContext) -> bool {
    v_binary_si(ctx, "simde_mm_or_si128");
    true
}

pub(crate) fn build_vxor(ctx: &mut BuildContext) -> bool {
    v_binary_si(ctx, "simde_mm_xor_si128");
    true
}

pub(crate) fn build_vsel(ctx: &mut BuildContext) -> bool {
    // vD = (vB & vC) | (vA & ~vC)
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    let vc = ctx.v(ctx.op(3));
    let expr = format!(
        "simde_mm_or_si128(simde_mm_and_si128({}, {}), simde_mm_andnot_si128({}, {}))",
        load_si(&vc),
        load_si(&vb),
        load_si(&vc),
        load_si(&va)
    );
    store_si(ctx, &vd, &expr);
    true
}

// Compares

pub(crate) fn build_vcmpbfp(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(true);
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    let expr = format!(
        "simde_mm_or_si128(simde_mm_and_si128(simde_mm_castps_si128(simde_mm_cmpgt_ps({a}, {b})), simde_mm_set1_epi32(0x80000000)), simde_mm_and_si128(simde_mm_castps_si128(simde_mm_cmplt_ps({a}, simde_mm_xor_ps({b}, simde_mm_set1_ps(-0.0f)))), simde_mm_set1_epi32(0x40000000)))",
        a = load_ps(&va),
        b = load_ps(&vb)
    );
    store_si(ctx, &vd, &expr);
    v_record_si(ctx);
    true
}

fn v_compare_ps(ctx: &mut BuildContext, intrinsic: &str) {
    ctx.emit_set_flush_mode(true);
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    let expr = format!(
        "simde_mm_castps_si128({intrinsic}({}, {}))",
        load_ps(&va),
        load_ps(&vb)
    );
    store_si(ctx, &vd, &expr);
    v_record_ps(ctx);
}

pub(crate) fn build_vcmpeqfp(ctx: &mut BuildContext) -> bool {
    v_compare_ps(ctx, "simde_mm_cmpeq_ps");
    true
}

pub(crate) fn build_vcmpgefp(ctx: &mut BuildContext) -> bool {
    v_compare_ps(ctx, "simde_mm_cmpge_ps");
    true
}

pub(crate) fn build_vcmpgtfp(ctx: &mut BuildContext) -> bool {
    v_compare_ps(ctx, "simde_mm_cmpgt_ps");
    true
}

fn v_compare_si(ctx: &mut BuildContext, intrinsic: &str) {
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    let expr = format!("{intrinsic}({}, {})", load_si(&va), load_si(&vb));
    store_si(ctx, &vd, &expr);
    v_record_si(ctx);
}

pub(crate) fn build_vcmpequb(ctx: &mut BuildContext) -> bool {
    v_compare_si(ctx, "simde_mm_cmpeq_epi8");
    true
}

pub(crate) fn build_vcmpequh(ctx: &mut BuildContext) -> bool {
    v_compare_si(ctx, "simde_mm_cmpeq_epi16");
    true
}

pub(crate) fn build_vcmpequw(ctx: &mut BuildContext) -> bool {
    v_compare_si(ctx, "simde_mm_cmpeq_epi32");
    true
}

pub(crate) fn build_vcmpgtsh(ctx: &mut BuildContext) -> bool {
    v_compare_si(ctx, "simde_mm_cmpgt_epi16");
    true
}

pub(crate) fn build_vcmpgtsw(ctx: &mut BuildContext) -> bool {
    v_compare_si(ctx, "simde_mm_cmpgt_epi32");
    true
}

fn v_compare_unsigned(ctx: &mut BuildContext, intrinsic: &str, bias: &str) {
    // Unsigned compare via sign-bias into the signed compare.
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    let expr = format!(
        "{intrinsic}(simde_mm_xor_si128({}, {bias}), simde_mm_xor_si128({}, {bias}))",
        load_si(&va),
        load_si(&vb)
    );
    store_si(ctx, &vd, &expr);
    v_record_si(ctx);
}

pub(crate) fn build_vcmpgtub(ctx: &mut BuildContext) -> bool {
    v_compare_unsigned(
        ctx,
        "simde_mm_cmpgt_epi8",
        "simde_mm_set1_epi8(char(0x80))",
    );
    true
}

pub(crate) fn build_vcmpgtuh(ctx: &mut BuildContext) -> bool {
    v_compare_unsigned(
        ctx,
        "simde_mm_cmpgt_epi16",
        "simde_mm_set1_epi16(short(0x8000))",
    );
    true
}

// Conversions

pub(crate) fn build_vctsxs(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(true);
    let vd = ctx.v(ctx.op(0));
    let vb = ctx.v(ctx.op(1));
    let scale = ctx.op(2);
    let expr = format!(
        "simde_mm_vctsxs(simde_mm_mul_ps({}, simde_mm_set1_ps({}.0f)))",
        load_ps(&vb),
        1u64 << scale
    );
    store_si(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vctuxs(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(true);
    let vd = ctx.v(ctx.op(0));
    let vb = ctx.v(ctx.op(1));
    let scale = ctx.op(2);
    let expr = format!(
        "simde_mm_vctuxs(simde_mm_mul_ps({}, simde_mm_set1_ps({}.0f)))",
        load_ps(&vb),
        1u64 << scale
    );
    store_si(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vcfsx(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(true);
    let vd = ctx.v(ctx.op(0));
    let vb = ctx.v(ctx.op(1));
    let scale = ctx.op(2);
    let expr = format!(
        "simde_mm_mul_ps(simde_mm_cvtepi32_ps({}), simde_mm_castsi128_ps(simde_mm_set1_epi32(int(0x{:X}))))",
        load_si(&vb),
        (127 - scale) << 23
    );
    store_ps(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vcfux(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(true);
    let vd = ctx.v(ctx.op(0));
    let vb = ctx.v(ctx.op(1));
    let scale = ctx.op(2);
    let expr = format!(
        "simde_mm_mul_ps(simde_mm_cvtepu32_ps({}), simde_mm_castsi128_ps(simde_mm_set1_epi32(int(0x{:X}))))",
        load_si(&vb),
        (127 - scale) << 23
    );
    store_ps(ctx, &vd, &expr);
    true
}

// Merges: operands swap because of the stored reversal.

fn v_merge(ctx: &mut BuildContext, intrinsic: &str) {
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    let expr = format!("{intrinsic}({}, {})", load_si(&vb), load_si(&va));
    store_si(ctx, &vd, &expr);
}

pub(crate) fn build_vmrghb(ctx: &mut BuildContext) -> bool {
    v_merge(ctx, "simde_mm_unpackhi_epi8");
    true
}

pub(crate) fn build_vmrghh(ctx: &mut BuildContext) -> bool {
    v_merge(ctx, "simde_mm_unpackhi_epi16");
    true
}

pub(crate) fn build_vmrghw(ctx: &mut BuildContext) -> bool {
    v_merge(ctx, "simde_mm_unpackhi_epi32");
    true
}

pub(crate) fn build_vmrglb(ctx: &mut BuildContext) -> bool {
    v_merge(ctx, "simde_mm_unpacklo_epi8");
    true
}

pub(crate) fn build_vmrglh(ctx: &mut BuildContext) -> bool {
    v_merge(ctx, "simde_mm_unpacklo_epi16");
    true
}

pub(crate) fn build_vmrglw(ctx: &mut BuildContext) -> bool {
    v_merge(ctx, "simde_mm_unpacklo_epi32");
    true
}

// Permutes

pub(crate) fn build_vperm(ctx: &mut BuildContext) -> bool {
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    let vc = ctx.v(ctx.op(3));
    let expr = format!(
        "simde_mm_perm_epi8({}, {}, {})",
        load_si(&va),
        load_si(&vb),
        load_si(&vc)
    );
    store_si(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vpermwi128(ctx: &mut BuildContext) -> bool {
    // Word permute with a build-time control; indices flip for the stored
    // reversal.
    let imm = ctx.op(2);
    let select = |slot: u32| 3 - ((imm >> (6 - slot * 2)) & 3);
    let control = select(0) << 6 | select(1) << 4 | select(2) << 2 | select(3);
    let vd = ctx.v(ctx.op(0));
    let vb = ctx.v(ctx.op(1));
    let expr = format!("simde_mm_shuffle_epi32({}, 0x{control:X})", load_si(&vb));
    store_si(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vrlimi128(ctx: &mut BuildContext) -> bool {
    // Rotate the source words, then blend them into the destination under
    // the 4-bit mask. Both constants resolve at build time.
    const SHUFFLES: [u32; 4] = [0xE4, 0x93, 0x4E, 0x39]; // rotate-left by 0..3 words
    let mask = ctx.op(2);
    let rot = ctx.op(3);
    let vd = ctx.v(ctx.op(0));
    let vb = ctx.v(ctx.op(1));
    let expr = format!(
        "simde_mm_blend_ps({}, simde_mm_permute_ps({}, 0x{:X}), 0x{:X})",
        load_ps(&vd),
        load_ps(&vb),
        SHUFFLES[(rot & 3) as usize],
        mask & 0xF
    );
    store_ps(ctx, &vd, &expr);
    true
}

// Shifts and rotates

pub(crate) fn build_vsl(ctx: &mut BuildContext) -> bool {
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    let expr = format!("simde_mm_vsl({}, {})", load_si(&va), load_si(&vb));
    store_si(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vsr(ctx: &mut BuildContext) -> bool {
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    let expr = format!("simde_mm_vsr({}, {})", load_si(&va), load_si(&vb));
    store_si(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vslb(ctx: &mut BuildContext) -> bool {
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    cgl!(ctx, "\tfor (size_t i = 0; i < 16; i++)");
    cgl!(ctx, "\t\t{vd}.u8[i] = {va}.u8[i] << ({vb}.u8[i] & 0x7);");
    true
}

pub(crate) fn build_vslh(ctx: &mut BuildContext) -> bool {
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    cgl!(ctx, "\tfor (size_t i = 0; i < 8; i++)");
    cgl!(ctx, "\t\t{vd}.u16[i] = {va}.u16[i] << ({vb}.u16[i] & 0xF);");
    true
}

pub(crate) fn build_vsrh(ctx: &mut BuildContext) -> bool {
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    cgl!(ctx, "\tfor (size_t i = 0; i < 8; i++)");
    cgl!(ctx, "\t\t{vd}.u16[i] = {va}.u16[i] >> ({vb}.u16[i] & 0xF);");
    true
}

pub(crate) fn build_vsrab(ctx: &mut BuildContext) -> bool {
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    cgl!(ctx, "\tfor (size_t i = 0; i < 16; i++)");
    cgl!(ctx, "\t\t{vd}.s8[i] = {va}.s8[i] >> ({vb}.u8[i] & 0x7);");
    true
}

pub(crate) fn build_vsrah(ctx: &mut BuildContext) -> bool {
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    cgl!(ctx, "\tfor (size_t i = 0; i < 8; i++)");
    cgl!(ctx, "\t\t{vd}.s16[i] = {va}.s16[i] >> ({vb}.u16[i] & 0xF);");
    true
}

pub(crate) fn build_vsraw(ctx: &mut BuildContext) -> bool {
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    let expr = format!(
        "simde_mm_srav_epi32({}, simde_mm_and_si128({}, simde_mm_set1_epi32(31)))",
        load_si(&va),
        load_si(&vb)
    );
    store_si(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vslw(ctx: &mut BuildContext) -> bool {
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    let expr = format!(
        "simde_mm_sllv_epi32({}, simde_mm_and_si128({}, simde_mm_set1_epi32(31)))",
        load_si(&va),
        load_si(&vb)
    );
    store_si(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vsrw(ctx: &mut BuildContext) -> bool {
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    let expr = format!(
        "simde_mm_srlv_epi32({}, simde_mm_and_si128({}, simde_mm_set1_epi32(31)))",
        load_si(&va),
        load_si(&vb)
    );
    store_si(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vsldoi(ctx: &mut BuildContext) -> bool {
    // Concatenated byte shift; alignr counts from the other end of the
    // reversed register pair.
    let sh = ctx.op(3);
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    let expr = format!(
        "simde_mm_alignr_epi8({}, {}, {})",
        load_si(&va),
        load_si(&vb),
        16 - sh
    );
    store_si(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vslo(ctx: &mut BuildContext) -> bool {
    // Octet shift: guest-left moves toward lower host lanes.
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    let temp = ctx.temp();
    let v_temp = ctx.v_temp();
    cgl!(ctx, "\t{temp}.u32 = ({vb}.u8[0] >> 3) & 0xF;");
    cgl!(ctx, "\tfor (size_t i = 0; i < 16; i++)");
    cgl!(
        ctx,
        "\t\t{v_temp}.u8[i] = i >= {temp}.u32 ? {va}.u8[i - {temp}.u32] : 0;"
    );
    let expr = load_si(&v_temp);
    store_si(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vsro(ctx: &mut BuildContext) -> bool {
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    let temp = ctx.temp();
    let v_temp = ctx.v_temp();
    cgl!(ctx, "\t{temp}.u32 = ({vb}.u8[0] >> 3) & 0xF;");
    cgl!(ctx, "\tfor (size_t i = 0; i < 16; i++)");
    cgl!(
        ctx,
        "\t\t{v_temp}.u8[i] = i + {temp}.u32 < 16 ? {va}.u8[i + {temp}.u32] : 0;"
    );
    let expr = load_si(&v_temp);
    store_si(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vrlh(ctx: &mut BuildContext) -> bool {
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    cgl!(ctx, "\tfor (size_t i = 0; i < 8; i++)");
    cgl!(
        ctx,
        "\t\t{vd}.u16[i] = __builtin_rotateleft16({va}.u16[i], {vb}.u16[i] & 0xF);"
    );
    true
}

// Splats

pub(crate) fn build_vspltb(ctx: &mut BuildContext) -> bool {
    let lane = 15 - ctx.op(2);
    let vd = ctx.v(ctx.op(0));
    let vb = ctx.v(ctx.op(1));
    let expr = format!(
        "simde_mm_shuffle_epi8({}, simde_mm_set1_epi8({lane}))",
        load_si(&vb)
    );
    store_si(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vsplth(ctx: &mut BuildContext) -> bool {
    let lane = 7 - ctx.op(2);
    let vd = ctx.v(ctx.op(0));
    let vb = ctx.v(ctx.op(1));
    let expr = format!("simde_mm_set1_epi16({vb}.u16[{lane}])");
    store_si(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vspltw(ctx: &mut BuildContext) -> bool {
    let lane = 3 - ctx.op(2);
    let vd = ctx.v(ctx.op(0));
    let vb = ctx.v(ctx.op(1));
    let expr = format!("simde_mm_set1_epi32({vb}.u32[{lane}])");
    store_si(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vspltisb(ctx: &mut BuildContext) -> bool {
    let vd = ctx.v(ctx.op(0));
    let expr = format!("simde_mm_set1_epi8({})", ctx.simm(1));
    store_si(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vspltish(ctx: &mut BuildContext) -> bool {
    let vd = ctx.v(ctx.op(0));
    let expr = format!("simde_mm_set1_epi16({})", ctx.simm(1));
    store_si(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vspltisw(ctx: &mut BuildContext) -> bool {
    let vd = ctx.v(ctx.op(0));
    let expr = format!("simde_mm_set1_epi32({})", ctx.simm(1));
    store_si(ctx, &vd, &expr);
    true
}

// Packs: result low half comes from vB because of the stored reversal.

pub(crate) fn build_vpkuhum(ctx: &mut BuildContext) -> bool {
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    let v_temp = ctx.v_temp();
    cgl!(ctx, "\tfor (size_t i = 0; i < 8; i++) {{");
    cgl!(ctx, "\t\t{v_temp}.u8[i] = uint8_t({vb}.u16[i]);");
    cgl!(ctx, "\t\t{v_temp}.u8[i + 8] = uint8_t({va}.u16[i]);");
    cgl!(ctx, "\t}}");
    let expr = load_si(&v_temp);
    store_si(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vpkuhus(ctx: &mut BuildContext) -> bool {
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    let expr = format!(
        "simde_mm_packus_epi16(simde_mm_min_epu16({}, simde_mm_set1_epi16(0xFF)), simde_mm_min_epu16({}, simde_mm_set1_epi16(0xFF)))",
        load_si(&vb),
        load_si(&va)
    );
    store_si(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vpkuwum(ctx: &mut BuildContext) -> bool {
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    let v_temp = ctx.v_temp();
    cgl!(ctx, "\tfor (size_t i = 0; i < 4; i++) {{");
    cgl!(ctx, "\t\t{v_temp}.u16[i] = uint16_t({vb}.u32[i]);");
    cgl!(ctx, "\t\t{v_temp}.u16[i + 4] = uint16_t({va}.u32[i]);");
    cgl!(ctx, "\t}}");
    let expr = load_si(&v_temp);
    store_si(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vpkuwus(ctx: &mut BuildContext) -> bool {
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    let expr = format!(
        "simde_mm_packus_epi32(simde_mm_min_epu32({}, simde_mm_set1_epi32(0xFFFF)), simde_mm_min_epu32({}, simde_mm_set1_epi32(0xFFFF)))",
        load_si(&vb),
        load_si(&va)
    );
    store_si(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vpkshss(ctx: &mut BuildContext) -> bool {
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    let expr = format!("simde_mm_packs_epi16({}, {})", load_si(&vb), load_si(&va));
    store_si(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vpkshus(ctx: &mut BuildContext) -> bool {
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    let expr = format!("simde_mm_packus_epi16({}, {})", load_si(&vb), load_si(&va));
    store_si(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vpkswss(ctx: &mut BuildContext) -> bool {
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    let expr = format!("simde_mm_packs_epi32({}, {})", load_si(&vb), load_si(&va));
    store_si(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vpkswus(ctx: &mut BuildContext) -> bool {
    let vd = ctx.v(ctx.op(0));
    let va = ctx.v(ctx.op(1));
    let vb = ctx.v(ctx.op(2));
    let expr = format!("simde_mm_packus_epi32({}, {})", load_si(&vb), load_si(&va));
    store_si(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vpkd3d128(ctx: &mut BuildContext) -> bool {
    // Only the D3DCOLOR pack shape is implemented; other pack types trap at
    // runtime like any unimplemented mnemonic.
    let pack_type = ctx.op(2);
    if pack_type == 0 {
        let vd = ctx.v(ctx.op(0));
        let vb = ctx.v(ctx.op(1));
        let expr = format!("simde_mm_pack_d3dcolor({})", load_ps(&vb));
        store_si(ctx, &vd, &expr);
    } else {
        cgl!(ctx, "\t// UNIMPLEMENTED: vpkd3d128 pack type {pack_type}");
        cgl!(
            ctx,
            "\tPPC_UNIMPLEMENTED(0x{:X}, \"vpkd3d128\");",
            ctx.base
        );
    }
    true
}

// Unpacks

pub(crate) fn build_vupkd3d128(ctx: &mut BuildContext) -> bool {
    let unpack_type = ctx.op(2) >> 6 & 3;
    if unpack_type == 0 {
        let vd = ctx.v(ctx.op(0));
        let vb = ctx.v(ctx.op(1));
        let expr = format!("simde_mm_unpack_d3dcolor({})", load_si(&vb));
        store_ps(ctx, &vd, &expr);
    } else {
        cgl!(ctx, "\t// UNIMPLEMENTED: vupkd3d128 unpack type {unpack_type}");
        cgl!(
            ctx,
            "\tPPC_UNIMPLEMENTED(0x{:X}, \"vupkd3d128\");",
            ctx.base
        );
    }
    true
}

pub(crate) fn build_vupkhsb(ctx: &mut BuildContext) -> bool {
    // High guest bytes live in host lanes 8..15.
    let vd = ctx.v(ctx.op(0));
    let vb = ctx.v(ctx.op(1));
    let expr = format!(
        "simde_mm_cvtepi8_epi16(simde_mm_loadl_epi64((simde__m128i*)({vb}.s8 + 8)))"
    );
    store_si(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vupklsb(ctx: &mut BuildContext) -> bool {
    let vd = ctx.v(ctx.op(0));
    let vb = ctx.v(ctx.op(1));
    let expr =
        format!("simde_mm_cvtepi8_epi16(simde_mm_loadl_epi64((simde__m128i*){vb}.s8))");
    store_si(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vupkhsh(ctx: &mut BuildContext) -> bool {
    let vd = ctx.v(ctx.op(0));
    let vb = ctx.v(ctx.op(1));
    let expr = format!(
        "simde_mm_cvtepi16_epi32(simde_mm_loadl_epi64((simde__m128i*)({vb}.s16 + 4)))"
    );
    store_si(ctx, &vd, &expr);
    true
}

pub(crate) fn build_vupklsh(ctx: &mut BuildContext) -> bool {
    let vd = ctx.v(ctx.op(0));
    let vb = ctx.v(ctx.op(1));
    let expr =
        format!("simde_mm_cvtepi16_epi32(simde_mm_loadl_epi64((simde__m128i*){vb}.s16))");
    store_si(ctx, &vd, &expr);
    true
}
