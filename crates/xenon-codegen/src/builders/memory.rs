//! Load and store builders: D-form, X-form, with-update, byte-reversed,
//! reserved/conditional, floating-point and vector shapes.

use super::{
    emit_load_with_update, emit_load_with_update_indexed, emit_sign_extend_load_d_form,
    emit_sign_extend_load_x_form, emit_store_with_update, emit_store_with_update_indexed,
    emit_vector_ea, emit_vector_temp_ea,
};
use crate::context::{cg, cgl, is_mmio_upper_bits, BuildContext};

pub(crate) fn build_li(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    cgl!(ctx, "\t{rd}.s64 = {};", ctx.simm(1));
    true
}

pub(crate) fn build_lis(ctx: &mut BuildContext) -> bool {
    let imm = ctx.op(1);
    let rd = ctx.r(ctx.op(0));
    cgl!(ctx, "\t{rd}.s64 = {};", (imm << 16) as i32);

    // Tag registers whose upper bits land in a hardware-register range; the
    // store heuristic keys off this.
    if is_mmio_upper_bits(imm) {
        ctx.locals.set_mmio_base(ctx.op(0));
    } else {
        ctx.locals.clear_mmio_base(ctx.op(0));
    }
    true
}

// Byte loads

pub(crate) fn build_lbz(ctx: &mut BuildContext) -> bool {
    ctx.emit_load_d_form("PPC_LOAD_U8", "u64");
    true
}

pub(crate) fn build_lbzu(ctx: &mut BuildContext) -> bool {
    emit_load_with_update(ctx, "PPC_LOAD_U8");
    true
}

pub(crate) fn build_lbzx(ctx: &mut BuildContext) -> bool {
    ctx.emit_load_x_form("PPC_LOAD_U8", "u64");
    true
}

pub(crate) fn build_lbzux(ctx: &mut BuildContext) -> bool {
    emit_load_with_update_indexed(ctx, "PPC_LOAD_U8");
    true
}

// Halfword loads

pub(crate) fn build_lha(ctx: &mut BuildContext) -> bool {
    emit_sign_extend_load_d_form(ctx, "int16_t", "PPC_LOAD_U16");
    true
}

pub(crate) fn build_lhau(ctx: &mut BuildContext) -> bool {
    let ea = ctx.ea();
    let d = ctx.simm(1);
    let ra = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{ea} = {d} + {ra}.u32;");
    let rd = ctx.r(ctx.op(0));
    cgl!(ctx, "\t{rd}.s64 = int16_t(PPC_LOAD_U16({ea}));");
    cgl!(ctx, "\t{ra}.u32 = {ea};");
    true
}

pub(crate) fn build_lhax(ctx: &mut BuildContext) -> bool {
    emit_sign_extend_load_x_form(ctx, "int16_t", "PPC_LOAD_U16");
    true
}

pub(crate) fn build_lhbrx(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    cg!(ctx, "\t{rd}.u64 = __builtin_bswap16(PPC_LOAD_U16(");
    if ctx.op(1) != 0 {
        let ra = ctx.r(ctx.op(1));
        cg!(ctx, "{ra}.u32 + ");
    }
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "{rb}.u32));");
    true
}

pub(crate) fn build_lhz(ctx: &mut BuildContext) -> bool {
    ctx.emit_load_d_form("PPC_LOAD_U16", "u64");
    true
}

pub(crate) fn build_lhzu(ctx: &mut BuildContext) -> bool {
    emit_load_with_update(ctx, "PPC_LOAD_U16");
    true
}

pub(crate) fn build_lhzux(ctx: &mut BuildContext) -> bool {
    emit_load_with_update_indexed(ctx, "PPC_LOAD_U16");
    true
}

pub(crate) fn build_lhzx(ctx: &mut BuildContext) -> bool {
    ctx.emit_load_x_form("PPC_LOAD_U16", "u64");
    true
}

// Word loads

pub(crate) fn build_lwa(ctx: &mut BuildContext) -> bool {
    emit_sign_extend_load_d_form(ctx, "int32_t", "PPC_LOAD_U32");
    true
}

pub(crate) fn build_lwax(ctx: &mut BuildContext) -> bool {
    emit_sign_extend_load_x_form(ctx, "int32_t", "PPC_LOAD_U32");
    true
}

pub(crate) fn build_lwbrx(ctx: &mut BuildContext) -> bool {
    let rd = ctx.r(ctx.op(0));
    cg!(ctx, "\t{rd}.u64 = __builtin_bswap32(PPC_LOAD_U32(");
    if ctx.op(1) != 0 {
        let ra = ctx.r(ctx.op(1));
        cg!(ctx, "{ra}.u32 + ");
    }
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "{rb}.u32));");
    true
}

pub(crate) fn build_lwz(ctx: &mut BuildContext) -> bool {
    ctx.emit_load_d_form("PPC_LOAD_U32", "u64");
    true
}

pub(crate) fn build_lwzu(ctx: &mut BuildContext) -> bool {
    emit_load_with_update(ctx, "PPC_LOAD_U32");
    true
}

pub(crate) fn build_lwzux(ctx: &mut BuildContext) -> bool {
    emit_load_with_update_indexed(ctx, "PPC_LOAD_U32");
    true
}

pub(crate) fn build_lwzx(ctx: &mut BuildContext) -> bool {
    ctx.emit_load_x_form("PPC_LOAD_U32", "u64");
    true
}

// Doubleword loads

pub(crate) fn build_ld(ctx: &mut BuildContext) -> bool {
    ctx.emit_load_d_form("PPC_LOAD_U64", "u64");
    true
}

pub(crate) fn build_ldu(ctx: &mut BuildContext) -> bool {
    emit_load_with_update(ctx, "PPC_LOAD_U64");
    true
}

pub(crate) fn build_ldux(ctx: &mut BuildContext) -> bool {
    emit_load_with_update_indexed(ctx, "PPC_LOAD_U64");
    true
}

pub(crate) fn build_ldx(ctx: &mut BuildContext) -> bool {
    ctx.emit_load_x_form("PPC_LOAD_U64", "u64");
    true
}

// Load and reserve. The reservation snapshot is stored verbatim, no
// byte-swap: it is the raw-memory comparand for the matching
// store-conditional.

pub(crate) fn build_lwarx(ctx: &mut BuildContext) -> bool {
    let ea = ctx.ea();
    cg!(ctx, "\t{ea} = ");
    if ctx.op(1) != 0 {
        let ra = ctx.r(ctx.op(1));
        cg!(ctx, "{ra}.u32 + ");
    }
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "{rb}.u32;");
    let reserved = ctx.reserved();
    cgl!(ctx, "\t{reserved}.u32 = *(uint32_t*)PPC_RAW_ADDR({ea});");
    let rd = ctx.r(ctx.op(0));
    cgl!(ctx, "\t{rd}.u64 = __builtin_bswap32({reserved}.u32);");
    true
}

pub(crate) fn build_ldarx(ctx: &mut BuildContext) -> bool {
    let ea = ctx.ea();
    cg!(ctx, "\t{ea} = ");
    if ctx.op(1) != 0 {
        let ra = ctx.r(ctx.op(1));
        cg!(ctx, "{ra}.u32 + ");
    }
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "{rb}.u32;");
    let reserved = ctx.reserved();
    cgl!(ctx, "\t{reserved}.u64 = *(uint64_t*)PPC_RAW_ADDR({ea});");
    let rd = ctx.r(ctx.op(0));
    cgl!(ctx, "\t{rd}.u64 = __builtin_bswap64({reserved}.u64);");
    true
}

// Floating-point loads. Double loads read 64 bits; single loads widen on
// the way in.

pub(crate) fn build_lfd(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(false);
    let fd = ctx.f(ctx.op(0));
    cg!(ctx, "\t{fd}.u64 = PPC_LOAD_U64(");
    if ctx.op(2) != 0 {
        let ra = ctx.r(ctx.op(2));
        cg!(ctx, "{ra}.u32 + ");
    }
    cgl!(ctx, "{});", ctx.simm(1));
    true
}

pub(crate) fn build_lfdu(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(false);
    let ea = ctx.ea();
    let d = ctx.simm(1);
    let ra = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{ea} = {d} + {ra}.u32;");
    let fd = ctx.f(ctx.op(0));
    cgl!(ctx, "\t{fd}.u64 = PPC_LOAD_U64({ea});");
    cgl!(ctx, "\t{ra}.u32 = {ea};");
    true
}

pub(crate) fn build_lfdux(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(false);
    let ea = ctx.ea();
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{ea} = {ra}.u32 + {rb}.u32;");
    let fd = ctx.f(ctx.op(0));
    cgl!(ctx, "\t{fd}.u64 = PPC_LOAD_U64({ea});");
    cgl!(ctx, "\t{ra}.u32 = {ea};");
    true
}

pub(crate) fn build_lfdx(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(false);
    let fd = ctx.f(ctx.op(0));
    cg!(ctx, "\t{fd}.u64 = PPC_LOAD_U64(");
    if ctx.op(1) != 0 {
        let ra = ctx.r(ctx.op(1));
        cg!(ctx, "{ra}.u32 + ");
    }
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "{rb}.u32);");
    true
}

pub(crate) fn build_lfs(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(false);
    let temp = ctx.temp();
    cg!(ctx, "\t{temp}.u32 = PPC_LOAD_U32(");
    if ctx.op(2) != 0 {
        let ra = ctx.r(ctx.op(2));
        cg!(ctx, "{ra}.u32 + ");
    }
    cgl!(ctx, "{});", ctx.simm(1));
    let fd = ctx.f(ctx.op(0));
    cgl!(ctx, "\t{fd}.f64 = double({temp}.f32);");
    true
}

pub(crate) fn build_lfsu(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(false);
    let ea = ctx.ea();
    let d = ctx.simm(1);
    let ra = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{ea} = {d} + {ra}.u32;");
    let temp = ctx.temp();
    cgl!(ctx, "\t{temp}.u32 = PPC_LOAD_U32({ea});");
    let fd = ctx.f(ctx.op(0));
    cgl!(ctx, "\t{fd}.f64 = double({temp}.f32);");
    cgl!(ctx, "\t{ra}.u32 = {ea};");
    true
}

pub(crate) fn build_lfsux(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(false);
    let ea = ctx.ea();
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{ea} = {ra}.u32 + {rb}.u32;");
    let temp = ctx.temp();
    cgl!(ctx, "\t{temp}.u32 = PPC_LOAD_U32({ea});");
    let fd = ctx.f(ctx.op(0));
    cgl!(ctx, "\t{fd}.f64 = double({temp}.f32);");
    cgl!(ctx, "\t{ra}.u32 = {ea};");
    true
}

pub(crate) fn build_lfsx(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(false);
    let temp = ctx.temp();
    cg!(ctx, "\t{temp}.u32 = PPC_LOAD_U32(");
    if ctx.op(1) != 0 {
        let ra = ctx.r(ctx.op(1));
        cg!(ctx, "{ra}.u32 + ");
    }
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "{rb}.u32);");
    let fd = ctx.f(ctx.op(0));
    cgl!(ctx, "\t{fd}.f64 = double({temp}.f32);");
    true
}

// Byte stores

pub(crate) fn build_stb(ctx: &mut BuildContext) -> bool {
    ctx.emit_store_d_form("PPC_STORE_U8", "u8", true);
    true
}

pub(crate) fn build_stbu(ctx: &mut BuildContext) -> bool {
    emit_store_with_update(ctx, "PPC_STORE_U8", "u8");
    true
}

pub(crate) fn build_stbux(ctx: &mut BuildContext) -> bool {
    emit_store_with_update_indexed(ctx, "PPC_STORE_U8", "u8");
    true
}

pub(crate) fn build_stbx(ctx: &mut BuildContext) -> bool {
    ctx.emit_store_x_form("PPC_STORE_U8", "u8", true);
    true
}

// Halfword stores

pub(crate) fn build_sth(ctx: &mut BuildContext) -> bool {
    ctx.emit_store_d_form("PPC_STORE_U16", "u16", true);
    true
}

pub(crate) fn build_sthbrx(ctx: &mut BuildContext) -> bool {
    let mac = ctx.store_macro("PPC_STORE_U16", ctx.mmio_check_x_form());
    cg!(ctx, "\t{mac}(");
    if ctx.op(1) != 0 {
        let ra = ctx.r(ctx.op(1));
        cg!(ctx, "{ra}.u32 + ");
    }
    let rb = ctx.r(ctx.op(2));
    let rs = ctx.r(ctx.op(0));
    cgl!(ctx, "{rb}.u32, __builtin_bswap16({rs}.u16));");
    true
}

pub(crate) fn build_sthu(ctx: &mut BuildContext) -> bool {
    emit_store_with_update(ctx, "PPC_STORE_U16", "u16");
    true
}

pub(crate) fn build_sthux(ctx: &mut BuildContext) -> bool {
    emit_store_with_update_indexed(ctx, "PPC_STORE_U16", "u16");
    true
}

pub(crate) fn build_sthx(ctx: &mut BuildContext) -> bool {
    ctx.emit_store_x_form("PPC_STORE_U16", "u16", true);
    true
}

// Word stores

pub(crate) fn build_stw(ctx: &mut BuildContext) -> bool {
    ctx.emit_store_d_form("PPC_STORE_U32", "u32", true);
    true
}

pub(crate) fn build_stwbrx(ctx: &mut BuildContext) -> bool {
    let mac = ctx.store_macro("PPC_STORE_U32", ctx.mmio_check_x_form());
    cg!(ctx, "\t{mac}(");
    if ctx.op(1) != 0 {
        let ra = ctx.r(ctx.op(1));
        cg!(ctx, "{ra}.u32 + ");
    }
    let rb = ctx.r(ctx.op(2));
    let rs = ctx.r(ctx.op(0));
    cgl!(ctx, "{rb}.u32, __builtin_bswap32({rs}.u32));");
    true
}

pub(crate) fn build_stwu(ctx: &mut BuildContext) -> bool {
    emit_store_with_update(ctx, "PPC_STORE_U32", "u32");
    true
}

pub(crate) fn build_stwux(ctx: &mut BuildContext) -> bool {
    emit_store_with_update_indexed(ctx, "PPC_STORE_U32", "u32");
    true
}

pub(crate) fn build_stwx(ctx: &mut BuildContext) -> bool {
    ctx.emit_store_x_form("PPC_STORE_U32", "u32", true);
    true
}

// Store conditional: a host compare-and-swap of the byte-swapped candidate
// against the reservation snapshot; cr0.eq reports success.

pub(crate) fn build_stwcx(ctx: &mut BuildContext) -> bool {
    let ea = ctx.ea();
    cg!(ctx, "\t{ea} = ");
    if ctx.op(1) != 0 {
        let ra = ctx.r(ctx.op(1));
        cg!(ctx, "{ra}.u32 + ");
    }
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "{rb}.u32;");
    let cr0 = ctx.cr(0);
    cgl!(ctx, "\t{cr0}.lt = 0;");
    cgl!(ctx, "\t{cr0}.gt = 0;");
    let reserved = ctx.reserved();
    let rs = ctx.r(ctx.op(0));
    cgl!(
        ctx,
        "\t{cr0}.eq = __sync_bool_compare_and_swap(reinterpret_cast<uint32_t*>(PPC_RAW_ADDR({ea})), {reserved}.s32, __builtin_bswap32({rs}.s32));"
    );
    let xer = ctx.xer();
    cgl!(ctx, "\t{cr0}.so = {xer}.so;");
    true
}

pub(crate) fn build_stdcx(ctx: &mut BuildContext) -> bool {
    let ea = ctx.ea();
    cg!(ctx, "\t{ea} = ");
    if ctx.op(1) != 0 {
        let ra = ctx.r(ctx.op(1));
        cg!(ctx, "{ra}.u32 + ");
    }
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "{rb}.u32;");
    let cr0 = ctx.cr(0);
    cgl!(ctx, "\t{cr0}.lt = 0;");
    cgl!(ctx, "\t{cr0}.gt = 0;");
    let reserved = ctx.reserved();
    let rs = ctx.r(ctx.op(0));
    cgl!(
        ctx,
        "\t{cr0}.eq = __sync_bool_compare_and_swap(reinterpret_cast<uint64_t*>(PPC_RAW_ADDR({ea})), {reserved}.s64, __builtin_bswap64({rs}.s64));"
    );
    let xer = ctx.xer();
    cgl!(ctx, "\t{cr0}.so = {xer}.so;");
    true
}

// Doubleword stores

pub(crate) fn build_std(ctx: &mut BuildContext) -> bool {
    ctx.emit_store_d_form("PPC_STORE_U64", "u64", true);
    true
}

pub(crate) fn build_stdu(ctx: &mut BuildContext) -> bool {
    emit_store_with_update(ctx, "PPC_STORE_U64", "u64");
    true
}

pub(crate) fn build_stdux(ctx: &mut BuildContext) -> bool {
    emit_store_with_update_indexed(ctx, "PPC_STORE_U64", "u64");
    true
}

pub(crate) fn build_stdx(ctx: &mut BuildContext) -> bool {
    ctx.emit_store_x_form("PPC_STORE_U64", "u64", true);
    true
}

// Floating-point stores. Single stores narrow through a float first.

pub(crate) fn build_stfd(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(false);
    let mac = ctx.store_macro("PPC_STORE_U64", ctx.mmio_check_d_form());
    cg!(ctx, "\t{mac}(");
    if ctx.op(2) != 0 {
        let ra = ctx.r(ctx.op(2));
        cg!(ctx, "{ra}.u32 + ");
    }
    let d = ctx.simm(1);
    let fs = ctx.f(ctx.op(0));
    cgl!(ctx, "{d}, {fs}.u64);");
    true
}

pub(crate) fn build_stfdu(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(false);
    let ea = ctx.ea();
    let d = ctx.simm(1);
    let ra = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{ea} = {d} + {ra}.u32;");
    let fs = ctx.f(ctx.op(0));
    cgl!(ctx, "\tPPC_STORE_U64({ea}, {fs}.u64);");
    cgl!(ctx, "\t{ra}.u32 = {ea};");
    true
}

pub(crate) fn build_stfdx(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(false);
    let mac = ctx.store_macro("PPC_STORE_U64", ctx.mmio_check_x_form());
    cg!(ctx, "\t{mac}(");
    if ctx.op(1) != 0 {
        let ra = ctx.r(ctx.op(1));
        cg!(ctx, "{ra}.u32 + ");
    }
    let rb = ctx.r(ctx.op(2));
    let fs = ctx.f(ctx.op(0));
    cgl!(ctx, "{rb}.u32, {fs}.u64);");
    true
}

pub(crate) fn build_stfiwx(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(false);
    let mac = ctx.store_macro("PPC_STORE_U32", ctx.mmio_check_x_form());
    cg!(ctx, "\t{mac}(");
    if ctx.op(1) != 0 {
        let ra = ctx.r(ctx.op(1));
        cg!(ctx, "{ra}.u32 + ");
    }
    let rb = ctx.r(ctx.op(2));
    let fs = ctx.f(ctx.op(0));
    cgl!(ctx, "{rb}.u32, {fs}.u32);");
    true
}

pub(crate) fn build_stfs(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(false);
    let temp = ctx.temp();
    let fs = ctx.f(ctx.op(0));
    cgl!(ctx, "\t{temp}.f32 = float({fs}.f64);");
    let mac = ctx.store_macro("PPC_STORE_U32", ctx.mmio_check_d_form());
    cg!(ctx, "\t{mac}(");
    if ctx.op(2) != 0 {
        let ra = ctx.r(ctx.op(2));
        cg!(ctx, "{ra}.u32 + ");
    }
    cgl!(ctx, "{}, {temp}.u32);", ctx.simm(1));
    true
}

pub(crate) fn build_stfsu(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(false);
    let ea = ctx.ea();
    let d = ctx.simm(1);
    let ra = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{ea} = {d} + {ra}.u32;");
    let temp = ctx.temp();
    let fs = ctx.f(ctx.op(0));
    cgl!(ctx, "\t{temp}.f32 = float({fs}.f64);");
    cgl!(ctx, "\tPPC_STORE_U32({ea}, {temp}.u32);");
    cgl!(ctx, "\t{ra}.u32 = {ea};");
    true
}

pub(crate) fn build_stfsux(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(false);
    let ea = ctx.ea();
    let ra = ctx.r(ctx.op(1));
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "\t{ea} = {ra}.u32 + {rb}.u32;");
    let temp = ctx.temp();
    let fs = ctx.f(ctx.op(0));
    cgl!(ctx, "\t{temp}.f32 = float({fs}.f64);");
    cgl!(ctx, "\tPPC_STORE_U32({ea}, {temp}.u32);");
    cgl!(ctx, "\t{ra}.u32 = {ea};");
    true
}

pub(crate) fn build_stfsx(ctx: &mut BuildContext) -> bool {
    ctx.emit_set_flush_mode(false);
    let temp = ctx.temp();
    let fs = ctx.f(ctx.op(0));
    cgl!(ctx, "\t{temp}.f32 = float({fs}.f64);");
    let mac = ctx.store_macro("PPC_STORE_U32", ctx.mmio_check_x_form());
    cg!(ctx, "\t{mac}(");
    if ctx.op(1) != 0 {
        let ra = ctx.r(ctx.op(1));
        cg!(ctx, "{ra}.u32 + ");
    }
    let rb = ctx.r(ctx.op(2));
    cgl!(ctx, "{rb}.u32, {temp}.u32);");
    true
}

// Vector loads. The whole vector is byte-reversed on the way in instead of
// per element; every vector builder downstream assumes that convention.

pub(crate) fn build_lvx(ctx: &mut BuildContext) -> bool {
    emit_vector_ea(ctx, Some("0xF"));
    let ea = ctx.ea();
    let vd = ctx.v(ctx.op(0));
    cgl!(
        ctx,
        "\tsimde_mm_store_si128((simde__m128i*){vd}.u8, simde_mm_shuffle_epi8(simde_mm_load_si128((simde__m128i*)PPC_RAW_ADDR({ea})), simde_mm_load_si128((simde__m128i*)VectorMaskL)));"
    );
    true
}

pub(crate) fn build_lvlx(ctx: &mut BuildContext) -> bool {
    emit_vector_temp_ea(ctx);
    let temp = ctx.temp();
    let vd = ctx.v(ctx.op(0));
    cgl!(
        ctx,
        "\tsimde_mm_store_si128((simde__m128i*){vd}.u8, simde_mm_shuffle_epi8(simde_mm_load_si128((simde__m128i*)PPC_RAW_ADDR({temp}.u32 & ~0xF)), simde_mm_load_si128((simde__m128i*)&VectorMaskL[({temp}.u32 & 0xF) * 16])));"
    );
    true
}

pub(crate) fn build_lvrx(ctx: &mut BuildContext) -> bool {
    emit_vector_temp_ea(ctx);
    let temp = ctx.temp();
    let vd = ctx.v(ctx.op(0));
    cgl!(
        ctx,
        "\tsimde_mm_store_si128((simde__m128i*){vd}.u8, {temp}.u32 & 0xF ? simde_mm_shuffle_epi8(simde_mm_load_si128((simde__m128i*)PPC_RAW_ADDR({temp}.u32 & ~0xF)), simde_mm_load_si128((simde__m128i*)&VectorMaskR[({temp}.u32 & 0xF) * 16])) : simde_mm_setzero_si128());"
    );
    true
}

pub(crate) fn build_lvsl(ctx: &mut BuildContext) -> bool {
    emit_vector_temp_ea(ctx);
    let temp = ctx.temp();
    let vd = ctx.v(ctx.op(0));
    cgl!(
        ctx,
        "\tsimde_mm_store_si128((simde__m128i*){vd}.u8, simde_mm_load_si128((simde__m128i*)&VectorShiftTableL[({temp}.u32 & 0xF) * 16]));"
    );
    true
}

pub(crate) fn build_lvsr(ctx: &mut BuildContext) -> bool {
    emit_vector_temp_ea(ctx);
    let temp = ctx.temp();
    let vd = ctx.v(ctx.op(0));
    cgl!(
        ctx,
        "\tsimde_mm_store_si128((simde__m128i*){vd}.u8, simde_mm_load_si128((simde__m128i*)&VectorShiftTableR[({temp}.u32 & 0xF) * 16]));"
    );
    true
}

// Vector stores. Element stores index from the top because of the stored
// reversal.

pub(crate) fn build_stvehx(ctx: &mut BuildContext) -> bool {
    emit_vector_ea(ctx, Some("0x1"));
    let ea = ctx.ea();
    let vs = ctx.v(ctx.op(0));
    cgl!(ctx, "\tPPC_STORE_U16({ea}, {vs}.u16[7 - (({ea} & 0xF) >> 1)]);");
    true
}

pub(crate) fn build_stvewx(ctx: &mut BuildContext) -> bool {
    emit_vector_ea(ctx, Some("0x3"));
    let ea = ctx.ea();
    let vs = ctx.v(ctx.op(0));
    cgl!(ctx, "\tPPC_STORE_U32({ea}, {vs}.u32[3 - (({ea} & 0xF) >> 2)]);");
    true
}

pub(crate) fn build_stvlx(ctx: &mut BuildContext) -> bool {
    emit_vector_ea(ctx, None);
    let ea = ctx.ea();
    let vs = ctx.v(ctx.op(0));
    cgl!(ctx, "\tfor (size_t i = 0; i < (16 - ({ea} & 0xF)); i++)");
    cgl!(ctx, "\t\tPPC_STORE_U8({ea} + i, {vs}.u8[15 - i]);");
    true
}

pub(crate) fn build_stvrx(ctx: &mut BuildContext) -> bool {
    emit_vector_ea(ctx, None);
    let ea = ctx.ea();
    let vs = ctx.v(ctx.op(0));
    cgl!(ctx, "\tfor (size_t i = 0; i < ({ea} & 0xF); i++)");
    cgl!(ctx, "\t\tPPC_STORE_U8({ea} - i - 1, {vs}.u8[i]);");
    true
}

pub(crate) fn build_stvx(ctx: &mut BuildContext) -> bool {
    emit_vector_ea(ctx, Some("0xF"));
    let ea = ctx.ea();
    let vs = ctx.v(ctx.op(0));
    cgl!(
        ctx,
        "\tsimde_mm_store_si128((simde__m128i*)PPC_RAW_ADDR({ea}), simde_mm_shuffle_epi8(simde_mm_load_si128((simde__m128i*){vs}.u8), simde_mm_load_si128((simde__m128i*)VectorMaskL)));"
    );
    true
}
