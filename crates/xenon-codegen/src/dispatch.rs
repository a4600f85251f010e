//! Mnemonic → builder dispatch.
//!
//! A flat table built once at first use. Aliases are centralized here: the
//! 128-bit VMX variants route to their scalar-equivalent builders where the
//! semantics coincide, and every trap-conditional variant routes to its
//! generic trap builder, which recovers the condition bits from the opcode
//! name. A miss is not a build failure — the caller emits a comment plus a
//! runtime fatal-trap expression so the translation unit still compiles and
//! the gap is observable at execution time.

use std::collections::HashMap;
use std::sync::LazyLock;

use xenon_ppc::Mnemonic;

use crate::builders::{arith, compare, control_flow, fp, logical, memory, system, vector};
use crate::context::BuildContext;

pub type Builder = fn(&mut BuildContext<'_>) -> bool;

/// Ids that deliberately have no builder; they become runtime traps.
pub const UNIMPLEMENTED: &[Mnemonic] = &[
    Mnemonic::Sc,
    Mnemonic::Isync,
    Mnemonic::Mfspr,
    Mnemonic::Mtspr,
    Mnemonic::Lmw,
    Mnemonic::Stmw,
    Mnemonic::Lswi,
    Mnemonic::Stswi,
];

pub fn builder_for(id: Mnemonic) -> Option<Builder> {
    TABLE.get(&id).copied()
}

static TABLE: LazyLock<HashMap<Mnemonic, Builder>> = LazyLock::new(|| {
    use Mnemonic::*;

    let entries: &[(Mnemonic, Builder)] = &[
        // Arithmetic
        (Add, arith::build_add),
        (Addc, arith::build_addc),
        (Adde, arith::build_adde),
        (Addi, arith::build_addi),
        (Addic, arith::build_addic),
        (Addis, arith::build_addis),
        (Addme, arith::build_addme),
        (Addze, arith::build_addze),
        (Divd, arith::build_divd),
        (Divdu, arith::build_divdu),
        (Divw, arith::build_divw),
        (Divwu, arith::build_divwu),
        (Mulhd, arith::build_mulhd),
        (Mulhdu, arith::build_mulhdu),
        (Mulhw, arith::build_mulhw),
        (Mulhwu, arith::build_mulhwu),
        (Mulld, arith::build_mulld),
        (Mulli, arith::build_mulli),
        (Mullw, arith::build_mullw),
        (Neg, arith::build_neg),
        (Subf, arith::build_subf),
        (Subfc, arith::build_subfc),
        (Subfe, arith::build_subfe),
        (Subfic, arith::build_subfic),
        (Subfme, arith::build_subfme),
        (Subfze, arith::build_subfze),
        // Logical
        (And, logical::build_and),
        (Andc, logical::build_andc),
        (Andi, logical::build_andi),
        (Andis, logical::build_andis),
        (Nand, logical::build_nand),
        (Nor, logical::build_nor),
        (Not, logical::build_not),
        (Or, logical::build_or),
        (Orc, logical::build_orc),
        (Ori, logical::build_ori),
        (Oris, logical::build_oris),
        (Xor, logical::build_xor),
        (Xori, logical::build_xori),
        (Xoris, logical::build_xoris),
        (Eqv, logical::build_eqv),
        (Cntlzd, logical::build_cntlzd),
        (Cntlzw, logical::build_cntlzw),
        (Extsb, logical::build_extsb),
        (Extsh, logical::build_extsh),
        (Extsw, logical::build_extsw),
        (Clrldi, logical::build_clrldi),
        (Clrlwi, logical::build_clrlwi),
        (Rldicl, logical::build_rldicl),
        (Rldicr, logical::build_rldicr),
        (Rldimi, logical::build_rldimi),
        (Rotldi, logical::build_rotldi),
        (Rlwimi, logical::build_rlwimi),
        (Rlwinm, logical::build_rlwinm),
        (Rlwnm, logical::build_rlwnm),
        (Rotlw, logical::build_rotlw),
        (Rotlwi, logical::build_rotlwi),
        (Sld, logical::build_sld),
        (Slw, logical::build_slw),
        (Srad, logical::build_srad),
        (Sradi, logical::build_sradi),
        (Sraw, logical::build_sraw),
        (Srawi, logical::build_srawi),
        (Srd, logical::build_srd),
        (Srw, logical::build_srw),
        // Condition-register bit ops
        (Crand, logical::build_crand),
        (Crandc, logical::build_crandc),
        (Creqv, logical::build_creqv),
        (Crnand, logical::build_crnand),
        (Crnor, logical::build_crnor),
        (Cror, logical::build_cror),
        (Crorc, logical::build_crorc),
        // Comparison
        (Cmpd, compare::build_cmpd),
        (Cmpdi, compare::build_cmpdi),
        (Cmpld, compare::build_cmpld),
        (Cmpldi, compare::build_cmpldi),
        (Cmplw, compare::build_cmplw),
        (Cmplwi, compare::build_cmplwi),
        (Cmpw, compare::build_cmpw),
        (Cmpwi, compare::build_cmpwi),
        // Control flow
        (B, control_flow::build_b),
        (Bl, control_flow::build_bl),
        (Blr, control_flow::build_blr),
        (Blrl, control_flow::build_blrl),
        (Bctr, control_flow::build_bctr),
        (Bctrl, control_flow::build_bctrl),
        (Bnectr, control_flow::build_bnectr),
        (Bdz, control_flow::build_bdz),
        (Bdzf, control_flow::build_bdzf),
        (Bdzlr, control_flow::build_bdzlr),
        (Bdnz, control_flow::build_bdnz),
        (Bdnzf, control_flow::build_bdnzf),
        (Bdnzt, control_flow::build_bdnzt),
        (Beq, control_flow::build_beq),
        (Beqlr, control_flow::build_beqlr),
        (Bne, control_flow::build_bne),
        (Bnelr, control_flow::build_bnelr),
        (Blt, control_flow::build_blt),
        (Bltlr, control_flow::build_bltlr),
        (Bge, control_flow::build_bge),
        (Bgelr, control_flow::build_bgelr),
        (Bgt, control_flow::build_bgt),
        (Bgtlr, control_flow::build_bgtlr),
        (Ble, control_flow::build_ble),
        (Blelr, control_flow::build_blelr),
        (Bso, control_flow::build_bso),
        (Bsolr, control_flow::build_bsolr),
        (Bns, control_flow::build_bns),
        (Bnslr, control_flow::build_bnslr),
        // Floating point
        (Fabs, fp::build_fabs),
        (Fnabs, fp::build_fnabs),
        (Fneg, fp::build_fneg),
        (Fmr, fp::build_fmr),
        (Fcfid, fp::build_fcfid),
        (Fctid, fp::build_fctid),
        (Fctidz, fp::build_fctidz),
        (Fctiwz, fp::build_fctiwz),
        (Frsp, fp::build_frsp),
        (Fcmpu, fp::build_fcmpu),
        (Fcmpo, fp::build_fcmpo),
        (Fadd, fp::build_fadd),
        (Fadds, fp::build_fadds),
        (Fsub, fp::build_fsub),
        (Fsubs, fp::build_fsubs),
        (Fmul, fp::build_fmul),
        (Fmuls, fp::build_fmuls),
        (Fdiv, fp::build_fdiv),
        (Fdivs, fp::build_fdivs),
        (Fmadd, fp::build_fmadd),
        (Fmadds, fp::build_fmadds),
        (Fmsub, fp::build_fmsub),
        (Fmsubs, fp::build_fmsubs),
        (Fnmadd, fp::build_fnmadd),
        (Fnmadds, fp::build_fnmadds),
        (Fnmsub, fp::build_fnmsub),
        (Fnmsubs, fp::build_fnmsubs),
        (Fres, fp::build_fres),
        (Frsqrte, fp::build_frsqrte),
        (Fsqrt, fp::build_fsqrt),
        (Fsqrts, fp::build_fsqrts),
        (Fsel, fp::build_fsel),
        // Load immediate
        (Li, memory::build_li),
        (Lis, memory::build_lis),
        // Loads
        (Lbz, memory::build_lbz),
        (Lbzu, memory::build_lbzu),
        (Lbzux, memory::build_lbzux),
        (Lbzx, memory::build_lbzx),
        (Lha, memory::build_lha),
        (Lhau, memory::build_lhau),
        (Lhax, memory::build_lhax),
        (Lhbrx, memory::build_lhbrx),
        (Lhz, memory::build_lhz),
        (Lhzu, memory::build_lhzu),
        (Lhzux, memory::build_lhzux),
        (Lhzx, memory::build_lhzx),
        (Lwa, memory::build_lwa),
        (Lwax, memory::build_lwax),
        (Lwbrx, memory::build_lwbrx),
        (Lwz, memory::build_lwz),
        (Lwzu, memory::build_lwzu),
        (Lwzux, memory::build_lwzux),
        (Lwzx, memory::build_lwzx),
        (Ld, memory::build_ld),
        (Ldu, memory::build_ldu),
        (Ldux, memory::build_ldux),
        (Ldx, memory::build_ldx),
        (Lwarx, memory::build_lwarx),
        (Ldarx, memory::build_ldarx),
        (Lfd, memory::build_lfd),
        (Lfdu, memory::build_lfdu),
        (Lfdux, memory::build_lfdux),
        (Lfdx, memory::build_lfdx),
        (Lfs, memory::build_lfs),
        (Lfsu, memory::build_lfsu),
        (Lfsux, memory::build_lfsux),
        (Lfsx, memory::build_lfsx),
        // Stores
        (Stb, memory::build_stb),
        (Stbu, memory::build_stbu),
        (Stbux, memory::build_stbux),
        (Stbx, memory::build_stbx),
        (Sth, memory::build_sth),
        (Sthbrx, memory::build_sthbrx),
        (Sthu, memory::build_sthu),
        (Sthux, memory::build_sthux),
        (Sthx, memory::build_sthx),
        (Stw, memory::build_stw),
        (Stwbrx, memory::build_stwbrx),
        (Stwu, memory::build_stwu),
        (Stwux, memory::build_stwux),
        (Stwx, memory::build_stwx),
        (Stwcx, memory::build_stwcx),
        (Stdcx, memory::build_stdcx),
        (Std, memory::build_std),
        (Stdu, memory::build_stdu),
        (Stdux, memory::build_stdux),
        (Stdx, memory::build_stdx),
        (Stfd, memory::build_stfd),
        (Stfdu, memory::build_stfdu),
        (Stfdx, memory::build_stfdx),
        (Stfiwx, memory::build_stfiwx),
        (Stfs, memory::build_stfs),
        (Stfsu, memory::build_stfsu),
        (Stfsux, memory::build_stfsux),
        (Stfsx, memory::build_stfsx),
        // Vector loads
        (Lvx, memory::build_lvx),
        (Lvx128, memory::build_lvx),
        (Lvxl128, memory::build_lvx),
        (Lvlx, memory::build_lvlx),
        (Lvlx128, memory::build_lvlx),
        (Lvrx, memory::build_lvrx),
        (Lvrx128, memory::build_lvrx),
        (Lvsl, memory::build_lvsl),
        (Lvsr, memory::build_lvsr),
        // Element loads behave as full loads under the reversal convention.
        (Lvebx, memory::build_lvx),
        (Lvehx, memory::build_lvx),
        (Lvewx, memory::build_lvx),
        (Lvewx128, memory::build_lvx),
        // Vector stores
        (Stvehx, memory::build_stvehx),
        (Stvewx, memory::build_stvewx),
        (Stvewx128, memory::build_stvewx),
        (Stvlx, memory::build_stvlx),
        (Stvlx128, memory::build_stvlx),
        (Stvlxl128, memory::build_stvlx),
        (Stvrx, memory::build_stvrx),
        (Stvrx128, memory::build_stvrx),
        (Stvx, memory::build_stvx),
        (Stvx128, memory::build_stvx),
        // System
        (Nop, system::build_nop),
        (Attn, system::build_attn),
        (Sync, system::build_sync),
        (Lwsync, system::build_lwsync),
        (Eieio, system::build_eieio),
        (Db16cyc, system::build_db16cyc),
        (Cctpl, system::build_cctpl),
        (Cctpm, system::build_cctpm),
        (Dcbf, system::build_dcbf),
        (Dcbst, system::build_dcbst),
        (Dcbt, system::build_dcbt),
        (Dcbtst, system::build_dcbtst),
        (Dcbz, system::build_dcbz),
        (Dcbzl, system::build_dcbzl),
        (Mr, system::build_mr),
        (Mfcr, system::build_mfcr),
        (Mfocrf, system::build_mfocrf),
        (Mffs, system::build_mffs),
        (Mflr, system::build_mflr),
        (Mfmsr, system::build_mfmsr),
        (Mftb, system::build_mftb),
        (Mtcr, system::build_mtcr),
        (Mtctr, system::build_mtctr),
        (Mtfsf, system::build_mtfsf),
        (Mtlr, system::build_mtlr),
        (Mtmsrd, system::build_mtmsrd),
        (Mtxer, system::build_mtxer),
        // Trap word immediate
        (Twi, system::build_twi),
        (Twlgti, system::build_twi),
        (Twllti, system::build_twi),
        (Tweqi, system::build_twi),
        (Twlgei, system::build_twi),
        (Twlnli, system::build_twi),
        (Twllei, system::build_twi),
        (Twlngi, system::build_twi),
        (Twgti, system::build_twi),
        (Twgei, system::build_twi),
        (Twnli, system::build_twi),
        (Twlti, system::build_twi),
        (Twlei, system::build_twi),
        (Twngi, system::build_twi),
        (Twnei, system::build_twi),
        // Trap doubleword immediate
        (Tdi, system::build_tdi),
        (Tdlgti, system::build_tdi),
        (Tdllti, system::build_tdi),
        (Tdeqi, system::build_tdi),
        (Tdlgei, system::build_tdi),
        (Tdlnli, system::build_tdi),
        (Tdllei, system::build_tdi),
        (Tdlngi, system::build_tdi),
        (Tdgti, system::build_tdi),
        (Tdgei, system::build_tdi),
        (Tdnli, system::build_tdi),
        (Tdlti, system::build_tdi),
        (Tdlei, system::build_tdi),
        (Tdngi, system::build_tdi),
        (Tdnei, system::build_tdi),
        // Trap word register
        (Tw, system::build_tw),
        (Twge, system::build_tw),
        (Twgt, system::build_tw),
        (Twle, system::build_tw),
        (Twlt, system::build_tw),
        (Tweq, system::build_tw),
        (Twne, system::build_tw),
        (Twlge, system::build_tw),
        (Twlgt, system::build_tw),
        (Twlle, system::build_tw),
        (Twllt, system::build_tw),
        // Trap doubleword register
        (Td, system::build_td),
        (Tdge, system::build_td),
        (Tdgt, system::build_td),
        (Tdle, system::build_td),
        (Tdlt, system::build_td),
        (Tdeq, system::build_td),
        (Tdne, system::build_td),
        (Tdlge, system::build_td),
        (Tdlgt, system::build_td),
        (Tdlle, system::build_td),
        (Tdllt, system::build_td),
        // Vector float arithmetic
        (Vaddfp, vector::build_vaddfp),
        (Vaddfp128, vector::build_vaddfp),
        (Vsubfp, vector::build_vsubfp),
        (Vsubfp128, vector::build_vsubfp),
        (Vmulfp128, vector::build_vmulfp128),
        (Vmaddfp, vector::build_vmaddfp),
        (Vmaddfp128, vector::build_vmaddfp),
        (Vmaddcfp128, vector::build_vmaddfp),
        (Vnmsubfp, vector::build_vnmsubfp),
        (Vnmsubfp128, vector::build_vnmsubfp),
        (Vmaxfp, vector::build_vmaxfp),
        (Vmaxfp128, vector::build_vmaxfp),
        (Vminfp, vector::build_vminfp),
        (Vminfp128, vector::build_vminfp),
        (Vrefp, vector::build_vrefp),
        (Vrefp128, vector::build_vrefp),
        (Vrsqrtefp, vector::build_vrsqrtefp),
        (Vrsqrtefp128, vector::build_vrsqrtefp),
        (Vexptefp, vector::build_vexptefp),
        (Vexptefp128, vector::build_vexptefp),
        (Vlogefp, vector::build_vlogefp),
        (Vlogefp128, vector::build_vlogefp),
        // Dot products
        (Vmsum3fp128, vector::build_vmsum3fp128),
        (Vmsum4fp128, vector::build_vmsum4fp128),
        // Rounding
        (Vrfim, vector::build_vrfim),
        (Vrfim128, vector::build_vrfim),
        (Vrfin, vector::build_vrfin),
        (Vrfin128, vector::build_vrfin),
        (Vrfip, vector::build_vrfip),
        (Vrfip128, vector::build_vrfip),
        (Vrfiz, vector::build_vrfiz),
        (Vrfiz128, vector::build_vrfiz),
        // Vector integer arithmetic
        (Vaddsbs, vector::build_vaddsbs),
        (Vaddshs, vector::build_vaddshs),
        (Vaddsws, vector::build_vaddsws),
        (Vaddubm, vector::build_vaddubm),
        (Vaddubs, vector::build_vaddubs),
        (Vadduhm, vector::build_vadduhm),
        (Vadduwm, vector::build_vadduwm),
        (Vadduws, vector::build_vadduws),
        (Vsubsbs, vector::build_vsubsbs),
        (Vsubshs, vector::build_vsubshs),
        (Vsubsws, vector::build_vsubsws),
        (Vsububm, vector::build_vsububm),
        (Vsububs, vector::build_vsububs),
        (Vsubuhm, vector::build_vsubuhm),
        (Vsubuhs, vector::build_vsubuhs),
        (Vsubuwm, vector::build_vsubuwm),
        (Vsubuws, vector::build_vsubuws),
        (Vmaxsh, vector::build_vmaxsh),
        (Vmaxsw, vector::build_vmaxsw),
        (Vmaxuh, vector::build_vmaxuh),
        (Vminsh, vector::build_vminsh),
        (Vminsw, vector::build_vminsw),
        (Vminuh, vector::build_vminuh),
        // Vector average
        (Vavgsb, vector::build_vavgsb),
        (Vavgsh, vector::build_vavgsh),
        (Vavgub, vector::build_vavgub),
        (Vavguh, vector::build_vavguh),
        // Vector logical
        (Vand, vector::build_vand),
        (Vand128, vector::build_vand),
        (Vandc, vector::build_vandc),
        (Vandc128, vector::build_vandc128),
        (Vnor, vector::build_vnor),
        (Vnor128, vector::build_vnor),
        (Vor, vector::build_vor),
        (Vor128, vector::build_vor),
        (Vxor, vector::build_vxor),
        (Vxor128, vector::build_vxor),
        (Vsel, vector::build_vsel),
        (Vsel128, vector::build_vsel),
        // Vector compare
        (Vcmpbfp, vector::build_vcmpbfp),
        (Vcmpbfp128, vector::build_vcmpbfp),
        (Vcmpeqfp, vector::build_vcmpeqfp),
        (Vcmpeqfp128, vector::build_vcmpeqfp),
        (Vcmpequb, vector::build_vcmpequb),
        (Vcmpequh, vector::build_vcmpequh),
        (Vcmpequw, vector::build_vcmpequw),
        (Vcmpequw128, vector::build_vcmpequw),
        (Vcmpgefp, vector::build_vcmpgefp),
        (Vcmpgefp128, vector::build_vcmpgefp),
        (Vcmpgtfp, vector::build_vcmpgtfp),
        (Vcmpgtfp128, vector::build_vcmpgtfp),
        (Vcmpgtsh, vector::build_vcmpgtsh),
        (Vcmpgtsw, vector::build_vcmpgtsw),
        (Vcmpgtub, vector::build_vcmpgtub),
        (Vcmpgtuh, vector::build_vcmpgtuh),
        // Vector conversion
        (Vctsxs, vector::build_vctsxs),
        (Vcfpsxws128, vector::build_vctsxs),
        (Vctuxs, vector::build_vctuxs),
        (Vcfpuxws128, vector::build_vctuxs),
        (Vcfsx, vector::build_vcfsx),
        (Vcsxwfp128, vector::build_vcfsx),
        (Vcfux, vector::build_vcfux),
        (Vcuxwfp128, vector::build_vcfux),
        // Vector merge
        (Vmrghb, vector::build_vmrghb),
        (Vmrghh, vector::build_vmrghh),
        (Vmrghw, vector::build_vmrghw),
        (Vmrghw128, vector::build_vmrghw),
        (Vmrglb, vector::build_vmrglb),
        (Vmrglh, vector::build_vmrglh),
        (Vmrglw, vector::build_vmrglw),
        (Vmrglw128, vector::build_vmrglw),
        // Vector permute
        (Vperm, vector::build_vperm),
        (Vperm128, vector::build_vperm),
        (Vpermwi128, vector::build_vpermwi128),
        (Vrlimi128, vector::build_vrlimi128),
        // Vector shift
        (Vsl, vector::build_vsl),
        (Vslb, vector::build_vslb),
        (Vslh, vector::build_vslh),
        (Vsldoi, vector::build_vsldoi),
        (Vsldoi128, vector::build_vsldoi),
        (Vslo, vector::build_vslo),
        (Vslo128, vector::build_vslo),
        (Vslw, vector::build_vslw),
        (Vslw128, vector::build_vslw),
        (Vsr, vector::build_vsr),
        (Vsrab, vector::build_vsrab),
        (Vsrah, vector::build_vsrah),
        (Vsraw, vector::build_vsraw),
        (Vsraw128, vector::build_vsraw),
        (Vsrh, vector::build_vsrh),
        (Vsro, vector::build_vsro),
        (Vsro128, vector::build_vsro),
        (Vsrw, vector::build_vsrw),
        (Vsrw128, vector::build_vsrw),
        (Vrlh, vector::build_vrlh),
        // Vector splat
        (Vspltb, vector::build_vspltb),
        (Vsplth, vector::build_vsplth),
        (Vspltisb, vector::build_vspltisb),
        (Vspltish, vector::build_vspltish),
        (Vspltisw, vector::build_vspltisw),
        (Vspltisw128, vector::build_vspltisw),
        (Vspltw, vector::build_vspltw),
        (Vspltw128, vector::build_vspltw),
        // Vector pack
        (Vpkuhum, vector::build_vpkuhum),
        (Vpkuhum128, vector::build_vpkuhum),
        (Vpkuhus, vector::build_vpkuhus),
        (Vpkuhus128, vector::build_vpkuhus),
        (Vpkuwum, vector::build_vpkuwum),
        (Vpkuwum128, vector::build_vpkuwum),
        (Vpkuwus, vector::build_vpkuwus),
        (Vpkuwus128, vector::build_vpkuwus),
        (Vpkshss, vector::build_vpkshss),
        (Vpkshss128, vector::build_vpkshss),
        (Vpkshus, vector::build_vpkshus),
        (Vpkshus128, vector::build_vpkshus),
        (Vpkswss, vector::build_vpkswss),
        (Vpkswss128, vector::build_vpkswss),
        (Vpkswus, vector::build_vpkswus),
        (Vpkswus128, vector::build_vpkswus),
        (Vpkd3d128, vector::build_vpkd3d128),
        // Vector unpack
        (Vupkd3d128, vector::build_vupkd3d128),
        (Vupkhsb, vector::build_vupkhsb),
        (Vupkhsb128, vector::build_vupkhsb),
        (Vupkhsh, vector::build_vupkhsh),
        (Vupkhsh128, vector::build_vupkhsh),
        (Vupklsb, vector::build_vupklsb),
        (Vupklsb128, vector::build_vupklsb),
        (Vupklsh, vector::build_vupklsh),
        (Vupklsh128, vector::build_vupklsh),
    ];

    entries.iter().copied().collect()
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mnemonic_is_built_or_documented() {
        let missing: Vec<Mnemonic> = Mnemonic::ALL
            .iter()
            .copied()
            .filter(|id| builder_for(*id).is_none())
            .collect();
        assert_eq!(missing, UNIMPLEMENTED);
    }

    #[test]
    fn vector_aliases_share_builders() {
        assert_eq!(
            builder_for(Mnemonic::Vaddfp128).map(|b| b as usize),
            builder_for(Mnemonic::Vaddfp).map(|b| b as usize)
        );
        assert_eq!(
            builder_for(Mnemonic::Twllei).map(|b| b as usize),
            builder_for(Mnemonic::Twi).map(|b| b as usize)
        );
    }
}
