//! The closed mnemonic id space.
//!
//! Every id the external disassembler can produce appears here, including the
//! 128-bit VMX variants and the expanded trap-conditional families. A handful
//! of ids (string/multiple loads, `sc`, SPR moves) deliberately have no
//! builder; the dispatch table turns those into runtime traps.

macro_rules! mnemonics {
    ($($name:ident,)*) => {
        /// Instruction id as reported by the disassembler.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Mnemonic {
            $($name,)*
        }

        impl Mnemonic {
            /// Every id the decoder enumeration contains, for coverage checks.
            pub const ALL: &'static [Mnemonic] = &[$(Mnemonic::$name,)*];
        }
    };
}

mnemonics! {
    // Integer arithmetic
    Add, Addc, Adde, Addi, Addic, Addis, Addme, Addze,
    Divd, Divdu, Divw, Divwu,
    Mulhd, Mulhdu, Mulhw, Mulhwu, Mulld, Mulli, Mullw,
    Neg,
    Subf, Subfc, Subfe, Subfic, Subfme, Subfze,

    // Logical / rotate / shift
    And, Andc, Andi, Andis,
    Nand, Nor, Not, Or, Orc, Ori, Oris,
    Xor, Xori, Xoris, Eqv,
    Cntlzd, Cntlzw,
    Extsb, Extsh, Extsw,
    Clrldi, Clrlwi,
    Rldicl, Rldicr, Rldimi, Rotldi,
    Rlwimi, Rlwinm, Rlwnm, Rotlw, Rotlwi,
    Sld, Slw, Srad, Sradi, Sraw, Srawi, Srd, Srw,

    // Condition-register bit ops
    Crand, Crandc, Creqv, Crnand, Crnor, Cror, Crorc,

    // Comparison
    Cmpd, Cmpdi, Cmpld, Cmpldi, Cmplw, Cmplwi, Cmpw, Cmpwi,

    // Control flow
    B, Bl, Blr, Blrl,
    Bctr, Bctrl, Bnectr,
    Bdz, Bdzf, Bdzlr, Bdnz, Bdnzf, Bdnzt,
    Beq, Beqlr, Bne, Bnelr,
    Blt, Bltlr, Bge, Bgelr,
    Bgt, Bgtlr, Ble, Blelr,
    Bso, Bsolr, Bns, Bnslr,

    // Floating point
    Fabs, Fnabs, Fneg, Fmr,
    Fcfid, Fctid, Fctidz, Fctiwz, Frsp,
    Fcmpu, Fcmpo,
    Fadd, Fadds, Fsub, Fsubs, Fmul, Fmuls, Fdiv, Fdivs,
    Fmadd, Fmadds, Fmsub, Fmsubs, Fnmadd, Fnmadds, Fnmsub, Fnmsubs,
    Fres, Frsqrte, Fsqrt, Fsqrts, Fsel,

    // Load immediate
    Li, Lis,

    // Loads
    Lbz, Lbzu, Lbzux, Lbzx,
    Lha, Lhau, Lhax, Lhbrx, Lhz, Lhzu, Lhzux, Lhzx,
    Lwa, Lwax, Lwbrx, Lwz, Lwzu, Lwzux, Lwzx,
    Ld, Ldu, Ldux, Ldx,
    Lwarx, Ldarx,
    Lfd, Lfdu, Lfdux, Lfdx, Lfs, Lfsu, Lfsux, Lfsx,

    // Stores
    Stb, Stbu, Stbux, Stbx,
    Sth, Sthbrx, Sthu, Sthux, Sthx,
    Stw, Stwbrx, Stwu, Stwux, Stwx,
    Stwcx, Stdcx,
    Std, Stdu, Stdux, Stdx,
    Stfd, Stfdu, Stfdx, Stfiwx, Stfs, Stfsu, Stfsux, Stfsx,

    // Vector loads / stores
    Lvebx, Lvehx, Lvewx, Lvewx128,
    Lvlx, Lvlx128, Lvrx, Lvrx128,
    Lvsl, Lvsr,
    Lvx, Lvx128, Lvxl128,
    Stvehx, Stvewx, Stvewx128,
    Stvlx, Stvlx128, Stvlxl128, Stvrx, Stvrx128,
    Stvx, Stvx128,

    // System / barriers / cache
    Nop, Attn, Sync, Lwsync, Eieio, Db16cyc, Cctpl, Cctpm,
    Dcbf, Dcbst, Dcbt, Dcbtst, Dcbz, Dcbzl,
    Mr,
    Mfcr, Mffs, Mflr, Mfmsr, Mfocrf, Mftb,
    Mtcr, Mtctr, Mtfsf, Mtlr, Mtmsrd, Mtxer,

    // Trap word immediate
    Twi,
    Twlgti, Twllti, Tweqi, Twlgei, Twlnli, Twllei, Twlngi,
    Twgti, Twgei, Twnli, Twlti, Twlei, Twngi, Twnei,
    // Trap doubleword immediate
    Tdi,
    Tdlgti, Tdllti, Tdeqi, Tdlgei, Tdlnli, Tdllei, Tdlngi,
    Tdgti, Tdgei, Tdnli, Tdlti, Tdlei, Tdngi, Tdnei,
    // Trap word register
    Tw,
    Twge, Twgt, Twle, Twlt, Tweq, Twne, Twlge, Twlgt, Twlle, Twllt,
    // Trap doubleword register
    Td,
    Tdge, Tdgt, Tdle, Tdlt, Tdeq, Tdne, Tdlge, Tdlgt, Tdlle, Tdllt,

    // Vector floating point
    Vaddfp, Vaddfp128, Vsubfp, Vsubfp128, Vmulfp128,
    Vmaddfp, Vmaddfp128, Vmaddcfp128, Vnmsubfp, Vnmsubfp128,
    Vmaxfp, Vmaxfp128, Vminfp, Vminfp128,
    Vrefp, Vrefp128, Vrsqrtefp, Vrsqrtefp128,
    Vexptefp, Vexptefp128, Vlogefp, Vlogefp128,
    Vmsum3fp128, Vmsum4fp128,
    Vrfim, Vrfim128, Vrfin, Vrfin128, Vrfip, Vrfip128, Vrfiz, Vrfiz128,

    // Vector integer
    Vaddsbs, Vaddshs, Vaddsws, Vaddubm, Vaddubs, Vadduhm, Vadduwm, Vadduws,
    Vsubsbs, Vsubshs, Vsubsws, Vsububm, Vsububs, Vsubuhm, Vsubuhs, Vsubuwm, Vsubuws,
    Vmaxsh, Vmaxsw, Vmaxuh, Vminsh, Vminsw, Vminuh,
    Vavgsb, Vavgsh, Vavgub, Vavguh,

    // Vector logical / select
    Vand, Vand128, Vandc, Vandc128, Vnor, Vnor128, Vor, Vor128,
    Vxor, Vxor128, Vsel, Vsel128,

    // Vector compare
    Vcmpbfp, Vcmpbfp128, Vcmpeqfp, Vcmpeqfp128,
    Vcmpequb, Vcmpequh, Vcmpequw, Vcmpequw128,
    Vcmpgefp, Vcmpgefp128, Vcmpgtfp, Vcmpgtfp128,
    Vcmpgtsh, Vcmpgtsw, Vcmpgtub, Vcmpgtuh,

    // Vector conversion
    Vctsxs, Vcfpsxws128, Vctuxs, Vcfpuxws128,
    Vcfsx, Vcsxwfp128, Vcfux, Vcuxwfp128,

    // Vector merge / permute
    Vmrghb, Vmrghh, Vmrghw, Vmrghw128, Vmrglb, Vmrglh, Vmrglw, Vmrglw128,
    Vperm, Vperm128, Vpermwi128, Vrlimi128,

    // Vector shift / rotate
    Vsl, Vslb, Vslh, Vsldoi, Vsldoi128, Vslo, Vslo128, Vslw, Vslw128,
    Vsr, Vsrab, Vsrah, Vsraw, Vsraw128, Vsrh, Vsro, Vsro128, Vsrw, Vsrw128,
    Vrlh,

    // Vector splat
    Vspltb, Vsplth, Vspltisb, Vspltish, Vspltisw, Vspltisw128, Vspltw, Vspltw128,

    // Vector pack / unpack
    Vpkuhum, Vpkuhum128, Vpkuhus, Vpkuhus128,
    Vpkuwum, Vpkuwum128, Vpkuwus, Vpkuwus128,
    Vpkshss, Vpkshss128, Vpkshus, Vpkshus128,
    Vpkswss, Vpkswss128, Vpkswus, Vpkswus128,
    Vpkd3d128,
    Vupkd3d128, Vupkhsb, Vupkhsb128, Vupkhsh, Vupkhsh128,
    Vupklsb, Vupklsb128, Vupklsh, Vupklsh128,

    // Decoded but intentionally without a builder: the dispatch miss case
    // lowers these to runtime traps.
    Sc, Isync, Mfspr, Mtspr, Lmw, Stmw, Lswi, Stswi,
}

#[cfg(test)]
mod tests {
    use super::Mnemonic;

    #[test]
    fn all_is_deduplicated() {
        let mut seen = std::collections::HashSet::new();
        for m in Mnemonic::ALL {
            assert!(seen.insert(*m), "duplicate mnemonic {m:?}");
        }
    }
}
