//! Function-framer tests: labels, jump tables, SEH wrapping, local
//! promotion and mid-asm hooks.

mod common;

use common::{func_node, graph_with, image_of_words, insn, TableDecoder};
use xenon_codegen::{
    BinaryImage, Block, FunctionAuthority, FunctionNode, JumpTable, MemoryImage, MidAsmHook,
    Recompiler, RecompilerConfig, Section, SehInfo, SehScope,
};
use xenon_ppc::Mnemonic;

const BASE: u32 = 0x8200_0000;

const NOP: u32 = 0x6000_0000;
const BLR: u32 = 0x4E80_0020;
const BCTR: u32 = 0x4E80_0420;
const MTCTR_R12: u32 = 0x7D89_03A6;

/// A flat image plus a canned answer for the late jump-table scan.
struct ScannerImage {
    inner: MemoryImage,
    table: Option<JumpTable>,
}

impl BinaryImage for ScannerImage {
    fn base_address(&self) -> u32 {
        self.inner.base_address()
    }
    fn image_size(&self) -> u32 {
        self.inner.image_size()
    }
    fn sections(&self) -> &[Section] {
        self.inner.sections()
    }
    fn translate(&self, address: u32) -> Option<&[u8]> {
        self.inner.translate(address)
    }
    fn detect_jump_table(&self, bctr_address: u32) -> Option<JumpTable> {
        self.table
            .as_ref()
            .filter(|t| t.bctr_address == bctr_address)
            .cloned()
    }
}

#[test]
fn user_switch_table_lowers_to_a_dense_switch() {
    // bctr at 0x82001000 dispatching over r11 to three in-function targets.
    let base = 0x8200_1000;
    let end = 0x8200_1304;
    let words = vec![NOP; ((end - base) / 4) as usize];
    let image = image_of_words(base, &words);

    let func = func_node(base, end);
    let graph = graph_with(vec![func.clone()], 0);

    let mut decoder = TableDecoder::default();
    decoder.insert(base, insn(Mnemonic::Bctr, "bctr", [0; 5]));

    let mut config = RecompilerConfig::default();
    config.switch_tables.insert(
        base,
        JumpTable {
            bctr_address: base,
            index_register: 11,
            targets: vec![0x8200_1100, 0x8200_1200, 0x8200_1300],
        },
    );

    let mut recomp = Recompiler::new(&image, &graph, &decoder, config);
    assert!(recomp.recompile_function(&func));
    let out = recomp.current_output();

    assert!(out.contains("\tswitch (ctx.r11.u32) {\n"));
    assert!(out.contains("\tcase 0:\n\t\tgoto loc_82001100;\n"));
    assert!(out.contains("\tcase 1:\n\t\tgoto loc_82001200;\n"));
    assert!(out.contains("\tcase 2:\n\t\tgoto loc_82001300;\n"));
    assert!(out.contains("\tdefault:\n\t\t__builtin_trap();"));
    // Every target materialized as a label.
    assert!(out.contains("loc_82001100:\n"));
    assert!(out.contains("loc_82001200:\n"));
    assert!(out.contains("loc_82001300:\n"));
}

#[test]
fn out_of_bounds_switch_target_returns_instead_of_jumping() {
    let base = 0x8200_1000;
    let words = vec![NOP; 8];
    let image = image_of_words(base, &words);
    let func = func_node(base, base + 32);
    let graph = graph_with(vec![func.clone()], 0);

    let mut decoder = TableDecoder::default();
    decoder.insert(base, insn(Mnemonic::Bctr, "bctr", [0; 5]));

    let mut config = RecompilerConfig::default();
    config.switch_tables.insert(
        base,
        JumpTable {
            bctr_address: base,
            index_register: 11,
            targets: vec![0x9000_0000],
        },
    );

    let mut recomp = Recompiler::new(&image, &graph, &decoder, config);
    recomp.recompile_function(&func);
    let out = recomp.current_output();
    assert!(out.contains("// ERROR: jump target 0x90000000 outside function bounds"));
    assert!(out.contains("\tcase 0:\n\t\t// ERROR"));
    assert!(!out.contains("goto loc_90000000"));
}

#[test]
fn missed_switch_pattern_triggers_late_detection() {
    // mtctr r12 / nop / bctr with no configured table: the scanner hook gets
    // a second chance and its table is used.
    let words = [MTCTR_R12, NOP, BCTR, NOP];
    let image = ScannerImage {
        inner: image_of_words(BASE, &words),
        table: Some(JumpTable {
            bctr_address: BASE + 8,
            index_register: 12,
            targets: vec![BASE + 12],
        }),
    };

    let func = func_node(BASE, BASE + 16);
    let graph = graph_with(vec![func.clone()], 0);

    let mut decoder = TableDecoder::default();
    decoder.insert(BASE, insn(Mnemonic::Mtctr, "mtctr", [12, 0, 0, 0, 0]));
    decoder.insert(BASE + 4, insn(Mnemonic::Nop, "nop", [0; 5]));
    decoder.insert(BASE + 8, insn(Mnemonic::Bctr, "bctr", [0; 5]));
    decoder.insert(BASE + 12, insn(Mnemonic::Nop, "nop", [0; 5]));

    let mut recomp = Recompiler::new(&image, &graph, &decoder, RecompilerConfig::default());
    recomp.recompile_function(&func);
    let out = recomp.current_output();
    assert!(out.contains("\tswitch (ctx.r12.u32) {\n"));
    assert!(out.contains("loc_8200000C:\n"));
}

#[test]
fn bctr_without_any_table_is_an_indirect_tail_call() {
    let words = [BCTR];
    let image = image_of_words(BASE, &words);
    let func = func_node(BASE, BASE + 4);
    let graph = graph_with(vec![func.clone()], 0);

    let mut decoder = TableDecoder::default();
    decoder.insert(BASE, insn(Mnemonic::Bctr, "bctr", [0; 5]));

    let mut recomp = Recompiler::new(&image, &graph, &decoder, RecompilerConfig::default());
    recomp.recompile_function(&func);
    let out = recomp.current_output();
    assert!(out.contains("\tPPC_CALL_INDIRECT_FUNC(ctx.ctr.u32);\n\treturn;\n"));
}

#[test]
fn labels_reset_the_flush_mode_state() {
    // beq over one fadd onto another: the join point cannot trust the mode.
    let beq_word = (16u32 << 26) | 8; // bc +8
    let fadd_word = 0xFC20_182A;
    let words = [beq_word, fadd_word, fadd_word];
    let image = image_of_words(BASE, &words);
    let func = func_node(BASE, BASE + 12);
    let graph = graph_with(vec![func.clone()], 0);

    let mut decoder = TableDecoder::default();
    decoder.insert(BASE, insn(Mnemonic::Beq, "beq", [0, BASE + 8, 0, 0, 0]));
    decoder.insert(BASE + 4, insn(Mnemonic::Fadd, "fadd", [1, 2, 3, 0, 0]));
    decoder.insert(BASE + 8, insn(Mnemonic::Fadd, "fadd", [1, 2, 3, 0, 0]));

    let mut recomp = Recompiler::new(&image, &graph, &decoder, RecompilerConfig::default());
    recomp.recompile_function(&func);
    let out = recomp.current_output();

    assert!(out.contains("\tif (ctx.cr0.eq) goto loc_82000008;\n"));
    assert!(out.contains("loc_82000008:\n"));
    // Two mode switches: one per side of the label.
    assert_eq!(out.matches("disableFlushMode").count(), 2);
}

#[test]
fn promoted_locals_are_declared_before_the_body() {
    let words = [0x7DCF_8214, BLR]; // add r14, r15, r16; blr
    let image = image_of_words(BASE, &words);
    let func = func_node(BASE, BASE + 8);
    let graph = graph_with(vec![func.clone()], 0);

    let mut decoder = TableDecoder::default();
    decoder.insert(BASE, insn(Mnemonic::Add, "add", [14, 15, 16, 0, 0]));
    decoder.insert(BASE + 4, insn(Mnemonic::Blr, "blr", [0; 5]));

    let mut config = RecompilerConfig::default();
    config.non_volatile_as_local = true;

    let mut recomp = Recompiler::new(&image, &graph, &decoder, config);
    recomp.recompile_function(&func);
    let out = recomp.current_output();

    let decl = out.find("\tPPCRegister r14{};").expect("r14 declaration");
    let use_site = out.find("\tr14.u64 = r15.u64 + r16.u64;").expect("r14 use");
    assert!(decl < use_site);
    assert!(out.contains("\tPPCRegister r15{};"));
    assert!(out.contains("\tPPCRegister r16{};"));
}

#[test]
fn seh_functions_wrap_the_body_and_run_finally_handlers() {
    let words = [BLR];
    let image = image_of_words(BASE, &words);

    let mut func = func_node(BASE, BASE + 4);
    func.seh = Some(SehInfo {
        frame_size: 0x50,
        scopes: vec![
            SehScope {
                filter: 0,
                handler: 0x8200_0050,
                try_begin: BASE,
                try_end: BASE + 4,
            },
            SehScope {
                filter: 0,
                handler: 0x8200_0060,
                try_begin: BASE,
                try_end: BASE + 4,
            },
        ],
        restore_helper: 0,
    });

    let handler_a = FunctionNode {
        name: String::new(),
        base: 0x8200_0050,
        end: 0x8200_0054,
        blocks: vec![Block {
            base: 0x8200_0050,
            end: 0x8200_0054,
        }],
        jump_tables: Vec::new(),
        seh: None,
        authority: FunctionAuthority::Local,
    };
    let graph = graph_with(vec![func.clone(), handler_a], 0);

    let mut decoder = TableDecoder::default();
    decoder.insert(BASE, insn(Mnemonic::Blr, "blr", [0; 5]));

    let mut config = RecompilerConfig::default();
    config.generate_exception_handlers = true;

    let mut recomp = Recompiler::new(&image, &graph, &decoder, config);
    recomp.recompile_function(&func);
    let out = recomp.current_output();

    assert!(out.contains("\tSEH_TRY {\n"));
    assert!(out.contains("SEH_CATCH_ALL"));
    assert!(out.contains("ctx.r12.s64 = ctx.r31.s64 + 80;"));
    // Reverse scope order: the later scope's handler runs first.
    let second = out.find("sub_82000060(ctx, base);").expect("second handler");
    let first = out.find("sub_82000050(ctx, base);").expect("first handler");
    assert!(second < first);
    assert!(out.contains("SEH_RETHROW;"));
    // The try body is indented one extra level.
    assert!(out.contains("\t\treturn;\n"));
}

#[test]
fn seh_wrap_is_omitted_when_disabled() {
    let words = [BLR];
    let image = image_of_words(BASE, &words);
    let mut func = func_node(BASE, BASE + 4);
    func.seh = Some(SehInfo {
        frame_size: 0,
        scopes: vec![SehScope {
            filter: 0,
            handler: 0x8200_0050,
            try_begin: BASE,
            try_end: BASE + 4,
        }],
        restore_helper: 0,
    });
    let graph = graph_with(vec![func.clone()], 0);

    let mut decoder = TableDecoder::default();
    decoder.insert(BASE, insn(Mnemonic::Blr, "blr", [0; 5]));

    let mut recomp = Recompiler::new(&image, &graph, &decoder, RecompilerConfig::default());
    recomp.recompile_function(&func);
    assert!(!recomp.current_output().contains("SEH_TRY"));
}

#[test]
fn empty_function_gets_a_stable_stub() {
    let image = image_of_words(BASE, &[]);
    let func = FunctionNode {
        name: String::new(),
        base: BASE,
        end: BASE,
        blocks: Vec::new(),
        jump_tables: Vec::new(),
        seh: None,
        authority: FunctionAuthority::Local,
    };
    let graph = graph_with(vec![func.clone()], 0);
    let decoder = TableDecoder::default();

    let mut recomp = Recompiler::new(&image, &graph, &decoder, RecompilerConfig::default());
    assert!(recomp.recompile_function(&func));
    let out = recomp.current_output();
    assert!(out.contains(
        "__attribute__((alias(\"__imp__sub_82000000\"))) PPC_WEAK_FUNC(sub_82000000);"
    ));
    assert!(out.contains("PPC_FUNC_IMPL(__imp__sub_82000000) {\n\tPPC_FUNC_PROLOGUE();\n}\n"));
}

#[test]
fn mid_asm_hook_splices_and_steers_control_flow() {
    let words = [NOP, NOP];
    let image = image_of_words(BASE, &words);
    let func = func_node(BASE, BASE + 8);
    let graph = graph_with(vec![func.clone()], 0);

    let mut decoder = TableDecoder::default();
    decoder.insert(BASE, insn(Mnemonic::Nop, "nop", [0; 5]));
    decoder.insert(BASE + 4, insn(Mnemonic::Nop, "nop", [0; 5]));

    let mut config = RecompilerConfig::default();
    config.mid_asm_hooks.insert(
        BASE + 4,
        MidAsmHook {
            name: "OnMidFrame".into(),
            registers: vec!["r3".into(), "cr6".into()],
            jump_address_on_true: BASE,
            ..MidAsmHook::default()
        },
    );

    let mut recomp = Recompiler::new(&image, &graph, &decoder, config);
    recomp.recompile_function(&func);
    let out = recomp.current_output();

    // Declared ahead of the function, as bool because an edge is gated.
    assert!(out.contains("extern bool OnMidFrame(PPCRegister& r3, PPCCRRegister& cr6);"));
    assert!(out.contains("\tif (OnMidFrame(ctx.r3, ctx.cr6)) {\n\t\tgoto loc_82000000;\n\t}\n"));
    // The jump target became a label even with no branch to it.
    assert!(out.contains("loc_82000000:\n"));
}

#[test]
fn undecodable_words_become_comments() {
    let words = [0xFFFF_FFFF, BLR];
    let image = image_of_words(BASE, &words);
    let func = func_node(BASE, BASE + 8);
    let graph = graph_with(vec![func.clone()], 0);

    let mut decoder = TableDecoder::default();
    decoder.insert(BASE + 4, insn(Mnemonic::Blr, "blr", [0; 5]));

    let mut recomp = Recompiler::new(&image, &graph, &decoder, RecompilerConfig::default());
    assert!(recomp.recompile_function(&func));
    let out = recomp.current_output();
    assert!(out.contains("\t// 0xFFFFFFFF\n"));
    assert!(out.contains("\treturn;\n"));
}

#[test]
fn unimplemented_mnemonics_trap_at_runtime() {
    let words = [0x4400_0002, BLR]; // sc; blr
    let image = image_of_words(BASE, &words);
    let func = func_node(BASE, BASE + 8);
    let graph = graph_with(vec![func.clone()], 0);

    let mut decoder = TableDecoder::default();
    decoder.insert(BASE, insn(Mnemonic::Sc, "sc", [0; 5]));
    decoder.insert(BASE + 4, insn(Mnemonic::Blr, "blr", [0; 5]));

    let mut recomp = Recompiler::new(&image, &graph, &decoder, RecompilerConfig::default());
    assert!(recomp.recompile_function(&func));
    let out = recomp.current_output();
    assert!(out.contains("\t// UNIMPLEMENTED: sc\n"));
    assert!(out.contains("\tPPC_UNIMPLEMENTED(0x82000000, \"sc\");\n"));
}
