//! Whole-pipeline tests: bucketing, the generated headers and tables, and
//! the validation gate.

mod common;

use std::fs;
use std::path::PathBuf;

use common::{func_node, graph_with, image_of_words, insn, TableDecoder};
use xenon_codegen::{
    CodegenError, FunctionAuthority, FunctionNode, Recompiler, RecompilerConfig,
};
use xenon_ppc::Mnemonic;

const BASE: u32 = 0x8200_0000;
const BLR: u32 = 0x4E80_0020;

fn temp_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("xenon-pipeline-{tag}-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn import_node(base: u32, name: &str) -> FunctionNode {
    FunctionNode {
        name: name.into(),
        base,
        end: base + 4,
        blocks: Vec::new(),
        jump_tables: Vec::new(),
        seh: None,
        authority: FunctionAuthority::Import,
    }
}

#[test]
fn pipeline_emits_the_full_output_surface() {
    let dir = temp_dir("surface");

    // Three one-instruction functions plus one import thunk.
    let words = [BLR, BLR, BLR];
    let image = image_of_words(BASE, &words);
    let funcs = vec![
        func_node(BASE, BASE + 4),
        func_node(BASE + 4, BASE + 8),
        func_node(BASE + 8, BASE + 12),
        import_node(0x9000_0000, "XamGetSystemVersion"),
    ];
    let graph = graph_with(funcs, BASE);

    let mut decoder = TableDecoder::default();
    for addr in [BASE, BASE + 4, BASE + 8] {
        decoder.insert(addr, insn(Mnemonic::Blr, "blr", [0; 5]));
    }

    let mut config = RecompilerConfig::default();
    config.project_name = "demo".into();
    config.out_directory_path = dir.clone();
    config.functions_per_file = 2;
    config.skip_lr = true;

    let mut recomp = Recompiler::new(&image, &graph, &decoder, config);
    recomp.recompile_all(false).unwrap();

    let read = |name: &str| fs::read_to_string(dir.join(name)).unwrap();

    // Config header: option defines plus the image and code ranges.
    let config_h = read("demo_config.h");
    assert!(config_h.contains("#define PPC_CONFIG_SKIP_LR\n"));
    assert!(!config_h.contains("PPC_CONFIG_CTR_AS_LOCAL"));
    assert!(config_h.contains("#define PPC_IMAGE_BASE 0x82000000ull\n"));
    assert!(config_h.contains("#define PPC_IMAGE_SIZE 0xCull\n"));
    assert!(config_h.contains("#define PPC_CODE_BASE 0x82000000ull\n"));
    assert!(config_h.contains("#define PPC_CODE_SIZE 0xCull\n"));

    // Declarations header: one extern per function, entry point renamed,
    // imports in their own section.
    let init_h = read("demo_init.h");
    assert!(init_h.contains("PPC_EXTERN_IMPORT(xstart);"));
    assert!(init_h.contains("PPC_EXTERN_IMPORT(sub_82000004);"));
    assert!(init_h.contains("PPC_EXTERN_IMPORT(XamGetSystemVersion);"));

    // Mapping table: sorted locals, then imports, then the sentinel.
    let init_cpp = read("demo_init.cpp");
    assert!(init_cpp.contains("PPCFuncMapping PPCFuncMappings[] = {"));
    let xstart = init_cpp.find("{ 0x82000000, xstart },").unwrap();
    let second = init_cpp.find("{ 0x82000004, sub_82000004 },").unwrap();
    let import = init_cpp
        .find("{ 0x90000000, XamGetSystemVersion },")
        .unwrap();
    let sentinel = init_cpp.find("{ 0, nullptr }").unwrap();
    assert!(xstart < second && second < import && import < sentinel);

    // Bucketing: two functions per unit, three functions, two units.
    let unit0 = read("demo_recomp.0.cpp");
    let unit1 = read("demo_recomp.1.cpp");
    assert!(unit0.contains("#include \"demo_init.h\""));
    assert!(unit0.contains("PPC_FUNC_IMPL(__imp__xstart)"));
    assert!(unit0.contains("PPC_FUNC_IMPL(__imp__sub_82000004)"));
    assert!(unit1.contains("PPC_FUNC_IMPL(__imp__sub_82000008)"));

    // Source list names the init unit and every translation unit.
    let sources = read("sources.cmake");
    assert!(sources.contains("${CMAKE_CURRENT_LIST_DIR}/demo_init.cpp"));
    assert!(sources.contains("${CMAKE_CURRENT_LIST_DIR}/demo_recomp.0.cpp"));
    assert!(sources.contains("${CMAKE_CURRENT_LIST_DIR}/demo_recomp.1.cpp"));

    fs::remove_dir_all(&dir).ok();
}

#[test]
fn rerunning_the_pipeline_is_stable() {
    let dir = temp_dir("stable");

    let words = [BLR];
    let image = image_of_words(BASE, &words);
    let graph = graph_with(vec![func_node(BASE, BASE + 4)], 0);
    let mut decoder = TableDecoder::default();
    decoder.insert(BASE, insn(Mnemonic::Blr, "blr", [0; 5]));

    let mut config = RecompilerConfig::default();
    config.project_name = "stable".into();
    config.out_directory_path = dir.clone();

    let mut recomp = Recompiler::new(&image, &graph, &decoder, config.clone());
    recomp.recompile_all(false).unwrap();
    let first = fs::read_to_string(dir.join("stable_recomp.0.cpp")).unwrap();

    let mut recomp = Recompiler::new(&image, &graph, &decoder, config);
    recomp.recompile_all(false).unwrap();
    let second = fs::read_to_string(dir.join("stable_recomp.0.cpp")).unwrap();

    assert_eq!(first, second);
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn validation_failure_blocks_emission_unless_forced() {
    let dir = temp_dir("validation");

    let words = [BLR];
    let image = image_of_words(BASE, &words);
    let mut graph = graph_with(vec![func_node(BASE, BASE + 4)], 0);
    graph.set_validation_failed(true);

    let mut decoder = TableDecoder::default();
    decoder.insert(BASE, insn(Mnemonic::Blr, "blr", [0; 5]));

    let mut config = RecompilerConfig::default();
    config.project_name = "gate".into();
    config.out_directory_path = dir.clone();

    let mut recomp = Recompiler::new(&image, &graph, &decoder, config.clone());
    assert!(matches!(
        recomp.recompile_all(false),
        Err(CodegenError::ValidationFailed)
    ));
    assert!(!dir.join("gate_config.h").exists());

    let mut recomp = Recompiler::new(&image, &graph, &decoder, config);
    recomp.recompile_all(true).unwrap();
    assert!(dir.join("gate_config.h").exists());

    fs::remove_dir_all(&dir).ok();
}
