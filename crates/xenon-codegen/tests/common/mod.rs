//! Shared fixtures: an address-keyed fake decoder and a single-function
//! emission harness.

#![allow(dead_code)]

use std::collections::BTreeMap;

use xenon_codegen::{
    builder_for, Block, BuildContext, CsrState, FunctionAuthority, FunctionGraph, FunctionNode,
    LocalSet, MemoryImage, RecompilerConfig,
};
use xenon_ppc::{DecodedInstruction, Decoder, Mnemonic};

/// Decoder driven by a per-address table, the way unit fixtures want it; the
/// raw word is ignored.
#[derive(Default)]
pub struct TableDecoder {
    by_addr: BTreeMap<u32, DecodedInstruction>,
}

impl TableDecoder {
    pub fn insert(&mut self, addr: u32, insn: DecodedInstruction) {
        self.by_addr.insert(addr, insn);
    }
}

impl Decoder for TableDecoder {
    fn decode(&self, _word: u32, address: u32) -> Option<DecodedInstruction> {
        self.by_addr.get(&address).cloned()
    }
}

pub fn insn(id: Mnemonic, name: &str, operands: [u32; 5]) -> DecodedInstruction {
    DecodedInstruction {
        id,
        name: name.to_string(),
        op_str: String::new(),
        operands,
    }
}

pub fn func_node(base: u32, end: u32) -> FunctionNode {
    FunctionNode {
        name: String::new(),
        base,
        end,
        blocks: vec![Block { base, end }],
        jump_tables: Vec::new(),
        seh: None,
        authority: FunctionAuthority::Local,
    }
}

pub fn graph_with(nodes: Vec<FunctionNode>, entry: u32) -> FunctionGraph {
    let mut graph = FunctionGraph::new(entry);
    for node in nodes {
        graph.insert(node);
    }
    graph
}

pub fn image_of_words(base: u32, words: &[u32]) -> MemoryImage {
    MemoryImage::from_words(base, words)
}

/// Runs individual builders against a fixed single-block function at
/// 0x82000000..0x82000100, carrying promotion and CSR state across calls.
pub struct EmitHarness {
    pub func: FunctionNode,
    pub graph: FunctionGraph,
    pub config: RecompilerConfig,
    pub locals: LocalSet,
    pub csr: CsrState,
}

impl EmitHarness {
    pub fn new() -> Self {
        let func = func_node(0x8200_0000, 0x8200_0100);
        let graph = graph_with(vec![func.clone()], 0x8300_0000);
        EmitHarness {
            func,
            graph,
            config: RecompilerConfig::default(),
            locals: LocalSet::default(),
            csr: CsrState::Unknown,
        }
    }

    /// Build one instruction at `addr`, returning the emitted fragment.
    /// `words` is the raw lookahead stream starting at the instruction.
    pub fn emit_at(&mut self, insn: &DecodedInstruction, addr: u32, words: &[u32]) -> String {
        let mut out = String::new();
        let mut ctx = BuildContext {
            insn,
            base: addr,
            words,
            func: &self.func,
            graph: &self.graph,
            config: &self.config,
            out: &mut out,
            locals: &mut self.locals,
            csr: &mut self.csr,
            switch_table: None,
            switch_table_consumed: false,
        };
        let builder = builder_for(insn.id).expect("no builder for mnemonic");
        assert!(builder(&mut ctx));
        out
    }

    pub fn emit(&mut self, insn: &DecodedInstruction) -> String {
        self.emit_at(insn, 0x8200_0000, &[])
    }
}
