//! The function framer and the whole-image pipeline.
//!
//! One function is recompiled in two passes: the first walks every block
//! collecting label addresses (branch targets, switch-table targets, hook
//! jump targets), the second emits the body. The body lands in a private
//! scratch buffer so the local-variable declarations — discovered while
//! emitting — can be written ahead of it.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::mem;

use tracing::{error, info, trace, warn};
use xenon_ppc::{word, DecodedInstruction, Decoder, Mnemonic};

use crate::config::{MidAsmHook, RecompilerConfig};
use crate::context::{resolved_name, BuildContext, CsrState, LocalSet};
use crate::dispatch::builder_for;
use crate::graph::{FunctionGraph, FunctionNode};
use crate::image::BinaryImage;
use crate::output::{PendingWrites, OUTPUT_BUFFER_RESERVE};
use crate::CodegenError;

/// Post-emit record-form check: does the last emitted line reference the
/// condition field a record-form instruction must update? Purely textual and
/// local; a miss warns but never fails the build.
pub fn record_form_updates_cr(emitted: &str) -> bool {
    let trimmed = emitted.trim_end_matches('\n');
    let last = trimmed.rsplit('\n').next().unwrap_or("");
    last.contains("cr0") || last.contains("cr6")
}

pub struct Recompiler<'a> {
    image: &'a dyn BinaryImage,
    graph: &'a FunctionGraph,
    decoder: &'a dyn Decoder,
    config: RecompilerConfig,
    out: String,
    pending: PendingWrites,
    cpp_file_index: usize,
}

impl<'a> Recompiler<'a> {
    pub fn new(
        image: &'a dyn BinaryImage,
        graph: &'a FunctionGraph,
        decoder: &'a dyn Decoder,
        config: RecompilerConfig,
    ) -> Self {
        Recompiler {
            image,
            graph,
            decoder,
            config,
            out: String::new(),
            pending: PendingWrites::default(),
            cpp_file_index: 0,
        }
    }

    pub fn config(&self) -> &RecompilerConfig {
        &self.config
    }

    /// Emitted text accumulated in the current output unit.
    pub fn current_output(&self) -> &str {
        &self.out
    }

    fn outln(&mut self, args: std::fmt::Arguments<'_>) {
        let _ = self.out.write_fmt(args);
        self.out.push('\n');
    }

    /// Recompile every function and write the output tree.
    pub fn recompile_all(&mut self, force: bool) -> Result<(), CodegenError> {
        if self.graph.validation_failed() && !force {
            error!("code generation blocked: validation errors detected");
            return Err(CodegenError::ValidationFailed);
        }

        trace!("recompile: starting");
        self.out.reserve(OUTPUT_BUFFER_RESERVE);

        let project = self.config.project_name.clone();

        // Code range: the executable sections bound the function table.
        let mut code_min = u32::MAX;
        let mut code_max = 0u32;
        for section in self.image.sections() {
            if section.executable {
                code_min = code_min.min(section.base_address);
                code_max = code_max.max(section.base_address + section.size);
            }
        }

        trace!("recompile: generating {project}_config.h");
        {
            self.outln(format_args!("#pragma once"));
            self.outln(format_args!("#ifndef PPC_CONFIG_H_INCLUDED"));
            self.outln(format_args!("#define PPC_CONFIG_H_INCLUDED\n"));

            let defines: [(&str, bool); 8] = [
                ("PPC_CONFIG_SKIP_LR", self.config.skip_lr),
                ("PPC_CONFIG_CTR_AS_LOCAL", self.config.ctr_as_local),
                ("PPC_CONFIG_XER_AS_LOCAL", self.config.xer_as_local),
                ("PPC_CONFIG_RESERVED_AS_LOCAL", self.config.reserved_as_local),
                ("PPC_CONFIG_SKIP_MSR", self.config.skip_msr),
                ("PPC_CONFIG_CR_AS_LOCAL", self.config.cr_as_local),
                (
                    "PPC_CONFIG_NON_ARGUMENT_AS_LOCAL",
                    self.config.non_argument_as_local,
                ),
                (
                    "PPC_CONFIG_NON_VOLATILE_AS_LOCAL",
                    self.config.non_volatile_as_local,
                ),
            ];
            for (name, enabled) in defines {
                if enabled {
                    self.outln(format_args!("#define {name}"));
                }
            }
            self.outln(format_args!(""));

            let image_base = self.image.base_address();
            let image_size = self.image.image_size();
            self.outln(format_args!("#define PPC_IMAGE_BASE 0x{image_base:X}ull"));
            self.outln(format_args!("#define PPC_IMAGE_SIZE 0x{image_size:X}ull"));
            self.outln(format_args!("#define PPC_CODE_BASE 0x{code_min:X}ull"));
            self.outln(format_args!(
                "#define PPC_CODE_SIZE 0x{:X}ull",
                code_max - code_min
            ));
            self.outln(format_args!(""));
            self.outln(format_args!("\n#endif"));

            self.seal_unit(Some(&format!("{project}_config.h")));
        }

        trace!("recompile: generating {project}_init.h");
        {
            self.outln(format_args!("#pragma once\n"));
            self.outln(format_args!("#include \"{project}_config.h\""));
            self.outln(format_args!("#include \"ppc_runtime.h\"\n"));

            for func in self.graph.functions() {
                if func.authority == crate::graph::FunctionAuthority::Import {
                    continue;
                }
                let name = resolved_name(self.graph, func);
                self.outln(format_args!("PPC_EXTERN_IMPORT({name});"));
            }

            self.outln(format_args!("\n// Import function declarations"));
            for func in self.graph.functions() {
                if func.authority != crate::graph::FunctionAuthority::Import {
                    continue;
                }
                self.outln(format_args!("PPC_EXTERN_IMPORT({});", func.name));
            }

            self.outln(format_args!("\n// Mid-asm hook declarations"));
            let hooks: Vec<MidAsmHook> = self.config.mid_asm_hooks.values().cloned().collect();
            for hook in &hooks {
                self.emit_hook_declaration(hook);
            }

            self.outln(format_args!(
                "\n// Function mapping table - iterate to register functions with the processor"
            ));
            self.seal_unit(Some(&format!("{project}_init.h")));
        }

        trace!("recompile: generating {project}_init.cpp");
        {
            self.outln(format_args!(
                "// Generated function mapping table for {project}; do not edit."
            ));
            self.outln(format_args!("#include \"{project}_init.h\"\n"));
            self.outln(format_args!("PPCFuncMapping PPCFuncMappings[] = {{"));

            for func in self.graph.functions() {
                if func.authority == crate::graph::FunctionAuthority::Import {
                    continue;
                }
                if func.base < code_min {
                    continue;
                }
                let name = resolved_name(self.graph, func);
                self.outln(format_args!("\t{{ 0x{:X}, {name} }},", func.base));
            }
            // Import thunks keep indirect calls through the table working.
            for func in self.graph.functions() {
                if func.authority == crate::graph::FunctionAuthority::Import {
                    self.outln(format_args!("\t{{ 0x{:X}, {} }},", func.base, func.name));
                }
            }

            self.outln(format_args!("\t{{ 0, nullptr }}"));
            self.outln(format_args!("}};"));
            self.seal_unit(Some(&format!("{project}_init.cpp")));
        }

        let locals: Vec<FunctionNode> = self
            .graph
            .functions()
            .filter(|f| f.authority != crate::graph::FunctionAuthority::Import)
            .cloned()
            .collect();

        info!("recompiling {} functions", locals.len());
        for (i, func) in locals.iter().enumerate() {
            if i % self.config.functions_per_file == 0 {
                self.seal_unit(None);
                self.outln(format_args!("#include \"{project}_init.h\"\n"));
            }
            self.recompile_function(func);
        }
        self.seal_unit(None);
        info!("recompilation complete");

        trace!("recompile: generating sources.cmake");
        {
            self.outln(format_args!("# Generated source list; do not edit."));
            self.outln(format_args!("#"));
            self.outln(format_args!(
                "# SEH-wrapped units need /EHa under MSVC to catch hardware exceptions."
            ));
            self.outln(format_args!("set(GENERATED_SOURCES"));
            self.outln(format_args!(
                "    ${{CMAKE_CURRENT_LIST_DIR}}/{project}_init.cpp"
            ));
            for i in 0..self.cpp_file_index {
                self.outln(format_args!(
                    "    ${{CMAKE_CURRENT_LIST_DIR}}/{project}_recomp.{i}.cpp"
                ));
            }
            self.outln(format_args!(")"));
            self.seal_unit(Some("sources.cmake"));
        }

        let out_dir = self.config.out_directory_path.clone();
        self.pending.flush(&out_dir)?;
        Ok(())
    }

    /// Seal the current buffer as one output unit. Unnamed units become the
    /// next numbered translation unit.
    fn seal_unit(&mut self, name: Option<&str>) {
        if self.out.is_empty() {
            return;
        }
        let filename = match name {
            Some(name) => name.to_string(),
            None => {
                let filename = format!(
                    "{}_recomp.{}.cpp",
                    self.config.project_name, self.cpp_file_index
                );
                self.cpp_file_index += 1;
                filename
            }
        };
        let content = mem::take(&mut self.out);
        self.pending.push(filename, content);
    }

    /// Recompile one function into the current output unit. Returns false
    /// when any instruction failed to lower (the output is still valid).
    pub fn recompile_function(&mut self, func: &FunctionNode) -> bool {
        let name = resolved_name(self.graph, func);

        if func.blocks.is_empty() {
            // Pure exception-data addresses still get a stub so the output
            // link graph is stable.
            warn!("function 0x{:08X} has no blocks - generating stub", func.base);
            self.outln(format_args!(
                "// STUB: function at 0x{:08X} has no discovered code blocks",
                func.base
            ));
            self.outln(format_args!(
                "__attribute__((alias(\"__imp__{name}\"))) PPC_WEAK_FUNC({name});"
            ));
            self.outln(format_args!("PPC_FUNC_IMPL(__imp__{name}) {{"));
            self.outln(format_args!("\tPPC_FUNC_PROLOGUE();"));
            self.outln(format_args!("}}\n"));
            return true;
        }

        let generate_seh = self.config.generate_exception_handlers
            && func.seh.as_ref().is_some_and(|seh| !seh.scopes.is_empty());
        if let Some(seh) = &func.seh {
            if !seh.scopes.is_empty() {
                trace!(
                    "function 0x{:08X} has {} SEH scopes",
                    func.base,
                    seh.scopes.len()
                );
            }
        }

        // Pass 1: collect local labels from branches, switch tables and
        // hook jump targets; hook externs are declared ahead of the function.
        let mut labels: HashSet<u32> = HashSet::with_capacity(64);
        for block in &func.blocks {
            let Some(bytes) = self.image.translate(block.base) else {
                continue;
            };
            let block_len = (block.end - block.base) as usize;
            let bytes = &bytes[..block_len.min(bytes.len())];

            for offset in (0..bytes.len().saturating_sub(3)).step_by(4) {
                let addr = block.base + offset as u32;
                let insn_word = word::load_word(bytes, offset);
                if !word::is_branch_with_link(insn_word) {
                    match word::primary_opcode(insn_word) {
                        word::OP_B => {
                            labels.insert(addr.wrapping_add(word::b_displacement(insn_word) as u32));
                        }
                        word::OP_BC => {
                            labels
                                .insert(addr.wrapping_add(word::bc_displacement(insn_word) as u32));
                        }
                        _ => {}
                    }
                }

                if let Some(table) = self.config.switch_tables.get(&addr) {
                    labels.extend(table.targets.iter().copied());
                }

                if let Some(hook) = self.config.mid_asm_hooks.get(&addr) {
                    let hook = hook.clone();
                    self.emit_hook_declaration(&hook);
                    for target in [
                        hook.jump_address,
                        hook.jump_address_on_true,
                        hook.jump_address_on_false,
                    ] {
                        if target != 0 {
                            labels.insert(target);
                        }
                    }
                }
            }
        }
        for table in &func.jump_tables {
            labels.extend(table.targets.iter().copied());
        }

        // The function surface: a weak alias from the public name onto the
        // implementation symbol, overridable at link time.
        self.outln(format_args!(
            "__attribute__((alias(\"__imp__{name}\"))) PPC_WEAK_FUNC({name});"
        ));
        self.outln(format_args!("PPC_FUNC_IMPL(__imp__{name}) {{"));
        self.outln(format_args!("\tPPC_FUNC_PROLOGUE();"));

        // Pass 2 emits into a scratch buffer; declarations come first once
        // the body has decided what to promote.
        let mut saved = String::with_capacity(4096);
        mem::swap(&mut self.out, &mut saved);

        let mut locals = LocalSet::default();
        let mut csr = CsrState::Unknown;
        let mut emitted_labels: HashSet<u32> = HashSet::new();
        let mut pending_switch: Option<u32> = None;
        let mut all_recompiled = true;

        for block in &func.blocks {
            let Some(bytes) = self.image.translate(block.base) else {
                warn!(
                    "block 0x{:08X} in function 0x{:08X} has no mapped data - skipping",
                    block.base, func.base
                );
                continue;
            };
            let block_len = (block.end - block.base) as usize;
            let bytes = &bytes[..block_len.min(bytes.len())];
            let words: Vec<u32> = bytes
                .chunks_exact(4)
                .map(|c| u32::from_be_bytes(c.try_into().unwrap()))
                .collect();

            for (index, &insn_word) in words.iter().enumerate() {
                let addr = block.base + (index as u32) * 4;

                if labels.contains(&addr) && emitted_labels.insert(addr) {
                    self.outln(format_args!("loc_{addr:X}:"));
                    // Any predecessor may have left a different mode.
                    csr = CsrState::Unknown;
                }

                if pending_switch.is_none() && self.config.switch_tables.contains_key(&addr) {
                    pending_switch = Some(addr);
                }

                let Some(mut insn) = self.decoder.decode(insn_word, addr) else {
                    self.outln(format_args!("\t// 0x{insn_word:08X}"));
                    if insn_word != 0 {
                        warn!("unable to decode instruction {insn_word:X} at {addr:X}");
                    }
                    continue;
                };

                // A bctr with no table but a nearby mtctr is the switch
                // pattern the analysis sometimes misses; give the scanner a
                // second chance before lowering it as an indirect call.
                if insn.id == Mnemonic::Bctr && pending_switch.is_none() {
                    let mut is_switch_pattern = false;
                    for back in 1..=3usize.min(index) {
                        let prev = words[index - back];
                        if prev & word::MTCTR_MASK == word::MTCTR_WORD {
                            is_switch_pattern =
                                words[index - back + 1..index].iter().all(|w| *w == word::NOP_WORD);
                            break;
                        }
                        if prev != word::NOP_WORD {
                            break;
                        }
                    }
                    if is_switch_pattern {
                        if let Some(table) = self.image.detect_jump_table(addr) {
                            info!(
                                "late-detected jump table at 0x{:08X} with {} entries",
                                addr,
                                table.targets.len()
                            );
                            labels.extend(table.targets.iter().copied());
                            self.config.switch_tables.insert(addr, table);
                            pending_switch = Some(addr);
                        }
                    }
                }

                // Variants the disassembler reports under the wrong id.
                if insn.id == Mnemonic::Vupkhsb128 && insn.operands[2] == 0x60 {
                    insn.id = Mnemonic::Vupkhsh128;
                } else if insn.id == Mnemonic::Vupklsb128 && insn.operands[2] == 0x60 {
                    insn.id = Mnemonic::Vupklsh128;
                }

                if !self.recompile_instruction(
                    func,
                    addr,
                    &insn,
                    &words[index..],
                    &mut locals,
                    &mut csr,
                    &mut pending_switch,
                ) {
                    warn!("unrecognized instruction at 0x{addr:X}: {}", insn.name);
                    all_recompiled = false;
                }
            }
        }

        // Close the body; SEH functions get the catch-all that runs finally
        // handlers in reverse scope order and rethrows. The normal path does
        // not call them again.
        if generate_seh {
            let seh = func.seh.as_ref().unwrap();
            self.outln(format_args!("\t\t}} SEH_CATCH_ALL {{"));
            self.outln(format_args!(
                "\t\t\tPPC_LOG_EXCEPTION(\"sub_{:08X}\");",
                func.base
            ));
            if seh.frame_size > 0 {
                self.outln(format_args!(
                    "\t\t\tctx.r12.s64 = ctx.r31.s64 + {};  // establisher frame pointer",
                    seh.frame_size
                ));
            }
            for scope in seh.scopes.iter().rev() {
                if scope.filter == 0 && scope.handler != 0 {
                    let handler = match self.graph.function_at(scope.handler) {
                        Some(node) => resolved_name(self.graph, node),
                        None => format!("sub_{:08X}", scope.handler),
                    };
                    self.outln(format_args!(
                        "\t\t\t{handler}(ctx, base);  // __finally handler"
                    ));
                }
            }
            if seh.restore_helper != 0 {
                if let Some(node) = self.graph.function_at(seh.restore_helper) {
                    let helper = resolved_name(self.graph, node);
                    self.outln(format_args!(
                        "\t\t\t{helper}(ctx, base);  // restore caller registers"
                    ));
                }
            }
            self.outln(format_args!("\t\t\tSEH_RETHROW;"));
            self.outln(format_args!("\t\t}} SEH_END"));
            self.outln(format_args!("\t}}\n"));
        } else {
            self.outln(format_args!("}}\n"));
        }

        // Swap back and write declarations ahead of the body so every
        // promoted register is declared before first use.
        mem::swap(&mut self.out, &mut saved);
        let body = saved;

        if locals.ctr {
            self.outln(format_args!("\tPPCRegister ctr{{}};"));
        }
        if locals.xer {
            self.outln(format_args!("\tPPCXERRegister xer{{}};"));
        }
        if locals.reserved {
            self.outln(format_args!("\tPPCRegister reserved{{}};"));
        }
        for i in 0..8 {
            if locals.cr[i] {
                self.outln(format_args!("\tPPCCRRegister cr{i}{{}};"));
            }
        }
        for i in 0..32 {
            if locals.r[i] {
                self.outln(format_args!("\tPPCRegister r{i}{{}};"));
            }
        }
        for i in 0..32 {
            if locals.f[i] {
                self.outln(format_args!("\tPPCRegister f{i}{{}};"));
            }
        }
        for i in 0..128 {
            if locals.v[i] {
                self.outln(format_args!("\tPPCVRegister v{i}{{}};"));
            }
        }
        if locals.env {
            self.outln(format_args!("\tPPCContext env{{}};"));
        }
        if locals.temp {
            self.outln(format_args!("\tPPCRegister temp{{}};"));
        }
        if locals.v_temp {
            self.outln(format_args!("\tPPCVRegister vTemp{{}};"));
        }
        if locals.ea {
            self.outln(format_args!("\tuint32_t ea{{}};"));
        }

        if generate_seh {
            self.outln(format_args!("\tSEH_TRY {{"));
            // One extra level of indentation for the try body.
            let mut indented = String::with_capacity(body.len() + body.len() / 20);
            let mut first = true;
            for line in body.split_inclusive('\n') {
                if !first && line.starts_with('\t') {
                    indented.push('\t');
                }
                indented.push_str(line);
                first = false;
            }
            self.out.push_str(&indented);
        } else {
            self.out.push_str(&body);
        }

        all_recompiled
    }

    /// Lower a single decoded instruction, including the mid-asm hook
    /// splices around it and the record-form post-check.
    #[allow(clippy::too_many_arguments)]
    fn recompile_instruction(
        &mut self,
        func: &FunctionNode,
        addr: u32,
        insn: &DecodedInstruction,
        words: &[u32],
        locals: &mut LocalSet,
        csr: &mut CsrState,
        pending_switch: &mut Option<u32>,
    ) -> bool {
        let hook = self
            .config
            .mid_asm_hooks
            .get(&addr)
            .cloned();
        let switch_table =
            pending_switch.and_then(|table_addr| self.config.switch_tables.get(&table_addr));

        let mut ctx = BuildContext {
            insn,
            base: addr,
            words,
            func,
            graph: self.graph,
            config: &self.config,
            out: &mut self.out,
            locals,
            csr,
            switch_table,
            switch_table_consumed: false,
        };

        ctx.line_fmt(format_args!("\t// {} {}", insn.name, insn.op_str));

        if let Some(hook) = hook.as_ref().filter(|h| !h.after_instruction) {
            emit_mid_asm_hook(&mut ctx, hook);
        }

        let handled = match builder_for(insn.id) {
            Some(builder) => builder(&mut ctx),
            None => {
                // Not a build failure: the gap becomes a runtime trap and the
                // unit still compiles.
                warn!("unimplemented: {} at 0x{:08X}", insn.name, addr);
                ctx.line_fmt(format_args!("\t// UNIMPLEMENTED: {}", insn.name));
                ctx.line_fmt(format_args!(
                    "\tPPC_UNIMPLEMENTED(0x{addr:X}, \"{}\");",
                    insn.name
                ));
                true
            }
        };

        if insn.is_record_form() && !record_form_updates_cr(ctx.out) {
            warn!(
                "{} at {:X} has the record bit set but no comparison was generated",
                insn.name, addr
            );
        }

        if let Some(hook) = hook.as_ref().filter(|h| h.after_instruction) {
            emit_mid_asm_hook(&mut ctx, hook);
        }

        if ctx.switch_table_consumed {
            *pending_switch = None;
        }
        handled
    }

    /// Extern declaration for a hook, emitted ahead of any caller.
    fn emit_hook_declaration(&mut self, hook: &MidAsmHook) {
        let ret = if hook.returns_bool() { "bool" } else { "void" };
        let _ = write!(self.out, "extern {ret} {}(", hook.name);
        for (i, token) in hook.registers.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.out.push_str(&hook_parameter(token));
        }
        self.out.push_str(");\n\n");
    }
}

/// Parameter spelling for one hook register token.
fn hook_parameter(token: &str) -> String {
    match token {
        "ctr" | "reserved" => format!("PPCRegister& {token}"),
        "xer" => "PPCXERRegister& xer".to_string(),
        "fpscr" => "PPCFPSCRRegister& fpscr".to_string(),
        _ => match token.as_bytes().first() {
            Some(b'c') => format!("PPCCRRegister& {token}"),
            Some(b'v') => format!("PPCVRegister& {token}"),
            _ => format!("PPCRegister& {token}"),
        },
    }
}

/// Argument spelling for one hook register token, promoting through the
/// accessors so hooks see the same storage the body uses.
fn hook_argument(ctx: &mut BuildContext, token: &str) -> String {
    match token {
        "ctr" => ctx.ctr(),
        "xer" => ctx.xer(),
        "reserved" => ctx.reserved(),
        "fpscr" => "ctx.fpscr".to_string(),
        _ => {
            let index = token[1..].trim_start_matches('r').parse::<u32>();
            match (token.as_bytes().first(), index) {
                (Some(b'c'), Ok(i)) => ctx.cr(i),
                (Some(b'r'), Ok(i)) => ctx.r(i),
                (Some(b'f'), Ok(i)) => ctx.f(i),
                (Some(b'v'), Ok(i)) => ctx.v(i),
                _ => {
                    warn!("unknown mid-asm hook register token: {token}");
                    token.to_string()
                }
            }
        }
    }
}

/// The call splice itself, with boolean-gated control flow when the hook
/// declares any.
fn emit_mid_asm_hook(ctx: &mut BuildContext, hook: &MidAsmHook) {
    let args: Vec<String> = hook
        .registers
        .iter()
        .map(|token| hook_argument(ctx, token))
        .collect();
    let args = args.join(", ");

    if hook.returns_bool() {
        ctx.line_fmt(format_args!("\tif ({}({args})) {{", hook.name));
        if hook.return_on_true {
            ctx.line_fmt(format_args!("\t\treturn;"));
        } else if hook.jump_address_on_true != 0 {
            ctx.line_fmt(format_args!("\t\tgoto loc_{:X};", hook.jump_address_on_true));
        }
        ctx.line_fmt(format_args!("\t}}"));
        ctx.line_fmt(format_args!("\telse {{"));
        if hook.return_on_false {
            ctx.line_fmt(format_args!("\t\treturn;"));
        } else if hook.jump_address_on_false != 0 {
            ctx.line_fmt(format_args!(
                "\t\tgoto loc_{:X};",
                hook.jump_address_on_false
            ));
        }
        ctx.line_fmt(format_args!("\t}}"));
    } else {
        ctx.line_fmt(format_args!("\t{}({args});", hook.name));
        if hook.ret {
            ctx.line_fmt(format_args!("\treturn;"));
        } else if hook.jump_address != 0 {
            ctx.line_fmt(format_args!("\tgoto loc_{:X};", hook.jump_address));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::record_form_updates_cr;

    #[test]
    fn record_form_check_is_last_line_only() {
        assert!(record_form_updates_cr(
            "\tctx.r3.u64 = ctx.r4.u64 & ctx.r5.u64;\n\tctx.cr0.compare<int32_t>(ctx.r3.s32, 0, ctx.xer);\n"
        ));
        // The synthetic fragment that forgets the comparison.
        assert!(!record_form_updates_cr("\tra = rs & rb;\n"));
        // An earlier line mentioning cr0 does not satisfy the check.
        assert!(!record_form_updates_cr(
            "\tctx.cr0.eq = 1;\n\tctx.r3.u64 = 0;\n"
        ));
    }
}
