//! Static recompiler core.
//!
//! Takes a binary image, a discovered function graph and a configuration and
//! emits one C++ translation unit per bucket of guest functions, plus the
//! config/declaration headers, the guest→native mapping table and a source
//! list. Every discovered guest function becomes a native function over an
//! explicit guest register context and a flat guest memory window.
//!
//! The pipeline is single-threaded and processes one function at a time:
//! each function body is produced atomically into a private scratch buffer
//! (local-register promotion needs the declarations first), then appended to
//! the current output unit. File writes are one synchronous pass at the end,
//! skipping files whose content hash is unchanged.

mod builders;
mod config;
mod context;
mod dispatch;
mod graph;
mod image;
mod output;
mod recompiler;

pub use config::{MidAsmHook, RecompilerConfig};
pub use context::{compute_mask, BuildContext, CsrState, LocalSet};
pub use dispatch::{builder_for, Builder, UNIMPLEMENTED};
pub use graph::{
    Block, FunctionAuthority, FunctionGraph, FunctionNode, JumpTable, SehInfo, SehScope, TargetKind,
};
pub use image::{BinaryImage, MemoryImage, Section};
pub use recompiler::{record_form_updates_cr, Recompiler};

use std::path::PathBuf;

/// Pipeline failure surface. Everything recoverable degrades to a warning
/// plus compilable output instead of an error.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    #[error("code generation blocked: validation errors detected (use force to override)")]
    ValidationFailed,

    #[error("failed to write {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
