//! Output buffering and the flush pass.
//!
//! Everything the pipeline emits accumulates in memory and is written in one
//! synchronous pass at the end. A file whose on-disk content hashes equal to
//! the new content is left untouched so downstream incremental builds stay
//! warm.

use std::fs;
use std::path::Path;

use tracing::{error, trace};

use crate::CodegenError;

/// Reservation for the shared append buffer; covers a typical image without
/// reallocation.
pub(crate) const OUTPUT_BUFFER_RESERVE: usize = 32 * 1024 * 1024;

#[derive(Debug, Default)]
pub(crate) struct PendingWrites {
    files: Vec<(String, String)>,
}

impl PendingWrites {
    /// Seal one output unit under the given file name.
    pub(crate) fn push(&mut self, name: String, content: String) {
        self.files.push((name, content));
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Write all pending files below `out_dir`, skipping files whose content
    /// is unchanged. Returns how many files were actually written.
    pub(crate) fn flush(&mut self, out_dir: &Path) -> Result<usize, CodegenError> {
        let mut written = 0;
        for (name, content) in self.files.drain(..) {
            let path = out_dir.join(&name);
            trace!("flush: {}", path.display());

            let unchanged = match fs::read(&path) {
                Ok(existing) if existing.len() == content.len() => {
                    blake3::hash(&existing) == blake3::hash(content.as_bytes())
                }
                _ => false,
            };
            if unchanged {
                trace!("flush: {} unchanged, skipping", path.display());
                continue;
            }

            if let Err(source) = fs::write(&path, content.as_bytes()) {
                error!("failed to write {}", path.display());
                return Err(CodegenError::Io { path, source });
            }
            written += 1;
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flush_skips_identical_content() {
        let dir = std::env::temp_dir().join(format!("xenon-out-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let mut pending = PendingWrites::default();
        pending.push("a.cpp".into(), "int x;\n".into());
        assert_eq!(pending.flush(&dir).unwrap(), 1);

        pending.push("a.cpp".into(), "int x;\n".into());
        assert_eq!(pending.flush(&dir).unwrap(), 0);

        pending.push("a.cpp".into(), "int y;\n".into());
        assert_eq!(pending.flush(&dir).unwrap(), 1);

        assert!(pending.is_empty());
        fs::remove_dir_all(&dir).ok();
    }
}
