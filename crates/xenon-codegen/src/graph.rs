//! Read-only view of the discovered function graph.
//!
//! Discovery itself (block walking, jump-table detection, import resolution)
//! belongs to the external analysis stage; the recompiler only consumes the
//! result and asks it to classify branch targets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A contiguous run of reachable, decodable instructions. Blocks of one
/// function never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub base: u32,
    /// Exclusive end address.
    pub end: u32,
}

/// A dense indirect-branch dispatch discovered at a `bctr`, or supplied by
/// the user keyed on the branch address. Well-formed tables keep every
/// target inside the owning function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JumpTable {
    pub bctr_address: u32,
    pub index_register: u32,
    pub targets: Vec<u32>,
}

/// One structured-exception scope: `{filter, handler, try range}`. A zero
/// filter marks a finally handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SehScope {
    pub filter: u32,
    pub handler: u32,
    pub try_begin: u32,
    pub try_end: u32,
}

/// Structured-exception info attached to a function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SehInfo {
    pub frame_size: u32,
    pub scopes: Vec<SehScope>,
    /// Address of the register-restore helper, zero when absent.
    pub restore_helper: u32,
}

/// Who defines a function: the image itself, or an import thunk satisfied
/// by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FunctionAuthority {
    Local,
    Import,
}

/// One discovered guest function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionNode {
    pub name: String,
    pub base: u32,
    pub end: u32,
    pub blocks: Vec<Block>,
    pub jump_tables: Vec<JumpTable>,
    pub seh: Option<SehInfo>,
    pub authority: FunctionAuthority,
}

impl FunctionNode {
    pub fn contains(&self, address: u32) -> bool {
        address >= self.base && address < self.end
    }
}

/// Branch-target classification relative to a source address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// Inside the source function and not another function's entry.
    InternalLabel,
    /// Entry point of a locally defined function.
    Function,
    /// Entry point of an import thunk.
    Import,
    /// Nothing known about the address.
    Unknown,
}

/// The function list plus target classification, as handed over by the
/// analysis stage.
#[derive(Debug, Default, Clone)]
pub struct FunctionGraph {
    functions: BTreeMap<u32, FunctionNode>,
    entry_point: u32,
    validation_failed: bool,
}

impl FunctionGraph {
    pub fn new(entry_point: u32) -> Self {
        FunctionGraph {
            functions: BTreeMap::new(),
            entry_point,
            validation_failed: false,
        }
    }

    pub fn insert(&mut self, node: FunctionNode) {
        self.functions.insert(node.base, node);
    }

    pub fn entry_point(&self) -> u32 {
        self.entry_point
    }

    /// Analysis marks the graph when discovery found inconsistencies; the
    /// pipeline refuses to emit from such a graph unless forced.
    pub fn set_validation_failed(&mut self, failed: bool) {
        self.validation_failed = failed;
    }

    pub fn validation_failed(&self) -> bool {
        self.validation_failed
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionNode> {
        self.functions.values()
    }

    /// The function whose entry point is exactly `address`.
    pub fn function_at(&self, address: u32) -> Option<&FunctionNode> {
        self.functions.get(&address)
    }

    /// The function whose address range contains `address`.
    pub fn function_containing(&self, address: u32) -> Option<&FunctionNode> {
        self.functions
            .range(..=address)
            .next_back()
            .map(|(_, node)| node)
            .filter(|node| node.contains(address))
    }

    /// Classify a branch target as seen from `from`. `is_call` distinguishes
    /// a branch-and-link landing on its own function's entry (recursion) from
    /// a plain branch there (loop back to the top).
    pub fn classify_target(&self, target: u32, from: u32, is_call: bool) -> TargetKind {
        if let Some(node) = self.function_at(target) {
            let own_entry = self
                .function_containing(from)
                .map(|f| f.base == target && f.contains(from))
                .unwrap_or(false);
            if own_entry && !is_call {
                return TargetKind::InternalLabel;
            }
            return match node.authority {
                FunctionAuthority::Local => TargetKind::Function,
                FunctionAuthority::Import => TargetKind::Import,
            };
        }
        match self.function_containing(from) {
            Some(owner) if owner.contains(target) => TargetKind::InternalLabel,
            _ => TargetKind::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(base: u32, end: u32, authority: FunctionAuthority) -> FunctionNode {
        FunctionNode {
            name: String::new(),
            base,
            end,
            blocks: vec![Block { base, end }],
            jump_tables: Vec::new(),
            seh: None,
            authority,
        }
    }

    #[test]
    fn classification() {
        let mut graph = FunctionGraph::new(0x1000);
        graph.insert(node(0x1000, 0x1100, FunctionAuthority::Local));
        graph.insert(node(0x1100, 0x1140, FunctionAuthority::Local));
        graph.insert(node(0x2000, 0x2004, FunctionAuthority::Import));

        // In-function target that is no one's entry point.
        assert_eq!(
            graph.classify_target(0x1040, 0x1010, false),
            TargetKind::InternalLabel
        );
        // Another function's entry.
        assert_eq!(
            graph.classify_target(0x1100, 0x1010, false),
            TargetKind::Function
        );
        // Import thunk.
        assert_eq!(
            graph.classify_target(0x2000, 0x1010, true),
            TargetKind::Import
        );
        // Own entry: loop back for a branch, recursion for a call.
        assert_eq!(
            graph.classify_target(0x1000, 0x1010, false),
            TargetKind::InternalLabel
        );
        assert_eq!(
            graph.classify_target(0x1000, 0x1010, true),
            TargetKind::Function
        );
        // Nowhere.
        assert_eq!(
            graph.classify_target(0x9000, 0x1010, false),
            TargetKind::Unknown
        );
    }
}
