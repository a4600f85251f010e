//! PowerPC (Xenon) instruction surface shared by the recompiler.
//!
//! The disassembler proper is an external collaborator; this crate pins down
//! the contract it must satisfy: the closed [`Mnemonic`] id space, the
//! [`DecodedInstruction`] record it produces per 4-byte word, and the raw
//! instruction-word field helpers the recompiler's label pass needs before
//! any decoding has happened.

mod mnemonic;
pub mod word;

pub use mnemonic::Mnemonic;

/// One decoded instruction. Immutable once produced by a [`Decoder`].
///
/// `name` is the disassembler spelling and carries the trailing `.` marker
/// for record-form variants (`and.`, `subf.`, …). `operands` has five fixed
/// slots whose meaning is per-mnemonic; unused slots are zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedInstruction {
    pub id: Mnemonic,
    pub name: String,
    /// Formatted operand text, used only for emitted comments.
    pub op_str: String,
    pub operands: [u32; 5],
}

impl DecodedInstruction {
    /// Record-form variants update CR0 (CR6 for vector compares) in addition
    /// to their primary effect.
    pub fn is_record_form(&self) -> bool {
        self.name.contains('.')
    }
}

/// Instruction decoder interface.
///
/// Returns `None` when the word does not decode; the recompiler lowers that
/// to a raw-bytes comment rather than failing the function.
pub trait Decoder {
    fn decode(&self, word: u32, address: u32) -> Option<DecodedInstruction>;
}

/// TO-field bit for the signed less-than trap predicate.
pub const TO_LT: u32 = 0x10;
/// TO-field bit for the signed greater-than trap predicate.
pub const TO_GT: u32 = 0x08;
/// TO-field bit for the equality trap predicate.
pub const TO_EQ: u32 = 0x04;
/// TO-field bit for the unsigned less-than trap predicate.
pub const TO_LLT: u32 = 0x02;
/// TO-field bit for the unsigned greater-than trap predicate.
pub const TO_LGT: u32 = 0x01;

/// Decode the TO condition bits implied by a trap-conditional opcode name
/// (`twllei`, `tdgt`, …). Returns `None` for the generic `tw`/`td`/`twi`/
/// `tdi` spellings, whose TO field travels in the operand array instead.
pub fn trap_condition_bits(name: &str) -> Option<u32> {
    let cond = name
        .strip_prefix("tw")
        .or_else(|| name.strip_prefix("td"))?;
    let cond = cond.strip_suffix('i').unwrap_or(cond);
    match cond {
        "" => None,
        "lt" => Some(TO_LT),
        "le" | "ng" => Some(TO_LT | TO_EQ),
        "eq" => Some(TO_EQ),
        "ge" | "nl" => Some(TO_GT | TO_EQ),
        "gt" => Some(TO_GT),
        "ne" => Some(TO_LT | TO_GT),
        "llt" => Some(TO_LLT),
        "lle" | "lng" => Some(TO_LLT | TO_EQ),
        "lge" | "lnl" => Some(TO_LGT | TO_EQ),
        "lgt" => Some(TO_LGT),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_form_marker() {
        let insn = DecodedInstruction {
            id: Mnemonic::And,
            name: "and.".into(),
            op_str: String::new(),
            operands: [0; 5],
        };
        assert!(insn.is_record_form());
    }

    #[test]
    fn trap_names_decode_to_to_bits() {
        assert_eq!(trap_condition_bits("twllti"), Some(TO_LLT));
        assert_eq!(trap_condition_bits("twlgei"), Some(TO_LGT | TO_EQ));
        assert_eq!(trap_condition_bits("twlnli"), Some(TO_LGT | TO_EQ));
        assert_eq!(trap_condition_bits("tdnei"), Some(TO_LT | TO_GT));
        assert_eq!(trap_condition_bits("tdlle"), Some(TO_LLT | TO_EQ));
        assert_eq!(trap_condition_bits("twge"), Some(TO_GT | TO_EQ));
        // Generic spellings carry TO in the operand array.
        assert_eq!(trap_condition_bits("twi"), None);
        assert_eq!(trap_condition_bits("td"), None);
    }
}
