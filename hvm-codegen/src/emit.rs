//! Assembly text output

use crate::asm::AsmInst;

/// One instruction per line; labels sit at column 0, everything else is
/// indented. The text always ends with a newline.
pub fn emit_program(insts: &[AsmInst]) -> String {
    let mut output = String::new();
    for inst in insts {
        match inst {
            AsmInst::Label(_) => output.push_str(&inst.to_string()),
            _ => {
                output.push_str("    ");
                output.push_str(&inst.to_string());
            }
        }
        output.push('\n');
    }
    output
}
