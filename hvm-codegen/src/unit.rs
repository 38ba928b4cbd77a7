//! Translation of one compilation unit
//!
//! Branch labels written in VM code are local to the function that declares
//! them. They are emitted as `Function$label`, or `Unit$label` before the
//! unit's first `function` command.

use crate::asm::AsmInst;
use crate::generator::CodeGenerator;
use crate::naming::scoped_label;
use hvm_common::{Instruction, SourceCommand, TranslateError};
use log::debug;

/// Translate every command of `unit`. The unit's assembly is buffered and
/// only returned once all of it has been generated; the first failure
/// aborts the unit with the failing command's location.
pub fn translate_unit(
    generator: &mut CodeGenerator,
    unit: &str,
    commands: &[SourceCommand],
) -> Result<Vec<AsmInst>, TranslateError> {
    debug!("Translating unit {} ({} commands)", unit, commands.len());

    let mut insts = Vec::new();
    let mut scope = unit.to_string();

    for command in commands {
        let instruction = match &command.instruction {
            Instruction::Function(name, nlocals) => {
                scope = name.clone();
                Instruction::Function(name.clone(), *nlocals)
            }
            Instruction::Label(label) => Instruction::Label(scoped_label(&scope, label)),
            Instruction::Goto(label) => Instruction::Goto(scoped_label(&scope, label)),
            Instruction::IfGoto(label) => Instruction::IfGoto(scoped_label(&scope, label)),
            other => other.clone(),
        };

        if generator.options().emit_comments {
            insts.push(AsmInst::Comment(command.instruction.to_string()));
        }
        generator
            .write_instruction(&instruction, unit, &mut insts)
            .map_err(|e| e.at(command.location.clone()))?;
    }

    Ok(insts)
}
