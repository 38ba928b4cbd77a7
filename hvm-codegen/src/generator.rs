//! The code generator of one translation run
//!
//! `CodeGenerator` owns the run's `GeneratorState`. Create one per run and
//! feed it every unit of that run in order; the counters must not be reset
//! between units. Every `write_*` method appends to a caller supplied sink
//! and either emits the whole instruction or nothing.

use crate::arithmetic::{generate_binary, generate_comparison, generate_unary};
use crate::asm::AsmInst;
use crate::control;
use crate::layout::{FRAME_SIZE, MAX_CONSTANT};
use crate::memory::{generate_pop, generate_push};
use crate::naming::GeneratorState;
use crate::segment::{resolve, AddressRecipe, SegmentBoundsError};
use crate::CodegenOptions;
use hvm_common::{ArithmeticOp, Instruction, Segment, SourceLocation, TranslateError};
use log::debug;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodegenError {
    #[error(transparent)]
    SegmentBounds(#[from] SegmentBoundsError),

    #[error("cannot pop into the constant segment")]
    PopConstant,

    #[error("call to {callee} with {nargs} arguments exceeds the addressable frame")]
    TooManyArguments { callee: String, nargs: u16 },
}

impl CodegenError {
    /// Attach the source location of the failing instruction
    pub fn at(self, location: SourceLocation) -> TranslateError {
        match self {
            CodegenError::SegmentBounds(err) => {
                TranslateError::segment_bounds(err.segment, err.index, err.max, location)
            }
            other => TranslateError::parse_error(other.to_string(), location),
        }
    }
}

#[derive(Debug, Default)]
pub struct CodeGenerator {
    state: GeneratorState,
    options: CodegenOptions,
}

impl CodeGenerator {
    pub fn new(options: CodegenOptions) -> Self {
        Self {
            state: GeneratorState::new(),
            options,
        }
    }

    pub fn options(&self) -> &CodegenOptions {
        &self.options
    }

    pub fn state(&self) -> &GeneratorState {
        &self.state
    }

    /// `SP = 256; call <entry point> 0`. Emitted once per program, before
    /// any translated unit.
    pub fn write_bootstrap(&mut self, out: &mut Vec<AsmInst>) {
        let entry_point = self.options.entry_point.clone();
        debug!("Bootstrapping into {}", entry_point);
        let return_label = self.state.next_return_label(&entry_point);
        control::generate_bootstrap(&entry_point, &return_label, out);
    }

    pub fn write_arithmetic(&mut self, op: ArithmeticOp, out: &mut Vec<AsmInst>) {
        if op.is_comparison() {
            let labels = self.state.next_comparison_labels();
            generate_comparison(op, &labels, out);
        } else if op.is_unary() {
            generate_unary(op, out);
        } else {
            generate_binary(op, out);
        }
    }

    pub fn write_push(
        &mut self,
        segment: Segment,
        index: u16,
        unit: &str,
        out: &mut Vec<AsmInst>,
    ) -> Result<(), CodegenError> {
        let recipe = resolve(segment, index, unit)?;
        generate_push(&recipe, out);
        Ok(())
    }

    pub fn write_pop(
        &mut self,
        segment: Segment,
        index: u16,
        unit: &str,
        out: &mut Vec<AsmInst>,
    ) -> Result<(), CodegenError> {
        let recipe = resolve(segment, index, unit)?;
        if let AddressRecipe::Immediate(_) = recipe {
            return Err(CodegenError::PopConstant);
        }
        generate_pop(&recipe, out);
        Ok(())
    }

    pub fn write_label(&mut self, label: &str, out: &mut Vec<AsmInst>) {
        control::generate_label(label, out);
    }

    pub fn write_goto(&mut self, label: &str, out: &mut Vec<AsmInst>) {
        control::generate_goto(label, out);
    }

    pub fn write_if(&mut self, label: &str, out: &mut Vec<AsmInst>) {
        control::generate_if_goto(label, out);
    }

    pub fn write_function(&mut self, name: &str, nlocals: u16, out: &mut Vec<AsmInst>) {
        debug!("function {} with {} locals", name, nlocals);
        control::generate_function(name, nlocals, out);
    }

    /// Call-site arity is not checked against the callee's declaration.
    pub fn write_call(&mut self, callee: &str, nargs: u16, out: &mut Vec<AsmInst>) -> Result<(), CodegenError> {
        if nargs > MAX_CONSTANT - FRAME_SIZE {
            return Err(CodegenError::TooManyArguments {
                callee: callee.to_string(),
                nargs,
            });
        }
        let return_label = self.state.next_return_label(callee);
        control::generate_call(callee, nargs, &return_label, out);
        Ok(())
    }

    /// Assumes an active frame; a stray `return` is not detected.
    pub fn write_return(&mut self, out: &mut Vec<AsmInst>) {
        control::generate_return(out);
    }

    /// Translate one instruction whose branch labels are already scoped
    pub fn write_instruction(
        &mut self,
        instruction: &Instruction,
        unit: &str,
        out: &mut Vec<AsmInst>,
    ) -> Result<(), CodegenError> {
        match instruction {
            Instruction::Arithmetic(op) => self.write_arithmetic(*op, out),
            Instruction::Push(segment, index) => self.write_push(*segment, *index, unit, out)?,
            Instruction::Pop(segment, index) => self.write_pop(*segment, *index, unit, out)?,
            Instruction::Label(label) => self.write_label(label, out),
            Instruction::Goto(label) => self.write_goto(label, out),
            Instruction::IfGoto(label) => self.write_if(label, out),
            Instruction::Function(name, nlocals) => self.write_function(name, *nlocals, out),
            Instruction::Call(callee, nargs) => self.write_call(callee, *nargs, out)?,
            Instruction::Return => self.write_return(out),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparisons_advance_counter_once_each() {
        let mut generator = CodeGenerator::default();
        let mut out = Vec::new();
        generator.write_arithmetic(ArithmeticOp::Eq, &mut out);
        generator.write_arithmetic(ArithmeticOp::Add, &mut out);
        generator.write_arithmetic(ArithmeticOp::Gt, &mut out);
        assert_eq!(generator.state().comparisons(), 2);
        assert_eq!(generator.state().calls(), 0);
    }

    #[test]
    fn test_repeated_calls_get_distinct_return_labels() {
        let mut generator = CodeGenerator::default();
        let mut out = Vec::new();
        generator.write_call("Fib.fib", 1, &mut out).unwrap();
        generator.write_call("Fib.fib", 1, &mut out).unwrap();
        let labels: Vec<&AsmInst> = out.iter().filter(|i| matches!(i, AsmInst::Label(_))).collect();
        assert_eq!(labels, vec![&AsmInst::label("Fib.fib$ret$0"), &AsmInst::label("Fib.fib$ret$1")]);
    }

    #[test]
    fn test_bounds_error_emits_nothing() {
        let mut generator = CodeGenerator::default();
        let mut out = Vec::new();
        let err = generator.write_pop(Segment::Temp, 9, "Main", &mut out).unwrap_err();
        assert!(out.is_empty());
        assert_eq!(
            err.at(SourceLocation::new("Main", 4)),
            TranslateError::segment_bounds(Segment::Temp, 9, 7, SourceLocation::new("Main", 4))
        );
    }

    #[test]
    fn test_pop_constant_rejected() {
        let mut generator = CodeGenerator::default();
        let mut out = Vec::new();
        assert_eq!(
            generator.write_pop(Segment::Constant, 1, "Main", &mut out),
            Err(CodegenError::PopConstant)
        );
        assert!(out.is_empty());
    }

    #[test]
    fn test_call_arity_limit() {
        let mut generator = CodeGenerator::default();
        let mut out = Vec::new();
        assert!(generator.write_call("F.f", 40000, &mut out).is_err());
        assert!(out.is_empty());
        assert_eq!(generator.state().calls(), 0);
    }

    #[test]
    fn test_bootstrap_uses_entry_point() {
        let mut generator = CodeGenerator::new(CodegenOptions {
            entry_point: "Main.start".to_string(),
            ..CodegenOptions::default()
        });
        let mut out = Vec::new();
        generator.write_bootstrap(&mut out);
        assert!(out.contains(&AsmInst::at("Main.start")));
        assert!(out.contains(&AsmInst::label("Main.start$ret$0")));
    }
}
