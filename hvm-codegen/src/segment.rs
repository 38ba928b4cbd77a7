//! Segment addressing
//!
//! Maps a logical `(segment, index)` pair plus the current compilation unit
//! to an addressing recipe. Bounds are checked here, before any code for
//! the instruction is emitted.

use crate::asm::{AsmInst, Comp, Dest};
use crate::layout::{ARG, LCL, MAX_CONSTANT, SCRATCH, STATIC_MAX_INDEX, TEMP_BASE, TEMP_SIZE, THAT, THIS};
use hvm_common::Segment;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{segment} {index} exceeds the maximum index {max}")]
pub struct SegmentBoundsError {
    pub segment: Segment,
    pub index: u16,
    pub max: u16,
}

/// An address that has to be computed into the scratch cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectiveAddress {
    /// `RAM[base] + offset`, base being one of LCL/ARG/THIS/THAT
    Based { base: &'static str, offset: u16 },
    /// A fixed RAM address (temp)
    Absolute(u16),
    /// An assembler variable (static), `Unit.index`
    Symbol(String),
}

impl EffectiveAddress {
    /// Instructions leaving the address in the scratch cell. Clobbers A and D.
    pub fn compute_into_scratch(&self) -> Vec<AsmInst> {
        let mut insts = Vec::new();
        match self {
            EffectiveAddress::Based { base, offset } => {
                insts.push(AsmInst::At(*offset));
                insts.push(AsmInst::assign(Dest::D, Comp::A));
                insts.push(AsmInst::at(base));
                insts.push(AsmInst::assign(Dest::D, Comp::DPlusM));
            }
            EffectiveAddress::Absolute(address) => {
                insts.push(AsmInst::At(*address));
                insts.push(AsmInst::assign(Dest::D, Comp::A));
            }
            EffectiveAddress::Symbol(symbol) => {
                insts.push(AsmInst::at(symbol));
                insts.push(AsmInst::assign(Dest::D, Comp::A));
            }
        }
        insts.push(AsmInst::at(SCRATCH));
        insts.push(AsmInst::assign(Dest::M, Comp::D));
        insts
    }
}

/// How a segment cell is reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressRecipe {
    /// local/argument/this/that/temp/static
    Computed(EffectiveAddress),
    /// pointer 0/1 selects THIS/THAT directly
    Register(&'static str),
    /// constant, push only
    Immediate(u16),
}

/// Resolve `segment index` inside compilation unit `unit`
pub fn resolve(segment: Segment, index: u16, unit: &str) -> Result<AddressRecipe, SegmentBoundsError> {
    let check = |max: u16| {
        if index > max {
            Err(SegmentBoundsError { segment, index, max })
        } else {
            Ok(())
        }
    };

    let recipe = match segment {
        Segment::Local => based(LCL, index),
        Segment::Argument => based(ARG, index),
        Segment::This => based(THIS, index),
        Segment::That => based(THAT, index),
        Segment::Temp => {
            check(TEMP_SIZE - 1)?;
            AddressRecipe::Computed(EffectiveAddress::Absolute(TEMP_BASE + index))
        }
        Segment::Static => {
            check(STATIC_MAX_INDEX)?;
            AddressRecipe::Computed(EffectiveAddress::Symbol(format!("{}.{}", unit, index)))
        }
        Segment::Pointer => {
            check(1)?;
            AddressRecipe::Register(if index == 0 { THIS } else { THAT })
        }
        Segment::Constant => {
            check(MAX_CONSTANT)?;
            AddressRecipe::Immediate(index)
        }
    };
    Ok(recipe)
}

fn based(base: &'static str, offset: u16) -> AddressRecipe {
    AddressRecipe::Computed(EffectiveAddress::Based { base, offset })
}
