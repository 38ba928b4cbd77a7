//! push/pop generation

use crate::asm::{AsmInst, Comp, Dest};
use crate::helpers::{pop_into_d, push_d};
use crate::layout::SCRATCH;
use crate::segment::AddressRecipe;

pub(crate) fn generate_push(recipe: &AddressRecipe, insts: &mut Vec<AsmInst>) {
    match recipe {
        AddressRecipe::Immediate(value) => {
            insts.push(AsmInst::At(*value));
            insts.push(AsmInst::assign(Dest::D, Comp::A));
        }
        AddressRecipe::Register(register) => {
            insts.push(AsmInst::at(register));
            insts.push(AsmInst::assign(Dest::D, Comp::M));
        }
        AddressRecipe::Computed(address) => {
            insts.extend(address.compute_into_scratch());
            insts.push(AsmInst::at(SCRATCH));
            insts.push(AsmInst::assign(Dest::A, Comp::M));
            insts.push(AsmInst::assign(Dest::D, Comp::M));
        }
    }
    push_d(insts);
}

/// Callers must reject `Immediate` recipes; there is nowhere to store into.
pub(crate) fn generate_pop(recipe: &AddressRecipe, insts: &mut Vec<AsmInst>) {
    match recipe {
        AddressRecipe::Register(register) => {
            pop_into_d(insts);
            insts.push(AsmInst::at(register));
            insts.push(AsmInst::assign(Dest::M, Comp::D));
        }
        AddressRecipe::Computed(address) => {
            // The address goes to scratch first: computing it clobbers D
            insts.extend(address.compute_into_scratch());
            pop_into_d(insts);
            insts.push(AsmInst::at(SCRATCH));
            insts.push(AsmInst::assign(Dest::A, Comp::M));
            insts.push(AsmInst::assign(Dest::M, Comp::D));
        }
        AddressRecipe::Immediate(_) => {}
    }
}
