//! Stack instruction sequences shared by the generators

use crate::asm::{AsmInst, Comp, Dest};
use crate::layout::SP;

/// `*SP = D; SP++`
pub(crate) fn push_d(insts: &mut Vec<AsmInst>) {
    insts.push(AsmInst::at(SP));
    insts.push(AsmInst::assign(Dest::A, Comp::M));
    insts.push(AsmInst::assign(Dest::M, Comp::D));
    increment_sp(insts);
}

/// `SP--; D = *SP`, leaving A at the popped cell
pub(crate) fn pop_into_d(insts: &mut Vec<AsmInst>) {
    insts.push(AsmInst::at(SP));
    insts.push(AsmInst::assign(Dest::AM, Comp::MMinusOne));
    insts.push(AsmInst::assign(Dest::D, Comp::M));
}

pub(crate) fn increment_sp(insts: &mut Vec<AsmInst>) {
    insts.push(AsmInst::at(SP));
    insts.push(AsmInst::assign(Dest::M, Comp::MPlusOne));
}

/// Point A at the top of the stack without popping
pub(crate) fn address_top(insts: &mut Vec<AsmInst>) {
    insts.push(AsmInst::at(SP));
    insts.push(AsmInst::assign(Dest::A, Comp::MMinusOne));
}

/// `D = RAM[symbol]; push D`
pub(crate) fn push_register(symbol: &str, insts: &mut Vec<AsmInst>) {
    insts.push(AsmInst::at(symbol));
    insts.push(AsmInst::assign(Dest::D, Comp::M));
    push_d(insts);
}
