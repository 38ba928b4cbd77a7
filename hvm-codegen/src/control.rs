//! Branching and the call/function/return protocol
//!
//! Frame layout built by `call f n` (stack grows upward):
//!
//! ```text
//! ARG ->  arg 0 .. arg n-1     pushed by the caller
//!         return address
//!         saved LCL
//!         saved ARG
//!         saved THIS
//!         saved THAT
//! LCL ->  local 0 .. local k-1 zeroed by `function f k`
//! ```
//!
//! Labels reaching this module are already scoped; they are emitted as is.

use crate::asm::{AsmInst, Comp, Dest, Jump};
use crate::helpers::{pop_into_d, push_d, push_register};
use crate::layout::{ARG, FRAME, FRAME_SIZE, LCL, RETURN_ADDRESS, SP, STACK_BASE, THAT, THIS};
use log::trace;

pub(crate) fn generate_label(label: &str, insts: &mut Vec<AsmInst>) {
    insts.push(AsmInst::label(label));
}

pub(crate) fn generate_goto(label: &str, insts: &mut Vec<AsmInst>) {
    insts.push(AsmInst::at(label));
    insts.push(AsmInst::jump(Comp::Zero, Jump::Jmp));
}

/// Pop and jump when the popped value is nonzero
pub(crate) fn generate_if_goto(label: &str, insts: &mut Vec<AsmInst>) {
    pop_into_d(insts);
    insts.push(AsmInst::at(label));
    insts.push(AsmInst::jump(Comp::D, Jump::Jne));
}

/// Entry label followed by `nlocals` pushes of constant 0
pub(crate) fn generate_function(name: &str, nlocals: u16, insts: &mut Vec<AsmInst>) {
    insts.push(AsmInst::label(name));
    for _ in 0..nlocals {
        insts.push(AsmInst::At(0));
        insts.push(AsmInst::assign(Dest::D, Comp::A));
        push_d(insts);
    }
}

/// Build the caller frame and transfer control. `return_label` must be
/// unique for the whole run. The caller checks that `FRAME_SIZE + nargs`
/// fits an A-instruction.
pub(crate) fn generate_call(callee: &str, nargs: u16, return_label: &str, insts: &mut Vec<AsmInst>) {
    trace!("call {} {} returning to {}", callee, nargs, return_label);

    insts.push(AsmInst::at(return_label));
    insts.push(AsmInst::assign(Dest::D, Comp::A));
    push_d(insts);

    for register in [LCL, ARG, THIS, THAT] {
        push_register(register, insts);
    }

    // ARG = SP - 5 - nargs
    insts.push(AsmInst::at(SP));
    insts.push(AsmInst::assign(Dest::D, Comp::M));
    insts.push(AsmInst::At(FRAME_SIZE + nargs));
    insts.push(AsmInst::assign(Dest::D, Comp::DMinusA));
    insts.push(AsmInst::at(ARG));
    insts.push(AsmInst::assign(Dest::M, Comp::D));

    // LCL = SP
    insts.push(AsmInst::at(SP));
    insts.push(AsmInst::assign(Dest::D, Comp::M));
    insts.push(AsmInst::at(LCL));
    insts.push(AsmInst::assign(Dest::M, Comp::D));

    generate_goto(callee, insts);
    insts.push(AsmInst::label(return_label));
}

/// Tear down the current frame, leaving the return value where the first
/// argument was, and jump back to the caller.
pub(crate) fn generate_return(insts: &mut Vec<AsmInst>) {
    // frame = LCL
    insts.push(AsmInst::at(LCL));
    insts.push(AsmInst::assign(Dest::D, Comp::M));
    insts.push(AsmInst::at(FRAME));
    insts.push(AsmInst::assign(Dest::M, Comp::D));

    // Return address = *(frame - 5), read before *ARG is overwritten:
    // with no arguments ARG points at the saved return address
    insts.push(AsmInst::At(FRAME_SIZE));
    insts.push(AsmInst::assign(Dest::A, Comp::DMinusA));
    insts.push(AsmInst::assign(Dest::D, Comp::M));
    insts.push(AsmInst::at(RETURN_ADDRESS));
    insts.push(AsmInst::assign(Dest::M, Comp::D));

    // *ARG = *(SP - 1)
    insts.push(AsmInst::at(SP));
    insts.push(AsmInst::assign(Dest::A, Comp::MMinusOne));
    insts.push(AsmInst::assign(Dest::D, Comp::M));
    insts.push(AsmInst::at(ARG));
    insts.push(AsmInst::assign(Dest::A, Comp::M));
    insts.push(AsmInst::assign(Dest::M, Comp::D));

    // SP = ARG + 1
    insts.push(AsmInst::at(ARG));
    insts.push(AsmInst::assign(Dest::D, Comp::MPlusOne));
    insts.push(AsmInst::at(SP));
    insts.push(AsmInst::assign(Dest::M, Comp::D));

    // THAT, THIS, ARG, LCL = *(frame-1), *(frame-2), *(frame-3), *(frame-4)
    for register in [THAT, THIS, ARG, LCL] {
        insts.push(AsmInst::at(FRAME));
        insts.push(AsmInst::assign(Dest::AM, Comp::MMinusOne));
        insts.push(AsmInst::assign(Dest::D, Comp::M));
        insts.push(AsmInst::at(register));
        insts.push(AsmInst::assign(Dest::M, Comp::D));
    }

    insts.push(AsmInst::at(RETURN_ADDRESS));
    insts.push(AsmInst::assign(Dest::A, Comp::M));
    insts.push(AsmInst::jump(Comp::Zero, Jump::Jmp));
}

/// `SP = 256` followed by the call protocol against `entry_point`
pub(crate) fn generate_bootstrap(entry_point: &str, return_label: &str, insts: &mut Vec<AsmInst>) {
    insts.push(AsmInst::At(STACK_BASE));
    insts.push(AsmInst::assign(Dest::D, Comp::A));
    insts.push(AsmInst::at(SP));
    insts.push(AsmInst::assign(Dest::M, Comp::D));
    generate_call(entry_point, 0, return_label, insts);
}
