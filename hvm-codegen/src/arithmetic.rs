//! Arithmetic, logic and comparison generation
//!
//! Binary operations pop Y and combine it into X in place. Unary ones
//! rewrite the top cell. Comparisons follow the sign-split algorithm below,
//! which is exact over the whole 16-bit range: a single `X - Y` would
//! overflow for operands of opposite sign (e.g. 32767 and -32768).

use crate::asm::{AsmInst, Comp, Dest, Jump};
use crate::helpers::{address_top, pop_into_d, push_d};
use crate::layout::SP;
use crate::naming::ComparisonLabels;
use hvm_common::ArithmeticOp;

/// add, sub, and, or: net effect one pop
pub(crate) fn generate_binary(op: ArithmeticOp, insts: &mut Vec<AsmInst>) {
    let comp = match op {
        ArithmeticOp::Add => Comp::DPlusM,
        ArithmeticOp::Sub => Comp::MMinusD,
        ArithmeticOp::And => Comp::DAndM,
        ArithmeticOp::Or => Comp::DOrM,
        _ => unreachable!("{} is not a binary stack operation", op),
    };
    pop_into_d(insts);
    insts.push(AsmInst::assign(Dest::A, Comp::AMinusOne));
    insts.push(AsmInst::assign(Dest::M, comp));
}

/// neg, not, shiftleft, shiftright: SP unchanged
pub(crate) fn generate_unary(op: ArithmeticOp, insts: &mut Vec<AsmInst>) {
    let comp = match op {
        ArithmeticOp::Neg => Comp::NegM,
        ArithmeticOp::Not => Comp::NotM,
        ArithmeticOp::ShiftLeft => Comp::MShiftLeft,
        ArithmeticOp::ShiftRight => Comp::MShiftRight,
        _ => unreachable!("{} is not a unary stack operation", op),
    };
    address_top(insts);
    insts.push(AsmInst::assign(Dest::M, comp));
}

/// eq, lt, gt: pops Y then X, pushes -1 (true) or 0 (false)
///
/// ```text
/// Y >= 0, X <  0   ->  D = -1         (X < Y)
/// Y >= 0, X >= 0   ->  D = X - Y
/// Y <  0, X >= 0   ->  D = 1          (X > Y)
/// Y <  0, X <  0   ->  D = X - Y
/// ```
/// Same-sign subtraction cannot overflow, so D always has the sign of
/// `X - Y` taken over the integers.
pub(crate) fn generate_comparison(op: ArithmeticOp, labels: &ComparisonLabels, insts: &mut Vec<AsmInst>) {
    let relation = match op {
        ArithmeticOp::Eq => Jump::Jeq,
        ArithmeticOp::Lt => Jump::Jlt,
        ArithmeticOp::Gt => Jump::Jgt,
        _ => unreachable!("{} is not a comparison", op),
    };

    // Pop Y and branch on its sign
    pop_into_d(insts);
    insts.push(AsmInst::at(&labels.y_non_negative));
    insts.push(AsmInst::jump(Comp::D, Jump::Jge));

    // Y < 0: pop X
    pop_into_d(insts);
    insts.push(AsmInst::at(&labels.x_above));
    insts.push(AsmInst::jump(Comp::D, Jump::Jge));
    subtract_y(&labels.classify, insts);

    insts.push(AsmInst::label(&labels.x_above));
    insts.push(AsmInst::assign(Dest::D, Comp::One));
    jump_to(&labels.classify, insts);

    // Y >= 0: pop X
    insts.push(AsmInst::label(&labels.y_non_negative));
    pop_into_d(insts);
    insts.push(AsmInst::at(&labels.both_non_negative));
    insts.push(AsmInst::jump(Comp::D, Jump::Jge));
    insts.push(AsmInst::assign(Dest::D, Comp::NegOne));
    jump_to(&labels.classify, insts);

    insts.push(AsmInst::label(&labels.both_non_negative));
    subtract_y(&labels.classify, insts);

    // D carries the sign of X - Y
    insts.push(AsmInst::label(&labels.classify));
    insts.push(AsmInst::at(&labels.when_true));
    insts.push(AsmInst::jump(Comp::D, relation));
    insts.push(AsmInst::assign(Dest::D, Comp::Zero));
    jump_to(&labels.done, insts);
    insts.push(AsmInst::label(&labels.when_true));
    insts.push(AsmInst::assign(Dest::D, Comp::NegOne));
    insts.push(AsmInst::label(&labels.done));
    push_d(insts);
}

/// With X in D and SP pointing at X (Y one cell above): `D = X - Y`
fn subtract_y(classify: &str, insts: &mut Vec<AsmInst>) {
    insts.push(AsmInst::at(SP));
    insts.push(AsmInst::assign(Dest::A, Comp::MPlusOne));
    insts.push(AsmInst::assign(Dest::D, Comp::DMinusM));
    jump_to(classify, insts);
}

fn jump_to(label: &str, insts: &mut Vec<AsmInst>) {
    insts.push(AsmInst::at(label));
    insts.push(AsmInst::jump(Comp::Zero, Jump::Jmp));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::GeneratorState;

    fn render(insts: &[AsmInst]) -> Vec<String> {
        insts.iter().map(|i| i.to_string()).collect()
    }

    #[test]
    fn test_add() {
        let mut insts = Vec::new();
        generate_binary(ArithmeticOp::Add, &mut insts);
        assert_eq!(render(&insts), vec!["@SP", "AM=M-1", "D=M", "A=A-1", "M=D+M"]);
    }

    #[test]
    fn test_sub_is_x_minus_y() {
        let mut insts = Vec::new();
        generate_binary(ArithmeticOp::Sub, &mut insts);
        assert_eq!(insts.last().unwrap().to_string(), "M=M-D");
    }

    #[test]
    fn test_unary_ops() {
        let mut insts = Vec::new();
        generate_unary(ArithmeticOp::ShiftLeft, &mut insts);
        assert_eq!(render(&insts), vec!["@SP", "A=M-1", "M=M<<"]);
    }

    #[test]
    fn test_comparison_never_subtracts_mixed_signs() {
        let mut state = GeneratorState::new();
        let labels = state.next_comparison_labels();
        let mut insts = Vec::new();
        generate_comparison(ArithmeticOp::Lt, &labels, &mut insts);

        let text = render(&insts);
        // Exactly two subtractions, one per same-sign path
        assert_eq!(text.iter().filter(|l| *l == "D=D-M").count(), 2);
        assert!(text.contains(&"D;JLT".to_string()));
        assert!(text.contains(&format!("({})", labels.x_above)));
        assert_eq!(text.last().unwrap(), "M=M+1");
    }
}
