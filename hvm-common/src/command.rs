//! VM instruction model
//!
//! One `Instruction` is produced per non-blank, non-comment line of a `.vm`
//! unit. Instructions are immutable once parsed.

use crate::source_loc::SourceLocation;
use std::fmt;

/// Stack arithmetic, logic and comparison operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Neg,
    Eq,
    Gt,
    Lt,
    And,
    Or,
    Not,
    ShiftLeft,
    ShiftRight,
}

impl ArithmeticOp {
    /// Look up an operation by its (lowercase) keyword
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "add" => Some(ArithmeticOp::Add),
            "sub" => Some(ArithmeticOp::Sub),
            "neg" => Some(ArithmeticOp::Neg),
            "eq" => Some(ArithmeticOp::Eq),
            "gt" => Some(ArithmeticOp::Gt),
            "lt" => Some(ArithmeticOp::Lt),
            "and" => Some(ArithmeticOp::And),
            "or" => Some(ArithmeticOp::Or),
            "not" => Some(ArithmeticOp::Not),
            "shiftleft" => Some(ArithmeticOp::ShiftLeft),
            "shiftright" => Some(ArithmeticOp::ShiftRight),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            ArithmeticOp::Add => "add",
            ArithmeticOp::Sub => "sub",
            ArithmeticOp::Neg => "neg",
            ArithmeticOp::Eq => "eq",
            ArithmeticOp::Gt => "gt",
            ArithmeticOp::Lt => "lt",
            ArithmeticOp::And => "and",
            ArithmeticOp::Or => "or",
            ArithmeticOp::Not => "not",
            ArithmeticOp::ShiftLeft => "shiftleft",
            ArithmeticOp::ShiftRight => "shiftright",
        }
    }

    /// Operations that rewrite the top of the stack in place
    pub fn is_unary(&self) -> bool {
        matches!(
            self,
            ArithmeticOp::Neg | ArithmeticOp::Not | ArithmeticOp::ShiftLeft | ArithmeticOp::ShiftRight
        )
    }

    pub fn is_comparison(&self) -> bool {
        matches!(self, ArithmeticOp::Eq | ArithmeticOp::Gt | ArithmeticOp::Lt)
    }
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// Logical memory segments addressable by push/pop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    Argument,
    Local,
    Static,
    Constant,
    This,
    That,
    Pointer,
    Temp,
}

impl Segment {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "argument" => Some(Segment::Argument),
            "local" => Some(Segment::Local),
            "static" => Some(Segment::Static),
            "constant" => Some(Segment::Constant),
            "this" => Some(Segment::This),
            "that" => Some(Segment::That),
            "pointer" => Some(Segment::Pointer),
            "temp" => Some(Segment::Temp),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Segment::Argument => "argument",
            Segment::Local => "local",
            Segment::Static => "static",
            Segment::Constant => "constant",
            Segment::This => "this",
            Segment::That => "that",
            Segment::Pointer => "pointer",
            Segment::Temp => "temp",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// A single VM instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Arithmetic(ArithmeticOp),
    Push(Segment, u16),
    Pop(Segment, u16),
    Label(String),
    Goto(String),
    IfGoto(String),
    /// Callee name and the number of arguments already pushed
    Call(String, u16),
    /// Function name and the number of locals to zero-initialise
    Function(String, u16),
    Return,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Arithmetic(op) => write!(f, "{}", op),
            Instruction::Push(segment, index) => write!(f, "push {} {}", segment, index),
            Instruction::Pop(segment, index) => write!(f, "pop {} {}", segment, index),
            Instruction::Label(name) => write!(f, "label {}", name),
            Instruction::Goto(name) => write!(f, "goto {}", name),
            Instruction::IfGoto(name) => write!(f, "if-goto {}", name),
            Instruction::Call(name, nargs) => write!(f, "call {} {}", name, nargs),
            Instruction::Function(name, nlocals) => write!(f, "function {} {}", name, nlocals),
            Instruction::Return => write!(f, "return"),
        }
    }
}

/// An instruction together with the line it was parsed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCommand {
    pub instruction: Instruction,
    pub location: SourceLocation,
}

impl SourceCommand {
    pub fn new(instruction: Instruction, location: SourceLocation) -> Self {
        Self { instruction, location }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic_keywords() {
        assert_eq!(ArithmeticOp::from_keyword("shiftleft"), Some(ArithmeticOp::ShiftLeft));
        assert_eq!(ArithmeticOp::from_keyword("mul"), None);
        assert!(ArithmeticOp::Neg.is_unary());
        assert!(!ArithmeticOp::Add.is_unary());
        assert!(ArithmeticOp::Lt.is_comparison());
    }

    #[test]
    fn test_instruction_display() {
        assert_eq!(Instruction::Push(Segment::Local, 2).to_string(), "push local 2");
        assert_eq!(Instruction::Call("Math.max".to_string(), 2).to_string(), "call Math.max 2");
        assert_eq!(Instruction::IfGoto("LOOP".to_string()).to_string(), "if-goto LOOP");
        assert_eq!(Instruction::Arithmetic(ArithmeticOp::ShiftRight).to_string(), "shiftright");
        assert_eq!(Instruction::Return.to_string(), "return");
    }
}
