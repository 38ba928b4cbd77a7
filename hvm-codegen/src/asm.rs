//! Hack Assembly Instruction Definitions
//!
//! This module defines the instruction forms of the Hack target machine:
//! one address register `A`, one data register `D` and `M`, the memory cell
//! addressed by `A`. The ALU is the standard Hack one extended with the
//! one-bit shift operations `<<` and `>>`.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Destination of a compute instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dest {
    A,
    D,
    M,
    AM,
    AD,
    MD,
    AMD,
}

impl Dest {
    pub fn writes_a(&self) -> bool {
        matches!(self, Dest::A | Dest::AM | Dest::AD | Dest::AMD)
    }

    pub fn writes_d(&self) -> bool {
        matches!(self, Dest::D | Dest::AD | Dest::MD | Dest::AMD)
    }

    pub fn writes_m(&self) -> bool {
        matches!(self, Dest::M | Dest::AM | Dest::MD | Dest::AMD)
    }
}

impl fmt::Display for Dest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Dest::A => "A",
            Dest::D => "D",
            Dest::M => "M",
            Dest::AM => "AM",
            Dest::AD => "AD",
            Dest::MD => "MD",
            Dest::AMD => "AMD",
        };
        write!(f, "{}", text)
    }
}

impl FromStr for Dest {
    type Err = AsmParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Dest::A),
            "D" => Ok(Dest::D),
            "M" => Ok(Dest::M),
            "AM" | "MA" => Ok(Dest::AM),
            "AD" | "DA" => Ok(Dest::AD),
            "MD" | "DM" => Ok(Dest::MD),
            "AMD" | "ADM" | "MAD" | "MDA" | "DAM" | "DMA" => Ok(Dest::AMD),
            _ => Err(AsmParseError::InvalidDest(s.to_string())),
        }
    }
}

/// Jump condition of a compute instruction, tested against the ALU output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Jump {
    Jgt,
    Jeq,
    Jge,
    Jlt,
    Jne,
    Jle,
    Jmp,
}

impl Jump {
    /// Whether the jump is taken for the given ALU output
    pub fn taken(&self, value: i16) -> bool {
        match self {
            Jump::Jgt => value > 0,
            Jump::Jeq => value == 0,
            Jump::Jge => value >= 0,
            Jump::Jlt => value < 0,
            Jump::Jne => value != 0,
            Jump::Jle => value <= 0,
            Jump::Jmp => true,
        }
    }
}

impl fmt::Display for Jump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Jump::Jgt => "JGT",
            Jump::Jeq => "JEQ",
            Jump::Jge => "JGE",
            Jump::Jlt => "JLT",
            Jump::Jne => "JNE",
            Jump::Jle => "JLE",
            Jump::Jmp => "JMP",
        };
        write!(f, "{}", text)
    }
}

impl FromStr for Jump {
    type Err = AsmParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "JGT" => Ok(Jump::Jgt),
            "JEQ" => Ok(Jump::Jeq),
            "JGE" => Ok(Jump::Jge),
            "JLT" => Ok(Jump::Jlt),
            "JNE" => Ok(Jump::Jne),
            "JLE" => Ok(Jump::Jle),
            "JMP" => Ok(Jump::Jmp),
            _ => Err(AsmParseError::InvalidJump(s.to_string())),
        }
    }
}

/// ALU computations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comp {
    Zero,
    One,
    NegOne,
    D,
    A,
    M,
    NotD,
    NotA,
    NotM,
    NegD,
    NegA,
    NegM,
    DPlusOne,
    APlusOne,
    MPlusOne,
    DMinusOne,
    AMinusOne,
    MMinusOne,
    DPlusA,
    DPlusM,
    DMinusA,
    DMinusM,
    AMinusD,
    MMinusD,
    DAndA,
    DAndM,
    DOrA,
    DOrM,
    // Extended ALU
    DShiftLeft,
    AShiftLeft,
    MShiftLeft,
    DShiftRight,
    AShiftRight,
    MShiftRight,
}

impl Comp {
    /// Evaluate the computation on 16-bit words
    pub fn eval(&self, a: u16, d: u16, m: u16) -> u16 {
        match self {
            Comp::Zero => 0,
            Comp::One => 1,
            Comp::NegOne => 0xFFFF,
            Comp::D => d,
            Comp::A => a,
            Comp::M => m,
            Comp::NotD => !d,
            Comp::NotA => !a,
            Comp::NotM => !m,
            Comp::NegD => d.wrapping_neg(),
            Comp::NegA => a.wrapping_neg(),
            Comp::NegM => m.wrapping_neg(),
            Comp::DPlusOne => d.wrapping_add(1),
            Comp::APlusOne => a.wrapping_add(1),
            Comp::MPlusOne => m.wrapping_add(1),
            Comp::DMinusOne => d.wrapping_sub(1),
            Comp::AMinusOne => a.wrapping_sub(1),
            Comp::MMinusOne => m.wrapping_sub(1),
            Comp::DPlusA => d.wrapping_add(a),
            Comp::DPlusM => d.wrapping_add(m),
            Comp::DMinusA => d.wrapping_sub(a),
            Comp::DMinusM => d.wrapping_sub(m),
            Comp::AMinusD => a.wrapping_sub(d),
            Comp::MMinusD => m.wrapping_sub(d),
            Comp::DAndA => d & a,
            Comp::DAndM => d & m,
            Comp::DOrA => d | a,
            Comp::DOrM => d | m,
            Comp::DShiftLeft => d << 1,
            Comp::AShiftLeft => a << 1,
            Comp::MShiftLeft => m << 1,
            // Right shifts are arithmetic (sign preserving)
            Comp::DShiftRight => ((d as i16) >> 1) as u16,
            Comp::AShiftRight => ((a as i16) >> 1) as u16,
            Comp::MShiftRight => ((m as i16) >> 1) as u16,
        }
    }

    /// Whether the computation reads memory
    pub fn reads_m(&self) -> bool {
        matches!(
            self,
            Comp::M
                | Comp::NotM
                | Comp::NegM
                | Comp::MPlusOne
                | Comp::MMinusOne
                | Comp::DPlusM
                | Comp::DMinusM
                | Comp::MMinusD
                | Comp::DAndM
                | Comp::DOrM
                | Comp::MShiftLeft
                | Comp::MShiftRight
        )
    }

    fn text(&self) -> &'static str {
        match self {
            Comp::Zero => "0",
            Comp::One => "1",
            Comp::NegOne => "-1",
            Comp::D => "D",
            Comp::A => "A",
            Comp::M => "M",
            Comp::NotD => "!D",
            Comp::NotA => "!A",
            Comp::NotM => "!M",
            Comp::NegD => "-D",
            Comp::NegA => "-A",
            Comp::NegM => "-M",
            Comp::DPlusOne => "D+1",
            Comp::APlusOne => "A+1",
            Comp::MPlusOne => "M+1",
            Comp::DMinusOne => "D-1",
            Comp::AMinusOne => "A-1",
            Comp::MMinusOne => "M-1",
            Comp::DPlusA => "D+A",
            Comp::DPlusM => "D+M",
            Comp::DMinusA => "D-A",
            Comp::DMinusM => "D-M",
            Comp::AMinusD => "A-D",
            Comp::MMinusD => "M-D",
            Comp::DAndA => "D&A",
            Comp::DAndM => "D&M",
            Comp::DOrA => "D|A",
            Comp::DOrM => "D|M",
            Comp::DShiftLeft => "D<<",
            Comp::AShiftLeft => "A<<",
            Comp::MShiftLeft => "M<<",
            Comp::DShiftRight => "D>>",
            Comp::AShiftRight => "A>>",
            Comp::MShiftRight => "M>>",
        }
    }
}

impl fmt::Display for Comp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

impl FromStr for Comp {
    type Err = AsmParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let comp = match s {
            "0" => Comp::Zero,
            "1" => Comp::One,
            "-1" => Comp::NegOne,
            "D" => Comp::D,
            "A" => Comp::A,
            "M" => Comp::M,
            "!D" => Comp::NotD,
            "!A" => Comp::NotA,
            "!M" => Comp::NotM,
            "-D" => Comp::NegD,
            "-A" => Comp::NegA,
            "-M" => Comp::NegM,
            "D+1" | "1+D" => Comp::DPlusOne,
            "A+1" | "1+A" => Comp::APlusOne,
            "M+1" | "1+M" => Comp::MPlusOne,
            "D-1" => Comp::DMinusOne,
            "A-1" => Comp::AMinusOne,
            "M-1" => Comp::MMinusOne,
            "D+A" | "A+D" => Comp::DPlusA,
            "D+M" | "M+D" => Comp::DPlusM,
            "D-A" => Comp::DMinusA,
            "D-M" => Comp::DMinusM,
            "A-D" => Comp::AMinusD,
            "M-D" => Comp::MMinusD,
            "D&A" | "A&D" => Comp::DAndA,
            "D&M" | "M&D" => Comp::DAndM,
            "D|A" | "A|D" => Comp::DOrA,
            "D|M" | "M|D" => Comp::DOrM,
            "D<<" => Comp::DShiftLeft,
            "A<<" => Comp::AShiftLeft,
            "M<<" => Comp::MShiftLeft,
            "D>>" => Comp::DShiftRight,
            "A>>" => Comp::AShiftRight,
            "M>>" => Comp::MShiftRight,
            _ => return Err(AsmParseError::InvalidComp(s.to_string())),
        };
        Ok(comp)
    }
}

/// Hack Assembly Instructions
///
/// `At*` are A-instructions (`@value`), `Compute` is a C-instruction
/// (`dest=comp;jump`); labels and comments produce no machine word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsmInst {
    At(u16),                      // @value
    AtSymbol(String),             // @symbol
    Compute {
        dest: Option<Dest>,
        comp: Comp,
        jump: Option<Jump>,
    },
    Label(String),                // (label)
    Comment(String),              // // text
}

impl AsmInst {
    pub fn at(symbol: &str) -> Self {
        AsmInst::AtSymbol(symbol.to_string())
    }

    /// `dest=comp`
    pub fn assign(dest: Dest, comp: Comp) -> Self {
        AsmInst::Compute { dest: Some(dest), comp, jump: None }
    }

    /// `comp;jump`
    pub fn jump(comp: Comp, jump: Jump) -> Self {
        AsmInst::Compute { dest: None, comp, jump: Some(jump) }
    }

    pub fn label(name: &str) -> Self {
        AsmInst::Label(name.to_string())
    }

    /// Whether this instruction occupies a word of ROM
    pub fn is_machine_instruction(&self) -> bool {
        matches!(self, AsmInst::At(_) | AsmInst::AtSymbol(_) | AsmInst::Compute { .. })
    }

    /// Parse one line of assembly text. Blank and comment-only lines give
    /// `None`; trailing `//` comments are ignored.
    pub fn parse_line(line: &str) -> Result<Option<AsmInst>, AsmParseError> {
        let code = match line.find("//") {
            Some(pos) => &line[..pos],
            None => line,
        };
        let code: String = code.chars().filter(|c| !c.is_whitespace()).collect();
        if code.is_empty() {
            return Ok(None);
        }

        if let Some(value) = code.strip_prefix('@') {
            if value.is_empty() {
                return Err(AsmParseError::EmptySymbol);
            }
            if value.chars().all(|c| c.is_ascii_digit()) {
                let number = value
                    .parse::<u16>()
                    .ok()
                    .filter(|n| *n <= 0x7FFF)
                    .ok_or_else(|| AsmParseError::InvalidConstant(value.to_string()))?;
                return Ok(Some(AsmInst::At(number)));
            }
            return Ok(Some(AsmInst::AtSymbol(value.to_string())));
        }

        if let Some(rest) = code.strip_prefix('(') {
            let name = rest
                .strip_suffix(')')
                .filter(|n| !n.is_empty())
                .ok_or_else(|| AsmParseError::InvalidLabel(code.clone()))?;
            return Ok(Some(AsmInst::Label(name.to_string())));
        }

        let (dest, rest) = match code.split_once('=') {
            Some((dest, rest)) => (Some(dest.parse::<Dest>()?), rest),
            None => (None, code.as_str()),
        };
        let (comp, jump) = match rest.split_once(';') {
            Some((comp, jump)) => (comp.parse::<Comp>()?, Some(jump.parse::<Jump>()?)),
            None => (rest.parse::<Comp>()?, None),
        };
        Ok(Some(AsmInst::Compute { dest, comp, jump }))
    }
}

impl fmt::Display for AsmInst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsmInst::At(value) => write!(f, "@{}", value),
            AsmInst::AtSymbol(symbol) => write!(f, "@{}", symbol),
            AsmInst::Compute { dest, comp, jump } => {
                if let Some(dest) = dest {
                    write!(f, "{}=", dest)?;
                }
                write!(f, "{}", comp)?;
                if let Some(jump) = jump {
                    write!(f, ";{}", jump)?;
                }
                Ok(())
            }
            AsmInst::Label(label) => write!(f, "({})", label),
            AsmInst::Comment(text) => write!(f, "// {}", text),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmParseError {
    #[error("invalid destination '{0}'")]
    InvalidDest(String),
    #[error("invalid computation '{0}'")]
    InvalidComp(String),
    #[error("invalid jump '{0}'")]
    InvalidJump(String),
    #[error("constant '{0}' does not fit in 15 bits")]
    InvalidConstant(String),
    #[error("malformed label declaration '{0}'")]
    InvalidLabel(String),
    #[error("empty symbol after '@'")]
    EmptySymbol,
}
