//! Line-oriented VM instruction parser
//!
//! The parser walks one `.vm` unit a line at a time. Callers advance it,
//! ask for the command type of the current line and read its operands, or
//! let `instruction()` build the typed form in one go. Blank and
//! comment-only lines classify as `CommandType::Null` and must be skipped.

use hvm_common::{ArithmeticOp, Instruction, Segment, SourceCommand, SourceLocation, TranslateError};

/// Classification of the current line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Arithmetic,
    Push,
    Pop,
    Label,
    Goto,
    If,
    Function,
    Return,
    Call,
    /// Blank or comment-only line
    Null,
}

impl CommandType {
    fn from_keyword(keyword: &str) -> Option<Self> {
        if ArithmeticOp::from_keyword(keyword).is_some() {
            return Some(CommandType::Arithmetic);
        }
        match keyword {
            "push" => Some(CommandType::Push),
            "pop" => Some(CommandType::Pop),
            "label" => Some(CommandType::Label),
            "goto" => Some(CommandType::Goto),
            "if-goto" => Some(CommandType::If),
            "function" => Some(CommandType::Function),
            "call" => Some(CommandType::Call),
            "return" => Some(CommandType::Return),
            _ => None,
        }
    }

    /// Number of operands following the keyword
    fn operand_count(&self) -> usize {
        match self {
            CommandType::Arithmetic | CommandType::Return | CommandType::Null => 0,
            CommandType::Label | CommandType::Goto | CommandType::If => 1,
            CommandType::Push | CommandType::Pop | CommandType::Function | CommandType::Call => 2,
        }
    }
}

pub struct Parser {
    unit: String,
    lines: Vec<String>,
    next_line: usize,
    current: Option<usize>,
}

impl Parser {
    /// Prepare to parse `source`, the contents of the unit named `unit`
    pub fn new(source: &str, unit: &str) -> Self {
        Self {
            unit: unit.to_string(),
            lines: source.lines().map(str::to_string).collect(),
            next_line: 0,
            current: None,
        }
    }

    pub fn has_more_commands(&self) -> bool {
        self.next_line < self.lines.len()
    }

    /// Make the next line current. Initially there is no current line.
    /// Calling this past the end leaves the parser where it is.
    pub fn advance(&mut self) {
        if self.has_more_commands() {
            self.current = Some(self.next_line);
            self.next_line += 1;
        }
    }

    /// Location of the current line
    pub fn location(&self) -> SourceLocation {
        let line = self.current.map(|i| i as u32 + 1).unwrap_or(0);
        SourceLocation::new(&self.unit, line)
    }

    fn tokens(&self) -> Vec<&str> {
        let Some(index) = self.current else {
            return Vec::new();
        };
        let line = &self.lines[index];
        let code = match line.find("//") {
            Some(pos) => &line[..pos],
            None => line.as_str(),
        };
        code.split_whitespace().collect()
    }

    fn keyword(&self) -> Option<String> {
        self.tokens().first().map(|k| k.to_ascii_lowercase())
    }

    pub fn command_type(&self) -> Result<CommandType, TranslateError> {
        let Some(keyword) = self.keyword() else {
            return Ok(CommandType::Null);
        };
        CommandType::from_keyword(&keyword)
            .ok_or_else(|| TranslateError::unknown_command(self.tokens()[0], self.location()))
    }

    /// First argument of the current command. For arithmetic commands this
    /// is the (lowercased) operation itself.
    pub fn arg1(&self) -> Result<String, TranslateError> {
        match self.command_type()? {
            CommandType::Arithmetic => Ok(self.keyword().unwrap_or_default()),
            CommandType::Return | CommandType::Null => Err(TranslateError::parse_error(
                "command has no first argument",
                self.location(),
            )),
            _ => self
                .tokens()
                .get(1)
                .map(|s| s.to_string())
                .ok_or_else(|| TranslateError::parse_error("missing first operand", self.location())),
        }
    }

    /// Second (numeric) argument; only push, pop, function and call carry one
    pub fn arg2(&self) -> Result<u16, TranslateError> {
        match self.command_type()? {
            CommandType::Push | CommandType::Pop | CommandType::Function | CommandType::Call => {
                let tokens = self.tokens();
                let raw = tokens
                    .get(2)
                    .ok_or_else(|| TranslateError::parse_error("missing numeric operand", self.location()))?;
                let invalid = || {
                    TranslateError::parse_error(
                        format!("'{}' is not a valid index (expected 0..=65535)", raw),
                        self.location(),
                    )
                };
                if !raw.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid());
                }
                raw.parse::<u16>().map_err(|_| invalid())
            }
            _ => Err(TranslateError::parse_error(
                "command has no second argument",
                self.location(),
            )),
        }
    }

    fn segment(&self) -> Result<Segment, TranslateError> {
        let name = self.arg1()?;
        Segment::from_keyword(&name).ok_or_else(|| {
            TranslateError::parse_error(format!("unknown segment '{}'", name), self.location())
        })
    }

    /// Label or function name operand. Identifiers are letters, digits and
    /// `_ . :`, and may not start with a digit.
    fn identifier(&self) -> Result<String, TranslateError> {
        let name = self.arg1()?;
        if !is_identifier(&name) {
            return Err(TranslateError::parse_error(
                format!("'{}' is not a valid identifier", name),
                self.location(),
            ));
        }
        Ok(name)
    }

    /// Build the typed instruction for the current line, `None` for blank
    /// and comment lines.
    pub fn instruction(&self) -> Result<Option<Instruction>, TranslateError> {
        let kind = self.command_type()?;
        if kind == CommandType::Null {
            return Ok(None);
        }

        let operands = self.tokens().len() - 1;
        if operands > kind.operand_count() {
            return Err(TranslateError::parse_error(
                format!("unexpected operand '{}'", self.tokens()[kind.operand_count() + 1]),
                self.location(),
            ));
        }

        let instruction = match kind {
            CommandType::Arithmetic => {
                let keyword = self.arg1()?;
                let op = ArithmeticOp::from_keyword(&keyword)
                    .ok_or_else(|| TranslateError::unknown_command(&keyword, self.location()))?;
                Instruction::Arithmetic(op)
            }
            CommandType::Push => Instruction::Push(self.segment()?, self.arg2()?),
            CommandType::Pop => {
                let segment = self.segment()?;
                if segment == Segment::Constant {
                    return Err(TranslateError::parse_error(
                        "cannot pop into the constant segment",
                        self.location(),
                    ));
                }
                Instruction::Pop(segment, self.arg2()?)
            }
            CommandType::Label => Instruction::Label(self.identifier()?),
            CommandType::Goto => Instruction::Goto(self.identifier()?),
            CommandType::If => Instruction::IfGoto(self.identifier()?),
            CommandType::Function => Instruction::Function(self.identifier()?, self.arg2()?),
            CommandType::Call => Instruction::Call(self.identifier()?, self.arg2()?),
            CommandType::Return => Instruction::Return,
            CommandType::Null => return Ok(None),
        };

        Ok(Some(instruction))
    }

    /// Parse every remaining line of the unit
    pub fn parse_all(&mut self) -> Result<Vec<SourceCommand>, TranslateError> {
        let mut commands = Vec::new();
        while self.has_more_commands() {
            self.advance();
            if let Some(instruction) = self.instruction()? {
                log::trace!("{}: {}", self.location(), instruction);
                commands.push(SourceCommand::new(instruction, self.location()));
            }
        }
        Ok(commands)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if !c.is_ascii_digit() && is_identifier_char(c) => chars.all(is_identifier_char),
        _ => false,
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ':')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn first(source: &str) -> Parser {
        let mut parser = Parser::new(source, "Test");
        parser.advance();
        parser
    }

    #[test]
    fn test_initially_no_current_line() {
        let parser = Parser::new("add", "Test");
        assert!(parser.has_more_commands());
        assert_eq!(parser.command_type().unwrap(), CommandType::Null);
    }

    #[test]
    fn test_command_types() {
        let source = "add\npush local 1\npop that 2\nlabel L\ngoto L\nif-goto L\nfunction F 2\ncall F 1\nreturn\n// note\n";
        let mut parser = Parser::new(source, "Test");
        let mut kinds = Vec::new();
        while parser.has_more_commands() {
            parser.advance();
            kinds.push(parser.command_type().unwrap());
        }
        assert_eq!(
            kinds,
            vec![
                CommandType::Arithmetic,
                CommandType::Push,
                CommandType::Pop,
                CommandType::Label,
                CommandType::Goto,
                CommandType::If,
                CommandType::Function,
                CommandType::Call,
                CommandType::Return,
                CommandType::Null,
            ]
        );
    }

    #[test]
    fn test_arguments() {
        let parser = first("push argument 3");
        assert_eq!(parser.arg1().unwrap(), "argument");
        assert_eq!(parser.arg2().unwrap(), 3);

        let parser = first("  SUB  ");
        assert_eq!(parser.arg1().unwrap(), "sub");
        assert!(parser.arg2().is_err());
    }

    #[test]
    fn test_inline_comment_and_tabs() {
        let parser = first("\tpush\tconstant 17 // seventeen");
        assert_eq!(
            parser.instruction().unwrap(),
            Some(Instruction::Push(Segment::Constant, 17))
        );
    }

    #[test]
    fn test_shift_keywords_any_case() {
        assert_eq!(
            first("shiftLeft").instruction().unwrap(),
            Some(Instruction::Arithmetic(ArithmeticOp::ShiftLeft))
        );
        assert_eq!(
            first("shiftright").instruction().unwrap(),
            Some(Instruction::Arithmetic(ArithmeticOp::ShiftRight))
        );
    }

    #[test]
    fn test_label_case_preserved() {
        assert_eq!(
            first("label Loop_Start").instruction().unwrap(),
            Some(Instruction::Label("Loop_Start".to_string()))
        );
    }

    #[test]
    fn test_missing_operand_is_parse_error() {
        let err = first("push local").instruction().unwrap_err();
        assert!(matches!(err, TranslateError::ParseError { .. }));

        let err = first("goto").instruction().unwrap_err();
        assert!(matches!(err, TranslateError::ParseError { .. }));
    }

    #[test]
    fn test_trailing_operand_is_parse_error() {
        let err = first("return 1").instruction().unwrap_err();
        assert!(matches!(err, TranslateError::ParseError { .. }));
    }

    #[test]
    fn test_bad_index() {
        let err = first("push local x").instruction().unwrap_err();
        assert!(matches!(err, TranslateError::ParseError { .. }));
        let err = first("push constant 70000").instruction().unwrap_err();
        assert!(matches!(err, TranslateError::ParseError { .. }));
    }

    #[test]
    fn test_signed_index_rejected() {
        let err = first("push constant +5").instruction().unwrap_err();
        assert_eq!(
            err,
            TranslateError::parse_error(
                "'+5' is not a valid index (expected 0..=65535)",
                SourceLocation::new("Test", 1)
            )
        );
        assert!(first("pop local -1").instruction().is_err());
        assert!(first("call F.f +0").instruction().is_err());
    }

    #[test]
    fn test_identifiers_validated() {
        assert_eq!(
            first("function Main.main:x_1 0").instruction().unwrap(),
            Some(Instruction::Function("Main.main:x_1".to_string(), 0))
        );
        for source in ["label a$b", "goto 1ST", "if-goto L-2", "call Foo$ret 0", "function F$ret$0 0"] {
            let err = first(source).instruction().unwrap_err();
            assert!(matches!(err, TranslateError::ParseError { .. }), "{}", source);
        }
    }

    #[test]
    fn test_unknown_segment_and_command() {
        let err = first("push heap 1").instruction().unwrap_err();
        assert!(matches!(err, TranslateError::ParseError { .. }));

        let err = first("mul").instruction().unwrap_err();
        assert_eq!(
            err,
            TranslateError::unknown_command("mul", SourceLocation::new("Test", 1))
        );
    }

    #[test]
    fn test_pop_constant_rejected() {
        let err = first("pop constant 0").instruction().unwrap_err();
        assert!(matches!(err, TranslateError::ParseError { .. }));
    }

    #[test]
    fn test_advance_past_end_is_noop() {
        let mut parser = Parser::new("add", "Test");
        parser.advance();
        parser.advance();
        assert!(!parser.has_more_commands());
        assert_eq!(parser.location().line, 1);
    }
}
