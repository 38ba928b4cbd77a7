//! Two-pass symbol resolution of assembly text into ROM
//!
//! The first pass records every `(label)` at the ROM index of the next
//! machine instruction. The second pass resolves `@symbol` against labels,
//! then predefined symbols, and finally allocates a fresh variable cell from
//! `STATIC_BASE` upward in order of first use.

use crate::constants::*;
use crate::SimError;
use hvm_codegen::{AsmInst, Comp, Dest, Jump};
use log::debug;
use std::collections::HashMap;

/// A resolved machine instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Load(u16),
    Compute {
        dest: Option<Dest>,
        comp: Comp,
        jump: Option<Jump>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Program {
    pub rom: Vec<Op>,
    pub symbols: HashMap<String, u16>,
}

impl Program {
    pub fn symbol(&self, name: &str) -> Option<u16> {
        self.symbols.get(name).copied()
    }
}

fn predefined_symbols() -> HashMap<String, u16> {
    let mut symbols = HashMap::new();
    for (name, address) in VIRTUAL_REGISTERS {
        symbols.insert(name.to_string(), address);
    }
    for register in 0..16u16 {
        symbols.insert(format!("R{}", register), register);
    }
    symbols.insert("SCREEN".to_string(), SCREEN);
    symbols.insert("KBD".to_string(), KBD);
    symbols
}

pub fn load_program(source: &str) -> Result<Program, SimError> {
    let mut parsed = Vec::new();
    let mut symbols = predefined_symbols();
    let mut labels = HashMap::new();

    for (index, line) in source.lines().enumerate() {
        let inst = AsmInst::parse_line(line).map_err(|err| SimError::Parse {
            line: index + 1,
            source: err,
        })?;
        match inst {
            Some(AsmInst::Label(name)) => {
                if labels.insert(name.clone(), parsed.len() as u16).is_some() {
                    return Err(SimError::DuplicateLabel(name));
                }
            }
            Some(inst) if inst.is_machine_instruction() => parsed.push(inst),
            _ => {}
        }
    }

    if parsed.len() > ROM_SIZE {
        return Err(SimError::RomOverflow(parsed.len()));
    }
    symbols.extend(labels);

    let mut next_variable = STATIC_BASE;
    let mut rom = Vec::with_capacity(parsed.len());
    for inst in parsed {
        let op = match inst {
            AsmInst::At(value) => Op::Load(value),
            AsmInst::AtSymbol(symbol) => match symbols.get(&symbol) {
                Some(address) => Op::Load(*address),
                None => {
                    let address = next_variable;
                    next_variable += 1;
                    symbols.insert(symbol, address);
                    Op::Load(address)
                }
            },
            AsmInst::Compute { dest, comp, jump } => Op::Compute { dest, comp, jump },
            AsmInst::Label(_) | AsmInst::Comment(_) => continue,
        };
        rom.push(op);
    }

    debug!(
        "Loaded {} instructions, {} variables",
        rom.len(),
        next_variable - STATIC_BASE
    );
    Ok(Program { rom, symbols })
}
