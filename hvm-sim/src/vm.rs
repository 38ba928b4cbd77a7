use crate::constants::*;
use crate::loader::{load_program, Op, Program};
use crate::SimError;
use log::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuState {
    Running,
    Halted,
}

/// The Hack CPU
pub struct Cpu {
    program: Program,

    // Data memory, 32K words
    pub ram: Vec<u16>,

    pub a: u16,
    pub d: u16,
    pub pc: u16,

    pub state: CpuState,
    steps: u64,
}

impl Cpu {
    pub fn new(program: Program) -> Self {
        Self {
            program,
            ram: vec![0; RAM_SIZE],
            a: 0,
            d: 0,
            pc: 0,
            state: CpuState::Running,
            steps: 0,
        }
    }

    pub fn from_source(source: &str) -> Result<Self, SimError> {
        Ok(Self::new(load_program(source)?))
    }

    pub fn is_halted(&self) -> bool {
        self.state == CpuState::Halted
    }

    /// RAM word read as a signed value
    pub fn ram_signed(&self, address: u16) -> i16 {
        self.ram[address as usize] as i16
    }

    /// RAM cell of an assembly symbol (variable or predefined)
    pub fn symbol_value(&self, symbol: &str) -> Option<u16> {
        self.program.symbol(symbol).map(|address| self.ram[address as usize])
    }

    /// Stack contents from the stack base up to SP, bottom first
    pub fn stack(&self) -> &[u16] {
        let base = STACK_BASE as usize;
        let sp = (self.ram[SP_ADDRESS as usize] as usize).clamp(base, RAM_SIZE);
        &self.ram[base..sp]
    }

    fn memory_index(&self, address: u16) -> Result<usize, SimError> {
        let index = address as usize;
        if index >= RAM_SIZE {
            return Err(SimError::MemoryOutOfBounds { address, pc: self.pc });
        }
        Ok(index)
    }

    /// Execute one instruction. Running off the end of ROM, or entering the
    /// `(L) @L 0;JMP` idle loop, halts the CPU.
    pub fn step(&mut self) -> Result<(), SimError> {
        if self.is_halted() {
            return Ok(());
        }
        let op = match self.program.rom.get(self.pc as usize) {
            Some(op) => *op,
            None => {
                self.state = CpuState::Halted;
                return Ok(());
            }
        };
        self.steps += 1;

        match op {
            Op::Load(value) => {
                self.a = value;
                self.pc += 1;
            }
            Op::Compute { dest, comp, jump } => {
                let address = self.a;
                let m = if comp.reads_m() {
                    self.ram[self.memory_index(address)?]
                } else {
                    0
                };
                let out = comp.eval(self.a, self.d, m);

                if let Some(dest) = dest {
                    if dest.writes_m() {
                        let index = self.memory_index(address)?;
                        self.ram[index] = out;
                    }
                    if dest.writes_a() {
                        self.a = out;
                    }
                    if dest.writes_d() {
                        self.d = out;
                    }
                }

                match jump {
                    Some(jump) if jump.taken(out as i16) => {
                        trace!("pc {} jumps to {}", self.pc, address);
                        if self.is_idle_loop(address) {
                            self.state = CpuState::Halted;
                        }
                        self.pc = address;
                    }
                    _ => self.pc += 1,
                }
            }
        }
        Ok(())
    }

    fn is_idle_loop(&self, target: u16) -> bool {
        target.checked_add(1) == Some(self.pc)
            && self.program.rom.get(target as usize) == Some(&Op::Load(target))
    }

    /// Run until halted. Returns the number of instructions executed.
    pub fn run(&mut self, max_steps: u64) -> Result<u64, SimError> {
        let start = self.steps;
        while !self.is_halted() {
            if self.steps - start >= max_steps {
                return Err(SimError::StepLimit(max_steps));
            }
            self.step()?;
        }
        Ok(self.steps - start)
    }
}
