//! Memory map of the Hack target and reserved symbols

// Virtual registers, by assembler symbol
pub const SP: &str = "SP";
pub const LCL: &str = "LCL";
pub const ARG: &str = "ARG";
pub const THIS: &str = "THIS";
pub const THAT: &str = "THAT";

// ... and by RAM address
pub const SP_ADDRESS: u16 = 0;
pub const LCL_ADDRESS: u16 = 1;
pub const ARG_ADDRESS: u16 = 2;
pub const THIS_ADDRESS: u16 = 3;
pub const THAT_ADDRESS: u16 = 4;

pub const VIRTUAL_REGISTERS: [(&str, u16); 5] = [
    (SP, SP_ADDRESS),
    (LCL, LCL_ADDRESS),
    (ARG, ARG_ADDRESS),
    (THIS, THIS_ADDRESS),
    (THAT, THAT_ADDRESS),
];

// temp segment: RAM[5..=12]
pub const TEMP_BASE: u16 = 5;
pub const TEMP_SIZE: u16 = 8;

// Per-unit static variables are allocated by the assembler from 16 upward
pub const STATIC_BASE: u16 = 16;
pub const STATIC_MAX_INDEX: u16 = 240;

pub const STACK_BASE: u16 = 256;

/// Largest value an A-instruction can load
pub const MAX_CONSTANT: u16 = 0x7FFF;

/// Words pushed by a call in addition to the arguments
pub const FRAME_SIZE: u16 = 5;

/// Scratch cell holding a computed segment address. Not reentrant: no
/// instruction's translation may nest two address computations.
pub const SCRATCH: &str = "R13";

/// Holds LCL of the returning function while its frame is torn down
pub const FRAME: &str = "R14";

/// Holds the return address while the caller's registers are restored
pub const RETURN_ADDRESS: &str = "R15";

/// Default program entry point called by the bootstrap code
pub const DEFAULT_ENTRY_POINT: &str = "Sys.init";
