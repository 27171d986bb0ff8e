use std::fmt;

/// All runtime failures this emulator can report. Every variant is fatal —
/// there is no recoverable interpreter error once a ROM has loaded (spec §7).
#[derive(Debug)]
pub enum FatalError {
    RomNotFound {
        path: String,
        source: std::io::Error,
    },
    RomSize {
        expected: usize,
        found: usize,
    },
    SaveNotReadable {
        path: String,
        source: std::io::Error,
    },
    SaveSize {
        expected: usize,
        found: usize,
    },
    SaveCorrupted,
    SaveWrite(std::io::Error),
    UnknownOpcode {
        opcode: u8,
        pc: u16,
    },
    TerminalIo(std::io::Error),
    JoystickInit(std::io::Error),
    ArgParse(String),
}

impl std::error::Error for FatalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FatalError::RomNotFound { source, .. } => Some(source),
            FatalError::SaveNotReadable { source, .. } => Some(source),
            FatalError::TerminalIo(e) => Some(e),
            FatalError::JoystickInit(e) => Some(e),
            FatalError::SaveWrite(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for FatalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FatalError::RomNotFound { path, source } => {
                write!(f, "failed to read ROM file '{path}': {source}")
            }
            FatalError::RomSize { expected, found } => {
                write!(f, "unexpected ROM size: expected {expected} bytes, found {found}")
            }
            FatalError::SaveNotReadable { path, source } => {
                write!(f, "failed to read save file '{path}': {source}")
            }
            FatalError::SaveSize { expected, found } => {
                write!(f, "unexpected save size: expected {expected} bytes, found {found}")
            }
            FatalError::SaveCorrupted => write!(f, "save state is corrupted"),
            FatalError::SaveWrite(e) => write!(f, "failed to write save file: {e}"),
            FatalError::UnknownOpcode { opcode, pc } => {
                write!(f, "unknown opcode {opcode:#04x} at pc {pc:#05x}")
            }
            FatalError::TerminalIo(e) => write!(f, "terminal I/O error: {e}"),
            FatalError::JoystickInit(e) => write!(f, "failed to query joystick device: {e}"),
            FatalError::ArgParse(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<lexopt::Error> for FatalError {
    fn from(e: lexopt::Error) -> Self {
        FatalError::ArgParse(e.to_string())
    }
}
