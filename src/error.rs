use std::io;

use thiserror::Error;

/// Fatal machine faults. Any of these leaves the architectural state (stack,
/// memory) with no safe resumption point, so the interpreter halts rather
/// than recovering.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    #[error("stack overflow: call at {addr:#06x} exceeds the fixed call depth")]
    StackOverflow { addr: u16 },

    #[error("stack underflow: return at {addr:#06x} with an empty call stack")]
    StackUnderflow { addr: u16 },

    #[error("invalid memory access at {addr:#06x}")]
    InvalidMemoryAccess { addr: u16 },
}

/// why a program image could not be loaded
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("program image is empty")]
    Empty,

    #[error("program image of {size} bytes does not fit at {base:#06x}")]
    TooLarge { size: usize, base: u16 },

    #[error("program image is unreadable: {0}")]
    Unreadable(#[from] io::Error),
}

/// Everything that can abort a run. Machine faults normally surface as a
/// `Halted` state rather than an error; the `Fault` variant only carries
/// them through the execution plumbing.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Fault(#[from] Fault),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("i/o: {0}")]
    Io(#[from] io::Error),
}
