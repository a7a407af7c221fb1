use std::fmt;
use std::io;
use std::time::{Duration, Instant};

use log::{info, trace, warn};

use crate::display::Display;
use crate::error::{Error, Fault, LoadError};
use crate::framebuffer::{Framebuffer, HEIGHT, WIDTH};
use crate::input::{Input, InputEvent};
use crate::keypad::Keypad;
use crate::memory::{CallStack, Memory, FONT_ADDR, GLYPH_LEN, PROGRAM_ADDR};
use crate::sound::Sound;
use crate::timer::Timers;

/// V[15]: arithmetic carry, subtraction no-borrow, shifted-out bit, sprite
/// collision
const FLAG: usize = 0xf;

/// wall-clock budget for one frame: fetch-execute, host i/o, then sleep
/// out the remainder
pub const FRAME_DURATION: Duration = Duration::from_millis(2);

/// one big-endian instruction word, with accessors for the operand fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode(pub u16);

impl Opcode {
    fn family(self) -> u16 {
        self.0 >> 12
    }

    fn x(self) -> usize {
        ((self.0 >> 8) & 0xf) as usize
    }

    fn y(self) -> usize {
        ((self.0 >> 4) & 0xf) as usize
    }

    fn n(self) -> u8 {
        (self.0 & 0xf) as u8
    }

    fn kk(self) -> u8 {
        (self.0 & 0xff) as u8
    }

    fn nnn(self) -> u16 {
        self.0 & 0xfff
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

/// why the interpreter stopped for good
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Halt {
    /// the program counter ran past the last loaded byte
    ProgramEnded,
    /// the player asked to leave
    UserQuit,
    /// the program did something unrecoverable
    Fault(Fault),
}

impl fmt::Display for Halt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Halt::ProgramEnded => write!(f, "program ended"),
            Halt::UserQuit => write!(f, "quit"),
            Halt::Fault(fault) => write!(f, "{}", fault),
        }
    }
}

/// what the interpreter will do with its next frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// executing one instruction per frame
    Running,
    /// parked by Fx0A until a fresh keypress is released; the key lands in
    /// the named register
    WaitingForKey(usize),
    /// stopped for good
    Halted(Halt),
}

/// The interpreter proper: 4K of RAM, sixteen byte registers, the I and
/// program counter registers, a sixteen-frame call stack and the 64x32
/// frame, marched forward one instruction per frame. Faults halt the
/// machine rather than erroring out; `Err` is reserved for the host end
/// of things (display, input, sound).
pub struct Chip8Interpreter<'a> {
    memory: Memory,
    framebuffer: Framebuffer,
    keypad: Keypad,
    timers: Timers,
    stack: CallStack,
    v: [u8; 16],
    i: u16,
    pc: u16,
    program_end: u16,
    state: State,
    display: &'a mut dyn Display,
    input: &'a mut dyn Input,
    sound: &'a mut dyn Sound,
}

impl<'a> Chip8Interpreter<'a> {
    pub fn new(
        display: &'a mut dyn Display,
        input: &'a mut dyn Input,
        sound: &'a mut dyn Sound,
    ) -> Chip8Interpreter<'a> {
        Chip8Interpreter {
            memory: Memory::new(),
            framebuffer: Framebuffer::new(),
            keypad: Keypad::new(),
            timers: Timers::new(),
            stack: CallStack::new(),
            v: [0; 16],
            i: 0,
            pc: PROGRAM_ADDR,
            program_end: PROGRAM_ADDR,
            state: State::Running,
            display,
            input,
            sound,
        }
    }

    /// load a chip8 program from anything readable
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<(), LoadError> {
        self.program_end = self.memory.load_program(reader)?;
        info!(
            "loaded {} bytes at {:#06x}..{:#06x}",
            self.program_end - PROGRAM_ADDR + 1,
            PROGRAM_ADDR,
            self.program_end
        );
        Ok(())
    }

    /// what the interpreter will do with its next frame
    pub fn state(&self) -> State {
        self.state
    }

    /// the live frame, for frontends beyond the bundled terminal one
    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    /// fetch-execute until the program halts. Each frame runs one
    /// instruction, drains host input, sleeps out the remainder of
    /// `FRAME_DURATION` and advances the timers by it.
    pub fn run(&mut self) -> Result<Halt, Error> {
        self.display.present(&self.framebuffer)?;
        loop {
            let frame_start = Instant::now();
            self.step()?;
            if let State::Halted(halt) = self.state {
                return Ok(halt);
            }
            self.process_input()?;
            if let State::Halted(halt) = self.state {
                return Ok(halt);
            }
            if let Some(remainder) = FRAME_DURATION.checked_sub(frame_start.elapsed()) {
                spin_sleep::sleep(remainder);
            }
            if self.timers.advance(FRAME_DURATION) {
                self.sound.stop()?;
            }
        }
    }

    /// run one instruction, if running. Program faults land in the state
    /// as a halt; only host i/o failures come back as `Err`.
    fn step(&mut self) -> Result<(), Error> {
        if self.state != State::Running {
            return Ok(());
        }
        if self.pc > self.program_end {
            self.state = State::Halted(Halt::ProgramEnded);
            return Ok(());
        }
        let addr = self.pc;
        let op = match self.memory.read_word(addr) {
            Ok(word) => Opcode(word),
            Err(fault) => {
                self.state = State::Halted(Halt::Fault(fault));
                return Ok(());
            }
        };
        trace!("{:#06x}  {}", addr, op);
        self.pc += 2;
        match self.execute(op, addr) {
            Err(Error::Fault(fault)) => {
                self.state = State::Halted(Halt::Fault(fault));
                Ok(())
            }
            other => other,
        }
    }

    /// drain host events into the key latch. A latched press released
    /// while waiting on Fx0A delivers the key and resumes.
    fn process_input(&mut self) -> Result<(), Error> {
        for event in self.input.poll_events()? {
            match event {
                InputEvent::Quit => self.state = State::Halted(Halt::UserQuit),
                InputEvent::Redraw => self.display.present(&self.framebuffer)?,
                InputEvent::KeyDown(key) => {
                    self.keypad.set_key(key, true);
                }
                InputEvent::KeyUp(key) => {
                    if let Some(released) = self.keypad.set_key(key, false) {
                        if let State::WaitingForKey(x) = self.state {
                            self.v[x] = released;
                            self.state = State::Running;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// decode and run one instruction. The program counter has already
    /// moved past it, so skips and jumps work on the next word's address;
    /// `addr` is the instruction's own address, for fault reports.
    fn execute(&mut self, op: Opcode, addr: u16) -> Result<(), Error> {
        match op.family() {
            0x0 => match op.0 {
                0x00e0 => {
                    self.framebuffer.clear();
                    self.display.present(&self.framebuffer)?;
                }
                0x00ee => match self.stack.pop() {
                    Some(ret) => self.pc = ret,
                    None => return Err(Fault::StackUnderflow { addr }.into()),
                },
                // 0nnn machine-code calls target RCA 1802 routines that
                // don't exist here
                _ => self.unknown(op, addr),
            },
            0x1 => self.pc = op.nnn(),
            0x2 => {
                if !self.stack.push(self.pc) {
                    return Err(Fault::StackOverflow { addr }.into());
                }
                self.pc = op.nnn();
            }
            // NB. the comparison families dispatch on the top nibble alone;
            //     the low nibble is ignored, as on the COSMAC VIP
            0x3 => self.skip_if(self.v[op.x()] == op.kk()),
            0x4 => self.skip_if(self.v[op.x()] != op.kk()),
            0x5 => self.skip_if(self.v[op.x()] == self.v[op.y()]),
            0x6 => self.v[op.x()] = op.kk(),
            0x7 => self.v[op.x()] = self.v[op.x()].wrapping_add(op.kk()),
            0x8 => self.alu(op, addr),
            0x9 => self.skip_if(self.v[op.x()] != self.v[op.y()]),
            0xa => self.i = op.nnn(),
            0xb => self.pc = op.nnn() + self.v[0] as u16,
            0xc => self.v[op.x()] = rand::random::<u8>() & op.kk(),
            0xd => self.draw_sprite(op)?,
            0xe => match op.kk() {
                0x9e => self.skip_if(self.keypad.is_pressed(self.v[op.x()])),
                0xa1 => self.skip_if(!self.keypad.is_pressed(self.v[op.x()])),
                _ => self.unknown(op, addr),
            },
            0xf => match op.kk() {
                0x07 => self.v[op.x()] = self.timers.delay(),
                0x0a => {
                    // presses that predate the wait mustn't satisfy it
                    self.keypad.clear();
                    self.state = State::WaitingForKey(op.x());
                }
                0x15 => self.timers.set_delay(self.v[op.x()]),
                0x18 => {
                    let value = self.v[op.x()];
                    self.timers.set_sound(value);
                    if value > 0 {
                        self.sound.beep()?;
                    } else {
                        self.sound.stop()?;
                    }
                }
                0x1e => self.i = self.i.wrapping_add(self.v[op.x()] as u16),
                0x29 => self.i = FONT_ADDR + u16::from(self.v[op.x()]) * GLYPH_LEN,
                0x33 => {
                    let value = self.v[op.x()];
                    self.memory
                        .write(self.i, &[value / 100, value / 10 % 10, value % 10])?;
                }
                0x55 => {
                    let len = op.x() + 1;
                    self.memory.write(self.i, &self.v[..len])?;
                    self.i = self.i.wrapping_add(len as u16);
                }
                0x65 => {
                    let len = op.x() + 1;
                    let data = self.memory.read(self.i, len)?;
                    self.v[..len].copy_from_slice(data);
                    self.i = self.i.wrapping_add(len as u16);
                }
                _ => self.unknown(op, addr),
            },
            _ => self.unknown(op, addr),
        }
        Ok(())
    }

    /// 8xyn arithmetic. Flag writes land after value writes, so ops naming
    /// V[15] as their destination still end up reporting the flag.
    fn alu(&mut self, op: Opcode, addr: u16) {
        let (x, y) = (op.x(), op.y());
        match op.n() {
            0x0 => self.v[x] = self.v[y],
            0x1 => {
                self.v[x] |= self.v[y];
                self.v[FLAG] = 0;
            }
            0x2 => {
                self.v[x] &= self.v[y];
                self.v[FLAG] = 0;
            }
            0x3 => {
                self.v[x] ^= self.v[y];
                self.v[FLAG] = 0;
            }
            0x4 => {
                let (sum, carry) = self.v[x].overflowing_add(self.v[y]);
                self.v[x] = sum;
                self.v[FLAG] = carry as u8;
            }
            0x5 => {
                let no_borrow = (self.v[x] >= self.v[y]) as u8;
                self.v[x] = self.v[x].wrapping_sub(self.v[y]);
                self.v[FLAG] = no_borrow;
            }
            0x6 => {
                let low = self.v[y] & 1;
                self.v[x] = self.v[y] >> 1;
                self.v[FLAG] = low;
            }
            0x7 => {
                let no_borrow = (self.v[y] >= self.v[x]) as u8;
                self.v[x] = self.v[y].wrapping_sub(self.v[x]);
                self.v[FLAG] = no_borrow;
            }
            0xe => {
                let high = self.v[y] >> 7;
                self.v[x] = self.v[y] << 1;
                self.v[FLAG] = high;
            }
            _ => self.unknown(op, addr),
        }
    }

    /// Dxyn: XOR an n-row sprite onto the frame at (V[.x], V[.y]). The
    /// origin wraps onto the frame; rows and columns hanging over the edge
    /// are clipped. V[15] reports whether any lit pixel went dark.
    fn draw_sprite(&mut self, op: Opcode) -> Result<(), Error> {
        let col = self.v[op.x()] as usize % WIDTH;
        let row = self.v[op.y()] as usize % HEIGHT;
        self.v[FLAG] = 0;
        for line in 0..usize::from(op.n()) {
            let y = row + line;
            if y >= HEIGHT {
                break;
            }
            let addr = match self.i.checked_add(line as u16) {
                Some(addr) => addr,
                None => return Err(Fault::InvalidMemoryAccess { addr: self.i }.into()),
            };
            let bits = self.memory.read_byte(addr)?;
            if self.framebuffer.draw_row(col, y, bits) {
                self.v[FLAG] = 1;
            }
        }
        self.display.present(&self.framebuffer)?;
        Ok(())
    }

    fn skip_if(&mut self, condition: bool) {
        if condition {
            self.pc += 2;
        }
    }

    /// opcodes outside the table: log and carry on
    fn unknown(&self, op: Opcode, addr: u16) {
        warn!("unknown opcode {} at {:#06x}", op, addr);
    }
}
