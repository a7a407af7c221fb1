use std::collections::{HashMap, VecDeque};
use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use crossterm::terminal;
use log::warn;

/// host input after translation into the interpreter's vocabulary: logical
/// key edges, redraw requests and a quit signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(u8),
    KeyUp(u8),
    Redraw,
    Quit,
}

/// reads host input
pub trait Input {
    /// drain whatever arrived since the last poll
    fn poll_events(&mut self) -> io::Result<Vec<InputEvent>>;
}

/// left-hand side of a qwerty keyboard standing in for the hex pad,
/// where 'v' => 0x0f
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00), // x
    ('1', 0x01), // 1
    ('2', 0x02), // 2
    ('3', 0x03), // 3
    ('q', 0x04), // q
    ('w', 0x05), // w
    ('e', 0x06), // e
    ('a', 0x07), // a
    ('s', 0x08), // s
    ('d', 0x09), // d
    ('z', 0x0a), // z
    ('c', 0x0b), // c
    ('4', 0x0c), // 4
    ('r', 0x0d), // r
    ('f', 0x0e), // f
    ('v', 0x0f), // v
];

/// how long a key counts as held after its last press event. Terminals
/// deliver no key-up, so a key is released once auto-repeat stops
/// refreshing it; the window must outlast the host's initial repeat delay.
const KEY_HOLD: Duration = Duration::from_millis(500);

fn io_err(err: crossterm::ErrorKind) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err)
}

/// Terminal implementation of Input, using crossterm events. Owns the
/// terminal's raw mode for its whole lifetime.
pub struct TermInput {
    keymap: HashMap<char, u8>,
    held: HashMap<u8, Instant>,
}

impl TermInput {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode().map_err(io_err)?;
        Ok(TermInput {
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
            held: HashMap::new(),
        })
    }
}

impl Drop for TermInput {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl Input for TermInput {
    fn poll_events(&mut self) -> io::Result<Vec<InputEvent>> {
        let mut events = Vec::new();
        while poll(Duration::from_millis(0)).map_err(io_err)? {
            match read().map_err(io_err)? {
                Event::Key(evt) => match evt.code {
                    KeyCode::Esc => events.push(InputEvent::Quit),
                    KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => {
                        events.push(InputEvent::Quit)
                    }
                    KeyCode::Char(c) => match self.keymap.get(&c) {
                        Some(&key) => {
                            // auto-repeat refreshes the hold window; only the
                            // first press is an edge
                            if self.held.insert(key, Instant::now()).is_none() {
                                events.push(InputEvent::KeyDown(key));
                            }
                        }
                        None => warn!("can't map {:?} to a COSMAC key", c),
                    },
                    _ => {}
                },
                Event::Resize(_, _) => events.push(InputEvent::Redraw),
                _ => {}
            }
        }
        let now = Instant::now();
        self.held.retain(|&key, &mut last_press| {
            if now.duration_since(last_press) >= KEY_HOLD {
                events.push(InputEvent::KeyUp(key));
                false
            } else {
                true
            }
        });
        Ok(events)
    }
}

/// Input implementation that replays canned event batches, one per poll;
/// for testing
pub struct ScriptedInput {
    frames: VecDeque<Vec<InputEvent>>,
}

impl ScriptedInput {
    pub fn new(frames: Vec<Vec<InputEvent>>) -> Self {
        ScriptedInput {
            frames: frames.into(),
        }
    }
}

impl Input for ScriptedInput {
    fn poll_events(&mut self) -> io::Result<Vec<InputEvent>> {
        Ok(self.frames.pop_front().unwrap_or_default())
    }
}
