/// number of keys on the hex pad
pub const KEY_COUNT: usize = 16;

/// Pressed/released latch for the 16-key pad. The host input collaborator
/// writes transitions in; the skip and wait opcodes read them out. Indices
/// outside the pad are ignored.
pub struct Keypad {
    pressed: [bool; KEY_COUNT],
}

impl Keypad {
    pub fn new() -> Self {
        Keypad {
            pressed: [false; KEY_COUNT],
        }
    }

    /// record a host key transition. Returns the key when a key the latch
    /// holds pressed is released, which is the edge the wait-for-key opcode
    /// resolves on.
    pub fn set_key(&mut self, key: u8, pressed: bool) -> Option<u8> {
        let idx = key as usize;
        if idx >= KEY_COUNT {
            return None;
        }
        let released = self.pressed[idx] && !pressed;
        self.pressed[idx] = pressed;
        if released {
            Some(key)
        } else {
            None
        }
    }

    pub fn is_pressed(&self, key: u8) -> bool {
        let idx = key as usize;
        idx < KEY_COUNT && self.pressed[idx]
    }

    /// release every key. Entering a key wait clears the latch so only
    /// presses observed during the wait can resolve it.
    pub fn clear(&mut self) {
        self.pressed = [false; KEY_COUNT];
    }
}
