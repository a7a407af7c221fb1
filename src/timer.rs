use std::time::Duration;

/// 60 Hz decrement threshold
pub const TIMER_TICK: Duration = Duration::from_micros(16_700);

/// The delay/sound countdown pair. Registers decrement on accumulated frame
/// time crossing `TIMER_TICK`, so the effective rate is pinned to the frame
/// cadence and not to how fast instructions happen to run. Accumulators only
/// advance while their register is non-zero, and storing a new value resets
/// the accumulator so the first tick is a full period.
pub struct Timers {
    delay: u8,
    sound: u8,
    delay_acc: Duration,
    sound_acc: Duration,
}

impl Timers {
    pub fn new() -> Self {
        Timers {
            delay: 0,
            sound: 0,
            delay_acc: Duration::ZERO,
            sound_acc: Duration::ZERO,
        }
    }

    pub fn delay(&self) -> u8 {
        self.delay
    }

    pub fn sound(&self) -> u8 {
        self.sound
    }

    pub fn set_delay(&mut self, value: u8) {
        self.delay = value;
        self.delay_acc = Duration::ZERO;
    }

    pub fn set_sound(&mut self, value: u8) {
        self.sound = value;
        self.sound_acc = Duration::ZERO;
    }

    /// advance both accumulators by one frame's worth of time. Returns true
    /// when the sound timer reached zero on this call, i.e. audio should be
    /// switched off.
    pub fn advance(&mut self, frame: Duration) -> bool {
        if self.delay > 0 {
            self.delay_acc += frame;
            if self.delay_acc >= TIMER_TICK {
                self.delay -= 1;
                self.delay_acc = Duration::ZERO;
            }
        }
        let mut sound_expired = false;
        if self.sound > 0 {
            self.sound_acc += frame;
            if self.sound_acc >= TIMER_TICK {
                self.sound -= 1;
                self.sound_acc = Duration::ZERO;
                sound_expired = self.sound == 0;
            }
        }
        sound_expired
    }
}
