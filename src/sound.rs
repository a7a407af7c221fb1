use std::io;

use beep::beep;

/// The interpreter only ever switches a tone on and off; what it sounds
/// like is the device's business.
pub trait Sound {
    fn beep(&mut self) -> io::Result<()>;
    fn stop(&mut self) -> io::Result<()>;
}

const SIMPLEBEEP_PITCH: u16 = 2093; // C7

/// PC-speaker style tone via the `beep` crate
pub struct SimpleBeep {
    is_beeping: bool,
}

impl SimpleBeep {
    pub fn new() -> Self {
        SimpleBeep { is_beeping: false }
    }
}

impl Sound for SimpleBeep {
    fn beep(&mut self) -> io::Result<()> {
        if self.is_beeping {
            return Ok(());
        }
        beep(SIMPLEBEEP_PITCH).map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        self.is_beeping = true;
        Ok(())
    }

    fn stop(&mut self) -> io::Result<()> {
        if !self.is_beeping {
            return Ok(());
        }
        beep(0).map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        self.is_beeping = false;
        Ok(())
    }
}

impl Drop for SimpleBeep {
    fn drop(&mut self) {
        // the tone outlives the process unless silenced here
        if self.is_beeping {
            let _ = beep(0);
        }
    }
}

pub struct Mute {}
impl Mute {
    pub fn new() -> Self {
        Mute {}
    }
}
impl Sound for Mute {
    fn beep(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn stop(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// counts transitions; useful for testing non-audio routines
pub struct CountingSound {
    pub beeps: usize,
    pub stops: usize,
}

impl CountingSound {
    pub fn new() -> Self {
        CountingSound { beeps: 0, stops: 0 }
    }
}

impl Sound for CountingSound {
    fn beep(&mut self) -> io::Result<()> {
        self.beeps += 1;
        Ok(())
    }

    fn stop(&mut self) -> io::Result<()> {
        self.stops += 1;
        Ok(())
    }
}
