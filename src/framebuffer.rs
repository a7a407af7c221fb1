/// display width in pixels
pub const WIDTH: usize = 64;

/// display height in pixels
pub const HEIGHT: usize = 32;

/// packed one-bit-per-pixel row stride
const ROW_BYTES: usize = WIDTH / 8;

const FRAME_BYTES: usize = ROW_BYTES * HEIGHT;

/// The 64x32 monochrome pixel grid, packed one bit per pixel with bit 7 the
/// leftmost column of each byte. Pixels only ever toggle through XOR
/// compositing; presentation reads the snapshot and stays out of here.
pub struct Framebuffer {
    pixels: [u8; FRAME_BYTES],
}

impl Framebuffer {
    pub fn new() -> Self {
        Framebuffer {
            pixels: [0; FRAME_BYTES],
        }
    }

    /// every pixel off
    pub fn clear(&mut self) {
        self.pixels = [0; FRAME_BYTES];
    }

    /// XOR one 8-bit sprite row onto the grid at (x, y). Columns past the
    /// right edge are dropped, never wrapped. Returns true if any lit pixel
    /// went dark (the collision signal).
    pub fn draw_row(&mut self, x: usize, y: usize, bits: u8) -> bool {
        if x >= WIDTH || y >= HEIGHT {
            return false;
        }
        let row = y * ROW_BYTES;
        let shift = x % 8;
        let mut collision = false;

        let head = row + x / 8;
        let head_mask = bits >> shift;
        collision |= self.pixels[head] & head_mask != 0;
        self.pixels[head] ^= head_mask;

        // a row at a non-byte-aligned x spills into the next byte, unless
        // that byte is past the right edge
        if shift != 0 && x / 8 + 1 < ROW_BYTES {
            let tail = head + 1;
            let tail_mask = bits << (8 - shift);
            collision |= self.pixels[tail] & tail_mask != 0;
            self.pixels[tail] ^= tail_mask;
        }
        collision
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        if x >= WIDTH || y >= HEIGHT {
            return false;
        }
        self.pixels[y * ROW_BYTES + x / 8] >> (7 - x % 8) & 1 == 1
    }

    /// read-only snapshot of the packed grid
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }
}
