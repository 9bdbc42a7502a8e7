//! RGB frame buffer produced by environment rendering.

/// An RGB8 image of fixed dimensions, stored row-major.
///
/// Frames are produced by [`Env::render`](crate::Env::render), annotated by
/// the episode recorder and consumed by a video encoder. All frames of one
/// episode must share the same dimensions; the encoder enforces this.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Frame {
    /// Creates a frame filled with a single color.
    pub fn filled(width: usize, height: usize, color: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity(width * height * 3);
        for _ in 0..width * height {
            data.extend_from_slice(&color);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Wraps raw RGB8 bytes. The buffer length must be `width * height * 3`.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Self {
        assert_eq!(
            data.len(),
            width * height * 3,
            "raw frame buffer does not match {}x{}",
            width,
            height
        );
        Self {
            width,
            height,
            data,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)` in pixels.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// The underlying RGB8 bytes.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the frame, returning the RGB8 bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Sets one pixel. Out-of-bounds coordinates are ignored.
    pub fn put_pixel(&mut self, x: usize, y: usize, color: [u8; 3]) {
        if x < self.width && y < self.height {
            let i = (y * self.width + x) * 3;
            self.data[i] = color[0];
            self.data[i + 1] = color[1];
            self.data[i + 2] = color[2];
        }
    }

    /// Reads one pixel, or `None` when out of bounds.
    pub fn get_pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x < self.width && y < self.height {
            let i = (y * self.width + x) * 3;
            Some([self.data[i], self.data[i + 1], self.data[i + 2]])
        } else {
            None
        }
    }

    /// Fills the half-open rectangle `[x0, x1) x [y0, y1)`, clamped to the
    /// frame bounds.
    pub fn fill_rect(&mut self, x0: usize, y0: usize, x1: usize, y1: usize, color: [u8; 3]) {
        let x1 = x1.min(self.width);
        let y1 = y1.min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                let i = (y * self.width + x) * 3;
                self.data[i] = color[0];
                self.data[i + 1] = color[1];
                self.data[i + 2] = color[2];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_and_get_pixel() {
        let mut frame = Frame::filled(4, 3, [0, 0, 0]);
        frame.put_pixel(2, 1, [10, 20, 30]);
        assert_eq!(frame.get_pixel(2, 1), Some([10, 20, 30]));
        assert_eq!(frame.get_pixel(0, 0), Some([0, 0, 0]));
        assert_eq!(frame.get_pixel(4, 0), None);
    }

    #[test]
    fn out_of_bounds_put_is_ignored() {
        let mut frame = Frame::filled(2, 2, [1, 1, 1]);
        frame.put_pixel(5, 5, [9, 9, 9]);
        assert!(frame.as_raw().iter().all(|&b| b == 1));
    }

    #[test]
    fn fill_rect_clamps_to_bounds() {
        let mut frame = Frame::filled(3, 3, [0, 0, 0]);
        frame.fill_rect(1, 1, 10, 10, [5, 5, 5]);
        assert_eq!(frame.get_pixel(0, 0), Some([0, 0, 0]));
        assert_eq!(frame.get_pixel(1, 1), Some([5, 5, 5]));
        assert_eq!(frame.get_pixel(2, 2), Some([5, 5, 5]));
    }

    #[test]
    fn raw_roundtrip_keeps_layout() {
        let data: Vec<u8> = (0..2 * 2 * 3).map(|b| b as u8).collect();
        let frame = Frame::from_raw(2, 2, data.clone());
        assert_eq!(frame.dimensions(), (2, 2));
        assert_eq!(frame.into_raw(), data);
    }
}
