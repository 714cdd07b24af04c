/// Reveal position into a document of `len` characters.
///
/// Every operation clamps; `0 <= position <= len` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RevealCursor {
    position: usize,
    len: usize,
}

impl RevealCursor {
    pub fn new(len: usize) -> Self {
        Self { position: 0, len }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn advance(&mut self) {
        self.position = (self.position + 1).min(self.len);
    }

    pub fn retreat(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    /// Jump to `floor(len * ratio)`. Out-of-range and NaN ratios clamp.
    pub fn seek_to_ratio(&mut self, ratio: f64) {
        let ratio = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };
        let target = (self.len as f64 * ratio).floor() as usize;
        self.position = target.min(self.len);
    }

    pub fn set_position(&mut self, position: usize) {
        self.position = position.min(self.len);
    }

    pub fn set_to_start(&mut self) {
        self.position = 0;
    }

    pub fn set_to_end(&mut self) {
        self.position = self.len;
    }

    pub fn is_complete(&self) -> bool {
        self.position == self.len
    }

    /// Fraction revealed; 0 for an empty document.
    pub fn progress_ratio(&self) -> f64 {
        if self.len == 0 {
            return 0.0;
        }
        self.position as f64 / self.len as f64
    }

    pub fn progress_percent(&self) -> u32 {
        (self.progress_ratio() * 100.0).round() as u32
    }

    /// Rebind to a document of `len`, keeping the numeric position where possible.
    pub fn resize(&mut self, len: usize) {
        self.len = len;
        self.position = self.position.min(len);
    }
}
