use crate::WIDTH;

/// The 20 characters the scan is currently painting, in display order.
///
/// The buffer is the hand-off point between the application and the refresh
/// scan: writers replace its contents wholesale, the scan only ever reads
/// it. A refresh therefore never observes a half-updated line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextBuffer {
    cells: [u8; WIDTH],
}

impl TextBuffer {
    /// All spaces.
    pub const fn new() -> Self {
        TextBuffer {
            cells: [b' '; WIDTH],
        }
    }

    /// Copy up to [`WIDTH`] characters from `text`, padding the remainder
    /// with spaces. Longer input is truncated. Non-ASCII code points cannot
    /// be represented in a cell and are stored as space.
    pub fn set_text(&mut self, text: &str) {
        let mut next = [b' '; WIDTH];
        for (cell, ch) in next.iter_mut().zip(text.chars()) {
            *cell = if ch.is_ascii() { ch as u8 } else { b' ' };
        }
        self.cells = next;
    }

    /// Replace the contents with a prepared line.
    pub fn load(&mut self, cells: [u8; WIDTH]) {
        self.cells = cells;
    }

    pub fn clear(&mut self) {
        self.cells = [b' '; WIDTH];
    }

    /// Character at `index`. Out-of-range reads yield space.
    pub fn cell(&self, index: usize) -> u8 {
        self.cells.get(index).copied().unwrap_or(b' ')
    }

    pub fn as_bytes(&self) -> &[u8; WIDTH] {
        &self.cells
    }

    /// The [`WIDTH`]-cell slice of `message` visible at `offset`: cell `i`
    /// shows the character at message index `offset + i`, positions before
    /// the start or past the end show as space. Scrolling is just repeated
    /// `window` + [`TextBuffer::load`] at the caller's cadence.
    pub fn window(message: &str, offset: i32) -> [u8; WIDTH] {
        let mut cells = [b' '; WIDTH];
        for (i, ch) in message.chars().enumerate() {
            let col = i as i32 - offset;
            if col >= 0 && (col as usize) < WIDTH {
                cells[col as usize] = if ch.is_ascii() { ch as u8 } else { b' ' };
            }
        }
        cells
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        TextBuffer::new()
    }
}
