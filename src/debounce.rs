use crate::circular_queue::CircularQueue;

/// Number of raw samples that must agree before a gesture flag turns on.
pub const DEBOUNCE_WINDOW: usize = 5;

/// Frame-window debouncer for a noisy boolean gesture signal.
///
/// The flag only turns on once the window is full and every sample in it is
/// `true`; a single `false` turns it off on the same tick.
#[derive(Debug, Clone)]
pub struct Debouncer {
    window: CircularQueue<bool>,
}

impl Debouncer {
    pub fn new(window: usize) -> Self {
        Self {
            window: CircularQueue::with_capacity(window),
        }
    }

    pub fn push(&mut self, sample: bool) -> bool {
        self.window.push(sample);
        self.window.is_full() && self.window.iter().all(|&s| s)
    }

    pub fn clear(&mut self) {
        self.window.clear();
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_WINDOW)
    }
}
