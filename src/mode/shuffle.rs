use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::queue::QueueManager;
use crate::track::TrackRef;

use super::PlayModeStrategy;

/// Walks a random permutation of the queue indices.
///
/// The permutation is rebuilt whenever its length no longer matches the
/// queue, which keeps it in sync after `set_queue`/`add_to_queue` without
/// any notification from the queue.
pub struct ShuffleMode {
    rng: StdRng,
    order: Vec<usize>,
    // Position of the last drawn entry in `order`; `None` before the first draw.
    pos: Option<usize>,
}

impl ShuffleMode {
    pub fn new(rng: StdRng) -> Self {
        Self {
            rng,
            order: Vec::new(),
            pos: None,
        }
    }

    /// Current permutation of queue indices.
    #[cfg(test)]
    pub(crate) fn order(&self) -> &[usize] {
        &self.order
    }

    fn reshuffle(&mut self, len: usize) {
        self.order = (0..len).collect();
        self.order.shuffle(&mut self.rng);
        self.pos = None;
    }

    fn sync(&mut self, queue: &QueueManager) {
        if self.order.is_empty() || self.order.len() != queue.len() {
            self.reshuffle(queue.len());
        }
    }

    fn apply(&self, queue: &mut QueueManager, pos: usize) -> Option<TrackRef> {
        queue.set_current_index(self.order[pos]);
        queue.current()
    }
}

impl PlayModeStrategy for ShuffleMode {
    fn next_track(&mut self, queue: &mut QueueManager) -> Option<TrackRef> {
        self.sync(queue);
        if self.order.is_empty() {
            return None;
        }

        let len = self.order.len();
        let pos = self.pos.map_or(0, |p| (p + 1) % len);
        self.pos = Some(pos);
        self.apply(queue, pos)
    }

    fn previous_track(&mut self, queue: &mut QueueManager) -> Option<TrackRef> {
        self.sync(queue);
        if self.order.is_empty() {
            return None;
        }

        let len = self.order.len();
        let pos = self.pos.map_or(len - 1, |p| (p + len - 1) % len);
        self.pos = Some(pos);
        self.apply(queue, pos)
    }

    fn prime(&mut self, queue: &QueueManager) {
        self.reshuffle(queue.len());
    }
}
