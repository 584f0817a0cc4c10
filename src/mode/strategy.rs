use crate::queue::QueueManager;
use crate::track::TrackRef;

use super::PlayModeStrategy;

#[derive(Debug, Default)]
pub struct SequentialMode;

impl PlayModeStrategy for SequentialMode {
    fn next_track(&mut self, queue: &mut QueueManager) -> Option<TrackRef> {
        queue.next()
    }

    fn previous_track(&mut self, queue: &mut QueueManager) -> Option<TrackRef> {
        queue.previous()
    }
}

/// Both directions return the current track; the cursor never moves.
#[derive(Debug, Default)]
pub struct RepeatOneMode;

impl PlayModeStrategy for RepeatOneMode {
    fn next_track(&mut self, queue: &mut QueueManager) -> Option<TrackRef> {
        queue.current()
    }

    fn previous_track(&mut self, queue: &mut QueueManager) -> Option<TrackRef> {
        queue.current()
    }
}

/// Advances only while a later track exists; going back still wraps.
#[derive(Debug, Default)]
pub struct StopAfterCurrentMode;

impl PlayModeStrategy for StopAfterCurrentMode {
    fn next_track(&mut self, queue: &mut QueueManager) -> Option<TrackRef> {
        if queue.has_next() {
            queue.next()
        } else {
            None
        }
    }

    fn previous_track(&mut self, queue: &mut QueueManager) -> Option<TrackRef> {
        queue.previous()
    }
}
