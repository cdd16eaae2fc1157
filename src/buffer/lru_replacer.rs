use std::collections::{HashSet, VecDeque};

use parking_lot::Mutex;

use crate::common::FrameId;

struct LruState {
    /// Victim candidates, least-recently-unpinned at the front
    queue: VecDeque<FrameId>,
    /// Membership set mirroring `queue`
    members: HashSet<FrameId>,
}

/// LruReplacer implements the strict least-recently-used replacement
/// policy over unpinned frames.
///
/// A frame becomes a victim candidate when its pin count drops to zero and
/// leaves candidacy when it is pinned again or removed from the pool. The
/// victim is always the frame that was unpinned longest ago.
pub struct LruReplacer {
    state: Mutex<LruState>,
}

impl LruReplacer {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LruState {
                queue: VecDeque::new(),
                members: HashSet::new(),
            }),
        }
    }

    /// Marks a frame as a victim candidate. Re-recording an existing
    /// candidate moves it to the most-recently-unpinned position.
    pub fn record_unpinned(&self, frame_id: FrameId) {
        let mut state = self.state.lock();
        if state.members.contains(&frame_id) {
            state.queue.retain(|&f| f != frame_id);
        } else {
            state.members.insert(frame_id);
        }
        state.queue.push_back(frame_id);
    }

    /// Removes a frame from victim candidacy, e.g. when it is pinned again
    /// or deleted from the pool. A no-op for non-candidates.
    pub fn erase(&self, frame_id: FrameId) {
        let mut state = self.state.lock();
        if state.members.remove(&frame_id) {
            state.queue.retain(|&f| f != frame_id);
        }
    }

    /// Returns and removes the least-recently-unpinned candidate, or None
    /// if no candidate exists.
    pub fn victim(&self) -> Option<FrameId> {
        let mut state = self.state.lock();
        let frame_id = state.queue.pop_front()?;
        state.members.remove(&frame_id);
        Some(frame_id)
    }

    /// Returns the number of current victim candidates.
    pub fn size(&self) -> usize {
        self.state.lock().members.len()
    }
}

impl Default for LruReplacer {
    fn default() -> Self {
        Self::new()
    }
}
