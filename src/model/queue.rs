//! Play queue with a stable original order and a shuffle overlay

use rand::Rng;
use rand::seq::SliceRandom;

use super::types::{SongId, Track};

/// Ordered tracks eligible for playback.
///
/// `items` is the traversal order (possibly shuffled), `original` the order the
/// queue was loaded in. `index` always points into `items` when it is non-empty.
#[derive(Clone, Debug, Default)]
pub struct PlayQueue {
    items: Vec<Track>,
    original: Vec<Track>,
    index: usize,
    shuffled: bool,
}

impl PlayQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole queue. The shuffle flag is kept as is; the new items
    /// start out in their given order.
    pub fn replace(&mut self, tracks: Vec<Track>, index: usize) {
        self.original = tracks.clone();
        self.items = tracks;
        self.index = index.min(self.items.len().saturating_sub(1));
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.original.clear();
        self.index = 0;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn items(&self) -> &[Track] {
        &self.items
    }

    #[cfg(test)]
    pub fn original(&self) -> &[Track] {
        &self.original
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffled
    }

    pub fn current(&self) -> Option<&Track> {
        self.items.get(self.index)
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 >= self.items.len()
    }

    /// Move to `index`; out-of-range positions are ignored.
    pub fn set_index(&mut self, index: usize) -> bool {
        if index < self.items.len() {
            self.index = index;
            true
        } else {
            false
        }
    }

    /// Advance one step, wrapping at the end. Under shuffle a random other
    /// position is picked instead.
    pub fn step_forward<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&Track> {
        if self.items.is_empty() {
            return None;
        }
        self.index = if self.shuffled {
            self.random_other_index(rng)
        } else {
            (self.index + 1) % self.items.len()
        };
        self.current()
    }

    /// Go back one step, wrapping at the start. Under shuffle a random other
    /// position is picked instead.
    pub fn step_back<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&Track> {
        if self.items.is_empty() {
            return None;
        }
        let len = self.items.len();
        self.index = if self.shuffled {
            self.random_other_index(rng)
        } else {
            (self.index + len - 1) % len
        };
        self.current()
    }

    fn random_other_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let len = self.items.len();
        if len <= 1 {
            return 0;
        }
        // Draw from the len - 1 other slots and skip over the current one
        let pick = rng.gen_range(0..len - 1);
        if pick >= self.index { pick + 1 } else { pick }
    }

    /// Turn shuffle on: the current track moves to the front and the rest is
    /// shuffled behind it.
    pub fn shuffle_keeping_current<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.shuffled = true;
        if self.items.is_empty() {
            return;
        }
        let current = self.items.remove(self.index);
        self.items.shuffle(rng);
        self.items.insert(0, current);
        self.index = 0;
    }

    /// Turn shuffle off and go back to the original order, keeping the cursor
    /// on the playing track. Falls back to the first position when that track
    /// is not part of the original order.
    pub fn restore_original(&mut self) {
        self.shuffled = false;
        if self.original.is_empty() {
            return;
        }
        let current_id = self.current().map(|t| t.id);
        self.items = self.original.clone();
        self.index = current_id
            .and_then(|id| self.items.iter().position(|t| t.id == id))
            .unwrap_or(0);
    }

    /// Mirror a favorite flag into every copy of the song
    pub fn set_favorite(&mut self, song_id: SongId, is_favorite: bool) -> bool {
        let mut found = false;
        for track in self.items.iter_mut().chain(self.original.iter_mut()) {
            if track.id == song_id {
                track.is_favorite = is_favorite;
                found = true;
            }
        }
        found
    }
}
