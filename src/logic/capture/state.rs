use crate::logic::dedup::Deduplicator;
use crate::logic::store::SampleStore;

/// Everything one capture session owns. Store and seen-set reset together.
#[derive(Debug, Default)]
pub struct CaptureState {
    pub store: SampleStore,
    pub dedup: Deduplicator,
    /// Bumped by every reset. Exchanges received under an older generation
    /// are dropped without touching the counters.
    generation: u64,
}

impl CaptureState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Count a new exchange and return the generation it belongs to
    pub fn receive(&mut self) -> u64 {
        self.store.note_received();
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    pub fn reset(&mut self) {
        self.store.reset();
        self.dedup.clear();
        self.generation = self.generation.wrapping_add(1);
    }
}
