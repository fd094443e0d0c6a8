use veris_models::{FilterPatch, FilterState};

/// Single owner of the canonical filter state.
///
/// Every mutation replaces the state with a fresh snapshot and bumps the
/// generation counter; readers get plain cloned values. The generation
/// is what lets the session detect that a fetch was launched against a
/// state that no longer exists.
#[derive(Debug, Default)]
pub struct FilterStore {
    state: FilterState,
    generation: u64,
}

impl FilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &FilterState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Merge a patch into the state; returns the new snapshot.
    pub fn merge(&mut self, patch: &FilterPatch) -> FilterState {
        self.state = self.state.merge(patch);
        self.generation += 1;
        self.state.clone()
    }

    /// Clear every filter, viewport included; returns the new snapshot.
    pub fn reset(&mut self) -> FilterState {
        self.state = FilterState::default();
        self.generation += 1;
        self.state.clone()
    }
}
