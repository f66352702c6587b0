use crate::ghost::Ghost;

/// Broadcasts a power pellet to every ghost. Each ghost then runs its own
/// countdown; a second broadcast restarts the clocks instead of adding to them.
#[derive(Debug, Clone, Copy)]
pub struct ScareController {
    duration: u32,
}

impl ScareController {
    pub fn new(duration: u32) -> Self {
        Self { duration }
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn trigger(&self, ghosts: &mut [Ghost]) {
        for ghost in ghosts.iter_mut() {
            ghost.scare(self.duration);
        }
        tracing::info!(ticks = self.duration, ghosts = ghosts.len(), "ghosts scared");
    }
}
