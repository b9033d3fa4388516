/// Estatísticas do pool de frames.
///
/// O simulador é single-threaded, então contadores simples bastam.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PmmStats {
    pub total_frames: usize,
    pub used_frames: usize,
    pub allocations: usize,
    pub frees: usize,
    pub failed_allocs: usize,
}

impl PmmStats {
    pub const fn new(total_frames: usize) -> Self {
        Self {
            total_frames,
            used_frames: 0,
            allocations: 0,
            frees: 0,
            failed_allocs: 0,
        }
    }

    pub fn inc_alloc(&mut self) {
        self.used_frames += 1;
        self.allocations += 1;
    }

    /// Frame voltou a refcount zero.
    pub fn inc_free(&mut self) {
        self.used_frames = self.used_frames.saturating_sub(1);
        self.frees += 1;
    }

    pub fn inc_failed(&mut self) {
        self.failed_allocs += 1;
    }

    pub fn free_frames(&self) -> usize {
        self.total_frames - self.used_frames
    }
}
