use crate::mm::addr::Pfn;
use std::fmt;

/// Metadados de um frame físico simulado.
///
/// `ref_count` é o número de PTEs (de qualquer processo) que apontam para o
/// frame. Zero significa livre.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInfo {
    ref_count: u32,
}

impl FrameInfo {
    pub const fn new() -> Self {
        Self { ref_count: 0 }
    }

    #[inline]
    pub const fn ref_count(&self) -> u32 {
        self.ref_count
    }

    #[inline]
    pub const fn is_free(&self) -> bool {
        self.ref_count == 0
    }

    #[inline]
    pub const fn is_shared(&self) -> bool {
        self.ref_count > 1
    }

    pub(super) fn set_ref_count(&mut self, count: u32) {
        self.ref_count = count;
    }

    pub(super) fn inc_ref_count(&mut self) -> u32 {
        self.ref_count += 1;
        self.ref_count
    }

    /// Retorna `None` se o refcount já era zero.
    pub(super) fn dec_ref_count(&mut self) -> Option<u32> {
        self.ref_count = self.ref_count.checked_sub(1)?;
        Some(self.ref_count)
    }
}

impl fmt::Debug for FrameInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FrameInfo(ref_count={})", self.ref_count)
    }
}

/// Par `(pfn, refcount)` exposto na inspeção do pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSnapshot {
    pub pfn: Pfn,
    pub ref_count: u32,
}
