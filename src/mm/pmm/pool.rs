//! Pool de frames físicos com contagem de referências.
//!
//! Cada frame conta quantas PTEs apontam para ele. É essa contagem que
//! permite o compartilhamento Copy-on-Write entre processos: o fork
//! incrementa, o COW break e o `free_page` decrementam.
//!
//! ## Política de alocação
//!
//! Varredura linear em ordem crescente; o **menor** PFN livre vence. A ordem
//! é determinística e os testes dependem dela.

use super::frame::{FrameInfo, FrameSnapshot};
use super::stats::PmmStats;
use crate::mm::addr::Pfn;
use crate::mm::error::{MmError, MmResult};

/// Tabela de refcounts de tamanho fixo.
pub struct FramePool {
    frames: Vec<FrameInfo>,
    stats: PmmStats,
}

impl FramePool {
    /// Cria um pool com `frame_count` frames, todos livres.
    pub fn new(frame_count: usize) -> Self {
        Self {
            frames: vec![FrameInfo::new(); frame_count],
            stats: PmmStats::new(frame_count),
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn stats(&self) -> &PmmStats {
        &self.stats
    }

    pub fn free_frames(&self) -> usize {
        self.stats.free_frames()
    }

    /// Refcount atual de `pfn`, ou `None` se fora do pool.
    pub fn refcount(&self, pfn: Pfn) -> Option<u32> {
        self.frames.get(pfn.as_usize()).map(FrameInfo::ref_count)
    }

    /// Itera `(pfn, refcount)` em ordem de PFN.
    pub fn iter(&self) -> impl Iterator<Item = FrameSnapshot> + '_ {
        self.frames
            .iter()
            .enumerate()
            .map(|(index, info)| FrameSnapshot {
                pfn: Pfn::new(index),
                ref_count: info.ref_count(),
            })
    }

    /// Aloca o frame livre de menor número e define seu refcount como 1.
    pub fn allocate_frame(&mut self) -> MmResult<Pfn> {
        let Some(index) = self.frames.iter().position(FrameInfo::is_free) else {
            self.stats.inc_failed();
            crate::kwarn!("(PMM) Sem frames livres ({} em uso)", self.frames.len());
            return Err(MmError::NoFreeFrame);
        };

        self.frames[index].set_ref_count(1);
        self.stats.inc_alloc();
        crate::kdebug!("(PMM) Frame alocado: pfn={}", index);
        Ok(Pfn::new(index))
    }

    /// Incrementa o refcount de um frame em uso (novo mapeamento compartilhado).
    ///
    /// Retorna o novo refcount. Frames livres não podem ser retidos: um
    /// mapeamento só pode compartilhar um frame que já está mapeado.
    pub fn retain(&mut self, pfn: Pfn) -> MmResult<u32> {
        let frame = self.frame_mut(pfn)?;
        if frame.is_free() {
            crate::kerror!("(PMM) retain em frame livre: pfn={}", pfn.as_usize());
            return Err(MmError::FrameFree);
        }
        let count = frame.inc_ref_count();
        crate::ktrace!("(PMM) retain pfn={} -> {}", pfn.as_usize(), count);
        Ok(count)
    }

    /// Decrementa o refcount. Retorna o novo valor.
    ///
    /// Não toca em nenhuma page table: desfazer o mapeamento é
    /// responsabilidade de quem chama.
    pub fn release(&mut self, pfn: Pfn) -> MmResult<u32> {
        let frame = self.frame_mut(pfn)?;
        let Some(count) = frame.dec_ref_count() else {
            crate::kerror!("(PMM) release em frame livre: pfn={}", pfn.as_usize());
            return Err(MmError::RefcountUnderflow);
        };
        if count == 0 {
            self.stats.inc_free();
            crate::kdebug!("(PMM) Frame liberado: pfn={}", pfn.as_usize());
        } else {
            crate::ktrace!("(PMM) release pfn={} -> {}", pfn.as_usize(), count);
        }
        Ok(count)
    }

    fn frame_mut(&mut self, pfn: Pfn) -> MmResult<&mut FrameInfo> {
        self.frames
            .get_mut(pfn.as_usize())
            .ok_or(MmError::FrameOutOfBounds)
    }
}
