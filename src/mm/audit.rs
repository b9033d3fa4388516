//! Auditoria de consistência do MM.
//!
//! Recalcula o refcount de cada frame a partir de todas as page tables e
//! compara com o pool. Um `retain`/`release` esquecido em algum caminho
//! corrompe o estado em silêncio; a auditoria é o que o denuncia.

use crate::mm::context::SimulationContext;
use crate::mm::error::{MmError, MmResult};

impl SimulationContext {
    /// Refcounts esperados, contados a partir das PTEs válidas.
    pub fn expected_refcounts(&self) -> MmResult<Vec<u32>> {
        let mut counts = vec![0u32; self.frames.frame_count()];
        for process in self.processes.iter() {
            for (_, pte) in process.table.mappings() {
                let pfn = pte.pfn().ok_or(MmError::CorruptEntry)?;
                let slot = counts
                    .get_mut(pfn.as_usize())
                    .ok_or(MmError::FrameOutOfBounds)?;
                *slot += 1;
            }
        }
        Ok(counts)
    }

    /// Verifica as invariantes de frames e PTEs de todo o sistema.
    ///
    /// - toda PTE inválida está limpa (`CorruptEntry`)
    /// - o refcount de cada frame é exatamente o número de PTEs válidas que
    ///   apontam para ele; em particular, nenhum frame livre é alvo de
    ///   mapeamento (`RefcountMismatch`)
    pub fn check_invariants(&self) -> MmResult<()> {
        for process in self.processes.iter() {
            if let Some(pte) = process.table.entries().find(|pte| !pte.is_consistent()) {
                crate::kerror!("(Audit) pid={}: PTE inconsistente {:?}", process.pid, pte);
                return Err(MmError::CorruptEntry);
            }
        }

        let expected = self.expected_refcounts()?;
        for (frame, want) in self.frames.iter().zip(expected) {
            if frame.ref_count != want {
                crate::kerror!(
                    "(Audit) pfn={}: refcount={} esperado={}",
                    frame.pfn.as_usize(),
                    frame.ref_count,
                    want
                );
                return Err(MmError::RefcountMismatch);
            }
        }

        let used = self.frames.iter().filter(|f| f.ref_count > 0).count();
        if used != self.frames.stats().used_frames {
            crate::kerror!(
                "(Audit) estatística used_frames={} mas {} frames em uso",
                self.frames.stats().used_frames,
                used
            );
            return Err(MmError::RefcountMismatch);
        }

        Ok(())
    }
}
