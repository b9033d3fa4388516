//! # Page Fault Handler
//!
//! Alocação sob demanda, liberação e resolução de faults de Copy-on-Write
//! sobre a page table do processo ativo.
//!
//! ## Decisão do fault
//!
//! | PTE                      | refcount | Resultado                          |
//! |--------------------------|----------|------------------------------------|
//! | COW                      | > 1      | frame novo e privado (COW break)   |
//! | COW                      | 1        | só devolve a escrita (sem cópia)   |
//! | qualquer outra           | -        | não resolvido                      |
//!
//! ## Inversão de acesso na alocação
//!
//! `allocate_page` mapeia páginas pedidas para **escrita** como não
//! graváveis e páginas pedidas para **leitura** como graváveis. O
//! comportamento é reproduzido de propósito; quem chama não pode assumir
//! que `AccessType::Write` gera uma PTE gravável.

use crate::mm::addr::{Pfn, Vpn};
use crate::mm::context::SimulationContext;
use crate::mm::error::{MmError, MmResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessType {
    Read,
    Write,
}

impl AccessType {
    #[inline]
    pub fn is_write(&self) -> bool {
        matches!(self, Self::Write)
    }
}

/// Resultado de `handle_page_fault`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultResult {
    /// Frame compartilhado: a entrada ganhou um frame próprio.
    CowCopied { from: Pfn, to: Pfn },
    /// Último dono do frame: escrita devolvida, sem cópia.
    CowReclaimed { pfn: Pfn },
    /// Não é uma situação de COW; decisão fica com quem chamou.
    Unresolved,
}

impl FaultResult {
    #[inline]
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Self::Unresolved)
    }
}

impl SimulationContext {
    /// Aloca o menor frame livre e o mapeia em `vpn` no processo ativo.
    ///
    /// A tabela interna é criada antes da alocação, então continua
    /// existindo mesmo quando o pool está esgotado.
    pub fn allocate_page(&mut self, vpn: Vpn, access: AccessType) -> MmResult<Pfn> {
        let table = self.active_table_mut();
        table.ensure_table(vpn)?;
        if table.entry(vpn)?.is_valid() {
            crate::kerror!("(Fault) allocate_page em vpn já mapeada: {}", vpn.as_usize());
            return Err(MmError::AlreadyMapped);
        }
        self.map_new_frame(vpn, access)
    }

    /// Libera a página mapeada em `vpn`: decrementa o refcount e invalida.
    ///
    /// Retorna o frame que estava mapeado.
    pub fn free_page(&mut self, vpn: Vpn) -> MmResult<Pfn> {
        let table = &mut self.processes.current_mut().table;
        let entry = table.entry(vpn)?;
        if !entry.is_valid() {
            crate::kerror!("(Fault) free_page em vpn não mapeada: {}", vpn.as_usize());
            return Err(MmError::NotMapped);
        }
        let pfn = entry.pfn().ok_or(MmError::CorruptEntry)?;

        self.frames.release(pfn)?;
        table.unmap(vpn)?;
        crate::kdebug!(
            "(Fault) pid={} liberou vpn={} (pfn={})",
            self.processes.current_pid(),
            vpn.as_usize(),
            pfn.as_usize()
        );
        Ok(pfn)
    }

    /// Decide e resolve um fault em `vpn` do processo ativo.
    ///
    /// Tabela interna ausente ou entrada inválida não são COW e retornam
    /// `Unresolved`. Só retorna erro em esgotamento de frames durante o COW
    /// break (estado restaurado) ou em refcounts corrompidos.
    pub fn handle_page_fault(&mut self, vpn: Vpn, access: AccessType) -> MmResult<FaultResult> {
        let pid = self.processes.current_pid();
        let entry = match self.active_table().entry(vpn) {
            Ok(entry) => *entry,
            Err(MmError::TableAbsent) => {
                crate::kwarn!("(Fault) pid={} vpn={}: sem tabela interna", pid, vpn.as_usize());
                return Ok(FaultResult::Unresolved);
            }
            Err(err) => return Err(err),
        };

        if !entry.is_valid() || !entry.is_cow_pending() {
            crate::kwarn!(
                "(Fault) pid={} vpn={} {:?}: não é COW, fault não resolvido",
                pid,
                vpn.as_usize(),
                access
            );
            return Ok(FaultResult::Unresolved);
        }

        let shared = entry.pfn().ok_or(MmError::CorruptEntry)?;
        let refs = self.frames.refcount(shared).ok_or(MmError::FrameOutOfBounds)?;
        match refs {
            0 => {
                crate::kerror!("(Fault) PTE COW aponta para frame livre: pfn={}", shared.as_usize());
                Err(MmError::FrameFree)
            }
            1 => {
                let entry = self.active_table_mut().entry_for(vpn, false)?;
                entry.set_writable(true);
                entry.clear_cow();
                crate::kdebug!(
                    "(Fault) pid={} vpn={}: último dono de pfn={}, escrita devolvida",
                    pid,
                    vpn.as_usize(),
                    shared.as_usize()
                );
                Ok(FaultResult::CowReclaimed { pfn: shared })
            }
            _ => self.break_cow(vpn, shared, access),
        }
    }

    /// COW break: solta o frame compartilhado e mapeia um frame próprio.
    ///
    /// Sem frame livre, o refcount e a PTE voltam ao estado anterior.
    fn break_cow(&mut self, vpn: Vpn, shared: Pfn, access: AccessType) -> MmResult<FaultResult> {
        self.frames.release(shared)?;

        let private = match self.map_new_frame(vpn, access) {
            Ok(pfn) => pfn,
            Err(err) => {
                self.frames.retain(shared)?;
                crate::kwarn!("(Fault) COW break de vpn={} falhou: {}", vpn.as_usize(), err);
                return Err(err);
            }
        };

        // A cópia privada é sempre gravável, independente da inversão.
        let entry = self.active_table_mut().entry_for(vpn, false)?;
        entry.set_writable(true);
        entry.clear_cow();

        crate::kinfo!(
            "(Fault) pid={} COW break vpn={}: pfn={} -> pfn={}",
            self.processes.current_pid(),
            vpn.as_usize(),
            shared.as_usize(),
            private.as_usize()
        );
        Ok(FaultResult::CowCopied {
            from: shared,
            to: private,
        })
    }

    /// Aloca um frame e mapeia `vpn` com a escrita invertida pelo acesso.
    fn map_new_frame(&mut self, vpn: Vpn, access: AccessType) -> MmResult<Pfn> {
        let pfn = self.frames.allocate_frame()?;
        let writable = !access.is_write();

        if let Err(err) = self.active_table_mut().map(vpn, pfn, writable) {
            self.frames.release(pfn)?;
            return Err(err);
        }

        crate::kdebug!(
            "(Fault) pid={} vpn={} -> pfn={} ({:?}, writable={})",
            self.processes.current_pid(),
            vpn.as_usize(),
            pfn.as_usize(),
            access,
            writable
        );
        Ok(pfn)
    }
}
