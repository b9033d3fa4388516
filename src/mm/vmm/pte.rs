//! Page Table Entry.
//!
//! ## Estados de uma PTE
//!
//! ```text
//! Invalid ──allocate_page──▶ Valid/Private
//!    ▲                         │  fork
//!    │ free_page               ▼
//!    └──────────────── Valid/CopyOnWrite (não gravável)
//!                              │  write fault
//!                              ▼
//!                        Valid/Private (gravável, frame próprio)
//! ```

use crate::mm::addr::Pfn;
use bitflags::bitflags;

bitflags! {
    /// Flags de hardware simuladas de uma PTE.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PteFlags: u8 {
        /// Mapeamento presente.
        const VALID    = 1 << 0;
        /// Escrita permitida sem fault.
        const WRITABLE = 1 << 1;
    }
}

/// Situação de compartilhamento do frame de uma PTE.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Sharing {
    /// Frame pertence só a esta entrada (ou o fork ainda não ocorreu).
    #[default]
    Private,
    /// Frame compartilhado por fork; a próxima escrita quebra o COW.
    CopyOnWrite,
}

/// Uma entrada da tabela interna.
///
/// Invariante: se `VALID` não está setado, não há frame, `WRITABLE` está
/// limpo e o compartilhamento é `Private`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageTableEntry {
    flags: PteFlags,
    sharing: Sharing,
    pfn: Option<Pfn>,
}

impl PageTableEntry {
    pub const fn empty() -> Self {
        Self {
            flags: PteFlags::empty(),
            sharing: Sharing::Private,
            pfn: None,
        }
    }

    #[inline]
    pub fn flags(&self) -> PteFlags {
        self.flags
    }

    #[inline]
    pub fn sharing(&self) -> Sharing {
        self.sharing
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.flags.contains(PteFlags::VALID)
    }

    #[inline]
    pub fn is_writable(&self) -> bool {
        self.flags.contains(PteFlags::WRITABLE)
    }

    #[inline]
    pub fn is_cow_pending(&self) -> bool {
        self.sharing == Sharing::CopyOnWrite
    }

    /// Frame mapeado. Só é `Some` em entradas válidas.
    #[inline]
    pub fn pfn(&self) -> Option<Pfn> {
        self.pfn
    }

    /// Mapeia `pfn` e limpa o estado de COW.
    pub fn map(&mut self, pfn: Pfn, writable: bool) {
        self.flags = PteFlags::VALID;
        self.flags.set(PteFlags::WRITABLE, writable);
        self.sharing = Sharing::Private;
        self.pfn = Some(pfn);
    }

    /// Volta ao estado inválido. Retorna o frame que estava mapeado.
    pub fn unmap(&mut self) -> Option<Pfn> {
        let pfn = self.pfn.take();
        *self = Self::empty();
        pfn
    }

    pub fn set_writable(&mut self, writable: bool) {
        self.flags.set(PteFlags::WRITABLE, writable);
    }

    /// Marca como Copy-on-Write: perde a escrita até o próximo fault.
    pub fn mark_cow(&mut self) {
        self.flags.remove(PteFlags::WRITABLE);
        self.sharing = Sharing::CopyOnWrite;
    }

    pub fn clear_cow(&mut self) {
        self.sharing = Sharing::Private;
    }

    /// Cópia para o filho no fork: mesmo frame e compartilhamento, sem escrita.
    pub fn share(&self) -> Self {
        Self {
            flags: self.flags - PteFlags::WRITABLE,
            sharing: self.sharing,
            pfn: self.pfn,
        }
    }

    /// Checa a invariante de entradas inválidas.
    pub fn is_consistent(&self) -> bool {
        if self.is_valid() {
            self.pfn.is_some()
        } else {
            self.flags.is_empty() && self.sharing == Sharing::Private && self.pfn.is_none()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmap_clears_everything() {
        let mut pte = PageTableEntry::empty();
        pte.map(Pfn::new(3), true);
        pte.mark_cow();
        assert_eq!(pte.unmap(), Some(Pfn::new(3)));
        assert_eq!(pte, PageTableEntry::empty());
        assert!(pte.is_consistent());
    }

    #[test]
    fn mark_cow_drops_write_permission() {
        let mut pte = PageTableEntry::empty();
        pte.map(Pfn::new(1), true);
        pte.mark_cow();
        assert!(!pte.is_writable());
        assert!(pte.is_cow_pending());

        let child = pte.share();
        assert_eq!(child.pfn(), Some(Pfn::new(1)));
        assert!(child.is_cow_pending());
        assert!(!child.is_writable());
    }
}
