//! Page Table de dois níveis.
//!
//! O diretório externo guarda índices opcionais para uma arena de tabelas
//! internas, em vez de ponteiros. Clonar a tabela no fork é só copiar
//! valores; não existe aliasing entre a tabela do pai e a do filho.
//!
//! ```text
//! directory[outer] ──▶ Some(i) ──▶ tables[i].entries[inner] = PTE
//!                 └──▶ None     (tabela interna nunca criada)
//! ```
//!
//! Tabelas internas são criadas sob demanda e nunca são removidas, mesmo
//! quando todas as suas entradas ficam inválidas.

use super::pte::PageTableEntry;
use crate::mm::addr::{compose, decompose, Pfn, Vpn};
use crate::mm::config::VmConfig;
use crate::mm::error::{MmError, MmResult};
use crate::mm::pmm::FramePool;
use std::fmt;

/// Tabela interna: `inner_count` PTEs.
#[derive(Debug, Clone)]
struct InnerTable {
    entries: Box<[PageTableEntry]>,
}

impl InnerTable {
    fn new(inner_count: usize) -> Self {
        Self {
            entries: vec![PageTableEntry::empty(); inner_count].into_boxed_slice(),
        }
    }
}

/// Page table de um processo.
#[derive(Debug, Clone)]
pub struct PageTable {
    inner_count: usize,
    directory: Vec<Option<usize>>,
    tables: Vec<InnerTable>,
}

impl PageTable {
    pub fn new(config: &VmConfig) -> Self {
        Self {
            inner_count: config.inner_count,
            directory: vec![None; config.outer_count],
            tables: Vec::new(),
        }
    }

    pub fn outer_count(&self) -> usize {
        self.directory.len()
    }

    pub fn inner_count(&self) -> usize {
        self.inner_count
    }

    /// Número de tabelas internas já criadas.
    pub fn present_tables(&self) -> usize {
        self.tables.len()
    }

    /// `(outer, inner)` da VPN, validando o intervalo.
    pub fn decompose(&self, vpn: Vpn) -> MmResult<(usize, usize)> {
        let (outer, inner) = decompose(vpn, self.inner_count);
        if outer >= self.directory.len() {
            return Err(MmError::VpnOutOfRange);
        }
        Ok((outer, inner))
    }

    /// Garante que a tabela interna da VPN exista.
    pub fn ensure_table(&mut self, vpn: Vpn) -> MmResult<()> {
        let (outer, _) = self.decompose(vpn)?;
        self.table_index_or_create(outer);
        Ok(())
    }

    /// Há tabela interna para a VPN?
    pub fn has_table(&self, vpn: Vpn) -> bool {
        matches!(self.decompose(vpn), Ok((outer, _)) if self.directory[outer].is_some())
    }

    /// PTE mutável da VPN.
    ///
    /// Com `create_if_absent`, cria a tabela interna no primeiro acesso.
    /// Sem ele, uma tabela ausente é violação de contrato (`TableAbsent`).
    pub fn entry_for(&mut self, vpn: Vpn, create_if_absent: bool) -> MmResult<&mut PageTableEntry> {
        let (outer, inner) = self.decompose(vpn)?;
        let slot = self.directory[outer];
        let index = match slot {
            Some(index) => index,
            None if create_if_absent => self.table_index_or_create(outer),
            None => {
                crate::kerror!("(VMM) Tabela interna ausente para vpn={}", vpn.as_usize());
                return Err(MmError::TableAbsent);
            }
        };
        Ok(&mut self.tables[index].entries[inner])
    }

    /// PTE da VPN (somente leitura).
    pub fn entry(&self, vpn: Vpn) -> MmResult<&PageTableEntry> {
        let (outer, inner) = self.decompose(vpn)?;
        let index = self.directory[outer].ok_or(MmError::TableAbsent)?;
        Ok(&self.tables[index].entries[inner])
    }

    /// Atalho de inspeção: `None` se a VPN está fora do intervalo ou sem tabela.
    pub fn lookup(&self, vpn: Vpn) -> Option<&PageTableEntry> {
        self.entry(vpn).ok()
    }

    /// Mapeia `vpn -> pfn`. A tabela interna já deve existir.
    pub fn map(&mut self, vpn: Vpn, pfn: Pfn, writable: bool) -> MmResult<()> {
        self.entry_for(vpn, false)?.map(pfn, writable);
        crate::ktrace!(
            "(VMM) map vpn={} -> pfn={} writable={}",
            vpn.as_usize(),
            pfn.as_usize(),
            writable
        );
        Ok(())
    }

    /// Invalida a entrada e retorna o frame que estava mapeado.
    ///
    /// Não mexe no pool: quem chama deve pareá-lo com um `release`.
    pub fn unmap(&mut self, vpn: Vpn) -> MmResult<Pfn> {
        let entry = self.entry_for(vpn, false)?;
        if !entry.is_valid() {
            return Err(MmError::NotMapped);
        }
        let pfn = entry.unmap().ok_or(MmError::CorruptEntry)?;
        crate::ktrace!("(VMM) unmap vpn={} (pfn={})", vpn.as_usize(), pfn.as_usize());
        Ok(pfn)
    }

    /// Itera as entradas válidas em ordem de VPN.
    pub fn mappings(&self) -> impl Iterator<Item = (Vpn, &PageTableEntry)> + '_ {
        let inner_count = self.inner_count;
        self.directory
            .iter()
            .enumerate()
            .filter_map(|(outer, slot)| slot.map(|index| (outer, index)))
            .flat_map(move |(outer, index)| {
                self.tables[index]
                    .entries
                    .iter()
                    .enumerate()
                    .filter(|(_, pte)| pte.is_valid())
                    .map(move |(inner, pte)| (compose(outer, inner, inner_count), pte))
            })
    }

    /// Itera todas as entradas das tabelas existentes, válidas ou não.
    pub fn entries(&self) -> impl Iterator<Item = &PageTableEntry> + '_ {
        self.tables.iter().flat_map(|table| table.entries.iter())
    }

    /// Primeira metade do fork: toda entrada válida e privada vira COW.
    ///
    /// Entradas já em COW ficam intactas. Retorna quantas foram marcadas.
    pub fn mark_copy_on_write(&mut self) -> usize {
        let mut marked = 0;
        for pte in self.tables.iter_mut().flat_map(|t| t.entries.iter_mut()) {
            if pte.is_valid() && !pte.is_cow_pending() {
                pte.mark_cow();
                marked += 1;
            }
        }
        marked
    }

    /// Segunda metade do fork: cria a tabela do filho.
    ///
    /// Cada tabela interna presente no pai é criada no filho; cada entrada
    /// válida é copiada sem escrita e o frame ganha uma referência.
    pub fn share_with_child(&self, frames: &mut FramePool) -> MmResult<PageTable> {
        let mut child = PageTable {
            inner_count: self.inner_count,
            directory: vec![None; self.directory.len()],
            tables: Vec::with_capacity(self.tables.len()),
        };

        for (outer, slot) in self.directory.iter().enumerate() {
            let Some(index) = *slot else {
                continue;
            };
            let child_index = child.table_index_or_create(outer);

            for (inner, parent_pte) in self.tables[index].entries.iter().enumerate() {
                let Some(pfn) = parent_pte.pfn().filter(|_| parent_pte.is_valid()) else {
                    continue;
                };
                if let Err(err) = frames.retain(pfn) {
                    child.release_all(frames);
                    return Err(err);
                }
                child.tables[child_index].entries[inner] = parent_pte.share();
            }
        }

        Ok(child)
    }

    /// Devolve a referência de cada mapeamento válido (fork abortado).
    fn release_all(&self, frames: &mut FramePool) {
        for (_, pte) in self.mappings() {
            if let Some(pfn) = pte.pfn() {
                let _ = frames.release(pfn);
            }
        }
    }

    fn table_index_or_create(&mut self, outer: usize) -> usize {
        if let Some(index) = self.directory[outer] {
            return index;
        }
        let index = self.tables.len();
        self.tables.push(InnerTable::new(self.inner_count));
        self.directory[outer] = Some(index);
        crate::ktrace!("(VMM) Tabela interna criada: outer={}", outer);
        index
    }
}

impl fmt::Display for PageTable {
    /// Dump no formato `vpn -> pfn [rw|ro] [cow]`, uma linha por mapeamento.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (vpn, pte) in self.mappings() {
            let Some(pfn) = pte.pfn() else {
                continue;
            };
            write!(
                f,
                "{:>4} -> {:<3} {}",
                vpn.as_usize(),
                pfn.as_usize(),
                if pte.is_writable() { "rw" } else { "ro" }
            )?;
            if pte.is_cow_pending() {
                write!(f, " cow")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
