//! Troca de processo e fork com Copy-on-Write.
//!
//! A troca é cooperativa e síncrona: só reatribui o processo ativo (e com
//! ele a page table ativa). Um PID desconhecido cria um filho do processo
//! corrente que compartilha todos os seus frames:
//!
//! 1. Marca as entradas privadas do pai como COW (sem escrita)
//! 2. Copia os mapeamentos para o filho, +1 no refcount de cada frame
//! 3. O filho vira o processo ativo
//!
//! A próxima escrita de qualquer um dos lados cai em `handle_page_fault`.

use super::{Pid, Process};
use crate::mm::context::SimulationContext;
use crate::mm::error::MmResult;

/// Resultado de `switch_process`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// Processo já existia; nenhum mapeamento foi tocado.
    Switched { from: Pid, to: Pid },
    /// Processo novo criado a partir do corrente.
    Forked {
        parent: Pid,
        child: Pid,
        /// Entradas do pai que passaram a ser COW neste fork.
        marked: usize,
        /// Mapeamentos copiados para o filho.
        shared: usize,
    },
}

impl SimulationContext {
    /// Ativa o processo `pid`, criando-o por fork do corrente se não existir.
    pub fn switch_process(&mut self, pid: Pid) -> MmResult<SwitchOutcome> {
        let from = self.processes.current_pid();

        if let Some(index) = self.processes.position(pid) {
            self.processes.activate(index);
            crate::kinfo!("(Proc) Switch pid={} -> pid={}", from, pid);
            return Ok(SwitchOutcome::Switched { from, to: pid });
        }

        self.fork_current(pid)
    }

    fn fork_current(&mut self, child_pid: Pid) -> MmResult<SwitchOutcome> {
        let parent = self.processes.current_mut();
        let parent_pid = parent.pid;
        let marked = parent.table.mark_copy_on_write();
        crate::ktrace!("(Proc) pid={}: {} entradas marcadas COW", parent_pid, marked);

        let table = self.processes.current().table.share_with_child(&mut self.frames)?;
        let shared = table.mappings().count();

        let index = self
            .processes
            .push(Process::forked(child_pid, parent_pid, table));
        self.processes.activate(index);

        crate::kinfo!(
            "(Proc) Fork pid={} -> pid={} ({} páginas compartilhadas)",
            parent_pid,
            child_pid,
            shared
        );
        Ok(SwitchOutcome::Forked {
            parent: parent_pid,
            child: child_pid,
            marked,
            shared,
        })
    }
}
