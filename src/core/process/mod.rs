//! Gerenciamento de Processos
//!
//! Registro dos processos simulados. Cada processo possui exatamente uma
//! page table; o processo corrente define a page table ativa.
//! A troca e o fork ficam em `switch`.

pub mod switch;

pub use switch::SwitchOutcome;

use crate::mm::config::VmConfig;
use crate::mm::vmm::PageTable;

/// ID do processo
pub type Pid = u32;

/// Processo simulado
#[derive(Debug, Clone)]
pub struct Process {
    pub pid: Pid,
    /// Processo do qual este foi forkado (`None` para o inicial).
    pub parent: Option<Pid>,
    pub table: PageTable,
}

impl Process {
    /// Processo inicial, com page table vazia.
    pub fn new(pid: Pid, config: &VmConfig) -> Self {
        Self {
            pid,
            parent: None,
            table: PageTable::new(config),
        }
    }

    pub fn forked(pid: Pid, parent: Pid, table: PageTable) -> Self {
        Self {
            pid,
            parent: Some(parent),
            table,
        }
    }
}

/// Registro de processos em ordem de inserção.
///
/// A busca por PID é linear; a escala simulada é pequena. `current` é o
/// índice do processo ativo e sempre aponta para uma entrada existente.
#[derive(Debug, Clone)]
pub struct ProcessRegistry {
    processes: Vec<Process>,
    current: usize,
}

impl ProcessRegistry {
    /// Cria o registro já com o processo inicial ativo.
    pub fn new(init: Process) -> Self {
        Self {
            processes: vec![init],
            current: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Process> + '_ {
        self.processes.iter()
    }

    pub fn pids(&self) -> impl Iterator<Item = Pid> + '_ {
        self.processes.iter().map(|p| p.pid)
    }

    pub fn position(&self, pid: Pid) -> Option<usize> {
        self.processes.iter().position(|p| p.pid == pid)
    }

    pub fn get(&self, pid: Pid) -> Option<&Process> {
        self.processes.iter().find(|p| p.pid == pid)
    }

    pub fn get_mut(&mut self, pid: Pid) -> Option<&mut Process> {
        self.processes.iter_mut().find(|p| p.pid == pid)
    }

    pub fn current(&self) -> &Process {
        &self.processes[self.current]
    }

    pub fn current_mut(&mut self) -> &mut Process {
        &mut self.processes[self.current]
    }

    pub fn current_pid(&self) -> Pid {
        self.current().pid
    }

    /// Torna ativo o processo no índice `index`.
    pub(crate) fn activate(&mut self, index: usize) {
        debug_assert!(index < self.processes.len());
        self.current = index;
    }

    /// Anexa ao final e retorna o índice.
    pub(crate) fn push(&mut self, process: Process) -> usize {
        self.processes.push(process);
        self.processes.len() - 1
    }
}
