//! Contexto da simulação.
//!
//! Reúne o estado que um kernel manteria em globais: o pool de frames, o
//! registro de processos e o processo (e page table) ativo. Toda operação
//! recebe o contexto explicitamente.
//!
//! As operações ficam nos módulos de cada componente:
//! - `mm::fault` - `allocate_page`, `free_page`, `handle_page_fault`
//! - `core::process::switch` - `switch_process`
//! - `mm::audit` - `check_invariants`

use crate::core::process::{Pid, Process, ProcessRegistry};
use crate::mm::addr::Vpn;
use crate::mm::config::{VmConfig, INIT_PID};
use crate::mm::error::MmResult;
use crate::mm::pmm::FramePool;
use crate::mm::vmm::{PageTable, PageTableEntry};

pub struct SimulationContext {
    pub(crate) config: VmConfig,
    pub(crate) frames: FramePool,
    pub(crate) processes: ProcessRegistry,
}

impl SimulationContext {
    /// Cria o contexto com todos os frames livres e `init_pid` ativo.
    pub fn new(config: VmConfig, init_pid: Pid) -> MmResult<Self> {
        config.validate()?;
        crate::kinfo!(
            "(MM) Contexto: {}x{} páginas, {} frames, init pid={}",
            config.outer_count,
            config.inner_count,
            config.frame_count,
            init_pid
        );
        Ok(Self::boot(config, init_pid))
    }

    fn boot(config: VmConfig, init_pid: Pid) -> Self {
        Self {
            config,
            frames: FramePool::new(config.frame_count),
            processes: ProcessRegistry::new(Process::new(init_pid, &config)),
        }
    }

    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    pub fn frames(&self) -> &FramePool {
        &self.frames
    }

    pub fn processes(&self) -> &ProcessRegistry {
        &self.processes
    }

    pub fn current_pid(&self) -> Pid {
        self.processes.current_pid()
    }

    /// Page table do processo ativo.
    pub fn active_table(&self) -> &PageTable {
        &self.processes.current().table
    }

    pub(crate) fn active_table_mut(&mut self) -> &mut PageTable {
        &mut self.processes.current_mut().table
    }

    /// Page table de qualquer processo registrado.
    pub fn table_of(&self, pid: Pid) -> Option<&PageTable> {
        self.processes.get(pid).map(|p| &p.table)
    }

    /// PTE de `vpn` no processo `pid`, se a tabela interna existir.
    pub fn entry_of(&self, pid: Pid, vpn: Vpn) -> Option<&PageTableEntry> {
        self.table_of(pid)?.lookup(vpn)
    }
}

impl Default for SimulationContext {
    fn default() -> Self {
        Self::boot(VmConfig::default(), INIT_PID)
    }
}
