//! VMSIM Library.
//!
//! Ponto central de exportação do simulador de memória virtual.
//! Segue a divisão de um kernel: `core` (logging e processos), `mm`
//! (frames, page tables e faults), `sys` (fachada para o framework
//! externo) e `klib` (utilitários internos).

pub mod core; // Logging, processos e troca de contexto
pub mod klib; // Framework de testes
pub mod mm; // Gerenciamento de Memória (PMM, VMM, Fault)
pub mod sys; // Fachada global consumida pelo framework

// Re-exports para o binário e para quem embute o simulador
pub use crate::core::process::{Pid, SwitchOutcome};
pub use crate::mm::{
    AccessType, FaultResult, MmError, MmResult, Pfn, SimulationContext, VmConfig, Vpn,
};
