//! # Memory Management Subsystem (MM)
//!
//! Simula o gerenciador de memória de um kernel: page tables de dois
//! níveis, um pool fixo de frames físicos, page faults e fork com
//! Copy-on-Write.
//!
//! ## 🏗️ Arquitetura dos Módulos
//!
//! | Módulo    | Responsabilidade                                          |
//! |-----------|-----------------------------------------------------------|
//! | `pmm`     | Pool de frames com refcount; aloca o menor PFN livre.     |
//! | `vmm`     | PTEs e page table de dois níveis (arena de tabelas).      |
//! | `fault`   | `allocate_page`, `free_page`, `handle_page_fault`.        |
//! | `context` | `SimulationContext`: pool + processos + processo ativo.   |
//! | `audit`   | Recalcula refcounts e valida as invariantes.              |
//!
//! O fork e a troca de processo ficam em `core::process::switch`.
//!
//! ---------------------------------------------------------------------
//! FLUXO DE DEPENDÊNCIA
//! ---------------------------------------------------------------------
//!
//! ```text
//! PMM  ──▶ frames e refcounts
//!  │
//!  ▼
//! VMM  ──▶ mapeamentos vpn → pfn (não é dono dos frames)
//!  │
//!  ▼
//! Fault / Switch ──▶ mantêm refcount e PTEs consistentes entre si
//! ```
//!
//! ---------------------------------------------------------------------
//! GARANTIAS
//! ---------------------------------------------------------------------
//!
//! Após qualquer operação bem-sucedida (ou que falhou com erro):
//! - o refcount de cada frame é o número de PTEs válidas que apontam para ele
//! - nenhum frame livre é alvo de PTE válida
//! - PTEs inválidas não carregam frame nem flags
//!
//! `SimulationContext::check_invariants` verifica as três.

pub mod addr;
pub mod audit;
pub mod config;
pub mod context;
pub mod error;
pub mod fault;
pub mod pmm;
#[cfg(any(test, feature = "self_test"))]
pub mod test;
pub mod vmm;

// Re-exports para conveniência
pub use addr::{Pfn, Vpn};
pub use config::VmConfig;
pub use context::SimulationContext;
pub use error::{MmError, MmResult};
pub use fault::{AccessType, FaultResult};
#[cfg(any(test, feature = "self_test"))]
pub use test::run_memory_tests;
