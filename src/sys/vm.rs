//! # Fachada global do simulador
//!
//! O framework externo enxerga o MM como estado global: lista de
//! processos, processo ativo, page table ativa e tabela de refcounts. Esse
//! estado vive aqui, em um único `SimulationContext` protegido por lock,
//! e é acessado apenas pelas funções abaixo.
//!
//! ```text
//! framework ──▶ sys::vm::alloc_page ──▶ VM_CONTEXT.lock() ──▶ SimulationContext
//! ```
//!
//! Todas as funções retornam `NotInitialized` antes de `init`.

use crate::core::process::{Pid, SwitchOutcome};
use crate::mm::addr::{Pfn, Vpn};
use crate::mm::config::VmConfig;
use crate::mm::context::SimulationContext;
use crate::mm::error::{MmError, MmResult};
use crate::mm::fault::AccessType;
use spin::Mutex;

/// Contexto global da simulação.
static VM_CONTEXT: Mutex<Option<SimulationContext>> = Mutex::new(None);

/// Inicializa (ou reinicia) o contexto global.
pub fn init(config: VmConfig, init_pid: Pid) -> MmResult<()> {
    let context = SimulationContext::new(config, init_pid)?;
    *VM_CONTEXT.lock() = Some(context);
    crate::kok!("(VM) Contexto global pronto");
    Ok(())
}

/// Remove o contexto global, devolvendo-o a quem chamou.
pub fn shutdown() -> Option<SimulationContext> {
    VM_CONTEXT.lock().take()
}

pub fn is_initialized() -> bool {
    VM_CONTEXT.lock().is_some()
}

/// Executa `f` com o contexto global travado.
pub fn with_context<R>(f: impl FnOnce(&mut SimulationContext) -> R) -> MmResult<R> {
    let mut guard = VM_CONTEXT.lock();
    let context = guard.as_mut().ok_or(MmError::NotInitialized)?;
    Ok(f(context))
}

pub fn alloc_page(vpn: usize, access: AccessType) -> MmResult<Pfn> {
    with_context(|ctx| ctx.allocate_page(Vpn::new(vpn), access))?
}

pub fn free_page(vpn: usize) -> MmResult<Pfn> {
    with_context(|ctx| ctx.free_page(Vpn::new(vpn)))?
}

/// `true` se o fault foi resolvido.
///
/// Qualquer erro (inclusive contexto ausente) conta como não resolvido.
pub fn handle_page_fault(vpn: usize, access: AccessType) -> bool {
    match with_context(|ctx| ctx.handle_page_fault(Vpn::new(vpn), access)) {
        Ok(Ok(result)) => result.is_resolved(),
        Ok(Err(err)) | Err(err) => {
            crate::kwarn!("(VM) Fault em vpn={} não resolvido: {}", vpn, err);
            false
        }
    }
}

pub fn switch_process(pid: Pid) -> MmResult<SwitchOutcome> {
    with_context(|ctx| ctx.switch_process(pid))?
}

pub fn current_pid() -> MmResult<Pid> {
    with_context(|ctx| ctx.current_pid())
}
