//! VMSIM - Binário Principal.
//!
//! Responsabilidade:
//! 1. Instalar o logger (saída de erro faz o papel da serial).
//! 2. Executar as suites do MM (feature `self_test`).
//! 3. Rodar a demonstração de fork com Copy-on-Write pela fachada global.
//! 4. Imprimir as page tables finais na saída padrão.

use std::process::ExitCode;

use vmsim::core::logging;
use vmsim::sys::vm;
use vmsim::{AccessType, MmResult, VmConfig};

fn main() -> ExitCode {
    // 1. Logs
    // Sem logger instalado os macros continuam funcionando, só não emitem nada.
    if logging::init().is_err() {
        eprintln!("vmsim: logger já instalado");
    }
    vmsim::kinfo!("VMSIM - Simulador de Memória Virtual");

    // 2. Self tests
    #[cfg(feature = "self_test")]
    {
        let report = vmsim::mm::run_memory_tests();
        if !report.all_passed() {
            vmsim::kerror!("(Boot) Self tests falharam, abortando");
            return ExitCode::FAILURE;
        }
    }

    // 3. Demonstração
    match run_demo() {
        Ok(()) => {
            vmsim::kok!("(Boot) Demonstração concluída");
            ExitCode::SUCCESS
        }
        Err(err) => {
            vmsim::kerror!("(Boot) Demonstração falhou: {}", err);
            ExitCode::FAILURE
        }
    }
}

/// pid 1 escreve em vpn 0, forka o pid 2 e o filho escreve na mesma página.
fn run_demo() -> MmResult<()> {
    vm::init(VmConfig::default(), 1)?;

    vm::alloc_page(0, AccessType::Write)?;
    vm::alloc_page(17, AccessType::Read)?;
    vm::switch_process(2)?;

    let resolved = vm::handle_page_fault(0, AccessType::Write);
    vmsim::kinfo!("(Boot) Fault de escrita em vpn 0 no pid 2: resolvido={}", resolved);

    vm::with_context(|ctx| -> MmResult<()> {
        ctx.check_invariants()?;
        for process in ctx.processes().iter() {
            println!("pid {}:", process.pid);
            print!("{}", process.table);
        }
        println!("frames:");
        for frame in ctx.frames().iter().filter(|f| f.ref_count > 0) {
            println!("{:>4} refs={}", frame.pfn.as_usize(), frame.ref_count);
        }
        Ok(())
    })??;

    vm::shutdown();
    Ok(())
}
