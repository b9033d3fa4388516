//! Testes do Fault Resolver (alocação, liberação e faults fora de COW)

use crate::klib::test_framework::{TestCase, TestResult};
use crate::mm::addr::{Pfn, Vpn};
use crate::mm::config::VmConfig;
use crate::mm::context::SimulationContext;
use crate::mm::error::MmError;
use crate::mm::fault::{AccessType, FaultResult};
use crate::{kassert, ktry};

/// Testes do Fault Resolver
pub const FAULT_TESTS: &[TestCase] = &[
    TestCase::new("fault_access_inversion", test_access_inversion),
    TestCase::new("fault_smallest_frame_sequence", test_smallest_frame_sequence),
    TestCase::new("fault_free_alloc_round_trip", test_free_alloc_round_trip),
    TestCase::new("fault_table_survives_oom", test_table_survives_oom),
    TestCase::new("fault_precondition_errors", test_precondition_errors),
    TestCase::new("fault_unresolved_cases", test_unresolved_cases),
];

/// Escrita gera PTE não gravável; leitura gera PTE gravável.
fn test_access_inversion() -> TestResult {
    let mut ctx = SimulationContext::default();

    ktry!(ctx.allocate_page(Vpn::new(0), AccessType::Write), "alocação W");
    ktry!(ctx.allocate_page(Vpn::new(1), AccessType::Read), "alocação R");

    let table = ctx.active_table();
    let write_pte = ktry!(table.entry(Vpn::new(0)), "entry vpn 0");
    let read_pte = ktry!(table.entry(Vpn::new(1)), "entry vpn 1");
    kassert!(write_pte.is_valid() && !write_pte.is_writable(), "W -> não gravável");
    kassert!(read_pte.is_valid() && read_pte.is_writable(), "R -> gravável");
    kassert!(!write_pte.is_cow_pending() && !read_pte.is_cow_pending(), "sem COW");

    TestResult::Passed
}

/// Cada alocação retorna o menor frame livre no momento da chamada,
/// em uma sequência longa de alocações e liberações intercaladas.
fn test_smallest_frame_sequence() -> TestResult {
    let mut ctx = SimulationContext::default();
    let mut seed: u32 = 0x2545_f491;
    let mut mapped: Vec<Vpn> = Vec::new();

    for step in 0..400 {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let roll = (seed >> 16) as usize;

        if roll % 3 != 0 || mapped.is_empty() {
            let vpn = Vpn::new(roll % ctx.config().virtual_pages());
            if mapped.contains(&vpn) {
                continue;
            }
            let expected = ctx.frames().iter().find(|f| f.ref_count == 0).map(|f| f.pfn);
            match (ctx.allocate_page(vpn, AccessType::Read), expected) {
                (Ok(pfn), Some(want)) => {
                    kassert!(pfn == want, "passo {}: esperado {:?}, obtido {:?}", step, want, pfn);
                    mapped.push(vpn);
                }
                (Err(MmError::NoFreeFrame), None) => {}
                (got, want) => {
                    kassert!(false, "passo {}: {:?} vs esperado {:?}", step, got, want);
                }
            }
        } else {
            let vpn = mapped.swap_remove(roll % mapped.len());
            ktry!(ctx.free_page(vpn), "free_page no passo {}", step);
        }
        ktry!(ctx.check_invariants(), "invariantes no passo {}", step);
    }

    TestResult::Passed
}

fn test_free_alloc_round_trip() -> TestResult {
    let mut ctx = SimulationContext::default();
    let vpn = Vpn::new(0);

    let first = ktry!(ctx.allocate_page(vpn, AccessType::Write), "alocação vpn 0");
    ktry!(ctx.allocate_page(Vpn::new(1), AccessType::Read), "alocação vpn 1");
    kassert!(first == Pfn::new(0), "vpn 0 em pfn 0");

    let freed = ktry!(ctx.free_page(vpn), "free_page");
    kassert!(freed == first, "free_page retorna o frame liberado");
    kassert!(ctx.frames().refcount(first) == Some(0), "refcount caiu de 1 para 0");
    kassert!(
        ctx.active_table().entry(vpn).map(|pte| pte.is_valid()) == Ok(false),
        "entrada invalidada"
    );

    let again = ktry!(ctx.allocate_page(vpn, AccessType::Read), "realocação");
    kassert!(again == first, "frame liberado é reusado");
    kassert!(ctx.frames().refcount(again) == Some(1), "refcount exatamente 1");
    ktry!(ctx.check_invariants(), "invariantes");

    TestResult::Passed
}

/// A tabela interna é criada antes da tentativa de alocar o frame.
fn test_table_survives_oom() -> TestResult {
    let mut ctx = ktry!(SimulationContext::new(VmConfig::new(16, 16, 1), 0), "contexto");

    ktry!(ctx.allocate_page(Vpn::new(0), AccessType::Read), "único frame");
    kassert!(
        ctx.allocate_page(Vpn::new(20), AccessType::Read) == Err(MmError::NoFreeFrame),
        "pool esgotado"
    );
    kassert!(ctx.active_table().has_table(Vpn::new(20)), "tabela interna criada");
    kassert!(
        ctx.active_table().entry(Vpn::new(20)).map(|pte| pte.is_valid()) == Ok(false),
        "entrada continua inválida"
    );
    ktry!(ctx.check_invariants(), "invariantes");

    TestResult::Passed
}

fn test_precondition_errors() -> TestResult {
    let mut ctx = SimulationContext::default();

    kassert!(ctx.free_page(Vpn::new(40)) == Err(MmError::TableAbsent), "free sem tabela");

    let pfn = ktry!(ctx.allocate_page(Vpn::new(0), AccessType::Read), "alocação");
    kassert!(ctx.free_page(Vpn::new(1)) == Err(MmError::NotMapped), "free de vpn inválida");
    kassert!(
        ctx.allocate_page(Vpn::new(0), AccessType::Read) == Err(MmError::AlreadyMapped),
        "alocação dupla"
    );
    kassert!(ctx.frames().refcount(pfn) == Some(1), "refcount intacto");
    kassert!(ctx.frames().free_frames() == 15, "nenhum frame vazou");

    kassert!(
        ctx.allocate_page(Vpn::new(256), AccessType::Read) == Err(MmError::VpnOutOfRange),
        "vpn fora do espaço"
    );
    kassert!(
        ctx.handle_page_fault(Vpn::new(256), AccessType::Write) == Err(MmError::VpnOutOfRange),
        "fault fora do espaço"
    );
    ktry!(ctx.check_invariants(), "invariantes");

    TestResult::Passed
}

/// Fora de COW, o fault volta para o framework como não resolvido.
fn test_unresolved_cases() -> TestResult {
    let mut ctx = SimulationContext::default();

    let absent = ktry!(ctx.handle_page_fault(Vpn::new(100), AccessType::Write), "sem tabela");
    kassert!(absent == FaultResult::Unresolved, "tabela ausente");

    ktry!(ctx.allocate_page(Vpn::new(0), AccessType::Write), "alocação W");
    ktry!(ctx.allocate_page(Vpn::new(1), AccessType::Read), "alocação R");

    let invalid = ktry!(ctx.handle_page_fault(Vpn::new(2), AccessType::Read), "inválida");
    kassert!(invalid == FaultResult::Unresolved, "entrada inválida");

    for vpn in [0, 1] {
        let result = ktry!(ctx.handle_page_fault(Vpn::new(vpn), AccessType::Write), "privada");
        kassert!(!result.is_resolved(), "vpn {} privada não é COW", vpn);
    }
    let pte = ktry!(ctx.active_table().entry(Vpn::new(0)), "entry vpn 0");
    kassert!(!pte.is_writable(), "fault não resolvido não muda a PTE");

    TestResult::Passed
}
