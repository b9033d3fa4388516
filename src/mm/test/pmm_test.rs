//! Testes do PMM (pool de frames)

use crate::klib::test_framework::{TestCase, TestResult};
use crate::mm::addr::Pfn;
use crate::mm::error::MmError;
use crate::mm::pmm::FramePool;
use crate::{kassert, ktry};

/// Testes do PMM
pub const PMM_TESTS: &[TestCase] = &[
    TestCase::new("pmm_smallest_free_first", test_smallest_free_first),
    TestCase::new("pmm_exhaustion", test_exhaustion),
    TestCase::new("pmm_retain_release", test_retain_release),
    TestCase::new("pmm_contract_violations", test_contract_violations),
];

/// O menor PFN livre sempre vence, inclusive após liberações no meio.
fn test_smallest_free_first() -> TestResult {
    let mut pool = FramePool::new(16);

    for expected in 0..3 {
        let pfn = ktry!(pool.allocate_frame(), "alocação {}", expected);
        kassert!(pfn == Pfn::new(expected), "esperado pfn={} obtido {:?}", expected, pfn);
    }

    ktry!(pool.release(Pfn::new(1)), "release pfn=1");
    let pfn = ktry!(pool.allocate_frame(), "realocação");
    kassert!(pfn == Pfn::new(1), "buraco em pfn=1 deveria ser reusado, obtido {:?}", pfn);

    ktry!(pool.release(Pfn::new(0)), "release pfn=0");
    let pfn = ktry!(pool.allocate_frame(), "realocação");
    kassert!(pfn == Pfn::new(0), "pfn=0 deveria ser reusado, obtido {:?}", pfn);

    let pfn = ktry!(pool.allocate_frame(), "próxima alocação");
    kassert!(pfn == Pfn::new(3), "esperado pfn=3, obtido {:?}", pfn);
    kassert!(pool.refcount(pfn) == Some(1), "frame novo com refcount 1");

    TestResult::Passed
}

/// Após `frame_count` alocações sem liberação, a próxima falha.
fn test_exhaustion() -> TestResult {
    let mut pool = FramePool::new(16);

    for _ in 0..16 {
        ktry!(pool.allocate_frame(), "alocação dentro da capacidade");
    }
    kassert!(pool.free_frames() == 0, "pool deveria estar cheio");
    kassert!(
        pool.allocate_frame() == Err(MmError::NoFreeFrame),
        "17ª alocação deveria falhar"
    );
    kassert!(pool.stats().failed_allocs == 1, "falha contabilizada");
    kassert!(pool.stats().allocations == 16, "16 alocações contabilizadas");

    TestResult::Passed
}

/// Refcount acompanha retain/release; zero devolve o frame ao pool.
fn test_retain_release() -> TestResult {
    let mut pool = FramePool::new(4);
    let pfn = ktry!(pool.allocate_frame(), "alocação");

    kassert!(pool.retain(pfn) == Ok(2), "retain -> 2");
    kassert!(pool.release(pfn) == Ok(1), "release -> 1");
    kassert!(pool.free_frames() == 3, "frame ainda em uso");
    kassert!(pool.release(pfn) == Ok(0), "release -> 0");
    kassert!(pool.free_frames() == 4, "frame devolvido");
    kassert!(pool.stats().frees == 1, "liberação contabilizada");

    TestResult::Passed
}

fn test_contract_violations() -> TestResult {
    let mut pool = FramePool::new(4);

    kassert!(
        pool.release(Pfn::new(0)) == Err(MmError::RefcountUnderflow),
        "release de frame livre"
    );
    kassert!(pool.retain(Pfn::new(0)) == Err(MmError::FrameFree), "retain de frame livre");
    kassert!(
        pool.retain(Pfn::new(4)) == Err(MmError::FrameOutOfBounds),
        "pfn fora do pool"
    );
    kassert!(pool.refcount(Pfn::new(4)).is_none(), "refcount fora do pool");
    kassert!(pool.iter().all(|f| f.ref_count == 0), "nenhum refcount alterado");

    TestResult::Passed
}
