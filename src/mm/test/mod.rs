//! # Testes do Subsistema de Memória
//!
//! Organização modular dos testes:
//! - `pmm_test.rs` - Pool de frames e refcounts
//! - `vmm_test.rs` - PTEs e page table de dois níveis
//! - `fault_test.rs` - Alocação, liberação e faults fora de COW
//! - `fork_test.rs` - Troca de processo, fork e COW break
//! - `scenario_test.rs` - Cenários de ponta a ponta e fachada global

pub mod fault_test;
pub mod pmm_test;


// Re-export da função principal
pub use test::run_memory_tests;

// Cada suite vira um #[test] do cargo.
#[cfg(test)]
mod bridge {
    use super::*;
    use crate::klib::test_framework::{failing_cases, TestCase};

    fn assert_suite(tests: &[TestCase]) {
        let failed = failing_cases(tests);
        assert!(failed.is_empty(), "casos com falha: {:?}", failed);
    }

    #[test]
    fn pmm_suite() {
        assert_suite(pmm_test::PMM_TESTS);
    }

    #[test]
    fn vmm_suite() {
        assert_suite(vmm_test::VMM_TESTS);
    }

    #[test]
    fn fault_suite() {
        assert_suite(fault_test::FAULT_TESTS);
    }

    #[test]
    fn fork_suite() {
        assert_suite(fork_test::FORK_TESTS);
    }

    #[test]
    fn scenario_suite() {
        assert_suite(scenario_test::SCENARIO_TESTS);
    }
}
