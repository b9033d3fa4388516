//! Framework de testes do simulador
//!
//! As suites são tabelas de `TestCase`. O binário as executa no boot
//! (feature `self_test`) e o `cargo test` as executa pelas pontes
//! `#[cfg(test)]` de `mm::test`.

/// Resultado de teste
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestResult {
    Passed,
    Failed,
    Skipped,
}

/// Um caso de teste
pub struct TestCase {
    pub name: &'static str,
    pub func: fn() -> TestResult,
}

impl TestCase {
    pub const fn new(name: &'static str, func: fn() -> TestResult) -> Self {
        Self { name, func }
    }
}

/// Contagem de uma execução de suite
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuiteReport {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl SuiteReport {
    pub fn merge(&mut self, other: SuiteReport) {
        self.passed += other.passed;
        self.failed += other.failed;
        self.skipped += other.skipped;
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Executa suite de testes
pub fn run_test_suite(name: &str, tests: &[TestCase]) -> SuiteReport {
    crate::kinfo!("=== Executando suite: {}", name);

    let mut report = SuiteReport::default();

    for test in tests {
        match (test.func)() {
            TestResult::Passed => {
                crate::kinfo!("[PASS] {}", test.name);
                report.passed += 1;
            }
            TestResult::Failed => {
                crate::kerror!("[FAIL] {}", test.name);
                report.failed += 1;
            }
            TestResult::Skipped => {
                crate::kwarn!("[SKIP] {}", test.name);
                report.skipped += 1;
            }
        }
    }

    crate::kinfo!(
        "Resultados: passed={} failed={} skipped={}",
        report.passed,
        report.failed,
        report.skipped
    );
    report
}

/// Nomes dos casos que não passaram (usado pelas pontes do `cargo test`).
pub fn failing_cases(tests: &[TestCase]) -> Vec<&'static str> {
    tests
        .iter()
        .filter(|t| (t.func)() == TestResult::Failed)
        .map(|t| t.name)
        .collect()
}

/// Verifica uma condição dentro de um `TestCase`.
///
/// Em caso de falha, registra a mensagem e retorna `TestResult::Failed`.
#[macro_export]
macro_rules! kassert {
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            $crate::kerror!("(Test) {} [{}]", format_args!($($arg)*), stringify!($cond));
            return $crate::klib::test_framework::TestResult::Failed;
        }
    };
}

/// Desembrulha um `Result` dentro de um `TestCase`.
#[macro_export]
macro_rules! ktry {
    ($expr:expr, $($arg:tt)*) => {
        match $expr {
            Ok(v) => v,
            Err(e) => {
                $crate::kerror!("(Test) {}: {:?}", format_args!($($arg)*), e);
                return $crate::klib::test_framework::TestResult::Failed;
            }
        }
    };
}
