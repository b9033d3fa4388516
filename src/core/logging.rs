// =============================================================================
// SIMULATOR LOGGING SYSTEM
// =============================================================================
//
// Sistema de logging do simulador, com custo ZERO quando desligado.
//
// ARQUITETURA:
// - Features do Cargo fazem a filtragem em tempo de compilação
// - Com feature "no_logs", TODOS os macros viram expressões vazias
// - Os macros encaminham para a fachada `log`; quem executa o simulador
//   decide o destino instalando um logger (ver `init`)
// - O logger padrão (`SerialLogger`) escreve na saída de erro, que faz o
//   papel da serial do kernel
//
// NÍVEIS DE LOG (do mais crítico ao menos):
// - ERROR: Violação de contrato ou estado corrompido
// - WARN:  Situações suspeitas mas recuperáveis (fault não resolvido, OOM)
// - INFO:  Fluxo normal (fork, troca de processo)
// - DEBUG: Alocações e liberações de frames
// - TRACE: Detalhes extremos (cada PTE tocada)
//
// COMO USAR:
//   kinfo!("(Proc) Fork pid={} -> pid={}", parent, child);
//   kdebug!("(PMM) Frame alocado: {}", pfn);
//
// =============================================================================

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

#[doc(hidden)]
pub use log as __log;

/// Target usado por todos os macros do simulador.
pub const TARGET: &str = "vmsim";

// =============================================================================
// PREFIXOS COM CORES ANSI
// =============================================================================
//
//   1;31 = Bold Red
//   1;33 = Bold Yellow
//   32   = Green
//   36   = Cyan
//   35   = Magenta
//   0    = Reset
//

pub const P_ERROR: &str = "\x1b[1;31m[ERRO]\x1b[0m ";
pub const P_WARN: &str = "\x1b[1;33m[WARN]\x1b[0m ";
pub const P_INFO: &str = "\x1b[32m[INFO]\x1b[0m ";
pub const P_DEBUG: &str = "\x1b[36m[DEBG]\x1b[0m ";
pub const P_TRACE: &str = "\x1b[35m[TRAC]\x1b[0m ";
pub const P_OK: &str = "\x1b[32m[OK]\x1b[0m ";

/// Nível máximo compilado, derivado das features.
pub const fn max_level() -> LevelFilter {
    if cfg!(feature = "no_logs") {
        LevelFilter::Off
    } else if cfg!(feature = "log_trace") {
        LevelFilter::Trace
    } else if cfg!(any(feature = "log_debug", feature = "log_info")) {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Prefixo colorido de um nível.
pub fn prefix(level: Level) -> &'static str {
    match level {
        Level::Error => P_ERROR,
        Level::Warn => P_WARN,
        Level::Info => P_INFO,
        Level::Debug => P_DEBUG,
        Level::Trace => P_TRACE,
    }
}

// =============================================================================
// SERIAL LOGGER
// =============================================================================

/// Logger que emite uma linha por registro na saída de erro.
pub struct SerialLogger;

static LOGGER: SerialLogger = SerialLogger;

impl Log for SerialLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        eprintln!("{}{}", prefix(record.level()), record.args());
    }

    fn flush(&self) {}
}

/// Instala o `SerialLogger` como logger global.
///
/// Falha se outro logger já tiver sido instalado.
pub fn init() -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(max_level());
    Ok(())
}

// =============================================================================
// MACROS DE LOG - NÍVEL ERROR
// =============================================================================
//
// kerror! - Sempre ativo (exceto com no_logs)
//

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kerror {
    ($($arg:tt)*) => {{
        $crate::core::logging::__log::error!(target: $crate::core::logging::TARGET, $($arg)*);
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kerror {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL WARN
// =============================================================================

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kwarn {
    ($($arg:tt)*) => {{
        $crate::core::logging::__log::warn!(target: $crate::core::logging::TARGET, $($arg)*);
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kwarn {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL INFO
// =============================================================================

#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kinfo {
    ($($arg:tt)*) => {{
        $crate::core::logging::__log::info!(target: $crate::core::logging::TARGET, $($arg)*);
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kinfo {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL DEBUG
// =============================================================================
//
// kdebug! - Ativo com log_trace, log_debug ou log_info
//

#[cfg(all(
    not(feature = "no_logs"),
    any(feature = "log_trace", feature = "log_debug", feature = "log_info")
))]
#[macro_export]
macro_rules! kdebug {
    ($($arg:tt)*) => {{
        $crate::core::logging::__log::debug!(target: $crate::core::logging::TARGET, $($arg)*);
    }};
}

#[cfg(not(all(
    not(feature = "no_logs"),
    any(feature = "log_trace", feature = "log_debug", feature = "log_info")
)))]
#[macro_export]
macro_rules! kdebug {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE LOG - NÍVEL TRACE
// =============================================================================
//
// ktrace! - Ativo apenas com log_trace
//

#[cfg(all(not(feature = "no_logs"), feature = "log_trace"))]
#[macro_export]
macro_rules! ktrace {
    ($($arg:tt)*) => {{
        $crate::core::logging::__log::trace!(target: $crate::core::logging::TARGET, $($arg)*);
    }};
}

#[cfg(not(all(not(feature = "no_logs"), feature = "log_trace")))]
#[macro_export]
macro_rules! ktrace {
    ($($t:tt)*) => {{}};
}

// =============================================================================
// MACROS DE STATUS
// =============================================================================

/// kok! - Log de sucesso (prefixo verde [OK]), emitido como INFO.
#[cfg(not(feature = "no_logs"))]
#[macro_export]
macro_rules! kok {
    ($($arg:tt)*) => {{
        $crate::core::logging::__log::info!(
            target: $crate::core::logging::TARGET,
            "{}{}",
            $crate::core::logging::P_OK,
            format_args!($($arg)*)
        );
    }};
}

#[cfg(feature = "no_logs")]
#[macro_export]
macro_rules! kok {
    ($($t:tt)*) => {{}};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_follow_levels() {
        assert_eq!(prefix(Level::Error), P_ERROR);
        assert_eq!(prefix(Level::Trace), P_TRACE);
    }

    #[test]
    fn logger_respects_compiled_level() {
        let meta = Metadata::builder().level(Level::Error).target(TARGET).build();
        assert_eq!(LOGGER.enabled(&meta), max_level() >= LevelFilter::Error);
    }
}
