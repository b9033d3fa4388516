//! # Configuração do Módulo de Memória
//!
//! Define as constantes do simulador e a configuração de runtime (`VmConfig`).

use crate::core::process::Pid;
use crate::mm::error::{MmError, MmResult};

// =============================================================================
// CONSTANTES DE TAMANHO
// =============================================================================

/// Entradas no diretório externo da page table
pub const OUTER_COUNT: usize = 16;

/// Entradas em cada tabela interna
pub const INNER_COUNT: usize = 16;

/// Frames físicos no pool simulado
pub const FRAME_COUNT: usize = 16;

/// Páginas virtuais endereçáveis com a configuração padrão (256)
pub const VIRTUAL_PAGES: usize = OUTER_COUNT * INNER_COUNT;

/// PID do processo inicial criado no boot do contexto
pub const INIT_PID: Pid = 0;

// =============================================================================
// CONFIGURAÇÃO DE RUNTIME
// =============================================================================

/// Dimensões do espaço simulado.
///
/// O padrão reproduz a configuração observada (16/16/16). Qualquer dimensão
/// pode ser alterada, desde que não seja zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VmConfig {
    pub outer_count: usize,
    pub inner_count: usize,
    pub frame_count: usize,
}

impl VmConfig {
    pub const fn new(outer_count: usize, inner_count: usize, frame_count: usize) -> Self {
        Self {
            outer_count,
            inner_count,
            frame_count,
        }
    }

    /// Total de páginas virtuais (`outer_count * inner_count`).
    #[inline]
    pub const fn virtual_pages(&self) -> usize {
        self.outer_count * self.inner_count
    }

    /// Rejeita dimensões nulas ou que estouram `usize`.
    pub fn validate(&self) -> MmResult<()> {
        if self.outer_count == 0 || self.inner_count == 0 || self.frame_count == 0 {
            return Err(MmError::InvalidConfig);
        }
        self.outer_count
            .checked_mul(self.inner_count)
            .ok_or(MmError::InvalidConfig)?;
        Ok(())
    }
}

impl Default for VmConfig {
    fn default() -> Self {
        Self::new(OUTER_COUNT, INNER_COUNT, FRAME_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_observed_configuration() {
        let config = VmConfig::default();
        assert_eq!(config.virtual_pages(), VIRTUAL_PAGES);
        assert_eq!(config.frame_count, 16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert_eq!(VmConfig::new(0, 16, 16).validate(), Err(MmError::InvalidConfig));
        assert_eq!(VmConfig::new(16, 16, 0).validate(), Err(MmError::InvalidConfig));
        assert_eq!(
            VmConfig::new(usize::MAX, 2, 1).validate(),
            Err(MmError::InvalidConfig)
        );
    }
}
