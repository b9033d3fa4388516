//! Tipos de Erro do Subsistema de Memória
//!
//! Define erros estruturados para diagnóstico preciso de falhas em MM.
//! Esgotamento de frames é recuperável pelo chamador; os demais indicam
//! violação de contrato e nunca deixam estado parcial para trás.

/// Erros do subsistema de memória
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MmError {
    /// Todos os frames físicos estão em uso
    NoFreeFrame,
    /// VPN além de `outer_count * inner_count`
    VpnOutOfRange,
    /// PFN além de `frame_count`
    FrameOutOfBounds,
    /// Tabela interna da VPN nunca foi criada
    TableAbsent,
    /// Entrada não mapeada (inválida)
    NotMapped,
    /// Entrada já mapeada
    AlreadyMapped,
    /// Release de frame com refcount zero
    RefcountUnderflow,
    /// Frame livre usado como alvo de mapeamento compartilhado
    FrameFree,
    /// Configuração com dimensão inválida
    InvalidConfig,
    /// Contexto global ainda não inicializado
    NotInitialized,
    /// Refcount do pool diverge das page tables
    RefcountMismatch,
    /// Entrada inválida carregando frame ou flags
    CorruptEntry,
}

impl MmError {
    /// Retorna descrição legível do erro
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoFreeFrame => "OOM: sem frames físicos disponíveis",
            Self::VpnOutOfRange => "VPN fora do espaço virtual",
            Self::FrameOutOfBounds => "PFN fora do pool de frames",
            Self::TableAbsent => "Tabela interna ausente para a VPN",
            Self::NotMapped => "Página não mapeada",
            Self::AlreadyMapped => "Página já mapeada",
            Self::RefcountUnderflow => "Refcount já é zero",
            Self::FrameFree => "Frame livre referenciado por mapeamento",
            Self::InvalidConfig => "Configuração inválida",
            Self::NotInitialized => "Contexto de memória não inicializado",
            Self::RefcountMismatch => "Refcount diverge das page tables",
            Self::CorruptEntry => "PTE inválida com estado residual",
        }
    }

    /// Erros recuperáveis pelo chamador (o resto é violação de contrato).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NoFreeFrame)
    }
}

impl std::fmt::Display for MmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::error::Error for MmError {}

/// Tipo Result específico para operações de memória
pub type MmResult<T> = Result<T, MmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_exhaustion_is_recoverable() {
        assert!(MmError::NoFreeFrame.is_recoverable());
        assert!(!MmError::TableAbsent.is_recoverable());
        assert!(!MmError::RefcountUnderflow.is_recoverable());
    }

    #[test]
    fn display_uses_description() {
        assert_eq!(MmError::NotMapped.to_string(), "Página não mapeada");
    }
}
