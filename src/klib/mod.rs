//! Simulator Library (KLib).
//!
//! Utilitários internos sem relação direta com o MM.

pub mod test_framework;
