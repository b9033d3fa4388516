//! Core Module
//!
//! Contém a infraestrutura central do simulador: o sistema de logging e o
//! gerenciamento de processos (registro, troca e fork).

pub mod logging;
pub mod process;
