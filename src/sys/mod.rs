//! System Interface.
//!
//! Ponto de contato com o framework externo (tradução de endereços,
//! bootstrap da lista de processos). O núcleo do simulador está em `mm` e
//! `core::process`; aqui fica apenas a fachada global.

pub mod vm;
