//! # VMM - Virtual Memory Manager
//!
//! Page tables de dois níveis dos processos simulados.
//!
//! - `pte`   - entrada (flags, compartilhamento, frame)
//! - `table` - diretório externo + arena de tabelas internas

pub mod pte;
pub mod table;

pub use pte::{PageTableEntry, PteFlags, Sharing};
pub use table::PageTable;
