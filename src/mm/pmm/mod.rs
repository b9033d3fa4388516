//! # PMM - Physical Memory Manager
//!
//! Gerencia o pool fixo de frames físicos simulados e o refcount de cada um.

pub mod frame;
pub mod pool;
pub mod stats;

pub use frame::{FrameInfo, FrameSnapshot};
pub use pool::FramePool;
pub use stats::PmmStats;
