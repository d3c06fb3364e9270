//! Pure data structures (DTOs) managed by the resource actors.

pub mod inventory;
pub mod order;

pub use inventory::*;
pub use order::*;
