//! Domain models for the stock dashboard

mod inventory;
pub mod operation;
mod product;
mod region;
mod role;

pub use inventory::*;
pub use operation::{OperationType, UnknownOperationType};
pub use product::*;
pub use region::*;
pub use role::*;
