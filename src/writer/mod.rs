//! Binding generators that write source files for compiled contracts.

pub mod abi;
pub mod rust;

pub use rust::RustBindings;
