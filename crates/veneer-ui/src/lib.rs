//! UI panels built on `veneer-core` (data-grid primitives for now).

pub mod datagrid;

pub use datagrid::*;
