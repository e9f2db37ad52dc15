pub mod core;

// Re-export commonly used types
pub use crate::core::cells::{CellInstance, CellInterface, CellKind};
pub use crate::core::engine::SimEngine;
pub use crate::core::netlist::{Netlist, NetlistStats};
pub use crate::core::types::{CellId, InputPort, OutputPort};
