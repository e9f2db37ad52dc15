pub mod cells;
pub mod engine;
pub mod netlist;
pub mod types;
