pub mod flipflops;
pub mod gates;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Map from port name to the single-bit level currently on that port
pub type PortLevels = HashMap<String, bool>;

/// Read a port level, treating an undriven port as logic 0
pub(crate) fn level(inputs: &PortLevels, port: &str) -> bool {
    inputs.get(port).copied().unwrap_or(false)
}

/// Build a single-entry output map
pub(crate) fn single(port: &str, value: bool) -> PortLevels {
    let mut outputs = PortLevels::new();
    outputs.insert(port.to_string(), value);
    outputs
}

/// Combinational cell trait for pure single-bit logic
///
/// A combinational cell computes its output levels from its current input
/// levels alone. Evaluation is referentially transparent: it has no side
/// effects and may run any number of times, in any order relative to other
/// cells, as long as the inputs are stable.
pub trait CombinationalCell: Send {
    /// The catalog kind of this cell
    fn kind(&self) -> CellKind;

    /// Names of all input ports
    fn input_ports(&self) -> &'static [&'static str];

    /// Names of all output ports
    fn output_ports(&self) -> &'static [&'static str];

    /// Compute output levels from the given input levels
    fn evaluate(&self, inputs: &PortLevels) -> PortLevels;
}

/// Sequential cell trait for edge-triggered single-bit storage
///
/// A sequential cell holds exactly one bit of state `q`. The engine calls
/// `on_edge` whenever at least one of the cell's trigger ports sees a rising
/// transition; the update rule then consults the current input *levels*,
/// with reset taking priority over set, and set over data. The `notq`
/// output is derived from `q` on every read, never stored separately.
pub trait SequentialCell: Send {
    /// The catalog kind of this cell
    fn kind(&self) -> CellKind;

    /// Names of all input ports
    fn input_ports(&self) -> &'static [&'static str];

    /// Names of all output ports
    fn output_ports(&self) -> &'static [&'static str];

    /// Input ports whose rising edges trigger a state update
    fn trigger_ports(&self) -> &'static [&'static str];

    /// The currently stored bit
    fn q(&self) -> bool;

    /// Apply the update rule using the current input levels
    fn on_edge(&mut self, inputs: &PortLevels);

    /// Output levels derived from the stored bit
    fn outputs(&self) -> PortLevels {
        let mut outputs = PortLevels::new();
        outputs.insert("q".to_string(), self.q());
        outputs.insert("notq".to_string(), !self.q());
        outputs
    }
}

/// The fixed catalog of leaf cell kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Buffer,
    And,
    Or,
    Xor,
    Nand,
    Nor,
    Xnor,
    Not,
    Mux,
    Dff,
    Dffr,
    Dffsr,
}

impl CellKind {
    /// All cell kinds in catalog order
    pub fn all() -> [CellKind; 12] {
        [
            CellKind::Buffer,
            CellKind::And,
            CellKind::Or,
            CellKind::Xor,
            CellKind::Nand,
            CellKind::Nor,
            CellKind::Xnor,
            CellKind::Not,
            CellKind::Mux,
            CellKind::Dff,
            CellKind::Dffr,
            CellKind::Dffsr,
        ]
    }

    /// Lower-case catalog name of this kind
    pub fn name(&self) -> &'static str {
        match self {
            CellKind::Buffer => "buffer",
            CellKind::And => "and",
            CellKind::Or => "or",
            CellKind::Xor => "xor",
            CellKind::Nand => "nand",
            CellKind::Nor => "nor",
            CellKind::Xnor => "xnor",
            CellKind::Not => "not",
            CellKind::Mux => "mux",
            CellKind::Dff => "dff",
            CellKind::Dffr => "dffr",
            CellKind::Dffsr => "dffsr",
        }
    }

    /// Look up a kind by its catalog name
    pub fn from_name(name: &str) -> Option<CellKind> {
        CellKind::all().into_iter().find(|kind| kind.name() == name)
    }

    /// Whether this kind holds a bit of state
    pub fn is_sequential(&self) -> bool {
        matches!(self, CellKind::Dff | CellKind::Dffr | CellKind::Dffsr)
    }

    /// Static port interface of this kind, for catalog consumers
    pub fn interface(&self) -> CellInterface {
        match self {
            CellKind::Buffer => CellInterface::combinational(*self, &["in"]),
            CellKind::And
            | CellKind::Or
            | CellKind::Xor
            | CellKind::Nand
            | CellKind::Nor
            | CellKind::Xnor => CellInterface::combinational(*self, &["a", "b"]),
            CellKind::Not => CellInterface::combinational(*self, &["in"]),
            CellKind::Mux => CellInterface::combinational(*self, &["a", "b", "sel"]),
            CellKind::Dff => CellInterface::sequential(*self, &["clk", "d"], &["clk"]),
            CellKind::Dffr => CellInterface::sequential(*self, &["clk", "d", "r"], &["clk", "r"]),
            CellKind::Dffsr => {
                CellInterface::sequential(*self, &["clk", "d", "s", "r"], &["clk", "s", "r"])
            }
        }
    }

    /// Create a fresh instance of this kind
    pub fn instantiate(&self) -> CellInstance {
        match self {
            CellKind::Buffer => CellInstance::Combinational(Box::new(gates::BufferCell)),
            CellKind::And => CellInstance::Combinational(Box::new(gates::AndCell)),
            CellKind::Or => CellInstance::Combinational(Box::new(gates::OrCell)),
            CellKind::Xor => CellInstance::Combinational(Box::new(gates::XorCell)),
            CellKind::Nand => CellInstance::Combinational(Box::new(gates::NandCell)),
            CellKind::Nor => CellInstance::Combinational(Box::new(gates::NorCell)),
            CellKind::Xnor => CellInstance::Combinational(Box::new(gates::XnorCell)),
            CellKind::Not => CellInstance::Combinational(Box::new(gates::NotCell)),
            CellKind::Mux => CellInstance::Combinational(Box::new(gates::MuxCell)),
            CellKind::Dff => CellInstance::Sequential(Box::new(flipflops::Dff::new())),
            CellKind::Dffr => CellInstance::Sequential(Box::new(flipflops::Dffr::new())),
            CellKind::Dffsr => CellInstance::Sequential(Box::new(flipflops::Dffsr::new())),
        }
    }
}

impl std::fmt::Display for CellKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Static port interface of a cell kind
///
/// This is the boundary contract consumed by an external exporter: a fixed
/// named list of single-bit input and output ports per cell kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellInterface {
    pub kind: CellKind,
    pub inputs: &'static [&'static str],
    pub outputs: &'static [&'static str],
    pub triggers: &'static [&'static str],
    pub sequential: bool,
}

impl CellInterface {
    fn combinational(kind: CellKind, inputs: &'static [&'static str]) -> Self {
        Self {
            kind,
            inputs,
            outputs: &["out"],
            triggers: &[],
            sequential: false,
        }
    }

    fn sequential(
        kind: CellKind,
        inputs: &'static [&'static str],
        triggers: &'static [&'static str],
    ) -> Self {
        Self {
            kind,
            inputs,
            outputs: &["q", "notq"],
            triggers,
            sequential: true,
        }
    }
}

/// Enum representing an instantiated cell of either flavor
pub enum CellInstance {
    Combinational(Box<dyn CombinationalCell>),
    Sequential(Box<dyn SequentialCell>),
}

impl CellInstance {
    /// Get the catalog kind of this instance
    pub fn kind(&self) -> CellKind {
        match self {
            CellInstance::Combinational(cell) => cell.kind(),
            CellInstance::Sequential(cell) => cell.kind(),
        }
    }

    /// Names of all input ports
    pub fn input_ports(&self) -> &'static [&'static str] {
        match self {
            CellInstance::Combinational(cell) => cell.input_ports(),
            CellInstance::Sequential(cell) => cell.input_ports(),
        }
    }

    /// Names of all output ports
    pub fn output_ports(&self) -> &'static [&'static str] {
        match self {
            CellInstance::Combinational(cell) => cell.output_ports(),
            CellInstance::Sequential(cell) => cell.output_ports(),
        }
    }

    /// Check if this is a sequential instance
    pub fn is_sequential(&self) -> bool {
        matches!(self, CellInstance::Sequential(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lists_all_twelve_cells() {
        assert_eq!(CellKind::all().len(), 12);
    }

    #[test]
    fn names_round_trip_through_lookup() {
        for kind in CellKind::all() {
            assert_eq!(
                CellKind::from_name(kind.name()),
                Some(kind),
                "name '{}' should resolve back to its kind",
                kind.name()
            );
        }
        assert_eq!(CellKind::from_name("latch"), None);
    }

    #[test]
    fn interfaces_agree_with_instances() {
        for kind in CellKind::all() {
            let interface = kind.interface();
            let instance = kind.instantiate();

            assert_eq!(instance.kind(), kind);
            assert_eq!(interface.inputs, instance.input_ports(), "{} inputs", kind);
            assert_eq!(interface.outputs, instance.output_ports(), "{} outputs", kind);
            assert_eq!(interface.sequential, instance.is_sequential(), "{} flavor", kind);
            assert_eq!(interface.sequential, kind.is_sequential());

            if let CellInstance::Sequential(cell) = &instance {
                assert_eq!(interface.triggers, cell.trigger_ports(), "{} triggers", kind);
            } else {
                assert!(interface.triggers.is_empty());
            }
        }
    }

    #[test]
    fn trigger_ports_are_inputs() {
        for kind in CellKind::all() {
            let interface = kind.interface();
            for trigger in interface.triggers {
                assert!(
                    interface.inputs.contains(trigger),
                    "trigger '{}' of {} must be an input port",
                    trigger,
                    kind
                );
            }
        }
    }
}
