use std::collections::{HashMap, HashSet};

use super::cells::{CellInstance, CellKind};
use super::engine::SimEngine;
use super::types::{CellId, InputPort, OutputPort};

/// Cell-type names reserved for top-level circuit ports
pub(crate) const INPUT_TYPE: &str = "input";
pub(crate) const OUTPUT_TYPE: &str = "output";

/// Port names carried by the top-level pseudo cells
pub(crate) const SOURCE_PORT: &str = "out";
pub(crate) const SINK_PORT: &str = "in";

/// Imperative API for wiring cells into a circuit
///
/// Cells are instantiated from the catalog, top-level circuit ports are
/// declared by name, and output ports are wired to input ports. `build`
/// validates the wiring and produces a [`SimEngine`].
pub struct Netlist {
    /// Instantiated cells mapped by ID
    cells: HashMap<CellId, CellInstance>,
    /// Top-level input ports by name; each drives a single `out` net
    inputs: HashMap<String, CellId>,
    /// Top-level output ports by name; each sinks a single `in` net
    outputs: HashMap<String, CellId>,
    /// Port connections: (source_id, source_port) -> Vec<(target_id, target_port)>
    connections: HashMap<(CellId, String), Vec<(CellId, String)>>,
    /// Counter for automatic ID generation
    id_counter: u64,
}

impl Netlist {
    /// Create an empty netlist
    pub fn new() -> Self {
        Self {
            cells: HashMap::new(),
            inputs: HashMap::new(),
            outputs: HashMap::new(),
            connections: HashMap::new(),
            id_counter: 0,
        }
    }

    /// Add a cell with an automatically generated ID
    pub fn add_cell(&mut self, kind: CellKind) -> CellId {
        loop {
            let id_string = format!("{}{}", kind.name(), self.id_counter);
            self.id_counter += 1;

            let id = CellId::new(id_string, kind.name().to_string());
            if !self.cells.contains_key(&id) {
                self.cells.insert(id.clone(), kind.instantiate());
                return id;
            }
        }
    }

    /// Add a cell with a specific ID
    pub fn add_cell_with_id(&mut self, kind: CellKind, id_string: &str) -> Result<CellId, String> {
        let id = CellId::new(id_string.to_string(), kind.name().to_string());
        if self.cells.contains_key(&id) {
            return Err(format!("Cell with ID '{}' already exists", id_string));
        }
        self.cells.insert(id.clone(), kind.instantiate());
        Ok(id)
    }

    /// Declare a named top-level input port
    pub fn add_input(&mut self, name: &str) -> Result<CellId, String> {
        if self.inputs.contains_key(name) {
            return Err(format!("Top-level input '{}' already exists", name));
        }
        let id = CellId::new(name.to_string(), INPUT_TYPE.to_string());
        self.inputs.insert(name.to_string(), id.clone());
        Ok(id)
    }

    /// Declare a named top-level output port
    pub fn add_output(&mut self, name: &str) -> Result<CellId, String> {
        if self.outputs.contains_key(name) {
            return Err(format!("Top-level output '{}' already exists", name));
        }
        let id = CellId::new(name.to_string(), OUTPUT_TYPE.to_string());
        self.outputs.insert(name.to_string(), id.clone());
        Ok(id)
    }

    /// Connect an output port to an input port
    ///
    /// Fan-out from one output to many inputs is allowed; a second driver on
    /// the same input is rejected.
    pub fn connect(&mut self, source: OutputPort, target: InputPort) -> Result<(), String> {
        let source_id = source.cell_id().clone();
        let source_port = source.port_name().to_string();
        let target_id = target.cell_id().clone();
        let target_port = target.port_name().to_string();

        self.validate_source(&source_id, &source_port)?;
        self.validate_target(&target_id, &target_port)?;

        // Check for input port collision
        for targets in self.connections.values() {
            if targets
                .iter()
                .any(|(tid, tport)| tid == &target_id && tport == &target_port)
            {
                return Err(format!(
                    "Input port '{}' on '{}' is already connected. Multiple drivers not allowed.",
                    target_port, target_id
                ));
            }
        }

        self.connections
            .entry((source_id, source_port))
            .or_default()
            .push((target_id, target_port));
        Ok(())
    }

    fn validate_source(&self, id: &CellId, port: &str) -> Result<(), String> {
        if let Some(instance) = self.cells.get(id) {
            if !instance.output_ports().iter().any(|p| *p == port) {
                return Err(format!(
                    "Output port '{}' not found on cell '{}'. Valid ports: {:?}",
                    port,
                    id,
                    instance.output_ports()
                ));
            }
            return Ok(());
        }
        if self.inputs.values().any(|input_id| input_id == id) {
            if port != SOURCE_PORT {
                return Err(format!(
                    "Top-level input '{}' only drives port '{}'",
                    id, SOURCE_PORT
                ));
            }
            return Ok(());
        }
        Err(format!("Source cell '{}' not found", id))
    }

    fn validate_target(&self, id: &CellId, port: &str) -> Result<(), String> {
        if let Some(instance) = self.cells.get(id) {
            if !instance.input_ports().iter().any(|p| *p == port) {
                return Err(format!(
                    "Input port '{}' not found on cell '{}'. Valid ports: {:?}",
                    port,
                    id,
                    instance.input_ports()
                ));
            }
            return Ok(());
        }
        if self.outputs.values().any(|output_id| output_id == id) {
            if port != SINK_PORT {
                return Err(format!(
                    "Top-level output '{}' only sinks port '{}'",
                    id, SINK_PORT
                ));
            }
            return Ok(());
        }
        Err(format!("Target cell '{}' not found", id))
    }

    /// Validate that every input net is driven
    fn validate_connections(&self) -> Result<(), String> {
        let mut driven: HashSet<(CellId, String)> = HashSet::new();
        for targets in self.connections.values() {
            for target in targets {
                driven.insert(target.clone());
            }
        }

        // Sort for deterministic error reporting
        let mut cell_ids: Vec<&CellId> = self.cells.keys().collect();
        cell_ids.sort();

        for id in cell_ids {
            for port in self.cells[id].input_ports() {
                if !driven.contains(&((*id).clone(), (*port).to_string())) {
                    return Err(format!(
                        "Required input port '{}' on cell '{}' is not connected",
                        port, id
                    ));
                }
            }
        }

        let mut output_names: Vec<&String> = self.outputs.keys().collect();
        output_names.sort();

        for name in output_names {
            let id = &self.outputs[name];
            if !driven.contains(&(id.clone(), SINK_PORT.to_string())) {
                return Err(format!("Top-level output '{}' is not connected", name));
            }
        }

        Ok(())
    }

    /// Build the netlist into a SimEngine
    pub fn build(self) -> Result<SimEngine, String> {
        self.validate_connections()?;

        let mut engine = SimEngine::new();

        for (id, instance) in self.cells {
            engine.register_cell(id, instance);
        }
        for (name, id) in self.inputs {
            engine.register_input(name, id);
        }
        for (name, id) in self.outputs {
            engine.register_output(name, id);
        }
        for (source, targets) in self.connections {
            for target in targets {
                engine.connect(source.clone(), target);
            }
        }

        engine.build_eval_order()?;
        engine.initialize();
        Ok(engine)
    }

    /// Get netlist statistics
    pub fn stats(&self) -> NetlistStats {
        let sequential_cells = self
            .cells
            .values()
            .filter(|instance| instance.is_sequential())
            .count();

        NetlistStats {
            total_cells: self.cells.len(),
            combinational_cells: self.cells.len() - sequential_cells,
            sequential_cells,
            top_level_inputs: self.inputs.len(),
            top_level_outputs: self.outputs.len(),
            total_connections: self.connections.values().map(Vec::len).sum(),
        }
    }

    /// Get all cell IDs
    pub fn cell_ids(&self) -> Vec<&CellId> {
        self.cells.keys().collect()
    }

    /// Check if a cell exists
    pub fn has_cell(&self, id: &CellId) -> bool {
        self.cells.contains_key(id)
    }
}

impl Default for Netlist {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics about the netlist configuration
#[derive(Debug, Clone)]
pub struct NetlistStats {
    pub total_cells: usize,
    pub combinational_cells: usize,
    pub sequential_cells: usize,
    pub top_level_inputs: usize,
    pub top_level_outputs: usize,
    pub total_connections: usize,
}
