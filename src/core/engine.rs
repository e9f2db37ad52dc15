use std::collections::{HashMap, VecDeque};

use log::{debug, trace};

use super::cells::{CellInstance, CombinationalCell, PortLevels, SequentialCell};
use super::netlist::{SINK_PORT, SOURCE_PORT};
use super::types::{CellId, OutputPort};

/// Cap on propagate/edge-scan rounds inside one settle call. A chain of n
/// flip-flops ripples in at most n rounds, so hitting the cap means the
/// circuit oscillates.
const MAX_SETTLE_ITERATIONS: usize = 1024;

/// Evaluates a built netlist until every net is stable
///
/// Combinational cells recompute in dependency order whenever inputs change;
/// sequential cells fire only on rising transitions of their trigger ports.
/// All nets start at logic 0.
pub struct SimEngine {
    comb_cells: HashMap<CellId, Box<dyn CombinationalCell>>,
    seq_cells: HashMap<CellId, Box<dyn SequentialCell>>,

    // Port connections: (source_id, port) -> Vec<(target_id, port)>
    connections: HashMap<(CellId, String), Vec<(CellId, String)>>,

    // Reverse map: (target_id, input port) -> driving (source_id, output port)
    drivers: HashMap<(CellId, String), (CellId, String)>,

    // Topologically sorted evaluation order for combinational cells
    eval_order: Vec<CellId>,

    // Top-level circuit ports
    inputs: HashMap<String, CellId>,
    outputs: HashMap<String, CellId>,

    // Values driven onto top-level inputs
    input_values: HashMap<CellId, bool>,

    // Current value of every source net
    net_values: HashMap<(CellId, String), bool>,

    // Trigger-port levels as of the last edge scan
    prev_triggers: HashMap<(CellId, String), bool>,

    settle_count: u64,
}

impl SimEngine {
    pub(crate) fn new() -> Self {
        Self {
            comb_cells: HashMap::new(),
            seq_cells: HashMap::new(),
            connections: HashMap::new(),
            drivers: HashMap::new(),
            eval_order: Vec::new(),
            inputs: HashMap::new(),
            outputs: HashMap::new(),
            input_values: HashMap::new(),
            net_values: HashMap::new(),
            prev_triggers: HashMap::new(),
            settle_count: 0,
        }
    }

    pub(crate) fn register_cell(&mut self, id: CellId, instance: CellInstance) {
        match instance {
            CellInstance::Combinational(cell) => {
                self.comb_cells.insert(id, cell);
            }
            CellInstance::Sequential(cell) => {
                self.seq_cells.insert(id, cell);
            }
        }
    }

    pub(crate) fn register_input(&mut self, name: String, id: CellId) {
        self.inputs.insert(name, id);
    }

    pub(crate) fn register_output(&mut self, name: String, id: CellId) {
        self.outputs.insert(name, id);
    }

    pub(crate) fn connect(&mut self, source: (CellId, String), target: (CellId, String)) {
        self.drivers.insert(target.clone(), source.clone());
        self.connections.entry(source).or_default().push(target);
    }

    /// Analyzes the graph of combinational cells to build a topologically
    /// sorted evaluation order. Uses Kahn's algorithm to detect cycles and
    /// ensure deterministic evaluation. Paths through flip-flops do not
    /// create combinational edges.
    pub(crate) fn build_eval_order(&mut self) -> Result<(), String> {
        let mut adj_list: HashMap<CellId, Vec<CellId>> = HashMap::new();
        let mut in_degree: HashMap<CellId, usize> = HashMap::new();

        for cell_id in self.comb_cells.keys() {
            in_degree.insert(cell_id.clone(), 0);
            adj_list.insert(cell_id.clone(), Vec::new());
        }

        for ((source_id, _source_port), targets) in &self.connections {
            if !self.comb_cells.contains_key(source_id) {
                continue;
            }

            for (target_id, _target_port) in targets {
                if !self.comb_cells.contains_key(target_id) {
                    continue;
                }

                adj_list.get_mut(source_id).unwrap().push(target_id.clone());
                *in_degree.get_mut(target_id).unwrap() += 1;
            }
        }

        // Kahn's algorithm, with sorted tie-breaks for deterministic order
        let mut queue_vec: Vec<CellId> = in_degree
            .iter()
            .filter(|(_, &degree)| degree == 0)
            .map(|(id, _)| id.clone())
            .collect();
        queue_vec.sort();
        let mut queue: VecDeque<CellId> = queue_vec.into();

        let mut sorted_order = Vec::new();

        while let Some(u) = queue.pop_front() {
            sorted_order.push(u.clone());

            if let Some(neighbors) = adj_list.get(&u) {
                let mut new_zero_degree = Vec::new();
                for v in neighbors {
                    if let Some(degree) = in_degree.get_mut(v) {
                        *degree -= 1;
                        if *degree == 0 {
                            new_zero_degree.push(v.clone());
                        }
                    }
                }
                new_zero_degree.sort();
                for v in new_zero_degree {
                    queue.push_back(v);
                }
            }
        }

        if sorted_order.len() == self.comb_cells.len() {
            self.eval_order = sorted_order;
            Ok(())
        } else {
            Err("Combinational cycle detected in cell dependencies".to_string())
        }
    }

    /// Propagate once and record baseline trigger levels without firing.
    /// Derived nets like `notq` start high, so the baseline cannot simply be
    /// all-zero.
    pub(crate) fn initialize(&mut self) {
        self.propagate();

        let ids: Vec<CellId> = self.seq_cells.keys().cloned().collect();
        for id in ids {
            let triggers = self.seq_cells[&id].trigger_ports();
            for port in triggers {
                let key = (id.clone(), (*port).to_string());
                let level = self.trigger_level(&key);
                self.prev_triggers.insert(key, level);
            }
        }
    }

    /// Drive a top-level input. Takes effect at the next settle.
    pub fn set_input(&mut self, name: &str, value: bool) -> Result<(), String> {
        let id = self
            .inputs
            .get(name)
            .ok_or_else(|| format!("Top-level input '{}' not found", name))?
            .clone();
        self.input_values.insert(id, value);
        Ok(())
    }

    /// Propagate signal changes until every net is stable
    ///
    /// Each round evaluates the combinational cells in dependency order and
    /// then scans flip-flop trigger ports for rising edges. Flip-flops that
    /// fired publish new `q`/`notq` values in the next round, so a `q` wired
    /// to another flip-flop's clock ripples within the same settle.
    pub fn settle(&mut self) -> Result<(), String> {
        for iteration in 0..MAX_SETTLE_ITERATIONS {
            self.propagate();
            let fired = self.scan_edges();

            if fired == 0 {
                self.settle_count += 1;
                debug!(
                    "settle {} stable after {} iteration(s)",
                    self.settle_count,
                    iteration + 1
                );
                return Ok(());
            }
            trace!("settle iteration {}: {} flip-flop(s) fired", iteration + 1, fired);
        }

        Err(format!(
            "Circuit did not settle within {} iterations; flip-flop triggers are oscillating",
            MAX_SETTLE_ITERATIONS
        ))
    }

    /// Drive a top-level input high then low, settling after each change
    pub fn pulse(&mut self, name: &str) -> Result<(), String> {
        self.set_input(name, true)?;
        self.settle()?;
        self.set_input(name, false)?;
        self.settle()
    }

    /// Read a settled top-level output
    pub fn output(&self, name: &str) -> Result<bool, String> {
        let id = self
            .outputs
            .get(name)
            .ok_or_else(|| format!("Top-level output '{}' not found", name))?;
        let source = self
            .drivers
            .get(&(id.clone(), SINK_PORT.to_string()))
            .ok_or_else(|| format!("Top-level output '{}' is not connected", name))?;
        Ok(self.net_values.get(source).copied().unwrap_or(false))
    }

    /// Read the settled value on any cell output net
    pub fn probe(&self, port: &OutputPort) -> bool {
        self.net_values
            .get(&(port.cell_id().clone(), port.port_name().to_string()))
            .copied()
            .unwrap_or(false)
    }

    /// Number of completed settle calls
    pub fn settle_count(&self) -> u64 {
        self.settle_count
    }

    /// Returns the combinational evaluation order for debugging/inspection
    pub fn eval_order(&self) -> &[CellId] {
        &self.eval_order
    }

    /// Publish top-level inputs and flip-flop outputs, then evaluate the
    /// combinational cells in topological order
    fn propagate(&mut self) {
        let SimEngine {
            comb_cells,
            seq_cells,
            eval_order,
            drivers,
            inputs,
            input_values,
            net_values,
            ..
        } = self;

        for id in inputs.values() {
            let value = input_values.get(id).copied().unwrap_or(false);
            net_values.insert((id.clone(), SOURCE_PORT.to_string()), value);
        }

        for (id, cell) in seq_cells.iter() {
            for (port, value) in cell.outputs() {
                net_values.insert((id.clone(), port), value);
            }
        }

        for id in eval_order.iter() {
            if let Some(cell) = comb_cells.get(id) {
                let levels = gather_levels(drivers, net_values, id, cell.input_ports());
                for (port, value) in cell.evaluate(&levels) {
                    net_values.insert((id.clone(), port), value);
                }
            }
        }
    }

    /// Detect rising edges on flip-flop trigger ports and fire the update
    /// rule on every cell with at least one new edge. Returns the number of
    /// cells fired.
    fn scan_edges(&mut self) -> usize {
        let mut ids: Vec<CellId> = self.seq_cells.keys().cloned().collect();
        ids.sort();

        let mut fired = 0;
        for id in ids {
            let triggers = self.seq_cells[&id].trigger_ports();

            let mut edge = false;
            for port in triggers {
                let key = (id.clone(), (*port).to_string());
                let now = self.trigger_level(&key);
                let before = self.prev_triggers.insert(key, now).unwrap_or(false);
                if now && !before {
                    edge = true;
                }
            }

            if !edge {
                continue;
            }

            let input_ports = self.seq_cells[&id].input_ports();
            let levels = gather_levels(&self.drivers, &self.net_values, &id, input_ports);

            if let Some(cell) = self.seq_cells.get_mut(&id) {
                cell.on_edge(&levels);
                trace!("flip-flop '{}' fired: q={}", id, cell.q());
                fired += 1;
            }
        }
        fired
    }

    /// Current level on the net driving a trigger port
    fn trigger_level(&self, key: &(CellId, String)) -> bool {
        self.drivers
            .get(key)
            .and_then(|source| self.net_values.get(source))
            .copied()
            .unwrap_or(false)
    }
}

/// Gather the levels on the nets driving the given input ports
fn gather_levels(
    drivers: &HashMap<(CellId, String), (CellId, String)>,
    net_values: &HashMap<(CellId, String), bool>,
    id: &CellId,
    ports: &[&str],
) -> PortLevels {
    let mut levels = PortLevels::new();
    for port in ports {
        if let Some(source) = drivers.get(&(id.clone(), (*port).to_string())) {
            let value = net_values.get(source).copied().unwrap_or(false);
            levels.insert((*port).to_string(), value);
        }
    }
    levels
}
