/// Cell identifier carrying the cell type alongside the instance name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId {
    pub(crate) id: String,
    pub(crate) cell_type: String,
}

impl CellId {
    /// Create a new cell ID
    pub fn new(id: String, cell_type: String) -> Self {
        Self { id, cell_type }
    }

    /// Get the raw ID string
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get the cell type name
    pub fn cell_type(&self) -> &str {
        &self.cell_type
    }

    /// Create an output port handle
    pub fn output(&self, port: &str) -> OutputPort {
        OutputPort {
            cell_id: self.clone(),
            port_name: port.to_string(),
        }
    }

    /// Create an input port handle
    pub fn input(&self, port: &str) -> InputPort {
        InputPort {
            cell_id: self.clone(),
            port_name: port.to_string(),
        }
    }
}

impl std::fmt::Display for CellId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Handle for an output port
#[derive(Debug, Clone)]
pub struct OutputPort {
    pub(crate) cell_id: CellId,
    pub(crate) port_name: String,
}

impl OutputPort {
    pub fn cell_id(&self) -> &CellId {
        &self.cell_id
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

/// Handle for an input port
#[derive(Debug, Clone)]
pub struct InputPort {
    pub(crate) cell_id: CellId,
    pub(crate) port_name: String,
}

impl InputPort {
    pub fn cell_id(&self) -> &CellId {
        &self.cell_id
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}
