use super::{level, CellKind, PortLevels, SequentialCell};

/// D flip-flop. Captures `d` on a rising edge of `clk`.
pub struct Dff {
    q: bool,
}

impl Dff {
    pub fn new() -> Self {
        // Pre-first-edge state is implementation-defined; this library picks 0.
        Self { q: false }
    }
}

impl Default for Dff {
    fn default() -> Self {
        Self::new()
    }
}

impl SequentialCell for Dff {
    fn kind(&self) -> CellKind {
        CellKind::Dff
    }

    fn input_ports(&self) -> &'static [&'static str] {
        &["clk", "d"]
    }

    fn output_ports(&self) -> &'static [&'static str] {
        &["q", "notq"]
    }

    fn trigger_ports(&self) -> &'static [&'static str] {
        &["clk"]
    }

    fn q(&self) -> bool {
        self.q
    }

    fn on_edge(&mut self, inputs: &PortLevels) {
        self.q = level(inputs, "d");
    }
}

/// D flip-flop with asynchronous reset. A rising edge of `r` is a trigger in
/// its own right, not a level sampled only at clock edges; on any trigger
/// edge a high `r` level forces `q` to 0.
pub struct Dffr {
    q: bool,
}

impl Dffr {
    pub fn new() -> Self {
        Self { q: false }
    }
}

impl Default for Dffr {
    fn default() -> Self {
        Self::new()
    }
}

impl SequentialCell for Dffr {
    fn kind(&self) -> CellKind {
        CellKind::Dffr
    }

    fn input_ports(&self) -> &'static [&'static str] {
        &["clk", "d", "r"]
    }

    fn output_ports(&self) -> &'static [&'static str] {
        &["q", "notq"]
    }

    fn trigger_ports(&self) -> &'static [&'static str] {
        &["clk", "r"]
    }

    fn q(&self) -> bool {
        self.q
    }

    fn on_edge(&mut self, inputs: &PortLevels) {
        if level(inputs, "r") {
            self.q = false;
        } else {
            self.q = level(inputs, "d");
        }
    }
}

/// D flip-flop with asynchronous set and reset. Priority on any trigger
/// edge: reset, then set, then data.
pub struct Dffsr {
    q: bool,
}

impl Dffsr {
    pub fn new() -> Self {
        Self { q: false }
    }
}

impl Default for Dffsr {
    fn default() -> Self {
        Self::new()
    }
}

impl SequentialCell for Dffsr {
    fn kind(&self) -> CellKind {
        CellKind::Dffsr
    }

    fn input_ports(&self) -> &'static [&'static str] {
        &["clk", "d", "s", "r"]
    }

    fn output_ports(&self) -> &'static [&'static str] {
        &["q", "notq"]
    }

    fn trigger_ports(&self) -> &'static [&'static str] {
        &["clk", "s", "r"]
    }

    fn q(&self) -> bool {
        self.q
    }

    fn on_edge(&mut self, inputs: &PortLevels) {
        if level(inputs, "r") {
            self.q = false;
        } else if level(inputs, "s") {
            self.q = true;
        } else {
            self.q = level(inputs, "d");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels(pairs: &[(&str, bool)]) -> PortLevels {
        pairs
            .iter()
            .map(|(port, value)| (port.to_string(), *value))
            .collect()
    }

    #[test]
    fn dff_captures_data_on_edge() {
        let mut ff = Dff::new();
        assert!(!ff.q(), "stored bit starts at 0");

        ff.on_edge(&levels(&[("d", true)]));
        assert!(ff.q());

        ff.on_edge(&levels(&[("d", false)]));
        assert!(!ff.q());
    }

    #[test]
    fn dffr_reset_overrides_data() {
        let mut ff = Dffr::new();

        ff.on_edge(&levels(&[("d", true), ("r", false)]));
        assert!(ff.q());

        // Reset level wins even with d requesting 1 on the same edge
        ff.on_edge(&levels(&[("d", true), ("r", true)]));
        assert!(!ff.q());

        // With reset released, edges capture d again
        ff.on_edge(&levels(&[("d", true), ("r", false)]));
        assert!(ff.q());
    }

    #[test]
    fn dffsr_priority_is_reset_set_data() {
        let mut ff = Dffsr::new();

        // r=1, s=1, d=1: reset wins
        ff.on_edge(&levels(&[("d", true), ("s", true), ("r", true)]));
        assert!(!ff.q(), "reset must win over set and data");

        // r=0, s=1, d=0: set wins over data
        ff.on_edge(&levels(&[("d", false), ("s", true), ("r", false)]));
        assert!(ff.q(), "set must win over data");

        // r=0, s=0, d=1: data path
        let mut ff = Dffsr::new();
        ff.on_edge(&levels(&[("d", true), ("s", false), ("r", false)]));
        assert!(ff.q(), "data must be captured when set and reset are low");
    }

    #[test]
    fn notq_always_complements_q() {
        let mut ff = Dffsr::new();
        let transitions = [
            levels(&[("d", true)]),
            levels(&[("s", true)]),
            levels(&[("r", true)]),
            levels(&[("d", false)]),
        ];

        for inputs in &transitions {
            ff.on_edge(inputs);
            let outputs = ff.outputs();
            assert_eq!(
                outputs["notq"], !outputs["q"],
                "notq must equal the complement of q after every transition"
            );
        }
    }
}
