use super::{level, single, CellKind, CombinationalCell, PortLevels};

/// Define a two-input gate with ports `a`, `b` -> `out`
macro_rules! binary_gate {
    ($name:ident, $kind:expr, $op:expr) => {
        pub struct $name;

        impl CombinationalCell for $name {
            fn kind(&self) -> CellKind {
                $kind
            }

            fn input_ports(&self) -> &'static [&'static str] {
                &["a", "b"]
            }

            fn output_ports(&self) -> &'static [&'static str] {
                &["out"]
            }

            fn evaluate(&self, inputs: &PortLevels) -> PortLevels {
                let a = level(inputs, "a");
                let b = level(inputs, "b");
                single("out", ($op)(a, b))
            }
        }
    };
}

binary_gate!(AndCell, CellKind::And, |a, b| a && b);
binary_gate!(OrCell, CellKind::Or, |a, b| a || b);
binary_gate!(XorCell, CellKind::Xor, |a, b| a != b);
binary_gate!(NandCell, CellKind::Nand, |a, b| !(a && b));
binary_gate!(NorCell, CellKind::Nor, |a, b| !(a || b));
binary_gate!(XnorCell, CellKind::Xnor, |a, b| a == b);

pub struct BufferCell;

impl CombinationalCell for BufferCell {
    fn kind(&self) -> CellKind {
        CellKind::Buffer
    }

    fn input_ports(&self) -> &'static [&'static str] {
        &["in"]
    }

    fn output_ports(&self) -> &'static [&'static str] {
        &["out"]
    }

    fn evaluate(&self, inputs: &PortLevels) -> PortLevels {
        single("out", level(inputs, "in"))
    }
}

pub struct NotCell;

impl CombinationalCell for NotCell {
    fn kind(&self) -> CellKind {
        CellKind::Not
    }

    fn input_ports(&self) -> &'static [&'static str] {
        &["in"]
    }

    fn output_ports(&self) -> &'static [&'static str] {
        &["out"]
    }

    fn evaluate(&self, inputs: &PortLevels) -> PortLevels {
        single("out", !level(inputs, "in"))
    }
}

/// 2:1 multiplexer. Selects `b` when `sel` is high, `a` otherwise.
pub struct MuxCell;

impl CombinationalCell for MuxCell {
    fn kind(&self) -> CellKind {
        CellKind::Mux
    }

    fn input_ports(&self) -> &'static [&'static str] {
        &["a", "b", "sel"]
    }

    fn output_ports(&self) -> &'static [&'static str] {
        &["out"]
    }

    fn evaluate(&self, inputs: &PortLevels) -> PortLevels {
        let value = if level(inputs, "sel") {
            level(inputs, "b")
        } else {
            level(inputs, "a")
        };
        single("out", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval1(cell: &dyn CombinationalCell, value: bool) -> bool {
        let out = cell.evaluate(&single("in", value));
        out["out"]
    }

    fn eval2(cell: &dyn CombinationalCell, a: bool, b: bool) -> bool {
        let mut inputs = PortLevels::new();
        inputs.insert("a".to_string(), a);
        inputs.insert("b".to_string(), b);
        cell.evaluate(&inputs)["out"]
    }

    fn eval_mux(a: bool, b: bool, sel: bool) -> bool {
        let mut inputs = PortLevels::new();
        inputs.insert("a".to_string(), a);
        inputs.insert("b".to_string(), b);
        inputs.insert("sel".to_string(), sel);
        MuxCell.evaluate(&inputs)["out"]
    }

    #[test]
    fn binary_gate_truth_tables() {
        for a in [false, true] {
            for b in [false, true] {
                assert_eq!(eval2(&AndCell, a, b), a && b, "and({}, {})", a, b);
                assert_eq!(eval2(&OrCell, a, b), a || b, "or({}, {})", a, b);
                assert_eq!(eval2(&XorCell, a, b), a != b, "xor({}, {})", a, b);
                assert_eq!(eval2(&NandCell, a, b), !(a && b), "nand({}, {})", a, b);
                assert_eq!(eval2(&NorCell, a, b), !(a || b), "nor({}, {})", a, b);
                assert_eq!(eval2(&XnorCell, a, b), a == b, "xnor({}, {})", a, b);
            }
        }
    }

    #[test]
    fn buffer_passes_and_not_inverts() {
        for value in [false, true] {
            assert_eq!(eval1(&BufferCell, value), value, "buffer({})", value);
            assert_eq!(eval1(&NotCell, value), !value, "not({})", value);
        }
    }

    #[test]
    fn mux_selects_b_when_sel_high() {
        for a in [false, true] {
            for b in [false, true] {
                assert_eq!(eval_mux(a, b, false), a, "mux({}, {}, 0) must select a", a, b);
                assert_eq!(eval_mux(a, b, true), b, "mux({}, {}, 1) must select b", a, b);
            }
        }
    }

    #[test]
    fn evaluation_is_idempotent() {
        let mut inputs = PortLevels::new();
        inputs.insert("a".to_string(), true);
        inputs.insert("b".to_string(), false);

        let first = XorCell.evaluate(&inputs);
        let second = XorCell.evaluate(&inputs);
        assert_eq!(first, second, "re-evaluation on stable inputs must not change");
    }

    #[test]
    fn undriven_inputs_read_as_zero() {
        let out = AndCell.evaluate(&PortLevels::new());
        assert_eq!(out["out"], false);
        let out = NorCell.evaluate(&PortLevels::new());
        assert_eq!(out["out"], true);
    }
}
