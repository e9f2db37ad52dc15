use lsim::{CellKind, Netlist};

fn main() -> Result<(), String> {
    env_logger::init();

    println!("=== Two-bit ripple counter ===");

    let mut netlist = Netlist::new();
    let clk = netlist.add_input("clk")?;
    let bit0 = netlist.add_cell_with_id(CellKind::Dff, "bit0")?;
    let bit1 = netlist.add_cell_with_id(CellKind::Dff, "bit1")?;
    let b0 = netlist.add_output("b0")?;
    let b1 = netlist.add_output("b1")?;

    // Each bit toggles by feeding notq back into d; the next bit clocks off
    // the previous bit's notq.
    netlist.connect(clk.output("out"), bit0.input("clk"))?;
    netlist.connect(bit0.output("notq"), bit0.input("d"))?;
    netlist.connect(bit0.output("notq"), bit1.input("clk"))?;
    netlist.connect(bit1.output("notq"), bit1.input("d"))?;
    netlist.connect(bit0.output("q"), b0.input("in"))?;
    netlist.connect(bit1.output("q"), b1.input("in"))?;

    let stats = netlist.stats();
    println!(
        "netlist: {} cells ({} sequential), {} connections",
        stats.total_cells, stats.sequential_cells, stats.total_connections
    );

    let mut engine = netlist.build()?;

    for pulse in 1..=8 {
        engine.pulse("clk")?;
        let low = engine.output("b0")? as u8;
        let high = engine.output("b1")? as u8;
        println!("pulse {}: count = {}", pulse, high * 2 + low);
    }

    Ok(())
}
