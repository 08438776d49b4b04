//! A complete simulator run: hold reset, play a script, let the controller settle.

use std::fmt;

use tracing::info;

use crate::balance_controller::{ControllerInput, ControllerOutput};
use crate::config::SimConfig;
use crate::error::Result;
use crate::stimulus::{self, Step};
use crate::testbench::{Testbench, Trace};

#[derive(Clone, Debug)]
pub struct Session {
    trace: Trace<ControllerInput, ControllerOutput>,
    /// Each script step with the edge its readout is taken after
    steps: Vec<(Step, usize)>,
}

pub fn run_script(config: &SimConfig, script: &[Step]) -> Result<Session> {
    let controller = config.controller()?;

    let mut testbench = Testbench::new();
    testbench.reset(config.reset_cycles);
    let mut steps = Vec::with_capacity(script.len());
    for step in script {
        if let Some(edge) = testbench.drive(step.inputs(config.spaced)) {
            steps.push((*step, edge));
        }
    }
    testbench.drive(stimulus::idle(config.settle_cycles));

    let trace = controller.simulate(testbench.inputs().to_vec(), config.clock_period)?;
    let session = Session { trace, steps };

    info!("Reset complete");
    for (step, output) in session.readouts() {
        info!(
            "After {}: balance={}, dispense={}",
            step,
            output.balance(),
            output.dispense as u8
        );
    }
    info!(
        dispensed = session.dispensed(),
        cycles = session.trace.cycles().len(),
        "Vending Machine Test Complete"
    );
    Ok(session)
}

impl Session {
    pub fn trace(&self) -> &Trace<ControllerInput, ControllerOutput> {
        &self.trace
    }

    /// Output after each script step.
    pub fn readouts(&self) -> Vec<(Step, ControllerOutput)> {
        let cycles = self.trace.cycles();
        self.steps
            .iter()
            .filter_map(|(step, edge)| cycles.get(*edge).map(|cycle| (*step, cycle.output)))
            .collect()
    }

    pub fn dispensed(&self) -> usize {
        self.trace.dispensed()
    }
}

/// Cycle table, one row per edge.
impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>5} {:>8} {:>5} {:>5} {:>7} {:>8}",
            "cycle", "time", "coin", "reset", "balance", "dispense"
        )?;
        for (index, cycle) in self.trace.cycles().iter().enumerate() {
            writeln!(
                f,
                "{:>5} {:>8} {:>5} {:>5} {:>7} {:>8}",
                index,
                cycle.time,
                cycle.input.coin.to_string(),
                cycle.input.reset as u8,
                cycle.output.balance(),
                cycle.output.dispense as u8
            )?;
        }
        Ok(())
    }
}
