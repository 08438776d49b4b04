//! Clocked runs of the controller and the cycle traces they produce.

use std::path::Path;

use itertools::Itertools;
use rhdl::prelude::*;
use tracing::debug;

use crate::balance_controller::{ControllerInput, ControllerOutput};
use crate::coin::CoinCode;
use crate::error::Result;
use crate::stimulus;

/// One simulated clock edge.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Cycle<I, O> {
    pub time: u64,
    /// Input sampled on the edge
    pub input: I,
    /// What the registers drive after the edge
    pub output: O,
}

/// Every sample of one run, starting with the reset cycles rhdl inserts in front of the
/// stimulus.
#[derive(Clone, Debug)]
pub struct Trace<I: Digital, O: Digital> {
    samples: Vec<TimedSample<(ClockReset, I, O)>>,
    edges: usize,
}

impl<I: Digital, O: Digital> Trace<I, O> {
    /// `edges` is the number of stimulus inputs. The samples must run at least two idle
    /// cycles past them so the last edge can be paired with the output it latched.
    pub fn new(samples: Vec<TimedSample<(ClockReset, I, O)>>, edges: usize) -> Self {
        Trace { samples, edges }
    }

    /// One entry per stimulus input.
    ///
    /// Synchronous samples are taken just before each rising edge, so the output that
    /// belongs to an edge is the one sampled on the following edge.
    pub fn cycles(&self) -> Vec<Cycle<I, O>> {
        self.samples
            .iter()
            .cloned()
            .synchronous_sample()
            .filter(|sample| !sample.value.0.reset.any())
            .tuple_windows()
            .map(|(edge, after)| Cycle {
                time: edge.time,
                input: edge.value.1,
                output: after.value.2,
            })
            .take(self.edges)
            .collect()
    }

    pub fn outputs(&self) -> Vec<O> {
        self.cycles().into_iter().map(|cycle| cycle.output).collect()
    }

    pub fn vcd(&self) -> Vcd {
        self.samples.iter().cloned().collect()
    }

    pub fn write_vcd(&self, path: &Path) -> Result<()> {
        self.vcd().dump_to_file(path.to_path_buf())?;
        Ok(())
    }
}

impl Trace<ControllerInput, ControllerOutput> {
    /// Number of dispense pulses in the run.
    pub fn dispensed(&self) -> usize {
        self.outputs()
            .iter()
            .filter(|output| output.dispense)
            .count()
    }
}

/// Builds a controller stimulus the way a cocotb harness drives the pins, remembering
/// the edge after which each readout is taken.
#[derive(Clone, Debug, Default)]
pub struct Testbench {
    inputs: Vec<ControllerInput>,
}

impl Testbench {
    pub fn new() -> Self {
        Testbench::default()
    }

    /// Queue one input and return the index of its edge.
    pub fn step(&mut self, input: ControllerInput) -> usize {
        self.inputs.push(input);
        self.inputs.len() - 1
    }

    /// Queue several inputs and return the index of the last edge.
    pub fn drive(&mut self, inputs: impl IntoIterator<Item = ControllerInput>) -> Option<usize> {
        self.inputs.extend(inputs);
        self.inputs.len().checked_sub(1)
    }

    /// Hold reset for `cycles` edges.
    pub fn reset(&mut self, cycles: usize) -> Option<usize> {
        debug!(cycles, "queue reset");
        self.drive(stimulus::reset(cycles))
    }

    /// Present `coin` for one edge, then idle for one edge. Returns the idle edge, whose
    /// output is the readout after the insertion.
    pub fn insert_coin(&mut self, coin: CoinCode) -> usize {
        debug!(%coin, "queue coin");
        self.step(ControllerInput::coin(coin));
        self.step(ControllerInput::idle())
    }

    pub fn inputs(&self) -> &[ControllerInput] {
        &self.inputs
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rhdl::prelude::*;

    use super::Testbench;
    use crate::balance_controller::{BalanceController, ControllerInput, ControllerOutput};
    use crate::coin::CoinCode;

    #[test]
    fn test_vending_machine_session() -> Result<(), RHDLError> {
        let mut testbench = Testbench::new();
        testbench.reset(5);
        let five = testbench.insert_coin(CoinCode::Five);
        let ten = testbench.insert_coin(CoinCode::Ten);
        let twenty = testbench.insert_coin(CoinCode::Twenty);
        testbench.drive(std::iter::repeat(ControllerInput::idle()).take(5));

        let trace = BalanceController::default().simulate(testbench.inputs().to_vec(), 100)?;
        let cycles = trace.cycles();
        assert_eq!(cycles.len(), 5 + 6 + 5);
        assert_eq!(
            cycles[five].output,
            ControllerOutput {
                balance: bits(5),
                dispense: false,
            }
        );
        assert!(cycles[ten].output.dispense, "Should dispense product at 15 credits");
        assert!(
            cycles[twenty].output.dispense,
            "Should dispense product at 20 credits"
        );
        assert_eq!(trace.dispensed(), 2);
        Ok(())
    }

    #[test]
    fn test_cycles_follow_the_clock() -> Result<(), RHDLError> {
        let mut testbench = Testbench::new();
        testbench.step(ControllerInput::reset());
        testbench.step(ControllerInput::coin(CoinCode::Twenty));
        testbench.step(ControllerInput::idle());

        let cycles = BalanceController::default()
            .simulate(testbench.inputs().to_vec(), 100)?
            .cycles();
        assert_eq!(cycles.len(), 3);
        assert_eq!(cycles[1].input.coin, CoinCode::Twenty);
        assert!(cycles.windows(2).all(|w| w[1].time - w[0].time == 100));
        Ok(())
    }

    #[test]
    fn test_empty_stimulus_yields_no_cycles() -> Result<(), RHDLError> {
        let testbench = Testbench::new();
        assert!(testbench.is_empty());
        let trace = BalanceController::default().simulate(testbench.inputs().to_vec(), 100)?;
        assert!(trace.cycles().is_empty());
        assert_eq!(trace.dispensed(), 0);
        Ok(())
    }
}
