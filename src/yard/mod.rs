//! Monte-Carlo yard occupancy simulation.

mod sim;
mod trend;

pub(crate) use sim::{FlowParams, SimResult, YardConfig, run_simulation};
