//! Blocking adapters around the external ordering/partitioning console and
//! the customization/query timing binaries.
//!
//! Every invocation is a synchronous subprocess call; a non-zero exit or
//! unparsable output is fatal for that experiment only. There is no retry
//! logic here; reruns are idempotent at the ledger layer.

mod console;
mod cut;
mod order;
mod paths;
mod timing;

pub use console::{capture_output, ConsoleCommand, RANDOM_SEED};
pub use cut::{
    enumerate_accelerated_cuts, enumerate_flowcutter_cuts, inertial_flow_cut, metis_cut,
    one_shot_candidate,
};
pub use order::{
    examine_order, save_accelerated_order, save_flowcutter_order, save_inertial_flow_order,
    save_inertialflowcutter_order,
};
pub use paths::{Binaries, ExperimentPaths};
pub use timing::{average_query_us, median_customization_ms};
