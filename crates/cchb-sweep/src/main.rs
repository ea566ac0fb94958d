//! Benchmark harness CLI.

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use cchb_sweep::config::HarnessConfig;
use cchb_sweep::{cuts, orders, study, tables};

#[derive(Parser)]
#[command(name = "cch-bench", version, about = "CCH ordering benchmark harness")]
struct Cli {
    /// Harness configuration file (YAML); defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the order experiment sweep over all graphs and partitioners.
    Orders,
    /// Run the cut experiment sweep over all graphs, partitioners, and
    /// imbalance bounds.
    Cuts,
    /// Run the parameter study on one graph.
    Paramstudy {
        /// Graph to study.
        graph: String,
    },
    /// Compute a single plain flow-cutter order and print its timing as
    /// `flowcutterN,graph,seconds`.
    FlowcutterOrder {
        /// Graph to order.
        graph: String,
        /// Number of cutters.
        cutters: u32,
    },
    /// Compute a single accelerated flow-cutter order (geographic cutter
    /// seeding) and print its timing as `inertialflowcutterN,graph,seconds`.
    InertialflowcutterOrder {
        /// Graph to order.
        graph: String,
        /// Number of cutters; should be a multiple of four.
        cutters: u32,
    },
    /// Compute a single inertial-flow nested dissection order and print its
    /// timing as `inertial_flow,graph,seconds`.
    InertialFlowOrder {
        /// Graph to order.
        graph: String,
    },
    /// Render the order experiment comparison table.
    OrderTable {
        /// Ledger to read instead of the configured one.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Output LaTeX file.
        out: PathBuf,
    },
    /// Render the parameter study table.
    ParamstudyTable {
        /// Ledger to read instead of the configured one.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Output LaTeX file.
        out: PathBuf,
    },
    /// Render the pareto cut comparison table for one graph.
    ParetoTable {
        /// Graph to render.
        graph: String,
        /// Output LaTeX file.
        out: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => HarnessConfig::load(path)?,
        None => HarnessConfig::default(),
    };
    match cli.command {
        Command::Orders => {
            let outcome = orders::run_order_experiments(&config)?;
            println!("order sweep: {outcome}");
        }
        Command::Cuts => {
            let outcome = cuts::run_cut_experiments(&config)?;
            println!("cut sweep: {outcome}");
        }
        Command::Paramstudy { graph } => {
            let outcome = study::run_parameter_study(&config, &graph)?;
            println!("parameter study: {outcome}");
        }
        Command::FlowcutterOrder { graph, cutters } => {
            let seconds = orders::run_single_flowcutter_order(&config, &graph, cutters)?;
            println!("flowcutter{cutters},{graph},{seconds:.3}");
        }
        Command::InertialflowcutterOrder { graph, cutters } => {
            let seconds = orders::run_single_inertialflowcutter_order(&config, &graph, cutters)?;
            println!("inertialflowcutter{cutters},{graph},{seconds:.3}");
        }
        Command::InertialFlowOrder { graph } => {
            let seconds = orders::run_single_inertial_flow_order(&config, &graph)?;
            println!("inertial_flow,{graph},{seconds:.3}");
        }
        Command::OrderTable { input, out } => {
            tables::write_order_table(&config, input.as_deref(), &out)?;
        }
        Command::ParamstudyTable { input, out } => {
            tables::write_parameterstudy_table(&config, input.as_deref(), &out)?;
        }
        Command::ParetoTable { graph, out } => {
            tables::write_pareto_table(&config, &graph, &out)?;
        }
    }
    Ok(())
}
