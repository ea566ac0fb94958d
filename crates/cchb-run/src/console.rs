//! Builder for the console's verb/argument command protocol, plus the
//! blocking subprocess plumbing shared by all external binaries.

use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use cchb_core::{BenchError, ErrorInfo, GraphId};

use crate::paths::ExperimentPaths;

/// Fixed seed passed to the console so reruns are reproducible.
pub const RANDOM_SEED: u32 = 5489;

/// An ordered console command line under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ConsoleCommand {
    /// Starts a command line for the given console binary.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends one raw token.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends a bare verb token.
    pub fn verb(self, verb: &str) -> Self {
        self.arg(verb)
    }

    /// `flow_cutter_set <name> <value>`.
    pub fn set(self, name: &str, value: impl ToString) -> Self {
        self.verb("flow_cutter_set").arg(name).arg(value.to_string())
    }

    /// Loads the unweighted RoutingKit graph of `graph`.
    pub fn load_graph(self, paths: &ExperimentPaths, graph: &GraphId) -> Self {
        self.verb("load_routingkit_unweighted_graph")
            .arg(paths.first_out(graph))
            .arg(paths.head(graph))
    }

    /// Loads node coordinates (needed by geographic cutter seeding).
    pub fn load_coordinates(self, paths: &ExperimentPaths, graph: &GraphId) -> Self {
        self.verb("load_routingkit_longitude")
            .arg(paths.longitude(graph))
            .verb("load_routingkit_latitude")
            .arg(paths.latitude(graph))
    }

    /// Structural normalization: symmetrize, drop multi-arcs and loops.
    pub fn normalize(self) -> Self {
        self.verb("add_back_arcs")
            .verb("remove_multi_arcs")
            .verb("remove_loops")
    }

    /// Seeded random shuffle followed by preorder renumbering; puts the
    /// graph in the canonical shape all runs start from.
    pub fn canonical_preorder(self) -> Self {
        self.set("random_seed", RANDOM_SEED)
            .verb("reorder_nodes_at_random")
            .verb("reorder_nodes_in_preorder")
            .verb("sort_arcs")
    }

    /// Wraps an operation in `report_time` / `do_not_report_time`.
    pub fn timed(self, operation: impl FnOnce(Self) -> Self) -> Self {
        operation(self.verb("report_time")).verb("do_not_report_time")
    }

    /// The token sequence built so far.
    pub fn tokens(&self) -> &[OsString] {
        &self.args
    }

    /// Runs the command, blocking, and returns captured standard output.
    pub fn run_capture(&self) -> Result<String, BenchError> {
        capture_output(&self.program, &self.args)
    }

    /// Runs the command, blocking, with standard output redirected to `log`.
    pub fn run_to_file(&self, log: &Path) -> Result<(), BenchError> {
        let file = File::create(log).map_err(|err| {
            BenchError::Io(
                ErrorInfo::new("log-create", "failed to create console log file")
                    .with_context("path", log.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        let status = Command::new(&self.program)
            .args(&self.args)
            .stdout(Stdio::from(file))
            .status()
            .map_err(|err| spawn_error(&self.program, err))?;
        if !status.success() {
            return Err(exit_error(&self.program, status.code()));
        }
        Ok(())
    }
}

/// Blocking invocation with captured stdout, shared by the console and the
/// customization/query timing binaries.
pub fn capture_output(program: &Path, args: &[OsString]) -> Result<String, BenchError> {
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|err| spawn_error(program, err))?;
    if !output.status.success() {
        return Err(exit_error(program, output.status.code()));
    }
    let stdout = String::from_utf8(output.stdout).map_err(|err| {
        BenchError::Process(
            ErrorInfo::new("external-output-not-utf8", "external tool printed non-UTF-8 output")
                .with_context("program", program.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    if stdout.trim().is_empty() {
        return Err(BenchError::Process(
            ErrorInfo::new("external-process-silent", "external tool produced no output")
                .with_context("program", program.display().to_string()),
        ));
    }
    Ok(stdout)
}

fn spawn_error(program: &Path, err: std::io::Error) -> BenchError {
    BenchError::Process(
        ErrorInfo::new("external-process-failed", "failed to start external tool")
            .with_context("program", program.display().to_string())
            .with_hint(err.to_string()),
    )
}

fn exit_error(program: &Path, code: Option<i32>) -> BenchError {
    BenchError::Process(
        ErrorInfo::new("external-process-failed", "external tool exited non-zero")
            .with_context("program", program.display().to_string())
            .with_context(
                "exit_code",
                code.map_or_else(|| "signal".to_string(), |c| c.to_string()),
            ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_produces_the_documented_token_order() {
        let paths = ExperimentPaths::new("/exp");
        let graph = GraphId::new("col");
        let command = ConsoleCommand::new("/build/console")
            .load_graph(&paths, &graph)
            .normalize()
            .canonical_preorder()
            .set("cutter_count", 3);
        let tokens: Vec<String> = command
            .tokens()
            .iter()
            .map(|t| t.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            tokens,
            vec![
                "load_routingkit_unweighted_graph",
                "/exp/col/first_out",
                "/exp/col/head",
                "add_back_arcs",
                "remove_multi_arcs",
                "remove_loops",
                "flow_cutter_set",
                "random_seed",
                "5489",
                "reorder_nodes_at_random",
                "reorder_nodes_in_preorder",
                "sort_arcs",
                "flow_cutter_set",
                "cutter_count",
                "3",
            ]
        );
    }
}
