//! RoutingKit artifact layout inside the experiments folder.
//!
//! Graph data lives under `<root>/<graph>/` as the usual RoutingKit files
//! (`first_out`, `head`, coordinates, `travel_time`); derived artifacts sit
//! next to it as `<graph>.<variant>.order`, `<graph>.q.s`, and so on.

use std::path::{Path, PathBuf};

use cchb_core::{FlowCutterConfig, GraphId};

/// Path builder rooted at the experiments folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentPaths {
    root: PathBuf,
}

impl ExperimentPaths {
    /// Creates a layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The experiments folder itself.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the RoutingKit files of `graph`.
    pub fn graph_dir(&self, graph: &GraphId) -> PathBuf {
        self.root.join(graph.as_str())
    }

    /// Adjacency array offsets.
    pub fn first_out(&self, graph: &GraphId) -> PathBuf {
        self.graph_dir(graph).join("first_out")
    }

    /// Adjacency array heads.
    pub fn head(&self, graph: &GraphId) -> PathBuf {
        self.graph_dir(graph).join("head")
    }

    /// Node latitudes.
    pub fn latitude(&self, graph: &GraphId) -> PathBuf {
        self.graph_dir(graph).join("latitude")
    }

    /// Node longitudes.
    pub fn longitude(&self, graph: &GraphId) -> PathBuf {
        self.graph_dir(graph).join("longitude")
    }

    /// Arc metric used by customization and queries.
    pub fn travel_time(&self, graph: &GraphId) -> PathBuf {
        self.graph_dir(graph).join("travel_time")
    }

    /// Node order artifact for a partitioner variant.
    pub fn order(&self, graph: &GraphId, variant: &str) -> PathBuf {
        self.root.join(format!("{}.{}.order", graph.as_str(), variant))
    }

    /// Captured console log belonging to an order artifact.
    pub fn order_log(&self, graph: &GraphId, variant: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}.order.log", graph.as_str(), variant))
    }

    /// Query source nodes.
    pub fn query_sources(&self, graph: &GraphId) -> PathBuf {
        self.root.join(format!("{}.q.s", graph.as_str()))
    }

    /// Query target nodes.
    pub fn query_targets(&self, graph: &GraphId) -> PathBuf {
        self.root.join(format!("{}.q.t", graph.as_str()))
    }

    /// Directory holding parameter-study order artifacts.
    pub fn study_dir(&self) -> PathBuf {
        self.root.join("parameterstudy")
    }

    /// Order artifact for one parameter-study configuration.
    pub fn study_order(&self, graph: &GraphId, config: &FlowCutterConfig) -> PathBuf {
        self.study_dir()
            .join(format!("{}.{}.order", graph.as_str(), config.artifact_stem()))
    }

    /// Captured console log for one parameter-study configuration.
    pub fn study_order_log(&self, graph: &GraphId, config: &FlowCutterConfig) -> PathBuf {
        self.study_dir().join(format!(
            "{}.{}.order.log",
            graph.as_str(),
            config.artifact_stem()
        ))
    }

    /// A persisted ledger table inside the experiments folder.
    pub fn ledger(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

/// Locations of the external executables driven by the harness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binaries {
    /// The partitioning/ordering console.
    pub console: PathBuf,
    /// The CCH customization timing binary.
    pub customize: PathBuf,
    /// The CCH query timing binary.
    pub query: PathBuf,
    /// Optional standalone METIS partitioner (`gpmetis`).
    pub metis: Option<PathBuf>,
}

impl Binaries {
    /// Resolves the standard binary names inside a build directory.
    pub fn from_build_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            console: dir.join("console"),
            customize: dir.join("customize"),
            query: dir.join("query"),
            metis: None,
        }
    }

    /// Sets the METIS partitioner location.
    pub fn with_metis(mut self, metis: impl Into<PathBuf>) -> Self {
        self.metis = Some(metis.into());
        self
    }
}
