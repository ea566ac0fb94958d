//! Harness configuration: where the graphs, binaries, and ledgers live and
//! which sweep dimensions to cover. Loaded from YAML; every field has the
//! benchmark-suite default so an empty file is a valid configuration.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use cchb_core::{BenchError, Catalog, ErrorInfo};
use cchb_run::{Binaries, ExperimentPaths};
use serde::{Deserialize, Serialize};

/// Top-level harness configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Folder holding graph data, order artifacts, and ledgers.
    #[serde(default = "default_experiments_dir")]
    pub experiments_dir: PathBuf,
    /// Folder holding the console, customize, and query binaries.
    #[serde(default = "default_build_dir")]
    pub build_dir: PathBuf,
    /// Standalone METIS partitioner, when the metis variant is swept.
    #[serde(default)]
    pub metis_binary: Option<PathBuf>,
    /// Graphs in declared report order.
    #[serde(default = "default_graphs")]
    pub graphs: Vec<String>,
    /// Partitioner variants of the order experiment sweep, in report order.
    #[serde(default = "default_order_partitioners")]
    pub order_partitioners: Vec<String>,
    /// Partitioner variants of the cut experiment sweep, in report order.
    #[serde(default = "default_cut_partitioners")]
    pub cut_partitioners: Vec<String>,
    /// Imbalance bounds of the cut experiment sweep.
    #[serde(default = "default_imbalances")]
    pub imbalances: Vec<f64>,
    /// Display names of graphs in rendered tables.
    #[serde(default = "default_graph_names")]
    pub graph_names: BTreeMap<String, String>,
    /// Display names of partitioner variants in rendered tables.
    #[serde(default = "default_partitioner_names")]
    pub partitioner_names: BTreeMap<String, String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            experiments_dir: default_experiments_dir(),
            build_dir: default_build_dir(),
            metis_binary: None,
            graphs: default_graphs(),
            order_partitioners: default_order_partitioners(),
            cut_partitioners: default_cut_partitioners(),
            imbalances: default_imbalances(),
            graph_names: default_graph_names(),
            partitioner_names: default_partitioner_names(),
        }
    }
}

impl HarnessConfig {
    /// Loads the configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, BenchError> {
        let text = fs::read_to_string(path).map_err(|err| {
            BenchError::Config(
                ErrorInfo::new("config-read", "failed to read harness configuration")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
        serde_yaml::from_str(&text).map_err(|err| {
            BenchError::Config(
                ErrorInfo::new("config-parse", "invalid harness configuration")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })
    }

    /// Path layout rooted at the experiments folder.
    pub fn paths(&self) -> ExperimentPaths {
        ExperimentPaths::new(&self.experiments_dir)
    }

    /// External binary locations.
    pub fn binaries(&self) -> Binaries {
        let binaries = Binaries::from_build_dir(&self.build_dir);
        match &self.metis_binary {
            Some(metis) => binaries.with_metis(metis),
            None => binaries,
        }
    }

    /// Declared graph ordering.
    pub fn graph_catalog(&self) -> Catalog {
        Catalog::new(self.graphs.iter().cloned())
    }

    /// Declared partitioner ordering for order experiments.
    pub fn order_catalog(&self) -> Catalog {
        Catalog::new(self.order_partitioners.iter().cloned())
    }

    /// Declared partitioner ordering for cut experiments.
    pub fn cut_catalog(&self) -> Catalog {
        Catalog::new(self.cut_partitioners.iter().cloned())
    }
}

fn default_experiments_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_build_dir() -> PathBuf {
    PathBuf::from("../build")
}

fn default_graphs() -> Vec<String> {
    ["col", "cal", "europe", "usa"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_order_partitioners() -> Vec<String> {
    [
        "metis",
        "kahip_v0_71",
        "kahip_v1_00_cut",
        "kahip_v2_11",
        "inertial_flow",
        "flowcutter3",
        "flowcutter20",
        "flowcutter100",
        "inertialflowcutter4",
        "inertialflowcutter8",
        "inertialflowcutter12",
        "inertialflowcutter16",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_cut_partitioners() -> Vec<String> {
    [
        "metis",
        "inertial_flow",
        "flowcutter3",
        "flowcutter20",
        "inertialflowcutter4",
        "inertialflowcutter8",
        "inertialflowcutter12",
        "inertialflowcutter16",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_imbalances() -> Vec<f64> {
    vec![0.0, 0.01, 0.03, 0.05, 0.1, 0.2, 0.3, 0.5, 0.7, 0.9]
}

fn default_graph_names() -> BTreeMap<String, String> {
    [
        ("col", "Col"),
        ("cal", "Cal"),
        ("europe", "Eur"),
        ("usa", "USA"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_partitioner_names() -> BTreeMap<String, String> {
    [
        ("metis", "M"),
        ("kahip_v0_71", "K0.61"),
        ("kahip_v1_00_cut", "K1.00"),
        ("kahip_v2_11", "K2.11"),
        ("inertial_flow", "I"),
        ("flowcutter3", "F3"),
        ("flowcutter20", "F20"),
        ("flowcutter100", "F100"),
        ("inertialflowcutter4", "IFC4"),
        ("inertialflowcutter8", "IFC8"),
        ("inertialflowcutter12", "IFC12"),
        ("inertialflowcutter16", "IFC16"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}
