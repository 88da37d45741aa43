use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::constants::{MODEL_DIR, SSD_TOPOLOGY_NAME};

#[derive(Error, Debug)]
pub enum ModelLoadError {
    #[error("model file {path} is not readable: {source}")]
    Missing {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("weights file {weights} must sit next to the network topology in {dir}")]
    WeightsLocation { weights: PathBuf, dir: PathBuf },
    #[error("failed to load network from {path}: {reason}")]
    Runtime { path: PathBuf, reason: String },
}

/// Paths of the network-topology descriptor and its trained weights.
///
/// The topology is an ONNX graph. Exports that keep their weights in an
/// external-data file name it in `weights`; ONNX Runtime resolves external
/// data relative to the graph, so both files must share a directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelFiles {
    pub topology: PathBuf,
    pub weights: Option<PathBuf>,
}

impl ModelFiles {
    pub fn new(topology: impl Into<PathBuf>) -> Self {
        Self {
            topology: topology.into(),
            weights: None,
        }
    }

    pub fn with_weights(mut self, weights: impl Into<PathBuf>) -> Self {
        self.weights = Some(weights.into());
        self
    }

    /// Default model layout under `root`.
    pub fn in_dir(root: &Path) -> Self {
        Self::new(root.join(MODEL_DIR).join(SSD_TOPOLOGY_NAME))
    }

    /// Checks that every file exists, is readable, and that external weights
    /// are where the runtime will look for them.
    pub fn validate(&self) -> Result<(), ModelLoadError> {
        check_readable(&self.topology)?;
        if let Some(weights) = &self.weights {
            check_readable(weights)?;
            let graph_dir = parent_dir(&self.topology);
            if parent_dir(weights) != graph_dir {
                return Err(ModelLoadError::WeightsLocation {
                    weights: weights.clone(),
                    dir: graph_dir,
                });
            }
        }
        Ok(())
    }

    /// Reads the external weights into memory, keyed by the file name the
    /// graph uses to refer to them.
    ///
    /// A weights file the graph never mentions would be silently ignored by
    /// the runtime, so it is rejected here along with empty files.
    pub fn read_weights(&self) -> Result<Option<ExternalWeights>, ModelLoadError> {
        let Some(weights) = &self.weights else {
            return Ok(None);
        };
        let runtime = |path: &Path, reason: String| ModelLoadError::Runtime {
            path: path.to_path_buf(),
            reason,
        };

        let file_name = weights
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| runtime(weights, "weights file name is not valid UTF-8".into()))?
            .to_string();
        let bytes = fs::read(weights).map_err(|source| ModelLoadError::Missing {
            path: weights.clone(),
            source,
        })?;
        if bytes.is_empty() {
            return Err(runtime(weights, "weights file is empty".into()));
        }

        let graph = fs::read(&self.topology).map_err(|source| ModelLoadError::Missing {
            path: self.topology.clone(),
            source,
        })?;
        if !contains(&graph, file_name.as_bytes()) {
            return Err(runtime(
                &self.topology,
                format!("graph does not reference external data file {file_name}"),
            ));
        }

        Ok(Some(ExternalWeights { file_name, bytes }))
    }
}

/// Weights loaded from an ONNX external-data file.
#[derive(Debug)]
pub struct ExternalWeights {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Default for ModelFiles {
    fn default() -> Self {
        Self::in_dir(Path::new(""))
    }
}

fn check_readable(path: &Path) -> Result<(), ModelLoadError> {
    let missing = |source| ModelLoadError::Missing {
        path: path.to_path_buf(),
        source,
    };
    let metadata = fs::metadata(path).map_err(missing)?;
    if !metadata.is_file() {
        return Err(missing(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }
    fs::File::open(path).map_err(missing)?;
    Ok(())
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

fn parent_dir(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or(Path::new(""));
    fs::canonicalize(parent).unwrap_or_else(|_| parent.to_path_buf())
}
