//! Test case documents and the directory that holds them

use crate::error::{DiffstError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix of the environment variables diffst reads
pub const ENV_ROOT: &str = "_DIFFST_";

const FILE_PREFIX: &str = "df";
const FILE_EXTENSION: &str = "yml";

/// One side of a comparison: which database and what to run there
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideSpec {
    /// Logical database name, resolved through the environment
    #[serde(rename = "DB")]
    pub db: String,
    /// Query producing the rows, in a deterministic order
    #[serde(rename = "SQL")]
    pub sql: String,
    /// Statements executed before the query
    #[serde(rename = "Setup", default, skip_serializing_if = "Option::is_none")]
    pub setup: Option<String>,
}

/// A parsed `df<ID>.yml` document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    #[serde(rename = "Source")]
    pub source: SideSpec,
    #[serde(rename = "Target")]
    pub target: SideSpec,
    /// Columns compared with numeric tolerance
    #[serde(rename = "Fuzzy", default)]
    pub fuzzy: Vec<String>,
    #[serde(rename = "BatchSize", default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,
    #[serde(rename = "OutputLimit", default, skip_serializing_if = "Option::is_none")]
    pub output_limit: Option<usize>,
}

impl TestCase {
    /// Parse a test case from YAML text
    pub fn from_yaml(text: &str) -> Result<Self> {
        let case: TestCase = serde_yaml::from_str(text)?;
        case.validate()?;
        Ok(case)
    }

    /// Load and parse a test case file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Reading test case '{}'", path.display()))?;
        let case: TestCase = serde_yaml::from_str(&text)
            .with_context(|| format!("Parsing test case '{}'", path.display()))?;
        case.validate()?;
        Ok(case)
    }

    fn validate(&self) -> Result<()> {
        for (label, side) in [("Source", &self.source), ("Target", &self.target)] {
            if side.db.trim().is_empty() {
                return Err(DiffstError::config(format!("{} DB is empty", label)));
            }
            if side.sql.trim().is_empty() {
                return Err(DiffstError::config(format!("{} SQL is empty", label)));
            }
        }
        if self.batch_size == Some(0) {
            return Err(DiffstError::config("BatchSize must be greater than 0"));
        }
        if self.output_limit == Some(0) {
            return Err(DiffstError::config("OutputLimit must be greater than 0"));
        }
        Ok(())
    }
}

/// Directory of `df<ID>.yml` files
#[derive(Debug, Clone)]
pub struct TestCaseDir {
    pub root: PathBuf,
}

impl TestCaseDir {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(DiffstError::config(format!(
                "Test case directory does not exist: {}",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    /// Path of the file for a test case ID, e.g. `0123` -> `df0123.yml`
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.root
            .join(format!("{}{}.{}", FILE_PREFIX, id, FILE_EXTENSION))
    }

    /// Load the test case with the given ID
    pub fn load(&self, id: &str) -> Result<TestCase> {
        if id.is_empty() {
            return Err(DiffstError::invalid_input("Test case ID must not be empty"));
        }
        let path = self.path_for(id);
        if !path.is_file() {
            return Err(DiffstError::TestCaseNotFound {
                id: id.to_string(),
                path,
            });
        }
        TestCase::load(&path)
    }

    /// IDs of all test cases in the directory, sorted
    pub fn list(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if let Some(id) = name
                .strip_prefix(FILE_PREFIX)
                .and_then(|rest| rest.strip_suffix(&format!(".{}", FILE_EXTENSION)))
            {
                if !id.is_empty() {
                    ids.push(id.to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }
}
