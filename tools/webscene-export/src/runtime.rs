//! Runtime asset bundle
//!
//! Static files a scene needs at load time (math library, loader, renderer).
//! They are provisioned with write-if-missing semantics: files already present
//! in the output are left alone, so hand-edited copies survive re-exports.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use webscene_shared::fs::{read_file_with_limit, write_if_missing, MAX_RUNTIME_ASSET_BYTES};

/// One bundled file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeAsset {
    /// File name inside the script directory
    pub name: String,
    pub contents: Vec<u8>,
}

/// What provisioning did with one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionOutcome {
    Written(PathBuf),
    AlreadyPresent(PathBuf),
}

/// Immutable set of runtime files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetBundle {
    assets: Vec<RuntimeAsset>,
}

impl AssetBundle {
    pub fn new(assets: Vec<RuntimeAsset>) -> Self {
        Self { assets }
    }

    /// Read every `file name -> source path` pair into memory.
    ///
    /// Relative sources resolve against `base_dir`.
    pub fn from_sources(sources: &BTreeMap<String, PathBuf>, base_dir: &Path) -> Result<Self> {
        let assets = sources
            .iter()
            .map(|(name, source)| {
                let path = base_dir.join(source);
                let contents = read_file_with_limit(&path, MAX_RUNTIME_ASSET_BYTES)
                    .with_context(|| format!("Failed to read runtime asset '{}'", name))?;
                Ok(RuntimeAsset {
                    name: name.clone(),
                    contents,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { assets })
    }

    pub fn assets(&self) -> &[RuntimeAsset] {
        &self.assets
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Write each asset into `dir` unless a file of that name exists.
    pub fn provision(&self, dir: &Path) -> Result<Vec<ProvisionOutcome>> {
        self.assets
            .iter()
            .map(|asset| {
                let path = dir.join(&asset.name);
                if write_if_missing(&path, &asset.contents)? {
                    tracing::info!("Wrote runtime asset {:?}", path);
                    Ok(ProvisionOutcome::Written(path))
                } else {
                    tracing::debug!("Runtime asset already present: {:?}", path);
                    Ok(ProvisionOutcome::AlreadyPresent(path))
                }
            })
            .collect()
    }
}
