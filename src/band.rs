use crate::error::{FetchError, Result};
use std::{
    fs::read_dir,
    path::{Path, PathBuf},
};

/// Naming convention for the raster file to pull out of a product archive:
/// the file stem must end with `_{band}_{resolution}`. This is the single
/// point of coupling to the provider's archive layout; other band or
/// resolution combinations plug in here without touching the traversal.
#[derive(Clone, Debug)]
pub struct BandSpec {
    pub band: String,
    pub resolution: String,
}

impl BandSpec {
    /// The pre-composited true-color image at 10 m, e.g. `T31UDQ_..._TCI_10m.jp2`.
    pub fn true_color_10m() -> Self {
        BandSpec {
            band: "TCI".to_string(),
            resolution: "10m".to_string(),
        }
    }

    pub fn matches(&self, file_name: &str) -> bool {
        let stem = match file_name.rsplit_once('.') {
            Some((stem, _ext)) => stem,
            None => file_name,
        };
        stem.ends_with(&format!("_{}_{}", self.band, self.resolution))
    }
}

impl Default for BandSpec {
    fn default() -> Self {
        BandSpec::true_color_10m()
    }
}

/// Depth-first exhaustive search of the archive tree for the first file
/// matching `spec`. Archives are expected to hold at most one match per
/// product; with several, whichever the traversal reaches first wins, which
/// may differ across storage backends.
pub fn locate_band(root: &Path, spec: &BandSpec) -> Result<PathBuf> {
    log::debug!(
        "Searching {:?} for band {} at {}",
        root,
        spec.band,
        spec.resolution
    );

    walk(root, spec)?.ok_or_else(|| {
        FetchError::BandNotFound(format!(
            "no file matching *_{}_{} in the retrieved archive",
            spec.band, spec.resolution
        ))
    })
}

fn walk(dir: &Path, spec: &BandSpec) -> Result<Option<PathBuf>> {
    for entry_res in read_dir(dir).map_err(|err| {
        FetchError::RetrievalFailed(format!("cannot read directory {:?}: {}", dir, err))
    })? {
        let entry = entry_res.map_err(|err| {
            FetchError::RetrievalFailed(format!("cannot read directory entry: {}", err))
        })?;

        let path = entry.path();

        if path.is_dir() {
            if let Some(found) = walk(&path, spec)? {
                return Ok(Some(found));
            }
        } else if let Some(name) = path.file_name().map(|n| n.to_string_lossy()) {
            if spec.matches(&name) {
                log::debug!("Band file found: {:?}", path);
                return Ok(Some(path));
            }
        }
    }

    Ok(None)
}
