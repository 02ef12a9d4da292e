//! Per-request scratch files for images on their way to the detector.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::capture::CapturedImage;

const SCRATCH_PREFIX: &str = "capture-";

/// Directory holding staged images.
#[derive(Debug, Clone)]
pub struct ScratchDir {
    root: PathBuf,
}

impl ScratchDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes the image to a fresh file under the scratch root.
    ///
    /// The root is created on demand so removing it while the server runs
    /// doesn't break uploads.
    pub async fn stage(&self, image: &CapturedImage) -> io::Result<StagedImage> {
        tokio::fs::create_dir_all(&self.root).await?;

        let root = self.root.clone();
        let suffix = format!(".{}", image.extension());
        let bytes = image.bytes().to_vec();

        // An abandoned stage still drops its file when the task finishes.
        tokio::task::spawn_blocking(move || {
            let mut file = tempfile::Builder::new()
                .prefix(SCRATCH_PREFIX)
                .suffix(&suffix)
                .tempfile_in(&root)?;
            file.write_all(&bytes)?;
            file.flush()?;
            Ok::<_, io::Error>(StagedImage { file })
        })
        .await
        .map_err(io::Error::other)?
    }
}

/// A staged image. The backing file is deleted when this is dropped, on every
/// exit path of the request that staged it.
#[derive(Debug)]
pub struct StagedImage {
    file: NamedTempFile,
}

impl StagedImage {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub async fn read(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.file.path()).await
    }
}
