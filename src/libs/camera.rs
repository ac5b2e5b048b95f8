//! Capture device availability check.
//!
//! The monitor does not analyze video. Before watching starts, lookaway only
//! checks that a camera is present and can be opened, so the user learns
//! early that a gaze tracker feeding the status endpoint would have nothing
//! to look at. The outcome is reported once and never affects the monitor.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a capture device is not available.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CameraError {
    #[error("no video capture device found")]
    NotFound,
    #[error("permission denied for capture device {0}")]
    PermissionDenied(PathBuf),
    #[error("capture device {path} cannot be opened: {reason}")]
    Unavailable { path: PathBuf, reason: String },
    #[error("capture device checks are not supported on this platform")]
    Unsupported,
}

/// A capture device that was found and opened successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureDevice {
    pub path: PathBuf,
}

impl CaptureDevice {
    /// Checks the configured device, or the first `/dev/video*` node.
    pub fn request(device: Option<&Path>) -> Result<CaptureDevice, CameraError> {
        if let Some(path) = device {
            return Self::open(path);
        }

        if !cfg!(target_os = "linux") {
            return Err(CameraError::Unsupported);
        }

        let path = first_video_node(Path::new("/dev")).ok_or(CameraError::NotFound)?;
        Self::open(&path)
    }

    /// Opens `path` read-only to confirm access.
    pub fn open(path: &Path) -> Result<CaptureDevice, CameraError> {
        match OpenOptions::new().read(true).open(path) {
            Ok(_) => Ok(CaptureDevice { path: path.to_path_buf() }),
            Err(e) => Err(match e.kind() {
                ErrorKind::NotFound => CameraError::NotFound,
                ErrorKind::PermissionDenied => CameraError::PermissionDenied(path.to_path_buf()),
                _ => CameraError::Unavailable {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                },
            }),
        }
    }
}

/// Lowest-numbered `videoN` entry in `dir`.
fn first_video_node(dir: &Path) -> Option<PathBuf> {
    let mut nodes: Vec<(u32, PathBuf)> = fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name();
            let index = name.to_str()?.strip_prefix("video")?.parse().ok()?;
            Some((index, entry.path()))
        })
        .collect();
    nodes.sort();
    nodes.into_iter().next().map(|(_, path)| path)
}
