//! Hands report files to the platform's default application

use crate::error::Result;
use log::{info, warn};
use std::path::Path;

/// Opens `path` with whatever the desktop associates with its type.
///
/// Best effort: failures are logged and returned but callers may ignore them.
pub fn open_file(path: &Path) -> Result<()> {
    info!("Opening {}", path.display());
    open::that_detached(path).map_err(|e| {
        warn!("Failed to open {}: {}", path.display(), e);
        e.into()
    })
}
