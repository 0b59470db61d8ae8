// Startup filesystem preparation.

use std::io;
use std::path::Path;
use tracing::{debug, info};

/// Creates every directory in `dirs` that does not exist yet.
/// Existing directories are left untouched.
pub fn ensure_directories<P: AsRef<Path>>(dirs: &[P]) -> io::Result<()> {
    for dir in dirs {
        let dir = dir.as_ref();
        if dir.is_dir() {
            debug!("Directory already present: {}", dir.display());
            continue;
        }

        info!("Creating directory: {}", dir.display());
        std::fs::create_dir_all(dir)?;
    }

    Ok(())
}
