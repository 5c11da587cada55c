use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static CONFIG_PATH: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Record the `--config` path for this run. Later calls are ignored.
pub fn init(custom: Option<&str>) {
    let _ = CONFIG_PATH.set(custom.map(PathBuf::from));
}

/// The explicit config path, if one was given on the command line.
pub fn config_path() -> Option<&'static Path> {
    CONFIG_PATH.get().and_then(|p| p.as_deref())
}
