use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

const STORAGE_PREFIX: &str = "groovy_ws_";

/// Per-workspace storage directory for the classpath cache.
///
/// `base` is the editor's private storage directory for this extension; when
/// the editor has none, the system temp directory is used instead. The
/// workspace root is hashed so that distinct workspaces never share a cache.
pub fn workspace_storage_dir(base: Option<&Path>, workspace_root: &Path) -> PathBuf {
    let base = base
        .map(Path::to_path_buf)
        .unwrap_or_else(std::env::temp_dir);

    let mut hasher = Sha256::new();
    hasher.update(workspace_root.to_string_lossy().as_bytes());
    let digest = hex::encode(hasher.finalize());

    base.join(format!("{STORAGE_PREFIX}{digest}"))
}
