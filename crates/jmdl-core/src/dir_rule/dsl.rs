//! Placeholder substitution for configured base directories.

use std::path::Path;

/// Placeholder replaced by the context's workspace directory.
pub const WORKSPACE_TOKEN: &str = "${workspace}";

/// Applies every supported placeholder substitution to `base_dir`.
pub fn substitute_base_dir(base_dir: &str, workspace: &Path) -> String {
    if !base_dir.contains(WORKSPACE_TOKEN) {
        return base_dir.to_string();
    }
    let workspace = workspace.to_string_lossy().replace('\\', "/");
    base_dir.replace(WORKSPACE_TOKEN, workspace.trim_end_matches('/'))
}
