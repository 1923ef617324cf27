//! Where cornell keeps its files on disk.
use std::ffi::OsString;
use std::path::PathBuf;

const APP_DIR: &str = "cornell";
const CONFIG_FILE: &str = "cornell.yml";
const DEFAULT_CONFIG: &str = include_str!("../data/config.yml");

/// Picks the application directory under `xdg_home` when it is set and non
/// empty, else under the platform directory, else under `fallback`.
fn resolve_dir(
    xdg_home: Option<OsString>,
    platform_dir: Option<PathBuf>,
    fallback: &str,
) -> PathBuf {
    let base = xdg_home
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
        .or(platform_dir)
        .unwrap_or_else(|| PathBuf::from(fallback));
    base.join(APP_DIR)
}

fn get_config_dir() -> PathBuf {
    resolve_dir(
        std::env::var_os("XDG_CONFIG_HOME"),
        dirs::config_dir(),
        "~/.config",
    )
}

/// Returns the data directory, creating it when missing.
pub fn get_data_dir() -> std::io::Result<PathBuf> {
    let path = resolve_dir(
        std::env::var_os("XDG_DATA_HOME"),
        dirs::data_local_dir(),
        "~/.local/share",
    );
    std::fs::create_dir_all(&path)?;
    Ok(path)
}

/// Config file used when no `--config` path is given.
pub(crate) fn default_config_path() -> PathBuf {
    get_config_dir().join(CONFIG_FILE)
}

/// Contents written to a fresh config file.
pub(crate) fn get_default_config() -> &'static str {
    DEFAULT_CONFIG
}
