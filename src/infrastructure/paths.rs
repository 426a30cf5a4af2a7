//! Filesystem locations used by the crate.

use std::ffi::OsString;
use std::path::PathBuf;

const APP_DIR: &str = "eventsync";

/// Returns the data directory for trace output.
///
/// `$XDG_DATA_HOME/eventsync` if set, else `$HOME/.local/share/eventsync`,
/// else `.eventsync` under the working directory.
#[must_use]
pub fn data_dir() -> PathBuf {
    resolve_data_dir(
        std::env::var_os("XDG_DATA_HOME"),
        std::env::var_os("HOME"),
    )
}

fn resolve_data_dir(xdg_data_home: Option<OsString>, home: Option<OsString>) -> PathBuf {
    let non_empty = |value: Option<OsString>| value.filter(|v| !v.is_empty()).map(PathBuf::from);

    if let Some(xdg) = non_empty(xdg_data_home) {
        return xdg.join(APP_DIR);
    }
    if let Some(home) = non_empty(home) {
        return home.join(".local").join("share").join(APP_DIR);
    }
    PathBuf::from(format!(".{APP_DIR}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_xdg_data_home() {
        assert_eq!(
            resolve_data_dir(Some("/xdg".into()), Some("/home/u".into())),
            PathBuf::from("/xdg/eventsync")
        );
    }

    #[test]
    fn falls_back_to_home_then_cwd() {
        assert_eq!(
            resolve_data_dir(Some(OsString::new()), Some("/home/u".into())),
            PathBuf::from("/home/u/.local/share/eventsync")
        );
        assert_eq!(resolve_data_dir(None, None), PathBuf::from(".eventsync"));
    }
}
