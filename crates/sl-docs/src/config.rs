//! Doc generator paths

use std::path::PathBuf;

pub const STATIC_REDIRECTS_FILENAME: &str = "static-redirects.yml";
pub const BLOCKING_REDIRECTS_FILENAME: &str = "blocking-redirects.yml";
pub const BLOCKING_REDIRECTS_SUB_DIR: &str = "blocking-redirects";

pub const ABOUT_SCRIPTLETS_FILENAME: &str = "about-scriptlets.md";
pub const ABOUT_TRUSTED_SCRIPTLETS_FILENAME: &str = "about-trusted-scriptlets.md";
pub const ABOUT_REDIRECTS_FILENAME: &str = "about-redirects.md";

/// Where sources are read from and pages written to.
///
/// Link prefixes are how the wiki pages reach the sources, so they are kept
/// separate from the filesystem paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsConfig {
    pub scriptlets_dir: PathBuf,
    pub redirects_dir: PathBuf,
    pub wiki_dir: PathBuf,
    pub scriptlets_link_prefix: String,
    pub redirects_link_prefix: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            scriptlets_dir: PathBuf::from("src/scriptlets"),
            redirects_dir: PathBuf::from("src/redirects"),
            wiki_dir: PathBuf::from("wiki"),
            scriptlets_link_prefix: "../src/scriptlets".to_string(),
            redirects_link_prefix: "../src/redirects".to_string(),
        }
    }
}

impl DocsConfig {
    pub fn static_redirects_path(&self) -> PathBuf {
        self.redirects_dir.join(STATIC_REDIRECTS_FILENAME)
    }

    pub fn blocking_redirects_path(&self) -> PathBuf {
        self.redirects_dir.join(BLOCKING_REDIRECTS_FILENAME)
    }

    pub fn static_redirects_link(&self) -> String {
        format!("{}/{}", self.redirects_link_prefix, STATIC_REDIRECTS_FILENAME)
    }

    pub fn blocking_redirects_link_dir(&self) -> String {
        format!("{}/{}", self.redirects_link_prefix, BLOCKING_REDIRECTS_SUB_DIR)
    }
}
