//! Scriptlets Wiki Generator
//!
//! Builds the `about-*.md` wiki pages from the describing comments in the
//! scriptlet and redirect sources plus the YAML redirect lists.
//!
//! # Modules
//!
//! - [`comments`]: `/** @scriptlet ... */` extraction
//! - [`redirects`]: `static-redirects.yml` / `blocking-redirects.yml`
//! - [`markdown`]: table of contents and section rendering
//! - [`config`]: source and output locations

pub mod comments;
pub mod config;
pub mod markdown;
pub mod redirects;

use std::fs;
use std::path::{Path, PathBuf};

pub use comments::{collect_from_dir, parse_describing_comments, DescribingComment, EntryKind};
pub use config::DocsConfig;
pub use markdown::{get_markdown_data, MarkdownData};
pub use redirects::{load_redirects, RedirectDescriptor};

use config::{ABOUT_REDIRECTS_FILENAME, ABOUT_SCRIPTLETS_FILENAME, ABOUT_TRUSTED_SCRIPTLETS_FILENAME};

/// Error type for the docs run. Any error aborts it before pages are written.
#[derive(Debug, thiserror::Error)]
pub enum DocsError {
    #[error("Failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },
    #[error("Failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: std::io::Error },
    #[error("Invalid YAML in {}: {source}", path.display())]
    Yaml { path: PathBuf, source: serde_yaml::Error },
    #[error("No description for {0}")]
    MissingDescription(String),
    #[error("@{kind} tag without a name in {source_path}")]
    MissingName { kind: EntryKind, source_path: String },
}

/// Rendered contents of the three wiki pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiPages {
    pub scriptlets: String,
    pub trusted_scriptlets: String,
    pub redirects: String,
}

/// Collect every source and render the pages without touching the wiki dir.
pub fn build_wiki_pages(config: &DocsConfig) -> Result<WikiPages, DocsError> {
    let mut all = collect_from_dir(&config.scriptlets_dir, &config.scriptlets_link_prefix)?;
    all.extend(collect_from_dir(&config.redirects_dir, &config.redirects_link_prefix)?);

    let of_kind = |kind: EntryKind| -> Vec<DescribingComment> {
        all.iter().filter(|c| c.kind == kind).cloned().collect()
    };
    let scriptlets = of_kind(EntryKind::Scriptlet);
    let trusted = of_kind(EntryKind::TrustedScriptlet);
    let file_redirects = of_kind(EntryKind::Redirect);

    let static_redirects = load_redirects(&config.static_redirects_path())?;
    let blocking_redirects = load_redirects(&config.blocking_redirects_path())?;

    log::info!(
        "Collected {} scriptlets, {} trusted scriptlets, {} redirects ({} static, {} blocking)",
        scriptlets.len(),
        trusted.len(),
        file_redirects.len(),
        static_redirects.len(),
        blocking_redirects.len()
    );

    let static_data =
        markdown::get_markdown_data_for_static_redirects(&static_redirects, &config.static_redirects_link())?;
    let blocking_data =
        markdown::get_markdown_data_for_blocking_redirects(&blocking_redirects, &config.blocking_redirects_link_dir())?;

    Ok(WikiPages {
        scriptlets: markdown::scriptlets_page(&get_markdown_data(&scriptlets)),
        trusted_scriptlets: markdown::trusted_scriptlets_page(&get_markdown_data(&trusted)),
        redirects: markdown::redirects_page(&static_data, &get_markdown_data(&file_redirects), &blocking_data),
    })
}

/// Write the pages into `wiki_dir`, creating it if needed.
pub fn write_wiki_pages(pages: &WikiPages, wiki_dir: &Path) -> Result<(), DocsError> {
    let write_err = |path: &Path| {
        let path = path.to_path_buf();
        move |e: std::io::Error| DocsError::Write { path, source: e }
    };

    fs::create_dir_all(wiki_dir).map_err(write_err(wiki_dir))?;

    for (filename, content) in [
        (ABOUT_SCRIPTLETS_FILENAME, &pages.scriptlets),
        (ABOUT_TRUSTED_SCRIPTLETS_FILENAME, &pages.trusted_scriptlets),
        (ABOUT_REDIRECTS_FILENAME, &pages.redirects),
    ] {
        let path = wiki_dir.join(filename);
        fs::write(&path, content).map_err(write_err(&path))?;
        log::info!("Wrote {}", path.display());
    }

    Ok(())
}

/// Build and write all wiki pages.
pub fn build_wiki_about_pages(config: &DocsConfig) -> Result<(), DocsError> {
    let pages = build_wiki_pages(config)?;
    write_wiki_pages(&pages, &config.wiki_dir)
}
