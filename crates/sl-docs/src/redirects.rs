//! YAML redirect descriptors
//!
//! Static and blocking redirect resources are described in YAML lists:
//!
//! ```yaml
//! - title: 1x1-transparent.gif
//!   description: |
//!     **Example**
//!   aliases:
//!     - 1x1.gif
//! ```
//!
//! Only `title` and `description` matter for the docs.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::DocsError;

/// One redirect resource entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RedirectDescriptor {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl RedirectDescriptor {
    /// The description, or the error that aborts the docs run.
    pub fn required_description(&self) -> Result<&str, DocsError> {
        self.description
            .as_deref()
            .filter(|d| !d.is_empty())
            .ok_or_else(|| DocsError::MissingDescription(self.title.clone()))
    }
}

pub fn parse_redirects_yaml(text: &str, path: &Path) -> Result<Vec<RedirectDescriptor>, DocsError> {
    serde_yaml::from_str(text).map_err(|e| DocsError::Yaml {
        path: path.to_path_buf(),
        source: e,
    })
}

pub fn load_redirects(path: &Path) -> Result<Vec<RedirectDescriptor>, DocsError> {
    let text = fs::read_to_string(path).map_err(|e| DocsError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let redirects = parse_redirects_yaml(&text, path)?;
    log::debug!("{}: {} redirect(s)", path.display(), redirects.len());
    Ok(redirects)
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
- title: 1x1-transparent.gif
  description: |
    Redirects to a 1x1 transparent image.
  aliases:
    - 1x1.gif
  contentType: image/gif;base64
  content: R0lGODlhAQABAIAAAAAAAP///yH5BAEAAAAALAAAAAABAAEAAAIBRAA7
- title: noopjs
"#;

    #[test]
    fn test_parse_descriptors() {
        let redirects = parse_redirects_yaml(YAML, Path::new("static-redirects.yml")).unwrap();
        assert_eq!(redirects.len(), 2);
        assert_eq!(redirects[0].title, "1x1-transparent.gif");
        assert_eq!(
            redirects[0].required_description().unwrap(),
            "Redirects to a 1x1 transparent image.\n"
        );
        assert_eq!(redirects[1].description, None);
    }

    #[test]
    fn test_missing_description() {
        let redirects = parse_redirects_yaml(YAML, Path::new("static-redirects.yml")).unwrap();
        assert!(matches!(
            redirects[1].required_description(),
            Err(DocsError::MissingDescription(title)) if title == "noopjs"
        ));
    }

    #[test]
    fn test_invalid_yaml() {
        let result = parse_redirects_yaml("- title: [unclosed", Path::new("bad.yml"));
        assert!(matches!(result, Err(DocsError::Yaml { .. })));
    }
}
