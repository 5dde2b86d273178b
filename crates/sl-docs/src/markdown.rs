//! Markdown rendering of the wiki pages

use crate::comments::DescribingComment;
use crate::redirects::RedirectDescriptor;
use crate::DocsError;

const SEPARATOR: &str = "* * *";

/// Table of contents plus the per-entry sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkdownData {
    pub list: String,
    pub body: String,
}

impl MarkdownData {
    fn push_toc(&mut self, title: &str, anchor: &str) {
        self.list.push_str(&format!("* [{title}](#{anchor})\n"));
    }
}

/// Render entries collected from source comments.
///
/// Anchors are the lowercased names.
pub fn get_markdown_data(items: &[DescribingComment]) -> MarkdownData {
    let mut data = MarkdownData::default();

    for item in items {
        let anchor = item.name.to_lowercase();
        data.push_toc(&item.name, &anchor);
        data.body.push_str(&format!(
            "### <a id=\"{anchor}\"></a> ⚡️ {name}\n{description}\n\n[{label} source]({source})\n{SEPARATOR}\n\n",
            name = item.name,
            description = item.description,
            label = item.kind.source_label(),
            source = item.source,
        ));
    }

    data
}

/// Render YAML-described redirects.
///
/// `source_for` maps a title to its source link. The first entry without a
/// description aborts rendering.
fn get_markdown_data_for_descriptors<F>(items: &[RedirectDescriptor], source_for: F) -> Result<MarkdownData, DocsError>
where
    F: Fn(&str) -> String,
{
    let mut data = MarkdownData::default();

    for item in items {
        let description = item.required_description()?;
        let title = &item.title;
        data.push_toc(title, title);
        data.body.push_str(&format!(
            "### <a id=\"{title}\"></a> ⚡️ {title}\n{description}\n[Redirect source]({source})\n{SEPARATOR}\n\n",
            source = source_for(title),
        ));
    }

    Ok(data)
}

/// Static redirects all link to the one YAML file that defines them.
pub fn get_markdown_data_for_static_redirects(
    items: &[RedirectDescriptor],
    source: &str,
) -> Result<MarkdownData, DocsError> {
    get_markdown_data_for_descriptors(items, |_| source.to_string())
}

/// Blocking redirects (e.g. `click2load.html`) link to their own file.
pub fn get_markdown_data_for_blocking_redirects(
    items: &[RedirectDescriptor],
    source_dir: &str,
) -> Result<MarkdownData, DocsError> {
    get_markdown_data_for_descriptors(items, |title| format!("{source_dir}/{title}"))
}

// =============================================================================
// Pages
// =============================================================================

fn page(anchor: &str, heading: &str, parts: &[&MarkdownData]) -> String {
    let mut out = format!("## <a id=\"{anchor}\"></a> {heading}\n");
    for part in parts {
        out.push_str(&part.list);
    }
    out.push_str(SEPARATOR);
    out.push('\n');
    for part in parts {
        out.push_str(&part.body);
    }
    out
}

pub fn scriptlets_page(data: &MarkdownData) -> String {
    page("scriptlets", "Available Scriptlets", &[data])
}

pub fn trusted_scriptlets_page(data: &MarkdownData) -> String {
    page("trusted-scriptlets", "Available Trusted Scriptlets", &[data])
}

/// Static redirects first, then file-based ones, then blocking ones.
pub fn redirects_page(static_redirects: &MarkdownData, redirects: &MarkdownData, blocking: &MarkdownData) -> String {
    page(
        "redirect-resources",
        "Available Redirect resources",
        &[static_redirects, redirects, blocking],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comments::EntryKind;

    fn comment(kind: EntryKind, name: &str) -> DescribingComment {
        DescribingComment {
            kind,
            name: name.to_string(),
            description: "Does a thing.".to_string(),
            source: format!("../src/scriptlets/{name}.js"),
        }
    }

    #[test]
    fn test_markdown_for_comments() {
        let data = get_markdown_data(&[comment(EntryKind::Scriptlet, "set-popads-dummy")]);
        assert_eq!(data.list, "* [set-popads-dummy](#set-popads-dummy)\n");
        assert_eq!(
            data.body,
            "### <a id=\"set-popads-dummy\"></a> ⚡️ set-popads-dummy\nDoes a thing.\n\n\
             [Scriptlet source](../src/scriptlets/set-popads-dummy.js)\n* * *\n\n"
        );
    }

    #[test]
    fn test_anchor_lowercased() {
        let data = get_markdown_data(&[comment(EntryKind::Scriptlet, "log-setInterval")]);
        assert!(data.list.contains("(#log-setinterval)"));
        assert!(data.body.contains("<a id=\"log-setinterval\"></a> ⚡️ log-setInterval"));
    }

    #[test]
    fn test_redirect_label() {
        let data = get_markdown_data(&[comment(EntryKind::Redirect, "noeval")]);
        assert!(data.body.contains("[Redirect source]"));
    }

    #[test]
    fn test_static_and_blocking_redirects() {
        let items = vec![RedirectDescriptor {
            title: "click2load.html".to_string(),
            description: Some("Click to load.\n".to_string()),
        }];

        let stat = get_markdown_data_for_static_redirects(&items, "../src/redirects/static-redirects.yml").unwrap();
        assert!(stat.body.contains("[Redirect source](../src/redirects/static-redirects.yml)"));

        let blocking = get_markdown_data_for_blocking_redirects(&items, "../src/redirects/blocking-redirects").unwrap();
        assert_eq!(blocking.list, "* [click2load.html](#click2load.html)\n");
        assert_eq!(
            blocking.body,
            "### <a id=\"click2load.html\"></a> ⚡️ click2load.html\nClick to load.\n\n\
             [Redirect source](../src/redirects/blocking-redirects/click2load.html)\n* * *\n\n"
        );
    }

    #[test]
    fn test_missing_description_aborts() {
        let items = vec![
            RedirectDescriptor {
                title: "ok".to_string(),
                description: Some("fine".to_string()),
            },
            RedirectDescriptor {
                title: "broken".to_string(),
                description: None,
            },
        ];
        assert!(matches!(
            get_markdown_data_for_static_redirects(&items, "x.yml"),
            Err(DocsError::MissingDescription(title)) if title == "broken"
        ));
    }

    #[test]
    fn test_redirects_page_order() {
        let part = |name: &str| MarkdownData {
            list: format!("{name}-list\n"),
            body: format!("{name}-body\n"),
        };
        let out = redirects_page(&part("static"), &part("file"), &part("blocking"));
        assert_eq!(
            out,
            "## <a id=\"redirect-resources\"></a> Available Redirect resources\n\
             static-list\nfile-list\nblocking-list\n* * *\nstatic-body\nfile-body\nblocking-body\n"
        );
    }
}
