//! Describing-comment extraction
//!
//! Scriptlet and redirect sources document themselves in `/** ... */`
//! blocks carrying a kind tag (`@scriptlet`, `@trustedScriptlet`,
//! `@redirect`) with the entry name, followed by `@description` and the
//! Markdown body.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::DocsError;

const BLOCK_START: &str = "/**";
const BLOCK_END: &str = "*/";
const DESCRIPTION_TAG: &str = "@description";

/// Kind of documented entry, taken from its tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Scriptlet,
    TrustedScriptlet,
    Redirect,
}

impl EntryKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "@scriptlet" => Some(Self::Scriptlet),
            "@trustedScriptlet" => Some(Self::TrustedScriptlet),
            "@redirect" => Some(Self::Redirect),
            _ => None,
        }
    }

    /// Label used in the "... source" link.
    pub fn source_label(self) -> &'static str {
        match self {
            Self::Scriptlet | Self::TrustedScriptlet => "Scriptlet",
            Self::Redirect => "Redirect",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Scriptlet => "scriptlet",
            Self::TrustedScriptlet => "trustedScriptlet",
            Self::Redirect => "redirect",
        };
        f.write_str(tag)
    }
}

/// One documented scriptlet or redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribingComment {
    pub kind: EntryKind,
    pub name: String,
    pub description: String,
    /// Link to the source file, relative to the wiki directory.
    pub source: String,
}

/// Extract every describing comment from one source file's text.
///
/// Blocks without a kind tag (plain JSDoc on helpers) are skipped.
pub fn parse_describing_comments(text: &str, source: &str) -> Result<Vec<DescribingComment>, DocsError> {
    let mut entries = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find(BLOCK_START) {
        let after_start = &rest[start + BLOCK_START.len()..];
        let Some(end) = after_start.find(BLOCK_END) else {
            break;
        };
        let block = &after_start[..end];
        rest = &after_start[end + BLOCK_END.len()..];

        if let Some(entry) = parse_block(block, source)? {
            entries.push(entry);
        }
    }

    Ok(entries)
}

fn parse_block(block: &str, source: &str) -> Result<Option<DescribingComment>, DocsError> {
    let mut kind_and_name = None;
    let mut description: Vec<&str> = Vec::new();
    let mut collecting = false;

    for line in block.lines().map(strip_comment_prefix) {
        let trimmed = line.trim();
        if !is_tag_line(trimmed) {
            if collecting {
                description.push(line);
            }
            continue;
        }

        collecting = false;
        let mut words = trimmed.split_whitespace();
        let tag = words.next().unwrap_or_default();

        if let Some(kind) = EntryKind::from_tag(tag) {
            let name = words.next().ok_or_else(|| DocsError::MissingName {
                kind,
                source_path: source.to_string(),
            })?;
            kind_and_name = Some((kind, name.to_string()));
        } else if tag == DESCRIPTION_TAG {
            collecting = true;
            let inline = trimmed[DESCRIPTION_TAG.len()..].trim();
            if !inline.is_empty() {
                description.push(inline);
            }
        }
    }

    let Some((kind, name)) = kind_and_name else {
        return Ok(None);
    };

    Ok(Some(DescribingComment {
        kind,
        name,
        description: join_description(&description),
        source: source.to_string(),
    }))
}

/// `@tag` lines; `@@` exception rules inside examples are not tags.
fn is_tag_line(line: &str) -> bool {
    let mut chars = line.chars();
    chars.next() == Some('@') && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
}

/// Drop the leading ` * ` decoration of a comment line, keeping any
/// indentation after it.
fn strip_comment_prefix(line: &str) -> &str {
    let line = line.trim_start();
    match line.strip_prefix('*') {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
        None => line,
    }
}

fn join_description(lines: &[&str]) -> String {
    let start = lines.iter().position(|l| !l.trim().is_empty()).unwrap_or(lines.len());
    let end = lines.iter().rposition(|l| !l.trim().is_empty()).map_or(start, |i| i + 1);
    lines[start..end]
        .iter()
        .map(|l| l.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Read every `.js` file in `dir` (sorted by name) and collect its entries.
///
/// Source links are `{link_prefix}/{file name}`.
pub fn collect_from_dir(dir: &Path, link_prefix: &str) -> Result<Vec<DescribingComment>, DocsError> {
    let read_dir = fs::read_dir(dir).map_err(|e| DocsError::Read {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| DocsError::Read {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "js") {
            files.push(path);
        }
    }
    files.sort();

    let mut entries = Vec::new();
    for path in files {
        let text = fs::read_to_string(&path).map_err(|e| DocsError::Read {
            path: path.clone(),
            source: e,
        })?;
        let file_name = path.file_name().unwrap_or_default().to_string_lossy();
        let source = format!("{}/{}", link_prefix, file_name);

        let found = parse_describing_comments(&text, &source)?;
        log::debug!("{}: {} describing comment(s)", path.display(), found.len());
        entries.extend(found);
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOWEBRTC: &str = r#"/* eslint-disable no-unused-vars */
import { hit } from '../helpers';

/**
 * @scriptlet nowebrtc
 *
 * @description
 * Disables WebRTC by overriding `RTCPeerConnection`.
 *
 * **Syntax**
 * ```
 * example.org#%#//scriptlet('nowebrtc')
 * ```
 */
export function nowebrtc(source) {}
"#;

    #[test]
    fn test_parse_scriptlet_comment() {
        let entries = parse_describing_comments(NOWEBRTC, "../src/scriptlets/nowebrtc.js").unwrap();
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.kind, EntryKind::Scriptlet);
        assert_eq!(entry.name, "nowebrtc");
        assert_eq!(entry.source, "../src/scriptlets/nowebrtc.js");
        assert_eq!(
            entry.description,
            "Disables WebRTC by overriding `RTCPeerConnection`.\n\n**Syntax**\n```\nexample.org#%#//scriptlet('nowebrtc')\n```"
        );
    }

    #[test]
    fn test_nested_indentation_kept() {
        let text = "/**\n * @trustedScriptlet trusted-set-cookie\n * @description\n * - `path`:\n *   - `/` root\n */";
        let entries = parse_describing_comments(text, "x.js").unwrap();
        assert_eq!(entries[0].kind, EntryKind::TrustedScriptlet);
        assert_eq!(entries[0].description, "- `path`:\n  - `/` root");
    }

    #[test]
    fn test_untagged_blocks_skipped() {
        let text = "/**\n * Sets static properties.\n *\n * @param {Source} source\n */\nexport function f() {}";
        assert!(parse_describing_comments(text, "x.js").unwrap().is_empty());
    }

    #[test]
    fn test_description_stops_at_next_tag() {
        let text = "/**\n * @redirect noeval\n * @description\n * Prevents eval.\n * @example\n * ignored\n */";
        let entries = parse_describing_comments(text, "noeval.js").unwrap();
        assert_eq!(entries[0].kind, EntryKind::Redirect);
        assert_eq!(entries[0].description, "Prevents eval.");
    }

    #[test]
    fn test_tag_without_name_is_error() {
        let text = "/**\n * @scriptlet\n * @description\n * nothing\n */";
        assert!(matches!(
            parse_describing_comments(text, "x.js"),
            Err(DocsError::MissingName { .. })
        ));
    }
}
