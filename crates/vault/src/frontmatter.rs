//! YAML front matter access
//!
//! A document's front matter is a YAML mapping enclosed by `---` lines at the very
//! start of the file, optionally after a byte order mark. Writes edit the block
//! line by line: only the lines of the property being set change, so comments,
//! formatting of other keys and the body are kept byte for byte.

use anyhow::{bail, Context, Result};
use log::warn;
use serde_yaml::{Mapping, Value};
use std::ops::Range;

const BOM: char = '\u{feff}';

/// Byte offsets of a front matter block within its document
struct Block {
    /// The YAML between the fences
    yaml: Range<usize>,
    /// Start of the body after the closing fence
    body: usize,
}

fn bom_len(content: &str) -> usize {
    if content.starts_with(BOM) {
        BOM.len_utf8()
    } else {
        0
    }
}

fn is_line_end(c: char) -> bool {
    c == '\r' || c == '\n'
}

fn is_indent(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn find_block(content: &str) -> Option<Block> {
    let start = bom_len(content);
    let rest = &content[start..];
    let fence = if rest.starts_with("---\n") {
        4
    } else if rest.starts_with("---\r\n") {
        5
    } else {
        return None;
    };

    let yaml_start = start + fence;
    let mut offset = yaml_start;
    for line in content[yaml_start..].split_inclusive('\n') {
        if line.trim_end_matches(is_line_end) == "---" {
            return Some(Block {
                yaml: yaml_start..offset,
                body: offset + line.len(),
            });
        }
        offset += line.len();
    }
    None
}

/// Split content into its front matter block and the body after it
///
/// Returns `None` when the content does not start with a complete block.
pub fn split(content: &str) -> Option<(&str, &str)> {
    let block = find_block(content)?;
    Some((&content[block.yaml], &content[block.body..]))
}

fn parse_mapping(yaml: &str) -> Result<Mapping> {
    if yaml.trim().is_empty() {
        return Ok(Mapping::new());
    }
    serde_yaml::from_str(yaml).context("Failed to parse front matter")
}

/// Read a string property from the front matter
///
/// Missing front matter, a missing key and a null value all yield `Ok(None)`.
/// Values that are not strings are reported and treated as missing.
pub fn get_property(content: &str, key: &str) -> Result<Option<String>> {
    let Some((yaml, _)) = split(content) else {
        return Ok(None);
    };

    let mapping = parse_mapping(yaml)?;
    match mapping.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(other) => {
            warn!("Ignoring non-string front matter value for {}: {:?}", key, other);
            Ok(None)
        }
    }
}

/// Return `content` with `key` set to `value` in its front matter
///
/// An existing top-level `key:` line (and any indented or list lines belonging
/// to its value) is replaced in place; otherwise the property is added as the
/// last line of the block. A front matter block is created when the content has
/// none.
pub fn set_property(content: &str, key: &str, value: &str) -> Result<String> {
    let Some(block) = find_block(content) else {
        let start = bom_len(content);
        let eol = if content.contains("\r\n") { "\r\n" } else { "\n" };
        return Ok(format!(
            "{}---{eol}{}{eol}---{eol}{}",
            &content[..start],
            property_line(key, value)?,
            &content[start..],
            eol = eol
        ));
    };

    let yaml = &content[block.yaml.clone()];
    parse_mapping(yaml)?;

    let eol = if content[..block.yaml.start].ends_with("\r\n") {
        "\r\n"
    } else {
        "\n"
    };
    let line = property_line(key, value)?;
    let lines: Vec<&str> = yaml.split_inclusive('\n').collect();

    let mut updated = String::with_capacity(content.len() + line.len() + eol.len());
    updated.push_str(&content[..block.yaml.start]);
    match lines.iter().position(|l| is_key_line(l, key)) {
        Some(index) => {
            let end = value_end(&lines, index);
            lines[..index].iter().for_each(|l| updated.push_str(l));
            updated.push_str(&line);
            updated.push_str(eol);
            lines[end..].iter().for_each(|l| updated.push_str(l));
        }
        None => {
            updated.push_str(yaml);
            updated.push_str(&line);
            updated.push_str(eol);
        }
    }
    let yaml_end = updated.len();
    updated.push_str(&content[block.yaml.end..]);

    let written = parse_mapping(&updated[block.yaml.start..yaml_end])
        .with_context(|| format!("Setting {} would break the front matter", key))?;
    if written.get(key) != Some(&Value::String(value.to_string())) {
        bail!("Could not set {} in front matter", key);
    }
    Ok(updated)
}

/// `key: value` with both sides quoted as YAML requires
fn property_line(key: &str, value: &str) -> Result<String> {
    Ok(format!("{}: {}", scalar(key)?, scalar(value)?))
}

fn scalar(text: &str) -> Result<String> {
    let yaml = serde_yaml::to_string(&Value::String(text.to_string()))
        .context("Failed to serialize front matter value")?;
    Ok(yaml.trim_end_matches('\n').to_string())
}

/// Whether `line` starts the top-level entry for `key`
fn is_key_line(line: &str, key: &str) -> bool {
    let line = line.trim_end_matches(is_line_end);
    let quoted = [format!("\"{}\"", key), format!("'{}'", key)];

    std::iter::once(key)
        .chain(quoted.iter().map(String::as_str))
        .filter_map(|candidate| line.strip_prefix(candidate))
        .filter_map(|rest| rest.trim_start_matches(is_indent).strip_prefix(':'))
        .any(|after| after.is_empty() || after.starts_with(is_indent))
}

/// Index one past the last line belonging to the value started at `index`
///
/// Indented lines and `- ` items continue the value. Blank lines only do when a
/// continuation line follows them.
fn value_end(lines: &[&str], index: usize) -> usize {
    let mut end = index + 1;
    for (i, line) in lines.iter().enumerate().skip(index + 1) {
        let text = line.trim_end_matches(is_line_end);
        if text.trim().is_empty() {
            continue;
        }
        if text.starts_with(is_indent) || text == "-" || text.starts_with("- ") {
            end = i + 1;
        } else {
            break;
        }
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split() {
        assert_eq!(split("---\nPARA: Area\n---\nbody"), Some(("PARA: Area\n", "body")));
        assert_eq!(split("---\r\nPARA: Area\r\n---\r\nbody"), Some(("PARA: Area\r\n", "body")));
        assert_eq!(split("---\n---\n"), Some(("", "")));
        assert_eq!(split("---\nPARA: Area\n---"), Some(("PARA: Area\n", "")));
        assert_eq!(split("no front matter"), None);
        assert_eq!(split("---\nunterminated: true\n"), None);
    }

    #[test]
    fn test_get_property() {
        let content = "---\ntags: [a]\nPARA: Project/Alpha\n---\n# Title\n";
        assert_eq!(
            get_property(content, "PARA").unwrap(),
            Some("Project/Alpha".to_string())
        );
        assert_eq!(get_property(content, "missing").unwrap(), None);
        assert_eq!(get_property("# Title\n", "PARA").unwrap(), None);
        assert_eq!(get_property("---\nPARA:\n---\n", "PARA").unwrap(), None);
        assert_eq!(get_property("---\nPARA: 42\n---\n", "PARA").unwrap(), None);
    }

    #[test]
    fn test_get_property_rejects_broken_yaml() {
        assert!(get_property("---\nPARA: [unclosed\n---\n", "PARA").is_err());
    }

    #[test]
    fn test_set_property_replaces_and_keeps_order() {
        let content = "---\ntitle: Plan\nPARA: Area/X\nstatus: open\n---\nBody text\n";
        let updated = set_property(content, "PARA", "Resource/Y").unwrap();
        assert_eq!(
            updated,
            "---\ntitle: Plan\nPARA: Resource/Y\nstatus: open\n---\nBody text\n"
        );
    }

    #[test]
    fn test_set_property_creates_front_matter() {
        let updated = set_property("Just a body\n", "PARA", "Archive").unwrap();
        assert_eq!(updated, "---\nPARA: Archive\n---\nJust a body\n");
        assert_eq!(get_property(&updated, "PARA").unwrap(), Some("Archive".to_string()));
    }

    #[test]
    fn test_set_property_appends_new_key() {
        let updated = set_property("---\ntitle: Plan\n---\n", "PARA", "Project").unwrap();
        assert_eq!(updated, "---\ntitle: Plan\nPARA: Project\n---\n");
    }

    #[test]
    fn test_set_property_keeps_comments_and_formatting() {
        let content = "---\n# reviewed weekly\ntags: [a, b]\nPARA: Area/X # moved later\nstatus: open\n---\nBody\n";
        let updated = set_property(content, "PARA", "Resource").unwrap();
        assert_eq!(
            updated,
            "---\n# reviewed weekly\ntags: [a, b]\nPARA: Resource\nstatus: open\n---\nBody\n"
        );
    }

    #[test]
    fn test_set_property_replaces_multiline_value() {
        let content = "---\nPARA:\n  - Area\n  - X\n\ntitle: Plan\n---\n";
        let updated = set_property(content, "PARA", "Resource").unwrap();
        assert_eq!(updated, "---\nPARA: Resource\n\ntitle: Plan\n---\n");

        let content = "---\nPARA:\n- Area\ntitle: Plan\n---\n";
        let updated = set_property(content, "PARA", "Archive").unwrap();
        assert_eq!(updated, "---\nPARA: Archive\ntitle: Plan\n---\n");
    }

    #[test]
    fn test_set_property_ignores_similar_and_nested_keys() {
        let content = "---\nPARA_OLD: Area\nmeta:\n  PARA: nested\n---\n";
        let updated = set_property(content, "PARA", "Project").unwrap();
        assert_eq!(
            updated,
            "---\nPARA_OLD: Area\nmeta:\n  PARA: nested\nPARA: Project\n---\n"
        );
    }

    #[test]
    fn test_set_property_quoted_key_and_crlf() {
        let content = "---\r\n\"PARA\": Area\r\nx: 1\r\n---\r\nbody";
        let updated = set_property(content, "PARA", "Resource").unwrap();
        assert_eq!(updated, "---\r\nPARA: Resource\r\nx: 1\r\n---\r\nbody");
    }

    #[test]
    fn test_byte_order_mark() {
        let content = "\u{feff}---\nPARA: Area/X\n---\nBody\n";
        assert_eq!(split(content), Some(("PARA: Area/X\n", "Body\n")));
        assert_eq!(get_property(content, "PARA").unwrap(), Some("Area/X".to_string()));

        let updated = set_property(content, "PARA", "Resource").unwrap();
        assert_eq!(updated, "\u{feff}---\nPARA: Resource\n---\nBody\n");

        let created = set_property("\u{feff}Body\n", "PARA", "Area").unwrap();
        assert_eq!(created, "\u{feff}---\nPARA: Area\n---\nBody\n");
    }

    #[test]
    fn test_set_property_rejects_broken_yaml() {
        assert!(set_property("---\nPARA: [unclosed\n---\n", "PARA", "Area").is_err());
    }
}
