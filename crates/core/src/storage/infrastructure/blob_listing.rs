//! Minimal reader for the Azure Blob "List Blobs" XML response.
//!
//! Only `<Blob><Name>` and `<NextMarker>` are extracted. The response is
//! machine-generated and flat, so element text is located by tag scanning.

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlobListPage {
    pub names: Vec<String>,
    /// Continuation marker; `None` on the last page.
    pub next_marker: Option<String>,
}

pub fn parse_list_blobs(xml: &str) -> BlobListPage {
    let mut names = Vec::new();
    let mut rest = xml;
    while let Some(start) = rest.find("<Blob>") {
        let after = &rest[start + "<Blob>".len()..];
        let end = after.find("</Blob>").unwrap_or(after.len());
        if let Some(name) = element_text(&after[..end], "Name") {
            names.push(decode_entities(name));
        }
        rest = &after[end..];
    }

    let next_marker = element_text(xml, "NextMarker")
        .map(decode_entities)
        .filter(|m| !m.is_empty());

    BlobListPage { names, next_marker }
}

/// Text of the first `<tag>…</tag>` element. Self-closing tags yield `None`.
fn element_text<'a>(xml: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let start = xml.find(&open)? + open.len();
    let len = xml[start..].find(&close)?;
    Some(&xml[start..start + len])
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match tail.find(';').and_then(|semi| {
            decode_entity(&tail[1..semi]).map(|c| (c, semi))
        }) {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = if let Some(hex) = entity.strip_prefix("#x") {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                entity.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}
