use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeadshotNameError {
    #[error("headshot file name {0:?} yields an empty display name")]
    Empty(String),
}

/// Derives a person's display name from a headshot file name.
///
/// Headshots are named `"<last>, <first> [<tag>].<ext>"`. The extension and
/// a trailing bracketed tag are dropped, comma-separated parts are reversed
/// and joined with single spaces: `"Smith, John [No Logo].jpg"` becomes
/// `"John Smith"`. Any directory prefix is ignored.
pub fn display_name(file_name: &str) -> Result<String, HeadshotNameError> {
    let base = file_name.rsplit('/').next().unwrap_or(file_name);
    let stem = match base.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => base,
    };
    let stem = strip_bracketed_suffix(stem);

    let name = stem
        .split(',')
        .rev()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if name.is_empty() {
        return Err(HeadshotNameError::Empty(file_name.to_string()));
    }
    Ok(name)
}

fn strip_bracketed_suffix(stem: &str) -> &str {
    let trimmed = stem.trim_end();
    if trimmed.ends_with(']') {
        if let Some(open) = trimmed.rfind('[') {
            return &trimmed[..open];
        }
    }
    trimmed
}
