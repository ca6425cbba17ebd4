/// How a file link should be presented, decided by its extension alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilePreview {
    /// jpeg / jpg / gif / png
    Image,
    /// pdf, shown as an embedded document
    Document,
    /// Unrecognized extension: rendered as BOTH an image attempt and a plain
    /// download link, matching the shipped page behavior.
    Fallback,
    /// Empty or absent link: nothing is rendered.
    None,
}

/// Classify a file link the way the page does: case-insensitive match on the
/// final extension.
pub fn classify(link: Option<&str>) -> FilePreview {
    let link = match link {
        Some(l) if !l.is_empty() => l,
        _ => return FilePreview::None,
    };

    match link.rsplit('.').next().map(str::to_ascii_lowercase).as_deref() {
        Some("jpeg") | Some("jpg") | Some("gif") | Some("png") => FilePreview::Image,
        Some("pdf") => FilePreview::Document,
        _ => FilePreview::Fallback,
    }
}
