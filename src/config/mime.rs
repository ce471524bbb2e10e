//! File type label to media type lookup

/// Known file type labels and the media type each one accepts
const MEDIA_TYPES: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("htm", "text/html"),
    ("xhtml", "application/xhtml+xml"),
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("xls", "application/vnd.ms-excel"),
    (
        "xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    ("ppt", "application/vnd.ms-powerpoint"),
    (
        "pptx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    ),
    ("txt", "text/plain"),
    ("text", "text/plain"),
    ("csv", "text/csv"),
    ("json", "application/json"),
    ("xml", "application/xml"),
    ("rtf", "application/rtf"),
];

/// Looks up the media type for a single file type label
///
/// Labels are matched case-insensitively. Unknown labels are returned
/// unchanged so raw media types ("image/png") can be configured directly.
pub fn media_type_for(label: &str) -> String {
    let key = label.trim().to_lowercase();
    MEDIA_TYPES
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, media_type)| media_type.to_string())
        .unwrap_or_else(|| label.to_string())
}

/// Maps configured file type labels to the accepted media types
pub fn resolve_media_types(labels: &[String]) -> Vec<String> {
    labels.iter().map(|label| media_type_for(label)).collect()
}
