use crate::data::RemoteClient;

/// Shown whenever a record has no usable image reference.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://placehold.co/256x256?text=%3F";

/// Maps a stored image reference to a URL the webview can render directly.
/// Fully-qualified references pass through untouched; bare paths resolve
/// against the storage namespace when the remote client exists.
pub fn resolve_image_url(reference: Option<&str>, remote: Option<&RemoteClient>) -> String {
    let reference = match reference.map(str::trim) {
        Some(reference) if !reference.is_empty() => reference,
        _ => return PLACEHOLDER_IMAGE_URL.to_string(),
    };

    if reference.starts_with("http://") || reference.starts_with("https://") {
        return reference.to_string();
    }

    match remote {
        Some(client) => client.public_object_url(reference),
        None => PLACEHOLDER_IMAGE_URL.to_string(),
    }
}
