//! Public URL mapping for media files.

use crate::models::ServeFrom;

const LOCAL_PREFIX: &str = "/local";
const MEDIA_SOURCE_PREFIX: &str = "media-source://media_source/local";

/// Map a media file to its public URL.
///
/// - `www`: `/local/<root below www/>/<folder>/<file>`
/// - `media`: `media-source://media_source/local/<root below media/>/<folder>/<file>`
/// - `component`: no URL, unless the configured root itself starts with
///   `www/` or `media/`, in which case the matching mapping applies.
pub fn resolve_media_url(
    serve_from: ServeFrom,
    root: &str,
    folder: &str,
    file_name: &str,
) -> Option<String> {
    if file_name.is_empty() {
        return None;
    }

    let is_component = serve_from == ServeFrom::Component;
    if serve_from == ServeFrom::Www || (is_component && root.starts_with("www/")) {
        return Some(join_url(LOCAL_PREFIX, below(root, "www/"), folder, file_name));
    }
    if serve_from == ServeFrom::Media || (is_component && root.starts_with("media/")) {
        return Some(join_url(MEDIA_SOURCE_PREFIX, below(root, "media/"), folder, file_name));
    }
    None
}

/// Part of `root` after the first `marker`, or all of it, without edge slashes.
fn below<'a>(root: &'a str, marker: &str) -> &'a str {
    root.split_once(marker)
        .map_or(root, |(_, rest)| rest)
        .trim_matches('/')
}

fn join_url(prefix: &str, sub: &str, folder: &str, file_name: &str) -> String {
    let mut url = prefix.to_string();
    for segment in [sub, folder.trim_matches('/'), file_name] {
        if !segment.is_empty() {
            url.push('/');
            url.push_str(segment);
        }
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_www_mapping() {
        assert_eq!(
            resolve_media_url(ServeFrom::Www, "www/pools", "alerts", "siren.mp3").as_deref(),
            Some("/local/pools/alerts/siren.mp3")
        );
        assert_eq!(
            resolve_media_url(ServeFrom::Www, "/config/www/sounds/", "alerts", "siren.mp3").as_deref(),
            Some("/local/sounds/alerts/siren.mp3")
        );
        assert_eq!(
            resolve_media_url(ServeFrom::Www, "www/", "alerts", "siren.mp3").as_deref(),
            Some("/local/alerts/siren.mp3")
        );
    }

    #[test]
    fn test_media_mapping() {
        assert_eq!(
            resolve_media_url(ServeFrom::Media, "media/pools", "chimes", "ding.ogg").as_deref(),
            Some("media-source://media_source/local/pools/chimes/ding.ogg")
        );
    }

    #[test]
    fn test_component_has_no_url() {
        assert_eq!(
            resolve_media_url(
                ServeFrom::Component,
                "custom_components/pools/assets/media",
                "alerts",
                "siren.mp3"
            ),
            None
        );
    }

    #[test]
    fn test_component_auto_detects_root() {
        assert_eq!(
            resolve_media_url(ServeFrom::Component, "www/sounds", "alerts", "siren.mp3").as_deref(),
            Some("/local/sounds/alerts/siren.mp3")
        );
        assert_eq!(
            resolve_media_url(ServeFrom::Component, "media/sounds", "alerts", "siren.mp3").as_deref(),
            Some("media-source://media_source/local/sounds/alerts/siren.mp3")
        );
    }

    #[test]
    fn test_empty_file_name() {
        assert_eq!(resolve_media_url(ServeFrom::Www, "www", "alerts", ""), None);
    }
}
