use url::Url;

const EMBED_BASE: &str = "https://www.youtube.com/embed/";

fn is_video_id(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn video_id(url: &Url) -> Option<String> {
    let host = url.host_str()?.trim_start_matches("www.").trim_start_matches("m.");
    let mut segments = url.path_segments()?;

    if host == "youtube.com" {
        if let (Some("live"), Some(id)) = (segments.next(), segments.next()) {
            if is_video_id(id) {
                return Some(id.to_string());
            }
        }
    }
    if host == "youtu.be" {
        if let Some(id) = url.path_segments()?.next() {
            if is_video_id(id) {
                return Some(id.to_string());
            }
        }
    }
    url.query_pairs()
        .find(|(key, value)| key == "v" && is_video_id(value))
        .map(|(_, value)| value.into_owned())
}

/// Embeddable player URL for a YouTube link. Anything that is not a
/// recognisable YouTube video comes back unchanged.
pub fn youtube_embed_url(raw: &str) -> String {
    match Url::parse(raw.trim()).ok().as_ref().and_then(video_id) {
        Some(id) => format!("{}{}", EMBED_BASE, id),
        None => raw.to_string(),
    }
}
