use anyhow::Result;
use url::Url;

/// Length of a platform video id
const VIDEO_ID_LEN: usize = 11;

/// Accept a bare video id or any common watch URL and return the id
pub fn parse_video_id(input: &str) -> Result<String> {
    let input = input.trim();

    if is_video_id(input) {
        return Ok(input.to_string());
    }

    let parsed = Url::parse(input).map_err(|_| anyhow::anyhow!("Invalid video id or URL: {}", input))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        anyhow::bail!("URL must use HTTP or HTTPS protocol");
    }

    let host = extract_domain(input).unwrap_or_default();
    let candidate = match host.as_str() {
        "youtu.be" => parsed
            .path_segments()
            .and_then(|mut segments| segments.next())
            .map(str::to_string),
        "youtube.com" | "m.youtube.com" | "music.youtube.com" => {
            let mut segments = parsed.path_segments().into_iter().flatten();
            match segments.next() {
                Some("watch") => parsed
                    .query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.into_owned()),
                Some("embed") | Some("shorts") | Some("live") | Some("v") => {
                    segments.next().map(str::to_string)
                }
                _ => None,
            }
        }
        _ => anyhow::bail!("Unsupported host: {}", host),
    };

    match candidate {
        Some(id) if is_video_id(&id) => Ok(id),
        _ => anyhow::bail!("Could not find a video id in: {}", input),
    }
}

fn is_video_id(candidate: &str) -> bool {
    candidate.len() == VIDEO_ID_LEN
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Extract domain from URL for display purposes
pub fn extract_domain(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()?
        .host_str()
        .map(|host| host.strip_prefix("www.").unwrap_or(host).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_id() {
        assert_eq!(parse_video_id("dQw4w9WgXcQ").unwrap(), "dQw4w9WgXcQ");
        assert_eq!(parse_video_id("  a-b_c1234XY ").unwrap(), "a-b_c1234XY");
    }

    #[test]
    fn test_parse_url_forms() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=42",
            "https://m.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ?si=abc",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
        ] {
            assert_eq!(parse_video_id(url).unwrap(), "dQw4w9WgXcQ", "url: {}", url);
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_video_id("not a video").is_err());
        assert!(parse_video_id("https://vimeo.com/123456").is_err());
        assert!(parse_video_id("https://www.youtube.com/watch?v=short").is_err());
        assert!(parse_video_id("ftp://youtube.com/watch?v=dQw4w9WgXcQ").is_err());
        assert!(parse_video_id("https://www.youtube.com/channel/UC123").is_err());
    }

    #[test]
    fn test_extract_domain() {
        assert_eq!(extract_domain("https://www.youtube.com/watch?v=123"), Some("youtube.com".to_string()));
        assert_eq!(extract_domain("https://youtu.be/abc"), Some("youtu.be".to_string()));
        assert_eq!(extract_domain("invalid-url"), None);
    }
}
