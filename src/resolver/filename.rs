//! Filename derivation from Content-Disposition headers and URLs.

use url::Url;

/// Generic placeholder when no filename can be derived at all.
pub(crate) const FALLBACK_FILENAME: &str = "download";

/// Parses a Content-Disposition header to extract the filename.
///
/// Handles both:
/// - `attachment; filename*=UTF-8''na%C3%AFve.txt` (RFC 5987, tried first)
/// - `attachment; filename="example.pdf"` / `attachment; filename=example.pdf`
///
/// The captured token is percent-decoded; a decode failure falls back to the
/// raw token rather than discarding the header.
pub(crate) fn filename_from_disposition(header: &str) -> Option<String> {
    // Try filename*= first (RFC 5987 encoded)
    if let Some(pos) = header.find("filename*=") {
        let value = header[pos + 10..].trim();
        // Format: charset'language'encoded_value
        if let Some(quote_pos) = value.find("''") {
            let encoded = &value[quote_pos + 2..];
            let end = encoded.find(';').unwrap_or(encoded.len());
            let token = encoded[..end].trim().trim_matches('"');
            if !token.is_empty() {
                return Some(decode_or_raw(token));
            }
        }
    }

    // Try regular filename=
    if let Some(pos) = header.find("filename=") {
        let value = header[pos + 9..].trim();

        // Handle quoted filename
        if let Some(stripped) = value.strip_prefix('"') {
            if let Some(end) = stripped.find('"') {
                let name = &stripped[..end];
                if !name.is_empty() {
                    return Some(decode_or_raw(name));
                }
            }
        } else {
            // Unquoted - take until ; or end
            let end = value.find(';').unwrap_or(value.len());
            let name = value[..end].trim();
            if !name.is_empty() {
                return Some(decode_or_raw(name));
            }
        }
    }

    None
}

/// Derives a filename from a URL's final path segment, percent-decoded.
///
/// Returns the generic placeholder when the path is empty or the URL is
/// unparseable.
pub(crate) fn filename_from_url(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return FALLBACK_FILENAME.to_string();
    };

    let Some(last) = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
    else {
        return FALLBACK_FILENAME.to_string();
    };

    decode_or_raw(last)
}

/// Percent-decodes a captured token, keeping the raw token when decoding
/// fails (e.g. invalid UTF-8 after decode).
fn decode_or_raw(token: &str) -> String {
    match urlencoding::decode(token) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => token.to_string(),
    }
}
