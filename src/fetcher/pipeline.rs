use crate::fetcher::{errors::FetchError, types::PageResponse};
use bytes::Bytes;
use chrono::Utc;
use encoding_rs::Encoding;
use regex::Regex;
use reqwest::StatusCode;
use std::sync::LazyLock;
use url::Url;

/// Bytes scanned for an in-document charset declaration.
const SNIFF_WINDOW: usize = 4096;

static CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

static META_HTTP_EQUIV_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+[^>]*?http-equiv\s*=\s*["']?content-type["']?[^>]*?content\s*=\s*["']?[^"'>]*?charset\s*=\s*([^"'\s;/>]+)"#).unwrap()
});

pub fn process_response(
    url_final: Url,
    status: StatusCode,
    body_bytes: Bytes,
    content_type: &str,
) -> Result<PageResponse, FetchError> {
    let encoding = detect_encoding(content_type, &body_bytes);
    let (decoded, _, had_errors) = encoding.decode(&body_bytes);
    if had_errors {
        return Err(FetchError::Charset(format!(
            "body is not valid {}",
            encoding.name()
        )));
    }

    Ok(PageResponse {
        url_final,
        status,
        body_utf8: decoded.into_owned(),
        charset: encoding.name(),
        fetched_at: Utc::now(),
    })
}

/// Header declaration first, then the document's own `<meta>` tags, then a
/// statistical guess over the leading bytes.
fn detect_encoding(content_type: &str, body_bytes: &[u8]) -> &'static Encoding {
    if let Some(encoding) = declared_encoding(&CHARSET_REGEX, content_type) {
        return encoding;
    }

    let window = &body_bytes[..body_bytes.len().min(SNIFF_WINDOW)];
    let head = String::from_utf8_lossy(window);
    for pattern in [&*META_CHARSET_REGEX, &*META_HTTP_EQUIV_REGEX] {
        if let Some(encoding) = declared_encoding(pattern, &head) {
            return encoding;
        }
    }

    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(window, false);
    detector.guess(None, true)
}

fn declared_encoding(pattern: &Regex, haystack: &str) -> Option<&'static Encoding> {
    let label = pattern.captures(haystack)?.get(1)?.as_str().to_ascii_lowercase();
    Encoding::for_label(label.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charset_from_content_type() {
        let body = b"<html><head><title>Test</title></head></html>";
        let encoding = detect_encoding("text/html; charset=utf-8", body);
        assert_eq!(encoding, encoding_rs::UTF_8);
    }

    #[test]
    fn charset_from_meta_tag() {
        let body = b"<html><head><meta charset=\"iso-8859-1\"><title>Test</title></head></html>";
        // encoding_rs folds ISO-8859-1 into its windows-1252 superset
        assert_eq!(detect_encoding("text/html", body), encoding_rs::WINDOWS_1252);
    }

    #[test]
    fn charset_from_http_equiv() {
        let body = b"<html><head><meta http-equiv=\"Content-Type\" content=\"text/html; charset=windows-1252\"><title>Test</title></head></html>";
        assert_eq!(detect_encoding("text/html", body), encoding_rs::WINDOWS_1252);
    }

    #[test]
    fn decodes_latin1_body() {
        let body = Bytes::from_static(b"<p>Universit\xe9</p>");
        let url = Url::parse("https://example.com/").unwrap();
        let page =
            process_response(url, StatusCode::OK, body, "text/html; charset=iso-8859-1").unwrap();
        assert_eq!(page.body_utf8, "<p>Université</p>");
        assert_eq!(page.charset, "windows-1252");
    }
}
