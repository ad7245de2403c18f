// src/utils/urls.rs
use std::borrow::Cow;

use url::Url;

/// Converts a page-relative href to an absolute URL.
///
/// Joins against `{base}/` so relative hrefs resolve inside the wiki root
/// (e.g. base `https://host/JuanLab` + `doku.php?id=x` →
/// `https://host/JuanLab/doku.php?id=x`). Already-absolute hrefs pass
/// through; empty input yields an empty string.
pub fn absolute_link(base: &str, href: &str) -> String {
    if href.is_empty() {
        return String::new();
    }
    if href.starts_with("http") {
        return href.to_string();
    }
    let rooted = format!("{}/", base.trim_end_matches('/'));
    match Url::parse(&rooted).and_then(|b| b.join(href)) {
        Ok(url) => url.to_string(),
        Err(_) => href.to_string(),
    }
}

/// Resolves an image src against the site base URL.
///
/// Unlike [`absolute_link`] this joins against the base exactly as given
/// (no trailing slash added), matching how the wiki emits media paths:
/// `/lib/exe/fetch.php…` resolves at the host root.
pub fn absolute_image_src(base: &str, src: &str) -> String {
    if src.starts_with("http") {
        return src.to_string();
    }
    match Url::parse(base).and_then(|b| b.join(src)) {
        Ok(url) => url.to_string(),
        Err(_) => src.to_string(),
    }
}

/// Percent-encodes a DokuWiki page id for use in `doku.php?id=…`.
///
/// Namespace colons stay literal (`members:start`, `PI:Hsueh-Fen Juan` →
/// `PI:Hsueh-Fen%20Juan`); everything else non-unreserved is escaped.
pub fn encode_page_id(page_id: &str) -> String {
    urlencoding::encode(page_id).replace("%3A", ":")
}

/// Percent-decodes a URL fragment, returning the input unchanged when the
/// decoded bytes are not valid UTF-8.
pub fn percent_decode(s: &str) -> String {
    match urlencoding::decode(s) {
        Ok(Cow::Borrowed(v)) => v.to_string(),
        Ok(Cow::Owned(v)) => v,
        Err(_) => s.to_string(),
    }
}
