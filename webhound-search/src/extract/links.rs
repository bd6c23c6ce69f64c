//! Link resolution for extracted result anchors.
//!
//! Search engines rarely link to results directly: Google routes through
//! `/url?q=…`, DuckDuckGo through `//duckduckgo.com/l/?uddg=…`, and many
//! hrefs are relative or protocol-relative. [`resolve_link`] turns a raw
//! `href` into the absolute target URL used as the dedup key.

use url::Url;

/// Redirect wrappers: (host suffix, path prefix, parameter holding the target).
const REDIRECT_WRAPPERS: &[(&str, &str, &str)] = &[
    ("duckduckgo.com", "/l/", "uddg"),
    ("google.com", "/url", "q"),
    ("google.com", "/url", "url"),
    ("startpage.com", "/do/redirect", "url"),
];

/// Resolve a raw `href` against the page it was found on.
///
/// Returns `None` for an empty href. Hrefs that cannot be parsed even
/// relative to `base_url` are returned trimmed but otherwise unchanged.
pub fn resolve_link(href: &str, base_url: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let absolute = if href.starts_with("//") {
        Url::parse(&format!("https:{href}")).ok()
    } else {
        Url::parse(href)
            .ok()
            .or_else(|| Url::parse(base_url).ok().and_then(|base| base.join(href).ok()))
    };

    let Some(parsed) = absolute else {
        return Some(href.to_owned());
    };

    Some(unwrap_redirect(&parsed).unwrap_or_else(|| parsed.to_string()))
}

/// Extract the real target from a known redirect wrapper.
fn unwrap_redirect(parsed: &Url) -> Option<String> {
    let host = parsed.host_str()?;
    REDIRECT_WRAPPERS
        .iter()
        .filter(|(suffix, prefix, _)| host_matches(host, suffix) && parsed.path().starts_with(prefix))
        .find_map(|(_, _, param)| {
            parsed
                .query_pairs()
                .find(|(key, _)| key == param)
                .map(|(_, value)| value.into_owned())
        })
        .filter(|target| target.starts_with("http://") || target.starts_with("https://"))
}

fn host_matches(host: &str, suffix: &str) -> bool {
    host == suffix || host.ends_with(&format!(".{suffix}"))
}
