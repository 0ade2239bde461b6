use url::Url;

/// Parse an API root URL, making sure its path ends with `/` so that
/// relative hrefs are joined underneath it instead of replacing the last
/// path segment.
pub fn api_root(raw: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Resolve an href returned by the API against the API root.
///
/// Absolute hrefs (with a scheme) are returned untouched. Relative hrefs are
/// always treated as relative to the API root, even with a leading `/`,
/// because resource links are rendered relative to it (`users/42`).
pub fn resolve(root: &Url, href: &str) -> Result<Url, url::ParseError> {
    if let Ok(absolute) = Url::parse(href) {
        return Ok(absolute);
    }
    root.join(href.trim().trim_start_matches('/'))
}

/// Append a sub-resource segment to an href (`users/42` + `desks`).
pub fn child(href: &str, segment: &str) -> String {
    let base = href.trim().trim_end_matches('/');
    let segment = segment.trim_matches('/');
    if base.is_empty() {
        return segment.to_string();
    }
    format!("{}/{}", base, segment)
}
