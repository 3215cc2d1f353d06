/// Strips every trailing slash from a base URL so paths can be appended
/// with a single `/`.
///
/// # Examples
/// ```
/// use ai::utils::uri::ensure_no_trailing_slash;
/// assert_eq!(
///     ensure_no_trailing_slash("https://api.openai.com/v1/"),
///     "https://api.openai.com/v1"
/// );
/// ```
pub fn ensure_no_trailing_slash<S>(url: S) -> String
where
    S: Into<String>,
{
    let mut url = url.into();
    let trimmed = url.trim_end_matches('/').len();
    url.truncate(trimmed);
    url
}
