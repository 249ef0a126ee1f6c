//! Launch argument scanning

use url::Url;

/// First argument that is an absolute http(s) URL mentioning one of `hosts`.
///
/// This is a match, not a parser: flags and paths are simply skipped.
pub fn find_launch_url<S: AsRef<str>>(args: &[S], hosts: &[String]) -> Option<String> {
    args.iter().map(AsRef::as_ref).find_map(|arg| {
        let url = Url::parse(arg).ok()?;
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }

        hosts
            .iter()
            .any(|host| !host.is_empty() && arg.contains(host.as_str()))
            .then(|| arg.to_string())
    })
}
