//! Endpoint URL construction for the sampling server.
//!
//! Tunnel addresses are often pasted with a trailing slash, and the server's
//! routes are written without a leading one; both forms must produce the
//! same request URL.

/// Strip trailing slashes and surrounding whitespace from a base URL.
///
/// ```
/// use llm_sampler::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("https://abc.ngrok.io/"), "https://abc.ngrok.io");
/// assert_eq!(normalize_base_url(" http://127.0.0.1:5000// "), "http://127.0.0.1:5000");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

/// Join a base URL and an endpoint name with exactly one slash.
///
/// ```
/// use llm_sampler::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("https://abc.ngrok.io/", "/get-models"),
///     "https://abc.ngrok.io/get-models"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{normalized_base}/{endpoint}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("http://localhost:5000"),
            "http://localhost:5000"
        );
        assert_eq!(
            normalize_base_url("http://localhost:5000///"),
            "http://localhost:5000"
        );
        assert_eq!(
            normalize_base_url("https://host.example/sampler/"),
            "https://host.example/sampler"
        );
        assert_eq!(normalize_base_url(""), "");
        assert_eq!(normalize_base_url("///"), "");
    }

    #[test]
    fn test_construct_api_url() {
        for endpoint in ["ping", "/ping", "///ping"] {
            assert_eq!(
                construct_api_url("http://localhost:5000/", endpoint),
                "http://localhost:5000/ping"
            );
        }
        assert_eq!(
            construct_api_url("https://host.example/sampler", "load-model"),
            "https://host.example/sampler/load-model"
        );
    }
}
