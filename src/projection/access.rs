//! Derived access fields: browser links, API endpoints, test commands.

/// Upstream status string that unlocks access fields.
pub const RUNNING: &str = "running";

/// Case-insensitive `status == "running"`.
pub fn is_running(status: Option<&str>) -> bool {
    status.is_some_and(|s| s.trim().eq_ignore_ascii_case(RUNNING))
}

/// `{web_endpoint}/{segments...}`.
pub fn web_url(web_endpoint: &str, segments: &[&str]) -> String {
    let mut url = web_endpoint.trim_end_matches('/').to_string();
    for segment in segments {
        url.push('/');
        url.push_str(segment.trim_matches('/'));
    }
    url
}

/// OpenAI-compatible chat endpoint of a running deployment.
///
/// Upstream reports a bare host (`xxx.space.opencsg.com`) or a full URL.
/// An empty endpoint yields an empty string.
pub fn api_access_endpoint(endpoint: &str) -> String {
    let endpoint = endpoint.trim().trim_end_matches('/');
    if endpoint.is_empty() {
        return String::new();
    }
    let base = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("https://{endpoint}")
    };
    format!("{base}/v1/chat/completions")
}

/// Ready-to-run curl command against a deployment's chat endpoint.
pub fn test_command(api_endpoint: &str, model_id: &str) -> String {
    if api_endpoint.is_empty() {
        return String::new();
    }
    format!(
        "curl -X POST '{api_endpoint}' \
         -H 'Authorization: Bearer <CSGHUB_ACCESS_TOKEN>' \
         -H 'Content-Type: application/json' \
         -d '{{\"model\": \"{model_id}\", \"messages\": [{{\"role\": \"user\", \"content\": \"Hello\"}}], \"stream\": false}}'"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_check_ignores_case() {
        assert!(is_running(Some("Running")));
        assert!(is_running(Some("RUNNING")));
        assert!(!is_running(Some("Stopped")));
        assert!(!is_running(Some("")));
        assert!(!is_running(None));
    }

    #[test]
    fn web_url_joins_segments() {
        assert_eq!(
            web_url("https://opencsg.com/", &["datasets", "u/ds"]),
            "https://opencsg.com/datasets/u/ds"
        );
    }

    #[test]
    fn bare_hosts_get_https_scheme() {
        assert_eq!(
            api_access_endpoint("abc.space.opencsg.com"),
            "https://abc.space.opencsg.com/v1/chat/completions"
        );
        assert_eq!(
            api_access_endpoint("http://10.0.0.1:8080/"),
            "http://10.0.0.1:8080/v1/chat/completions"
        );
        assert_eq!(api_access_endpoint(" "), "");
    }

    #[test]
    fn test_command_mentions_endpoint_and_model() {
        let cmd = test_command("https://h/v1/chat/completions", "u/m");
        assert!(cmd.starts_with("curl -X POST 'https://h/v1/chat/completions'"));
        assert!(cmd.contains("\"model\": \"u/m\""));
        assert_eq!(test_command("", "u/m"), "");
    }
}
