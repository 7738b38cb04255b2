//! Identity: token to username, and the namespaces a user can write to.

use serde_json::Value;

use super::try_reply;
use crate::client::{endpoint, Call, HubClient, Reply};
use crate::error::{HubError, Result};

/// Resolve the username owning an access token.
///
/// Authenticated with the service key, not the token itself.
pub async fn username(client: &HubClient, token: &str) -> Result<Reply<String>> {
    let envelope = try_reply!(
        client
            .call(&endpoint::TOKEN_USER, Call::new().param("token", token))
            .await?
    );
    let name = envelope
        .object()
        .and_then(|data| data.get("user_name"))
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| HubError::Identity("'user_name' not in response from token API.".into()))?;

    tracing::info!(username = name, "resolved token owner");
    Ok(Reply::Ok(name.to_string()))
}

/// Username first, then every organization path the user belongs to.
pub async fn namespaces(client: &HubClient, token: &str) -> Result<Reply<Vec<String>>> {
    let username = try_reply!(username(client, token).await?);
    let envelope = try_reply!(
        client
            .call(&endpoint::ORGANIZATIONS, Call::new().token(token))
            .await?
    );

    let mut namespaces = vec![username];
    namespaces.extend(
        envelope
            .items_at(&["data", "data"])
            .iter()
            .filter_map(|org| org.get("path").and_then(Value::as_str))
            .map(String::from),
    );
    Ok(Reply::Ok(namespaces))
}
