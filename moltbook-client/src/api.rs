use moltbook_core::{
    Agent, ClientConfig, Comment, CoreError, MoltbookApiError, OwnerIdentity, Post,
    TransportError,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};
use url::Url;

/// Decodes a field leniently: `null` or a value of the wrong JSON type maps
/// to the field's default instead of failing the whole record.
fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Like `or_default`, but a float such as `12.0` is truncated to an integer
/// rather than dropped.
fn int_or_default<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
        .unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AgentData {
    #[serde(deserialize_with = "or_default")]
    pub id: String,
    #[serde(deserialize_with = "or_default")]
    pub name: String,
    #[serde(deserialize_with = "or_default")]
    pub description: String,
    #[serde(deserialize_with = "int_or_default")]
    pub karma: i64,
    #[serde(deserialize_with = "or_default")]
    pub created_at: String,
    #[serde(deserialize_with = "or_default")]
    pub last_active: String,
    #[serde(deserialize_with = "or_default")]
    pub is_active: bool,
    #[serde(deserialize_with = "or_default")]
    pub is_claimed: bool,
    #[serde(deserialize_with = "int_or_default")]
    pub follower_count: i64,
    #[serde(deserialize_with = "int_or_default")]
    pub following_count: i64,
    #[serde(deserialize_with = "or_default")]
    pub avatar_url: String,
    #[serde(deserialize_with = "or_default")]
    pub owner: OwnerData,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OwnerData {
    #[serde(deserialize_with = "or_default")]
    pub x_handle: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub x_name: Option<String>,
    #[serde(deserialize_with = "or_default")]
    pub x_verified: bool,
    #[serde(deserialize_with = "int_or_default")]
    pub x_follower_count: i64,
}

/// Author summary embedded in posts and comments.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AuthorRef {
    #[serde(deserialize_with = "or_default")]
    pub name: String,
    #[serde(deserialize_with = "int_or_default")]
    pub karma: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SubmoltRef {
    #[serde(deserialize_with = "or_default")]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PostData {
    #[serde(deserialize_with = "or_default")]
    pub id: String,
    #[serde(deserialize_with = "or_default")]
    pub title: String,
    #[serde(deserialize_with = "or_default")]
    pub content: String,
    #[serde(deserialize_with = "int_or_default")]
    pub upvotes: i64,
    #[serde(deserialize_with = "int_or_default")]
    pub downvotes: i64,
    #[serde(deserialize_with = "int_or_default")]
    pub comment_count: i64,
    #[serde(deserialize_with = "or_default")]
    pub created_at: String,
    #[serde(deserialize_with = "or_default")]
    pub submolt: SubmoltRef,
    #[serde(deserialize_with = "or_default")]
    pub author: AuthorRef,
    #[serde(deserialize_with = "or_default")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CommentData {
    #[serde(deserialize_with = "or_default")]
    pub id: String,
    #[serde(deserialize_with = "or_default")]
    pub content: String,
    #[serde(deserialize_with = "int_or_default")]
    pub upvotes: i64,
    #[serde(deserialize_with = "int_or_default")]
    pub downvotes: i64,
    #[serde(deserialize_with = "or_default")]
    pub created_at: String,
    #[serde(deserialize_with = "or_default")]
    pub author: AuthorRef,
    #[serde(deserialize_with = "or_default")]
    pub parent_id: Option<String>,
}

/// Removes `key` from a checked body and maps it to `T`. Absent, `null` or
/// non-object values give `T::default()`; this never fails.
pub(crate) fn take_record<T>(data: &mut Map<String, Value>, key: &str) -> T
where
    T: Default + DeserializeOwned,
{
    match data.remove(key) {
        Some(value @ Value::Object(_)) => T::deserialize(value).unwrap_or_default(),
        Some(Value::Null) | None => T::default(),
        Some(other) => {
            warn!("Expected an object for {}, got: {}", key, other);
            T::default()
        }
    }
}

/// Removes the `comments` list from a checked body, keeping API order. A
/// missing or non-list value gives no comments; an entry that is not an
/// object maps to a default comment so positions are preserved.
pub(crate) fn take_comments(data: &mut Map<String, Value>) -> Vec<CommentData> {
    match data.remove("comments") {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| CommentData::deserialize(item).unwrap_or_default())
            .collect(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => {
            warn!("Expected a list of comments, got: {}", other);
            Vec::new()
        }
    }
}

#[derive(Debug, Clone)]
pub struct MoltbookApiClient {
    http_client: Client,
    base_url: Url,
    config: ClientConfig,
}

impl MoltbookApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, CoreError> {
        config.validate()?;
        let base_url = config.parsed_base_url()?;

        let http_client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Appends `endpoint` to the base URL path, one percent-encoded segment
    /// per `/`-separated part.
    pub fn endpoint_url(&self, endpoint: &str) -> Url {
        let mut url = self.base_url.clone();
        // validate() rejects cannot-be-a-base URLs, so this always succeeds
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(endpoint.split('/').filter(|s| !s.is_empty()));
        }
        url
    }

    /// Issues one GET and returns the decoded body once its `success` flag
    /// is confirmed.
    pub async fn request(
        &self,
        endpoint: &str,
        query_params: Option<&[(&str, &str)]>,
    ) -> Result<Map<String, Value>, CoreError> {
        let url = self.endpoint_url(endpoint);

        let mut request_builder = self.http_client.get(url);
        if let Some(params) = query_params {
            request_builder = request_builder.query(params);
        }

        info!("Making Moltbook API request: GET {}", endpoint);
        let response = request_builder
            .send()
            .await
            .map_err(|e| transport_failure(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            error!("Request failed with status: {} for {}", status, endpoint);
            return Err(MoltbookApiError::from(TransportError::Status {
                endpoint: endpoint.to_string(),
                status_code: status.as_u16(),
            })
            .into());
        }
        debug!("Request successful: {} {}", status, endpoint);

        let body = response
            .text()
            .await
            .map_err(|e| transport_failure(endpoint, e))?;

        let data: Value = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to decode response from {}: {}", endpoint, e);
            MoltbookApiError::Decode {
                endpoint: endpoint.to_string(),
                details: e.to_string(),
            }
        })?;

        Ok(check_success(endpoint, data)?)
    }
}

fn transport_failure(endpoint: &str, e: reqwest::Error) -> CoreError {
    error!("Network error for GET {}: {}", endpoint, e);
    let transport = if e.is_timeout() {
        TransportError::Timeout {
            endpoint: endpoint.to_string(),
        }
    } else {
        TransportError::Network {
            endpoint: endpoint.to_string(),
            source: e,
        }
    };
    MoltbookApiError::from(transport).into()
}

/// Accepts a body only when it is an object whose `success` is `true`.
pub(crate) fn check_success(
    endpoint: &str,
    data: Value,
) -> Result<Map<String, Value>, MoltbookApiError> {
    let map = match data {
        Value::Object(map) => map,
        _ => {
            warn!("Response from {} is not a JSON object", endpoint);
            return Err(MoltbookApiError::api(None));
        }
    };

    if map.get("success").and_then(Value::as_bool) == Some(true) {
        return Ok(map);
    }

    let message = map.get("error").and_then(Value::as_str);
    warn!(
        "Moltbook reported failure for {}: {}",
        endpoint,
        message.unwrap_or("<no message>")
    );
    Err(MoltbookApiError::api(message))
}

impl From<AgentData> for Agent {
    fn from(agent: AgentData) -> Self {
        Self {
            id: agent.id,
            name: agent.name,
            description: agent.description,
            karma: agent.karma,
            created_at: agent.created_at,
            last_active: agent.last_active,
            is_active: agent.is_active,
            is_claimed: agent.is_claimed,
            follower_count: agent.follower_count,
            following_count: agent.following_count,
            avatar_url: agent.avatar_url,
            owner: agent.owner.into(),
        }
    }
}

impl From<OwnerData> for OwnerIdentity {
    fn from(owner: OwnerData) -> Self {
        Self {
            x_handle: owner.x_handle,
            x_name: owner.x_name,
            x_verified: owner.x_verified,
            x_follower_count: owner.x_follower_count,
        }
    }
}

impl From<PostData> for Post {
    fn from(post: PostData) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            upvotes: post.upvotes,
            downvotes: post.downvotes,
            comment_count: post.comment_count,
            created_at: post.created_at,
            submolt_name: post.submolt.name,
            author_name: post.author.name,
            author_karma: post.author.karma,
            url: post.url,
        }
    }
}

impl From<CommentData> for Comment {
    fn from(comment: CommentData) -> Self {
        Self {
            id: comment.id,
            content: comment.content,
            upvotes: comment.upvotes,
            downvotes: comment.downvotes,
            created_at: comment.created_at,
            author_name: comment.author.name,
            author_karma: comment.author.karma,
            parent_id: comment.parent_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moltbook_core::{ErrorKind, API_FAILURE_FALLBACK};
    use serde_json::json;

    fn api_client(base_url: &str) -> MoltbookApiClient {
        MoltbookApiClient::new(ClientConfig::default().with_base_url(base_url)).unwrap()
    }

    #[test]
    fn test_endpoint_url_keeps_base_path() {
        let client = api_client("https://www.moltbook.com/api/v1");
        assert_eq!(
            client.endpoint_url("agents/profile").as_str(),
            "https://www.moltbook.com/api/v1/agents/profile"
        );

        let client = api_client("https://www.moltbook.com/api/v1/");
        assert_eq!(
            client.endpoint_url("molts").as_str(),
            "https://www.moltbook.com/api/v1/molts"
        );
    }

    #[test]
    fn test_endpoint_url_encodes_segments() {
        let client = api_client("http://localhost:3000");
        assert_eq!(
            client.endpoint_url("posts/a b?c").as_str(),
            "http://localhost:3000/posts/a%20b%3Fc"
        );
    }

    #[test]
    fn test_client_rejects_invalid_config() {
        let result = MoltbookApiClient::new(ClientConfig::default().with_base_url("nope"));
        assert!(matches!(result, Err(CoreError::Config(_))));
    }

    #[test]
    fn test_check_success() {
        let ok = check_success("molts", json!({"success": true, "molts": []})).unwrap();
        assert!(ok.contains_key("molts"));

        let err = check_success("molts", json!({"success": false, "error": "nope"})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.to_string(), "nope");

        let err = check_success("molts", json!({"molts": []})).unwrap_err();
        assert_eq!(err.to_string(), API_FAILURE_FALLBACK);

        let err = check_success("molts", json!({"success": "true"})).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Api);

        let err = check_success("molts", json!([1, 2, 3])).unwrap_err();
        assert_eq!(err.to_string(), API_FAILURE_FALLBACK);
    }

    #[test]
    fn test_agent_payload_nulls_become_defaults() {
        let data: AgentData = serde_json::from_value(json!({
            "name": "bot1",
            "description": null,
            "karma": null,
            "owner": null
        }))
        .unwrap();
        let agent: Agent = data.into();
        assert_eq!(agent.name, "bot1");
        assert_eq!(agent.description, "");
        assert_eq!(agent.karma, 0);
        assert_eq!(agent.owner, OwnerIdentity::default());
    }

    #[test]
    fn test_post_payload_denormalizes_author_and_submolt() {
        let data: PostData = serde_json::from_value(json!({
            "id": "p1",
            "title": "Hello",
            "upvotes": 5,
            "author": {"name": "bot1", "karma": 9},
            "submolt": {"name": "general"},
            "url": "https://example.com"
        }))
        .unwrap();
        let post: Post = data.into();
        assert_eq!(post.author_name, "bot1");
        assert_eq!(post.author_karma, 9);
        assert_eq!(post.submolt_name, "general");
        assert_eq!(post.url.as_deref(), Some("https://example.com"));
        assert_eq!(post.comment_count, 0);
    }

    #[test]
    fn test_wrong_typed_fields_fall_back_to_defaults() {
        let data: PostData = serde_json::from_value(json!({
            "id": "p1",
            "title": 7,
            "upvotes": "lots",
            "downvotes": 2.0,
            "author": {"name": "bot1", "karma": 12.5},
            "submolt": "general",
            "url": 3
        }))
        .unwrap();
        let post: Post = data.into();
        assert_eq!(post.id, "p1");
        assert_eq!(post.title, "");
        assert_eq!(post.upvotes, 0);
        assert_eq!(post.downvotes, 2);
        assert_eq!(post.author_name, "bot1");
        assert_eq!(post.author_karma, 12);
        assert_eq!(post.submolt_name, "");
        assert_eq!(post.url, None);
    }

    #[test]
    fn test_take_record_ignores_other_keys() {
        let mut map = check_success(
            "posts/1",
            json!({
                "success": true,
                "post": {"id": "1"},
                "comments": [{"id": "a", "upvotes": 1.0}, {"id": "b", "upvotes": "x"}]
            }),
        )
        .unwrap();
        let post: PostData = take_record(&mut map, "post");
        assert_eq!(post.id, "1");

        let comments = take_comments(&mut map);
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].upvotes, 1);
        assert_eq!(comments[1].id, "b");
        assert_eq!(comments[1].upvotes, 0);
    }

    #[test]
    fn test_take_record_non_object_is_default() {
        let mut map = check_success("posts/1", json!({"success": true, "post": [1, 2]})).unwrap();
        let post: PostData = take_record(&mut map, "post");
        assert_eq!(post, PostData::default());

        let agent: AgentData = take_record(&mut map, "agent");
        assert_eq!(agent, AgentData::default());
    }

    #[test]
    fn test_take_comments_non_list_is_empty() {
        let mut map = check_success("posts/1", json!({"success": true, "comments": {}})).unwrap();
        assert!(take_comments(&mut map).is_empty());

        let mut map =
            check_success("posts/1", json!({"success": true, "comments": ["junk", {"id": "a"}]}))
                .unwrap();
        let comments = take_comments(&mut map);
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0], CommentData::default());
        assert_eq!(comments[1].id, "a");
    }
}
