//! Typed client for the Moltbook agent social platform API.

pub mod api;
pub mod format;


pub use api::MoltbookApiClient;
pub use format::{format_comments, format_post, format_submolt, format_user_profile};

use api::{take_comments, take_record, AgentData, PostData};
use moltbook_core::{Agent, ClientConfig, Comment, CoreError, Post, Submolt};
use serde_json::{Map, Value};
use tracing::{debug, warn};

const PROFILE_ENDPOINT: &str = "agents/profile";
const COMMUNITIES_ENDPOINT: &str = "molts";

#[derive(Debug, Clone)]
pub struct MoltbookClient {
    api: MoltbookApiClient,
}

impl MoltbookClient {
    pub fn new(config: ClientConfig) -> Result<Self, CoreError> {
        Ok(Self {
            api: MoltbookApiClient::new(config)?,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        self.api.config()
    }

    /// Raw access to the transport: one GET, checked for `success`.
    pub async fn request(
        &self,
        endpoint: &str,
        query_params: Option<&[(&str, &str)]>,
    ) -> Result<Map<String, Value>, CoreError> {
        self.api.request(endpoint, query_params).await
    }

    pub async fn fetch_profile(&self, username: &str) -> Result<Agent, CoreError> {
        let username = require_non_empty("username", username)?;
        let params = [("name", username)];
        let mut data = self
            .api
            .request(PROFILE_ENDPOINT, Some(&params[..]))
            .await?;

        let agent = Agent::from(take_record::<AgentData>(&mut data, "agent"));
        debug!("Retrieved profile for: {} (karma {})", agent.name, agent.karma);
        Ok(agent)
    }

    /// Maps only the `post` object; the `comments` in the same body are not read.
    pub async fn fetch_post(&self, post_id: &str) -> Result<Post, CoreError> {
        let mut data = self.fetch_post_body(post_id).await?;
        let post = map_post(&mut data);
        debug!("Retrieved post {}", post.id);
        Ok(post)
    }

    /// Comments in the order the API returned them.
    pub async fn fetch_comments(&self, post_id: &str) -> Result<Vec<Comment>, CoreError> {
        let mut data = self.fetch_post_body(post_id).await?;
        let comments = map_comments(&mut data);
        debug!("Retrieved {} comments for post {}", comments.len(), post_id);
        Ok(comments)
    }

    /// The post and its comments from a single request.
    pub async fn fetch_post_with_comments(
        &self,
        post_id: &str,
    ) -> Result<(Post, Vec<Comment>), CoreError> {
        let mut data = self.fetch_post_body(post_id).await?;
        let post = map_post(&mut data);
        let comments = map_comments(&mut data);
        debug!(
            "Retrieved post {} with {} comments",
            post.id,
            comments.len()
        );
        Ok((post, comments))
    }

    /// The `molt` object for a community. When the API omits it, the whole
    /// response (without `success`) is returned instead.
    pub async fn fetch_community(&self, name: &str) -> Result<Submolt, CoreError> {
        let name = require_non_empty("community name", name)?;
        let endpoint = format!("{}/{}", COMMUNITIES_ENDPOINT, name);
        let mut data = self.api.request(&endpoint, None).await?;

        let submolt = match data.remove("molt") {
            Some(Value::Object(molt)) => Submolt::from(molt),
            _ => {
                data.remove("success");
                debug!("No molt object in response for {}, returning raw payload", endpoint);
                Submolt::from(data)
            }
        };
        Ok(submolt)
    }

    pub async fn list_communities(&self) -> Result<Vec<Submolt>, CoreError> {
        let mut data = self.api.request(COMMUNITIES_ENDPOINT, None).await?;

        let molts = match data.remove("molts") {
            Some(Value::Array(items)) => items,
            None | Some(Value::Null) => Vec::new(),
            Some(other) => {
                warn!("Expected a list of molts, got: {}", other);
                Vec::new()
            }
        };

        let communities: Vec<Submolt> = molts
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(fields) => Some(Submolt::from(fields)),
                other => {
                    warn!("Skipping non-object molt entry: {}", other);
                    None
                }
            })
            .collect();

        debug!("Retrieved {} communities", communities.len());
        Ok(communities)
    }

    async fn fetch_post_body(&self, post_id: &str) -> Result<Map<String, Value>, CoreError> {
        let post_id = require_non_empty("post id", post_id)?;
        let endpoint = format!("posts/{}", post_id);
        self.api.request(&endpoint, None).await
    }
}

fn map_post(data: &mut Map<String, Value>) -> Post {
    Post::from(take_record::<PostData>(data, "post"))
}

fn map_comments(data: &mut Map<String, Value>) -> Vec<Comment> {
    take_comments(data).into_iter().map(Comment::from).collect()
}

/// Rejects blank identifiers; anything else is sent exactly as given.
fn require_non_empty<'a>(what: &str, value: &'a str) -> Result<&'a str, CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::InvalidInput {
            message: format!("{} must not be empty", what),
        });
    }
    Ok(value)
}
