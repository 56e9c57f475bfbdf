use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Root of the public web site, used for profile and post links.
pub const MOLTBOOK_WEB_BASE: &str = "https://www.moltbook.com";

/// An agent (user or bot) profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    pub description: String,
    pub karma: i64,
    pub created_at: String,
    pub last_active: String,
    pub is_active: bool,
    pub is_claimed: bool,
    pub follower_count: i64,
    pub following_count: i64,
    pub avatar_url: String,
    pub owner: OwnerIdentity,
}

impl Agent {
    pub fn profile_url(&self) -> String {
        format!("{}/u/{}", MOLTBOOK_WEB_BASE, self.name)
    }
}

/// External account linked to an agent. All fields stay at their defaults
/// when the agent has no owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OwnerIdentity {
    pub x_handle: Option<String>,
    pub x_name: Option<String>,
    pub x_verified: bool,
    pub x_follower_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub upvotes: i64,
    pub downvotes: i64,
    pub comment_count: i64,
    pub created_at: String,
    pub submolt_name: String,
    pub author_name: String,
    pub author_karma: i64,
    pub url: Option<String>,
}

impl Post {
    pub fn score(&self) -> i64 {
        self.upvotes - self.downvotes
    }

    pub fn permalink(&self) -> String {
        format!("{}/post/{}", MOLTBOOK_WEB_BASE, self.id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub upvotes: i64,
    pub downvotes: i64,
    pub created_at: String,
    pub author_name: String,
    pub author_karma: i64,
    pub parent_id: Option<String>,
}

impl Comment {
    pub fn score(&self) -> i64 {
        self.upvotes - self.downvotes
    }

    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// A community as returned by the API. The payload shape is not stable, so no
/// schema is imposed beyond "a JSON object".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Submolt(Map<String, Value>);

impl Submolt {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The `name` field when it is a string.
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }
}

impl From<Map<String, Value>> for Submolt {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_post_score_and_permalink() {
        let post = Post {
            id: "p1".to_string(),
            upvotes: 10,
            downvotes: 3,
            ..Default::default()
        };
        assert_eq!(post.score(), 7);
        assert_eq!(post.permalink(), "https://www.moltbook.com/post/p1");
    }

    #[test]
    fn test_comment_reply_detection() {
        let top = Comment::default();
        let reply = Comment {
            parent_id: Some("c1".to_string()),
            ..Default::default()
        };
        assert!(!top.is_reply());
        assert!(reply.is_reply());
    }

    #[test]
    fn test_submolt_accessors() {
        let value = json!({"name": "general", "subscribers": 12});
        let submolt: Submolt = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(submolt.name(), Some("general"));
        assert_eq!(submolt.get("subscribers"), Some(&json!(12)));
        assert_eq!(serde_json::to_value(&submolt).unwrap(), value);
    }

    #[test]
    fn test_agent_defaults() {
        let agent = Agent::default();
        assert_eq!(agent.karma, 0);
        assert!(!agent.is_active);
        assert_eq!(agent.owner, OwnerIdentity::default());
        assert_eq!(agent.owner.x_handle, None);
    }
}
