//! Plain-text rendering of Moltbook records for terminal output.

use moltbook_core::{Agent, Comment, Post, Submolt};
use std::fmt::Write;

pub const DEFAULT_COMMENT_LIMIT: usize = 10;

const RULE_WIDTH: usize = 60;
const TITLE_PREVIEW_CHARS: usize = 60;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Groups digits in threes: `1234567` becomes `1,234,567`.
pub fn with_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

pub fn format_user_profile(user: &Agent) -> String {
    let owner = &user.owner;
    let mut out = String::new();
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "USER PROFILE: {}", user.name);
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out);
    let _ = writeln!(out, "Details");
    let _ = writeln!(out, "  ID:          {}", user.id);
    let _ = writeln!(out, "  Description: {}", user.description);
    let _ = writeln!(out, "  Created:     {}", user.created_at);
    let _ = writeln!(out, "  Last active: {}", user.last_active);
    let _ = writeln!(
        out,
        "  Status:      {}",
        if user.is_active { "active" } else { "inactive" }
    );
    let _ = writeln!(out, "  Claimed:     {}", yes_no(user.is_claimed));
    let _ = writeln!(out);
    let _ = writeln!(out, "Stats");
    let _ = writeln!(out, "  Karma:     {}", with_thousands(user.karma));
    let _ = writeln!(out, "  Followers: {}", with_thousands(user.follower_count));
    let _ = writeln!(out, "  Following: {}", with_thousands(user.following_count));
    let _ = writeln!(out);
    let _ = writeln!(out, "Linked account");
    let _ = writeln!(
        out,
        "  X handle:    @{}",
        owner.x_handle.as_deref().unwrap_or("N/A")
    );
    let _ = writeln!(
        out,
        "  X name:      {}",
        owner.x_name.as_deref().unwrap_or("N/A")
    );
    let _ = writeln!(out, "  X verified:  {}", yes_no(owner.x_verified));
    let _ = writeln!(
        out,
        "  X followers: {}",
        with_thousands(owner.x_follower_count)
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Avatar: {}", user.avatar_url);
    let _ = writeln!(out, "Link:   {}", user.profile_url());
    let _ = write!(out, "{}", rule());
    out
}

pub fn format_post(post: &Post) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "POST: {}", preview(&post.title, TITLE_PREVIEW_CHARS));
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Author:  {} (Karma: {})",
        post.author_name,
        with_thousands(post.author_karma)
    );
    let _ = writeln!(out, "Submolt: m/{}", post.submolt_name);
    let _ = writeln!(out, "Posted:  {}", post.created_at);
    if let Some(url) = &post.url {
        let _ = writeln!(out, "URL:     {}", url);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Votes");
    let _ = writeln!(out, "  Up:       {}", post.upvotes);
    let _ = writeln!(out, "  Down:     {}", post.downvotes);
    let _ = writeln!(out, "  Comments: {}", post.comment_count);
    let _ = writeln!(out);
    let _ = writeln!(out, "Content:");
    let _ = writeln!(out, "{}", post.content);
    let _ = writeln!(out);
    let _ = writeln!(out, "Link: {}", post.permalink());
    let _ = write!(out, "{}", rule());
    out
}

/// Renders at most `limit` comments, numbered from 1, in the given order.
pub fn format_comments(comments: &[Comment], limit: usize) -> String {
    let shown = limit.min(comments.len());
    let mut out = String::new();
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "COMMENTS (showing {} of {})", shown, comments.len());
    let _ = writeln!(out, "{}", rule());

    for (i, comment) in comments.iter().take(shown).enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{}. {} (Karma: {}){}",
            i + 1,
            comment.author_name,
            comment.author_karma,
            if comment.is_reply() { " [reply]" } else { "" }
        );
        let _ = writeln!(out, "   {}", comment.content);
        let _ = writeln!(
            out,
            "   +{} -{} | {}",
            comment.upvotes, comment.downvotes, comment.created_at
        );
    }
    out
}

/// Communities have no fixed schema, so they are shown as pretty JSON.
pub fn format_submolt(submolt: &Submolt) -> String {
    serde_json::to_string_pretty(submolt).unwrap_or_else(|_| format!("{:?}", submolt))
}
