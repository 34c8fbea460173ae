//! API data models
//!
//! Field names follow the backend's camelCase JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Media kind as sent in `contentType`
///
/// Only `"VID"` is video; every other code (`"IMG"`, `"REL"`, ...) renders
/// as an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MediaKind {
    Image,
    Video,
}

impl From<String> for MediaKind {
    fn from(code: String) -> Self {
        if code == "VID" {
            Self::Video
        } else {
            Self::Image
        }
    }
}

impl From<MediaKind> for String {
    fn from(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Image => "IMG".to_string(),
            MediaKind::Video => "VID".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaAttachment {
    /// Path relative to the backend origin
    pub content: String,
    #[serde(rename = "contentType")]
    pub kind: MediaKind,
}

/// Minimal author data embedded in posts and comments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorSummary {
    #[serde(default)]
    pub id: Option<i64>,
    pub username: String,
    #[serde(default)]
    pub nickname: Option<String>,
    /// Avatar reference
    #[serde(default)]
    pub profile: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub user: AuthorSummary,
    pub content: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub likes: u64,
}

/// A feed item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub user: AuthorSummary,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub files: Vec<MediaAttachment>,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub tags: Vec<AuthorSummary>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

/// Public profile summary shown above a user's posts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "userName")]
    pub username: String,
    #[serde(rename = "nickName", default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(rename = "totalPosts", default)]
    pub total_posts: u64,
    #[serde(rename = "totalFollowers", default)]
    pub total_followers: u64,
    #[serde(rename = "totalFollowings", default)]
    pub total_followings: u64,
}

/// `GET /users/<username>/?page=<n>` body
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProfilePage {
    #[serde(flatten)]
    pub profile: UserProfile,
    /// Absent when the viewer may not see this user's posts
    #[serde(default)]
    pub posts: Vec<Post>,
}

/// Signed-in user's own data from `/users/dashboard/`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashboardProfile {
    #[serde(flatten)]
    pub profile: UserProfile,
    #[serde(rename = "firstName", default)]
    pub first_name: Option<String>,
    #[serde(rename = "lastName", default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "phoneNumber", default)]
    pub phone_number: Option<String>,
    #[serde(rename = "totalFollowRequests", default)]
    pub total_follow_requests: u64,
}

/// Login request body
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Error body shapes the backend uses
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_post_from_timeline_json() {
        let body = json!({
            "id": 7,
            "user": {"id": 1, "username": "alice", "nickname": "Al", "profile": null},
            "caption": "sunset #beach",
            "tags": [],
            "comments": [{
                "user": {"id": 2, "username": "bob", "nickname": null, "profile": "/static/bob.png"},
                "content": "nice",
                "createdAt": "2024-03-01T10:00:00Z",
                "likes": 3
            }],
            "likes": 12,
            "files": [
                {"contentType": "IMG", "content": "/static/users/posts/a.jpg"},
                {"contentType": "VID", "content": "/static/users/posts/b.mp4"},
                {"contentType": "REL", "content": "/static/users/posts/c.mp4"}
            ]
        });

        let post: Post = serde_json::from_value(body).unwrap();
        assert_eq!(post.id, 7);
        assert_eq!(post.user.username, "alice");
        assert_eq!(post.likes, 12);
        assert_eq!(post.comments[0].likes, 3);
        let kinds: Vec<MediaKind> = post.files.iter().map(|f| f.kind).collect();
        assert_eq!(kinds, vec![MediaKind::Image, MediaKind::Video, MediaKind::Image]);
    }

    #[test]
    fn test_post_minimal_fields() {
        let post: Post = serde_json::from_value(json!({
            "id": 1,
            "user": {"username": "alice"},
            "files": []
        }))
        .unwrap();
        assert_eq!(post.caption, None);
        assert!(post.comments.is_empty());
        assert_eq!(post.user.nickname, None);
    }

    #[test]
    fn test_profile_page_with_and_without_posts() {
        let page: ProfilePage = serde_json::from_value(json!({
            "userName": "alice",
            "nickName": "Al",
            "biography": "hi",
            "profile": "/static/alice.png",
            "totalPosts": 3,
            "totalFollowers": 10,
            "totalFollowings": 4,
            "posts": [{"id": 1, "user": {"username": "alice"}, "files": []}]
        }))
        .unwrap();
        assert_eq!(page.profile.username, "alice");
        assert_eq!(page.profile.total_followers, 10);
        assert_eq!(page.posts.len(), 1);

        let private: ProfilePage = serde_json::from_value(json!({
            "userName": "carol",
            "totalPosts": 9
        }))
        .unwrap();
        assert!(private.posts.is_empty());
        assert_eq!(private.profile.total_posts, 9);
    }

    #[test]
    fn test_dashboard_profile() {
        let me: DashboardProfile = serde_json::from_value(json!({
            "userName": "alice",
            "firstName": "Alice",
            "lastName": "Liddell",
            "email": "alice@example.com",
            "totalFollowRequests": 2,
            "totalPosts": 1
        }))
        .unwrap();
        assert_eq!(me.profile.username, "alice");
        assert_eq!(me.first_name.as_deref(), Some("Alice"));
        assert_eq!(me.total_follow_requests, 2);
    }

    #[test]
    fn test_media_kind_serializes_to_code() {
        let value = serde_json::to_value(MediaAttachment {
            content: "/a.mp4".to_string(),
            kind: MediaKind::Video,
        })
        .unwrap();
        assert_eq!(value["contentType"], "VID");
    }
}
