use super::{newtypes::{PersonId, PostId}, user::Person};
use crate::schema::post;
use chrono::{DateTime, Utc};
use diesel::{Identifiable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

/// Maximum length of the content snippet shown in post listings.
const SNIPPET_LEN: usize = 50;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = post, check_for_backend(diesel::pg::Pg))]
pub struct Post {
    pub id: PostId,
    pub creator_id: PersonId,
    pub title: String,
    pub content: String,
    pub deleted: bool,
    pub view_count: i32,
    /// Cumulative count of comments ever created under this post. Never
    /// decremented, so it reflects total volume rather than live volume.
    pub comment_count: i32,
    pub published: DateTime<Utc>,
}

impl Post {
    /// First characters of the content for listings, cut on a character
    /// boundary with an ellipsis when truncated.
    pub fn content_snippet(&self) -> String {
        let mut chars = self.content.chars();
        let snippet: String = chars.by_ref().take(SNIPPET_LEN).collect();
        if chars.next().is_some() {
            format!("{snippet}...")
        } else {
            snippet
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Queryable)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PostView {
    pub post: Post,
    pub creator: Person,
}

/// Listing entry with truncated content.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PostListItem {
    pub id: PostId,
    pub creator_id: PersonId,
    pub title: String,
    pub content_snippet: String,
    pub view_count: i32,
    pub comment_count: i32,
    pub published: DateTime<Utc>,
}

impl From<Post> for PostListItem {
    fn from(post: Post) -> Self {
        let content_snippet = post.content_snippet();
        PostListItem {
            id: post.id,
            creator_id: post.creator_id,
            title: post.title,
            content_snippet,
            view_count: post.view_count,
            comment_count: post.comment_count,
            published: post.published,
        }
    }
}
