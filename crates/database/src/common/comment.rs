use super::{
    newtypes::{CommentId, PersonId, PostId},
    user::Person,
};
use crate::schema::comment;
use chrono::{DateTime, Utc};
use diesel::{Identifiable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = comment, check_for_backend(diesel::pg::Pg))]
pub struct Comment {
    pub id: CommentId,
    pub creator_id: PersonId,
    pub post_id: PostId,
    pub parent_id: Option<CommentId>,
    /// Topmost ancestor of the reply chain. Equals the comment's own id for
    /// root comments. Only null inside the creating transaction, before the
    /// row's id is known.
    pub root_id: Option<CommentId>,
    pub reply_to_person_id: Option<PersonId>,
    pub content: String,
    pub deleted: bool,
    pub published: DateTime<Utc>,
}

impl Comment {
    pub fn root(&self) -> CommentId {
        self.root_id.unwrap_or(self.id)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CommentView {
    pub comment: Comment,
    /// Absent for ghost comments (deleted roots shown only because they
    /// still have live replies).
    pub creator: Option<Person>,
    /// Count of live replies sharing this comment's root_id. Always zero
    /// for entries returned by the reply listing.
    pub reply_count: i64,
}

impl CommentView {
    /// Assembles the listing view, redacting content and author for ghost
    /// comments. The reply count is never redacted.
    pub fn new(
        mut comment: Comment,
        creator: Person,
        reply_count: i64,
        ghost_placeholder: &str,
    ) -> Self {
        let creator = if comment.deleted {
            comment.content = ghost_placeholder.to_string();
            None
        } else {
            Some(creator)
        };
        CommentView {
            comment,
            creator,
            reply_count,
        }
    }
}
