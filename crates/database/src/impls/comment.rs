use crate::{
    common::{
        comment::{Comment, CommentView},
        newtypes::{CommentId, PersonId, PostId},
        post::Post,
        user::Person,
        Paginated,
    },
    error::{BackendError, BackendResult, ErrorKind},
    impls::VeeryContext,
    schema::{comment, person},
};
use chrono::{DateTime, Utc};
use diesel::{
    alias,
    dsl::{exists, insert_into},
    update, BoolExpressionMethods, Connection, ExpressionMethods, Insertable,
    NullableExpressionMethods, OptionalExtension, PgConnection, QueryDsl, RunQueryDsl,
};
use std::{collections::HashMap, ops::DerefMut};

alias!(comment as comment_reply: CommentReply);

/// Bound on internal retries when the creation transaction hits transient
/// store contention on the counter increment.
const CREATE_RETRIES: u32 = 2;

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = comment, check_for_backend(diesel::pg::Pg))]
pub struct DbCommentInsertForm {
    pub creator_id: PersonId,
    pub post_id: PostId,
    pub parent_id: Option<CommentId>,
    pub root_id: Option<CommentId>,
    pub reply_to_person_id: Option<PersonId>,
    pub content: String,
    pub deleted: bool,
    pub published: DateTime<Utc>,
}

impl Comment {
    /// Creates a comment, resolves its root and bumps the post's cumulative
    /// comment counter, all in one transaction.
    ///
    /// Root resolution never walks the reply chain: a reply copies its
    /// parent's already resolved `root_id`, which the flattening invariant
    /// guarantees equals the true root at any depth. A root comment gets
    /// `root_id = id` by update, since the id is unknown before insert.
    pub fn create(form: DbCommentInsertForm, context: &VeeryContext) -> BackendResult<Comment> {
        let mut attempt = 0;
        loop {
            let result = Self::create_in_transaction(&form, context);
            match result {
                Err(e) if e.kind == ErrorKind::ConflictOrTransient && attempt < CREATE_RETRIES => {
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    fn create_in_transaction(
        form: &DbCommentInsertForm,
        context: &VeeryContext,
    ) -> BackendResult<Comment> {
        let mut conn = context.db_pool.get()?;
        conn.transaction(|conn| {
            let root_id = match form.parent_id {
                Some(parent_id) => Some(Self::parent_root_id(parent_id, form.post_id, conn)?),
                None => None,
            };

            let mut comment: Comment = insert_into(comment::table)
                .values(DbCommentInsertForm {
                    root_id,
                    ..form.clone()
                })
                .get_result(conn)?;

            if root_id.is_none() {
                comment = update(comment::table.find(comment.id))
                    .set(comment::root_id.eq(comment.id))
                    .get_result(conn)?;
            }

            Post::increment_comment_count(form.post_id, conn)?;
            Ok(comment)
        })
    }

    /// Reads the parent's `root_id` inside the creating transaction. A
    /// missing or deleted parent fails the creation instead of silently
    /// producing an orphaned root comment.
    fn parent_root_id(
        parent_id: CommentId,
        post_id: PostId,
        conn: &mut PgConnection,
    ) -> BackendResult<CommentId> {
        let parent: Option<Comment> = comment::table.find(parent_id).get_result(conn).optional()?;
        let Some(parent) = parent else {
            return Err(BackendError::not_found("Parent comment not found"));
        };
        if parent.deleted {
            return Err(BackendError::not_found("Parent comment not found"));
        }
        if parent.post_id != post_id {
            return Err(BackendError::invalid_argument(
                "Parent comment belongs to another post",
            ));
        }
        Ok(parent.root())
    }

    pub fn read(id: CommentId, context: &VeeryContext) -> BackendResult<Comment> {
        let mut conn = context.db_pool.get()?;
        Ok(comment::table.find(id).get_result(conn.deref_mut())?)
    }

    /// Paginated root comments of a post, newest first.
    ///
    /// A deleted root stays listed as long as at least one live reply shares
    /// its `root_id` (the ghost rule); the same predicate drives the total,
    /// so it always counts listable roots rather than stored rows. Reply
    /// counts are batch resolved for exactly the page's ids, and redaction
    /// is applied to ghosted rows in the returned views.
    pub fn list_roots(
        post_id: PostId,
        page: i64,
        page_size: i64,
        context: &VeeryContext,
    ) -> BackendResult<Paginated<CommentView>> {
        let mut conn = context.db_pool.get()?;

        let total = comment::table
            .filter(comment::post_id.eq(post_id))
            .filter(comment::parent_id.is_null())
            .filter(
                comment::deleted.eq(false).or(exists(
                    comment_reply
                        .filter(comment_reply.field(comment::root_id).eq(comment::id.nullable()))
                        .filter(comment_reply.field(comment::parent_id).is_not_null())
                        .filter(comment_reply.field(comment::deleted).eq(false)),
                )),
            )
            .count()
            .get_result(conn.deref_mut())?;

        let page_rows: Vec<(Comment, Person)> = comment::table
            .inner_join(person::table)
            .filter(comment::post_id.eq(post_id))
            .filter(comment::parent_id.is_null())
            .filter(
                comment::deleted.eq(false).or(exists(
                    comment_reply
                        .filter(comment_reply.field(comment::root_id).eq(comment::id.nullable()))
                        .filter(comment_reply.field(comment::parent_id).is_not_null())
                        .filter(comment_reply.field(comment::deleted).eq(false)),
                )),
            )
            .order_by(comment::published.desc())
            .then_order_by(comment::id.desc())
            .offset((page - 1) * page_size)
            .limit(page_size)
            .get_results(conn.deref_mut())?;

        let root_ids: Vec<CommentId> = page_rows.iter().map(|(c, _)| c.id).collect();
        let reply_counts = Self::count_replies(&root_ids, context)?;

        let items = page_rows
            .into_iter()
            .map(|(comment, creator)| {
                let reply_count = reply_counts.get(&comment.id).copied().unwrap_or(0);
                CommentView::new(
                    comment,
                    creator,
                    reply_count,
                    &context.config.ghost_placeholder,
                )
            })
            .collect();

        Ok(Paginated { items, total })
    }

    /// All live replies below a root, oldest first regardless of which
    /// intermediate parent they nested under. Unpaginated; thread sizes are
    /// bounded in practice and callers fetch replies per root on demand.
    pub fn list_replies(
        root_id: CommentId,
        context: &VeeryContext,
    ) -> BackendResult<Vec<CommentView>> {
        let mut conn = context.db_pool.get()?;
        let rows: Vec<(Comment, Person)> = comment::table
            .inner_join(person::table)
            .filter(comment::root_id.eq(root_id))
            .filter(comment::parent_id.is_not_null())
            .filter(comment::deleted.eq(false))
            .order_by(comment::published.asc())
            .then_order_by(comment::id.asc())
            .get_results(conn.deref_mut())?;
        Ok(rows
            .into_iter()
            .map(|(comment, creator)| CommentView {
                comment,
                creator: Some(creator),
                reply_count: 0,
            })
            .collect())
    }

    /// Live reply counts for a set of roots in one grouped query, so listing
    /// cost stays independent of page size. Roots with zero live replies are
    /// omitted; callers treat a missing key as zero.
    pub fn count_replies(
        root_ids: &[CommentId],
        context: &VeeryContext,
    ) -> BackendResult<HashMap<CommentId, i64>> {
        if root_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut conn = context.db_pool.get()?;
        let counts: Vec<(Option<CommentId>, i64)> = comment::table
            .filter(comment::root_id.eq_any(root_ids.iter().map(|id| Some(*id))))
            .filter(comment::parent_id.is_not_null())
            .filter(comment::deleted.eq(false))
            .group_by(comment::root_id)
            .select((comment::root_id, diesel::dsl::count_star()))
            .get_results(conn.deref_mut())?;
        Ok(counts
            .into_iter()
            .filter_map(|(root_id, count)| root_id.map(|id| (id, count)))
            .collect())
    }

    /// Guarded soft delete. Matching no row (nonexistent or already deleted)
    /// surfaces as not found, so repeat deletion fails instead of silently
    /// succeeding. The post's comment counter is deliberately untouched.
    pub fn soft_delete(id: CommentId, context: &VeeryContext) -> BackendResult<()> {
        let mut conn = context.db_pool.get()?;
        let affected = update(comment::table.find(id).filter(comment::deleted.eq(false)))
            .set(comment::deleted.eq(true))
            .execute(conn.deref_mut())?;
        if affected == 0 {
            return Err(BackendError::not_found("Comment not found"));
        }
        Ok(())
    }
}
