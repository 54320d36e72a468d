use crate::{
    common::{
        newtypes::{PersonId, PostId},
        post::{Post, PostView},
        user::Person,
        Paginated,
    },
    error::{BackendError, BackendResult},
    impls::VeeryContext,
    schema::post,
};
use chrono::{DateTime, Utc};
use diesel::{insert_into, update, ExpressionMethods, Insertable, PgConnection, QueryDsl, RunQueryDsl};
use std::ops::DerefMut;

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = post, check_for_backend(diesel::pg::Pg))]
pub struct DbPostForm {
    pub creator_id: PersonId,
    pub title: String,
    pub content: String,
    pub published: DateTime<Utc>,
}

impl Post {
    pub fn create(form: DbPostForm, context: &VeeryContext) -> BackendResult<PostView> {
        let mut conn = context.db_pool.get()?;
        let post: Post = insert_into(post::table)
            .values(form)
            .get_result(conn.deref_mut())?;
        let creator = Person::read(post.creator_id, context)?;
        Ok(PostView { post, creator })
    }

    /// Point read without side effects, for existence checks.
    pub fn read_live(id: PostId, context: &VeeryContext) -> BackendResult<Post> {
        let mut conn = context.db_pool.get()?;
        Ok(post::table
            .find(id)
            .filter(post::deleted.eq(false))
            .get_result(conn.deref_mut())?)
    }

    /// Single post read for display. Bumps the view counter atomically in
    /// the database, never by incrementing a loaded object, and returns the
    /// row as updated.
    pub fn read_view(id: PostId, context: &VeeryContext) -> BackendResult<PostView> {
        let mut conn = context.db_pool.get()?;
        let post: Post = update(post::table.find(id).filter(post::deleted.eq(false)))
            .set(post::view_count.eq(post::view_count + 1))
            .get_result(conn.deref_mut())?;
        let creator = Person::read(post.creator_id, context)?;
        Ok(PostView { post, creator })
    }

    /// Live posts, newest first, offset paginated. The total counts all live
    /// posts, not just this page.
    pub fn list(
        page: i64,
        page_size: i64,
        context: &VeeryContext,
    ) -> BackendResult<Paginated<Post>> {
        let mut conn = context.db_pool.get()?;
        let total = post::table
            .filter(post::deleted.eq(false))
            .count()
            .get_result(conn.deref_mut())?;
        let items = post::table
            .filter(post::deleted.eq(false))
            .order_by(post::published.desc())
            .then_order_by(post::id.desc())
            .offset((page - 1) * page_size)
            .limit(page_size)
            .get_results(conn.deref_mut())?;
        Ok(Paginated { items, total })
    }

    /// Guarded soft delete. Matching no row (nonexistent or already deleted)
    /// surfaces as not found.
    pub fn soft_delete(id: PostId, context: &VeeryContext) -> BackendResult<()> {
        let mut conn = context.db_pool.get()?;
        let affected = update(post::table.find(id).filter(post::deleted.eq(false)))
            .set(post::deleted.eq(true))
            .execute(conn.deref_mut())?;
        if affected == 0 {
            return Err(BackendError::not_found("Post not found"));
        }
        Ok(())
    }

    /// Atomic bump of the cumulative comment counter, running on the
    /// caller's connection so it joins the comment creation transaction.
    pub(super) fn increment_comment_count(
        id: PostId,
        conn: &mut PgConnection,
    ) -> BackendResult<()> {
        let affected = update(post::table.find(id).filter(post::deleted.eq(false)))
            .set(post::comment_count.eq(post::comment_count + 1))
            .execute(conn)?;
        if affected == 0 {
            return Err(BackendError::not_found("Post not found"));
        }
        Ok(())
    }
}
