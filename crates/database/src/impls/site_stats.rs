use crate::{
    common::SiteStats,
    error::BackendResult,
    impls::VeeryContext,
    schema::{comment, person, post},
};
use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl};
use std::ops::DerefMut;

impl SiteStats {
    pub fn read(context: &VeeryContext) -> BackendResult<Self> {
        let mut conn = context.db_pool.get()?;
        let users = person::table.count().get_result(conn.deref_mut())?;
        let posts = post::table
            .filter(post::deleted.eq(false))
            .count()
            .get_result(conn.deref_mut())?;
        let comments = comment::table.count().get_result(conn.deref_mut())?;
        Ok(SiteStats {
            users,
            posts,
            comments,
        })
    }
}
