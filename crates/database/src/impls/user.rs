use crate::{
    common::{
        newtypes::PersonId,
        user::{LocalUser, LocalUserView, Person},
    },
    error::BackendResult,
    impls::VeeryContext,
    schema::{local_user, person},
};
use bcrypt::{hash, DEFAULT_COST};
use diesel::{
    insert_into, Connection, ExpressionMethods, Insertable, QueryDsl, RunQueryDsl,
};
use std::ops::DerefMut;

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = person, check_for_backend(diesel::pg::Pg))]
pub struct PersonInsertForm {
    pub username: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = local_user, check_for_backend(diesel::pg::Pg))]
pub struct LocalUserForm {
    pub password_encrypted: String,
    pub person_id: PersonId,
    pub admin: bool,
}

impl Person {
    pub fn read(id: PersonId, context: &VeeryContext) -> BackendResult<Person> {
        let mut conn = context.db_pool.get()?;
        Ok(person::table.find(id).get_result(conn.deref_mut())?)
    }
}

impl LocalUserView {
    pub fn create(
        username: String,
        password: &str,
        admin: bool,
        context: &VeeryContext,
    ) -> BackendResult<LocalUserView> {
        let mut conn = context.db_pool.get()?;
        let password_encrypted = hash(password, DEFAULT_COST)?;
        conn.transaction(|conn| {
            let person = insert_into(person::table)
                .values(PersonInsertForm { username })
                .get_result::<Person>(conn)?;

            let local_user = insert_into(local_user::table)
                .values(LocalUserForm {
                    password_encrypted,
                    person_id: person.id,
                    admin,
                })
                .get_result::<LocalUser>(conn)?;

            Ok(LocalUserView { person, local_user })
        })
    }

    pub fn read_from_name(username: &str, context: &VeeryContext) -> BackendResult<LocalUserView> {
        let mut conn = context.db_pool.get()?;
        let (person, local_user) = person::table
            .inner_join(local_user::table)
            .filter(person::dsl::username.eq(username))
            .get_result::<(Person, LocalUser)>(conn.deref_mut())?;
        Ok(LocalUserView { person, local_user })
    }

    pub fn read_admin(context: &VeeryContext) -> BackendResult<LocalUserView> {
        let mut conn = context.db_pool.get()?;
        let (person, local_user) = person::table
            .inner_join(local_user::table)
            .filter(local_user::admin)
            .get_result::<(Person, LocalUser)>(conn.deref_mut())?;
        Ok(LocalUserView { person, local_user })
    }
}
