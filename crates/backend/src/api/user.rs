use super::UserExt;
use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, Expiration, SameSite};
use axum_macros::debug_handler;
use bcrypt::verify;
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, get_current_timestamp, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use veery_api_client::user::{LoginParams, RegisterParams};
use veery_database::{
    common::{
        user::{LocalUserView, Person},
        validate_not_empty, SuccessResponse, AUTH_COOKIE,
    },
    error::{BackendError, BackendResult},
    impls::{read_jwt_secret, VeeryContext},
};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// person.username
    pub sub: String,
    /// bind address of the issuing instance
    pub iss: String,
    /// Creation time as unix timestamp
    pub iat: i64,
    /// Expiration time
    pub exp: u64,
}

pub(crate) fn generate_login_token(
    person: &Person,
    context: &VeeryContext,
) -> BackendResult<String> {
    let claims = Claims {
        sub: person.username.clone(),
        iss: context.config.server.bind.clone(),
        iat: Utc::now().timestamp(),
        exp: get_current_timestamp() + 60 * 60 * 24 * 365,
    };

    let secret = read_jwt_secret(context)?;
    let key = EncodingKey::from_secret(secret.as_bytes());
    let jwt = encode(&Header::default(), &claims, &key)?;
    Ok(jwt)
}

pub(crate) fn validate(jwt: &str, context: &VeeryContext) -> BackendResult<LocalUserView> {
    let validation = Validation::default();
    let secret = read_jwt_secret(context)?;
    let key = DecodingKey::from_secret(secret.as_bytes());
    let claims = decode::<Claims>(jwt, &key, &validation)?;
    LocalUserView::read_from_name(&claims.claims.sub, context)
}

fn validate_password(user: &LocalUserView, password: &str) -> BackendResult<()> {
    let valid = verify(password, &user.local_user.password_encrypted).unwrap_or(false);
    if !valid {
        return Err(BackendError::invalid_argument("Invalid login"));
    }
    Ok(())
}

pub(crate) fn create_cookie(jwt: String) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, jwt))
        .same_site(SameSite::Strict)
        .path("/")
        .http_only(true)
        .secure(!cfg!(debug_assertions))
        .expires(Expiration::DateTime(
            OffsetDateTime::now_utc() + Duration::weeks(52),
        ))
        .build()
}

#[debug_handler]
pub(crate) async fn register_user(
    State(context): State<Arc<VeeryContext>>,
    jar: CookieJar,
    Json(params): Json<RegisterParams>,
) -> BackendResult<(CookieJar, Json<LocalUserView>)> {
    validate_not_empty(&params.username)?;
    validate_not_empty(&params.password)?;
    if LocalUserView::read_from_name(&params.username, &context).is_ok() {
        return Err(BackendError::invalid_argument("Username already registered"));
    }

    let user = LocalUserView::create(params.username, &params.password, false, &context)?;

    let token = generate_login_token(&user.person, &context)?;
    let jar = jar.add(create_cookie(token));
    Ok((jar, Json(user)))
}

#[debug_handler]
pub(crate) async fn login_user(
    State(context): State<Arc<VeeryContext>>,
    jar: CookieJar,
    Json(params): Json<LoginParams>,
) -> BackendResult<(CookieJar, Json<LocalUserView>)> {
    // Uniform error for wrong username and wrong password
    let user = LocalUserView::read_from_name(&params.username, &context)
        .map_err(|_| BackendError::invalid_argument("Invalid login"))?;
    validate_password(&user, &params.password)?;
    let token = generate_login_token(&user.person, &context)?;
    let jar = jar.add(create_cookie(token));
    Ok((jar, Json(user)))
}

#[debug_handler]
pub(crate) async fn logout_user(
    jar: CookieJar,
) -> BackendResult<(CookieJar, Json<SuccessResponse>)> {
    let jar = jar.remove(create_cookie(String::new()));
    Ok((jar, Json(SuccessResponse::default())))
}

#[debug_handler]
pub(crate) async fn my_profile(user: UserExt) -> BackendResult<Json<LocalUserView>> {
    Ok(Json(user.inner()))
}
