use diesel_derive_newtype::DieselNewType;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Default, Serialize, Deserialize,
    DieselNewType,
)]
pub struct PersonId(pub i32);

#[derive(
    Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Default, Serialize, Deserialize,
    DieselNewType,
)]
pub struct LocalUserId(pub i32);

#[derive(
    Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Default, Serialize, Deserialize,
    DieselNewType,
)]
pub struct PostId(pub i32);

#[derive(
    Debug, Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd, Default, Serialize, Deserialize,
    DieselNewType,
)]
pub struct CommentId(pub i32);
