//! User endpoints.

use super::ApiError;
use crate::store::{self, User};
use fast_web::{
    Body, Data, Envelope, PageParams, PageResult, PathParam, SecToken, Validate,
    ValidationResult, ValidationRules, path_key,
};
use serde::{Deserialize, Serialize};

path_key!(pub UserId = "id");

/// Input for creating a user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
}

impl Validate for CreateUser {
    fn validate(&self) -> ValidationResult {
        ValidationRules::new()
            .required("name", &self.name)
            .max_length("name", &self.name, 32)
            .email("email", &self.email)
            .build()
    }
}

/// Search filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    pub name: String,
}

impl Validate for SearchQuery {}

fn parse_id(id: &PathParam<UserId>) -> Result<u32, ApiError> {
    id.parse().map_err(|_| ApiError::BadId(id.to_string()))
}

/// @router /user/{id} [GET]
pub async fn get_user(id: PathParam<UserId>) -> Result<User, ApiError> {
    let id = parse_id(&id)?;
    store::users().get(id).ok_or(ApiError::NotFound(id))
}

/// One page of users.
/// @router /user/list [POST]
/// @limit 100 200 user
pub async fn list_users(page: Body<PageParams>) -> Data<PageResult<User>> {
    let all = store::users().all();
    let total = all.len() as u64;
    let list = all
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.page_size as usize)
        .collect();
    Data(PageResult::new(total, list))
}

/// @router /user/add [POST]
/// @limit 10 20 user
pub async fn add_user(input: Body<CreateUser>) -> Result<User, ApiError> {
    store::users()
        .create(&input.name, &input.email)
        .ok_or(ApiError::Unavailable)
}

/// @router /user/delete/{id} [DELETE]
pub async fn delete_user(id: PathParam<UserId>) -> Result<(), ApiError> {
    let id = parse_id(&id)?;
    store::users()
        .delete(id)
        .map(|_| ())
        .ok_or(ApiError::NotFound(id))
}

/// Owner of the presented access token.
/// @router /user/me [GET]
pub async fn me(token: SecToken) -> Data<i64> {
    Data(token.user_id)
}

#[derive(Debug, Clone, Default)]
pub struct UserApi;

impl UserApi {
    /// @router /user/search [POST]
    /// @limit 5
    pub async fn search(self, query: Body<SearchQuery>) -> Envelope {
        let found = store::users().search(&query.name);
        if found.is_empty() {
            Envelope::ok("no match")
        } else {
            Envelope::success(found)
        }
    }
}
