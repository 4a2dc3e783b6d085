//! Actor identity from gateway headers
//!
//! Authentication happens upstream; the gateway forwards the user id and
//! role, and handlers take an [`Actor`] argument to require them.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;
use crate::models::{Actor, Role};

pub const USER_HEADER: &str = "x-mdist-user";
pub const ROLE_HEADER: &str = "x-mdist-role";

fn header<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, ApiError> {
    parts
        .headers
        .get(name)
        .ok_or_else(|| ApiError::Unauthorized(format!("Missing {} header", name)))?
        .to_str()
        .map_err(|_| ApiError::Unauthorized(format!("Malformed {} header", name)))
}

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = mdist_common::uuid_utils::parse(header(parts, USER_HEADER)?)
            .map_err(|_| ApiError::Unauthorized(format!("Invalid {} header", USER_HEADER)))?;
        let role: Role = header(parts, ROLE_HEADER)?
            .parse()
            .map_err(|_| ApiError::Unauthorized(format!("Invalid {} header", ROLE_HEADER)))?;

        Ok(Actor { user_id, role })
    }
}
