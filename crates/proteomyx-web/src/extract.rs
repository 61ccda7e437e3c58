//! Extractors that reject with `ApiError`, so malformed ids, queries and
//! bodies get the same `{ "error": msg }` 400 as every other bad input.

use axum::extract::{FromRequest, FromRequestParts};
use proteomyx_common::ApiError;

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
