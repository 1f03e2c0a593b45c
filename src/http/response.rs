//! Response construction.
//!
//! # Design Decisions
//! - Error responses (404, 500) have an empty body
//! - Only the content type is set explicitly; length is left to hyper

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::reply::Reply;

pub fn from_reply(reply: Reply) -> Response {
    (reply.status, [(header::CONTENT_TYPE, reply.content_type)], reply.body).into_response()
}

pub fn not_found() -> Response {
    StatusCode::NOT_FOUND.into_response()
}

pub fn internal_error() -> Response {
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}
