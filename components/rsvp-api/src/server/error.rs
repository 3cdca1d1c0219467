// Copyright (c) 2016-2017 Chef Software Inc. and/or applicable contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::{error,
          fmt,
          io,
          result};

use actix_web::{error::BlockingError,
                http::StatusCode,
                HttpResponse,
                ResponseError};

use crate::db;

#[derive(Debug)]
pub enum Error {
    BadRequest(String),
    Blocking(BlockingError),
    Conflict(String),
    DbError(db::error::Error),
    HttpClient(rsvp_core::Error),
    IO(io::Error),
    NotFound(String),
    WebhookDelivery(String),
}

pub type Result<T> = result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match *self {
            Error::BadRequest(ref msg) => msg.to_string(),
            Error::Blocking(ref e) => format!("{}", e),
            Error::Conflict(ref msg) => msg.to_string(),
            Error::DbError(ref e) => format!("{}", e),
            Error::HttpClient(ref e) => format!("{}", e),
            Error::IO(ref e) => format!("{}", e),
            Error::NotFound(ref msg) => msg.to_string(),
            Error::WebhookDelivery(ref msg) => msg.to_string(),
        };
        write!(f, "{}", msg)
    }
}

impl error::Error for Error {}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::WebhookDelivery(_) => StatusCode::BAD_GATEWAY,

            // Default
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

impl From<Error> for HttpResponse {
    fn from(err: Error) -> HttpResponse { err.error_response() }
}

// From handlers - these make application level error handling cleaner

impl From<BlockingError> for Error {
    fn from(err: BlockingError) -> Error { Error::Blocking(err) }
}

impl From<db::error::Error> for Error {
    fn from(err: db::error::Error) -> Error { Error::DbError(err) }
}

impl From<rsvp_core::Error> for Error {
    fn from(err: rsvp_core::Error) -> Error { Error::HttpClient(err) }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self { Error::IO(err) }
}
