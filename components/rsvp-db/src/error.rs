// Copyright (c) 2016 Chef Software Inc. and/or applicable contributors
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
          result};

use diesel::r2d2::PoolError;

#[derive(Debug)]
pub enum Error {
    ConnectionTimeout(PoolError),
    DieselError(diesel::result::Error),
    MigrationError(String),
}

pub type Result<T> = result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match *self {
            Error::ConnectionTimeout(ref e) => format!("Timeout getting connection from the pool, {}", e),
            Error::DieselError(ref e) => format!("{}", e),
            Error::MigrationError(ref e) => format!("Error running database migrations, {}", e),
        };
        write!(f, "{}", msg)
    }
}

impl error::Error for Error {}

impl From<PoolError> for Error {
    fn from(err: PoolError) -> Error { Error::ConnectionTimeout(err) }
}

impl From<diesel::result::Error> for Error {
    fn from(err: diesel::result::Error) -> Error { Error::DieselError(err) }
}
