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

//! Loading of TOML configuration files for the RSVP services

use std::{fs,
          path::Path};

use serde::de::DeserializeOwned;

use crate::error::Error;

/// Implemented by top level service configuration structs which are read from a TOML file.
pub trait ConfigFile: DeserializeOwned + Sized {
    type Error: std::error::Error + From<Error>;

    fn from_file<T: AsRef<Path>>(filepath: T) -> Result<Self, Self::Error> {
        let path = filepath.as_ref();
        debug!("Loading config file, path = {}", path.display());
        let raw = fs::read_to_string(path).map_err(|e| Error::ConfigFileIO(path.to_path_buf(), e))?;
        Self::from_raw(&raw)
    }

    fn from_raw(raw: &str) -> Result<Self, Self::Error> {
        let value = toml::from_str::<Self>(raw).map_err(Error::ConfigFileSyntax)?;
        Ok(value)
    }
}
