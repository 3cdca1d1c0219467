// Copyright (c) 2018 Chef Software Inc. and/or applicable contributors
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

use std::{ops::Deref,
          time::Duration};

use reqwest::{header::{HeaderMap,
                       HeaderName,
                       HeaderValue,
                       ACCEPT,
                       CONTENT_TYPE,
                       USER_AGENT},
              Client};

use crate::error::Result;

const RSVP_USER_AGENT: &str = "RSVP-Notifier";
const APPLICATION_JSON: &str = "application/json";

lazy_static::lazy_static! {
    pub static ref USER_AGENT_RSVP: (HeaderName, HeaderValue) = (USER_AGENT, HeaderValue::from_static(RSVP_USER_AGENT));
    pub static ref ACCEPT_APPLICATION_JSON: (HeaderName, HeaderValue) = (ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
    pub static ref CONTENT_TYPE_APPLICATION_JSON: (HeaderName, HeaderValue) = (CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
}

/// A reqwest client carrying the default headers every outbound RSVP request sends.
#[derive(Clone, Debug)]
pub struct HttpClient(Client);

impl HttpClient {
    pub fn new(headers: HeaderMap, timeout: Duration) -> Result<Self> {
        trace!("HttpClient: building client, timeout = {:?}", timeout);
        let client = Client::builder().default_headers(headers)
                                      .timeout(timeout)
                                      .build()?;
        Ok(HttpClient(client))
    }

    /// Headers for posting JSON documents.
    pub fn json_headers() -> HeaderMap {
        let header_values = vec![USER_AGENT_RSVP.clone(),
                                 ACCEPT_APPLICATION_JSON.clone(),
                                 CONTENT_TYPE_APPLICATION_JSON.clone(),];
        header_values.into_iter().collect()
    }
}

impl Deref for HttpClient {
    type Target = Client;

    fn deref(&self) -> &Self::Target { &self.0 }
}
