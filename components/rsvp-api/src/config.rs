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

//! Configuration for the RSVP API service

use std::{env,
          error,
          fmt,
          io,
          net::{IpAddr,
                Ipv4Addr,
                SocketAddr,
                ToSocketAddrs},
          option::IntoIter};

use rsvp_core::config::ConfigFile;

use crate::db::config::DataStoreCfg;

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http:      HttpCfg,
    pub datastore: DataStoreCfg,
    pub webhook:   WebhookCfg,
}

#[derive(Debug)]
pub struct ConfigError(String);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.0) }
}

impl error::Error for ConfigError {}

impl ConfigFile for Config {
    type Error = ConfigError;
}

impl From<rsvp_core::Error> for ConfigError {
    fn from(err: rsvp_core::Error) -> ConfigError { ConfigError(err.to_string()) }
}

/// Public listening net address for HTTP requests
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct HttpCfg {
    pub listen:        IpAddr,
    pub port:          u16,
    pub handler_count: usize,
    /// Seconds an idle keep-alive connection is held open
    pub keep_alive:    u64,
}

impl Default for HttpCfg {
    fn default() -> Self {
        HttpCfg { listen:        IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
                  port:          8080,
                  handler_count: num_cpus::get(),
                  keep_alive:    60, }
    }
}

impl ToSocketAddrs for HttpCfg {
    type Iter = IntoIter<SocketAddr>;

    fn to_socket_addrs(&self) -> io::Result<IntoIter<SocketAddr>> {
        match self.listen {
            IpAddr::V4(ref a) => (*a, self.port).to_socket_addrs(),
            IpAddr::V6(ref a) => (*a, self.port).to_socket_addrs(),
        }
    }
}

/// Where RSVP submissions are announced. Without a url nothing is sent.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct WebhookCfg {
    pub url:         Option<String>,
    pub timeout_sec: u64,
}

impl Default for WebhookCfg {
    fn default() -> Self {
        WebhookCfg { url:         env::var("RSVP_WEBHOOK_URL").ok()
                                                             .filter(|url| !url.trim().is_empty()),
                     timeout_sec: 10, }
    }
}
