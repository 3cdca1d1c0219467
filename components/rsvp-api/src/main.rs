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

#[macro_use]
extern crate log;

use std::{fmt,
          path::PathBuf,
          process};

use clap::Parser;

use rsvp_api::{config::Config,
               server};
use rsvp_core::config::ConfigFile;

const CFG_DEFAULT_PATH: &str = "/etc/rsvp-api/config.toml";

#[derive(Debug, Parser)]
#[command(name = "rsvp-api",
          version,
          about = "Guest RSVP API",
          subcommand_required = true,
          arg_required_else_help = true)]
enum Cli {
    /// Run the rsvp-api server
    Start {
        /// Filepath to configuration file. [default: /etc/rsvp-api/config.toml]
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Listen port. [default: 8080]
        #[arg(long)]
        port:   Option<u16>,
    },
}

#[actix_rt::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();
    debug!("CLI matches: {:?}", cli);
    let config = match config_from_args(cli) {
        Ok(config) => config,
        Err(e) => exit_with(e, 1),
    };
    match server::run(config).await {
        Ok(_) => process::exit(0),
        Err(e) => exit_with(e, 1),
    }
}

fn config_from_args(cli: Cli) -> Result<Config, String> {
    let Cli::Start { config, port } = cli;
    let mut config = match config {
        Some(cfg_path) => {
            Config::from_file(&cfg_path).map_err(|e| {
                                            format!("Unable to load config {}: {}",
                                                    cfg_path.display(),
                                                    e)
                                        })?
        }
        None => Config::from_file(CFG_DEFAULT_PATH).unwrap_or_default(),
    };

    if let Some(port) = port {
        config.http.port = port;
    }

    Ok(config)
}

fn exit_with<T>(err: T, code: i32) -> !
    where T: fmt::Display
{
    error!("{}", err);
    println!("{}", err);
    process::exit(code)
}
