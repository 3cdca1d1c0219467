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

pub mod error;
pub mod resources;
pub mod services;

#[cfg(test)]
pub mod test_helpers;

use std::{sync::Arc,
          time::Duration};

use actix_web::{http::StatusCode,
                middleware::Logger,
                web::{self,
                      Data,
                      JsonConfig,
                      ServiceConfig},
                App,
                HttpResponse,
                HttpServer};

use crate::{config::Config,
            db::{RsvpDataStore,
                 RsvpDataStoreDb}};

use self::{error::{Error,
                   Result},
           resources::{lookup::Lookup,
                       submit::Submit},
           services::webhook::Hub};

// Application state
pub struct AppState {
    pub datastore: Arc<dyn RsvpDataStore>,
    pub hub:       Hub,
}

impl AppState {
    pub fn new(datastore: Arc<dyn RsvpDataStore>, hub: Hub) -> AppState { AppState { datastore, hub } }
}

/// Endpoint for determining availability of the RSVP API.
///
/// Returns a status 200 on success. Any non-200 responses are an outage or a partial outage.
async fn status() -> HttpResponse { HttpResponse::new(StatusCode::OK) }

/// Mounts every route under `/api`. Bodies that fail to parse as JSON are
/// answered with a 400 in the same `{"error": ..}` shape as the handlers use.
pub fn configure(cfg: &mut ServiceConfig) {
    let json_cfg = JsonConfig::default().error_handler(|err, _req| {
                                            debug!("Rejected request body: {}", err);
                                            Error::BadRequest(format!("Invalid request body: {}", err)).into()
                                        });

    cfg.app_data(json_cfg).service(web::scope("/api").configure(Lookup::register)
                                                     .configure(Submit::register)
                                                     .service(web::resource("/status").route(web::get().to(status))
                                                                                      .route(web::head().to(status))));
}

pub async fn run(config: Config) -> Result<()> {
    let datastore = RsvpDataStoreDb::new(&config.datastore);
    datastore.setup()?;

    let hub = Hub::from_config(&config.webhook)?;
    let state = Data::new(AppState::new(Arc::new(datastore), hub));

    info!("rsvp-api listening on {}:{}", config.http.listen, config.http.port);

    HttpServer::new(move || {
        App::new().app_data(state.clone())
                  .wrap(Logger::default().exclude("/api/status"))
                  .configure(configure)
    }).workers(config.http.handler_count)
      .keep_alive(Duration::from_secs(config.http.keep_alive))
      .bind(config.http.clone())?
      .run()
      .await?;

    Ok(())
}
