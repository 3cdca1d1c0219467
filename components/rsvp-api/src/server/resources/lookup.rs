// Copyright (c) 2019 Chef Software Inc. and/or applicable contributors
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

use actix_web::{web::{self,
                      Data,
                      Json,
                      ServiceConfig},
                HttpResponse};
use uuid::Uuid;

use crate::{db::{models::guest::{Guest,
                                 GuestSuggestion},
                 RsvpDataStore},
            server::{error::{Error,
                             Result},
                     AppState}};

/// Most suggestions handed back when no guest matched exactly.
pub const SUGGESTION_LIMIT: i64 = 10;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct LookupReq {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name:  Option<String>,
}

/// A member of the matched invite group.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupGuest {
    pub id:                   Uuid,
    pub first_name:           Option<String>,
    pub last_name:            Option<String>,
    pub attending:            Option<bool>,
    pub dietary_restrictions: Option<String>,
    pub is_plus_one:          bool,
}

impl From<Guest> for GroupGuest {
    fn from(guest: Guest) -> GroupGuest {
        GroupGuest { id:                   guest.id,
                     first_name:           guest.first_name,
                     last_name:            guest.last_name,
                     attending:            guest.attending,
                     dietary_restrictions: guest.dietary_restrictions,
                     is_plus_one:          guest.is_plus_one, }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum LookupResponse {
    Match {
        group_id: Uuid,
        guests:   Vec<GroupGuest>,
    },
    Suggestions {
        matches: Vec<GuestSuggestion>,
    },
    #[serde(rename = "none")]
    NoMatch,
    Locked,
}

pub struct Lookup;

impl Lookup {
    // Route registration
    //
    pub fn register(cfg: &mut ServiceConfig) { cfg.route("/lookup", web::post().to(lookup_guest)); }
}

fn normalize(value: Option<&str>) -> String { value.unwrap_or("").trim().to_lowercase() }

// Route handlers - these functions can return any Responder trait
//
#[allow(clippy::needless_pass_by_value)]
async fn lookup_guest(state: Data<AppState>, body: Json<LookupReq>) -> HttpResponse {
    let datastore = state.datastore.clone();
    let req = body.into_inner();

    let result = match web::block(move || do_lookup(datastore.as_ref(), &req)).await {
        Ok(result) => result,
        Err(err) => Err(Error::from(err)),
    };

    match result {
        Ok(resp) => HttpResponse::Ok().json(resp),
        Err(Error::BadRequest(msg)) => {
            debug!("Rejected lookup: {}", msg);
            Error::BadRequest(msg).into()
        }
        Err(err) => {
            error!("Lookup failed: {}", err);
            err.into()
        }
    }
}

pub fn do_lookup(datastore: &dyn RsvpDataStore, req: &LookupReq) -> Result<LookupResponse> {
    let first_name = normalize(req.first_name.as_deref());
    let last_name = normalize(req.last_name.as_deref());

    if first_name.is_empty() || last_name.is_empty() {
        return Err(Error::BadRequest("First and last name are required.".to_string()));
    }

    if let Some(guest) = datastore.find_guest_by_name(&first_name, &last_name)? {
        let group = datastore.get_invite_group(guest.invite_group_id)?
                             .ok_or_else(|| Error::NotFound("Invite group not found.".to_string()))?;

        if group.locked {
            debug!("Lookup matched locked group {}", group.id);
            return Ok(LookupResponse::Locked);
        }

        let guests = datastore.list_group_guests(group.id)?;
        return Ok(LookupResponse::Match { group_id: group.id,
                                          guests:   guests.into_iter()
                                                          .map(GroupGuest::from)
                                                          .collect(), });
    }

    let mut matches =
        datastore.search_guests_by_prefix(&first_name, &last_name, SUGGESTION_LIMIT)?;
    matches.truncate(SUGGESTION_LIMIT as usize);

    if matches.is_empty() {
        Ok(LookupResponse::NoMatch)
    } else {
        Ok(LookupResponse::Suggestions { matches })
    }
}
