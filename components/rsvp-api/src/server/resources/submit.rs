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

use std::collections::{HashMap,
                       HashSet};

use actix_web::{web::{self,
                      Data,
                      Json,
                      ServiceConfig},
                HttpResponse};
use chrono::Utc;
use uuid::Uuid;

use crate::{db::{models::guest::{Guest,
                                 GuestRsvpUpdate},
                 RsvpDataStore},
            server::{error::{Error,
                             Result},
                     services::webhook::{Hub,
                                         RsvpEvent},
                     AppState}};

const MISSING_FIELDS: &str = "Group ID and guests are required.";
const GROUP_NOT_FOUND: &str = "Invite group not found.";
const GROUP_LOCKED: &str = "This invitation is already locked.";
const DUPLICATE_GUESTS: &str = "Duplicate guest IDs are not allowed.";
const INVALID_GUESTS: &str = "One or more guests are invalid for this invite group.";
const PLUS_ONE_NAME_REQUIRED: &str = "Attending plus ones must include first and last name.";

#[derive(Clone, Debug, Deserialize)]
pub struct SubmittedGuest {
    pub id:         String,
    pub attending:  bool,
    #[serde(default)]
    pub dietary:    Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name:  Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct SubmitReq {
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub guests:   Option<Vec<SubmittedGuest>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubmitResponse {
    pub status:           &'static str,
    pub submission_id:    Uuid,
    pub webhook_failures: Vec<String>,
}

pub struct Submit;

impl Submit {
    // Route registration
    //
    pub fn register(cfg: &mut ServiceConfig) { cfg.route("/submit", web::post().to(submit_rsvp)); }
}

/// Trimmed, or None when nothing is left.
fn normalized_name(name: Option<&str>) -> Option<String> {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(String::from)
}

fn is_blank(name: &Option<String>) -> bool { name.as_ref().map_or(true, |n| n.is_empty()) }

// Route handlers - these functions can return any Responder trait
//
#[allow(clippy::needless_pass_by_value)]
async fn submit_rsvp(state: Data<AppState>, body: Json<SubmitReq>) -> HttpResponse {
    let datastore = state.datastore.clone();
    let req = body.into_inner();

    // Storage work runs on the blocking pool; only the webhook fan-out stays on the worker.
    let recorded = match web::block(move || record_submission(datastore.as_ref(), &req)).await {
        Ok(recorded) => recorded,
        Err(err) => Err(Error::from(err)),
    };

    match recorded {
        Ok(recorded) => HttpResponse::Ok().json(announce_submission(&state.hub, recorded).await),
        Err(err @ Error::DbError(_)) | Err(err @ Error::Blocking(_)) => {
            error!("RSVP submission failed: {}", err);
            err.into()
        }
        Err(err) => {
            debug!("RSVP submission rejected: {}", err);
            err.into()
        }
    }
}

/// Builds the write for one guest, enforcing the plus-one naming rule.
fn guest_update(stored: &Guest, submitted: &SubmittedGuest) -> Result<GuestRsvpUpdate> {
    let dietary_restrictions = if submitted.attending {
        normalized_name(submitted.dietary.as_deref())
    } else {
        None
    };

    let mut update = GuestRsvpUpdate { guest_id: stored.id,
                                       attending: submitted.attending,
                                       dietary_restrictions,
                                       first_name: None,
                                       last_name: None };

    if stored.is_plus_one {
        let incoming_first = normalized_name(submitted.first_name.as_deref());
        let incoming_last = normalized_name(submitted.last_name.as_deref());

        if submitted.attending
           && !stored.has_stored_name()
           && (incoming_first.is_none() || incoming_last.is_none())
        {
            return Err(Error::BadRequest(PLUS_ONE_NAME_REQUIRED.to_string()));
        }

        if is_blank(&stored.first_name) {
            update.first_name = incoming_first;
        }
        if is_blank(&stored.last_name) {
            update.last_name = incoming_last;
        }
    }

    Ok(update)
}

/// A submission that has been validated, written and locked, with the events
/// still to be announced.
#[derive(Debug)]
pub struct RecordedSubmission {
    pub submission_id: Uuid,
    pub events:        Vec<(Uuid, RsvpEvent)>,
}

/// Validates the answers and writes them, locking the group. Blocks on storage.
pub fn record_submission(datastore: &dyn RsvpDataStore,
                         req: &SubmitReq)
                         -> Result<RecordedSubmission> {
    let group_id = req.group_id.as_deref().map(str::trim).unwrap_or("");
    let submitted = match req.guests {
        Some(ref guests) if !group_id.is_empty() && !guests.is_empty() => guests,
        _ => return Err(Error::BadRequest(MISSING_FIELDS.to_string())),
    };
    let group_id = Uuid::parse_str(group_id).map_err(|_| Error::BadRequest("Invalid group ID.".to_string()))?;

    let group = datastore.get_invite_group(group_id)?
                         .ok_or_else(|| Error::NotFound(GROUP_NOT_FOUND.to_string()))?;
    if group.locked {
        return Err(Error::Conflict(GROUP_LOCKED.to_string()));
    }

    let guest_ids = submitted.iter()
                             .map(|g| Uuid::parse_str(g.id.trim()))
                             .collect::<std::result::Result<Vec<Uuid>, _>>()
                             .map_err(|_| Error::BadRequest(INVALID_GUESTS.to_string()))?;
    let unique_ids: HashSet<Uuid> = guest_ids.iter().cloned().collect();
    if unique_ids.len() != guest_ids.len() {
        return Err(Error::BadRequest(DUPLICATE_GUESTS.to_string()));
    }

    let members: HashMap<Uuid, Guest> = datastore.list_group_guests(group_id)?
                                                 .into_iter()
                                                 .map(|g| (g.id, g))
                                                 .collect();
    if members.len() != unique_ids.len() || !unique_ids.iter().all(|id| members.contains_key(id)) {
        return Err(Error::BadRequest(INVALID_GUESTS.to_string()));
    }

    let updates = guest_ids.iter()
                           .zip(submitted.iter())
                           .map(|(id, guest)| guest_update(&members[id], guest))
                           .collect::<Result<Vec<GuestRsvpUpdate>>>()?;

    let submission_id = Uuid::new_v4();
    let submitted_at = Utc::now();

    if !datastore.submit_group(group_id, submission_id, &updates)? {
        return Err(Error::Conflict(GROUP_LOCKED.to_string()));
    }
    info!("Locked invite group {}, submission {}", group_id, submission_id);

    // Names announced are the ones the guest typed, falling back to what is stored.
    let events = updates.iter()
                        .zip(submitted.iter())
                        .map(|(update, answer)| {
                            let stored = &members[&update.guest_id];
                            let event =
                                RsvpEvent { submission_id,
                                            group_id,
                                            first_name: normalized_name(answer.first_name.as_deref())
                                                            .or_else(|| stored.first_name.clone()),
                                            last_name: normalized_name(answer.last_name.as_deref())
                                                           .or_else(|| stored.last_name.clone()),
                                            attending: update.attending,
                                            dietary: update.dietary_restrictions.clone(),
                                            submitted_at };
                            (update.guest_id, event)
                        })
                        .collect();

    Ok(RecordedSubmission { submission_id, events })
}

/// Fires the webhook events of a recorded submission and builds the response.
pub async fn announce_submission(hub: &Hub, recorded: RecordedSubmission) -> SubmitResponse {
    let webhook_failures = hub.announce(&recorded.events).await;
    if !webhook_failures.is_empty() {
        warn!("{} webhook deliveries failed for submission {}",
              webhook_failures.len(),
              recorded.submission_id);
    }

    SubmitResponse { status: "success",
                     submission_id: recorded.submission_id,
                     webhook_failures }
}

pub async fn do_submit(datastore: &dyn RsvpDataStore,
                       hub: &Hub,
                       req: &SubmitReq)
                       -> Result<SubmitResponse> {
    let recorded = record_submission(datastore, req)?;
    Ok(announce_submission(hub, recorded).await)
}
