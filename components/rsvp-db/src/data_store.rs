// Copyright (c) 2020 Chef Software Inc. and/or applicable contributors
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

//! The PostgreSQL backend for the RSVP service.

use diesel::Connection;
use uuid::Uuid;

use crate::{config::DataStoreCfg,
            diesel_pool::{DbPool,
                          PgPooledConnection},
            error::{Error,
                    Result},
            migration,
            models::{guest::{Guest,
                             GuestRsvpUpdate,
                             GuestSuggestion},
                     invite_group::InviteGroup}};

/// Everything the lookup and submit handlers need from storage.
///
/// Names handed to the lookup methods are already normalized (trimmed and
/// lowercased) but not escaped; wildcard escaping is the store's business.
pub trait RsvpDataStore: Send + Sync {
    fn find_guest_by_name(&self, first_name: &str, last_name: &str) -> Result<Option<Guest>>;

    fn get_invite_group(&self, group_id: Uuid) -> Result<Option<InviteGroup>>;

    fn list_group_guests(&self, group_id: Uuid) -> Result<Vec<Guest>>;

    fn search_guests_by_prefix(&self,
                               first_name: &str,
                               last_name: &str,
                               limit: i64)
                               -> Result<Vec<GuestSuggestion>>;

    /// Locks the group and writes every guest update as one unit.
    ///
    /// Returns `Ok(false)` without writing anything when the group was already
    /// locked by someone else.
    fn submit_group(&self,
                    group_id: Uuid,
                    submission_id: Uuid,
                    updates: &[GuestRsvpUpdate])
                    -> Result<bool>;
}

/// DataStore inherits being Send + Sync by virtue of having only one member, the pool itself.
#[derive(Clone)]
pub struct RsvpDataStoreDb {
    diesel_pool: DbPool,
}

impl RsvpDataStoreDb {
    /// Create a new DataStore.
    ///
    /// * Blocks creation of the datastore on the existence of the pool; might wait indefinitely.
    pub fn new(cfg: &DataStoreCfg) -> Self {
        let diesel_pool = DbPool::new(cfg);
        RsvpDataStoreDb { diesel_pool }
    }

    /// Create a new DataStore from a pre-existing pool; useful for testing the database.
    pub fn from_pool(diesel_pool: DbPool) -> Self { RsvpDataStoreDb { diesel_pool } }

    /// Setup the datastore by running the schema migrations.
    pub fn setup(&self) -> Result<()> {
        let mut conn = self.get_conn()?;
        migration::setup(&mut conn)
    }

    pub fn get_conn(&self) -> Result<PgPooledConnection> { self.diesel_pool.get_conn() }
}

impl RsvpDataStore for RsvpDataStoreDb {
    fn find_guest_by_name(&self, first_name: &str, last_name: &str) -> Result<Option<Guest>> {
        let mut conn = self.get_conn()?;
        Guest::find_by_name(first_name, last_name, &mut conn).map_err(Error::DieselError)
    }

    fn get_invite_group(&self, group_id: Uuid) -> Result<Option<InviteGroup>> {
        let mut conn = self.get_conn()?;
        InviteGroup::get(group_id, &mut conn).map_err(Error::DieselError)
    }

    fn list_group_guests(&self, group_id: Uuid) -> Result<Vec<Guest>> {
        let mut conn = self.get_conn()?;
        Guest::list_by_group(group_id, &mut conn).map_err(Error::DieselError)
    }

    fn search_guests_by_prefix(&self,
                               first_name: &str,
                               last_name: &str,
                               limit: i64)
                               -> Result<Vec<GuestSuggestion>> {
        let mut conn = self.get_conn()?;
        Guest::search_by_prefix(first_name, last_name, limit, &mut conn).map_err(Error::DieselError)
    }

    fn submit_group(&self,
                    group_id: Uuid,
                    submission_id: Uuid,
                    updates: &[GuestRsvpUpdate])
                    -> Result<bool> {
        let mut conn = self.get_conn()?;
        // Lock first; a request that loses the race sees zero rows and writes nothing.
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
                if !InviteGroup::lock(group_id, conn)? {
                    return Ok(false);
                }
                for update in updates {
                    Guest::update_rsvp(group_id, submission_id, update, conn)?;
                }
                Ok(true)
            })
            .map_err(Error::DieselError)
    }
}
