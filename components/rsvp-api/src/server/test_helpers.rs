use std::{cmp::Ordering,
          sync::Mutex,
          thread,
          time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{db::{error::{Error as DbError,
                         Result as DbResult},
                 models::{guest::{Guest,
                                  GuestRsvpUpdate,
                                  GuestSuggestion},
                          invite_group::InviteGroup},
                 RsvpDataStore},
            server::{error::{Error,
                             Result},
                     services::webhook::Hook}};

#[macro_export]
macro_rules! assert_match {
    ($result:expr, $expected:pat) => {
        match ($result) {
            $expected => {}
            x => {
                panic!("assertion failed: expected {:?}, received {:?}",
                       stringify!($expected),
                       x)
            }
        };
    };
}

fn nulls_last(left: &Option<String>, right: &Option<String>) -> Ordering {
    match (left, right) {
        (Some(l), Some(r)) => l.cmp(r),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn lowercase(name: &Option<String>) -> String { name.as_deref().unwrap_or("").to_lowercase() }

#[derive(Default)]
struct Tables {
    groups: Vec<InviteGroup>,
    guests: Vec<Guest>,
}

/// Keeps the guest tables in memory. Every call holds one lock, so
/// `submit_group` is atomic the same way the database transaction is.
#[derive(Default)]
pub struct MemoryDataStore {
    tables: Mutex<Tables>,
}

impl MemoryDataStore {
    pub fn add_group(&self, locked: bool) -> Uuid {
        let id = Uuid::new_v4();
        let now = Some(Utc::now());
        self.tables.lock().unwrap().groups.push(InviteGroup { id,
                                                              locked,
                                                              created_at: now,
                                                              updated_at: now });
        id
    }

    pub fn add_guest(&self,
                     group_id: Uuid,
                     first_name: Option<&str>,
                     last_name: Option<&str>,
                     is_plus_one: bool)
                     -> Uuid {
        let id = Uuid::new_v4();
        let now = Some(Utc::now());
        self.tables.lock().unwrap().guests.push(Guest { id,
                                                        invite_group_id: group_id,
                                                        first_name: first_name.map(String::from),
                                                        last_name: last_name.map(String::from),
                                                        attending: None,
                                                        dietary_restrictions: None,
                                                        is_plus_one,
                                                        submission_id: None,
                                                        created_at: now,
                                                        updated_at: now });
        id
    }

    pub fn group(&self, group_id: Uuid) -> InviteGroup {
        self.tables
            .lock()
            .unwrap()
            .groups
            .iter()
            .find(|g| g.id == group_id)
            .cloned()
            .expect("no such group")
    }

    pub fn guest(&self, guest_id: Uuid) -> Guest {
        self.tables
            .lock()
            .unwrap()
            .guests
            .iter()
            .find(|g| g.id == guest_id)
            .cloned()
            .expect("no such guest")
    }
}

impl RsvpDataStore for MemoryDataStore {
    fn find_guest_by_name(&self, first_name: &str, last_name: &str) -> DbResult<Option<Guest>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.guests
                 .iter()
                 .find(|g| lowercase(&g.first_name) == first_name && lowercase(&g.last_name) == last_name)
                 .cloned())
    }

    fn get_invite_group(&self, group_id: Uuid) -> DbResult<Option<InviteGroup>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.groups.iter().find(|g| g.id == group_id).cloned())
    }

    fn list_group_guests(&self, group_id: Uuid) -> DbResult<Vec<Guest>> {
        let tables = self.tables.lock().unwrap();
        let mut guests: Vec<Guest> = tables.guests
                                           .iter()
                                           .filter(|g| g.invite_group_id == group_id)
                                           .cloned()
                                           .collect();
        guests.sort_by(|a, b| {
                  a.is_plus_one
                   .cmp(&b.is_plus_one)
                   .then_with(|| nulls_last(&a.first_name, &b.first_name))
                   .then_with(|| nulls_last(&a.last_name, &b.last_name))
              });
        Ok(guests)
    }

    fn search_guests_by_prefix(&self,
                               first_name: &str,
                               last_name: &str,
                               limit: i64)
                               -> DbResult<Vec<GuestSuggestion>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.guests
                 .iter()
                 .filter(|g| {
                     let (first, last) = (lowercase(&g.first_name), lowercase(&g.last_name));
                     [first_name, last_name].iter().any(|token| {
                                                       (g.first_name.is_some() && first.starts_with(*token))
                                                       || (g.last_name.is_some() && last.starts_with(*token))
                                                   })
                 })
                 .take(limit as usize)
                 .map(|g| {
                     GuestSuggestion { id:         g.id,
                                       first_name: g.first_name.clone(),
                                       last_name:  g.last_name.clone(), }
                 })
                 .collect())
    }

    fn submit_group(&self,
                    group_id: Uuid,
                    submission_id: Uuid,
                    updates: &[GuestRsvpUpdate])
                    -> DbResult<bool> {
        let mut tables = self.tables.lock().unwrap();
        match tables.groups.iter_mut().find(|g| g.id == group_id && !g.locked) {
            Some(group) => group.locked = true,
            None => return Ok(false),
        }

        for update in updates {
            if let Some(guest) = tables.guests
                                       .iter_mut()
                                       .find(|g| g.id == update.guest_id && g.invite_group_id == group_id)
            {
                guest.attending = Some(update.attending);
                guest.dietary_restrictions = update.dietary_restrictions.clone();
                guest.submission_id = Some(submission_id);
                if update.first_name.is_some() {
                    guest.first_name = update.first_name.clone();
                }
                if update.last_name.is_some() {
                    guest.last_name = update.last_name.clone();
                }
            }
        }
        Ok(true)
    }
}

/// A store whose every call fails, standing in for a lost database.
pub struct BrokenDataStore;

impl BrokenDataStore {
    fn fail<T>() -> DbResult<T> {
        Err(DbError::MigrationError("relation \"guests\" does not exist".to_string()))
    }
}

impl RsvpDataStore for BrokenDataStore {
    fn find_guest_by_name(&self, _: &str, _: &str) -> DbResult<Option<Guest>> { Self::fail() }

    fn get_invite_group(&self, _: Uuid) -> DbResult<Option<InviteGroup>> { Self::fail() }

    fn list_group_guests(&self, _: Uuid) -> DbResult<Vec<Guest>> { Self::fail() }

    fn search_guests_by_prefix(&self, _: &str, _: &str, _: i64) -> DbResult<Vec<GuestSuggestion>> {
        Self::fail()
    }

    fn submit_group(&self, _: Uuid, _: Uuid, _: &[GuestRsvpUpdate]) -> DbResult<bool> { Self::fail() }
}

/// Wraps a `MemoryDataStore`, holding the calling thread for `delay` on every
/// read, the way a slow database would.
pub struct SlowDataStore {
    pub inner: MemoryDataStore,
    pub delay: Duration,
}

impl RsvpDataStore for SlowDataStore {
    fn find_guest_by_name(&self, first_name: &str, last_name: &str) -> DbResult<Option<Guest>> {
        thread::sleep(self.delay);
        self.inner.find_guest_by_name(first_name, last_name)
    }

    fn get_invite_group(&self, group_id: Uuid) -> DbResult<Option<InviteGroup>> {
        thread::sleep(self.delay);
        self.inner.get_invite_group(group_id)
    }

    fn list_group_guests(&self, group_id: Uuid) -> DbResult<Vec<Guest>> {
        self.inner.list_group_guests(group_id)
    }

    fn search_guests_by_prefix(&self,
                               first_name: &str,
                               last_name: &str,
                               limit: i64)
                               -> DbResult<Vec<GuestSuggestion>> {
        self.inner.search_guests_by_prefix(first_name, last_name, limit)
    }

    fn submit_group(&self,
                    group_id: Uuid,
                    submission_id: Uuid,
                    updates: &[GuestRsvpUpdate])
                    -> DbResult<bool> {
        self.inner.submit_group(group_id, submission_id, updates)
    }
}

/// Records every payload it is handed, failing the ones that contain `fail_on`.
#[derive(Default)]
pub struct RecordingHook {
    fail_on:   Option<String>,
    delivered: Mutex<Vec<String>>,
}

impl RecordingHook {
    pub fn new() -> Self { RecordingHook::default() }

    pub fn failing_for(fail_on: &str) -> Self {
        RecordingHook { fail_on:   Some(fail_on.to_string()),
                        delivered: Mutex::new(Vec::new()), }
    }

    pub fn delivered(&self) -> Vec<String> { self.delivered.lock().unwrap().clone() }
}

#[async_trait]
impl Hook for RecordingHook {
    async fn deliver(&self, event_data: &str) -> Result<()> {
        self.delivered.lock().unwrap().push(event_data.to_string());
        match self.fail_on {
            Some(ref needle) if event_data.contains(needle.as_str()) => {
                Err(Error::WebhookDelivery(format!("refused {}", needle)))
            }
            _ => Ok(()),
        }
    }
}
