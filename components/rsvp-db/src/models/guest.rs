use chrono::{DateTime,
             Utc};
use diesel::{self,
             pg::PgConnection,
             prelude::*,
             result::QueryResult};
use uuid::Uuid;

use crate::schema::guest::guests;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = guests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Guest {
    pub id:                   Uuid,
    pub invite_group_id:      Uuid,
    pub first_name:           Option<String>,
    pub last_name:            Option<String>,
    pub attending:            Option<bool>,
    pub dietary_restrictions: Option<String>,
    pub is_plus_one:          bool,
    pub submission_id:        Option<Uuid>,
    pub created_at:           Option<DateTime<Utc>>,
    pub updated_at:           Option<DateTime<Utc>>,
}

impl Guest {
    /// True when both halves of the name have been stored.
    pub fn has_stored_name(&self) -> bool {
        let present = |name: &Option<String>| name.as_ref().map_or(false, |n| !n.is_empty());
        present(&self.first_name) && present(&self.last_name)
    }
}

/// The slice of a guest returned when a lookup only matched partially.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable, Selectable)]
#[diesel(table_name = guests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GuestSuggestion {
    pub id:         Uuid,
    pub first_name: Option<String>,
    pub last_name:  Option<String>,
}

/// The answers written for one guest during a group submission.
#[derive(Debug, Clone, PartialEq)]
pub struct GuestRsvpUpdate {
    pub guest_id:             Uuid,
    pub attending:            bool,
    pub dietary_restrictions: Option<String>,
    /// Only set for plus-ones whose stored name is missing.
    pub first_name:           Option<String>,
    pub last_name:            Option<String>,
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = guests)]
struct GuestRsvpChangeset<'a> {
    attending:            bool,
    dietary_restrictions: Option<Option<&'a str>>,
    submission_id:        Uuid,
    first_name:           Option<&'a str>,
    last_name:            Option<&'a str>,
}

/// Escapes the LIKE wildcards so user input only ever matches literally.
pub fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '\\' || c == '%' || c == '_' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl Guest {
    /// Case-insensitive exact match on both names.
    pub fn find_by_name(first_name: &str,
                        last_name: &str,
                        conn: &mut PgConnection)
                        -> QueryResult<Option<Guest>> {
        guests::table.filter(guests::first_name.ilike(escape_like(first_name)))
                     .filter(guests::last_name.ilike(escape_like(last_name)))
                     .order(guests::created_at.asc())
                     .select(Guest::as_select())
                     .first(conn)
                     .optional()
    }

    /// Plus-ones last, then alphabetical by first and last name.
    pub fn list_by_group(group_id: Uuid, conn: &mut PgConnection) -> QueryResult<Vec<Guest>> {
        guests::table.filter(guests::invite_group_id.eq(group_id))
                     .order((guests::is_plus_one.asc(),
                             guests::first_name.asc().nulls_last(),
                             guests::last_name.asc().nulls_last()))
                     .select(Guest::as_select())
                     .get_results(conn)
    }

    /// Guests where either name starts with either of the given tokens.
    pub fn search_by_prefix(first_name: &str,
                            last_name: &str,
                            limit: i64,
                            conn: &mut PgConnection)
                            -> QueryResult<Vec<GuestSuggestion>> {
        let first_prefix = format!("{}%", escape_like(first_name));
        let last_prefix = format!("{}%", escape_like(last_name));

        guests::table.filter(guests::first_name.ilike(first_prefix.clone())
                                               .or(guests::last_name.ilike(first_prefix))
                                               .or(guests::first_name.ilike(last_prefix.clone()))
                                               .or(guests::last_name.ilike(last_prefix)))
                     .order((guests::last_name.asc().nulls_last(),
                             guests::first_name.asc().nulls_last()))
                     .limit(limit)
                     .select(GuestSuggestion::as_select())
                     .get_results(conn)
    }

    pub fn update_rsvp(group_id: Uuid,
                       submission_id: Uuid,
                       update: &GuestRsvpUpdate,
                       conn: &mut PgConnection)
                       -> QueryResult<usize> {
        let changeset =
            GuestRsvpChangeset { attending: update.attending,
                                 dietary_restrictions:
                                     Some(update.dietary_restrictions.as_deref()),
                                 submission_id,
                                 first_name: update.first_name.as_deref(),
                                 last_name: update.last_name.as_deref() };

        diesel::update(guests::table.filter(guests::id.eq(update.guest_id))
                                    .filter(guests::invite_group_id.eq(group_id)))
            .set(changeset)
            .execute(conn)
    }
}
