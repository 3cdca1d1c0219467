use chrono::{DateTime,
             Utc};
use diesel::{self,
             pg::PgConnection,
             prelude::*,
             result::QueryResult};
use uuid::Uuid;

use crate::schema::invite_group::invite_groups;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = invite_groups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InviteGroup {
    pub id:         Uuid,
    pub locked:     bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl InviteGroup {
    pub fn get(group_id: Uuid, conn: &mut PgConnection) -> QueryResult<Option<InviteGroup>> {
        invite_groups::table.find(group_id)
                            .select(InviteGroup::as_select())
                            .first(conn)
                            .optional()
    }

    /// Flips `locked` from false to true. Returns false when the group was already
    /// locked (or does not exist), in which case nothing was changed.
    pub fn lock(group_id: Uuid, conn: &mut PgConnection) -> QueryResult<bool> {
        let updated = diesel::update(invite_groups::table.filter(invite_groups::id.eq(group_id))
                                                         .filter(invite_groups::locked.eq(false)))
                      .set(invite_groups::locked.eq(true))
                      .execute(conn)?;
        Ok(updated == 1)
    }
}
