table! {
    invite_groups (id) {
        id -> Uuid,
        locked -> Bool,
        created_at -> Nullable<Timestamptz>,
        updated_at -> Nullable<Timestamptz>,
    }
}
