table! {
    guests (id) {
        id -> Uuid,
        invite_group_id -> Uuid,
        first_name -> Nullable<Text>,
        last_name -> Nullable<Text>,
        attending -> Nullable<Bool>,
        dietary_restrictions -> Nullable<Text>,
        is_plus_one -> Bool,
        submission_id -> Nullable<Uuid>,
        created_at -> Nullable<Timestamptz>,
        updated_at -> Nullable<Timestamptz>,
    }
}
