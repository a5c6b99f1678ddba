// Database schema for the rental application
diesel::table! {
    users (id) {
        id -> Integer,
        name -> Text,
        email -> Text,                     // unique
        sex -> Nullable<Text>,             // MALE, FEMALE
        password -> Text,
        birth_date -> Nullable<Date>,
        registered_on -> Nullable<Date>,
    }
}

diesel::table! {
    rentals (id) {
        id -> Integer,
        movie -> Text,
        month -> Integer,
        year -> Integer,
        amount -> Text,                    // decimal as text
        user_id -> Integer,
        kind -> Text,                      // RENTAL, RETURN
        status -> Text,                    // PENDING, EFFECTIVE, CANCELED
        registered_on -> Nullable<Date>,
    }
}

diesel::joinable!(rentals -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(rentals, users,);
