pub mod database;
pub mod slug;
pub mod taxonomy;
