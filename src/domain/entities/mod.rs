pub mod auth_context;
pub mod trash_entry;
pub mod trash_list;
