pub mod audio;
pub mod notes;
pub mod users;
