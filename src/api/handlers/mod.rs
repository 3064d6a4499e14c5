pub mod audio;
pub mod fallback;
pub mod health;
pub mod notes;
pub mod users;
