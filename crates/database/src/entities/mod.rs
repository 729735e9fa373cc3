//! Entity definitions for the database layer

pub mod user;

pub use user::{
    NewUser, NotificationFrequency, Preferences, ProfileVisibility, User, DEFAULT_LAYOUT_STYLE,
};
