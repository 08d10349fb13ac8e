pub mod activity;
pub mod reducer;
pub mod reminder;
pub mod stats;
pub mod view;
