pub mod action;
pub mod activity;
pub mod config;
pub mod route;
pub mod task;
pub mod workspace;

pub use action::*;
pub use activity::*;
pub use config::*;
pub use route::*;
pub use task::*;
pub use workspace::*;
