// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod photo;
pub mod rally;
pub mod user;
pub mod vote;

pub use photo::{Photo, PhotoStatus};
pub use rally::RallyConfig;
pub use user::{Role, UserProfile};
pub use vote::Vote;
