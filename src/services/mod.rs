// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod accounts;
pub mod cloudinary;
pub mod contest;
pub mod menu;
pub mod session;

pub use accounts::{AccountDirectory, DirectoryAccount};
pub use cloudinary::{CloudinaryClient, UploadedImage};
pub use contest::ContestService;
pub use menu::{visible_destinations, Destination, MenuEntry};
pub use session::Session;
