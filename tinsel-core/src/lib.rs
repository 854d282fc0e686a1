// tinsel-core/src/lib.rs

//! Core library for the Tinsel workshop assistant.
//!
//! Two independent flows, no shared components:
//!
//! - **Chat**: [`ChatClient`] builds a single-message chat-completion
//!   request, issues one bearer-authenticated POST, and decodes the first
//!   choice of the response.
//! - **Inventory**: [`Inventory`] manages toy records through the
//!   [`ToyStore`] interface, with interchangeable SQLite and flat-file
//!   backends and a subscription hook for presentation layers.

pub mod api;
pub mod config;
pub mod errors;
pub mod inventory;

pub use api::{build_chat_request, parse_chat_response, ChatClient};
pub use config::{BackendKind, ChatConfig, InventoryConfig, TinselConfig};
pub use errors::{ChatError, StoreError};
pub use inventory::json_file::JsonFileStore;
pub use inventory::sqlite::SqliteStore;
pub use inventory::{Inventory, ToyStore};
pub use models::chat::{ChatMessage, ChatResponse, Choice};
pub use models::toy::ToyRecord;

pub mod models {
    pub mod chat;
    pub mod toy;
}
