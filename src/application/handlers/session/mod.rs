//! Session lifecycle handlers: create, edit, delete and read.

mod create_session;
mod delete_session;
mod get_session;
mod list_sessions;
mod update_session;

pub use create_session::{CreateSessionCommand, CreateSessionHandler, CreateSessionResult};
pub use delete_session::{DeleteSessionCommand, DeleteSessionHandler};
pub use get_session::GetSessionHandler;
pub use list_sessions::ListSessionsHandler;
pub use update_session::{UpdateSessionCommand, UpdateSessionHandler};
