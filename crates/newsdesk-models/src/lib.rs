pub mod collection;
pub mod desk;
pub mod links;
pub mod user;

pub use collection::{Collection, PageMeta};
pub use desk::{Desk, DeskMember};
pub use links::{Link, Links};
pub use user::User;

/// Records addressed by their server-assigned `_id`.
pub trait Identified {
    fn id(&self) -> &str;
}
