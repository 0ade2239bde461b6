pub mod error;
pub mod member_index;
pub mod once;
pub mod registry;
pub mod selector;
pub mod service;

pub use error::{DeskError, LoadError};
pub use member_index::MembershipIndex;
pub use once::OnceShared;
pub use registry::{DeskRegistry, Registry, UserDirectory};
pub use selector::{CurrentDeskSelector, CURRENT_DESK_KEY};
pub use service::{DeskService, DEFAULT_PAGE_SIZE};
