//! Service layer: inbox and library orchestration.
//!
//! [`InboxService`] owns the live message list and its subscription.
//! [`LibraryService`] coordinates book reads, cover uploads, and form
//! submission. Both report outcomes through the
//! [`super::domain::EventBus`].

pub mod inbox_service;
pub mod library_service;
pub mod subscription;

pub use inbox_service::InboxService;
pub use library_service::LibraryService;
pub use subscription::SubscriptionHandle;
