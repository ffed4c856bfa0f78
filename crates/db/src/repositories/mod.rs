//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod feedback_comment_repo;
pub mod feedback_repo;
pub mod feedback_request_repo;
pub mod user_repo;

pub use feedback_comment_repo::FeedbackCommentRepo;
pub use feedback_repo::FeedbackRepo;
pub use feedback_request_repo::FeedbackRequestRepo;
pub use user_repo::UserRepo;
