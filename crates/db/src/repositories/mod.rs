//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods. Reads take
//! `&PgPool`; writes that must share a transaction with on-create hooks take
//! `&mut PgConnection`, and single-statement helpers accept any executor.

pub mod address_repo;
pub mod bookmark_repo;
pub mod category_repo;
pub mod comment_repo;
pub mod group_repo;
pub mod permission_repo;
pub mod post_repo;
pub mod price_repo;
pub mod product_repo;
pub mod slide_repo;
pub mod star_repo;
pub mod tag_repo;
pub mod trash_repo;
pub mod user_repo;

pub use address_repo::AddressRepo;
pub use bookmark_repo::BookmarkRepo;
pub use category_repo::CategoryRepo;
pub use comment_repo::CommentRepo;
pub use group_repo::GroupRepo;
pub use permission_repo::PermissionRepo;
pub use post_repo::PostRepo;
pub use price_repo::PriceRepo;
pub use product_repo::ProductRepo;
pub use slide_repo::SlideRepo;
pub use star_repo::StarRepo;
pub use tag_repo::TagRepo;
pub use trash_repo::TrashRepo;
pub use user_repo::UserRepo;
