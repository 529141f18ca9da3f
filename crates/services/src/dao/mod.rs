pub mod base;
pub mod collaboration;
pub mod college;
pub mod document;
pub mod essay;
pub mod scholarship;
pub mod task;
pub mod user;

pub use base::BaseDao;
