pub mod collaborator_link;
pub mod college;
pub mod document;
pub mod essay;
pub mod permission;
pub mod scholarship;
pub mod task;
pub mod user;

pub use collaborator_link::{CollaboratorLink, LinkStatus, Relationship};
pub use college::{College, CollegeStatus};
pub use document::{Document, DocumentType};
pub use essay::{Essay, EssayStatus};
pub use permission::{PermissionKey, PermissionPatch, PermissionSet};
pub use scholarship::{Scholarship, ScholarshipStatus};
pub use task::{Task, TaskStatus};
pub use user::{Role, User};
