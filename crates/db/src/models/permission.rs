use serde::{Deserialize, Serialize};

use super::collaborator_link::Relationship;

/// The closed set of capabilities a collaborator link can grant.
///
/// Wire names are the camelCase strings used by the API
/// (`viewTasks`, `manageTasks`, ...). Anything outside this set fails
/// deserialization instead of silently landing in a permission map.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PermissionKey {
    ViewColleges,
    ManageColleges,
    ViewTasks,
    ManageTasks,
    ViewEssays,
    ManageEssays,
    ViewDocuments,
    ManageDocuments,
    ViewScholarships,
    ManageScholarships,
}

impl PermissionKey {
    pub const ALL: [PermissionKey; 10] = [
        PermissionKey::ViewColleges,
        PermissionKey::ManageColleges,
        PermissionKey::ViewTasks,
        PermissionKey::ManageTasks,
        PermissionKey::ViewEssays,
        PermissionKey::ManageEssays,
        PermissionKey::ViewDocuments,
        PermissionKey::ManageDocuments,
        PermissionKey::ViewScholarships,
        PermissionKey::ManageScholarships,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PermissionKey::ViewColleges => "viewColleges",
            PermissionKey::ManageColleges => "manageColleges",
            PermissionKey::ViewTasks => "viewTasks",
            PermissionKey::ManageTasks => "manageTasks",
            PermissionKey::ViewEssays => "viewEssays",
            PermissionKey::ManageEssays => "manageEssays",
            PermissionKey::ViewDocuments => "viewDocuments",
            PermissionKey::ManageDocuments => "manageDocuments",
            PermissionKey::ViewScholarships => "viewScholarships",
            PermissionKey::ManageScholarships => "manageScholarships",
        }
    }
}

impl std::fmt::Display for PermissionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-link capability flags. Absent keys deserialize to `false`, so a
/// stored document that predates a capability denies it by default.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PermissionSet {
    pub view_colleges: bool,
    pub manage_colleges: bool,
    pub view_tasks: bool,
    pub manage_tasks: bool,
    pub view_essays: bool,
    pub manage_essays: bool,
    pub view_documents: bool,
    pub manage_documents: bool,
    pub view_scholarships: bool,
    pub manage_scholarships: bool,
}

impl PermissionSet {
    /// Every capability granted. The counselor default.
    pub fn all() -> Self {
        Self {
            view_colleges: true,
            manage_colleges: true,
            view_tasks: true,
            manage_tasks: true,
            view_essays: true,
            manage_essays: true,
            view_documents: true,
            manage_documents: true,
            view_scholarships: true,
            manage_scholarships: true,
        }
    }

    /// Read-only access to every feature area. The parent default.
    pub fn view_only() -> Self {
        Self {
            view_colleges: true,
            view_tasks: true,
            view_essays: true,
            view_documents: true,
            view_scholarships: true,
            ..Self::default()
        }
    }

    pub fn defaults_for(relationship: Relationship) -> Self {
        match relationship {
            Relationship::Counselor => Self::all(),
            Relationship::Parent => Self::view_only(),
        }
    }

    pub fn get(&self, key: PermissionKey) -> bool {
        match key {
            PermissionKey::ViewColleges => self.view_colleges,
            PermissionKey::ManageColleges => self.manage_colleges,
            PermissionKey::ViewTasks => self.view_tasks,
            PermissionKey::ManageTasks => self.manage_tasks,
            PermissionKey::ViewEssays => self.view_essays,
            PermissionKey::ManageEssays => self.manage_essays,
            PermissionKey::ViewDocuments => self.view_documents,
            PermissionKey::ManageDocuments => self.manage_documents,
            PermissionKey::ViewScholarships => self.view_scholarships,
            PermissionKey::ManageScholarships => self.manage_scholarships,
        }
    }

    pub fn apply(&mut self, patch: &PermissionPatch) {
        macro_rules! merge {
            ($($field:ident),+) => {
                $(if let Some(value) = patch.$field {
                    self.$field = value;
                })+
            };
        }
        merge!(
            view_colleges,
            manage_colleges,
            view_tasks,
            manage_tasks,
            view_essays,
            manage_essays,
            view_documents,
            manage_documents,
            view_scholarships,
            manage_scholarships
        );
    }
}

/// Partial permission update. `deny_unknown_fields` rejects capability
/// names outside the closed set at the deserialization boundary.
#[derive(Debug, Clone, Copy, Deserialize, Default)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PermissionPatch {
    pub view_colleges: Option<bool>,
    pub manage_colleges: Option<bool>,
    pub view_tasks: Option<bool>,
    pub manage_tasks: Option<bool>,
    pub view_essays: Option<bool>,
    pub manage_essays: Option<bool>,
    pub view_documents: Option<bool>,
    pub manage_documents: Option<bool>,
    pub view_scholarships: Option<bool>,
    pub manage_scholarships: Option<bool>,
}

impl PermissionPatch {
    pub fn is_empty(&self) -> bool {
        self.view_colleges.is_none()
            && self.manage_colleges.is_none()
            && self.view_tasks.is_none()
            && self.manage_tasks.is_none()
            && self.view_essays.is_none()
            && self.manage_essays.is_none()
            && self.view_documents.is_none()
            && self.manage_documents.is_none()
            && self.view_scholarships.is_none()
            && self.manage_scholarships.is_none()
    }
}
