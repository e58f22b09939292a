use crate::{
    domain::Role,
    error::{AppError, Result},
};

/// Protected operator actions. Each one maps to the roles allowed to perform it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ManageCourses,
    DeleteCourses,
    ViewPayments,
    ViewEnrollments,
    ManageEnrollments,
    ViewConsultations,
    ManageConsultations,
    ViewLeads,
    ManageLeads,
    ManageBlog,
    ViewApplications,
    ManageApplications,
    ViewDashboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleSet {
    admin: bool,
    developer: bool,
}

impl RoleSet {
    pub const ADMIN_ONLY: RoleSet = RoleSet { admin: true, developer: false };
    pub const STAFF: RoleSet = RoleSet { admin: true, developer: true };

    pub fn of(roles: &[Role]) -> Self {
        roles.iter().fold(RoleSet::default(), |mut set, role| {
            match role {
                Role::Admin => set.admin = true,
                Role::Developer => set.developer = true,
            }
            set
        })
    }

    pub fn contains(&self, role: Role) -> bool {
        match role {
            Role::Admin => self.admin,
            Role::Developer => self.developer,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.admin && !self.developer
    }
}

impl Capability {
    pub fn required_roles(&self) -> RoleSet {
        match self {
            Capability::ManageCourses => RoleSet::STAFF,
            Capability::DeleteCourses => RoleSet::ADMIN_ONLY,
            Capability::ViewPayments => RoleSet::ADMIN_ONLY,
            Capability::ViewEnrollments => RoleSet::STAFF,
            Capability::ManageEnrollments => RoleSet::ADMIN_ONLY,
            Capability::ViewConsultations => RoleSet::STAFF,
            Capability::ManageConsultations => RoleSet::ADMIN_ONLY,
            Capability::ViewLeads => RoleSet::STAFF,
            Capability::ManageLeads => RoleSet::ADMIN_ONLY,
            Capability::ManageBlog => RoleSet::STAFF,
            Capability::ViewApplications => RoleSet::ADMIN_ONLY,
            Capability::ManageApplications => RoleSet::ADMIN_ONLY,
            Capability::ViewDashboard => RoleSet::STAFF,
        }
    }
}

/// An operator without a role is always refused. An empty role set means any
/// assigned role passes.
pub fn authorize(role: Option<Role>, required: RoleSet) -> Result<()> {
    let Some(role) = role else {
        return Err(AppError::Forbidden("Role not assigned".to_string()));
    };

    if required.is_empty() || required.contains(role) {
        Ok(())
    } else {
        Err(AppError::Forbidden("Forbidden: insufficient role".to_string()))
    }
}
