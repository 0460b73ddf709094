use lazy_static::lazy_static;
use serde::Deserialize;
use serde::Serialize;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum Permission {
    All,
    ManageTeams,
    ViewTeams,
    ManageUsers,
    ManagePullRequests,
    ViewPullRequests,
    ViewStatistics,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin = 1,
    User = 2,
}

lazy_static! {
    pub static ref PERMISSIONS: Vec<(Role, Vec<Permission>)> = vec![
        (Role::Admin, vec![Permission::All]),
        (Role::User, vec![
            Permission::ManageTeams,
            Permission::ViewTeams,
            Permission::ManagePullRequests,
            Permission::ViewPullRequests,
            Permission::ViewStatistics,
        ]),
    ];
}

pub fn has_permission(role: Role, permission: &Permission) -> bool {
    PERMISSIONS
        .iter()
        .filter(|(r, _)| *r == role)
        .any(|(_, perms)| perms.contains(&Permission::All) || perms.contains(permission))
}
