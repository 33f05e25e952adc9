/// Role-based access control
///
/// Every protected route and page declares an [`AllowList`]. The decision is
/// a pure function of the caller's role and that list, evaluated fresh on
/// each request; nothing is cached between requests.
///
/// | Area                                          | Allowed roles              |
/// |-----------------------------------------------|----------------------------|
/// | Dashboard, cylinder/gas-type reads, stock     | any authenticated role     |
/// | Cylinder create/assign, stock writes, supplies| admin, storekeeper         |
/// | Cylinder status changes                       | admin, storekeeper, technician |
/// | Invoices, reports, debug                      | admin                      |
///
/// # Example
///
/// ```
/// use medgas_shared::auth::authorization::{evaluate, Access, AllowList};
/// use medgas_shared::models::user::Role;
///
/// assert_eq!(evaluate(Role::Admin, &AllowList::ADMIN), Access::Allowed);
/// assert_eq!(evaluate(Role::Technician, &AllowList::STOCK), Access::Denied);
/// ```

use crate::models::user::Role;

/// Roles permitted to reach a route
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AllowList {
    /// Any authenticated user
    #[default]
    AnyRole,

    /// Only the listed roles
    Only(&'static [Role]),
}

impl AllowList {
    pub const ADMIN: AllowList = AllowList::Only(&[Role::Admin]);

    /// Stock and supply management
    pub const STOCK: AllowList = AllowList::Only(&[Role::Admin, Role::Storekeeper]);

    /// Cylinder status transitions
    pub const CYLINDER_STATUS: AllowList =
        AllowList::Only(&[Role::Admin, Role::Storekeeper, Role::Technician]);

    pub fn permits(&self, role: Role) -> bool {
        match self {
            AllowList::AnyRole => true,
            AllowList::Only(roles) => roles.contains(&role),
        }
    }
}

/// Outcome of an access decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied,
}

/// Decides whether `role` may pass `allow`
pub fn evaluate(role: Role, allow: &AllowList) -> Access {
    if allow.permits(role) {
        Access::Allowed
    } else {
        Access::Denied
    }
}
