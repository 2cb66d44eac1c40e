use uuid::Uuid;

use crate::models::account::Role;
use crate::models::auth::{AuthError, CurrentAccount};

/// Explicit "this resource has an owner" capability — replaces any dynamic
/// attribute probing. `None` means no account owns the resource (e.g. an
/// offer whose creator was deleted).
pub trait Ownable {
    fn owner_id(&self) -> Option<Uuid>;
}

impl Ownable for crate::models::account::Account {
    fn owner_id(&self) -> Option<Uuid> {
        Some(self.id)
    }
}

impl Ownable for crate::models::job::JobOffer {
    fn owner_id(&self) -> Option<Uuid> {
        self.created_by
    }
}

impl Ownable for crate::models::application::Application {
    fn owner_id(&self) -> Option<Uuid> {
        Some(self.candidate_id)
    }
}

/// True if the requester is an admin, or owns the resource.
pub fn is_owner_or_admin(actor: &CurrentAccount, resource: &impl Ownable) -> bool {
    actor.role.is_admin() || resource.owner_id() == Some(actor.id())
}

/// Owning a resource grants write access to ordinary fields only: any role
/// change in the payload requires admin rights, ownership notwithstanding.
pub fn require_role_change_allowed(
    actor: &CurrentAccount,
    requested: Option<Role>,
) -> Result<(), AuthError> {
    if requested.is_some() && !actor.role.is_admin() {
        return Err(AuthError::PermissionDenied);
    }
    Ok(())
}

pub fn require_admin(actor: &CurrentAccount) -> Result<(), AuthError> {
    if actor.role.is_admin() {
        Ok(())
    } else {
        Err(AuthError::PermissionDenied)
    }
}

pub fn require_superadmin(actor: &CurrentAccount) -> Result<(), AuthError> {
    if actor.role.is_superadmin() {
        Ok(())
    } else {
        Err(AuthError::PermissionDenied)
    }
}

pub fn require_candidate(actor: &CurrentAccount) -> Result<(), AuthError> {
    if actor.role.is_candidate() {
        Ok(())
    } else {
        Err(AuthError::PermissionDenied)
    }
}

pub fn require_owner_or_admin(
    actor: &CurrentAccount,
    resource: &impl Ownable,
) -> Result<(), AuthError> {
    if is_owner_or_admin(actor, resource) {
        Ok(())
    } else {
        Err(AuthError::PermissionDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::account::{Account, Role};
    use chrono::Utc;

    struct Resource(Option<Uuid>);

    impl Ownable for Resource {
        fn owner_id(&self) -> Option<Uuid> {
            self.0
        }
    }

    fn actor(role: &str) -> CurrentAccount {
        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            email: "a@example.com".into(),
            password_hash: "x".into(),
            first_name: "A".into(),
            last_name: "B".into(),
            phone: "".into(),
            role: role.into(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let parsed = account.role();
        CurrentAccount {
            account,
            role: parsed,
            token: "t".into(),
        }
    }

    #[test]
    fn owner_passes() {
        let candidate = actor("candidate");
        let own = Resource(Some(candidate.id()));
        assert!(is_owner_or_admin(&candidate, &own));
    }

    #[test]
    fn stranger_is_rejected() {
        let candidate = actor("candidate");
        let other = Resource(Some(Uuid::new_v4()));
        assert!(!is_owner_or_admin(&candidate, &other));
        assert!(require_owner_or_admin(&candidate, &other).is_err());
    }

    #[test]
    fn admin_passes_regardless_of_owner() {
        let admin = actor("admin");
        let superadmin = actor("superadmin");
        let other = Resource(Some(Uuid::new_v4()));
        let orphan = Resource(None);
        assert!(is_owner_or_admin(&admin, &other));
        assert!(is_owner_or_admin(&superadmin, &other));
        assert!(is_owner_or_admin(&admin, &orphan));
    }

    #[test]
    fn ownerless_resource_rejects_non_admin() {
        let candidate = actor("candidate");
        let orphan = Resource(None);
        assert!(!is_owner_or_admin(&candidate, &orphan));
    }

    #[test]
    fn role_change_requires_admin() {
        let candidate = actor("candidate");
        let admin = actor("admin");

        // An owner who is not admin may never touch the role field
        assert!(require_role_change_allowed(&candidate, Some(Role::Admin)).is_err());
        assert!(require_role_change_allowed(&candidate, Some(Role::Candidate)).is_err());
        assert!(require_role_change_allowed(&candidate, None).is_ok());
        assert!(require_role_change_allowed(&admin, Some(Role::Admin)).is_ok());
        assert!(require_role_change_allowed(&admin, None).is_ok());
    }

    #[test]
    fn role_requirements() {
        let candidate = actor("candidate");
        let admin = actor("admin");
        let superadmin = actor("superadmin");

        assert!(require_candidate(&candidate).is_ok());
        assert!(require_candidate(&admin).is_err());
        assert!(require_admin(&admin).is_ok());
        assert!(require_admin(&superadmin).is_ok());
        assert!(require_admin(&candidate).is_err());
        assert!(require_superadmin(&superadmin).is_ok());
        assert!(require_superadmin(&admin).is_err());
    }
}
