//! The single access decision for every resource route.
//!
//! Rules, in precedence order:
//! 1. Admins may edit and delete anything.
//! 2. Owners may read, edit and delete their own resources.
//! 3. Editors may edit (not delete) any recipe. Comments are not covered.
//! 4. Anyone, including anonymous callers, may read public resources.
//! 5. Everything else is denied.
//!
//! Reading follows editing: whoever may edit a private resource may also read it.

use cocina_db::db::enums::Role;
use cocina_db::model::comment::Comment;
use cocina_db::model::recipe::Recipe;
use cocina_db::model::user::User;

use crate::error::{ServiceError, ServiceResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Edit,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Recipe,
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    pub kind: ResourceKind,
    pub owner_id: i32,
    pub visibility: Visibility,
}

impl Resource {
    #[must_use]
    pub const fn recipe(recipe: &Recipe) -> Self {
        Self {
            kind: ResourceKind::Recipe,
            owner_id: recipe.author_id,
            visibility: if recipe.is_public {
                Visibility::Public
            } else {
                Visibility::Private
            },
        }
    }

    /// A comment is as visible as the recipe it belongs to.
    #[must_use]
    pub const fn comment(comment: &Comment, parent: &Recipe) -> Self {
        Self {
            kind: ResourceKind::Comment,
            owner_id: comment.author_id,
            visibility: Self::recipe(parent).visibility,
        }
    }
}

/// The acting identity as far as the policy is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: i32,
    pub role: Role,
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            role: user.role,
        }
    }
}

fn can_modify(principal: Principal, resource: &Resource, action: Action) -> bool {
    if principal.role == Role::Admin || principal.id == resource.owner_id {
        return true;
    }
    principal.role == Role::Editor
        && resource.kind == ResourceKind::Recipe
        && action == Action::Edit
}

/// ## Summary
/// Decides whether `subject` (or an anonymous caller when `None`) may perform
/// `action` on `resource`. Pure; performs no I/O.
#[must_use]
pub fn can_access(subject: Option<Principal>, resource: &Resource, action: Action) -> bool {
    match action {
        Action::Edit | Action::Delete => {
            subject.is_some_and(|principal| can_modify(principal, resource, action))
        }
        Action::Read => {
            resource.visibility == Visibility::Public
                || subject.is_some_and(|principal| can_modify(principal, resource, Action::Edit))
        }
    }
}

/// ## Summary
/// Checks access for a possibly anonymous user.
///
/// ## Errors
/// Returns `Forbidden("Access denied")` when the policy denies the action.
pub fn authorize(user: Option<&User>, resource: &Resource, action: Action) -> ServiceResult<()> {
    if can_access(user.map(Principal::from), resource, action) {
        Ok(())
    } else {
        tracing::debug!(
            user_id = user.map(|u| u.id),
            owner_id = resource.owner_id,
            ?action,
            kind = ?resource.kind,
            "Access denied"
        );
        Err(ServiceError::Forbidden("Access denied"))
    }
}
