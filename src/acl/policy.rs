use std::collections::HashMap;

use thiserror::Error;

use super::template::{path_params, placeholders, substitute};
use super::tree::{find_permission, PermissionTree};

/// Permission that bypasses every per-route check
pub const SUPER_ADMIN: &str = "admin.superadmin";

/// Permission requirements declared on a route
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AclConfig {
    /// Permission templates, `{{param}}` placeholders resolve from path parameters
    pub permissions: Vec<String>,
    /// Require every permission instead of any one of them
    pub strict: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AclDecision {
    Allow,
    /// No authenticated principal for a route with requirements
    Unauthorized,
    /// Authenticated, but the required grants are missing
    Forbidden,
}

impl AclDecision {
    pub fn is_allowed(self) -> bool {
        matches!(self, AclDecision::Allow)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RouteError {
    #[error("Route {path} uses placeholder '{{{{{param}}}}}' but declares no such path parameter")]
    UnknownPathParam { path: String, param: String },
}

impl AclConfig {
    /// Any-of requirement
    pub fn any<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            permissions: permissions.into_iter().map(Into::into).collect(),
            strict: false,
        }
    }

    /// All-of requirement
    pub fn all<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            strict: true,
            ..Self::any(permissions)
        }
    }

    /// Check that every placeholder names a path parameter of `path`
    pub fn validate_for_path(&self, path: &str) -> Result<(), RouteError> {
        let declared = path_params(path);
        for template in &self.permissions {
            if let Some(param) = placeholders(template)
                .into_iter()
                .find(|name| !declared.contains(name))
            {
                return Err(RouteError::UnknownPathParam {
                    path: path.to_string(),
                    param,
                });
            }
        }
        Ok(())
    }

    /// Templates with path parameters filled in
    pub fn required_permissions(&self, params: &HashMap<String, String>) -> Vec<String> {
        self.permissions
            .iter()
            .map(|template| substitute(template, params))
            .collect()
    }
}

/// Full-access check done before looking at route requirements
pub fn is_super_admin(tree: &PermissionTree) -> bool {
    tree.has_wildcard() || find_permission(tree, SUPER_ADMIN)
}

/// Decide access for one request.
///
/// `granted` is `None` for an anonymous caller.
pub fn evaluate(
    acl: &AclConfig,
    granted: Option<&[String]>,
    params: &HashMap<String, String>,
) -> AclDecision {
    if acl.permissions.is_empty() {
        return AclDecision::Allow;
    }

    let Some(granted) = granted else {
        return AclDecision::Unauthorized;
    };

    let tree = PermissionTree::from_iter(granted);
    if is_super_admin(&tree) {
        return AclDecision::Allow;
    }

    let required = acl.required_permissions(params);
    let found = required
        .iter()
        .filter(|permission| find_permission(&tree, permission))
        .count();

    let allowed = if acl.strict {
        found == required.len()
    } else {
        found > 0
    };

    if allowed {
        AclDecision::Allow
    } else {
        AclDecision::Forbidden
    }
}
