use std::collections::HashSet;

use serde_json::Value;

use crate::error::CategoryError;
use crate::gateway::GatewayEvent;

/// Claim holding the caller's groups in the gateway's verified token.
pub const GROUPS_CLAIM: &str = "cognito:groups";

/// Roles the gateway vouched for. Signatures are not re-verified here.
#[derive(Debug, Clone, Default)]
pub struct CallerRoles {
    roles: HashSet<String>,
}

impl CallerRoles {
    /// Reads the groups claim from the event's request context.
    ///
    /// The claim may be a bare string, which counts as a single role, or an
    /// array of strings. Any other JSON type yields no roles.
    pub fn from_event(event: &GatewayEvent) -> Result<Self, CategoryError> {
        let claims = event.claims()?;
        let groups = claims
            .get(GROUPS_CLAIM)
            .ok_or_else(|| CategoryError::MissingKey(format!("requestContext.authorizer.claims.{GROUPS_CLAIM}")))?;

        Ok(Self::from_claim(groups))
    }

    pub fn from_claim(groups: &Value) -> Self {
        let roles = match groups {
            Value::String(role) => HashSet::from([role.clone()]),
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect(),
            _ => HashSet::new(),
        };

        Self { roles }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    pub fn require(&self, role: &str) -> Result<(), CategoryError> {
        if self.has_role(role) {
            Ok(())
        } else {
            tracing::warn!(required = role, roles = ?self.roles, "Caller lacks required role");
            Err(CategoryError::Forbidden)
        }
    }
}
