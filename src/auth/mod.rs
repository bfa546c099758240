pub mod identity;
pub mod session;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub use identity::{IdentityClient, IdentityError, IdentityProvider, SignedIn};
pub use session::SessionDecoder;

/// Role claim value that grants administrator access on its own.
pub const ADMIN_ROLE: &str = "admin";

/// Authenticated identity attached to a request by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub email: Option<String>,
    /// Role claim from the provider's server-controlled metadata
    pub role: Option<String>,
}

/// Administrator determination: role claim first, then the configured email allow-list.
#[derive(Debug, Clone, Default)]
pub struct AdminPolicy {
    emails: HashSet<String>,
}

impl AdminPolicy {
    /// Parse a comma-separated allow-list. Entries are trimmed and lower-cased, blanks dropped.
    pub fn from_csv(raw: &str) -> Self {
        let emails = raw
            .split(',')
            .map(|email| email.trim().to_lowercase())
            .filter(|email| !email.is_empty())
            .collect();
        Self { emails }
    }

    pub fn is_admin(&self, principal: Option<&Principal>) -> bool {
        let Some(principal) = principal else {
            return false;
        };

        if principal.role.as_deref() == Some(ADMIN_ROLE) {
            return true;
        }

        match principal.email.as_deref() {
            Some(email) if !email.is_empty() => self.emails.contains(&email.to_lowercase()),
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}
