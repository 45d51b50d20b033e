//! Admin Authority Adapter

use crate::domain::Address;
use crate::ports::outbound::AdminAuthority;
use std::collections::HashSet;

/// Fixed set of admin addresses.
#[derive(Clone, Debug, Default)]
pub struct StaticAdmins {
    admins: HashSet<Address>,
}

impl StaticAdmins {
    /// Single admin.
    pub fn single(admin: Address) -> Self {
        Self {
            admins: HashSet::from([admin]),
        }
    }

    /// Several admins.
    pub fn new(admins: impl IntoIterator<Item = Address>) -> Self {
        Self {
            admins: admins.into_iter().collect(),
        }
    }
}

impl AdminAuthority for StaticAdmins {
    fn is_admin(&self, caller: &Address) -> bool {
        self.admins.contains(caller)
    }
}
