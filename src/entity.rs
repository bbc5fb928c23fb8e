//! Fleet entities that take part in join tables.
//!
//! Each handle carries the entity's identifier plus the cached identifiers of whatever it is
//! associated with. Wrapper methods mutate the association through the relation engine and
//! then reload the cache from the join table, so the cached list always reflects the store.

use crate::executor::JunctionError;
use crate::relatable::Relatable;
use crate::relation::{JoinTable, RelationStore};
use crate::transaction::TransactionalExecutor;

pub const HYPERVISORS_IPRANGES: JoinTable =
    JoinTable::new("hypervisors_ipranges", "hypervisor_id", "iprange_id");
pub const IPRANGES_NETWORKS: JoinTable =
    JoinTable::new("ipranges_networks", "iprange_id", "network_id");
pub const PROJECTS_USERS: JoinTable = JoinTable::new("projects_users", "project_id", "user_id");
pub const PROJECTS_PERMISSIONS: JoinTable =
    JoinTable::new("projects_permissions", "project_id", "permission_id");

/// Every join table the fleet schema defines.
pub const JOIN_TABLES: [JoinTable; 4] = [
    HYPERVISORS_IPRANGES,
    IPRANGES_NETWORKS,
    PROJECTS_USERS,
    PROJECTS_PERMISSIONS,
];

macro_rules! relatable_entity {
    (
        $(#[$meta:meta])*
        $name:ident, $column:literal { $($cache:ident),* }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $name {
            pub id: String,
            $(pub $cache: Vec<String>,)*
        }

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self {
                    id: id.into(),
                    ..Self::default()
                }
            }
        }

        impl Relatable for $name {
            fn identity(&self) -> &str {
                &self.id
            }

            fn owner_column(&self) -> &'static str {
                $column
            }
        }
    };
}

/// Generates load/add/remove/set/clear wrappers for one side of a join table.
macro_rules! relation_methods {
    (
        $owner:ident . $cache:ident : $related:ident via $table:ident {
            load: $load:ident,
            add: $add:ident,
            remove: $remove:ident,
            set: $set:ident,
            clear: $clear:ident $(,)?
        }
    ) => {
        impl $owner {
            #[doc = concat!("Reloads `", stringify!($cache), "` from `", stringify!($table), "`.")]
            pub fn $load<E: TransactionalExecutor>(
                &mut self,
                store: &RelationStore<E>,
            ) -> Result<&[String], JunctionError> {
                self.$cache = store
                    .list(&$table, &*self)?
                    .into_iter()
                    .map(|association| association.related_id)
                    .collect();
                Ok(&self.$cache)
            }

            pub fn $add<E: TransactionalExecutor>(
                &mut self,
                store: &RelationStore<E>,
                related: &$related,
            ) -> Result<&[String], JunctionError> {
                store.add(&$table, &*self, related)?;
                self.$load(store)
            }

            pub fn $remove<E: TransactionalExecutor>(
                &mut self,
                store: &RelationStore<E>,
                related: &$related,
            ) -> Result<&[String], JunctionError> {
                store.remove(&$table, &*self, related)?;
                self.$load(store)
            }

            pub fn $set<E: TransactionalExecutor>(
                &mut self,
                store: &RelationStore<E>,
                related: &[$related],
            ) -> Result<&[String], JunctionError> {
                store.set(&$table, &*self, related)?;
                self.$load(store)
            }

            pub fn $clear<E: TransactionalExecutor>(
                &mut self,
                store: &RelationStore<E>,
            ) -> Result<&[String], JunctionError> {
                store.clear(&$table, &*self)?;
                self.$load(store)
            }
        }
    };
}

relatable_entity!(
    /// A hypervisor host; owns its IP ranges.
    Hypervisor, "hypervisor_id" { ip_ranges }
);
relatable_entity!(
    /// An IP range handed out to hypervisors.
    IpRange, "iprange_id" {}
);
relatable_entity!(
    /// A network grouping IP ranges.
    Network, "network_id" { ip_ranges }
);
relatable_entity!(
    /// A project; owns its users and permissions.
    Project, "project_id" { users, permissions }
);
relatable_entity!(
    /// A user; sees the projects it belongs to from the other side of `projects_users`.
    User, "user_id" { projects }
);
relatable_entity!(Permission, "permission_id" {});

relation_methods!(Hypervisor.ip_ranges: IpRange via HYPERVISORS_IPRANGES {
    load: load_ip_ranges,
    add: add_ip_range,
    remove: remove_ip_range,
    set: set_ip_ranges,
    clear: clear_ip_ranges,
});

relation_methods!(Network.ip_ranges: IpRange via IPRANGES_NETWORKS {
    load: load_ip_ranges,
    add: add_ip_range,
    remove: remove_ip_range,
    set: set_ip_ranges,
    clear: clear_ip_ranges,
});

relation_methods!(Project.users: User via PROJECTS_USERS {
    load: load_users,
    add: add_user,
    remove: remove_user,
    set: set_users,
    clear: clear_users,
});

relation_methods!(Project.permissions: Permission via PROJECTS_PERMISSIONS {
    load: load_permissions,
    add: add_permission,
    remove: remove_permission,
    set: set_permissions,
    clear: clear_permissions,
});

relation_methods!(User.projects: Project via PROJECTS_USERS {
    load: load_projects,
    add: add_project,
    remove: remove_project,
    set: set_projects,
    clear: clear_projects,
});
