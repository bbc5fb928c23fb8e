//! The identity contract an entity satisfies to take part in a join table.

/// An entity that can sit on one side of a join table.
///
/// Implementors report a stable, non-empty identifier and the join-table column that stores
/// it. The column is a fixed per-type constant; it is templated into statement text, while
/// the identifier is always bound as a parameter.
///
/// # Example
///
/// ```
/// use junction::Relatable;
///
/// struct Flavor {
///     id: String,
/// }
///
/// impl Relatable for Flavor {
///     fn identity(&self) -> &str {
///         &self.id
///     }
///
///     fn owner_column(&self) -> &'static str {
///         "flavor_id"
///     }
/// }
///
/// let flavor = Flavor { id: "f-small".to_string() };
/// assert_eq!(flavor.owner_column(), "flavor_id");
/// ```
pub trait Relatable {
    /// Stable identifier of this entity, e.g. a UUID string. Must not be empty.
    fn identity(&self) -> &str;

    /// Column holding this entity's identifier inside a join table.
    fn owner_column(&self) -> &'static str;
}

impl<T: Relatable + ?Sized> Relatable for &T {
    fn identity(&self) -> &str {
        (**self).identity()
    }

    fn owner_column(&self) -> &'static str {
        (**self).owner_column()
    }
}

impl<T: Relatable + ?Sized> Relatable for Box<T> {
    fn identity(&self) -> &str {
        (**self).identity()
    }

    fn owner_column(&self) -> &'static str {
        (**self).owner_column()
    }
}
