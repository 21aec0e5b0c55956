/// Marks an entity as disabled.
///
/// A disabled entity also counts as disabled-in-hierarchy for all of its
/// descendants. Use [`set_enabled`](crate::hierarchy::set_enabled) and
/// [`is_enabled_in_hierarchy`](crate::hierarchy::is_enabled_in_hierarchy)
/// rather than touching the marker directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Disabled;

crate::component::impl_component!(Disabled);
