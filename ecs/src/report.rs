//! Outcome of an operation applied across a subtree.

use crate::{Entity, Error};

/// Entities an operation changed and the ones it failed on.
///
/// A failure on one entity never stops the walk; it is recorded here and
/// logged at `warn`.
#[derive(Debug, Default)]
pub struct TraversalReport {
    pub updated: Vec<Entity>,
    pub failures: Vec<(Entity, Error)>,
}

impl TraversalReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_update(&mut self, entity: Entity) {
        self.updated.push(entity);
    }

    pub fn record_failure(&mut self, entity: Entity, error: impl Into<Error>) {
        let error = error.into();
        log::warn!("{entity} skipped: {error}");
        self.failures.push((entity, error));
    }

    /// True when no entity failed.
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failure(&self, entity: Entity) -> Option<&Error> {
        self.failures
            .iter()
            .find(|(e, _)| *e == entity)
            .map(|(_, err)| err)
    }
}
