//! Grouping of entities that share exactly the same position.

use std::sync::Arc;

use ahash::{HashMap, HashMapExt};
use friendmap_types::geo::impls::GeoPoint2d;
use friendmap_types::geo::GeoPoint;

use crate::entity::Entity;

/// All entities located at one exact position.
///
/// A location always contains at least one entity, and every entity in it has the location's position.
#[derive(Debug)]
pub struct Location<E> {
    position: GeoPoint2d,
    entities: Vec<Arc<E>>,
}

impl<E> Clone for Location<E> {
    fn clone(&self) -> Self {
        Self {
            position: self.position,
            entities: self.entities.clone(),
        }
    }
}

impl<E: Entity> Location<E> {
    fn new(first: Arc<E>) -> Self {
        Self {
            position: first.position(),
            entities: vec![first],
        }
    }
}

impl<E> Location<E> {
    /// Position shared by all the entities.
    pub fn position(&self) -> GeoPoint2d {
        self.position
    }

    /// Entities in the order they were given to [`group_entities`].
    pub fn entities(&self) -> &[Arc<E>] {
        &self.entities
    }

    /// Number of entities at the location.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Always false for locations created by [`group_entities`].
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// First entity of the location.
    pub fn first_entity(&self) -> Option<&Arc<E>> {
        self.entities.first()
    }
}

/// Key identifying a position by the exact values of its coordinates.
///
/// `-0.0` and `0.0` compare equal as numbers, so they are normalized to the same key.
fn position_key(position: &GeoPoint2d) -> (u64, u64) {
    ((position.lat() + 0.0).to_bits(), (position.lon() + 0.0).to_bits())
}

/// Partitions the entities into locations.
///
/// Two entities end up in the same location if and only if their coordinates are exactly equal. Locations are
/// returned in the order their positions first appear in the input.
pub fn group_entities<E: Entity>(entities: &[Arc<E>]) -> Vec<Location<E>> {
    let mut index_by_position: HashMap<(u64, u64), usize> = HashMap::new();
    let mut locations: Vec<Location<E>> = Vec::new();

    for entity in entities {
        let key = position_key(&entity.position());
        match index_by_position.get(&key) {
            Some(&index) => locations[index].entities.push(entity.clone()),
            None => {
                index_by_position.insert(key, locations.len());
                locations.push(Location::new(entity.clone()));
            }
        }
    }

    locations
}
