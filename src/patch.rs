//! Local reconciliation of a cached collection after a successful mutation.

use tracing::warn;

use crate::actor_framework::Entity;

/// What a successful create, update or delete did on the server.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionPatch<T> {
    Created(T),
    Updated { id: String, item: T },
    Removed(String),
}

/// Applies `patch` to `items` in place. Returns `false` when an update or
/// removal found no matching identifier, in which case `items` is untouched.
///
/// Creation appends; update replaces the matching item where it stands;
/// removal filters the identifier out. Order of the other items never changes.
pub fn apply_patch<T: Entity>(items: &mut Vec<T>, patch: CollectionPatch<T>) -> bool {
    match patch {
        CollectionPatch::Created(item) => {
            items.push(item);
            true
        }
        CollectionPatch::Updated { id, item } => {
            match items.iter_mut().find(|existing| existing.id() == Some(id.as_str())) {
                Some(slot) => {
                    *slot = item;
                    true
                }
                None => {
                    warn!(resource = T::RESOURCE, %id, "Updated item is not in the cached collection");
                    false
                }
            }
        }
        CollectionPatch::Removed(id) => {
            let before = items.len();
            items.retain(|existing| existing.id() != Some(id.as_str()));
            before != items.len()
        }
    }
}
