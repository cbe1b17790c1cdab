// Demo data: a juice storage and a beer storage.

use crate::inventory::{Inventory, OverflowPolicy};
use crate::registry::{StorageId, StorageRegistry};
use crate::storage::Storage;

pub fn juice() -> Storage {
    Storage::with_capacity(100.0)
}

pub fn beer() -> Storage {
    Storage::new(100.0, 20.2)
}

/// Register the demo storages; returns their ids
pub fn seed(registry: &mut StorageRegistry) -> (StorageId, StorageId) {
    let juice_id = registry.add("Juice", juice());
    let beer_id = registry.add("Beer", beer());
    (juice_id, beer_id)
}

pub fn demo_inventory(policy: OverflowPolicy) -> Inventory {
    let mut registry = StorageRegistry::new();
    seed(&mut registry);
    Inventory::with_registry(registry, policy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed() {
        let inventory = demo_inventory(OverflowPolicy::Clamp);
        let entries = inventory.registry().list_all();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[&1].name, "Juice");
        assert_eq!(entries[&1].storage.balance(), 0.0);
        assert_eq!(entries[&2].name, "Beer");
        assert_eq!(entries[&2].storage.balance(), 20.2);
    }
}
