use crate::core::types::ComponentId;
use indexmap::IndexSet;

/// Ordered set of selected components.
///
/// Order is the order of selection; deselecting reports the index the
/// component held so an undo can put it back in the same place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selections {
    items: IndexSet<ComponentId>,
}

impl Selections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component, returning false if it was already selected
    pub fn select(&mut self, id: ComponentId) -> bool {
        self.items.insert(id)
    }

    /// Remove a component, returning the position it held
    pub fn deselect(&mut self, id: ComponentId) -> Option<usize> {
        self.items.shift_remove_full(&id).map(|(index, _)| index)
    }

    /// Put a component back at a given position in the selection order
    pub fn restore(&mut self, id: ComponentId, index: usize) {
        let index = index.min(self.items.len());
        self.items.shift_insert(index, id);
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.items.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ComponentId> {
        self.items.iter()
    }

    /// Selected components in selection order
    pub fn ids(&self) -> Vec<ComponentId> {
        self.items.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deselect_and_restore_keep_order() {
        let mut selections = Selections::new();
        for raw in 0..3 {
            assert!(selections.select(ComponentId::new(raw)));
        }
        assert!(!selections.select(ComponentId::new(1)));

        let index = selections.deselect(ComponentId::new(1)).unwrap();
        assert_eq!(index, 1);
        assert_eq!(selections.ids(), vec![ComponentId::new(0), ComponentId::new(2)]);

        selections.restore(ComponentId::new(1), index);
        assert_eq!(
            selections.ids(),
            vec![ComponentId::new(0), ComponentId::new(1), ComponentId::new(2)]
        );
        assert_eq!(selections.deselect(ComponentId::new(9)), None);
    }
}
