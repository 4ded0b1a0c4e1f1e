//! Recycling cache for realized cell instances.
//!
//! Instances are keyed by item id. When the visible window moves, ids that
//! left it are queued as reusable (their instances stay allocated and
//! attached); ids that entered it take the first queued instance of a matching
//! view type, or a freshly created one.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use tracing::debug;

use super::backend::{CellAdapter, ViewType};
use crate::layout::{PackedGrid, VisibleWindow};

/// Ids whose realization state must change for a new visible window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibilityDiff<K> {
    /// Realized ids no longer visible, in definition order
    pub retired: Vec<K>,
    /// Visible ids without an instance, in definition order
    pub realized: Vec<K>,
}

impl<K> Default for VisibilityDiff<K> {
    fn default() -> Self {
        Self {
            retired: Vec::new(),
            realized: Vec::new(),
        }
    }
}

impl<K> VisibilityDiff<K> {
    pub fn is_empty(&self) -> bool {
        self.retired.is_empty() && self.realized.is_empty()
    }
}

/// Where an acquired instance came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acquired<K> {
    Created,
    /// Taken over from a retired id
    Reused(K),
}

struct CachedCell<I> {
    instance: I,
    view_type: ViewType,
}

/// Live instances by id plus the queue of retired ids open for reuse.
///
/// Every reusable id has an instance; an id is never both visible and reusable.
pub struct RecyclingCache<K, I> {
    cells: HashMap<K, CachedCell<I>>,
    reusable: Vec<K>,
}

impl<K, I> Default for RecyclingCache<K, I> {
    fn default() -> Self {
        Self {
            cells: HashMap::new(),
            reusable: Vec::new(),
        }
    }
}

impl<K, I> RecyclingCache<K, I>
where
    K: Clone + Eq + Hash + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of realized ids (visible or retired)
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, id: &K) -> bool {
        self.cells.contains_key(id)
    }

    pub fn get(&self, id: &K) -> Option<&I> {
        self.cells.get(id).map(|cell| &cell.instance)
    }

    /// Retired ids in reuse order
    pub fn reusable_ids(&self) -> &[K] {
        &self.reusable
    }

    /// Realized ids that are not queued for reuse
    pub fn active_ids(&self) -> impl Iterator<Item = &K> + '_ {
        self.cells.keys().filter(|id| !self.reusable.contains(*id))
    }

    /// Compare the realized set against the cells intersecting `window`.
    pub fn plan(&self, grid: &PackedGrid<K>, window: VisibleWindow) -> VisibilityDiff<K> {
        let mut diff = VisibilityDiff::default();
        for cell in grid.iter() {
            let realized = self.cells.contains_key(&cell.id);
            match (window.intersects(cell), realized) {
                (true, false) => diff.realized.push(cell.id.clone()),
                (false, true) => diff.retired.push(cell.id.clone()),
                _ => {}
            }
        }
        diff
    }

    /// Replace the reuse queue with the realized ids in `retired`.
    pub fn retire(&mut self, retired: &[K]) {
        self.reusable = retired
            .iter()
            .filter(|id| self.cells.contains_key(*id))
            .cloned()
            .collect();
    }

    /// Detach the first queued instance created for `view_type`.
    pub fn take_reusable(&mut self, view_type: ViewType) -> Option<(K, I)> {
        let pos = self.reusable.iter().position(|id| {
            self.cells
                .get(id)
                .is_some_and(|cell| cell.view_type == view_type)
        })?;
        let id = self.reusable.remove(pos);
        let cell = self.cells.remove(&id)?;
        Some((id, cell.instance))
    }

    /// Get an instance for `id`, reusing a retired one of the same view type
    /// when possible, and bind it to `id`.
    ///
    /// The instance is not registered; hand it back with [`Self::insert`].
    pub fn acquire<A>(&mut self, id: &K, adapter: &mut A) -> (I, ViewType, Acquired<K>)
    where
        A: CellAdapter<K, Instance = I>,
    {
        let view_type = adapter.view_type(id);
        let (mut instance, origin) = match self.take_reusable(view_type) {
            Some((old, instance)) => {
                debug!(
                    from = ?old,
                    to = ?id,
                    reusable = self.reusable.len(),
                    "reuse cell instance"
                );
                (instance, Acquired::Reused(old))
            }
            None => {
                debug!(id = ?id, reusable = self.reusable.len(), "create cell instance");
                (adapter.create_instance(view_type), Acquired::Created)
            }
        };
        adapter.bind(&mut instance, id);
        (instance, view_type, origin)
    }

    /// Register `instance` under `id`, returning any instance it displaced.
    pub fn insert(&mut self, id: K, instance: I, view_type: ViewType) -> Option<I> {
        self.reusable.retain(|queued| *queued != id);
        self.cells
            .insert(
                id,
                CachedCell {
                    instance,
                    view_type,
                },
            )
            .map(|previous| previous.instance)
    }

    /// Remove every instance and empty the reuse queue.
    pub fn drain(&mut self) -> impl Iterator<Item = (K, I)> + '_ {
        self.reusable.clear();
        self.cells.drain().map(|(id, cell)| (id, cell.instance))
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::layout::pack;
    use crate::types::CellDefinition;

    /// Instances are sequence numbers; view type is the id's parity.
    #[derive(Default)]
    struct ParityAdapter {
        created: u32,
        bound: Vec<(u32, u32)>,
    }

    impl CellAdapter<u32> for ParityAdapter {
        type Instance = u32;

        fn view_type(&self, id: &u32) -> ViewType {
            ViewType(id % 2)
        }

        fn create_instance(&mut self, _view_type: ViewType) -> u32 {
            self.created += 1;
            self.created
        }

        fn bind(&mut self, instance: &mut u32, id: &u32) {
            self.bound.push((*instance, *id));
        }
    }

    fn column(n: u32) -> PackedGrid<u32> {
        let defs: Vec<_> = (0..n).map(|id| CellDefinition::new(id, 1, 1)).collect();
        pack(1, &defs).unwrap()
    }

    fn realize(cache: &mut RecyclingCache<u32, u32>, adapter: &mut ParityAdapter, ids: &[u32]) {
        for id in ids {
            let (instance, view_type, _) = cache.acquire(id, adapter);
            cache.insert(*id, instance, view_type);
        }
    }

    #[test]
    fn test_plan_from_empty_realizes_window() {
        let grid = column(10);
        let cache: RecyclingCache<u32, u32> = RecyclingCache::new();
        let diff = cache.plan(&grid, VisibleWindow::new(0, 2));
        assert_eq!(diff.realized, vec![0, 1, 2]);
        assert!(diff.retired.is_empty());
    }

    #[test]
    fn test_reuse_respects_view_type() {
        let grid = column(10);
        let mut cache = RecyclingCache::new();
        let mut adapter = ParityAdapter::default();
        realize(&mut cache, &mut adapter, &[0, 1, 2]);
        assert_eq!(adapter.created, 3);

        // Window moves to rows 4..=5; cell 3 ends on row 4 and still counts as visible
        let diff = cache.plan(&grid, VisibleWindow::new(4, 5));
        assert_eq!(diff.retired, vec![0, 1, 2]);
        assert_eq!(diff.realized, vec![3, 4, 5]);
        cache.retire(&diff.retired);
        assert_eq!(cache.reusable_ids(), &[0, 1, 2]);

        let (_, _, origin) = cache.acquire(&3, &mut adapter);
        assert_eq!(origin, Acquired::Reused(1), "odd id takes the odd instance");
        let (_, _, origin) = cache.acquire(&4, &mut adapter);
        assert_eq!(origin, Acquired::Reused(0));
        let (_, _, origin) = cache.acquire(&5, &mut adapter);
        assert_eq!(origin, Acquired::Created, "no odd instance left");
        assert_eq!(cache.reusable_ids(), &[2]);
        assert!(!cache.contains(&0));
        assert!(!cache.contains(&1));
    }

    #[test]
    fn test_every_acquire_binds() {
        let mut cache = RecyclingCache::new();
        let mut adapter = ParityAdapter::default();
        realize(&mut cache, &mut adapter, &[0]);
        cache.retire(&[0]);
        let (instance, _, _) = cache.acquire(&2, &mut adapter);

        assert_eq!(instance, 1);
        assert_eq!(adapter.bound, vec![(1, 0), (1, 2)]);
    }

    #[test]
    fn test_retire_ignores_unrealized_ids() {
        let mut cache: RecyclingCache<u32, u32> = RecyclingCache::new();
        let mut adapter = ParityAdapter::default();
        realize(&mut cache, &mut adapter, &[0, 1]);
        cache.retire(&[1, 7]);
        assert_eq!(cache.reusable_ids(), &[1]);
        assert_eq!(cache.active_ids().copied().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_drain_empties_everything() {
        let mut cache = RecyclingCache::new();
        let mut adapter = ParityAdapter::default();
        realize(&mut cache, &mut adapter, &[0, 1, 2]);
        cache.retire(&[0]);

        let mut drained: Vec<u32> = cache.drain().map(|(id, _)| id).collect();
        drained.sort_unstable();
        assert_eq!(drained, vec![0, 1, 2]);
        assert!(cache.is_empty());
        assert!(cache.reusable_ids().is_empty());
    }
}
