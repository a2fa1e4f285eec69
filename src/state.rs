/// The swappable table reference.
///
/// A [`TableCell`] is the only handle to the live table. Readers take a
/// snapshot (an `Arc<Table>`) and query it without holding any lock; a reload
/// builds a new table off to the side and swaps it in. A snapshot taken before
/// the swap keeps reading the old table until it is dropped.
use crate::error::NotReadyError;
use crate::table::Table;
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Default)]
struct Slot {
    table: Option<Arc<Table>>,
    generation: u64,
}

/// Lifecycle: unbuilt until the first [`install`](TableCell::install), then
/// built. Each install bumps the generation.
#[derive(Default)]
pub struct TableCell {
    slot: RwLock<Slot>,
}

impl TableCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current table, or `NotReadyError::Table` before the first install.
    pub fn snapshot(&self) -> Result<Arc<Table>, NotReadyError> {
        self.slot.read().table.clone().ok_or(NotReadyError::Table)
    }

    /// Replace the current table. Returns the new generation.
    pub fn install(&self, table: Table) -> u64 {
        let table = Arc::new(table);
        let mut slot = self.slot.write();
        slot.table = Some(table);
        slot.generation += 1;
        slot.generation
    }

    pub fn is_built(&self) -> bool {
        self.slot.read().table.is_some()
    }

    /// Number of installs so far; 0 while unbuilt.
    pub fn generation(&self) -> u64 {
        self.slot.read().generation
    }
}

impl std::fmt::Debug for TableCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = self.slot.read();
        write!(
            f,
            "TableCell {{ generation: {}, table: {:?} }}",
            slot.generation, slot.table
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TableBuilder;
    use crate::source::tests::record;

    fn table_with_rows(n: usize) -> Table {
        TableBuilder::new("t").build((0..n).map(|_| record(&[("region", "Seoul")])))
    }

    #[test]
    fn test_unbuilt_cell_is_not_ready() {
        let cell = TableCell::new();
        assert!(!cell.is_built());
        assert_eq!(cell.generation(), 0);
        assert_eq!(cell.snapshot().unwrap_err(), NotReadyError::Table);
    }

    #[test]
    fn test_install_and_snapshot() {
        let cell = TableCell::new();
        assert_eq!(cell.install(table_with_rows(3)), 1);
        assert!(cell.is_built());
        assert_eq!(cell.snapshot().unwrap().len(), 3);
    }

    #[test]
    fn test_old_snapshot_survives_swap() {
        let cell = TableCell::new();
        cell.install(table_with_rows(2));
        let before = cell.snapshot().unwrap();

        assert_eq!(cell.install(table_with_rows(5)), 2);

        assert_eq!(before.len(), 2);
        assert_eq!(cell.snapshot().unwrap().len(), 5);
    }

    #[test]
    fn test_readers_never_see_partial_table() {
        let cell = TableCell::new();
        cell.install(table_with_rows(10));

        std::thread::scope(|scope| {
            scope.spawn(|| {
                for n in [20, 30, 40] {
                    cell.install(table_with_rows(n));
                }
            });
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..100 {
                        let len = cell.snapshot().unwrap().len();
                        assert!([10, 20, 30, 40].contains(&len));
                    }
                });
            }
        });

        assert_eq!(cell.generation(), 4);
    }
}
