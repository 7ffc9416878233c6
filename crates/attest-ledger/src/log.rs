/// Append-only arena: entries are pushed onto a growing log and referenced
/// by position, never rewritten.
///
/// The integrity guarantee of the surrounding ledgers depends on this type's
/// API shape: there is no method that mutates or removes an existing entry,
/// and no `&mut` accessor to one. `append` returns the entry's permanent
/// position.
#[derive(Clone, Debug)]
pub struct AppendOnlyLog<T> {
    entries: Vec<T>,
}

impl<T> AppendOnlyLog<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Insert a new entry and return its permanent position.
    pub fn append(&mut self, value: T) -> u64 {
        let pos = self.entries.len() as u64;
        self.entries.push(value);
        pos
    }

    /// Positional read. Positions never shift once assigned.
    pub fn get(&self, pos: u64) -> Option<&T> {
        self.entries.get(pos as usize)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for AppendOnlyLog<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_assigned_in_insertion_order() {
        let mut log = AppendOnlyLog::new();
        assert_eq!(log.append("a"), 0);
        assert_eq!(log.append("b"), 1);
        assert_eq!(log.append("c"), 2);
        assert_eq!(log.len(), 3);
    }

    #[test]
    fn positional_reads_are_stable_across_later_appends() {
        let mut log = AppendOnlyLog::new();
        let pos = log.append(10);
        log.append(20);
        log.append(30);
        assert_eq!(log.get(pos), Some(&10));
        assert_eq!(log.get(99), None);
    }

    #[test]
    fn iteration_preserves_insertion_order() {
        let mut log = AppendOnlyLog::new();
        for n in 0..5 {
            log.append(n);
        }
        let collected: Vec<i32> = log.iter().copied().collect();
        assert_eq!(collected, vec![0, 1, 2, 3, 4]);
    }
}
