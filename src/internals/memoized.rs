use std::sync::OnceLock;

/// Loading state of a [`Memoized`] value.
#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Memo<'a, T> {
    /// Never loaded.
    Unloaded,

    /// Loaded once: will never change for the lifetime of the owning [`Memoized`].
    Loaded(&'a T),
}

/// A value computed at most once, on first use, and returned as-is from then on.
///
/// Initialization happens-before every read of the value: concurrent callers of
/// [`Memoized::get_or_load`] observe the same, single, loaded value.
///
/// NOTE: a memoized value is never refreshed. Whatever it was derived from can
/// change afterwards (e.g. a rebalance of a Consumer Group), and it won't be reflected.
#[derive(Debug)]
pub struct Memoized<T> {
    cell: OnceLock<T>,
}

impl<T> Default for Memoized<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Memoized<T> {
    pub fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Returns the memoized value, invoking `load` to produce it if this is the first use.
    pub fn get_or_load<F>(&self, load: F) -> &T
    where
        F: FnOnce() -> T,
    {
        self.cell.get_or_init(load)
    }

    /// Current [`Memo`] state, without triggering a load.
    #[cfg(test)]
    pub fn state(&self) -> Memo<'_, T> {
        match self.cell.get() {
            None => Memo::Unloaded,
            Some(v) => Memo::Loaded(v),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn loads_only_once() {
        let memo = Memoized::<Vec<u32>>::new();
        assert_eq!(memo.state(), Memo::Unloaded);

        let mut loads = 0;
        assert_eq!(
            memo.get_or_load(|| {
                loads += 1;
                vec![1, 2, 3]
            }),
            &vec![1, 2, 3]
        );
        assert_eq!(
            memo.get_or_load(|| {
                loads += 1;
                vec![4]
            }),
            &vec![1, 2, 3]
        );

        assert_eq!(loads, 1);
        assert_eq!(memo.state(), Memo::Loaded(&vec![1, 2, 3]));
    }
}
