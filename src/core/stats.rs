//! Counter snapshot untuk queue

/// Counter yang dicatat di bawah lock queue.
///
/// Pada titik diam (tidak ada push/pop yang sedang berjalan) berlaku
/// `pushed == popped + drained + len`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct QueueStats {
    /// Item yang diterima masuk ke storage
    pub pushed: u64,
    /// Item yang diserahkan ke consumer
    pub popped: u64,
    /// Item yang ditolak setelah shutdown lalu dibuang
    pub discarded: u64,
    /// Item sisa yang dibuang saat queue dihancurkan
    pub drained: u64,
}

impl QueueStats {
    /// Jumlah item yang masih berada di dalam queue menurut counter.
    ///
    /// Saturating: snapshot yang dirakit manual dengan
    /// `popped + drained > pushed` menghasilkan 0, bukan overflow.
    #[inline]
    pub fn in_flight(&self) -> u64 {
        self.pushed
            .saturating_sub(self.popped)
            .saturating_sub(self.drained)
    }

    /// Semua item yang pernah diserahkan ke `push`, diterima atau tidak
    #[inline]
    pub fn offered(&self) -> u64 {
        self.pushed + self.discarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accounting_helpers() {
        let stats = QueueStats {
            pushed: 10,
            popped: 6,
            discarded: 3,
            drained: 1,
        };

        assert_eq!(stats.in_flight(), 3);
        assert_eq!(stats.offered(), 13);
    }

    #[test]
    fn test_in_flight_saturates_on_inconsistent_counters() {
        let stats = QueueStats {
            pushed: 2,
            popped: 3,
            discarded: 0,
            drained: 1,
        };

        assert_eq!(stats.in_flight(), 0);
    }
}
