//! Bounded Blocking Queue untuk hand-off item antar thread
//!
//! Satu Mutex melindungi seluruh state (storage, flag shutdown, counter),
//! dua Condvar untuk blocking:
//! - `item_available`: consumer menunggu saat queue kosong
//! - `slot_available`: producer menunggu saat queue penuh
//!
//! Push/pop membangunkan tepat satu waiter di sisi lawan. Shutdown
//! membangunkan semua waiter di kedua sisi. Setiap wait berada di dalam
//! loop yang mengecek ulang predikat.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, trace};

use super::disposer::{Disposer, DropDisposer};
use super::error::QueueError;
use super::ring_buffer::RingBuffer;
use super::stats::QueueStats;

/// State yang dilindungi lock
struct State<T> {
    storage: RingBuffer<T>,
    shutting_down: bool,
    stats: QueueStats,
}

/// Fixed-capacity FIFO queue yang thread-safe dengan shutdown kooperatif.
///
/// Dibagikan ke thread producer/consumer lewat reference (`&` atau `Arc`).
/// Item yang masih tersisa saat queue dihancurkan (via [`destroy`] atau
/// `Drop`) dibuang lewat disposer `D`.
///
/// [`destroy`]: BoundedBlockingQueue::destroy
pub struct BoundedBlockingQueue<T, D: Disposer<T> = DropDisposer> {
    state: Mutex<State<T>>,
    item_available: Condvar,
    slot_available: Condvar,
    // Immutable setelah konstruksi, boleh dibaca tanpa lock
    capacity: usize,
    disposer: D,
}

impl<T> BoundedBlockingQueue<T> {
    /// Membuat queue dengan `capacity` slot.
    ///
    /// # Panics
    /// Panic jika `capacity == 0`.
    ///
    /// Jika alokasi storage gagal, proses dihentikan dengan exit code 1.
    pub fn new(capacity: usize) -> Self {
        Self::with_disposer(capacity, DropDisposer)
    }

    pub fn try_new(capacity: usize) -> Result<Self, QueueError> {
        Self::try_with_disposer(capacity, DropDisposer)
    }
}

impl<T, D: Disposer<T>> BoundedBlockingQueue<T, D> {
    /// Seperti [`BoundedBlockingQueue::new`], dengan disposer sendiri.
    pub fn with_disposer(capacity: usize, disposer: D) -> Self {
        match Self::try_with_disposer(capacity, disposer) {
            Ok(queue) => queue,
            Err(QueueError::ZeroCapacity) => panic!("queue capacity must be greater than zero"),
            Err(err) => {
                error!(capacity, error = %err, "queue storage allocation failed");
                eprintln!("❌ {}", err);
                std::process::exit(1);
            }
        }
    }

    pub fn try_with_disposer(capacity: usize, disposer: D) -> Result<Self, QueueError> {
        if capacity == 0 {
            return Err(QueueError::ZeroCapacity);
        }

        let storage = RingBuffer::try_with_capacity(capacity)
            .map_err(|source| QueueError::Allocation { capacity, source })?;

        Ok(Self {
            state: Mutex::new(State {
                storage,
                shutting_down: false,
                stats: QueueStats::default(),
            }),
            item_available: Condvar::new(),
            slot_available: Condvar::new(),
            capacity,
            disposer,
        })
    }

    /// Lock state. Poison diabaikan: disposer tidak pernah dipanggil
    /// sambil memegang lock, jadi state selalu konsisten.
    #[inline]
    fn lock_state(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Memasukkan item ke queue, blocking selama queue penuh.
    ///
    /// Jika queue sudah (atau menjadi) shutdown, item dibuang lewat disposer
    /// dan fungsi langsung return. Dalam kedua kasus caller tidak lagi
    /// memiliki item.
    pub fn push(&self, item: T) {
        let mut item = item;
        let mut state = self.lock_state();

        loop {
            if state.shutting_down {
                state.stats.discarded += 1;
                drop(state);
                trace!("push after shutdown, item discarded");
                self.disposer.dispose(item);
                return;
            }

            match state.storage.push(item) {
                Ok(()) => break,
                Err(rejected) => {
                    // Penuh: tunggu slot kosong, lalu cek ulang shutdown
                    item = rejected;
                    state = self
                        .slot_available
                        .wait(state)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            }
        }

        state.stats.pushed += 1;
        drop(state);
        self.item_available.notify_one();
    }

    /// Mengambil item tertua, blocking selama queue kosong.
    ///
    /// Returns `None` (end-of-stream) jika queue sudah shutdown dan kosong.
    /// Item yang sudah ada di queue saat shutdown tetap dikembalikan.
    pub fn pop(&self) -> Option<T> {
        let mut state = self.lock_state();

        loop {
            if let Some(item) = state.storage.pop() {
                state.stats.popped += 1;
                drop(state);
                self.slot_available.notify_one();
                return Some(item);
            }

            if state.shutting_down {
                return None;
            }

            state = self
                .item_available
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Menghentikan penerimaan item baru dan melepas semua thread yang
    /// sedang blocking. Idempotent.
    ///
    /// Tidak men-drain queue; consumer tetap bisa mengambil sisa item.
    pub fn shutdown(&self) {
        let mut state = self.lock_state();
        if state.shutting_down {
            return;
        }
        state.shutting_down = true;
        let buffered = state.storage.len();
        drop(state);

        // Broadcast: semua predikat berubah
        self.item_available.notify_all();
        self.slot_available.notify_all();
        debug!(buffered, "queue shutting down");
    }

    /// Menghancurkan queue: shutdown (jika belum), membuang semua item
    /// tersisa lewat disposer, lalu melepas storage.
    ///
    /// Mengambil `self` by value, jadi tidak ada thread lain yang masih
    /// bisa memanggil push/pop. Queue yang dibagikan lewat `Arc` harus
    /// di-unwrap dulu (`Arc::try_unwrap`).
    ///
    /// Returns counter terakhir queue.
    pub fn destroy(mut self) -> QueueStats {
        let drained = self.dispose_buffered();
        let stats = self
            .state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .stats;
        debug!(drained, ?stats, "queue destroyed");
        stats
    }

    /// Shutdown + buang semua item tersisa. Dipakai oleh `destroy` dan `Drop`.
    fn dispose_buffered(&mut self) -> u64 {
        let state = self.state.get_mut().unwrap_or_else(PoisonError::into_inner);
        state.shutting_down = true;

        let mut drained = 0;
        while let Some(item) = state.storage.pop() {
            self.disposer.dispose(item);
            drained += 1;
        }
        state.stats.drained += drained;
        drained
    }

    /// Cek apakah queue kosong.
    ///
    /// Hanya snapshot: nilainya bisa sudah basi saat diterima caller.
    /// Untuk diagnostik, bukan untuk sinkronisasi.
    pub fn is_empty(&self) -> bool {
        self.lock_state().storage.is_empty()
    }

    /// Cek apakah shutdown sudah dipanggil. Sekali `true`, selalu `true`.
    pub fn is_shutdown(&self) -> bool {
        self.lock_state().shutting_down
    }

    /// Jumlah item dalam queue (snapshot)
    pub fn len(&self) -> usize {
        self.lock_state().storage.len()
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Snapshot counter
    pub fn stats(&self) -> QueueStats {
        self.lock_state().stats
    }
}

impl<T, D: Disposer<T>> Drop for BoundedBlockingQueue<T, D> {
    fn drop(&mut self) {
        let drained = self.dispose_buffered();
        if drained > 0 {
            debug!(drained, "queue dropped with buffered items");
        }
    }
}

impl<T, D: Disposer<T>> std::fmt::Debug for BoundedBlockingQueue<T, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock_state();
        f.debug_struct("BoundedBlockingQueue")
            .field("capacity", &self.capacity)
            .field("len", &state.storage.len())
            .field("shutting_down", &state.shutting_down)
            .field("stats", &state.stats)
            .finish()
    }
}
