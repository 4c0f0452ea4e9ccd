//! Fixed-Capacity Ring Buffer untuk storage queue
//!
//! Implementasi single-threaded: semua sinkronisasi dilakukan oleh
//! `BoundedBlockingQueue` yang membungkus buffer ini di dalam Mutex.
//! Tidak ada alokasi setelah inisialisasi.

use std::collections::TryReserveError;

/// Posisi baca/tulis dalam ring buffer.
///
/// State kosong dibuat eksplisit sehingga kondisi "kosong" dan "penuh"
/// tidak pernah memakai index yang sama.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Empty,
    Occupied {
        /// Slot berikutnya yang akan dibaca
        head: usize,
        /// Slot yang terakhir ditulis
        tail: usize,
        len: usize,
    },
}

/// Circular storage dengan kapasitas tetap
pub struct RingBuffer<T> {
    // Pre-allocated slots - tidak ada alokasi setelah init
    slots: Box<[Option<T>]>,
    cursor: Cursor,
}

impl<T> RingBuffer<T> {
    /// Membuat ring buffer dengan `capacity` slot.
    ///
    /// # Panics
    /// Panic jika `capacity == 0` atau alokasi gagal.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be greater than zero");
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        Self::from_slots(slots)
    }

    /// Seperti [`RingBuffer::with_capacity`], tapi melaporkan kegagalan
    /// alokasi alih-alih abort.
    ///
    /// `capacity` harus lebih dari nol; pengecekan dilakukan oleh caller.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        debug_assert!(capacity > 0);
        let mut slots = Vec::new();
        slots.try_reserve_exact(capacity)?;
        slots.resize_with(capacity, || None);
        Ok(Self::from_slots(slots))
    }

    fn from_slots(slots: Vec<Option<T>>) -> Self {
        Self {
            slots: slots.into_boxed_slice(),
            cursor: Cursor::Empty,
        }
    }

    /// Menulis item ke slot berikutnya.
    ///
    /// Returns `Err(item)` jika buffer penuh, ownership dikembalikan ke caller.
    #[inline]
    pub fn push(&mut self, item: T) -> Result<(), T> {
        let capacity = self.slots.len();
        let (head, tail, len) = match self.cursor {
            // Buffer kosong: mulai lagi dari slot 0
            Cursor::Empty => (0, 0, 1),
            Cursor::Occupied { len, .. } if len == capacity => return Err(item),
            Cursor::Occupied { head, tail, len } => (head, (tail + 1) % capacity, len + 1),
        };

        self.slots[tail] = Some(item);
        self.cursor = Cursor::Occupied { head, tail, len };
        Ok(())
    }

    /// Mengambil item tertua.
    ///
    /// Returns `None` jika buffer kosong.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        let Cursor::Occupied { head, tail, len } = self.cursor else {
            return None;
        };

        let item = self.slots[head].take();
        self.cursor = if len == 1 {
            Cursor::Empty
        } else {
            Cursor::Occupied {
                head: (head + 1) % self.slots.len(),
                tail,
                len: len - 1,
            }
        };
        item
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cursor == Cursor::Empty
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len() == self.slots.len()
    }

    /// Jumlah item dalam buffer
    #[inline]
    pub fn len(&self) -> usize {
        match self.cursor {
            Cursor::Empty => 0,
            Cursor::Occupied { len, .. } => len,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

impl<T> std::fmt::Debug for RingBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity())
            .field("cursor", &self.cursor)
            .finish()
    }
}
