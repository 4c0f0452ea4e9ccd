//! Conveyor - Bounded Blocking Hand-off Queue
//!
//! Queue FIFO dengan kapasitas tetap untuk memindahkan ownership item
//! dari thread producer ke thread consumer, dengan protokol shutdown
//! kooperatif:
//! - `push` blocking saat penuh, membuang item setelah shutdown
//! - `pop` blocking saat kosong, `None` setelah shutdown dan kosong
//! - `destroy` membuang sisa item tepat satu kali

pub mod core;

pub use crate::core::{
    BoundedBlockingQueue, Disposer, DropDisposer, FnDisposer, QueueError, QueueStats, RingBuffer,
};
