//! Core module: Bounded Blocking Queue dengan ring buffer storage
//!
//! Prinsip desain:
//! - Fixed capacity: storage dialokasikan sekali saat init
//! - Mutex + Condvar: blocking tanpa busy-wait
//! - Ownership: setiap item dibuang tepat satu kali

mod blocking_queue;
mod disposer;
mod error;
mod ring_buffer;
mod stats;

pub use blocking_queue::BoundedBlockingQueue;
pub use disposer::{Disposer, DropDisposer, FnDisposer};
pub use error::QueueError;
pub use ring_buffer::RingBuffer;
pub use stats::QueueStats;
