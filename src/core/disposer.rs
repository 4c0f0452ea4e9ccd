//! Disposal item yang tidak pernah sampai ke consumer
//!
//! Setiap item yang masuk ke `push` dibuang tepat satu kali: oleh queue
//! (push ditolak setelah shutdown, atau sisa item saat destroy) atau
//! oleh consumer yang menerimanya dari `pop`.

/// Operasi release yang dipakai queue untuk membuang item.
pub trait Disposer<T> {
    fn dispose(&self, item: T);
}

/// Disposer default: item cukup di-drop.
#[derive(Debug, Default, Clone, Copy)]
pub struct DropDisposer;

impl<T> Disposer<T> for DropDisposer {
    #[inline(always)]
    fn dispose(&self, item: T) {
        drop(item);
    }
}

/// Disposer dari closure, misalnya untuk recycle buffer atau menghitung
/// item yang dibuang.
#[derive(Clone, Copy)]
pub struct FnDisposer<F>(pub F);

impl<T, F> Disposer<T> for FnDisposer<F>
where
    F: Fn(T),
{
    #[inline]
    fn dispose(&self, item: T) {
        (self.0)(item)
    }
}

impl<F> std::fmt::Debug for FnDisposer<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FnDisposer(..)")
    }
}
