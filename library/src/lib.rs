//! Anonymous recursive closures.
//!
//! ```
//! use ycomb::{recursive, Rec};
//!
//! let fact = recursive(|this: Rec<u64, u64>| move |n: u64| if n == 0 { 1 } else { n * this(n - 1) });
//! assert_eq!(fact(5), 120);
//! ```

pub mod fixpoint;
pub mod memo;
pub mod recursive;

pub use fixpoint::{fix, fix_mut, FnLike, StateFnLike};
pub use memo::{fix_memo, Memo};
pub use recursive::{recursive, sync, Rec};

// sugar for `recursive`: `recursive!(|this, n: u64| -> u64 { ... })`.
// captures of the body are moved into every level, so they should be Copy.
#[macro_export]
macro_rules! recursive {
    (|$this:ident, $arg:ident: $A:ty| -> $B:ty $body:block) => {
        $crate::recursive::recursive(move |$this: $crate::recursive::Rec<$A, $B>| {
            move |$arg: $A| -> $B { $body }
        })
    };
}
