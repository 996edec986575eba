//! Perfect-hash state codec.
//!
//! Each puzzle domain maps its reachable configurations onto a dense integer
//! range `[0, N)` by composing independent layers in mixed radix: every layer
//! contributes a factor to `N` and a digit to the running value. The layers
//! themselves are ranked with one of two primitives:
//!
//! - [`rank`]: the ordinal of a two-symbol (empty/occupied) string among all
//!   strings with the same symbol counts, and
//! - [`factorial`]: the ordinal of a full permutation.
//!
//! Both are backed by tables built once per instance. Table arithmetic wraps
//! on overflow; an instance whose state count overflows `u64` is rejected at
//! load by cross-checking the exact count against a floating-point estimate
//! (see [`pascal::check_state_count`]).

pub mod factorial;
pub mod pascal;
pub mod rank;
