//! `cardinality-sketch` is a Rust crate for estimating the number of distinct elements in a stream
//! or dataset using bounded memory, independent of the stream length.
//!
//! It implements the HyperLogLog sketch with registers packed as 6-bit fields, linear counting for
//! small cardinalities and bucket-wise maximum merges for combining sketches built on independent shards.
//!
//! ```
//! use cardinality_sketch::Sketch;
//!
//! let mut lhs = Sketch::new(4096).unwrap();
//! let mut rhs = Sketch::new(4096).unwrap();
//! for i in 0..1000u32 {
//!     lhs.add(&i.to_le_bytes());
//! }
//! for i in 500..1500u32 {
//!     rhs.add(&i.to_le_bytes());
//! }
//!
//! lhs.merge(&rhs).unwrap();
//! let count = lhs.count();
//! assert!((1400..=1600).contains(&count));
//! ```
pub mod config;
pub mod correction;
mod error;
mod estimator;
pub mod registers;
pub mod router;
#[cfg(feature = "with_serde")]
mod serde;
pub mod sketch;

pub use config::SketchConfig;
pub use correction::{LinearCounting, LinearCountingTrait};
pub use error::SketchError;
pub use registers::Registers;
pub use sketch::Sketch;
