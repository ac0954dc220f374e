//! # regmap-core: Register Map Model and Loader
//!
//! Turns a hand-written YAML description of a hardware register block into
//! an immutable, invariant-checked model that code generators can consume
//! without re-validating anything.
//!
//! ```text
//! block:
//!   name: UART0
//!   base_address: 0x40001000
//!   registers:
//!     - name: CTRL
//!       offset: 0x0
//!       fields:
//!         - { name: enable, bits: 0 }
//!         - { name: mode, bits: "3:1", reset: "0x2" }
//! ```
//!
//! ## Key Design Principles
//!
//! 1. **Narrow once.** Offsets, addresses, bit ranges and reset values may be
//!    written as integers or strings. [`scalar`] turns them into fixed-width
//!    integers at the boundary; the model never sees a string number.
//!
//! 2. **Word alignment is non-negotiable.** A register whose offset is not a
//!    multiple of 4 aborts the load with [`RegmapError::RegisterAlignment`],
//!    naming the register and its hex offset.
//!
//! 3. **No partial models.** The first error aborts the load.
//!
//! 4. **Derived values are computed, never stored.** Width, mask and hex
//!    renderings are accessor methods on immutable records.
//!
//! 5. **Permissive parse, opt-in lint.** Duplicate names and overlapping
//!    offsets or bit ranges load fine; [`lint`] reports them.
//!
//! ## Crate Policy
//!
//! - No global state; every entry point is safe to call concurrently.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - The crate never prints. It emits `tracing` events and leaves output to
//!   the caller.

pub mod access;
pub mod config;
pub mod error;
pub mod lint;
pub mod loader;
pub mod model;
pub mod scalar;

// Re-export primary types for ergonomic imports.
pub use access::AccessMode;
pub use config::LintConfig;
pub use error::{ErrorCategory, RegmapError, RegmapResult, ScalarError};
pub use lint::{lint, Finding, LintKind, LintReport, Severity};
pub use loader::{parse, parse_str};
pub use model::{Block, Field, Register, MAX_BIT_INDEX, REGISTER_ALIGNMENT};
pub use scalar::{parse_bits, parse_hex, Scalar};
