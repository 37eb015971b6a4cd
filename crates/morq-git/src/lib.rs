//! Git probing and convergence primitives for morq
//!
//! [`Checkout`] observes a local clone, [`reference`] classifies declared
//! references, and the methods in [`sync`] move a checkout toward a declared
//! reference without discarding local modifications.

pub mod checkout;
pub mod error;
pub mod reference;
pub mod sync;

pub use checkout::{Checkout, SHORT_ID_LEN};
pub use error::{Error, Result};
pub use reference::{ReferenceKind, ReferenceLookup, classify};
pub use sync::{DEFAULT_BRANCHES, ORIGIN, clone_into};
