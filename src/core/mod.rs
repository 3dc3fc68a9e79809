//! Invoice aggregation, jurisdiction checks, and filing decisions.
//!
//! Everything here is pure: no network, no files. The HTTP client and the
//! XML writer plug in around it.

mod aggregate;
mod dates;
mod error;
mod filing;
mod months;
mod reconcile;
mod report;
mod rounding;
mod run;
mod source;
mod types;

pub use aggregate::*;
pub use dates::*;
pub use error::*;
pub use filing::*;
pub use months::*;
pub use reconcile::*;
pub use report::*;
pub use rounding::*;
pub use run::*;
pub use source::*;
pub use types::*;
