pub use address::{Address, AddressPolicy};
pub use error::{TokenListError, Violation, ViolationKind};
pub use report::Report;
pub use validate::Validator;

pub mod address;
pub mod config;
pub mod error;
pub mod logo;
pub mod normalize;
#[cfg(feature = "registry-cache")]
pub mod probe;
pub mod registry;
pub mod report;
pub mod sync;
pub mod validate;
