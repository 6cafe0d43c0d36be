//! Lookup strategies
//!
//! A [`Resolver`] turns a normalized [`Code`] into a [`Verification`].
//! Two strategies exist:
//!
//! - [`LocalResolver`]: exact match against an in-memory [`DocumentTable`]
//! - [`RemoteResolver`]: one GET request to a verification endpoint
//!
//! Which one is used is fixed by [`VerifierConfig`] when the controller is
//! built; see [`ConfiguredResolver`].
//!
//! [`DocumentTable`]: crate::record::DocumentTable
//! [`VerifierConfig`]: crate::config::VerifierConfig

mod local;
mod remote;

pub use local::LocalResolver;
pub use remote::{Endpoint, HttpReply, HttpTransport, RemoteResolver, VerifyResponse};

use crate::code::Code;
use crate::error::LookupError;
use crate::outcome::Verification;

/// Lookup capability used by the flow controller
///
/// Futures are not required to be `Send`: in the browser the whole flow
/// runs on the main thread.
#[allow(async_fn_in_trait)]
pub trait Resolver {
    async fn resolve(&self, code: &Code) -> Result<Verification, LookupError>;

    /// Short label for logs
    fn strategy(&self) -> &'static str;
}

/// The strategy selected by configuration
pub enum ConfiguredResolver<T> {
    Local(LocalResolver),
    Remote(RemoteResolver<T>),
}

impl<T: HttpTransport> Resolver for ConfiguredResolver<T> {
    async fn resolve(&self, code: &Code) -> Result<Verification, LookupError> {
        match self {
            ConfiguredResolver::Local(resolver) => resolver.resolve(code).await,
            ConfiguredResolver::Remote(resolver) => resolver.resolve(code).await,
        }
    }

    fn strategy(&self) -> &'static str {
        match self {
            ConfiguredResolver::Local(resolver) => resolver.strategy(),
            ConfiguredResolver::Remote(resolver) => resolver.strategy(),
        }
    }
}
