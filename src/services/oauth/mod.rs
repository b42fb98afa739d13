pub mod authenticator;
pub mod client;
pub mod error;
pub mod factory;
pub mod headers;
pub mod resolver;
pub mod types;

pub use authenticator::Authenticator;
pub use client::{HttpTokenLookup, TokenLookup};
pub use error::{LookupBuildError, OauthError, TransportError};
pub use factory::build_authenticator;
pub use resolver::TokenResolver;
pub use types::AccessToken;
