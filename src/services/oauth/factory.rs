/// Factory: build the request `Authenticator` from application `Config`.
use std::sync::Arc;

use crate::config::OauthConfig;
use crate::error::AppError;
use crate::services::oauth::{Authenticator, HttpTokenLookup, TokenResolver};

pub fn build_authenticator(config: &OauthConfig) -> Result<Arc<Authenticator>, AppError> {
    let lookup = HttpTokenLookup::new(config)?;
    let resolver = TokenResolver::new(Arc::new(lookup));

    Ok(Arc::new(Authenticator::new(resolver)))
}
