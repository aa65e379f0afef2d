//! Authentication for the Beanstalk API.
//!
//! Beanstalk accepts HTTP basic authentication with an account username and
//! either the account password or an access token.

mod credential;

pub use credential::{Credentials, DEFAULT_HOST_SUFFIX};
