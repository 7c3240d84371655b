pub mod abort;
pub mod authenticator;
pub mod authrequest;
pub mod client;
pub mod config;
pub mod guid;
pub mod rpid;

pub use abort::{AbortController, AbortReason, AbortSignal};
pub use client::{CallerContext, Fido2Client, Fido2ClientError};
pub use config::ClientConfig;
