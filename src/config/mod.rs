//! Credential storage and lookup
//!
//! The client never caches credentials; every outbound call reads them
//! from a provider implementing the trait defined here.

pub mod credentials;

pub use credentials::{
    CredentialProvider, Credentials, FileCredentialStore, StaticCredentials, API_VERSION_PREFIX,
    DEFAULT_API_URL,
};
