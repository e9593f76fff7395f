pub mod auth;
pub mod client;
pub mod credentials;
pub mod mapper;

pub use client::GitHubPlatform;
pub use credentials::CredentialResolver;
