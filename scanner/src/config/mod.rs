// Scan configuration and secret lookup
pub mod credentials;
pub mod settings;

pub use credentials::{credential_provider, CredentialProvider, EnvCredentials, VaultFileCredentials};
pub use settings::{CredentialBackend, EmailSettings, PriceSourceKind, PriceSourceSettings, ScanSettings};
