pub mod gateway;
pub mod local_store;
pub mod object_store;
pub mod rest;

pub use gateway::{GatewayError, ImportsGateway, LocalModeReason};
pub use local_store::LocalStore;
pub use object_store::{ObjectStoreClient, StorageError, SIGNED_URL_TTL_SECS};
pub use rest::{BackendError, RestClient};
