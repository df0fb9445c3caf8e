pub mod http_client;
pub mod platform;

pub mod testing;

pub use http_client::HttpApiAdapter;
