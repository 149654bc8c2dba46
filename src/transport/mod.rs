//! HTTP transport: one lazily created `reqwest::Client` per client instance.

mod http;

pub use http::{
    HttpTransport, RawResponse, TransportError, TransportSettings, ENV_HTTP_TIMEOUT_SECS,
    ENV_PROXY_URL,
};
