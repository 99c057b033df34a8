//! HTTP-backed collaborators
//!
//! Each client owns a `reqwest::Client` built with its own request timeout.
//! Response bodies are decoded by pure functions so they can be tested
//! without a network.

mod google;
mod mermaid;
mod pixabay;

pub use google::{parse_pse_response, GooglePseSearch, GOOGLE_PSE_ENDPOINT};
pub use mermaid::{MermaidServiceClient, DEFAULT_MERMAID_URL};
pub use pixabay::{extract_keywords, parse_pixabay_response, PixabayImageProvider, PIXABAY_ENDPOINT};

use reqwest::Client;
use std::time::Duration;

/// Build a client with a request timeout
pub(crate) fn client_with_timeout(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("prd-forge/", env!("CARGO_PKG_VERSION")))
        .build()
}
