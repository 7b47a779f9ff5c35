mod health;
mod url;

pub use health::HealthResponse;
pub use url::{
    CreateShortUrlRequest, DeleteShortUrlResponse, ShortUrlResponse, UpdateShortUrlResponse,
};
