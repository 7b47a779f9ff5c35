use serde::{Deserialize, Serialize};
use snip_shortener::ShortenedUrl;

#[derive(Deserialize)]
pub struct CreateShortUrlRequest {
    pub original_url: String,
}

#[derive(Serialize, Deserialize)]
pub struct ShortUrlResponse {
    pub original_url: String,
    pub short_url: String,
    pub created_at: String,
}

impl From<ShortenedUrl> for ShortUrlResponse {
    fn from(value: ShortenedUrl) -> Self {
        Self {
            original_url: value.original_url,
            short_url: value.short_code.to_string(),
            created_at: value.created_at,
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct UpdateShortUrlResponse {
    pub updated_short_url: String,
}

#[derive(Serialize, Deserialize)]
pub struct DeleteShortUrlResponse {
    pub message: String,
}
