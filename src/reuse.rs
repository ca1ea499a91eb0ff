use http::{Response, Version};

use crate::ext::HeaderIterExt;
use crate::{ReuseStrategy, SharedContext};

/// Keep-alive decision based on the response head alone.
///
/// A `Connection: close` token forbids reuse. Otherwise HTTP/1.1 defaults
/// to keep-alive, HTTP/1.0 requires an explicit `Connection: keep-alive`
/// token, and any other version is not reused.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultReuseStrategy;

impl ReuseStrategy for DefaultReuseStrategy {
    fn keep_alive(&self, response: &Response<()>, _ctx: &SharedContext) -> bool {
        if response.headers().iter().has_token("connection", "close") {
            return false;
        }
        match response.version() {
            Version::HTTP_11 => true,
            Version::HTTP_10 => response.headers().iter().has_token("connection", "keep-alive"),
            _ => false,
        }
    }
}
