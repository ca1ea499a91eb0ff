use http::header::{CONTENT_LENGTH, TRANSFER_ENCODING};
use http::{HeaderName, HeaderValue, Request};

pub(crate) trait HeaderIterExt {
    fn has_token(self, key: &str, token: &str) -> bool;
    fn has_expect_100(self) -> bool;
}

impl<'a, I: Iterator<Item = (&'a HeaderName, &'a HeaderValue)>> HeaderIterExt for I {
    fn has_token(self, key: &str, token: &str) -> bool {
        self.filter(|i| i.0 == key).any(|i| {
            let Ok(value) = i.1.to_str() else {
                return false;
            };
            value
                .split(',')
                .any(|t| t.trim().eq_ignore_ascii_case(token))
        })
    }

    fn has_expect_100(self) -> bool {
        self.has_token("expect", "100-continue")
    }
}

pub(crate) trait RequestExt {
    /// Whether the request head declares an entity to be streamed after it.
    fn has_entity(&self) -> bool;
}

impl<T> RequestExt for Request<T> {
    fn has_entity(&self) -> bool {
        self.headers().contains_key(CONTENT_LENGTH) || self.headers().contains_key(TRANSFER_ENCODING)
    }
}
