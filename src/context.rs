use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

/// Context key under which the caller attaches the next [`ExchangeHandler`].
///
/// [`ExchangeHandler`]: crate::ExchangeHandler
pub const EXCHANGE_HANDLER: &str = "http.nio.exchange-handler";

/// Context key holding the per-connection exchange state. Owned by
/// [`ClientProtocolHandler`] for the lifetime of the connection.
///
/// [`ClientProtocolHandler`]: crate::ClientProtocolHandler
pub const EXCHANGE_STATE: &str = "http.nio.http-exchange-state";

/// A string-keyed attribute bag shared between the connection, the protocol
/// handler and user code.
///
/// The bag is internally synchronized. Values are type-erased; retrieval is
/// by downcast, so the reader must name the exact stored type.
#[derive(Default)]
pub struct SharedContext {
    attrs: Mutex<HashMap<String, Box<dyn Any + Send>>>,
}

impl SharedContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<T: Any + Send>(&self, key: impl Into<String>, value: T) {
        let mut attrs = self.attrs.lock().unwrap();
        attrs.insert(key.into(), Box::new(value));
    }

    /// Clone out the value stored under `key`, if it has type `T`.
    pub fn get<T: Any + Clone>(&self, key: &str) -> Option<T> {
        let attrs = self.attrs.lock().unwrap();
        attrs.get(key).and_then(|v| v.downcast_ref::<T>()).cloned()
    }

    /// Remove and return the value stored under `key`, if it has type `T`.
    /// A value of a different type is left in place.
    pub fn take<T: Any>(&self, key: &str) -> Option<T> {
        let mut attrs = self.attrs.lock().unwrap();
        let value = attrs.remove(key)?;
        match value.downcast::<T>() {
            Ok(v) => Some(*v),
            Err(v) => {
                attrs.insert(key.to_string(), v);
                None
            }
        }
    }

    pub fn remove(&self, key: &str) -> bool {
        let mut attrs = self.attrs.lock().unwrap();
        attrs.remove(key).is_some()
    }

    pub fn contains(&self, key: &str) -> bool {
        let attrs = self.attrs.lock().unwrap();
        attrs.contains_key(key)
    }
}

impl fmt::Debug for SharedContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attrs = self.attrs.lock().unwrap();
        let mut keys: Vec<&str> = attrs.keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        f.debug_struct("SharedContext").field("keys", &keys).finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn insert_get_take() {
        let ctx = SharedContext::new();

        ctx.insert("n", 42_u32);
        assert_eq!(ctx.get::<u32>("n"), Some(42));
        assert!(ctx.contains("n"));

        assert_eq!(ctx.take::<u32>("n"), Some(42));
        assert!(!ctx.contains("n"));
        assert_eq!(ctx.take::<u32>("n"), None);
    }

    #[test]
    fn take_with_wrong_type_leaves_value() {
        let ctx = SharedContext::new();

        ctx.insert("n", 42_u32);
        assert_eq!(ctx.take::<String>("n"), None);
        assert_eq!(ctx.get::<u32>("n"), Some(42));
    }

    #[test]
    fn remove_discards() {
        let ctx = SharedContext::new();

        ctx.insert("n", 42_u32);
        assert!(ctx.remove("n"));
        assert!(!ctx.remove("n"));
    }
}
