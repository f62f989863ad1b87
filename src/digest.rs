//! Content digests and namespaced node ids. Both are pure functions of their
//! inputs so that rebuilding unchanged content yields the same ids and
//! digests.

use crate::node::NodeId;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Computes the hex SHA-256 digest of `value`'s compact JSON encoding.
pub fn content_digest<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let bytes = serde_json::to_vec(value)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

/// Derives node ids scoped to a namespace, so that the same raw id from two
/// different sites (or plugins) never collides.
#[derive(Clone, Debug)]
pub struct NodeIdFactory {
    namespace: String,
}

impl NodeIdFactory {
    pub fn new(namespace: impl Into<String>) -> NodeIdFactory {
        NodeIdFactory {
            namespace: namespace.into(),
        }
    }

    /// Returns a UUID-shaped id (8-4-4-4-12 hex digits) for `raw`.
    pub fn create(&self, raw: &str) -> NodeId {
        let mut hasher = Sha256::new();
        hasher.update(self.namespace.as_bytes());
        hasher.update(b"\0");
        hasher.update(raw.as_bytes());
        let digest = hex::encode(&hasher.finalize()[..16]);
        NodeId::new(format!(
            "{}-{}-{}-{}-{}",
            &digest[..8],
            &digest[8..12],
            &digest[12..16],
            &digest[16..20],
            &digest[20..32],
        ))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error computing a digest.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when the value can't be encoded as JSON.
    #[error("encoding value for digest: {0}")]
    Encode(#[from] serde_json::Error),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_content_digest_is_stable() -> Result<()> {
        let a = content_digest(&("Foo", vec!["a", "b"]))?;
        let b = content_digest(&("Foo", vec!["a", "b"]))?;
        let c = content_digest(&("Foo", vec!["b", "a"]))?;
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(64, a.len());
        Ok(())
    }

    #[test]
    fn test_node_id_shape() {
        let id = NodeIdFactory::new("snipsite").create("snp-foo");
        let groups: Vec<usize> = id.as_str().split('-').map(str::len).collect();
        assert_eq!(vec![8, 4, 4, 4, 12], groups);
    }

    #[test]
    fn test_node_id_is_namespaced() {
        let ids = NodeIdFactory::new("snipsite");
        assert_eq!(ids.create("snp-foo"), ids.create("snp-foo"));
        assert_ne!(ids.create("snp-foo"), ids.create("snp-bar"));
        assert_ne!(
            ids.create("snp-foo"),
            NodeIdFactory::new("other").create("snp-foo")
        );
    }
}
