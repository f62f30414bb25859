//! Cache key derivation
//!
//! Keys are 128-bit MD5 digests over the canonicalized text, the lower-cased
//! source and target tags, and an optional ordered list of extra
//! discriminators. Every field is length-prefixed before hashing so that
//! adjacent fields can never be confused (`["ab","c"]` and `["a","bc"]` hash
//! differently). Derivation always succeeds; empty text yields a valid,
//! distinct key.

use crate::language::LanguageTag;
use crate::text;
use md5::{Digest as Md5Digest, Md5};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Size of a cache key in bytes (128-bit digest)
pub const KEY_LEN: usize = 16;

/// An opaque fixed-size cache key
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey([u8; KEY_LEN]);

impl CacheKey {
    pub fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Lower-case hex rendering, used inside store keys
    pub fn to_hex(&self) -> String {
        let mut out = String::with_capacity(KEY_LEN * 2);
        for byte in self.0 {
            out.push_str(&format!("{byte:02x}"));
        }
        out
    }

    /// Parse a key back from its hex rendering
    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != KEY_LEN * 2 {
            return None;
        }
        let mut bytes = [0u8; KEY_LEN];
        for (i, slot) in bytes.iter_mut().enumerate() {
            *slot = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
        }
        Some(Self(bytes))
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CacheKey({})", self.to_hex())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// Keys are persisted inside pivot pointers; hex keeps the stored form
// readable and stable across serializers.
impl Serialize for CacheKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for CacheKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct HexVisitor;

        impl Visitor<'_> for HexVisitor {
            type Value = CacheKey;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a {}-character hex string", KEY_LEN * 2)
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<CacheKey, E> {
                CacheKey::from_hex(value)
                    .ok_or_else(|| E::custom(format!("invalid cache key hex '{value}'")))
            }
        }

        deserializer.deserialize_str(HexVisitor)
    }
}

/// Derive the cache key for `(text, source, target)` plus optional extra
/// discriminators. Text is canonicalized first; tags are already normalized
/// by construction.
pub fn derive_key(
    base_text: &str,
    source: &LanguageTag,
    target: &LanguageTag,
    extra: &[&str],
) -> CacheKey {
    let canonical = text::canonical(base_text);
    let mut hasher = Md5::new();
    feed(&mut hasher, canonical.as_bytes());
    feed(&mut hasher, source.as_str().as_bytes());
    feed(&mut hasher, target.as_str().as_bytes());
    for segment in extra {
        feed(&mut hasher, segment.as_bytes());
    }
    CacheKey(Md5Digest::finalize(hasher).into())
}

/// Derive the direction-independent key for a pronunciation sub-result.
/// The language appears both as the tag pair and as an extra discriminator so
/// that a pronunciation entry can never collide with an identity translation
/// of the same text.
pub fn pronunciation_key(base_text: &str, language: &LanguageTag) -> CacheKey {
    derive_key(base_text, language, language, &[language.as_str()])
}

fn feed(hasher: &mut Md5, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(s: &str) -> LanguageTag {
        LanguageTag::new(s).unwrap()
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let a = derive_key("perro", &tag("es"), &tag("en"), &[]);
        let b = derive_key("perro", &tag("es"), &tag("en"), &[]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_canonically_equal_texts_share_a_key() {
        let a = derive_key("Hello,   World!", &tag("en"), &tag("es"), &[]);
        let b = derive_key("hello world", &tag("en"), &tag("es"), &[]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_direction_matters() {
        let forward = derive_key("perro", &tag("es"), &tag("en"), &[]);
        let reverse = derive_key("perro", &tag("en"), &tag("es"), &[]);
        assert_ne!(forward, reverse);
    }

    #[test]
    fn test_extra_segments_are_unambiguous() {
        let a = derive_key("x", &tag("en"), &tag("es"), &["ab", "c"]);
        let b = derive_key("x", &tag("en"), &tag("es"), &["a", "bc"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_text_has_a_valid_key() {
        let empty = derive_key("", &tag("en"), &tag("es"), &[]);
        let nonempty = derive_key("a", &tag("en"), &tag("es"), &[]);
        assert_ne!(empty, nonempty);
    }

    #[test]
    fn test_pronunciation_key_differs_from_identity_translation() {
        let pron = pronunciation_key("hola", &tag("es"));
        let identity = derive_key("hola", &tag("es"), &tag("es"), &[]);
        assert_ne!(pron, identity);
    }

    #[test]
    fn test_hex_round_trip() {
        let key = derive_key("perro", &tag("es"), &tag("en"), &[]);
        let hex = key.to_hex();
        assert_eq!(hex.len(), KEY_LEN * 2);
        assert_eq!(CacheKey::from_hex(&hex), Some(key));
        assert_eq!(CacheKey::from_hex("zz"), None);
    }

    #[test]
    fn test_serde_round_trip() {
        let key = derive_key("gato", &tag("es"), &tag("ko"), &[]);
        let json = serde_json::to_string(&key).unwrap();
        let back: CacheKey = serde_json::from_str(&json).unwrap();
        assert_eq!(key, back);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        // Lower-case alphanumeric inputs survive canonicalization unchanged,
        // so distinct generated inputs imply distinct canonical forms.
        fn word() -> impl Strategy<Value = String> {
            "[a-z0-9]{1,16}"
        }

        proptest! {
            #[test]
            fn derivation_is_idempotent(text in word(), src in "[a-z]{2}", dst in "[a-z]{2}") {
                let source = LanguageTag::new(&src).unwrap();
                let target = LanguageTag::new(&dst).unwrap();
                prop_assert_eq!(
                    derive_key(&text, &source, &target, &[]),
                    derive_key(&text, &source, &target, &[])
                );
            }

            #[test]
            fn distinct_texts_get_distinct_keys(a in word(), b in word(), src in "[a-z]{2}", dst in "[a-z]{2}") {
                prop_assume!(a != b);
                let source = LanguageTag::new(&src).unwrap();
                let target = LanguageTag::new(&dst).unwrap();
                prop_assert_ne!(
                    derive_key(&a, &source, &target, &[]),
                    derive_key(&b, &source, &target, &[])
                );
            }

            #[test]
            fn extras_discriminate(text in word(), extra in word()) {
                let source = LanguageTag::new("en").unwrap();
                let target = LanguageTag::new("es").unwrap();
                prop_assert_ne!(
                    derive_key(&text, &source, &target, &[]),
                    derive_key(&text, &source, &target, &[&extra])
                );
            }
        }
    }
}
