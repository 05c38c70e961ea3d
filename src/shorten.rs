// ============================================================================
// LINK SHORTENING — collaborator seam for the "share a link" flow
// ============================================================================
//
// The shortening service itself (HTTP endpoint backed by a key-value store
// with expiry) is an external collaborator; the engine only needs its
// create/resolve contract and the fragment format that carries the payload
// in a long URL. `InMemoryShortener` satisfies the contract for tests and
// offline use.

use std::collections::HashMap;

use uuid::Uuid;

/// Fragment key carrying the share payload: `https://host/#paint=<payload>`.
const FRAGMENT_KEY: &str = "paint";

/// Length of a short id (lowercase alphanumeric).
const SHORT_ID_LEN: usize = 6;

/// Result of a create call: the id and the full short URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShortLink {
    pub short_id: String,
    pub short_url: String,
}

/// Create/resolve pair exposed by the shortening collaborator.
pub trait LinkShortener {
    /// Store `url` and hand back a short link for it.
    fn create(&mut self, url: &str) -> Result<ShortLink, String>;
    /// Resolve a previously created id back to the long URL.
    fn resolve(&self, short_id: &str) -> Option<String>;
}

/// HashMap-backed shortener with the same id shape the real service uses.
pub struct InMemoryShortener {
    host: String,
    links: HashMap<String, String>,
}

impl InMemoryShortener {
    pub fn new(host: &str) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            links: HashMap::new(),
        }
    }
}

impl LinkShortener for InMemoryShortener {
    fn create(&mut self, url: &str) -> Result<ShortLink, String> {
        if url.is_empty() {
            return Err("url is required".to_string());
        }
        // The service caps stored URLs; mirror that so an oversized canvas
        // fails here instead of at the collaborator.
        if url.len() > 100_000 {
            return Err("url is too long".to_string());
        }
        let short_id: String = Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(SHORT_ID_LEN)
            .collect();
        self.links.insert(short_id.clone(), url.to_string());
        Ok(ShortLink {
            short_url: format!("{}/{}", self.host, short_id),
            short_id,
        })
    }

    fn resolve(&self, short_id: &str) -> Option<String> {
        self.links.get(short_id).cloned()
    }
}

// ----------------------------------------------------------------------------
// Fragment transport
// ----------------------------------------------------------------------------

/// Build the long shareable URL that embeds a payload in the fragment.
pub fn share_url(base: &str, payload: &str) -> String {
    format!("{}#{}={}", base.trim_end_matches('#'), FRAGMENT_KEY, payload)
}

/// Extract the share payload from a URL fragment, if present.
pub fn parse_share_url(url: &str) -> Option<&str> {
    let fragment = url.split_once('#')?.1;
    fragment.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key == FRAGMENT_KEY && !value.is_empty() {
            Some(value)
        } else {
            None
        }
    })
}

/// Full "produce a shareable link" flow: wrap the payload in a fragment
/// URL and hand it to the shortening collaborator.
pub fn shorten_share_payload(
    shortener: &mut dyn LinkShortener,
    base: &str,
    payload: &str,
) -> Result<ShortLink, String> {
    shortener.create(&share_url(base, payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_resolve_round_trip() {
        let mut s = InMemoryShortener::new("https://rp.example/");
        let link = s.create("https://rp.example/#paint=abc123").unwrap();
        assert_eq!(link.short_id.len(), SHORT_ID_LEN);
        assert_eq!(link.short_url, format!("https://rp.example/{}", link.short_id));
        assert_eq!(
            s.resolve(&link.short_id).as_deref(),
            Some("https://rp.example/#paint=abc123")
        );
        assert_eq!(s.resolve("zzzzzz"), None);
    }

    #[test]
    fn fragment_parse_finds_payload() {
        let url = share_url("https://rp.example/", "UEsDBA");
        assert_eq!(parse_share_url(&url), Some("UEsDBA"));
        assert_eq!(parse_share_url("https://rp.example/"), None);
        assert_eq!(parse_share_url("https://rp.example/#other=1"), None);
    }
}
