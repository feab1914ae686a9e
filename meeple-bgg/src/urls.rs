use url::Url;

use crate::error::EnrichError;

pub const DEFAULT_BASE_URL: &str = "https://boardgamegeek.com";

/// Builds the three BoardGameGeek endpoints under a configurable base.
#[derive(Debug, Clone)]
pub struct BggUrls {
    base: Url,
}

impl Default for BggUrls {
    fn default() -> Self {
        Self {
            base: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
        }
    }
}

impl BggUrls {
    pub fn new(base: &str) -> Result<Self, EnrichError> {
        let base = Url::parse(base)?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(EnrichError::config(format!(
                "Base URL must be an http(s) URL: {base}"
            )));
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        url.set_query(None);
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Owned base games (expansions excluded) for `owner`.
    pub fn collection(&self, owner: &str) -> Url {
        let mut url = self.endpoint(&["xmlapi2", "collection"]);
        url.query_pairs_mut()
            .append_pair("username", owner)
            .append_pair("excludesubtype", "boardgameexpansion")
            .append_pair("own", "1");
        url
    }

    pub fn thing(&self, id: &str) -> Url {
        let mut url = self.endpoint(&["xmlapi2", "thing"]);
        url.query_pairs_mut().append_pair("id", id);
        url
    }

    /// HTML page carrying the preload statistics.
    pub fn game_page(&self, id: &str) -> Url {
        self.endpoint(&["boardgame", id])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoints() {
        let urls = BggUrls::default();
        assert_eq!(
            urls.collection("CPT_Lemons").as_str(),
            "https://boardgamegeek.com/xmlapi2/collection?username=CPT_Lemons&excludesubtype=boardgameexpansion&own=1"
        );
        assert_eq!(
            urls.thing("13").as_str(),
            "https://boardgamegeek.com/xmlapi2/thing?id=13"
        );
        assert_eq!(
            urls.game_page("13").as_str(),
            "https://boardgamegeek.com/boardgame/13"
        );
    }

    #[test]
    fn test_base_with_path_prefix() {
        let urls = BggUrls::new("http://127.0.0.1:8080/mirror/").unwrap();
        assert_eq!(
            urls.thing("822").as_str(),
            "http://127.0.0.1:8080/mirror/xmlapi2/thing?id=822"
        );
    }

    #[test]
    fn test_ids_are_escaped() {
        let urls = BggUrls::default();
        assert_eq!(
            urls.game_page("1/../2").as_str(),
            "https://boardgamegeek.com/boardgame/1%2F..%2F2"
        );
        assert_eq!(
            urls.collection("a b&c").query(),
            Some("username=a+b%26c&excludesubtype=boardgameexpansion&own=1")
        );
    }

    #[test]
    fn test_rejects_non_http_base() {
        assert!(BggUrls::new("mailto:someone@example.com").is_err());
        assert!(BggUrls::new("not a url").is_err());
    }
}
