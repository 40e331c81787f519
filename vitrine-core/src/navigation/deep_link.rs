use std::sync::Arc;

use parking_lot::Mutex;
use url::Url;
use vitrine_model::SlideNumber;

use crate::error::Result;
use crate::settings::DEFAULT_DEEP_LINK_PARAM;

/// Where the viewer persists its position.
pub trait Location: Send + Sync {
    fn current(&self) -> Url;

    /// Rewrites the current entry without adding history.
    fn replace(&self, url: Url);

    /// Adds a history entry. Only used when leaving the viewer.
    fn push(&self, url: Url);
}

/// The query parameter carrying the current slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepLink {
    param: String,
}

impl Default for DeepLink {
    fn default() -> Self {
        Self::new(DEFAULT_DEEP_LINK_PARAM)
    }
}

impl DeepLink {
    pub fn new(param: impl Into<String>) -> Self {
        Self {
            param: param.into(),
        }
    }

    pub fn param(&self) -> &str {
        &self.param
    }

    /// Raw value of the first matching pair, if any.
    pub fn requested_slide(&self, url: &Url) -> Option<String> {
        url.query_pairs()
            .find(|(key, _)| key == self.param.as_str())
            .map(|(_, value)| value.into_owned())
    }

    /// `url` with the slide parameter set to `slide`.
    ///
    /// The first existing pair is rewritten in place and later duplicates are
    /// dropped; other parameters keep their order. When the parameter is
    /// absent it is appended.
    pub fn with_slide(&self, url: &Url, slide: SlideNumber) -> Url {
        let value = slide.to_string();
        let mut replaced = false;
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .filter_map(|(key, existing)| {
                if key != self.param.as_str() {
                    return Some((key.into_owned(), existing.into_owned()));
                }
                if replaced {
                    return None;
                }
                replaced = true;
                Some((key.into_owned(), value.clone()))
            })
            .collect();

        let mut updated = url.clone();
        {
            let mut query = updated.query_pairs_mut();
            query.clear();
            for (key, existing) in &pairs {
                query.append_pair(key, existing);
            }
            if !replaced {
                query.append_pair(&self.param, &value);
            }
        }
        updated
    }

    /// Replaces the location with one pointing at `slide`.
    pub fn sync(&self, location: &dyn Location, slide: SlideNumber) {
        let current = location.current();
        location.replace(self.with_slide(&current, slide));
    }
}

/// Parses a user-supplied link, resolving relative forms like `?slide=3`
/// against `base`.
pub fn parse_link(raw: &str, base: &Url) -> Result<Url> {
    Ok(Url::options().base_url(Some(base)).parse(raw)?)
}

#[derive(Debug)]
struct History {
    past: Vec<Url>,
    current: Url,
}

/// In-process location with an inspectable history. Clones share state.
#[derive(Debug, Clone)]
pub struct MemoryLocation {
    history: Arc<Mutex<History>>,
}

impl MemoryLocation {
    pub fn new(initial: Url) -> Self {
        Self {
            history: Arc::new(Mutex::new(History {
                past: Vec::new(),
                current: initial,
            })),
        }
    }

    /// Every entry, oldest first, ending with the current one.
    pub fn history(&self) -> Vec<Url> {
        let history = self.history.lock();
        let mut entries = history.past.clone();
        entries.push(history.current.clone());
        entries
    }
}

impl Location for MemoryLocation {
    fn current(&self) -> Url {
        self.history.lock().current.clone()
    }

    fn replace(&self, url: Url) {
        self.history.lock().current = url;
    }

    fn push(&self, url: Url) {
        let mut history = self.history.lock();
        let previous = std::mem::replace(&mut history.current, url);
        history.past.push(previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    fn slide(n: u32) -> SlideNumber {
        SlideNumber::new(n).unwrap()
    }

    #[test]
    fn reads_first_matching_pair() {
        let link = DeepLink::default();
        assert_eq!(
            link.requested_slide(&url("vitrine://viewer?slide=4&slide=9")),
            Some("4".to_string())
        );
        assert_eq!(link.requested_slide(&url("vitrine://viewer")), None);
    }

    #[test]
    fn rewrites_in_place_and_keeps_other_params() {
        let link = DeepLink::default();
        let updated = link.with_slide(
            &url("vitrine://viewer?theme=dark&slide=2&lang=en&slide=5"),
            slide(3),
        );
        assert_eq!(updated.query(), Some("theme=dark&slide=3&lang=en"));
    }

    #[test]
    fn appends_when_absent() {
        let link = DeepLink::new("page");
        let updated = link.with_slide(&url("vitrine://viewer?theme=dark"), slide(12));
        assert_eq!(updated.query(), Some("theme=dark&page=12"));
    }

    #[test]
    fn sync_replaces_without_growing_history() {
        let location = MemoryLocation::new(url("vitrine://viewer?slide=1"));
        let link = DeepLink::default();

        for n in 2..=6 {
            link.sync(&location, slide(n));
        }

        let history = location.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].query(), Some("slide=6"));
    }

    #[test]
    fn parse_link_resolves_relative_queries() {
        let base = url("vitrine://viewer");
        assert_eq!(
            parse_link("?slide=12", &base).unwrap().as_str(),
            "vitrine://viewer?slide=12"
        );
        assert_eq!(
            parse_link("vitrine://viewer?slide=2", &base).unwrap().query(),
            Some("slide=2")
        );
    }
}
