//! Navigable location abstraction.
//!
//! A federated login flow delivers its token as a query parameter on the
//! landing URL. The session store reads the parameter through this trait and
//! rewrites the location once the token has been consumed.

use url::Url;

/// The currently visible, navigable location.
pub trait Location: Send {
    /// First value of the query parameter `name`, if present.
    fn query_param(&self, name: &str) -> Option<String>;

    /// Replace the visible location with `path`, dropping query and fragment.
    ///
    /// `path` must be a bare path; `?` and `#` in it are percent-encoded, not
    /// interpreted. This is a history replacement, never a reload.
    fn replace(&mut self, path: &str);
}

/// [`Location`] backed by an absolute URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlLocation {
    url: Url,
}

impl UrlLocation {
    #[must_use]
    pub fn new(url: Url) -> Self {
        Self { url }
    }

    /// Parse an absolute landing URL.
    ///
    /// # Errors
    ///
    /// Returns [`url::ParseError`] if `input` is not an absolute URL.
    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        Url::parse(input).map(Self::new)
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl Location for UrlLocation {
    fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    fn replace(&mut self, path: &str) {
        self.url.set_path(path);
        self.url.set_query(None);
        self.url.set_fragment(None);
    }
}
