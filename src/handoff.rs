//! Install confirmation hand-off.
//!
//! Selecting an item's download navigates to a confirmation page with three
//! URL-encoded query parameters: `url` (the target download), `name` (the
//! display name), and `source` (the originating source's name). The page
//! itself is an external collaborator; this module owns only the query
//! contract and the contextual help classification it drives.

use crate::types::{Item, Source};
use crate::util::{percent_decode, percent_encode};

const UNKNOWN_FILE: &str = "Unknown File";
const UNKNOWN_SOURCE: &str = "Unknown Source";

/// The parameters carried across the hand-off boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    pub url: String,
    pub name: String,
    pub source: String,
}

impl InstallRequest {
    /// Build a hand-off request for an item, if it has a download URL.
    ///
    /// Items without one are a valid renderable state (disabled action) and
    /// yield `None`.
    pub fn for_item(item: &Item, source: &Source) -> Option<Self> {
        let url = item.download_url.clone()?;
        Some(Self {
            url,
            name: item.display_name.clone(),
            source: source.name.clone(),
        })
    }

    /// The confirmation page address, e.g.
    /// `install.html?url=…&name=…&source=…`.
    pub fn page_url(&self, page_base: &str) -> String {
        format!(
            "{}?url={}&name={}&source={}",
            page_base,
            percent_encode(&self.url),
            percent_encode(&self.name),
            percent_encode(&self.source)
        )
    }

    /// Parse a hand-off query string, applying the fixed placeholders for
    /// missing `name`/`source`. Returns `None` without a `url` parameter:
    /// there is nothing to confirm.
    pub fn from_query(query: &str) -> Option<Self> {
        let mut url = None;
        let mut name = None;
        let mut source = None;
        for pair in query.trim_start_matches('?').split('&') {
            let Some((key, value)) = pair.split_once('=') else {
                continue;
            };
            let value = percent_decode(value);
            match key {
                "url" => url = Some(value),
                "name" => name = Some(value),
                "source" => source = Some(value),
                _ => {}
            }
        }
        Some(Self {
            url: url.filter(|u| !u.is_empty())?,
            name: name.unwrap_or_else(|| UNKNOWN_FILE.to_string()),
            source: source.unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
        })
    }

    /// Which install instructions the confirmation page should show.
    pub fn help_topic(&self) -> HelpTopic {
        let source = self.source.trim().to_lowercase();
        if source.contains("cert") {
            HelpTopic::Certificate
        } else if source.contains("dns") || source.contains("nomad") {
            HelpTopic::DnsProfile
        } else if source.contains("repo") || source.contains("ipa") {
            HelpTopic::IpaPackage
        } else {
            HelpTopic::General
        }
    }
}

/// Contextual install instructions, classified from the source name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Certificate,
    DnsProfile,
    IpaPackage,
    General,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, download: Option<&str>) -> Item {
        Item {
            display_name: name.to_string(),
            download_url: download.map(str::to_string),
            ..Item::default()
        }
    }

    fn source(name: &str) -> Source {
        Source {
            name: name.to_string(),
            url: "https://x/a.json".to_string(),
        }
    }

    #[test]
    fn items_without_download_url_produce_no_handoff() {
        assert!(InstallRequest::for_item(&item("Bar", None), &source("Acme")).is_none());
    }

    #[test]
    fn page_url_encodes_all_three_parameters() {
        let request =
            InstallRequest::for_item(&item("My App", Some("https://x/a b.ipa")), &source("Acme Repo"))
                .unwrap();
        assert_eq!(
            request.page_url("install.html"),
            "install.html?url=https%3A%2F%2Fx%2Fa%20b.ipa&name=My%20App&source=Acme%20Repo"
        );
    }

    #[test]
    fn query_round_trips() {
        let request = InstallRequest {
            url: "https://x/foo.ipa?v=1".into(),
            name: "Foo".into(),
            source: "Acme".into(),
        };
        let parsed = InstallRequest::from_query(
            request.page_url("install.html").split_once('?').unwrap().1,
        )
        .unwrap();
        assert_eq!(parsed, request);
    }

    #[test]
    fn missing_name_and_source_fall_back_to_placeholders() {
        let parsed = InstallRequest::from_query("url=https%3A%2F%2Fx%2Fa.ipa").unwrap();
        assert_eq!(parsed.name, UNKNOWN_FILE);
        assert_eq!(parsed.source, UNKNOWN_SOURCE);
    }

    #[test]
    fn missing_url_means_nothing_to_confirm() {
        assert!(InstallRequest::from_query("name=Foo&source=Acme").is_none());
        assert!(InstallRequest::from_query("url=&name=Foo").is_none());
    }

    #[test]
    fn help_topic_classification() {
        let topic = |src: &str| InstallRequest {
            url: "https://x/f".into(),
            name: "f".into(),
            source: src.into(),
        }
        .help_topic();

        assert_eq!(topic("Trusted Certificates"), HelpTopic::Certificate);
        assert_eq!(topic("DNS Nomad"), HelpTopic::DnsProfile);
        assert_eq!(topic("Acme IPA Repository"), HelpTopic::IpaPackage);
        assert_eq!(topic("Some Mirror"), HelpTopic::General);
    }
}
