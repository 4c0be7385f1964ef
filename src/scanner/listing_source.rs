use async_trait::async_trait;
use reqwest::header::DATE;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;

use super::listing::Listing;
use crate::core::config::SourceConfig;
use crate::core::SourceError;

pub const CONTAINER_SELECTOR: &str = ".multiLineDisplay";
pub const ADDRESS_SELECTOR: &str = ".formula.J_formula a";
pub const BADGE_SELECTOR: &str = ".mtx-subheader-badge";

/// What one successful poll of the listing page yielded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceSnapshot {
    /// First entry with an address, in document order.
    pub current: Option<Listing>,
    pub entries_found: usize,
    /// The response's `Date` header, verbatim.
    pub server_date: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn poll(&self) -> Result<SourceSnapshot, SourceError>;
}

pub struct ListingSelectors {
    container: Selector,
    address: Selector,
    badge: Selector,
}

fn parse_selector(selector: &str) -> Result<Selector, SourceError> {
    Selector::parse(selector).map_err(|e| SourceError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

impl ListingSelectors {
    pub fn new(container: &str, address: &str, badge: &str) -> Result<Self, SourceError> {
        Ok(Self {
            container: parse_selector(container)?,
            address: parse_selector(address)?,
            badge: parse_selector(badge)?,
        })
    }

    fn listing_from(&self, entry: ElementRef<'_>) -> Option<Listing> {
        let address = entry
            .select(&self.address)
            .map(|anchor| anchor.text().collect::<String>().trim().to_string())
            .find(|text| !text.is_empty())?;

        let is_repriced = entry
            .select(&self.badge)
            .next()
            .map(|badge| Listing::is_reprice_label(badge.text().collect::<String>().trim()))
            .unwrap_or(false);

        Some(Listing::new(address, is_repriced))
    }

    /// Listings found in the first `max_entries` containers, in document order.
    pub fn extract(&self, html: &str, max_entries: usize) -> Vec<Listing> {
        let document = Html::parse_document(html);
        document
            .select(&self.container)
            .take(max_entries)
            .filter_map(|entry| self.listing_from(entry))
            .collect()
    }
}

pub struct HtmlListingSource {
    client: Client,
    url: String,
    max_entries: usize,
    selectors: ListingSelectors,
}

impl HtmlListingSource {
    pub fn new(config: &SourceConfig) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            url: config.listing_url.clone(),
            max_entries: config.max_entries,
            selectors: ListingSelectors::new(
                &config.container_selector,
                &config.address_selector,
                &config.badge_selector,
            )?,
        })
    }
}

#[async_trait]
impl ListingSource for HtmlListingSource {
    async fn poll(&self) -> Result<SourceSnapshot, SourceError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let server_date = response
            .headers()
            .get(DATE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        let listings = self.selectors.extract(&body, self.max_entries);
        Ok(SourceSnapshot {
            entries_found: listings.len(),
            current: listings.into_iter().next(),
            server_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(address_anchors: &[&str], badge: Option<&str>) -> String {
        let anchors: String = address_anchors
            .iter()
            .map(|text| format!("<a href=\"#\">{}</a>", text))
            .collect();
        let badge = badge
            .map(|label| format!("<span class=\"mtx-subheader-badge\">{}</span>", label))
            .unwrap_or_default();
        format!(
            "<div class=\"multiLineDisplay\">{}<div class=\"formula J_formula\">{}</div></div>",
            badge, anchors
        )
    }

    fn standard() -> ListingSelectors {
        ListingSelectors::new(CONTAINER_SELECTOR, ADDRESS_SELECTOR, BADGE_SELECTOR).unwrap()
    }

    fn page(entries: &[String]) -> String {
        format!("<html><body>{}</body></html>", entries.concat())
    }

    #[test]
    fn test_first_entry_with_address_wins() {
        let html = page(&[
            entry(&["", "  "], None),
            entry(&["", "1234 Rue Berri, Montreal"], Some("New Price")),
            entry(&["99 Avenue Ogilvy, Montreal"], None),
        ]);

        let listings = standard().extract(&html, 20);
        assert_eq!(
            listings,
            vec![
                Listing::new("1234 Rue Berri, Montreal", true),
                Listing::new("99 Avenue Ogilvy, Montreal", false),
            ]
        );
    }

    #[test]
    fn test_french_badge_counts_as_reprice() {
        let html = page(&[entry(&["5 Rue Cartier, Laval"], Some(" Nouveau prix "))]);
        let listings = standard().extract(&html, 20);
        assert!(listings[0].is_repriced);
    }

    #[test]
    fn test_badge_match_is_case_sensitive() {
        let html = page(&[
            entry(&["5 Rue Cartier, Laval"], Some("new price")),
            entry(&["6 Rue Cartier, Laval"], Some("Open House")),
        ]);
        let listings = standard().extract(&html, 20);
        assert!(listings.iter().all(|l| !l.is_repriced));
    }

    #[test]
    fn test_max_entries_bounds_the_scan() {
        let html = page(&[
            entry(&[""], None),
            entry(&["2 Rue Test"], None),
        ]);
        assert!(standard().extract(&html, 1).is_empty());
    }

    #[test]
    fn test_page_without_listings_yields_nothing() {
        let html = "<html><body><p>Maintenance</p></body></html>";
        assert!(standard().extract(html, 20).is_empty());
    }

    #[test]
    fn test_invalid_selector_reported() {
        let err = ListingSelectors::new("..bad", ADDRESS_SELECTOR, BADGE_SELECTOR);
        assert!(matches!(err, Err(SourceError::Selector { .. })));
    }

    #[test]
    fn test_configured_selectors_are_used() {
        let mut config = crate::core::config::test_config().source;
        config.container_selector = "article.card".to_string();
        config.address_selector = "h2 a".to_string();
        config.badge_selector = ".ribbon".to_string();
        let source = HtmlListingSource::new(&config).unwrap();

        let html = r#"<article class="card"><span class="ribbon">New Price</span>
            <h2><a href="/x">77 Rue Custom, Montreal</a></h2></article>"#;
        assert_eq!(
            source.selectors.extract(html, 20),
            vec![Listing::new("77 Rue Custom, Montreal", true)]
        );
        assert!(standard().extract(html, 20).is_empty());
    }

    #[test]
    fn test_invalid_configured_selector_fails_construction() {
        let mut config = crate::core::config::test_config().source;
        config.badge_selector = "[unclosed".to_string();
        assert!(matches!(
            HtmlListingSource::new(&config),
            Err(SourceError::Selector { .. })
        ));
    }
}
