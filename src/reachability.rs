//! Service reachability checker.
//!
//! Probes a running backend: one GET per expected image under
//! `/api/images/voitures/` and one GET of the available-cars listing. It is
//! a diagnostic: every probe is attempted, results are written as readable
//! lines to the supplied writer, and nothing short of a writer failure is
//! returned as an error.

use std::io::Write;
use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::Value;

use crate::outcome::{BatchSummary, ItemOutcome};
use crate::{Error, Result, ToolConfig};

const RULE_WIDTH: usize = 50;
const MISSING: &str = "N/A";

/// One car as returned by `/api/voitures/disponibles`. Fields are kept as
/// raw JSON so a non-string value is still printed instead of failing the
/// whole listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Listing {
    pub marque: Option<Value>,
    pub modele: Option<Value>,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<Value>,
}

impl Listing {
    pub fn brand(&self) -> String {
        field_text(&self.marque)
    }

    pub fn model(&self) -> String {
        field_text(&self.modele)
    }

    pub fn image(&self) -> String {
        field_text(&self.image_url)
    }
}

/// Strings print bare, other JSON values print as JSON, absent or null
/// fields print `N/A`.
fn field_text(field: &Option<Value>) -> String {
    match field {
        None | Some(Value::Null) => MISSING.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct ListingEnvelope {
    success: Option<bool>,
    data: Option<Vec<Listing>>,
}

/// What the listing endpoint check observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingCheck {
    /// `success: true` with a non-empty `data` array
    Listed(Vec<Listing>),
    /// 2xx response whose body does not have the expected shape
    UnexpectedShape,
    /// Non-2xx response
    HttpStatus(u16),
    /// The request never produced a response
    Transport(String),
}

pub struct ServiceReachabilityChecker {
    client: Client,
    base_url: String,
    timeout_ms: u64,
}

impl ServiceReachabilityChecker {
    pub fn new(config: &ToolConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.probe_timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::NetworkError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_ms: config.probe_timeout_ms,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn image_url(&self, name: &str) -> String {
        format!("{}/api/images/voitures/{}", self.base_url, name)
    }

    pub fn listing_url(&self) -> String {
        format!("{}/api/voitures/disponibles", self.base_url)
    }

    /// Probe a single image. Success carries the response content type.
    pub fn probe_image(&self, name: &str) -> ItemOutcome {
        let url = self.image_url(name);
        debug!("GET {}", url);
        match self.client.get(&url).send() {
            Ok(res) if res.status().is_success() => {
                let content_type = res
                    .headers()
                    .get(CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown")
                    .to_string();
                ItemOutcome::success(name, content_type)
            }
            Ok(res) => ItemOutcome::failure(name, format!("HTTP {}", res.status().as_u16())),
            Err(e) if e.is_timeout() => {
                warn!("Probe of {} timed out", url);
                ItemOutcome::failure(name, Error::Timeout(self.timeout_ms).to_string())
            }
            Err(e) => {
                warn!("Probe of {} failed: {}", url, e);
                ItemOutcome::failure(name, format!("connection error: {}", e))
            }
        }
    }

    /// Probe every name in order and write a per-image line plus a summary.
    /// `summary.counts()` is `(successCount, total)`.
    pub fn check_images<W: Write>(&self, names: &[String], out: &mut W) -> Result<BatchSummary> {
        writeln!(out, "Checking car image access...")?;
        writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;

        let mut summary = BatchSummary::new();
        for name in names {
            let outcome = self.probe_image(name);
            if outcome.succeeded {
                writeln!(out, "✓ {} - OK ({})", outcome.name, outcome.detail)?;
            } else {
                writeln!(out, "✗ {} - {}", outcome.name, outcome.detail)?;
            }
            out.flush()?;
            summary.push(outcome);
        }

        writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(
            out,
            "Result: {}/{} images reachable",
            summary.succeeded(),
            summary.total()
        )?;
        if summary.all_succeeded() {
            writeln!(out, "All images are reachable")?;
        } else {
            writeln!(out, "Some images are not reachable")?;
            writeln!(out, "Check that the backend is running at {}", self.base_url)?;
        }
        Ok(summary)
    }

    /// Fetch the available-cars listing and classify the response.
    pub fn fetch_listing(&self) -> ListingCheck {
        let url = self.listing_url();
        debug!("GET {}", url);
        let res = match self.client.get(&url).send() {
            Ok(res) => res,
            Err(e) => return ListingCheck::Transport(e.to_string()),
        };
        if !res.status().is_success() {
            return ListingCheck::HttpStatus(res.status().as_u16());
        }
        let body = match res.text() {
            Ok(body) => body,
            Err(e) => return ListingCheck::Transport(e.to_string()),
        };
        parse_listing(&body)
    }

    /// Check the listing API and write one line per listed car.
    pub fn check_listing_api<W: Write>(&self, out: &mut W) -> Result<ListingCheck> {
        writeln!(out, "\nChecking the car listing API...")?;
        writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;

        let check = self.fetch_listing();
        match &check {
            ListingCheck::Listed(listings) => {
                writeln!(out, "{} cars found", listings.len())?;
                for listing in listings {
                    writeln!(
                        out,
                        "  - {} {} - Image: {}",
                        listing.brand(),
                        listing.model(),
                        listing.image(),
                    )?;
                }
            }
            ListingCheck::UnexpectedShape => writeln!(out, "✗ Unexpected response format")?,
            ListingCheck::HttpStatus(code) => writeln!(out, "✗ API error: {}", code)?,
            ListingCheck::Transport(e) => writeln!(out, "✗ Connection error: {}", e)?,
        }
        Ok(check)
    }
}

/// Classify a 2xx listing body. Anything but `success: true` with a
/// non-empty `data` array counts as an unexpected shape.
pub fn parse_listing(body: &str) -> ListingCheck {
    match serde_json::from_str::<ListingEnvelope>(body) {
        Ok(ListingEnvelope {
            success: Some(true),
            data: Some(listings),
        }) if !listings.is_empty() => ListingCheck::Listed(listings),
        Ok(_) => ListingCheck::UnexpectedShape,
        Err(e) => {
            debug!("Listing body did not parse: {}", e);
            ListingCheck::UnexpectedShape
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_listing_accepts_expected_shape() {
        let body = r#"{"success": true, "data": [{"marque":"Toyota","modele":"Corolla","imageUrl":"/img/t.jpg"}]}"#;
        match parse_listing(body) {
            ListingCheck::Listed(listings) => {
                assert_eq!(listings.len(), 1);
                assert_eq!(listings[0].brand(), "Toyota");
                assert_eq!(listings[0].image(), "/img/t.jpg");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn parse_listing_tolerates_missing_fields() {
        let body = r#"{"success": true, "data": [{"marque":"Fiat"}], "message": "ok"}"#;
        match parse_listing(body) {
            ListingCheck::Listed(listings) => {
                assert_eq!(listings[0].modele, None);
                assert_eq!(listings[0].model(), "N/A");
                assert_eq!(listings[0].image(), "N/A");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn parse_listing_keeps_non_string_fields() {
        let body = r#"{"success": true, "data": [
            {"marque": 123, "modele": "Clio", "imageUrl": null},
            {"marque": "Toyota", "modele": "Corolla", "imageUrl": "/img/t.jpg"}
        ]}"#;
        match parse_listing(body) {
            ListingCheck::Listed(listings) => {
                assert_eq!(listings.len(), 2);
                assert_eq!(listings[0].brand(), "123");
                assert_eq!(listings[0].model(), "Clio");
                assert_eq!(listings[0].image(), "N/A");
                assert_eq!(listings[1].brand(), "Toyota");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn parse_listing_flags_unexpected_shapes() {
        for body in [
            r#"{"success": false, "data": [{"marque":"Fiat"}]}"#,
            r#"{"success": true, "data": []}"#,
            r#"{"success": true}"#,
            r#"[1, 2, 3]"#,
            "<html>oops</html>",
        ] {
            assert_eq!(parse_listing(body), ListingCheck::UnexpectedShape, "{}", body);
        }
    }

    #[test]
    fn urls_are_built_from_trimmed_base() {
        let config = ToolConfig {
            base_url: "http://localhost:8080/".into(),
            ..Default::default()
        };
        let checker = ServiceReachabilityChecker::new(&config).unwrap();
        assert_eq!(
            checker.image_url("bmw-x3.svg"),
            "http://localhost:8080/api/images/voitures/bmw-x3.svg"
        );
        assert_eq!(checker.listing_url(), "http://localhost:8080/api/voitures/disponibles");
    }
}
