//! Ontology Lookup Service client.
//!
//! Queries the OLS search API (`<base_url>/api/search`) with exact matching
//! and takes the top hit. Requests are blocking and never retried.

use std::time::Duration;

use log::debug;
use reqwest::Url;
use reqwest::blocking::Client;
use serde::Deserialize;

use super::lookup::{Term, TermLookup};
use crate::error::{HarmonyError, Result};

/// Default OLS endpoint.
pub const DEFAULT_OLS_URL: &str = "https://www.ebi.ac.uk/ols4";

/// Configuration for [`OlsClient`].
#[derive(Debug, Clone)]
pub struct OlsConfig {
    /// Service root, without the `/api` suffix.
    pub base_url: String,
    /// Restrict searches to one ontology (e.g. `ncit`).
    pub ontology: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for OlsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLS_URL.to_string(),
            ontology: None,
            timeout: Duration::from_secs(30),
        }
    }
}

impl OlsConfig {
    /// Set the service root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Restrict searches to one ontology.
    pub fn with_ontology(mut self, ontology: impl Into<String>) -> Self {
        self.ontology = Some(ontology.into());
        self
    }
}

/// Blocking OLS search client.
pub struct OlsClient {
    client: Client,
    config: OlsConfig,
}

impl OlsClient {
    /// Create a client against the public EBI service.
    pub fn new() -> Result<Self> {
        Self::with_config(OlsConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(config: OlsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| HarmonyError::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// Build a search URL for `query` restricted to `fields`.
    fn search_url(&self, query: &str, fields: &str) -> Result<Url> {
        let endpoint = format!("{}/api/search", self.config.base_url.trim_end_matches('/'));
        let mut params = vec![
            ("q", query),
            ("queryFields", fields),
            ("exact", "true"),
            ("rows", "1"),
        ];
        if let Some(ontology) = &self.config.ontology {
            params.push(("ontology", ontology.as_str()));
        }
        Url::parse_with_params(&endpoint, &params)
            .map_err(|e| HarmonyError::Config(format!("Invalid OLS URL '{}': {}", endpoint, e)))
    }

    fn search(&self, query: &str, fields: &str) -> Result<Option<Term>> {
        let url = self.search_url(query, fields)?;
        debug!("OLS search: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| HarmonyError::Lookup(format!("OLS request for '{}' failed: {}", query, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(HarmonyError::Lookup(format!(
                "OLS error ({}) for '{}': {}",
                status, query, error_text
            )));
        }

        let body: SearchResponse = response
            .json()
            .map_err(|e| HarmonyError::Lookup(format!("Failed to parse OLS response: {}", e)))?;
        Ok(body.top_term())
    }
}

impl TermLookup for OlsClient {
    fn lookup_label(&self, label: &str) -> Result<Option<Term>> {
        self.search(label, "label,synonym")
    }

    fn lookup_identifier(&self, id: &str) -> Result<Option<Term>> {
        if id.contains("://") {
            self.search(id, "iri")
        } else {
            self.search(id, "obo_id,short_form")
        }
    }

    fn name(&self) -> &str {
        "ols"
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    response: SearchDocs,
}

#[derive(Debug, Deserialize)]
struct SearchDocs {
    #[serde(default)]
    docs: Vec<SearchDoc>,
}

#[derive(Debug, Deserialize)]
struct SearchDoc {
    iri: String,
    label: String,
    #[serde(default)]
    description: Vec<String>,
}

impl SearchResponse {
    fn top_term(self) -> Option<Term> {
        self.response.docs.into_iter().next().map(|doc| Term {
            iri: doc.iri,
            label: doc.label,
            description: doc.description.into_iter().next().unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url() {
        let client = OlsClient::with_config(
            OlsConfig::default()
                .with_base_url("https://ols.example/")
                .with_ontology("ncit"),
        )
        .unwrap();
        let url = client.search_url("eye color", "label").unwrap();

        assert_eq!(url.path(), "/api/search");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("q".to_string(), "eye color".to_string())));
        assert!(pairs.contains(&("ontology".to_string(), "ncit".to_string())));
        assert!(pairs.contains(&("exact".to_string(), "true".to_string())));
    }

    #[test]
    fn test_parse_search_response() {
        let body = r#"{
            "response": {
                "numFound": 1,
                "docs": [{
                    "iri": "http://purl.obolibrary.org/obo/PATO_0000383",
                    "label": "female",
                    "obo_id": "PATO:0000383",
                    "description": ["A biological sex quality inhering in an individual."]
                }]
            }
        }"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        let term = parsed.top_term().unwrap();
        assert_eq!(term.label, "female");
        assert_eq!(term.iri, "http://purl.obolibrary.org/obo/PATO_0000383");
        assert!(term.description.starts_with("A biological sex"));
    }

    #[test]
    fn test_parse_empty_response() {
        let parsed: SearchResponse =
            serde_json::from_str(r#"{"response": {"numFound": 0, "docs": []}}"#).unwrap();
        assert!(parsed.top_term().is_none());
    }
}
