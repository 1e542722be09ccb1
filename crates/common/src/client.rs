//! REST client for the product fixture API

use reqwest::{Method, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::{ListedProduct, Product, ProductId, StoredProduct};

/// Client for the `/products` endpoints used to seed scenarios
#[derive(Debug, Clone)]
pub struct ProductClient {
    http: reqwest::Client,
    endpoint: String,
}

/// Outcome of a catalog reset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub deleted: usize,
    pub created: usize,
}

impl ProductClient {
    /// Create a client for the application at `base_url`
    pub fn new(base_url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self::with_http(http, base_url))
    }

    /// Create a client reusing an existing HTTP client
    pub fn with_http(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            endpoint: format!("{}/products", base_url.trim_end_matches('/')),
        }
    }

    /// The collection URL, e.g. `http://localhost:8080/products`
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// List the identifiers of every product
    pub async fn list_ids(&self) -> Result<Vec<ProductId>> {
        let resp = self.http.get(&self.endpoint).send().await?;
        let resp = expect_status(resp, Method::GET, StatusCode::OK)?;
        let listed: Vec<ListedProduct> = resp.json().await?;
        Ok(listed.into_iter().map(|p| p.id).collect())
    }

    /// List every product with its fields
    pub async fn list(&self) -> Result<Vec<StoredProduct>> {
        let resp = self.http.get(&self.endpoint).send().await?;
        let resp = expect_status(resp, Method::GET, StatusCode::OK)?;
        Ok(resp.json().await?)
    }

    /// Delete a single product
    pub async fn delete(&self, id: &ProductId) -> Result<()> {
        let url = format!("{}/{}", self.endpoint, id);
        let resp = self.http.delete(&url).send().await?;
        expect_status(resp, Method::DELETE, StatusCode::NO_CONTENT)?;
        debug!("Deleted product {}", id);
        Ok(())
    }

    /// Create a single product
    pub async fn create(&self, product: &Product) -> Result<()> {
        let resp = self.http.post(&self.endpoint).json(product).send().await?;
        expect_status(resp, Method::POST, StatusCode::CREATED)?;
        debug!("Created product '{}'", product.name);
        Ok(())
    }

    /// Delete every listed product, then create one product per row.
    ///
    /// Stops at the first unexpected status. Nothing is rolled back.
    pub async fn load_fixtures(&self, products: &[Product]) -> Result<LoadSummary> {
        let mut summary = LoadSummary::default();

        for id in self.list_ids().await? {
            self.delete(&id).await?;
            summary.deleted += 1;
        }

        for product in products {
            self.create(product).await?;
            summary.created += 1;
        }

        info!(
            "Fixtures loaded: {} deleted, {} created",
            summary.deleted, summary.created
        );
        Ok(summary)
    }
}

fn expect_status(resp: Response, method: Method, expected: StatusCode) -> Result<Response> {
    let actual = resp.status();
    debug!("{} {} -> {}", method, resp.url(), actual);
    if actual != expected {
        return Err(Error::UnexpectedStatus {
            method: method.to_string(),
            url: resp.url().to_string(),
            expected: expected.as_u16(),
            actual: actual.as_u16(),
        });
    }
    Ok(resp)
}
