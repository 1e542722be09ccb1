//! Product fixture types

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Cell values that mark a product as available in a scenario table
const TRUTHY: [&str; 3] = ["True", "true", "1"];

/// Columns every product table must carry
pub const PRODUCT_COLUMNS: [&str; 5] = ["name", "description", "price", "available", "category"];

/// A product as sent to the create endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub description: String,
    pub price: String,
    pub available: bool,
    pub category: String,
}

impl Product {
    /// Parse a scenario table (header row first) into products.
    ///
    /// Columns are matched by header name, so their order is free. Extra
    /// columns are ignored.
    pub fn from_table(rows: &[Vec<String>]) -> Result<Vec<Self>> {
        let Some((header, body)) = rows.split_first() else {
            return Ok(Vec::new());
        };

        let mut index = [0usize; 5];
        for (slot, column) in index.iter_mut().zip(PRODUCT_COLUMNS) {
            *slot = header
                .iter()
                .position(|h| h.trim() == column)
                .ok_or_else(|| Error::InvalidFixture(format!("missing column '{}'", column)))?;
        }

        body.iter()
            .enumerate()
            .map(|(n, row)| {
                let cell = |i: usize| {
                    row.get(index[i]).cloned().ok_or_else(|| {
                        Error::InvalidFixture(format!(
                            "row {} has {} cells, header has {}",
                            n + 1,
                            row.len(),
                            header.len()
                        ))
                    })
                };
                Ok(Self {
                    name: cell(0)?,
                    description: cell(1)?,
                    price: cell(2)?,
                    available: is_truthy(&cell(3)?),
                    category: cell(4)?,
                })
            })
            .collect()
    }
}

/// Whether a table cell reads as `true`
pub fn is_truthy(cell: &str) -> bool {
    TRUTHY.contains(&cell)
}

/// Server-assigned product identifier, numeric or textual
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Number(n) => write!(f, "{}", n),
            ProductId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A product as returned by the list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredProduct {
    pub id: ProductId,
    #[serde(flatten)]
    pub product: Product,
}

/// Only the identifier is needed to reset the catalog
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ListedProduct {
    pub id: ProductId,
}
