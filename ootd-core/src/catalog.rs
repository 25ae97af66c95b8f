use tracing::warn;

use crate::client::supabase::ClothesRow;
use crate::error::{Error, Result};
use crate::model::{Category, ClothingItem};

/// The clothing catalog partitioned into the fixed categories, in store
/// order. The model is only ever shown items from here, and its reply is
/// validated against it.
#[derive(Debug, Clone)]
pub struct CategorizedCatalog {
    items: Vec<ClothingItem>,
}

impl CategorizedCatalog {
    /// Build the catalog from raw store rows. Rows with an unrecognized
    /// category are dropped with a warning; empty categories are logged but
    /// tolerated, since the model simply has nothing to pick there.
    pub fn partition(rows: Vec<ClothesRow>) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::CatalogUnavailable(
                "the clothes table returned no rows".to_string(),
            ));
        }

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            match Category::try_from(row.category.as_str()) {
                Ok(category) => items.push(ClothingItem {
                    id: row.id,
                    name: row.name,
                    category,
                    image_url: row.image_url,
                }),
                Err(_) => {
                    warn!(id = row.id, category = %row.category, "dropping item with unrecognized category");
                }
            }
        }

        if items.is_empty() {
            return Err(Error::CatalogUnavailable(
                "no clothing item has a recognized category".to_string(),
            ));
        }

        let catalog = Self { items };
        for category in Category::all() {
            if catalog.in_category(category).next().is_none() {
                warn!(%category, "category has no clothing items");
            }
        }

        Ok(catalog)
    }

    pub fn items(&self) -> &[ClothingItem] {
        &self.items
    }

    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &ClothingItem> + '_ {
        self.items.iter().filter(move |item| item.category == category)
    }

    pub fn contains_id(&self, id: i64) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
