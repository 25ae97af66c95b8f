use chrono::Utc;
use serde_json::Value;
use tracing::info;

use crate::client::StoreClient;
use crate::client::supabase::{StudyMaterialInsert, StudyMaterialPatch};
use crate::error::Result;
use crate::model::{NewStudyMaterial, StudyMaterial, StudyMaterialUpdate};

/// CRUD over the study materials. Input validation and timestamping happen
/// here; persistence is delegated to the store.
#[derive(Debug, Clone)]
pub struct StudyMaterials {
    store: StoreClient,
}

impl StudyMaterials {
    pub fn new(store: StoreClient) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<StudyMaterial>> {
        self.store.list_study_materials().await
    }

    /// Validate the required fields, stamp `created_at`, insert, and return
    /// the stored row. Nothing touches the store until validation passes.
    pub async fn create(&self, body: &Value) -> Result<StudyMaterial> {
        let new = NewStudyMaterial::from_value(body)?;
        let row = StudyMaterialInsert {
            title: new.title,
            content: new.content,
            category: new.category,
            created_at: Utc::now().to_rfc3339(),
        };

        let stored = self.store.insert_study_material(&row).await?;
        info!(id = stored.id, "study material created");
        Ok(stored)
    }

    /// Apply a partial update, stamping `updated_at`.
    pub async fn update(&self, id: i64, update: StudyMaterialUpdate) -> Result<StudyMaterial> {
        let patch = StudyMaterialPatch {
            title: update.title,
            content: update.content,
            category: update.category,
            updated_at: Utc::now().to_rfc3339(),
        };

        let stored = self.store.update_study_material(id, &patch).await?;
        info!(id, "study material updated");
        Ok(stored)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.store.delete_study_material(id).await?;
        info!(id, "study material deleted");
        Ok(())
    }

    /// Search with optional filters; blank filter values mean no filter at
    /// all, matching how browsers send empty query fields.
    pub async fn search(
        &self,
        title_query: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<StudyMaterial>> {
        let title_query = title_query.map(str::trim).filter(|s| !s.is_empty());
        let category = category.map(str::trim).filter(|s| !s.is_empty());
        self.store.search_study_materials(title_query, category).await
    }
}
