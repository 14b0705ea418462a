//! MongoDB document store for processed images
//!
//! One document per image: the path, the preprocessed pixel array, the
//! extracted feature vector and the one-hot label. MongoDB is treated as an
//! opaque key-document store reachable over a local socket; the synchronous
//! client keeps the pipeline single-threaded and blocking.

use mongodb::bson::{doc, Bson, Document};
use mongodb::options::FindOptions;
use mongodb::sync::{Client, Collection};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::utils::error::{PipelineError, Result};

/// Default connection string for a local MongoDB instance
pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017/";

/// Database name for the visual search system
pub const DATABASE_NAME: &str = "visual_search_db";

/// Collection holding one document per processed image
pub const COLLECTION_NAME: &str = "images";

/// One stored image record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageDocument {
    /// Source path of the image
    pub image_path: String,
    /// Preprocessed pixel data as a nested `[channel][row][col]` array
    pub processed_image: Vec<Vec<Vec<f32>>>,
    /// Extracted feature vector
    pub features: Vec<f32>,
    /// One-hot encoded label
    pub label: Vec<f32>,
}

/// Handle to the images collection
pub struct ImageStore {
    collection: Collection<ImageDocument>,
}

impl ImageStore {
    /// Connect to MongoDB and open the images collection
    pub fn connect(uri: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri)?;
        let collection = client
            .database(DATABASE_NAME)
            .collection::<ImageDocument>(COLLECTION_NAME);

        info!("Connected to MongoDB at {}", uri);
        Ok(Self { collection })
    }

    /// Connect to the default local instance
    pub fn connect_local() -> Result<Self> {
        Self::connect(DEFAULT_MONGO_URI)
    }

    /// Insert a single document
    pub fn insert_one(&self, document: &ImageDocument) -> Result<()> {
        let result = self.collection.insert_one(document, None)?;
        info!("Inserted document with ID: {}", result.inserted_id);
        Ok(())
    }

    /// Insert a batch of documents. The caller is expected to have filtered
    /// out invalid samples already.
    pub fn insert_many(&self, documents: &[ImageDocument]) -> Result<usize> {
        if documents.is_empty() {
            return Ok(0);
        }

        let result = self.collection.insert_many(documents, None)?;
        let count = result.inserted_ids.len();
        info!("Inserted {} documents into '{}'", count, COLLECTION_NAME);
        Ok(count)
    }

    /// Query documents matching the given filter (all documents when `None`)
    pub fn find(&self, filter: Option<Document>) -> Result<Vec<ImageDocument>> {
        let cursor = self.collection.find(filter.unwrap_or_default(), None)?;
        let documents: std::result::Result<Vec<_>, _> = cursor.collect();
        let documents = documents?;
        info!("Retrieved {} documents", documents.len());
        Ok(documents)
    }

    /// Fetch the feature vectors of all documents
    pub fn fetch_features(&self) -> Result<Vec<Vec<f32>>> {
        self.fetch_float_arrays("features")
    }

    /// Fetch the one-hot labels of all documents
    pub fn fetch_labels(&self) -> Result<Vec<Vec<f32>>> {
        self.fetch_float_arrays("label")
    }

    /// Projection query pulling one float-array field from every document
    fn fetch_float_arrays(&self, field: &str) -> Result<Vec<Vec<f32>>> {
        let options = FindOptions::builder()
            .projection(doc! { field: 1, "_id": 0 })
            .build();

        let raw = self.collection.clone_with_type::<Document>();
        let cursor = raw.find(doc! {}, options)?;

        let mut arrays = Vec::new();
        for document in cursor {
            let document = document?;
            let values = document
                .get_array(field)
                .map_err(|e| PipelineError::Storage(format!("Missing '{}' field: {}", field, e)))?;
            arrays.push(bson_to_f32s(values)?);
        }

        info!("Fetched {} '{}' arrays", arrays.len(), field);
        Ok(arrays)
    }

    /// Number of stored documents
    pub fn count(&self) -> Result<u64> {
        Ok(self.collection.count_documents(doc! {}, None)?)
    }

    /// Drop all documents (used by tests)
    pub fn clear(&self) -> Result<()> {
        self.collection.delete_many(doc! {}, None)?;
        Ok(())
    }
}

fn bson_to_f32s(values: &[Bson]) -> Result<Vec<f32>> {
    values
        .iter()
        .map(|v| {
            v.as_f64()
                .map(|f| f as f32)
                .or_else(|| v.as_i64().map(|i| i as f32))
                .or_else(|| v.as_i32().map(|i| i as f32))
                .ok_or_else(|| {
                    PipelineError::Storage(format!("Non-numeric array element: {:?}", v))
                })
        })
        .collect()
}
