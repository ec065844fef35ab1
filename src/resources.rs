//! Generic CRUD access to the business collections.
//!
//! The entity stores built on top of this crate (partners, products,
//! customers, projects, back-office users) all consume plain REST
//! collections that the gateway transparently authorizes. Their record
//! shapes are business-specific, so every operation here is generic over
//! caller-defined serde types.

use crate::error::{BackofficeLinkError, Result};
use crate::gateway::Gateway;
use crate::models::UploadResponse;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Well-known collection paths on the back-office API.
pub mod collections {
    pub const PARTNERS: &str = "/partners";
    pub const PRODUCTS: &str = "/products";
    pub const PRODUCT_CATEGORIES: &str = "/product-categories";
    pub const CUSTOMERS: &str = "/customers";
    pub const USERS: &str = "/users";
    pub const PROJECTS: &str = "/projects";
    pub const UPLOADER: &str = "/uploader";
}

/// Typed handle over the generic resource surface.
#[derive(Clone)]
pub struct Resources {
    gateway: Gateway,
}

impl Resources {
    pub(crate) fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// List every record in a collection.
    pub async fn list<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>> {
        self.gateway.get_json(collection).await
    }

    /// Fetch one record by id.
    pub async fn get<T: DeserializeOwned>(&self, collection: &str, id: &str) -> Result<T> {
        self.gateway.get_json(&format!("{}/{}", collection, id)).await
    }

    /// Create a record.
    pub async fn create<B, T>(&self, collection: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.gateway.post_json(collection, body).await
    }

    /// Update a record by id.
    pub async fn update<B, T>(&self, collection: &str, id: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.gateway
            .patch_json(&format!("{}/{}", collection, id), body)
            .await
    }

    /// Delete a record by id.
    pub async fn remove(&self, collection: &str, id: &str) -> Result<()> {
        self.gateway.delete(&format!("{}/{}", collection, id)).await
    }

    /// Upload a file to the image library.
    pub async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse> {
        let filename = filename.to_string();
        let content_type = content_type.to_string();
        self.gateway
            .post_multipart(collections::UPLOADER, move || {
                let part = reqwest::multipart::Part::bytes(bytes.clone())
                    .file_name(filename.clone())
                    .mime_str(&content_type)
                    .map_err(|e| {
                        BackofficeLinkError::ConfigurationError(format!(
                            "Invalid content type '{}': {}",
                            content_type, e
                        ))
                    })?;
                Ok(reqwest::multipart::Form::new().part("file", part))
            })
            .await
    }
}
