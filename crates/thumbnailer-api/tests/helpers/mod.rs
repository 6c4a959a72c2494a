//! Test helpers: build the webhook router over in-memory storage.
//!
//! Run from workspace root: `cargo test -p thumbnailer-api --test event_grid_test`.

#![allow(dead_code)]

use axum_test::TestServer;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use serde_json::{json, Value};
use std::io::Cursor;
use std::num::NonZeroU32;
use std::sync::Arc;
use thumbnailer_api::setup::routes;
use thumbnailer_api::AppState;
use thumbnailer_core::{SourceAccess, StorageBackend, ThumbnailConfig};
use thumbnailer_storage::MemoryStorage;
use thumbnailer_worker::EventPipeline;

pub const ACCOUNT_URL: &str = "https://acct.blob.core.windows.net";
pub const SOURCE_CONTAINER: &str = "images";
pub const THUMBNAIL_CONTAINER: &str = "thumbnails";

/// Test application: server plus a handle on the storage it writes to.
pub struct TestApp {
    pub server: TestServer,
    pub storage: MemoryStorage,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Seed a source blob and return its url
    pub fn seed_blob(&self, name: &str, data: Vec<u8>) -> String {
        self.storage
            .insert(SOURCE_CONTAINER, name, data, "application/octet-stream");
        blob_url(name)
    }
}

pub fn setup_test_app(thumbnail_width: u32) -> TestApp {
    let storage = MemoryStorage::new();
    let config = ThumbnailConfig {
        thumbnail_width: NonZeroU32::new(thumbnail_width).expect("width must be non-zero"),
        destination_container: THUMBNAIL_CONTAINER.to_string(),
        source_access: SourceAccess {
            backend: StorageBackend::Memory,
            ..Default::default()
        },
    };

    let pipeline = EventPipeline::new(Arc::new(storage.clone()), &config);
    let app = routes::setup_routes(Arc::new(AppState::new(pipeline)));
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp { server, storage }
}

pub fn blob_url(name: &str) -> String {
    format!("{}/{}/{}", ACCOUNT_URL, SOURCE_CONTAINER, name)
}

/// Event Grid `Microsoft.Storage.BlobCreated` envelope around `data`
pub fn blob_created_event(data: Value) -> Value {
    json!({
        "id": "831e1650-001e-001b-66ab-eeb76e069631",
        "topic": "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.Storage/storageAccounts/acct",
        "subject": "/blobServices/default/containers/images/blobs/upload",
        "eventType": "Microsoft.Storage.BlobCreated",
        "eventTime": "2024-05-01T12:00:00.000Z",
        "data": data,
        "dataVersion": "",
        "metadataVersion": "1"
    })
}

pub fn blob_created_for(url: &str) -> Value {
    blob_created_event(json!({
        "api": "PutBlob",
        "contentType": "image/jpeg",
        "blobType": "BlockBlob",
        "url": url
    }))
}

pub fn image_bytes(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 64])
    }));
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, format)
        .expect("Failed to encode fixture image");
    buffer.into_inner()
}
