#![allow(dead_code)]

use async_trait::async_trait;
use catalog_render::resolve::FetchedResponse;
use catalog_render::*;
use std::io::Cursor;
use std::sync::Mutex;

pub fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([200, 30, 30]));
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

/// Fetcher that records every requested URL and answers with a fixed response
pub struct RecordingFetcher {
    pub calls: Mutex<Vec<String>>,
    response: std::result::Result<FetchedResponse, String>,
}

impl RecordingFetcher {
    pub fn serving_png() -> Self {
        Self::with_response(Ok(FetchedResponse {
            status: 200,
            content_type: Some("image/png".to_string()),
            body: png_bytes(),
        }))
    }

    pub fn with_response(response: std::result::Result<FetchedResponse, String>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            response,
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpFetch for RecordingFetcher {
    async fn get(&self, url: &str) -> std::result::Result<FetchedResponse, String> {
        self.calls.lock().unwrap().push(url.to_string());
        self.response.clone()
    }
}

pub fn record(category: &str, name: &str, image: &str) -> ProductRecord {
    ProductRecord {
        category: category.to_string(),
        name: name.to_string(),
        description: format!("Descripción de {}", name),
        price: "100".to_string(),
        stock: "5".to_string(),
        image_reference: image.to_string(),
    }
}

/// The demo catalog: Electrónica x2, Hogar, Ropa
pub fn demo_table() -> ProductTable {
    let mut raw = RawTable::new(
        ["categoria", "nombre", "descripcion", "precio", "stock", "imagen"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    );
    raw.push_values([
        "Electrónica",
        "Televisor Samsung 40\"",
        "Smart TV 40 pulgadas",
        "250",
        "8",
        "https://drive.google.com/file/d/10VB9sF9j6FXvRRCFM4t7t7idBkz9KARc/view?usp=sharing",
    ]);
    raw.push_values([
        "Hogar",
        "Silla ergonómica",
        "Con soporte lumbar",
        "80",
        "12",
        "https://drive.google.com/file/d/1vV9AD4S1zowIrW-rtTq-6Zb8xRj1zPqg/view?usp=sharing",
    ]);
    raw.push_values([
        "Electrónica",
        "Laptop HP 15\"",
        "15'' RAM 8GB",
        "500",
        "4",
        "https://drive.google.com/file/d/1bVgLB1ps02AYEzoPEQnsxB5lUfO9dJDY/view?usp=sharing",
    ]);
    raw.push_values([
        "Ropa",
        "Camiseta Polo",
        "Algodón premium",
        "30",
        "30",
        "",
    ]);
    normalize_table(&raw)
}
