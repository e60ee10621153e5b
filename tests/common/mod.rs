#![allow(dead_code)]

use actix_web::{web, App, HttpResponse};
use catalog_manager::models::{Category, Product, Rating};
use catalog_manager::state::lock;
use catalog_manager::{AppState, Settings};
use serde_json::Value;

/// Nothing listens here, so every remote call fails fast.
pub const UNREACHABLE: &str = "http://127.0.0.1:9";

pub fn product(id: i64, title: &str, category: Category) -> Product {
    Product {
        id,
        title: title.to_string(),
        price: 10.0 + id as f64,
        description: format!("Description of {}", title),
        category,
        image: "https://fakestoreapi.com/img/placeholder.jpg".to_string(),
        rating: Rating { rate: 3.5, count: 120 },
    }
}

/// `count` records with ids `1..=count`, cycling through the categories.
pub fn init_products(count: i64) -> Vec<Product> {
    (1..=count)
        .map(|id| {
            let category = Category::ALL[(id as usize - 1) % Category::ALL.len()];
            product(id, &format!("Sample Product {}", id), category)
        })
        .collect()
}

pub fn test_settings(base_url: &str) -> Settings {
    let mut settings = Settings::default();
    settings.remote.base_url = base_url.to_string();
    settings.listing.load_more_delay_ms = 0;
    settings
}

pub fn app_state(base_url: &str, products: Vec<Product>) -> web::Data<AppState> {
    let state = AppState::new(test_settings(base_url)).expect("test settings are valid");
    lock(&state.catalog).load(products);
    web::Data::new(state)
}

#[derive(Clone)]
struct FakeStore {
    products: Vec<Product>,
    created: Value,
    fail: bool,
}

async fn fake_all(store: web::Data<FakeStore>) -> HttpResponse {
    if store.fail {
        return HttpResponse::InternalServerError().finish();
    }
    HttpResponse::Ok().json(&store.products)
}

async fn fake_category(store: web::Data<FakeStore>, category: web::Path<String>) -> HttpResponse {
    if store.fail {
        return HttpResponse::InternalServerError().finish();
    }
    let wanted = category.into_inner();
    let matching: Vec<&Product> = store
        .products
        .iter()
        .filter(|p| p.category.as_str() == wanted)
        .collect();
    HttpResponse::Ok().json(matching)
}

async fn fake_create(store: web::Data<FakeStore>) -> HttpResponse {
    if store.fail {
        return HttpResponse::InternalServerError().finish();
    }
    HttpResponse::Ok().json(&store.created)
}

/// An in-process stand-in for the demo store. `created` is echoed back for
/// every `POST /products`.
pub fn start_fake_store(products: Vec<Product>, created: Value, fail: bool) -> actix_test::TestServer {
    let store = FakeStore { products, created, fail };
    actix_test::start(move || {
        App::new()
            .app_data(web::Data::new(store.clone()))
            .route("/products", web::get().to(fake_all))
            .route("/products", web::post().to(fake_create))
            .route("/products/category/{category}", web::get().to(fake_category))
    })
}

pub fn png_bytes(width: u32, height: u32, noisy: bool) -> Vec<u8> {
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use std::io::Cursor;

    let mut rng = StdRng::seed_from_u64(7);
    let img = RgbImage::from_fn(width, height, |x, y| {
        if noisy {
            Rgb([rng.gen(), rng.gen(), rng.gen()])
        } else {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        }
    });
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Png)
        .expect("png encodes");
    buf.into_inner()
}

pub fn multipart_body(content_type: &str, bytes: &[u8]) -> (String, Vec<u8>) {
    let boundary = "catalog-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"upload\"\r\nContent-Type: {}\r\n\r\n",
            boundary, content_type
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    (format!("multipart/form-data; boundary={}", boundary), body)
}
