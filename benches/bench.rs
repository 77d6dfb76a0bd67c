// Criterion benchmarks for WrenchIt Search

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use wrenchit_search::core::{
    distance::{calculate_bounding_box, haversine_distance},
    normalize::normalize_all,
    ShopSearch,
};
use wrenchit_search::models::{FilterCriteria, GeoPoint, PriceTier, Shop, SortKey, SourceRecord};

const SERVICES: &[&str] = &[
    "Oil Change",
    "Brake Repair",
    "Engine Diagnostics",
    "Tire Service",
    "Battery Service",
    "Transmission",
    "AC Repair",
];

fn reference_point() -> GeoPoint {
    GeoPoint::new(34.0522, -118.2437)
}

fn create_shop(id: usize) -> Shop {
    let offset = (id as f64 * 0.001) % 0.5;
    Shop {
        id: id.to_string(),
        name: format!("Shop {}", id),
        lat: (id % 7 != 0).then_some(34.0522 + offset),
        lng: (id % 7 != 0).then_some(-118.2437 - offset),
        rating: (id % 50) as f64 / 10.0,
        review_count: (id * 37 % 500) as u32,
        price_range: match id % 3 {
            0 => PriceTier::Budget,
            1 => PriceTier::Moderate,
            _ => PriceTier::Premium,
        },
        services: SERVICES
            .iter()
            .skip(id % SERVICES.len())
            .take(3)
            .map(|s| s.to_string())
            .collect(),
        ..Default::default()
    }
}

fn create_record(id: usize) -> SourceRecord {
    SourceRecord::from_json(serde_json::json!({
        "id": id.to_string(),
        "name": format!("Shop {}", id),
        "city": "Los Angeles",
        "state": "CA",
        "lat": 34.0522 + (id as f64 * 0.001) % 0.5,
        "lng": -118.2437,
        "rating": (id % 50) as f64 / 10.0,
        "ratingCount": id * 37 % 500,
        "servicesText": "Oil Change, Brake Repair, Tire Service"
    }))
}

fn bench_haversine_distance(c: &mut Criterion) {
    c.bench_function("haversine_distance", |b| {
        b.iter(|| {
            haversine_distance(
                black_box(GeoPoint::new(34.0522, -118.2437)),
                black_box(GeoPoint::new(34.0195, -118.4912)),
            )
        });
    });
}

fn bench_bounding_box(c: &mut Criterion) {
    c.bench_function("bounding_box_calculation", |b| {
        b.iter(|| calculate_bounding_box(black_box(reference_point()), black_box(16.0)));
    });
}

fn bench_search(c: &mut Criterion) {
    let search = ShopSearch::default();
    let criteria = FilterCriteria {
        query: "brake".to_string(),
        min_rating: 2.0,
        max_distance_km: Some(30.0),
        sort: SortKey::Distance,
        limit: Some(25),
        ..Default::default()
    };

    let mut group = c.benchmark_group("search");

    for shop_count in [10, 100, 1000].iter() {
        let shops: Vec<Shop> = (0..*shop_count).map(create_shop).collect();

        group.bench_with_input(
            BenchmarkId::new("search", shop_count),
            shop_count,
            |b, _| {
                b.iter(|| {
                    search.search(
                        black_box(shops.clone()),
                        black_box(&criteria),
                        black_box(Some(reference_point())),
                    )
                });
            },
        );
    }

    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let records: Vec<SourceRecord> = (0..100).map(create_record).collect();

    c.bench_function("normalize_100_records", |b| {
        b.iter(|| black_box(normalize_all(black_box(records.clone()))));
    });
}

criterion_group!(
    benches,
    bench_haversine_distance,
    bench_bounding_box,
    bench_search,
    bench_normalize
);

criterion_main!(benches);
