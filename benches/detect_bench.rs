use criterion::{black_box, criterion_group, criterion_main, Criterion};

use attio_capture_core::platform::{detect_platform, search_value_for, Platform};
use attio_capture_core::profile::ProfileData;
use attio_capture_core::search::{build_query, SearchFilter};

const URLS: &[&str] = &[
    "https://www.linkedin.com/in/alice-smith/",
    "https://x.com/jack",
    "https://twitter.com/home",
    "https://www.reddit.com/user/spez",
    "https://example.com/some/long/path?with=query&and=more",
];

fn bench_detect(c: &mut Criterion) {
    c.bench_function("detect_platform_mixed", |b| {
        b.iter(|| {
            for url in URLS {
                black_box(detect_platform(black_box(url)));
            }
        })
    });
}

fn bench_query(c: &mut Criterion) {
    let profile = ProfileData {
        full_name: Some("Alice Smith".to_string()),
        linkedin_url: Some("https://www.linkedin.com/in/alice-smith?trk=abc".to_string()),
        ..ProfileData::default()
    };

    c.bench_function("build_linkedin_query", |b| {
        b.iter(|| {
            let value = search_value_for(Platform::Linkedin, black_box(&profile)).unwrap_or_default();
            let filter = SearchFilter::for_attribute("linkedin", value);
            black_box(build_query("linkedin", &filter))
        })
    });
}

criterion_group!(benches, bench_detect, bench_query);
criterion_main!(benches);
