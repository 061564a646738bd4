// benches/event_page.rs
use criterion::{criterion_group, criterion_main, Criterion, black_box};

use ticket_watch::specs::event_page;

/// A listing-sized page: navigation noise, the date split over tags,
/// scripts before and after.
fn sample_page() -> String {
    let mut doc = String::from("<html><head><style>.x{color:red}</style><script>var cfg = {a: 1};</script></head><body>");
    for i in 0..400 {
        doc.push_str(&format!(r#"<li class="nav"><a href="/e/{i}">Event {i}</a></li>"#));
    }
    doc.push_str(r#"<p class="date"><span>Saturday</span> <span>12</span>&nbsp;<span>July</span> 2025</p>"#);
    doc.push_str("<script>window.onload = function () { countdown(3600); };</script></body></html>");
    doc
}

fn bench_parse(c: &mut Criterion) {
    let doc = sample_page();

    c.bench_function("event_page_parse", |b| {
        b.iter(|| {
            let snap = event_page::parse(black_box(&doc)).expect("sample page parses");
            black_box(snap.seconds_until_release)
        })
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
