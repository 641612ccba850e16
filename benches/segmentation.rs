use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use readaloud::narration::Highlight;
use readaloud::render::{Article, RelatedArticle, SynchronizedRenderer};
use readaloud::text::segment;
use std::hint::black_box;

/// Synthetic article: headings, paragraphs with inline markup, and a list.
fn article_html(paragraphs: usize) -> String {
    let mut html = String::from("<h1>Council approves the new transit plan.</h1>\n");
    for i in 0..paragraphs {
        html.push_str(&format!(
            "<p>Paragraph {i} opens with <a href=\"/x/{i}\">a linked claim</a>. \
             It continues with <em>emphasis</em> &amp; entities! \
             Does it end with a question? It does.</p>\n"
        ));
        if i % 5 == 4 {
            html.push_str("<ul><li>One key point here.</li><li>Another key point.</li></ul>\n");
        }
    }
    html
}

fn bench_segment(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment");
    for paragraphs in [10, 50, 200] {
        let html = article_html(paragraphs);
        group.bench_with_input(BenchmarkId::from_parameter(paragraphs), &html, |b, html| {
            b.iter(|| segment(black_box(html)));
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let renderer = SynchronizedRenderer::default();
    let related = vec![
        RelatedArticle::new("First related", "first-related"),
        RelatedArticle::new("Second related", "second-related"),
    ];

    let mut group = c.benchmark_group("render");
    for paragraphs in [10, 50, 200] {
        let article = Article::new(article_html(paragraphs));
        let middle = article.sentences().len() / 2;

        group.bench_with_input(
            BenchmarkId::new("passive", paragraphs),
            &article,
            |b, article| {
                b.iter(|| renderer.render(black_box(article), Highlight::passive(), &related));
            },
        );
        group.bench_with_input(
            BenchmarkId::new("active", paragraphs),
            &article,
            |b, article| {
                b.iter(|| renderer.render(black_box(article), Highlight::at(middle, 4), &related));
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_segment, bench_render);
criterion_main!(benches);
