//! This bench parses a large record description with many bucket entries and
//! continuation lines.

#![allow(missing_docs)]

use std::{fmt::Write, hint::black_box};

use criterion::{Criterion, criterion_group, criterion_main};
use dandi_docs::domain::description::{parse, strip_markdown_links};

/// Generates a description shaped like the DANDI record, scaled up
fn description(entries: usize) -> String {
    let mut text = String::from(
        "The DANDI archive hosts [neurophysiology](https://example.org) data.\n\
         It accepts data from many modalities.\n\n\
         Data is organized using community standards:\n",
    );
    for i in 0..entries {
        writeln!(text, "- [STD{i} - Standard {i}](https://std{i}.example.org),").unwrap();
    }

    text.push_str("\nThe S3 bucket is organized as follows:\n");
    for i in 0..entries {
        writeln!(
            text,
            "- **prefix{i}/** - Files for [prefix {i}](https://example.org/{i}).\n  \
             Continued on a second line."
        )
        .unwrap();
    }

    text.push_str("\nDevelopment of DANDI is supported by the NIH.\n");
    text
}

fn parse_description(c: &mut Criterion) {
    let input = description(1_000);

    c.bench_function("parse description", |b| {
        b.iter(|| parse(black_box(&input)));
    });

    c.bench_function("strip markdown links", |b| {
        b.iter(|| strip_markdown_links(black_box(&input)));
    });
}

criterion_group!(benches, parse_description);
criterion_main!(benches);
