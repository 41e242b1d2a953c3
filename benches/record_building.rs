use criterion::{Criterion, black_box, criterion_group, criterion_main};
use fits_header_processor::fits::LoadedHeader;
use fits_header_processor::record::build_records;
use fits_header_processor::{HeaderValue, KeywordMap, KeywordSet, TextHeader};

fn sample_headers(count: usize) -> Vec<(String, LoadedHeader)> {
    (0..count)
        .map(|i| {
            if i % 2 == 0 {
                let text = format!(
                    "NAXIS1 = {}\nCRVAL1 = 4000.0\nCDELT1 = 1.25\nOBJECT = 'STAR{}'\nHISTORY done\n",
                    1000 + i,
                    i
                );
                (format!("{}.fits_header.txt", i), LoadedHeader::Text(TextHeader::new(text)))
            } else {
                let map: KeywordMap = [
                    ("NAXIS1", HeaderValue::Integer(4096)),
                    ("CRVAL1", HeaderValue::Real(3700.5)),
                    ("CDELT1", HeaderValue::Real(0.05)),
                    ("OBJECT", HeaderValue::from(format!("STAR{}", i))),
                    ("DATE-OBS", HeaderValue::from("2020-01-01")),
                    ("UT", HeaderValue::from("03:15:42.5")),
                ]
                .into_iter()
                .collect();
                (format!("{}.fits", i), LoadedHeader::Fits(map))
            }
        })
        .collect()
}

fn bench_build_records(c: &mut Criterion) {
    let keywords = KeywordSet::default();
    let headers = sample_headers(200);

    c.bench_function("build_records_200_mixed", |b| {
        b.iter(|| {
            let records = build_records(
                &keywords,
                headers.iter().map(|(id, header)| (id.as_str(), header)),
            );
            black_box(records)
        })
    });
}

criterion_group!(benches, bench_build_records);
criterion_main!(benches);
