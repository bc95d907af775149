//! Extraction performance benchmarks.
//!
//! Measures end-to-end typed extraction across table sizes and column
//! counts, plus the per-cell value parsers on their own.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::Write;
use tablereader::parse::{clean_nulls, parse_number};
use tablereader::{
    ColumnType, DecimalSeparator, Header, HeaderColumn, TableReader, TableSpec, TypedRow,
};
use tempfile::NamedTempFile;

/// Column types cycled through by the synthetic tables.
const TYPES: [ColumnType; 4] = [
    ColumnType::Str,
    ColumnType::Number,
    ColumnType::Date,
    ColumnType::Time,
];

/// Generate a synthetic CSV table with a header row.
fn generate_csv_data(rows: usize, cols: usize) -> String {
    let mut data = String::new();

    let names: Vec<String> = (0..cols).map(|i| format!("column_{}", i + 1)).collect();
    data.push_str(&names.join(","));
    data.push('\n');

    for row in 0..rows {
        let cells: Vec<String> = (0..cols)
            .map(|col| match TYPES[col % TYPES.len()] {
                ColumnType::Str => format!("Item {}", row % 50),
                ColumnType::Number if row % 17 == 0 => "n/a".to_string(),
                ColumnType::Number => format!("\"${:.2}\"", row as f64 * 12.5),
                ColumnType::Date => format!("{:02}/{:02}/2023", (row % 12) + 1, (row % 28) + 1),
                _ => format!("{:02}:{:02}", row % 24, row % 60),
            })
            .collect();
        data.push_str(&cells.join(","));
        data.push('\n');
    }

    data
}

fn header(cols: usize) -> Header {
    Header::new(
        (0..cols)
            .map(|i| HeaderColumn::new(format!("column_{}", i + 1), TYPES[i % TYPES.len()]))
            .collect(),
    )
    .unwrap()
}

fn write_temp(data: &str) -> NamedTempFile {
    let mut temp = NamedTempFile::with_suffix(".csv").unwrap();
    temp.write_all(data.as_bytes()).unwrap();
    temp
}

fn extract(temp: &NamedTempFile, rows: usize, cols: usize) -> Vec<TypedRow> {
    let reader = TableReader::new();
    let mut source = reader.open_csv(temp.path()).unwrap();
    let spec = TableSpec::new((1, rows), (0, cols - 1));
    reader
        .extract(&mut source, &spec, &header(cols))
        .unwrap()
        .collect::<tablereader::Result<_>>()
        .unwrap()
}

/// Benchmark extraction of tables of various sizes.
fn bench_extract_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_rows");

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_csv_data(*rows, 8);
        let temp = write_temp(&data);

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), rows, |b, &rows| {
            b.iter(|| black_box(extract(&temp, rows, 8)))
        });
    }

    group.finish();
}

/// Benchmark extraction with varying column counts.
fn bench_extract_column_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_column_scaling");

    let rows = 1_000;
    for cols in [4, 8, 16, 32].iter() {
        let data = generate_csv_data(rows, *cols);
        let temp = write_temp(&data);

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("cols", cols), cols, |b, &cols| {
            b.iter(|| black_box(extract(&temp, rows, cols)))
        });
    }

    group.finish();
}

/// Benchmark the cell-level parsers.
fn bench_value_parsers(c: &mut Criterion) {
    let mut group = c.benchmark_group("value_parsers");

    let values = ["$1,234.56", "25.5%", "  N/A ", "1.234,56", "-42", "\u{20ac} 99"];
    group.bench_function("clean_nulls", |b| {
        b.iter(|| {
            for v in values {
                black_box(clean_nulls(black_box(v)));
            }
        })
    });
    group.bench_function("parse_number", |b| {
        b.iter(|| {
            for v in values {
                black_box(parse_number(black_box(v), DecimalSeparator::Dot).ok());
            }
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_extract_rows,
    bench_extract_column_scaling,
    bench_value_parsers,
);
criterion_main!(benches);
