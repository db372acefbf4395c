use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sql_datagen::Table;
use sql_template_gen::statement::builtin_templates;
use sql_template_gen::writer::StatementWriter;
use sql_template_gen::{
    BatchGenerator, BatchOptions, ErrorPolicy, KeywordMap, StatementAssembler, TokenGenerator,
};
use std::hint::black_box;
use tempfile::TempDir;

fn tables(count: usize, columns: usize) -> Vec<Table> {
    let mut rng = ChaCha8Rng::seed_from_u64(0);
    (0..count)
        .map(|i| Table::random(format!("table_{i}"), columns, 0, &mut rng).unwrap())
        .collect()
}

fn bench_assemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble");
    let catalog = KeywordMap::builtin().unwrap();
    let generator = TokenGenerator::new();
    let assembler = StatementAssembler::new(&generator, &catalog);
    let templates = builtin_templates().unwrap();

    for columns in [4, 16, 64] {
        let table = tables(1, columns).remove(0);
        group.bench_with_input(
            BenchmarkId::new("builtin_templates", format!("{columns}_columns")),
            &table,
            |b, table| {
                let mut rng = ChaCha8Rng::seed_from_u64(1);
                b.iter(|| {
                    for template in &templates {
                        let _ = black_box(assembler.assemble(template, table, &mut rng));
                    }
                })
            },
        );
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    let catalog = KeywordMap::builtin().unwrap();
    let generator = TokenGenerator::new();
    let schema = tables(5, 12);

    for workers in [1, 4] {
        group.throughput(Throughput::Elements(1000));
        group.bench_with_input(
            BenchmarkId::new("1000_statements", format!("{workers}_workers")),
            &workers,
            |b, &workers| {
                let batch_gen = BatchGenerator::new(
                    &generator,
                    &catalog,
                    builtin_templates().unwrap(),
                    &schema,
                    BatchOptions {
                        seed: 42,
                        workers,
                        on_error: ErrorPolicy::Skip,
                    },
                )
                .unwrap();
                b.iter(|| black_box(batch_gen.generate(1000).unwrap()))
            },
        );
    }

    group.finish();
}

fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("write");
    let catalog = KeywordMap::builtin().unwrap();
    let generator = TokenGenerator::new();
    let schema = tables(3, 8);
    let (batch, _) = BatchGenerator::new(
        &generator,
        &catalog,
        builtin_templates().unwrap(),
        &schema,
        BatchOptions::default(),
    )
    .unwrap()
    .generate(500)
    .unwrap();

    group.throughput(Throughput::Elements(batch.len() as u64));
    group.bench_function("postgre_tokenized", |b| {
        b.iter_with_setup(
            || {
                let temp_dir = TempDir::new().unwrap();
                let path = temp_dir.path().join("postgre_tokenized.txt");
                (temp_dir, StatementWriter::new(&path).unwrap())
            },
            |(_temp_dir, mut writer)| {
                for stmt in &batch.postgre_tokenized {
                    writer.write_statement(stmt).unwrap();
                }
                writer.flush().unwrap();
            },
        )
    });

    group.finish();
}

criterion_group!(benches, bench_assemble, bench_batch, bench_write);
criterion_main!(benches);
