use std::sync::Arc;

use arax_core::response::Response;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use infer::{CreativeDtd, DrugPrediction, PairPaths, ScoredPath};
use synonymizer::{InMemorySynonymizer, NodeSynonymizer, SynonymEntry};

const DRUGS: usize = 200;
const DISEASE: &str = "MONDO:0005812";

fn synonymizer() -> Arc<dyn NodeSynonymizer> {
    let mut entries = vec![SynonymEntry::new(DISEASE, "influenza", "biolink:Disease")];
    for i in 0..DRUGS {
        entries.push(SynonymEntry::new(
            format!("CHEBI:{}", i),
            format!("drug{}", i),
            "biolink:SmallMolecule",
        ));
    }
    for i in 0..50 {
        entries.push(SynonymEntry::new(
            format!("NCBIGene:{}", i),
            format!("gene{}", i),
            "biolink:Gene",
        ));
    }
    Arc::new(InMemorySynonymizer::new(entries))
}

fn inputs() -> (Vec<DrugPrediction>, Vec<PairPaths>) {
    let drugs = (0..DRUGS)
        .map(|i| {
            DrugPrediction::new(
                format!("CHEBI:{}", i),
                format!("drug{}", i),
                1.0 - i as f64 / DRUGS as f64,
                DISEASE,
                "influenza",
            )
        })
        .collect();
    let paths = (0..DRUGS)
        .map(|i| {
            let path = match i % 3 {
                0 => format!("drug{}->biolink:treats->influenza", i),
                1 => format!(
                    "drug{}->biolink:affects->gene{}->biolink:gene_associated_with_condition->influenza",
                    i,
                    i % 50
                ),
                _ => format!(
                    "drug{}->biolink:affects->gene{}->biolink:regulates->gene{}->biolink:gene_associated_with_condition->influenza",
                    i,
                    i % 50,
                    (i + 7) % 50
                ),
            };
            PairPaths::new(format!("CHEBI:{}", i), DISEASE, vec![ScoredPath::new(path, 0.5)])
        })
        .collect();
    (drugs, paths)
}

pub fn criterion_benchmark(c: &mut Criterion) {
    arax_core::init_tracing();
    let synonymizer = synonymizer();
    let (drugs, paths) = inputs();

    c.bench_function("creative_dtd_200_pairs", |b| {
        b.iter(|| {
            let mut engine = CreativeDtd::new(synonymizer.clone());
            let mut response = Response::new();
            let outcome = engine
                .generate_treat_subgraphs(&mut response, &drugs, &paths, None)
                .unwrap();
            black_box(outcome.essence_scores.len())
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
