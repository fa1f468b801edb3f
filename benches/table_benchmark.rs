use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tagsuite::{Corpus, EmissionTable, Sentence, Token, TransitionTable};

const TAGS: [&str; 6] = ["DT", "NN", "NNS", "VBZ", "JJ", "RB"];

fn corpus(n_sentences: usize, length: usize) -> Corpus {
    let sentences = (0..n_sentences)
        .map(|s| {
            (0..length)
                .map(|t| {
                    let i = (s * 31 + t * 17) % 1000;
                    Token::new(&format!("w{i}")).with_tag(TAGS[i % TAGS.len()])
                })
                .collect::<Sentence>()
        })
        .collect();
    Corpus::new(sentences)
}

fn build_benchmark(c: &mut Criterion) {
    let corpus = corpus(2000, 25);
    c.bench_function("transition_build", |b| {
        b.iter(|| TransitionTable::build(black_box(&corpus)).unwrap())
    });
    c.bench_function("emission_build", |b| {
        b.iter(|| EmissionTable::build(black_box(&corpus)).unwrap())
    });
}

fn lookup_benchmark(c: &mut Criterion) {
    let corpus = corpus(2000, 25);
    let emission = EmissionTable::build(&corpus).unwrap();
    let words = ["w17", "Thomases", "walked", "quickly", "nation", "42", "w999"];
    c.bench_function("emission_lookup", |b| {
        b.iter(|| {
            for tag in TAGS {
                for word in words {
                    black_box(emission.probability(tag, word));
                }
            }
        })
    });
}

criterion_group!(benchmarks, build_benchmark, lookup_benchmark);
criterion_main!(benchmarks);
