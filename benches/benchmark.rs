use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use text_dedup_vectorizer::{
    config::PreprocessConfig, DefaultTFIDFEngine, DocumentVectorMatrix, Preprocessor, SimilarityEngine, StopWordSet,
    TokenSet, VectorSpaceBuilder,
};

const SUBJECTS: [&str; 8] = ["服务器", "打印机", "邮箱", "网络", "数据库", "显示器", "VPN", "磁盘"];
const PROBLEMS: [&str; 8] = ["无法连接", "响应超时", "密码错误", "空间不足", "频繁重启", "权限不足", "卡顿", "黑屏"];
const SUFFIXES: [&str; 4] = ["", "，请尽快处理", "！", "（第二次报修）"];

fn synthetic_texts(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            format!(
                "{}{}{} 编号{}",
                SUBJECTS[i % SUBJECTS.len()],
                PROBLEMS[(i / SUBJECTS.len()) % PROBLEMS.len()],
                SUFFIXES[i % SUFFIXES.len()],
                i
            )
        })
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    let pre = Preprocessor::from_config(&PreprocessConfig::default(), Arc::new(StopWordSet::empty()));
    let texts = synthetic_texts(2_000);

    c.bench_function("preprocess_2000", |b| {
        b.iter(|| texts.iter().map(|t| pre.preprocess(t)).count())
    });

    let token_sets: Vec<TokenSet> = texts.iter().map(|t| pre.preprocess(t)).collect();
    let builder: VectorSpaceBuilder = VectorSpaceBuilder::default();

    c.bench_function("build_tfidf_2000", |b| {
        b.iter(|| {
            let m: DocumentVectorMatrix = builder.build(&token_sets).unwrap();
            m.n_cols()
        })
    });

    let matrix: DocumentVectorMatrix = builder.build(&token_sets).unwrap();
    c.bench_function("pairwise_scan_2000", |b| {
        b.iter(|| SimilarityEngine::<f64, DefaultTFIDFEngine>::scan_matrix(&matrix, 0.6).len())
    });

    let engine: SimilarityEngine = SimilarityEngine::default();
    let query = pre.preprocess("服务器无法连接，请尽快处理");
    c.bench_function("rank_top5_2000", |b| {
        b.iter(|| engine.rank(&token_sets, &query, 5).unwrap().len())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
