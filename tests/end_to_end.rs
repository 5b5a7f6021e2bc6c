use std::sync::Arc;

use text_dedup_vectorizer::{
    config::PreprocessConfig, Config, Corpus, DedupError, DedupService, ErrorKind, Preprocessor,
    QueryInput, SimilarityEngine, StopWordSet, TokenSet,
};

fn jieba_preprocessor(stop_words: &[&str]) -> Preprocessor {
    let stop: StopWordSet = stop_words.iter().copied().collect();
    Preprocessor::from_config(&PreprocessConfig::default(), Arc::new(stop))
}

#[test]
fn punctuation_variant_is_reported_as_duplicate() {
    let pre = jieba_preprocessor(&[]);
    let texts = ["服务器无法连接网络", "服务器无法连接网络！"];
    let corpus = Corpus::from_raw_texts(&pre, texts);
    assert_eq!(corpus.token_sets()[0], corpus.token_sets()[1]);

    let engine: SimilarityEngine = SimilarityEngine::default();
    let pairs = engine.pairwise_duplicates(corpus.token_sets()).unwrap();
    assert_eq!(pairs.len(), 1);
    assert_eq!((pairs[0].left, pairs[0].right), (0, 1));
    assert!((pairs[0].score - 1.0).abs() < 1e-9);
}

#[test]
fn query_against_empty_corpus_fails() {
    let pre = jieba_preprocessor(&["on", "device"]);
    let query = pre.process("I/O error on device 42").unwrap();
    assert!(query.contains("I/O"));

    let engine: SimilarityEngine = SimilarityEngine::default();
    let err = engine.check(&[], &query).unwrap_err();
    assert!(matches!(err, DedupError::EmptyCorpus));
    assert_eq!(err.kind(), ErrorKind::EmptyCorpus);
}

#[test]
fn ip_address_becomes_sentinel() {
    let pre = jieba_preprocessor(&[]);
    let set = pre.process("192.168.1.1 timeout").unwrap();
    assert!(set.contains("%ip"));
    assert!(set.contains("timeout"));
    assert!(set.iter().all(|t| !t.contains("192") && !t.contains("168")));
}

#[test]
fn higher_threshold_never_adds_pairs() {
    let pre = jieba_preprocessor(&[]);
    let corpus = Corpus::from_raw_texts(
        &pre,
        [
            "打印机卡纸无法打印",
            "打印机卡纸",
            "邮箱密码忘记了",
            "邮箱密码重置失败",
            "服务器磁盘空间不足",
            "服务器磁盘空间不足，请清理",
        ],
    );
    let mut previous: Option<usize> = None;
    for threshold in [0.1, 0.3, 0.5, 0.6, 0.8, 0.95] {
        let engine: SimilarityEngine = SimilarityEngine::default().with_threshold(threshold);
        let count = engine.pairwise_duplicates(corpus.token_sets()).unwrap().len();
        if let Some(prev) = previous {
            assert!(count <= prev, "threshold {threshold}: {count} > {prev}");
        }
        previous = Some(count);
    }
}

#[test]
fn check_verdict_is_monotonic_in_threshold() {
    let pre = jieba_preprocessor(&[]);
    let corpus = Corpus::from_raw_texts(
        &pre,
        ["服务器无法连接网络", "网络连接超时", "打印机卡纸"],
    );
    let query = pre.process("服务器网络连接超时").unwrap();

    let mut verdicts = Vec::new();
    for threshold in [0.1, 0.3, 0.5, 0.6, 0.7, 0.8, 0.9, 0.95] {
        let engine: SimilarityEngine = SimilarityEngine::default().with_threshold(threshold);
        verdicts.push(engine.check(corpus.token_sets(), &query).unwrap());
    }
    assert!(verdicts.iter().all(|v| v.max_score == verdicts[0].max_score));
    let first_distinct = verdicts.iter().position(|v| !v.is_too_similar());
    if let Some(pos) = first_distinct {
        assert!(verdicts[pos..].iter().all(|v| !v.is_too_similar()));
    }
}

#[test]
fn empty_token_sets_are_not_an_error() {
    let pre = jieba_preprocessor(&[]);
    // 記号と数字だけの行は空集合になる
    let corpus = Corpus::from_raw_texts(&pre, ["!!! 123", "###"]);
    assert!(corpus.token_sets().iter().all(TokenSet::is_empty));

    let engine: SimilarityEngine = SimilarityEngine::default();
    assert!(engine.pairwise_duplicates(corpus.token_sets()).unwrap().is_empty());
    let verdict = engine.check(corpus.token_sets(), &TokenSet::new()).unwrap();
    assert_eq!(verdict.max_score, 0.0);
    assert!(!verdict.is_too_similar());
}

#[test]
fn scores_stay_in_unit_interval() {
    let pre = jieba_preprocessor(&[]);
    let corpus = Corpus::from_raw_texts(&pre, ["网络连接超时", "网络连接失败", "显示器黑屏"]);
    let engine: SimilarityEngine = SimilarityEngine::default();
    let query = pre.process("网络连接超时").unwrap();
    let scores = engine.query_scores(corpus.token_sets(), &query).unwrap();
    assert_eq!(scores.len(), 3);
    assert!(scores.iter().all(|s| (0.0..=1.0).contains(s)));
    assert!((scores[0] - 1.0).abs() < 1e-9);
}

#[test]
fn service_round_trip_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let stop_words = dir.path().join("stop_words.txt");
    let raw = dir.path().join("testdata.csv");
    let words_set = dir.path().join("words_set.csv");
    std::fs::write(&stop_words, "的\n了\n  \n").unwrap();
    std::fs::write(
        &raw,
        "问题ID,问题描述\nQ1,服务器无法连接网络\nQ2,服务器无法连接网络！\nQ3,打印机卡纸了\n",
    )
    .unwrap();

    let mut config = Config::default();
    config.resources.stop_words = stop_words;
    config.resources.corpus = words_set.clone();
    let service = DedupService::from_config(config).unwrap();

    let built = service.build_words_set(&raw, &words_set).unwrap();
    assert_eq!(built.len(), 3);
    let corpus = service.load_corpus().unwrap();
    assert_eq!(corpus, built);

    let table = text_dedup_vectorizer::RawTable::load_csv(&raw, &service.config().columns).unwrap();
    let reports = service.scan(&corpus, Some(&table)).unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].left.id.as_deref(), Some("Q1"));
    assert_eq!(reports[0].right.id.as_deref(), Some("Q2"));

    let verdict = service
        .check(&corpus, &QueryInput::Raw("服务器无法连接网络".to_string()))
        .unwrap();
    assert!(verdict.is_too_similar());

    let hits = service
        .similar(&corpus, &QueryInput::Raw("打印机卡纸".to_string()), 5)
        .unwrap();
    assert_eq!(hits.len(), 3);
    assert_eq!(hits.list[0].key, "打印机卡纸了");
}

#[test]
fn rendered_token_set_parses_back() {
    let pre = jieba_preprocessor(&[]);
    let set = pre.process("ＤＮＳ解析失败, A/B切换").unwrap();
    assert_eq!(TokenSet::parse(&set.render()), set);
}
