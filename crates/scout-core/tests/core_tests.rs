use std::fs;

use tempfile::TempDir;

use scout_core::config::{Config, EmbedProviderKind, UpstreamPolicy};
use scout_core::corpus::CorpusLoader;
use scout_core::Error;

#[test]
fn load_csv_from_disk() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("founders.csv");
    fs::write(
        &path,
        "id,founder_name,role,company,location,idea,about,keywords\n\
         1,Asha,CEO,PayLoop,Bangalore,credit,banker,fintech\n\
         2,Ben,CTO,Soil,Berlin,sensors,farmer,agritech\n",
    )
    .unwrap();

    let docs = CorpusLoader::new().load(&path).expect("load");
    assert_eq!(docs.len(), 2, "one document per data row");
    assert_eq!(docs[1].id, "2");
    assert!(docs[1].chunk.contains("Keywords: agritech."));
}

#[test]
fn header_only_csv_is_an_empty_corpus() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("empty.csv");
    fs::write(&path, "id,founder_name\n").unwrap();

    let err = CorpusLoader::new().load(&path).unwrap_err();
    assert!(matches!(err, Error::EmptyCorpus(_)));
}

#[test]
fn missing_file_is_a_corpus_error() {
    let tmp = TempDir::new().unwrap();
    let err = CorpusLoader::new().load(&tmp.path().join("nope.csv")).unwrap_err();
    assert!(matches!(err, Error::Corpus(_)));
}

#[test]
fn config_file_overrides_defaults() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("config.toml"),
        "[search]\ndefault_top_k = 3\non_upstream_failure = \"fail\"\nmin_similarity = 0.2\n\n\
         [embed]\nprovider = \"hashed\"\n\n[vector]\ndim = 64\n",
    )
    .unwrap();

    let config = Config::load_in(tmp.path()).expect("config");
    let settings = config.settings().expect("settings");
    assert_eq!(settings.search.default_top_k, 3);
    assert_eq!(settings.search.on_upstream_failure, UpstreamPolicy::Fail);
    assert_eq!(settings.search.min_similarity, Some(0.2));
    assert_eq!(settings.embed.provider, EmbedProviderKind::Hashed);
    assert_eq!(settings.vector.dim, 64);
    // untouched sections keep their defaults
    assert_eq!(settings.lexical.k1, 1.5);
    assert_eq!(settings.vector.table, "founders");

    let k: usize = config.get("search.default_top_k").expect("get");
    assert_eq!(k, 3);
    assert_eq!(config.resolve_path("data/founders.csv"), tmp.path().join("data/founders.csv"));
}

#[test]
fn invalid_config_is_rejected() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[search]\ndefault_top_k = 0\n").unwrap();

    let config = Config::load_in(tmp.path()).expect("config");
    assert!(matches!(config.settings(), Err(Error::InvalidConfig(_))));
}

#[test]
fn id_less_corpus_reloads_with_the_same_ids() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("founders.csv");
    fs::write(&path, "founder_name,company\nAsha,PayLoop\nBen,Soil\n").unwrap();

    let at_ingest = CorpusLoader::new().load(&path).expect("first load");
    let at_search = CorpusLoader::new().load(&path).expect("second load");
    let ids = |docs: &[scout_core::types::Document]| docs.iter().map(|d| d.id.clone()).collect::<Vec<_>>();
    assert_eq!(ids(&at_ingest), ids(&at_search));
}
