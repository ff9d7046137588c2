//! Correctness-focused integration tests for empresa-db-query.
//!
//! These validate the compile → fetch-options flow end to end with an
//! in-module source double, without requiring a warehouse.

use async_trait::async_trait;
use empresa_db_core::{Table, TableSchema};
use empresa_db_query::{
    CachedOptions, DataSource, DimensionGraph, FilterDimension, FilterSelection, OptionValue,
    QueryPredicate, SimpleOptionCache, SourceError,
};
use empresa_db_query::{compile_identifier, compile_selection};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Source double that records every fetch and serves canned option lists.
struct RecordingSource {
    fetches: Mutex<Vec<(String, Vec<String>)>>,
    executes: AtomicUsize,
}

impl RecordingSource {
    fn new() -> Self {
        Self {
            fetches: Mutex::new(Vec::new()),
            executes: AtomicUsize::new(0),
        }
    }

    fn fetch_count(&self) -> usize {
        self.fetches.lock().unwrap().len()
    }
}

#[async_trait]
impl DataSource for RecordingSource {
    async fn execute(&self, _predicate: &QueryPredicate) -> Result<Table, SourceError> {
        self.executes.fetch_add(1, Ordering::SeqCst);
        Ok(Table::empty(TableSchema::new(["CNPJ"]).unwrap()))
    }

    async fn fetch_distinct(
        &self,
        dimension: &FilterDimension,
        parent_values: &[String],
    ) -> Result<Vec<OptionValue>, SourceError> {
        self.fetches
            .lock()
            .unwrap()
            .push((dimension.name.clone(), parent_values.to_vec()));
        let options = match dimension.name.as_str() {
            "uf" => vec!["RJ", "SP"],
            "municipio" => match parent_values {
                [only] if only == "SP" => vec!["Campinas", "Santos"],
                _ => vec!["Campinas", "Niterói", "Santos"],
            },
            _ => vec![],
        };
        Ok(options.into_iter().map(OptionValue::plain).collect())
    }
}

fn graph() -> DimensionGraph {
    DimensionGraph::new(vec![
        FilterDimension::independent("atividade", "CNAE_DESCR", "TB_CNAE_DESCR", "CODIGO_DESCR"),
        FilterDimension::independent("uf", "UF", "TB_UF_MUNICIPIO", "UF"),
        FilterDimension::dependent(
            "municipio",
            "MUNICIPIO",
            "TB_UF_MUNICIPIO",
            "MUNICIPIO",
            "uf",
            "UF",
        ),
    ])
    .unwrap()
}

#[test]
fn no_selected_value_appears_in_generated_text() {
    let g = graph();
    let hostile = [
        "SP' OR '1'='1",
        "x\"; DROP TABLE TB_MVP_CONS; --",
        "back\\slash",
        "ctrl\u{0007}char",
    ];
    let mut sel = FilterSelection::new();
    sel.set(&g, "uf", hostile);

    let predicate = compile_selection(&g, "TB_MVP_CONS", &sel);
    let sql = predicate.sql();
    for value in hostile {
        assert!(!sql.contains(value), "bound value leaked into text: {sql}");
    }
    assert_eq!(predicate.params().len(), hostile.len());
}

#[test]
fn identifier_lookup_binds_normalized_value() {
    let predicate = compile_identifier("TB_MVP_CONS", "CNPJ", "26.909.999/0002-60").unwrap();
    assert_eq!(predicate.sql(), "SELECT * FROM TB_MVP_CONS WHERE CNPJ = ?");
    assert_eq!(predicate.params(), vec!["26909999000260"]);
    assert!(compile_identifier("TB_MVP_CONS", "CNPJ", " . / - ").is_err());
}

#[test]
fn selection_and_identifier_signatures_are_stable() {
    let g = graph();
    let mut a = FilterSelection::new();
    // Insertion order differs; signatures must not.
    a.set(&g, "uf", ["SP"]);
    a.set(&g, "atividade", ["62.01-5"]);
    let mut b = FilterSelection::new();
    b.set(&g, "atividade", ["62.01-5"]);
    b.set(&g, "uf", ["SP"]);

    let pa = compile_selection(&g, "TB_MVP_CONS", &a);
    let pb = compile_selection(&g, "TB_MVP_CONS", &b);
    assert_eq!(pa.signature(), pb.signature());
}

#[tokio::test]
async fn dependent_dimension_without_parent_is_empty_and_fetchless() {
    let source = Arc::new(RecordingSource::new());
    let options = CachedOptions::new(source.clone(), SimpleOptionCache::new(16));
    let g = graph();

    let municipio = g.get("municipio").unwrap();
    let list = options.get(municipio, &FilterSelection::new()).await.unwrap();
    assert!(list.is_empty());
    assert_eq!(source.fetch_count(), 0);
}

#[tokio::test]
async fn distinct_parent_combinations_are_distinct_cache_entries() {
    let source = Arc::new(RecordingSource::new());
    let options = CachedOptions::new(source.clone(), SimpleOptionCache::new(16));
    let g = graph();
    let municipio = g.get("municipio").unwrap();

    let mut sp = FilterSelection::new();
    sp.set(&g, "uf", ["SP"]);
    let mut both = FilterSelection::new();
    both.set(&g, "uf", ["SP", "RJ"]);
    let mut both_reversed = FilterSelection::new();
    both_reversed.set(&g, "uf", ["RJ", "SP"]);

    let sp_list = options.get(municipio, &sp).await.unwrap();
    assert_eq!(sp_list.len(), 2);
    let both_list = options.get(municipio, &both).await.unwrap();
    assert_eq!(both_list.len(), 3);
    assert_eq!(source.fetch_count(), 2);

    // Same combination in a different order hits the same entry.
    let _ = options.get(municipio, &both_reversed).await.unwrap();
    assert_eq!(source.fetch_count(), 2);

    // And the single-state entry is still cached independently.
    let _ = options.get(municipio, &sp).await.unwrap();
    assert_eq!(source.fetch_count(), 2);
}

#[tokio::test]
async fn independent_dimension_ignores_selection_state() {
    let source = Arc::new(RecordingSource::new());
    let options = CachedOptions::new(source.clone(), SimpleOptionCache::new(16));
    let g = graph();
    let uf = g.get("uf").unwrap();

    let mut sel = FilterSelection::new();
    let _ = options.get(uf, &sel).await.unwrap();
    sel.set(&g, "uf", ["SP"]);
    let _ = options.get(uf, &sel).await.unwrap();
    assert_eq!(source.fetch_count(), 1);
}
