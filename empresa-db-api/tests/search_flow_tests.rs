//! End-to-end search flow against the in-memory source.
//!
//! Exercises the full operator journey: render filter options, narrow by
//! state and municipality, search, page, inspect a record from a reduced
//! view, look up by formatted identifier, export.

use empresa_db_api::{catalog, DelimitedExporter, Registry, SearchOptions, WarehouseConfig};
use empresa_db_api::ApiError;
use empresa_db_core::{Row, Table, TableSchema, Value};
use empresa_db_memory::MemorySource;
use empresa_db_query::FilterSelection;
use empresa_db_session::{ResultSession, SessionError};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn seeded_registry() -> Registry<MemorySource> {
    init_tracing();
    let cnae = Table::new(
        TableSchema::new(["CODIGO_DESCR"]).unwrap(),
        vec![
            Row::new(vec!["47.11-3 Comércio varejista".into()]),
            Row::new(vec!["62.01-5 Desenvolvimento de programas".into()]),
        ],
    )
    .unwrap();

    let uf_municipio = Table::new(
        TableSchema::new(["UF", "MUNICIPIO"]).unwrap(),
        vec![
            Row::new(vec!["SP".into(), "Campinas".into()]),
            Row::new(vec!["SP".into(), "Santos".into()]),
            Row::new(vec!["RJ".into(), "Niterói".into()]),
        ],
    )
    .unwrap();

    let results_schema = TableSchema::new([
        "CNPJ",
        "RAZAO_SOCIAL",
        "CNAE_DESCR",
        "UF",
        "MUNICIPIO",
    ])
    .unwrap();
    let mut rows = Vec::new();
    for i in 0..130 {
        let (uf, municipio) = if i % 3 == 0 {
            ("RJ", "Niterói")
        } else {
            ("SP", "Campinas")
        };
        rows.push(Row::new(vec![
            Value::String(format!("{:014}", i)),
            Value::String(format!("Empresa {}", i)),
            "62.01-5 Desenvolvimento de programas".into(),
            uf.into(),
            municipio.into(),
        ]));
    }
    // One extra record reachable only by identifier.
    rows.push(Row::new(vec![
        "26909999000260".into(),
        "Empresa Exemplo".into(),
        "47.11-3 Comércio varejista".into(),
        "SP".into(),
        "Santos".into(),
    ]));
    let results = Table::new(results_schema, rows).unwrap();

    let source = MemorySource::new()
        .with_table("TB_CNAE_DESCR", cnae)
        .with_table("TB_UF_MUNICIPIO", uf_municipio)
        .with_table(catalog::RESULTS_TABLE, results);

    Registry::company(source, &WarehouseConfig::in_process())
}

#[tokio::test]
async fn filter_search_page_inspect_export() {
    let registry = seeded_registry();
    let graph = registry.graph().clone();
    let mut selection = FilterSelection::new();

    // Municipality renders empty before any state is chosen.
    let municipios = registry.options(catalog::MUNICIPIO, &selection).await.unwrap();
    assert!(municipios.is_empty());

    // Choosing a state opens its municipalities.
    selection.set(&graph, catalog::UF, ["SP"]);
    let municipios = registry.options(catalog::MUNICIPIO, &selection).await.unwrap();
    let names: Vec<&str> = municipios.iter().map(|o| o.value.as_str()).collect();
    assert_eq!(names, vec!["Campinas", "Santos"]);

    selection.set(&graph, catalog::MUNICIPIO, ["Campinas"]);

    // Search and page.
    let mut session = ResultSession::new();
    let count = registry
        .search(&mut session, &selection, SearchOptions::default())
        .await
        .unwrap();
    assert_eq!(count, 86);
    assert_eq!(session.page(50).unwrap().page_count(), 2);

    session.set_page(2, 50).unwrap();
    let page = session.page(50).unwrap();
    assert_eq!(page.records().len(), 36);
    assert_eq!(page.display_range(), Some((51, 86)));

    // Inspect: the listing shows a reduced view, detail shows the full row.
    let chosen = page.records()[0].id;
    let row = session.select(chosen).unwrap();
    assert_eq!(row.len(), 5);
    let detail =
        empresa_db_session::resolve_detail(session.table().unwrap(), chosen).unwrap();
    assert_eq!(detail.len(), 5);
    assert_eq!(detail[3].0, "UF");
    assert_eq!(detail[3].1, Value::String("SP".into()));

    // Export covers the full result, not the current page.
    let bytes = registry.export(&session, &DelimitedExporter::csv()).unwrap();
    let text = String::from_utf8(bytes).unwrap();
    assert_eq!(text.lines().count(), 87); // header + 86 records
    assert!(text.lines().next().unwrap().starts_with("CNPJ,RAZAO_SOCIAL"));
}

#[tokio::test]
async fn changing_state_drops_stale_municipality_selection() {
    let registry = seeded_registry();
    let graph = registry.graph().clone();
    let mut selection = FilterSelection::new();

    selection.set(&graph, catalog::UF, ["SP"]);
    selection.set(&graph, catalog::MUNICIPIO, ["Campinas"]);
    selection.set(&graph, catalog::UF, ["RJ"]);
    assert!(selection.get(catalog::MUNICIPIO).is_empty());

    let mut session = ResultSession::new();
    let count = registry
        .search(&mut session, &selection, SearchOptions::default())
        .await
        .unwrap();
    // RJ rows only; the stale Campinas constraint is gone.
    assert_eq!(count, 44);
}

#[tokio::test]
async fn identifier_lookup_normalizes_and_resets_session() {
    let registry = seeded_registry();
    let graph = registry.graph().clone();
    let mut session = ResultSession::new();

    let mut selection = FilterSelection::new();
    selection.set(&graph, catalog::UF, ["SP"]);
    registry
        .search(&mut session, &selection, SearchOptions::default())
        .await
        .unwrap();
    session.select(session.page(50).unwrap().records()[2].id).unwrap();

    let count = registry
        .lookup(&mut session, "26.909.999/0002-60")
        .await
        .unwrap();
    assert_eq!(count, 1);
    // New result replaced page and selection together.
    assert_eq!(session.current_page(), 1);
    assert_eq!(session.selected(), None);
    let page = session.page(50).unwrap();
    assert_eq!(
        page.records()[0].row.get(1),
        Some(&Value::String("Empresa Exemplo".into()))
    );
}

#[tokio::test]
async fn blank_identifier_never_reaches_the_source() {
    let registry = seeded_registry();
    let mut session = ResultSession::new();
    let err = registry.lookup(&mut session, "   ").await;
    assert!(matches!(err, Err(ApiError::Query(_))));
    assert!(session.table().is_none());
}

#[tokio::test]
async fn unconstrained_search_requires_confirmation() {
    let registry = seeded_registry();
    let mut session = ResultSession::new();
    let selection = FilterSelection::new();

    let err = registry
        .search(&mut session, &selection, SearchOptions::default())
        .await;
    assert!(matches!(err, Err(ApiError::Validation(_))));
    assert!(session.table().is_none());

    let count = registry
        .search(
            &mut session,
            &selection,
            SearchOptions {
                allow_unconstrained: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(count, 131);
}

#[tokio::test]
async fn cached_replay_keeps_view_state() {
    let registry = seeded_registry();
    let graph = registry.graph().clone();
    let mut selection = FilterSelection::new();
    selection.set(&graph, catalog::UF, ["SP"]);

    let mut session = ResultSession::new();
    registry
        .search(&mut session, &selection, SearchOptions::default())
        .await
        .unwrap();
    session.set_page(2, 50).unwrap();

    registry
        .search(
            &mut session,
            &selection,
            SearchOptions {
                cached_replay: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(session.current_page(), 2);

    // A plain search resets the view.
    registry
        .search(&mut session, &selection, SearchOptions::default())
        .await
        .unwrap();
    assert_eq!(session.current_page(), 1);
}

#[tokio::test]
async fn export_without_result_is_rejected() {
    let registry = seeded_registry();
    let session = ResultSession::new();
    let err = registry.export(&session, &DelimitedExporter::csv());
    assert!(matches!(
        err,
        Err(ApiError::Session(SessionError::NoResult))
    ));
}
