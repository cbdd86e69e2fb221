// Catalog Scenario Tests
//
// Purpose: Drive load -> index -> filter -> page -> detail through the public API
// Run with: cargo test --test catalog_scenarios

use flate2::{write::GzEncoder, Compression};
use plant_catalog::loader::{detail_resource, LIGHT_DATASET_RESOURCE};
use plant_catalog::session::DetailPane;
use plant_catalog::{Action, Catalog, Facet, MemorySource, Session, ViewState};
use std::io::Write;

fn gzip(text: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    encoder.finish().unwrap()
}

/// Overlaps chosen so every facet excludes at least one plant
const GARDEN_JSON: &str = r#"{
    "rosa-rugosa":     {"f":"Rosa rugosa","c":["Beach Rose"],"t":["Shrub"],"z":["2","3"],"l":["Full sun"],"m":"Low","tg":["coastal"]},
    "quercus-alba":    {"f":"Quercus alba","c":["White Oak"],"t":["Tree"],"z":["3b","9a"],"l":["Full sun"],"m":"Low"},
    "quercus-rubra":   {"f":"Quercus rubra","c":["Red Oak"],"t":["Tree"],"z":["4","8"],"l":["Full sun","Partial Shade"],"m":"Medium","p":["Oak wilt"]},
    "hosta-plantaginea": {"f":"Hosta plantaginea","c":["August Lily"],"t":["Herbaceous Perennial"],"z":["3","9"],"l":["Deep shade"],"m":"Low"},
    "acer-rubrum":     {"f":"Acer rubrum","c":["Red Maple"],"t":["Tree"],"z":["3","9"],"l":["Full sun"],"m":"High","cv":["October Glory"]},
    "mystery":         {"c":["Unlabelled specimen"]}
}"#;

fn garden() -> Catalog {
    let dataset = plant_catalog::loader::parse_light_dataset(LIGHT_DATASET_RESOURCE, &gzip(GARDEN_JSON)).unwrap();
    Catalog::build(dataset).unwrap()
}

fn keys(catalog: &Catalog, view: &ViewState) -> Vec<String> {
    catalog.render(view).rows.into_iter().map(|row| row.key).collect()
}

#[test]
fn test_initial_view_excludes_plants_without_facet_values() {
    let catalog = garden();
    assert_eq!(
        keys(&catalog, &catalog.initial_view()),
        vec!["rosa-rugosa", "quercus-alba", "quercus-rubra", "hosta-plantaginea", "acer-rubrum"]
    );
}

#[test]
fn test_search_covers_names_tags_and_cultivars() {
    let catalog = garden();
    let view = catalog.initial_view();

    assert_eq!(keys(&catalog, &view.with_search("oak")), vec!["quercus-alba", "quercus-rubra"]);
    assert_eq!(keys(&catalog, &view.with_search("RED")), vec!["quercus-rubra", "acer-rubrum"]);
    assert_eq!(keys(&catalog, &view.with_search("coast")), vec!["rosa-rugosa"]);
    assert_eq!(keys(&catalog, &view.with_search("glory")), vec!["acer-rubrum"]);
    assert_eq!(keys(&catalog, &view.with_search("red maple")), vec!["acer-rubrum"]);
    assert!(keys(&catalog, &view.with_search("zzz")).is_empty());
}

#[test]
fn test_search_keys_include_plants_without_facets() {
    let catalog = garden();
    assert_eq!(catalog.search_keys(Some("specimen")), Some(vec!["mystery"]));
}

#[test]
fn test_facets_are_conjunctive() {
    let catalog = garden();
    let view = catalog
        .initial_view()
        .cleared(Facet::Maintenance)
        .toggled(Facet::Maintenance, "Low")
        .cleared(Facet::Light)
        .toggled(Facet::Light, "Full sun");
    assert_eq!(keys(&catalog, &view), vec!["rosa-rugosa", "quercus-alba"]);

    let trees_only = view.cleared(Facet::Type).toggled(Facet::Type, "Tree");
    assert_eq!(keys(&catalog, &trees_only), vec!["quercus-alba"]);

    let zone_nine = trees_only.cleared(Facet::Zone).toggled(Facet::Zone, "9");
    assert!(keys(&catalog, &zone_nine).is_empty());
}

#[test]
fn test_select_all_then_clear_all_matches_nothing() {
    let catalog = garden();
    let view = catalog
        .initial_view()
        .with_all(Facet::Zone, catalog.universe())
        .cleared(Facet::Zone);
    assert!(view.selection().selected(Facet::Zone).is_empty());
    assert_eq!(catalog.render(&view).total, 0);
}

#[test]
fn test_problem_plants_toggle() {
    let catalog = garden();
    let view = catalog.initial_view().with_problem_plants(false);
    assert!(!keys(&catalog, &view).contains(&"quercus-rubra".to_string()));
    assert!(keys(&catalog, &view.with_problem_plants(true)).contains(&"quercus-rubra".to_string()));
}

#[test]
fn test_facet_universe_order() {
    let catalog = garden();
    let universe = catalog.universe();
    assert_eq!(universe.types, vec!["Herbaceous Perennial", "Shrub", "Tree"]);
    assert_eq!(universe.zones, vec!["2", "3", "3b", "4", "8", "9", "9a"]);
    assert_eq!(universe.light, vec!["Full sun", "Partial Shade", "Deep shade"]);
    assert_eq!(universe.maintenance, vec!["Low", "Medium", "High"]);
    assert_eq!(universe.problems, vec!["Oak wilt"]);
}

#[test]
fn test_rows_carry_title_and_zone_range() {
    let catalog = garden();
    let page = catalog.render(&catalog.initial_view().with_search("alba"));
    assert_eq!(page.total, 1);
    assert_eq!(page.rows[0].title, "Quercus alba");
    assert_eq!(page.rows[0].zone_range.as_deref(), Some("3b - 9a"));
    assert_eq!(page.rows[0].common_names, vec!["White Oak"]);
}

#[tokio::test]
async fn test_session_end_to_end() {
    let source = MemorySource::new()
        .with(LIGHT_DATASET_RESOURCE, gzip(GARDEN_JSON))
        .with(
            detail_resource("acer-rubrum"),
            gzip(r#"{"full-name":"Acer rubrum","genus":"Acer","family":"Sapindaceae","flower-color":["Red"]}"#),
        );

    let mut session = Session::new();
    assert!(!session.dispatch(Action::Search("maple".to_string())));

    session.load(&source).await;
    assert!(session.dispatch(Action::Search("maple".to_string())));

    let page = session.page().unwrap();
    assert_eq!(page.total, 1);
    let key = page.rows[0].key.clone();

    session.open_detail(&source, &key).await;
    let DetailPane::Showing { view, .. } = session.detail() else {
        panic!("detail pane should show acer-rubrum");
    };
    assert_eq!(view.title.as_deref(), Some("Acer rubrum"));
    assert_eq!(view.field_count(), 3);

    session.open_detail(&source, "quercus-alba").await;
    assert!(session.take_notice().is_some());
    assert!(matches!(session.detail(), DetailPane::Showing { key, .. } if key == "acer-rubrum"));
}
