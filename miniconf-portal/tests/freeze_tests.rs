//! Integration tests for the static export

mod common;

use std::fs;

use serde_json::Value;

use miniconf_common::{Error, SiteContext};
use miniconf_portal::freeze::{enumerate_routes, freeze};
use miniconf_portal::routes::{Page, Route};
use miniconf_portal::AppState;

#[test]
fn test_enumerate_routes_covers_site() {
    let fixture = common::full_site();
    let state = fixture.state();
    let routes = enumerate_routes(&state.site);

    for page in Page::ALL {
        assert!(routes.contains(&Route::Page(page)));
    }
    assert!(routes.contains(&Route::PapersJson));
    assert!(routes.contains(&Route::Poster("p1".to_string())));
    assert!(routes.contains(&Route::Poster("p2".to_string())));
    assert!(routes.contains(&Route::Workshop("w1".to_string())));
    assert!(routes.contains(&Route::Serve("goldsponsors".to_string())));
    // 11 pages + papers.json + 2 posters + 1 workshop + 12 datasets
    assert_eq!(routes.len(), 27);
}

#[test]
fn test_freeze_writes_every_route_and_assets() {
    let fixture = common::full_site();
    let state = fixture.state();
    let build_dir = fixture.temp_dir.path().join("build");

    let report = freeze(&state, &build_dir).unwrap();

    assert_eq!(report.pages, 27);
    // static/css/main.css plus the favicon
    assert_eq!(report.assets, 2);

    assert!(build_dir.join("calendar.html").is_file());
    assert!(build_dir.join("poster_p1.html").is_file());
    assert!(build_dir.join("workshop_w1.html").is_file());
    assert!(build_dir.join("static").join("css").join("main.css").is_file());
    assert!(build_dir.join("favicon.ico").is_file());

    let papers: Value =
        serde_json::from_str(&fs::read_to_string(build_dir.join("papers.json")).unwrap()).unwrap();
    assert_eq!(papers[0]["UID"], "p1");

    let faq: Value =
        serde_json::from_str(&fs::read_to_string(build_dir.join("serve_faq.json")).unwrap())
            .unwrap();
    assert_eq!(faq["FAQ"][0]["A"], "June");
}

#[test]
fn test_frozen_page_matches_served_page() {
    let fixture = common::full_site();
    let state = fixture.state();
    let build_dir = fixture.temp_dir.path().join("build");
    freeze(&state, &build_dir).unwrap();

    let pages = miniconf_portal::pages::Pages::new(&state.site, &state.pages_dir);
    let served = pages
        .render(&Route::Poster("p2".to_string()), state.renderer.as_ref())
        .unwrap();
    let frozen = fs::read_to_string(build_dir.join("poster_p2.html")).unwrap();
    assert_eq!(served.body, frozen);
}

#[test]
fn test_freeze_without_static_dir() {
    let fixture = common::full_site();
    fs::remove_dir_all(fixture.static_dir()).unwrap();
    let build_dir = fixture.temp_dir.path().join("build");

    let report = freeze(&fixture.state(), &build_dir).unwrap();
    // Only the favicon from the site data directory
    assert_eq!(report.assets, 1);
    assert!(!build_dir.join("static").exists());
}

#[test]
fn test_freeze_aborts_on_missing_dataset() {
    let fixture = common::full_site();
    fs::remove_file(fixture.site_data().join("faq.json")).unwrap();
    let build_dir = fixture.temp_dir.path().join("build");

    let err = freeze(&fixture.state(), &build_dir).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_freeze_rejects_unsafe_dataset_name() {
    let fixture = common::full_site();
    let state = fixture.state();

    let mut datasets = state.site.site_data().clone();
    datasets.insert("a/b", serde_json::json!(1));
    let site = SiteContext::from_datasets(fixture.site_data(), datasets, Vec::new()).unwrap();
    let state = AppState::new(site, fixture.pages_dir(), fixture.static_dir());

    let err = freeze(&state, &fixture.temp_dir.path().join("build")).unwrap_err();
    assert!(matches!(err, Error::Export(ref msg) if msg.contains("a/b")));
}
