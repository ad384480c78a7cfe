//! Shared fixture: a small but complete conference site on disk

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tempfile::TempDir;

use miniconf_common::SiteContext;
use miniconf_portal::AppState;

/// Site data, pages and static directories under one temp dir
pub struct Fixture {
    pub temp_dir: TempDir,
}

impl Fixture {
    pub fn site_data(&self) -> PathBuf {
        self.temp_dir.path().join("sitedata")
    }

    pub fn pages_dir(&self) -> PathBuf {
        self.temp_dir.path().join("pages")
    }

    pub fn static_dir(&self) -> PathBuf {
        self.temp_dir.path().join("static")
    }

    pub fn state(&self) -> AppState {
        let site = SiteContext::load(&self.site_data()).unwrap();
        AppState::new(site, self.pages_dir(), self.static_dir())
    }
}

fn write_json(dir: &Path, name: &str, value: &Value) {
    fs::write(dir.join(name), serde_json::to_string_pretty(value).unwrap()).unwrap();
}

fn paper(uid: &str, title: &str, start_time: &str) -> Value {
    json!({
        "UID": uid,
        "title": title,
        "abstract": format!("Abstract of {}", title),
        "session": "Posters",
        "start_time": start_time,
        "authors": "Ada Lovelace|Alan Turing",
        "summary_video": "",
        "full_video": "",
        "paper": format!("{}.pdf", uid)
    })
}

/// Write the complete fixture site
pub fn full_site() -> Fixture {
    let fixture = Fixture {
        temp_dir: TempDir::new().unwrap(),
    };
    let data = fixture.site_data();
    let pages = fixture.pages_dir();
    let static_dir = fixture.static_dir();
    fs::create_dir_all(&data).unwrap();
    fs::create_dir_all(pages.join("calls")).unwrap();
    fs::create_dir_all(static_dir.join("css")).unwrap();

    fs::write(data.join("config.yml"), "name: ConfX\nyear: 2021\n").unwrap();
    write_json(
        &data,
        "papers.json",
        &json!({
            "p2": paper("p2", "Zeta <Results>", "2021-06-01T10:00:00Z"),
            "p1": paper("p1", "Alpha Study", "2021-06-01T09:00:00Z")
        }),
    );
    write_json(
        &data,
        "workshops.json",
        &json!([{
            "UID": "w1",
            "title": "Data Workshop",
            "abstract": "Hands on",
            "session": "Workshops",
            "start_time": "2021-06-02T08:00:00Z",
            "authors": "Grace Hopper|Edsger Dijkstra"
        }]),
    );
    write_json(&data, "tutorials.json", &json!([]));
    write_json(
        &data,
        "speakers.json",
        &json!({"speakers": [{
            "UID": "s1",
            "name": "Keynote Speaker",
            "session": "Keynote",
            "start_time": "2021-06-01T16:00:00Z"
        }]}),
    );
    write_json(&data, "social.json", &json!([]));
    write_json(&data, "committee.json", &json!({"committee": [{"name": "Chair"}]}));
    write_json(
        &data,
        "calls.json",
        &json!({"calls": [{"name": "Call for Papers", "body": "calls/papers.md"}]}),
    );
    write_json(&data, "faq.json", &json!({"FAQ": [{"Q": "When?", "A": "June"}]}));
    write_json(&data, "goldsponsors.json", &json!([{"name": "Gold Co"}]));
    write_json(&data, "silversponsors.json", &json!([]));
    write_json(&data, "bronzesponsors.json", &json!([]));

    fs::write(pages.join("Home.md"), "# Welcome to ConfX\n").unwrap();
    fs::write(pages.join("registration.md"), "Register *now*.\n").unwrap();
    fs::write(pages.join("calls").join("papers.md"), "Submit your **papers**.\n").unwrap();

    fs::write(static_dir.join("css").join("main.css"), "body { margin: 0; }\n").unwrap();
    fs::write(data.join("favicon.ico"), [0u8, 0, 1, 0]).unwrap();

    fixture
}
