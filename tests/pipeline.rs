//! End-to-end runs against a saved portal page and a local document server.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::routing::get;
use axum::Router;

use causelist::scrapers::HtmlSnapshotPage;
use causelist::{CauseListFetcher, SelectionCriteria, Settings};

const LIST1: &[u8] = b"%PDF-1.4 list one";
const LIST3: &[u8] = b"%PDF-1.4 list three";

/// Serve `/list1.pdf` and `/list3.pdf`; everything else is a 404.
async fn document_server() -> SocketAddr {
    let app = Router::new()
        .route("/list1.pdf", get(|| async { LIST1 }))
        .route("/list3.pdf", get(|| async { LIST3 }))
        .route("/notice.html", get(|| async { "<html>notice</html>" }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn quick_settings() -> Settings {
    let mut settings = Settings::default();
    settings.form.settle_ms = 0;
    settings.form.results_timeout = 0;
    settings.download.timeout = 5;
    settings
}

fn karnataka() -> SelectionCriteria {
    SelectionCriteria::new(
        "Karnataka",
        "Bengaluru Urban",
        "City Civil Court",
        "",
        "2024-05-01",
    )
}

/// A results page: the cause list form followed by the given anchors.
fn results_page(anchors: &[String]) -> String {
    let links: String = anchors
        .iter()
        .map(|href| format!(r#"<a href="{href}">link</a>"#))
        .collect();
    format!(
        r#"<html><body>
          <select id="state">
            <option>Select State</option>
            <option>Karnataka</option>
          </select>
          <select id="district">
            <option>Select District</option>
            <option>Bengaluru Urban</option>
          </select>
          <select id="courtComplex">
            <option>Select Complex</option>
            <option>City Civil Court Complex</option>
          </select>
          <input id="causelist_date" type="text">
          <button type="submit">Search</button>
          <div id="results">{links}</div>
        </body></html>"#
    )
}

#[tokio::test]
async fn downloads_only_document_links() {
    let addr = document_server().await;
    let dir = tempfile::tempdir().unwrap();
    let fetcher = CauseListFetcher::new(quick_settings());
    let page = HtmlSnapshotPage::parse(
        &results_page(&[
            format!("http://{addr}/list1.pdf"),
            format!("http://{addr}/notice.html"),
        ]),
        None,
    );
    let closed = page.closed_flag();
    let mut progress = Vec::new();

    let saved = fetcher
        .fetch_from(page, &karnataka(), dir.path(), &mut |i: usize, t: usize| {
            progress.push((i, t))
        })
        .await
        .unwrap();

    let expected = dir
        .path()
        .join("Karnataka_Bengaluru Urban_City Civil Court_All_2024-05-01_list1.pdf");
    assert_eq!(saved, vec![expected.clone()]);
    assert_eq!(std::fs::read(&expected).unwrap(), LIST1);
    assert_eq!(progress, vec![(1, 1)]);
    assert!(closed.load(std::sync::atomic::Ordering::SeqCst));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn no_document_links_means_no_files() {
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("lists");
    let fetcher = CauseListFetcher::new(quick_settings());
    let page = HtmlSnapshotPage::parse(
        &results_page(&["http://127.0.0.1:1/about.html".to_string()]),
        None,
    );
    let mut calls = 0;

    let saved = fetcher
        .fetch_from(page, &karnataka(), &dest, &mut |_: usize, _: usize| calls += 1)
        .await
        .unwrap();

    assert!(saved.is_empty());
    assert_eq!(calls, 0);
    assert!(dest.is_dir());
    assert_eq!(std::fs::read_dir(&dest).unwrap().count(), 0);
}

#[tokio::test]
async fn failed_document_is_skipped() {
    let addr = document_server().await;
    let dir = tempfile::tempdir().unwrap();
    let fetcher = CauseListFetcher::new(quick_settings());
    let page = HtmlSnapshotPage::parse(
        &results_page(&[
            format!("http://{addr}/list1.pdf"),
            format!("http://{addr}/list2.pdf"),
            format!("http://{addr}/list3.pdf"),
        ]),
        None,
    );
    let mut progress = Vec::new();

    let saved = fetcher
        .fetch_from(page, &karnataka(), dir.path(), &mut |i: usize, t: usize| {
            progress.push((i, t))
        })
        .await
        .unwrap();

    let names: Vec<String> = saved
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "Karnataka_Bengaluru Urban_City Civil Court_All_2024-05-01_list1.pdf",
            "Karnataka_Bengaluru Urban_City Civil Court_All_2024-05-01_list3.pdf",
        ]
    );
    assert_eq!(progress, vec![(1, 3), (3, 3)]);
    assert_eq!(std::fs::read(&saved[1]).unwrap(), LIST3);

    let leftovers: Vec<PathBuf> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| !saved.contains(p))
        .collect();
    assert!(leftovers.is_empty(), "unexpected files: {:?}", leftovers);
}

#[tokio::test]
async fn relative_links_resolve_against_page_url() {
    let fetcher = CauseListFetcher::new(quick_settings());
    let page = HtmlSnapshotPage::parse(
        &results_page(&[
            "/cases/list1.pdf".to_string(),
            "display_causelist.php?id=7".to_string(),
            "help.html".to_string(),
            "/cases/list1.pdf".to_string(),
        ]),
        Some("https://services.ecourts.gov.in/ecourtindia_v6/"),
    );

    let links = fetcher.harvest_from(page, &karnataka()).await;

    assert_eq!(
        links,
        vec![
            "https://services.ecourts.gov.in/cases/list1.pdf",
            "https://services.ecourts.gov.in/ecourtindia_v6/display_causelist.php?id=7",
            "https://services.ecourts.gov.in/cases/list1.pdf",
        ]
    );
}

#[tokio::test]
async fn court_label_names_output_files() {
    let addr = document_server().await;
    let dir = tempfile::tempdir().unwrap();
    let fetcher = CauseListFetcher::new(quick_settings());
    let page = HtmlSnapshotPage::parse(&results_page(&[format!("http://{addr}/list1.pdf")]), None);
    let criteria = SelectionCriteria::new(
        "Karnataka",
        "Bengaluru Urban",
        "City Civil Court",
        "Court Hall: 12/A",
        "2024-05-01",
    );

    let saved = fetcher
        .fetch_from(page, &criteria, dir.path(), &mut |_: usize, _: usize| {})
        .await
        .unwrap();

    assert_eq!(
        saved,
        vec![dir
            .path()
            .join("Karnataka_Bengaluru Urban_City Civil Court_Court Hall_ 12_A_2024-05-01_list1.pdf")]
    );
}
