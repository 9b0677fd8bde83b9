mod helpers;

use helpers::{NATURE_DOI, PROBE_TIMEOUT, RecordingPresenter, crossref_work, fixture_page};
use mockall::mock;
use paperlens::{
    Analysis, Lens, Presenter,
    cache::{KeyValueStore, MemoryStore},
    config::Config,
    journal::MatchKind,
    metadata::MetadataSource,
    mirror::MirrorState,
    page::Page,
};
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

mock! {
    pub Presenter {}

    impl Presenter for Presenter {
        fn present(&mut self, analysis: &Analysis);
    }
}

const NATURE_URL: &str = "https://www.nature.com/articles/s41586-020-1234-5";

fn config(server: &MockServer) -> Config {
    Config::default()
        .with_crossref_url(server.uri())
        .with_journal_index_url(format!("{}/journals.json", server.uri()))
        .with_mirrors("http", Vec::<String>::new())
        .with_mirror_probe_timeout(PROBE_TIMEOUT)
}

fn lens(config: Config) -> Lens {
    Lens::new(config, Arc::new(MemoryStore::new())).unwrap()
}

async fn mount_index(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/journals.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn nature_index() -> serde_json::Value {
    serde_json::json!({
        "NATURE": {"abbr": "NATURE", "issn": "0028-0836", "if": "49.9", "if5y": "54.6", "category": "Multidisciplinary|Q1|5/73"}
    })
}

#[tokio::test]
async fn crossref_metadata_and_exact_journal_match() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/works/{NATURE_DOI}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(crossref_work("Nature", 2020)))
        .expect(1)
        .mount(&server)
        .await;
    mount_index(&server, nature_index()).await;

    let page = fixture_page("nature_article.html", NATURE_URL);
    let session = lens(config(&server)).analyze(&page).await.unwrap();
    let analysis = &session.analysis;

    assert_eq!(analysis.article.doi.as_deref(), Some(NATURE_DOI));
    assert_eq!(analysis.article.year.as_deref(), Some("2020"));
    assert_eq!(analysis.article.title, "X from Crossref");
    assert_eq!(analysis.article.source, MetadataSource::Crossref);
    assert_eq!(
        analysis.article.authors[0].orcid_link.as_deref(),
        Some("https://orcid.org/0000-0002-1825-0097")
    );

    let journal = analysis.journal.as_ref().unwrap();
    assert_eq!(journal.kind, MatchKind::Exact);
    assert_eq!(journal.matched, "NATURE");
    assert_eq!(journal.info.impact_factor.as_deref(), Some("49.9"));
    assert_eq!(analysis.report.abbr.as_deref(), Some("NATURE"));

    // No mirror candidates configured.
    assert_eq!(
        session.mirror.settle(Duration::from_secs(1)).await,
        MirrorState::NotFound
    );
}

#[tokio::test]
async fn crossref_failure_falls_back_to_meta_tags() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/works/{NATURE_DOI}")))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    mount_index(&server, nature_index()).await;

    let page = fixture_page("nature_article.html", NATURE_URL);
    let session = lens(config(&server)).analyze(&page).await.unwrap();
    let article = &session.analysis.article;

    assert_eq!(article.source, MetadataSource::Page);
    assert_eq!(article.journal, "Nature");
    assert_eq!(article.title, "X");
    assert_eq!(article.year.as_deref(), Some("2020"));
    assert_eq!(article.doi.as_deref(), Some(NATURE_DOI));
    assert_eq!(article.authors.len(), 2);
    assert!(session.analysis.journal.is_some());
}

#[tokio::test]
async fn crossref_without_message_falls_back() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/works/{NATURE_DOI}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "ok"})))
        .mount(&server)
        .await;
    mount_index(&server, nature_index()).await;

    let page = fixture_page("nature_article.html", NATURE_URL);
    let session = lens(config(&server)).analyze(&page).await.unwrap();
    assert_eq!(session.analysis.article.source, MetadataSource::Page);
}

#[tokio::test]
async fn non_academic_page_is_never_presented() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let page = fixture_page("blog_post.html", "https://kitchen.example.com/blog/sourdough");
    let mut presenter = MockPresenter::new();
    presenter.expect_present().times(0);

    let mirror = lens(config(&server)).run(&page, &mut presenter).await;
    assert!(mirror.is_none());
}

#[tokio::test]
async fn academic_layout_without_journal_is_never_presented() {
    let server = MockServer::start().await;
    mount_index(&server, nature_index()).await;

    let page = Page::parse(
        Url::parse("https://repository.example.edu/item/42").unwrap(),
        r#"<html><head><title>Working paper</title></head><body>
        <div id="abstract">We study things.</div>
        <div class="references"><p>Nobody (2001)</p></div>
        </body></html>"#,
    );
    let mut presenter = MockPresenter::new();
    presenter.expect_present().times(0);

    assert!(lens(config(&server)).run(&page, &mut presenter).await.is_none());
}

#[tokio::test]
async fn presenter_receives_resolved_analysis() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/works/{NATURE_DOI}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(crossref_work("Nature", 2020)))
        .mount(&server)
        .await;
    mount_index(&server, nature_index()).await;

    let page = fixture_page("nature_article.html", NATURE_URL);
    let mut presenter = RecordingPresenter::default();
    let mirror = lens(config(&server)).run(&page, &mut presenter).await;

    assert!(mirror.is_some());
    assert_eq!(presenter.presented.len(), 1);
    assert_eq!(
        presenter.presented[0].report.citation,
        "Jane Doe et al., 'X from Crossref' (2020), Nature"
    );
}

#[tokio::test]
async fn low_impact_journal_is_suppressed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/works/{NATURE_DOI}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(crossref_work("Nature", 2020)))
        .mount(&server)
        .await;
    mount_index(&server, serde_json::json!({"NATURE": {"if": "1.5"}})).await;

    let page = fixture_page("nature_article.html", NATURE_URL);
    let mut presenter = MockPresenter::new();
    presenter.expect_present().times(0);

    let lens = lens(config(&server).with_min_impact_factor(2.0));
    assert!(lens.run(&page, &mut presenter).await.is_none());
}

#[tokio::test]
async fn unknown_impact_factor_is_not_suppressed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/works/{NATURE_DOI}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(crossref_work("Nature", 2020)))
        .mount(&server)
        .await;
    mount_index(&server, serde_json::json!({"NATURE": {"if": "0"}})).await;

    let page = fixture_page("nature_article.html", NATURE_URL);
    let lens = lens(config(&server).with_min_impact_factor(2.0));
    assert!(lens.analyze(&page).await.is_some());
}

#[tokio::test]
async fn journal_index_failure_leaves_article_unmatched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/works/{NATURE_DOI}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(crossref_work("Nature", 2020)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/journals.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let page = fixture_page("nature_article.html", NATURE_URL);
    // "Nature" is on the Springer Nature publisher list.
    let config = config(&server).with_publishers(Vec::new());
    let session = lens(config).analyze(&page).await.unwrap();

    assert!(session.analysis.journal.is_none());
    assert!(!session.analysis.report.in_index);
}

#[tokio::test]
async fn journal_index_is_served_from_cache_on_second_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/works/{NATURE_DOI}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(crossref_work("Nature", 2020)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/journals.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(nature_index()))
        .expect(1)
        .mount(&server)
        .await;

    let store = MemoryStore::new();
    let page = fixture_page("nature_article.html", NATURE_URL);
    for _ in 0..2 {
        let lens = Lens::new(config(&server), Arc::new(store.clone())).unwrap();
        let session = lens.analyze(&page).await.unwrap();
        assert_eq!(session.analysis.journal.unwrap().matched, "NATURE");
    }
    assert!(store.get("journal-index").await.unwrap().is_some());
}

#[tokio::test]
async fn disabled_journal_index_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/works/{NATURE_DOI}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(crossref_work("Nature", 2020)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/journals.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(nature_index()))
        .expect(0)
        .mount(&server)
        .await;

    let page = fixture_page("nature_article.html", NATURE_URL);
    let config = config(&server).with_journal_index_url("PASTE_YOUR_GIST_RAW_URL_HERE");
    let session = lens(config).analyze(&page).await.unwrap();

    // Falls through to the publisher list.
    let journal = session.analysis.journal.unwrap();
    assert_eq!(journal.kind, MatchKind::Publisher);
    assert!(session.analysis.report.known_high_impact);
}

#[tokio::test]
async fn doi_from_anchor_and_publisher_authors_on_wiley() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/works/10.1002/adma.202100001"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    mount_index(
        &server,
        serde_json::json!({"ADVANCED MATERIALS": {"abbr": "ADV MATER", "if": "27.4"}}),
    )
    .await;

    let page = fixture_page(
        "wiley_no_doi_meta.html",
        "https://onlinelibrary.wiley.com/toc/15214095/current",
    );
    let session = lens(config(&server)).analyze(&page).await.unwrap();
    let article = &session.analysis.article;

    assert_eq!(article.doi.as_deref(), Some("10.1002/adma.202100001"));
    assert_eq!(article.year.as_deref(), Some("2021"));
    let names: Vec<_> = article.authors.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["Wei Zhang", "Maria Garcia"]);
    assert_eq!(session.analysis.journal.as_ref().unwrap().kind, MatchKind::Exact);
}
