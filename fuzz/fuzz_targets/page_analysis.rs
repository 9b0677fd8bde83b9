#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use reqwest::StatusCode;
use url::Url;

use paperlens::config::Config;
use paperlens::fetcher::pipeline::process_response;
use paperlens::metadata::fallback::article_from_page;
use paperlens::page::{Page, classify, extract_doi};

fuzz_target!(|data: &[u8]| {
    let url = Url::parse("https://journals.example.org/doi/full/10.1000/fuzz").unwrap();

    // Charset sniffing and decoding must never panic, whatever the bytes.
    let Ok(response) = process_response(
        url.clone(),
        StatusCode::OK,
        Bytes::copy_from_slice(data),
        "text/html",
    ) else {
        return;
    };

    let config = Config::default();
    let page = Page::parse(url, &response.body_utf8);
    let _ = classify(&page, &config);
    let doi = extract_doi(&page, &config);
    let _ = article_from_page(&page, doi.as_deref(), &config);
});
