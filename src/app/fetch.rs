use std::time::Duration;

use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use unicode_width::UnicodeWidthStr;

use super::types::{Headlines, SENTINEL_LABEL, Story};

/// Story title anchors as they appear on the front page, in document order.
const STORY_ANCHOR_SELECTOR: &str = "td.title a";

const USER_AGENT: &str = concat!("hnwatch/", env!("CARGO_PKG_VERSION"));

pub fn build_client() -> Result<Client, String> {
    Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(20))
        .build()
        .map_err(|err| format!("http client build failed: {err}"))
}

/// Retrieves the front page and extracts the top stories. Transport failures
/// and error statuses are reported to the caller; a page whose markup no
/// longer matches degrades to empty fields instead of failing.
pub async fn fetch_front_page(
    client: &Client,
    url: &str,
    max_items: usize,
) -> Result<Headlines, String> {
    let body = client
        .get(url)
        .send()
        .await
        .and_then(|response| response.error_for_status())
        .map_err(|err| format!("fetching {url} failed: {err}"))?
        .text()
        .await
        .map_err(|err| format!("reading {url} failed: {err}"))?;

    Ok(extract_headlines(&body, max_items))
}

pub fn extract_headlines(html: &str, max_items: usize) -> Headlines {
    let doc = Html::parse_document(html);
    let anchors = match Selector::parse(STORY_ANCHOR_SELECTOR) {
        Ok(s) => s,
        Err(_) => return Headlines::default(),
    };

    let mut stories = Vec::new();
    let mut column_width = 0usize;
    // The cap counts every matched anchor, skipped sentinels included.
    for anchor in doc.select(&anchors).take(max_items) {
        let title = element_text(anchor);
        if title == SENTINEL_LABEL {
            continue;
        }

        let url = anchor.value().attr("href").unwrap_or_default().to_string();
        let score = score_text(anchor);
        column_width = column_width
            .max(format!("{title} ({score})").width())
            .max(url.width());
        stories.push(Story { title, url, score });
    }

    Headlines {
        stories,
        column_width,
    }
}

/// Extraction rule for the score column: the anchor's grandparent is the
/// story row, the element sibling right after it is the subtext row, and the
/// score is its first `<span>`. Coupled to the front page's table markup;
/// anything missing yields an empty string.
fn score_text(anchor: ElementRef<'_>) -> String {
    let Some(story_row) = anchor.ancestors().filter_map(ElementRef::wrap).nth(1) else {
        return String::new();
    };
    let Some(subtext_row) = story_row
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .next()
    else {
        return String::new();
    };

    let spans = match Selector::parse("span") {
        Ok(s) => s,
        Err(_) => return String::new(),
    };
    subtext_row
        .select(&spans)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FRONT_PAGE: &str = r#"<html><body><table>
        <tr class="athing"><td class="title">
            <a href="https://example.com/rust">Rust 2.0 released</a>
        </td></tr>
        <tr><td class="subtext"><span>412 points</span> <a href="item?id=1">120 comments</a></td></tr>
        <tr class="athing"><td class="title">
            <a href="item?id=2">Show HN: Foo</a>
        </td></tr>
        <tr><td class="subtext"><span>42 points</span></td></tr>
        <tr class="athing"><td class="title">
            <a href="https://example.com/quiet">A story nobody voted on</a>
        </td></tr>
        <tr><td class="subtext"><a href="item?id=3">discuss</a></td></tr>
        <tr><td class="title"><a href="news?p=2">More</a></td></tr>
    </table></body></html>"#;

    #[test]
    fn extracts_stories_in_document_order() {
        let headlines = extract_headlines(FRONT_PAGE, 10);

        let titles: Vec<&str> = headlines
            .stories
            .iter()
            .map(|story| story.title.as_str())
            .collect();
        assert_eq!(
            titles,
            ["Rust 2.0 released", "Show HN: Foo", "A story nobody voted on"]
        );
        assert_eq!(headlines.stories[0].url, "https://example.com/rust");
        assert_eq!(headlines.stories[0].score, "412 points");
        assert_eq!(headlines.stories[1].url, "item?id=2");
        assert_eq!(headlines.stories[1].score, "42 points");
    }

    #[test]
    fn sentinel_is_dropped_from_output() {
        let headlines = extract_headlines(FRONT_PAGE, 10);
        assert!(
            headlines
                .stories
                .iter()
                .all(|story| story.title != SENTINEL_LABEL)
        );
    }

    #[test]
    fn sentinel_still_consumes_a_cap_slot() {
        let html = r#"<table>
            <tr><td class="title"><a href="a">First</a></td></tr>
            <tr><td class="title"><a href="news?p=2">More</a></td></tr>
            <tr><td class="title"><a href="b">Never reached</a></td></tr>
        </table>"#;

        let headlines = extract_headlines(html, 2);
        assert_eq!(headlines.stories.len(), 1);
        assert_eq!(headlines.stories[0].title, "First");
    }

    #[test]
    fn caps_at_requested_item_count() {
        let rows: String = (0..15)
            .map(|i| format!(r#"<tr><td class="title"><a href="u{i}">Story {i}</a></td></tr>"#))
            .collect();
        let headlines = extract_headlines(&format!("<table>{rows}</table>"), 10);

        assert_eq!(headlines.stories.len(), 10);
        assert_eq!(headlines.stories[9].title, "Story 9");
    }

    #[test]
    fn missing_score_span_degrades_to_empty() {
        let headlines = extract_headlines(FRONT_PAGE, 10);
        assert_eq!(headlines.stories[2].score, "");
    }

    #[test]
    fn missing_href_degrades_to_empty() {
        let html = r#"<table><tr><td class="title"><a>No link</a></td></tr></table>"#;
        let headlines = extract_headlines(html, 10);
        assert_eq!(headlines.stories[0].url, "");
    }

    #[test]
    fn unrecognized_markup_yields_nothing() {
        let headlines = extract_headlines("<html><body><p>maintenance</p></body></html>", 10);
        assert!(headlines.stories.is_empty());
        assert_eq!(headlines.column_width, 0);
    }

    #[test]
    fn column_width_covers_the_widest_row() {
        let headlines = extract_headlines(FRONT_PAGE, 10);

        let expected = headlines
            .stories
            .iter()
            .map(|story| {
                format!("{} ({})", story.title, story.score)
                    .width()
                    .max(story.url.width())
            })
            .max()
            .unwrap();
        assert_eq!(headlines.column_width, expected);
    }

    #[tokio::test]
    async fn fetches_and_extracts_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FRONT_PAGE))
            .mount(&server)
            .await;

        let client = build_client().unwrap();
        let headlines = fetch_front_page(&client, &server.uri(), 10).await.unwrap();

        assert_eq!(headlines.stories.len(), 3);
        assert_eq!(headlines.stories[0].title, "Rust 2.0 released");
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = build_client().unwrap();
        let result = fetch_front_page(&client, &server.uri(), 10).await;

        let err = result.unwrap_err();
        assert!(err.contains("503"), "unexpected error: {err}");
    }
}
