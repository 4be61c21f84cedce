//! Scrape pipeline: fetch -> extract -> parse -> validate.
//!
//! Stages run strictly in order and the first failure short-circuits. The
//! error variant identifies the stage (see `Error::stage`), which is also
//! recorded on the failure log line. Nothing is cached or retried here.

use crate::extract::{AssignmentExtractor, Extractor, parse_lenient, validate_batch};
use crate::fetch::{FetchClient, FetchConfig, PageSource, SourcePage};
use async_trait::async_trait;
use radar_core::{AppConfig, Error, Website};
use std::time::Instant;

/// Source of truth for the website batch, as seen by the query service.
#[async_trait]
pub trait WebsiteSource: Send + Sync {
    async fn fetch_websites(&self) -> Result<Vec<Website>, Error>;
}

/// Composes a page source with an extraction strategy.
pub struct ScrapePipeline<P, E = AssignmentExtractor> {
    source: P,
    extractor: E,
}

impl ScrapePipeline<SourcePage> {
    /// Pipeline over HTTP for the configured target URL.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let client = FetchClient::new(FetchConfig::from_app(config))?;
        let source = SourcePage::new(client, &config.target_url)?;
        Ok(Self::new(source))
    }
}

impl<P: PageSource> ScrapePipeline<P> {
    /// Pipeline with the default `const websites = [...]` extractor.
    pub fn new(source: P) -> Self {
        Self { source, extractor: AssignmentExtractor::default() }
    }
}

impl<P: PageSource, E: Extractor> ScrapePipeline<P, E> {
    pub fn with_extractor(source: P, extractor: E) -> Self {
        Self { source, extractor }
    }

    pub fn source(&self) -> &P {
        &self.source
    }

    /// Run every stage once.
    pub async fn run(&self) -> Result<Vec<Website>, Error> {
        let start = Instant::now();
        let result = self.run_stages().await;

        match &result {
            Ok(websites) => tracing::info!(
                count = websites.len(),
                extractor = self.extractor.name(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "scrape succeeded"
            ),
            Err(e) => tracing::error!(stage = e.stage().unwrap_or("unknown"), error = %e, "scrape failed"),
        }

        result
    }

    async fn run_stages(&self) -> Result<Vec<Website>, Error> {
        let page = self.source.fetch_page().await?;
        let literal = self.extractor.extract(&page)?;
        let value = parse_lenient(literal)?;
        validate_batch(value)
    }
}

#[async_trait]
impl<P: PageSource, E: Extractor> WebsiteSource for ScrapePipeline<P, E> {
    async fn fetch_websites(&self) -> Result<Vec<Website>, Error> {
        self.run().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct StaticPage(&'static str);

    #[async_trait]
    impl PageSource for StaticPage {
        async fn fetch_page(&self) -> Result<String, Error> {
            Ok(self.0.to_string())
        }
    }

    struct DownPage;

    #[async_trait]
    impl PageSource for DownPage {
        async fn fetch_page(&self) -> Result<String, Error> {
            Err(Error::HttpStatus { status: 502, status_text: "Bad Gateway".into() })
        }
    }

    const SAMPLE_PAGE: &str = r#"<html><body><script>const websites = [{"hostname":"a.com","name":"A","logo":"https://a.com/x.png","description":"d"}];</script></body></html>"#;

    #[tokio::test]
    async fn test_pipeline_sample_page() {
        let websites = ScrapePipeline::new(StaticPage(SAMPLE_PAGE)).run().await.unwrap();

        assert_eq!(websites.len(), 1);
        assert_eq!(websites[0].hostname, "a.com");
        assert_eq!(websites[0].logo, "https://a.com/x.png");
    }

    #[tokio::test]
    async fn test_pipeline_js_literal_page() {
        let page = "<script>\nconst websites = [\n  { hostname: 'b.com', name: 'B', logo: '/b.svg', description: 'bee', rating: 3, },\n];\n</script>";
        let websites = ScrapePipeline::new(StaticPage(page)).run().await.unwrap();

        assert_eq!(websites[0].hostname, "b.com");
        assert_eq!(websites[0].rating, Some(3.0));
    }

    #[tokio::test]
    async fn test_pipeline_stage_failures() {
        let fetch = ScrapePipeline::new(DownPage).run().await.unwrap_err();
        assert_eq!(fetch.stage(), Some("fetch"));

        let extract = ScrapePipeline::new(StaticPage("<html></html>")).run().await.unwrap_err();
        assert_eq!(extract.stage(), Some("extract"));

        let parse = ScrapePipeline::new(StaticPage("const websites = [{hostname: }];")).run().await.unwrap_err();
        assert_eq!(parse.stage(), Some("deserialize"));

        let validate = ScrapePipeline::new(StaticPage(r#"const websites = [{"name":"no host"}];"#))
            .run()
            .await
            .unwrap_err();
        assert_eq!(validate.stage(), Some("validate"));
    }

    #[tokio::test]
    async fn test_pipeline_over_http() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(SAMPLE_PAGE, "text/html"))
            .expect(1)
            .mount(&server)
            .await;

        let config = AppConfig { target_url: server.uri(), ..Default::default() };
        let pipeline = ScrapePipeline::from_config(&config).unwrap();
        let websites = pipeline.fetch_websites().await.unwrap();

        assert_eq!(websites[0].name, "A");
    }
}
