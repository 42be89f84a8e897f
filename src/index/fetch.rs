use anyhow::Result;
use log::info;

use crate::http::HttpClient;
use crate::package::Category;

use super::{Index, parse_index};

/// Catalog location; `{}` is replaced by the pluralized category.
pub const DEFAULT_INDEX_URL: &str =
    "https://raw.githubusercontent.com/pandoc-extras/packages/master/{}.yaml";

pub fn index_url_for(template: &str, category: &Category) -> String {
    template.replace("{}", &category.plural())
}

/// Download and parse the catalog of a category.
#[tracing::instrument(skip(http))]
pub async fn get_index(http: &HttpClient, category: &Category, index_url: Option<&str>) -> Result<Index> {
    let url = index_url_for(index_url.unwrap_or(DEFAULT_INDEX_URL), category);
    info!("Fetching {} index from {}", category, url);

    let raw = http.get_text(&url).await?;
    let index = parse_index(&raw)?;

    info!("Index lists {} package branch(es)", index.len());
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PmError, kind_of};
    use reqwest::Client;

    #[test]
    fn test_index_url_for() {
        let category: Category = "template".parse().unwrap();
        assert_eq!(
            index_url_for(DEFAULT_INDEX_URL, &category),
            "https://raw.githubusercontent.com/pandoc-extras/packages/master/templates.yaml"
        );
        assert_eq!(
            index_url_for("http://mirror/{}/index.yaml", &category),
            "http://mirror/templates/index.yaml"
        );
    }

    #[test_log::test(tokio::test)]
    async fn test_get_index_from_custom_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/filters.yaml")
            .with_status(200)
            .with_body("- name: debug\n  url: https://x/debug.yaml\n")
            .create_async()
            .await;

        let http = HttpClient::new(Client::new());
        let category: Category = "filter".parse().unwrap();
        let template = format!("{}/{{}}.yaml", server.url());
        let index = get_index(&http, &category, Some(&template)).await.unwrap();

        mock.assert_async().await;
        assert_eq!(index.get("debug", "default").unwrap().url(), "https://x/debug.yaml");
    }

    #[tokio::test]
    async fn test_get_index_http_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/filters.yaml")
            .with_status(503)
            .create_async()
            .await;

        let http = HttpClient::new(Client::new());
        let category: Category = "filter".parse().unwrap();
        let template = format!("{}/{{}}.yaml", server.url());
        let err = get_index(&http, &category, Some(&template)).await.unwrap_err();

        mock.assert_async().await;
        assert!(matches!(kind_of(&err), Some(PmError::Fetch { .. })));
    }
}
