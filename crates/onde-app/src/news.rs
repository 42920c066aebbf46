//! Breaking-news headlines for the background carousel

use std::time::Duration;

use serde::Deserialize;

/// How often the displayed headline rotates.
pub const ROTATE_PERIOD: Duration = Duration::from_secs(6);

/// One news item from the server.
#[derive(Debug, Clone, Deserialize)]
pub struct Headline {
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
}

/// Fetch the headline list once at startup. Failures are reported to the
/// caller, which degrades to an empty carousel rather than aborting.
pub async fn fetch_headlines(
    client: &reqwest::Client,
    base_url: &str,
) -> anyhow::Result<Vec<Headline>> {
    let url = format!("{}/actus/actus/", base_url.trim_end_matches('/'));
    let headlines = client
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .json::<Vec<Headline>>()
        .await?;
    tracing::debug!(count = headlines.len(), "headlines loaded");
    Ok(headlines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_headline_list() {
        let payload = r#"[
            {"title": "Le direct reprend à 18h", "body": "Toute l'équipe en studio."},
            {"title": "Nouvelle grille de programmes"}
        ]"#;
        let headlines: Vec<Headline> = serde_json::from_str(payload).unwrap();
        assert_eq!(headlines.len(), 2);
        assert_eq!(headlines[0].title, "Le direct reprend à 18h");
        assert!(headlines[1].body.is_none());
    }
}
