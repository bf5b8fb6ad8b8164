//! OpenAI inference source.
//!
//! Sends one chat-completion request per track. The reply is forced into a
//! strict `{artist, name}` JSON object through structured outputs, so no
//! free-text extraction is needed.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::SampleSource;
use crate::{
    config::OpenAiConfig,
    error::{Error, Result},
    types::{SampleCandidate, song_label},
    utils,
};

const SERVICE: &str = "OpenAI";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: Value,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

/// Structured reply enforced by [`track_schema`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SuggestedTrack {
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub name: String,
}

/// JSON schema of the structured reply: exactly `artist` and `name`.
pub fn track_schema() -> Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": "track",
            "description": "A song that the given song samples or draws inspiration from",
            "strict": true,
            "schema": {
                "type": "object",
                "properties": {
                    "artist": {
                        "type": "string",
                        "description": "The artist of the sampled song."
                    },
                    "name": {
                        "type": "string",
                        "description": "The name of the sampled song."
                    }
                },
                "required": ["artist", "name"],
                "additionalProperties": false
            }
        }
    })
}

/// Builds the user prompt for one track.
///
/// The track itself is always part of the exclusion list, even when the
/// caller's snapshot does not contain it yet.
pub fn build_prompt(song: &str, artist: &str, excluded: &[String]) -> String {
    let own = song_label(song, artist);
    let mut list: Vec<&str> = excluded.iter().map(String::as_str).collect();
    if !list.contains(&own.as_str()) {
        list.push(&own);
    }

    let rendered = list
        .iter()
        .map(|s| format!("'{}'", s))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "For the song '{}' by '{}':\n\
         - Suggest one song and its artists that this song samples or draws inspiration from.\n\
         - Exclude the following songs: {}",
        song, artist, rendered
    )
}

/// Minimal chat-completions client.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    pub fn new(
        http: Client,
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    /// `None` when no API key is configured.
    pub fn from_config(http: Client, config: &OpenAiConfig) -> Option<Self> {
        config
            .api_key
            .as_ref()
            .map(|key| Self::new(http, &config.api_url, key, &config.model))
    }

    /// Asks the model for one suggestion.
    ///
    /// Returns `Ok(None)` on a refusal or when the model leaves either
    /// field empty.
    pub async fn suggest(&self, prompt: &str) -> Result<Option<SuggestedTrack>> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            response_format: track_schema(),
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let body = utils::check_status(SERVICE, response)
            .await?
            .json::<ChatResponse>()
            .await
            .map_err(|e| Error::parse(SERVICE, e))?;

        parse_reply(body)
    }
}

fn parse_reply(body: ChatResponse) -> Result<Option<SuggestedTrack>> {
    let Some(choice) = body.choices.into_iter().next() else {
        return Err(Error::parse(SERVICE, "response has no choices"));
    };

    if let Some(refusal) = choice.message.refusal.filter(|r| !r.is_empty()) {
        tracing::debug!(%refusal, "model refused to suggest a sample");
        return Ok(None);
    }

    let Some(content) = choice.message.content.filter(|c| !c.trim().is_empty()) else {
        return Ok(None);
    };

    let track: SuggestedTrack =
        serde_json::from_str(&content).map_err(|e| Error::parse(SERVICE, e))?;

    if track.artist.trim().is_empty() || track.name.trim().is_empty() {
        return Ok(None);
    }

    Ok(Some(track))
}

/// [`SampleSource`] backed by an OpenAI chat model.
#[derive(Debug)]
pub struct InferenceSource {
    client: OpenAiClient,
}

impl InferenceSource {
    pub fn new(client: OpenAiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SampleSource for InferenceSource {
    fn name(&self) -> &str {
        "openai"
    }

    async fn find(
        &self,
        song: &str,
        artist: &str,
        excluded: &[String],
    ) -> Result<Option<SampleCandidate>> {
        let prompt = build_prompt(song, artist, excluded);
        let suggestion = self.client.suggest(&prompt).await?;

        Ok(suggestion.map(|s| SampleCandidate {
            artist: s.artist,
            name: s.name,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(content: &str) -> ChatResponse {
        serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        }))
        .unwrap()
    }

    #[test]
    fn test_prompt_lists_exclusions_and_own_track() {
        let excluded = vec!["Stronger by Kanye West".to_string()];
        let prompt = build_prompt("Otis", "JAY-Z", &excluded);

        assert!(prompt.starts_with("For the song 'Otis' by 'JAY-Z':"));
        assert!(prompt.contains("'Stronger by Kanye West'"));
        assert!(prompt.contains("'Otis by JAY-Z'"));
    }

    #[test]
    fn test_prompt_does_not_repeat_own_track() {
        let excluded = vec!["Otis by JAY-Z".to_string()];
        let prompt = build_prompt("Otis", "JAY-Z", &excluded);
        assert_eq!(prompt.matches("'Otis by JAY-Z'").count(), 1);
    }

    #[test]
    fn test_schema_is_strict_and_closed() {
        let schema = track_schema();
        assert_eq!(schema["json_schema"]["name"], "track");
        assert_eq!(schema["json_schema"]["strict"], true);
        assert_eq!(
            schema["json_schema"]["schema"]["additionalProperties"],
            false
        );
        assert_eq!(
            schema["json_schema"]["schema"]["required"],
            json!(["artist", "name"])
        );
    }

    #[test]
    fn test_reply_with_both_fields_is_candidate() {
        let track = parse_reply(reply(r#"{"artist":"Otis Redding","name":"Try a Little Tenderness"}"#))
            .unwrap()
            .unwrap();
        assert_eq!(track.artist, "Otis Redding");
        assert_eq!(track.name, "Try a Little Tenderness");
    }

    #[test]
    fn test_reply_with_empty_field_is_absent() {
        assert!(parse_reply(reply(r#"{"artist":"","name":"Something"}"#)).unwrap().is_none());
        assert!(parse_reply(reply(r#"{"artist":"Someone","name":"  "}"#)).unwrap().is_none());
    }

    #[test]
    fn test_empty_content_is_absent() {
        assert!(parse_reply(reply("")).unwrap().is_none());
        assert!(parse_reply(reply("  \n")).unwrap().is_none());
    }

    #[test]
    fn test_refusal_is_absent() {
        let body: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"content": null, "refusal": "I can't help with that."}}]
        }))
        .unwrap();
        assert!(parse_reply(body).unwrap().is_none());
    }

    #[test]
    fn test_unparseable_content_is_parse_error() {
        let err = parse_reply(reply("Probably some soul record.")).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_no_choices_is_parse_error() {
        let body: ChatResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(matches!(parse_reply(body), Err(Error::Parse { .. })));
    }
}
