use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use super::traits::AdviceProvider;
use crate::errors::CoreError;
use crate::models::locale::Locale;

const BASE_URL: &str = "https://openrouter.ai/api/v1";
const MODEL: &str = "anthropic/claude-3-haiku";
const REFERER: &str = "https://dobbyportfolio.netlify.app";
const TITLE: &str = "Dobby Portfolio App";

/// OpenRouter chat-completion client that turns a rendered portfolio report
/// into Dobby's brutally honest roast. Requires an API key.
pub struct OpenRouterProvider {
    client: Client,
    api_key: String,
}

impl OpenRouterProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            api_key: api_key.into(),
        }
    }

    fn system_prompt(locale: Locale) -> &'static str {
        match locale {
            Locale::Ko => {
                "당신은 Dobby입니다. 사용자의 암호화폐 포트폴리오를 신랄하고 유머러스하게 \
                 분석해주세요. 매우 자세하고 신랄하게 답변하세요. 최소 500자 이상으로 상세한 \
                 분석을 제공해주세요. 투자 패턴, 위험도, 수익성, 분산투자 수준 등 모든 측면을 \
                 분석해주세요."
            }
            Locale::En => {
                "You are Dobby. Analyze the user's cryptocurrency portfolio in a brutally \
                 honest and humorous way. Provide detailed and brutal analysis. Write at \
                 least 300 words covering investment patterns, risk levels, profitability, \
                 diversification, and all aspects of the portfolio."
            }
        }
    }

    fn user_prompt(report: &str, locale: Locale) -> String {
        match locale {
            Locale::Ko => format!(
                "포트폴리오 분석 요청입니다:\n\n{report}\n\n위 포트폴리오를 Dobby의 관점에서 \
                 신랄하게 분석해주세요."
            ),
            Locale::En => format!(
                "Portfolio analysis request:\n\n{report}\n\nPlease analyze this portfolio \
                 from Dobby's perspective in a brutally honest way."
            ),
        }
    }

    // Korean output needs more tokens per character of meaning.
    fn max_tokens(locale: Locale) -> u32 {
        match locale {
            Locale::Ko => 1500,
            Locale::En => 800,
        }
    }
}

// ── OpenRouter API response types ───────────────────────────────────

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl AdviceProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        "OpenRouter"
    }

    async fn roast(&self, report: &str, locale: Locale) -> Result<String, CoreError> {
        let body = json!({
            "model": MODEL,
            "messages": [
                { "role": "system", "content": Self::system_prompt(locale) },
                { "role": "user", "content": Self::user_prompt(report, locale) },
            ],
            "max_tokens": Self::max_tokens(locale),
            "temperature": 0.8,
        });

        let response = self
            .client
            .post(format!("{BASE_URL}/chat/completions"))
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", REFERER)
            .header("X-Title", TITLE)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CoreError::Api {
                provider: "OpenRouter".into(),
                message: format!("HTTP {}", response.status()),
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| CoreError::Api {
            provider: "OpenRouter".into(),
            message: format!("Failed to parse completion response: {e}"),
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| CoreError::Api {
                provider: "OpenRouter".into(),
                message: "Empty completion".into(),
            })
    }
}
