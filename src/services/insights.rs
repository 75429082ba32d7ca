use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{instrument, warn};

/// Canned recommendations used whenever the external provider is not
/// configured or does not answer in time. The numeric report never
/// depends on this call succeeding.
const FALLBACK_INSIGHTS: [&str; 3] = [
    "Offer a loyalty discount to returning clients to lift retention.",
    "Promote your top services on the public page to attract new bookings.",
    "Review quiet hours in your schedule and consider off-peak pricing.",
];

/// Numeric digest sent to the insights provider
#[derive(Debug, Serialize)]
pub struct InsightsDigest {
    pub period: String,
    pub total_revenue: Decimal,
    pub completed_appointments: u64,
    pub cancelled_appointments: u64,
    pub retention_rate: f64,
    pub revenue_growth_pct: f64,
}

#[derive(Debug, Deserialize)]
struct InsightsApiResponse {
    insights: Vec<String>,
}

/// Best-effort client for AI-generated business recommendations
#[derive(Clone)]
pub struct InsightsClient {
    http: reqwest::Client,
    api_url: Option<String>,
    api_key: Option<String>,
}

impl InsightsClient {
    pub fn new(
        api_url: Option<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            http,
            api_url,
            api_key,
        }
    }

    /// Returns recommendations for the digest, falling back to static
    /// tips on any provider failure.
    #[instrument(skip(self, digest), fields(period = %digest.period))]
    pub async fn generate(&self, digest: &InsightsDigest) -> Vec<String> {
        let Some(url) = &self.api_url else {
            return fallback_insights();
        };

        let mut request = self.http.post(url).json(digest);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        match request.send().await {
            Ok(response) if response.status().is_success() => {
                match response.json::<InsightsApiResponse>().await {
                    Ok(body) if !body.insights.is_empty() => body.insights,
                    Ok(_) => fallback_insights(),
                    Err(e) => {
                        warn!(error = %e, "Insights provider returned malformed body");
                        fallback_insights()
                    }
                }
            }
            Ok(response) => {
                warn!(status = %response.status(), "Insights provider returned error status");
                fallback_insights()
            }
            Err(e) => {
                warn!(error = %e, "Insights provider unreachable");
                fallback_insights()
            }
        }
    }
}

pub fn fallback_insights() -> Vec<String> {
    FALLBACK_INSIGHTS.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn unconfigured_client_uses_fallback() {
        let client = InsightsClient::new(None, None, Duration::from_secs(1));
        let digest = InsightsDigest {
            period: "month".into(),
            total_revenue: dec!(1200),
            completed_appointments: 30,
            cancelled_appointments: 2,
            retention_rate: 40.0,
            revenue_growth_pct: 12.5,
        };
        let insights = client.generate(&digest).await;
        assert_eq!(insights, fallback_insights());
    }

    #[tokio::test]
    async fn provider_insights_pass_through() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/insights"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "insights": ["Bundle coloring with a haircut discount."]
            })))
            .mount(&server)
            .await;

        let client = InsightsClient::new(
            Some(format!("{}/insights", server.uri())),
            Some("test-key".into()),
            Duration::from_secs(2),
        );
        let digest = InsightsDigest {
            period: "month".into(),
            total_revenue: dec!(900),
            completed_appointments: 12,
            cancelled_appointments: 1,
            retention_rate: 25.0,
            revenue_growth_pct: 4.2,
        };
        let insights = client.generate(&digest).await;
        assert_eq!(insights, vec!["Bundle coloring with a haircut discount."]);
    }

    #[tokio::test]
    async fn unreachable_provider_uses_fallback() {
        let client = InsightsClient::new(
            Some("http://127.0.0.1:1/insights".into()),
            None,
            Duration::from_millis(200),
        );
        let digest = InsightsDigest {
            period: "week".into(),
            total_revenue: dec!(0),
            completed_appointments: 0,
            cancelled_appointments: 0,
            retention_rate: 0.0,
            revenue_growth_pct: 0.0,
        };
        let insights = client.generate(&digest).await;
        assert_eq!(insights, fallback_insights());
    }
}
