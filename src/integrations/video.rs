//! 视频会议房间管理客户端
//!
//! 用 app secret 签发 HS256 管理令牌，`POST {endpoint}/rooms` 创建房间。

use std::time::Duration;

use jsonwebtoken::{EncodingKey, Header, encode};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::VideoConfig;
use crate::errors::{PortalError, Result};
use crate::models::video::entities::VideoRoom;

#[async_trait::async_trait]
pub trait VideoRoomProvider: Send + Sync {
    fn is_configured(&self) -> bool;
    async fn create_room(&self, name: &str, description: Option<&str>) -> Result<VideoRoom>;
}

// 管理令牌
#[derive(Debug, Serialize, Deserialize)]
pub struct ManagementClaims {
    pub access_key: String,
    #[serde(rename = "type")]
    pub token_type: String,
    pub version: u8,
    pub jti: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

#[derive(Debug, Serialize)]
struct CreateRoomBody<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    template_id: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct RoomPayload {
    id: String,
    name: String,
    #[serde(default = "default_enabled")]
    enabled: bool,
}

fn default_enabled() -> bool {
    true
}

pub struct HmsVideoClient {
    client: Client,
    endpoint: String,
    access_key: String,
    app_secret: String,
    template_id: String,
    token_ttl: i64,
}

impl HmsVideoClient {
    pub fn new(config: &VideoConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            access_key: config.access_key.clone(),
            app_secret: config.app_secret.clone(),
            template_id: config.template_id.clone(),
            token_ttl: config.token_ttl,
        })
    }

    /// 签发管理令牌
    pub fn management_token(&self) -> Result<String> {
        let now = chrono::Utc::now().timestamp();
        let claims = ManagementClaims {
            access_key: self.access_key.clone(),
            token_type: "management".to_string(),
            version: 2,
            jti: uuid::Uuid::new_v4().to_string(),
            iat: now,
            nbf: now,
            exp: now + self.token_ttl,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.app_secret.as_bytes()),
        )
        .map_err(|e| PortalError::external_service(format!("Failed to sign management token: {e}")))
    }
}

#[async_trait::async_trait]
impl VideoRoomProvider for HmsVideoClient {
    fn is_configured(&self) -> bool {
        !self.access_key.is_empty() && !self.app_secret.is_empty()
    }

    async fn create_room(&self, name: &str, description: Option<&str>) -> Result<VideoRoom> {
        let token = self.management_token()?;
        let body = CreateRoomBody {
            name,
            description,
            template_id: Some(self.template_id.as_str()).filter(|t| !t.is_empty()),
        };

        let response = self
            .client
            .post(format!("{}/rooms", self.endpoint))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!("Video API returned HTTP {}: {}", status.as_u16(), text);
            return Err(PortalError::external_service(format!(
                "Video API returned HTTP {}",
                status.as_u16()
            )));
        }

        let room: RoomPayload = response.json().await?;
        info!("Created video room {}", room.id);

        Ok(VideoRoom {
            room_id: room.id,
            name: room.name,
            enabled: room.enabled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{DecodingKey, Validation, decode};

    fn client() -> HmsVideoClient {
        HmsVideoClient::new(&VideoConfig {
            endpoint: "http://localhost:1/v2/".into(),
            access_key: "ak-123".into(),
            app_secret: "secret".into(),
            template_id: String::new(),
            timeout_secs: 5,
            token_ttl: 300,
        })
        .unwrap()
    }

    #[test]
    fn test_management_token_claims() {
        let token = client().management_token().unwrap();

        let mut validation = Validation::default();
        validation.set_required_spec_claims(&["exp", "nbf"]);
        let claims = decode::<ManagementClaims>(
            &token,
            &DecodingKey::from_secret(b"secret"),
            &validation,
        )
        .unwrap()
        .claims;

        assert_eq!(claims.access_key, "ak-123");
        assert_eq!(claims.token_type, "management");
        assert_eq!(claims.version, 2);
        assert_eq!(claims.exp - claims.iat, 300);
        assert!(uuid::Uuid::parse_str(&claims.jti).is_ok());
    }

    #[test]
    fn test_empty_template_is_omitted() {
        let body = CreateRoomBody {
            name: "Tư vấn tuyển sinh",
            description: None,
            template_id: Some("").filter(|t| !t.is_empty()),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"name": "Tư vấn tuyển sinh"})
        );
    }

    #[test]
    fn test_is_configured() {
        assert!(client().is_configured());
    }
}
