/*
 * Steve Launcher - A Minecraft Launcher
 * Copyright (C) 2023 Josh Kropf <josh@slashdev.ca>
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

/**
 * Most of the token code comes from https://github.com/KernelFreeze/minecraft-msa-auth
 */

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use oauth2::{
    AuthUrl, ClientId, DeviceAuthorizationUrl, RefreshToken, Scope, TokenResponse, TokenUrl,
    StandardDeviceAuthorizationResponse, StandardTokenResponse, EmptyExtraTokenFields,
    basic::BasicClient, basic::BasicTokenType, reqwest::async_http_client
};

/// Receives the verification url and user code of the device code flow
pub type LoginCallback = fn(url: &str, code: &str);

/// Minecraft profile of the authenticated account
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProviderProfile {
    pub id: String,
    pub name: String
}

/// Result of a successful authentication with an identity provider
#[derive(Debug, Clone)]
pub struct ProviderSession {
    /// Minecraft services access token, used as the game session token
    pub access_token: String,
    /// Microsoft refresh token for the next launch
    pub refresh_token: String,
    pub profile: ProviderProfile,
    pub expires_at: Option<DateTime<Utc>>
}

/// Remote authority able to issue game sessions
pub trait IdentityProvider {
    async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<ProviderSession>;

    /// Blocks until the user completes the flow, it fails or times out
    async fn interactive_login(&self) -> Result<ProviderSession>;
}

/// Microsoft account login by way of Xbox Live
pub struct MicrosoftProvider {
    client_id: String,
    callback: LoginCallback,
    client: Client
}

impl MicrosoftProvider {
    pub fn new<S: Into<String>>(client_id: S, callback: LoginCallback) -> Self {
        Self {
            client_id: client_id.into(),
            callback,
            client: Client::new()
        }
    }

    fn oauth_client(&self) -> Result<BasicClient> {
        let auth_url = AuthUrl::new(
            "https://login.microsoftonline.com/consumers/oauth2/v2.0/authorize".to_string()
        )?;

        let token_url = TokenUrl::new(
            "https://login.microsoftonline.com/consumers/oauth2/v2.0/token".to_string()
        )?;

        let device_auth_url = DeviceAuthorizationUrl::new(
            "https://login.microsoftonline.com/consumers/oauth2/v2.0/devicecode".to_string(),
        )?;

        Ok(BasicClient::new(
            ClientId::new(self.client_id.clone()),
            None,
            auth_url,
            Some(token_url)
        )
        .set_device_authorization_url(device_auth_url))
    }

    async fn session_from_msa(&self, msa: MicrosoftToken) -> Result<ProviderSession> {
        let mc_token = self.login_token(&msa.access_token).await
            .context("Minecraft services login failed")?;

        let profile = self.get_profile(&mc_token.access_token).await
            .context("Unable to fetch Minecraft profile")?;

        log::info!("Authenticated Microsoft account {}", profile.name);

        Ok(ProviderSession {
            access_token: mc_token.access_token,
            refresh_token: msa.refresh_token,
            profile,
            expires_at: Some(mc_token.expires)
        })
    }

    async fn login_token(&self, msa_access_token: &str) -> Result<MinecraftToken> {
        let xbox_authenticate_json = json!({
            "Properties": {
                "AuthMethod": "RPS",
                "SiteName": "user.auth.xboxlive.com",
                "RpsTicket": &format!("d={}", msa_access_token)
            },
            "RelyingParty": "http://auth.xboxlive.com",
            "TokenType": "JWT"
        });

        let xbox_authenticate_response: XboxAuthResponse = self.client
            .post("https://user.auth.xboxlive.com/user/authenticate")
            .json(&xbox_authenticate_json)
            .send().await?
            .error_for_status()?
            .json().await?;

        let xbox_authorize_json = json!({
            "Properties": {
                "SandboxId": "RETAIL",
                "UserTokens": [xbox_authenticate_response.token]
            },
            "RelyingParty": "rp://api.minecraftservices.com/",
            "TokenType": "JWT"
        });

        let xbox_authorize_response: XboxAuthResponse = self.client
            .post("https://xsts.auth.xboxlive.com/xsts/authorize")
            .json(&xbox_authorize_json)
            .send().await?
            .error_for_status()?
            .json().await?;

        let hash = xbox_authenticate_response.user_hash()
            .ok_or_else(|| anyhow!("Xbox Live response is missing the user hash"))?;
        let token = xbox_authorize_response.token;

        let mc_login_json = json!({
            "identityToken": format!("XBL3.0 x={};{}", hash, token)
        });

        let mc_login_response: MinecraftAuthResponse = self.client
            .post("https://api.minecraftservices.com/authentication/login_with_xbox")
            .json(&mc_login_json)
            .send().await?
            .error_for_status()?
            .json().await?;

        Ok(MinecraftToken {
            access_token: mc_login_response.access_token,
            expires: Utc::now() + Duration::seconds(mc_login_response.expires_in.into())
        })
    }

    async fn get_profile(&self, mc_access_token: &str) -> Result<ProviderProfile> {
        Ok(self.client
            .get("https://api.minecraftservices.com/minecraft/profile")
            .bearer_auth(mc_access_token)
            .send().await?
            .error_for_status()?
            .json::<ProviderProfile>().await?)
    }
}

impl IdentityProvider for MicrosoftProvider {
    async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<ProviderSession> {
        let oauth2_client = self.oauth_client()?;

        let msa_token_result = oauth2_client
            .exchange_refresh_token(&RefreshToken::new(refresh_token.into()))
            .request_async(async_http_client)
            .await
            .map_err(|e| anyhow!("Microsoft token refresh failed: {e}"))?;

        let msa = MicrosoftToken::from_token_response(msa_token_result, Some(refresh_token))?;
        self.session_from_msa(msa).await
    }

    async fn interactive_login(&self) -> Result<ProviderSession> {
        let oauth2_client = self.oauth_client()?;

        let details: StandardDeviceAuthorizationResponse = oauth2_client
            .exchange_device_code()?
            .add_scope(Scope::new("XboxLive.signin".to_string()))
            .add_scope(Scope::new("offline_access".to_string()))
            .request_async(async_http_client)
            .await
            .map_err(|e| anyhow!("Device code request failed: {e}"))?;

        (self.callback)(
            details.verification_uri(),
            details.user_code().secret()
        );

        let msa_token_result = oauth2_client
            .exchange_device_access_token(&details)
            .request_async(async_http_client, tokio::time::sleep, None)
            .await
            .map_err(|e| anyhow!("Device code login failed: {e}"))?;

        let msa = MicrosoftToken::from_token_response(msa_token_result, None)?;
        self.session_from_msa(msa).await
    }
}

struct MicrosoftToken {
    access_token: String,
    refresh_token: String
}

impl MicrosoftToken {
    /// `previous_refresh` is kept when the token endpoint does not rotate the refresh token
    fn from_token_response(
        token_response: StandardTokenResponse<EmptyExtraTokenFields, BasicTokenType>,
        previous_refresh: Option<&str>
    ) -> Result<Self> {
        let refresh_token = token_response.refresh_token()
            .map(|t| t.secret().to_string())
            .or(previous_refresh.map(String::from))
            .ok_or_else(|| anyhow!("Token response is missing a refresh token"))?;

        Ok(Self {
            access_token: token_response.access_token().secret().into(),
            refresh_token
        })
    }
}

struct MinecraftToken {
    access_token: String,
    expires: DateTime<Utc>
}

#[derive(Deserialize)]
struct XboxAuthResponse {
    #[serde(rename(deserialize = "Token"))]
    token: String,

    #[serde(rename(deserialize = "DisplayClaims"))]
    display_claims: HashMap<String, Vec<HashMap<String, String>>>
}

impl XboxAuthResponse {
    fn user_hash(&self) -> Option<&String> {
        self.display_claims.get("xui")?.first()?.get("uhs")
    }
}

#[derive(Deserialize)]
struct MinecraftAuthResponse {
    access_token: String,

    /// Number of seconds until the token expires
    expires_in: u32
}
