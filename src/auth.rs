/*
 * Steve Launcher - A Minecraft Launcher
 * Copyright (C) 2025 Josh Kropf <josh@slashdev.ca>
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

use chrono::{DateTime, Utc};
use std::io;
use uuid::Uuid;

use crate::{CancelToken, CredentialRecord, IdentityProvider, ProviderSession, SettingsStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    Microsoft,
    Offline
}

/// Credential used to launch the game
#[derive(Debug, Clone)]
pub struct Identity {
    pub display_name: String,
    pub subject_id: String,
    pub session_token: String,
    pub source: IdentitySource,
    pub expires_at: Option<DateTime<Utc>>
}

impl Identity {
    /// Offline identity with a random subject id and session token
    pub fn offline(username: &str) -> Self {
        Self {
            display_name: username.to_string(),
            subject_id: Uuid::new_v4().to_string(),
            session_token: Uuid::new_v4().to_string(),
            source: IdentitySource::Offline,
            expires_at: None
        }
    }

    fn microsoft(session: ProviderSession) -> Self {
        Self {
            display_name: session.profile.name,
            subject_id: session.profile.id,
            session_token: session.access_token,
            source: IdentitySource::Microsoft,
            expires_at: session.expires_at
        }
    }

    /// Value for the game `--userType` argument
    pub fn user_type(&self) -> &'static str {
        match self.source {
            IdentitySource::Microsoft => "msa",
            IdentitySource::Offline => "legacy"
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("Invalid username input: {0}")]
    InputError(String),
    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),
    #[error("Interactive login failed: {0}")]
    InteractiveFailed(String),
    #[error("Login cancelled")]
    Cancelled,
    #[error("Unable to authenticate, every login method failed")]
    Unrecoverable
}

/// Source of a username for offline play
pub trait UsernamePrompt {
    fn prompt_username(&mut self) -> io::Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Start,
    TryRefresh,
    TryStoredOffline,
    TryInteractive,
    TryOfflinePrompt,
    Done,
    Failed
}

/// Picks the identity source for a launch.
///
/// The resolver moves forward through the states only, so a single call
/// makes at most one refresh exchange and one interactive login.
pub struct AuthResolver<'a, P, S, U>
    where P: IdentityProvider, S: SettingsStore, U: UsernamePrompt
{
    credentials: CredentialRecord<'a, S>,
    provider: P,
    prompt: U,
    cancel: CancelToken,
    trail: Vec<AuthState>
}

impl<'a, P, S, U> AuthResolver<'a, P, S, U>
    where P: IdentityProvider, S: SettingsStore, U: UsernamePrompt
{
    pub fn new(store: &'a mut S, provider: P, prompt: U, cancel: CancelToken) -> Self {
        Self {
            credentials: CredentialRecord::new(store),
            provider,
            prompt,
            cancel,
            trail: Vec::new()
        }
    }

    /// States visited by the last `resolve` call
    pub fn trail(&self) -> &[AuthState] {
        &self.trail
    }

    fn enter(&mut self, state: AuthState) -> AuthState {
        if let Some(prev) = self.trail.last() {
            log::debug!("Auth state {prev:?} -> {state:?}");
        }

        self.trail.push(state);
        state
    }

    pub async fn resolve(
        &mut self,
        force_offline: bool,
        offline_username: Option<String>
    ) -> Result<Identity, AuthError> {
        self.trail.clear();

        let mut state = self.enter(AuthState::Start);
        let mut interactive_failed = false;
        let mut supplied_username = offline_username;

        loop {
            state = match state {
                AuthState::Start => {
                    let next = if force_offline {
                        AuthState::TryOfflinePrompt
                    } else if self.credentials.stored_tokens().is_some() {
                        AuthState::TryRefresh
                    } else if self.credentials.offline_username().is_some() {
                        AuthState::TryStoredOffline
                    } else {
                        AuthState::TryInteractive
                    };

                    self.enter(next)
                }

                AuthState::TryRefresh => {
                    match self.try_refresh().await {
                        Ok(identity) => {
                            self.enter(AuthState::Done);
                            return Ok(identity);
                        }
                        Err(e) => {
                            log::warn!("{e}");
                            self.persist(|c| c.clear_tokens());

                            let next = if self.credentials.offline_username().is_some() {
                                AuthState::TryStoredOffline
                            } else {
                                AuthState::TryInteractive
                            };

                            self.enter(next)
                        }
                    }
                }

                AuthState::TryStoredOffline => {
                    let username = self.credentials.offline_username()
                        .map(String::from)
                        .unwrap_or_default();

                    log::info!("Using stored offline username {username}");

                    self.enter(AuthState::Done);
                    return Ok(Identity::offline(&username));
                }

                AuthState::TryInteractive => {
                    match self.try_interactive().await {
                        Ok(identity) => {
                            self.enter(AuthState::Done);
                            return Ok(identity);
                        }
                        Err(AuthError::Cancelled) => {
                            self.enter(AuthState::Failed);
                            return Err(AuthError::Cancelled);
                        }
                        Err(e) => {
                            log::warn!("{e}");
                            interactive_failed = true;
                            self.enter(AuthState::TryOfflinePrompt)
                        }
                    }
                }

                AuthState::TryOfflinePrompt => {
                    let username = match supplied_username.take() {
                        Some(name) => validate_username(name),
                        None => self.prompt.prompt_username()
                            .map_err(|e| AuthError::InputError(e.to_string()))
                            .and_then(validate_username)
                    };

                    match username {
                        Ok(username) => {
                            self.persist(|c| c.set_offline_username(&username));
                            log::info!("Using offline username {username}");

                            self.enter(AuthState::Done);
                            return Ok(Identity::offline(&username));
                        }
                        Err(e) => {
                            log::error!("{e}");
                            self.enter(AuthState::Failed);

                            return Err(if interactive_failed {
                                AuthError::Unrecoverable
                            } else {
                                e
                            });
                        }
                    }
                }

                AuthState::Done | AuthState::Failed => {
                    return Err(AuthError::Unrecoverable);
                }
            };
        }
    }

    async fn try_refresh(&mut self) -> Result<Identity, AuthError> {
        let (_, refresh_token) = self.credentials.stored_tokens()
            .ok_or_else(|| AuthError::RefreshFailed("no stored tokens".to_string()))?;

        let session = self.provider.exchange_refresh_token(&refresh_token).await
            .map_err(|e| AuthError::RefreshFailed(format!("{e:#}")))?;

        self.persist(|c| c.set_tokens(&session.access_token, &session.refresh_token));

        Ok(Identity::microsoft(session))
    }

    async fn try_interactive(&mut self) -> Result<Identity, AuthError> {
        let cancel = self.cancel.clone();

        let session = tokio::select! {
            result = self.provider.interactive_login() => {
                result.map_err(|e| AuthError::InteractiveFailed(format!("{e:#}")))?
            }
            _ = cancel.cancelled() => {
                log::info!("Interactive login cancelled");
                return Err(AuthError::Cancelled);
            }
        };

        self.persist(|c| c.set_tokens(&session.access_token, &session.refresh_token));

        Ok(Identity::microsoft(session))
    }

    /// Clear every stored credential
    pub fn logout(&mut self) {
        self.persist(|c| c.clear_all());
    }

    fn persist<F>(&mut self, f: F)
        where F: FnOnce(&mut CredentialRecord<'a, S>) -> Result<(), crate::Error>
    {
        if let Err(e) = f(&mut self.credentials) {
            log::error!("Unable to save credentials: {e}");
        }
    }
}

fn validate_username(username: String) -> Result<String, AuthError> {
    let username = username.trim();

    if username.is_empty() {
        Err(AuthError::InputError("username is empty".to_string()))
    } else {
        Ok(username.to_string())
    }
}
