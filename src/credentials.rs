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

use crate::{Error, SettingsStore};

const MS_ACCESS_TOKEN: &str = "msAccessToken";
const MS_REFRESH_TOKEN: &str = "msRefreshToken";
const OFFLINE_USERNAME: &str = "offline-username";

/// Credentials persisted in the launcher settings.
///
/// Microsoft tokens can only be written or cleared as a pair and every
/// mutation is saved immediately.
pub struct CredentialRecord<'a, S: SettingsStore> {
    store: &'a mut S
}

impl<'a, S: SettingsStore> CredentialRecord<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    fn value(&self, key: &str) -> Option<&str> {
        self.store.get(key).filter(|v| !v.is_empty())
    }

    pub fn access_token(&self) -> Option<&str> {
        self.value(MS_ACCESS_TOKEN)
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.value(MS_REFRESH_TOKEN)
    }

    pub fn offline_username(&self) -> Option<&str> {
        self.value(OFFLINE_USERNAME)
    }

    /// Access and refresh token, only when both are present
    pub fn stored_tokens(&self) -> Option<(String, String)> {
        match (self.access_token(), self.refresh_token()) {
            (Some(access), Some(refresh)) => Some((access.to_string(), refresh.to_string())),
            _ => None
        }
    }

    pub fn set_tokens(&mut self, access_token: &str, refresh_token: &str) -> Result<(), Error> {
        self.store.set(MS_ACCESS_TOKEN, access_token);
        self.store.set(MS_REFRESH_TOKEN, refresh_token);
        self.store.save()
    }

    pub fn clear_tokens(&mut self) -> Result<(), Error> {
        self.store.remove(MS_ACCESS_TOKEN);
        self.store.remove(MS_REFRESH_TOKEN);
        self.store.save()
    }

    pub fn set_offline_username(&mut self, username: &str) -> Result<(), Error> {
        self.store.set(OFFLINE_USERNAME, username);
        self.store.save()
    }

    pub fn clear_all(&mut self) -> Result<(), Error> {
        self.store.remove(MS_ACCESS_TOKEN);
        self.store.remove(MS_REFRESH_TOKEN);
        self.store.remove(OFFLINE_USERNAME);
        self.store.save()
    }
}
