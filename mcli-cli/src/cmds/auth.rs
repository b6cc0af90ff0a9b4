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

use anyhow::Result;
use console::style;
use dialoguer::Input;
use std::io::{self, BufRead};

use mcli::{env, AuthResolver, CancelToken, Identity, IdentitySource, LauncherConfig, MicrosoftProvider, UsernamePrompt};

use super::console_theme;

const USERNAME_PROMPT: &str = "Enter username for offline mode: ";

pub async fn authenticate(
    config: &mut LauncherConfig,
    offline: Option<Option<String>>,
    cancel: CancelToken
) -> Result<Identity> {
    let provider = MicrosoftProvider::new(env::get_msa_client_id(), print_device_code);
    let mut resolver = AuthResolver::new(config.settings_mut(), provider, ConsolePrompt, cancel);

    let (force_offline, username) = match offline {
        Some(username) => (true, username),
        None => (false, None)
    };

    let identity = resolver.resolve(force_offline, username).await?;

    match identity.source {
        IdentitySource::Microsoft => println!("Logged in as {}", style(&identity.display_name).green()),
        IdentitySource::Offline => println!("Playing offline as {}", style(&identity.display_name).yellow())
    }

    Ok(identity)
}

pub fn logout(config: &mut LauncherConfig) {
    let provider = MicrosoftProvider::new(env::get_msa_client_id(), print_device_code);

    AuthResolver::new(config.settings_mut(), provider, ConsolePrompt, CancelToken::none())
        .logout();
}

fn print_device_code(url: &str, code: &str) {
    println!("Open the URL in your browser and enter the code: {code}\n\t{url}");
}

struct ConsolePrompt;

impl UsernamePrompt for ConsolePrompt {
    fn prompt_username(&mut self) -> io::Result<String> {
        if console::user_attended() {
            return Input::<String>::with_theme(&console_theme())
                .with_prompt(USERNAME_PROMPT.trim_end_matches([':', ' ']))
                .allow_empty(true)
                .interact_text()
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e));
        }

        print!("{USERNAME_PROMPT}");
        io::Write::flush(&mut io::stdout())?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no username on stdin"));
        }

        Ok(line)
    }
}
