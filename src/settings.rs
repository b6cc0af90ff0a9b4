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

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::Error;

/// Flat string key/value persistence
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<&str>;

    fn set(&mut self, key: &str, value: &str);

    fn remove(&mut self, key: &str);

    fn save(&self) -> Result<(), Error>;
}

/// Settings backed by a java style `.properties` file
pub struct PropertiesFile {
    path: PathBuf,
    values: BTreeMap<String, String>
}

impl PropertiesFile {
    /// Load settings from `path`, a missing file is an empty set of settings
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        let values = match fs::read_to_string(&path) {
            Ok(content) => parse_properties(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(Error::SettingsRead { path, source })
        };

        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for PropertiesFile {
    fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }

    fn save(&self) -> Result<(), Error> {
        let content = self.values.iter()
            .map(|(k, v)| format!("{}={}\n", escape(k, true), escape(v, false)))
            .collect::<String>();

        let tmp_path = self.path.with_extension("properties.tmp");

        fs::write(&tmp_path, content)
            .and_then(|_| fs::rename(&tmp_path, &self.path))
            .map_err(|source| Error::SettingsWrite { path: self.path.clone(), source })
    }
}

fn parse_properties(content: &str) -> BTreeMap<String, String> {
    let mut values = BTreeMap::new();
    let mut logical = String::new();

    for line in content.lines() {
        let line = line.trim_start();

        if logical.is_empty() && (line.is_empty() || line.starts_with('#') || line.starts_with('!')) {
            continue;
        }

        // odd number of trailing backslashes continues onto the next line
        let trailing = line.chars().rev().take_while(|c| *c == '\\').count();
        if trailing % 2 == 1 {
            logical.push_str(&line[..line.len() - 1]);
            continue;
        }

        logical.push_str(line);
        let (key, value) = split_pair(&logical);
        values.insert(unescape(key), unescape(value));
        logical.clear();
    }

    if !logical.is_empty() {
        let (key, value) = split_pair(&logical);
        values.insert(unescape(key), unescape(value));
    }

    values
}

fn split_pair(line: &str) -> (&str, &str) {
    let mut escaped = false;

    for (i, c) in line.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' => {
                let rest = line[i..].trim_start_matches([' ', '\t']);
                let rest = rest.strip_prefix(['=', ':']).unwrap_or(rest);
                return (&line[..i], rest.trim_start_matches([' ', '\t']));
            }
            _ => {}
        }
    }

    (line, "")
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => out.push_str(&hex)
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    out
}

fn escape(value: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(value.len());

    for (i, c) in value.chars().enumerate() {
        match c {
            '\\' | '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            ' ' if is_key || i == 0 => out.push_str("\\ "),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c)
        }
    }

    out
}
