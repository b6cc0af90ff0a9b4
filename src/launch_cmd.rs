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

use std::{collections::HashMap, path::Path, process::{Child, Command}};

/// Java process with `${name}` placeholders in its arguments
pub struct LaunchCommand {
    cmd: Command,
    ctx: HashMap<&'static str, String>,
    args: Vec<String>
}

impl LaunchCommand {
    pub fn new(launch_dir: &Path, java_path: &Path) -> Self {
        let mut cmd = Command::new(java_path);

        // set current directory for log output
        cmd.current_dir(launch_dir);

        Self {
            cmd,
            ctx: HashMap::new(),
            args: Vec::new()
        }
    }

    pub fn arg_ctx<S: Into<String>>(&mut self, key: &'static str, val: S) -> &mut Self {
        self.ctx.insert(key, val.into());
        self
    }

    pub fn arg<S: Into<String>>(&mut self, val: S) -> &mut Self {
        self.args.push(val.into());
        self
    }

    pub fn args<I>(&mut self, iter: I) -> &mut Self
        where I: IntoIterator, I::Item: Into<String>
    {
        iter.into_iter().for_each(|v| self.args.push(v.into()));
        self
    }

    /// Arguments with placeholders substituted, unknown placeholders are left as is
    pub fn expanded_args(&self) -> Vec<String> {
        self.args.iter()
            .map(|arg| {
                shellexpand::env_with_context_no_errors(
                    arg,
                    |var: &str| self.ctx.get(var)
                ).to_string()
            })
            .collect()
    }

    pub fn spawn(&mut self) -> std::io::Result<Child> {
        let args = self.expanded_args();
        self.cmd.args(args);

        log::debug!("Launching {:?}", self.cmd);
        self.cmd.spawn()
    }
}
