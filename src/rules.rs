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

use std::collections::HashMap;

use crate::json::{GameLibraryRule, OsProperties, GameArgRule};

pub trait RulesMatch {
    fn matches(&self) -> bool;
}

impl RulesMatch for Vec<GameLibraryRule> {
    fn matches(&self) -> bool {
        _match_lib_rules(self, &RulesContext::new())
    }
}

impl RulesMatch for Vec<GameArgRule> {
    fn matches(&self) -> bool {
        _match_arg_rules(self, &RulesContext::new())
    }
}

struct RulesContext {
    host_os: &'static str,
    host_arch: &'static str
}

impl RulesContext {
    fn new() -> Self {
        RulesContext {
            host_os: crate::env::get_host_os(),
            host_arch: crate::env::get_host_arch()
        }
    }
}

/// Last matching rule decides, no matching rule disallows
fn _apply_rules<'a, I>(rules: I) -> bool
    where I: Iterator<Item = (&'a str, bool)>
{
    rules
        .filter(|(_, applies)| *applies)
        .last()
        .map_or(false, |(action, _)| action == "allow")
}

fn _match_lib_rules(rules: &[GameLibraryRule], ctx: &RulesContext) -> bool {
    _apply_rules(rules.iter().map(|rule| {
        let applies = rule.os.as_ref().map_or(true, |os| _match_os_properties(os, ctx));
        (rule.action.as_str(), applies)
    }))
}

fn _match_arg_rules(rules: &[GameArgRule], ctx: &RulesContext) -> bool {
    // rules "match" when rules list is empty
    if rules.is_empty() {
        return true;
    }

    _apply_rules(rules.iter().map(|rule| {
        let applies = rule.os.as_ref().map_or(true, |os| _match_os_properties(os, ctx))
            && rule.features.as_ref().map_or(true, _match_features);
        (rule.action.as_str(), applies)
    }))
}

/// Launcher features like demo mode or custom resolution are never enabled
fn _match_features(features: &HashMap<String, bool>) -> bool {
    features.values().all(|enabled| !enabled)
}

fn _match_os_properties(os: &OsProperties, ctx: &RulesContext) -> bool {
    // os version is a regex against the host kernel version, not worth the extra crates
    os.name.as_ref().map_or(true, |v| v == ctx.host_os) &&
    os.arch.as_ref().map_or(true, |v| v == ctx.host_arch)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{_match_arg_rules, _match_lib_rules, RulesContext};
    use crate::json::{GameArgRule, GameLibraryRule, OsProperties};

    #[test]
    fn basic_allow_true() {
        let rules = vec![
            GameLibraryRule {
                action: "allow".to_string(),
                os: Some(OsProperties {
                    name: Some("linux".to_string()),
                    arch: None
                })
            }
        ];
        let ctx = RulesContext {
            host_os: "linux",
            host_arch: "x86_64"
        };

        assert_eq!(_match_lib_rules(&rules, &ctx), true);
    }

    #[test]
    fn basic_allow_false() {
        let rules = vec![
            GameLibraryRule {
                action: "allow".to_string(),
                os: Some(OsProperties {
                    name: Some("linux".to_string()),
                    arch: None
                })
            }
        ];
        let ctx = RulesContext {
            host_os: "windows",
            host_arch: "x86_64"
        };

        assert_eq!(_match_lib_rules(&rules, &ctx), false);
    }

    #[test]
    fn disallow_true() {
        let rules = vec![
            GameLibraryRule {
                action: "allow".to_string(),
                os: None
            },
            GameLibraryRule {
                action: "disallow".to_string(),
                os: Some(OsProperties {
                    name: Some("osx".to_string()),
                    arch: None
                })
            }
        ];
        let ctx = RulesContext {
            host_os: "linux",
            host_arch: "x86_64"
        };

        assert_eq!(_match_lib_rules(&rules, &ctx), true);
    }

    #[test]
    fn disallow_false() {
        let rules = vec![
            GameLibraryRule {
                action: "allow".to_string(),
                os: None
            },
            GameLibraryRule {
                action: "disallow".to_string(),
                os: Some(OsProperties {
                    name: Some("osx".to_string()),
                    arch: None
                })
            }
        ];
        let ctx = RulesContext {
            host_os: "osx",
            host_arch: "x86_64"
        };

        assert_eq!(_match_lib_rules(&rules, &ctx), false);
    }

    #[test]
    fn no_rules_match_disallows_lib() {
        let rules = vec![
            GameLibraryRule {
                action: "allow".to_string(),
                os: Some(OsProperties {
                    name: None,
                    arch: Some("x86".to_string())
                })
            }
        ];
        let ctx = RulesContext {
            host_os: "linux",
            host_arch: "x86_64"
        };

        assert_eq!(_match_lib_rules(&rules, &ctx), false);
    }

    #[test]
    fn feature_rules_never_match() {
        let rules = vec![
            GameArgRule {
                action: "allow".to_string(),
                features: Some(HashMap::from([("has_custom_resolution".to_string(), true)])),
                os: None
            }
        ];
        let ctx = RulesContext {
            host_os: "linux",
            host_arch: "x86_64"
        };

        assert_eq!(_match_arg_rules(&rules, &ctx), false);
        assert_eq!(_match_arg_rules(&Vec::new(), &ctx), true);
    }
}
