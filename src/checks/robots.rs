//! robots.txt parsing and the AI/search bot access check (S2)
//!
//! Matching follows the usual crawler semantics: when a group names the bot,
//! only that bot's rules apply and the `*` group is ignored. Inside a group
//! the longest matching path rule decides, `Allow` wins a tie, and no
//! matching rule means allowed.

use super::base::{CheckExecutor, RobotsFetch, SiteInput};
use super::ids;
use crate::models::Evaluation;
use anyhow::Result;
use serde_json::{Map, Value};

/// Crawlers whose access is scored
pub const TRACKED_BOTS: &[&str] = &[
    "GPTBot",
    "ChatGPT-User",
    "OAI-SearchBot",
    "ClaudeBot",
    "anthropic-ai",
    "PerplexityBot",
    "Google-Extended",
    "CCBot",
    "Googlebot",
    "Bingbot",
];

/// Score used when robots.txt cannot be read
pub const MISSING_ROBOTS_SCORE: f64 = 70.0;

#[derive(Debug, Clone, PartialEq)]
struct Rule {
    allow: bool,
    pattern: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Group {
    agents: Vec<String>,
    rules: Vec<Rule>,
}

/// Parsed robots.txt
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RobotsTxt {
    groups: Vec<Group>,
    pub sitemaps: Vec<String>,
}

impl RobotsTxt {
    pub fn parse(body: &str) -> Self {
        let mut robots = RobotsTxt::default();
        let mut current: Option<Group> = None;
        // A user-agent line after rules starts a new group
        let mut in_rules = false;

        for raw in body.lines() {
            let line = raw.split('#').next().unwrap_or_default().trim();
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_ascii_lowercase();
            let value = value.trim();

            match key.as_str() {
                "user-agent" => {
                    if in_rules || current.is_none() {
                        if let Some(done) = current.take() {
                            robots.groups.push(done);
                        }
                        current = Some(Group::default());
                        in_rules = false;
                    }
                    if let Some(group) = current.as_mut() {
                        group.agents.push(value.to_ascii_lowercase());
                    }
                }
                "allow" | "disallow" => {
                    in_rules = true;
                    let Some(group) = current.as_mut() else {
                        continue;
                    };
                    // "Disallow:" with no path allows everything; it adds no rule
                    if value.is_empty() {
                        continue;
                    }
                    group.rules.push(Rule {
                        allow: key == "allow",
                        pattern: value.to_string(),
                    });
                }
                "sitemap" if !value.is_empty() => robots.sitemaps.push(value.to_string()),
                _ => {}
            }
        }
        if let Some(done) = current {
            robots.groups.push(done);
        }
        robots
    }

    fn rules_for<'a>(&'a self, agent: &'a str) -> impl Iterator<Item = &'a Rule> + 'a {
        self.groups
            .iter()
            .filter(move |g| g.agents.iter().any(|a| a == agent))
            .flat_map(|g| g.rules.iter())
    }

    fn has_group(&self, agent: &str) -> bool {
        self.groups.iter().any(|g| g.agents.iter().any(|a| a == agent))
    }

    /// Whether `bot` may fetch `path`
    pub fn is_allowed(&self, bot: &str, path: &str) -> bool {
        let bot = bot.to_ascii_lowercase();
        let agent = if self.has_group(&bot) { bot.as_str() } else { "*" };
        decisive_rule(self.rules_for(agent), path).is_none_or(|rule| rule.allow)
    }

    /// Whether a group names `bot` explicitly
    pub fn names(&self, bot: &str) -> bool {
        self.has_group(&bot.to_ascii_lowercase())
    }
}

/// Longest matching rule; `Allow` wins ties
fn decisive_rule<'a>(rules: impl Iterator<Item = &'a Rule>, path: &str) -> Option<&'a Rule> {
    rules
        .filter(|r| pattern_matches(&r.pattern, path))
        .max_by(|a, b| {
            a.pattern
                .len()
                .cmp(&b.pattern.len())
                .then(a.allow.cmp(&b.allow))
        })
}

/// Path-prefix match with `*` wildcards and a `$` end anchor
pub fn pattern_matches(pattern: &str, path: &str) -> bool {
    let (pattern, anchored) = match pattern.strip_suffix('$') {
        Some(p) => (p, true),
        None => (pattern, false),
    };
    let parts: Vec<&str> = pattern.split('*').collect();
    let Some((first, rest)) = parts.split_first() else {
        return true;
    };
    let Some(mut remaining) = path.strip_prefix(first) else {
        return false;
    };
    if rest.is_empty() {
        return !anchored || remaining.is_empty();
    }
    for (i, part) in rest.iter().enumerate() {
        let last = i == rest.len() - 1;
        if last && anchored {
            return remaining.ends_with(part);
        }
        match remaining.find(part) {
            Some(pos) => remaining = &remaining[pos + part.len()..],
            None => return false,
        }
    }
    true
}

pub struct BotAccessCheck {
    bots: Vec<String>,
}

impl BotAccessCheck {
    pub fn new() -> Self {
        Self {
            bots: TRACKED_BOTS.iter().map(|b| b.to_string()).collect(),
        }
    }
}

impl Default for BotAccessCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckExecutor for BotAccessCheck {
    fn id(&self) -> &'static str {
        ids::BOT_ACCESS
    }

    fn description(&self) -> &'static str {
        "robots.txt lets AI and search crawlers fetch the site"
    }

    fn evaluate_site(&self, site: &SiteInput<'_>) -> Result<Option<Evaluation>> {
        let (url, robots) = match site.robots() {
            RobotsFetch::Found { url, robots } => (url, robots),
            RobotsFetch::Missing { url, reason } => {
                return Ok(Some(
                    Evaluation::scored(MISSING_ROBOTS_SCORE)
                        .with_detail("robots", "missing")
                        .with_detail("robots_url", url.as_str())
                        .with_evidence(format!("robots.txt unavailable: {}", reason)),
                ));
            }
        };

        let mut access = Map::new();
        let mut blocked = Vec::new();
        for bot in &self.bots {
            let allowed = robots.is_allowed(bot, "/");
            access.insert(
                bot.clone(),
                Value::String(if allowed { "allowed" } else { "blocked" }.to_string()),
            );
            if !allowed {
                blocked.push(format!("{} is blocked", bot));
            }
        }

        let allowed = self.bots.len() - blocked.len();
        let score = if self.bots.is_empty() {
            100.0
        } else {
            100.0 * allowed as f64 / self.bots.len() as f64
        };
        Ok(Some(
            Evaluation::scored(score)
                .with_detail("robots", "found")
                .with_detail("robots_url", url.as_str())
                .with_detail("bots", Value::Object(access))
                .with_detail("allowed", allowed)
                .with_evidence_list(blocked),
        ))
    }
}
