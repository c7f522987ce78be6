//! Works out which GitHub repository's runs to query.
//!
//! The slug comes from an explicit `owner/name` string when given, otherwise
//! from the `origin` remote of the enclosing git repository via libgit2.

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result, bail};
use git2::Repository;

/// A GitHub repository identifier, `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSlug {
    pub owner: String,
    pub name: String,
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl RepoSlug {
    /// Parse an explicit `owner/name` string.
    pub fn parse(s: &str) -> Result<Self> {
        let Some((owner, name)) = s.split_once('/') else {
            bail!("expected owner/name, got: {s}");
        };
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            bail!("expected owner/name, got: {s}");
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// Detect the slug from the `origin` remote of the repository
    /// enclosing `path`.
    pub fn detect(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path).context("failed to open a git repository")?;
        let remote = repo
            .find_remote("origin")
            .context("no `origin` remote configured")?;
        let url = remote.url().context("`origin` remote has no URL")?;
        parse_remote_url(url).with_context(|| format!("unrecognized remote URL: {url}"))
    }
}

/// Parse the GitHub remote URL forms git produces: scp-like
/// (`git@github.com:owner/name.git`), https and ssh.
fn parse_remote_url(url: &str) -> Option<RepoSlug> {
    let rest = url
        .strip_prefix("git@github.com:")
        .or_else(|| url.strip_prefix("https://github.com/"))
        .or_else(|| url.strip_prefix("http://github.com/"))
        .or_else(|| url.strip_prefix("ssh://git@github.com/"))?;
    let rest = rest.strip_suffix(".git").unwrap_or(rest);
    let rest = rest.strip_suffix('/').unwrap_or(rest);
    let (owner, name) = rest.split_once('/')?;
    if owner.is_empty() || name.is_empty() || name.contains('/') {
        return None;
    }
    Some(RepoSlug {
        owner: owner.to_string(),
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slug(owner: &str, name: &str) -> RepoSlug {
        RepoSlug {
            owner: owner.into(),
            name: name.into(),
        }
    }

    #[test]
    fn parses_scp_like_remote() {
        assert_eq!(
            parse_remote_url("git@github.com:acme/widgets.git"),
            Some(slug("acme", "widgets"))
        );
    }

    #[test]
    fn parses_https_remote_with_and_without_suffix() {
        assert_eq!(
            parse_remote_url("https://github.com/acme/widgets.git"),
            Some(slug("acme", "widgets"))
        );
        assert_eq!(
            parse_remote_url("https://github.com/acme/widgets"),
            Some(slug("acme", "widgets"))
        );
    }

    #[test]
    fn parses_ssh_remote() {
        assert_eq!(
            parse_remote_url("ssh://git@github.com/acme/widgets.git"),
            Some(slug("acme", "widgets"))
        );
    }

    #[test]
    fn rejects_non_github_and_malformed_urls() {
        assert_eq!(parse_remote_url("https://gitlab.com/acme/widgets.git"), None);
        assert_eq!(parse_remote_url("git@github.com:acme"), None);
        assert_eq!(parse_remote_url("https://github.com/acme/widgets/extra"), None);
    }

    #[test]
    fn parse_accepts_owner_slash_name() {
        assert_eq!(RepoSlug::parse("acme/widgets").unwrap(), slug("acme", "widgets"));
        assert!(RepoSlug::parse("acme").is_err());
        assert!(RepoSlug::parse("acme/widgets/extra").is_err());
    }

    #[test]
    fn display_round_trips() {
        assert_eq!(slug("acme", "widgets").to_string(), "acme/widgets");
    }

    #[test]
    fn detect_reads_the_origin_remote() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        repo.remote("origin", "git@github.com:acme/widgets.git")
            .unwrap();

        let detected = RepoSlug::detect(dir.path()).unwrap();
        assert_eq!(detected, slug("acme", "widgets"));
    }

    #[test]
    fn detect_fails_without_an_origin_remote() {
        let dir = tempfile::tempdir().unwrap();
        Repository::init(dir.path()).unwrap();

        let err = RepoSlug::detect(dir.path()).unwrap_err();
        assert!(err.to_string().contains("origin"));
    }
}
