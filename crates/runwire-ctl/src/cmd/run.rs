//! `run` — invoke an action on a remote service.
//!
//! Arguments become a flat field map. `@path` and `@https://...` values are
//! opened as byte streams and sent as the multipart file part; everything
//! else travels in the JSON `data` part.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use futures::TryStreamExt;
use serde::Deserialize;

use runwire_core::config::RunwireConfig;
use runwire_core::{ByteStream, DataTree, Fields, from_wire_form, is_url, split, to_wire_fields};

use super::http::{get_json, join_url, post_wire_tuple};
use crate::render;

// ── Arguments ─────────────────────────────────────────────────────────────────

/// A field value as typed on the command line, before any file is opened.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldArg {
    Value(DataTree),
    /// `@`-prefixed reference: a URL or a local path.
    File(String),
}

#[derive(Debug, Default, PartialEq)]
pub struct RunArgs {
    pub service: String,
    pub action: String,
    pub team: Option<String>,
    pub out: Option<PathBuf>,
    pub fields: Vec<(String, FieldArg)>,
}

impl RunArgs {
    /// Parse everything after the `run` word.
    ///
    /// Fields are `name=value` after the action, or `--name value`,
    /// `--name=value` and bare `--flag` (true) anywhere. `--team` and `--out`
    /// are reserved for the command itself.
    pub fn parse(args: &[&str]) -> Result<Self> {
        let mut positional = Vec::new();
        let mut parsed = RunArgs::default();

        let mut i = 0;
        while i < args.len() {
            let arg = args[i];
            i += 1;

            let Some(name) = arg.strip_prefix("--") else {
                if positional.len() < 2 {
                    positional.push(arg);
                    continue;
                }
                // Anything after the action must be a `name=value` field.
                match arg.split_once('=') {
                    Some((name, value)) if !name.is_empty() => {
                        parsed.fields.push((name.to_string(), parse_field(Some(value))));
                    }
                    _ => bail!("Unexpected argument: {arg} (fields are passed as name=value)"),
                }
                continue;
            };

            let (name, value) = match name.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => match args.get(i) {
                    Some(next) if !next.starts_with("--") => {
                        i += 1;
                        (name, Some(*next))
                    }
                    _ => (name, None),
                },
            };

            match (name, value) {
                ("team", Some(team)) => parsed.team = Some(team.to_string()),
                ("out", Some(out)) => parsed.out = Some(PathBuf::from(out)),
                ("team" | "out", None) => bail!("--{name} requires a value"),
                (name, value) => parsed.fields.push((name.to_string(), parse_field(value))),
            }
        }

        let mut positional = positional.into_iter();
        parsed.service = positional.next().context("Missing service")?.to_string();
        parsed.action = positional.next().context("Missing action")?.to_string();
        Ok(parsed)
    }
}

fn parse_field(value: Option<&str>) -> FieldArg {
    let Some(value) = value else {
        return FieldArg::Value(DataTree::Bool(true));
    };
    if let Some(location) = value.strip_prefix('@') {
        return FieldArg::File(location.to_string());
    }
    match serde_json::from_str::<serde_json::Number>(value) {
        Ok(n) => FieldArg::Value(DataTree::Number(n)),
        Err(_) => FieldArg::Value(DataTree::String(value.to_string())),
    }
}

/// Scoped services (`team/service`) are addressed as `@team/service`.
pub fn service_path(service: &str) -> String {
    if service.contains('/') {
        format!("@{service}")
    } else {
        service.to_string()
    }
}

// ── Teams ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct Me {
    pub teams: Vec<Team>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Team {
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub personal: bool,
}

/// Pick the named team, or the personal team when no name is given.
pub fn select_team<'a>(teams: &'a [Team], name: Option<&str>) -> Result<&'a Team> {
    match name {
        Some(name) => teams
            .iter()
            .find(|t| t.name.as_deref() == Some(name))
            .with_context(|| format!("Cannot find team {name}")),
        None => teams
            .iter()
            .find(|t| t.personal)
            .context("no personal team found for this account"),
    }
}

// ── Execution ─────────────────────────────────────────────────────────────────

/// Open an `@` reference as a byte stream without reading it.
async fn open_file(client: &reqwest::Client, location: &str) -> Result<DataTree> {
    if is_url(location) {
        let resp = client
            .get(location)
            .send()
            .await
            .with_context(|| format!("failed to fetch {location}"))?
            .error_for_status()
            .with_context(|| format!("failed to fetch {location}"))?;
        let chunks = resp.bytes_stream().map_err(io::Error::other);
        Ok(ByteStream::from_chunks(chunks).into())
    } else {
        let file = tokio::fs::File::open(location)
            .await
            .with_context(|| format!("failed to open file: {location}"))?;
        Ok(ByteStream::from_reader(file).into())
    }
}

async fn collect_fields(client: &reqwest::Client, args: &[(String, FieldArg)]) -> Result<Fields> {
    let mut fields = Fields::with_capacity(args.len());
    for (name, arg) in args {
        let value = match arg {
            FieldArg::Value(value) => value.clone(),
            FieldArg::File(location) => open_file(client, location).await?,
        };
        fields.insert(name.clone(), value);
    }
    Ok(fields)
}

pub async fn cmd_run(config: &RunwireConfig, args: &[&str]) -> Result<()> {
    let args = RunArgs::parse(args)?;
    let api_key = config.auth.api_key.as_deref().with_context(|| {
        format!(
            "no API key configured; set auth.api_key in {} or RUNWIRE_AUTH__API_KEY",
            RunwireConfig::file_path().display()
        )
    })?;

    let client = reqwest::Client::new();
    let base_url = &config.api.base_url;

    let me: Me = get_json(&client, &join_url(base_url, "users/me"), api_key).await?;
    let team_name = args.team.as_deref().or(config.run.default_team.as_deref());
    let team = select_team(&me.teams, team_name)?;

    let fields = collect_fields(&client, &args.fields).await?;
    let tuple = split(&to_wire_fields(&fields).await?)?;
    tracing::info!(
        service = %args.service,
        action = %args.action,
        file = tuple.file.as_ref().map(|f| f.field.as_str()),
        "running action"
    );

    let url = join_url(
        base_url,
        &format!("run/{}/{}", service_path(&args.service), args.action),
    );
    let body = post_wire_tuple(&client, &url, &team.key, &tuple).await?;
    let result = from_wire_form(&body).context("failed to decode response")?;

    println!("{}", render::pretty(&result)?);

    if let Some(out) = &args.out {
        match render::first_file(&result) {
            Some(file) => {
                tokio::fs::write(out, file.payload.as_bytes())
                    .await
                    .with_context(|| format!("failed to write {}", out.display()))?;
                println!("Saved {} ({} bytes) to {}", file.type_tag, file.payload.len(), out.display());
            }
            None => tracing::warn!("--out given but the response contains no file"),
        }
    }

    Ok(())
}
