//! Renders the projections and schemas of a small blog model.
//!
//! Settings come from an optional `api-fields.toml` (or `.json`, `.yaml`)
//! next to the working directory, overridden by `API_FIELDS_*` environment
//! variables:
//! - `log_filter`: a tracing filter directive, `info` by default
//! - `pretty`: pretty-print the JSON output, on by default
//! - `entity`: render only this entity (`author`, `post`, `comment`, `editor`)
//!
//! An entity name given as the first argument wins over the setting.

use chrono::{DateTime, NaiveDate, Utc};
use config::{Config, Environment, File};
use lazy_static::lazy_static;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use api_fields::entity;
use api_fields::entity::EntityType;
use api_fields::{ApiFieldsError, Directive, Registry, Result};

// ------------- Model -------------
#[allow(dead_code)]
struct Author {
    id: u64,
    name: String,
    email: String,
    joined: NaiveDate,
    password_hash: String,
    profile: Value,
    posts: Vec<Post>,
}
#[allow(dead_code)]
struct Editor {
    id: u64,
    name: String,
    email: String,
    sections: Vec<String>,
}
#[allow(dead_code)]
struct Post {
    id: u64,
    title: String,
    published_at: DateTime<Utc>,
    draft: bool,
    author: Author,
    comments: Vec<Comment>,
    extra: Value,
}
#[allow(dead_code)]
struct Comment {
    id: u64,
    text: String,
    post: Post,
}

entity!(Author { id: u64, name: String, email: String, joined: NaiveDate, password_hash: String, profile: Value, posts: Vec<Post> });
entity!(Editor: Author { sections: Vec<String> });
entity!(Post { id: u64, title: String, published_at: DateTime<Utc>, draft: bool, author: Author, comments: Vec<Comment>, extra: Value });
entity!(Comment { id: u64, text: String, post: Post });

fn model() -> Result<Registry> {
    let mut registry = Registry::new();
    registry
        .entity::<Author>()
        .field("id")
        .field("name")
        .field("joined")
        .nested_array::<Post>("posts")
        .with(
            "profile",
            Directive::lazy(|| {
                let mut picked = serde_json::Map::new();
                picked.insert("bio".into(), Value::Bool(true));
                picked.insert("avatar".into(), Value::Bool(true));
                picked
            }),
        )?
        .annotate("email", json!({ "format": "email" }))?
        .annotate("joined", json!({ "format": "date" }))?;
    registry
        .entity::<Editor>()
        .field("email")
        .field("sections")
        .annotate("sections", json!({ "type": "array", "items": { "type": "string" } }))?;
    registry
        .entity::<Post>()
        .field("id")
        .field("title")
        .field("published_at")
        .exclude("draft")
        .nested::<Author>("author")
        .nested_array::<Comment>("comments")
        .with("extra", json!({ "tags": true }))?
        .annotate("published_at", json!({ "format": "date-time" }))?
        .annotate("id", json!({ "type": "integer", "minimum": 1 }))?;
    registry
        .entity::<Comment>()
        .field("id")
        .field("text")
        .nested::<Post>("post")
        .annotate("text", json!({ "maxLength": 2000 }))?;
    Ok(registry)
}

lazy_static! {
    static ref REGISTRY: Result<Registry> = model();
}

// ------------- Settings -------------
#[derive(Debug, Deserialize)]
struct Settings {
    #[serde(default = "default_log_filter")]
    log_filter: String,
    #[serde(default = "default_pretty")]
    pretty: bool,
    #[serde(default)]
    entity: Option<String>,
}
fn default_log_filter() -> String {
    String::from("info")
}
fn default_pretty() -> bool {
    true
}

fn settings() -> Result<Settings> {
    let settings = Config::builder()
        .add_source(File::with_name("api-fields").required(false))
        .add_source(Environment::with_prefix("API_FIELDS").try_parsing(true))
        .build()?
        .try_deserialize()?;
    Ok(settings)
}

fn entities() -> Vec<(&'static str, EntityType)> {
    vec![
        ("author", EntityType::of::<Author>()),
        ("editor", EntityType::of::<Editor>()),
        ("post", EntityType::of::<Post>()),
        ("comment", EntityType::of::<Comment>()),
    ]
}

fn render(value: &Value, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(rendered)
}

fn main() -> Result<()> {
    let mut settings = settings()?;
    if let Some(entity) = std::env::args().nth(1) {
        settings.entity = Some(entity);
    }
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let registry = REGISTRY
        .as_ref()
        .map_err(|e| ApiFieldsError::Config(e.to_string()))?;
    info!(entities = registry.store().len(), "model declared");

    let selected: Vec<_> = entities()
        .into_iter()
        .filter(|(name, _)| settings.entity.as_deref().is_none_or(|wanted| wanted == *name))
        .collect();
    if selected.is_empty() {
        warn!(entity = ?settings.entity, "no such entity");
    }
    for (name, ty) in selected {
        let document = json!({
            "entity": name,
            "projection": registry.resolve(ty).into_value(),
            "schema": registry.build_schema(ty),
            "list_schema": registry.build_schema([ty]),
        });
        println!("{}", render(&document, settings.pretty)?);
    }
    Ok(())
}
