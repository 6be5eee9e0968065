use std::io::{stdout, Write};
use std::path::PathBuf;

use airsurvey::{process_file, Discard, Summary, Synchronizer};
use anyhow::{Context, Result};
use handlebars::handlebars_helper;
use serde::Serialize;
use tracing::error;

#[derive(Debug, Clone)]
pub enum Format {
    Json,
    Text,
}

impl clap::ValueEnum for Format {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Json, Self::Text]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        match self {
            Self::Json => Some(clap::builder::PossibleValue::new("json")),
            Self::Text => Some(clap::builder::PossibleValue::new("text")),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
struct Info {
    filename: String,
    summary: Summary,
}

fn summarize(inputs: &[PathBuf]) -> Vec<Info> {
    // shared so channel values carry over exactly as they do when converting
    let mut sync = Synchronizer::new();
    let mut infos = Vec::default();
    for input in inputs {
        match process_file(input, &mut sync, &mut Discard) {
            Ok(summary) => infos.push(Info {
                filename: input.to_string_lossy().to_string(),
                summary,
            }),
            Err(err) => error!("failed to process {input:?}: {err}"),
        }
    }
    infos
}

pub fn info(inputs: &[PathBuf], format: &Format) -> Result<()> {
    let infos = summarize(inputs);

    match format {
        Format::Json => {
            serde_json::to_writer_pretty(stdout(), &infos).context("serializing to json")
        }
        Format::Text => {
            let data = render_text(&infos).context("serializing info")?;
            stdout()
                .write_all(str::as_bytes(&data))
                .context("writing to stdout")
        }
    }
}

fn render_text(infos: &[Info]) -> Result<String> {
    handlebars_helper!(left_pad: |num: u64, v: Json| {
        let v = match v {
            serde_json::Value::String(s) => s.to_owned(),
            serde_json::Value::Null => String::new(),
            _ => v.to_string()
        };
        let num = usize::try_from(num).unwrap_or_default();
        format!("{v:>num$}")
    });
    handlebars_helper!(right_pad: |num: u64, v: Json| {
        let v = match v {
            serde_json::Value::String(s) => s.to_owned(),
            _ => v.to_string()
        };
        let num = usize::try_from(num).unwrap_or_default();
        format!("{v:<num$}")
    });
    let mut hb = handlebars::Handlebars::new();
    hb.register_escape_fn(handlebars::no_escape);
    hb.register_helper("lpad", Box::new(left_pad));
    hb.register_helper("rpad", Box::new(right_pad));
    hb.register_template_string("info", TEXT_TEMPLATE)
        .context("registering template")?;

    hb.render("info", &infos).context("rendering text")
}

const TEXT_TEMPLATE: &str = r"{{ #each this }}{{ filename }}
===============================================================================
Lines:    {{ summary.lines }} ({{ summary.skipped }} skipped)
Records:  {{ summary.records }} ({{ summary.unrouted }} without a channel)
Frames:   {{ summary.frames }}
Flushes:  {{ summary.flushes }}
First:    {{ summary.first_epoch }}
Last:     {{ summary.last_epoch }}
-------------------------------------------------------------------------------
Channel           Accepted    Rejected       Stale
-------------------------------------------------------------------------------
{{ #each summary.channels }}{{ rpad 14 @key }}  {{ lpad 10 accepted }}  {{ lpad 10 rejected }}  {{ lpad 10 stale }}
{{/each }}
{{/each }}";
