use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use pathdoc::{codec, merge, Store, StoreConfig};
use serde_json::Value;
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let output = execute(&cli)?;
    print!("{output}");
    Ok(())
}

/// Run a command and return what it prints.
pub fn execute(cli: &Cli) -> anyhow::Result<String> {
    let config = if cli.strict {
        StoreConfig::strict()
    } else {
        StoreConfig::default()
    };
    match &cli.command {
        Command::Get(args) => cmd_get(args, config, cli.format),
        Command::Set(args) => cmd_set(args, config, cli.format),
        Command::Merge(args) => cmd_merge(args, config, cli.format),
        Command::Convert(args) => render(&load(&args.file, config)?, cli.format),
        Command::Keys(args) => cmd_keys(args, config),
    }
}

fn load(file: &Path, config: StoreConfig) -> anyhow::Result<Store> {
    let bytes = fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let store = Store::decode(&bytes)
        .with_context(|| format!("decoding {}", file.display()))?
        .with_config(config);
    debug!(file = %file.display(), "loaded document");
    Ok(store)
}

fn render(store: &Store, format: OutputFormat) -> anyhow::Result<String> {
    let bytes = match format {
        OutputFormat::Yaml => store.to_yaml()?,
        OutputFormat::Json => {
            let mut bytes = store.to_json()?;
            bytes.push(b'\n');
            bytes
        }
    };
    Ok(String::from_utf8(bytes)?)
}

fn render_value(value: &Value, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
        OutputFormat::Json => format!("{}\n", serde_json::to_string(value)?),
    })
}

fn parse_default<T>(default: Option<&str>) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    default
        .map(|text| text.parse::<T>().with_context(|| format!("invalid --default {text:?}")))
        .transpose()
}

fn cmd_get(args: &GetArgs, config: StoreConfig, format: OutputFormat) -> anyhow::Result<String> {
    let store = load(&args.file, config)?;
    let path = args.path.as_str();
    let default = args.default.as_deref();

    let text = match args.kind {
        ValueKind::Raw => match (store.get_raw(path), default) {
            (Some(value), _) => return render_value(&value, format),
            (None, Some(default)) => default.to_string(),
            (None, None) => bail!("{path:?} is not set in {}", args.file.display()),
        },
        ValueKind::String => match default {
            Some(default) if !store.is_set(path) => default.to_string(),
            _ => store.get_string(path),
        },
        ValueKind::Bool => match parse_default::<bool>(default)? {
            Some(default) => store.get_bool_or(path, default).to_string(),
            None => store.get_bool(path)?.to_string(),
        },
        ValueKind::Float => match parse_default::<f64>(default)? {
            Some(default) => store.get_f64_or(path, default).to_string(),
            None => store.get_f64(path)?.to_string(),
        },
        ValueKind::Int => match parse_default::<i64>(default)? {
            Some(default) => store.get_i64_or(path, default).to_string(),
            None => store.get_i64(path)?.to_string(),
        },
    };
    Ok(format!("{text}\n"))
}

fn cmd_set(args: &SetArgs, config: StoreConfig, format: OutputFormat) -> anyhow::Result<String> {
    let store = load(&args.file, config)?;
    let value: Value = serde_yaml::from_str(&args.value)
        .with_context(|| format!("parsing value {:?}", args.value))?;
    store.set(&args.path, &value)?;

    let rendered = render(&store, format)?;
    if !args.write {
        return Ok(rendered);
    }
    fs::write(&args.file, rendered)
        .with_context(|| format!("writing {}", args.file.display()))?;
    Ok(format!(
        "{} {} written to {}\n",
        "✓".green().bold(),
        args.path.yellow(),
        args.file.display()
    ))
}

fn cmd_merge(args: &MergeArgs, config: StoreConfig, format: OutputFormat) -> anyhow::Result<String> {
    let mut doc = read_document(&args.base)?;
    for overlay in &args.overlays {
        merge::merge(&mut doc, read_document(overlay)?);
        debug!(overlay = %overlay.display(), keys = doc.len(), "merged overlay");
    }
    render(&Store::from_document(doc).with_config(config), format)
}

fn read_document(file: &Path) -> anyhow::Result<pathdoc::Document> {
    let bytes = fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    codec::decode(&bytes).with_context(|| format!("decoding {}", file.display()))
}

fn cmd_keys(args: &KeysArgs, config: StoreConfig) -> anyhow::Result<String> {
    let store = load(&args.file, config)?;
    let Some(Value::Object(table)) = store.get_store(&args.path).get_raw("") else {
        bail!("{:?} is not a mapping in {}", args.path, args.file.display());
    };
    Ok(table.keys().map(|key| format!("{key}\n")).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn run(args: &[&str]) -> anyhow::Result<String> {
        let cli = Cli::try_parse_from(std::iter::once("pathdoc").chain(args.iter().copied()))?;
        execute(&cli)
    }

    fn config_file(dir: &TempDir) -> String {
        write_file(
            dir,
            "config.yaml",
            "server:\n  host: example.org\n  port: 8080\n  debug: true\nratio: 3.7\n",
        )
        .display()
        .to_string()
    }

    #[test]
    fn get_raw_value_as_json() {
        let dir = TempDir::new().unwrap();
        let file = config_file(&dir);
        let out = run(&["--format", "json", "get", &file, "server"]).unwrap();
        assert_eq!(out, "{\"debug\":true,\"host\":\"example.org\",\"port\":8080}\n");
    }

    #[test]
    fn get_coerced_scalars() {
        let dir = TempDir::new().unwrap();
        let file = config_file(&dir);
        assert_eq!(run(&["get", &file, "server.host", "--as", "string"]).unwrap(), "example.org\n");
        assert_eq!(run(&["get", &file, "server.debug", "--as", "bool"]).unwrap(), "true\n");
        assert_eq!(run(&["get", &file, "server.host", "--as", "bool"]).unwrap(), "false\n");
        assert_eq!(run(&["get", &file, "ratio", "--as", "int"]).unwrap(), "3\n");
        assert_eq!(run(&["get", &file, "ratio", "--as", "float"]).unwrap(), "3.7\n");
    }

    #[test]
    fn get_missing_path() {
        let dir = TempDir::new().unwrap();
        let file = config_file(&dir);
        assert!(run(&["get", &file, "nope"]).is_err());
        assert!(run(&["get", &file, "nope", "--as", "int"]).is_err());
        assert_eq!(run(&["get", &file, "nope", "--as", "string"]).unwrap(), "\n");
        assert_eq!(
            run(&["get", &file, "nope", "--as", "int", "--default", "5"]).unwrap(),
            "5\n"
        );
        assert_eq!(run(&["get", &file, "nope", "--default", "fallback"]).unwrap(), "fallback\n");
        assert!(run(&["get", &file, "nope", "--as", "bool", "--default", "maybe"]).is_err());
    }

    #[test]
    fn set_prints_updated_document() {
        let dir = TempDir::new().unwrap();
        let file = config_file(&dir);
        let out = run(&["--format", "json", "set", &file, "server.port", "9090"]).unwrap();
        assert_eq!(
            out,
            "{\"ratio\":3.7,\"server\":{\"debug\":true,\"host\":\"example.org\",\"port\":9090}}\n"
        );
        // Without --write the file is untouched.
        assert!(fs::read_to_string(&file).unwrap().contains("8080"));
    }

    #[test]
    fn set_write_rewrites_file() {
        let dir = TempDir::new().unwrap();
        let file = config_file(&dir);
        let out = run(&["set", &file, "server.tls", "{enabled: true}", "--write"]).unwrap();
        assert!(out.contains("written to"));

        let store = Store::decode(&fs::read(&file).unwrap()).unwrap();
        assert!(store.get_bool("server.tls.enabled").unwrap());
        assert_eq!(store.get_i64("server.port").unwrap(), 8080);
    }

    #[test]
    fn merge_applies_overlays_in_order() {
        let dir = TempDir::new().unwrap();
        let base = write_file(&dir, "base.yaml", "a: {b: 1, c: 2}\nkeep: yes-please\n");
        let first = write_file(&dir, "one.json", r#"{"a":{"b":10}}"#);
        let second = write_file(&dir, "two.yaml", "a: {b: 100, d: 4}\n");
        let out = run(&[
            "--format",
            "json",
            "merge",
            base.to_str().unwrap(),
            first.to_str().unwrap(),
            second.to_str().unwrap(),
        ])
        .unwrap();
        assert_eq!(out, "{\"a\":{\"b\":100,\"c\":2,\"d\":4},\"keep\":\"yes-please\"}\n");
    }

    #[test]
    fn convert_yaml_to_json() {
        let dir = TempDir::new().unwrap();
        let file = write_file(&dir, "doc.yaml", "list: [1, 2]\nname: x\n");
        let out = run(&["convert", &file.display().to_string(), "--format", "json"]).unwrap();
        assert_eq!(out, "{\"list\":[1,2],\"name\":\"x\"}\n");
    }

    #[test]
    fn keys_lists_mapping() {
        let dir = TempDir::new().unwrap();
        let file = config_file(&dir);
        assert_eq!(run(&["keys", &file]).unwrap(), "ratio\nserver\n");
        assert_eq!(run(&["keys", &file, "server"]).unwrap(), "debug\nhost\nport\n");
        assert!(run(&["keys", &file, "ratio"]).is_err());
    }

    #[test]
    fn rejects_non_mapping_document() {
        let dir = TempDir::new().unwrap();
        let file = write_file(&dir, "list.yaml", "- 1\n- 2\n");
        let err = run(&["convert", &file.display().to_string()]).unwrap_err();
        assert!(format!("{err:#}").contains("must be a mapping"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = run(&["convert", "/definitely/not/here.yaml"]).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.yaml"));
    }
}
