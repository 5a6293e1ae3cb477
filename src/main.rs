use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use unicode_width::UnicodeWidthStr;

use msgcat::interpolate::{interpolate, placeholders};
use msgcat::suggest::suggest;
use msgcat::{loader, ArgValue, Args, Catalog, Config, I18n};

#[derive(Parser)]
#[command(name = "msgcat")]
#[command(about = "Resolve and inspect nested message catalogs")]
struct Cli {
    /// Config file [default: ~/.msgcat/config.toml]
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Catalog directory, overrides catalog.dir from the config
    #[arg(long, global = true)]
    dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a dotted key to display text
    Resolve {
        /// Key path, e.g. common.form.required
        key: String,
        /// Locale to resolve in [default: active locale]
        #[arg(long, short)]
        locale: Option<String>,
        /// Placeholder value as name=value (repeatable)
        #[arg(long = "arg", short = 'a', value_parser = parse_arg)]
        args: Vec<(String, ArgValue)>,
    },
    /// List registered locales
    Locales,
    /// List key paths and templates of a locale
    Keys {
        /// Locale to list [default: active locale]
        #[arg(long, short)]
        locale: Option<String>,
    },
    /// Report translation coverage against the default locale
    Check,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = match cli.config {
        Some(path) => Config::load(&path)?,
        None => Config::new()?,
    };
    if let Some(dir) = cli.dir {
        config.catalog.dir = Some(dir);
    }
    let i18n = I18n::from_config(&config)?;
    let messages = cli_messages(&config.get_effective_locale())?;

    match cli.command {
        Commands::Resolve { key, locale, args } => {
            if let Some(code) = locale.as_deref() {
                if i18n.catalog(code).is_none() {
                    let notice = messages.t_with(
                        "cli.unknownLocale",
                        &Args::new().with("locale", code).with("default", i18n.default_locale()),
                    );
                    eprintln!("{}", notice.yellow());
                }
            }

            let args: Args = args.into_iter().collect();
            match render_key(&i18n, locale.as_deref(), &key, &args) {
                Some((text, unfilled)) => {
                    println!("{}", text);
                    if !unfilled.is_empty() {
                        let notice = messages.t_with(
                            "cli.unfilledPlaceholders",
                            &Args::new().with("names", unfilled.join(", ")),
                        );
                        eprintln!("{}", notice.yellow());
                    }
                }
                None => {
                    println!("{}", key.red());
                    print_suggestions(&i18n, &messages, &key, config.display.max_suggestions);
                }
            }
        }
        Commands::Locales => {
            let active = i18n.active_locale();
            for locale in i18n.locales() {
                let keys = i18n.catalog(locale).map(|c| c.len()).unwrap_or(0);
                let mut marks = Vec::new();
                if locale == i18n.default_locale() {
                    marks.push(messages.t("cli.default"));
                }
                if locale == active {
                    marks.push(messages.t("cli.active"));
                }
                let marks = if marks.is_empty() {
                    String::new()
                } else {
                    format!(" ({})", marks.join(", "))
                };
                let count = messages.t_with("cli.keyCount", &Args::new().with("count", keys));
                println!("{}{}  {}", locale.green().bold(), marks.dimmed(), count.cyan());
            }
        }
        Commands::Keys { locale } => {
            let selected = i18n.select_locale(locale.as_deref());
            if let Some(catalog) = i18n.catalog(&selected) {
                for (key, template) in key_rows(catalog) {
                    println!("{}  {}", key.cyan(), template);
                }
            }
        }
        Commands::Check => {
            let (lines, complete) = check_lines(&i18n, &messages);
            for line in lines {
                println!("{}", line);
            }
            if !complete {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Interpolated text plus placeholders left unfilled; `None` when the key
/// resolves nowhere.
fn render_key<'a>(
    i18n: &'a I18n,
    locale: Option<&str>,
    key: &str,
    args: &Args,
) -> Option<(String, Vec<&'a str>)> {
    let template = i18n.lookup(locale, key)?;
    let unfilled = placeholders(template)
        .into_iter()
        .filter(|name| args.get(name).is_none())
        .collect();
    Some((interpolate(template, args), unfilled))
}

/// Built-in catalogs localize the tool's own output, whatever catalogs it inspects.
fn cli_messages(requested_locale: &str) -> Result<I18n> {
    let messages = loader::builtin()?;
    if let Some(locale) = messages.match_locale(requested_locale) {
        messages.set_active_locale(&locale)?;
    }
    Ok(messages)
}

/// Key paths padded to a common display width, paired with their templates.
fn key_rows(catalog: &Catalog) -> Vec<(String, &str)> {
    let keys = catalog.keys();
    let width = keys.iter().map(|k| k.width()).max().unwrap_or(0);
    keys.into_iter()
        .map(|key| {
            let pad = " ".repeat(width - key.width());
            let template = catalog.lookup(&key).unwrap_or_default();
            (format!("{key}{pad}"), template)
        })
        .collect()
}

/// Coverage report lines, and whether every locale has every default key.
fn check_lines(i18n: &I18n, messages: &I18n) -> (Vec<String>, bool) {
    let report = i18n.coverage_report();
    let mut lines = Vec::new();
    let reference = messages.t_with(
        "cli.reference",
        &Args::new()
            .with("locale", report.default_locale.as_str())
            .with("count", report.total_keys),
    );
    lines.push(reference.bold().to_string());

    for coverage in &report.locales {
        let line = messages.t_with(
            "cli.coverage",
            &Args::new()
                .with("locale", coverage.locale.as_str())
                .with("present", coverage.present)
                .with("total", report.total_keys)
                .with("percent", format!("{:.1}", coverage.coverage_percent)),
        );
        if coverage.missing.is_empty() {
            lines.push(line.green().to_string());
        } else {
            lines.push(line.yellow().to_string());
            for key in &coverage.missing {
                lines.push(format!("  {} {}", "-".red(), key));
            }
        }
        for key in &coverage.extra {
            lines.push(format!("  {} {}", "+".dimmed(), key.dimmed()));
        }
    }

    (lines, report.is_complete())
}

fn parse_arg(raw: &str) -> std::result::Result<(String, ArgValue), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing placeholder name in '{raw}'"));
    }
    Ok((name.to_string(), ArgValue::parse(value)))
}

fn print_suggestions(i18n: &I18n, messages: &I18n, key: &str, limit: usize) {
    let mut known: Vec<String> = i18n
        .locales()
        .into_iter()
        .filter_map(|locale| i18n.catalog(locale))
        .flat_map(|catalog| catalog.keys())
        .collect();
    known.sort_unstable();
    known.dedup();

    let suggestions = suggest(key, &known, limit);
    if suggestions.is_empty() {
        eprintln!("{}", messages.t("cli.missingTranslation").yellow());
    } else {
        eprintln!("{}", messages.t("cli.didYouMean").yellow());
        for candidate in suggestions {
            eprintln!("  {}", candidate.cyan());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arg() {
        assert_eq!(
            parse_arg("name=Alice").unwrap(),
            ("name".to_string(), ArgValue::Str("Alice".to_string()))
        );
        assert_eq!(parse_arg("total=20").unwrap(), ("total".to_string(), ArgValue::Int(20)));
        assert_eq!(
            parse_arg("eq=a=b").unwrap(),
            ("eq".to_string(), ArgValue::Str("a=b".to_string()))
        );
        assert!(parse_arg("novalue").is_err());
        assert!(parse_arg("=x").is_err());
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "msgcat", "resolve", "home.welcome", "-l", "en", "-a", "name=Alice", "-a", "n=1",
        ])
        .unwrap();
        match cli.command {
            Commands::Resolve { key, locale, args } => {
                assert_eq!(key, "home.welcome");
                assert_eq!(locale.as_deref(), Some("en"));
                assert_eq!(args.len(), 2);
            }
            _ => panic!("expected resolve"),
        }

        let cli = Cli::try_parse_from(["msgcat", "check", "--dir", "lang"]).unwrap();
        assert_eq!(cli.dir, Some(PathBuf::from("lang")));
    }

    #[test]
    fn test_render_key() {
        let i18n = partial_registry();
        let args = Args::new().with("name", "Alice");

        let (text, unfilled) = render_key(&i18n, Some("en"), "home.welcome", &args).unwrap();
        assert_eq!(text, "欢迎回来，Alice");
        assert!(unfilled.is_empty());

        let (text, unfilled) =
            render_key(&i18n, Some("en"), "common.pagination.total", &Args::new()).unwrap();
        assert_eq!(text, "共 {total} 条数据");
        assert_eq!(unfilled, vec!["total"]);

        assert!(render_key(&i18n, None, "order.title", &args).is_none());
    }

    fn partial_registry() -> I18n {
        let mut i18n = loader::builtin().unwrap();
        i18n.register_catalog(
            "en",
            serde_json::json!({ "common": { "submit": "Submit" }, "beta": { "banner": "Beta" } }),
        )
        .unwrap();
        i18n
    }

    #[test]
    fn test_check_flags_missing_keys() {
        let messages = cli_messages("en").unwrap();

        let (lines, complete) = check_lines(&partial_registry(), &messages);
        assert!(!complete);
        assert!(lines[0].contains("reference: zh"));
        assert!(lines.iter().any(|l| l.contains("common.form.required")));
        assert!(lines.iter().any(|l| l.contains("beta.banner")));

        let (lines, complete) = check_lines(&loader::builtin().unwrap(), &messages);
        assert!(complete);
        assert!(lines.iter().any(|l| l.contains("en:") && l.contains("100.0%")));
    }

    #[test]
    fn test_cli_messages_follow_locale() {
        let zh = cli_messages("zh_CN.UTF-8").unwrap();
        assert_eq!(zh.t("cli.missingTranslation"), "缺少翻译");
        let en = cli_messages("en_US").unwrap();
        assert_eq!(en.t("cli.missingTranslation"), "missing translation");
        assert_eq!(
            en.t_with("cli.keyCount", &Args::new().with("count", 3)),
            "3 keys"
        );
        // Unmatched locales keep the built-in default.
        assert_eq!(cli_messages("fr").unwrap().active_locale(), "zh");
    }

    #[test]
    fn test_key_rows_aligned() {
        let catalog = Catalog::from_value(
            "zh",
            serde_json::json!({
                "a": "短",
                "common": { "submit": "提交" },
                "用户": { "名": "用户名" }
            }),
        )
        .unwrap();
        let rows = key_rows(&catalog);
        assert_eq!(rows.len(), 3);
        let widths: Vec<usize> = rows.iter().map(|(key, _)| key.width()).collect();
        assert!(widths.iter().all(|w| *w == "common.submit".width()));
        assert_eq!(rows[0], ("a            ".to_string(), "短"));
        assert!(rows.iter().any(|(key, template)| key.starts_with("用户.名") && *template == "用户名"));
    }
}
