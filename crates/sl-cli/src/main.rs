//! Scriptlets CLI
//!
//! Builds the wiki pages and exposes the matching helpers for checking
//! rule arguments from the shell.

mod request;

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use sl_core::{
    CallbackArg, Clock, CookieSpec, DelayArg, FixedClock, PreventionData, Source, SystemClock,
};
use sl_docs::DocsConfig;

#[derive(Parser)]
#[command(name = "sl-cli")]
#[command(about = "Scriptlet helpers and wiki generator")]
struct Cli {
    /// Log validation messages and progress
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the about-*.md wiki pages
    BuildDocs {
        /// Directory with scriptlet sources
        #[arg(long, default_value = "src/scriptlets")]
        scriptlets_dir: PathBuf,

        /// Directory with redirect sources and the redirect YAML lists
        #[arg(long, default_value = "src/redirects")]
        redirects_dir: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "wiki")]
        wiki_dir: PathBuf,

        /// Scriptlet source link prefix, relative to the wiki dir
        #[arg(long, default_value = "../src/scriptlets")]
        scriptlets_link_prefix: String,

        /// Redirect source link prefix, relative to the wiki dir
        #[arg(long, default_value = "../src/redirects")]
        redirects_link_prefix: String,
    },

    /// Check a request against a props-to-match spec
    MatchProps {
        /// Spec, e.g. "method:POST url:/track"
        #[arg(short, long)]
        props: String,

        /// Request as a JSON object, e.g. '{"url": "...", "method": "GET"}'
        #[arg(short, long)]
        request: String,
    },

    /// Check whether a setTimeout/setInterval call would be prevented
    PreventTimer {
        /// Callback source text
        #[arg(short, long)]
        callback: String,

        /// Treat the callback as a code string instead of a function
        #[arg(long)]
        code: bool,

        /// Delay passed to the timer
        #[arg(short, long)]
        delay: Option<String>,

        /// Callback match argument
        #[arg(long, default_value = "")]
        match_callback: String,

        /// Delay match argument
        #[arg(long)]
        match_delay: Option<String>,
    },

    /// Print the cookie string trusted-set-cookie would write
    Cookie {
        #[arg(short, long)]
        name: String,

        #[arg(long)]
        value: String,

        /// Expiry offset: seconds, "1day" or "1year"
        #[arg(short, long, default_value = "")]
        offset: String,

        /// "/" or "none"
        #[arg(short, long, default_value = "/")]
        path: String,

        /// Fixed current time (RFC 3339) instead of the system clock
        #[arg(long)]
        now: Option<String>,
    },

    /// Resolve a $now$ / $currentDate$ keyword value
    Keyword {
        value: String,

        /// Fixed current time (RFC 3339) instead of the system clock
        #[arg(long)]
        now: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let result = match cli.command {
        Commands::BuildDocs {
            scriptlets_dir,
            redirects_dir,
            wiki_dir,
            scriptlets_link_prefix,
            redirects_link_prefix,
        } => cmd_build_docs(DocsConfig {
            scriptlets_dir,
            redirects_dir,
            wiki_dir,
            scriptlets_link_prefix,
            redirects_link_prefix,
        }),
        Commands::MatchProps { props, request } => cmd_match_props(&props, &request, cli.verbose),
        Commands::PreventTimer {
            callback,
            code,
            delay,
            match_callback,
            match_delay,
        } => cmd_prevent_timer(callback, code, delay, &match_callback, match_delay.as_deref()),
        Commands::Cookie {
            name,
            value,
            offset,
            path,
            now,
        } => cmd_cookie(&name, &value, &offset, &path, now.as_deref()),
        Commands::Keyword { value, now } => cmd_keyword(&value, now.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn cmd_build_docs(config: DocsConfig) -> Result<(), String> {
    sl_docs::build_wiki_about_pages(&config).map_err(|e| e.to_string())?;
    println!("Wiki pages written to '{}'", config.wiki_dir.display());
    Ok(())
}

fn cmd_match_props(props: &str, request: &str, verbose: bool) -> Result<(), String> {
    let data = request::request_from_json(request)?;
    let source = Source::new("prevent-fetch").with_args([props]).verbose(verbose);
    println!("{}", sl_core::match_request_props(&source, props, &data));
    Ok(())
}

fn cmd_prevent_timer(
    callback: String,
    code: bool,
    delay: Option<String>,
    match_callback: &str,
    match_delay: Option<&str>,
) -> Result<(), String> {
    let callback = if code {
        CallbackArg::Code(callback)
    } else {
        CallbackArg::Function(callback)
    };
    let delay = match delay {
        None => DelayArg::Missing,
        Some(text) => match text.parse::<f64>() {
            Ok(number) => DelayArg::Number(number),
            Err(_) => DelayArg::Text(text),
        },
    };

    let prevent = sl_core::is_prevention_needed(&PreventionData {
        callback: &callback,
        delay: &delay,
        match_callback,
        match_delay,
    });
    println!("{}", prevent);
    Ok(())
}

fn cmd_cookie(name: &str, value: &str, offset: &str, path: &str, now: Option<&str>) -> Result<(), String> {
    let clock = clock_from_arg(now)?;
    let spec = CookieSpec::parse(name, value, offset, path).map_err(|e| e.to_string())?;
    let cookie = spec
        .to_cookie_string(&*clock)
        .ok_or_else(|| format!("Cookie '{}' expires outside the supported date range", name))?;
    println!("{}", cookie);
    Ok(())
}

fn cmd_keyword(value: &str, now: Option<&str>) -> Result<(), String> {
    let clock = clock_from_arg(now)?;
    println!("{}", sl_core::parse_keyword_value(value, &*clock));
    Ok(())
}

fn clock_from_arg(now: Option<&str>) -> Result<Box<dyn Clock>, String> {
    match now {
        None => Ok(Box::new(SystemClock)),
        Some(text) => {
            let time = DateTime::parse_from_rfc3339(text)
                .map_err(|e| format!("Invalid time '{}': {}", text, e))?
                .with_timezone(&Utc);
            Ok(Box::new(FixedClock(time)))
        }
    }
}
