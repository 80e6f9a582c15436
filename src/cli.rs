use colored::Colorize;
use envconf::{EnvConf, RecordDescriptor, Spec, format_config_error, resolver};
use tracing_subscriber::EnvFilter;

const DEFAULT_PREFIX: &str = "DEMO";

#[derive(Debug, Default, EnvConf)]
pub struct DemoConfig {
    #[envconf(default = "8080", required = "true")]
    pub port: i32,

    #[envconf(vudou = "service_name", default = "envconf-demo")]
    pub name: String,

    #[envconf(default = "false")]
    pub debug: bool,

    #[envconf(default = "0.5")]
    pub sample_rate: f64,

    pub allowed_hosts: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let command = args.next();
    let prefix = args.next().unwrap_or_else(|| DEFAULT_PREFIX.to_string());

    match command.as_deref() {
        Some("load") => load(&prefix),
        Some("keys") => print_keys(&prefix),
        Some("version") => println!("envconf {}", envconf::human_version()),
        Some(arg) => println!("unknown arg: {}. Available: load, keys, version", arg),
        None => {
            println!("Usage: envconf-demo [command] [prefix]");
            println!("Commands:");
            println!("  load     - Load DemoConfig from the environment and print it");
            println!("  keys     - Print the environment keys DemoConfig reads");
            println!("  version  - Print the envconf version");
            println!("The prefix defaults to {}.", DEFAULT_PREFIX);
        }
    };
}

fn load(prefix: &str) {
    let mut config = DemoConfig::default();
    match envconf::parse(prefix, &mut config) {
        Ok(written) => {
            println!("{} {} field(s) set", "Config loaded.".green(), written);
            println!("  port: {}", config.port);
            println!("  name: {}", config.name);
            println!("  debug: {}", config.debug);
            println!("  sample_rate: {}", config.sample_rate);
            println!("  allowed_hosts: {:?}", config.allowed_hosts);
        }
        Err(e) => {
            eprintln!("{}", format_config_error(&e));
            std::process::exit(1);
        }
    }
}

fn print_keys(prefix: &str) {
    print!("{}", keys_table(prefix, &DemoConfig::descriptor()));
}

/// Markdown summary of the keys a struct reads
fn keys_table(prefix: &str, descriptor: &RecordDescriptor) -> String {
    let mut md = String::new();
    md.push_str("| Variable | Fallback | Type | Required | Default |\n");
    md.push_str("|----------|----------|------|----------|---------|\n");
    for field in descriptor {
        let fallback = resolver::fallback_key(field).unwrap_or_else(|| "-".to_string());
        let required = if field.required { "Yes" } else { "No" };
        let default = field.default_value.as_deref().unwrap_or("-");
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            resolver::primary_key(prefix, field),
            fallback,
            field.type_name,
            required,
            default
        ));
    }
    md
}
