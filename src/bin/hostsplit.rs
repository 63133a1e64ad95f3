//! hostsplit: CLI tool for splitting URLs into public-suffix aware components.

use clap::Parser;
use hostsplit::{
    ExtractOptions, ExtractResult, Extractor, ExtractorConfig, SuffixListSource,
    DEFAULT_SUFFIX_LIST_URL,
};
use std::io::{self, BufRead};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hostsplit")]
#[command(author = "Kaitu.io")]
#[command(version = "0.1.0")]
#[command(about = "Split URLs into scheme, subdomain, domain, suffix and port", long_about = None)]
struct Cli {
    /// URLs or hosts to split; reads stdin lines when none are given
    inputs: Vec<String>,

    /// Local public suffix list file (never refreshed)
    #[arg(short, long, conflicts_with = "url")]
    list: Option<PathBuf>,

    /// Public suffix list URL
    #[arg(short, long, default_value = DEFAULT_SUFFIX_LIST_URL)]
    url: String,

    /// Cache directory for downloaded lists
    #[arg(short, long)]
    cache_dir: Option<PathBuf>,

    /// Check the remote list for updates before extracting
    #[arg(long)]
    update: bool,

    /// Match private-domain rules too
    #[arg(short, long)]
    private: bool,

    /// Convert hosts to punycode before matching
    #[arg(long)]
    punycode: bool,

    /// Leave the subdomain empty
    #[arg(long)]
    ignore_subdomains: bool,

    /// Treat IPv4 addresses as ordinary hosts
    #[arg(long)]
    no_ipv4: bool,

    /// Do not report ports
    #[arg(long)]
    no_port: bool,

    /// Print one JSON object per input
    #[arg(short, long)]
    json: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let source = match &cli.list {
        Some(path) => SuffixListSource::File(path.clone()),
        None => {
            let cache_dir = cli
                .cache_dir
                .clone()
                .unwrap_or_else(|| std::env::temp_dir().join("hostsplit"));
            SuffixListSource::remote_url(cli.url.as_str(), cache_dir)
        }
    };

    let extractor = Extractor::new(ExtractorConfig::new(source).with_private(cli.private))?;
    if cli.update {
        if extractor.update()? {
            log::info!("Suffix list updated");
        } else {
            log::info!("Suffix list already current");
        }
    }

    let opts = ExtractOptions::default()
        .ignore_subdomains(cli.ignore_subdomains)
        .to_punycode(cli.punycode)
        .detect_ipv4(!cli.no_ipv4)
        .parse_port(!cli.no_port);

    if cli.inputs.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            print_result(&line, &extractor.extract_with(&line, &opts), cli.json)?;
        }
    } else {
        for input in &cli.inputs {
            print_result(input, &extractor.extract_with(input, &opts), cli.json)?;
        }
    }

    Ok(())
}

fn print_result(
    input: &str,
    result: &ExtractResult,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string(result)?);
        return Ok(());
    }

    println!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}",
        input,
        result.scheme,
        result.sub_domain,
        result.domain,
        result.suffix,
        result.port,
        if result.is_ipv4 {
            "ipv4"
        } else if result.is_ipv6 {
            "ipv6"
        } else {
            "host"
        }
    );
    Ok(())
}
