//! oltstat CLI.
//!
//! Local mode turns saved capture files into occupancy reports:
//!
//! ```bash
//! oltstat captures/ -o reports/
//! oltstat 7606-10.txt
//! ```
//!
//! Collect mode captures slots 2-7 from a device over SSH, saves the
//! raw document, and writes its report:
//!
//! ```bash
//! oltstat --collect 172.10.1.26 -u admin -P secret -o reports/
//! ```

use std::env;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use oltstat::batch::run_batch;
use oltstat::collect::{into_document, CollectorConfig, DeviceSession};
use oltstat::Error;

struct Args {
    input: Option<PathBuf>,
    collect: Option<String>,
    out_dir: PathBuf,
    port: u16,
    user: Option<String>,
    password: Option<String>,
    key: Option<PathBuf>,
    timeout: u64,
}

impl Args {
    fn parse() -> Result<Self, String> {
        let argv: Vec<String> = env::args().collect();
        let mut input = None;
        let mut collect = None;
        let mut out_dir = PathBuf::from(".");
        let mut port = 22u16;
        let mut user = None;
        let mut password = None;
        let mut key = None;
        let mut timeout = 30u64;

        let mut take_value = |i: &mut usize| -> Result<String, String> {
            *i += 1;
            argv.get(*i)
                .cloned()
                .ok_or_else(|| format!("missing value after {}", argv[*i - 1]))
        };

        let mut i = 1;
        while i < argv.len() {
            match argv[i].as_str() {
                "--collect" | "-c" => collect = Some(take_value(&mut i)?),
                "--out" | "-o" => out_dir = PathBuf::from(take_value(&mut i)?),
                "--port" | "-p" => {
                    port = take_value(&mut i)?
                        .parse()
                        .map_err(|_| "port must be a number".to_owned())?;
                }
                "--user" | "-u" => user = Some(take_value(&mut i)?),
                "--password" | "-P" => password = Some(take_value(&mut i)?),
                "--key" | "-k" => key = Some(PathBuf::from(take_value(&mut i)?)),
                "--timeout" | "-t" => {
                    timeout = take_value(&mut i)?
                        .parse()
                        .map_err(|_| "timeout must be seconds".to_owned())?;
                }
                "--help" => {
                    print_usage();
                    std::process::exit(0);
                }
                other if !other.starts_with('-') && input.is_none() => {
                    input = Some(PathBuf::from(other));
                }
                other => return Err(format!("unexpected argument: {other}")),
            }
            i += 1;
        }

        if input.is_none() && collect.is_none() {
            return Err("give a capture file/directory or --collect <host>".to_owned());
        }
        Ok(Self {
            input,
            collect,
            out_dir,
            port,
            user,
            password,
            key,
            timeout,
        })
    }
}

fn print_usage() {
    eprintln!(
        "Usage:\n  \
         oltstat <file-or-dir> [-o out_dir]\n  \
         oltstat --collect <host> -u <user> [-P <password> | -k <key>] \
         [-p <port>] [-t <seconds>] [-o out_dir]"
    );
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match Args::parse() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("Error: {message}");
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Error> {
    fs::create_dir_all(&args.out_dir)?;

    let input = match &args.collect {
        Some(host) => collect_to_file(&args, host).await?,
        None => args.input.clone().expect("validated in Args::parse"),
    };

    let summary = run_batch(&input, &args.out_dir)?;
    for report in &summary.reports {
        println!("report: {}", report.display());
    }
    for (doc, err) in &summary.failures {
        eprintln!("failed: {}: {err}", doc.display());
    }

    if summary.reports.is_empty() {
        Err(Error::NoDocuments { path: input })
    } else {
        Ok(())
    }
}

/// Capture the device and save the raw document next to the reports.
async fn collect_to_file(args: &Args, host: &str) -> Result<PathBuf, Error> {
    let user = args.user.clone().unwrap_or_else(|| "admin".to_owned());
    let mut config = CollectorConfig::new(host, user)
        .port(args.port)
        .command_timeout(Duration::from_secs(args.timeout));

    if let Some(password) = &args.password {
        config = config.password(password.clone());
    } else if let Some(key) = &args.key {
        config = config.private_key(key);
    }

    let mut session = DeviceSession::open(config).await?;
    let captures = session.capture_device().await?;
    session.close().await?;

    let path = args.out_dir.join(format!("{host}.txt"));
    fs::write(&path, into_document(&captures))?;
    println!("capture: {}", path.display());
    Ok(path)
}
