use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use omnikassa::application::request::PaymentRequest;
use omnikassa::application::verifier::CallbackVerifier;
use omnikassa::config::MerchantConfig;
use omnikassa::domain::capture::CaptureMode;
use omnikassa::interfaces::csv::callback_reader::CallbackReader;
use omnikassa::interfaces::csv::outcome_writer::OutcomeWriter;
use omnikassa::logging;
use std::fs::File;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build a sealed payment request and print the form fields as JSON
    Sign(SignArgs),
    /// Verify recorded callbacks from a CSV file with Data and Seal columns
    Verify {
        /// Merchant credentials (TOML)
        #[arg(long)]
        config: PathBuf,

        /// Callbacks CSV file
        input: PathBuf,
    },
}

#[derive(clap::Args)]
struct SignArgs {
    /// Merchant credentials (TOML)
    #[arg(long)]
    config: PathBuf,

    /// ISO 4217 alpha code, e.g. EUR
    #[arg(long)]
    currency: String,

    /// Decimal amount, e.g. 24.99
    #[arg(long)]
    amount: String,

    #[arg(long)]
    order_id: String,

    #[arg(long)]
    transaction_reference: String,

    #[arg(long)]
    normal_return_url: String,

    #[arg(long)]
    automatic_response_url: String,

    /// ISO 639-1 code of the payment page language, e.g. nl
    #[arg(long)]
    language: Option<String>,

    /// Payment method to offer; repeat to offer several, in order
    #[arg(long = "brand")]
    brands: Vec<String>,

    #[arg(long)]
    capture_day: Option<u8>,

    /// AUTHOR_CAPTURE or VALIDATION
    #[arg(long)]
    capture_mode: Option<String>,

    /// Minutes until the payment expires
    #[arg(long)]
    expires_in_minutes: Option<i64>,
}

fn sign(args: SignArgs) -> Result<()> {
    let config = MerchantConfig::from_file(&args.config).into_diagnostic()?;

    let mut request = PaymentRequest::new();
    config.apply_to(request.order_mut()).into_diagnostic()?;
    request
        .set_currency(&args.currency)
        .and_then(|r| r.set_amount(&args.amount))
        .and_then(|r| r.set_order_id(&args.order_id))
        .and_then(|r| r.set_transaction_reference(&args.transaction_reference))
        .and_then(|r| r.set_normal_return_url(&args.normal_return_url))
        .and_then(|r| r.set_automatic_response_url(&args.automatic_response_url))
        .into_diagnostic()?;

    if let Some(language) = &args.language {
        request.set_customer_language(language).into_diagnostic()?;
    }
    if !args.brands.is_empty() {
        request
            .set_payment_mean_brand_list(args.brands.as_slice())
            .into_diagnostic()?;
    }
    if let Some(days) = args.capture_day {
        request.set_capture_day(days).into_diagnostic()?;
    }
    if let Some(mode) = &args.capture_mode {
        request.set_capture_mode(CaptureMode::parse(mode).into_diagnostic()?);
    }
    if let Some(minutes) = args.expires_in_minutes {
        let lifetime = Duration::try_minutes(minutes)
            .ok_or_else(|| miette::miette!("expiration of {minutes} minutes is out of range"))?;
        request
            .set_expiration_date(Utc::now() + lifetime)
            .into_diagnostic()?;
    }

    let form = request.form().into_diagnostic()?;
    println!("{}", serde_json::to_string_pretty(&form).into_diagnostic()?);
    Ok(())
}

fn verify(config: PathBuf, input: PathBuf) -> Result<()> {
    let config = MerchantConfig::from_file(config).into_diagnostic()?;
    let verifier = CallbackVerifier::new(config);

    let file = File::open(input).into_diagnostic()?;
    let reader = CallbackReader::new(file);
    let stdout = io::stdout();
    let mut writer = OutcomeWriter::new(stdout.lock());

    for record in reader.callbacks() {
        match record {
            Ok(record) => {
                let (outcome, error) = verifier.outcome(&record.data, &record.seal);
                if let Some(e) = error {
                    eprintln!("Error verifying callback: {}", e);
                }
                writer.write(&outcome).into_diagnostic()?;
            }
            Err(e) => {
                eprintln!("Error reading callback: {}", e);
            }
        }
    }

    writer.flush().into_diagnostic()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level).into_diagnostic()?;

    match cli.command {
        Command::Sign(args) => sign(args),
        Command::Verify { config, input } => verify(config, input),
    }
}
