use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vital_core::DeathRecord;
use vital_ije::{IjeCodec, Issue};
use vital_messaging::{
    BusinessIdentifiers, Envelope, MessageKind, MessagingConfig, MessagingError, Payload,
};

#[derive(Parser)]
#[command(name = "vital")]
#[command(about = "Death record IJE conversion and messaging CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode an IJE mortality file into record JSON, one record per line
    Decode {
        /// Path to the IJE file
        file: PathBuf,
        /// Print raw field values keyed by short code instead of records
        #[arg(long)]
        values: bool,
    },
    /// Encode a record JSON bundle as one IJE mortality line
    Encode {
        /// Path to the record JSON
        file: PathBuf,
    },
    /// Classify a message bundle and summarise its payload
    Classify {
        /// Path to the message JSON
        file: PathBuf,
        /// Print an extraction-error message instead of failing on bad input
        #[arg(long)]
        forward_errors: bool,
    },
    /// Wrap a record in an outbound message
    Envelope {
        /// Message kind (e.g. submission, cause-of-death-coding)
        kind: String,
        /// Path to the record JSON
        file: PathBuf,
    },
    /// Build a void message for a block of certificate numbers
    Void {
        /// First certificate number of the block
        certificate_number: u32,
        /// Jurisdiction id
        jurisdiction: String,
        /// Year of death
        year: u32,
        /// Number of consecutive certificates to void
        #[arg(long, default_value_t = 1)]
        block_count: u32,
    },
    /// Acknowledge an inbound message
    Acknowledge {
        /// Path to the inbound message JSON
        file: PathBuf,
    },
}

fn read(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn report(issues: Vec<Issue>, line: usize) {
    for issue in issues {
        tracing::warn!(line, code = %issue.code, "{}", issue);
    }
}

fn config() -> MessagingConfig {
    MessagingConfig::from_env_values(
        std::env::var("VITAL_SOURCE_ENDPOINT").ok(),
        std::env::var("VITAL_DESTINATION_ENDPOINT").ok(),
    )
}

fn summary(envelope: &Envelope) -> serde_json::Value {
    let payload = match envelope.payload() {
        Payload::None => "identifiers only".to_string(),
        Payload::Record(bundle) => format!("record ({} resources)", bundle.entry.len()),
        Payload::View(view, bundle) => {
            format!("{view:?} view ({} resources)", bundle.entry.len())
        }
        Payload::Void { block_count } => format!("void of {block_count} certificate(s)"),
        Payload::Alias(_) => "alias values".to_string(),
        Payload::Status(status) => format!("status {status}"),
        Payload::ExtractionError { issues, .. } => format!("{} issue(s)", issues.len()),
    };
    serde_json::json!({
        "kind": envelope.kind().as_str(),
        "id": envelope.id(),
        "response_to": envelope.response_to(),
        "identifiers": envelope.identifiers(),
        "payload": payload,
    })
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("vital=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Decode { file, values }) => {
            let text = read(&file)?;
            let mut codec = IjeCodec::mortality();
            for (index, line) in text.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                if values {
                    let decoded = codec.decode(line)?;
                    println!("{}", serde_json::to_string(&decoded)?);
                } else {
                    let record = codec.ije_to_record(line)?;
                    println!("{}", record.to_json()?);
                }
                report(codec.take_issues(), index + 1);
            }
        }
        Some(Commands::Encode { file }) => {
            let record = DeathRecord::from_json(&read(&file)?)?;
            let mut codec = IjeCodec::mortality();
            let line = codec.record_to_ije(&record)?;
            report(codec.take_issues(), 1);
            println!("{line}");
        }
        Some(Commands::Classify {
            file,
            forward_errors,
        }) => {
            let text = read(&file)?;
            match Envelope::parse_json(&text) {
                Ok(envelope) => println!("{}", serde_json::to_string_pretty(&summary(&envelope))?),
                Err(e) if forward_errors => {
                    tracing::warn!(error = %e, "forwarding extraction error");
                    let original = serde_json::from_str(&text).ok();
                    let error = Envelope::extraction_error(&e, original).with_config(&config());
                    println!("{}", error.to_json()?);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Some(Commands::Envelope { kind, file }) => {
            let kind = MessageKind::from_name(&kind)
                .ok_or_else(|| anyhow!("unknown message kind: {kind}"))?;
            let record = DeathRecord::from_json(&read(&file)?)?;
            let envelope = Envelope::outbound(kind, &record).with_config(&config());
            tracing::info!(kind = %kind, id = envelope.id(), "built message");
            println!("{}", envelope.to_json()?);
        }
        Some(Commands::Void {
            certificate_number,
            jurisdiction,
            year,
            block_count,
        }) => {
            if block_count == 0 {
                return Err(MessagingError::InvalidInput("block count must be positive".into()).into());
            }
            let identifiers = BusinessIdentifiers {
                certificate_number: Some(certificate_number),
                jurisdiction_id: Some(jurisdiction),
                event_year: Some(year),
                state_auxiliary_id: None,
            };
            let envelope = Envelope::void(identifiers, block_count).with_config(&config());
            println!("{}", envelope.to_json()?);
        }
        Some(Commands::Acknowledge { file }) => {
            let inbound = Envelope::parse_json(&read(&file)?)?;
            println!("{}", Envelope::acknowledge(&inbound).to_json()?);
        }
        None => {
            println!("Use 'vital --help' for commands");
        }
    }

    Ok(())
}
