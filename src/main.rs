use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
    time::Duration,
};

use clap::{Args, Parser, Subcommand, ValueEnum};
use s3client::{
    util::object::parse_object_uri, ClientConfig, Credentials, ErrorKind, FileContents,
    PresignOptions, ReturnType, S3Client, S3ClientError, SdkOverrides,
};
use tracing::{error, info, span, Instrument, Level};

#[derive(Parser)]
#[command(name = "s3client", version, about = "Validated S3 object operations")]
struct Cli {
    #[command(flatten)]
    connection: Connection,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct Connection {
    #[arg(long, global = true, env = "AWS_REGION")]
    region: Option<String>,

    #[arg(long, global = true, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    access_key_id: Option<String>,

    #[arg(long, global = true, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    secret_access_key: Option<String>,

    #[arg(long, global = true, env = "AWS_SESSION_TOKEN", hide_env_values = true)]
    session_token: Option<String>,

    #[arg(long, global = true, env = "AWS_ENDPOINT_URL")]
    endpoint_url: Option<String>,

    #[arg(long, global = true)]
    force_path_style: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print a presigned URL for an object
    Presign {
        uri: String,
        #[arg(long, default_value_t = 900)]
        expires_in: u64,
        /// Sign a PUT instead of a GET
        #[arg(long)]
        upload: bool,
    },
    /// Print an object's contents
    Read {
        uri: String,
        #[arg(long = "as", value_enum, default_value_t = ReadAs::Text)]
        read_as: ReadAs,
    },
    /// Upload a local file
    Upload { file: PathBuf, uri: String },
    Delete { uri: String },
    Exists { uri: String },
    List {
        bucket: String,
        #[arg(long, default_value = "")]
        prefix: String,
    },
    CreateBucket { bucket: String },
    DeleteBucket { bucket: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum ReadAs {
    #[value(name = "string")]
    Text,
    #[value(name = "buffer")]
    Bytes,
}

impl Connection {
    async fn connect(self) -> Result<S3Client, S3ClientError> {
        if self.access_key_id.is_none() && self.secret_access_key.is_none() {
            info!("no static credentials, loading default provider chain");
            let config = aws_config::load_from_env().await;
            let overrides = SdkOverrides {
                region: self.region,
                endpoint_url: self.endpoint_url,
                force_path_style: self.force_path_style,
            };
            return S3Client::from_sdk_config_with(&config, &overrides);
        }

        let mut credentials = Credentials::new(
            self.access_key_id.unwrap_or_default(),
            self.secret_access_key.unwrap_or_default(),
        );
        credentials.session_token = self.session_token;

        S3Client::new(ClientConfig {
            region: self.region,
            credentials,
            endpoint_url: self.endpoint_url,
            force_path_style: self.force_path_style,
        })
    }
}

async fn run(cli: Cli) -> Result<(), S3ClientError> {
    let client = cli.connection.connect().await?;

    match cli.command {
        Command::Presign {
            uri,
            expires_in,
            upload,
        } => {
            let params = parse_object_uri(&uri)?;
            let options = Some(PresignOptions::expires_in(Duration::from_secs(expires_in)));
            let url = if upload {
                client.get_presigned_upload_url(&params, options).await?
            } else {
                client.get_presigned_url(&params, options).await?
            };
            println!("{}", url);
        }
        Command::Read { uri, read_as } => {
            let params = parse_object_uri(&uri)?;
            let return_type = match read_as {
                ReadAs::Text => ReturnType::String,
                ReadAs::Bytes => ReturnType::Buffer,
            };
            match client.read_file(&params, return_type).await? {
                FileContents::String(s) => print!("{}", s),
                FileContents::Buffer(b) => {
                    let mut stdout = io::stdout().lock();
                    stdout
                        .write_all(&b)
                        .and_then(|_| stdout.flush())
                        .map_err(|err| {
                            S3ClientError::new(ErrorKind::Body, "Couldn't write S3 file to stdout")
                                .with_cause(err)
                        })?;
                }
                FileContents::Stream(_) => {}
            }
        }
        Command::Upload { file, uri } => {
            let params = parse_object_uri(&uri)?;
            let body = tokio::fs::read(&file).await.map_err(|err| {
                S3ClientError::new(ErrorKind::InvalidParams, "Couldn't upload file to S3")
                    .with_cause(err)
            })?;
            let output = client.upload_file(body, &params).await?;
            println!("{}", output.e_tag().unwrap_or(""));
        }
        Command::Delete { uri } => {
            client.delete_file(&parse_object_uri(&uri)?).await?;
        }
        Command::Exists { uri } => {
            println!("{}", client.file_exists(&parse_object_uri(&uri)?).await?);
        }
        Command::List { bucket, prefix } => {
            for obj in client.list_files(&bucket, &prefix).await? {
                println!("{}\t{}", obj.size, obj.key);
            }
        }
        Command::CreateBucket { bucket } => {
            client.create_bucket(&bucket).await?;
        }
        Command::DeleteBucket { bucket } => {
            client.delete_bucket(&bucket).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .json()
        .with_writer(std::io::stderr)
        .init();

    let span = span!(Level::INFO, "main", context = "main");
    span.in_scope(|| info!("called"));

    let cli = Cli::parse();

    match run(cli).instrument(span).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error_message = %err.detailed(), error_group = %err.kind());
            ExitCode::FAILURE
        }
    }
}
