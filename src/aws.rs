use aws_config::{
	default_provider::credentials::Builder, meta::region::RegionProviderChain, AppName,
	BehaviorVersion, ConfigLoader, Region, SdkConfig,
};
use aws_credential_types::Credentials;
use clap::Parser;
use miette::{IntoDiagnostic, Result};

pub mod devicefarm;

/// Device Farm only runs in this region.
pub const DEFAULT_REGION: &str = "us-west-2";

/// Include this struct as `#[command(flatten)]` in an Args struct so it can host AWS credentials.
#[derive(Debug, Clone, Parser)]
pub struct AwsArgs {
	/// AWS Access Key ID.
	///
	/// This is the AWS Access Key ID to use for authentication. If not specified here, it will be
	/// taken from the environment variable `AWS_ACCESS_KEY_ID`, or from the AWS credentials file
	/// (usually `~/.aws/credentials`), or from ambient credentials (eg EC2 instance profile).
	#[arg(long, value_name = "KEY_ID", global = true)]
	pub aws_access_key_id: Option<String>,

	/// AWS Secret Access Key.
	///
	/// This is the AWS Secret Access Key to use for authentication. If not specified here, it will
	/// be taken from the environment variable `AWS_SECRET_ACCESS_KEY`, or from the AWS credentials
	/// file (usually `~/.aws/credentials`), or from ambient credentials (eg EC2 instance profile).
	#[arg(long, value_name = "SECRET_KEY", global = true)]
	pub aws_secret_access_key: Option<String>,

	/// AWS Session Token.
	///
	/// This is the AWS Session Token to use for authentication using temporary credentials. If not
	/// specified here, it will be taken from the environment variable `AWS_SESSION_TOKEN` if exists.
	#[arg(long, value_name = "SESSION_TOKEN", global = true)]
	pub aws_session_token: Option<String>,

	/// AWS Region.
	///
	/// If not specified here, it will be taken from the environment variable `AWS_REGION`, or from
	/// the AWS config file (usually `~/.aws/config`). Device Farm is only available in us-west-2,
	/// which is used when no region is configured at all.
	#[arg(long, value_name = "REGION", global = true)]
	pub aws_region: Option<String>,
}

/// Get AWS config from the environment, or credentials files, or ambient, etc.
pub async fn init(args: &AwsArgs) -> Result<SdkConfig> {
	let mut config = ConfigLoader::default()
		.behavior_version(BehaviorVersion::latest())
		.app_name(AppName::new(crate::APP_NAME).into_diagnostic()?);

	let region = RegionProviderChain::first_try(args.aws_region.clone().map(Region::new))
		.or_default_provider()
		.or_else(Region::new(DEFAULT_REGION));

	if let (Some(key_id), Some(secret)) = (&args.aws_access_key_id, &args.aws_secret_access_key) {
		// instead of having only the keys as credentials provider, we set up a full provider chain
		// and add these credentials to it, so that we can still use ambient credentials, sessions,
		// etc.
		let chain = Builder::default().with_custom_credential_source(
			"args",
			Credentials::from_keys(key_id, secret, args.aws_session_token.clone()),
		);
		config = config.credentials_provider(chain.build().await);
	}

	Ok(config.region(region).load().await)
}
