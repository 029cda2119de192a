use anyhow::Context;
use clap::Parser;
use classification_client::impl_fake::ClassificationClientFake;
use classification_client::impl_http::ClassificationClientHttp;
use classification_client::interface::ClassificationClient;
use cli::{ClassifierKind, Cli, Command, LogBackend, RunArgs, SourceKind};
use config::Config;
use display::impl_console::DisplayConsole;
use fake_endpoint::FakeEndpoint;
use frame_sampler::sampler::FrameSampler;
use library::clock::impl_system::ClockSystem;
use library::logger::impl_console::LoggerConsole;
use library::logger::impl_log::LoggerLog;
use library::logger::interface::Logger;
use sampling_run::main::{RunMode, SamplingRun};
use std::sync::{Arc, Mutex};
use video_source::impl_fake::VideoSourceFake;
use video_source::interface::VideoSource;

mod classification_client;
mod cli;
mod config;
mod display;
mod emotion;
mod fake_endpoint;
mod frame_sampler;
mod library;
mod sampling_run;
mod stress_verdict;
mod video_source;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => {
            let config = match &args.config {
                Some(path) => Config::load(path)?,
                None => Config::default(),
            };
            let config = args.apply(config);
            config.validate()?;

            let logger = build_logger(cli.log_backend, &config)?;
            run(&args, &config, logger)
        }
        Command::ServeFakeEndpoint { bind } => {
            let logger = build_logger(cli.log_backend, &Config::default())?;
            let endpoint =
                FakeEndpoint::start_logged(&bind, fake_endpoint::random_labeler(), logger.clone())?;
            let _ = logger.info(&format!(
                "Fake classification endpoint listening on {}",
                endpoint.upload_url()
            ));
            endpoint.wait();
            Ok(())
        }
    }
}

fn build_logger(
    backend: LogBackend,
    config: &Config,
) -> anyhow::Result<Arc<dyn Logger + Send + Sync>> {
    match backend {
        LogBackend::Console => Ok(Arc::new(LoggerConsole::new(config.logger_timezone()?))),
        LogBackend::Log => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .init();
            Ok(Arc::new(LoggerLog::new()))
        }
    }
}

fn build_video_source(
    args: &RunArgs,
    logger: Arc<dyn Logger + Send + Sync>,
) -> anyhow::Result<Arc<dyn VideoSource + Send + Sync>> {
    match args.source {
        SourceKind::Fake => Ok(Arc::new(VideoSourceFake::new(logger))),
        SourceKind::FakeDenied => Ok(Arc::new(VideoSourceFake::denied(logger))),
        #[cfg(feature = "webcam")]
        SourceKind::Webcam => Ok(Arc::new(
            video_source::impl_webcam::VideoSourceWebcam::new(args.camera_index, logger),
        )),
        #[cfg(not(feature = "webcam"))]
        SourceKind::Webcam => {
            anyhow::bail!("this build has no webcam support, rebuild with `--features webcam`")
        }
    }
}

fn run(
    args: &RunArgs,
    config: &Config,
    logger: Arc<dyn Logger + Send + Sync>,
) -> anyhow::Result<()> {
    let video_source = build_video_source(args, logger.clone())?;

    let classifier: Arc<dyn ClassificationClient + Send + Sync> = match args.classifier {
        ClassifierKind::Http => Arc::new(ClassificationClientHttp::new(
            &config.endpoint,
            config.request_timeout(),
            logger.clone(),
        )),
        ClassifierKind::Fake => Arc::new(ClassificationClientFake::new(logger.clone())),
    };

    let sampler = FrameSampler::new(
        config.sampler_settings(),
        Arc::new(ClockSystem::new()),
        logger.clone(),
    );

    let mode = if args.once {
        RunMode::Once
    } else {
        RunMode::Interactive
    };

    // In interactive mode stdin belongs to the command reader.
    let display = match mode {
        RunMode::Once => DisplayConsole::stdout()
            .acknowledged_by(Box::new(std::io::BufReader::new(std::io::stdin()))),
        RunMode::Interactive => DisplayConsole::stdout(),
    };

    let sampling_run = SamplingRun::new(
        logger.clone(),
        sampler,
        video_source,
        classifier,
        Arc::new(Mutex::new(display)),
        Box::new(std::io::stdin()),
    );

    let state = sampling_run
        .run(mode)
        .context("sampling run stopped before finishing")?;

    let _ = logger.info(&format!("Finished in state {}", state.to_display_string()));

    Ok(())
}
