use std::{process::ExitCode, sync::Arc};

use anyhow::Context;
use clap::Parser;
use log::{error, info, warn};
use tokio_util::sync::CancellationToken;

use fiscal_seeder::{
    BatchError,
    config::SeederConfig,
    core::{
        ITEM_CONCURRENCY, JOB_CONCURRENCY,
        item::{RecordKind, RecordWriter},
        launcher::BatchReport,
    },
    item::{logger::LoggerWriter, orm::OrmRecordWriter},
};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(SeederConfig::parse()).await {
        Ok(report) => {
            report
                .failures()
                .for_each(|failure| warn!("Failure: {}", failure));
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: SeederConfig) -> anyhow::Result<BatchReport> {
    config.validate()?;

    let writer: Arc<dyn RecordWriter> = if config.dry_run {
        info!("Dry run: records are logged, not written");
        Arc::new(LoggerWriter::default())
    } else {
        let url = config.database.connection_url()?;
        let pool_size = (ITEM_CONCURRENCY * JOB_CONCURRENCY) as u32;
        let writer = OrmRecordWriter::connect(&url, pool_size)
            .await
            .with_context(|| format!("Cannot reach database {}", config.database.db_name))?;
        Arc::new(writer)
    };

    let launcher = config.launcher(Arc::clone(&writer))?;

    writer
        .migrate(&RecordKind::all())
        .await
        .context("Cannot create the tables")?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, waiting for in-flight writes");
            on_interrupt.cancel();
        }
    });

    info!("Seeding with seed {}", launcher.seed());
    let report = launcher.launch(&cancel).await;

    if let Some(fatal) = report.failures().find(|failure| failure.is_fatal()) {
        return Err(BatchError::clone(fatal).into());
    }

    Ok(report)
}
