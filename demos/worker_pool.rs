//! Worker-pool demo: one producer expanded into several independent workers,
//! plus start/stop hooks. Stop with Ctrl-C.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use convoy::{ComponentError, ComponentFn, Config, ProducerFn, ProducerOptions, Supervisor};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut cfg = Config::default();
    cfg.name = "worker-pool".to_string();
    cfg.shutdown_timeout = Duration::from_secs(5);

    let mut sup = Supervisor::new(cfg)?;

    sup.hooks().on_start(|_ctx| async {
        println!("pool warming up");
        Ok(())
    });
    sup.hooks().on_stop(|_ctx| async {
        println!("pool drained");
        Ok(())
    });

    let seq = Arc::new(AtomicUsize::new(0));
    let producer = ProducerFn::new(move || {
        let id = seq.fetch_add(1, Ordering::Relaxed);
        ComponentFn::arc(format!("worker-{id}"), move |ctx: CancellationToken| {
            async move {
                loop {
                    tokio::select! {
                        _ = ctx.cancelled() => return Ok::<_, ComponentError>(()),
                        _ = tokio::time::sleep(Duration::from_secs(1)) => {
                            println!("worker-{id}: tick");
                        }
                    }
                }
            }
        })
    })
    .with_options(ProducerOptions::default().with_instances(3))
    .arc();

    sup.load_from_producer(vec![producer]).await?;

    match sup.run().await {
        Ok(()) => println!("stopped gracefully"),
        Err(e) => {
            eprintln!("stopped with error: {e}");
            std::process::exit(1);
        }
    }
    Ok(())
}
